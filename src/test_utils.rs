// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! This module is only compiled when running unit tests and contains features
//! that are shared by all tests of the crate.
//!
//! - the `TestNode`, `TestDevice` and `TestBranch` types, which implement the
//!   `Node`, `SwitchingDevice` and `SeriesBranch` traits respectively.
//! - the `SubstationBuilder`, which can declaratively build substation
//!   graphs for use in tests.

use num_complex::Complex64;

use crate::{
    CompensatorStatus, Error, Node, SeriesBranch, SeriesBranchKind, SubstationGraph,
    SubstationGraphConfig, SwitchingDevice, SwitchingDeviceKind, TopologyLevel, VoltagePhasor,
};

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct TestNode {
    id: u64,
    phasor: Option<VoltagePhasor>,
}

impl TestNode {
    /// A node without a phasor measurement.
    pub(crate) fn new(id: u64) -> Self {
        TestNode { id, phasor: None }
    }

    /// A node with a usable phasor measurement.
    pub(crate) fn measured(id: u64, angle_in_degrees: f64) -> Self {
        TestNode {
            id,
            phasor: Some(VoltagePhasor {
                angle_in_degrees,
                include_in_estimator: true,
            }),
        }
    }

    pub(crate) fn set_angle(&mut self, angle_in_degrees: f64) {
        self.phasor = Some(VoltagePhasor {
            angle_in_degrees,
            include_in_estimator: true,
        });
    }

    pub(crate) fn exclude_from_estimator(&mut self) {
        if let Some(phasor) = &mut self.phasor {
            phasor.include_in_estimator = false;
        }
    }
}

impl Node for TestNode {
    fn node_id(&self) -> u64 {
        self.id
    }

    fn voltage_phasor(&self) -> Option<VoltagePhasor> {
        self.phasor
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct TestDevice {
    from: u64,
    to: u64,
    kind: SwitchingDeviceKind,
    closed: bool,
    measured_closed: bool,
    inferred_closed: bool,
}

impl TestDevice {
    /// An open breaker.
    pub(crate) fn breaker(from: u64, to: u64) -> Self {
        TestDevice {
            from,
            to,
            kind: SwitchingDeviceKind::Breaker,
            closed: false,
            measured_closed: false,
            inferred_closed: false,
        }
    }

    /// An open switch.
    pub(crate) fn switch(from: u64, to: u64) -> Self {
        TestDevice {
            kind: SwitchingDeviceKind::Switch,
            ..Self::breaker(from, to)
        }
    }

    pub(crate) fn closed(mut self) -> Self {
        self.closed = true;
        self
    }

    pub(crate) fn measured_closed(mut self) -> Self {
        self.set_status(true, self.inferred_closed);
        self
    }

    pub(crate) fn inferred_closed(mut self) -> Self {
        self.set_status(self.measured_closed, true);
        self
    }

    pub(crate) fn set_closed(&mut self, closed: bool) {
        self.closed = closed;
    }

    /// Sets the breaker status.  A breaker is closed if either status says so.
    pub(crate) fn set_status(&mut self, measured_closed: bool, inferred_closed: bool) {
        self.measured_closed = measured_closed;
        self.inferred_closed = inferred_closed;
        self.closed = measured_closed || inferred_closed;
    }
}

impl SwitchingDevice for TestDevice {
    fn from_node(&self) -> u64 {
        self.from
    }

    fn to_node(&self) -> u64 {
        self.to
    }

    fn kind(&self) -> SwitchingDeviceKind {
        self.kind
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    fn is_measured_closed(&self) -> bool {
        self.kind == SwitchingDeviceKind::Breaker && self.measured_closed
    }

    fn is_inferred_closed(&self) -> bool {
        self.kind == SwitchingDeviceKind::Breaker && self.inferred_closed
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct TestBranch {
    from: u64,
    to: u64,
    kind: SeriesBranchKind,
    impedance: Complex64,
}

impl TestBranch {
    pub(crate) fn segment(from: u64, to: u64, r: f64, x: f64) -> Self {
        TestBranch {
            from,
            to,
            kind: SeriesBranchKind::LineSegment,
            impedance: Complex64::new(r, x),
        }
    }

    pub(crate) fn compensator(from: u64, to: u64, x: f64, status: CompensatorStatus) -> Self {
        TestBranch {
            from,
            to,
            kind: SeriesBranchKind::SeriesCompensator(status),
            impedance: Complex64::new(0.0, x),
        }
    }

    pub(crate) fn set_status(&mut self, status: CompensatorStatus) {
        self.kind = SeriesBranchKind::SeriesCompensator(status);
    }
}

impl SeriesBranch for TestBranch {
    fn from_node(&self) -> u64 {
        self.from
    }

    fn to_node(&self) -> u64 {
        self.to
    }

    fn kind(&self) -> SeriesBranchKind {
        self.kind
    }

    fn impedance(&self) -> Complex64 {
        self.impedance
    }
}

/// A builder for creating substation graphs easily, for use in tests.
pub(crate) struct SubstationBuilder {
    nodes: Vec<TestNode>,
    devices: Vec<TestDevice>,
}

impl SubstationBuilder {
    /// Creates a new `SubstationBuilder`.
    pub(crate) fn new() -> Self {
        SubstationBuilder {
            nodes: Vec::new(),
            devices: Vec::new(),
        }
    }

    /// Adds a node without a phasor measurement.
    pub(crate) fn node(mut self, id: u64) -> Self {
        self.nodes.push(TestNode::new(id));
        self
    }

    /// Adds a node with a usable phasor measurement.
    pub(crate) fn measured_node(mut self, id: u64, angle_in_degrees: f64) -> Self {
        self.nodes.push(TestNode::measured(id, angle_in_degrees));
        self
    }

    /// Adds a node whose phasor measurement is excluded from the estimator.
    pub(crate) fn unavailable_node(mut self, id: u64, angle_in_degrees: f64) -> Self {
        let mut node = TestNode::measured(id, angle_in_degrees);
        node.exclude_from_estimator();
        self.nodes.push(node);
        self
    }

    /// Adds a breaker or a switch.
    pub(crate) fn device(mut self, device: TestDevice) -> Self {
        self.devices.push(device);
        self
    }

    /// Builds the substation graph from the nodes and devices added to the
    /// builder.
    pub(crate) fn build(
        &self,
        topology_level: TopologyLevel,
        angle_delta_threshold_in_degrees: f64,
    ) -> Result<SubstationGraph<TestNode, TestDevice>, Error> {
        SubstationGraph::try_new(
            self.nodes.clone(),
            self.devices.clone(),
            SubstationGraphConfig {
                topology_level,
                angle_delta_threshold_in_degrees,
            },
        )
    }
}
