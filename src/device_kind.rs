// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! This module defines the kinds of switching devices and series branches the
//! engine understands, and the voltage phasor reported for a node.

use crate::graph_traits::{SeriesBranch, SwitchingDevice};
use std::fmt::Display;

/// Represents the kind of a switching device.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwitchingDeviceKind {
    Breaker,
    Switch,
}

impl Display for SwitchingDeviceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SwitchingDeviceKind::Breaker => write!(f, "Breaker"),
            SwitchingDeviceKind::Switch => write!(f, "Switch"),
        }
    }
}

/// Represents the state of a series compensator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompensatorStatus {
    Energized,
    Bypassed,
}

/// Represents the kind of a series-impedance branch of a transmission line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeriesBranchKind {
    LineSegment,
    SeriesCompensator(CompensatorStatus),
}

impl Display for SeriesBranchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeriesBranchKind::LineSegment => write!(f, "LineSegment"),
            SeriesBranchKind::SeriesCompensator(CompensatorStatus::Energized) => {
                write!(f, "EnergizedSeriesCompensator")
            }
            SeriesBranchKind::SeriesCompensator(CompensatorStatus::Bypassed) => {
                write!(f, "BypassedSeriesCompensator")
            }
        }
    }
}

/// A voltage phasor measurement reported for a node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VoltagePhasor {
    /// The measured voltage angle.
    pub angle_in_degrees: f64,
    /// Whether the measurement is available and fit for use this frame.
    pub include_in_estimator: bool,
}

impl VoltagePhasor {
    /// Returns the angle if the measurement can be used, `None` otherwise.
    pub fn usable_angle(&self) -> Option<f64> {
        (self.include_in_estimator && self.angle_in_degrees.is_finite())
            .then_some(self.angle_in_degrees)
    }
}

/// Predicates for checking the status of a `SwitchingDevice`.
pub(crate) trait DevicePredicates: SwitchingDevice {
    fn is_breaker(&self) -> bool {
        self.kind() == SwitchingDeviceKind::Breaker
    }

    fn is_switch(&self) -> bool {
        self.kind() == SwitchingDeviceKind::Switch
    }

    /// A breaker reporting measured-closed, or a closed switch.
    fn is_closed_by_measurement(&self) -> bool {
        match self.kind() {
            SwitchingDeviceKind::Breaker => self.is_measured_closed(),
            SwitchingDeviceKind::Switch => self.is_closed(),
        }
    }

    /// A breaker reporting measured- or inferred-closed, or a closed switch.
    fn is_closed_by_measurement_or_inference(&self) -> bool {
        match self.kind() {
            SwitchingDeviceKind::Breaker => self.is_measured_closed() || self.is_inferred_closed(),
            SwitchingDeviceKind::Switch => self.is_closed(),
        }
    }
}

/// Implement the `DevicePredicates` trait for all types that implement the
/// `SwitchingDevice` trait.
impl<T: SwitchingDevice> DevicePredicates for T {}

/// Predicates for checking the kind of a `SeriesBranch`.
pub(crate) trait BranchPredicates: SeriesBranch {
    fn is_bypassed_compensator(&self) -> bool {
        self.kind() == SeriesBranchKind::SeriesCompensator(CompensatorStatus::Bypassed)
    }
}

/// Implement the `BranchPredicates` trait for all types that implement the
/// `SeriesBranch` trait.
impl<T: SeriesBranch> BranchPredicates for T {}
