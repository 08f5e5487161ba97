// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

/*!
# Node-Breaker Topology

This is a library for reducing the node-breaker model of a power system, in
which every busbar section, breaker and disconnect switch is modelled, to the
bus/branch model that state estimators work with.

A substation is reduced to a set of observed buses, the groups of nodes that
are electrically the same point.  A transmission line, which can itself
consist of line segments, series compensators and switches, is reduced to a
single equivalent series branch.

## The `Node`, `SwitchingDevice` and `SeriesBranch` traits

The main structs are [`SubstationGraph`] and [`TransmissionLineGraph`],
instances of which can be created by passing iterators of nodes and devices
to their `try_new` methods.

But because this is an independent library, it doesn't know about the node
and device types of the application and instead uses traits to interact with
them.

Therefore, to be usable with this library, the node types must implement the
[`Node`] trait, the breakers and switches must implement the
[`SwitchingDevice`] trait and the line segments and series compensators must
implement the [`SeriesBranch`] trait.  Check out the documentation for these
traits for sample implementations.

## Topology levels

How a substation is resolved depends on the configured [`TopologyLevel`]:

- [`Zero`][TopologyLevel::Zero]: every node is its own bus.
- [`One`][TopologyLevel::One]: nodes connected by closed switches or by
  breakers that are measured closed form a bus.
- [`Two`][TopologyLevel::Two]: like `One`, but breakers that are inferred
  closed connect nodes too.
- [`Three`][TopologyLevel::Three]: adjacent clusters whose voltage angles are
  within
  [`angle_delta_threshold_in_degrees`][SubstationGraphConfig::angle_delta_threshold_in_degrees]
  of each other form a bus.
- [`Four`][TopologyLevel::Four]: angle coherency followed by breaker status.
  [`topology_error_detected`][SubstationGraph::topology_error_detected] is set
  when a closed breaker contradicts the measured angles.

## Validation

The `try_new` methods check that:

- Node ids are unique.
- All devices and branches point to existing nodes.
- No device or branch connects a node to itself.
- The configuration is sensible.

If any of these checks fail, the method will return an [`Error`].
*/

mod config;
pub use config::{SubstationGraphConfig, TopologyLevel};

mod device_kind;
pub use device_kind::{CompensatorStatus, SeriesBranchKind, SwitchingDeviceKind, VoltagePhasor};

mod error;
pub use error::Error;

mod graph_traits;
pub use graph_traits::{Node, SeriesBranch, SwitchingDevice};

mod observed_bus;
pub use observed_bus::ObservedBus;

mod substation;
pub use substation::{PhasorPairMatrix, SubstationGraph};

mod transmission_line;
pub use transmission_line::{EquivalentSeriesBranch, TransmissionLineGraph};

mod tree;
pub use tree::{Tree, TreeNode, TreeNodeId};

mod vertex;
pub use vertex::{ClusterHandle, VertexAdjacencyList, VertexAdjacencyRow, VertexCluster};

#[cfg(test)]
mod test_utils;
