// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! A graph representation of the nodes of a substation and the breakers and
//! switches between them, which can be resolved into observed buses.

mod coherency;
mod creation;
mod resolution;

pub use coherency::PhasorPairMatrix;

use crate::{Error, Node, SubstationGraphConfig, SwitchingDevice, VertexAdjacencyList};
use petgraph::graph::{NodeIndex, UnGraph};
use std::collections::HashMap;

/// `Node`s stored in an `UnGraph` instance can be addressed with `NodeIndex`es.
///
/// `NodeIndexMap` stores the corresponding `NodeIndex` for any `node_id`, so
/// that nodes in the `UnGraph` can be retrieved from their `node_id`s.
pub(crate) type NodeIndexMap = HashMap<u64, NodeIndex>;

/// A graph representation of the nodes of one substation and the switching
/// devices connecting them.
///
/// The static topology is fixed when the graph is created.  Live values
/// (device status and voltage phasors) are updated in place through
/// [`nodes_mut`][SubstationGraph::nodes_mut] and
/// [`devices_mut`][SubstationGraph::devices_mut] before each frame is
/// processed.
pub struct SubstationGraph<N, D>
where
    N: Node,
    D: SwitchingDevice,
{
    graph: UnGraph<N, D>,
    node_indices: NodeIndexMap,
    config: SubstationGraphConfig,
    adjacency_list: VertexAdjacencyList,
    phasor_pairs: PhasorPairMatrix,
    topology_error_detected: bool,
    resolved: bool,
}

/// Accessors.
impl<N, D> SubstationGraph<N, D>
where
    N: Node,
    D: SwitchingDevice,
{
    /// Returns the configuration of the substation.
    pub fn config(&self) -> &SubstationGraphConfig {
        &self.config
    }

    /// Returns the node with the given `node_id`, if it exists.
    pub fn node(&self, node_id: u64) -> Result<&N, Error> {
        self.node_indices
            .get(&node_id)
            .map(|i| &self.graph[*i])
            .ok_or_else(|| Error::node_not_found(format!("Node with id {} not found.", node_id)))
    }

    /// Returns a mutable reference to the node with the given `node_id`, for
    /// updating its measurements.
    pub fn node_mut(&mut self, node_id: u64) -> Result<&mut N, Error> {
        self.node_indices
            .get(&node_id)
            .map(|i| &mut self.graph[*i])
            .ok_or_else(|| Error::node_not_found(format!("Node with id {} not found.", node_id)))
    }

    /// Returns an iterator over the nodes of the substation.
    pub fn nodes(&self) -> impl Iterator<Item = &N> {
        self.graph.raw_nodes().iter().map(|n| &n.weight)
    }

    /// Returns a mutable iterator over the nodes of the substation.
    pub fn nodes_mut(&mut self) -> impl Iterator<Item = &mut N> {
        self.graph.node_weights_mut()
    }

    /// Returns an iterator over the switching devices of the substation.
    pub fn devices(&self) -> impl Iterator<Item = &D> {
        self.graph.raw_edges().iter().map(|e| &e.weight)
    }

    /// Returns a mutable iterator over the switching devices of the
    /// substation, for updating their status.
    pub fn devices_mut(&mut self) -> impl Iterator<Item = &mut D> {
        self.graph.edge_weights_mut()
    }

    /// Returns the ids of all nodes, in the order they were added.
    pub fn node_ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.nodes().map(|n| n.node_id())
    }

    /// Returns the working graph of the latest resolution.
    pub fn adjacency_list(&self) -> &VertexAdjacencyList {
        &self.adjacency_list
    }

    /// Returns the angle coherency matrix of the latest frame.
    pub fn phasor_pairs(&self) -> &PhasorPairMatrix {
        &self.phasor_pairs
    }

    /// Returns true if the latest resolution found breaker status that
    /// contradicts the resolved topology.  Only set at
    /// [`TopologyLevel::Four`][crate::TopologyLevel::Four].
    pub fn topology_error_detected(&self) -> bool {
        self.topology_error_detected
    }
}

impl<N, D> std::fmt::Display for SubstationGraph<N, D>
where
    N: Node,
    D: SwitchingDevice,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "{} nodes, {} devices, {}",
            self.graph.node_count(),
            self.graph.edge_count(),
            self.config.topology_level
        )?;
        write!(f, "{}", self.adjacency_list)
    }
}
