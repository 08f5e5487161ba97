// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! A graph representation of the switches, line segments and series
//! compensators of a transmission line, which can be reduced to a single
//! equivalent series branch.

mod creation;
mod flow_path;
mod resolution;

pub use flow_path::EquivalentSeriesBranch;

use crate::substation::NodeIndexMap;
use crate::tree::Tree;
use crate::{SeriesBranch, SwitchingDevice, VertexAdjacencyList, VertexCluster};
use petgraph::graph::UnGraph;

/// An edge of the line graph, pointing into the switch or branch storage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum LineElement {
    Switch(usize),
    Series(usize),
}

/// A graph representation of one transmission line.
///
/// Two adjacency lists are kept over the nodes of the line: one where only
/// closed switches connect nodes, and one where series-impedance branches
/// connect them too.  The first is used to build a tree rooted at the
/// line's from-node, along which the single flow path is extracted.
pub struct TransmissionLineGraph<S, B>
where
    S: SwitchingDevice,
    B: SeriesBranch,
{
    graph: UnGraph<u64, LineElement>,
    node_indices: NodeIndexMap,
    switches: Vec<S>,
    branches: Vec<B>,
    from_node: u64,
    to_node: u64,
    directly_connected: VertexAdjacencyList,
    series_impedance_connected: VertexAdjacencyList,
    tree: Tree<VertexCluster>,
}

/// Accessors.
impl<S, B> TransmissionLineGraph<S, B>
where
    S: SwitchingDevice,
    B: SeriesBranch,
{
    /// Returns the id of the node at the sending end of the line.
    pub fn from_node(&self) -> u64 {
        self.from_node
    }

    /// Returns the id of the node at the receiving end of the line.
    pub fn to_node(&self) -> u64 {
        self.to_node
    }

    /// Returns the switches of the line.
    pub fn switches(&self) -> &[S] {
        &self.switches
    }

    /// Returns the switches of the line, for updating their status.
    pub fn switches_mut(&mut self) -> &mut [S] {
        &mut self.switches
    }

    /// Returns the line segments and series compensators of the line.
    pub fn branches(&self) -> &[B] {
        &self.branches
    }

    /// Returns the line segments and series compensators of the line, for
    /// updating the status of compensators.
    pub fn branches_mut(&mut self) -> &mut [B] {
        &mut self.branches
    }

    /// Returns the clusters of nodes connected by closed switches.
    pub fn directly_connected(&self) -> &VertexAdjacencyList {
        &self.directly_connected
    }

    /// Returns the clusters of nodes connected by closed switches or series
    /// impedances.
    pub fn series_impedance_connected(&self) -> &VertexAdjacencyList {
        &self.series_impedance_connected
    }

    /// Returns the tree of directly connected clusters, rooted at the
    /// cluster of the from-node.
    pub fn tree(&self) -> &Tree<VertexCluster> {
        &self.tree
    }
}

impl<S, B> std::fmt::Display for TransmissionLineGraph<S, B>
where
    S: SwitchingDevice,
    B: SeriesBranch,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Line {} -> {}", self.from_node, self.to_node)?;
        writeln!(f, "Directly connected:")?;
        write!(f, "{}", self.directly_connected)?;
        writeln!(f, "Series impedance connected:")?;
        write!(f, "{}", self.series_impedance_connected)?;
        writeln!(f, "Tree:")?;
        write!(f, "{}", self.tree)
    }
}
