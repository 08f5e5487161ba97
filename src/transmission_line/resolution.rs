// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Methods for resolving the adjacency lists of a [`TransmissionLineGraph`]
//! and building the tree its flow path is extracted from.

use petgraph::graph::UnGraph;
use petgraph::visit::EdgeRef;

use super::{LineElement, TransmissionLineGraph};
use crate::substation::NodeIndexMap;
use crate::tree::{Tree, TreeNodeId};
use crate::{Error, SeriesBranch, SwitchingDevice, VertexAdjacencyList, VertexCluster};

/// Read-only view of the elements of a line.
pub(super) struct LineTopology<'a, S, B> {
    pub(super) graph: &'a UnGraph<u64, LineElement>,
    pub(super) node_indices: &'a NodeIndexMap,
    pub(super) switches: &'a [S],
    pub(super) branches: &'a [B],
}

impl<'a, S, B> LineTopology<'a, S, B>
where
    S: SwitchingDevice,
    B: SeriesBranch,
{
    /// Returns the elements with one end in `a` and the other in `b`.
    pub(super) fn elements_between(
        &self,
        a: &VertexCluster,
        b: &VertexCluster,
    ) -> Vec<LineElement> {
        let mut elements = vec![];
        for vertex in a.vertices() {
            let Some(&index) = self.node_indices.get(vertex) else {
                continue;
            };
            for edge in self.graph.edges(index) {
                let other = if edge.source() == index {
                    edge.target()
                } else {
                    edge.source()
                };
                if b.contains(self.graph[other]) {
                    elements.push(*edge.weight());
                }
            }
        }
        elements
    }

    /// Returns the series branches with one end in `a` and the other in `b`.
    pub(super) fn branches_between(&self, a: &VertexCluster, b: &VertexCluster) -> Vec<&'a B> {
        let branches = self.branches;
        self.elements_between(a, b)
            .into_iter()
            .filter_map(|e| match e {
                LineElement::Series(i) => Some(&branches[i]),
                LineElement::Switch(_) => None,
            })
            .collect()
    }

    fn is_closed_switch(&self, element: LineElement) -> bool {
        matches!(element, LineElement::Switch(i) if self.switches[i].is_closed())
    }

    fn directly_connected(&self, a: &VertexCluster, b: &VertexCluster) -> bool {
        self.elements_between(a, b)
            .into_iter()
            .any(|e| self.is_closed_switch(e))
    }

    /// Series impedances connect regardless of energization, since a bypassed
    /// compensator still has a known impedance.
    fn series_impedance_connected(&self, a: &VertexCluster, b: &VertexCluster) -> bool {
        self.elements_between(a, b)
            .into_iter()
            .any(|e| matches!(e, LineElement::Series(_)) || self.is_closed_switch(e))
    }

    /// Appends every cluster adjacent to the cluster of `node` through a
    /// series branch, unless it is already in the tree, and recurses into the
    /// new children.
    fn append_children(
        &self,
        list: &VertexAdjacencyList,
        tree: &mut Tree<VertexCluster>,
        node: TreeNodeId,
    ) {
        let cluster = tree.node(node).value().clone();
        let Some(row) = list.row_with_header(&cluster) else {
            return;
        };
        for adjacent in list.adjacent_clusters(row) {
            if tree.contains(adjacent) || self.branches_between(&cluster, adjacent).is_empty() {
                continue;
            }
            let child = tree.add_child(node, adjacent.clone());
            self.append_children(list, tree, child);
        }
    }
}

/// Resolution.
impl<S, B> TransmissionLineGraph<S, B>
where
    S: SwitchingDevice,
    B: SeriesBranch,
{
    pub(super) fn topology(&self) -> LineTopology<'_, S, B> {
        LineTopology {
            graph: &self.graph,
            node_indices: &self.node_indices,
            switches: &self.switches,
            branches: &self.branches,
        }
    }

    /// Resolves both adjacency lists with the current status of the switches,
    /// and rebuilds the tree.
    pub fn resolve(&mut self) -> Result<(), Error> {
        let (from_node, to_node) = (self.from_node, self.to_node);
        let Self {
            graph,
            node_indices,
            switches,
            branches,
            directly_connected,
            series_impedance_connected,
            ..
        } = self;
        let topology = LineTopology {
            graph,
            node_indices,
            switches,
            branches,
        };

        directly_connected.reset();
        series_impedance_connected.reset();
        let direct = directly_connected.resolve(|a, b| topology.directly_connected(a, b))?;
        let series =
            series_impedance_connected.resolve(|a, b| topology.series_impedance_connected(a, b))?;

        if cfg!(debug_assertions) {
            directly_connected.check_partition(node_indices.keys().copied())?;
            series_impedance_connected.check_partition(node_indices.keys().copied())?;
        }

        let Some(root) = directly_connected.row_containing(from_node) else {
            return Err(Error::internal(format!(
                "Node {from_node} is not in any cluster."
            )));
        };
        let root = directly_connected.rows()[root].header();
        let mut tree = Tree::new(directly_connected.cluster(root).clone());
        let root_id = tree.root().id();
        topology.append_children(directly_connected, &mut tree, root_id);

        tracing::debug!(
            "Resolved line {} -> {}: {} direct merges, {} series merges, {} tree nodes.",
            from_node,
            to_node,
            direct,
            series,
            tree.len()
        );
        self.tree = tree;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{TestBranch, TestDevice};
    use crate::CompensatorStatus;

    type Line = TransmissionLineGraph<TestDevice, TestBranch>;

    fn headers(list: &VertexAdjacencyList) -> Vec<Vec<u64>> {
        list.headers().map(|h| h.vertices().to_vec()).collect()
    }

    #[test]
    fn test_two_lists() -> Result<(), Error> {
        // 1 =sw= 2 -seg- 3 -comp- 4 -sw- 5, the last switch open.
        let line = Line::try_new(
            1,
            5,
            [1, 2, 3, 4, 5],
            [
                TestDevice::switch(1, 2).closed(),
                TestDevice::switch(4, 5),
            ],
            [
                TestBranch::segment(2, 3, 0.01, 0.1),
                TestBranch::compensator(3, 4, -0.05, CompensatorStatus::Bypassed),
            ],
        )?;

        assert_eq!(
            headers(line.directly_connected()),
            vec![vec![1, 2], vec![3], vec![4], vec![5]]
        );
        assert_eq!(
            headers(line.series_impedance_connected()),
            vec![vec![1, 2, 3, 4], vec![5]]
        );
        Ok(())
    }

    #[test]
    fn test_tree_guards_against_cycles() -> Result<(), Error> {
        // A ring of segments 1 - 2 - 3 - 1, and a spur 2 - 4.
        let line = Line::try_new(
            1,
            3,
            [1, 2, 3, 4],
            Vec::<TestDevice>::new(),
            [
                TestBranch::segment(1, 2, 0.0, 0.1),
                TestBranch::segment(2, 3, 0.0, 0.1),
                TestBranch::segment(3, 1, 0.0, 0.1),
                TestBranch::segment(2, 4, 0.0, 0.1),
            ],
        )?;

        assert_eq!(line.tree().len(), 4);
        assert_eq!(
            line.tree().to_string(),
            "(1)\n    (2)\n        (3)\n        (4)\n"
        );
        Ok(())
    }

    #[test]
    fn test_tree_skips_open_switches() -> Result<(), Error> {
        let mut line = Line::try_new(
            1,
            3,
            [1, 2, 3],
            [TestDevice::switch(1, 2)],
            [TestBranch::segment(2, 3, 0.0, 0.1)],
        )?;
        assert_eq!(line.tree().len(), 1);
        assert_eq!(line.tree().root().value(), &VertexCluster::new(1));

        line.switches_mut()[0].set_closed(true);
        line.resolve()?;
        assert_eq!(line.tree().root().value(), &VertexCluster::from_vertices([1, 2]));
        assert_eq!(line.tree().len(), 2);
        Ok(())
    }
}
