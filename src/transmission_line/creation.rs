// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Methods for creating [`TransmissionLineGraph`] instances.

use petgraph::graph::UnGraph;

use super::{LineElement, TransmissionLineGraph};
use crate::substation::NodeIndexMap;
use crate::tree::Tree;
use crate::{Error, SeriesBranch, SwitchingDevice, VertexAdjacencyList, VertexCluster};

/// `TransmissionLineGraph` instantiation.
impl<S, B> TransmissionLineGraph<S, B>
where
    S: SwitchingDevice,
    B: SeriesBranch,
{
    /// Creates a new [`TransmissionLineGraph`] between `from_node` and
    /// `to_node`, and resolves it with the current status of its switches
    /// and compensators.
    ///
    /// Returns an error if a node id is repeated, if the end nodes are not
    /// among `node_ids`, or if a switch or branch refers to an unknown node.
    pub fn try_new(
        from_node: u64,
        to_node: u64,
        node_ids: impl IntoIterator<Item = u64>,
        switches: impl IntoIterator<Item = S>,
        branches: impl IntoIterator<Item = B>,
    ) -> Result<Self, Error> {
        let (mut graph, indices) = Self::create_graph(node_ids)?;

        if from_node == to_node {
            return Err(Error::invalid_graph(format!(
                "Line can't start and end at node {from_node}."
            )));
        }
        for nid in [from_node, to_node] {
            if !indices.contains_key(&nid) {
                return Err(Error::node_not_found(format!(
                    "End node {nid} is not part of the line."
                )));
            }
        }

        let switches: Vec<S> = switches.into_iter().collect();
        let branches: Vec<B> = branches.into_iter().collect();

        for (i, switch) in switches.iter().enumerate() {
            let (fid, tid) = (switch.from_node(), switch.to_node());
            Self::add_element(&mut graph, &indices, fid, tid, LineElement::Switch(i))?;
        }
        for (i, branch) in branches.iter().enumerate() {
            let (fid, tid) = (branch.from_node(), branch.to_node());
            Self::add_element(&mut graph, &indices, fid, tid, LineElement::Series(i))?;
        }

        let vertices: Vec<u64> = graph.raw_nodes().iter().map(|n| n.weight).collect();
        let edges: Vec<(u64, u64)> = graph
            .raw_edges()
            .iter()
            .map(|e| (graph[e.source()], graph[e.target()]))
            .collect();
        let directly_connected = VertexAdjacencyList::from_edges(vertices.clone(), edges.clone())?;
        let series_impedance_connected = VertexAdjacencyList::from_edges(vertices, edges)?;

        let mut line = Self {
            graph,
            node_indices: indices,
            switches,
            branches,
            from_node,
            to_node,
            directly_connected,
            series_impedance_connected,
            tree: Tree::new(VertexCluster::new(from_node)),
        };
        line.resolve()?;

        Ok(line)
    }

    fn create_graph(
        node_ids: impl IntoIterator<Item = u64>,
    ) -> Result<(UnGraph<u64, LineElement>, NodeIndexMap), Error> {
        let mut graph = UnGraph::default();
        let mut indices = NodeIndexMap::new();

        for nid in node_ids {
            if indices.contains_key(&nid) {
                return Err(Error::invalid_graph(format!(
                    "Duplicate node ID found: {nid}"
                )));
            }
            indices.insert(nid, graph.add_node(nid));
        }

        Ok((graph, indices))
    }

    fn add_element(
        graph: &mut UnGraph<u64, LineElement>,
        indices: &NodeIndexMap,
        fid: u64,
        tid: u64,
        element: LineElement,
    ) -> Result<(), Error> {
        let name = match element {
            LineElement::Switch(_) => "Switch",
            LineElement::Series(_) => "SeriesBranch",
        };

        if fid == tid {
            return Err(Error::invalid_connection(format!(
                "{name}:({fid}, {tid}) Can't connect a node to itself."
            )));
        }
        for nid in [fid, tid] {
            if !indices.contains_key(&nid) {
                return Err(Error::invalid_connection(format!(
                    "{name}:({fid}, {tid}) Can't find a node with ID {nid}"
                )));
            }
        }

        graph.add_edge(indices[&fid], indices[&tid], element);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{TestBranch, TestDevice};

    type Line = TransmissionLineGraph<TestDevice, TestBranch>;

    fn switches() -> Vec<TestDevice> {
        vec![TestDevice::switch(1, 2).closed()]
    }

    fn branches() -> Vec<TestBranch> {
        vec![TestBranch::segment(2, 3, 0.01, 0.1)]
    }

    #[test]
    fn test_node_validation() {
        assert!(Line::try_new(1, 3, [1, 2, 3], switches(), branches()).is_ok());

        assert!(Line::try_new(1, 3, [1, 2, 3, 2], switches(), branches())
            .is_err_and(|e| e == Error::invalid_graph("Duplicate node ID found: 2")));

        assert!(Line::try_new(1, 4, [1, 2, 3], switches(), branches())
            .is_err_and(|e| e == Error::node_not_found("End node 4 is not part of the line.")));

        assert!(Line::try_new(1, 1, [1, 2, 3], switches(), branches())
            .is_err_and(|e| e == Error::invalid_graph("Line can't start and end at node 1.")));
    }

    #[test]
    fn test_element_validation() {
        let mut bad_switches = switches();
        bad_switches.push(TestDevice::switch(3, 3));
        assert!(Line::try_new(1, 3, [1, 2, 3], bad_switches, branches())
            .is_err_and(|e| e
                == Error::invalid_connection("Switch:(3, 3) Can't connect a node to itself.")));

        let mut bad_branches = branches();
        bad_branches.push(TestBranch::segment(3, 7, 0.0, 0.1));
        assert!(Line::try_new(1, 3, [1, 2, 3], switches(), bad_branches)
            .is_err_and(|e| e
                == Error::invalid_connection(
                    "SeriesBranch:(3, 7) Can't find a node with ID 7"
                )));
    }
}
