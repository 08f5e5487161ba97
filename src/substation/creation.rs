// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Methods for creating [`SubstationGraph`] instances from given nodes and
//! switching devices.

use petgraph::graph::UnGraph;

use super::{NodeIndexMap, PhasorPairMatrix, SubstationGraph};
use crate::{Error, Node, SubstationGraphConfig, SwitchingDevice, VertexAdjacencyList};

/// `SubstationGraph` instantiation.
impl<N, D> SubstationGraph<N, D>
where
    N: Node,
    D: SwitchingDevice,
{
    /// Creates a new [`SubstationGraph`] from the given nodes and switching
    /// devices.
    ///
    /// Returns an error if the configuration is invalid, if a node id is
    /// repeated, or if a device refers to a node that is not part of the
    /// substation.
    pub fn try_new<NodeIterator: IntoIterator<Item = N>, DeviceIterator: IntoIterator<Item = D>>(
        nodes: NodeIterator,
        devices: DeviceIterator,
        config: SubstationGraphConfig,
    ) -> Result<Self, Error> {
        config.validate()?;

        let (mut graph, indices) = Self::create_graph(nodes)?;
        Self::add_devices(&mut graph, &indices, devices)?;

        let node_ids: Vec<u64> = graph.raw_nodes().iter().map(|n| n.weight.node_id()).collect();
        let edges: Vec<(u64, u64)> = graph
            .raw_edges()
            .iter()
            .map(|e| (e.weight.from_node(), e.weight.to_node()))
            .collect();
        let adjacency_list = VertexAdjacencyList::from_edges(node_ids, edges)?;

        let expected = graph
            .raw_nodes()
            .iter()
            .filter(|n| n.weight.voltage_phasor().is_some())
            .map(|n| n.weight.node_id())
            .collect();

        Ok(Self {
            graph,
            node_indices: indices,
            config,
            adjacency_list,
            phasor_pairs: PhasorPairMatrix::new(expected),
            topology_error_detected: false,
            resolved: false,
        })
    }

    fn create_graph(
        nodes: impl IntoIterator<Item = N>,
    ) -> Result<(UnGraph<N, D>, NodeIndexMap), Error> {
        let mut graph = UnGraph::default();
        let mut indices = NodeIndexMap::new();

        for node in nodes {
            let nid = node.node_id();

            if indices.contains_key(&nid) {
                return Err(Error::invalid_graph(format!(
                    "Duplicate node ID found: {nid}"
                )));
            }

            let idx = graph.add_node(node);
            indices.insert(nid, idx);
        }

        if graph.node_count() == 0 {
            return Err(Error::invalid_graph("Substation has no nodes."));
        }

        Ok((graph, indices))
    }

    fn add_devices(
        graph: &mut UnGraph<N, D>,
        indices: &NodeIndexMap,
        devices: impl IntoIterator<Item = D>,
    ) -> Result<(), Error> {
        for device in devices {
            let fid = device.from_node();
            let tid = device.to_node();

            if fid == tid {
                return Err(Error::invalid_connection(format!(
                    "{}:({fid}, {tid}) Can't connect a node to itself.",
                    device.kind()
                )));
            }
            for nid in [fid, tid] {
                if !indices.contains_key(&nid) {
                    return Err(Error::invalid_connection(format!(
                        "{}:({fid}, {tid}) Can't find a node with ID {nid}",
                        device.kind()
                    )));
                }
            }

            graph.add_edge(indices[&fid], indices[&tid], device);
        }

        Ok(())
    }
}
