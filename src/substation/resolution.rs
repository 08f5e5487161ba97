// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Methods for resolving a [`SubstationGraph`] into observed buses.

use petgraph::graph::UnGraph;
use petgraph::visit::EdgeRef;

use super::{coherency::angles_are_coherent, NodeIndexMap, SubstationGraph};
use crate::device_kind::DevicePredicates;
use crate::{
    Error, Node, ObservedBus, SwitchingDevice, TopologyLevel, VertexAdjacencyList, VertexCluster,
};

/// Read-only view of the static topology and live values of a substation,
/// used to decide whether two clusters are connected.
struct Topology<'a, N, D> {
    graph: &'a UnGraph<N, D>,
    node_indices: &'a NodeIndexMap,
}

impl<'a, N, D> Topology<'a, N, D>
where
    N: Node,
    D: SwitchingDevice,
{
    /// Returns the devices with one end in `a` and the other in `b`.
    fn devices_between(&self, a: &VertexCluster, b: &VertexCluster) -> Vec<&'a D> {
        let graph = self.graph;
        let mut devices = vec![];
        for vertex in a.vertices() {
            let Some(&index) = self.node_indices.get(vertex) else {
                continue;
            };
            for edge in graph.edges(index) {
                let other = if edge.source() == index {
                    edge.target()
                } else {
                    edge.source()
                };
                if b.contains(graph[other].node_id()) {
                    devices.push(&graph[edge.id()]);
                }
            }
        }
        devices
    }

    fn usable_angles(&self, cluster: &VertexCluster) -> Vec<f64> {
        cluster
            .vertices()
            .iter()
            .filter_map(|v| self.node_indices.get(v))
            .filter_map(|i| self.graph[*i].voltage_phasor())
            .filter_map(|p| p.usable_angle())
            .collect()
    }

    fn usable_angle(&self, node_id: u64) -> Option<f64> {
        self.node_indices
            .get(&node_id)
            .and_then(|i| self.graph[*i].voltage_phasor())
            .and_then(|p| p.usable_angle())
    }

    /// Returns true if any pair of usable angles, one from each cluster, is
    /// coherent.
    fn clusters_are_coherent(
        &self,
        a: &VertexCluster,
        b: &VertexCluster,
        threshold_in_degrees: f64,
    ) -> bool {
        let b_angles = self.usable_angles(b);
        if b_angles.is_empty() {
            return false;
        }
        self.usable_angles(a).into_iter().any(|x| {
            b_angles
                .iter()
                .any(|y| angles_are_coherent(x, *y, threshold_in_degrees))
        })
    }

    /// Merges clusters connected by a device for which `closed` holds.
    fn merge_closed(
        &self,
        list: &mut VertexAdjacencyList,
        closed: impl Fn(&D) -> bool,
    ) -> Result<usize, Error> {
        list.resolve(|a, b| self.devices_between(a, b).into_iter().any(&closed))
    }

    /// Merges clusters whose voltage angles are coherent.
    fn merge_coherent(
        &self,
        list: &mut VertexAdjacencyList,
        threshold_in_degrees: f64,
    ) -> Result<usize, Error> {
        list.resolve(|a, b| self.clusters_are_coherent(a, b, threshold_in_degrees))
    }

    /// Returns the breakers reporting closed whose ends are in different
    /// clusters of `list` and for which `applies` holds.
    fn split_closed_breakers(
        &self,
        list: &VertexAdjacencyList,
        applies: impl Fn(&D) -> bool,
    ) -> Vec<&'a D> {
        self.graph
            .raw_edges()
            .iter()
            .map(|e| &e.weight)
            .filter(|d| d.is_breaker() && d.is_closed_by_measurement_or_inference())
            .filter(|d| applies(*d))
            .filter(|d| list.row_containing(d.from_node()) != list.row_containing(d.to_node()))
            .collect()
    }
}

/// Topology resolution.
impl<N, D> SubstationGraph<N, D>
where
    N: Node,
    D: SwitchingDevice,
{
    /// Resolves the substation at its configured topology level.
    ///
    /// The adjacency list is reset first, so the result only depends on the
    /// current device status and phasors.
    pub fn resolve(&mut self) -> Result<(), Error> {
        let level = self.config.topology_level;
        let threshold = self.config.angle_delta_threshold_in_degrees;

        let Self {
            graph,
            node_indices,
            adjacency_list,
            topology_error_detected,
            ..
        } = self;
        let topology = Topology {
            graph,
            node_indices,
        };

        adjacency_list.reset();
        *topology_error_detected = false;

        let merges = match level {
            TopologyLevel::Zero => 0,
            TopologyLevel::One => {
                topology.merge_closed(adjacency_list, |d| d.is_closed_by_measurement())?
            }
            TopologyLevel::Two => topology.merge_closed(adjacency_list, |d| {
                d.is_closed_by_measurement_or_inference()
            })?,
            TopologyLevel::Three => topology.merge_coherent(adjacency_list, threshold)?,
            TopologyLevel::Four => {
                let coherent = topology.merge_coherent(adjacency_list, threshold)?;

                // A closed breaker between two measured nodes should leave them
                // coherent.  Where angles disagree, status and measurements
                // contradict each other.
                let mut conflicts = topology.split_closed_breakers(adjacency_list, |d| {
                    topology.usable_angle(d.from_node()).is_some()
                        && topology.usable_angle(d.to_node()).is_some()
                });

                let closed = topology.merge_closed(adjacency_list, |d| {
                    d.is_closed_by_measurement_or_inference()
                })?;
                conflicts.extend(topology.split_closed_breakers(adjacency_list, |_| true));

                for breaker in &conflicts {
                    tracing::warn!(
                        "Breaker ({}, {}) reports closed, which contradicts the resolved topology.",
                        breaker.from_node(),
                        breaker.to_node()
                    );
                }
                *topology_error_detected = !conflicts.is_empty();

                coherent + closed
            }
        };

        if cfg!(debug_assertions) {
            adjacency_list.check_partition(node_indices.keys().copied())?;
        }

        tracing::debug!(
            "Resolved {} nodes into {} buses at {} with {} merges.",
            node_indices.len(),
            adjacency_list.len(),
            level,
            merges
        );
        self.resolved = true;

        Ok(())
    }

    /// Returns one observed bus per cluster of the latest resolution.
    pub fn resolve_to_observed_buses(&self) -> Vec<ObservedBus> {
        self.adjacency_list.headers().map(ObservedBus::from).collect()
    }

    /// Processes one frame of measurements.
    ///
    /// The coherency matrix is always updated.  The substation is resolved
    /// again if `force` is set (for example because a breaker changed
    /// status), if it was never resolved, or if the coherency of any pair of
    /// nodes changed.  Returns true if it was resolved.
    pub fn process_frame(&mut self, force: bool) -> Result<bool, Error> {
        self.update_connectivity_matrix();
        if force || !self.resolved || self.compare_past_and_present_connectivity_matrices() {
            self.resolve()?;
            return Ok(true);
        }
        Ok(false)
    }
}
