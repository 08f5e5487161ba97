// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! The buses a substation resolves to, as handed to the state estimator.

use crate::VertexCluster;

/// A set of nodes that were resolved to be one electrical bus.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObservedBus {
    node_ids: Vec<u64>,
}

impl ObservedBus {
    /// Returns the ids of the nodes in the bus, in ascending order.
    pub fn node_ids(&self) -> &[u64] {
        &self.node_ids
    }

    /// Returns true if the bus holds the given node.
    pub fn contains(&self, node_id: u64) -> bool {
        self.node_ids.binary_search(&node_id).is_ok()
    }
}

impl From<&VertexCluster> for ObservedBus {
    fn from(cluster: &VertexCluster) -> Self {
        let mut node_ids = cluster.vertices().to_vec();
        node_ids.sort_unstable();
        node_ids.dedup();
        Self { node_ids }
    }
}

impl std::fmt::Display for ObservedBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Bus{:?}", self.node_ids)
    }
}
