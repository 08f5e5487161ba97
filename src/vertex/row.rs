// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! A header cluster together with the clusters adjacent to it.

use super::{ClusterArena, ClusterHandle, VertexCluster};
use crate::Error;

/// One row of a [`VertexAdjacencyList`][super::VertexAdjacencyList].
///
/// The row owns its header cluster.  Adjacent clusters are handles to the
/// headers of other rows, so a merge elsewhere in the list is visible here
/// without any bookkeeping.
#[derive(Clone, Debug)]
pub struct VertexAdjacencyRow {
    header: ClusterHandle,
    adjacency: Vec<ClusterHandle>,
}

impl VertexAdjacencyRow {
    pub(crate) fn new(header: ClusterHandle, adjacency: Vec<ClusterHandle>) -> Self {
        Self { header, adjacency }
    }

    /// Returns the handle of the header cluster.
    pub fn header(&self) -> ClusterHandle {
        self.header
    }

    /// Returns the handles of the adjacent clusters.
    pub fn adjacency(&self) -> &[ClusterHandle] {
        &self.adjacency
    }

    /// Returns true if `cluster` is listed among the adjacent clusters.
    pub(crate) fn contains_adjacency(&self, cluster: &VertexCluster, arena: &ClusterArena) -> bool {
        self.adjacency.iter().any(|h| arena.get(*h) == cluster)
    }

    /// Drops the adjacent cluster that consists of exactly `vertex`.
    pub(crate) fn remove_vertex(&mut self, vertex: u64, arena: &ClusterArena) {
        let single = VertexCluster::new(vertex);
        self.adjacency.retain(|h| arena.get(*h) != &single);
    }

    /// Replaces every adjacency handle by the handle of the live cluster it
    /// refers to, dropping repeats and references to the row's own header.
    pub(crate) fn remove_duplicate_clusters(&mut self, arena: &ClusterArena) {
        self.header = arena.resolve(self.header);
        let mut unique: Vec<ClusterHandle> = Vec::with_capacity(self.adjacency.len());
        for handle in &self.adjacency {
            let handle = arena.resolve(*handle);
            if handle != self.header && !unique.contains(&handle) {
                unique.push(handle);
            }
        }
        self.adjacency = unique;
    }

    /// Merges `other` into this row.
    ///
    /// Each row's header is removed from the other row's adjacency, the two
    /// adjacency lists are united, and finally the header clusters are
    /// merged in the arena.
    pub(crate) fn merge_with(
        &mut self,
        mut other: VertexAdjacencyRow,
        arena: &mut ClusterArena,
    ) -> Result<(), Error> {
        let own = arena.resolve(self.header);
        let theirs = arena.resolve(other.header);

        self.adjacency.retain(|h| arena.resolve(*h) != theirs);
        other.adjacency.retain(|h| arena.resolve(*h) != own);

        for handle in other.adjacency {
            let resolved = arena.resolve(handle);
            if !self.adjacency.iter().any(|h| arena.resolve(*h) == resolved) {
                self.adjacency.push(resolved);
            }
        }

        arena.absorb(own, theirs)?;
        self.remove_duplicate_clusters(arena);

        Ok(())
    }
}
