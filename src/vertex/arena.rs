// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Storage for the clusters of a [`VertexAdjacencyList`][super::VertexAdjacencyList].
//!
//! Rows refer to clusters through [`ClusterHandle`]s.  When one cluster is
//! absorbed into another, its slot is turned into a forward to the
//! survivor, so every row still holding the old handle sees the merged
//! cluster without being touched.

use super::VertexCluster;
use crate::Error;

/// A shared reference to a cluster of a `VertexAdjacencyList`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClusterHandle(usize);

#[derive(Clone, Debug)]
enum Slot {
    Live(VertexCluster),
    Absorbed(ClusterHandle),
}

#[derive(Clone, Debug, Default)]
pub(crate) struct ClusterArena {
    slots: Vec<Slot>,
}

impl ClusterArena {
    /// Stores a cluster and returns its handle.
    pub(crate) fn insert(&mut self, cluster: VertexCluster) -> ClusterHandle {
        self.slots.push(Slot::Live(cluster));
        ClusterHandle(self.slots.len() - 1)
    }

    /// Follows forwards until reaching the handle of a live cluster.
    pub(crate) fn resolve(&self, handle: ClusterHandle) -> ClusterHandle {
        let mut current = handle;
        while let Slot::Absorbed(next) = &self.slots[current.0] {
            current = *next;
        }
        current
    }

    /// Returns the live cluster the handle refers to.
    pub(crate) fn get(&self, handle: ClusterHandle) -> &VertexCluster {
        let mut current = handle;
        loop {
            match &self.slots[current.0] {
                Slot::Live(cluster) => return cluster,
                Slot::Absorbed(next) => current = *next,
            }
        }
    }

    /// Moves the vertices of `absorbed` into `survivor` and forwards
    /// `absorbed` to it.
    pub(crate) fn absorb(
        &mut self,
        survivor: ClusterHandle,
        absorbed: ClusterHandle,
    ) -> Result<(), Error> {
        let survivor = self.resolve(survivor);
        let absorbed = self.resolve(absorbed);
        if survivor == absorbed {
            return Err(Error::internal(format!(
                "Can't merge cluster {} into itself.",
                self.get(survivor)
            )));
        }

        let Slot::Live(taken) =
            std::mem::replace(&mut self.slots[absorbed.0], Slot::Absorbed(survivor))
        else {
            return Err(Error::internal("Resolved cluster handle is not live."));
        };
        let Slot::Live(cluster) = &mut self.slots[survivor.0] else {
            return Err(Error::internal("Resolved cluster handle is not live."));
        };
        cluster.merge_with(&taken);
        cluster.remove_duplicate_vertices();

        Ok(())
    }

    /// Returns the number of live clusters.
    pub(crate) fn live_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| matches!(slot, Slot::Live(_)))
            .count()
    }
}
