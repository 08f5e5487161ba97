// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! The working graph of a resolution pass: an ordered collection of rows
//! whose headers partition the original vertex set.

use std::collections::{BTreeSet, HashMap};

use super::{ClusterArena, ClusterHandle, VertexAdjacencyRow, VertexCluster};
use crate::Error;

/// An ordered collection of [`VertexAdjacencyRow`]s.
///
/// Row order follows creation order and carries no meaning.  The headers of
/// all rows are pairwise disjoint, and together hold every vertex the list
/// was created with.
#[derive(Clone, Debug)]
pub struct VertexAdjacencyList {
    arena: ClusterArena,
    rows: Vec<VertexAdjacencyRow>,
    /// Initial rows, as header clusters and indices of adjacent rows, used
    /// to reset the list before each resolution.
    seed: Vec<(VertexCluster, Vec<usize>)>,
}

/// `VertexAdjacencyList` instantiation.
impl VertexAdjacencyList {
    /// Creates a list with one single-vertex row per vertex, where two rows
    /// are adjacent if an edge connects their vertices.
    ///
    /// Returns an error if a vertex is repeated, or if an edge refers to an
    /// unknown vertex.
    pub fn from_edges(
        vertices: impl IntoIterator<Item = u64>,
        edges: impl IntoIterator<Item = (u64, u64)>,
    ) -> Result<Self, Error> {
        let mut positions = HashMap::new();
        let mut seed = vec![];
        for vertex in vertices {
            if positions.insert(vertex, seed.len()).is_some() {
                return Err(Error::invalid_graph(format!(
                    "Duplicate vertex found: {vertex}"
                )));
            }
            seed.push((VertexCluster::new(vertex), vec![]));
        }

        for (from, to) in edges {
            let (Some(&f), Some(&t)) = (positions.get(&from), positions.get(&to)) else {
                let missing = if positions.contains_key(&from) { to } else { from };
                return Err(Error::node_not_found(format!(
                    "Edge:({from}, {to}) Can't find a vertex with ID {missing}"
                )));
            };
            if f == t {
                continue;
            }
            for (row, adjacent) in [(f, t), (t, f)] {
                let adjacency: &mut Vec<usize> = &mut seed[row].1;
                if !adjacency.contains(&adjacent) {
                    adjacency.push(adjacent);
                }
            }
        }

        Ok(Self::from_seed(seed))
    }

    /// Creates a list from header clusters and the clusters adjacent to
    /// each header.
    ///
    /// Every adjacent cluster must equal the header of some row, and the
    /// headers must not share vertices.
    pub fn from_clusters(
        rows: impl IntoIterator<Item = (VertexCluster, Vec<VertexCluster>)>,
    ) -> Result<Self, Error> {
        let rows: Vec<_> = rows.into_iter().collect();
        let mut seen = BTreeSet::new();
        for (header, _) in &rows {
            let mut header = header.clone();
            header.remove_duplicate_vertices();
            for vertex in header.vertices() {
                if !seen.insert(*vertex) {
                    return Err(Error::invalid_graph(format!(
                        "Vertex {vertex} appears in more than one header."
                    )));
                }
            }
        }

        let mut seed = Vec::with_capacity(rows.len());
        for (header, adjacent) in &rows {
            let mut indices = vec![];
            for cluster in adjacent {
                let index = rows
                    .iter()
                    .position(|(h, _)| h == cluster)
                    .ok_or_else(|| {
                        Error::invalid_graph(format!(
                            "Adjacent cluster {cluster} of {header} is not a header."
                        ))
                    })?;
                if index != seed.len() && !indices.contains(&index) {
                    indices.push(index);
                }
            }
            let mut header = header.clone();
            header.remove_duplicate_vertices();
            seed.push((header, indices));
        }

        Ok(Self::from_seed(seed))
    }

    fn from_seed(seed: Vec<(VertexCluster, Vec<usize>)>) -> Self {
        let mut list = Self {
            arena: ClusterArena::default(),
            rows: vec![],
            seed,
        };
        list.reset();
        list
    }

    /// Restores the rows the list was created with.
    pub fn reset(&mut self) {
        let mut arena = ClusterArena::default();
        let handles: Vec<ClusterHandle> = self
            .seed
            .iter()
            .map(|(header, _)| arena.insert(header.clone()))
            .collect();
        self.rows = self
            .seed
            .iter()
            .zip(&handles)
            .map(|((_, adjacent), header)| {
                VertexAdjacencyRow::new(*header, adjacent.iter().map(|i| handles[*i]).collect())
            })
            .collect();
        self.arena = arena;
    }
}

/// Lookups.
impl VertexAdjacencyList {
    /// Returns the rows of the list.
    pub fn rows(&self) -> &[VertexAdjacencyRow] {
        &self.rows
    }

    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the list has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the cluster a handle refers to.
    pub fn cluster(&self, handle: ClusterHandle) -> &VertexCluster {
        self.arena.get(handle)
    }

    /// Returns the header clusters of all rows.
    pub fn headers(&self) -> impl Iterator<Item = &VertexCluster> {
        self.rows.iter().map(|row| self.arena.get(row.header()))
    }

    /// Returns the clusters adjacent to the row at `index`, or nothing if
    /// there is no such row.
    pub fn adjacent_clusters(&self, index: usize) -> impl Iterator<Item = &VertexCluster> {
        self.rows
            .get(index)
            .into_iter()
            .flat_map(|row| row.adjacency())
            .map(|h| self.arena.get(*h))
    }

    /// Returns the index of the row whose header equals `header`.
    pub fn row_with_header(&self, header: &VertexCluster) -> Option<usize> {
        self.rows
            .iter()
            .position(|row| self.arena.get(row.header()) == header)
    }

    /// Returns the index of the row whose header contains `vertex`.
    pub fn row_containing(&self, vertex: u64) -> Option<usize> {
        self.rows
            .iter()
            .position(|row| self.arena.get(row.header()).contains(vertex))
    }

    /// Returns true if the row at `index` exists and lists `cluster` as
    /// adjacent.
    pub fn row_is_adjacent_to(&self, index: usize, cluster: &VertexCluster) -> bool {
        self.rows
            .get(index)
            .is_some_and(|row| row.contains_adjacency(cluster, &self.arena))
    }

    /// Returns the list as header clusters and their adjacent clusters.
    pub fn rows_as_clusters(&self) -> Vec<(VertexCluster, Vec<VertexCluster>)> {
        self.rows
            .iter()
            .map(|row| {
                (
                    self.arena.get(row.header()).clone(),
                    row.adjacency()
                        .iter()
                        .map(|h| self.arena.get(*h).clone())
                        .collect(),
                )
            })
            .collect()
    }
}

/// Merging.
impl VertexAdjacencyList {
    /// Merges the rows with headers `from` and `to`.
    ///
    /// The row of `from` survives, and every other row that referred to
    /// either cluster now refers to the merged one.
    pub fn connection_established(
        &mut self,
        from: &VertexCluster,
        to: &VertexCluster,
    ) -> Result<(), Error> {
        let Some(from_index) = self.row_with_header(from) else {
            return Err(Error::invalid_graph(format!("No row with header {from}.")));
        };
        let Some(to_index) = self.row_with_header(to) else {
            return Err(Error::invalid_graph(format!("No row with header {to}.")));
        };
        self.merge_rows(from_index, to_index)
    }

    fn merge_rows(&mut self, keep: usize, absorb: usize) -> Result<(), Error> {
        if keep == absorb {
            return Err(Error::internal(format!(
                "Can't merge row {} with itself.",
                self.arena.get(self.rows[keep].header())
            )));
        }

        let absorbed = self.rows.remove(absorb);
        let keep = if absorb < keep { keep - 1 } else { keep };
        self.rows[keep].merge_with(absorbed, &mut self.arena)?;

        for row in &mut self.rows {
            row.remove_duplicate_clusters(&self.arena);
        }

        tracing::trace!(
            "Merged into {}, {} rows left.",
            self.arena.get(self.rows[keep].header()),
            self.rows.len()
        );

        Ok(())
    }

    /// Finds the first pair of adjacent clusters that satisfies `connected`,
    /// scanning rows from the first one.
    fn find_connection(
        &self,
        connected: &mut impl FnMut(&VertexCluster, &VertexCluster) -> bool,
    ) -> Result<Option<(usize, usize)>, Error> {
        for (index, row) in self.rows.iter().enumerate() {
            let header = self.arena.get(row.header());
            for handle in row.adjacency() {
                let adjacent = self.arena.get(*handle);
                if connected(header, adjacent) {
                    let Some(other) = self
                        .rows
                        .iter()
                        .position(|r| self.arena.resolve(r.header()) == self.arena.resolve(*handle))
                    else {
                        return Err(Error::internal(format!(
                            "Adjacent cluster {adjacent} of row {header} has no row."
                        )));
                    };
                    return Ok(Some((index, other)));
                }
            }
        }
        Ok(None)
    }

    /// Merges adjacent clusters that satisfy `connected` until no pair does,
    /// and returns the number of merges.
    ///
    /// The scan restarts from the first row after every merge.  Every merge
    /// removes one row, so a list with `n` rows can see at most `n - 1`
    /// merges; exceeding that is reported as an internal error.
    pub fn resolve(
        &mut self,
        mut connected: impl FnMut(&VertexCluster, &VertexCluster) -> bool,
    ) -> Result<usize, Error> {
        let max_merges = self.rows.len().saturating_sub(1);
        let mut merges = 0;

        while let Some((keep, absorb)) = self.find_connection(&mut connected)? {
            if merges == max_merges {
                return Err(Error::internal(format!(
                    "Resolution did not converge after {merges} merges."
                )));
            }
            let rows_before = self.rows.len();
            self.merge_rows(keep, absorb)?;
            if self.rows.len() + 1 != rows_before || self.arena.live_count() != self.rows.len() {
                return Err(Error::internal(
                    "Merge did not reduce the number of clusters by one.",
                ));
            }
            merges += 1;
        }

        Ok(merges)
    }
}

/// Invariant checks.
impl VertexAdjacencyList {
    /// Checks that the headers are pairwise disjoint, that they hold exactly
    /// the given vertices, and that no row lists itself as adjacent.
    pub fn check_partition(&self, vertices: impl IntoIterator<Item = u64>) -> Result<(), Error> {
        let expected: BTreeSet<u64> = vertices.into_iter().collect();
        let mut found = BTreeSet::new();

        for row in &self.rows {
            let header = self.arena.get(row.header());
            for vertex in header.vertices() {
                if !found.insert(*vertex) {
                    return Err(Error::internal(format!(
                        "Vertex {vertex} appears in more than one cluster."
                    )));
                }
            }
            if row
                .adjacency()
                .iter()
                .any(|h| self.arena.resolve(*h) == self.arena.resolve(row.header()))
            {
                return Err(Error::internal(format!(
                    "Cluster {header} is listed as adjacent to itself."
                )));
            }
        }

        if found != expected {
            let missing: Vec<_> = expected.difference(&found).collect();
            let unknown: Vec<_> = found.difference(&expected).collect();
            return Err(Error::internal(format!(
                "Clusters don't partition the vertex set. Missing: {missing:?}, unknown: {unknown:?}"
            )));
        }

        Ok(())
    }
}

impl PartialEq for VertexAdjacencyList {
    fn eq(&self, other: &Self) -> bool {
        self.rows_as_clusters() == other.rows_as_clusters()
    }
}

impl std::fmt::Display for VertexAdjacencyList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rows = self.rows_as_clusters();
        let headers: Vec<String> = rows.iter().map(|(h, _)| h.to_string()).collect();
        let width = headers.iter().map(|h| h.len()).max().unwrap_or(0);

        for (header, (_, adjacent)) in headers.iter().zip(&rows) {
            let adjacent: Vec<String> = adjacent.iter().map(|c| c.to_string()).collect();
            writeln!(f, "{header:<width$} | {}", adjacent.join(" "))?;
        }
        Ok(())
    }
}
