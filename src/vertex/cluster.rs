// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! A set of node ids that represents one candidate electrical bus.

/// A set of node ids that are assumed to be electrically equivalent.
///
/// Two clusters are equal when they contain the same ids, regardless of
/// order or duplicates.
#[derive(Clone, Debug, Default)]
pub struct VertexCluster {
    vertices: Vec<u64>,
}

impl VertexCluster {
    /// Creates a cluster holding a single vertex.
    pub fn new(vertex: u64) -> Self {
        Self {
            vertices: vec![vertex],
        }
    }

    /// Creates a cluster from the given vertices.
    pub fn from_vertices(vertices: impl IntoIterator<Item = u64>) -> Self {
        Self {
            vertices: vertices.into_iter().collect(),
        }
    }

    /// Returns the vertices of the cluster, in insertion order.
    pub fn vertices(&self) -> &[u64] {
        &self.vertices
    }

    /// Returns the number of vertices, counting duplicates.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Returns true if the cluster holds no vertices.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Returns true if the cluster holds the given vertex.
    pub fn contains(&self, vertex: u64) -> bool {
        self.vertices.contains(&vertex)
    }

    /// Appends the vertices of `other` to this cluster.
    ///
    /// Duplicates are kept; call [`remove_duplicate_vertices`] afterwards.
    ///
    /// [`remove_duplicate_vertices`]: VertexCluster::remove_duplicate_vertices
    pub fn merge_with(&mut self, other: &VertexCluster) {
        self.vertices.extend_from_slice(&other.vertices);
    }

    /// Sorts the vertices in ascending order.
    pub fn sort(&mut self) {
        self.vertices.sort_unstable();
    }

    /// Removes repeated vertices and leaves the cluster sorted.
    pub fn remove_duplicate_vertices(&mut self) {
        self.vertices.sort_unstable();
        self.vertices.dedup();
    }

    fn sorted_unique(&self) -> Vec<u64> {
        let mut vertices = self.vertices.clone();
        vertices.sort_unstable();
        vertices.dedup();
        vertices
    }
}

impl PartialEq for VertexCluster {
    fn eq(&self, other: &Self) -> bool {
        self.sorted_unique() == other.sorted_unique()
    }
}

impl Eq for VertexCluster {}

impl From<u64> for VertexCluster {
    fn from(vertex: u64) -> Self {
        Self::new(vertex)
    }
}

impl FromIterator<u64> for VertexCluster {
    fn from_iter<T: IntoIterator<Item = u64>>(iter: T) -> Self {
        Self::from_vertices(iter)
    }
}

impl std::fmt::Display for VertexCluster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(")?;
        for (i, vertex) in self.vertices.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{vertex}")?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_equality() {
        assert_eq!(
            VertexCluster::from_vertices([3, 1, 2]),
            VertexCluster::from_vertices([1, 2, 3])
        );
        assert_eq!(
            VertexCluster::from_vertices([1, 1, 2]),
            VertexCluster::from_vertices([2, 1])
        );
        assert_ne!(
            VertexCluster::from_vertices([1, 2]),
            VertexCluster::from_vertices([1, 2, 3])
        );
        assert_eq!(VertexCluster::new(4), VertexCluster::from(4));
    }

    #[test]
    fn test_merge_keeps_duplicates_until_removed() {
        let mut cluster = VertexCluster::from_vertices([5, 2]);
        cluster.merge_with(&VertexCluster::from_vertices([2, 9]));
        assert_eq!(cluster.vertices(), &[5, 2, 2, 9]);
        assert_eq!(cluster.len(), 4);

        cluster.remove_duplicate_vertices();
        assert_eq!(cluster.vertices(), &[2, 5, 9]);
        assert!(cluster.contains(9));
        assert!(!cluster.contains(1));
    }

    #[test]
    fn test_display_and_round_trip() {
        let mut cluster: VertexCluster = [7, 3, 5].into_iter().collect();
        assert_eq!(cluster.to_string(), "(7, 3, 5)");
        cluster.sort();
        assert_eq!(cluster.to_string(), "(3, 5, 7)");

        let rebuilt = VertexCluster::from_vertices(cluster.vertices().iter().copied());
        assert_eq!(rebuilt, cluster);
    }
}
