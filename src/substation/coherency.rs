// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Angle coherency between the nodes of a substation, tracked frame by frame
//! as a cheap signal for whether the substation needs to be re-resolved.

use ndarray::Array2;

use super::SubstationGraph;
use crate::{Node, SwitchingDevice};

/// Returns true if two voltage angles are close enough for their nodes to be
/// considered connected.
pub(crate) fn angles_are_coherent(a: f64, b: f64, threshold_in_degrees: f64) -> bool {
    (a - b).abs() < threshold_in_degrees
}

/// Pairwise angle coherency between the nodes of a substation that are
/// expected to carry a voltage phasor.
///
/// Rows and columns follow the order of [`node_ids`][Self::node_ids].  Only
/// the upper triangle is used.  The matrix of the previous frame is kept, so
/// that changes can be detected.
#[derive(Clone, Debug)]
pub struct PhasorPairMatrix {
    node_ids: Vec<u64>,
    past: Array2<bool>,
    present: Array2<bool>,
}

impl PhasorPairMatrix {
    pub(crate) fn new(node_ids: Vec<u64>) -> Self {
        let n = node_ids.len();
        Self {
            node_ids,
            past: Array2::from_elem((n, n), false),
            present: Array2::from_elem((n, n), false),
        }
    }

    /// Returns the ids of the nodes that are expected to carry a phasor.
    pub fn node_ids(&self) -> &[u64] {
        &self.node_ids
    }

    /// Returns every unordered pair of expected nodes.
    pub fn pairs(&self) -> impl Iterator<Item = (u64, u64)> + '_ {
        self.node_ids.iter().enumerate().flat_map(move |(i, a)| {
            self.node_ids[i + 1..].iter().map(move |b| (*a, *b))
        })
    }

    /// Returns whether the two nodes were coherent in the latest frame, or
    /// `None` if either is not an expected node.
    pub fn is_coherent(&self, a: u64, b: u64) -> Option<bool> {
        let i = self.node_ids.iter().position(|id| *id == a)?;
        let j = self.node_ids.iter().position(|id| *id == b)?;
        let (i, j) = if i <= j { (i, j) } else { (j, i) };
        Some(i != j && self.present[[i, j]])
    }

    /// Recomputes the coherency flags, keeping the previous ones.
    ///
    /// `angle_of` returns the usable angle of a node, and nodes without one
    /// are coherent with nothing.
    pub(crate) fn update(
        &mut self,
        angle_of: impl Fn(u64) -> Option<f64>,
        threshold_in_degrees: f64,
    ) {
        std::mem::swap(&mut self.past, &mut self.present);
        let angles: Vec<Option<f64>> = self.node_ids.iter().map(|id| angle_of(*id)).collect();

        self.present.fill(false);
        for i in 0..angles.len() {
            for j in i + 1..angles.len() {
                if let (Some(a), Some(b)) = (angles[i], angles[j]) {
                    self.present[[i, j]] = angles_are_coherent(a, b, threshold_in_degrees);
                }
            }
        }
    }

    /// Returns true if any pair changed its coherency since the previous
    /// frame.
    pub fn has_changed(&self) -> bool {
        self.past != self.present
    }
}

/// Frame-by-frame change detection.
impl<N, D> SubstationGraph<N, D>
where
    N: Node,
    D: SwitchingDevice,
{
    /// Recomputes the angle coherency of every pair of expected nodes from
    /// the current voltage phasors.
    pub fn update_connectivity_matrix(&mut self) {
        let threshold = self.config.angle_delta_threshold_in_degrees;
        let Self {
            graph,
            node_indices,
            phasor_pairs,
            ..
        } = self;
        phasor_pairs.update(
            |id| {
                node_indices
                    .get(&id)
                    .and_then(|i| graph[*i].voltage_phasor())
                    .and_then(|p| p.usable_angle())
            },
            threshold,
        );
    }

    /// Returns true if the coherency of any pair of expected nodes flipped
    /// between the previous and the latest call to
    /// [`update_connectivity_matrix`][Self::update_connectivity_matrix].
    pub fn compare_past_and_present_connectivity_matrices(&self) -> bool {
        self.phasor_pairs.has_changed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{SubstationBuilder, TestDevice};
    use crate::{Error, TopologyLevel};

    #[test]
    fn test_pairs() {
        let matrix = PhasorPairMatrix::new(vec![4, 7, 9]);
        let pairs: Vec<_> = matrix.pairs().collect();
        assert_eq!(pairs, vec![(4, 7), (4, 9), (7, 9)]);
        assert_eq!(matrix.is_coherent(7, 4), Some(false));
        assert_eq!(matrix.is_coherent(7, 5), None);
    }

    #[test]
    fn test_only_expected_nodes_are_paired() -> Result<(), Error> {
        let graph = SubstationBuilder::new()
            .measured_node(1, 0.0)
            .node(2)
            .measured_node(3, 1.0)
            .device(TestDevice::breaker(1, 2))
            .device(TestDevice::breaker(2, 3))
            .build(TopologyLevel::Three, 5.0)?;

        assert_eq!(graph.phasor_pairs().node_ids(), &[1, 3]);
        Ok(())
    }

    #[test]
    fn test_change_detection() -> Result<(), Error> {
        let mut graph = SubstationBuilder::new()
            .measured_node(1, 0.0)
            .measured_node(2, 1.0)
            .measured_node(3, 20.0)
            .device(TestDevice::breaker(1, 2))
            .device(TestDevice::breaker(2, 3))
            .build(TopologyLevel::Three, 5.0)?;

        graph.update_connectivity_matrix();
        assert!(graph.compare_past_and_present_connectivity_matrices());
        assert_eq!(graph.phasor_pairs().is_coherent(1, 2), Some(true));
        assert_eq!(graph.phasor_pairs().is_coherent(2, 3), Some(false));

        // Same angles, nothing flips.
        graph.update_connectivity_matrix();
        assert!(!graph.compare_past_and_present_connectivity_matrices());

        // Small drift within the threshold, nothing flips.
        graph.node_mut(2)?.set_angle(2.0);
        graph.update_connectivity_matrix();
        assert!(!graph.compare_past_and_present_connectivity_matrices());

        // Node 3 swings into coherency with node 2.
        graph.node_mut(3)?.set_angle(4.0);
        graph.update_connectivity_matrix();
        assert!(graph.compare_past_and_present_connectivity_matrices());
        assert_eq!(graph.phasor_pairs().is_coherent(3, 2), Some(true));

        // Dropping a measurement breaks its pairs.
        graph.node_mut(1)?.exclude_from_estimator();
        graph.update_connectivity_matrix();
        assert!(graph.compare_past_and_present_connectivity_matrices());
        assert_eq!(graph.phasor_pairs().is_coherent(1, 2), Some(false));

        Ok(())
    }
}
