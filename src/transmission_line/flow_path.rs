// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Methods for extracting the single flow path of a [`TransmissionLineGraph`]
//! and reducing it to one series impedance.

use num_complex::Complex64;

use super::TransmissionLineGraph;
use crate::device_kind::BranchPredicates;
use crate::{SeriesBranch, SwitchingDevice};

/// The series impedance that replaces a transmission line in the bus/branch
/// model.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EquivalentSeriesBranch {
    /// The node at the sending end of the line.
    pub from_node: u64,
    /// The node at the receiving end of the line.
    pub to_node: u64,
    /// The sum of the impedances along the flow path.
    pub impedance: Complex64,
}

/// Flow path extraction.
impl<S, B> TransmissionLineGraph<S, B>
where
    S: SwitchingDevice,
    B: SeriesBranch,
{
    /// Returns true if the two ends of the line are connected through closed
    /// switches and series impedances.
    pub fn has_at_least_one_flow_path(&self) -> bool {
        self.series_impedance_connected
            .headers()
            .any(|h| h.contains(self.from_node) && h.contains(self.to_node))
    }

    /// Returns the series branches along the path from the from-node to the
    /// to-node, in that order, or `None` if the ends are not connected.
    ///
    /// The path is assumed to be radial.  Where parallel branches connect the
    /// same pair of clusters, only the first one is used.
    pub fn single_flow_path_branches(&self) -> Option<Vec<&B>> {
        if !self.has_at_least_one_flow_path() {
            return None;
        }

        if !self.is_radial() {
            tracing::warn!(
                "Line {} -> {} is not radial, the flow path follows only one of its routes.",
                self.from_node,
                self.to_node
            );
        }

        let to_node = self.tree.find(|c| c.contains(self.to_node))?;
        let topology = self.topology();
        let hops = to_node.path_to_root();

        let mut branches = Vec::with_capacity(hops.len().saturating_sub(1));
        for hop in hops.windows(2) {
            let (child, parent) = (hop[0].value(), hop[1].value());
            let parallel = topology.branches_between(parent, child);
            if parallel.len() > 1 {
                tracing::warn!(
                    "Line {} -> {}: {} parallel branches between {} and {}, using the first.",
                    self.from_node,
                    self.to_node,
                    parallel.len(),
                    parent,
                    child
                );
            }
            branches.push(*parallel.first()?);
        }
        branches.reverse();

        Some(branches)
    }

    /// Returns true if the only series connections between the clusters of
    /// the tree are its own edges.
    fn is_radial(&self) -> bool {
        let topology = self.topology();
        let list = &self.directly_connected;

        let mut connections = 0;
        for (index, cluster) in list.headers().enumerate() {
            if !self.tree.contains(cluster) {
                continue;
            }
            connections += list
                .adjacent_clusters(index)
                .filter(|adjacent| !topology.branches_between(cluster, adjacent).is_empty())
                .count();
        }

        // Each connection is counted from both ends.
        connections / 2 < self.tree.len()
    }

    /// Reduces the flow path to a single series branch, whose impedance is
    /// the sum of the branches along the path.  Bypassed series compensators
    /// don't contribute.
    ///
    /// Returns `None` if the ends of the line are not connected.
    pub fn resolve_to_single_series_branch(&self) -> Option<EquivalentSeriesBranch> {
        let impedance = self
            .single_flow_path_branches()?
            .into_iter()
            .filter(|b| !b.is_bypassed_compensator())
            .map(|b| b.impedance())
            .sum();

        Some(EquivalentSeriesBranch {
            from_node: self.from_node,
            to_node: self.to_node,
            impedance,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{TestBranch, TestDevice};
    use crate::{CompensatorStatus, Error};

    type Line = TransmissionLineGraph<TestDevice, TestBranch>;

    #[test]
    fn test_scenario_d_switch_then_segment() -> Result<(), Error> {
        // A =sw= B -seg- D
        let (a, b, d) = (1, 2, 4);
        let segment = TestBranch::segment(b, d, 0.02, 0.3);
        let line = Line::try_new(
            a,
            d,
            [a, b, d],
            [TestDevice::switch(a, b).closed()],
            [segment.clone()],
        )?;

        assert!(line.has_at_least_one_flow_path());
        assert_eq!(line.single_flow_path_branches(), Some(vec![&segment]));
        assert_eq!(
            line.resolve_to_single_series_branch(),
            Some(EquivalentSeriesBranch {
                from_node: a,
                to_node: d,
                impedance: Complex64::new(0.02, 0.3),
            })
        );
        Ok(())
    }

    fn compensated_line() -> Result<Line, Error> {
        // 1 -seg- 2 -comp- 3 -seg- 4
        Line::try_new(
            1,
            4,
            [1, 2, 3, 4],
            Vec::<TestDevice>::new(),
            [
                TestBranch::segment(3, 4, 0.01, 0.2),
                TestBranch::compensator(2, 3, -0.15, CompensatorStatus::Energized),
                TestBranch::segment(1, 2, 0.01, 0.2),
            ],
        )
    }

    #[test]
    fn test_path_order_and_compensators() -> Result<(), Error> {
        let mut line = compensated_line()?;

        let Some(path) = line.single_flow_path_branches() else {
            panic!("no flow path");
        };
        let ends: Vec<_> = path.iter().map(|b| (b.from_node(), b.to_node())).collect();
        assert_eq!(ends, vec![(1, 2), (2, 3), (3, 4)]);

        let Some(energized) = line.resolve_to_single_series_branch() else {
            panic!("no flow path");
        };
        assert!((energized.impedance - Complex64::new(0.02, 0.25)).norm() < 1e-12);

        // A bypassed compensator still connects the line, but adds nothing.
        line.branches_mut()[1].set_status(CompensatorStatus::Bypassed);
        line.resolve()?;
        assert!(line.has_at_least_one_flow_path());
        let Some(bypassed) = line.resolve_to_single_series_branch() else {
            panic!("no flow path");
        };
        assert!((bypassed.impedance - Complex64::new(0.02, 0.4)).norm() < 1e-12);

        Ok(())
    }

    #[test]
    fn test_ring_is_not_radial() -> Result<(), Error> {
        assert!(compensated_line()?.is_radial());

        // 1 - 2 - 3 - 1, with parallel segments between 3 and 4.
        let ring = Line::try_new(
            1,
            4,
            [1, 2, 3, 4],
            Vec::<TestDevice>::new(),
            [
                TestBranch::segment(1, 2, 0.0, 0.1),
                TestBranch::segment(2, 3, 0.0, 0.1),
                TestBranch::segment(3, 1, 0.0, 0.1),
                TestBranch::segment(3, 4, 0.0, 0.2),
                TestBranch::segment(3, 4, 0.0, 0.3),
            ],
        )?;
        assert!(!ring.is_radial());
        assert!(ring.has_at_least_one_flow_path());
        let Some(path) = ring.single_flow_path_branches() else {
            panic!("no flow path");
        };
        let ends: Vec<_> = path.iter().map(|b| (b.from_node(), b.to_node())).collect();
        assert_eq!(ends, vec![(1, 2), (2, 3), (3, 4)]);

        // Parallel branches alone keep a line radial.
        let parallel = Line::try_new(
            1,
            2,
            [1, 2],
            Vec::<TestDevice>::new(),
            [
                TestBranch::segment(1, 2, 0.0, 0.1),
                TestBranch::segment(1, 2, 0.0, 0.2),
            ],
        )?;
        assert!(parallel.is_radial());
        Ok(())
    }

    #[test]
    fn test_open_switch_breaks_the_path() -> Result<(), Error> {
        // 1 -seg- 2 =sw= 3 -seg- 4
        let mut line = Line::try_new(
            1,
            4,
            [1, 2, 3, 4],
            [TestDevice::switch(2, 3)],
            [
                TestBranch::segment(1, 2, 0.0, 0.1),
                TestBranch::segment(3, 4, 0.0, 0.1),
            ],
        )?;

        assert!(!line.has_at_least_one_flow_path());
        assert_eq!(line.single_flow_path_branches(), None);
        assert_eq!(line.resolve_to_single_series_branch(), None);

        line.switches_mut()[0].set_closed(true);
        line.resolve()?;
        assert!(line.has_at_least_one_flow_path());
        let Some(equivalent) = line.resolve_to_single_series_branch() else {
            panic!("no flow path");
        };
        assert_eq!(equivalent.impedance, Complex64::new(0.0, 0.2));
        Ok(())
    }

    #[test]
    fn test_ends_on_the_same_bus() -> Result<(), Error> {
        let line = Line::try_new(
            1,
            2,
            [1, 2],
            [TestDevice::switch(1, 2).closed()],
            Vec::<TestBranch>::new(),
        )?;

        assert!(line.has_at_least_one_flow_path());
        assert_eq!(line.single_flow_path_branches(), Some(vec![]));
        assert_eq!(
            line.resolve_to_single_series_branch().map(|b| b.impedance),
            Some(Complex64::new(0.0, 0.0))
        );
        Ok(())
    }

    #[test]
    fn test_display() -> Result<(), Error> {
        let line = Line::try_new(
            1,
            3,
            [1, 2, 3],
            [TestDevice::switch(1, 2).closed()],
            [TestBranch::segment(2, 3, 0.0, 0.1)],
        )?;
        assert_eq!(
            line.to_string(),
            concat!(
                "Line 1 -> 3\n",
                "Directly connected:\n",
                "(1, 2) | (3)\n",
                "(3)    | (1, 2)\n",
                "Series impedance connected:\n",
                "(1, 2, 3) | \n",
                "Tree:\n",
                "(1, 2)\n",
                "    (3)\n",
            )
        );
        Ok(())
    }
}
