// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! This module contains the configuration options for the `SubstationGraph`.

use crate::Error;

/// How aggressively a substation's nodes are merged into observed buses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum TopologyLevel {
    /// No merging, every node is its own bus.
    #[default]
    Zero,
    /// Merge across measured-closed breakers and closed switches.
    One,
    /// Like [`TopologyLevel::One`], but inferred-closed breakers count too.
    Two,
    /// Merge nodes whose measured voltage angles are coherent.
    Three,
    /// Angle coherency followed by breaker status, with a consistency check
    /// between the two.
    Four,
}

impl TryFrom<u8> for TopologyLevel {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Zero),
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            3 => Ok(Self::Three),
            4 => Ok(Self::Four),
            other => Err(Error::invalid_config(format!(
                "Unknown topology level: {other}"
            ))),
        }
    }
}

impl From<TopologyLevel> for u8 {
    fn from(level: TopologyLevel) -> Self {
        match level {
            TopologyLevel::Zero => 0,
            TopologyLevel::One => 1,
            TopologyLevel::Two => 2,
            TopologyLevel::Three => 3,
            TopologyLevel::Four => 4,
        }
    }
}

impl std::fmt::Display for TopologyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Level{}", u8::from(*self))
    }
}

/// Configuration options for the `SubstationGraph`.
#[derive(Clone, Default, Debug)]
pub struct SubstationGraphConfig {
    /// The topology estimation level used when resolving the substation.
    pub topology_level: TopologyLevel,

    /// Two nodes are considered angle-coherent when the absolute difference
    /// between their measured voltage angles is below this value.
    pub angle_delta_threshold_in_degrees: f64,
}

impl SubstationGraphConfig {
    pub(crate) fn validate(&self) -> Result<(), Error> {
        let threshold = self.angle_delta_threshold_in_degrees;
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(Error::invalid_config(format!(
                "Angle delta threshold must be a non-negative number of degrees, got {threshold}"
            )));
        }
        Ok(())
    }
}
