//! Conduit Trade Size Estimate
//!
//! Quick raceway estimate from the largest conductor size and the number of
//! conductors in the run. The base table assumes up to four THHN/THWN-2
//! conductors in EMT; more conductors bump the trade size:
//!
//! | Conductors | Trade size        |
//! |------------|-------------------|
//! | 1 - 4      | base              |
//! | 5 - 6      | base + 1 size     |
//! | 7 or more  | base + 2 sizes    |
//!
//! This is an estimate only; final fill must be verified per NEC Chapter 9.

use serde::{Deserialize, Serialize};

use crate::tables::conductors::ConductorSize;

/// Conduit trade size, ascending
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ConduitSize {
    #[serde(rename = "1/2\"")]
    Half,
    #[serde(rename = "3/4\"")]
    ThreeQuarter,
    #[serde(rename = "1\"")]
    One,
    #[serde(rename = "1-1/4\"")]
    OneAndQuarter,
    #[serde(rename = "1-1/2\"")]
    OneAndHalf,
    #[serde(rename = "2\"")]
    Two,
    #[serde(rename = "2-1/2\"")]
    TwoAndHalf,
    #[serde(rename = "3\"")]
    Three,
    #[serde(rename = "3-1/2\"")]
    ThreeAndHalf,
    #[serde(rename = "4\"")]
    Four,
    #[serde(rename = "5\"")]
    Five,
    #[serde(rename = "6\"")]
    Six,
}

impl ConduitSize {
    pub const ALL: [ConduitSize; 12] = [
        ConduitSize::Half,
        ConduitSize::ThreeQuarter,
        ConduitSize::One,
        ConduitSize::OneAndQuarter,
        ConduitSize::OneAndHalf,
        ConduitSize::Two,
        ConduitSize::TwoAndHalf,
        ConduitSize::Three,
        ConduitSize::ThreeAndHalf,
        ConduitSize::Four,
        ConduitSize::Five,
        ConduitSize::Six,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            ConduitSize::Half => "1/2\"",
            ConduitSize::ThreeQuarter => "3/4\"",
            ConduitSize::One => "1\"",
            ConduitSize::OneAndQuarter => "1-1/4\"",
            ConduitSize::OneAndHalf => "1-1/2\"",
            ConduitSize::Two => "2\"",
            ConduitSize::TwoAndHalf => "2-1/2\"",
            ConduitSize::Three => "3\"",
            ConduitSize::ThreeAndHalf => "3-1/2\"",
            ConduitSize::Four => "4\"",
            ConduitSize::Five => "5\"",
            ConduitSize::Six => "6\"",
        }
    }

    /// Trade size `steps` positions larger, if one exists
    pub fn bumped(self, steps: usize) -> Option<ConduitSize> {
        Self::ALL.get(self as usize + steps).copied()
    }
}

impl std::fmt::Display for ConduitSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Base trade size for up to four conductors of the given size
pub fn base_trade_size(size: ConductorSize) -> ConduitSize {
    use ConductorSize::*;
    match size {
        Awg14 | Awg12 | Awg10 => ConduitSize::Half,
        Awg8 => ConduitSize::ThreeQuarter,
        Awg6 | Awg4 => ConduitSize::One,
        Awg3 | Awg2 => ConduitSize::OneAndQuarter,
        Awg1 | Awg1_0 => ConduitSize::OneAndHalf,
        Awg2_0 | Awg3_0 | Awg4_0 => ConduitSize::Two,
        Kcmil250 | Kcmil300 => ConduitSize::TwoAndHalf,
        Kcmil350 | Kcmil400 | Kcmil500 => ConduitSize::Three,
        Kcmil600 => ConduitSize::ThreeAndHalf,
        Kcmil700 | Kcmil750 | Kcmil800 | Kcmil900 | Kcmil1000 => ConduitSize::Four,
        Kcmil1250 | Kcmil1500 => ConduitSize::Five,
        Kcmil1750 | Kcmil2000 => ConduitSize::Six,
    }
}

/// Number of trade-size steps added for the conductor count
pub fn fill_bump(conductor_count: u32) -> usize {
    if conductor_count > 6 {
        2
    } else if conductor_count > 4 {
        1
    } else {
        0
    }
}

/// Estimated trade size; `None` when the estimate exceeds 6" (parallel runs needed).
pub fn estimate_trade_size(size: ConductorSize, conductor_count: u32) -> Option<ConduitSize> {
    base_trade_size(size).bumped(fill_bump(conductor_count))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_sizes_non_decreasing() {
        for pair in ConductorSize::ALL.windows(2) {
            assert!(base_trade_size(pair[0]) <= base_trade_size(pair[1]));
        }
    }

    #[test]
    fn test_bump_rules() {
        assert_eq!(estimate_trade_size(ConductorSize::Awg3_0, 4), Some(ConduitSize::Two));
        assert_eq!(estimate_trade_size(ConductorSize::Awg3_0, 5), Some(ConduitSize::TwoAndHalf));
        assert_eq!(estimate_trade_size(ConductorSize::Awg3_0, 7), Some(ConduitSize::Three));
        assert_eq!(estimate_trade_size(ConductorSize::Kcmil2000, 5), None);
    }

    #[test]
    fn test_serialization() {
        assert_eq!(serde_json::to_string(&ConduitSize::OneAndHalf).unwrap(), "\"1-1/2\\\"\"");
    }
}
