//! Standard Conductor Sizes
//!
//! Closed enumeration of the conductor sizes listed in NEC Table 310.16
//! (14 AWG through 2000 kcmil) with their circular-mil areas per
//! NEC Chapter 9, Table 8.
//!
//! Sizes are totally ordered by [`ConductorSize::index`]. "Upsizing" always
//! means moving to the next index, never choosing an arbitrary value, and
//! comparisons never parse labels.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Standard conductor size designation, smallest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ConductorSize {
    #[serde(rename = "14 AWG", alias = "14", alias = "#14")]
    Awg14,
    #[serde(rename = "12 AWG", alias = "12", alias = "#12")]
    Awg12,
    #[serde(rename = "10 AWG", alias = "10", alias = "#10")]
    Awg10,
    #[serde(rename = "8 AWG", alias = "8", alias = "#8")]
    Awg8,
    #[serde(rename = "6 AWG", alias = "6", alias = "#6")]
    Awg6,
    #[serde(rename = "4 AWG", alias = "4", alias = "#4")]
    Awg4,
    #[serde(rename = "3 AWG", alias = "3", alias = "#3")]
    Awg3,
    #[serde(rename = "2 AWG", alias = "2", alias = "#2")]
    Awg2,
    #[serde(rename = "1 AWG", alias = "1", alias = "#1")]
    Awg1,
    #[serde(rename = "1/0 AWG", alias = "1/0", alias = "#1/0")]
    Awg1_0,
    #[serde(rename = "2/0 AWG", alias = "2/0", alias = "#2/0")]
    Awg2_0,
    #[serde(rename = "3/0 AWG", alias = "3/0", alias = "#3/0")]
    Awg3_0,
    #[serde(rename = "4/0 AWG", alias = "4/0", alias = "#4/0")]
    Awg4_0,
    #[serde(rename = "250 kcmil", alias = "250")]
    Kcmil250,
    #[serde(rename = "300 kcmil", alias = "300")]
    Kcmil300,
    #[serde(rename = "350 kcmil", alias = "350")]
    Kcmil350,
    #[serde(rename = "400 kcmil", alias = "400")]
    Kcmil400,
    #[serde(rename = "500 kcmil", alias = "500")]
    Kcmil500,
    #[serde(rename = "600 kcmil", alias = "600")]
    Kcmil600,
    #[serde(rename = "700 kcmil", alias = "700")]
    Kcmil700,
    #[serde(rename = "750 kcmil", alias = "750")]
    Kcmil750,
    #[serde(rename = "800 kcmil", alias = "800")]
    Kcmil800,
    #[serde(rename = "900 kcmil", alias = "900")]
    Kcmil900,
    #[serde(rename = "1000 kcmil", alias = "1000")]
    Kcmil1000,
    #[serde(rename = "1250 kcmil", alias = "1250")]
    Kcmil1250,
    #[serde(rename = "1500 kcmil", alias = "1500")]
    Kcmil1500,
    #[serde(rename = "1750 kcmil", alias = "1750")]
    Kcmil1750,
    #[serde(rename = "2000 kcmil", alias = "2000")]
    Kcmil2000,
}

/// Number of entries in the size list; also the resize loop bound.
pub const SIZE_COUNT: usize = 28;

/// Sizes 14 AWG through 1 AWG are "small conductors" for termination rules.
const SMALL_CONDUCTOR_COUNT: usize = 9;

impl ConductorSize {
    /// All sizes in ascending order
    pub const ALL: [ConductorSize; SIZE_COUNT] = [
        ConductorSize::Awg14,
        ConductorSize::Awg12,
        ConductorSize::Awg10,
        ConductorSize::Awg8,
        ConductorSize::Awg6,
        ConductorSize::Awg4,
        ConductorSize::Awg3,
        ConductorSize::Awg2,
        ConductorSize::Awg1,
        ConductorSize::Awg1_0,
        ConductorSize::Awg2_0,
        ConductorSize::Awg3_0,
        ConductorSize::Awg4_0,
        ConductorSize::Kcmil250,
        ConductorSize::Kcmil300,
        ConductorSize::Kcmil350,
        ConductorSize::Kcmil400,
        ConductorSize::Kcmil500,
        ConductorSize::Kcmil600,
        ConductorSize::Kcmil700,
        ConductorSize::Kcmil750,
        ConductorSize::Kcmil800,
        ConductorSize::Kcmil900,
        ConductorSize::Kcmil1000,
        ConductorSize::Kcmil1250,
        ConductorSize::Kcmil1500,
        ConductorSize::Kcmil1750,
        ConductorSize::Kcmil2000,
    ];

    /// Position in the ascending size list
    pub fn index(self) -> usize {
        self as usize
    }

    /// Size at a list position, if any
    pub fn from_index(index: usize) -> Option<ConductorSize> {
        Self::ALL.get(index).copied()
    }

    /// The next larger standard size
    pub fn next_larger(self) -> Option<ConductorSize> {
        Self::from_index(self.index() + 1)
    }

    pub fn smallest() -> ConductorSize {
        Self::ALL[0]
    }

    pub fn largest() -> ConductorSize {
        Self::ALL[SIZE_COUNT - 1]
    }

    /// Sizes at or above this one, ascending
    pub fn and_larger(self) -> impl Iterator<Item = ConductorSize> {
        Self::ALL[self.index()..].iter().copied()
    }

    /// True for 14 AWG through 1 AWG
    pub fn is_small(self) -> bool {
        self.index() < SMALL_CONDUCTOR_COUNT
    }

    /// Cross-sectional area in circular mils (NEC Chapter 9, Table 8)
    pub fn circular_mils(self) -> f64 {
        match self {
            ConductorSize::Awg14 => 4_110.0,
            ConductorSize::Awg12 => 6_530.0,
            ConductorSize::Awg10 => 10_380.0,
            ConductorSize::Awg8 => 16_510.0,
            ConductorSize::Awg6 => 26_240.0,
            ConductorSize::Awg4 => 41_740.0,
            ConductorSize::Awg3 => 52_620.0,
            ConductorSize::Awg2 => 66_360.0,
            ConductorSize::Awg1 => 83_690.0,
            ConductorSize::Awg1_0 => 105_600.0,
            ConductorSize::Awg2_0 => 133_100.0,
            ConductorSize::Awg3_0 => 167_800.0,
            ConductorSize::Awg4_0 => 211_600.0,
            ConductorSize::Kcmil250 => 250_000.0,
            ConductorSize::Kcmil300 => 300_000.0,
            ConductorSize::Kcmil350 => 350_000.0,
            ConductorSize::Kcmil400 => 400_000.0,
            ConductorSize::Kcmil500 => 500_000.0,
            ConductorSize::Kcmil600 => 600_000.0,
            ConductorSize::Kcmil700 => 700_000.0,
            ConductorSize::Kcmil750 => 750_000.0,
            ConductorSize::Kcmil800 => 800_000.0,
            ConductorSize::Kcmil900 => 900_000.0,
            ConductorSize::Kcmil1000 => 1_000_000.0,
            ConductorSize::Kcmil1250 => 1_250_000.0,
            ConductorSize::Kcmil1500 => 1_500_000.0,
            ConductorSize::Kcmil1750 => 1_750_000.0,
            ConductorSize::Kcmil2000 => 2_000_000.0,
        }
    }

    /// Smallest size whose area is at least `cmil`
    pub fn smallest_with_area(cmil: f64) -> Option<ConductorSize> {
        Self::ALL.iter().copied().find(|s| s.circular_mils() >= cmil)
    }

    /// Trade label without unit (e.g., "12", "1/0", "250")
    pub fn label(self) -> &'static str {
        match self {
            ConductorSize::Awg14 => "14",
            ConductorSize::Awg12 => "12",
            ConductorSize::Awg10 => "10",
            ConductorSize::Awg8 => "8",
            ConductorSize::Awg6 => "6",
            ConductorSize::Awg4 => "4",
            ConductorSize::Awg3 => "3",
            ConductorSize::Awg2 => "2",
            ConductorSize::Awg1 => "1",
            ConductorSize::Awg1_0 => "1/0",
            ConductorSize::Awg2_0 => "2/0",
            ConductorSize::Awg3_0 => "3/0",
            ConductorSize::Awg4_0 => "4/0",
            ConductorSize::Kcmil250 => "250",
            ConductorSize::Kcmil300 => "300",
            ConductorSize::Kcmil350 => "350",
            ConductorSize::Kcmil400 => "400",
            ConductorSize::Kcmil500 => "500",
            ConductorSize::Kcmil600 => "600",
            ConductorSize::Kcmil700 => "700",
            ConductorSize::Kcmil750 => "750",
            ConductorSize::Kcmil800 => "800",
            ConductorSize::Kcmil900 => "900",
            ConductorSize::Kcmil1000 => "1000",
            ConductorSize::Kcmil1250 => "1250",
            ConductorSize::Kcmil1500 => "1500",
            ConductorSize::Kcmil1750 => "1750",
            ConductorSize::Kcmil2000 => "2000",
        }
    }

    /// True for AWG sizes (as opposed to kcmil)
    pub fn is_awg(self) -> bool {
        self <= ConductorSize::Awg4_0
    }

    /// Parse from common string representations
    ///
    /// Accepts "12", "#12", "12 AWG", "12AWG", "1/0", "250", "250 kcmil",
    /// "250 MCM" (case-insensitive).
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        let normalized = s.trim().to_ascii_uppercase();
        let stripped = normalized
            .trim_start_matches('#')
            .trim_end_matches("AWG")
            .trim_end_matches("KCMIL")
            .trim_end_matches("MCM")
            .trim();
        Self::ALL
            .iter()
            .copied()
            .find(|size| size.label() == stripped)
            .ok_or_else(|| CalcError::unknown_conductor_size(s))
    }
}

impl FromStr for ConductorSize {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConductorSize::from_str_flexible(s)
    }
}

impl std::fmt::Display for ConductorSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_awg() {
            write!(f, "{} AWG", self.label())
        } else {
            write!(f, "{} kcmil", self.label())
        }
    }
}

/// Conductor material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ConductorMaterial {
    /// Copper
    #[default]
    #[serde(rename = "Cu", alias = "copper", alias = "CU")]
    Copper,
    /// Aluminum or copper-clad aluminum
    #[serde(rename = "Al", alias = "aluminum", alias = "AL")]
    Aluminum,
}

impl ConductorMaterial {
    pub const ALL: [ConductorMaterial; 2] = [ConductorMaterial::Copper, ConductorMaterial::Aluminum];

    /// Short code ("Cu" / "Al")
    pub fn code(&self) -> &'static str {
        match self {
            ConductorMaterial::Copper => "Cu",
            ConductorMaterial::Aluminum => "Al",
        }
    }

    /// Parse from common string representations
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cu" | "copper" => Ok(ConductorMaterial::Copper),
            "al" | "aluminum" | "aluminium" => Ok(ConductorMaterial::Aluminum),
            _ => Err(CalcError::invalid_input("conductor_material", s, "Expected 'Cu' or 'Al'")),
        }
    }
}

impl std::fmt::Display for ConductorMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Insulation temperature rating (ampacity table column)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(try_from = "u16", into = "u16")]
pub enum InsulationRating {
    /// 60°C (TW, UF)
    C60,
    /// 75°C (THW, THWN, XHHW)
    #[default]
    C75,
    /// 90°C (THHN, THWN-2, XHHW-2)
    C90,
}

impl InsulationRating {
    pub const ALL: [InsulationRating; 3] = [InsulationRating::C60, InsulationRating::C75, InsulationRating::C90];

    pub fn degrees_c(&self) -> u16 {
        match self {
            InsulationRating::C60 => 60,
            InsulationRating::C75 => 75,
            InsulationRating::C90 => 90,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            InsulationRating::C60 => "60°C",
            InsulationRating::C75 => "75°C",
            InsulationRating::C90 => "90°C",
        }
    }
}

impl TryFrom<u16> for InsulationRating {
    type Error = CalcError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            60 => Ok(InsulationRating::C60),
            75 => Ok(InsulationRating::C75),
            90 => Ok(InsulationRating::C90),
            _ => Err(CalcError::invalid_input(
                "insulation_temp_rating",
                value.to_string(),
                "Insulation rating must be 60, 75 or 90",
            )),
        }
    }
}

impl From<InsulationRating> for u16 {
    fn from(rating: InsulationRating) -> Self {
        rating.degrees_c()
    }
}

impl std::fmt::Display for InsulationRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sizes_strictly_ascending() {
        for pair in ConductorSize::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
            assert!(pair[0].circular_mils() < pair[1].circular_mils());
        }
        assert_eq!(ConductorSize::ALL.len(), SIZE_COUNT);
    }

    #[test]
    fn test_index_roundtrip() {
        for (i, size) in ConductorSize::ALL.iter().enumerate() {
            assert_eq!(size.index(), i);
            assert_eq!(ConductorSize::from_index(i), Some(*size));
        }
        assert_eq!(ConductorSize::largest().next_larger(), None);
        assert_eq!(ConductorSize::Awg1.next_larger(), Some(ConductorSize::Awg1_0));
    }

    #[test]
    fn test_small_conductors() {
        assert!(ConductorSize::Awg14.is_small());
        assert!(ConductorSize::Awg1.is_small());
        assert!(!ConductorSize::Awg1_0.is_small());
    }

    #[test]
    fn test_flexible_parsing() {
        assert_eq!(ConductorSize::from_str_flexible("12").unwrap(), ConductorSize::Awg12);
        assert_eq!(ConductorSize::from_str_flexible("#12").unwrap(), ConductorSize::Awg12);
        assert_eq!(ConductorSize::from_str_flexible("12 AWG").unwrap(), ConductorSize::Awg12);
        assert_eq!(ConductorSize::from_str_flexible("1/0").unwrap(), ConductorSize::Awg1_0);
        assert_eq!(ConductorSize::from_str_flexible("250 kcmil").unwrap(), ConductorSize::Kcmil250);
        assert_eq!(ConductorSize::from_str_flexible("500 MCM").unwrap(), ConductorSize::Kcmil500);
        assert!(matches!(
            ConductorSize::from_str_flexible("13 AWG"),
            Err(CalcError::UnknownConductorSize { .. })
        ));
    }

    #[test]
    fn test_display_and_serde() {
        assert_eq!(ConductorSize::Awg12.to_string(), "12 AWG");
        assert_eq!(ConductorSize::Kcmil250.to_string(), "250 kcmil");
        assert_eq!(serde_json::to_string(&ConductorSize::Awg1_0).unwrap(), "\"1/0 AWG\"");
        let parsed: ConductorSize = serde_json::from_str("\"8\"").unwrap();
        assert_eq!(parsed, ConductorSize::Awg8);
    }

    #[test]
    fn test_smallest_with_area() {
        assert_eq!(ConductorSize::smallest_with_area(33_000.0), Some(ConductorSize::Awg4));
        assert_eq!(ConductorSize::smallest_with_area(16_510.0), Some(ConductorSize::Awg8));
        assert_eq!(ConductorSize::smallest_with_area(3_000_000.0), None);
    }

    #[test]
    fn test_insulation_rating_serde() {
        assert_eq!(serde_json::to_string(&InsulationRating::C90).unwrap(), "90");
        let parsed: InsulationRating = serde_json::from_str("60").unwrap();
        assert_eq!(parsed, InsulationRating::C60);
        assert!(serde_json::from_str::<InsulationRating>("105").is_err());
    }

    #[test]
    fn test_material_parsing() {
        assert_eq!(ConductorMaterial::from_str_flexible("copper").unwrap(), ConductorMaterial::Copper);
        assert_eq!(ConductorMaterial::from_str_flexible("AL").unwrap(), ConductorMaterial::Aluminum);
        assert!(ConductorMaterial::from_str_flexible("silver").is_err());
        let parsed: ConductorMaterial = serde_json::from_str("\"Al\"").unwrap();
        assert_eq!(parsed, ConductorMaterial::Aluminum);
    }
}
