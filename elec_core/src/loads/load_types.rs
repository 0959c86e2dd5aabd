//! Load category and phase definitions
//!
//! This module defines the load categories that drive demand-factor
//! selection, and the phase labels used for per-phase load distribution.

use serde::{Deserialize, Serialize};

use crate::compliance::nec_ref;

/// Load categories for demand-factor grouping
///
/// Each category maps to one demand-factor rule in [`crate::loads::demand`].
///
/// # Example
/// ```
/// use elec_core::loads::LoadCategory;
///
/// assert_eq!(LoadCategory::WaterHeater.code(), "water_heater");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadCategory {
    /// General lighting
    Lighting,
    /// Motors (largest at 125%)
    Motor,
    /// General-purpose receptacles
    Receptacle,
    /// Fixed electric space heating
    Heating,
    /// Air conditioning / heat pump compressors
    Cooling,
    /// Storage water heaters
    WaterHeater,
    /// Household clothes dryers
    Dryer,
    /// Commercial kitchen equipment
    Kitchen,
    /// Everything else, at 100%
    Other,
}

impl LoadCategory {
    /// All categories in reporting order
    pub const ALL: [LoadCategory; 9] = [
        LoadCategory::Lighting,
        LoadCategory::Motor,
        LoadCategory::Receptacle,
        LoadCategory::Heating,
        LoadCategory::Cooling,
        LoadCategory::WaterHeater,
        LoadCategory::Dryer,
        LoadCategory::Kitchen,
        LoadCategory::Other,
    ];

    /// Snake-case code used in JSON
    pub fn code(&self) -> &'static str {
        match self {
            LoadCategory::Lighting => "lighting",
            LoadCategory::Motor => "motor",
            LoadCategory::Receptacle => "receptacle",
            LoadCategory::Heating => "heating",
            LoadCategory::Cooling => "cooling",
            LoadCategory::WaterHeater => "water_heater",
            LoadCategory::Dryer => "dryer",
            LoadCategory::Kitchen => "kitchen",
            LoadCategory::Other => "other",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            LoadCategory::Lighting => "General lighting",
            LoadCategory::Motor => "Motors",
            LoadCategory::Receptacle => "Receptacles",
            LoadCategory::Heating => "Space heating",
            LoadCategory::Cooling => "Cooling",
            LoadCategory::WaterHeater => "Water heaters",
            LoadCategory::Dryer => "Clothes dryers",
            LoadCategory::Kitchen => "Kitchen equipment",
            LoadCategory::Other => "Other loads",
        }
    }

    /// Code section governing this category's demand factor
    pub fn code_ref(&self) -> Option<&'static str> {
        match self {
            LoadCategory::Lighting => Some(nec_ref::LIGHTING_DEMAND),
            LoadCategory::Motor => Some(nec_ref::MOTOR_LARGEST),
            LoadCategory::Receptacle => Some(nec_ref::RECEPTACLE_DEMAND),
            LoadCategory::Heating => Some(nec_ref::APPLIANCE_DEMAND),
            LoadCategory::Dryer => Some(nec_ref::DRYER_DEMAND),
            LoadCategory::Kitchen => Some(nec_ref::KITCHEN_DEMAND),
            LoadCategory::Cooling | LoadCategory::WaterHeater | LoadCategory::Other => None,
        }
    }
}

impl std::fmt::Display for LoadCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Supply phase (bus) label
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Phase {
    A,
    B,
    C,
}

impl Phase {
    pub const ALL: [Phase; 3] = [Phase::A, Phase::B, Phase::C];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn letter(&self) -> &'static str {
        match self {
            Phase::A => "A",
            Phase::B => "B",
            Phase::C => "C",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.letter())
    }
}
