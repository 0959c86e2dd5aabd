//! # Project Electrical Settings
//!
//! Project-level settings that every calculation reads: service voltage and
//! phase, occupancy, conductor material and insulation rating, code edition.
//!
//! Settings are passed explicitly to each calculation call. The engine never
//! stores or mutates them, so two calls with different settings can run
//! side by side.
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "service_voltage": 208.0,
//!   "service_phase": 3,
//!   "occupancy_class": "commercial",
//!   "conductor_material": "Cu",
//!   "insulation_temp_rating": 75,
//!   "code_edition": "NEC2023"
//! }
//! ```
//!
//! Every field is optional in JSON; missing fields take the defaults below.

use serde::{Deserialize, Serialize};

use crate::compliance::CodeEdition;
use crate::errors::{require_positive, CalcError, CalcResult};
use crate::tables::{ConductorMaterial, InsulationRating};

/// Number of phases of the supply system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(try_from = "u8", into = "u8")]
pub enum SystemPhase {
    /// Single-phase (120/240 V three-wire and similar)
    #[default]
    Single,
    /// Three-phase (208Y/120, 480Y/277, delta)
    Three,
}

impl SystemPhase {
    pub fn count(&self) -> u8 {
        match self {
            SystemPhase::Single => 1,
            SystemPhase::Three => 3,
        }
    }

    /// Voltage-drop multiplier: 2 for single-phase, √3 for three-phase
    pub fn drop_multiplier(&self) -> f64 {
        match self {
            SystemPhase::Single => 2.0,
            SystemPhase::Three => 3.0_f64.sqrt(),
        }
    }

    /// Divisor turning VA into line amperes at `voltage`
    pub fn current_divisor(&self, voltage: f64) -> f64 {
        match self {
            SystemPhase::Single => voltage,
            SystemPhase::Three => voltage * 3.0_f64.sqrt(),
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SystemPhase::Single => "Single-phase",
            SystemPhase::Three => "Three-phase",
        }
    }
}

impl TryFrom<u8> for SystemPhase {
    type Error = CalcError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(SystemPhase::Single),
            3 => Ok(SystemPhase::Three),
            _ => Err(CalcError::invalid_input(
                "phase",
                value.to_string(),
                "Phase count must be 1 or 3",
            )),
        }
    }
}

impl From<SystemPhase> for u8 {
    fn from(phase: SystemPhase) -> Self {
        phase.count()
    }
}

impl std::fmt::Display for SystemPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Occupancy classification of the project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OccupancyClass {
    /// One-family dwelling
    #[default]
    Dwelling,
    /// Multifamily dwelling
    MultiFamily,
    /// Commercial / office / retail
    Commercial,
    /// Industrial
    Industrial,
}

impl OccupancyClass {
    /// Minimum service disconnect rating (NEC 230.79)
    pub fn minimum_service_amps(&self) -> f64 {
        match self {
            OccupancyClass::Dwelling => 100.0,
            _ => 60.0,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            OccupancyClass::Dwelling => "One-family dwelling",
            OccupancyClass::MultiFamily => "Multifamily dwelling",
            OccupancyClass::Commercial => "Commercial",
            OccupancyClass::Industrial => "Industrial",
        }
    }
}

/// Project-wide electrical settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectElectricalSettings {
    /// Nominal service voltage, line-to-line for multi-wire systems (V)
    pub service_voltage: f64,

    /// Service phase count (1 or 3)
    pub service_phase: SystemPhase,

    /// Occupancy classification
    pub occupancy_class: OccupancyClass,

    /// Default conductor material
    pub conductor_material: ConductorMaterial,

    /// Conductor insulation temperature rating (60, 75 or 90)
    pub insulation_temp_rating: InsulationRating,

    /// Code edition the rule set follows
    pub code_edition: CodeEdition,
}

impl Default for ProjectElectricalSettings {
    fn default() -> Self {
        ProjectElectricalSettings {
            service_voltage: 240.0,
            service_phase: SystemPhase::Single,
            occupancy_class: OccupancyClass::Dwelling,
            conductor_material: ConductorMaterial::Copper,
            insulation_temp_rating: InsulationRating::C75,
            code_edition: CodeEdition::Nec2023,
        }
    }
}

impl ProjectElectricalSettings {
    /// Settings for a three-phase system at `voltage`
    pub fn three_phase(voltage: f64) -> Self {
        ProjectElectricalSettings {
            service_voltage: voltage,
            service_phase: SystemPhase::Three,
            occupancy_class: OccupancyClass::Commercial,
            ..Default::default()
        }
    }

    /// Builder: set conductor material
    pub fn with_material(mut self, material: ConductorMaterial) -> Self {
        self.conductor_material = material;
        self
    }

    /// Builder: set insulation rating
    pub fn with_insulation(mut self, rating: InsulationRating) -> Self {
        self.insulation_temp_rating = rating;
        self
    }

    /// Validate settings values.
    pub fn validate(&self) -> CalcResult<()> {
        require_positive("service_voltage", self.service_voltage)?;
        if self.service_voltage > 1000.0 {
            return Err(CalcError::invalid_input(
                "service_voltage",
                self.service_voltage.to_string(),
                "Service voltage above 1000 V is outside the Table 310.16 scope",
            ));
        }
        Ok(())
    }

    /// Line-to-neutral voltage of the service
    pub fn line_to_neutral_voltage(&self) -> f64 {
        match self.service_phase {
            SystemPhase::Single => self.service_voltage / 2.0,
            SystemPhase::Three => self.service_voltage / 3.0_f64.sqrt(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = ProjectElectricalSettings::default();
        assert_eq!(settings.service_voltage, 240.0);
        assert_eq!(settings.conductor_material, ConductorMaterial::Copper);
        assert_eq!(settings.insulation_temp_rating, InsulationRating::C75);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: ProjectElectricalSettings =
            serde_json::from_str(r#"{ "service_voltage": 480.0, "service_phase": 3 }"#).unwrap();
        assert_eq!(settings.service_phase, SystemPhase::Three);
        assert_eq!(settings.insulation_temp_rating, InsulationRating::C75);
        assert_eq!(settings.occupancy_class, OccupancyClass::Dwelling);
    }

    #[test]
    fn test_invalid_phase_rejected() {
        let parsed: Result<ProjectElectricalSettings, _> = serde_json::from_str(r#"{ "service_phase": 2 }"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_validate_voltage() {
        let mut settings = ProjectElectricalSettings::default();
        settings.service_voltage = 0.0;
        assert!(settings.validate().is_err());
        settings.service_voltage = 4160.0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_serialization_roundtrip() {
        let settings = ProjectElectricalSettings::three_phase(208.0).with_material(ConductorMaterial::Aluminum);
        let json = serde_json::to_string_pretty(&settings).unwrap();
        assert!(json.contains("\"service_phase\": 3"));
        assert!(json.contains("\"Al\""));
        let roundtrip: ProjectElectricalSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip, settings);
    }

    #[test]
    fn test_line_to_neutral() {
        let settings = ProjectElectricalSettings::three_phase(208.0);
        assert!((settings.line_to_neutral_voltage() - 120.09).abs() < 0.01);
    }
}
