//! Circuit loads and demand-factor calculation
//!
//! This module provides the load inputs of the engine and the demand-factor
//! calculator that turns connected load into realistic simultaneous demand.
//!
//! # Overview
//!
//! - [`LoadCategory`] - Demand-factor category (lighting, motor, dryer, ...)
//! - [`LoadItem`] - A single equipment load with a continuous-duty flag
//! - [`CircuitLoad`] - A panel circuit with pole count and circuit number
//! - [`compute_demand`] - Category demand factors, per-phase loads, imbalance
//!
//! # Example
//!
//! ```
//! use elec_core::loads::{compute_demand, CircuitLoad, LoadCategory};
//! use elec_core::settings::SystemPhase;
//!
//! let circuits = vec![
//!     CircuitLoad::new("1", "Lighting", 6000.0, LoadCategory::Lighting, 1, 1),
//!     CircuitLoad::new("2", "Range", 12000.0, LoadCategory::Kitchen, 2, 2),
//! ];
//!
//! let demand = compute_demand(&circuits, 240.0, SystemPhase::Single).unwrap();
//! assert!(demand.total_demand_va <= demand.total_connected_va);
//! ```

pub mod demand;
pub mod load_types;
pub mod phases;

pub use demand::{
    compute_demand,
    compute_demand_with_options,
    CategoryDemand,
    DemandInput,
    DemandOptions,
    DemandResult,
    NoncoincidentPolicy,
    PhaseLoad,
};
pub use load_types::{LoadCategory, Phase};
pub use phases::{assign_phases, split_load};

use serde::{Deserialize, Serialize};

use crate::errors::{require_non_negative, CalcError, CalcResult};

/// A single piece of connected equipment.
///
/// ## JSON Example
///
/// ```json
/// { "id": "rtu-1", "description": "Rooftop unit", "watts": 9600.0,
///   "category": "cooling", "continuous": true, "phase_hint": "A" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadItem {
    pub id: String,
    #[serde(default)]
    pub description: String,
    /// Nameplate load (VA)
    pub watts: f64,
    pub category: LoadCategory,
    /// Expected to run three hours or more
    #[serde(default)]
    pub continuous: bool,
    /// Preferred starting phase when placed on a panel
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase_hint: Option<Phase>,
}

impl LoadItem {
    pub fn new(id: impl Into<String>, watts: f64, category: LoadCategory, continuous: bool) -> Self {
        LoadItem {
            id: id.into(),
            description: String::new(),
            watts,
            category,
            continuous,
            phase_hint: None,
        }
    }

    pub fn validate(&self) -> CalcResult<()> {
        require_non_negative("watts", self.watts)
    }
}

/// Sum of (continuous VA, noncontinuous VA) over a set of load items
pub fn split_continuous(items: &[LoadItem]) -> CalcResult<(f64, f64)> {
    let mut continuous = 0.0;
    let mut noncontinuous = 0.0;
    for item in items {
        item.validate()?;
        if item.continuous {
            continuous += item.watts;
        } else {
            noncontinuous += item.watts;
        }
    }
    Ok((continuous, noncontinuous))
}

/// A panel circuit, the input to demand-factor aggregation.
///
/// ## JSON Example
///
/// ```json
/// { "id": "c-3", "description": "Water heater", "load_watts": 4500.0,
///   "load_category": "water_heater", "pole_count": 2, "circuit_number": 3 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircuitLoad {
    pub id: String,
    #[serde(default)]
    pub description: String,
    /// Connected load (VA)
    pub load_watts: f64,
    pub load_category: LoadCategory,
    /// 1, 2 or 3 poles
    pub pole_count: u8,
    /// Panel circuit number (1-based; odd left, even right)
    pub circuit_number: u32,
    /// Starting phase override; derived from the circuit number when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<Phase>,
}

impl CircuitLoad {
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        load_watts: f64,
        load_category: LoadCategory,
        pole_count: u8,
        circuit_number: u32,
    ) -> Self {
        CircuitLoad {
            id: id.into(),
            description: description.into(),
            load_watts,
            load_category,
            pole_count,
            circuit_number,
            phase: None,
        }
    }

    /// Builder: pin the starting phase
    pub fn on_phase(mut self, phase: Phase) -> Self {
        self.phase = Some(phase);
        self
    }

    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        require_non_negative("load_watts", self.load_watts)?;
        if !(1..=3).contains(&self.pole_count) {
            return Err(CalcError::invalid_input(
                "pole_count",
                self.pole_count.to_string(),
                "Pole count must be 1, 2 or 3",
            ));
        }
        if self.circuit_number == 0 {
            return Err(CalcError::invalid_input(
                "circuit_number",
                "0",
                "Circuit numbers start at 1",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circuit_validation() {
        let ok = CircuitLoad::new("1", "Lights", 1200.0, LoadCategory::Lighting, 1, 1);
        assert!(ok.validate().is_ok());

        let mut bad = ok.clone();
        bad.pole_count = 4;
        assert!(bad.validate().is_err());

        let mut bad = ok.clone();
        bad.load_watts = -10.0;
        assert!(bad.validate().is_err());

        let mut bad = ok;
        bad.circuit_number = 0;
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_split_continuous() {
        let items = vec![
            LoadItem::new("a", 30_000.0, LoadCategory::Lighting, true),
            LoadItem::new("b", 20_000.0, LoadCategory::Receptacle, false),
        ];
        assert_eq!(split_continuous(&items).unwrap(), (30_000.0, 20_000.0));
    }

    #[test]
    fn test_circuit_json() {
        let json = r#"{ "id": "c-3", "load_watts": 4500.0, "load_category": "water_heater",
                        "pole_count": 2, "circuit_number": 3 }"#;
        let circuit: CircuitLoad = serde_json::from_str(json).unwrap();
        assert_eq!(circuit.load_category, LoadCategory::WaterHeater);
        assert_eq!(circuit.phase, None);
    }
}
