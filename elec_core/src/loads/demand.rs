//! # Demand Factor Calculator
//!
//! Aggregates panel circuits by category, applies NEC demand factors, and
//! reports per-phase loading and service current.
//!
//! ## Demand Factors
//!
//! | Category     | Rule                                                  | Section |
//! |--------------|-------------------------------------------------------|---------|
//! | Lighting     | 3000 VA @ 100%, to 120 000 VA @ 35%, rest @ 25%       | 220.42  |
//! | Receptacle   | 10 000 VA @ 100%, rest @ 50%                          | 220.44  |
//! | Motor        | Largest motor @ 125%, others @ 100%                   | 430.24  |
//! | Dryer        | By count, 100% (1-4) down to 47% (11), -1%/dryer, ≥35% | 220.54  |
//! | Kitchen      | By count, 100% (1-2) down to 65% (6+)                 | 220.56  |
//! | Heating      | 100% for ≤3 units, 75% for 4+                         | 220.53  |
//! | Cooling, water heater, other | 100%                                  |         |
//!
//! Heating and cooling are summed unless [`NoncoincidentPolicy::LargerOnly`]
//! is selected, in which case only the larger of the two counts (220.60).
//! Kitchen demand is the count factor alone unless
//! [`DemandOptions::kitchen_two_largest_floor`] is set (220.56 note).
//!
//! ## Example
//!
//! ```rust
//! use elec_core::loads::{compute_demand, CircuitLoad, LoadCategory};
//! use elec_core::settings::SystemPhase;
//!
//! let circuits = vec![
//!     CircuitLoad::new("1", "Lighting", 10_000.0, LoadCategory::Lighting, 1, 1),
//!     CircuitLoad::new("2", "Receptacles", 14_000.0, LoadCategory::Receptacle, 1, 3),
//! ];
//!
//! let result = compute_demand(&circuits, 240.0, SystemPhase::Single).unwrap();
//! // Lighting: 3000 + 7000 × 0.35 = 5450; receptacles: 10000 + 4000 × 0.5 = 12000
//! assert_eq!(result.total_demand_va.0, 17_450.0);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::compliance::{nec_ref, Citation, ComplianceWarning, Findings, Severity};
use crate::errors::{require_positive, CalcResult};
use crate::settings::{ProjectElectricalSettings, SystemPhase};
use crate::units::{single_phase_amps, three_phase_amps, KiloVoltAmps, VoltAmps};

use super::phases::{assign_phases, split_load, system_phases};
use super::{CircuitLoad, LoadCategory, Phase};

/// Phase imbalance above which a rebalancing warning is raised (%)
pub const IMBALANCE_WARNING_PERCENT: f64 = 20.0;

const LIGHTING_FIRST_TIER_VA: f64 = 3000.0;
const LIGHTING_SECOND_TIER_VA: f64 = 120_000.0;
const RECEPTACLE_FIRST_TIER_VA: f64 = 10_000.0;

/// Dryer demand factors (%) for 1 through 11 dryers
const DRYER_FACTORS_PERCENT: [u32; 11] = [100, 100, 100, 100, 85, 75, 65, 60, 55, 50, 47];
const DRYER_FLOOR_PERCENT: u32 = 35;

/// How heating and cooling combine when both are present
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoncoincidentPolicy {
    /// Count both at their full demand
    #[default]
    SumBoth,
    /// Count only the larger of the two (NEC 220.60)
    LargerOnly,
}

/// Options for [`compute_demand_with_options`]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DemandOptions {
    pub noncoincident: NoncoincidentPolicy,
    /// Hold kitchen demand at or above the two largest kitchen loads
    pub kitchen_two_largest_floor: bool,
}

/// Demand for one load category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryDemand {
    pub category: LoadCategory,
    pub circuit_count: usize,
    pub connected_va: f64,
    pub demand_va: f64,
    /// Effective demand / connected ratio
    pub demand_factor: f64,
    /// How the demand was derived
    pub basis: String,
}

/// Connected and demand load on one phase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseLoad {
    pub phase: Phase,
    pub connected_va: f64,
    pub demand_va: f64,
}

/// Result of demand-factor aggregation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandResult {
    pub voltage: f64,
    pub system_phase: SystemPhase,
    /// Categories present, in declaration order
    pub categories: Vec<CategoryDemand>,
    /// Phases of the system, in bus order
    pub phases: Vec<PhaseLoad>,
    pub total_connected_va: VoltAmps,
    pub total_demand_va: VoltAmps,
    pub total_connected_kva: KiloVoltAmps,
    pub total_demand_kva: KiloVoltAmps,
    /// (max - min) / mean of per-phase connected load (%)
    pub phase_imbalance_percent: f64,
    /// Line current at total demand (A)
    pub demand_amps: f64,
    pub notes: Vec<String>,
    pub citations: Vec<Citation>,
    pub warnings: Vec<ComplianceWarning>,
}

impl DemandResult {
    pub fn category(&self, category: LoadCategory) -> Option<&CategoryDemand> {
        self.categories.iter().find(|c| c.category == category)
    }

    pub fn phase(&self, phase: Phase) -> Option<&PhaseLoad> {
        self.phases.iter().find(|p| p.phase == phase)
    }
}

/// Input for a demand calculation.
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "Panel LP-1",
///   "voltage": 208.0,
///   "phase": 3,
///   "circuits": [
///     { "id": "1", "load_watts": 1800.0, "load_category": "lighting", "pole_count": 1, "circuit_number": 1 }
///   ],
///   "options": { "noncoincident": "larger_only" }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandInput {
    #[serde(default)]
    pub label: String,
    pub circuits: Vec<CircuitLoad>,
    /// Service voltage when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voltage: Option<f64>,
    /// Service phase when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<SystemPhase>,
    #[serde(default)]
    pub options: DemandOptions,
}

/// Run a [`DemandInput`] with project defaults for voltage and phase.
pub fn calculate(input: &DemandInput, settings: &ProjectElectricalSettings) -> CalcResult<DemandResult> {
    compute_demand_with_options(
        &input.circuits,
        input.voltage.unwrap_or(settings.service_voltage),
        input.phase.unwrap_or(settings.service_phase),
        input.options,
    )
}

/// Compute demand with default options (heating and cooling summed).
pub fn compute_demand(loads: &[CircuitLoad], voltage: f64, phase: SystemPhase) -> CalcResult<DemandResult> {
    compute_demand_with_options(loads, voltage, phase, DemandOptions::default())
}

/// Compute demand-factored load, per-phase distribution and demand current.
///
/// # Errors
///
/// `InvalidInput` for a non-positive voltage, a negative load, an invalid
/// pole count, or a circuit that does not fit the system's phases.
pub fn compute_demand_with_options(
    loads: &[CircuitLoad],
    voltage: f64,
    phase: SystemPhase,
    options: DemandOptions,
) -> CalcResult<DemandResult> {
    require_positive("voltage", voltage)?;

    let phases = system_phases(phase);
    let mut findings = Findings::new();
    let mut notes = Vec::new();

    // Per-category circuit loads and per-phase connected VA
    let mut by_category: BTreeMap<LoadCategory, Vec<f64>> = BTreeMap::new();
    let mut phase_connected: BTreeMap<LoadCategory, [f64; 3]> = BTreeMap::new();

    for circuit in loads {
        circuit.validate()?;
        let occupied = assign_phases(circuit, phase)?;
        let shares = split_load(circuit.load_watts, occupied.len());

        by_category.entry(circuit.load_category).or_default().push(circuit.load_watts);
        let row = phase_connected.entry(circuit.load_category).or_insert([0.0; 3]);
        for (p, share) in occupied.iter().zip(shares) {
            row[p.index()] += share;
        }
    }

    let mut categories = Vec::new();
    for category in LoadCategory::ALL {
        let Some(circuit_loads) = by_category.get(&category) else {
            continue;
        };
        let (connected, demand, basis) = category_demand(category, circuit_loads, &options);
        if let Some(section) = category.code_ref() {
            findings.cite(section, format!("{} demand factor", category.display_name()));
        }
        categories.push(CategoryDemand {
            category,
            circuit_count: circuit_loads.len(),
            connected_va: connected,
            demand_va: demand,
            demand_factor: if connected > 0.0 { demand / connected } else { 1.0 },
            basis,
        });
    }

    if options.noncoincident == NoncoincidentPolicy::LargerOnly {
        apply_noncoincident(&mut categories, &mut notes, &mut findings);
    }

    // Per-phase demand follows each category's demand / connected ratio
    let mut phase_loads: Vec<PhaseLoad> = phases
        .iter()
        .map(|p| PhaseLoad { phase: *p, connected_va: 0.0, demand_va: 0.0 })
        .collect();
    for cat in &categories {
        let Some(row) = phase_connected.get(&cat.category) else {
            continue;
        };
        let ratio = if cat.connected_va > 0.0 { cat.demand_va / cat.connected_va } else { 0.0 };
        for load in phase_loads.iter_mut() {
            let connected = row[load.phase.index()];
            load.connected_va += connected;
            load.demand_va += connected * ratio;
        }
    }

    let total_connected = VoltAmps(categories.iter().map(|c| c.connected_va).sum());
    let total_demand = VoltAmps(categories.iter().map(|c| c.demand_va).sum());
    let total_demand_kva: KiloVoltAmps = total_demand.into();
    let demand_amps = match phase {
        SystemPhase::Single => single_phase_amps(total_demand_kva.into(), voltage),
        SystemPhase::Three => three_phase_amps(total_demand_kva.into(), voltage),
    };

    let imbalance = phase_imbalance(&phase_loads);
    if imbalance > IMBALANCE_WARNING_PERCENT {
        findings.warn(
            Severity::Warning,
            format!("Phase imbalance {:.1}% exceeds {:.0}%; consider rebalancing circuits", imbalance, IMBALANCE_WARNING_PERCENT),
            None,
        );
    }

    tracing::debug!(
        circuits = loads.len(),
        connected_va = total_connected.0,
        demand_va = total_demand.0,
        imbalance,
        "demand computed"
    );

    let (citations, warnings) = findings.into_parts();
    Ok(DemandResult {
        voltage,
        system_phase: phase,
        categories,
        phases: phase_loads,
        total_connected_va: total_connected,
        total_demand_va: total_demand,
        total_connected_kva: total_connected.into(),
        total_demand_kva,
        phase_imbalance_percent: imbalance,
        demand_amps,
        notes,
        citations,
        warnings,
    })
}

/// (connected, demand, basis) for one category's circuit loads
fn category_demand(category: LoadCategory, loads: &[f64], options: &DemandOptions) -> (f64, f64, String) {
    let connected: f64 = loads.iter().sum();
    let count = loads.len();
    match category {
        LoadCategory::Lighting => (connected, lighting_demand(connected), "Tiered 100% / 35% / 25%".to_string()),
        LoadCategory::Receptacle => {
            (connected, receptacle_demand(connected), "First 10 kVA at 100%, remainder at 50%".to_string())
        }
        LoadCategory::Motor => {
            let largest = loads.iter().copied().fold(0.0, f64::max);
            let others = connected - largest;
            (connected, largest * 1.25 + others, format!("Largest motor {:.0} VA at 125%", largest))
        }
        LoadCategory::Dryer => {
            let factor = dryer_demand_factor(count);
            (connected, connected * factor, format!("{} dryer(s) at {:.0}%", count, factor * 100.0))
        }
        LoadCategory::Kitchen => {
            let factor = kitchen_demand_factor(count);
            if !options.kitchen_two_largest_floor {
                return (connected, connected * factor, format!("{} unit(s) at {:.0}%", count, factor * 100.0));
            }
            let mut sorted = loads.to_vec();
            sorted.sort_by(|a, b| b.total_cmp(a));
            let two_largest: f64 = sorted.iter().take(2).sum();
            let demand = (connected * factor).max(two_largest).min(connected);
            (connected, demand, format!("{} unit(s) at {:.0}%, not less than two largest", count, factor * 100.0))
        }
        LoadCategory::Heating => {
            let factor = heating_demand_factor(count);
            (connected, connected * factor, format!("{} unit(s) at {:.0}%", count, factor * 100.0))
        }
        LoadCategory::Cooling | LoadCategory::WaterHeater | LoadCategory::Other => {
            (connected, connected, "100%".to_string())
        }
    }
}

/// General lighting demand (NEC 220.42)
pub fn lighting_demand(connected_va: f64) -> f64 {
    let first = connected_va.min(LIGHTING_FIRST_TIER_VA);
    let second = (connected_va.min(LIGHTING_SECOND_TIER_VA) - LIGHTING_FIRST_TIER_VA).max(0.0);
    let rest = (connected_va - LIGHTING_SECOND_TIER_VA).max(0.0);
    first + second * 0.35 + rest * 0.25
}

/// Receptacle demand (NEC 220.44)
pub fn receptacle_demand(connected_va: f64) -> f64 {
    let first = connected_va.min(RECEPTACLE_FIRST_TIER_VA);
    let rest = (connected_va - RECEPTACLE_FIRST_TIER_VA).max(0.0);
    first + rest * 0.5
}

/// Dryer demand factor for `count` dryers (NEC Table 220.54)
pub fn dryer_demand_factor(count: usize) -> f64 {
    let percent = match count {
        0 => 100,
        1..=11 => DRYER_FACTORS_PERCENT[count - 1],
        _ => {
            let reduction = u32::try_from(count - 11).unwrap_or(u32::MAX);
            47u32.saturating_sub(reduction).max(DRYER_FLOOR_PERCENT)
        }
    };
    f64::from(percent) / 100.0
}

/// Kitchen equipment demand factor for `count` units (NEC Table 220.56)
pub fn kitchen_demand_factor(count: usize) -> f64 {
    match count {
        0..=2 => 1.0,
        3 => 0.90,
        4 => 0.80,
        5 => 0.70,
        _ => 0.65,
    }
}

/// Fixed space heating demand factor for `count` units
pub fn heating_demand_factor(count: usize) -> f64 {
    if count >= 4 {
        0.75
    } else {
        1.0
    }
}

/// Drop the smaller of heating and cooling when both are present
fn apply_noncoincident(categories: &mut [CategoryDemand], notes: &mut Vec<String>, findings: &mut Findings) {
    let heating = categories.iter().position(|c| c.category == LoadCategory::Heating);
    let cooling = categories.iter().position(|c| c.category == LoadCategory::Cooling);
    let (Some(h), Some(c)) = (heating, cooling) else {
        return;
    };

    let dropped = if categories[h].demand_va >= categories[c].demand_va { c } else { h };
    let omitted = &mut categories[dropped];
    notes.push(format!(
        "{} ({:.0} VA) omitted as noncoincident with the larger load",
        omitted.category.display_name(),
        omitted.demand_va
    ));
    omitted.demand_va = 0.0;
    omitted.demand_factor = 0.0;
    omitted.basis = "Noncoincident, omitted".to_string();
    findings.cite(nec_ref::NONCOINCIDENT, "Noncoincident loads, larger of heating and cooling");
}

/// (max - min) / mean of per-phase connected load, as a percentage
fn phase_imbalance(phases: &[PhaseLoad]) -> f64 {
    if phases.is_empty() {
        return 0.0;
    }
    let max = phases.iter().map(|p| p.connected_va).fold(f64::MIN, f64::max);
    let min = phases.iter().map(|p| p.connected_va).fold(f64::MAX, f64::min);
    let mean = phases.iter().map(|p| p.connected_va).sum::<f64>() / phases.len() as f64;
    if mean <= 0.0 {
        0.0
    } else {
        (max - min) / mean * 100.0
    }
}
