//! # Panelboard Capacity Check
//!
//! Compares the connected load of a panelboard's circuits against its bus
//! rating:
//!
//! ```text
//! capacity    = bus A × V          (single-phase)
//!             = bus A × V × √3     (three-phase)
//! utilization = connected VA / capacity × 100
//! ```
//!
//! | Check                        | Limit | Section |
//! |------------------------------|-------|---------|
//! | Bus loading                  | 80%   | 408.30  |
//! | Occupied poles               | 42    | 408.36  |
//!
//! Violations are critical warnings on a complete result.

use serde::{Deserialize, Serialize};

use crate::compliance::{nec_ref, Citation, ComplianceWarning, Findings, Severity};
use crate::errors::{require_positive, CalcResult};
use crate::loads::CircuitLoad;
use crate::settings::{ProjectElectricalSettings, SystemPhase};

/// Maximum bus loading (%)
pub const MAX_UTILIZATION_PERCENT: f64 = 80.0;

/// Maximum number of overcurrent device poles in a panelboard
pub const MAX_POLES: u32 = 42;

/// Input for a panel capacity check.
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "LP-1",
///   "bus_rating_amps": 100.0,
///   "circuits": [
///     { "id": "1", "load_watts": 1800.0, "load_category": "lighting", "pole_count": 1, "circuit_number": 1 }
///   ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelInput {
    #[serde(default)]
    pub label: String,
    /// Bus rating (A)
    pub bus_rating_amps: f64,
    /// Panel voltage; the service voltage when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voltage: Option<f64>,
    /// Panel phase; the service phase when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<SystemPhase>,
    #[serde(default)]
    pub circuits: Vec<CircuitLoad>,
}

/// Result of a panel capacity check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelCheckResult {
    pub label: String,
    pub bus_rating_amps: f64,
    pub voltage: f64,
    pub phase: SystemPhase,
    pub circuit_count: usize,
    /// Poles occupied by all circuits
    pub pole_count: u32,
    pub connected_load_va: f64,
    pub capacity_va: f64,
    pub utilization_percent: f64,
    /// Load that can be added before reaching the utilization limit (VA)
    pub spare_capacity_va: f64,
    pub compliant: bool,
    pub citations: Vec<Citation>,
    pub warnings: Vec<ComplianceWarning>,
}

/// Check a panelboard's loading and occupied poles.
///
/// # Errors
///
/// `InvalidInput` for a non-positive bus rating or voltage, or an invalid circuit.
pub fn check_panel_capacity(input: &PanelInput, settings: &ProjectElectricalSettings) -> CalcResult<PanelCheckResult> {
    require_positive("bus_rating_amps", input.bus_rating_amps)?;
    let voltage = input.voltage.unwrap_or(settings.service_voltage);
    require_positive("voltage", voltage)?;
    let phase = input.phase.unwrap_or(settings.service_phase);
    for circuit in &input.circuits {
        circuit.validate()?;
    }

    let connected: f64 = input.circuits.iter().map(|c| c.load_watts).sum();
    let capacity = match phase {
        SystemPhase::Single => input.bus_rating_amps * voltage,
        SystemPhase::Three => input.bus_rating_amps * voltage * 3.0_f64.sqrt(),
    };
    let utilization = connected / capacity * 100.0;
    let spare = (capacity * MAX_UTILIZATION_PERCENT / 100.0 - connected).max(0.0);

    let mut findings = Findings::new();
    findings.cite(nec_ref::PANEL_LOADING, format!("Bus loading limited to {:.0}%", MAX_UTILIZATION_PERCENT));
    findings.cite(nec_ref::PANEL_CIRCUITS, format!("Not more than {} overcurrent device poles", MAX_POLES));

    let pole_count: u32 = input.circuits.iter().map(|c| u32::from(c.pole_count)).sum();
    if pole_count > MAX_POLES {
        findings.warn(
            Severity::Critical,
            format!("Exceeds {} pole maximum: {} poles", MAX_POLES, pole_count),
            Some(nec_ref::PANEL_CIRCUITS),
        );
    }
    if utilization > MAX_UTILIZATION_PERCENT {
        findings.warn(
            Severity::Critical,
            format!("Exceeds {:.0}% continuous load limit: {:.1}%", MAX_UTILIZATION_PERCENT, utilization),
            Some(nec_ref::PANEL_LOADING),
        );
    }

    let compliant = !findings.has_critical();
    let (citations, warnings) = findings.into_parts();
    Ok(PanelCheckResult {
        label: input.label.clone(),
        bus_rating_amps: input.bus_rating_amps,
        voltage,
        phase,
        circuit_count: input.circuits.len(),
        pole_count,
        connected_load_va: connected,
        capacity_va: capacity,
        utilization_percent: utilization,
        spare_capacity_va: spare,
        compliant,
        citations,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loads::LoadCategory;

    fn panel(bus: f64, loads: &[f64]) -> PanelInput {
        panel_with_poles(bus, loads, 1)
    }

    fn panel_with_poles(bus: f64, loads: &[f64], poles: u8) -> PanelInput {
        PanelInput {
            label: "LP-1".to_string(),
            bus_rating_amps: bus,
            voltage: None,
            phase: None,
            circuits: loads
                .iter()
                .enumerate()
                .map(|(i, w)| CircuitLoad::new(i.to_string(), "", *w, LoadCategory::Other, poles, i as u32 * 2 + 1))
                .collect(),
        }
    }

    #[test]
    fn test_single_phase_utilization() {
        // 100 A × 240 V = 24 000 VA
        let result = check_panel_capacity(&panel(100.0, &[6000.0, 6000.0]), &ProjectElectricalSettings::default()).unwrap();
        assert_eq!(result.capacity_va, 24_000.0);
        assert_eq!(result.utilization_percent, 50.0);
        assert_eq!(result.spare_capacity_va, 7200.0);
        assert!(result.compliant);
    }

    #[test]
    fn test_over_80_percent() {
        let result = check_panel_capacity(&panel(100.0, &[10_000.0, 10_000.0]), &ProjectElectricalSettings::default()).unwrap();
        assert!(!result.compliant);
        assert_eq!(result.spare_capacity_va, 0.0);
        assert!(result.warnings.iter().any(|w| w.code_ref.as_deref() == Some(nec_ref::PANEL_LOADING)));
    }

    #[test]
    fn test_pole_limit() {
        let loads = vec![100.0; 43];
        let result = check_panel_capacity(&panel(225.0, &loads), &ProjectElectricalSettings::default()).unwrap();
        assert_eq!(result.pole_count, 43);
        assert!(!result.compliant);
        assert!(result.warnings.iter().any(|w| w.code_ref.as_deref() == Some(nec_ref::PANEL_CIRCUITS)));

        let loads = vec![100.0; 42];
        let result = check_panel_capacity(&panel(225.0, &loads), &ProjectElectricalSettings::default()).unwrap();
        assert!(result.compliant);
    }

    #[test]
    fn test_multi_pole_circuits_count_every_pole() {
        // 30 two-pole circuits occupy 60 spaces
        let loads = vec![100.0; 30];
        let result = check_panel_capacity(&panel_with_poles(400.0, &loads, 2), &ProjectElectricalSettings::default()).unwrap();
        assert_eq!(result.circuit_count, 30);
        assert_eq!(result.pole_count, 60);
        assert!(!result.compliant);
        assert!(result.warnings.iter().any(|w| w.code_ref.as_deref() == Some(nec_ref::PANEL_CIRCUITS)));
    }

    #[test]
    fn test_three_phase_capacity() {
        let settings = ProjectElectricalSettings::three_phase(208.0);
        let result = check_panel_capacity(&panel(225.0, &[]), &settings).unwrap();
        assert!((result.capacity_va - 81_060.0).abs() < 0.1);
        assert_eq!(result.utilization_percent, 0.0);
    }

    #[test]
    fn test_invalid_bus() {
        assert!(check_panel_capacity(&panel(0.0, &[]), &ProjectElectricalSettings::default()).is_err());
    }
}
