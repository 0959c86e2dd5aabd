//! # Voltage Drop
//!
//! Approximate voltage drop using the conductor K constant:
//!
//! ```text
//! VD = K × L × I × m / cmil
//!
//! K = 12.9 Ω·cmil/ft (copper), 21.2 (aluminum)
//! m = 2 (single-phase), √3 (three-phase)
//! ```
//!
//! Compliance is judged on the percentage rounded to two decimals, so a
//! drop of exactly 3.00% meets a 3% limit and 3.01% does not. The NEC
//! recommendation (210.19(A) and 215.2(A) informational notes) is 3% for a
//! branch circuit or feeder alone.
//!
//! ## Example
//!
//! ```rust
//! use elec_core::calculations::voltage_drop::calculate_voltage_drop;
//! use elec_core::settings::SystemPhase;
//! use elec_core::tables::{ConductorMaterial, ConductorSize};
//!
//! let result = calculate_voltage_drop(
//!     ConductorSize::Awg10, ConductorMaterial::Copper, 100.0, 20.0, 240.0, SystemPhase::Single,
//! ).unwrap();
//! assert_eq!(result.voltage_drop_percent, 2.07);
//! assert!(result.meets_limit);
//! ```

use serde::{Deserialize, Serialize};

use crate::compliance::{nec_ref, Citation, ComplianceWarning, Findings, Severity};
use crate::errors::{require_non_negative, require_positive, CalcResult};
use crate::settings::{ProjectElectricalSettings, SystemPhase};
use crate::tables::{table_ampacity, ConductorMaterial, ConductorSize, InsulationRating};

/// Recommended maximum drop for a feeder or branch circuit alone (%)
pub const DEFAULT_LIMIT_PERCENT: f64 = 3.0;

/// Resistivity constant K (Ω·cmil/ft) at 75°C
pub fn k_constant(material: ConductorMaterial) -> f64 {
    match material {
        ConductorMaterial::Copper => 12.9,
        ConductorMaterial::Aluminum => 21.2,
    }
}

fn default_limit() -> f64 {
    DEFAULT_LIMIT_PERCENT
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Input for a standalone voltage-drop check.
///
/// ## JSON Example
///
/// ```json
/// { "label": "Branch 7", "conductor_size": "10 AWG", "material": "Cu",
///   "length_ft": 100.0, "load_amps": 20.0, "voltage": 240.0, "phase": 1 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoltageDropInput {
    #[serde(default)]
    pub label: String,
    pub conductor_size: ConductorSize,
    /// Project default when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<ConductorMaterial>,
    /// One-way length (ft)
    pub length_ft: f64,
    pub load_amps: f64,
    /// Service voltage when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voltage: Option<f64>,
    /// Service phase when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<SystemPhase>,
    #[serde(default = "default_limit")]
    pub limit_percent: f64,
}

/// Result of a voltage-drop calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoltageDropResult {
    pub conductor_size: ConductorSize,
    pub material: ConductorMaterial,
    pub length_ft: f64,
    pub load_amps: f64,
    pub voltage: f64,
    pub phase: SystemPhase,
    pub k_constant: f64,
    /// Drop in volts, rounded to 0.01 V
    pub voltage_drop_volts: f64,
    /// Drop as a percentage of voltage, rounded to 0.01%
    pub voltage_drop_percent: f64,
    pub limit_percent: f64,
    pub meets_limit: bool,
    /// Longest run that stays within the limit (ft); `None` at zero load
    pub max_length_ft: Option<f64>,
    pub citations: Vec<Citation>,
    pub warnings: Vec<ComplianceWarning>,
}

/// Raw voltage drop in volts, unrounded
pub fn voltage_drop_volts(
    size: ConductorSize,
    material: ConductorMaterial,
    length_ft: f64,
    load_amps: f64,
    phase: SystemPhase,
) -> f64 {
    k_constant(material) * length_ft * load_amps * phase.drop_multiplier() / size.circular_mils()
}

/// Voltage drop against the default 3% limit.
pub fn calculate_voltage_drop(
    size: ConductorSize,
    material: ConductorMaterial,
    length_ft: f64,
    load_amps: f64,
    voltage: f64,
    phase: SystemPhase,
) -> CalcResult<VoltageDropResult> {
    calculate_voltage_drop_with_limit(size, material, length_ft, load_amps, voltage, phase, DEFAULT_LIMIT_PERCENT)
}

/// Voltage drop against an explicit limit (%).
#[allow(clippy::too_many_arguments)]
pub fn calculate_voltage_drop_with_limit(
    size: ConductorSize,
    material: ConductorMaterial,
    length_ft: f64,
    load_amps: f64,
    voltage: f64,
    phase: SystemPhase,
    limit_percent: f64,
) -> CalcResult<VoltageDropResult> {
    evaluate(size, material, length_ft, load_amps, voltage, phase, limit_percent, nec_ref::VOLTAGE_DROP_BRANCH)
}

/// Shared evaluation; `code_ref` names the informational note that applies.
#[allow(clippy::too_many_arguments)]
pub(crate) fn evaluate(
    size: ConductorSize,
    material: ConductorMaterial,
    length_ft: f64,
    load_amps: f64,
    voltage: f64,
    phase: SystemPhase,
    limit_percent: f64,
    code_ref: &str,
) -> CalcResult<VoltageDropResult> {
    require_non_negative("length_ft", length_ft)?;
    require_non_negative("load_amps", load_amps)?;
    require_positive("voltage", voltage)?;
    require_positive("limit_percent", limit_percent)?;

    let k = k_constant(material);
    let drop = voltage_drop_volts(size, material, length_ft, load_amps, phase);
    let percent = round2(drop / voltage * 100.0);
    let meets_limit = percent <= limit_percent;

    let max_length_ft = if load_amps > 0.0 {
        Some(limit_percent / 100.0 * voltage * size.circular_mils() / (k * load_amps * phase.drop_multiplier()))
    } else {
        None
    };

    let mut findings = Findings::new();
    findings.cite(code_ref, format!("Recommended maximum {}% drop", limit_percent));
    if !meets_limit {
        findings.warn(
            Severity::Warning,
            format!(
                "Voltage drop {:.2}% exceeds {}% over {:.0} ft of {} {}",
                percent, limit_percent, length_ft, material, size
            ),
            Some(code_ref),
        );
    }

    tracing::trace!(%size, length_ft, load_amps, percent, "voltage drop");

    let (citations, warnings) = findings.into_parts();
    Ok(VoltageDropResult {
        conductor_size: size,
        material,
        length_ft,
        load_amps,
        voltage,
        phase,
        k_constant: k,
        voltage_drop_volts: round2(drop),
        voltage_drop_percent: percent,
        limit_percent,
        meets_limit,
        max_length_ft,
        citations,
        warnings,
    })
}

/// Smallest listed size keeping the drop within `limit_percent`.
///
/// Returns `None` when even the largest size exceeds the limit.
pub fn smallest_size_meeting_drop(
    material: ConductorMaterial,
    length_ft: f64,
    load_amps: f64,
    voltage: f64,
    phase: SystemPhase,
    limit_percent: f64,
) -> Option<ConductorSize> {
    ConductorSize::ALL
        .iter()
        .copied()
        .filter(|size| table_ampacity(*size, material, InsulationRating::C90).is_some())
        .find(|size| {
            let drop = voltage_drop_volts(*size, material, length_ft, load_amps, phase);
            round2(drop / voltage * 100.0) <= limit_percent
        })
}

/// Run a [`VoltageDropInput`] with project defaults for missing fields.
pub fn calculate(input: &VoltageDropInput, settings: &ProjectElectricalSettings) -> CalcResult<VoltageDropResult> {
    calculate_voltage_drop_with_limit(
        input.conductor_size,
        input.material.unwrap_or(settings.conductor_material),
        input.length_ft,
        input.load_amps,
        input.voltage.unwrap_or(settings.service_voltage),
        input.phase.unwrap_or(settings.service_phase),
        input.limit_percent,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const CU: ConductorMaterial = ConductorMaterial::Copper;

    fn length_for_percent(size: ConductorSize, percent: f64, amps: f64, volts: f64, phase: SystemPhase) -> f64 {
        percent / 100.0 * volts * size.circular_mils() / (k_constant(CU) * amps * phase.drop_multiplier())
    }

    #[test]
    fn test_single_phase_drop() {
        // 12.9 × 100 × 20 × 2 / 10380 = 4.97 V
        let result = calculate_voltage_drop(ConductorSize::Awg10, CU, 100.0, 20.0, 240.0, SystemPhase::Single).unwrap();
        assert_eq!(result.voltage_drop_volts, 4.97);
        assert_eq!(result.voltage_drop_percent, 2.07);
        assert!(result.meets_limit);
    }

    #[test]
    fn test_three_phase_multiplier() {
        let single = voltage_drop_volts(ConductorSize::Awg4, CU, 200.0, 50.0, SystemPhase::Single);
        let three = voltage_drop_volts(ConductorSize::Awg4, CU, 200.0, 50.0, SystemPhase::Three);
        assert!((three / single - 3.0_f64.sqrt() / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_aluminum_k() {
        assert_eq!(k_constant(ConductorMaterial::Aluminum), 21.2);
        let cu = voltage_drop_volts(ConductorSize::Awg2, CU, 150.0, 60.0, SystemPhase::Single);
        let al = voltage_drop_volts(ConductorSize::Awg2, ConductorMaterial::Aluminum, 150.0, 60.0, SystemPhase::Single);
        assert!(al > cu);
    }

    #[test]
    fn test_boundary_exactly_three_percent() {
        let size = ConductorSize::Awg6;
        let length = length_for_percent(size, 3.0, 40.0, 208.0, SystemPhase::Three);
        let result = calculate_voltage_drop(size, CU, length, 40.0, 208.0, SystemPhase::Three).unwrap();
        assert_eq!(result.voltage_drop_percent, 3.0);
        assert!(result.meets_limit);
    }

    #[test]
    fn test_boundary_just_over() {
        let size = ConductorSize::Awg6;
        let length = length_for_percent(size, 3.01, 40.0, 208.0, SystemPhase::Three);
        let result = calculate_voltage_drop(size, CU, length, 40.0, 208.0, SystemPhase::Three).unwrap();
        assert_eq!(result.voltage_drop_percent, 3.01);
        assert!(!result.meets_limit);
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_max_length() {
        let result = calculate_voltage_drop(ConductorSize::Awg10, CU, 100.0, 20.0, 240.0, SystemPhase::Single).unwrap();
        let max = result.max_length_ft.unwrap();
        // 0.03 × 240 × 10380 / (12.9 × 20 × 2)
        assert!((max - 144.84).abs() < 0.01);

        let zero = calculate_voltage_drop(ConductorSize::Awg10, CU, 100.0, 0.0, 240.0, SystemPhase::Single).unwrap();
        assert_eq!(zero.max_length_ft, None);
        assert_eq!(zero.voltage_drop_percent, 0.0);
    }

    #[test]
    fn test_smallest_size_meeting_drop() {
        // 200 ft at 30 A, 240 V single-phase: 8 AWG is 3.91%, 6 AWG is 2.46%
        let size = smallest_size_meeting_drop(CU, 200.0, 30.0, 240.0, SystemPhase::Single, 3.0);
        assert_eq!(size, Some(ConductorSize::Awg6));
        assert_eq!(smallest_size_meeting_drop(CU, 1.0e7, 500.0, 120.0, SystemPhase::Single, 3.0), None);
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(calculate_voltage_drop(ConductorSize::Awg10, CU, -1.0, 20.0, 240.0, SystemPhase::Single).is_err());
        assert!(calculate_voltage_drop(ConductorSize::Awg10, CU, 100.0, 20.0, 0.0, SystemPhase::Single).is_err());
    }

    #[test]
    fn test_input_defaults() {
        let input: VoltageDropInput =
            serde_json::from_str(r#"{ "conductor_size": "10", "length_ft": 100.0, "load_amps": 20.0 }"#).unwrap();
        assert_eq!(input.limit_percent, 3.0);
        let result = calculate(&input, &ProjectElectricalSettings::default()).unwrap();
        assert_eq!(result.voltage, 240.0);
        assert_eq!(result.phase, SystemPhase::Single);
    }
}
