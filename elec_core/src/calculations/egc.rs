//! # Equipment Grounding Conductor Sizing
//!
//! Sizes the EGC from the rating of the overcurrent device ahead of the
//! circuit (NEC Table 250.122), then applies the proportional increase of
//! NEC 250.122(B) when the phase conductors were upsized.
//!
//! ## Proportional Increase
//!
//! ```text
//! ratio      = cmil(actual phase) / cmil(typical phase for the OCPD)
//! EGC target = cmil(table EGC) × ratio   → rounded up to a standard size
//! ```
//!
//! The result is never smaller than the table size and never larger than
//! the phase conductor (NEC 250.122(A)).
//!
//! ## Example
//!
//! ```rust
//! use elec_core::calculations::egc::size_egc;
//! use elec_core::tables::{ConductorMaterial, ConductorSize};
//!
//! // 100 A circuit: table EGC 8 AWG, typical phase 3 AWG, actual phase 1/0
//! let result = size_egc(100.0, ConductorSize::Awg1_0, ConductorMaterial::Copper, true).unwrap();
//! assert_eq!(result.base_size, ConductorSize::Awg8);
//! assert_eq!(result.egc_size, ConductorSize::Awg4);
//! ```

use serde::{Deserialize, Serialize};

use crate::compliance::{nec_ref, Citation, ComplianceWarning, Findings, Severity};
use crate::errors::{require_positive, CalcError, CalcResult};
use crate::tables::grounding::{egc_table_limit, egc_table_size, typical_phase_conductor};
use crate::tables::{ConductorMaterial, ConductorSize};

/// Input for a standalone EGC calculation.
///
/// ## JSON Example
///
/// ```json
/// { "label": "Feeder F-2", "ocpd_amps": 100.0, "phase_conductor": "1/0 AWG",
///   "material": "Cu", "evaluate_upsizing": true }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EgcInput {
    #[serde(default)]
    pub label: String,
    /// Rating of the OCPD ahead of the circuit (A)
    pub ocpd_amps: f64,
    /// Installed phase conductor size
    pub phase_conductor: ConductorSize,
    /// EGC material; project default when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<ConductorMaterial>,
    /// Apply the 250.122(B) proportional increase
    #[serde(default = "default_true")]
    pub evaluate_upsizing: bool,
}

fn default_true() -> bool {
    true
}

/// Result of EGC sizing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EgcResult {
    pub ocpd_amps: f64,
    pub material: ConductorMaterial,
    /// Table 250.122 minimum
    pub base_size: ConductorSize,
    /// Final EGC size
    pub egc_size: ConductorSize,
    pub phase_conductor: ConductorSize,
    /// Typical phase conductor for the OCPD, when the rating is catalogued
    pub typical_phase_conductor: Option<ConductorSize>,
    /// cmil ratio applied by the proportional rule
    pub upsizing_ratio: Option<f64>,
    pub upsized: bool,
    pub citations: Vec<Citation>,
    pub warnings: Vec<ComplianceWarning>,
}

/// Table 250.122 minimum EGC for an OCPD rating.
///
/// # Errors
///
/// `InvalidInput` for a non-positive rating, `TableExhausted` above 4000 A.
pub fn egc_base_size(ocpd_amps: f64, material: ConductorMaterial) -> CalcResult<ConductorSize> {
    require_positive("ocpd_amps", ocpd_amps)?;
    egc_table_size(ocpd_amps, material).ok_or_else(|| {
        CalcError::table_exhausted(
            nec_ref::EGC_TABLE,
            format!("{} A", ocpd_amps),
            format!("{} A", egc_table_limit()),
        )
    })
}

/// Size the EGC for an OCPD and installed phase conductor.
pub fn size_egc(
    ocpd_amps: f64,
    phase_conductor: ConductorSize,
    material: ConductorMaterial,
    evaluate_upsizing: bool,
) -> CalcResult<EgcResult> {
    let base = egc_base_size(ocpd_amps, material)?;
    let mut findings = Findings::new();
    findings.cite(nec_ref::EGC_TABLE, format!("Minimum EGC for {} A OCPD", ocpd_amps));

    let typical = typical_phase_conductor(ocpd_amps, material);
    let mut egc = base;
    let mut ratio = None;

    if evaluate_upsizing {
        match typical {
            None => findings.warn(
                Severity::Info,
                format!(
                    "No typical phase conductor catalogued for {} A; proportional increase not evaluated",
                    ocpd_amps
                ),
                Some(nec_ref::EGC_PROPORTIONAL),
            ),
            Some(typical) if phase_conductor.circular_mils() > typical.circular_mils() => {
                let r = phase_conductor.circular_mils() / typical.circular_mils();
                let target = base.circular_mils() * r;
                let proportional = ConductorSize::smallest_with_area(target).unwrap_or(ConductorSize::largest());
                ratio = Some(r);
                if proportional > egc {
                    tracing::debug!(%base, %proportional, ratio = r, "EGC increased in proportion to phase conductor");
                    findings.warn(
                        Severity::Info,
                        format!(
                            "Phase conductor {} is larger than typical {}; EGC increased from {} to {}",
                            phase_conductor, typical, base, proportional
                        ),
                        Some(nec_ref::EGC_PROPORTIONAL),
                    );
                    findings.cite(nec_ref::EGC_PROPORTIONAL, "EGC increased in proportion to phase conductors");
                    egc = proportional;
                }
            }
            Some(_) => {}
        }
    }

    if egc > phase_conductor {
        if phase_conductor >= base {
            findings.cite(nec_ref::EGC_NOT_LARGER, "EGC not required to exceed the circuit conductors");
            egc = phase_conductor;
        } else {
            findings.warn(
                Severity::Warning,
                format!(
                    "Phase conductor {} is smaller than the {} minimum EGC for a {} A device; check the OCPD",
                    phase_conductor, base, ocpd_amps
                ),
                Some(nec_ref::EGC_TABLE),
            );
        }
    }

    let (citations, warnings) = findings.into_parts();
    Ok(EgcResult {
        ocpd_amps,
        material,
        base_size: base,
        egc_size: egc,
        phase_conductor,
        typical_phase_conductor: typical,
        upsizing_ratio: ratio,
        upsized: egc > base,
        citations,
        warnings,
    })
}

/// Run an [`EgcInput`] with a fallback material.
pub fn calculate(input: &EgcInput, default_material: ConductorMaterial) -> CalcResult<EgcResult> {
    size_egc(
        input.ocpd_amps,
        input.phase_conductor,
        input.material.unwrap_or(default_material),
        input.evaluate_upsizing,
    )
}
