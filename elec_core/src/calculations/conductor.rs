//! # Conductor Sizing
//!
//! Resolves the smallest phase conductor that carries a load under the
//! installation's conditions of use, then sizes its EGC.
//!
//! ## Procedure
//!
//! 1. Required ampacity = load × 1.25 for continuous loads (NEC 210.19(A)(1))
//! 2. Derating = temperature correction × bundling adjustment
//! 3. Smallest size in the insulation column with ampacity × derating ≥ required
//! 4. Termination check: the termination-temperature column must also carry
//!    the required ampacity (NEC 110.14(C)(1))
//! 5. Small-conductor check: the circuit OCPD must not exceed the size's
//!    NEC 240.4(D) cap
//! 6. EGC from the OCPD and the final conductor (NEC 250.122)
//!
//! Steps 4 and 5 may force an upsize, after which both are checked again.
//! The loop is bounded by the number of standard sizes.
//!
//! ## Termination Column
//!
//! | Conductor    | Circuit ≤ 100 A       | Circuit > 100 A |
//! |--------------|-----------------------|-----------------|
//! | 14 - 1 AWG   | 60°C (75°C if listed) | 60°C (75°C if listed) |
//! | 1/0 and up   | 60°C (75°C if listed) | 75°C            |
//!
//! The termination column never exceeds the insulation rating.
//!
//! ## Example
//!
//! ```rust
//! use elec_core::calculations::conductor::{size_conductor, ConductorSizingInput};
//! use elec_core::settings::ProjectElectricalSettings;
//! use elec_core::tables::ConductorSize;
//!
//! let input = ConductorSizingInput::new(16.0);
//! let result = size_conductor(&input, &ProjectElectricalSettings::default()).unwrap();
//! assert_eq!(result.conductor_size, ConductorSize::Awg12);
//! assert!(result.adjusted_ampacity >= result.required_ampacity);
//! ```

use serde::{Deserialize, Serialize};

use crate::compliance::{nec_ref, Citation, ComplianceWarning, Findings, Severity};
use crate::errors::{require_non_negative, require_positive, CalcError, CalcResult};
use crate::settings::ProjectElectricalSettings;
use crate::tables::ampacity::{first_size_where, max_ampacity};
use crate::tables::conductors::SIZE_COUNT;
use crate::tables::ocpd::{next_standard_rating, within_small_conductor_cap};
use crate::tables::{
    bundling_adjustment, small_conductor_cap, table_ampacity, temperature_correction, ConductorMaterial,
    ConductorSize, InsulationRating,
};

use super::egc::size_egc;

/// Continuous loads are sized at 125% (NEC 210.19(A)(1), 215.2(A)(1))
pub const CONTINUOUS_FACTOR: f64 = 1.25;

/// Adjusted ampacity within this fraction of the requirement is reported as marginal
const MARGINAL_FRACTION: f64 = 0.05;

/// Circuits above this rating may use the 75°C column for 1/0 and larger
const TERMINATION_THRESHOLD_AMPS: f64 = 100.0;

fn default_ambient() -> f64 {
    30.0
}

fn default_conductor_count() -> u32 {
    3
}

/// Input for conductor sizing.
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "Branch 12",
///   "load_amps": 42.0,
///   "ambient_temp_c": 40.0,
///   "conductor_count": 6,
///   "continuous": true,
///   "ocpd_rating": 60.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConductorSizingInput {
    /// User label (e.g., "Branch 12")
    #[serde(default)]
    pub label: String,

    /// Load current (A)
    pub load_amps: f64,

    /// Ambient temperature (°C)
    #[serde(default = "default_ambient")]
    pub ambient_temp_c: f64,

    /// Current-carrying conductors in the raceway
    #[serde(default = "default_conductor_count")]
    pub conductor_count: u32,

    /// Load runs three hours or more
    #[serde(default)]
    pub continuous: bool,

    /// Explicit OCPD rating (A); next standard rating above the requirement when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ocpd_rating: Option<f64>,

    /// Equipment terminations are listed for 75°C
    #[serde(default)]
    pub terminations_75c: bool,
}

impl ConductorSizingInput {
    /// Input with default conditions of use (30°C, 3 conductors, noncontinuous)
    pub fn new(load_amps: f64) -> Self {
        ConductorSizingInput {
            label: String::new(),
            load_amps,
            ambient_temp_c: default_ambient(),
            conductor_count: default_conductor_count(),
            continuous: false,
            ocpd_rating: None,
            terminations_75c: false,
        }
    }

    pub fn continuous(mut self) -> Self {
        self.continuous = true;
        self
    }

    pub fn with_ambient(mut self, ambient_temp_c: f64) -> Self {
        self.ambient_temp_c = ambient_temp_c;
        self
    }

    pub fn with_conductor_count(mut self, count: u32) -> Self {
        self.conductor_count = count;
        self
    }

    pub fn with_ocpd(mut self, rating: f64) -> Self {
        self.ocpd_rating = Some(rating);
        self
    }

    pub fn with_75c_terminations(mut self) -> Self {
        self.terminations_75c = true;
        self
    }

    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        require_non_negative("load_amps", self.load_amps)?;
        if !self.ambient_temp_c.is_finite() {
            return Err(CalcError::invalid_input(
                "ambient_temp_c",
                self.ambient_temp_c.to_string(),
                "Ambient temperature must be a finite number",
            ));
        }
        if self.conductor_count == 0 {
            return Err(CalcError::invalid_input(
                "conductor_count",
                "0",
                "At least one current-carrying conductor is required",
            ));
        }
        if let Some(rating) = self.ocpd_rating {
            require_positive("ocpd_rating", rating)?;
        }
        Ok(())
    }

    /// Required ampacity after the continuous-load factor
    pub fn required_ampacity(&self) -> f64 {
        if self.continuous {
            self.load_amps * CONTINUOUS_FACTOR
        } else {
            self.load_amps
        }
    }
}

/// Result of conductor sizing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizingResult {
    pub label: String,
    pub conductor_size: ConductorSize,
    pub material: ConductorMaterial,
    pub insulation: InsulationRating,

    /// Load current as given (A)
    pub load_amps: f64,
    /// Load after the continuous factor (A)
    pub required_ampacity: f64,

    /// Table ampacity of the chosen size in the insulation column (A)
    pub base_ampacity: f64,
    pub temperature_factor: f64,
    pub bundling_factor: f64,
    /// Product of the correction and adjustment factors
    pub combined_derating: f64,
    /// Base ampacity × combined derating (A)
    pub adjusted_ampacity: f64,

    /// Termination column applied
    pub termination_rating: InsulationRating,
    /// Table ampacity of the chosen size in the termination column (A)
    pub termination_ampacity: f64,

    /// OCPD rating used for the small-conductor and EGC checks (A)
    pub ocpd_rating: f64,

    pub egc_size: ConductorSize,
    pub egc_upsized: bool,

    pub citations: Vec<Citation>,
    pub warnings: Vec<ComplianceWarning>,
}

impl SizingResult {
    /// Spare capacity of the adjusted ampacity over the requirement (%)
    pub fn margin_percent(&self) -> f64 {
        if self.required_ampacity <= 0.0 {
            return 100.0;
        }
        (self.adjusted_ampacity - self.required_ampacity) / self.required_ampacity * 100.0
    }
}

/// Termination column for a conductor on a circuit of `circuit_amps`
pub fn termination_rating(
    size: ConductorSize,
    circuit_amps: f64,
    terminations_75c: bool,
    insulation: InsulationRating,
) -> InsulationRating {
    let column = if terminations_75c || (!size.is_small() && circuit_amps > TERMINATION_THRESHOLD_AMPS) {
        InsulationRating::C75
    } else {
        InsulationRating::C60
    };
    column.min(insulation)
}

/// Size a phase conductor and its EGC.
///
/// # Errors
///
/// - `InvalidInput` for negative load, zero conductor count, an ambient
///   temperature outside the correction table, or invalid settings
/// - `TableExhausted` when no catalogued conductor carries the requirement
pub fn size_conductor(input: &ConductorSizingInput, settings: &ProjectElectricalSettings) -> CalcResult<SizingResult> {
    input.validate()?;
    settings.validate()?;

    let material = settings.conductor_material;
    let insulation = settings.insulation_temp_rating;
    let required = input.required_ampacity();
    let mut findings = Findings::new();

    if input.continuous {
        findings.cite(nec_ref::BRANCH_CONTINUOUS, "Continuous load sized at 125%");
    }

    let temperature_factor = temperature_correction(input.ambient_temp_c, insulation)?;
    let bundling_factor = bundling_adjustment(input.conductor_count)?;
    let derating = temperature_factor * bundling_factor;

    findings.cite(nec_ref::AMPACITY_TABLE, format!("{} {} ampacity", material, insulation.display_name()));
    if temperature_factor < 1.0 {
        findings.cite(
            nec_ref::TEMPERATURE_CORRECTION,
            format!("Ambient {}°C correction {:.2}", input.ambient_temp_c, temperature_factor),
        );
    }
    if bundling_factor < 1.0 {
        findings.cite(
            nec_ref::BUNDLING_ADJUSTMENT,
            format!("{} current-carrying conductors adjustment {:.2}", input.conductor_count, bundling_factor),
        );
    }

    let exhausted = || {
        CalcError::table_exhausted(
            nec_ref::AMPACITY_TABLE,
            format!("{:.1} A (derating {:.2})", required, derating),
            format!("{} A", max_ampacity(material, insulation)),
        )
    };

    let (mut size, _) = first_size_where(ConductorSize::smallest(), material, insulation, |ampacity| {
        ampacity * derating >= required
    })
    .ok_or_else(exhausted)?;

    let ocpd = match input.ocpd_rating {
        Some(rating) => rating,
        None => next_standard_rating(required).map(f64::from).unwrap_or(required),
    };

    let terminations_ok = |size: ConductorSize| {
        let column = termination_rating(size, ocpd, input.terminations_75c, insulation);
        table_ampacity(size, material, column).map_or(false, |ampacity| ampacity >= required)
    };

    // Fixed point over the ordered size list: each pass either accepts the
    // size or moves strictly upward.
    let mut resolved = false;
    for _ in 0..SIZE_COUNT {
        if !terminations_ok(size) {
            let column = termination_rating(size, ocpd, input.terminations_75c, insulation);
            let upsized = size.and_larger().find(|s| terminations_ok(*s)).ok_or_else(exhausted)?;
            tracing::debug!(from = %size, to = %upsized, ?column, "termination temperature forced upsize");
            findings.warn(
                Severity::Warning,
                format!(
                    "{} rated for {:.0} A in the {} termination column; upsized to {}",
                    size,
                    table_ampacity(size, material, column).unwrap_or(0.0),
                    column.display_name(),
                    upsized
                ),
                Some(nec_ref::TERMINATION_TEMPERATURE),
            );
            findings.cite(nec_ref::TERMINATION_TEMPERATURE, "Termination temperature limits ampacity");
            size = upsized;
            continue;
        }

        if !within_small_conductor_cap(size, material, ocpd) {
            let upsized = size
                .and_larger()
                .find(|s| within_small_conductor_cap(*s, material, ocpd))
                .ok_or_else(exhausted)?;
            tracing::debug!(from = %size, to = %upsized, ocpd, "small-conductor OCPD cap forced upsize");
            findings.warn(
                Severity::Warning,
                format!(
                    "{} is limited to {:.0} A overcurrent protection; upsized to {} for a {:.0} A device",
                    size,
                    small_conductor_cap(size, material).unwrap_or(0.0),
                    upsized,
                    ocpd
                ),
                Some(nec_ref::SMALL_CONDUCTOR),
            );
            findings.cite(nec_ref::SMALL_CONDUCTOR, "Small-conductor overcurrent protection limit");
            size = upsized;
            continue;
        }

        resolved = true;
        break;
    }

    if !resolved {
        return Err(CalcError::Internal {
            message: format!("conductor resize did not settle within {} steps", SIZE_COUNT),
        });
    }

    let base_ampacity = table_ampacity(size, material, insulation).ok_or_else(exhausted)?;
    let adjusted_ampacity = base_ampacity * derating;
    let termination = termination_rating(size, ocpd, input.terminations_75c, insulation);
    let termination_ampacity = table_ampacity(size, material, termination).unwrap_or(0.0);

    if required > 0.0 && adjusted_ampacity < required * (1.0 + MARGINAL_FRACTION) {
        findings.warn(
            Severity::Info,
            format!(
                "Adjusted ampacity {:.1} A is within {:.0}% of the required {:.1} A",
                adjusted_ampacity,
                MARGINAL_FRACTION * 100.0,
                required
            ),
            Some(nec_ref::AMPACITY_TABLE),
        );
    }

    let egc = size_egc(ocpd, size, material, true)?;
    findings.absorb(&egc.citations, &egc.warnings);

    tracing::debug!(label = %input.label, %size, required, adjusted_ampacity, "conductor sized");

    let (citations, warnings) = findings.into_parts();
    Ok(SizingResult {
        label: input.label.clone(),
        conductor_size: size,
        material,
        insulation,
        load_amps: input.load_amps,
        required_ampacity: required,
        base_ampacity,
        temperature_factor,
        bundling_factor,
        combined_derating: derating,
        adjusted_ampacity,
        termination_rating: termination,
        termination_ampacity,
        ocpd_rating: ocpd,
        egc_size: egc.egc_size,
        egc_upsized: egc.upsized,
        citations,
        warnings,
    })
}

/// Calculate from an input and project settings
pub fn calculate(input: &ConductorSizingInput, settings: &ProjectElectricalSettings) -> CalcResult<SizingResult> {
    size_conductor(input, settings)
}
