//! # Feeder Sizing
//!
//! Composes the sizing stages into a complete feeder: design load, phase
//! conductors and EGC, neutral, conduit estimate and voltage drop.
//!
//! ## Design Load
//!
//! | Load given as         | Design load                              | Section    |
//! |-----------------------|------------------------------------------|------------|
//! | Continuous / non-     | continuous × 1.25 + noncontinuous        | 215.2(A)(1)|
//! | Load items            | same, split by each item's duty flag     | 215.2(A)(1)|
//! | Transformer primary   | rated primary current × 1.25             | 450.3(B)   |
//!
//! The neutral is sized equal to the phase conductors. Voltage drop is
//! evaluated at the actual load current, not the 125% design current.
//!
//! ## Example
//!
//! ```rust
//! use elec_core::calculations::feeder::{calculate_feeder_sizing, FeederInput, FeederLoad};
//! use elec_core::settings::ProjectElectricalSettings;
//!
//! let input = FeederInput::new(
//!     "F-1",
//!     FeederLoad::Split { continuous_va: 30_000.0, noncontinuous_va: 20_000.0 },
//!     75.0,
//! );
//! let settings = ProjectElectricalSettings::three_phase(208.0);
//! let result = calculate_feeder_sizing(&input, &settings).unwrap();
//! assert_eq!(result.design_load_va, 57_500.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::compliance::{has_critical, nec_ref, Citation, ComplianceWarning, Findings, Severity};
use crate::errors::{require_non_negative, require_positive, CalcError, CalcResult};
use crate::loads::{split_continuous, LoadItem};
use crate::settings::{ProjectElectricalSettings, SystemPhase};
use crate::tables::conduit::estimate_trade_size;
use crate::tables::{ConductorSize, ConduitSize};
use crate::units::{single_phase_amps, three_phase_amps, KiloVoltAmps, VoltAmps};

use super::conductor::{size_conductor, ConductorSizingInput, SizingResult, CONTINUOUS_FACTOR};
use super::voltage_drop::{self, smallest_size_meeting_drop, VoltageDropResult, DEFAULT_LIMIT_PERCENT};

fn default_ambient() -> f64 {
    30.0
}

fn default_conductor_count() -> u32 {
    3
}

fn default_limit() -> f64 {
    DEFAULT_LIMIT_PERCENT
}

fn default_true() -> bool {
    true
}

/// How the feeder load is described
///
/// ## JSON Examples
///
/// ```json
/// { "kind": "split", "continuous_va": 30000.0, "noncontinuous_va": 20000.0 }
/// { "kind": "items", "items": [ { "id": "L1", "watts": 9000.0, "category": "lighting", "continuous": true } ] }
/// { "kind": "transformer", "kva": 75.0, "primary_voltage": 480.0 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeederLoad {
    /// Continuous and noncontinuous totals (VA)
    Split { continuous_va: f64, noncontinuous_va: f64 },
    /// Individual loads with duty flags
    Items { items: Vec<LoadItem> },
    /// Transformer primary feeder; primary voltage defaults to the service voltage
    Transformer {
        kva: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        primary_voltage: Option<f64>,
    },
}

/// Input for feeder sizing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeederInput {
    #[serde(default)]
    pub label: String,
    pub load: FeederLoad,
    /// One-way length (ft)
    pub length_ft: f64,
    #[serde(default = "default_ambient")]
    pub ambient_temp_c: f64,
    /// Current-carrying conductors in the raceway
    #[serde(default = "default_conductor_count")]
    pub conductor_count: u32,
    /// Run a neutral with the phase conductors
    #[serde(default = "default_true")]
    pub include_neutral: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ocpd_rating: Option<f64>,
    #[serde(default)]
    pub terminations_75c: bool,
    #[serde(default = "default_limit")]
    pub voltage_drop_limit_percent: f64,
}

impl FeederInput {
    pub fn new(label: impl Into<String>, load: FeederLoad, length_ft: f64) -> Self {
        FeederInput {
            label: label.into(),
            load,
            length_ft,
            ambient_temp_c: default_ambient(),
            conductor_count: default_conductor_count(),
            include_neutral: true,
            ocpd_rating: None,
            terminations_75c: false,
            voltage_drop_limit_percent: DEFAULT_LIMIT_PERCENT,
        }
    }

    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        require_non_negative("length_ft", self.length_ft)?;
        require_positive("voltage_drop_limit_percent", self.voltage_drop_limit_percent)?;
        match &self.load {
            FeederLoad::Split { continuous_va, noncontinuous_va } => {
                require_non_negative("continuous_va", *continuous_va)?;
                require_non_negative("noncontinuous_va", *noncontinuous_va)?;
            }
            FeederLoad::Items { items } => {
                if items.is_empty() {
                    return Err(CalcError::missing_field("load.items"));
                }
                for item in items {
                    item.validate()?;
                }
            }
            FeederLoad::Transformer { kva, primary_voltage } => {
                require_positive("kva", *kva)?;
                if let Some(volts) = primary_voltage {
                    require_positive("primary_voltage", *volts)?;
                }
            }
        }
        Ok(())
    }
}

/// Result of feeder sizing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeederResult {
    pub label: String,
    /// Connected load before the continuous factor (VA)
    pub connected_load_va: f64,
    /// Load used for conductor sizing (VA)
    pub design_load_va: f64,
    /// Actual load current (A)
    pub load_amps: f64,
    /// Design current for conductor sizing (A)
    pub design_amps: f64,
    pub voltage: f64,
    pub phase: SystemPhase,
    /// Phase conductor and EGC
    pub sizing: SizingResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neutral_size: Option<ConductorSize>,
    /// Conductors in the raceway, including neutral and EGC
    pub raceway_conductors: u32,
    /// `None` when the estimate exceeds 6" (parallel runs needed)
    pub conduit_size: Option<ConduitSize>,
    pub voltage_drop: VoltageDropResult,
    pub meets_voltage_drop: bool,
    /// Smallest size that would meet the drop limit, when the sized conductor does not
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommended_size_for_drop: Option<ConductorSize>,
    pub citations: Vec<Citation>,
    pub warnings: Vec<ComplianceWarning>,
}

impl FeederResult {
    pub fn has_critical(&self) -> bool {
        has_critical(&self.warnings)
    }
}

fn line_amps(load: VoltAmps, voltage: f64, phase: SystemPhase) -> f64 {
    match phase {
        SystemPhase::Single => single_phase_amps(load, voltage),
        SystemPhase::Three => three_phase_amps(load, voltage),
    }
}

/// Size a feeder from its load, length and the project settings.
///
/// # Errors
///
/// Input errors from validation (`MissingField` for an empty item list), and
/// `TableExhausted` when the design current exceeds every catalogued conductor.
pub fn calculate_feeder_sizing(input: &FeederInput, settings: &ProjectElectricalSettings) -> CalcResult<FeederResult> {
    input.validate()?;
    settings.validate()?;

    let phase = settings.service_phase;
    let mut findings = Findings::new();

    let (connected_va, design_va, voltage) = match &input.load {
        FeederLoad::Split { continuous_va, noncontinuous_va } => {
            findings.cite(nec_ref::FEEDER_CONTINUOUS, "Continuous load at 125%");
            (
                continuous_va + noncontinuous_va,
                continuous_va * CONTINUOUS_FACTOR + noncontinuous_va,
                settings.service_voltage,
            )
        }
        FeederLoad::Items { items } => {
            let (continuous, noncontinuous) = split_continuous(items)?;
            findings.cite(nec_ref::FEEDER_CONTINUOUS, "Continuous load at 125%");
            (continuous + noncontinuous, continuous * CONTINUOUS_FACTOR + noncontinuous, settings.service_voltage)
        }
        FeederLoad::Transformer { kva, primary_voltage } => {
            let va: VoltAmps = KiloVoltAmps(*kva).into();
            findings.cite(nec_ref::TRANSFORMER_PRIMARY, "Primary protection at 125% of rated current");
            (va.0, va.0 * CONTINUOUS_FACTOR, primary_voltage.unwrap_or(settings.service_voltage))
        }
    };
    findings.cite(nec_ref::FEEDER_LOAD, "Feeder load");

    let load_amps = line_amps(VoltAmps(connected_va), voltage, phase);
    let design_amps = line_amps(VoltAmps(design_va), voltage, phase);

    let conductor_input = ConductorSizingInput {
        label: input.label.clone(),
        load_amps: design_amps,
        ambient_temp_c: input.ambient_temp_c,
        conductor_count: input.conductor_count,
        continuous: false,
        ocpd_rating: input.ocpd_rating,
        terminations_75c: input.terminations_75c,
    };
    let sizing = size_conductor(&conductor_input, settings)?;
    findings.absorb(&sizing.citations, &sizing.warnings);
    let size = sizing.conductor_size;

    let neutral_size = input.include_neutral.then_some(size);
    if neutral_size.is_some() && phase == SystemPhase::Three {
        findings.warn(Severity::Info, "Neutral sized equal to the phase conductors", None);
    }

    let hots = match phase {
        SystemPhase::Single => 2,
        SystemPhase::Three => 3,
    };
    let raceway_conductors = hots + u32::from(input.include_neutral) + 1;
    let conduit_size = estimate_trade_size(size, raceway_conductors);
    findings.cite(nec_ref::CONDUIT_FILL, "Conduit trade size estimate");
    if conduit_size.is_none() {
        findings.warn(
            Severity::Warning,
            format!("{} conductors of {} exceed a 6\" conduit; use parallel runs", raceway_conductors, size),
            Some(nec_ref::CONDUIT_FILL),
        );
    }

    let limit = input.voltage_drop_limit_percent;
    let material = settings.conductor_material;
    let voltage_drop = voltage_drop::evaluate(
        size,
        material,
        input.length_ft,
        load_amps,
        voltage,
        phase,
        limit,
        nec_ref::VOLTAGE_DROP_FEEDER,
    )?;
    findings.absorb(&voltage_drop.citations, &voltage_drop.warnings);

    let recommended_size_for_drop = if voltage_drop.meets_limit {
        None
    } else {
        let recommended = smallest_size_meeting_drop(material, input.length_ft, load_amps, voltage, phase, limit)
            .map(|candidate| candidate.max(size));
        match recommended {
            Some(candidate) => findings.warn(
                Severity::Info,
                format!("{} {} would keep the drop within {}%", material, candidate, limit),
                Some(nec_ref::VOLTAGE_DROP_FEEDER),
            ),
            None => findings.warn(
                Severity::Warning,
                format!("No single conductor keeps the drop within {}%; use parallel runs", limit),
                Some(nec_ref::VOLTAGE_DROP_FEEDER),
            ),
        }
        recommended
    };

    tracing::debug!(
        label = %input.label,
        design_va,
        design_amps,
        %size,
        drop_percent = voltage_drop.voltage_drop_percent,
        "feeder sized"
    );

    let meets_voltage_drop = voltage_drop.meets_limit;
    let (citations, warnings) = findings.into_parts();
    Ok(FeederResult {
        label: input.label.clone(),
        connected_load_va: connected_va,
        design_load_va: design_va,
        load_amps,
        design_amps,
        voltage,
        phase,
        sizing,
        neutral_size,
        raceway_conductors,
        conduit_size,
        voltage_drop,
        meets_voltage_drop,
        recommended_size_for_drop,
        citations,
        warnings,
    })
}

/// Calculate from an input and project settings
pub fn calculate(input: &FeederInput, settings: &ProjectElectricalSettings) -> CalcResult<FeederResult> {
    calculate_feeder_sizing(input, settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loads::LoadCategory;

    fn split(continuous: f64, noncontinuous: f64) -> FeederLoad {
        FeederLoad::Split { continuous_va: continuous, noncontinuous_va: noncontinuous }
    }

    #[test]
    fn test_design_load() {
        let input = FeederInput::new("F-1", split(30_000.0, 20_000.0), 75.0);
        let result = calculate_feeder_sizing(&input, &ProjectElectricalSettings::three_phase(208.0)).unwrap();
        assert_eq!(result.design_load_va, 57_500.0);
        assert_eq!(result.connected_load_va, 50_000.0);
        assert!(result.design_amps > result.load_amps);
        assert_eq!(result.neutral_size, Some(result.sizing.conductor_size));
    }

    #[test]
    fn test_items_match_split() {
        let items = vec![
            LoadItem::new("L", 30_000.0, LoadCategory::Lighting, true),
            LoadItem::new("R", 20_000.0, LoadCategory::Receptacle, false),
        ];
        let settings = ProjectElectricalSettings::three_phase(208.0);
        let from_items =
            calculate_feeder_sizing(&FeederInput::new("F", FeederLoad::Items { items }, 75.0), &settings).unwrap();
        let from_split = calculate_feeder_sizing(&FeederInput::new("F", split(30_000.0, 20_000.0), 75.0), &settings).unwrap();
        assert_eq!(from_items.design_load_va, from_split.design_load_va);
        assert_eq!(from_items.sizing.conductor_size, from_split.sizing.conductor_size);
    }

    #[test]
    fn test_voltage_drop_uses_load_current() {
        let input = FeederInput::new("F-1", split(30_000.0, 20_000.0), 75.0);
        let result = calculate_feeder_sizing(&input, &ProjectElectricalSettings::three_phase(208.0)).unwrap();
        assert_eq!(result.voltage_drop.load_amps, result.load_amps);
        assert!(result.citations.iter().any(|c| c.section == nec_ref::VOLTAGE_DROP_FEEDER));
    }

    #[test]
    fn test_transformer_primary() {
        let input = FeederInput::new(
            "T-1 primary",
            FeederLoad::Transformer { kva: 75.0, primary_voltage: Some(480.0) },
            50.0,
        );
        let result = calculate_feeder_sizing(&input, &ProjectElectricalSettings::three_phase(480.0)).unwrap();
        // 75 kVA / (480 × √3) = 90.2 A; × 1.25 = 112.8 A
        assert!((result.load_amps - 90.21).abs() < 0.01);
        assert!((result.design_amps - 112.76).abs() < 0.01);
        assert!(result.citations.iter().any(|c| c.section == nec_ref::TRANSFORMER_PRIMARY));
    }

    #[test]
    fn test_long_run_recommends_larger_size() {
        let input = FeederInput::new("F-long", split(0.0, 9_600.0), 400.0);
        let result = calculate_feeder_sizing(&input, &ProjectElectricalSettings::default()).unwrap();
        assert!(!result.meets_voltage_drop);
        let recommended = result.recommended_size_for_drop.unwrap();
        assert!(recommended > result.sizing.conductor_size);
    }

    #[test]
    fn test_conduit_estimate() {
        let input = FeederInput::new("F-1", split(30_000.0, 20_000.0), 75.0);
        let result = calculate_feeder_sizing(&input, &ProjectElectricalSettings::three_phase(208.0)).unwrap();
        // 3 phases + neutral + EGC
        assert_eq!(result.raceway_conductors, 5);
        assert!(result.conduit_size.is_some());
    }

    #[test]
    fn test_invalid_load() {
        let input = FeederInput::new("bad", split(-1.0, 0.0), 10.0);
        assert!(calculate_feeder_sizing(&input, &ProjectElectricalSettings::default()).unwrap_err().is_input_error());
    }

    #[test]
    fn test_empty_items_is_missing_field() {
        let input = FeederInput::new("F-empty", FeederLoad::Items { items: Vec::new() }, 50.0);
        let err = calculate_feeder_sizing(&input, &ProjectElectricalSettings::default()).unwrap_err();
        assert_eq!(err, CalcError::missing_field("load.items"));
        assert_eq!(err.error_code(), "MISSING_FIELD");
        assert!(err.is_input_error());
    }

    #[test]
    fn test_load_json() {
        let json = r#"{ "label": "F-2", "length_ft": 120.0,
                        "load": { "kind": "transformer", "kva": 45.0 } }"#;
        let input: FeederInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.voltage_drop_limit_percent, 3.0);
        assert!(matches!(input.load, FeederLoad::Transformer { primary_voltage: None, .. }));
    }
}
