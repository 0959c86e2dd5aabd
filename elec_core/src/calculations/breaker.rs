//! # Overcurrent Protective Device Sizing
//!
//! Branch-circuit, service and motor-circuit breaker selection from the
//! standard ampere ratings of NEC 240.6(A).
//!
//! | Breaker | Minimum rating                                | Section          |
//! |---------|-----------------------------------------------|------------------|
//! | Branch  | Load × 1.25 (continuous) or × 1.0             | 210.20(A)        |
//! | Service | Calculated load, not less than 100 A / 60 A   | 230.79(C), (D)   |
//! | Motor   | FLA × 250% / 175% / 150% by motor type        | 430.52(C)(1)     |
//!
//! A branch breaker checked against a supplied conductor is compatible only
//! if it does not exceed the conductor's termination-column ampacity or its
//! small-conductor cap. The next-size-up allowance of 240.4(B) is not
//! applied; an incompatible pair is reported as a critical warning on a
//! complete result.
//!
//! ## Example
//!
//! ```rust
//! use elec_core::calculations::breaker::{size_breaker, BreakerInput};
//! use elec_core::settings::ProjectElectricalSettings;
//! use elec_core::tables::ConductorSize;
//!
//! let input = BreakerInput::new(16.0).continuous().with_conductor(ConductorSize::Awg12);
//! let result = size_breaker(&input, &ProjectElectricalSettings::default()).unwrap();
//! assert_eq!(result.rating, 20);
//! assert!(result.is_compatible);
//! ```

use serde::{Deserialize, Serialize};

use crate::compliance::{has_critical, nec_ref, Citation, ComplianceWarning, Findings, Severity};
use crate::errors::{require_non_negative, require_positive, CalcError, CalcResult};
use crate::settings::{OccupancyClass, ProjectElectricalSettings, SystemPhase};
use crate::tables::ocpd::{largest_standard_rating, within_small_conductor_cap};
use crate::tables::{next_standard_rating, small_conductor_cap, table_ampacity, ConductorSize};

use super::conductor::{termination_rating, CONTINUOUS_FACTOR};

/// Highest voltage to ground served by a single-pole breaker on a 1φ system
const SINGLE_POLE_MAX_VOLTS: f64 = 150.0;

/// Service rating at which ground-fault protection of equipment applies (A)
const GFP_THRESHOLD_AMPS: u32 = 1000;

/// Motor breaker ceiling as a multiple of FLA (430.52(C)(1) Exception No. 2)
const MOTOR_MAX_MULTIPLIER: f64 = 4.0;

/// Which rule selected the breaker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakerKind {
    Branch,
    Service,
    Motor,
}

/// Motor type for the inverse-time breaker multiplier of NEC Table 430.52
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotorType {
    /// Squirrel-cage and synchronous motors
    #[default]
    Standard,
    /// Hermetic refrigerant motor-compressors
    Hermetic,
    /// Wound-rotor motors
    WoundRotor,
}

impl MotorType {
    pub const ALL: [MotorType; 3] = [MotorType::Standard, MotorType::Hermetic, MotorType::WoundRotor];

    /// Multiple of FLA for the maximum inverse-time breaker rating
    pub fn breaker_multiplier(&self) -> f64 {
        match self {
            MotorType::Standard => 2.5,
            MotorType::Hermetic => 1.75,
            MotorType::WoundRotor => 1.5,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            MotorType::Standard => "Standard",
            MotorType::Hermetic => "Hermetic",
            MotorType::WoundRotor => "Wound rotor",
        }
    }

    /// Parse from common string representations
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        match s.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "standard" | "squirrel_cage" | "induction" => Ok(MotorType::Standard),
            "hermetic" | "compressor" => Ok(MotorType::Hermetic),
            "wound_rotor" | "woundrotor" => Ok(MotorType::WoundRotor),
            _ => Err(CalcError::invalid_input(
                "motor_type",
                s,
                "Expected 'standard', 'hermetic' or 'wound_rotor'",
            )),
        }
    }
}

impl std::fmt::Display for MotorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Input for branch-circuit breaker sizing.
///
/// ## JSON Example
///
/// ```json
/// { "label": "Kitchen 3", "load_amps": 16.0, "continuous": true,
///   "conductor_size": "12 AWG", "circuit_voltage": 120.0 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakerInput {
    #[serde(default)]
    pub label: String,
    /// Load current (A)
    pub load_amps: f64,
    #[serde(default)]
    pub continuous: bool,
    /// Conductor to check the breaker against
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conductor_size: Option<ConductorSize>,
    /// Circuit voltage (V); the service voltage when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub circuit_voltage: Option<f64>,
    /// Equipment terminations are listed for 75°C
    #[serde(default)]
    pub terminations_75c: bool,
}

impl BreakerInput {
    pub fn new(load_amps: f64) -> Self {
        BreakerInput {
            label: String::new(),
            load_amps,
            continuous: false,
            conductor_size: None,
            circuit_voltage: None,
            terminations_75c: false,
        }
    }

    pub fn continuous(mut self) -> Self {
        self.continuous = true;
        self
    }

    pub fn with_conductor(mut self, size: ConductorSize) -> Self {
        self.conductor_size = Some(size);
        self
    }

    pub fn at_voltage(mut self, volts: f64) -> Self {
        self.circuit_voltage = Some(volts);
        self
    }

    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        require_non_negative("load_amps", self.load_amps)?;
        if let Some(volts) = self.circuit_voltage {
            require_positive("circuit_voltage", volts)?;
        }
        Ok(())
    }
}

/// Input for service breaker sizing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceBreakerInput {
    #[serde(default)]
    pub label: String,
    /// Calculated service load current (A)
    pub calculated_amps: f64,
}

/// Input for motor branch-circuit breaker sizing.
///
/// ## JSON Example
///
/// ```json
/// { "label": "P-1", "fla": 28.0, "motor_type": "standard" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotorBreakerInput {
    #[serde(default)]
    pub label: String,
    /// Motor full-load current (A)
    pub fla: f64,
    #[serde(default)]
    pub motor_type: MotorType,
}

/// Result of breaker sizing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakerResult {
    pub label: String,
    pub kind: BreakerKind,
    /// Minimum rating before rounding to a standard size (A)
    pub minimum_amps: f64,
    /// Selected standard rating (A)
    pub rating: u32,
    pub poles: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conductor_size: Option<ConductorSize>,
    /// Termination-column ampacity of the supplied conductor (A)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conductor_ampacity: Option<f64>,
    /// False when the breaker does not protect the supplied conductor
    pub is_compatible: bool,
    /// Ground-fault protection of equipment required (services only)
    #[serde(default)]
    pub ground_fault_protection: bool,
    pub citations: Vec<Citation>,
    pub warnings: Vec<ComplianceWarning>,
}

impl BreakerResult {
    pub fn has_critical(&self) -> bool {
        has_critical(&self.warnings)
    }
}

fn standard_rating_at_least(amps: f64) -> CalcResult<u32> {
    next_standard_rating(amps).ok_or_else(|| {
        CalcError::table_exhausted(
            nec_ref::STANDARD_RATINGS,
            format!("{:.1} A", amps),
            format!("{} A", largest_standard_rating()),
        )
    })
}

/// Pole count for a circuit at `circuit_voltage` on the project's system
pub fn pole_count(circuit_voltage: f64, settings: &ProjectElectricalSettings) -> u8 {
    match settings.service_phase {
        SystemPhase::Single => {
            if circuit_voltage <= SINGLE_POLE_MAX_VOLTS {
                1
            } else {
                2
            }
        }
        // Line-to-neutral loads take one pole, line-to-line loads three
        SystemPhase::Three => {
            if circuit_voltage <= settings.line_to_neutral_voltage() * 1.01 {
                1
            } else {
                3
            }
        }
    }
}

/// Size a branch-circuit breaker and check it against a supplied conductor.
pub fn size_breaker(input: &BreakerInput, settings: &ProjectElectricalSettings) -> CalcResult<BreakerResult> {
    input.validate()?;
    settings.validate()?;

    let mut findings = Findings::new();
    let minimum = if input.continuous {
        findings.cite(nec_ref::OCPD_CONTINUOUS, "Continuous load at 125%");
        input.load_amps * CONTINUOUS_FACTOR
    } else {
        input.load_amps
    };
    let rating = standard_rating_at_least(minimum)?;
    findings.cite(nec_ref::STANDARD_RATINGS, format!("Standard rating {} A", rating));

    let voltage = input.circuit_voltage.unwrap_or(settings.service_voltage);
    let poles = pole_count(voltage, settings);

    let mut is_compatible = true;
    let mut conductor_ampacity = None;

    if let Some(size) = input.conductor_size {
        let material = settings.conductor_material;
        let column = termination_rating(size, f64::from(rating), input.terminations_75c, settings.insulation_temp_rating);
        let ampacity = table_ampacity(size, material, column);
        conductor_ampacity = ampacity;
        findings.cite(nec_ref::CONDUCTOR_PROTECTION, "Conductor protected at its ampacity");

        match ampacity {
            None => {
                is_compatible = false;
                findings.warn(
                    Severity::Critical,
                    format!("{} {} has no listed ampacity", material, size),
                    Some(nec_ref::AMPACITY_TABLE),
                );
            }
            Some(ampacity) if f64::from(rating) > ampacity => {
                is_compatible = false;
                findings.warn(
                    Severity::Critical,
                    format!(
                        "{} A breaker exceeds {} ampacity of {:.0} A ({} column)",
                        rating,
                        size,
                        ampacity,
                        column.display_name()
                    ),
                    Some(nec_ref::CONDUCTOR_PROTECTION),
                );
            }
            Some(_) => {}
        }

        if !within_small_conductor_cap(size, material, f64::from(rating)) {
            is_compatible = false;
            findings.warn(
                Severity::Critical,
                format!(
                    "{} A breaker exceeds the {:.0} A limit for {} {}",
                    rating,
                    small_conductor_cap(size, material).unwrap_or(0.0),
                    material,
                    size
                ),
                Some(nec_ref::SMALL_CONDUCTOR),
            );
            findings.cite(nec_ref::SMALL_CONDUCTOR, "Small-conductor overcurrent protection limit");
        }

        if !is_compatible {
            tracing::debug!(rating, %size, "breaker incompatible with conductor");
        }
    }

    let (citations, warnings) = findings.into_parts();
    Ok(BreakerResult {
        label: input.label.clone(),
        kind: BreakerKind::Branch,
        minimum_amps: minimum,
        rating,
        poles,
        conductor_size: input.conductor_size,
        conductor_ampacity,
        is_compatible,
        ground_fault_protection: false,
        citations,
        warnings,
    })
}

/// Size the service main breaker from the calculated service current.
pub fn size_service_breaker(calculated_amps: f64, settings: &ProjectElectricalSettings) -> CalcResult<BreakerResult> {
    require_non_negative("calculated_amps", calculated_amps)?;
    settings.validate()?;

    let mut findings = Findings::new();
    let floor = settings.occupancy_class.minimum_service_amps();
    let minimum = calculated_amps.max(floor);
    if calculated_amps < floor {
        findings.warn(
            Severity::Info,
            format!(
                "Calculated {:.1} A is below the {:.0} A minimum for {}",
                calculated_amps,
                floor,
                settings.occupancy_class.display_name().to_lowercase()
            ),
            None,
        );
    }
    let section = match settings.occupancy_class {
        OccupancyClass::Dwelling => nec_ref::SERVICE_DWELLING,
        _ => nec_ref::SERVICE_OTHER,
    };
    findings.cite(section, format!("Minimum service rating {:.0} A", floor));

    let rating = standard_rating_at_least(minimum)?;
    findings.cite(nec_ref::STANDARD_RATINGS, format!("Standard rating {} A", rating));

    let poles = match settings.service_phase {
        SystemPhase::Single => 2,
        SystemPhase::Three => 3,
    };

    let gfp = rating >= GFP_THRESHOLD_AMPS
        && settings.service_phase == SystemPhase::Three
        && settings.line_to_neutral_voltage() > SINGLE_POLE_MAX_VOLTS;
    if gfp {
        findings.warn(
            Severity::Info,
            format!("Ground-fault protection of equipment required for a {} A wye service", rating),
            Some(nec_ref::SERVICE_GFP),
        );
        findings.cite(nec_ref::SERVICE_GFP, "Ground-fault protection of equipment");
    }

    let (citations, warnings) = findings.into_parts();
    Ok(BreakerResult {
        label: String::new(),
        kind: BreakerKind::Service,
        minimum_amps: minimum,
        rating,
        poles,
        conductor_size: None,
        conductor_ampacity: None,
        is_compatible: true,
        ground_fault_protection: gfp,
        citations,
        warnings,
    })
}

/// Size an inverse-time breaker for a motor branch circuit.
pub fn size_motor_breaker(
    fla: f64,
    settings: &ProjectElectricalSettings,
    motor_type: MotorType,
) -> CalcResult<BreakerResult> {
    require_positive("fla", fla)?;
    settings.validate()?;

    let mut findings = Findings::new();
    let minimum = fla * motor_type.breaker_multiplier();
    let rating = standard_rating_at_least(minimum)?;
    findings.cite(
        nec_ref::MOTOR_OCPD,
        format!("{} motor at {:.0}% of FLA", motor_type, motor_type.breaker_multiplier() * 100.0),
    );
    if f64::from(rating) > minimum {
        findings.cite(nec_ref::STANDARD_RATINGS, "Next standard size up permitted");
    }

    let ceiling = fla * MOTOR_MAX_MULTIPLIER;
    if f64::from(rating) > ceiling {
        findings.warn(
            Severity::Critical,
            format!("{} A breaker exceeds 400% of the {:.1} A full-load current ({:.1} A)", rating, fla, ceiling),
            Some(nec_ref::MOTOR_OCPD_MAX),
        );
    }

    let poles = pole_count(settings.service_voltage, settings);
    let (citations, warnings) = findings.into_parts();
    Ok(BreakerResult {
        label: String::new(),
        kind: BreakerKind::Motor,
        minimum_amps: minimum,
        rating,
        poles,
        conductor_size: None,
        conductor_ampacity: None,
        is_compatible: true,
        ground_fault_protection: false,
        citations,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> ProjectElectricalSettings {
        ProjectElectricalSettings::default()
    }

    #[test]
    fn test_branch_continuous() {
        let result = size_breaker(&BreakerInput::new(16.0).continuous(), &settings()).unwrap();
        assert_eq!(result.minimum_amps, 20.0);
        assert_eq!(result.rating, 20);
        assert_eq!(result.kind, BreakerKind::Branch);
    }

    #[test]
    fn test_branch_rounds_up() {
        let result = size_breaker(&BreakerInput::new(41.0), &settings()).unwrap();
        assert_eq!(result.rating, 45);
    }

    #[test]
    fn test_poles() {
        let s = settings();
        assert_eq!(pole_count(120.0, &s), 1);
        assert_eq!(pole_count(240.0, &s), 2);
        let three = ProjectElectricalSettings::three_phase(208.0);
        assert_eq!(pole_count(120.0, &three), 1);
        assert_eq!(pole_count(208.0, &three), 3);
        let high = ProjectElectricalSettings::three_phase(480.0);
        assert_eq!(pole_count(277.0, &high), 1);
    }

    #[test]
    fn test_breaker_exceeds_conductor() {
        // 12 AWG at 60°C terminations = 20 A; 30 A breaker is incompatible
        let input = BreakerInput::new(28.0).with_conductor(ConductorSize::Awg12);
        let result = size_breaker(&input, &settings()).unwrap();
        assert_eq!(result.rating, 30);
        assert!(!result.is_compatible);
        assert!(result.has_critical());
    }

    #[test]
    fn test_compatible_conductor() {
        let input = BreakerInput::new(25.0).with_conductor(ConductorSize::Awg10);
        let result = size_breaker(&input, &settings()).unwrap();
        assert!(result.is_compatible);
        assert_eq!(result.conductor_ampacity, Some(30.0));
        assert!(!result.has_critical());
    }

    #[test]
    fn test_small_conductor_cap_flags_incompatible() {
        // 14 AWG 90°C with 75°C terminations is 20 A in the table, but capped at 15 A
        let s = settings().with_insulation(crate::tables::InsulationRating::C90);
        let mut input = BreakerInput::new(18.0).with_conductor(ConductorSize::Awg14);
        input.terminations_75c = true;
        let result = size_breaker(&input, &s).unwrap();
        assert_eq!(result.rating, 20);
        assert!(!result.is_compatible);
        assert!(result.warnings.iter().any(|w| w.code_ref.as_deref() == Some(nec_ref::SMALL_CONDUCTOR)));
    }

    #[test]
    fn test_service_dwelling_minimum() {
        let result = size_service_breaker(62.0, &settings()).unwrap();
        assert_eq!(result.rating, 100);
        assert_eq!(result.poles, 2);
        assert!(result.citations.iter().any(|c| c.section == nec_ref::SERVICE_DWELLING));
    }

    #[test]
    fn test_service_commercial() {
        let mut s = ProjectElectricalSettings::three_phase(208.0);
        s.occupancy_class = OccupancyClass::Commercial;
        let result = size_service_breaker(40.0, &s).unwrap();
        assert_eq!(result.rating, 60);
        assert_eq!(result.poles, 3);
        assert!(!result.ground_fault_protection);
    }

    #[test]
    fn test_service_gfp() {
        let s = ProjectElectricalSettings::three_phase(480.0);
        let result = size_service_breaker(950.0, &s).unwrap();
        assert_eq!(result.rating, 1000);
        assert!(result.ground_fault_protection);

        // 208Y/120 is not over 150 V to ground
        let low = ProjectElectricalSettings::three_phase(208.0);
        assert!(!size_service_breaker(950.0, &low).unwrap().ground_fault_protection);
    }

    #[test]
    fn test_motor_multipliers() {
        let s = ProjectElectricalSettings::three_phase(480.0);
        let standard = size_motor_breaker(28.0, &s, MotorType::Standard).unwrap();
        assert_eq!(standard.minimum_amps, 70.0);
        assert_eq!(standard.rating, 70);
        assert_eq!(standard.poles, 3);

        let hermetic = size_motor_breaker(28.0, &s, MotorType::Hermetic).unwrap();
        assert_eq!(hermetic.rating, 50);

        let wound = size_motor_breaker(28.0, &s, MotorType::WoundRotor).unwrap();
        assert_eq!(wound.rating, 45);
    }

    #[test]
    fn test_small_motor_exceeds_400_percent() {
        // 2.5 × 3 A = 7.5 A → 15 A breaker, above 12 A
        let result = size_motor_breaker(3.0, &settings(), MotorType::Standard).unwrap();
        assert_eq!(result.rating, 15);
        assert!(result.has_critical());
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(size_breaker(&BreakerInput::new(-1.0), &settings()).is_err());
        assert!(size_motor_breaker(0.0, &settings(), MotorType::Standard).is_err());
        assert_eq!(
            size_breaker(&BreakerInput::new(7000.0), &settings()).unwrap_err().error_code(),
            "TABLE_EXHAUSTED"
        );
    }

    #[test]
    fn test_motor_type_parsing() {
        assert_eq!(MotorType::from_str_flexible("Wound-Rotor").unwrap(), MotorType::WoundRotor);
        assert_eq!(MotorType::from_str_flexible("hermetic").unwrap(), MotorType::Hermetic);
        assert!(MotorType::from_str_flexible("diesel").is_err());
    }
}
