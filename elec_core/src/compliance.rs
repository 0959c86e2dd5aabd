//! # Compliance Findings and Code References
//!
//! Every calculation stage returns the rule citations that justify its result
//! and a list of warnings. Warnings are data, never errors: a breaker that is
//! larger than its conductor's ampacity is a `Critical` warning on a complete
//! result so the caller can still display the best-effort sizing.
//!
//! ## Severity Summary
//!
//! | Severity   | Meaning                                                      |
//! |------------|--------------------------------------------------------------|
//! | `Info`     | Informational; a rule was applied or a margin is tight       |
//! | `Warning`  | A constraint forced a resize or a simplification was applied |
//! | `Critical` | The result violates a rule and must not be installed as-is   |

use serde::{Deserialize, Serialize};

// ============================================================================
// NEC Section References
// ============================================================================

/// NEC section references used by the engine.
///
/// One edition of the code is active at a time; these strings are the 2023
/// edition numbering.
pub mod nec_ref {
    // Demand factors
    /// General lighting demand factors
    pub const LIGHTING_DEMAND: &str = "NEC 220.42";
    /// Receptacle loads, nondwelling
    pub const RECEPTACLE_DEMAND: &str = "NEC 220.44";
    /// Motor loads, 125% of largest motor
    pub const MOTOR_LARGEST: &str = "NEC 430.24";
    /// Household clothes dryer demand factors
    pub const DRYER_DEMAND: &str = "NEC 220.54";
    /// Commercial kitchen equipment demand factors
    pub const KITCHEN_DEMAND: &str = "NEC 220.56";
    /// Fastened-in-place appliances, four or more
    pub const APPLIANCE_DEMAND: &str = "NEC 220.53";
    /// Noncoincident loads
    pub const NONCOINCIDENT: &str = "NEC 220.60";
    /// Feeder and service load calculation
    pub const FEEDER_LOAD: &str = "NEC 220.40";

    // Conductors
    /// Conductor ampacity table
    pub const AMPACITY_TABLE: &str = "NEC Table 310.16";
    /// Ambient temperature correction factors
    pub const TEMPERATURE_CORRECTION: &str = "NEC Table 310.15(B)(1)";
    /// Adjustment factors for more than three current-carrying conductors
    pub const BUNDLING_ADJUSTMENT: &str = "NEC Table 310.15(C)(1)";
    /// Termination temperature limitations
    pub const TERMINATION_TEMPERATURE: &str = "NEC 110.14(C)(1)";
    /// Small conductor overcurrent protection
    pub const SMALL_CONDUCTOR: &str = "NEC 240.4(D)";
    /// Branch-circuit conductor sizing for continuous loads
    pub const BRANCH_CONTINUOUS: &str = "NEC 210.19(A)(1)";
    /// Feeder conductor sizing for continuous loads
    pub const FEEDER_CONTINUOUS: &str = "NEC 215.2(A)(1)";

    // Grounding
    /// Minimum size equipment grounding conductors
    pub const EGC_TABLE: &str = "NEC Table 250.122";
    /// Proportional EGC increase when phase conductors are upsized
    pub const EGC_PROPORTIONAL: &str = "NEC 250.122(B)";
    /// EGC not required to be larger than circuit conductors
    pub const EGC_NOT_LARGER: &str = "NEC 250.122(A)";

    // Overcurrent protection
    /// Standard ampere ratings
    pub const STANDARD_RATINGS: &str = "NEC 240.6(A)";
    /// Protection of conductors
    pub const CONDUCTOR_PROTECTION: &str = "NEC 240.4";
    /// Branch-circuit OCPD for continuous loads
    pub const OCPD_CONTINUOUS: &str = "NEC 210.20(A)";
    /// Motor branch-circuit short-circuit and ground-fault protection
    pub const MOTOR_OCPD: &str = "NEC 430.52(C)(1)";
    /// Motor OCPD maximum where the initial setting will not carry the start
    pub const MOTOR_OCPD_MAX: &str = "NEC 430.52(C)(1) Exception No. 2";
    /// Service rating, one-family dwelling
    pub const SERVICE_DWELLING: &str = "NEC 230.79(C)";
    /// Service rating, all others
    pub const SERVICE_OTHER: &str = "NEC 230.79(D)";
    /// Ground-fault protection of equipment at services
    pub const SERVICE_GFP: &str = "NEC 230.95";
    /// Transformer primary protection
    pub const TRANSFORMER_PRIMARY: &str = "NEC 450.3(B)";

    // Voltage drop and raceways
    /// Branch-circuit voltage drop informational note
    pub const VOLTAGE_DROP_BRANCH: &str = "NEC 210.19(A) Informational Note No. 4";
    /// Feeder voltage drop informational note
    pub const VOLTAGE_DROP_FEEDER: &str = "NEC 215.2(A)(2) Informational Note No. 2";
    /// Conduit fill
    pub const CONDUIT_FILL: &str = "NEC Chapter 9, Table 1";

    // Panelboards
    /// Panelboard overcurrent protection and continuous loading
    pub const PANEL_LOADING: &str = "NEC 408.30";
    /// Panelboard circuit count (legacy 42-circuit limit)
    pub const PANEL_CIRCUITS: &str = "NEC 408.36";
}

/// Code edition the rule set is transcribed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CodeEdition {
    /// NFPA 70, 2023 edition
    #[default]
    #[serde(rename = "NEC2023")]
    Nec2023,
}

impl CodeEdition {
    /// Display name for reports
    pub fn display_name(&self) -> &'static str {
        match self {
            CodeEdition::Nec2023 => "NFPA 70 (NEC) 2023",
        }
    }
}

impl std::fmt::Display for CodeEdition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// A code citation justifying part of a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    /// Section reference (e.g., "NEC 240.4(D)")
    pub section: String,
    /// What the section was used for in this calculation
    pub description: String,
}

impl Citation {
    pub fn new(section: impl Into<String>, description: impl Into<String>) -> Self {
        Citation {
            section: section.into(),
            description: description.into(),
        }
    }
}

/// Severity of a compliance warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warning => "WARN",
            Severity::Critical => "CRITICAL",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A human-readable finding attached to a successful result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceWarning {
    pub severity: Severity,
    pub message: String,
    /// Section that produced the finding, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_ref: Option<String>,
}

impl std::fmt::Display for ComplianceWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.code_ref {
            Some(section) => write!(f, "[{}] {} ({})", self.severity, self.message, section),
            None => write!(f, "[{}] {}", self.severity, self.message),
        }
    }
}

/// Accumulator for citations and warnings while a stage runs.
///
/// Citations are de-duplicated by section and description so that
/// concatenating sub-stage findings does not repeat the same rule.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Findings {
    pub citations: Vec<Citation>,
    pub warnings: Vec<ComplianceWarning>,
}

impl Findings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a citation (ignored if already present)
    pub fn cite(&mut self, section: &str, description: impl Into<String>) {
        let citation = Citation::new(section, description);
        if !self.citations.contains(&citation) {
            self.citations.push(citation);
        }
    }

    /// Record a warning
    pub fn warn(&mut self, severity: Severity, message: impl Into<String>, code_ref: Option<&str>) {
        self.warnings.push(ComplianceWarning {
            severity,
            message: message.into(),
            code_ref: code_ref.map(str::to_string),
        });
    }

    /// Append another stage's citations and warnings, preserving order
    pub fn absorb(&mut self, citations: &[Citation], warnings: &[ComplianceWarning]) {
        for citation in citations {
            if !self.citations.contains(citation) {
                self.citations.push(citation.clone());
            }
        }
        self.warnings.extend(warnings.iter().cloned());
    }

    pub fn has_critical(&self) -> bool {
        has_critical(&self.warnings)
    }

    pub fn into_parts(self) -> (Vec<Citation>, Vec<ComplianceWarning>) {
        (self.citations, self.warnings)
    }
}

/// True if any warning is critical
pub fn has_critical(warnings: &[ComplianceWarning]) -> bool {
    warnings.iter().any(|w| w.severity == Severity::Critical)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_citations_deduplicated() {
        let mut findings = Findings::new();
        findings.cite(nec_ref::AMPACITY_TABLE, "Base ampacity");
        findings.cite(nec_ref::AMPACITY_TABLE, "Base ampacity");
        findings.cite(nec_ref::SMALL_CONDUCTOR, "Cap");
        assert_eq!(findings.citations.len(), 2);
    }

    #[test]
    fn test_absorb_keeps_order() {
        let mut a = Findings::new();
        a.warn(Severity::Info, "first", None);
        let mut b = Findings::new();
        b.cite(nec_ref::EGC_TABLE, "EGC");
        b.warn(Severity::Critical, "second", Some(nec_ref::CONDUCTOR_PROTECTION));
        a.absorb(&b.citations, &b.warnings);
        assert_eq!(a.warnings[0].message, "first");
        assert_eq!(a.warnings[1].message, "second");
        assert!(a.has_critical());
    }

    #[test]
    fn test_severity_serialization() {
        let json = serde_json::to_string(&Severity::Critical).unwrap();
        assert_eq!(json, "\"critical\"");
    }

    #[test]
    fn test_warning_display() {
        let w = ComplianceWarning {
            severity: Severity::Warning,
            message: "Upsized".to_string(),
            code_ref: Some(nec_ref::SMALL_CONDUCTOR.to_string()),
        };
        assert_eq!(w.to_string(), "[WARN] Upsized (NEC 240.4(D))");
    }
}
