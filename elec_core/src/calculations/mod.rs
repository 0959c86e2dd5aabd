//! # Electrical Calculations
//!
//! This module contains the sizing stages. Each calculation follows the
//! pattern:
//!
//! - `*Input` - Input parameters (JSON-serializable)
//! - `*Result` - Calculation results with citations and warnings
//! - `calculate(input, settings) -> Result<*Result, CalcError>` - Pure function
//!
//! ## Available Calculations
//!
//! - [`conductor`] - Phase conductor sizing with derating and termination limits
//! - [`egc`] - Equipment grounding conductor (NEC 250.122)
//! - [`breaker`] - Branch, service and motor breakers
//! - [`voltage_drop`] - K-constant voltage drop
//! - [`feeder`] - Feeder composition (design load, conductors, conduit, drop)
//! - [`panel`] - Panelboard loading and circuit count
//!
//! Demand-factor aggregation lives in [`crate::loads`] and is reachable from
//! a batch through [`CalculationItem::Demand`].
//!
//! ## Batches
//!
//! A [`CalculationBatch`] pairs project settings with a list of tagged
//! items. Each item is evaluated independently; one failing item does not
//! stop the others.
//!
//! ```json
//! {
//!   "settings": { "service_voltage": 208.0, "service_phase": 3 },
//!   "items": [
//!     { "type": "conductor", "label": "Branch 1", "load_amps": 16.0 },
//!     { "type": "motor_breaker", "label": "P-1", "fla": 28.0 }
//!   ]
//! }
//! ```

pub mod breaker;
pub mod conductor;
pub mod egc;
pub mod feeder;
pub mod panel;
pub mod voltage_drop;

use serde::{Deserialize, Serialize};

use crate::compliance::{has_critical, ComplianceWarning};
use crate::errors::{CalcError, CalcResult};
use crate::loads::demand::{self, DemandInput, DemandResult};
use crate::settings::ProjectElectricalSettings;

// Re-export commonly used types
pub use breaker::{
    size_breaker,
    size_motor_breaker,
    size_service_breaker,
    BreakerInput,
    BreakerResult,
    MotorBreakerInput,
    MotorType,
    ServiceBreakerInput,
};
pub use conductor::{size_conductor, ConductorSizingInput, SizingResult};
pub use egc::{egc_base_size, size_egc, EgcInput, EgcResult};
pub use feeder::{calculate_feeder_sizing, FeederInput, FeederLoad, FeederResult};
pub use panel::{check_panel_capacity, PanelCheckResult, PanelInput};
pub use voltage_drop::{calculate_voltage_drop, VoltageDropInput, VoltageDropResult};

/// Enum wrapper for all calculation inputs.
///
/// This allows storing heterogeneous calculations in a single collection
/// while keeping clean, tagged JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CalculationItem {
    /// Demand-factor aggregation of panel circuits
    Demand(DemandInput),
    /// Phase conductor sizing
    Conductor(ConductorSizingInput),
    /// Equipment grounding conductor
    Egc(EgcInput),
    /// Branch-circuit breaker
    Breaker(BreakerInput),
    /// Service main breaker
    ServiceBreaker(ServiceBreakerInput),
    /// Motor branch-circuit breaker
    MotorBreaker(MotorBreakerInput),
    /// Voltage drop check
    VoltageDrop(VoltageDropInput),
    /// Feeder composition
    Feeder(FeederInput),
    /// Panelboard capacity check
    Panel(PanelInput),
}

impl CalculationItem {
    /// Get the user-provided label for this calculation
    pub fn label(&self) -> &str {
        match self {
            CalculationItem::Demand(i) => &i.label,
            CalculationItem::Conductor(i) => &i.label,
            CalculationItem::Egc(i) => &i.label,
            CalculationItem::Breaker(i) => &i.label,
            CalculationItem::ServiceBreaker(i) => &i.label,
            CalculationItem::MotorBreaker(i) => &i.label,
            CalculationItem::VoltageDrop(i) => &i.label,
            CalculationItem::Feeder(i) => &i.label,
            CalculationItem::Panel(i) => &i.label,
        }
    }

    /// Get the calculation type as a string
    pub fn calc_type(&self) -> &'static str {
        match self {
            CalculationItem::Demand(_) => "demand",
            CalculationItem::Conductor(_) => "conductor",
            CalculationItem::Egc(_) => "egc",
            CalculationItem::Breaker(_) => "breaker",
            CalculationItem::ServiceBreaker(_) => "service_breaker",
            CalculationItem::MotorBreaker(_) => "motor_breaker",
            CalculationItem::VoltageDrop(_) => "voltage_drop",
            CalculationItem::Feeder(_) => "feeder",
            CalculationItem::Panel(_) => "panel",
        }
    }

    /// Run this calculation against project settings
    pub fn evaluate(&self, settings: &ProjectElectricalSettings) -> CalcResult<CalculationOutput> {
        let output = match self {
            CalculationItem::Demand(input) => CalculationOutput::Demand(demand::calculate(input, settings)?),
            CalculationItem::Conductor(input) => CalculationOutput::Conductor(conductor::calculate(input, settings)?),
            CalculationItem::Egc(input) => CalculationOutput::Egc(egc::calculate(input, settings.conductor_material)?),
            CalculationItem::Breaker(input) => CalculationOutput::Breaker(size_breaker(input, settings)?),
            CalculationItem::ServiceBreaker(input) => {
                let mut result = size_service_breaker(input.calculated_amps, settings)?;
                result.label = input.label.clone();
                CalculationOutput::Breaker(result)
            }
            CalculationItem::MotorBreaker(input) => {
                let mut result = size_motor_breaker(input.fla, settings, input.motor_type)?;
                result.label = input.label.clone();
                CalculationOutput::Breaker(result)
            }
            CalculationItem::VoltageDrop(input) => {
                CalculationOutput::VoltageDrop(voltage_drop::calculate(input, settings)?)
            }
            CalculationItem::Feeder(input) => CalculationOutput::Feeder(feeder::calculate(input, settings)?),
            CalculationItem::Panel(input) => CalculationOutput::Panel(check_panel_capacity(input, settings)?),
        };
        Ok(output)
    }
}

/// Enum wrapper for all calculation results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CalculationOutput {
    Demand(DemandResult),
    Conductor(SizingResult),
    Egc(EgcResult),
    Breaker(BreakerResult),
    VoltageDrop(VoltageDropResult),
    Feeder(FeederResult),
    Panel(PanelCheckResult),
}

impl CalculationOutput {
    /// Warnings attached to the result
    pub fn warnings(&self) -> &[ComplianceWarning] {
        match self {
            CalculationOutput::Demand(r) => &r.warnings,
            CalculationOutput::Conductor(r) => &r.warnings,
            CalculationOutput::Egc(r) => &r.warnings,
            CalculationOutput::Breaker(r) => &r.warnings,
            CalculationOutput::VoltageDrop(r) => &r.warnings,
            CalculationOutput::Feeder(r) => &r.warnings,
            CalculationOutput::Panel(r) => &r.warnings,
        }
    }

    pub fn has_critical(&self) -> bool {
        has_critical(self.warnings())
    }
}

/// Settings plus a list of calculations to run together.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CalculationBatch {
    #[serde(default)]
    pub settings: ProjectElectricalSettings,
    #[serde(default)]
    pub items: Vec<CalculationItem>,
}

/// Outcome of one batch item: a result or a structured error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchEntry {
    pub label: String,
    pub calc_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<CalculationOutput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<CalcError>,
}

impl BatchEntry {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Results of running a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub entries: Vec<BatchEntry>,
    pub succeeded: usize,
    pub failed: usize,
    /// Any successful result carries a critical warning
    pub has_critical: bool,
}

impl CalculationBatch {
    pub fn new(settings: ProjectElectricalSettings) -> Self {
        CalculationBatch { settings, items: Vec::new() }
    }

    /// Builder: append an item
    pub fn with_item(mut self, item: CalculationItem) -> Self {
        self.items.push(item);
        self
    }

    /// Parse a batch from JSON
    pub fn from_json(json: &str) -> CalcResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Evaluate every item independently, in order.
    ///
    /// Invalid settings fail the whole batch; item errors are recorded per entry.
    pub fn run(&self) -> CalcResult<BatchReport> {
        self.settings.validate()?;

        let entries: Vec<BatchEntry> = self
            .items
            .iter()
            .map(|item| {
                let outcome = item.evaluate(&self.settings);
                if let Err(err) = &outcome {
                    tracing::warn!(label = item.label(), calc_type = item.calc_type(), error = %err, "batch item failed");
                }
                let (result, error) = match outcome {
                    Ok(output) => (Some(output), None),
                    Err(err) => (None, Some(err)),
                };
                BatchEntry {
                    label: item.label().to_string(),
                    calc_type: item.calc_type().to_string(),
                    result,
                    error,
                }
            })
            .collect();

        let failed = entries.iter().filter(|e| !e.is_ok()).count();
        let has_critical = entries
            .iter()
            .filter_map(|e| e.result.as_ref())
            .any(CalculationOutput::has_critical);

        tracing::info!(items = entries.len(), failed, has_critical, "batch complete");

        Ok(BatchReport {
            succeeded: entries.len() - failed,
            failed,
            has_critical,
            entries,
        })
    }
}
