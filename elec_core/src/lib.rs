//! # elec_core - Electrical Sizing & Demand Calculation Engine
//!
//! `elec_core` is the computational heart of Voltline, providing NEC sizing
//! calculations with a clean, JSON-friendly API. All inputs and outputs are
//! serializable, so a front end (the bundled CLI, a web service, an assistant
//! tool call) can pass plain data in and get plain results back.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input plus settings and return results
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types, not just strings
//! - **Auditable**: Every result carries the code citations that justify it
//!
//! ## Quick Start
//!
//! ```rust
//! use elec_core::calculations::conductor::{size_conductor, ConductorSizingInput};
//! use elec_core::settings::ProjectElectricalSettings;
//! use elec_core::tables::ConductorSize;
//!
//! let settings = ProjectElectricalSettings::default();
//! let result = size_conductor(&ConductorSizingInput::new(16.0), &settings).unwrap();
//! assert_eq!(result.conductor_size, ConductorSize::Awg12);
//! ```
//!
//! ## Modules
//!
//! - [`tables`] - NEC reference tables (ampacity, derating, EGC, OCPD, conduit)
//! - [`loads`] - Load items, circuits, phase assignment and demand factors
//! - [`calculations`] - Conductor, EGC, breaker, voltage drop, feeder and panel sizing
//! - [`compliance`] - Code references, citations and warnings
//! - [`settings`] - Project electrical settings
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod compliance;
pub mod errors;
pub mod loads;
pub mod settings;
pub mod tables;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculations::{BatchReport, CalculationBatch, CalculationItem, CalculationOutput};
pub use compliance::{Citation, CodeEdition, ComplianceWarning, Severity};
pub use errors::{CalcError, CalcResult};
pub use settings::{OccupancyClass, ProjectElectricalSettings, SystemPhase};
pub use tables::{ConductorMaterial, ConductorSize, InsulationRating};
