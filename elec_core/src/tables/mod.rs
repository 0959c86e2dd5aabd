//! # Reference Tables
//!
//! Static NEC lookup data. Pure data, no sizing logic: each calculation
//! stage consults these tables and decides what to do with the values.
//!
//! | Module         | Source                                         |
//! |----------------|------------------------------------------------|
//! | [`conductors`] | Size list and circular mils (Chapter 9 Tbl 8)  |
//! | [`ampacity`]   | Table 310.16                                   |
//! | [`derating`]   | Tables 310.15(B)(1) and 310.15(C)(1)           |
//! | [`grounding`]  | Table 250.122 and typical phase conductors     |
//! | [`ocpd`]       | 240.6(A) standard ratings, 240.4(D) caps       |
//! | [`conduit`]    | Conduit trade size estimate                    |
//!
//! Tables are `const` data, shared freely across threads without locking.

pub mod ampacity;
pub mod conductors;
pub mod conduit;
pub mod derating;
pub mod grounding;
pub mod ocpd;

pub use ampacity::table_ampacity;
pub use conductors::{ConductorMaterial, ConductorSize, InsulationRating};
pub use conduit::ConduitSize;
pub use derating::{bundling_adjustment, temperature_correction};
pub use grounding::{egc_table_size, typical_phase_conductor};
pub use ocpd::{next_standard_rating, small_conductor_cap, STANDARD_RATINGS};
