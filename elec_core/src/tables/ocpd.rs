//! Overcurrent Protective Device Ratings
//!
//! - Standard ampere ratings for fuses and inverse-time breakers (NEC 240.6(A))
//! - Small-conductor overcurrent protection caps (NEC 240.4(D))

use crate::tables::conductors::{ConductorMaterial, ConductorSize};

/// Standard ampere ratings, ascending (NEC 240.6(A), 15 A and above)
pub const STANDARD_RATINGS: [u32; 37] = [
    15, 20, 25, 30, 35, 40, 45, 50, 60, 70, 80, 90, 100, 110, 125, 150, 175, 200, 225, 250, 300,
    350, 400, 450, 500, 600, 700, 800, 1000, 1200, 1600, 2000, 2500, 3000, 4000, 5000, 6000,
];

/// Smallest standard rating at or above `amps`.
///
/// Returns `None` when `amps` exceeds the largest standard rating.
pub fn next_standard_rating(amps: f64) -> Option<u32> {
    STANDARD_RATINGS.iter().copied().find(|r| f64::from(*r) >= amps)
}

pub fn largest_standard_rating() -> u32 {
    STANDARD_RATINGS[STANDARD_RATINGS.len() - 1]
}

/// Maximum OCPD rating permitted for small conductors (NEC 240.4(D)).
///
/// | Size   | Copper | Aluminum |
/// |--------|--------|----------|
/// | 14 AWG | 15 A   | n/a      |
/// | 12 AWG | 20 A   | 15 A     |
/// | 10 AWG | 30 A   | 25 A     |
pub fn small_conductor_cap(size: ConductorSize, material: ConductorMaterial) -> Option<f64> {
    match (material, size) {
        (ConductorMaterial::Copper, ConductorSize::Awg14) => Some(15.0),
        (ConductorMaterial::Copper, ConductorSize::Awg12) => Some(20.0),
        (ConductorMaterial::Copper, ConductorSize::Awg10) => Some(30.0),
        (ConductorMaterial::Aluminum, ConductorSize::Awg12) => Some(15.0),
        (ConductorMaterial::Aluminum, ConductorSize::Awg10) => Some(25.0),
        _ => None,
    }
}

/// True if a conductor may be protected at `ocpd_amps` under NEC 240.4(D)
pub fn within_small_conductor_cap(size: ConductorSize, material: ConductorMaterial, ocpd_amps: f64) -> bool {
    small_conductor_cap(size, material).map_or(true, |cap| ocpd_amps <= cap)
}
