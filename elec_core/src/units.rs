//! # Unit Types
//!
//! Type-safe wrappers for electrical units. These provide compile-time
//! safety against unit confusion while remaining lightweight (just f64 wrappers).
//!
//! ## Design Philosophy
//!
//! We use simple newtype wrappers rather than a full units library because:
//! - Building electrical design uses a small, consistent set of units
//! - We want JSON serialization to be clean (just numbers)
//! - Minimal runtime overhead
//!
//! ## Example
//!
//! ```rust
//! use elec_core::units::{KiloVoltAmps, VoltAmps};
//!
//! let load = VoltAmps(57_500.0);
//! let kva: KiloVoltAmps = load.into();
//! assert_eq!(kva.0, 57.5);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul};

// ============================================================================
// Apparent Power
// ============================================================================

/// Apparent power in volt-amperes
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoltAmps(pub f64);

/// Apparent power in kilovolt-amperes
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KiloVoltAmps(pub f64);

impl From<VoltAmps> for KiloVoltAmps {
    fn from(va: VoltAmps) -> Self {
        KiloVoltAmps(va.0 / 1000.0)
    }
}

impl From<KiloVoltAmps> for VoltAmps {
    fn from(kva: KiloVoltAmps) -> Self {
        VoltAmps(kva.0 * 1000.0)
    }
}

impl Add for VoltAmps {
    type Output = VoltAmps;
    fn add(self, rhs: VoltAmps) -> VoltAmps {
        VoltAmps(self.0 + rhs.0)
    }
}

impl Mul<f64> for VoltAmps {
    type Output = VoltAmps;
    fn mul(self, rhs: f64) -> VoltAmps {
        VoltAmps(self.0 * rhs)
    }
}

impl std::iter::Sum for VoltAmps {
    fn sum<I: Iterator<Item = VoltAmps>>(iter: I) -> VoltAmps {
        iter.fold(VoltAmps(0.0), |acc, va| acc + va)
    }
}

// ============================================================================
// Current from Power
// ============================================================================

/// Line current for a load at `voltage` (single-phase: VA / V)
pub fn single_phase_amps(load: VoltAmps, voltage: f64) -> f64 {
    load.0 / voltage
}

/// Line current for a balanced load at line-to-line `voltage` (VA / (V × √3))
pub fn three_phase_amps(load: VoltAmps, voltage: f64) -> f64 {
    load.0 / (voltage * 3.0_f64.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_va_kva_conversion() {
        let kva: KiloVoltAmps = VoltAmps(12_500.0).into();
        assert_eq!(kva.0, 12.5);
        let va: VoltAmps = KiloVoltAmps(3.0).into();
        assert_eq!(va.0, 3000.0);
    }

    #[test]
    fn test_va_sum() {
        let total: VoltAmps = [VoltAmps(1000.0), VoltAmps(500.0)].into_iter().sum();
        assert_eq!(total, VoltAmps(1500.0));
        assert_eq!(VoltAmps(1000.0) * 1.25, VoltAmps(1250.0));
    }

    #[test]
    fn test_currents() {
        assert_eq!(single_phase_amps(VoltAmps(24_000.0), 240.0), 100.0);
        let amps = three_phase_amps(VoltAmps(36_000.0), 208.0);
        assert!((amps - 99.92).abs() < 0.01);
    }
}
