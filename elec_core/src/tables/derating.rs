//! Ampacity Correction and Adjustment Factors
//!
//! ```text
//! Adjusted ampacity = Table 310.16 ampacity × temperature correction × bundling adjustment
//! ```
//!
//! | Factor      | Source                     | Basis                               |
//! |-------------|----------------------------|-------------------------------------|
//! | Temperature | NEC Table 310.15(B)(1)     | Ambient °C, insulation column       |
//! | Bundling    | NEC Table 310.15(C)(1)     | Current-carrying conductors in race |

use crate::errors::{CalcError, CalcResult};
use crate::tables::conductors::InsulationRating;

/// Ambient upper bound (°C) and factors for 60°C / 75°C / 90°C columns.
/// A factor of 0.0 means the column may not be used at that ambient.
const TEMPERATURE_CORRECTION: [(f64, [f64; 3]); 16] = [
    (10.0, [1.29, 1.20, 1.15]),
    (15.0, [1.22, 1.15, 1.12]),
    (20.0, [1.15, 1.11, 1.08]),
    (25.0, [1.08, 1.05, 1.04]),
    (30.0, [1.00, 1.00, 1.00]),
    (35.0, [0.91, 0.94, 0.96]),
    (40.0, [0.82, 0.88, 0.91]),
    (45.0, [0.71, 0.82, 0.87]),
    (50.0, [0.58, 0.75, 0.82]),
    (55.0, [0.41, 0.67, 0.76]),
    (60.0, [0.0, 0.58, 0.71]),
    (65.0, [0.0, 0.47, 0.65]),
    (70.0, [0.0, 0.33, 0.58]),
    (75.0, [0.0, 0.0, 0.50]),
    (80.0, [0.0, 0.0, 0.41]),
    (85.0, [0.0, 0.0, 0.29]),
];

/// Minimum conductor count for each bundling bracket and its factor
const BUNDLING_ADJUSTMENT: [(u32, f64); 7] = [
    (41, 0.35),
    (31, 0.40),
    (21, 0.45),
    (10, 0.50),
    (7, 0.70),
    (4, 0.80),
    (1, 1.00),
];

/// Temperature correction factor for an ambient temperature and insulation column.
///
/// Ambients between table rows use the next warmer row.
pub fn temperature_correction(ambient_c: f64, rating: InsulationRating) -> CalcResult<f64> {
    if !ambient_c.is_finite() {
        return Err(CalcError::invalid_input(
            "ambient_temp_c",
            ambient_c.to_string(),
            "Ambient temperature must be a finite number",
        ));
    }
    let col = match rating {
        InsulationRating::C60 => 0,
        InsulationRating::C75 => 1,
        InsulationRating::C90 => 2,
    };
    let factor = TEMPERATURE_CORRECTION
        .iter()
        .find(|(upper, _)| ambient_c <= *upper)
        .map(|(_, factors)| factors[col])
        .unwrap_or(0.0);

    if factor <= 0.0 {
        return Err(CalcError::invalid_input(
            "ambient_temp_c",
            ambient_c.to_string(),
            format!("Ambient temperature exceeds the limit for {} insulation", rating),
        ));
    }
    tracing::trace!(ambient_c, ?rating, factor, "temperature correction");
    Ok(factor)
}

/// Bundling adjustment factor for the number of current-carrying conductors.
pub fn bundling_adjustment(conductor_count: u32) -> CalcResult<f64> {
    if conductor_count == 0 {
        return Err(CalcError::invalid_input(
            "conductor_count",
            "0",
            "At least one current-carrying conductor is required",
        ));
    }
    let factor = BUNDLING_ADJUSTMENT
        .iter()
        .find(|(min, _)| conductor_count >= *min)
        .map(|(_, factor)| *factor)
        .unwrap_or(1.0);
    tracing::trace!(conductor_count, factor, "bundling adjustment");
    Ok(factor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_ambient_is_unity() {
        for rating in InsulationRating::ALL {
            assert_eq!(temperature_correction(30.0, rating).unwrap(), 1.0);
        }
    }

    #[test]
    fn test_hot_ambient() {
        assert_eq!(temperature_correction(40.0, InsulationRating::C90).unwrap(), 0.91);
        assert_eq!(temperature_correction(36.0, InsulationRating::C75).unwrap(), 0.88);
        assert_eq!(temperature_correction(30.5, InsulationRating::C75).unwrap(), 0.94);
    }

    #[test]
    fn test_ambient_beyond_column_limit() {
        assert!(temperature_correction(58.0, InsulationRating::C60).is_err());
        assert!(temperature_correction(58.0, InsulationRating::C75).is_ok());
        assert!(temperature_correction(90.0, InsulationRating::C90).is_err());
        assert!(temperature_correction(f64::NAN, InsulationRating::C90).is_err());
    }

    #[test]
    fn test_bundling_brackets() {
        assert_eq!(bundling_adjustment(3).unwrap(), 1.0);
        assert_eq!(bundling_adjustment(4).unwrap(), 0.8);
        assert_eq!(bundling_adjustment(6).unwrap(), 0.8);
        assert_eq!(bundling_adjustment(9).unwrap(), 0.7);
        assert_eq!(bundling_adjustment(20).unwrap(), 0.5);
        assert_eq!(bundling_adjustment(41).unwrap(), 0.35);
        assert!(bundling_adjustment(0).is_err());
    }
}
