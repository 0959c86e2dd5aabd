//! Conductor Ampacity (NEC 2023 Table 310.16)
//!
//! Allowable ampacities of insulated conductors rated up to 2000 volts, not
//! more than three current-carrying conductors in raceway, cable or earth,
//! based on an ambient temperature of 30°C (86°F).
//!
//! Values are amperes. Aluminum is not listed at 14 AWG.

use crate::tables::conductors::{ConductorMaterial, ConductorSize, InsulationRating};

/// Copper ampacities, columns 60°C / 75°C / 90°C, indexed by `ConductorSize::index()`
const COPPER: [[f64; 3]; 28] = [
    [15.0, 20.0, 25.0],    // 14
    [20.0, 25.0, 30.0],    // 12
    [30.0, 35.0, 40.0],    // 10
    [40.0, 50.0, 55.0],    // 8
    [55.0, 65.0, 75.0],    // 6
    [70.0, 85.0, 95.0],    // 4
    [85.0, 100.0, 115.0],  // 3
    [95.0, 115.0, 130.0],  // 2
    [110.0, 130.0, 145.0], // 1
    [125.0, 150.0, 170.0], // 1/0
    [145.0, 175.0, 195.0], // 2/0
    [165.0, 200.0, 225.0], // 3/0
    [195.0, 230.0, 260.0], // 4/0
    [215.0, 255.0, 290.0], // 250
    [240.0, 285.0, 320.0], // 300
    [260.0, 310.0, 350.0], // 350
    [280.0, 335.0, 380.0], // 400
    [320.0, 380.0, 430.0], // 500
    [350.0, 420.0, 475.0], // 600
    [385.0, 460.0, 520.0], // 700
    [400.0, 475.0, 535.0], // 750
    [410.0, 490.0, 555.0], // 800
    [435.0, 520.0, 585.0], // 900
    [455.0, 545.0, 615.0], // 1000
    [495.0, 590.0, 665.0], // 1250
    [525.0, 625.0, 705.0], // 1500
    [545.0, 650.0, 735.0], // 1750
    [555.0, 665.0, 750.0], // 2000
];

/// Aluminum ampacities, columns 60°C / 75°C / 90°C (14 AWG row unused)
const ALUMINUM: [[f64; 3]; 28] = [
    [0.0, 0.0, 0.0],       // 14 (not listed)
    [15.0, 20.0, 25.0],    // 12
    [25.0, 30.0, 35.0],    // 10
    [35.0, 40.0, 45.0],    // 8
    [40.0, 50.0, 55.0],    // 6
    [55.0, 65.0, 75.0],    // 4
    [65.0, 75.0, 85.0],    // 3
    [75.0, 90.0, 100.0],   // 2
    [85.0, 100.0, 115.0],  // 1
    [100.0, 120.0, 135.0], // 1/0
    [115.0, 135.0, 150.0], // 2/0
    [130.0, 155.0, 175.0], // 3/0
    [150.0, 180.0, 205.0], // 4/0
    [170.0, 205.0, 230.0], // 250
    [195.0, 230.0, 260.0], // 300
    [210.0, 250.0, 280.0], // 350
    [225.0, 270.0, 305.0], // 400
    [260.0, 310.0, 350.0], // 500
    [285.0, 340.0, 385.0], // 600
    [315.0, 375.0, 425.0], // 700
    [320.0, 385.0, 435.0], // 750
    [330.0, 395.0, 445.0], // 800
    [355.0, 425.0, 480.0], // 900
    [375.0, 445.0, 500.0], // 1000
    [405.0, 485.0, 545.0], // 1250
    [435.0, 520.0, 585.0], // 1500
    [455.0, 545.0, 615.0], // 1750
    [470.0, 560.0, 630.0], // 2000
];

fn column(rating: InsulationRating) -> usize {
    match rating {
        InsulationRating::C60 => 0,
        InsulationRating::C75 => 1,
        InsulationRating::C90 => 2,
    }
}

/// Table ampacity for a size, material and temperature column.
///
/// Returns `None` where the table has no entry (14 AWG aluminum).
pub fn table_ampacity(size: ConductorSize, material: ConductorMaterial, rating: InsulationRating) -> Option<f64> {
    let row = match material {
        ConductorMaterial::Copper => COPPER[size.index()],
        ConductorMaterial::Aluminum => ALUMINUM[size.index()],
    };
    let value = row[column(rating)];
    if value > 0.0 {
        Some(value)
    } else {
        None
    }
}

/// Smallest listed size at or above `start` whose ampacity in `rating` satisfies `accept`.
pub fn first_size_where(
    start: ConductorSize,
    material: ConductorMaterial,
    rating: InsulationRating,
    accept: impl Fn(f64) -> bool,
) -> Option<(ConductorSize, f64)> {
    start.and_larger().find_map(|size| {
        table_ampacity(size, material, rating)
            .filter(|ampacity| accept(*ampacity))
            .map(|ampacity| (size, ampacity))
    })
}

/// Largest ampacity catalogued for a material and column
pub fn max_ampacity(material: ConductorMaterial, rating: InsulationRating) -> f64 {
    table_ampacity(ConductorSize::largest(), material, rating).unwrap_or(0.0)
}
