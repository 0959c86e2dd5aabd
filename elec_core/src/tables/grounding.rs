//! Equipment Grounding Conductor Tables
//!
//! - Minimum EGC size by OCPD rating (NEC Table 250.122)
//! - Typical phase conductor for an OCPD rating, used as the baseline for the
//!   proportional-increase rule of NEC 250.122(B)
//!
//! Both tables are keyed by "rating not exceeding": an OCPD rating uses the
//! first row whose key is at or above it.

use crate::tables::conductors::{ConductorMaterial, ConductorSize};

use ConductorSize::*;

/// (OCPD not exceeding, copper EGC, aluminum EGC)
const EGC_TABLE: [(u32, ConductorSize, ConductorSize); 17] = [
    (15, Awg14, Awg12),
    (20, Awg12, Awg10),
    (60, Awg10, Awg8),
    (100, Awg8, Awg6),
    (200, Awg6, Awg4),
    (300, Awg4, Awg2),
    (400, Awg3, Awg1),
    (500, Awg2, Awg1_0),
    (600, Awg1, Awg2_0),
    (800, Awg1_0, Awg3_0),
    (1000, Awg2_0, Awg4_0),
    (1200, Awg3_0, Kcmil250),
    (1600, Awg4_0, Kcmil350),
    (2000, Kcmil250, Kcmil400),
    (2500, Kcmil350, Kcmil600),
    (3000, Kcmil400, Kcmil600),
    (4000, Kcmil500, Kcmil750),
];

/// (OCPD rating, typical copper phase conductor, typical aluminum phase conductor)
///
/// Smallest 75°C conductor whose Table 310.16 ampacity carries the rating,
/// after the NEC 240.4(D) small-conductor caps.
const TYPICAL_PHASE: [(u32, ConductorSize, ConductorSize); 23] = [
    (15, Awg14, Awg12),
    (20, Awg12, Awg10),
    (25, Awg10, Awg10),
    (30, Awg10, Awg8),
    (35, Awg8, Awg8),
    (40, Awg8, Awg8),
    (45, Awg8, Awg6),
    (50, Awg8, Awg6),
    (60, Awg6, Awg4),
    (70, Awg4, Awg3),
    (80, Awg4, Awg2),
    (90, Awg3, Awg2),
    (100, Awg3, Awg1),
    (110, Awg2, Awg1_0),
    (125, Awg1, Awg2_0),
    (150, Awg1_0, Awg3_0),
    (175, Awg2_0, Awg4_0),
    (200, Awg3_0, Kcmil250),
    (225, Awg4_0, Kcmil300),
    (250, Kcmil250, Kcmil350),
    (300, Kcmil350, Kcmil500),
    (350, Kcmil500, Kcmil700),
    (400, Kcmil600, Kcmil900),
];

fn pick(material: ConductorMaterial, cu: ConductorSize, al: ConductorSize) -> ConductorSize {
    match material {
        ConductorMaterial::Copper => cu,
        ConductorMaterial::Aluminum => al,
    }
}

/// Minimum EGC for an OCPD rating; `None` above the largest table row.
pub fn egc_table_size(ocpd_amps: f64, material: ConductorMaterial) -> Option<ConductorSize> {
    let size = EGC_TABLE
        .iter()
        .find(|(max, _, _)| f64::from(*max) >= ocpd_amps)
        .map(|(_, cu, al)| pick(material, *cu, *al));
    tracing::trace!(ocpd_amps, ?material, ?size, "EGC table lookup");
    size
}

/// Largest OCPD rating covered by the EGC table
pub fn egc_table_limit() -> u32 {
    EGC_TABLE[EGC_TABLE.len() - 1].0
}

/// Typical phase conductor for an OCPD rating; `None` above the table.
pub fn typical_phase_conductor(ocpd_amps: f64, material: ConductorMaterial) -> Option<ConductorSize> {
    TYPICAL_PHASE
        .iter()
        .find(|(rating, _, _)| f64::from(*rating) >= ocpd_amps)
        .map(|(_, cu, al)| pick(material, *cu, *al))
}
