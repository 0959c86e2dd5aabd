//! # Phase Assignment
//!
//! Maps panel circuits onto supply phases and splits multi-pole loads.
//!
//! Panel circuits are numbered odd on the left, even on the right, so each
//! row of the panel holds two circuits that land on the same bus bar:
//!
//! | Circuits | Row | Single-phase | Three-phase |
//! |----------|-----|--------------|-------------|
//! | 1, 2     | 0   | A            | A           |
//! | 3, 4     | 1   | B            | B           |
//! | 5, 6     | 2   | A            | C           |
//! | 7, 8     | 3   | B            | A           |
//!
//! A 2-pole circuit occupies its starting phase and the next one; a 3-pole
//! circuit occupies all three.

use crate::errors::{CalcError, CalcResult};
use crate::settings::SystemPhase;

use super::{CircuitLoad, Phase};

/// Phases available on a supply system, in bus order
pub fn system_phases(system: SystemPhase) -> &'static [Phase] {
    match system {
        SystemPhase::Single => &[Phase::A, Phase::B],
        SystemPhase::Three => &Phase::ALL,
    }
}

/// Starting phase for a circuit number (row = (n - 1) / 2)
pub fn phase_for_circuit_number(circuit_number: u32, system: SystemPhase) -> Phase {
    let phases = system_phases(system);
    let row = (circuit_number.saturating_sub(1) / 2) as usize;
    phases[row % phases.len()]
}

/// Phases occupied by a circuit, starting phase first.
///
/// Returns an input error for a 3-pole circuit on a single-phase system or
/// an explicit phase that does not exist on the system.
pub fn assign_phases(circuit: &CircuitLoad, system: SystemPhase) -> CalcResult<Vec<Phase>> {
    let phases = system_phases(system);
    let poles = circuit.pole_count as usize;

    if poles > phases.len() {
        return Err(CalcError::invalid_input(
            "pole_count",
            circuit.pole_count.to_string(),
            format!(
                "Circuit '{}' has more poles than a {} system has phases",
                circuit.id,
                system.display_name().to_lowercase()
            ),
        ));
    }

    let start = match circuit.phase {
        Some(phase) => phases.iter().position(|p| *p == phase).ok_or_else(|| {
            CalcError::invalid_input(
                "phase",
                phase.to_string(),
                format!("Phase {} does not exist on a {} system", phase, system.display_name().to_lowercase()),
            )
        })?,
        None => phase_for_circuit_number(circuit.circuit_number, system).index(),
    };

    Ok((0..poles).map(|offset| phases[(start + offset) % phases.len()]).collect())
}

/// Split `load_va` into `parts` equal shares; the last share takes the
/// remainder so the shares sum back to `load_va` exactly.
pub fn split_load(load_va: f64, parts: usize) -> Vec<f64> {
    if parts == 0 {
        return Vec::new();
    }
    let share = load_va / parts as f64;
    let mut shares = vec![share; parts - 1];
    let assigned: f64 = shares.iter().sum();
    shares.push(load_va - assigned);
    shares
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loads::LoadCategory;

    fn circuit(number: u32, poles: u8) -> CircuitLoad {
        CircuitLoad::new(number.to_string(), "", 1000.0, LoadCategory::Other, poles, number)
    }

    #[test]
    fn test_single_phase_rows_alternate() {
        let seq: Vec<Phase> = (1..=8).map(|n| phase_for_circuit_number(n, SystemPhase::Single)).collect();
        assert_eq!(seq, vec![Phase::A, Phase::A, Phase::B, Phase::B, Phase::A, Phase::A, Phase::B, Phase::B]);
    }

    #[test]
    fn test_three_phase_rows_cycle() {
        let seq: Vec<Phase> = [1, 3, 5, 7, 9].iter().map(|n| phase_for_circuit_number(*n, SystemPhase::Three)).collect();
        assert_eq!(seq, vec![Phase::A, Phase::B, Phase::C, Phase::A, Phase::B]);
    }

    #[test]
    fn test_two_pole_spans_adjacent_phases() {
        assert_eq!(assign_phases(&circuit(3, 2), SystemPhase::Single).unwrap(), vec![Phase::B, Phase::A]);
        assert_eq!(assign_phases(&circuit(5, 2), SystemPhase::Three).unwrap(), vec![Phase::C, Phase::A]);
    }

    #[test]
    fn test_three_pole_on_single_phase_rejected() {
        let err = assign_phases(&circuit(1, 3), SystemPhase::Single).unwrap_err();
        assert!(err.is_input_error());
    }

    #[test]
    fn test_explicit_phase_overrides_number() {
        let pinned = circuit(1, 1).on_phase(Phase::C);
        assert_eq!(assign_phases(&pinned, SystemPhase::Three).unwrap(), vec![Phase::C]);
        assert!(assign_phases(&pinned, SystemPhase::Single).is_err());
    }

    #[test]
    fn test_split_conserves_total() {
        for load in [1000.0, 0.1, 3333.33, 1.0e7 / 3.0] {
            for parts in 1..=3 {
                let shares = split_load(load, parts);
                assert_eq!(shares.len(), parts);
                let total: f64 = shares.iter().sum();
                assert_eq!(total, load);
            }
        }
    }
}
