//! Property tests for the sizing and demand invariants

use elec_core::calculations::conductor::{size_conductor, ConductorSizingInput};
use elec_core::loads::{compute_demand, split_load, CircuitLoad, LoadCategory};
use elec_core::{CalcError, ConductorMaterial, ProjectElectricalSettings, SystemPhase};
use proptest::prelude::*;

fn material() -> impl Strategy<Value = ConductorMaterial> {
    prop_oneof![Just(ConductorMaterial::Copper), Just(ConductorMaterial::Aluminum)]
}

fn category() -> impl Strategy<Value = LoadCategory> {
    prop::sample::select(LoadCategory::ALL.to_vec())
}

fn non_motor_category() -> impl Strategy<Value = LoadCategory> {
    prop::sample::select(
        LoadCategory::ALL
            .iter()
            .copied()
            .filter(|c| *c != LoadCategory::Motor)
            .collect::<Vec<_>>(),
    )
}

fn three_phase_circuits(category: impl Strategy<Value = LoadCategory>) -> impl Strategy<Value = Vec<CircuitLoad>> {
    prop::collection::vec((0.0..20_000.0f64, category, 1u8..=3), 0..30).prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (watts, category, poles))| {
                let number = i as u32 * 2 + 1;
                CircuitLoad::new(number.to_string(), "", watts, category, poles, number)
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn prop_adjusted_ampacity_covers_requirement(
        load in 0.1..1500.0f64,
        continuous in any::<bool>(),
        ambient in 10.0..=50.0f64,
        conductors in 1u32..=12,
        material in material(),
    ) {
        let mut input = ConductorSizingInput::new(load).with_ambient(ambient).with_conductor_count(conductors);
        input.continuous = continuous;
        let settings = ProjectElectricalSettings::default().with_material(material);

        match size_conductor(&input, &settings) {
            Ok(result) => {
                prop_assert!(result.adjusted_ampacity >= result.required_ampacity);
                prop_assert!(result.termination_ampacity >= result.required_ampacity);
            }
            Err(err) => prop_assert!(matches!(err, CalcError::TableExhausted { .. }), "unexpected error: {:?}", err),
        }
    }

    #[test]
    fn prop_larger_load_never_smaller_conductor(
        a in 0.1..800.0f64,
        b in 0.1..800.0f64,
        conductors in 1u32..=12,
        material in material(),
    ) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let settings = ProjectElectricalSettings::default().with_material(material);
        let size_for = |amps: f64| {
            size_conductor(&ConductorSizingInput::new(amps).with_conductor_count(conductors), &settings)
                .map(|r| r.conductor_size)
        };

        match (size_for(low), size_for(high)) {
            (Ok(small), Ok(large)) => prop_assert!(small <= large),
            (Err(_), high_result) => prop_assert!(high_result.is_err()),
            (Ok(_), Err(_)) => {}
        }
    }

    #[test]
    fn prop_split_load_conserves_total(load in 0.0..1.0e6f64, parts in 1usize..=3) {
        let shares = split_load(load, parts);
        prop_assert_eq!(shares.len(), parts);
        let total: f64 = shares.iter().sum();
        prop_assert_eq!(total, load);
    }

    #[test]
    fn prop_phase_totals_match_connected(circuits in three_phase_circuits(category())) {
        let result = compute_demand(&circuits, 208.0, SystemPhase::Three).unwrap();
        let phase_total: f64 = result.phases.iter().map(|p| p.connected_va).sum();
        let tolerance = 1e-6 * result.total_connected_va.0.max(1.0);
        prop_assert!((phase_total - result.total_connected_va.0).abs() <= tolerance);
    }

    #[test]
    fn prop_demand_never_exceeds_connected_without_motors(circuits in three_phase_circuits(non_motor_category())) {
        let result = compute_demand(&circuits, 208.0, SystemPhase::Three).unwrap();
        for category in &result.categories {
            prop_assert!(category.demand_va <= category.connected_va + 1e-9);
        }
        prop_assert!(result.total_demand_va.0 <= result.total_connected_va.0 + 1e-6);
    }

    #[test]
    fn prop_demand_is_idempotent(circuits in three_phase_circuits(category())) {
        let first = compute_demand(&circuits, 208.0, SystemPhase::Three).unwrap();
        let second = compute_demand(&circuits, 208.0, SystemPhase::Three).unwrap();
        prop_assert_eq!(first, second);
    }
}
