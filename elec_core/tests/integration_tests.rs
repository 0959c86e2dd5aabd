//! End-to-end sizing scenarios through the public API

use elec_core::calculations::breaker::{size_breaker, BreakerInput};
use elec_core::calculations::conductor::{size_conductor, ConductorSizingInput};
use elec_core::calculations::egc::{egc_base_size, size_egc};
use elec_core::calculations::feeder::{calculate_feeder_sizing, FeederInput, FeederLoad};
use elec_core::calculations::voltage_drop::{calculate_voltage_drop, k_constant};
use elec_core::compliance::Severity;
use elec_core::loads::{compute_demand, CircuitLoad, LoadCategory, Phase};
use elec_core::{
    CalcError,
    CalculationBatch,
    CalculationOutput,
    ConductorMaterial,
    ConductorSize,
    ProjectElectricalSettings,
    SystemPhase,
};

fn settings() -> ProjectElectricalSettings {
    ProjectElectricalSettings::default()
}

// ============================================================================
// Conductor sizing
// ============================================================================

#[test]
fn test_16_amp_branch_is_12_awg() {
    let result = size_conductor(&ConductorSizingInput::new(16.0), &settings()).unwrap();
    assert_eq!(result.conductor_size, ConductorSize::Awg12);
    assert!(result.adjusted_ampacity >= result.required_ampacity);
}

#[test]
fn test_21_amp_branch_is_10_awg() {
    let result = size_conductor(&ConductorSizingInput::new(21.0), &settings()).unwrap();
    assert_eq!(result.conductor_size, ConductorSize::Awg10);
}

#[test]
fn test_continuous_load_sized_at_125_percent() {
    let input = ConductorSizingInput::new(40.0).continuous();
    let result = size_conductor(&input, &settings()).unwrap();
    assert_eq!(result.required_ampacity, 50.0);
    assert_eq!(result.conductor_size, ConductorSize::Awg6);
}

#[test]
fn test_negative_load_is_input_error() {
    let err = size_conductor(&ConductorSizingInput::new(-1.0), &settings()).unwrap_err();
    assert!(matches!(err, CalcError::InvalidInput { .. }));
}

#[test]
fn test_load_beyond_table_is_exhausted() {
    let err = size_conductor(&ConductorSizingInput::new(2000.0), &settings()).unwrap_err();
    assert!(matches!(err, CalcError::TableExhausted { .. }));
}

// ============================================================================
// EGC
// ============================================================================

#[test]
fn test_egc_table_values() {
    assert_eq!(egc_base_size(100.0, ConductorMaterial::Copper).unwrap(), ConductorSize::Awg8);
    assert_eq!(egc_base_size(200.0, ConductorMaterial::Copper).unwrap(), ConductorSize::Awg6);
}

#[test]
fn test_egc_proportional_increase() {
    // 100 A: base 8 AWG, typical phase 3 AWG, installed 1/0
    let result = size_egc(100.0, ConductorSize::Awg1_0, ConductorMaterial::Copper, true).unwrap();
    assert_eq!(result.base_size, ConductorSize::Awg8);
    assert_eq!(result.egc_size, ConductorSize::Awg4);
    assert!(result.upsized);
}

// ============================================================================
// Demand
// ============================================================================

fn mixed_panel() -> Vec<CircuitLoad> {
    vec![
        CircuitLoad::new("1", "Lighting", 4500.0, LoadCategory::Lighting, 1, 1),
        CircuitLoad::new("3", "Receptacles", 3600.0, LoadCategory::Receptacle, 1, 3),
        CircuitLoad::new("5", "Range", 12_000.0, LoadCategory::Kitchen, 2, 5),
        CircuitLoad::new("9", "Dryer", 5000.0, LoadCategory::Dryer, 2, 9),
        CircuitLoad::new("13", "Well pump", 2000.0, LoadCategory::Motor, 2, 13),
    ]
}

#[test]
fn test_demand_is_repeatable() {
    let first = compute_demand(&mixed_panel(), 240.0, SystemPhase::Single).unwrap();
    let second = compute_demand(&mixed_panel(), 240.0, SystemPhase::Single).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_two_pole_load_split_evenly() {
    let circuits = vec![CircuitLoad::new("1", "Water heater", 4500.0, LoadCategory::WaterHeater, 2, 1)];
    let result = compute_demand(&circuits, 240.0, SystemPhase::Single).unwrap();
    let a = result.phase(Phase::A).unwrap();
    let b = result.phase(Phase::B).unwrap();
    assert_eq!(a.connected_va, 2250.0);
    assert_eq!(b.connected_va, 2250.0);
    assert_eq!(a.connected_va + b.connected_va, result.total_connected_va.0);
    assert_eq!(result.phase_imbalance_percent, 0.0);
}

#[test]
fn test_three_pole_on_single_phase_rejected() {
    let circuits = vec![CircuitLoad::new("1", "RTU", 9000.0, LoadCategory::Cooling, 3, 1)];
    assert!(compute_demand(&circuits, 240.0, SystemPhase::Single).unwrap_err().is_input_error());
}

// ============================================================================
// Breakers
// ============================================================================

#[test]
fn test_breaker_larger_than_conductor_is_critical() {
    let input = BreakerInput::new(28.0).with_conductor(ConductorSize::Awg12);
    let result = size_breaker(&input, &settings()).unwrap();
    assert_eq!(result.rating, 30);
    assert!(!result.is_compatible);
    assert!(result.warnings.iter().any(|w| w.severity == Severity::Critical));
}

#[test]
fn test_breaker_matching_conductor_is_compatible() {
    let input = BreakerInput::new(16.0).continuous().with_conductor(ConductorSize::Awg12);
    let result = size_breaker(&input, &settings()).unwrap();
    assert_eq!(result.rating, 20);
    assert!(result.is_compatible);
    assert!(!result.has_critical());
}

// ============================================================================
// Voltage drop
// ============================================================================

#[test]
fn test_voltage_drop_boundary() {
    // 2 × 12.9 × L × 20 / 10 380 volts on 240 V; solve L for 3.00 % and 3.01 %
    let cmil = ConductorSize::Awg10.circular_mils();
    let length_at = |percent: f64| percent / 100.0 * 240.0 * cmil / (2.0 * 12.9 * 20.0);

    let at_limit = calculate_voltage_drop(
        ConductorSize::Awg10,
        ConductorMaterial::Copper,
        length_at(3.0),
        20.0,
        240.0,
        SystemPhase::Single,
    )
    .unwrap();
    assert_eq!(at_limit.voltage_drop_percent, 3.0);
    assert!(at_limit.meets_limit);

    let over_limit = calculate_voltage_drop(
        ConductorSize::Awg10,
        ConductorMaterial::Copper,
        length_at(3.01),
        20.0,
        240.0,
        SystemPhase::Single,
    )
    .unwrap();
    assert_eq!(over_limit.voltage_drop_percent, 3.01);
    assert!(!over_limit.meets_limit);
}

// ============================================================================
// Feeder
// ============================================================================

#[test]
fn test_feeder_design_load() {
    let load = FeederLoad::Split { continuous_va: 30_000.0, noncontinuous_va: 20_000.0 };
    let input = FeederInput::new("F-1", load, 100.0);
    let result = calculate_feeder_sizing(&input, &ProjectElectricalSettings::three_phase(208.0)).unwrap();
    assert_eq!(result.design_load_va, 57_500.0);
    assert!(result.sizing.adjusted_ampacity >= result.design_amps);
    assert!(result.sizing.ocpd_rating >= result.design_amps);
}

#[test]
fn test_feeder_voltage_drop_boundary() {
    // 4800 VA on 240 V single-phase: 20 A actual load current
    let feeder = |length_ft: f64| {
        let mut input = FeederInput::new(
            "F-vd",
            FeederLoad::Split { continuous_va: 0.0, noncontinuous_va: 4800.0 },
            length_ft,
        );
        input.voltage_drop_limit_percent = 2.0;
        calculate_feeder_sizing(&input, &settings()).unwrap()
    };

    let size = feeder(0.0).sizing.conductor_size;
    let k = k_constant(ConductorMaterial::Copper);
    let length_at = |percent: f64| percent / 100.0 * 240.0 * size.circular_mils() / (2.0 * k * 20.0);

    let at_limit = feeder(length_at(2.0));
    assert_eq!(at_limit.sizing.conductor_size, size);
    assert_eq!(at_limit.voltage_drop.voltage_drop_percent, 2.0);
    assert!(at_limit.meets_voltage_drop);
    assert!(at_limit.recommended_size_for_drop.is_none());

    let over_limit = feeder(length_at(2.01));
    assert_eq!(over_limit.voltage_drop.voltage_drop_percent, 2.01);
    assert!(!over_limit.meets_voltage_drop);
    assert!(over_limit.recommended_size_for_drop.unwrap() > size);
}

// ============================================================================
// Batch
// ============================================================================

#[test]
fn test_batch_mixes_results_and_errors() {
    let json = r#"{
        "settings": { "service_voltage": 208.0, "service_phase": 3 },
        "items": [
            { "type": "conductor", "label": "ok", "load_amps": 21.0 },
            { "type": "conductor", "label": "bad", "load_amps": -4.0 },
            { "type": "feeder", "label": "F-1", "length_ft": 100.0,
              "load": { "kind": "split", "continuous_va": 30000.0, "noncontinuous_va": 20000.0 } }
        ]
    }"#;
    let report = CalculationBatch::from_json(json).unwrap().run().unwrap();
    assert_eq!(report.succeeded, 2);
    assert_eq!(report.failed, 1);
    assert_eq!(report.entries[1].label, "bad");
    assert!(report.entries[1].error.is_some());
    assert!(matches!(report.entries[2].result, Some(CalculationOutput::Feeder(_))));
}

#[test]
fn test_batch_report_serializes() {
    let json = r#"{ "items": [ { "type": "egc", "ocpd_amps": 60.0, "phase_conductor": "6" } ] }"#;
    let report = CalculationBatch::from_json(json).unwrap().run().unwrap();
    let out = serde_json::to_string(&report).unwrap();
    assert!(out.contains("\"type\":\"egc\""));
    assert!(out.contains("10 AWG"));
}
