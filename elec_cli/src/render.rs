//! Human and JSON output for calculation results

use elec_core::calculations::breaker::BreakerResult;
use elec_core::calculations::conductor::SizingResult;
use elec_core::calculations::egc::EgcResult;
use elec_core::calculations::feeder::FeederResult;
use elec_core::calculations::panel::PanelCheckResult;
use elec_core::calculations::voltage_drop::VoltageDropResult;
use elec_core::loads::DemandResult;
use elec_core::tables::grounding::egc_table_limit;
use elec_core::tables::{egc_table_size, table_ampacity, STANDARD_RATINGS};
use elec_core::{
    BatchReport,
    CalculationOutput,
    Citation,
    ComplianceWarning,
    ConductorMaterial,
    ConductorSize,
    InsulationRating,
    ProjectElectricalSettings,
};
use serde::Serialize;

use crate::{OutputFormat, TableArg};

pub fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error: cannot serialize output: {}", e),
    }
}

pub fn print_output(output: &CalculationOutput, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(output),
        OutputFormat::Human => print_human(output),
    }
}

pub fn print_batch(report: &BatchReport, format: OutputFormat) {
    if let OutputFormat::Json = format {
        print_json(report);
        return;
    }

    for entry in &report.entries {
        let title = if entry.label.is_empty() { entry.calc_type.as_str() } else { entry.label.as_str() };
        println!("\n{} ({})", title, entry.calc_type);
        println!("{}", "─".repeat(60));
        match (&entry.result, &entry.error) {
            (Some(output), _) => print_human(output),
            (None, Some(error)) => println!("  ERROR [{}]: {}", error.error_code(), error),
            (None, None) => {}
        }
    }

    println!("\nSummary:");
    println!("  Succeeded: {}", report.succeeded);
    println!("  Failed:    {}", report.failed);
    if report.has_critical {
        println!("  Critical warnings present");
    }
}

fn print_human(output: &CalculationOutput) {
    match output {
        CalculationOutput::Demand(r) => demand(r),
        CalculationOutput::Conductor(r) => conductor(r),
        CalculationOutput::Egc(r) => egc(r),
        CalculationOutput::Breaker(r) => breaker(r),
        CalculationOutput::VoltageDrop(r) => voltage_drop(r),
        CalculationOutput::Feeder(r) => feeder(r),
        CalculationOutput::Panel(r) => panel(r),
    }
}

fn demand(r: &DemandResult) {
    println!("Demand load ({}, {:.0} V)", r.system_phase, r.voltage);
    println!();
    println!("  {:<22} {:>6} {:>12} {:>12} {:>7}", "Category", "Ckts", "Connected", "Demand", "Factor");
    for c in &r.categories {
        println!(
            "  {:<22} {:>6} {:>12.0} {:>12.0} {:>6.0}%",
            c.category.display_name(),
            c.circuit_count,
            c.connected_va,
            c.demand_va,
            c.demand_factor * 100.0
        );
    }
    println!();
    for p in &r.phases {
        println!("  Phase {}: {:>10.0} VA connected, {:>10.0} VA demand", p.phase, p.connected_va, p.demand_va);
    }
    println!();
    println!("  Total connected: {:.2} kVA", r.total_connected_kva.0);
    println!("  Total demand:    {:.2} kVA", r.total_demand_kva.0);
    println!("  Demand current:  {:.1} A", r.demand_amps);
    println!("  Imbalance:       {:.1}%", r.phase_imbalance_percent);
    for note in &r.notes {
        println!("  Note: {}", note);
    }
    findings(&r.citations, &r.warnings);
}

fn conductor(r: &SizingResult) {
    println!("Conductor: {} {} ({})", r.conductor_size, r.material, r.insulation);
    println!("  Load:        {:.1} A (required {:.1} A)", r.load_amps, r.required_ampacity);
    println!(
        "  Ampacity:    {:.1} A x {:.2} = {:.1} A",
        r.base_ampacity, r.combined_derating, r.adjusted_ampacity
    );
    println!("  Margin:      {:.1}%", r.margin_percent());
    println!("  Termination: {} column, {:.0} A", r.termination_rating, r.termination_ampacity);
    println!("  OCPD:        {:.0} A", r.ocpd_rating);
    println!("  EGC:         {}{}", r.egc_size, if r.egc_upsized { " (increased)" } else { "" });
    findings(&r.citations, &r.warnings);
}

fn egc(r: &EgcResult) {
    println!("EGC: {} {}", r.egc_size, r.material);
    println!("  OCPD:            {:.0} A", r.ocpd_amps);
    println!("  Table minimum:   {}", r.base_size);
    println!("  Phase conductor: {}", r.phase_conductor);
    if let Some(ratio) = r.upsizing_ratio {
        println!("  Upsizing ratio:  {:.2}", ratio);
    }
    findings(&r.citations, &r.warnings);
}

fn breaker(r: &BreakerResult) {
    println!("Breaker: {} A, {}-pole", r.rating, r.poles);
    println!("  Minimum:    {:.1} A", r.minimum_amps);
    if let Some(size) = r.conductor_size {
        match r.conductor_ampacity {
            Some(ampacity) => println!("  Conductor:  {} ({:.0} A)", size, ampacity),
            None => println!("  Conductor:  {}", size),
        }
        println!("  Compatible: {}", if r.is_compatible { "yes" } else { "NO" });
    }
    if r.ground_fault_protection {
        println!("  Ground-fault protection of equipment required");
    }
    findings(&r.citations, &r.warnings);
}

fn voltage_drop(r: &VoltageDropResult) {
    println!(
        "Voltage drop: {:.2} V ({:.2}%) {}",
        r.voltage_drop_volts,
        r.voltage_drop_percent,
        if r.meets_limit { "OK" } else { "EXCEEDS LIMIT" }
    );
    println!("  Conductor: {} {}, {:.0} ft at {:.1} A", r.conductor_size, r.material, r.length_ft, r.load_amps);
    println!("  System:    {:.0} V {}", r.voltage, r.phase);
    println!("  Limit:     {}%", r.limit_percent);
    if let Some(max) = r.max_length_ft {
        println!("  Max run:   {:.0} ft", max);
    }
    findings(&r.citations, &r.warnings);
}

fn feeder(r: &FeederResult) {
    println!("Feeder: {}", r.label);
    println!("  Connected load: {:.0} VA", r.connected_load_va);
    println!("  Design load:    {:.0} VA ({:.1} A)", r.design_load_va, r.design_amps);
    println!("  Phase:          {} {}", r.sizing.conductor_size, r.sizing.material);
    if let Some(neutral) = r.neutral_size {
        println!("  Neutral:        {}", neutral);
    }
    println!("  EGC:            {}", r.sizing.egc_size);
    println!("  OCPD:           {:.0} A", r.sizing.ocpd_rating);
    match r.conduit_size {
        Some(conduit) => println!("  Conduit:        {} ({} conductors)", conduit, r.raceway_conductors),
        None => println!("  Conduit:        exceeds largest trade size; use parallel runs"),
    }
    println!(
        "  Voltage drop:   {:.2}% {}",
        r.voltage_drop.voltage_drop_percent,
        if r.meets_voltage_drop { "OK" } else { "EXCEEDS LIMIT" }
    );
    if let Some(size) = r.recommended_size_for_drop {
        println!("  Recommended:    {} to meet the drop limit", size);
    }
    findings(&r.citations, &r.warnings);
}

fn panel(r: &PanelCheckResult) {
    println!("Panel: {} ({:.0} A bus)", r.label, r.bus_rating_amps);
    println!("  Circuits:    {} ({} poles)", r.circuit_count, r.pole_count);
    println!("  Connected:   {:.0} VA of {:.0} VA", r.connected_load_va, r.capacity_va);
    println!("  Utilization: {:.1}%", r.utilization_percent);
    println!("  Spare:       {:.0} VA", r.spare_capacity_va);
    println!("  Compliant:   {}", if r.compliant { "yes" } else { "NO" });
    findings(&r.citations, &r.warnings);
}

fn findings(citations: &[Citation], warnings: &[ComplianceWarning]) {
    if !warnings.is_empty() {
        println!();
        for warning in warnings {
            println!("  {}", warning);
        }
    }
    if !citations.is_empty() {
        println!();
        println!("  References:");
        for citation in citations {
            println!("    {} - {}", citation.section, citation.description);
        }
    }
}

pub fn print_table(table: TableArg, settings: &ProjectElectricalSettings, format: OutputFormat) {
    match table {
        TableArg::Ampacity => ampacity_table(settings.conductor_material, format),
        TableArg::Egc => egc_table(format),
        TableArg::Ratings => match format {
            OutputFormat::Json => print_json(&STANDARD_RATINGS[..]),
            OutputFormat::Human => {
                let ratings: Vec<String> = STANDARD_RATINGS.iter().map(|r| r.to_string()).collect();
                println!("Standard ratings (A): {}", ratings.join(", "));
            }
        },
    }
}

#[derive(Serialize)]
struct AmpacityRow {
    size: ConductorSize,
    c60: Option<f64>,
    c75: Option<f64>,
    c90: Option<f64>,
}

fn ampacity_table(material: ConductorMaterial, format: OutputFormat) {
    let rows: Vec<AmpacityRow> = ConductorSize::ALL
        .iter()
        .map(|size| AmpacityRow {
            size: *size,
            c60: table_ampacity(*size, material, InsulationRating::C60),
            c75: table_ampacity(*size, material, InsulationRating::C75),
            c90: table_ampacity(*size, material, InsulationRating::C90),
        })
        .collect();

    if let OutputFormat::Json = format {
        print_json(&rows);
        return;
    }

    let cell = |value: Option<f64>| value.map_or_else(|| "-".to_string(), |v| format!("{:.0}", v));
    println!("Ampacity, {} (A)", material);
    println!("  {:<12} {:>6} {:>6} {:>6}", "Size", "60°C", "75°C", "90°C");
    for row in &rows {
        println!(
            "  {:<12} {:>6} {:>6} {:>6}",
            row.size.to_string(),
            cell(row.c60),
            cell(row.c75),
            cell(row.c90)
        );
    }
}

#[derive(Serialize)]
struct EgcRow {
    ocpd_amps: u32,
    copper: Option<ConductorSize>,
    aluminum: Option<ConductorSize>,
}

fn egc_table(format: OutputFormat) {
    let rows: Vec<EgcRow> = STANDARD_RATINGS
        .iter()
        .filter(|rating| **rating <= egc_table_limit())
        .map(|rating| EgcRow {
            ocpd_amps: *rating,
            copper: egc_table_size(f64::from(*rating), ConductorMaterial::Copper),
            aluminum: egc_table_size(f64::from(*rating), ConductorMaterial::Aluminum),
        })
        .collect();

    if let OutputFormat::Json = format {
        print_json(&rows);
        return;
    }

    println!("Minimum EGC by OCPD rating");
    println!("  {:>6} {:>12} {:>12}", "OCPD", "Cu", "Al");
    for row in &rows {
        let cell = |size: Option<ConductorSize>| size.map_or_else(|| "-".to_string(), |s| s.to_string());
        println!("  {:>6} {:>12} {:>12}", row.ocpd_amps, cell(row.copper), cell(row.aluminum));
    }
}
