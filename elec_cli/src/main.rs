//! # Voltline CLI
//!
//! NEC sizing calculations from the command line. Simple calculations take
//! flags; demand, feeder, panel and batch calculations read a JSON input file.
//!
//! ## Exit codes
//!
//! | Code | Meaning                                                      |
//! |------|--------------------------------------------------------------|
//! | 0    | Calculation completed                                        |
//! | 1    | Input error (bad flags, unreadable file, invalid input)      |
//! | 2    | A result carries a critical warning and `--fail-on-critical` |
//!
//! Logs go to stderr (`RUST_LOG`, default `warn`) so JSON on stdout stays clean.

mod render;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::de::DeserializeOwned;
use tracing_subscriber::EnvFilter;

use elec_core::calculations::breaker::{BreakerInput, MotorBreakerInput, MotorType, ServiceBreakerInput};
use elec_core::calculations::conductor::ConductorSizingInput;
use elec_core::calculations::egc::EgcInput;
use elec_core::calculations::voltage_drop::VoltageDropInput;
use elec_core::loads::DemandInput;
use elec_core::{
    CalcError,
    CalculationBatch,
    CalculationItem,
    ConductorMaterial,
    ConductorSize,
    InsulationRating,
    ProjectElectricalSettings,
    SystemPhase,
};

#[derive(Parser)]
#[command(name = "voltline")]
#[command(about = "NEC conductor, breaker, grounding and voltage drop calculations", long_about = None)]
#[command(version)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct GlobalArgs {
    /// Project settings JSON file
    #[arg(long, global = true, value_name = "FILE")]
    settings: Option<PathBuf>,

    /// Service voltage override (V)
    #[arg(long, global = true)]
    service_voltage: Option<f64>,

    /// Service phase override
    #[arg(long, global = true, value_enum)]
    phase: Option<PhaseArg>,

    /// Conductor material override
    #[arg(long, global = true, value_enum)]
    material: Option<MaterialArg>,

    /// Insulation rating override (°C)
    #[arg(long, global = true, value_enum)]
    insulation: Option<InsulationArg>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "human")]
    format: OutputFormat,

    /// Exit with code 2 when any result carries a critical warning
    #[arg(long, global = true)]
    fail_on_critical: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Demand-factor load calculation from a JSON file of circuits
    Demand {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Size a phase conductor
    Conductor {
        /// Load current (A)
        #[arg(long)]
        amps: f64,
        /// Load is continuous (sized at 125%)
        #[arg(long)]
        continuous: bool,
        /// Ambient temperature (°C)
        #[arg(long, default_value_t = 30.0)]
        ambient: f64,
        /// Current-carrying conductors in the raceway
        #[arg(long, default_value_t = 3)]
        conductors: u32,
        /// Explicit OCPD rating (A)
        #[arg(long)]
        ocpd: Option<f64>,
        /// Terminations are listed for 75°C
        #[arg(long)]
        terminations_75c: bool,
    },

    /// Size an equipment grounding conductor
    Egc {
        /// OCPD rating (A)
        #[arg(long)]
        ocpd: f64,
        /// Installed phase conductor (e.g. "1/0", "250 kcmil")
        #[arg(long, value_parser = parse_size)]
        phase_conductor: ConductorSize,
        /// Skip the proportional increase for upsized phase conductors
        #[arg(long)]
        no_upsizing: bool,
    },

    /// Size a branch-circuit breaker
    Breaker {
        /// Load current (A)
        #[arg(long)]
        amps: f64,
        #[arg(long)]
        continuous: bool,
        /// Conductor to check the breaker against
        #[arg(long, value_parser = parse_size)]
        conductor: Option<ConductorSize>,
        /// Circuit voltage (V); service voltage when omitted
        #[arg(long)]
        voltage: Option<f64>,
        #[arg(long)]
        terminations_75c: bool,
    },

    /// Size a motor branch-circuit breaker
    Motor {
        /// Motor full-load current (A)
        #[arg(long)]
        fla: f64,
        /// Motor type: standard, hermetic or wound-rotor
        #[arg(long, default_value = "standard", value_parser = parse_motor_type)]
        motor_type: MotorType,
    },

    /// Size the service main breaker
    Service {
        /// Calculated service current (A)
        #[arg(long)]
        amps: f64,
    },

    /// Voltage drop over a conductor run
    Vdrop {
        #[arg(long, value_parser = parse_size)]
        size: ConductorSize,
        /// One-way length (ft)
        #[arg(long)]
        length: f64,
        /// Load current (A)
        #[arg(long)]
        amps: f64,
        /// Circuit voltage (V); service voltage when omitted
        #[arg(long)]
        voltage: Option<f64>,
        /// Maximum drop (%)
        #[arg(long, default_value_t = 3.0)]
        limit: f64,
    },

    /// Size a feeder from a JSON input file
    Feeder {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Check panelboard loading from a JSON input file
    Panel {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Run a JSON batch of calculations
    Batch {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Print a reference table
    Tables {
        #[arg(value_enum)]
        table: TableArg,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum PhaseArg {
    #[value(name = "1")]
    Single,
    #[value(name = "3")]
    Three,
}

#[derive(Clone, Copy, ValueEnum)]
enum MaterialArg {
    Cu,
    Al,
}

#[derive(Clone, Copy, ValueEnum)]
enum InsulationArg {
    #[value(name = "60")]
    C60,
    #[value(name = "75")]
    C75,
    #[value(name = "90")]
    C90,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum TableArg {
    /// Table 310.16 ampacities
    Ampacity,
    /// Table 250.122 EGC sizes
    Egc,
    /// 240.6(A) standard breaker ratings
    Ratings,
}

/// Errors surfaced to the user
#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("Cannot read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Calc(#[from] CalcError),
}

fn parse_size(s: &str) -> Result<ConductorSize, String> {
    ConductorSize::from_str_flexible(s).map_err(|e| e.to_string())
}

fn parse_motor_type(s: &str) -> Result<MotorType, String> {
    MotorType::from_str_flexible(s).map_err(|e| e.to_string())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();
    // Usage errors are input errors (exit 1); exit 2 is reserved for critical results
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            process::exit(1);
        }
        Err(e) => e.exit(),
    };

    let exit_code = match run(&cli) {
        Ok(critical) if critical && cli.global.fail_on_critical => 2,
        Ok(_) => 0,
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            report_error(&e, cli.global.format);
            1
        }
    };

    process::exit(exit_code);
}

/// Run the selected command; returns whether any result is critical.
fn run(cli: &Cli) -> Result<bool, CliError> {
    let settings = load_settings(&cli.global)?;
    let format = cli.global.format;

    let item = match &cli.command {
        Commands::Demand { file } => CalculationItem::Demand(read_json::<DemandInput>(file)?),
        Commands::Conductor { amps, continuous, ambient, conductors, ocpd, terminations_75c } => {
            let mut input = ConductorSizingInput::new(*amps).with_ambient(*ambient).with_conductor_count(*conductors);
            input.continuous = *continuous;
            input.ocpd_rating = *ocpd;
            input.terminations_75c = *terminations_75c;
            CalculationItem::Conductor(input)
        }
        Commands::Egc { ocpd, phase_conductor, no_upsizing } => CalculationItem::Egc(EgcInput {
            label: String::new(),
            ocpd_amps: *ocpd,
            phase_conductor: *phase_conductor,
            material: None,
            evaluate_upsizing: !no_upsizing,
        }),
        Commands::Breaker { amps, continuous, conductor, voltage, terminations_75c } => {
            let mut input = BreakerInput::new(*amps);
            input.continuous = *continuous;
            input.conductor_size = *conductor;
            input.circuit_voltage = *voltage;
            input.terminations_75c = *terminations_75c;
            CalculationItem::Breaker(input)
        }
        Commands::Motor { fla, motor_type } => CalculationItem::MotorBreaker(MotorBreakerInput {
            label: String::new(),
            fla: *fla,
            motor_type: *motor_type,
        }),
        Commands::Service { amps } => CalculationItem::ServiceBreaker(ServiceBreakerInput {
            label: String::new(),
            calculated_amps: *amps,
        }),
        Commands::Vdrop { size, length, amps, voltage, limit } => CalculationItem::VoltageDrop(VoltageDropInput {
            label: String::new(),
            conductor_size: *size,
            material: None,
            length_ft: *length,
            load_amps: *amps,
            voltage: *voltage,
            phase: None,
            limit_percent: *limit,
        }),
        Commands::Feeder { file } => CalculationItem::Feeder(read_json(file)?),
        Commands::Panel { file } => CalculationItem::Panel(read_json(file)?),
        Commands::Batch { file } => return run_batch(file, &cli.global, format),
        Commands::Tables { table } => {
            render::print_table(*table, &settings, format);
            return Ok(false);
        }
    };

    tracing::info!(calc_type = item.calc_type(), "running calculation");
    let output = item.evaluate(&settings)?;
    render::print_output(&output, format);
    Ok(output.has_critical())
}

fn run_batch(file: &Path, global: &GlobalArgs, format: OutputFormat) -> Result<bool, CliError> {
    let mut batch: CalculationBatch = read_json(file)?;
    if let Some(path) = &global.settings {
        batch.settings = read_json(path)?;
    }
    apply_overrides(&mut batch.settings, global);

    let report = batch.run()?;
    render::print_batch(&report, format);
    Ok(report.has_critical)
}

fn load_settings(global: &GlobalArgs) -> Result<ProjectElectricalSettings, CliError> {
    let mut settings = match &global.settings {
        Some(path) => read_json(path)?,
        None => ProjectElectricalSettings::default(),
    };
    apply_overrides(&mut settings, global);
    settings.validate()?;
    Ok(settings)
}

fn apply_overrides(settings: &mut ProjectElectricalSettings, global: &GlobalArgs) {
    if let Some(voltage) = global.service_voltage {
        settings.service_voltage = voltage;
    }
    if let Some(phase) = global.phase {
        settings.service_phase = match phase {
            PhaseArg::Single => SystemPhase::Single,
            PhaseArg::Three => SystemPhase::Three,
        };
    }
    if let Some(material) = global.material {
        settings.conductor_material = match material {
            MaterialArg::Cu => ConductorMaterial::Copper,
            MaterialArg::Al => ConductorMaterial::Aluminum,
        };
    }
    if let Some(insulation) = global.insulation {
        settings.insulation_temp_rating = match insulation {
            InsulationArg::C60 => InsulationRating::C60,
            InsulationArg::C75 => InsulationRating::C75,
            InsulationArg::C90 => InsulationRating::C90,
        };
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.display().to_string(),
        source,
    })?;
    Ok(serde_json::from_str(&text).map_err(CalcError::from)?)
}

fn report_error(error: &CliError, format: OutputFormat) {
    match (format, error) {
        (OutputFormat::Json, CliError::Calc(calc)) => render::print_json(&serde_json::json!({ "error": calc })),
        (OutputFormat::Json, CliError::Read { path, source }) => render::print_json(&serde_json::json!({
            "error": { "type": "Read", "details": { "path": path, "reason": source.to_string() } }
        })),
        (OutputFormat::Human, _) => eprintln!("Error: {}", error),
    }
}
