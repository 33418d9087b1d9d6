//! `dps` - estimate damage per second for a gear and talent configuration
use anyhow::{bail, Context, Result};
use clap::Parser;
use gear_core::Character;
use profiles_core::ProfileRegistry;
use sim_core::{RotationConstants, SimConfig, SimReport, Simulation};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

#[derive(Parser, Debug)]
#[command(name = "dps", version, about = "Rotation damage-per-second simulator")]
struct Cli {
    /// Parameters as name=value, applied after any profiles
    params: Vec<String>,

    /// Simulated hours
    #[arg(long, default_value_t = 100)]
    duration: u32,

    /// Random seed; taken from the clock when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Trace every event to stderr and print the full report
    #[arg(short, long)]
    verbose: bool,

    /// Write the event trace and report to a file
    #[arg(long)]
    log: Option<PathBuf>,

    /// TOML file overriding rotation constants
    #[arg(long)]
    constants: Option<PathBuf>,

    /// Directory of profile files
    #[arg(long, default_value = "profiles")]
    profiles: PathBuf,

    /// Profile to apply, in order (repeatable)
    #[arg(long = "profile")]
    profile: Vec<String>,

    /// Run set to sweep (repeatable)
    #[arg(long = "run-set")]
    run_set: Vec<String>,

    /// Print the report as JSON instead of the DPS figure
    #[arg(long)]
    json: bool,

    /// List the available profiles and exit
    #[arg(long)]
    list_profiles: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = setup_logging(cli.verbose, cli.log.as_deref())?;

    let needs_profiles = cli.list_profiles || !cli.profile.is_empty() || !cli.run_set.is_empty();
    let registry = if needs_profiles {
        ProfileRegistry::load(&cli.profiles)
            .with_context(|| format!("loading profiles from {}", cli.profiles.display()))?
    } else {
        ProfileRegistry::new()
    };

    if cli.list_profiles {
        for id in registry.ids() {
            match registry.get(id).and_then(|p| p.description.as_deref()) {
                Some(description) => println!("{:<16} {}", id, description),
                None => println!("{}", id),
            }
        }
        return Ok(());
    }

    let constants = match &cli.constants {
        Some(path) => RotationConstants::load_from_path(path)
            .with_context(|| format!("loading constants from {}", path.display()))?,
        None => RotationConstants::default(),
    };

    let composed = registry.compose(&cli.profile, Character::default())?;
    let mut character = composed.clone();
    for token in &cli.params {
        character.apply_token(token)?;
    }

    let seed = match cli.seed {
        Some(seed) => seed,
        None => {
            let seed = clock_seed();
            eprintln!("seed: {}", seed);
            seed
        }
    };

    if cli.run_set.is_empty() {
        let report = simulate(character, &constants, cli.duration, seed)?;
        emit(&cli, &report)?;
        return Ok(());
    }

    for set in &cli.run_set {
        println!("Run: {}", set);
        for run in registry.expand_run_set(set, &composed, &cli.params)? {
            let report = simulate(run.character, &constants, cli.duration, seed)?;
            if cli.json {
                println!("{}", report.to_json()?);
            } else {
                println!("{:<28} {:.2}", run.label, report.dps);
            }
        }
        println!();
    }
    Ok(())
}

fn simulate(
    character: Character,
    constants: &RotationConstants,
    hours: u32,
    seed: u64,
) -> Result<SimReport> {
    if hours == 0 {
        bail!("--duration must be at least one hour");
    }
    info!(seed, hours, "starting run");
    for (name, value) in character.params() {
        debug!("{} = {}", name, value);
    }

    let config = SimConfig::new(character)
        .with_constants(constants.clone())
        .with_hours(hours)
        .with_seed(seed);
    let mut sim = Simulation::new(config)?;
    sim.run()?;
    Ok(sim.report())
}

fn emit(cli: &Cli, report: &SimReport) -> Result<()> {
    if cli.verbose || cli.log.is_some() {
        info!("\n{}", report.to_text());
    }
    if cli.json {
        println!("{}", report.to_json()?);
    } else {
        println!("{:.2}", report.dps);
    }
    Ok(())
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}

/// Stderr logging, plus a full trace to `log_file` when given
///
/// The returned guard flushes the file writer when dropped.
fn setup_logging(verbose: bool, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = if verbose {
        tracing::Level::TRACE
    } else {
        tracing::Level::WARN
    };
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_default_env().add_directive(level.into()));

    let Some(path) = log_file else {
        tracing_subscriber::registry().with(stderr_layer).init();
        return Ok(None);
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let Some(file_name) = path.file_name() else {
        bail!("--log needs a file name, got {}", path.display());
    };
    std::fs::create_dir_all(dir)
        .with_context(|| format!("creating log directory {}", dir.display()))?;

    let file_appender = tracing_appender::rolling::never(dir, file_name);
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .with_filter(EnvFilter::new("trace"));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .init();
    Ok(Some(guard))
}
