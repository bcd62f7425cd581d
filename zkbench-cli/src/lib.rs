#![warn(missing_docs)]
//! zkbench CLI Library
//!
//! Command-line driver for the benchmark harness. `zkbench::run()` (or
//! `zkbench_cli::run()`) parses arguments, loads `zkbench.toml`, plans every
//! (system, statement, configuration) triple and executes them one by one.
//!
//! ```text
//! zkbench.toml ──▶ BenchConfig ──▶ build_plan ──▶ Executor ──▶ <results>/csv/<phase>.csv
//!                                                    │
//!                                                    └──────▶ Report (human / JSON)
//! ```

mod config;
mod executor;
mod planner;
mod supervisor;

pub use config::*;
pub use executor::{
    ExecutionConfig, Executor, build_report, build_report_meta, format_human_output,
};
pub use planner::{ExecutionPlan, PlannedRun, RejectedRun, build_plan};
pub use supervisor::*;

use anyhow::{Context, anyhow, bail};
use clap::{Parser, Subcommand};
use regex::Regex;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;
use zkbench_core::{ConfigurationSpace, Integration};
use zkbench_report::{OutputFormat, PhaseTables, ReportConfig, generate_json_report};

/// zkbench CLI arguments
#[derive(Parser, Debug)]
#[command(name = "zkbench")]
#[command(author, version, about = "zkbench - benchmark harness for zero-knowledge proof systems")]
pub struct Cli {
    /// Optional subcommand (Run, List, Init); defaults to Run
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file (TOML, or JSON with a .json extension)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Benchmark only these configured systems (repeatable)
    #[arg(long)]
    pub system: Vec<String>,

    /// Only run configurations whose label matches this regex
    #[arg(long)]
    pub filter: Option<String>,

    /// Override profiler.repeats
    #[arg(long)]
    pub repeats: Option<u32>,

    /// Override sandbox.isolation
    #[arg(long, value_enum)]
    pub isolation: Option<IsolationMode>,

    /// Override output.directory
    #[arg(long)]
    pub results: Option<PathBuf>,

    /// Summary format: human or json (defaults to output.format)
    #[arg(long)]
    pub format: Option<String>,

    /// Summary file (stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Dry run - list planned configurations without executing
    #[arg(long)]
    pub dry_run: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run benchmarks (default)
    Run,
    /// List planned configurations
    List,
    /// Print a default zkbench.toml
    Init,
}

/// Run the zkbench CLI with the process arguments
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_with_cli(cli)
}

/// Run the zkbench CLI with pre-parsed arguments
pub fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    if matches!(cli.command, Some(Commands::Init)) {
        print!("{}", BenchConfig::default_toml());
        return Ok(());
    }

    let filter = if cli.verbose { "zkbench=debug" } else { "zkbench=info" };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(&cli)?;
    let systems = select_systems(&cli, &config)?;
    let label_filter = cli
        .filter
        .as_deref()
        .map(Regex::new)
        .transpose()
        .context("Invalid --filter pattern")?;

    let plan = build_plan(&systems, &config.statements, label_filter.as_ref());

    match cli.command {
        Some(Commands::List) => list_plan(&plan),
        _ if cli.dry_run => list_plan(&plan),
        _ => run_benchmarks(&cli, &config, &plan)?,
    }

    Ok(())
}

/// Load the configuration file and apply CLI overrides
fn load_config(cli: &Cli) -> anyhow::Result<BenchConfig> {
    let path = match &cli.config {
        Some(path) => path.clone(),
        None => BenchConfig::discover().ok_or_else(|| {
            anyhow!(
                "No {} found; create one with `zkbench init > {}`",
                CONFIG_FILE,
                CONFIG_FILE
            )
        })?,
    };

    let mut config = BenchConfig::load(&path)?;
    info!("Loaded {}", path.display());

    if let Some(repeats) = cli.repeats {
        config.profiler.repeats = repeats;
    }
    if let Some(isolation) = cli.isolation {
        config.sandbox.isolation = isolation;
    }
    if let Some(results) = &cli.results {
        config.output.directory = results.clone();
    }

    config.validate(&zkbench_systems::names())?;
    Ok(config)
}

/// Configured systems paired with their integrations, restricted by `--system`
fn select_systems<'c>(
    cli: &Cli,
    config: &'c BenchConfig,
) -> anyhow::Result<Vec<(&'static dyn Integration, &'c ConfigurationSpace)>> {
    for name in &cli.system {
        if !config.systems.iter().any(|s| &s.name == name) {
            let configured: Vec<&str> = config.systems.iter().map(|s| s.name.as_str()).collect();
            bail!(
                "System `{}` is not configured (configured: {})",
                name,
                configured.join(", ")
            );
        }
    }

    config
        .systems
        .iter()
        .filter(|s| cli.system.is_empty() || cli.system.contains(&s.name))
        .map(|s| {
            zkbench_systems::find(&s.name)
                .map(|integration| (integration, &s.space))
                .ok_or_else(|| anyhow!("Unknown system `{}`", s.name))
        })
        .collect()
}

fn list_plan(plan: &ExecutionPlan<'_>) {
    println!("zkbench Plan:");

    let mut systems: BTreeMap<&str, Vec<&PlannedRun<'_>>> = BTreeMap::new();
    for run in &plan.runs {
        systems.entry(run.integration.name()).or_default().push(run);
    }

    for (system, runs) in &systems {
        println!("├── system: {}", system);
        for run in runs {
            println!("│   ├── {} ({})", run.label, run.statement);
        }
    }

    for rejected in &plan.rejected {
        println!(
            "⊘ {} {} {}: {}",
            rejected.system, rejected.statement, rejected.config, rejected.message
        );
    }

    println!(
        "{} configurations planned, {} invalid combinations skipped.",
        plan.runs.len(),
        plan.invalid
    );
}

fn run_benchmarks(cli: &Cli, config: &BenchConfig, plan: &ExecutionPlan<'_>) -> anyhow::Result<()> {
    let format: OutputFormat = cli
        .format
        .as_deref()
        .unwrap_or(&config.output.format)
        .parse()
        .map_err(anyhow::Error::msg)?;

    let results_dir = std::path::absolute(&config.output.directory)
        .with_context(|| format!("Invalid results directory {}", config.output.directory.display()))?;
    let systems_dir = std::path::absolute(&config.paths.systems)
        .with_context(|| format!("Invalid systems directory {}", config.paths.systems.display()))?;

    let csv_dir = results_dir.join("csv");
    let tables = PhaseTables::create(&csv_dir)
        .with_context(|| format!("Failed to create result tables in {}", csv_dir.display()))?;

    let execution = ExecutionConfig {
        repeats: config.profiler.repeats,
        results_dir: results_dir.clone(),
        systems_dir,
    };

    info!(
        "Running {} configurations x {} repeats ({} isolation), {} invalid combinations skipped",
        plan.runs.len(),
        execution.repeats,
        config.sandbox.isolation.as_str(),
        plan.invalid
    );

    let start = Instant::now();
    let executed = match config.sandbox.isolation {
        IsolationMode::Sandbox => {
            let runner = SandboxRunner::new(config.sandbox.invocation());
            Executor::new(execution, runner, tables).execute(plan)
        }
        IsolationMode::Direct => Executor::new(execution, DirectRunner, tables).execute(plan),
    };
    let total_duration_ms = start.elapsed().as_secs_f64() * 1000.0;

    let meta = build_report_meta(ReportConfig {
        repeats: config.profiler.repeats,
        isolation: config.sandbox.isolation.as_str().to_string(),
        results_dir: results_dir.display().to_string(),
    });
    let report = build_report(meta, plan, executed, total_duration_ms);

    let output = match format {
        OutputFormat::Human => format_human_output(&report),
        OutputFormat::Json => generate_json_report(&report)?,
    };

    if let Some(path) = &cli.output {
        std::fs::write(path, &output)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Report written to {}", path.display());
    } else {
        print!("{}", output);
    }

    if report.summary.failed > 0 {
        std::process::exit(1);
    }

    Ok(())
}
