use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use leadopt::infrastructure::{logging, render};
use leadopt::{AllocationError, LeadAllocator, ModelBuilder, ScenarioConfig, SolverBackend, SolverFactory};
use tracing::info;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Yaml,
}

#[derive(Debug, Parser)]
#[command(name = "leadopt", about = "Allocate leads across marketing campaigns for maximum profit", long_about = None)]
struct Cli {
    /// Scenario file (YAML)
    scenario: PathBuf,

    /// Override the total number of leads to allocate
    #[arg(long)]
    total_leads: Option<f64>,

    /// Override the minimum share reserved for the floor category (0.0 - 1.0)
    #[arg(long)]
    min_category_fraction: Option<f64>,

    /// Solver backend: auto, microlp, coin-cbc or highs
    #[arg(long)]
    solver: Option<SolverBackend>,

    /// Abort the solve after this many milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Log level used when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let log_format = if cli.json_logs {
        logging::LogFormat::Json
    } else {
        logging::LogFormat::Compact
    };
    logging::init(&cli.log_level, log_format)?;

    let mut scenario = ScenarioConfig::from_path(&cli.scenario)?;
    if let Some(total_leads) = cli.total_leads {
        scenario.total_leads = total_leads;
    }
    if let Some(fraction) = cli.min_category_fraction {
        scenario.min_category_fraction = fraction;
    }

    let mut solver_config = scenario.solver_config();
    if let Some(backend) = cli.solver {
        solver_config.backend = backend;
    }

    let mut program = ModelBuilder::new()
        .build(scenario.to_input())
        .map_err(AllocationError::from)?;
    program.program.solver_config = solver_config;

    let solver = SolverFactory::create_solver(&program.program)?;
    let allocator = LeadAllocator::new(solver);
    info!(solver = allocator.solver_name(), scenario = %cli.scenario.display(), "starting allocation");

    let deadline = cli
        .timeout_ms
        .map(Duration::from_millis)
        .or_else(|| {
            program
                .program
                .solver_config
                .time_limit
                .and_then(|seconds| Duration::try_from_secs_f64(seconds).ok())
        });

    let allocation = match deadline {
        Some(deadline) => allocator.solve_with_deadline(program, deadline).await,
        None => allocator.solve(&program),
    }
    .map_err(AllocationError::from)?;

    match cli.format {
        OutputFormat::Table => println!("{}", render::allocation_table(&allocation)),
        OutputFormat::Yaml => print!("{}", serde_norway::to_string(&allocation)?),
    }

    Ok(())
}
