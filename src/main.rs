//! MIMOSA command line
//!
//! Usage:
//! - `mimosa run <config> --output <dir> --name <name>`: build, solve and save results
//! - `mimosa check <config> [--dot]`: build the model and report its structure

use clap::{Parser, Subcommand};
use mimosa_components::catalog::build_model;
use mimosa_components::config::ModelConfig;
use mimosa_core::errors::MimosaResult;
use mimosa_core::solver::FixedPointSolver;
use std::path::PathBuf;
use std::process;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "mimosa")]
#[command(about = "Assemble and solve a MIMOSA integrated assessment model")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build and solve a model, then write its results
    Run {
        /// Path to the TOML configuration
        config: PathBuf,
        /// Directory for the result files
        #[arg(long, default_value = "output")]
        output: PathBuf,
        /// Name of the run, used for the result file names
        #[arg(long, default_value = "run")]
        name: String,
    },
    /// Build a model and report its components and constraints
    Check {
        /// Path to the TOML configuration
        config: PathBuf,
        /// Print the component dependency graph in Graphviz format
        #[arg(long)]
        dot: bool,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,mimosa_core=info,mimosa_components=info"));
    fmt().with_env_filter(filter).with_target(false).init();
}

fn run(config: PathBuf, output: PathBuf, name: String) -> MimosaResult<()> {
    let config = ModelConfig::from_path(&config)?;
    let model = build_model(&config)?;
    let results = model.solve(&FixedPointSolver::new(), &config.solver, &name)?;
    let (json, csv) = results.save(&output)?;
    info!(
        status = %results.status,
        objective = results.objective,
        "wrote {} and {}",
        json.display(),
        csv.display()
    );
    Ok(())
}

fn check(config: PathBuf, dot: bool) -> MimosaResult<()> {
    let config = ModelConfig::from_path(&config)?;
    let model = build_model(&config)?;
    info!("Model is valid");
    info!("  - Components: {}", model.components().len());
    info!("  - Columns: {}", model.registry().n_columns());
    info!("  - Constraints: {}", model.constraints().len());
    info!("  - Objective: {}", model.objective_owner());
    if dot {
        println!("{}", model.as_dot_with_links());
    }
    Ok(())
}

fn main() {
    init_logging();

    let args = Args::parse();
    let outcome = match args.command {
        Command::Run {
            config,
            output,
            name,
        } => run(config, output, name),
        Command::Check { config, dot } => check(config, dot),
    };

    if let Err(e) = outcome {
        error!("{e}");
        process::exit(1);
    }
}
