use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use assignment::Assignment;
use config::Config;
use runner::{Runner, Simulated};

pub mod assignment;
pub mod config;
pub mod runner;

/// Simulated batch worker. Reports progress over its share of a batch on stdout.
///
/// Every assignment flag falls back to the environment variable the orchestrator sets, e.g.
/// `BATCH_START=0 BATCH_END=100 batch-worker`
#[derive(Parser, Debug)]
#[command(version)]
struct Cli {
    /// Settings file. Defaults to the nearest `.batch-worker.toml` in this or a parent directory
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[command(flatten)]
    assignment: Assignment,
}

fn main() -> Result<(), anyhow::Error> {
    // stdout carries the progress report, so diagnostics go to stderr
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "batch_worker=info".into()))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Cli::parse();
    let config = Config::load(args.config.as_deref())?;
    tracing::debug!(?config, "Loaded settings");

    let work = Simulated::from(&config.simulation);
    Runner::new(std::io::stdout().lock(), work).run(&args.assignment)
}
