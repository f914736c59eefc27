//! Neutryx Exposure CLI - Monte Carlo counterparty exposure from the command line
//!
//! # Commands
//!
//! - `neutryx-exposure run -c <scenario>` - Simulate a scenario and print its
//!   EPE / ENE / EFV / PFE profile
//! - `neutryx-exposure check -c <scenario>` - Validate a scenario without
//!   simulating
//!
//! # Architecture
//!
//! As part of the **S**ervice layer, this crate reads a TOML scenario,
//! assembles the factors and trade from `pricer_models` and `pricer_xva`, and
//! renders the resulting profile.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;
mod error;

pub use error::{CliError, Result};

/// Neutryx Monte Carlo Exposure CLI
#[derive(Parser)]
#[command(name = "neutryx-exposure")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Scenario file path
    #[arg(short, long, global = true, default_value = "scenario.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate the scenario and report its exposure profile
    Run {
        /// Output format (table, json, csv)
        #[arg(short, long, default_value = "table")]
        format: String,

        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// PFE confidence level
        #[arg(long, default_value = "0.95")]
        pfe: f64,

        /// Effective EPE horizon in years
        #[arg(long, default_value = "1.0")]
        horizon: f64,
    },

    /// Validate the scenario without simulating
    Check,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    debug!("Verbose mode enabled");

    match cli.command {
        Commands::Run {
            format,
            output,
            pfe,
            horizon,
        } => commands::run::run(
            &cli.config,
            &commands::run::RunOptions {
                format: &format,
                output: output.as_deref(),
                pfe_confidence: pfe,
                horizon,
            },
        ),
        Commands::Check => commands::check::run(&cli.config),
    }
}
