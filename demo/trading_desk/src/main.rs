//! Trading Desk Demo CLI
//!
//! Entry point for generating sample feeds and running the desk over them.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use trading_desk::commands;
use trading_desk::prelude::*;

/// Bond trading desk simulation
#[derive(Parser)]
#[command(name = "trading-desk")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "desk.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process the price, trade, market data and inquiry feeds
    Run {
        /// Directory holding the input feeds
        #[arg(short, long)]
        data_dir: Option<PathBuf>,

        /// Directory historical output is appended to
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Write sample input feeds
    Generate {
        /// Directory to write the feeds to
        #[arg(short, long)]
        data_dir: Option<PathBuf>,

        /// Generator seed (non-zero)
        #[arg(short, long)]
        seed: Option<u64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = DeskConfig::load_or_default(&cli.config)?.with_env_override();

    match &cli.command {
        Commands::Run {
            data_dir,
            output_dir,
        } => {
            if let Some(dir) = data_dir {
                config.data_dir = dir.clone();
            }
            if let Some(dir) = output_dir {
                config.output_dir = dir.clone();
            }
        }
        Commands::Generate { data_dir, seed } => {
            if let Some(dir) = data_dir {
                config.data_dir = dir.clone();
            }
            if let Some(seed) = seed {
                config.generator.seed = *seed;
            }
        }
    }
    config.validate()?;

    // Initialize tracing
    let level = if cli.verbose {
        "debug".to_string()
    } else {
        config.log_level.to_lowercase()
    };
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::from_default_env()
                .add_directive(format!("trading_desk={level}").parse()?)
                .add_directive(format!("bond_services={level}").parse()?)
                .add_directive(format!("desk_inputs={level}").parse()?),
        )
        .init();

    tracing::info!(config = %cli.config.display(), "Trading desk starting");

    match cli.command {
        Commands::Run { .. } => {
            let summary = commands::run::run(&config)?;
            if summary.sink_failures > 0 {
                tracing::warn!(failures = summary.sink_failures, "Historical output incomplete");
            }
        }
        Commands::Generate { .. } => {
            commands::generate::run(&config)?;
        }
    }

    Ok(())
}
