//! DCPT prefetcher CLI.
//!
//! This binary replays memory access traces through the prefetcher. It performs:
//! 1. **Replay:** Load a `pc addr` trace, run it through the prefetcher and a model cache, print statistics.
//! 2. **Config:** Print the effective configuration as JSON, as a starting point for a config file.

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use dcpt_core::config::Config;
use dcpt_core::sim::{Replayer, trace};

#[derive(Parser, Debug)]
#[command(
    name = "dcpt",
    author,
    version,
    about = "Delta-correlating prefetcher trace replay",
    long_about = "Replay a memory access trace through the DCPT prefetcher and a model cache.\n\nTrace lines are `<pc> <addr>` in decimal or 0x-hex; `#` starts a comment.\n\nExamples:\n  dcpt replay traces/stream.trace\n  dcpt replay traces/stream.trace --config dcpt.json --json\n  dcpt config > dcpt.json"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a trace and print prefetcher statistics.
    Replay {
        /// Trace file to replay.
        trace: PathBuf,

        /// JSON configuration file (defaults are used for omitted fields).
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print the report as JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Print the effective configuration as JSON.
    Config {
        /// JSON configuration file to merge over the defaults.
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Replay {
            trace,
            config,
            json,
        } => cmd_replay(&trace, config.as_deref(), json),
        Commands::Config { config } => cmd_config(config.as_deref()),
    };

    if let Err(e) = result {
        error!("{e}");
        eprintln!("[!] {e}");
        process::exit(1);
    }
}

/// Loads the configuration file if one was given, else the defaults.
fn load_config(path: Option<&Path>) -> Result<Config, Box<dyn std::error::Error>> {
    Ok(match path {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    })
}

/// Replays `trace_path` and prints the report.
fn cmd_replay(
    trace_path: &Path,
    config_path: Option<&Path>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;
    let events = trace::load(trace_path)?;
    info!(events = events.len(), path = %trace_path.display(), "trace loaded");

    let mut replayer = Replayer::try_new(&config)?;
    let report = replayer.run(events);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        report.print();
    }
    Ok(())
}

/// Prints the effective configuration.
fn cmd_config(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}
