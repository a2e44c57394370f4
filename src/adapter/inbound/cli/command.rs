//! Command-line interface definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Tournament volume tracker and reward-target projector
#[derive(Parser, Debug)]
#[command(name = "alpha-tourney")]
#[command(version)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true, default_value = "config.toml")]
    pub config: PathBuf,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Track competitions until interrupted
    Run(RunArgs),

    /// Validate the configuration file and print the effective settings
    Check,

    /// List finalized competitions from the archive
    Finalized(FinalizedArgs),
}

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Override the log level (e.g. `debug`, `alpha_tourney=trace`)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,
}

#[derive(Args, Debug, Default)]
pub struct FinalizedArgs {
    /// Only show this asset
    #[arg(long)]
    pub asset: Option<String>,
}
