// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

use crate::types::{default_workers, Mode, RunOptions};

/// Command-line arguments for `dagrun`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "dagrun",
    version,
    about = "Run a DAG of shell tasks in dependency order, resumable on failure.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the DAG declaration (TOML), or a retry artifact.
    #[arg(value_name = "FILE")]
    pub file: String,

    /// Output a dot graph of the DAG without executing anything.
    #[arg(long)]
    pub dot: bool,

    /// Run the DAG without executing any commands.
    #[arg(long)]
    pub dry: bool,

    /// Number of parallel workers (default: number of CPUs).
    #[arg(long, value_name = "NUM", default_value_t = default_workers())]
    pub workers: usize,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `DAGRUN_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

impl CliArgs {
    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            mode: if self.dot { Mode::Dot } else { Mode::Run },
            workers: self.workers,
            dry_run: self.dry,
        }
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
