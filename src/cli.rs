// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::default_config_path;
use crate::types::HyperperiodMode;

/// Command-line arguments for `rtdag`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "rtdag",
    version,
    about = "Enumerate the job-level DAGs of a multi-rate real-time task set.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the task-set file (TOML).
    ///
    /// Default: `rtdag.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value_os_t = default_config_path())]
    pub config: PathBuf,

    /// Override `[analysis].hyperperiod` ("max_period" or "lcm").
    #[arg(long, value_name = "MODE")]
    pub hyperperiod: Option<HyperperiodMode>,

    /// Override `[analysis].max_candidates`.
    #[arg(long, value_name = "N")]
    pub max_candidates: Option<u64>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `RTDAG_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print the task set and candidate count, but don't
    /// enumerate.
    #[arg(long)]
    pub dry_run: bool,
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
