// src/cli.rs

//! CLI argument parsing using `clap` (derive).

use clap::{Parser, ValueEnum};

/// Command-line arguments for `assetflow`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "assetflow",
    version,
    about = "Build asset trees from a task DAG, with mode-gated pipelines and live reload.",
    long_about = None
)]
pub struct CliArgs {
    /// Root task to execute.
    #[arg(value_name = "TASK", default_value = "default")]
    pub task: String,

    /// Target environment (prod/production/staging select production mode;
    /// anything else, including typos, falls back to development).
    #[arg(long, value_name = "TARGET")]
    pub target: Option<String>,

    /// Keep running after the build: watch sources, rebuild affected tasks,
    /// notify connected browsers.
    #[arg(long)]
    pub watch: bool,

    /// Path to the project config file (TOML).
    #[arg(long, value_name = "PATH", default_value = "Assetflow.toml")]
    pub config: String,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `ASSETFLOW_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Print the task graph without executing anything.
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
