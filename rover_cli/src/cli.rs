//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

/// Initial heading for the `drive` subcommand.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum Heading {
    Right,
    Left,
    Stopped,
}

#[derive(Parser, Debug)]
#[command(name = "rover", version, about = "Rover drive controller CLI")]
pub struct Cli {
    /// Path to config TOML; defaults apply when the file does not exist
    #[arg(long, value_name = "FILE", default_value = "etc/rover.toml")]
    pub config: PathBuf,

    /// Log as JSON lines instead of pretty
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace)
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    pub log_level: String,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the control loop, reading newline-delimited command frames
    /// from stdin
    Drive {
        /// Initial heading; the default waits Stopped for a command
        #[arg(long, value_enum, default_value_t = Heading::Stopped)]
        heading: Heading,

        /// Override the configured target velocity (m/s)
        #[arg(long, value_name = "MPS")]
        target_mps: Option<f32>,

        /// Enable the move timer with this duration in seconds
        #[arg(long, value_name = "SECONDS")]
        timer_s: Option<f32>,

        /// Log a controller snapshot once per second
        #[arg(long, action = ArgAction::SetTrue)]
        stats: bool,
    },
    /// Quick health check (hardware presence / sim ok)
    SelfCheck,
}
