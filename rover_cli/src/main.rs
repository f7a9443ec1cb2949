//! Rover CLI: logging setup, config loading, and subcommand dispatch.

mod cli;
mod drive;
mod error_fmt;

use std::path::Path;

use clap::Parser;
use eyre::WrapErr;

use cli::{Cli, Commands, FILE_GUARD, JSON_MODE};

fn main() {
    let _ = color_eyre::install();
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);

    let code = match run(&cli) {
        Ok(()) => 0,
        Err(err) => {
            if *JSON_MODE.get().unwrap_or(&false) {
                eprintln!("{}", error_fmt::format_error_json(&err));
            } else {
                eprintln!("{}", error_fmt::humanize(&err));
            }
            error_fmt::exit_code_for_error(&err)
        }
    };
    std::process::exit(code);
}

fn run(cli: &Cli) -> eyre::Result<()> {
    let cfg = load_config(&cli.config)?;
    init_tracing(&cli.log_level, cli.json, &cfg.logging);

    match &cli.cmd {
        Commands::Drive {
            heading,
            target_mps,
            timer_s,
            stats,
        } => drive::run_drive(&cfg, *heading, *target_mps, *timer_s, *stats),
        Commands::SelfCheck => drive::self_check(&cfg),
    }
}

/// Load and validate the config; a missing file means defaults.
fn load_config(path: &Path) -> eyre::Result<rover_config::Config> {
    let cfg = if path.exists() {
        let text = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("read config {}", path.display()))?;
        rover_config::load_toml(&text).wrap_err("parse config TOML")?
    } else {
        rover_config::Config::default()
    };
    cfg.validate().wrap_err("invalid configuration")?;
    Ok(cfg)
}

/// Console logging via fmt + env-filter; optional JSON-lines file output.
fn init_tracing(level: &str, json: bool, logging: &rover_config::Logging) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    match &logging.file {
        Some(file) => {
            let path = Path::new(file);
            let dir = path.parent().unwrap_or_else(|| Path::new("."));
            let name = path
                .file_name()
                .and_then(|s| s.to_str())
                .unwrap_or("rover.log");
            let appender = match logging.rotation.as_deref() {
                Some("daily") => tracing_appender::rolling::daily(dir, name),
                Some("hourly") => tracing_appender::rolling::hourly(dir, name),
                _ => tracing_appender::rolling::never(dir, name),
            };
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let _ = FILE_GUARD.set(guard);
            // File logs are always JSON lines; the console flag only affects
            // stderr output.
            builder.json().with_writer(writer).init();
        }
        None => {
            if json {
                builder.json().init();
            } else {
                builder.init();
            }
        }
    }
}
