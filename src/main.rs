//! IndexLab CLI - Spectral Index Builder
//!
//! Command-line interface for building and composing spectral index layers.

use std::process;

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use log::debug;

use indexlab::cli::{commands, Cli};
use indexlab::AppConfig;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logger
    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    debug!("IndexLab v{}", env!("CARGO_PKG_VERSION"));

    let config = match &cli.config {
        Some(path) => AppConfig::load(path),
        None => AppConfig::from_env(),
    }
    .context("failed to load configuration")?;
    let runtime = config.build().context("invalid configuration")?;

    let Some(command) = cli.command else {
        println!("IndexLab v{}", env!("CARGO_PKG_VERSION"));
        println!("Use --help for available commands");
        return Ok(());
    };

    if let Err(e) = commands::run(&runtime, command) {
        eprintln!("Error [{}]: {}", e.error_code(), e);
        for suggestion in e.recovery_suggestions() {
            eprintln!("  - {}", suggestion);
        }
        process::exit(1);
    }

    Ok(())
}
