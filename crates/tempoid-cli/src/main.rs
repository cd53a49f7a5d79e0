#![doc = include_str!("../README.md")]

mod cli;

use anyhow::Context;
use clap::Parser;
use cli::command::run;
use cli::config::{CliArgs, CliConfig};
use cli::telemetry::init_telemetry;
use tempoid::SnowflakeGenerator;

fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = CliConfig::try_from(args)?;

    init_telemetry()?;
    log_startup_info(&config);

    let generator = SnowflakeGenerator::with_system_clock(config.generator);
    let mut stdout = std::io::stdout().lock();
    run(&generator, &config.command, config.json, &mut stdout)
        .with_context(|| format!("{:?} failed", config.command))
}

fn log_startup_info(config: &CliConfig) {
    tracing::debug!(
        epoch_millis = config.generator.epoch_millis(),
        tolerance_millis = config.generator.tolerance_millis(),
        json = config.json,
        "starting tempoid"
    );
}
