use clap::Parser;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::PathBuf;

mod cli;
mod commands;

use cli::{Cli, Commands};
use testinel::config::{Config, LogLevel};

fn setup_logging(log_level: LogLevel, verbose: bool) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("testinel")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("testinel.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    // RUST_LOG env var takes precedence, then --verbose, then config log_level
    let mut builder = env_logger::Builder::new();
    let from_env = std::env::var("RUST_LOG").is_ok();

    if from_env {
        builder.parse_default_env();
    } else if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    } else {
        builder.filter_level(log_level.as_filter());
    }

    builder.target(env_logger::Target::Pipe(target)).init();

    info!("Logging initialized, writing to: {}", log_file.display());
    info!(
        "Log level: {} (from {})",
        if verbose && !from_env { log::LevelFilter::Debug } else { log_level.as_filter() },
        if from_env { "RUST_LOG env" } else if verbose { "--verbose" } else { "config" }
    );
    Ok(())
}

fn run(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        Commands::Resolve { dsn, format } => {
            commands::resolve::run(dsn.as_deref(), cli::OutputFormat::resolve(format), &config)
        }
        Commands::Report {
            dsn,
            input,
            indent,
            insecure,
        } => commands::report::run(dsn.as_deref(), input, indent, insecure, cli.quiet, &config),
        Commands::Completions { shell } => commands::completions::run(shell),
    }
}

fn main() -> Result<()> {
    // Parse CLI arguments first
    let cli = Cli::parse();

    // Load configuration (before logging, so log messages in Config::load are silent)
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    setup_logging(config.log_level, cli.verbose).context("Failed to setup logging")?;

    info!("Starting testinel with config from: {:?}", cli.config);

    run(cli, config).context("Command failed")?;

    Ok(())
}
