//! Strictly Darts - console scorekeeper.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;
use strictly_darts::{ConsoleOptions, JsonFileArchiver, MatchConfig, Scorekeeper};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Play {
            config,
            archive_dir,
        } => play(&config, archive_dir),
        Command::Replay {
            config,
            script,
            archive_dir,
        } => replay(&config, &script, archive_dir),
        Command::CheckConfig { config } => check_config(&config),
    }
}

fn load(path: &Path, archive_dir: Option<PathBuf>) -> Result<MatchConfig> {
    let config = MatchConfig::from_file(path)?;
    Ok(match archive_dir {
        Some(dir) => config.with_archive_dir(dir),
        None => config,
    })
}

/// Interactive scoring on stdin/stdout.
#[instrument(skip(archive_dir))]
fn play(path: &Path, archive_dir: Option<PathBuf>) -> Result<()> {
    let config = load(path, archive_dir)?;
    let engine = config.start()?;
    let mut keeper = Scorekeeper::new(engine, JsonFileArchiver::new(config.archive_dir()));

    info!("Type 'help' for commands");
    let options = ConsoleOptions {
        turn_change_delay: Duration::from_millis(*config.turn_change_delay_ms()),
        echo: false,
    };
    let stdin = std::io::stdin();
    strictly_darts::run(&mut keeper, stdin.lock(), &mut std::io::stdout(), options)?;
    Ok(())
}

/// Applies a command script; no pauses between turns.
#[instrument(skip(archive_dir))]
fn replay(path: &Path, script: &Path, archive_dir: Option<PathBuf>) -> Result<()> {
    let config = load(path, archive_dir)?;
    let engine = config.start()?;
    let mut keeper = Scorekeeper::new(engine, JsonFileArchiver::new(config.archive_dir()));

    let file = std::fs::File::open(script)
        .with_context(|| format!("Failed to open script {}", script.display()))?;
    let options = ConsoleOptions {
        turn_change_delay: Duration::ZERO,
        echo: true,
    };
    let report = strictly_darts::run(&mut keeper, BufReader::new(file), &mut std::io::stdout(), options)?;

    info!(
        accepted = report.accepted,
        rejected = report.rejected,
        invalid = report.invalid,
        archived = keeper.archiver().written().len(),
        "Replay finished"
    );
    Ok(())
}

#[instrument]
fn check_config(path: &Path) -> Result<()> {
    let config = MatchConfig::from_file(path)?;
    let engine = config.start()?;
    println!(
        "{}: {} participants, rules {:?}",
        engine.variant().label(),
        engine.ledger().len(),
        engine.rules()
    );
    Ok(())
}
