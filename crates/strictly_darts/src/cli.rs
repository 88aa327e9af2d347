//! Command-line interface for strictly_darts.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Strictly Darts - cricket scorekeeper
#[derive(Parser, Debug)]
#[command(name = "strictly_darts")]
#[command(about = "Cricket darts scorekeeper with KO and PIN phases", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Score a match interactively on stdin
    Play {
        /// Path to the match config
        #[arg(short, long, default_value = "match.toml")]
        config: PathBuf,

        /// Override the archive directory from the config
        #[arg(long)]
        archive_dir: Option<PathBuf>,
    },

    /// Apply a script of console commands and print the result
    Replay {
        /// Path to the match config
        #[arg(short, long, default_value = "match.toml")]
        config: PathBuf,

        /// File with one console command per line
        #[arg(short, long)]
        script: PathBuf,

        /// Override the archive directory from the config
        #[arg(long)]
        archive_dir: Option<PathBuf>,
    },

    /// Validate a match config without playing
    CheckConfig {
        /// Path to the match config
        #[arg(short, long, default_value = "match.toml")]
        config: PathBuf,
    },
}
