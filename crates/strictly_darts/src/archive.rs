//! JSON-file match archive.

use chrono::{DateTime, Local};
use derive_more::{Display, Error};
use std::path::{Path, PathBuf};
use strictly_cricket::{MatchArchiver, MatchSummary};
use tracing::{debug, info, instrument};

/// Writes each finished match to `<dir>/<timestamp>-<winner>.json`.
#[derive(Debug, Clone)]
pub struct JsonFileArchiver {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl JsonFileArchiver {
    /// Archiver rooted at `dir` (created on first write).
    #[instrument(skip(dir), fields(dir = %dir.as_ref().display()))]
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            written: Vec::new(),
        }
    }

    /// Archive directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Files written by this archiver, oldest first.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    /// File name for a summary finished at `at`.
    pub fn file_name(summary: &MatchSummary, at: DateTime<Local>) -> String {
        let winner: String = summary
            .winner
            .as_str()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        format!("{}-{}.json", at.format("%Y%m%dT%H%M%S%.3f"), winner)
    }

    /// Reads an archived summary back.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<MatchSummary, ArchiveError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let summary = serde_json::from_str(&content)?;
        debug!("Archived match loaded");
        Ok(summary)
    }
}

impl MatchArchiver for JsonFileArchiver {
    type Error = ArchiveError;

    #[instrument(skip(self, summary), fields(dir = %self.dir.display(), winner = %summary.winner))]
    fn archive(&mut self, summary: &MatchSummary) -> Result<(), ArchiveError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(Self::file_name(summary, Local::now()));
        let json = serde_json::to_string_pretty(summary)?;
        std::fs::write(&path, json)?;

        info!(path = %path.display(), turns = summary.total_turns, "Match archived");
        self.written.push(path);
        Ok(())
    }
}

/// Archive error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Archive error: {} at {}:{}", message, file, line)]
pub struct ArchiveError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ArchiveError {
    /// Creates a new archive error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<std::io::Error> for ArchiveError {
    #[track_caller]
    fn from(err: std::io::Error) -> Self {
        Self::new(format!("I/O error: {}", err))
    }
}

impl From<serde_json::Error> for ArchiveError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        Self::new(format!("JSON error: {}", err))
    }
}
