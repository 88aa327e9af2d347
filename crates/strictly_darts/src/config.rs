//! Match configuration loaded from TOML.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use strictly_cricket::{MatchEngine, MatchSetup, Player, RuleSet, ScoringMode, Target, Variant};
use tracing::{debug, info, instrument};

/// One thrower as listed in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Stable id, used by `skip` and `ko` commands.
    id: String,

    /// Name shown on the scoreboard.
    display_name: String,

    /// Assigned KO number ("15".."20", "bull"), 3-way and 4-way only.
    #[serde(default)]
    ko_number: Option<Target>,
}

impl PlayerConfig {
    /// Creates a player entry.
    pub fn new(id: impl Into<String>, display_name: impl Into<String>, ko_number: Option<Target>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            ko_number,
        }
    }
}

/// Configuration for one cricket match.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Match shape (singles, teams, three_way, four_way).
    variant: Variant,

    /// Scoring rule (marks_only or points).
    #[serde(default)]
    scoring: ScoringMode,

    /// KO sub-phase switch.
    #[serde(default = "default_enabled")]
    ko_enabled: bool,

    /// PIN sub-phase switch.
    #[serde(default = "default_enabled")]
    pin_enabled: bool,

    /// Throwers in throwing order.
    players: Vec<PlayerConfig>,

    /// Directory finished matches are written to.
    #[serde(default = "default_archive_dir")]
    archive_dir: PathBuf,

    /// Pause before the console shows the next thrower.
    #[serde(default)]
    turn_change_delay_ms: u64,
}

fn default_enabled() -> bool {
    true
}

#[instrument]
fn default_archive_dir() -> PathBuf {
    PathBuf::from("matches")
}

impl MatchConfig {
    /// Creates a configuration with default rules.
    #[instrument(skip(players), fields(players = players.len()))]
    pub fn new(variant: Variant, players: Vec<PlayerConfig>) -> Self {
        Self {
            variant,
            scoring: ScoringMode::default(),
            ko_enabled: default_enabled(),
            pin_enabled: default_enabled(),
            players,
            archive_dir: default_archive_dir(),
            turn_change_delay_ms: 0,
        }
    }

    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading match config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Parses configuration from TOML text.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        info!(
            variant = config.variant.label(),
            players = config.players.len(),
            "Match config loaded"
        );
        Ok(config)
    }

    /// Rule flags for the engine.
    pub fn rules(&self) -> RuleSet {
        RuleSet {
            scoring: self.scoring,
            ko_enabled: self.ko_enabled,
            pin_enabled: self.pin_enabled,
        }
    }

    /// Overrides the archive directory.
    pub fn with_archive_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.archive_dir = dir.into();
        self
    }

    /// Converts into the engine's setup input.
    pub fn into_setup(self) -> MatchSetup {
        let rules = self.rules();
        MatchSetup {
            variant: self.variant,
            players: self
                .players
                .into_iter()
                .map(|p| {
                    let player = Player::new(p.id, p.display_name);
                    match p.ko_number {
                        Some(target) => player.with_ko_number(target),
                        None => player,
                    }
                })
                .collect(),
            rules,
        }
    }

    /// Starts a match from this configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the roster does not fit the variant.
    #[instrument(skip(self), fields(variant = self.variant.label()))]
    pub fn start(&self) -> Result<MatchEngine, ConfigError> {
        MatchEngine::new(self.clone().into_setup())
            .map_err(|e| ConfigError::new(format!("Invalid match setup: {}", e)))
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
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
