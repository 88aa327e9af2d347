//! Match variants and rule flags.

use serde::{Deserialize, Serialize};

/// Marks needed to close a target.
pub const MARKS_TO_CLOSE: u8 = 3;

/// Darts in a regular turn.
pub const DARTS_PER_TURN: usize = 3;

/// KO points at which a participant is eliminated.
pub const KO_POINTS_TO_ELIMINATE: u8 = 3;

/// Magnitude of the PIN counter that decides the match.
pub const PIN_TO_WIN: i8 = 3;

/// Shape of the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// One against one.
    Singles,
    /// Two teams of two; teammates share one ledger entry.
    Teams,
    /// Three players, each for themselves.
    ThreeWay,
    /// Four players, each for themselves.
    FourWay,
}

impl Variant {
    /// Number of throwers the variant is played with.
    pub fn player_count(self) -> usize {
        match self {
            Variant::Singles => 2,
            Variant::Teams => 4,
            Variant::ThreeWay => 3,
            Variant::FourWay => 4,
        }
    }

    /// True for the 3-way and 4-way variants, where the KO phase exists.
    pub fn has_ko_phase(self) -> bool {
        matches!(self, Variant::ThreeWay | Variant::FourWay)
    }

    /// Display name.
    pub fn label(self) -> &'static str {
        match self {
            Variant::Singles => "Singles",
            Variant::Teams => "Teams",
            Variant::ThreeWay => "3-Way",
            Variant::FourWay => "4-Way",
        }
    }
}

/// Whether hits beyond three marks earn points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringMode {
    /// Only marks count; excess hits are wasted.
    MarksOnly,
    /// Excess marks on a target someone else still has open score face value.
    #[default]
    Points,
}

/// Rule flags chosen when the match is set up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RuleSet {
    /// Points rule.
    #[serde(default)]
    pub scoring: ScoringMode,
    /// Opponent-elimination sub-phase (3-way and 4-way only).
    #[serde(default = "enabled")]
    pub ko_enabled: bool,
    /// Sudden-death tiebreak between the final two.
    #[serde(default = "enabled")]
    pub pin_enabled: bool,
}

fn enabled() -> bool {
    true
}

impl RuleSet {
    /// Returns true if the points rule is active.
    pub fn awards_points(&self) -> bool {
        self.scoring == ScoringMode::Points
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            scoring: ScoringMode::Points,
            ko_enabled: true,
            pin_enabled: true,
        }
    }
}
