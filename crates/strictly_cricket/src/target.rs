//! Scoring targets and dart multipliers.

use serde::{Deserialize, Serialize};
use tracing::instrument;

/// One of the nine cricket targets.
///
/// Declaration order is display order (20 down to 15, then the bull and
/// the two aggregate ring slots), not the order in which they must be closed.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::EnumIter,
)]
pub enum Target {
    /// The 20 segment.
    #[serde(rename = "20")]
    Twenty,
    /// The 19 segment.
    #[serde(rename = "19")]
    Nineteen,
    /// The 18 segment.
    #[serde(rename = "18")]
    Eighteen,
    /// The 17 segment.
    #[serde(rename = "17")]
    Seventeen,
    /// The 16 segment.
    #[serde(rename = "16")]
    Sixteen,
    /// The 15 segment.
    #[serde(rename = "15")]
    Fifteen,
    /// Bullseye (outer bull single, inner bull double).
    #[serde(rename = "bull")]
    Bull,
    /// Aggregate slot for any treble-ring hit.
    #[serde(rename = "triple")]
    Triple,
    /// Aggregate slot for any double-ring hit.
    #[serde(rename = "double")]
    Double,
}

impl Target {
    /// All targets in display order.
    pub const ALL: [Target; 9] = [
        Target::Twenty,
        Target::Nineteen,
        Target::Eighteen,
        Target::Seventeen,
        Target::Sixteen,
        Target::Fifteen,
        Target::Bull,
        Target::Triple,
        Target::Double,
    ];

    /// Slot of this target in per-participant mark arrays.
    pub fn index(self) -> usize {
        match self {
            Target::Twenty => 0,
            Target::Nineteen => 1,
            Target::Eighteen => 2,
            Target::Seventeen => 3,
            Target::Sixteen => 4,
            Target::Fifteen => 5,
            Target::Bull => 6,
            Target::Triple => 7,
            Target::Double => 8,
        }
    }

    /// Point value of one excess mark on this target.
    ///
    /// The bull is worth 25; the aggregate ring slots count as 20.
    pub fn face_value(self) -> u32 {
        match self {
            Target::Twenty => 20,
            Target::Nineteen => 19,
            Target::Eighteen => 18,
            Target::Seventeen => 17,
            Target::Sixteen => 16,
            Target::Fifteen => 15,
            Target::Bull => 25,
            Target::Triple | Target::Double => 20,
        }
    }

    /// Short label used on the scoreboard.
    pub fn label(self) -> &'static str {
        match self {
            Target::Twenty => "20",
            Target::Nineteen => "19",
            Target::Eighteen => "18",
            Target::Seventeen => "17",
            Target::Sixteen => "16",
            Target::Fifteen => "15",
            Target::Bull => "Bull",
            Target::Triple => "Tr",
            Target::Double => "Db",
        }
    }

    /// Parses a scoreboard label or number (case-insensitive).
    #[instrument]
    pub fn from_label(s: &str) -> Option<Target> {
        let s = s.trim().to_lowercase();
        match s.as_str() {
            "20" => Some(Target::Twenty),
            "19" => Some(Target::Nineteen),
            "18" => Some(Target::Eighteen),
            "17" => Some(Target::Seventeen),
            "16" => Some(Target::Sixteen),
            "15" => Some(Target::Fifteen),
            "b" | "bull" | "25" => Some(Target::Bull),
            "tr" | "triple" => Some(Target::Triple),
            "dr" | "double" => Some(Target::Double),
            _ => None,
        }
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Ring multiplier of a single dart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Multiplier {
    /// Single segment, one mark.
    #[default]
    Single,
    /// Double ring, two marks.
    Double,
    /// Treble ring, three marks.
    Triple,
}

impl Multiplier {
    /// Number of marks this multiplier is worth.
    pub fn value(self) -> u8 {
        match self {
            Multiplier::Single => 1,
            Multiplier::Double => 2,
            Multiplier::Triple => 3,
        }
    }

    /// Creates a multiplier from 1, 2 or 3.
    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            1 => Some(Multiplier::Single),
            2 => Some(Multiplier::Double),
            3 => Some(Multiplier::Triple),
            _ => None,
        }
    }

    /// Scoreboard prefix ("", "D", "T").
    pub fn prefix(self) -> &'static str {
        match self {
            Multiplier::Single => "",
            Multiplier::Double => "D",
            Multiplier::Triple => "T",
        }
    }
}
