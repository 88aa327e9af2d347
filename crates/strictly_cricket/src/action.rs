//! First-class actions, recorded darts and rejection reasons.
//!
//! Actions are the only way anything outside the engine changes a match.
//! They can be validated before they are applied and replayed from a script.

use crate::participant::ParticipantId;
use crate::phase::PinSide;
use crate::target::{Multiplier, Target};
use serde::{Deserialize, Serialize};

/// Something a scorekeeper asks the engine to do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// A dart landed on a cricket target.
    Score {
        /// Target hit.
        target: Target,
        /// Ring multiplier.
        multiplier: Multiplier,
    },
    /// A dart that scored nothing.
    Miss,
    /// Spend a dart to make an opponent lose their next turn.
    Skip(ParticipantId),
    /// A dart on a participant's KO number (an opponent's, or one's own to heal).
    Ko {
        /// Participant whose KO number was hit.
        victim: ParticipantId,
        /// Ring multiplier.
        multiplier: Multiplier,
    },
    /// Push the shared PIN counter.
    Pin,
    /// Revert the last dart.
    Undo,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Score { target, multiplier } => write!(f, "{}{}", multiplier.prefix(), target),
            Action::Miss => write!(f, "miss"),
            Action::Skip(id) => write!(f, "skip {}", id),
            Action::Ko { victim, multiplier } => write!(f, "ko {} x{}", victim, multiplier.value()),
            Action::Pin => write!(f, "pin"),
            Action::Undo => write!(f, "undo"),
        }
    }
}

/// One used dart slot of the current turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dart {
    /// Scoring hit.
    Hit {
        /// Target hit.
        target: Target,
        /// Ring multiplier.
        multiplier: Multiplier,
        /// Marks stored.
        marks: u8,
        /// Points awarded.
        points: u32,
    },
    /// Empty slot.
    Miss,
    /// Slot spent skipping an opponent.
    Skip {
        /// Participant skipped.
        target: ParticipantId,
    },
    /// Hit on an opponent's KO number.
    KoHit {
        /// Participant attacked.
        victim: ParticipantId,
        /// Victim's KO points after the hit.
        ko_points: u8,
        /// True if the hit knocked the victim out.
        eliminated: bool,
    },
    /// Hit on one's own KO number, removing KO points.
    KoHeal {
        /// Own KO points after healing.
        ko_points: u8,
    },
    /// Valid PIN push.
    Pin {
        /// Side that pushed.
        side: PinSide,
        /// Counter after the push.
        counter: i8,
    },
}

impl Dart {
    /// Returns true if the dart counts toward the three-for-three bonus turn.
    ///
    /// Scoring hits and KO hits count; misses, skips, heals and PIN pushes do not.
    pub fn counts_for_bonus(&self) -> bool {
        matches!(self, Dart::Hit { .. } | Dart::KoHit { .. })
    }
}

/// Why an action was not applied. The match is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum Rejection {
    /// All three darts of the turn are used.
    #[display("Turn exhausted: all darts of this turn are used")]
    TurnExhausted,

    /// The actor or the chosen participant cannot take part in this action.
    #[display("Participant {} is not eligible for this action", _0)]
    ParticipantIneligible(ParticipantId),

    /// The thrower already has three marks on the target.
    #[display("Target {} is already closed", _0)]
    TargetClosed(Target),

    /// The PIN counter cannot move in the requested direction.
    #[display("Invalid PIN push")]
    InvalidPinPush,

    /// History is empty.
    #[display("Nothing to undo")]
    NothingToUndo,

    /// A winner has been declared.
    #[display("Match is over")]
    MatchOver,

    /// The KO or PIN sub-phase is disabled or not active.
    #[display("{} phase is not active", _0)]
    PhaseInactive(&'static str),

    /// The id does not belong to this match.
    #[display("Unknown participant {}", _0)]
    UnknownParticipant(ParticipantId),
}

impl std::error::Error for Rejection {}

/// Malformed input to [`crate::MatchEngine::new`].
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum SetupError {
    /// Player count does not fit the variant.
    #[display("{} needs {} players, got {}", variant, expected, actual)]
    WrongPlayerCount {
        /// Variant name.
        variant: &'static str,
        /// Players required.
        expected: usize,
        /// Players supplied.
        actual: usize,
    },

    /// Two players share an id.
    #[display("Duplicate participant id {}", _0)]
    DuplicateParticipant(ParticipantId),

    /// A KO-enabled 3-way or 4-way match lacks a player's KO number.
    #[display("Participant {} has no KO number", _0)]
    MissingKoNumber(ParticipantId),
}

impl std::error::Error for SetupError {}
