//! Append-only action log with snapshot-based undo.
//!
//! Every entry owns a deep copy of the match state taken before its action
//! ran, so restoring an entry cannot alias or corrupt live state.

use crate::engine::MatchState;
use crate::participant::ParticipantId;
use crate::phase::PinSide;
use crate::target::{Multiplier, Target};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Kind of a logged action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Scoring dart.
    Score,
    /// Missed dart.
    Miss,
    /// Dart spent on a skip.
    Skip,
    /// KO hit or heal.
    Ko,
    /// PIN push.
    Pin,
    /// Automatic end of turn (rotation or bonus turn).
    TurnAdvance,
}

/// What an action changed, kept for feedback and statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Delta {
    /// Scoring dart.
    Score {
        /// Target hit.
        target: Target,
        /// Ring multiplier.
        multiplier: Multiplier,
        /// Marks stored.
        marks_added: u8,
        /// Points awarded.
        points: u32,
    },
    /// Missed dart.
    Miss,
    /// Skip of an opponent.
    Skip {
        /// Participant skipped.
        target: ParticipantId,
    },
    /// KO points moved onto (or off) a participant.
    Ko {
        /// Participant whose KO number was hit.
        victim: ParticipantId,
        /// KO points before.
        before: u8,
        /// KO points after.
        after: u8,
        /// True if the hit eliminated the victim.
        eliminated: bool,
    },
    /// PIN counter push.
    Pin {
        /// Side that pushed.
        side: PinSide,
        /// Counter before.
        before: i8,
        /// Counter after.
        after: i8,
    },
    /// End of a turn.
    TurnAdvance {
        /// Seat that finished.
        from_seat: usize,
        /// Seat that throws next.
        to_seat: usize,
        /// True if the same seat earned a bonus turn.
        bonus: bool,
    },
}

impl Delta {
    /// Kind of action this delta belongs to.
    pub fn kind(&self) -> ActionKind {
        match self {
            Delta::Score { .. } => ActionKind::Score,
            Delta::Miss => ActionKind::Miss,
            Delta::Skip { .. } => ActionKind::Skip,
            Delta::Ko { .. } => ActionKind::Ko,
            Delta::Pin { .. } => ActionKind::Pin,
            Delta::TurnAdvance { .. } => ActionKind::TurnAdvance,
        }
    }
}

/// One applied action and the state it was applied to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    seat: usize,
    participant: ParticipantId,
    delta: Delta,
    before: MatchState,
}

impl HistoryEntry {
    /// Creates an entry. `before` must be captured before the action mutates anything.
    pub fn new(seat: usize, participant: ParticipantId, delta: Delta, before: MatchState) -> Self {
        Self {
            seat,
            participant,
            delta,
            before,
        }
    }

    /// Seat that acted.
    pub fn seat(&self) -> usize {
        self.seat
    }

    /// Ledger entry the seat acted for.
    pub fn participant(&self) -> &ParticipantId {
        &self.participant
    }

    /// Change recorded.
    pub fn delta(&self) -> &Delta {
        &self.delta
    }

    /// Action kind.
    pub fn kind(&self) -> ActionKind {
        self.delta.kind()
    }

    /// State before the action.
    pub fn before(&self) -> &MatchState {
        &self.before
    }
}

/// LIFO log of applied actions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryLog {
    entries: Vec<HistoryEntry>,
}

impl HistoryLog {
    /// Empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry.
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when there is nothing to undo.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries oldest first.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Most recent entry.
    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    /// Pops the entries one undo reverts and returns the state to restore.
    ///
    /// A turn advance is never undone on its own: it is popped together with
    /// the dart that triggered it, landing back before that dart.
    /// Returns the restored state and the number of entries popped.
    #[instrument(skip(self), fields(len = self.entries.len()))]
    pub fn pop_for_undo(&mut self) -> Option<(MatchState, usize)> {
        let top = self.entries.pop()?;
        if top.kind() != ActionKind::TurnAdvance {
            debug!(kind = ?top.kind(), "Undoing action");
            return Some((top.before, 1));
        }

        match self.entries.pop() {
            Some(dart) => {
                debug!(kind = ?dart.kind(), "Undoing turn advance with its dart");
                Some((dart.before, 2))
            }
            None => Some((top.before, 1)),
        }
    }

    /// Counts entries of `kind` made by `participant`.
    pub fn count(&self, kind: ActionKind, participant: &ParticipantId) -> usize {
        self.entries
            .iter()
            .filter(|e| e.kind() == kind && e.participant() == participant)
            .count()
    }

    /// Number of turns started so far (completed turns plus the current one).
    pub fn turns(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.kind() == ActionKind::TurnAdvance)
            .count()
            + 1
    }
}
