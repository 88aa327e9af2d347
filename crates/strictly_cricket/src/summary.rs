//! Read-only projections of a match: the render snapshot and the
//! summary handed to the archiver once a winner is declared.

use crate::action::Dart;
use crate::engine::MatchEngine;
use crate::history::{ActionKind, HistoryEntry};
use crate::ledger::Ledger;
use crate::participant::{ParticipantId, Player};
use crate::phase::Phase;
use crate::rules::{RuleSet, Variant};
use crate::target::Multiplier;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// What a scoreboard needs to draw the match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSnapshot {
    /// Match shape.
    pub variant: Variant,
    /// Sub-phase with rule flags applied.
    pub phase: Phase,
    /// Seat throwing.
    pub current_seat: usize,
    /// Player throwing.
    pub current_player: Player,
    /// Ledger entry the thrower scores for.
    pub current_participant: ParticipantId,
    /// Ledger copy.
    pub ledger: Ledger,
    /// Darts of the current turn.
    pub darts: Vec<Dart>,
    /// Multiplier staged for the next dart.
    pub selected_multiplier: Multiplier,
    /// Participants who will lose their next turn (crossed out).
    pub skipped: Vec<ParticipantId>,
    /// Participants who lost a turn and have not thrown since (greyed).
    pub served: Vec<ParticipantId>,
    /// Participant who may not be skipped again this turn.
    pub last_skipped: Option<ParticipantId>,
    /// Shared PIN counter.
    pub pin_counter: i8,
    /// Winner, once declared.
    pub winner: Option<ParticipantId>,
    /// True if there is something to undo.
    pub can_undo: bool,
}

impl MatchSnapshot {
    /// Projects the engine's live state.
    pub fn of(engine: &MatchEngine) -> Self {
        let turn = engine.turn();
        Self {
            variant: engine.variant(),
            phase: engine.phase(),
            current_seat: turn.current_seat(),
            current_player: engine.current_player().clone(),
            current_participant: engine.current_participant().clone(),
            ledger: engine.ledger().clone(),
            darts: turn.darts().to_vec(),
            selected_multiplier: turn.selected_multiplier(),
            skipped: turn.skipped().iter().cloned().collect(),
            served: turn.served().iter().cloned().collect(),
            last_skipped: turn.last_skipped().cloned(),
            pin_counter: turn.pin_counter(),
            winner: turn.winner().cloned(),
            can_undo: !engine.history().is_empty(),
        }
    }
}

/// Everything the archiver needs to store a finished match and recompute
/// its statistics from the history alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSummary {
    /// Match shape.
    pub variant: Variant,
    /// Rule flags.
    pub rules: RuleSet,
    /// Roster in throwing order.
    pub players: Vec<Player>,
    /// Seat-to-ledger ids.
    pub seats: Vec<ParticipantId>,
    /// Final ledger.
    pub ledger: Ledger,
    /// Full history, oldest first.
    pub history: Vec<HistoryEntry>,
    /// Winner.
    pub winner: ParticipantId,
    /// Turns played, the final one included.
    pub total_turns: usize,
}

impl MatchSummary {
    /// Builds the summary, or `None` while the match is undecided.
    #[instrument(skip(engine))]
    pub fn of(engine: &MatchEngine) -> Option<Self> {
        let winner = engine.winner()?.clone();
        Some(Self {
            variant: engine.variant(),
            rules: *engine.rules(),
            players: engine.players().to_vec(),
            seats: engine.mapping().seats().to_vec(),
            ledger: engine.ledger().clone(),
            history: engine.history().entries().to_vec(),
            winner,
            total_turns: engine.history().turns(),
        })
    }

    /// Counts history entries of `kind` made for `participant`.
    pub fn count(&self, kind: ActionKind, participant: &ParticipantId) -> usize {
        self.history
            .iter()
            .filter(|e| e.kind() == kind && e.participant() == participant)
            .count()
    }

    /// Darts thrown by `participant` (every entry except turn advances).
    pub fn darts_thrown(&self, participant: &ParticipantId) -> usize {
        self.history
            .iter()
            .filter(|e| e.kind() != ActionKind::TurnAdvance && e.participant() == participant)
            .count()
    }
}

/// Destination for finished matches.
///
/// Storage format and durability belong to the implementation; the engine
/// side only promises one call per finished match.
pub trait MatchArchiver {
    /// Error type of the storage backend.
    type Error: std::error::Error;

    /// Stores a finished match.
    fn archive(&mut self, summary: &MatchSummary) -> Result<(), Self::Error>;
}

/// Archiver that keeps summaries in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryArchiver {
    summaries: Vec<MatchSummary>,
}

impl MemoryArchiver {
    /// Empty archive.
    pub fn new() -> Self {
        Self::default()
    }

    /// Summaries archived so far.
    pub fn summaries(&self) -> &[MatchSummary] {
        &self.summaries
    }
}

impl MatchArchiver for MemoryArchiver {
    type Error = std::convert::Infallible;

    fn archive(&mut self, summary: &MatchSummary) -> Result<(), Self::Error> {
        info!(winner = %summary.winner, turns = summary.total_turns, "Match archived in memory");
        self.summaries.push(summary.clone());
        Ok(())
    }
}
