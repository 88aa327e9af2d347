//! Strictly Cricket - a turn-based cricket darts match engine.
//!
//! # Architecture
//!
//! - **Targets & rules**: the nine targets and the rule flags of a match
//! - **Ledger**: marks, points and KO points per participant (player or team)
//! - **Scoring**: pure mark/points rules for a single dart
//! - **Phase**: KO and PIN sub-phase detection
//! - **Engine**: turn state machine, skip-aware rotation and bonus turns
//! - **History**: snapshot log for exact undo
//!
//! # Example
//!
//! ```
//! use strictly_cricket::{Action, MatchEngine, MatchSetup, Multiplier, Player, RuleSet, Target, Variant};
//!
//! let mut engine = MatchEngine::new(MatchSetup {
//!     variant: Variant::Singles,
//!     players: vec![Player::new("ann", "Ann"), Player::new("bob", "Bob")],
//!     rules: RuleSet::default(),
//! })?;
//!
//! engine.apply(Action::Score { target: Target::Twenty, multiplier: Multiplier::Triple })?;
//! assert!(engine.ledger().get(&"ann".into()).is_some_and(|e| e.is_closed(Target::Twenty)));
//!
//! engine.apply(Action::Undo)?;
//! assert_eq!(engine.history().len(), 0);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod engine;
mod history;
mod ledger;
mod participant;
mod rules;
mod scoring;
mod summary;
mod target;
mod turn;

pub mod contracts;
pub mod invariants;
pub mod phase;

pub use action::{Action, Dart, Rejection, SetupError};
pub use engine::{MatchEngine, MatchSetup, MatchState, Outcome, TurnChange};
pub use history::{ActionKind, Delta, HistoryEntry, HistoryLog};
pub use ledger::{Ledger, LedgerEntry};
pub use participant::{ParticipantId, ParticipantMapping, Player};
pub use phase::{Phase, PinSide};
pub use rules::{
    DARTS_PER_TURN, KO_POINTS_TO_ELIMINATE, MARKS_TO_CLOSE, PIN_TO_WIN, RuleSet, ScoringMode,
    Variant,
};
pub use scoring::{HitOutcome, apply_hit, score_hit};
pub use summary::{MatchArchiver, MatchSnapshot, MatchSummary, MemoryArchiver};
pub use target::{Multiplier, Target};
pub use turn::TurnState;
