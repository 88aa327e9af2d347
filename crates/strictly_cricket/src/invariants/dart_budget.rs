//! Turn budget invariant: at most three darts, PIN counter in range.

use super::Invariant;
use crate::MatchEngine;
use crate::rules::{DARTS_PER_TURN, PIN_TO_WIN};

/// Invariant: a turn never holds more than three darts and the PIN
/// counter stays within ±3.
pub struct DartBudgetInvariant;

impl Invariant<MatchEngine> for DartBudgetInvariant {
    fn holds(engine: &MatchEngine) -> bool {
        let turn = engine.turn();
        turn.darts_thrown() <= DARTS_PER_TURN && turn.pin_counter().abs() <= PIN_TO_WIN
    }

    fn description() -> &'static str {
        "At most three darts per turn and PIN counter within range"
    }
}
