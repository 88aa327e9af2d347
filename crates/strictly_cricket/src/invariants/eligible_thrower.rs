//! Rotation invariant: the seat throwing belongs to someone still in.

use super::Invariant;
use crate::MatchEngine;

/// Invariant: the current seat's participant is not eliminated.
pub struct EligibleThrowerInvariant;

impl Invariant<MatchEngine> for EligibleThrowerInvariant {
    fn holds(engine: &MatchEngine) -> bool {
        engine
            .ledger()
            .get(engine.current_participant())
            .is_some_and(|e| !e.is_eliminated())
    }

    fn description() -> &'static str {
        "Current thrower is not eliminated"
    }
}
