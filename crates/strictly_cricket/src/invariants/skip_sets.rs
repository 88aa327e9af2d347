//! Skip bookkeeping invariant.

use super::Invariant;
use crate::MatchEngine;

/// Invariant: nobody is both pending a skip and serving one, and
/// eliminated participants appear in neither set.
pub struct SkipSetsDisjointInvariant;

impl Invariant<MatchEngine> for SkipSetsDisjointInvariant {
    fn holds(engine: &MatchEngine) -> bool {
        let turn = engine.turn();
        let disjoint = turn.skipped().is_disjoint(turn.served());
        let only_remaining = turn
            .skipped()
            .iter()
            .chain(turn.served().iter())
            .all(|id| engine.ledger().get(id).is_some_and(|e| !e.is_eliminated()));
        disjoint && only_remaining
    }

    fn description() -> &'static str {
        "Skipped and served sets are disjoint and hold no eliminated participant"
    }
}
