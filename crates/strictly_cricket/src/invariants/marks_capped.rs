//! Marks invariant: no stored mark count exceeds three.

use super::Invariant;
use crate::MatchEngine;
use crate::rules::MARKS_TO_CLOSE;

/// Invariant: stored marks are capped at three on every target.
///
/// Excess hits become points, never stored marks.
pub struct MarksCappedInvariant;

impl Invariant<MatchEngine> for MarksCappedInvariant {
    fn holds(engine: &MatchEngine) -> bool {
        engine
            .ledger()
            .iter()
            .all(|e| e.all_marks().iter().all(|m| *m <= MARKS_TO_CLOSE))
    }

    fn description() -> &'static str {
        "Stored marks never exceed three"
    }
}
