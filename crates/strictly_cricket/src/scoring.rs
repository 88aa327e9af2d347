//! Mark and points rules for a single scoring dart.
//!
//! These are pure functions: [`score_hit`] decides what a hit is worth and
//! [`apply_hit`] writes that result into the ledger.

use crate::ledger::Ledger;
use crate::participant::ParticipantId;
use crate::rules::{MARKS_TO_CLOSE, ScoringMode};
use crate::target::{Multiplier, Target};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Effect of one scoring dart on its thrower's ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitOutcome {
    /// Marks actually stored (the hit capped at three).
    pub marks_added: u8,
    /// Marks beyond three, before deciding whether they score.
    pub excess_marks: u8,
    /// Points awarded for the excess.
    pub points: u32,
    /// True if this hit brought the target to three marks.
    pub closed: bool,
}

/// Computes the outcome of hitting `target` with `multiplier`.
///
/// `current_marks` is the thrower's stored marks on the target and
/// `opponent_open` whether any other remaining participant still has it open.
/// Excess marks score face value each, but only under the points rule and
/// only while an opponent has the target open.
#[instrument]
pub fn score_hit(
    current_marks: u8,
    target: Target,
    multiplier: Multiplier,
    opponent_open: bool,
    scoring: ScoringMode,
) -> HitOutcome {
    let uncapped = current_marks + multiplier.value();
    let marks_added = uncapped.min(MARKS_TO_CLOSE).saturating_sub(current_marks);
    let excess_marks = uncapped.saturating_sub(MARKS_TO_CLOSE);

    let points = if scoring == ScoringMode::Points && excess_marks > 0 && opponent_open {
        u32::from(excess_marks) * target.face_value()
    } else {
        0
    };

    HitOutcome {
        marks_added,
        excess_marks,
        points,
        closed: current_marks < MARKS_TO_CLOSE && uncapped >= MARKS_TO_CLOSE,
    }
}

/// Applies a scoring dart for `who` to the ledger.
///
/// Returns `None` if `who` has no ledger entry.
#[instrument(skip(ledger))]
pub fn apply_hit(
    ledger: &mut Ledger,
    who: &ParticipantId,
    target: Target,
    multiplier: Multiplier,
    scoring: ScoringMode,
) -> Option<HitOutcome> {
    let current = ledger.get(who)?.marks(target);
    let opponent_open = ledger.opponent_open(who, target);
    let outcome = score_hit(current, target, multiplier, opponent_open, scoring);

    let entry = ledger.get_mut(who)?;
    entry.add_marks(target, outcome.marks_added);
    entry.add_points(outcome.points);

    debug!(
        participant = %who,
        %target,
        marks_added = outcome.marks_added,
        points = outcome.points,
        closed = outcome.closed,
        "Hit scored"
    );
    Some(outcome)
}
