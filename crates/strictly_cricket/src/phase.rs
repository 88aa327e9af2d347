//! Sub-phase detection over the ledger.
//!
//! Nothing here mutates. The turn engine asks these questions before it
//! interprets an action.

use crate::ledger::Ledger;
use crate::participant::ParticipantId;
use crate::rules::{PIN_TO_WIN, Variant};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Sub-phase the match is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Nobody has a complete board yet (or no sub-phase applies).
    Open,
    /// Knockout: completed boards may attack opponents' KO numbers.
    Ko,
    /// Sudden-death tiebreak between the final two.
    Pin,
}

/// Returns true if every target is closed for `id`.
pub fn board_complete(ledger: &Ledger, id: &ParticipantId) -> bool {
    ledger.get(id).is_some_and(|e| e.board_complete())
}

/// Number of participants not yet eliminated.
pub fn remaining_count(ledger: &Ledger) -> usize {
    ledger.remaining().count()
}

/// KO phase: more than two remain and one of them has a complete board.
///
/// Never active for singles or teams.
#[instrument(skip(ledger))]
pub fn ko_phase_active(ledger: &Ledger, variant: Variant) -> bool {
    variant.has_ko_phase()
        && remaining_count(ledger) > 2
        && ledger.remaining().any(|e| e.board_complete())
}

/// PIN phase: the final two are decided, and one of them has a complete board.
///
/// Singles and teams are always down to two, so any complete board starts it.
#[instrument(skip(ledger))]
pub fn pin_phase_active(ledger: &Ledger, variant: Variant) -> bool {
    let any_complete = ledger.remaining().any(|e| e.board_complete());
    if variant.has_ko_phase() {
        remaining_count(ledger) == 2 && any_complete
    } else {
        any_complete
    }
}

/// Current sub-phase, ignoring rule flags.
pub fn current_phase(ledger: &Ledger, variant: Variant) -> Phase {
    if ko_phase_active(ledger, variant) {
        Phase::Ko
    } else if pin_phase_active(ledger, variant) {
        Phase::Pin
    } else {
        Phase::Open
    }
}

/// Direction a PIN contender pushes the counter toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PinSide {
    /// Wins at +3.
    Positive,
    /// Wins at -3.
    Negative,
}

impl PinSide {
    /// Unit step toward this side's end.
    pub fn direction(self) -> i8 {
        match self {
            PinSide::Positive => 1,
            PinSide::Negative => -1,
        }
    }

    /// Returns true if the counter has reached this side's winning end.
    pub fn has_won(self, counter: i8) -> bool {
        counter == self.direction() * PIN_TO_WIN
    }
}

/// The two PIN contenders, positive side first, in seating order.
pub fn pin_sides(ledger: &Ledger) -> Option<(ParticipantId, ParticipantId)> {
    let mut remaining = ledger.remaining();
    let positive = remaining.next()?.id().clone();
    let negative = remaining.next()?.id().clone();
    if remaining.next().is_some() {
        return None;
    }
    Some((positive, negative))
}

/// Which side `id` plays in the PIN phase, if it is a contender.
pub fn pin_side_of(ledger: &Ledger, id: &ParticipantId) -> Option<PinSide> {
    let (positive, negative) = pin_sides(ledger)?;
    if *id == positive {
        Some(PinSide::Positive)
    } else if *id == negative {
        Some(PinSide::Negative)
    } else {
        None
    }
}

/// Step a contender may push the counter, or `None` if the push is invalid.
///
/// A complete board pushes toward its own end. An incomplete board may only
/// push back toward zero, and only while the counter favours the opponent.
#[instrument]
pub fn pin_step(counter: i8, side: PinSide, board_complete: bool) -> Option<i8> {
    let dir = side.direction();
    if board_complete {
        return Some(dir);
    }
    let favours_opponent = counter * dir < 0;
    favours_opponent.then_some(dir)
}
