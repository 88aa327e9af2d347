//! Contract-based validation for match actions.
//!
//! Preconditions decide whether an action may run at all; postconditions
//! re-check the engine invariants after it ran (debug builds only).

use crate::action::{Action, Rejection};
use crate::engine::{MatchEngine, MatchState};
use crate::invariants::{CricketInvariants, InvariantSet, InvariantViolation};
use crate::participant::ParticipantId;
use crate::phase;
use crate::target::Target;
use tracing::{instrument, warn};

// ─────────────────────────────────────────────────────────────
//  Contract Trait
// ─────────────────────────────────────────────────────────────

/// Preconditions and postconditions of a state transition.
pub trait Contract<S, A> {
    /// Checks preconditions before applying the action.
    fn pre(state: &S, action: &A) -> Result<(), Rejection>;

    /// Checks that the transition from `before` kept every invariant.
    fn post(before: &MatchState, after: &S) -> Result<(), Vec<InvariantViolation>>;
}

// ─────────────────────────────────────────────────────────────
//  Dart Preconditions
// ─────────────────────────────────────────────────────────────

/// Precondition: the match has no winner yet.
pub struct MatchInProgress;

impl MatchInProgress {
    /// Rejects with [`Rejection::MatchOver`] once a winner is set.
    pub fn check(engine: &MatchEngine) -> Result<(), Rejection> {
        match engine.winner() {
            Some(_) => Err(Rejection::MatchOver),
            None => Ok(()),
        }
    }
}

/// Precondition: the turn has a dart slot left.
pub struct DartsRemaining;

impl DartsRemaining {
    /// Rejects with [`Rejection::TurnExhausted`] after the third dart.
    pub fn check(engine: &MatchEngine) -> Result<(), Rejection> {
        if engine.turn().has_darts_left() {
            Ok(())
        } else {
            Err(Rejection::TurnExhausted)
        }
    }
}

/// Precondition: the thrower is neither eliminated nor waiting out a skip.
pub struct ThrowerEligible;

impl ThrowerEligible {
    /// Rejects with [`Rejection::ParticipantIneligible`] for the thrower.
    pub fn check(engine: &MatchEngine) -> Result<(), Rejection> {
        let actor = engine.current_participant();
        let eliminated = engine.ledger().get(actor).is_none_or(|e| e.is_eliminated());
        if eliminated || engine.turn().skipped().contains(actor) {
            Err(Rejection::ParticipantIneligible(actor.clone()))
        } else {
            Ok(())
        }
    }
}

/// Precondition: the target is still open for the thrower.
pub struct TargetOpen;

impl TargetOpen {
    /// Rejects with [`Rejection::TargetClosed`].
    pub fn check(engine: &MatchEngine, target: Target) -> Result<(), Rejection> {
        let closed = engine
            .ledger()
            .get(engine.current_participant())
            .is_some_and(|e| e.is_closed(target));
        if closed {
            Err(Rejection::TargetClosed(target))
        } else {
            Ok(())
        }
    }
}

/// Precondition: the skip target may be skipped now.
pub struct SkipAllowed;

impl SkipAllowed {
    /// Not oneself, not the participant just skipped, not out.
    pub fn check(engine: &MatchEngine, target: &ParticipantId) -> Result<(), Rejection> {
        let entry = engine
            .ledger()
            .get(target)
            .ok_or_else(|| Rejection::UnknownParticipant(target.clone()))?;

        let ineligible = target == engine.current_participant()
            || engine.turn().last_skipped() == Some(target)
            || entry.is_eliminated();

        if ineligible {
            Err(Rejection::ParticipantIneligible(target.clone()))
        } else {
            Ok(())
        }
    }
}

/// Precondition: a KO dart on `victim`'s number is allowed.
pub struct KoAllowed;

impl KoAllowed {
    /// Own number: heal, needs KO points and nothing else. Opponent's number:
    /// KO phase active, complete board, victim still in and numbered.
    pub fn check(engine: &MatchEngine, victim: &ParticipantId) -> Result<(), Rejection> {
        if !(engine.rules().ko_enabled && engine.variant().has_ko_phase()) {
            return Err(Rejection::PhaseInactive("KO"));
        }

        let target = engine
            .ledger()
            .get(victim)
            .ok_or_else(|| Rejection::UnknownParticipant(victim.clone()))?;
        let actor = engine.current_participant();

        if victim == actor {
            return if target.ko_points() > 0 {
                Ok(())
            } else {
                Err(Rejection::ParticipantIneligible(actor.clone()))
            };
        }

        if target.is_eliminated() || target.ko_number().is_none() {
            return Err(Rejection::ParticipantIneligible(victim.clone()));
        }
        if !engine.ko_active() {
            return Err(Rejection::PhaseInactive("KO"));
        }
        if !phase::board_complete(engine.ledger(), actor) {
            return Err(Rejection::ParticipantIneligible(actor.clone()));
        }
        Ok(())
    }
}

/// Precondition: the thrower may push the PIN counter.
pub struct PinAllowed;

impl PinAllowed {
    /// PIN phase active and the push moves the counter legally.
    pub fn check(engine: &MatchEngine) -> Result<(), Rejection> {
        if !engine.pin_active() {
            return Err(Rejection::PhaseInactive("PIN"));
        }
        let actor = engine.current_participant();
        let side = phase::pin_side_of(engine.ledger(), actor)
            .ok_or_else(|| Rejection::ParticipantIneligible(actor.clone()))?;
        let complete = phase::board_complete(engine.ledger(), actor);
        phase::pin_step(engine.turn().pin_counter(), side, complete)
            .map(|_| ())
            .ok_or(Rejection::InvalidPinPush)
    }
}

/// Composite precondition for any dart-consuming action.
pub struct LegalAction;

impl LegalAction {
    /// Validates all preconditions for an action.
    #[instrument(skip(engine))]
    pub fn check(action: &Action, engine: &MatchEngine) -> Result<(), Rejection> {
        MatchInProgress::check(engine)?;
        DartsRemaining::check(engine)?;
        ThrowerEligible::check(engine)?;

        match action {
            Action::Score { target, .. } => TargetOpen::check(engine, *target),
            Action::Miss => Ok(()),
            Action::Skip(target) => SkipAllowed::check(engine, target),
            Action::Ko { victim, .. } => KoAllowed::check(engine, victim),
            Action::Pin => PinAllowed::check(engine),
            Action::Undo => Ok(()),
        }
    }
}

// ─────────────────────────────────────────────────────────────
//  Action Contract (Pre + Post)
// ─────────────────────────────────────────────────────────────

/// Contract for every dart-consuming action.
///
/// Postconditions:
/// - engine invariants hold
/// - marks never decrease and eliminations are one-way
pub struct ActionContract;

impl Contract<MatchEngine, Action> for ActionContract {
    fn pre(engine: &MatchEngine, action: &Action) -> Result<(), Rejection> {
        LegalAction::check(action, engine)
    }

    fn post(before: &MatchState, after: &MatchEngine) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = CricketInvariants::check_all(after).err().unwrap_or_default();

        for old in before.ledger().iter() {
            let Some(new) = after.ledger().get(old.id()) else {
                violations.push(InvariantViolation::new("Ledger entry disappeared"));
                continue;
            };
            if Target::ALL.iter().any(|t| new.marks(*t) < old.marks(*t)) {
                violations.push(InvariantViolation::new("Marks decreased"));
            }
            if old.is_eliminated() && !new.is_eliminated() {
                violations.push(InvariantViolation::new("Eliminated participant returned"));
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

/// Asserts the action postconditions (panics in debug builds on violation).
#[instrument(skip(before, after))]
pub fn assert_postconditions(before: &MatchState, after: &MatchEngine) {
    if let Err(violations) = ActionContract::post(before, after) {
        for v in &violations {
            warn!(violation = %v.description, "Postcondition failed");
        }
        debug_assert!(violations.is_empty(), "Postcondition violated: {:?}", violations);
    }
}
