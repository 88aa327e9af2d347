//! The match engine: the single mutator of a cricket match.
//!
//! Every action runs through [`MatchEngine::apply`]. Preconditions are
//! checked by [`crate::contracts::ActionContract`] before anything changes;
//! a rejected action leaves the match exactly as it was. Accepted actions
//! are logged with a snapshot of the state they were applied to, which is
//! what [`Action::Undo`] restores.

use crate::action::{Action, Dart, Rejection, SetupError};
use crate::contracts::{ActionContract, Contract};
use crate::history::{Delta, HistoryEntry, HistoryLog};
use crate::ledger::{Ledger, LedgerEntry};
use crate::participant::{ParticipantId, ParticipantMapping, Player};
use crate::phase::{self, Phase};
use crate::rules::{KO_POINTS_TO_ELIMINATE, RuleSet, Variant};
use crate::scoring;
use crate::summary::{MatchSnapshot, MatchSummary};
use crate::target::{Multiplier, Target};
use crate::turn::TurnState;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info, instrument};

/// Everything an undo has to restore: ledger plus turn bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchState {
    ledger: Ledger,
    turn: TurnState,
}

impl MatchState {
    /// Combines a ledger and turn state.
    pub fn new(ledger: Ledger, turn: TurnState) -> Self {
        Self { ledger, turn }
    }

    /// Score ledger.
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Turn bookkeeping.
    pub fn turn(&self) -> &TurnState {
        &self.turn
    }
}

/// Input to [`MatchEngine::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSetup {
    /// Match shape.
    pub variant: Variant,
    /// Throwers in throwing order.
    pub players: Vec<Player>,
    /// Rule flags.
    pub rules: RuleSet,
}

/// How a turn ended after its last dart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnChange {
    /// Play moved on to another seat.
    Rotated {
        /// Seat now throwing.
        to_seat: usize,
    },
    /// Three scoring darts: the same seat throws again.
    Bonus,
}

/// Result of an accepted action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// A dart slot was used.
    Dart {
        /// Dart recorded.
        dart: Dart,
        /// Set if the dart ended the turn.
        turn: Option<TurnChange>,
        /// Set if the dart decided the match.
        winner: Option<ParticipantId>,
    },
    /// An undo reverted the last dart.
    Undone {
        /// History entries removed (two when a turn advance went with it).
        entries: usize,
    },
}

/// Cricket match engine.
#[derive(Debug, Clone)]
pub struct MatchEngine {
    variant: Variant,
    rules: RuleSet,
    players: Vec<Player>,
    mapping: ParticipantMapping,
    state: MatchState,
    history: HistoryLog,
}

impl MatchEngine {
    /// Starts a match.
    ///
    /// # Errors
    ///
    /// Rejects a player count that does not fit the variant, duplicate ids,
    /// and KO-enabled 3-way/4-way matches with players lacking a KO number.
    #[instrument(skip(setup), fields(variant = ?setup.variant, players = setup.players.len()))]
    pub fn new(setup: MatchSetup) -> Result<Self, SetupError> {
        let MatchSetup {
            variant,
            players,
            rules,
        } = setup;

        if players.len() != variant.player_count() {
            return Err(SetupError::WrongPlayerCount {
                variant: variant.label(),
                expected: variant.player_count(),
                actual: players.len(),
            });
        }

        let mut seen = HashSet::new();
        for player in &players {
            if !seen.insert(&player.id) {
                return Err(SetupError::DuplicateParticipant(player.id.clone()));
            }
        }

        if variant.has_ko_phase()
            && rules.ko_enabled
            && let Some(player) = players.iter().find(|p| p.ko_number.is_none())
        {
            return Err(SetupError::MissingKoNumber(player.id.clone()));
        }

        let mapping = ParticipantMapping::for_variant(variant, &players);
        let ledger = Ledger::new(Self::ledger_entries(variant, &players));

        info!(variant = variant.label(), "Match started");
        Ok(Self {
            variant,
            rules,
            players,
            mapping,
            state: MatchState::new(ledger, TurnState::new()),
            history: HistoryLog::new(),
        })
    }

    fn ledger_entries(variant: Variant, players: &[Player]) -> Vec<LedgerEntry> {
        match variant {
            Variant::Teams => (0..2)
                .map(|team| {
                    let names = players
                        .iter()
                        .skip(team)
                        .step_by(2)
                        .map(|p| p.display_name.as_str())
                        .collect::<Vec<_>>()
                        .join(" & ");
                    LedgerEntry::new(ParticipantId::team(team), names, None)
                })
                .collect(),
            _ => players
                .iter()
                .map(|p| LedgerEntry::new(p.id.clone(), p.display_name.clone(), p.ko_number))
                .collect(),
        }
    }

    /// Match variant.
    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Rule flags.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Roster in throwing order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Seat-to-ledger mapping.
    pub fn mapping(&self) -> &ParticipantMapping {
        &self.mapping
    }

    /// Live state.
    pub fn state(&self) -> &MatchState {
        &self.state
    }

    /// Score ledger.
    pub fn ledger(&self) -> &Ledger {
        &self.state.ledger
    }

    /// Turn bookkeeping.
    pub fn turn(&self) -> &TurnState {
        &self.state.turn
    }

    /// Action log.
    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    /// Ledger id of the seat currently throwing.
    pub fn current_participant(&self) -> &ParticipantId {
        &self.mapping.seats()[self.state.turn.current_seat]
    }

    /// Player in the seat currently throwing.
    pub fn current_player(&self) -> &Player {
        &self.players[self.state.turn.current_seat]
    }

    /// Winner, once declared.
    pub fn winner(&self) -> Option<&ParticipantId> {
        self.state.turn.winner()
    }

    /// True while the KO phase is enabled and active.
    pub fn ko_active(&self) -> bool {
        self.rules.ko_enabled && phase::ko_phase_active(&self.state.ledger, self.variant)
    }

    /// True while the PIN phase is enabled and active.
    pub fn pin_active(&self) -> bool {
        self.rules.pin_enabled && phase::pin_phase_active(&self.state.ledger, self.variant)
    }

    /// True if the match can end through the PIN tiebreak.
    ///
    /// Without KO a 3-way or 4-way match never gets down to two, so it
    /// finishes the classic way like a match with PIN switched off.
    pub fn pin_reachable(&self) -> bool {
        self.rules.pin_enabled && (!self.variant.has_ko_phase() || self.rules.ko_enabled)
    }

    /// Current sub-phase with rule flags applied.
    pub fn phase(&self) -> Phase {
        if self.ko_active() {
            Phase::Ko
        } else if self.pin_active() {
            Phase::Pin
        } else {
            Phase::Open
        }
    }

    /// Stages the multiplier shown for the next dart.
    #[instrument(skip(self))]
    pub fn select_multiplier(&mut self, multiplier: Multiplier) {
        self.state.turn.selected_multiplier = multiplier;
    }

    /// Applies one action.
    ///
    /// # Errors
    ///
    /// Returns the [`Rejection`] if a precondition fails; state is unchanged.
    #[instrument(skip(self, action), fields(action = %action, seat = self.state.turn.current_seat))]
    pub fn apply(&mut self, action: Action) -> Result<Outcome, Rejection> {
        if action == Action::Undo {
            return self.undo();
        }

        let action = self.interpret(action);
        if let Err(rejection) = ActionContract::pre(self, &action) {
            debug!(%rejection, "Action rejected");
            return Err(rejection);
        }

        let seat = self.state.turn.current_seat;
        let actor = self.current_participant().clone();
        let before = self.state.clone();

        let applied = match action {
            Action::Score { target, multiplier } => self.score(&actor, target, multiplier),
            Action::Miss => Ok((Dart::Miss, Delta::Miss)),
            Action::Skip(target) => Ok(self.skip(target)),
            Action::Ko { victim, multiplier } => self.knock_out(&actor, victim, multiplier),
            Action::Pin => self.pin(&actor),
            Action::Undo => return self.undo(),
        };
        let (dart, delta) = match applied {
            Ok(applied) => applied,
            Err(rejection) => {
                self.state = before;
                debug!(%rejection, "Action rejected");
                return Err(rejection);
            }
        };

        self.history
            .push(HistoryEntry::new(seat, actor.clone(), delta, before.clone()));
        self.state.turn.record_dart(dart.clone());

        if self.state.turn.winner.is_none() && !self.pin_reachable() {
            self.check_classic_win(&actor);
        }

        let turn = if self.state.turn.winner.is_none() && !self.state.turn.has_darts_left() {
            Some(self.end_turn())
        } else {
            None
        };

        #[cfg(debug_assertions)]
        crate::contracts::assert_postconditions(&before, self);

        Ok(Outcome::Dart {
            dart,
            turn,
            winner: self.state.turn.winner.clone(),
        })
    }

    /// Reverts the last dart (and the turn advance it triggered, if any).
    ///
    /// # Errors
    ///
    /// Returns [`Rejection::NothingToUndo`] on an empty history.
    #[instrument(skip(self), fields(history = self.history.len()))]
    pub fn undo(&mut self) -> Result<Outcome, Rejection> {
        let (restored, entries) = self.history.pop_for_undo().ok_or(Rejection::NothingToUndo)?;
        self.state = restored;
        debug!(entries, "Undo applied");
        Ok(Outcome::Undone { entries })
    }

    /// Reads a scoring dart on a KO number as the KO dart it is.
    ///
    /// An opponent's number counts as an attack while the KO phase is active
    /// and the thrower's board is complete. One's own number, once closed and
    /// while carrying KO points, counts as a heal.
    fn interpret(&self, action: Action) -> Action {
        let Action::Score { target, multiplier } = action else {
            return action;
        };
        if !(self.rules.ko_enabled && self.variant.has_ko_phase()) {
            return action;
        }

        let actor = self.current_participant();
        let Some(entry) = self.state.ledger.get(actor) else {
            return action;
        };

        let victim = if entry.ko_number() == Some(target)
            && entry.ko_points() > 0
            && entry.is_closed(target)
        {
            Some(actor.clone())
        } else if self.ko_active() && entry.board_complete() {
            self.state
                .ledger
                .remaining()
                .find(|e| e.id() != actor && e.ko_number() == Some(target))
                .map(|e| e.id().clone())
        } else {
            None
        };

        match victim {
            Some(victim) => {
                debug!(%target, participant = %victim, "Scoring dart read as KO");
                Action::Ko { victim, multiplier }
            }
            None => action,
        }
    }

    fn score(
        &mut self,
        actor: &ParticipantId,
        target: Target,
        multiplier: Multiplier,
    ) -> Result<(Dart, Delta), Rejection> {
        let hit = scoring::apply_hit(&mut self.state.ledger, actor, target, multiplier, self.rules.scoring)
            .ok_or_else(|| Rejection::UnknownParticipant(actor.clone()))?;
        Ok((
            Dart::Hit {
                target,
                multiplier,
                marks: hit.marks_added,
                points: hit.points,
            },
            Delta::Score {
                target,
                multiplier,
                marks_added: hit.marks_added,
                points: hit.points,
            },
        ))
    }

    fn skip(&mut self, target: ParticipantId) -> (Dart, Delta) {
        debug!(participant = %target, "Participant skipped");
        self.state.turn.queue_skip(target.clone());
        (
            Dart::Skip {
                target: target.clone(),
            },
            Delta::Skip { target },
        )
    }

    fn knock_out(
        &mut self,
        actor: &ParticipantId,
        victim: ParticipantId,
        multiplier: Multiplier,
    ) -> Result<(Dart, Delta), Rejection> {
        let entry = self
            .state
            .ledger
            .get_mut(&victim)
            .ok_or_else(|| Rejection::UnknownParticipant(victim.clone()))?;
        let before = entry.ko_points();

        if victim == *actor {
            let after = before.saturating_sub(multiplier.value());
            entry.set_ko_points(after);
            debug!(participant = %victim, before, after, "KO points healed");
            return Ok((
                Dart::KoHeal { ko_points: after },
                Delta::Ko {
                    victim,
                    before,
                    after,
                    eliminated: false,
                },
            ));
        }

        let after = (before + multiplier.value()).min(KO_POINTS_TO_ELIMINATE);
        entry.set_ko_points(after);
        let eliminated = after >= KO_POINTS_TO_ELIMINATE;
        if eliminated {
            entry.eliminate();
            self.state.turn.forget(&victim);
            info!(participant = %victim, by = %actor, "Participant eliminated");
        }

        Ok((
            Dart::KoHit {
                victim: victim.clone(),
                ko_points: after,
                eliminated,
            },
            Delta::Ko {
                victim,
                before,
                after,
                eliminated,
            },
        ))
    }

    fn pin(&mut self, actor: &ParticipantId) -> Result<(Dart, Delta), Rejection> {
        let side = phase::pin_side_of(&self.state.ledger, actor)
            .ok_or_else(|| Rejection::ParticipantIneligible(actor.clone()))?;
        let complete = phase::board_complete(&self.state.ledger, actor);
        let before = self.state.turn.pin_counter;
        let step = phase::pin_step(before, side, complete).ok_or(Rejection::InvalidPinPush)?;

        let after = before + step;
        self.state.turn.pin_counter = after;
        if side.has_won(after) {
            info!(winner = %actor, counter = after, "PIN won");
            self.state.turn.winner = Some(actor.clone());
        }

        Ok((
            Dart::Pin {
                side,
                counter: after,
            },
            Delta::Pin {
                side,
                before,
                after,
            },
        ))
    }

    /// Classic finish used when the PIN tiebreak cannot decide the match.
    ///
    /// A complete board wins if it leads (or ties) on points. Once every
    /// remaining board is complete and nobody can score, most points wins,
    /// ties going to the earlier seat.
    fn check_classic_win(&mut self, actor: &ParticipantId) {
        if self.ko_active() {
            return;
        }
        let ledger = &self.state.ledger;
        let Some(entry) = ledger.get(actor) else {
            return;
        };

        let leads = !self.rules.awards_points()
            || ledger
                .remaining()
                .filter(|e| e.id() != actor)
                .all(|e| e.points() <= entry.points());

        let winner = if entry.board_complete() && leads {
            Some(actor.clone())
        } else if ledger.remaining().all(|e| e.board_complete()) {
            ledger
                .remaining()
                .fold(None::<&LedgerEntry>, |best, e| match best {
                    Some(b) if b.points() >= e.points() => Some(b),
                    _ => Some(e),
                })
                .map(|e| e.id().clone())
        } else {
            None
        };

        if let Some(winner) = winner {
            info!(%winner, "Match won");
            self.state.turn.winner = Some(winner);
        }
    }

    /// Ends the turn after its last dart: bonus turn or rotation.
    fn end_turn(&mut self) -> TurnChange {
        let before = self.state.clone();
        let from_seat = self.state.turn.current_seat;
        let actor = self.current_participant().clone();
        let bonus = self.state.turn.earned_bonus();

        let (change, to_seat) = if bonus {
            self.state.turn.restart_turn();
            (TurnChange::Bonus, from_seat)
        } else {
            let to_seat = self.state.turn.rotate(&self.mapping, &self.state.ledger);
            (TurnChange::Rotated { to_seat }, to_seat)
        };

        self.history.push(HistoryEntry::new(
            from_seat,
            actor,
            Delta::TurnAdvance {
                from_seat,
                to_seat,
                bonus,
            },
            before,
        ));
        info!(from_seat, to_seat, bonus, "Turn advanced");
        change
    }

    /// Read-only projection for rendering.
    pub fn snapshot(&self) -> MatchSnapshot {
        MatchSnapshot::of(self)
    }

    /// Summary for the archiver, once a winner is declared.
    pub fn summary(&self) -> Option<MatchSummary> {
        MatchSummary::of(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn singles() -> MatchEngine {
        MatchEngine::new(MatchSetup {
            variant: Variant::Singles,
            players: vec![Player::new("p1", "P1"), Player::new("p2", "P2")],
            rules: RuleSet::default(),
        })
        .expect("valid setup")
    }

    fn score(target: Target, multiplier: Multiplier) -> Action {
        Action::Score { target, multiplier }
    }

    #[test]
    fn test_setup_rejects_wrong_count() {
        let err = MatchEngine::new(MatchSetup {
            variant: Variant::Teams,
            players: vec![Player::new("a", "A"), Player::new("b", "B")],
            rules: RuleSet::default(),
        })
        .unwrap_err();
        assert!(matches!(err, SetupError::WrongPlayerCount { expected: 4, actual: 2, .. }));
    }

    #[test]
    fn test_setup_rejects_duplicates() {
        let err = MatchEngine::new(MatchSetup {
            variant: Variant::Singles,
            players: vec![Player::new("a", "A"), Player::new("a", "A2")],
            rules: RuleSet::default(),
        })
        .unwrap_err();
        assert_eq!(err, SetupError::DuplicateParticipant(ParticipantId::new("a")));
    }

    #[test]
    fn test_setup_requires_ko_numbers() {
        let err = MatchEngine::new(MatchSetup {
            variant: Variant::ThreeWay,
            players: vec![
                Player::new("a", "A").with_ko_number(Target::Twenty),
                Player::new("b", "B"),
                Player::new("c", "C").with_ko_number(Target::Eighteen),
            ],
            rules: RuleSet::default(),
        })
        .unwrap_err();
        assert_eq!(err, SetupError::MissingKoNumber(ParticipantId::new("b")));
    }

    #[test]
    fn test_team_ledger_names() {
        let engine = MatchEngine::new(MatchSetup {
            variant: Variant::Teams,
            players: vec![
                Player::new("a", "Ann"),
                Player::new("b", "Bob"),
                Player::new("c", "Cat"),
                Player::new("d", "Dan"),
            ],
            rules: RuleSet::default(),
        })
        .expect("valid setup");
        let names: Vec<_> = engine.ledger().iter().map(|e| e.display_name().to_string()).collect();
        assert_eq!(names, vec!["Ann & Cat", "Bob & Dan"]);
    }

    #[test]
    fn test_dart_resets_multiplier() {
        let mut engine = singles();
        engine.select_multiplier(Multiplier::Triple);
        assert_eq!(engine.turn().selected_multiplier(), Multiplier::Triple);
        engine.apply(Action::Miss).expect("miss accepted");
        assert_eq!(engine.turn().selected_multiplier(), Multiplier::Single);
    }

    #[test]
    fn test_closed_target_rejected() {
        let mut engine = singles();
        engine.apply(score(Target::Twenty, Multiplier::Triple)).expect("open");
        let before = engine.state().clone();
        let err = engine.apply(score(Target::Twenty, Multiplier::Single)).unwrap_err();
        assert_eq!(err, Rejection::TargetClosed(Target::Twenty));
        assert_eq!(engine.state(), &before);
    }

    #[test]
    fn test_miss_ends_turn_after_three() {
        let mut engine = singles();
        engine.apply(Action::Miss).expect("miss");
        engine.apply(Action::Miss).expect("miss");
        let outcome = engine.apply(Action::Miss).expect("miss");
        assert!(matches!(
            outcome,
            Outcome::Dart {
                turn: Some(TurnChange::Rotated { to_seat: 1 }),
                ..
            }
        ));
        assert_eq!(engine.current_participant(), &ParticipantId::new("p2"));
        assert_eq!(engine.turn().darts_thrown(), 0);
    }

    #[test]
    fn test_undo_on_empty_history() {
        let mut engine = singles();
        assert_eq!(engine.apply(Action::Undo), Err(Rejection::NothingToUndo));
    }
}
