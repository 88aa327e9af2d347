//! Per-turn state and skip-aware rotation.

use crate::action::Dart;
use crate::ledger::Ledger;
use crate::participant::{ParticipantId, ParticipantMapping};
use crate::rules::DARTS_PER_TURN;
use crate::target::Multiplier;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, instrument};

/// Mutable turn bookkeeping for the whole match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnState {
    pub(crate) current_seat: usize,
    pub(crate) darts: Vec<Dart>,
    pub(crate) selected_multiplier: Multiplier,
    /// Will be passed over on the next rotation (shown crossed out).
    pub(crate) skipped: BTreeSet<ParticipantId>,
    /// Were passed over and wait for their turn to come round (shown greyed).
    pub(crate) served: BTreeSet<ParticipantId>,
    pub(crate) last_skipped: Option<ParticipantId>,
    pub(crate) pin_counter: i8,
    pub(crate) winner: Option<ParticipantId>,
}

impl TurnState {
    /// Fresh state with the first seat to throw.
    pub fn new() -> Self {
        Self {
            current_seat: 0,
            darts: Vec::with_capacity(DARTS_PER_TURN),
            selected_multiplier: Multiplier::Single,
            skipped: BTreeSet::new(),
            served: BTreeSet::new(),
            last_skipped: None,
            pin_counter: 0,
            winner: None,
        }
    }

    /// Seat currently throwing.
    pub fn current_seat(&self) -> usize {
        self.current_seat
    }

    /// Dart slots used this turn.
    pub fn darts(&self) -> &[Dart] {
        &self.darts
    }

    /// Number of darts used this turn.
    pub fn darts_thrown(&self) -> usize {
        self.darts.len()
    }

    /// Returns true while the turn has darts left.
    pub fn has_darts_left(&self) -> bool {
        self.darts.len() < DARTS_PER_TURN
    }

    /// Multiplier staged for the next dart.
    pub fn selected_multiplier(&self) -> Multiplier {
        self.selected_multiplier
    }

    /// Participants who will lose their next turn.
    pub fn skipped(&self) -> &BTreeSet<ParticipantId> {
        &self.skipped
    }

    /// Participants who lost a turn and have not thrown since.
    pub fn served(&self) -> &BTreeSet<ParticipantId> {
        &self.served
    }

    /// Participant skipped most recently in this turn.
    pub fn last_skipped(&self) -> Option<&ParticipantId> {
        self.last_skipped.as_ref()
    }

    /// Shared PIN counter.
    pub fn pin_counter(&self) -> i8 {
        self.pin_counter
    }

    /// Winner, once declared.
    pub fn winner(&self) -> Option<&ParticipantId> {
        self.winner.as_ref()
    }

    /// Returns true if every dart of the turn counts toward the bonus turn.
    pub fn earned_bonus(&self) -> bool {
        self.darts.len() == DARTS_PER_TURN && self.darts.iter().all(Dart::counts_for_bonus)
    }

    pub(crate) fn record_dart(&mut self, dart: Dart) {
        self.darts.push(dart);
        self.selected_multiplier = Multiplier::Single;
    }

    /// Queues `target` to lose its next turn.
    pub(crate) fn queue_skip(&mut self, target: ParticipantId) {
        self.served.remove(&target);
        self.skipped.insert(target.clone());
        self.last_skipped = Some(target);
    }

    /// Drops an eliminated participant from both skip sets.
    pub(crate) fn forget(&mut self, id: &ParticipantId) {
        self.skipped.remove(id);
        self.served.remove(id);
    }

    /// Starts a fresh turn for the same seat.
    pub(crate) fn restart_turn(&mut self) {
        self.darts.clear();
        self.selected_multiplier = Multiplier::Single;
        self.last_skipped = None;
    }

    /// Moves to the next seat that may throw and starts its turn.
    ///
    /// Eliminated participants are always passed. A skipped participant is
    /// passed once and moves to the served set. The walk is bounded to two
    /// laps: the first lap drains every pending skip, so the second always
    /// finds a thrower while anyone remains.
    #[instrument(skip(self, mapping, ledger), fields(from = self.current_seat))]
    pub(crate) fn rotate(&mut self, mapping: &ParticipantMapping, ledger: &Ledger) -> usize {
        let seats = mapping.len();
        let mut seat = self.current_seat;

        for _ in 0..seats * 2 {
            seat = (seat + 1) % seats;
            let Some(id) = mapping.participant(seat) else {
                continue;
            };
            if ledger.get(id).is_none_or(|e| e.is_eliminated()) {
                continue;
            }
            if self.skipped.remove(id) {
                debug!(participant = %id, seat, "Passing skipped participant");
                self.served.insert(id.clone());
                continue;
            }
            break;
        }

        if let Some(id) = mapping.participant(seat) {
            self.served.remove(id);
        }
        self.current_seat = seat;
        self.restart_turn();
        seat
    }
}

impl Default for TurnState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::LedgerEntry;
    use crate::participant::Player;
    use crate::rules::Variant;

    fn setup(n: usize) -> (ParticipantMapping, Ledger) {
        let players: Vec<Player> = (0..n)
            .map(|i| Player::new(format!("p{}", i), format!("P{}", i)))
            .collect();
        let variant = if n == 3 { Variant::ThreeWay } else { Variant::FourWay };
        let mapping = ParticipantMapping::for_variant(variant, &players);
        let ledger = Ledger::new(
            players
                .iter()
                .map(|p| LedgerEntry::new(p.id.clone(), p.display_name.clone(), None))
                .collect(),
        );
        (mapping, ledger)
    }

    fn id(s: &str) -> ParticipantId {
        ParticipantId::new(s)
    }

    #[test]
    fn test_plain_rotation_wraps() {
        let (mapping, ledger) = setup(3);
        let mut turn = TurnState::new();
        assert_eq!(turn.rotate(&mapping, &ledger), 1);
        assert_eq!(turn.rotate(&mapping, &ledger), 2);
        assert_eq!(turn.rotate(&mapping, &ledger), 0);
    }

    #[test]
    fn test_skipped_is_passed_once_then_served() {
        let (mapping, ledger) = setup(4);
        let mut turn = TurnState::new();
        turn.queue_skip(id("p1"));
        assert_eq!(turn.rotate(&mapping, &ledger), 2);
        assert!(turn.skipped().is_empty());
        assert!(turn.served().contains(&id("p1")));
        assert_eq!(turn.rotate(&mapping, &ledger), 3);
        assert_eq!(turn.rotate(&mapping, &ledger), 0);
        // p1's turn arrives: served membership clears.
        assert_eq!(turn.rotate(&mapping, &ledger), 1);
        assert!(turn.served().is_empty());
    }

    #[test]
    fn test_eliminated_never_throw() {
        let (mapping, mut ledger) = setup(4);
        if let Some(e) = ledger.get_mut(&id("p1")) {
            e.eliminate();
        }
        let mut turn = TurnState::new();
        assert_eq!(turn.rotate(&mapping, &ledger), 2);
    }

    #[test]
    fn test_everyone_else_skipped_terminates() {
        let (mapping, ledger) = setup(4);
        let mut turn = TurnState::new();
        turn.queue_skip(id("p1"));
        turn.queue_skip(id("p2"));
        turn.queue_skip(id("p3"));
        // Everyone else serves in one lap and the thrower goes again.
        assert_eq!(turn.rotate(&mapping, &ledger), 0);
        assert!(turn.skipped().is_empty());
        assert_eq!(turn.served().len(), 3);
    }

    #[test]
    fn test_queue_skip_keeps_sets_disjoint() {
        let mut turn = TurnState::new();
        turn.served.insert(id("p2"));
        turn.queue_skip(id("p2"));
        assert!(turn.skipped().contains(&id("p2")));
        assert!(!turn.served().contains(&id("p2")));
        assert_eq!(turn.last_skipped(), Some(&id("p2")));
    }

    #[test]
    fn test_rotate_resets_turn() {
        let (mapping, ledger) = setup(3);
        let mut turn = TurnState::new();
        turn.record_dart(Dart::Miss);
        turn.selected_multiplier = Multiplier::Triple;
        turn.last_skipped = Some(id("p2"));
        turn.rotate(&mapping, &ledger);
        assert_eq!(turn.darts_thrown(), 0);
        assert_eq!(turn.selected_multiplier(), Multiplier::Single);
        assert_eq!(turn.last_skipped(), None);
    }
}
