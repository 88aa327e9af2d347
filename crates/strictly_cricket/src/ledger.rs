//! Per-participant score ledger.

use crate::participant::ParticipantId;
use crate::rules::MARKS_TO_CLOSE;
use crate::target::Target;
use serde::{Deserialize, Serialize};

/// Scoring record of one participant (player or team).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    id: ParticipantId,
    display_name: String,
    ko_number: Option<Target>,
    marks: [u8; 9],
    points: u32,
    ko_points: u8,
    eliminated: bool,
}

impl LedgerEntry {
    /// Creates a zeroed entry.
    pub fn new(id: ParticipantId, display_name: impl Into<String>, ko_number: Option<Target>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            ko_number,
            marks: [0; 9],
            points: 0,
            ko_points: 0,
            eliminated: false,
        }
    }

    /// Participant id.
    pub fn id(&self) -> &ParticipantId {
        &self.id
    }

    /// Scoreboard name.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Assigned KO number, if any.
    pub fn ko_number(&self) -> Option<Target> {
        self.ko_number
    }

    /// Stored marks on a target (never above three).
    pub fn marks(&self, target: Target) -> u8 {
        self.marks[target.index()]
    }

    /// All stored marks in display order.
    pub fn all_marks(&self) -> &[u8; 9] {
        &self.marks
    }

    /// Accumulated points.
    pub fn points(&self) -> u32 {
        self.points
    }

    /// KO points held against this participant.
    pub fn ko_points(&self) -> u8 {
        self.ko_points
    }

    /// Returns true once the participant has been knocked out.
    pub fn is_eliminated(&self) -> bool {
        self.eliminated
    }

    /// Returns true if the target is closed for this participant.
    pub fn is_closed(&self, target: Target) -> bool {
        self.marks(target) >= MARKS_TO_CLOSE
    }

    /// Returns true if every target is closed.
    pub fn board_complete(&self) -> bool {
        Target::ALL.iter().all(|t| self.is_closed(*t))
    }

    pub(crate) fn add_marks(&mut self, target: Target, marks: u8) {
        let slot = &mut self.marks[target.index()];
        *slot = (*slot + marks).min(MARKS_TO_CLOSE);
    }

    pub(crate) fn add_points(&mut self, points: u32) {
        self.points += points;
    }

    pub(crate) fn set_ko_points(&mut self, ko_points: u8) {
        self.ko_points = ko_points;
    }

    pub(crate) fn eliminate(&mut self) {
        self.eliminated = true;
    }
}

/// Ledger entries of every participant, in seating order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    entries: Vec<LedgerEntry>,
}

impl Ledger {
    /// Creates a ledger from zeroed entries.
    pub fn new(entries: Vec<LedgerEntry>) -> Self {
        Self { entries }
    }

    /// Looks up an entry by id.
    pub fn get(&self, id: &ParticipantId) -> Option<&LedgerEntry> {
        self.entries.iter().find(|e| e.id() == id)
    }

    pub(crate) fn get_mut(&mut self, id: &ParticipantId) -> Option<&mut LedgerEntry> {
        self.entries.iter_mut().find(|e| e.id() == id)
    }

    /// Position of an entry in seating order.
    pub fn position(&self, id: &ParticipantId) -> Option<usize> {
        self.entries.iter().position(|e| e.id() == id)
    }

    /// Iterates over all entries, eliminated ones included.
    pub fn iter(&self) -> impl Iterator<Item = &LedgerEntry> {
        self.entries.iter()
    }

    /// Iterates over entries still in the match.
    pub fn remaining(&self) -> impl Iterator<Item = &LedgerEntry> {
        self.entries.iter().filter(|e| !e.is_eliminated())
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the ledger has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if some remaining participant other than `id` has the target open.
    pub fn opponent_open(&self, id: &ParticipantId, target: Target) -> bool {
        self.remaining()
            .filter(|e| e.id() != id)
            .any(|e| !e.is_closed(target))
    }
}
