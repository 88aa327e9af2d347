//! Participants, roster input and the seat-to-ledger mapping.

use crate::rules::Variant;
use crate::target::Target;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Stable identifier of a ledger entry (a player, or a team in the team variant).
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    /// Creates an id from any string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Synthetic id of a team (`team-0`, `team-1`).
    pub fn team(index: usize) -> Self {
        Self(format!("team-{}", index))
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ParticipantId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// One thrower as supplied by the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Roster id.
    pub id: ParticipantId,
    /// Name shown on the scoreboard.
    pub display_name: String,
    /// Personal KO number for KO-enabled 3-way and 4-way matches.
    #[serde(default)]
    pub ko_number: Option<Target>,
}

impl Player {
    /// Creates a player without a KO number.
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: ParticipantId::new(id),
            display_name: display_name.into(),
            ko_number: None,
        }
    }

    /// Assigns the player's KO number.
    pub fn with_ko_number(mut self, target: Target) -> Self {
        self.ko_number = Some(target);
        self
    }
}

/// Maps seat index (throwing order) to the ledger entry the seat scores for.
///
/// Every variant is a mapping: individual variants map each seat to its own
/// player id, the team variant aliases seats of equal parity onto one team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantMapping {
    seats: Vec<ParticipantId>,
}

impl ParticipantMapping {
    /// Builds the mapping for a variant from the players in throwing order.
    #[instrument(skip(players), fields(players = players.len()))]
    pub fn for_variant(variant: Variant, players: &[Player]) -> Self {
        let seats = players
            .iter()
            .enumerate()
            .map(|(i, player)| match variant {
                Variant::Teams => ParticipantId::team(i % 2),
                _ => player.id.clone(),
            })
            .collect();
        Self { seats }
    }

    /// Number of seats.
    pub fn len(&self) -> usize {
        self.seats.len()
    }

    /// Returns true if there are no seats.
    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    /// Ledger id a seat scores for.
    pub fn participant(&self, seat: usize) -> Option<&ParticipantId> {
        self.seats.get(seat)
    }

    /// Seats in throwing order.
    pub fn seats(&self) -> &[ParticipantId] {
        &self.seats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn four() -> Vec<Player> {
        vec![
            Player::new("ann", "Ann"),
            Player::new("bob", "Bob"),
            Player::new("cat", "Cat"),
            Player::new("dan", "Dan"),
        ]
    }

    #[test]
    fn test_team_mapping_uses_parity() {
        let mapping = ParticipantMapping::for_variant(Variant::Teams, &four());
        assert_eq!(mapping.participant(0), Some(&ParticipantId::team(0)));
        assert_eq!(mapping.participant(1), Some(&ParticipantId::team(1)));
        assert_eq!(mapping.participant(2), Some(&ParticipantId::team(0)));
        assert_eq!(mapping.participant(3), Some(&ParticipantId::team(1)));
    }

    #[test]
    fn test_individual_mapping_is_identity() {
        let mapping = ParticipantMapping::for_variant(Variant::FourWay, &four());
        assert_eq!(mapping.participant(2), Some(&ParticipantId::new("cat")));
        assert_eq!(mapping.participant(4), None);
    }
}
