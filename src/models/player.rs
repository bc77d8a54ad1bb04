//! Player and PlayerStatus data structures.

use crate::models::league::AccountId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a player (used in match slots and lookups).
pub type PlayerId = Uuid;

/// Whether a player takes part in newly generated runs.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerStatus {
    #[default]
    Active,
    Inactive,
}

/// A player on an account's roster.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub status: PlayerStatus,
    /// Account that owns this player.
    pub account: AccountId,
}

impl Player {
    /// Create a new active player with the given name.
    pub fn new(account: AccountId, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            status: PlayerStatus::Active,
            account,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == PlayerStatus::Active
    }
}
