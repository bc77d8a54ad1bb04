//! Match (game), Team, Slot and GameMode for 2v2 doubles runs.

use crate::models::league::AccountId;
use crate::models::player::PlayerId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for a match.
pub type MatchId = uuid::Uuid;

/// One side of a match. Team one holds slots 1 and 2, team two holds slots 3 and 4.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Team {
    #[default]
    One,
    Two,
}

impl Team {
    pub fn opponent(self) -> Team {
        match self {
            Team::One => Team::Two,
            Team::Two => Team::One,
        }
    }

    /// The two slots making up this side, first slot first.
    pub fn slots(self) -> (Slot, Slot) {
        match self {
            Team::One => (Slot::One, Slot::Two),
            Team::Two => (Slot::Three, Slot::Four),
        }
    }
}

/// Format a run was generated in.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    /// Independent matches played side by side.
    #[default]
    Open,
    /// Winners advance into the next open match of the run.
    Elimination,
}

/// A player position on a match.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    One,
    Two,
    Three,
    Four,
}

impl Slot {
    pub fn number(self) -> u8 {
        match self {
            Slot::One => 1,
            Slot::Two => 2,
            Slot::Three => 3,
            Slot::Four => 4,
        }
    }
}

/// Slots a player can be placed into by hand. Slot 1 is always set at generation time.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpenSlot {
    Two,
    Three,
    Four,
}

impl TryFrom<u8> for OpenSlot {
    type Error = u8;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            2 => Ok(OpenSlot::Two),
            3 => Ok(OpenSlot::Three),
            4 => Ok(OpenSlot::Four),
            other => Err(other),
        }
    }
}

impl From<OpenSlot> for Slot {
    fn from(s: OpenSlot) -> Self {
        match s {
            OpenSlot::Two => Slot::Two,
            OpenSlot::Three => Slot::Three,
            OpenSlot::Four => Slot::Four,
        }
    }
}

/// A match about to be persisted. The store assigns id, creation sequence and timestamp.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct NewMatch {
    pub run: u32,
    pub season: u32,
    pub mode: GameMode,
    /// Slots 1..=4 in order.
    pub slots: [Option<PlayerId>; 4],
}

/// A persisted match.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub account: AccountId,
    pub run: u32,
    pub season: u32,
    pub mode: GameMode,
    pub slot1: Option<PlayerId>,
    pub slot2: Option<PlayerId>,
    pub slot3: Option<PlayerId>,
    pub slot4: Option<PlayerId>,
    /// None while undecided. Never reverted once set.
    pub winner: Option<Team>,
    /// Creation order within the store; ties in `created_at` are broken by this.
    pub seq: u64,
    pub created_at: DateTime<Utc>,
}

impl Match {
    pub fn from_new(
        id: MatchId,
        account: AccountId,
        seq: u64,
        created_at: DateTime<Utc>,
        new: NewMatch,
    ) -> Self {
        let [slot1, slot2, slot3, slot4] = new.slots;
        Self {
            id,
            account,
            run: new.run,
            season: new.season,
            mode: new.mode,
            slot1,
            slot2,
            slot3,
            slot4,
            winner: None,
            seq,
            created_at,
        }
    }

    pub fn slot(&self, slot: Slot) -> Option<PlayerId> {
        match slot {
            Slot::One => self.slot1,
            Slot::Two => self.slot2,
            Slot::Three => self.slot3,
            Slot::Four => self.slot4,
        }
    }

    pub fn set_slot(&mut self, slot: Slot, player: Option<PlayerId>) {
        match slot {
            Slot::One => self.slot1 = player,
            Slot::Two => self.slot2 = player,
            Slot::Three => self.slot3 = player,
            Slot::Four => self.slot4 = player,
        }
    }

    pub fn slots(&self) -> [Option<PlayerId>; 4] {
        [self.slot1, self.slot2, self.slot3, self.slot4]
    }

    /// Both positions of one side.
    pub fn team(&self, team: Team) -> (Option<PlayerId>, Option<PlayerId>) {
        let (a, b) = team.slots();
        (self.slot(a), self.slot(b))
    }

    /// Which side the player is on, if they are in this match at all.
    pub fn team_of(&self, player: PlayerId) -> Option<Team> {
        if self.slot1 == Some(player) || self.slot2 == Some(player) {
            Some(Team::One)
        } else if self.slot3 == Some(player) || self.slot4 == Some(player) {
            Some(Team::Two)
        } else {
            None
        }
    }

    pub fn contains(&self, player: PlayerId) -> bool {
        self.team_of(player).is_some()
    }

    pub fn occupied_slots(&self) -> usize {
        self.slots().iter().flatten().count()
    }

    /// All four players present; only complete matches can be scored.
    pub fn is_complete(&self) -> bool {
        self.occupied_slots() == 4
    }

    pub fn is_decided(&self) -> bool {
        self.winner.is_some()
    }
}
