//! League-level types: accounts, run summaries, performance views and errors.

use crate::models::game::{MatchId, Slot};
use crate::models::player::{Player, PlayerId};
use serde::{Deserialize, Serialize};

/// Identifier of the account owning a roster and its matches.
pub type AccountId = uuid::Uuid;

/// Errors that can occur during league operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum LeagueError {
    /// Fewer than 4 active players on the roster.
    InsufficientPlayers { active: usize },
    /// A winner was declared on a match missing at least one player.
    IncompleteMatch(MatchId),
    /// The match already has a winner; results are never reverted.
    WinnerAlreadyDeclared(MatchId),
    /// Manual slot fill on a slot that already holds a player.
    SlotOccupied { match_id: MatchId, slot: Slot },
    /// Manual slot fill outside slots 2..=4.
    InvalidSlot(u8),
    MatchNotFound(MatchId),
    PlayerNotFound(PlayerId),
    /// Manual slot fill with a player who already sits in the match.
    PlayerAlreadyInMatch { match_id: MatchId, player_id: PlayerId },
    /// The account has no matches matching the request.
    NoMatches,
    /// Player names are trimmed and must not end up empty.
    InvalidName,
    /// Storage collaborator failure.
    Storage(String),
}

impl std::fmt::Display for LeagueError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeagueError::InsufficientPlayers { active } => {
                write!(f, "Not enough active players (need at least 4, have {})", active)
            }
            LeagueError::IncompleteMatch(_) => write!(f, "Cannot set winner: match requires 4 players"),
            LeagueError::WinnerAlreadyDeclared(_) => write!(f, "Match already has a winner"),
            LeagueError::SlotOccupied { slot, .. } => {
                write!(f, "Slot {} is already occupied", slot.number())
            }
            LeagueError::InvalidSlot(n) => write!(f, "Invalid slot number {}. Use 2, 3, or 4", n),
            LeagueError::MatchNotFound(_) => write!(f, "Match not found"),
            LeagueError::PlayerNotFound(_) => write!(f, "Player not found"),
            LeagueError::PlayerAlreadyInMatch { .. } => write!(f, "Player is already in this match"),
            LeagueError::NoMatches => write!(f, "No matches found"),
            LeagueError::InvalidName => write!(f, "Player name must not be empty"),
            LeagueError::Storage(msg) => write!(f, "Storage error: {}", msg),
        }
    }
}

impl std::error::Error for LeagueError {}

/// The most recent decided match of an account, reduced to what run creation needs.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct CompletedRun {
    pub run: u32,
    pub season: u32,
    /// The winning side of that match, slot order.
    pub winners: (Option<PlayerId>, Option<PlayerId>),
}

/// Win/loss tally and cumulative score trail for one player.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSeries {
    pub player_id: PlayerId,
    pub total_matches: usize,
    pub wins: u32,
    pub losses: u32,
    /// Prefix sums of +1 / -1 / 0 per match, chronological.
    pub series: Vec<i32>,
}

impl PerformanceSeries {
    /// Last value of the score trail (0 with no matches).
    pub fn score(&self) -> i32 {
        self.series.last().copied().unwrap_or(0)
    }
}

/// One row of the rankings table.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlayerRanking {
    pub player: Player,
    #[serde(flatten)]
    pub performance: PerformanceSeries,
}

/// Rankings for every player of an account within one season.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Rankings {
    pub season: u32,
    pub players: Vec<PlayerRanking>,
}
