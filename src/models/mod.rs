//! Data structures for the league: players, matches, run summaries and errors.

mod game;
mod league;
mod player;

pub use game::{GameMode, Match, MatchId, NewMatch, OpenSlot, Slot, Team};
pub use league::{
    AccountId, CompletedRun, LeagueError, PerformanceSeries, PlayerRanking, Rankings,
};
pub use player::{Player, PlayerId, PlayerStatus};
