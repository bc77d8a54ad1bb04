//! Doubles league: library with models, storage collaborator and pairing/bracket logic.

pub mod config;
pub mod logic;
pub mod models;
pub mod storage;

pub use config::Settings;
pub use logic::{
    declare_winner, fill_slot, generate_bracket_run, generate_open_run, latest_run_matches,
    matches_by_run, player_performance, possible_teammates, rankings, RunOptions, WinnerOutcome,
};
pub use models::{
    AccountId, CompletedRun, GameMode, LeagueError, Match, MatchId, NewMatch, OpenSlot,
    PerformanceSeries, Player, PlayerId, PlayerRanking, PlayerStatus, Rankings, Slot, Team,
};
pub use storage::{AccountTx, InMemoryStore, MatchFilter, MatchOrder, Storage};
