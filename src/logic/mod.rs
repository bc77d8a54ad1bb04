//! League business logic: partnership history, pairing, brackets, runs and player form.

mod bracket;
mod pair_history;
mod pairing;
mod performance;
mod runs;

pub use bracket::{
    bracket_run_shapes, declare_winner, fill_slot, possible_teammates, SeedCase, WinnerOutcome,
};
pub use pair_history::{pairs_of_run, ForbiddenPairs, PairKey};
pub use pairing::{
    bracket_team_count, generate_pairing, open_layout, open_run_shapes, open_team_count,
    waiting_layout, MatchShape, Pairing, DEFAULT_MAX_ATTEMPTS, MIN_PLAYERS,
};
pub use performance::{fold_performance, match_delta, player_performance, rankings};
pub use runs::{
    generate_bracket_run, generate_open_run, latest_run_matches, matches_by_run, RunOptions,
};
