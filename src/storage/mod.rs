//! Storage collaborator: where players and matches live.
//!
//! The engine never holds state between requests. Every operation opens a
//! [`Storage::transaction`] scoped to one account, reads what it needs through
//! [`AccountTx`] and writes its results back through the same handle. A
//! transaction either commits all of its writes or none of them.

mod memory;

pub use memory::InMemoryStore;

use crate::models::{
    AccountId, CompletedRun, LeagueError, Match, MatchId, NewMatch, Player, PlayerId, Slot, Team,
};

/// Sort order for [`AccountTx::list_matches`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum MatchOrder {
    /// Creation sequence ascending (next-open-match lookups, chronological folds).
    #[default]
    CreatedAsc,
    /// Run descending, then creation sequence descending (last-run lookups).
    Latest,
}

/// Match query. Unset fields do not constrain the result.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct MatchFilter {
    pub run: Option<u32>,
    pub season: Option<u32>,
    /// `Some(true)` keeps matches with a winner, `Some(false)` keeps undecided ones.
    pub decided: Option<bool>,
    /// Keep only matches this player sits in.
    pub player: Option<PlayerId>,
    pub order: MatchOrder,
}

impl MatchFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn run(mut self, run: u32) -> Self {
        self.run = Some(run);
        self
    }

    pub fn season(mut self, season: Option<u32>) -> Self {
        self.season = season;
        self
    }

    pub fn decided(mut self, decided: bool) -> Self {
        self.decided = Some(decided);
        self
    }

    pub fn player(mut self, player: PlayerId) -> Self {
        self.player = Some(player);
        self
    }

    pub fn latest(mut self) -> Self {
        self.order = MatchOrder::Latest;
        self
    }

    pub fn accepts(&self, m: &Match) -> bool {
        self.run.map_or(true, |r| m.run == r)
            && self.season.map_or(true, |s| m.season == s)
            && self.decided.map_or(true, |d| m.is_decided() == d)
            && self.player.map_or(true, |p| m.contains(p))
    }
}

/// Operations available inside one account-scoped transaction.
pub trait AccountTx {
    fn account(&self) -> AccountId;

    /// Every player of the account, in roster order.
    fn list_players(&self) -> Result<Vec<Player>, LeagueError>;

    fn get_player(&self, id: PlayerId) -> Result<Option<Player>, LeagueError>;

    fn list_matches(&self, filter: &MatchFilter) -> Result<Vec<Match>, LeagueError>;

    fn get_match(&self, id: MatchId) -> Result<Option<Match>, LeagueError>;

    /// Delete undecided matches, all runs when `run` is `None`. Returns how many were removed.
    fn delete_unresolved_matches(&mut self, run: Option<u32>) -> Result<usize, LeagueError>;

    fn create_match(&mut self, new: NewMatch) -> Result<Match, LeagueError>;

    fn update_match_winner(&mut self, id: MatchId, winner: Team) -> Result<Match, LeagueError>;

    fn update_match_slot(
        &mut self,
        id: MatchId,
        slot: Slot,
        player: Option<PlayerId>,
    ) -> Result<Match, LeagueError>;

    fn list_active_players(&self) -> Result<Vec<Player>, LeagueError> {
        Ok(self
            .list_players()?
            .into_iter()
            .filter(Player::is_active)
            .collect())
    }

    /// Run, season and winning side of the most recently decided match.
    fn last_completed_run(&self) -> Result<Option<CompletedRun>, LeagueError> {
        let last = self
            .list_matches(&MatchFilter::all().decided(true).latest())?
            .into_iter()
            .next();
        Ok(last.and_then(|m| {
            m.winner.map(|team| CompletedRun {
                run: m.run,
                season: m.season,
                winners: m.team(team),
            })
        }))
    }
}

/// A store able to run account-scoped transactions.
///
/// Transactions for the same account are mutually exclusive; different
/// accounts never wait on each other.
pub trait Storage: Send + Sync {
    fn transaction<T, F>(&self, account: AccountId, f: F) -> Result<T, LeagueError>
    where
        F: FnOnce(&mut dyn AccountTx) -> Result<T, LeagueError>;
}
