//! In-process store: one mutex-guarded book per account.

use crate::models::{
    AccountId, LeagueError, Match, MatchId, NewMatch, Player, PlayerId, PlayerStatus, Slot, Team,
};
use crate::storage::{AccountTx, MatchFilter, MatchOrder, Storage};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use uuid::Uuid;

/// Players and matches of a single account.
#[derive(Clone, Debug, Default)]
struct AccountBook {
    players: Vec<Player>,
    matches: Vec<Match>,
}

/// Store keeping everything in memory. Transactions work on a copy of the
/// account's book and swap it in only when the closure succeeds.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    accounts: RwLock<HashMap<AccountId, Arc<Mutex<AccountBook>>>>,
    next_seq: AtomicU64,
}

fn lock_error() -> LeagueError {
    LeagueError::Storage("lock error".to_string())
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn book(&self, account: AccountId) -> Result<Arc<Mutex<AccountBook>>, LeagueError> {
        if let Some(book) = self.accounts.read().map_err(|_| lock_error())?.get(&account) {
            return Ok(book.clone());
        }
        let mut g = self.accounts.write().map_err(|_| lock_error())?;
        Ok(g.entry(account).or_default().clone())
    }

    /// Roster management: add an active player. Names are trimmed and must be non-empty.
    pub fn add_player(&self, account: AccountId, name: &str) -> Result<Player, LeagueError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LeagueError::InvalidName);
        }
        let book = self.book(account)?;
        let mut g = book.lock().map_err(|_| lock_error())?;
        let player = Player::new(account, name);
        g.players.push(player.clone());
        Ok(player)
    }

    /// Roster management: activate or deactivate a player.
    pub fn set_player_status(
        &self,
        account: AccountId,
        player_id: PlayerId,
        status: PlayerStatus,
    ) -> Result<Player, LeagueError> {
        let book = self.book(account)?;
        let mut g = book.lock().map_err(|_| lock_error())?;
        let p = g
            .players
            .iter_mut()
            .find(|p| p.id == player_id)
            .ok_or(LeagueError::PlayerNotFound(player_id))?;
        p.status = status;
        Ok(p.clone())
    }
}

impl Storage for InMemoryStore {
    fn transaction<T, F>(&self, account: AccountId, f: F) -> Result<T, LeagueError>
    where
        F: FnOnce(&mut dyn AccountTx) -> Result<T, LeagueError>,
    {
        let book = self.book(account)?;
        let mut g = book.lock().map_err(|_| lock_error())?;
        let mut tx = MemoryTx {
            account,
            book: g.clone(),
            next_seq: &self.next_seq,
        };
        let out = f(&mut tx)?;
        *g = tx.book;
        Ok(out)
    }
}

struct MemoryTx<'a> {
    account: AccountId,
    book: AccountBook,
    next_seq: &'a AtomicU64,
}

impl MemoryTx<'_> {
    fn match_mut(&mut self, id: MatchId) -> Result<&mut Match, LeagueError> {
        self.book
            .matches
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(LeagueError::MatchNotFound(id))
    }
}

impl AccountTx for MemoryTx<'_> {
    fn account(&self) -> AccountId {
        self.account
    }

    fn list_players(&self) -> Result<Vec<Player>, LeagueError> {
        Ok(self.book.players.clone())
    }

    fn get_player(&self, id: PlayerId) -> Result<Option<Player>, LeagueError> {
        Ok(self.book.players.iter().find(|p| p.id == id).cloned())
    }

    fn list_matches(&self, filter: &MatchFilter) -> Result<Vec<Match>, LeagueError> {
        let mut out: Vec<Match> = self
            .book
            .matches
            .iter()
            .filter(|m| filter.accepts(m))
            .cloned()
            .collect();
        match filter.order {
            MatchOrder::CreatedAsc => out.sort_by_key(|m| m.seq),
            MatchOrder::Latest => out.sort_by(|a, b| b.run.cmp(&a.run).then(b.seq.cmp(&a.seq))),
        }
        Ok(out)
    }

    fn get_match(&self, id: MatchId) -> Result<Option<Match>, LeagueError> {
        Ok(self.book.matches.iter().find(|m| m.id == id).cloned())
    }

    fn delete_unresolved_matches(&mut self, run: Option<u32>) -> Result<usize, LeagueError> {
        let before = self.book.matches.len();
        self.book
            .matches
            .retain(|m| m.is_decided() || run.map_or(false, |r| m.run != r));
        Ok(before - self.book.matches.len())
    }

    fn create_match(&mut self, new: NewMatch) -> Result<Match, LeagueError> {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        let m = Match::from_new(Uuid::new_v4(), self.account, seq, Utc::now(), new);
        self.book.matches.push(m.clone());
        Ok(m)
    }

    fn update_match_winner(&mut self, id: MatchId, winner: Team) -> Result<Match, LeagueError> {
        let m = self.match_mut(id)?;
        m.winner = Some(winner);
        Ok(m.clone())
    }

    fn update_match_slot(
        &mut self,
        id: MatchId,
        slot: Slot,
        player: Option<PlayerId>,
    ) -> Result<Match, LeagueError> {
        let m = self.match_mut(id)?;
        m.set_slot(slot, player);
        Ok(m.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GameMode;

    fn new_match(run: u32, slots: [Option<PlayerId>; 4]) -> NewMatch {
        NewMatch {
            run,
            season: 1,
            mode: GameMode::Open,
            slots,
        }
    }

    #[test]
    fn failed_transaction_leaves_book_untouched() {
        let store = InMemoryStore::new();
        let account = Uuid::new_v4();
        let result: Result<(), LeagueError> = store.transaction(account, |tx| {
            tx.create_match(new_match(1, [None; 4]))?;
            Err(LeagueError::NoMatches)
        });
        assert_eq!(result, Err(LeagueError::NoMatches));
        let count = store
            .transaction(account, |tx| Ok(tx.list_matches(&MatchFilter::all())?.len()))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn latest_order_is_run_then_creation_descending() {
        let store = InMemoryStore::new();
        let account = Uuid::new_v4();
        let ids = store
            .transaction(account, |tx| {
                let a = tx.create_match(new_match(2, [None; 4]))?.id;
                let b = tx.create_match(new_match(1, [None; 4]))?.id;
                let c = tx.create_match(new_match(2, [None; 4]))?.id;
                Ok((a, b, c))
            })
            .unwrap();
        let order: Vec<MatchId> = store
            .transaction(account, |tx| {
                Ok(tx
                    .list_matches(&MatchFilter::all().latest())?
                    .into_iter()
                    .map(|m| m.id)
                    .collect())
            })
            .unwrap();
        assert_eq!(order, vec![ids.2, ids.0, ids.1]);
    }

    #[test]
    fn delete_unresolved_keeps_decided_and_other_runs() {
        let store = InMemoryStore::new();
        let account = Uuid::new_v4();
        store
            .transaction(account, |tx| {
                let decided = tx.create_match(new_match(1, [None; 4]))?;
                tx.update_match_winner(decided.id, Team::One)?;
                tx.create_match(new_match(1, [None; 4]))?;
                tx.create_match(new_match(2, [None; 4]))?;
                assert_eq!(tx.delete_unresolved_matches(Some(1))?, 1);
                assert_eq!(tx.list_matches(&MatchFilter::all())?.len(), 2);
                assert_eq!(tx.delete_unresolved_matches(None)?, 1);
                assert_eq!(tx.list_matches(&MatchFilter::all())?.len(), 1);
                Ok(())
            })
            .unwrap();
    }

    #[test]
    fn status_toggle_hides_player_from_active_roster() {
        let store = InMemoryStore::new();
        let account = Uuid::new_v4();
        let p = store.add_player(account, " Ana ").unwrap();
        assert_eq!(p.name, "Ana");
        store
            .set_player_status(account, p.id, PlayerStatus::Inactive)
            .unwrap();
        let active = store
            .transaction(account, |tx| tx.list_active_players())
            .unwrap();
        assert!(active.is_empty());
    }

    #[test]
    fn blank_name_is_rejected_without_touching_roster() {
        let store = InMemoryStore::new();
        let account = Uuid::new_v4();
        assert_eq!(store.add_player(account, "   "), Err(LeagueError::InvalidName));
        let players = store.transaction(account, |tx| tx.list_players()).unwrap();
        assert!(players.is_empty());
    }
}
