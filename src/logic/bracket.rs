//! Elimination bracket: seeding a run from the last winners and advancing winners.
//!
//! A bracket run opens with one seed match. Every other team waits in a match of
//! its own with team two empty. When a result comes in, the winning pair moves
//! into team two of the earliest match of the run that is still undecided.

use crate::logic::pair_history::ForbiddenPairs;
use crate::logic::pairing::{
    bracket_team_count, generate_pairing, waiting_layout, MatchShape, MIN_PLAYERS,
};
use crate::models::{
    AccountId, GameMode, LeagueError, Match, MatchId, OpenSlot, Player, PlayerId, Slot, Team,
};
use crate::storage::{MatchFilter, Storage};
use rand::Rng;
use serde::Serialize;

/// How the previous winners shape the seed match.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SeedCase {
    /// Both winners are still active and stay together as team one.
    BothWinners(PlayerId, PlayerId),
    /// One winner is still active; their teammate slot stays open.
    OneWinner(PlayerId),
    /// No active winner (or no previous result); plain pairing.
    NoWinner,
}

impl SeedCase {
    pub fn from_winners(roster: &[PlayerId], winners: (Option<PlayerId>, Option<PlayerId>)) -> Self {
        let active = |p: Option<PlayerId>| p.filter(|id| roster.contains(id));
        match (active(winners.0), active(winners.1)) {
            (Some(a), Some(b)) if a != b => SeedCase::BothWinners(a, b),
            (Some(a), _) | (None, Some(a)) => SeedCase::OneWinner(a),
            (None, None) => SeedCase::NoWinner,
        }
    }
}

/// Plan a bracket run: the seed match first, then waiting teams.
pub fn bracket_run_shapes<R: Rng + ?Sized>(
    roster: &[PlayerId],
    forbidden: &ForbiddenPairs,
    case: SeedCase,
    max_attempts: usize,
    rng: &mut R,
) -> Result<Vec<MatchShape>, LeagueError> {
    if roster.len() < MIN_PLAYERS {
        return Err(LeagueError::InsufficientPlayers { active: roster.len() });
    }
    let without = |out: &[PlayerId]| -> Vec<PlayerId> {
        roster.iter().copied().filter(|p| !out.contains(p)).collect()
    };

    let (seed, rest) = match case {
        SeedCase::BothWinners(a, b) => {
            let draw = generate_pairing(&without(&[a, b][..]), 1, forbidden, max_attempts, rng);
            let (opp, rest) = draw.order.split_at(2);
            (MatchShape::Full([a, b, opp[0], opp[1]]), rest.to_vec())
        }
        SeedCase::OneWinner(w) => {
            let draw = generate_pairing(&without(&[w][..]), 1, forbidden, max_attempts, rng);
            let (opp, rest) = draw.order.split_at(2);
            let seed = MatchShape::Seeded {
                winner: w,
                opponents: (opp[0], opp[1]),
            };
            (seed, rest.to_vec())
        }
        SeedCase::NoWinner => {
            let draw = generate_pairing(
                roster,
                bracket_team_count(roster.len()),
                forbidden,
                max_attempts,
                rng,
            );
            let (first, rest) = draw.order.split_at(4);
            let seed = MatchShape::Full([first[0], first[1], first[2], first[3]]);
            return Ok(std::iter::once(seed).chain(waiting_layout(rest)).collect());
        }
    };

    let draw = generate_pairing(
        &rest,
        bracket_team_count(rest.len()),
        forbidden,
        max_attempts,
        rng,
    );
    Ok(std::iter::once(seed)
        .chain(waiting_layout(&draw.order))
        .collect())
}

/// Result of a winner declaration.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct WinnerOutcome {
    /// The scored match, winner set.
    pub decided: Match,
    /// The match the winning pair moved into, if the run had one open.
    pub advanced_into: Option<Match>,
}

/// Declare the winner of a match and, in elimination runs, advance the winning pair.
///
/// The match must hold four players and be undecided. Everything happens inside
/// one transaction, so two results declared at once cannot claim the same open match.
/// The winning pair always lands in team two of the earliest open match, replacing
/// whoever sits there, including players placed by hand with [`fill_slot`].
pub fn declare_winner<S: Storage>(
    store: &S,
    account: AccountId,
    match_id: MatchId,
    team: Team,
) -> Result<WinnerOutcome, LeagueError> {
    store.transaction(account, |tx| {
        let m = tx
            .get_match(match_id)?
            .ok_or(LeagueError::MatchNotFound(match_id))?;
        if m.is_decided() {
            return Err(LeagueError::WinnerAlreadyDeclared(match_id));
        }
        if !m.is_complete() {
            return Err(LeagueError::IncompleteMatch(match_id));
        }
        let decided = tx.update_match_winner(match_id, team)?;
        log::info!("Match {} (run {}) won by team {:?}", match_id, decided.run, team);

        if decided.mode != GameMode::Elimination {
            return Ok(WinnerOutcome {
                decided,
                advanced_into: None,
            });
        }

        let next = tx
            .list_matches(&MatchFilter::all().run(decided.run).decided(false))?
            .into_iter()
            .next();
        let Some(next) = next else {
            log::info!("Run {} bracket exhausted; no open match to advance into", decided.run);
            return Ok(WinnerOutcome {
                decided,
                advanced_into: None,
            });
        };

        let (first, second) = decided.team(team);
        if next.slot3.is_some() || next.slot4.is_some() {
            log::warn!(
                "Advancing into match {} replaces its team two {:?}",
                next.id,
                next.team(Team::Two)
            );
        }
        tx.update_match_slot(next.id, Slot::Three, first)?;
        let advanced = tx.update_match_slot(next.id, Slot::Four, second)?;
        log::info!("Winners of match {} advance into match {}", match_id, advanced.id);
        Ok(WinnerOutcome {
            decided,
            advanced_into: Some(advanced),
        })
    })
}

/// Put a player into an empty slot (2, 3 or 4) by hand.
pub fn fill_slot<S: Storage>(
    store: &S,
    account: AccountId,
    match_id: MatchId,
    slot: u8,
    player_id: PlayerId,
) -> Result<Match, LeagueError> {
    let slot: Slot = OpenSlot::try_from(slot)
        .map_err(LeagueError::InvalidSlot)?
        .into();
    store.transaction(account, |tx| {
        let m = tx
            .get_match(match_id)?
            .ok_or(LeagueError::MatchNotFound(match_id))?;
        if tx.get_player(player_id)?.is_none() {
            return Err(LeagueError::PlayerNotFound(player_id));
        }
        if m.slot(slot).is_some() {
            return Err(LeagueError::SlotOccupied { match_id, slot });
        }
        if m.contains(player_id) {
            return Err(LeagueError::PlayerAlreadyInMatch {
                match_id,
                player_id,
            });
        }
        tx.update_match_slot(match_id, slot, Some(player_id))
    })
}

/// Active players not already placed in the match: the candidates for [`fill_slot`].
pub fn possible_teammates<S: Storage>(
    store: &S,
    account: AccountId,
    match_id: MatchId,
) -> Result<Vec<Player>, LeagueError> {
    store.transaction(account, |tx| {
        let m = tx
            .get_match(match_id)?
            .ok_or(LeagueError::MatchNotFound(match_id))?;
        Ok(tx
            .list_active_players()?
            .into_iter()
            .filter(|p| !m.contains(p.id))
            .collect())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn seed_case_checks_roster_membership() {
        let roster: Vec<PlayerId> = (0..5).map(|_| Uuid::new_v4()).collect();
        let gone = Uuid::new_v4();
        assert_eq!(
            SeedCase::from_winners(&roster, (Some(roster[0]), Some(roster[1]))),
            SeedCase::BothWinners(roster[0], roster[1])
        );
        assert_eq!(
            SeedCase::from_winners(&roster, (Some(gone), Some(roster[2]))),
            SeedCase::OneWinner(roster[2])
        );
        assert_eq!(
            SeedCase::from_winners(&roster, (Some(gone), None)),
            SeedCase::NoWinner
        );
    }
}
