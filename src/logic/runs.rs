//! Run creation (open and elimination) and run lookups.

use crate::logic::bracket::{bracket_run_shapes, SeedCase};
use crate::logic::pair_history::{pairs_of_run, ForbiddenPairs};
use crate::logic::pairing::{open_run_shapes, MatchShape, DEFAULT_MAX_ATTEMPTS};
use crate::models::{AccountId, GameMode, LeagueError, Match, NewMatch, PlayerId};
use crate::storage::{AccountTx, MatchFilter, Storage};
use rand::Rng;

/// Caller-supplied policy for a new run.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RunOptions {
    /// Season stamped on every match of the run.
    pub season: u32,
    /// Shuffle budget for avoiding repeated partnerships.
    pub max_attempts: usize,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            season: 1,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Generate a new open run: independent matches, avoiding last run's partnerships.
pub fn generate_open_run<S, R>(
    store: &S,
    account: AccountId,
    options: &RunOptions,
    rng: &mut R,
) -> Result<Vec<Match>, LeagueError>
where
    S: Storage,
    R: Rng + ?Sized,
{
    store.transaction(account, |tx| {
        create_run(tx, GameMode::Open, options, |roster, forbidden, _| {
            open_run_shapes(roster, forbidden, options.max_attempts, rng)
        })
    })
}

/// Generate a new elimination run seeded from the last decided match's winners.
pub fn generate_bracket_run<S, R>(
    store: &S,
    account: AccountId,
    options: &RunOptions,
    rng: &mut R,
) -> Result<Vec<Match>, LeagueError>
where
    S: Storage,
    R: Rng + ?Sized,
{
    store.transaction(account, |tx| {
        create_run(tx, GameMode::Elimination, options, |roster, forbidden, winners| {
            let case = winners.map_or(SeedCase::NoWinner, |w| SeedCase::from_winners(roster, w));
            log::debug!("Bracket seed case: {:?}", case);
            bracket_run_shapes(roster, forbidden, case, options.max_attempts, rng)
        })
    })
}

type Winners = (Option<PlayerId>, Option<PlayerId>);

/// Shared run creation: read roster and last run, drop stale matches, plan, persist.
fn create_run<F>(
    tx: &mut dyn AccountTx,
    mode: GameMode,
    options: &RunOptions,
    plan: F,
) -> Result<Vec<Match>, LeagueError>
where
    F: FnOnce(&[PlayerId], &ForbiddenPairs, Option<Winners>) -> Result<Vec<MatchShape>, LeagueError>,
{
    let roster: Vec<PlayerId> = tx.list_active_players()?.iter().map(|p| p.id).collect();
    let last = tx.last_completed_run()?;
    let forbidden = match &last {
        Some(done) => pairs_of_run(&tx.list_matches(&MatchFilter::all().run(done.run))?),
        None => ForbiddenPairs::new(),
    };

    let shapes = plan(&roster, &forbidden, last.as_ref().map(|done| done.winners))?;

    let removed = tx.delete_unresolved_matches(None)?;
    if removed > 0 {
        log::info!("Removed {} unplayed match(es) before new run", removed);
    }

    let run = last.as_ref().map_or(1, |done| done.run + 1);
    let created = shapes
        .iter()
        .map(|shape| {
            tx.create_match(NewMatch {
                run,
                season: options.season,
                mode,
                slots: shape.slots(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    log::info!(
        "Created run {} ({:?}, season {}) for account {}: {} match(es)",
        run,
        mode,
        options.season,
        tx.account(),
        created.len()
    );
    Ok(created)
}

/// All matches of the highest run number, played or not.
pub fn latest_run_matches<S: Storage>(store: &S, account: AccountId) -> Result<Vec<Match>, LeagueError> {
    store.transaction(account, |tx| {
        let latest = tx
            .list_matches(&MatchFilter::all().latest())?
            .first()
            .map(|m| m.run)
            .ok_or(LeagueError::NoMatches)?;
        tx.list_matches(&MatchFilter::all().run(latest))
    })
}

/// Matches of `run`, or of the last completed run when `run` is `None`.
pub fn matches_by_run<S: Storage>(
    store: &S,
    account: AccountId,
    run: Option<u32>,
) -> Result<Vec<Match>, LeagueError> {
    store.transaction(account, |tx| {
        let run = match run {
            Some(r) => r,
            None => tx.last_completed_run()?.ok_or(LeagueError::NoMatches)?.run,
        };
        tx.list_matches(&MatchFilter::all().run(run))
    })
}
