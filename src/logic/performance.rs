//! Player form: win/loss tallies and the cumulative score trail, recomputed on every request.

use crate::models::{
    AccountId, LeagueError, Match, PerformanceSeries, PlayerId, PlayerRanking, Rankings,
};
use crate::storage::{AccountTx, MatchFilter, Storage};

/// +1 if the player's side won, -1 if it lost, 0 if undecided or not in the match.
pub fn match_delta(player: PlayerId, m: &Match) -> i32 {
    match (m.team_of(player), m.winner) {
        (Some(side), Some(winner)) if side == winner => 1,
        (Some(_), Some(_)) => -1,
        _ => 0,
    }
}

/// Fold a chronological match list into wins, losses and the prefix-sum series.
pub fn fold_performance(player: PlayerId, matches: &[Match]) -> PerformanceSeries {
    let mut out = PerformanceSeries {
        player_id: player,
        total_matches: matches.len(),
        ..Default::default()
    };
    let mut score = 0;
    for m in matches {
        let delta = match_delta(player, m);
        match delta {
            1 => out.wins += 1,
            -1 => out.losses += 1,
            _ => {}
        }
        score += delta;
        out.series.push(score);
    }
    out
}

fn decided_matches_of(
    tx: &dyn AccountTx,
    player: PlayerId,
    season: Option<u32>,
) -> Result<Vec<Match>, LeagueError> {
    tx.list_matches(&MatchFilter::all().player(player).season(season).decided(true))
}

/// Performance of one player, optionally restricted to a season.
pub fn player_performance<S: Storage>(
    store: &S,
    account: AccountId,
    player: PlayerId,
    season: Option<u32>,
) -> Result<PerformanceSeries, LeagueError> {
    store.transaction(account, |tx| {
        if tx.get_player(player)?.is_none() {
            return Err(LeagueError::PlayerNotFound(player));
        }
        let matches = decided_matches_of(tx, player, season)?;
        Ok(fold_performance(player, &matches))
    })
}

/// Performance of every player on the roster for the latest season with matches.
///
/// Sorted by final score, then wins, then name.
pub fn rankings<S: Storage>(store: &S, account: AccountId) -> Result<Rankings, LeagueError> {
    store.transaction(account, |tx| {
        let season = tx
            .list_matches(&MatchFilter::all())?
            .iter()
            .map(|m| m.season)
            .max()
            .ok_or(LeagueError::NoMatches)?;

        let mut players = tx
            .list_players()?
            .into_iter()
            .map(|player| {
                let matches = decided_matches_of(&*tx, player.id, Some(season))?;
                let performance = fold_performance(player.id, &matches);
                Ok(PlayerRanking {
                    player,
                    performance,
                })
            })
            .collect::<Result<Vec<_>, LeagueError>>()?;
        players.sort_by(|a, b| {
            b.performance
                .score()
                .cmp(&a.performance.score())
                .then(b.performance.wins.cmp(&a.performance.wins))
                .then_with(|| a.player.name.cmp(&b.player.name))
        });
        Ok(Rankings { season, players })
    })
}
