//! Integration tests for player form and rankings over stored match history.

use doubles_league::{
    declare_winner, generate_open_run, player_performance, rankings, AccountId, InMemoryStore,
    LeagueError, PlayerId, PlayerStatus, RunOptions,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use uuid::Uuid;

fn league_with_players(n: usize) -> (InMemoryStore, AccountId, Vec<PlayerId>) {
    let store = InMemoryStore::new();
    let account = Uuid::new_v4();
    let ids = (0..n)
        .map(|i| store.add_player(account, &format!("P{i}")).unwrap().id)
        .collect();
    (store, account, ids)
}

/// Play one run of four: `player` wins or loses it.
fn play(
    store: &InMemoryStore,
    account: AccountId,
    player: PlayerId,
    win: bool,
    season: u32,
    rng: &mut StdRng,
) {
    let options = RunOptions {
        season,
        ..RunOptions::default()
    };
    let run = generate_open_run(store, account, &options, rng).unwrap();
    let side = run[0].team_of(player).unwrap();
    let winner = if win { side } else { side.opponent() };
    declare_winner(store, account, run[0].id, winner).unwrap();
}

#[test]
fn win_loss_win_win_gives_rising_trail() {
    let (store, account, ids) = league_with_players(4);
    let mut rng = StdRng::seed_from_u64(1);
    for win in [true, false, true, true] {
        play(&store, account, ids[0], win, 1, &mut rng);
    }
    let perf = player_performance(&store, account, ids[0], None).unwrap();
    assert_eq!(perf.series, vec![1, 0, 1, 2]);
    assert_eq!(perf.wins, 3);
    assert_eq!(perf.losses, 1);
    assert_eq!(perf.total_matches, 4);
}

#[test]
fn unplayed_matches_are_not_counted() {
    let (store, account, ids) = league_with_players(4);
    let mut rng = StdRng::seed_from_u64(2);
    play(&store, account, ids[1], false, 1, &mut rng);
    generate_open_run(&store, account, &RunOptions::default(), &mut rng).unwrap();
    let perf = player_performance(&store, account, ids[1], None).unwrap();
    assert_eq!(perf.series, vec![-1]);
}

#[test]
fn season_filter_limits_history() {
    let (store, account, ids) = league_with_players(4);
    let mut rng = StdRng::seed_from_u64(3);
    play(&store, account, ids[0], true, 1, &mut rng);
    play(&store, account, ids[0], true, 1, &mut rng);
    play(&store, account, ids[0], false, 2, &mut rng);

    let season_two = player_performance(&store, account, ids[0], Some(2)).unwrap();
    assert_eq!(season_two.series, vec![-1]);
    let all = player_performance(&store, account, ids[0], None).unwrap();
    assert_eq!(all.series, vec![1, 2, 1]);
}

#[test]
fn unknown_player_is_not_found() {
    let (store, account, _) = league_with_players(4);
    let stranger = Uuid::new_v4();
    assert_eq!(
        player_performance(&store, account, stranger, None),
        Err(LeagueError::PlayerNotFound(stranger))
    );
}

#[test]
fn rankings_cover_latest_season_best_first() {
    let (store, account, ids) = league_with_players(4);
    let mut rng = StdRng::seed_from_u64(4);
    play(&store, account, ids[0], false, 1, &mut rng);
    play(&store, account, ids[0], true, 2, &mut rng);
    play(&store, account, ids[0], true, 2, &mut rng);
    store
        .set_player_status(account, ids[3], PlayerStatus::Inactive)
        .unwrap();

    let table = rankings(&store, account).unwrap();
    assert_eq!(table.season, 2);
    assert_eq!(table.players.len(), 4);
    assert_eq!(table.players[0].player.id, ids[0]);
    assert_eq!(table.players[0].performance.series, vec![1, 2]);
    let scores: Vec<i32> = table.players.iter().map(|r| r.performance.score()).collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));
}

#[test]
fn rankings_need_matches() {
    let (store, account, _) = league_with_players(4);
    assert_eq!(rankings(&store, account), Err(LeagueError::NoMatches));
}
