//! Single binary web server: JSON API over the league engine.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT.
//! LEAGUE_SEASON sets the season stamped on new runs; PAIRING_MAX_ATTEMPTS the shuffle budget.

use actix_web::{
    get, post, put,
    web::{Data, Json, Path, Query},
    App, HttpResponse, HttpServer, Responder,
};
use doubles_league::{
    declare_winner, fill_slot, generate_bracket_run, generate_open_run, latest_run_matches,
    matches_by_run, player_performance, possible_teammates, rankings, AccountId, InMemoryStore,
    LeagueError, MatchId, PlayerId, PlayerStatus, Settings, Team,
};
use serde::{Deserialize, Serialize};

/// Shared state: the store behind every account plus the settings it was started with.
struct League {
    store: InMemoryStore,
    settings: Settings,
}

type AppState = Data<League>;

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct AddPlayerBody {
    name: String,
}

#[derive(Deserialize)]
struct SetStatusBody {
    status: PlayerStatus,
}

#[derive(Deserialize)]
struct DeclareWinnerBody {
    team: Team,
}

#[derive(Deserialize)]
struct FillSlotBody {
    slot: u8,
    player_id: PlayerId,
}

#[derive(Deserialize)]
struct SeasonQuery {
    season: Option<u32>,
}

#[derive(Deserialize)]
struct RunQuery {
    run: Option<u32>,
}

/// Path segment: account id (e.g. /api/accounts/{account_id})
#[derive(Deserialize)]
struct AccountPath {
    account_id: AccountId,
}

/// Path segments: account id and player id.
#[derive(Deserialize)]
struct AccountPlayerPath {
    account_id: AccountId,
    player_id: PlayerId,
}

/// Path segments: account id and match id.
#[derive(Deserialize)]
struct AccountMatchPath {
    account_id: AccountId,
    match_id: MatchId,
}

/// Map an engine error to a status code with `{ "error": ... }` body.
fn error_response(e: LeagueError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        LeagueError::MatchNotFound(_) | LeagueError::PlayerNotFound(_) | LeagueError::NoMatches => {
            HttpResponse::NotFound().json(body)
        }
        LeagueError::Storage(_) => {
            log::error!("{}", e);
            HttpResponse::InternalServerError().json(body)
        }
        _ => HttpResponse::BadRequest().json(body),
    }
}

fn respond<T: Serialize>(result: Result<T, LeagueError>) -> HttpResponse {
    match result {
        Ok(value) => HttpResponse::Ok().json(value),
        Err(e) => error_response(e),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "doubles-league",
    })
}

/// Add a player to the account's roster (starts active).
#[post("/api/accounts/{account_id}/players")]
async fn api_add_player(state: AppState, path: Path<AccountPath>, body: Json<AddPlayerBody>) -> HttpResponse {
    respond(state.store.add_player(path.account_id, &body.name))
}

/// Activate or deactivate a player.
#[put("/api/accounts/{account_id}/players/{player_id}/status")]
async fn api_set_player_status(
    state: AppState,
    path: Path<AccountPlayerPath>,
    body: Json<SetStatusBody>,
) -> HttpResponse {
    respond(
        state
            .store
            .set_player_status(path.account_id, path.player_id, body.status),
    )
}

/// Generate an open run (independent matches).
#[post("/api/accounts/{account_id}/runs/open")]
async fn api_generate_open_run(state: AppState, path: Path<AccountPath>) -> HttpResponse {
    let options = state.settings.run_options();
    respond(generate_open_run(
        &state.store,
        path.account_id,
        &options,
        &mut rand::thread_rng(),
    ))
}

/// Generate an elimination run seeded from the last winners.
#[post("/api/accounts/{account_id}/runs/bracket")]
async fn api_generate_bracket_run(state: AppState, path: Path<AccountPath>) -> HttpResponse {
    let options = state.settings.run_options();
    respond(generate_bracket_run(
        &state.store,
        path.account_id,
        &options,
        &mut rand::thread_rng(),
    ))
}

/// Matches of the newest run.
#[get("/api/accounts/{account_id}/runs/latest")]
async fn api_latest_run(state: AppState, path: Path<AccountPath>) -> HttpResponse {
    respond(latest_run_matches(&state.store, path.account_id))
}

/// Matches of `?run=N`, or of the last completed run.
#[get("/api/accounts/{account_id}/runs")]
async fn api_matches_by_run(state: AppState, path: Path<AccountPath>, query: Query<RunQuery>) -> HttpResponse {
    respond(matches_by_run(&state.store, path.account_id, query.run))
}

/// Declare the winning team of a match; elimination runs advance the winners.
#[put("/api/accounts/{account_id}/matches/{match_id}/winner")]
async fn api_declare_winner(
    state: AppState,
    path: Path<AccountMatchPath>,
    body: Json<DeclareWinnerBody>,
) -> HttpResponse {
    respond(declare_winner(&state.store, path.account_id, path.match_id, body.team))
}

/// Put a player into an empty slot (2, 3 or 4).
#[put("/api/accounts/{account_id}/matches/{match_id}/slots")]
async fn api_fill_slot(state: AppState, path: Path<AccountMatchPath>, body: Json<FillSlotBody>) -> HttpResponse {
    respond(fill_slot(
        &state.store,
        path.account_id,
        path.match_id,
        body.slot,
        body.player_id,
    ))
}

/// Active players not yet in the match.
#[get("/api/accounts/{account_id}/matches/{match_id}/possible-teammates")]
async fn api_possible_teammates(state: AppState, path: Path<AccountMatchPath>) -> HttpResponse {
    respond(possible_teammates(&state.store, path.account_id, path.match_id))
}

/// Win/loss tally and score trail of one player (`?season=N` optional).
#[get("/api/accounts/{account_id}/players/{player_id}/stats")]
async fn api_player_stats(
    state: AppState,
    path: Path<AccountPlayerPath>,
    query: Query<SeasonQuery>,
) -> HttpResponse {
    respond(player_performance(
        &state.store,
        path.account_id,
        path.player_id,
        query.season,
    ))
}

/// Rankings for the latest season.
#[get("/api/accounts/{account_id}/rankings")]
async fn api_rankings(state: AppState, path: Path<AccountPath>) -> HttpResponse {
    respond(rankings(&state.store, path.account_id))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let settings = Settings::from_env();
    let bind = (settings.host.clone(), settings.port);
    log::info!(
        "Starting server at http://{}:{} (season {}, {} pairing attempts)",
        bind.0,
        bind.1,
        settings.season,
        settings.max_attempts
    );

    let state = Data::new(League {
        store: InMemoryStore::new(),
        settings,
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_add_player)
            .service(api_set_player_status)
            .service(api_generate_open_run)
            .service(api_generate_bracket_run)
            .service(api_latest_run)
            .service(api_matches_by_run)
            .service(api_declare_winner)
            .service(api_fill_slot)
            .service(api_possible_teammates)
            .service(api_player_stats)
            .service(api_rankings)
    })
    .bind(bind)?
    .run()
    .await
}
