use itertools::Itertools;
use rocket::serde::json::Json;
use rocket_okapi::openapi;

use crate::api::{Error, League};
use crate::controller::{identity, player_stats};
use crate::dto;

/// # Registered seasons
#[openapi(tag = "Season")]
#[get("/seasons")]
pub async fn seasons(league: League) -> Json<Vec<dto::Season>> {
    league
        .service()
        .config()
        .seasons
        .iter()
        .map(dto::Season::from)
        .collect_vec()
        .into()
}

/// # Rounds of a season
#[openapi(tag = "Season")]
#[get("/season/<year>/rounds")]
pub async fn rounds(league: League, year: u16) -> Result<Json<Vec<dto::Round>>, Error> {
    let season = league.service().season(year).await?;
    Ok(dto::rounds(&season).into())
}

/// # Classes played in a season
#[openapi(tag = "Season")]
#[get("/season/<year>/classes")]
pub async fn classes(league: League, year: u16) -> Result<Json<Vec<String>>, Error> {
    let season = league.service().season(year).await?;
    Ok(season.normalized.classes().into())
}

/// # Season standings
/// Grouped by class, or only the given class.
#[openapi(tag = "Standings")]
#[get("/season/<year>/standings?<class>")]
pub async fn standings(
    league: League,
    year: u16,
    class: Option<String>,
) -> Result<Json<Vec<dto::ClassStandings>>, Error> {
    let standings = league
        .service()
        .standings(year, class.as_deref())
        .await?;
    Ok(standings
        .iter()
        .map(dto::ClassStandings::from)
        .collect_vec()
        .into())
}

/// # Results of one round
/// `round` is the 0-based round index.
#[openapi(tag = "Standings")]
#[get("/season/<year>/round/<round>/results?<class>")]
pub async fn round_results(
    league: League,
    year: u16,
    round: usize,
    class: Option<String>,
) -> Result<Json<dto::RoundResults>, Error> {
    let season = league.service().season(year).await?;
    Ok(dto::round_results(&season, round, class.as_deref())?.into())
}

/// # Hole statistics
/// For one round, or the whole season when `round` is left out.
#[openapi(tag = "Statistics")]
#[get("/season/<year>/statistics?<round>")]
pub async fn statistics(
    league: League,
    year: u16,
    round: Option<usize>,
) -> Result<Json<dto::Statistics>, Error> {
    let service = league.service();
    let statistics = service.statistics(year, round).await?;
    let season = service.season(year).await?;
    Ok(dto::Statistics::new(&statistics, season.normalized.format).into())
}

/// # Hall of fame
#[openapi(tag = "Statistics")]
#[get("/season/<year>/aces")]
pub async fn aces(league: League, year: u16) -> Result<Json<Vec<dto::Ace>>, Error> {
    let season = league.service().season(year).await?;
    Ok(player_stats::aces(&season.normalized)
        .into_iter()
        .map(dto::Ace::from)
        .collect_vec()
        .into())
}

/// # Players across every season
/// Seasons the provider could not serve are listed in `unavailable_years`.
#[openapi(tag = "Player")]
#[get("/players?<search>")]
pub async fn players(league: League, search: Option<String>) -> Json<dto::Players> {
    let found = league.service().identities().await;
    dto::Players {
        players: identity::search(&found.identities, search.as_deref().unwrap_or_default())
            .into_iter()
            .map(dto::Player::from)
            .collect_vec(),
        unavailable_years: found.unavailable_years,
    }
    .into()
}

/// # Season summaries for a player
/// `name` may be any spelling the player has appeared under.
#[openapi(tag = "Player")]
#[get("/players/<name>/history?<year>")]
pub async fn player_history(
    league: League,
    name: &str,
    year: Option<u16>,
) -> Result<Json<dto::PlayerHistory>, Error> {
    let history = league.service().history(name, year).await?;
    Ok(Json(dto::PlayerHistory::from(&history)))
}
