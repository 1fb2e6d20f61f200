use rocket::serde::json::Json;
use rocket_okapi::openapi;

use crate::api::{Error, League};
use crate::dto;

/// # Refresh a season
/// Refetches the season from the results provider and drops its memoized standings and statistics.
#[openapi(tag = "Season")]
#[post("/season/<year>/refresh")]
pub async fn refresh(league: League, year: u16) -> Result<Json<Vec<dto::Round>>, Error> {
    let season = league.service().refresh(year).await?;
    Ok(dto::rounds(&season).into())
}
