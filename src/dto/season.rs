use rocket_okapi::okapi::{schemars, schemars::JsonSchema};
use serde::Serialize;

use crate::config::SeasonConfig;
use crate::controller::get_data::LoadedSeason;

#[derive(Serialize, JsonSchema, Debug, Clone)]
pub struct Season {
    pub year: u16,
    pub competition_id: String,
    pub total_rounds: Option<usize>,
}

impl From<&SeasonConfig> for Season {
    fn from(value: &SeasonConfig) -> Self {
        Self {
            year: value.year,
            competition_id: value.competition_id.clone(),
            total_rounds: value.total_rounds,
        }
    }
}

#[derive(Serialize, JsonSchema, Debug, Clone)]
pub struct Round {
    pub index: usize,
    pub number: usize,
    pub event_id: Option<String>,
    pub label: String,
    /// `YYYY-MM-DD`
    pub date: Option<String>,
    pub par_by_hole: Vec<u8>,
    pub completed: bool,
}

pub fn rounds(season: &LoadedSeason) -> Vec<Round> {
    let normalized = &season.normalized;
    normalized
        .rounds
        .iter()
        .map(|round| Round {
            index: round.index,
            number: round.index + 1,
            event_id: round.event_id.clone(),
            label: round.label.clone(),
            date: round.date.map(|date| date.to_string()),
            par_by_hole: round.par_by_hole.clone(),
            completed: normalized.is_completed(round.index),
        })
        .collect()
}
