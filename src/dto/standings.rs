use itertools::Itertools;
use rocket_okapi::okapi::{schemars, schemars::JsonSchema};
use serde::Serialize;

use crate::controller::season;

#[derive(Serialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct RoundPoints {
    pub points: u32,
    pub counting: bool,
    pub completed: bool,
}

#[derive(Serialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct Standing {
    /// Shared by players on the same total.
    pub position: usize,
    pub tied: bool,
    pub player_key: String,
    pub name: String,
    pub class: String,
    pub total_points: u32,
    pub rounds: Vec<RoundPoints>,
}

#[derive(Serialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct ClassStandings {
    pub class: String,
    pub standings: Vec<Standing>,
}

fn with_positions(standings: &[season::SeasonStanding]) -> Vec<(usize, &season::SeasonStanding)> {
    let mut pos = 1;
    let mut same_total_count = 0;
    let mut last_total = standings
        .first()
        .map(|standing| standing.total_points)
        .unwrap_or_default();

    standings
        .iter()
        .map(|standing| {
            if standing.total_points != last_total {
                pos += same_total_count;
                same_total_count = 0;
            }
            same_total_count += 1;
            last_total = standing.total_points;
            (pos, standing)
        })
        .collect_vec()
}

impl From<&season::ClassStandings> for ClassStandings {
    fn from(value: &season::ClassStandings) -> Self {
        let positioned = with_positions(&value.standings);
        let standings = positioned
            .iter()
            .map(|(position, standing)| Standing {
                position: *position,
                tied: positioned
                    .iter()
                    .filter(|(other, _)| other == position)
                    .count()
                    > 1,
                player_key: standing.player_key.to_string(),
                name: standing.name.clone(),
                class: standing.class.clone(),
                total_points: standing.total_points,
                rounds: standing
                    .per_round_points
                    .iter()
                    .zip(&standing.counting_flags)
                    .zip(&standing.completed)
                    .map(|((points, counting), completed)| RoundPoints {
                        points: *points,
                        counting: *counting,
                        completed: *completed,
                    })
                    .collect(),
            })
            .collect();
        Self {
            class: value.class.clone(),
            standings,
        }
    }
}
