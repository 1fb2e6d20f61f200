use rocket_okapi::okapi::{schemars, schemars::JsonSchema};
use serde::Serialize;

use crate::controller::hole::{HoleStatistics, Scope, ScoreDistribution};
use crate::controller::player_stats;
use crate::controller::round::{PayloadFormat, DEFAULT_PAR};

#[derive(Serialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct HoleAverage {
    /// 1-based
    pub hole: usize,
    pub par: u8,
    pub average: Option<f64>,
}

#[derive(Serialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct Bucket {
    pub bucket: String,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Serialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct Distribution {
    pub total: usize,
    pub buckets: Vec<Bucket>,
}

impl From<&ScoreDistribution> for Distribution {
    fn from(value: &ScoreDistribution) -> Self {
        Self {
            total: value.total,
            buckets: value
                .buckets()
                .map(|(bucket, count)| Bucket {
                    bucket: bucket.label().to_owned(),
                    count,
                    percentage: value.share(bucket) * 100.0,
                })
                .collect(),
        }
    }
}

#[derive(Serialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct Statistics {
    /// `None` for the whole season.
    pub round: Option<usize>,
    pub hole_data_available: bool,
    pub holes: Vec<HoleAverage>,
    pub distribution: Distribution,
}

impl Statistics {
    pub fn new(statistics: &HoleStatistics, format: PayloadFormat) -> Self {
        Self {
            round: match statistics.scope {
                Scope::Round(round) => Some(round),
                Scope::Season => None,
            },
            hole_data_available: format.has_hole_detail(),
            holes: statistics
                .hole_averages
                .iter()
                .enumerate()
                .map(|(hole, average)| HoleAverage {
                    hole: hole + 1,
                    par: statistics
                        .par_by_hole
                        .get(hole)
                        .copied()
                        .unwrap_or(DEFAULT_PAR),
                    average: *average,
                })
                .collect(),
            distribution: Distribution::from(&statistics.distribution),
        }
    }
}

#[derive(Serialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct Ace {
    pub player: String,
    pub class: String,
    pub round: usize,
    pub round_label: String,
    pub date: Option<String>,
    pub hole: usize,
}

impl From<player_stats::Ace> for Ace {
    fn from(value: player_stats::Ace) -> Self {
        Self {
            player: value.player,
            class: value.class,
            round: value.round_index,
            round_label: value.round_label,
            date: value.date.map(|date| date.to_string()),
            hole: value.hole,
        }
    }
}
