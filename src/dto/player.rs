use rocket_okapi::okapi::{schemars, schemars::JsonSchema};
use serde::Serialize;

use crate::controller::get_data;
use crate::controller::identity::PlayerIdentity;
use crate::controller::player_stats::{CareerSummary, PlayerDistribution, RoundSummary, YearSummary};
use crate::controller::round::HoleScore;
use crate::controller::score::ScoreBucket;

#[derive(Serialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct Player {
    pub name: String,
    pub alt_names: Vec<String>,
    pub classes: Vec<String>,
    pub years: Vec<u16>,
}

impl From<&PlayerIdentity> for Player {
    fn from(value: &PlayerIdentity) -> Self {
        Self {
            name: value.canonical_name.clone(),
            alt_names: value.alt_names.clone(),
            classes: value.classes.iter().cloned().collect(),
            years: value.years.iter().copied().collect(),
        }
    }
}

#[derive(Serialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct Players {
    pub players: Vec<Player>,
    /// Seasons that could not be loaded and are missing from the list.
    pub unavailable_years: Vec<u16>,
}

#[derive(Serialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct ScorecardHole {
    /// 1-based
    pub hole: usize,
    pub strokes: Option<u8>,
    pub par: Option<u8>,
    pub outcome: Option<String>,
}

impl ScorecardHole {
    fn new(hole: usize, score: Option<&HoleScore>) -> Self {
        Self {
            hole: hole + 1,
            strokes: score.map(|score| score.strokes),
            par: score.map(|score| score.par),
            outcome: score.map(|score| ScoreBucket::of(score).label().to_owned()),
        }
    }
}

#[derive(Serialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct PlayedRound {
    pub round: usize,
    pub label: String,
    pub date: Option<String>,
    pub total_strokes: i32,
    pub placement: Option<u32>,
    pub relative_to_par: Option<i32>,
    pub scorecard: Vec<ScorecardHole>,
}

impl From<&RoundSummary> for PlayedRound {
    fn from(value: &RoundSummary) -> Self {
        Self {
            round: value.round_index,
            label: value.label.clone(),
            date: value.date.map(|date| date.to_string()),
            total_strokes: value.total_strokes,
            placement: value.placement,
            relative_to_par: value.relative_to_par,
            scorecard: value
                .hole_scores
                .iter()
                .enumerate()
                .map(|(hole, score)| ScorecardHole::new(hole, score.as_ref()))
                .collect(),
        }
    }
}

#[derive(Serialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct HoleOutcomes {
    pub aces: usize,
    pub eagles: usize,
    pub birdies: usize,
    pub pars: usize,
    pub bogeys: usize,
    pub double_bogeys: usize,
    pub triple_or_worse: usize,
    pub holes: usize,
}

impl From<&PlayerDistribution> for HoleOutcomes {
    fn from(value: &PlayerDistribution) -> Self {
        let [eagles, birdies, pars, bogeys, double_bogeys, triple_or_worse] =
            ScoreBucket::ALL.map(|bucket| value.others.count(bucket));
        Self {
            aces: value.aces,
            eagles,
            birdies,
            pars,
            bogeys,
            double_bogeys,
            triple_or_worse,
            holes: value.holes(),
        }
    }
}

#[derive(Serialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct PlayerYear {
    pub year: u16,
    pub rounds_played: usize,
    pub rounds: Vec<PlayedRound>,
    pub best_round: Option<PlayedRound>,
    pub worst_round: Option<PlayedRound>,
    pub average_total: Option<f64>,
    pub hole_averages: Vec<Option<f64>>,
    pub hole_data_available: bool,
    pub outcomes: HoleOutcomes,
}

impl From<&YearSummary> for PlayerYear {
    fn from(value: &YearSummary) -> Self {
        let summary = &value.summary;
        Self {
            year: value.year,
            rounds_played: summary.rounds_played(),
            rounds: summary.rounds.iter().map(PlayedRound::from).collect(),
            best_round: summary.best_round.as_ref().map(PlayedRound::from),
            worst_round: summary.worst_round.as_ref().map(PlayedRound::from),
            average_total: summary.average_total,
            hole_averages: summary.hole_averages.clone(),
            hole_data_available: summary.hole_data_available,
            outcomes: HoleOutcomes::from(&summary.distribution),
        }
    }
}

#[derive(Serialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct Career {
    pub seasons: usize,
    pub rounds_played: usize,
    pub average_total: Option<f64>,
    pub outcomes: HoleOutcomes,
}

impl From<&CareerSummary> for Career {
    fn from(value: &CareerSummary) -> Self {
        Self {
            seasons: value.seasons,
            rounds_played: value.rounds_played,
            average_total: value.average_total,
            outcomes: HoleOutcomes::from(&value.distribution),
        }
    }
}

#[derive(Serialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct PlayerHistory {
    pub player: Player,
    pub years: Vec<PlayerYear>,
    pub career: Career,
    /// Years that could not be loaded, so the history may be missing them.
    pub unavailable_years: Vec<u16>,
}

impl From<&get_data::PlayerHistory> for PlayerHistory {
    fn from(value: &get_data::PlayerHistory) -> Self {
        Self {
            player: Player::from(&value.identity),
            years: value.years.iter().map(PlayerYear::from).collect(),
            career: Career::from(&value.career),
            unavailable_years: value.unavailable_years.clone(),
        }
    }
}
