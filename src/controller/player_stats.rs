use std::collections::HashSet;

use chrono::NaiveDate;

use super::hole::{self, ScoreDistribution};
use super::round::{HoleScore, NormalizedCompetition, PlayerEntry, RoundResult};

/// A hole in one, for the hall of fame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ace {
    pub player: String,
    pub class: String,
    pub round_index: usize,
    pub round_label: String,
    pub date: Option<NaiveDate>,
    /// 1-based
    pub hole: usize,
}

pub fn aces(competition: &NormalizedCompetition) -> Vec<Ace> {
    competition
        .rounds
        .iter()
        .flat_map(|round| {
            competition.players.iter().flat_map(move |player| {
                player
                    .result(round.index)
                    .into_iter()
                    .flat_map(|result| result.recorded_holes())
                    .filter(|(_, score)| score.is_ace())
                    .map(move |(hole, _)| Ace {
                        player: player.name.clone(),
                        class: player
                            .result(round.index)
                            .map_or_else(|| player.class.clone(), |result| result.class.clone()),
                        round_index: round.index,
                        round_label: round.label.clone(),
                        date: round.date,
                        hole: hole + 1,
                    })
            })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoundSummary {
    pub round_index: usize,
    pub label: String,
    pub date: Option<NaiveDate>,
    pub total_strokes: i32,
    pub placement: Option<u32>,
    pub relative_to_par: Option<i32>,
    /// Scorecard, empty when the payload has no hole detail.
    pub hole_scores: Vec<Option<HoleScore>>,
}

/// Hole outcomes for one player, aces kept apart from the eagle-or-better bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerDistribution {
    pub aces: usize,
    pub others: ScoreDistribution,
}

impl PlayerDistribution {
    fn record(&mut self, result: &RoundResult) {
        for (_, score) in result.recorded_holes() {
            if score.is_ace() {
                self.aces += 1;
            } else {
                self.others.record(score);
            }
        }
    }

    pub fn holes(&self) -> usize {
        self.aces + self.others.total
    }

    pub fn merge(&mut self, other: &PlayerDistribution) {
        self.aces += other.aces;
        self.others.merge(&other.others);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSeasonSummary {
    pub rounds: Vec<RoundSummary>,
    pub best_round: Option<RoundSummary>,
    pub worst_round: Option<RoundSummary>,
    pub average_total: Option<f64>,
    pub distribution: PlayerDistribution,
    /// The player's mean strokes per hole over the rounds played.
    pub hole_averages: Vec<Option<f64>>,
    pub hole_data_available: bool,
}

impl PlayerSeasonSummary {
    pub fn rounds_played(&self) -> usize {
        self.rounds.len()
    }
}

fn matches_any(player: &PlayerEntry, names: &HashSet<&str>) -> bool {
    player.names.iter().any(|name| names.contains(name.as_str()))
}

/// Summary of the rounds played under any of `names`, `None` if none of them appear.
pub fn season_summary(
    competition: &NormalizedCompetition,
    names: &[String],
) -> Option<PlayerSeasonSummary> {
    let names: HashSet<&str> = names.iter().map(String::as_str).collect();
    let entries: Vec<&PlayerEntry> = competition
        .players
        .iter()
        .filter(|player| matches_any(player, &names))
        .collect();
    if entries.is_empty() {
        return None;
    }

    let played: Vec<&RoundResult> = competition
        .rounds
        .iter()
        .filter_map(|round| {
            entries
                .iter()
                .find_map(|entry| entry.result(round.index).filter(|r| r.has_score()))
        })
        .collect();

    let mut distribution = PlayerDistribution::default();
    played.iter().for_each(|result| distribution.record(result));
    let rounds: Vec<RoundSummary> = played
        .iter()
        .filter_map(|result| {
            let round = competition.rounds.get(result.round_index)?;
            Some(RoundSummary {
                round_index: round.index,
                label: round.label.clone(),
                date: round.date,
                total_strokes: result.total_strokes.unwrap_or_default(),
                placement: result.placement,
                relative_to_par: result.relative_to_par(),
                hole_scores: result.hole_scores.clone(),
            })
        })
        .collect();

    let best_round = rounds
        .iter()
        .min_by_key(|round| round.total_strokes)
        .cloned();
    let worst_round = rounds
        .iter()
        .max_by(|a, b| {
            a.total_strokes
                .cmp(&b.total_strokes)
                .then(b.round_index.cmp(&a.round_index))
        })
        .cloned();
    let average_total = (!rounds.is_empty()).then(|| {
        rounds.iter().map(|round| round.total_strokes as f64).sum::<f64>() / rounds.len() as f64
    });

    Some(PlayerSeasonSummary {
        rounds,
        best_round,
        worst_round,
        average_total,
        distribution,
        hole_averages: hole::averages(played),
        hole_data_available: competition.format.has_hole_detail(),
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct YearSummary {
    pub year: u16,
    pub summary: PlayerSeasonSummary,
}

pub fn history<'a>(
    names: &[String],
    seasons: impl IntoIterator<Item = (u16, &'a NormalizedCompetition)>,
) -> Vec<YearSummary> {
    seasons
        .into_iter()
        .filter_map(|(year, competition)| {
            season_summary(competition, names).map(|summary| YearSummary { year, summary })
        })
        .collect()
}

/// Totals over every summarized year.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CareerSummary {
    pub seasons: usize,
    pub rounds_played: usize,
    pub average_total: Option<f64>,
    pub distribution: PlayerDistribution,
}

pub fn career(years: &[YearSummary]) -> CareerSummary {
    let mut distribution = PlayerDistribution::default();
    let mut strokes = 0i64;
    let mut rounds_played = 0;
    for year in years {
        distribution.merge(&year.summary.distribution);
        rounds_played += year.summary.rounds_played();
        strokes += year
            .summary
            .rounds
            .iter()
            .map(|round| round.total_strokes as i64)
            .sum::<i64>();
    }
    CareerSummary {
        seasons: years.len(),
        rounds_played,
        average_total: (rounds_played > 0).then(|| strokes as f64 / rounds_played as f64),
        distribution,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::controller::normalize::normalize;
    use crate::controller::score::ScoreBucket;
    use serde_json::json;

    fn fixture() -> NormalizedCompetition {
        normalize(&json!({
            "Competition": {
                "Tracks": [{"Par": "3"}, {"Par": "3"}, {"Par": "4"}],
                "SubCompetitions": [
                    {
                        "ID": "10", "Name": "Ukegolf → Uke 1", "Date": "2024-04-10 18:00:00",
                        "Results": [
                            {"UserID": "1", "Name": "Ola Nordmann", "ClassName": "Open", "Place": "1", "Sum": "9",
                             "PlayerResults": [{"Result": "1"}, {"Result": "3"}, {"Result": "5"}]},
                            {"UserID": "2", "Name": "Kari", "ClassName": "Dame", "Place": "1", "Sum": "11",
                             "PlayerResults": [{"Result": "3"}, {"Result": "4"}, {"Result": "4"}]}
                        ]
                    },
                    {
                        "ID": "11", "Name": "Ukegolf → Uke 2", "Date": "2024-04-17 18:00:00",
                        "Results": [
                            {"UserID": "1", "Name": "Ola N.", "ClassName": "Open", "Place": "2", "Sum": "12",
                             "PlayerResults": [{"Result": "4"}, {"Result": "4"}, {"Result": "4"}]},
                            {"UserID": "3", "Name": "Per", "ClassName": "Open", "Place": "1", "Sum": "9",
                             "PlayerResults": [{"Result": "3"}, {"Result": "1"}, {"Result": "5"}]}
                        ]
                    },
                    {
                        "ID": "12", "Name": "Ukegolf → Uke 3", "Date": "2024-04-24 18:00:00",
                        "Results": [
                            {"UserID": "1", "Name": "Ola Nordmann", "ClassName": "Open", "Place": "1", "Sum": "9",
                             "PlayerResults": [{"Result": "3"}, {"Result": "2"}, {"Result": "4"}]}
                        ]
                    }
                ]
            }
        }))
    }

    #[test]
    fn aces_in_round_order() {
        let aces = aces(&fixture());

        assert_eq!(aces.len(), 2);
        assert_eq!(aces[0].player, "Ola Nordmann");
        assert_eq!(aces[0].hole, 1);
        assert_eq!(aces[0].round_label, "Uke 1");
        assert_eq!(aces[1].player, "Per");
        assert_eq!(aces[1].hole, 2);
        assert_eq!(aces[1].round_index, 1);
        assert_eq!(aces[1].date, NaiveDate::from_ymd_opt(2024, 4, 17));
    }

    #[test]
    fn summary_picks_earliest_best_and_worst() {
        let summary =
            season_summary(&fixture(), &["Ola Nordmann".to_string(), "Ola N.".to_string()]).unwrap();

        assert_eq!(summary.rounds_played(), 3);
        let best = summary.best_round.unwrap();
        assert_eq!(best.round_index, 0);
        assert_eq!(best.relative_to_par, Some(-1));
        assert_eq!(summary.worst_round.unwrap().round_index, 1);
        assert_eq!(summary.average_total, Some(10.0));
        assert!(summary.hole_data_available);
    }

    #[test]
    fn aces_are_kept_out_of_eagles() {
        let summary = season_summary(&fixture(), &["Ola Nordmann".to_string()]).unwrap();
        let distribution = summary.distribution;

        assert_eq!(distribution.aces, 1);
        assert_eq!(distribution.others.count(ScoreBucket::EagleOrBetter), 0);
        assert_eq!(distribution.others.count(ScoreBucket::Birdie), 1);
        assert_eq!(distribution.holes(), 9);
    }

    #[test]
    fn best_round_carries_its_scorecard() {
        let summary = season_summary(&fixture(), &["Ola Nordmann".to_string()]).unwrap();
        let best = summary.best_round.unwrap();

        assert_eq!(
            best.hole_scores,
            vec![
                Some(HoleScore::new(1, 3)),
                Some(HoleScore::new(3, 3)),
                Some(HoleScore::new(5, 4))
            ]
        );
    }

    #[test]
    fn hole_averages_cover_only_the_player() {
        let names = ["Ola Nordmann".to_string(), "Ola N.".to_string()];
        let summary = season_summary(&fixture(), &names).unwrap();

        // rounds 1..=3: [1, 3, 5], [4, 4, 4], [3, 2, 4]
        assert_eq!(
            summary.hole_averages,
            vec![Some(8.0 / 3.0), Some(3.0), Some(13.0 / 3.0)]
        );
        let kari = season_summary(&fixture(), &["Kari".to_string()]).unwrap();
        assert_eq!(kari.hole_averages, vec![Some(3.0), Some(4.0), Some(4.0)]);
    }

    #[test]
    fn career_adds_up_every_year() {
        let played = fixture();
        let names = ["Ola Nordmann".to_string(), "Ola N.".to_string()];
        let years = history(&names, [(2024, &played), (2023, &played)]);
        let career = career(&years);

        assert_eq!(career.seasons, 2);
        assert_eq!(career.rounds_played, 6);
        assert_eq!(career.average_total, Some(10.0));
        assert_eq!(career.distribution.aces, 2);
        assert_eq!(career.distribution.holes(), 18);

        assert_eq!(super::career(&[]), CareerSummary::default());
    }

    #[test]
    fn unknown_names_have_no_summary() {
        assert!(season_summary(&fixture(), &["Nils".to_string()]).is_none());
    }

    #[test]
    fn history_skips_years_without_the_player() {
        let played = fixture();
        let empty = NormalizedCompetition::empty();
        let history = history(&["Kari".to_string()], [(2023, &empty), (2024, &played)]);

        assert_eq!(history.len(), 1);
        assert_eq!(history[0].year, 2024);
        assert_eq!(history[0].summary.rounds_played(), 1);
    }
}
