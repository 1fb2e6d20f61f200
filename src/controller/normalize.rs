use std::collections::HashMap;
use std::sync::OnceLock;

use chrono::NaiveDate;
use itertools::Itertools;
use log::debug;
use regex::Regex;
use serde_json::Value;

use super::payload::{
    pars_from_tracks, Payload, RawSubCompetition, RoundIndexedCompetition, TourIndexedCompetition,
};
use super::round::{
    HoleScore, NormalizedCompetition, PayloadFormat, PlayerEntry, PlayerKey, RoundEvent,
    RoundResult, DEFAULT_PAR, UNKNOWN_CLASS,
};

/// Turns a raw provider payload into the canonical round model.
///
/// Never fails: anything that is not one of the two known shapes comes back
/// as an empty competition.
pub fn normalize(raw: &Value) -> NormalizedCompetition {
    let normalized = match Payload::detect(raw) {
        Payload::RoundIndexed(competition) => normalize_round_indexed(competition),
        Payload::TourIndexed(competition) => normalize_tour_indexed(competition),
        Payload::Unrecognized => NormalizedCompetition::empty(),
    };
    debug!(
        "Normalized {:?} payload: {} rounds, {} players",
        normalized.format,
        normalized.rounds.len(),
        normalized.players.len()
    );
    normalized
}

fn normalize_round_indexed(competition: RoundIndexedCompetition) -> NormalizedCompetition {
    let competition_pars = pars_from_tracks(&competition.tracks);
    let mut players = PlayerTable::new(competition.sub_competitions.len());
    let mut rounds = Vec::with_capacity(competition.sub_competitions.len());

    for (index, round) in competition.sub_competitions.into_iter().enumerate() {
        let par_by_hole = round_pars(&round, &competition_pars);
        for result in round.results {
            let Some((key, name)) = identify(result.user_id, result.name) else {
                continue;
            };
            let hole_scores = result
                .player_results
                .iter()
                .enumerate()
                .map(|(hole, raw)| {
                    raw.as_ref()
                        .and_then(|raw| raw.result)
                        .and_then(|strokes| u8::try_from(strokes).ok())
                        .filter(|strokes| *strokes > 0)
                        .map(|strokes| HoleScore::new(strokes, par_at(&par_by_hole, hole)))
                })
                .collect();
            let round_result = RoundResult {
                player_key: key.clone(),
                round_index: index,
                class: class_or_unknown(result.class_name),
                placement: result
                    .place
                    .and_then(|place| u32::try_from(place).ok())
                    .filter(|place| *place > 0),
                hole_scores,
                total_strokes: result.sum.and_then(|sum| i32::try_from(sum).ok()),
            };
            players.insert_first(key, name, round_result);
        }
        rounds.push(RoundEvent {
            index,
            event_id: round.id,
            label: round_label(round.name.as_deref(), index),
            date: round.date.as_deref().and_then(parse_date),
            par_by_hole,
        });
    }

    NormalizedCompetition {
        format: PayloadFormat::RoundIndexed,
        rounds,
        players: players.into_entries(),
    }
}

fn round_pars(round: &RawSubCompetition, competition_pars: &[u8]) -> Vec<u8> {
    let mut pars = if round.tracks.is_empty() {
        competition_pars.to_vec()
    } else {
        pars_from_tracks(&round.tracks)
    };
    let longest = round
        .results
        .iter()
        .map(|result| result.player_results.len())
        .max()
        .unwrap_or(0);
    if pars.len() < longest {
        pars.resize(longest, DEFAULT_PAR);
    }
    pars
}

fn normalize_tour_indexed(competition: TourIndexedCompetition) -> NormalizedCompetition {
    let rounds = competition
        .events
        .iter()
        .enumerate()
        .map(|(index, event)| RoundEvent {
            index,
            event_id: event.id.clone(),
            label: round_label(event.name.as_deref(), index),
            date: event.date.as_deref().and_then(parse_date),
            par_by_hole: vec![],
        })
        .collect_vec();
    let event_positions: HashMap<&str, usize> = rounds
        .iter()
        .flat_map(|round| round.event_id.as_deref().map(|id| (id, round.index)))
        .collect();

    let mut players = PlayerTable::new(rounds.len());
    for entry in competition.tour_results {
        let Some((key, name)) = identify(entry.user_id, entry.name) else {
            continue;
        };
        let class = class_or_unknown(entry.class_name);
        players.register(&key, &name, &class);
        for (position, cell) in entry.event_results.into_iter().enumerate() {
            let Some(cell) = cell else {
                continue;
            };
            let round_index = cell
                .event_id
                .as_deref()
                .and_then(|id| event_positions.get(id).copied())
                .unwrap_or(position);
            if round_index >= rounds.len() {
                continue;
            }
            players.overwrite(RoundResult {
                player_key: key.clone(),
                round_index,
                class: class.clone(),
                placement: None,
                hole_scores: vec![],
                total_strokes: cell.total.and_then(|total| i32::try_from(total).ok()),
            });
        }
    }
    players.rank_by_strokes();

    NormalizedCompetition {
        format: PayloadFormat::TourIndexed,
        rounds,
        players: players.into_entries(),
    }
}

/// Player entries in first-seen order, built up during one normalization pass.
struct PlayerTable {
    round_count: usize,
    entries: Vec<PlayerEntry>,
    positions: HashMap<PlayerKey, usize>,
}

impl PlayerTable {
    fn new(round_count: usize) -> Self {
        Self {
            round_count,
            entries: vec![],
            positions: HashMap::new(),
        }
    }

    fn register(&mut self, key: &PlayerKey, name: &str, class: &str) -> &mut PlayerEntry {
        let position = match self.positions.get(key) {
            Some(position) => *position,
            None => {
                self.entries.push(PlayerEntry {
                    key: key.clone(),
                    name: name.to_owned(),
                    names: vec![],
                    class: class.to_owned(),
                    results: vec![None; self.round_count],
                });
                self.positions.insert(key.clone(), self.entries.len() - 1);
                self.entries.len() - 1
            }
        };
        let entry = &mut self.entries[position];
        if !entry.names.iter().any(|known| known == name) {
            entry.names.push(name.to_owned());
        }
        if name.chars().count() > entry.name.chars().count() {
            entry.name = name.to_owned();
        }
        entry
    }

    /// Keeps the first result a player has in a round.
    fn insert_first(&mut self, key: PlayerKey, name: String, result: RoundResult) {
        let entry = self.register(&key, &name, &result.class);
        if let Some(slot) = entry.results.get_mut(result.round_index) {
            if slot.is_none() {
                *slot = Some(result);
            }
        }
    }

    /// Later rows for the same player and round replace earlier ones.
    fn overwrite(&mut self, result: RoundResult) {
        let Some(position) = self.positions.get(&result.player_key).copied() else {
            return;
        };
        if let Some(slot) = self.entries[position].results.get_mut(result.round_index) {
            *slot = Some(result);
        }
    }

    /// Derives placements from totals, per round and class, lowest total first.
    fn rank_by_strokes(&mut self) {
        for round in 0..self.round_count {
            let finishers = self
                .entries
                .iter()
                .enumerate()
                .flat_map(|(position, entry)| {
                    let result = entry.result(round)?;
                    let total = result.total_strokes.filter(|total| *total > 0)?;
                    Some((position, result.class.clone(), total))
                })
                .sorted_by_key(|(_, _, total)| *total)
                .collect_vec();

            let mut next_place: HashMap<String, u32> = HashMap::new();
            for (position, class, _) in finishers {
                let place = next_place.entry(class).or_insert(0);
                *place += 1;
                if let Some(Some(result)) = self.entries[position].results.get_mut(round) {
                    result.placement = Some(*place);
                }
            }
        }
    }

    fn into_entries(self) -> Vec<PlayerEntry> {
        self.entries
    }
}

fn identify(user_id: Option<String>, name: Option<String>) -> Option<(PlayerKey, String)> {
    let name = name.map(|name| name.trim().to_owned()).filter(|name| !name.is_empty());
    match (user_id, name) {
        (Some(id), Some(name)) => Some((PlayerKey::new(id), name)),
        (Some(id), None) => Some((PlayerKey::new(id.clone()), id)),
        (None, Some(name)) => Some((PlayerKey::new(name.clone()), name)),
        (None, None) => None,
    }
}

fn class_or_unknown(class: Option<String>) -> String {
    class.unwrap_or_else(|| UNKNOWN_CLASS.to_owned())
}

fn par_at(pars: &[u8], hole: usize) -> u8 {
    pars.get(hole).copied().unwrap_or(DEFAULT_PAR)
}

fn parse_date(date: &str) -> Option<NaiveDate> {
    let day = date.trim().get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

fn round_number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"Runde \d+").expect("round label pattern is valid"))
}

/// Short label for a round, e.g. `"Ukegolf 2025 → Runde 3"` becomes `"Runde 3"`.
pub fn round_label(name: Option<&str>, index: usize) -> String {
    let name = name.map(str::trim).unwrap_or_default();
    let after_arrow = name
        .split_once("&rarr;")
        .or_else(|| name.split_once('→'))
        .map(|(_, rest)| rest.trim())
        .filter(|rest| !rest.is_empty());
    if let Some(label) = after_arrow {
        return label.to_owned();
    }
    if let Some(found) = round_number_pattern().find(name) {
        return found.as_str().to_owned();
    }
    if !name.is_empty() {
        return name.to_owned();
    }
    format!("Uke {}", index + 1)
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    fn round_indexed_fixture() -> Value {
        json!({"Competition": {
            "Tracks": [{"Par": "3"}, {"Par": "4"}, {"Par": "5"}],
            "SubCompetitions": [
                {
                    "ID": "101",
                    "Name": "Ukegolf 2024 &rarr; Runde 1",
                    "Date": "2024-04-10 18:00:00",
                    "Results": [
                        {"UserID": "1", "Name": "Ola Nordmann", "ClassName": "Open", "Place": 1, "Sum": 12,
                         "PlayerResults": [{"Result": "3"}, {"Result": "4"}, {"Result": "5"}]},
                        {"UserID": "2", "Name": "Kari", "ClassName": "Dame", "Place": "1", "Sum": "14",
                         "PlayerResults": [{"Result": "4"}, [], {"Result": "6"}]}
                    ]
                },
                {"ID": "102", "Name": "Runde 2 (avlyst)", "Results": [
                    {"UserID": "1", "Name": "Ola Nordmann", "ClassName": "Open", "Place": "", "Sum": 0, "PlayerResults": []}
                ]},
                {"ID": "103", "Name": "", "Results": null}
            ]
        }})
    }

    #[test]
    fn round_indexed_keeps_rounds_and_hole_detail() {
        let normalized = normalize(&round_indexed_fixture());
        assert_eq!(normalized.format, PayloadFormat::RoundIndexed);
        assert_eq!(normalized.rounds.len(), 3);
        assert_eq!(normalized.rounds[0].label, "Runde 1");
        assert_eq!(normalized.rounds[0].date, NaiveDate::from_ymd_opt(2024, 4, 10));
        assert_eq!(normalized.rounds[0].par_by_hole, vec![3, 4, 5]);
        assert_eq!(normalized.rounds[1].label, "Runde 2");
        assert_eq!(normalized.rounds[2].label, "Uke 3");

        let ola = normalized.player(&PlayerKey::new("1")).unwrap();
        assert_eq!(ola.results.len(), 3);
        let first = ola.result(0).unwrap();
        assert_eq!(first.placement, Some(1));
        assert_eq!(first.total_strokes, Some(12));
        assert_eq!(
            first.hole_scores,
            vec![
                Some(HoleScore::new(3, 3)),
                Some(HoleScore::new(4, 4)),
                Some(HoleScore::new(5, 5))
            ]
        );
        assert_eq!(ola.result(1).unwrap().placement, None);
        assert!(ola.result(2).is_none());

        let kari = normalized.player(&PlayerKey::new("2")).unwrap();
        assert_eq!(kari.class, "Dame");
        assert_eq!(kari.result(0).unwrap().hole_scores[1], None);
    }

    #[test]
    fn registration_only_rounds_are_not_completed() {
        let normalized = normalize(&round_indexed_fixture());
        assert_eq!(normalized.completed_rounds(), vec![true, false, false]);
        assert_eq!(normalized.completed_round_count(), 1);
    }

    #[test]
    fn par_defaults_to_three_without_tracks() {
        let raw = json!({"Competition": {"SubCompetitions": [{"Results": [
            {"Name": "Solo", "Sum": 7, "PlayerResults": [{"Result": 2}, {"Result": 5}]}
        ]}]}});
        let normalized = normalize(&raw);
        assert_eq!(normalized.rounds[0].par_by_hole, vec![3, 3]);
        let solo = normalized.player(&PlayerKey::new("Solo")).unwrap();
        assert_eq!(solo.class, UNKNOWN_CLASS);
        assert_eq!(solo.result(0).unwrap().hole_scores[1], Some(HoleScore::new(5, 3)));
    }

    #[test]
    fn tour_indexed_ranks_totals_per_class() {
        let raw = json!({"Competition": {
            "Events": [{"ID": "e1", "Name": "Runde 1"}, {"ID": "e2", "Name": "Runde 2"}, {"ID": "e3", "Name": "Runde 3"}],
            "TourResults": [
                {"UserID": 1, "Name": "Ola N.", "ClassName": "Open", "EventResults": [55, null, 0]},
                {"UserID": 2, "Name": "Per", "ClassName": "Open", "EventResults": [50, "60", 0]},
                {"UserID": 3, "Name": "Kari", "ClassName": "Dame", "EventResults": [{"EventID": "e2", "Result": 58}]},
                {"UserID": 1, "Name": "Ola Nordmann", "ClassName": "Open", "EventResults": [null, 61]}
            ]
        }});
        let normalized = normalize(&raw);
        assert_eq!(normalized.format, PayloadFormat::TourIndexed);
        assert_eq!(normalized.rounds.len(), 3);
        assert!(normalized.rounds.iter().all(|round| round.par_by_hole.is_empty()));
        assert_eq!(normalized.players.len(), 3);

        let ola = normalized.player(&PlayerKey::new("1")).unwrap();
        assert_eq!(ola.name, "Ola Nordmann");
        assert_eq!(ola.names, vec!["Ola N.".to_string(), "Ola Nordmann".to_string()]);
        assert_eq!(ola.result(0).unwrap().placement, Some(2));
        assert_eq!(ola.result(1).unwrap().placement, Some(2));
        assert_eq!(ola.result(2).unwrap().placement, None);

        let per = normalized.player(&PlayerKey::new("2")).unwrap();
        assert_eq!(per.result(0).unwrap().placement, Some(1));
        assert_eq!(per.result(1).unwrap().placement, Some(1));

        let kari = normalized.player(&PlayerKey::new("3")).unwrap();
        assert!(kari.result(0).is_none());
        assert_eq!(kari.result(1).unwrap().placement, Some(1));
        assert!(kari.result(1).unwrap().hole_scores.is_empty());

        assert_eq!(normalized.completed_rounds(), vec![true, true, false]);
    }

    #[test]
    fn three_digit_hole_results_are_triple_or_worse() {
        use crate::controller::hole::{score_distribution, Scope};
        use crate::controller::score::{BogeyType, ScoreBucket};

        let raw = json!({"Competition": {
            "Tracks": [{"Par": 3}, {"Par": 3}, {"Par": 3}],
            "SubCompetitions": [{"Name": "Uke 1", "Results": [
                {"UserID": "1", "Name": "Ola", "ClassName": "Open", "Place": 1, "Sum": 333,
                 "PlayerResults": [{"Result": "130"}, {"Result": "200"}, {"Result": "300"}]}
            ]}]
        }});
        let normalized = normalize(&raw);
        let ola = normalized.player(&PlayerKey::new("1")).unwrap();
        assert_eq!(ola.result(0).unwrap().relative_to_par(), Some(324));
        assert_eq!(ola.result(0).unwrap().hole_scores[2], None);

        let distribution = score_distribution(&normalized, Scope::Round(0));
        assert_eq!(distribution.total, 2);
        assert_eq!(
            distribution.count(ScoreBucket::Bogey(BogeyType::TripleOrWorse)),
            2
        );
        assert_eq!(distribution.count(ScoreBucket::EagleOrBetter), 0);
    }

    #[test]
    fn unrecognized_payload_is_empty() {
        let normalized = normalize(&json!({"Errors": ["Competition not found"]}));
        assert_eq!(normalized.format, PayloadFormat::Unrecognized);
        assert!(normalized.is_empty());
        assert_eq!(normalized.completed_round_count(), 0);
    }

    #[test]
    fn labels_follow_event_names() {
        assert_eq!(round_label(Some("Ukegolf → Runde 7"), 6), "Runde 7");
        assert_eq!(round_label(Some("Skien Ukegolf Runde 12 2023"), 11), "Runde 12");
        assert_eq!(round_label(Some("Sesongfinale"), 19), "Sesongfinale");
        assert_eq!(round_label(None, 0), "Uke 1");
    }
}
