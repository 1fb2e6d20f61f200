use std::collections::BTreeMap;

use rocket_okapi::okapi::{schemars, schemars::JsonSchema};
use serde::Serialize;

use crate::api::Error;
use crate::controller::get_data::LoadedSeason;
use crate::controller::points::points;

#[derive(Serialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct ResultRow {
    pub placement: Option<u32>,
    pub player_key: String,
    pub name: String,
    pub total_strokes: Option<i32>,
    pub relative_to_par: Option<i32>,
    pub points: u32,
}

#[derive(Serialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct ClassResults {
    pub class: String,
    pub results: Vec<ResultRow>,
}

#[derive(Serialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct RoundResults {
    pub round: usize,
    pub label: String,
    pub completed: bool,
    pub classes: Vec<ClassResults>,
}

/// One round's results grouped by class, each class ordered by placement.
pub fn round_results(
    season: &LoadedSeason,
    round: usize,
    class_filter: Option<&str>,
) -> Result<RoundResults, Error> {
    let normalized = &season.normalized;
    let event = normalized
        .rounds
        .get(round)
        .ok_or(Error::RoundNotFound(round))?;
    let completed = normalized.is_completed(round);

    let mut classes: BTreeMap<String, Vec<ResultRow>> = BTreeMap::new();
    for player in &normalized.players {
        let Some(result) = player.result(round) else {
            continue;
        };
        if class_filter.is_some_and(|class| class != result.class) {
            continue;
        }
        classes
            .entry(result.class.clone())
            .or_default()
            .push(ResultRow {
                placement: result.placement,
                player_key: player.key.to_string(),
                name: player.name.clone(),
                total_strokes: result.total_strokes,
                relative_to_par: result.relative_to_par(),
                points: match result.placement {
                    Some(placement) if completed => points(placement),
                    _ => 0,
                },
            });
    }

    Ok(RoundResults {
        round,
        label: event.label.clone(),
        completed,
        classes: classes
            .into_iter()
            .map(|(class, mut results)| {
                results.sort_by_key(|row| row.placement.unwrap_or(u32::MAX));
                ClassResults { class, results }
            })
            .collect(),
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::controller::normalize::normalize;
    use crate::controller::round::Competition;
    use serde_json::json;

    fn season() -> LoadedSeason {
        let normalized = normalize(&json!({"Competition": {
            "Tracks": [{"Par": 3}, {"Par": 3}],
            "SubCompetitions": [
                {"Name": "Uke 1", "Results": [
                    {"UserID": "1", "Name": "Ola", "ClassName": "Open", "Place": 2, "Sum": 7,
                     "PlayerResults": [{"Result": 3}, {"Result": 4}]},
                    {"UserID": "2", "Name": "Kari", "ClassName": "Dame", "Place": 1, "Sum": 8,
                     "PlayerResults": [{"Result": 4}, {"Result": 4}]},
                    {"UserID": "3", "Name": "Per", "ClassName": "Open", "Place": 1, "Sum": 5,
                     "PlayerResults": [{"Result": 2}, {"Result": 3}]},
                    {"UserID": "4", "Name": "Nils", "ClassName": "Open", "Sum": 0, "PlayerResults": []}
                ]},
                {"Name": "Uke 2", "Results": [
                    {"UserID": "1", "Name": "Ola", "ClassName": "Open", "Place": 1, "Sum": 0, "PlayerResults": []}
                ]}
            ]
        }}));
        LoadedSeason {
            competition: Competition::new("1", 2024, None),
            normalized,
        }
    }

    #[test]
    fn classes_are_ordered_by_placement() {
        let results = round_results(&season(), 0, None).unwrap();
        assert!(results.completed);
        assert_eq!(results.label, "Uke 1");

        let classes = results.classes.iter().map(|class| class.class.as_str()).collect::<Vec<_>>();
        assert_eq!(classes, vec!["Dame", "Open"]);

        let open = &results.classes[1].results;
        let names = open.iter().map(|row| row.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, vec!["Per", "Ola", "Nils"]);
        assert_eq!(open.iter().map(|row| row.points).collect::<Vec<_>>(), vec![50, 45, 0]);
        assert_eq!(open[0].relative_to_par, Some(-1));
    }

    #[test]
    fn class_filter_keeps_one_class() {
        let results = round_results(&season(), 0, Some("Dame")).unwrap();
        assert_eq!(results.classes.len(), 1);
        assert_eq!(results.classes[0].results[0].name, "Kari");

        let none = round_results(&season(), 0, Some("Pro")).unwrap();
        assert!(none.classes.is_empty());
    }

    #[test]
    fn incomplete_rounds_give_no_points() {
        let results = round_results(&season(), 1, None).unwrap();
        assert!(!results.completed);
        assert_eq!(results.classes[0].results[0].placement, Some(1));
        assert_eq!(results.classes[0].results[0].points, 0);

        assert!(matches!(
            round_results(&season(), 2, None),
            Err(Error::RoundNotFound(2))
        ));
    }
}
