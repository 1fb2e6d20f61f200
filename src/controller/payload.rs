//! Raw shapes of the results provider's `content=result` payload.
//!
//! The provider returns one of two unrelated layouts depending on how the
//! competition was set up. Everything here is deserialized leniently: numbers
//! arrive as numbers or strings, lists may be `null`, holes may be `[]`.

use log::warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::round::DEFAULT_PAR;

/// The payload after structural detection.
#[derive(Debug, Clone)]
pub enum Payload {
    RoundIndexed(RoundIndexedCompetition),
    TourIndexed(TourIndexedCompetition),
    Unrecognized,
}

impl Payload {
    pub fn detect(raw: &Value) -> Self {
        let Some(competition) = raw.get("Competition").filter(|c| c.is_object()) else {
            warn!("Payload has no Competition object");
            return Self::Unrecognized;
        };
        let sub_competitions = competition.get("SubCompetitions").and_then(Value::as_array);
        let tour_pair = competition
            .get("TourResults")
            .and_then(Value::as_array)
            .zip(competition.get("Events").and_then(Value::as_array));

        match (sub_competitions, tour_pair) {
            (Some(rounds), Some(_)) if rounds.is_empty() => Self::tour_indexed(competition),
            (Some(_), _) => Self::round_indexed(competition),
            (None, Some(_)) => Self::tour_indexed(competition),
            (None, None) => {
                warn!("Competition payload is neither round-indexed nor tour-indexed");
                Self::Unrecognized
            }
        }
    }

    fn round_indexed(competition: &Value) -> Self {
        match RoundIndexedCompetition::deserialize(competition) {
            Ok(parsed) => Self::RoundIndexed(parsed),
            Err(e) => {
                warn!("Malformed round-indexed payload: {e}");
                Self::Unrecognized
            }
        }
    }

    fn tour_indexed(competition: &Value) -> Self {
        match TourIndexedCompetition::deserialize(competition) {
            Ok(parsed) => Self::TourIndexed(parsed),
            Err(e) => {
                warn!("Malformed tour-indexed payload: {e}");
                Self::Unrecognized
            }
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "PascalCase")]
pub struct RoundIndexedCompetition {
    #[serde(default, deserialize_with = "lenient_list")]
    pub tracks: Vec<RawTrack>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub sub_competitions: Vec<RawSubCompetition>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "PascalCase")]
pub struct RawSubCompetition {
    #[serde(rename = "ID", default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub tracks: Vec<RawTrack>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub results: Vec<RawPlayerResult>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "PascalCase")]
pub struct RawTrack {
    #[serde(default, deserialize_with = "lenient_int")]
    pub par: Option<i64>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub holes: Vec<RawTrack>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "PascalCase")]
pub struct RawPlayerResult {
    #[serde(rename = "UserID", default, deserialize_with = "lenient_string")]
    pub user_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub class_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub place: Option<i64>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub sum: Option<i64>,
    #[serde(default, deserialize_with = "hole_entries")]
    pub player_results: Vec<Option<RawHoleResult>>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "PascalCase")]
pub struct RawHoleResult {
    #[serde(default, deserialize_with = "lenient_int")]
    pub result: Option<i64>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "PascalCase")]
pub struct TourIndexedCompetition {
    #[serde(default, deserialize_with = "lenient_list")]
    pub tour_results: Vec<RawTourEntry>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub events: Vec<RawEvent>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "PascalCase")]
pub struct RawTourEntry {
    #[serde(rename = "UserID", default, deserialize_with = "lenient_string")]
    pub user_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub class_name: Option<String>,
    #[serde(default, deserialize_with = "event_entries")]
    pub event_results: Vec<Option<RawEventResult>>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "PascalCase")]
pub struct RawEvent {
    #[serde(rename = "ID", default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: Option<String>,
}

/// One cell of a tour entry's `EventResults`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawEventResult {
    pub event_id: Option<String>,
    pub total: Option<i64>,
}

impl RawEventResult {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Object(fields) => Some(Self {
                event_id: fields.get("EventID").and_then(parse_string),
                total: fields
                    .get("Result")
                    .and_then(parse_int)
                    .or_else(|| fields.get("Sum").and_then(parse_int)),
            }),
            other => Some(Self {
                event_id: None,
                total: parse_int(other),
            }),
        }
    }
}

/// Par for every hole described by a track list.
///
/// Tracks are either one object per hole, or a single course whose `Holes`
/// carry the par values.
pub fn pars_from_tracks(tracks: &[RawTrack]) -> Vec<u8> {
    let holes = match tracks.first() {
        Some(course) if !course.holes.is_empty() => &course.holes,
        _ => tracks,
    };
    holes.iter().map(|hole| par_or_default(hole.par)).collect()
}

fn par_or_default(par: Option<i64>) -> u8 {
    par.filter(|par| (1..=u8::MAX as i64).contains(par))
        .map(|par| par as u8)
        .unwrap_or(DEFAULT_PAR)
}

pub(crate) fn parse_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|float| float.fract() == 0.0)
                .map(|float| float as i64)
        }),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn parse_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_owned()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn lenient_int<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    Ok(parse_int(&Value::deserialize(deserializer)?))
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(parse_string(&Value::deserialize(deserializer)?))
}

/// Keeps every element that parses, drops the rest. `null` is an empty list.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .flat_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => vec![],
    })
}

/// Holes stay positional: an unplayed hole (`[]`, `null`) becomes `None`.
fn hole_entries<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<Option<RawHoleResult>>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Object(_) => serde_json::from_value(item).ok(),
                _ => None,
            })
            .collect(),
        _ => vec![],
    })
}

fn event_entries<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<Option<RawEventResult>>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items.iter().map(RawEventResult::from_value).collect(),
        _ => vec![],
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn detects_round_indexed_structurally() {
        let raw = json!({"Competition": {"SubCompetitions": [{"Name": "Runde 1", "Results": []}]}});
        assert!(matches!(Payload::detect(&raw), Payload::RoundIndexed(_)));
    }

    #[test]
    fn detects_tour_indexed_structurally() {
        let raw = json!({"Competition": {"TourResults": [], "Events": [{"ID": 1}]}});
        assert!(matches!(Payload::detect(&raw), Payload::TourIndexed(_)));
    }

    #[test]
    fn empty_sub_competitions_defer_to_tour_pair() {
        let raw = json!({"Competition": {"SubCompetitions": [], "TourResults": [], "Events": []}});
        assert!(matches!(Payload::detect(&raw), Payload::TourIndexed(_)));
    }

    #[test]
    fn unknown_shapes_are_unrecognized() {
        assert!(matches!(Payload::detect(&json!({})), Payload::Unrecognized));
        assert!(matches!(
            Payload::detect(&json!({"Competition": {"TourResults": []}})),
            Payload::Unrecognized
        ));
        assert!(matches!(
            Payload::detect(&json!({"Competition": null})),
            Payload::Unrecognized
        ));
    }

    #[test]
    fn numbers_parse_from_strings_and_numbers() {
        let result: RawPlayerResult = serde_json::from_value(json!({
            "UserID": 1234,
            "Name": "Ola Nordmann",
            "Place": "2",
            "Sum": 54,
            "PlayerResults": [{"Result": "3"}, [], null, {"Result": ""}]
        }))
        .unwrap();
        assert_eq!(result.user_id.as_deref(), Some("1234"));
        assert_eq!(result.place, Some(2));
        assert_eq!(result.sum, Some(54));
        assert_eq!(result.player_results.len(), 4);
        assert_eq!(result.player_results[0].as_ref().unwrap().result, Some(3));
        assert!(result.player_results[1].is_none());
        assert!(result.player_results[2].is_none());
        assert_eq!(result.player_results[3].as_ref().unwrap().result, None);
    }

    #[test]
    fn event_results_accept_every_cell_kind() {
        let entry: RawTourEntry = serde_json::from_value(json!({
            "Name": "Kari",
            "EventResults": [null, 52, "49", {"EventID": "77", "Result": "50"}, {"Sum": 0}]
        }))
        .unwrap();
        assert_eq!(entry.event_results[0], None);
        assert_eq!(entry.event_results[1].as_ref().unwrap().total, Some(52));
        assert_eq!(entry.event_results[2].as_ref().unwrap().total, Some(49));
        assert_eq!(
            entry.event_results[3],
            Some(RawEventResult {
                event_id: Some("77".into()),
                total: Some(50)
            })
        );
        assert_eq!(entry.event_results[4].as_ref().unwrap().total, Some(0));
    }

    #[test]
    fn pars_come_from_either_track_layout() {
        let per_hole: Vec<RawTrack> =
            serde_json::from_value(json!([{"Par": "3"}, {"Par": 4}, {"Par": "x"}, {}])).unwrap();
        assert_eq!(pars_from_tracks(&per_hole), vec![3, 4, 3, 3]);

        let course: Vec<RawTrack> =
            serde_json::from_value(json!([{"Holes": [{"Par": 5}, {"Par": "4"}]}])).unwrap();
        assert_eq!(pars_from_tracks(&course), vec![5, 4]);

        assert!(pars_from_tracks(&[]).is_empty());
    }
}
