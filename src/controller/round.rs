use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

pub const DEFAULT_PAR: u8 = 3;
pub const UNKNOWN_CLASS: &str = "Unknown";

/// Stable identifier for a player within one competition.
///
/// Comes from the provider's user id, falls back to the display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PlayerKey(String);

impl PlayerKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PayloadFormat {
    RoundIndexed,
    TourIndexed,
    Unrecognized,
}

impl PayloadFormat {
    /// Only the round-indexed shape carries hole-by-hole scores.
    pub fn has_hole_detail(&self) -> bool {
        matches!(self, PayloadFormat::RoundIndexed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Competition {
    pub id: String,
    pub year: u16,
    pub total_rounds_override: Option<usize>,
}

impl Competition {
    pub fn new(
        id: impl Into<String>,
        year: u16,
        total_rounds_override: Option<usize>,
    ) -> Self {
        Self {
            id: id.into(),
            year,
            total_rounds_override,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoundEvent {
    pub index: usize,
    pub event_id: Option<String>,
    pub label: String,
    pub date: Option<NaiveDate>,
    pub par_by_hole: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoleScore {
    pub strokes: u8,
    pub par: u8,
}

impl HoleScore {
    pub fn new(strokes: u8, par: u8) -> Self {
        Self { strokes, par }
    }

    pub fn diff(&self) -> i32 {
        self.strokes as i32 - self.par as i32
    }

    pub fn is_ace(&self) -> bool {
        self.strokes == 1
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoundResult {
    pub player_key: PlayerKey,
    pub round_index: usize,
    pub class: String,
    pub placement: Option<u32>,
    /// Aligned with the round's `par_by_hole`, `None` where no score was recorded.
    pub hole_scores: Vec<Option<HoleScore>>,
    pub total_strokes: Option<i32>,
}

impl RoundResult {
    pub fn has_score(&self) -> bool {
        self.total_strokes.is_some_and(|total| total > 0)
    }

    pub fn recorded_holes(&self) -> impl Iterator<Item = (usize, &HoleScore)> {
        self.hole_scores
            .iter()
            .enumerate()
            .flat_map(|(hole, score)| score.as_ref().map(|score| (hole, score)))
    }

    /// Strokes relative to par over the recorded holes, if there are any.
    pub fn relative_to_par(&self) -> Option<i32> {
        let mut holes = self.recorded_holes().peekable();
        holes.peek()?;
        Some(holes.map(|(_, score)| score.diff()).sum())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerEntry {
    pub key: PlayerKey,
    pub name: String,
    /// Every spelling seen under this key, first seen first.
    pub names: Vec<String>,
    pub class: String,
    pub results: Vec<Option<RoundResult>>,
}

impl PlayerEntry {
    pub fn result(&self, round: usize) -> Option<&RoundResult> {
        self.results.get(round).and_then(Option::as_ref)
    }

    pub fn played(&self) -> impl Iterator<Item = &RoundResult> {
        self.results.iter().flatten()
    }
}

/// Canonical view of one competition-year, independent of the payload shape.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedCompetition {
    pub format: PayloadFormat,
    pub rounds: Vec<RoundEvent>,
    pub players: Vec<PlayerEntry>,
}

impl NormalizedCompetition {
    pub fn empty() -> Self {
        Self {
            format: PayloadFormat::Unrecognized,
            rounds: vec![],
            players: vec![],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty() && self.players.is_empty()
    }

    pub fn player(&self, key: &PlayerKey) -> Option<&PlayerEntry> {
        self.players.iter().find(|player| &player.key == key)
    }

    pub fn round_results(&self, round: usize) -> impl Iterator<Item = &RoundResult> {
        self.players
            .iter()
            .flat_map(move |player| player.result(round))
    }

    /// A round counts once at least one participant has a positive total.
    pub fn is_completed(&self, round: usize) -> bool {
        self.round_results(round).any(RoundResult::has_score)
    }

    pub fn completed_rounds(&self) -> Vec<bool> {
        (0..self.rounds.len())
            .map(|round| self.is_completed(round))
            .collect()
    }

    pub fn completed_round_count(&self) -> usize {
        self.completed_rounds().into_iter().filter(|done| *done).count()
    }

    pub fn classes(&self) -> Vec<String> {
        let mut classes: Vec<String> = self
            .players
            .iter()
            .flat_map(|player| player.played().map(|result| result.class.clone()))
            .collect();
        classes.sort();
        classes.dedup();
        classes
    }
}
