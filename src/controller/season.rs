use std::collections::BTreeMap;

use itertools::Itertools;
use rayon::prelude::*;

use super::points::PointsCurve;
use super::round::{NormalizedCompetition, PlayerEntry, PlayerKey};

/// Share of the season's completed rounds that count towards the total.
pub const COUNTING_SHARE: f64 = 0.5;

pub fn counting_round_count(basis: usize) -> usize {
    (basis as f64 * COUNTING_SHARE).floor() as usize
}

/// Picks the counting rounds: eligible rounds by points descending,
/// ties by round index ascending, at most `counting` of them.
pub fn counting_flags(points: &[u32], completed: &[bool], counting: usize) -> Vec<bool> {
    let mut flags = vec![false; points.len()];
    (0..points.len())
        .filter(|round| points[*round] > 0 && completed.get(*round).copied().unwrap_or(false))
        .sorted_by(|a, b| points[*b].cmp(&points[*a]).then(a.cmp(b)))
        .take(counting)
        .for_each(|round| flags[round] = true);
    flags
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonStanding {
    pub player_key: PlayerKey,
    pub name: String,
    pub class: String,
    pub per_round_points: Vec<u32>,
    pub counting_flags: Vec<bool>,
    pub completed: Vec<bool>,
    pub total_points: u32,
}

impl SeasonStanding {
    pub fn counting_rounds(&self) -> usize {
        self.counting_flags.iter().filter(|counts| **counts).count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassStandings {
    pub class: String,
    pub standings: Vec<SeasonStanding>,
}

pub struct SeasonAggregator<'a> {
    competition: &'a NormalizedCompetition,
    curve: PointsCurve,
    round_basis: Option<usize>,
}

impl<'a> SeasonAggregator<'a> {
    pub fn new(competition: &'a NormalizedCompetition) -> Self {
        Self {
            competition,
            curve: PointsCurve::default(),
            round_basis: None,
        }
    }

    /// Replaces the completed-round count as the counting basis.
    pub fn with_round_basis(mut self, total_rounds: Option<usize>) -> Self {
        self.round_basis = total_rounds;
        self
    }

    pub fn counting_rounds(&self) -> usize {
        counting_round_count(
            self.round_basis
                .unwrap_or_else(|| self.competition.completed_round_count()),
        )
    }

    /// Standings sorted by total points, optionally restricted to one class.
    pub fn standings(&self, class_filter: Option<&str>) -> Vec<SeasonStanding> {
        let completed = self.competition.completed_rounds();
        let counting = self.counting_rounds();

        let mut standings: Vec<SeasonStanding> = self
            .competition
            .players
            .par_iter()
            .filter_map(|player| self.standing(player, class_filter, &completed, counting))
            .collect();
        standings.sort_by(|a, b| b.total_points.cmp(&a.total_points));
        standings
    }

    /// One group per class, ordered by class name. With a filter only that class is returned.
    pub fn grouped(&self, class_filter: Option<&str>) -> Vec<ClassStandings> {
        let mut groups: BTreeMap<String, Vec<SeasonStanding>> = BTreeMap::new();
        for standing in self.standings(class_filter) {
            groups
                .entry(standing.class.clone())
                .or_default()
                .push(standing);
        }
        groups
            .into_iter()
            .map(|(class, standings)| ClassStandings { class, standings })
            .collect()
    }

    fn standing(
        &self,
        player: &PlayerEntry,
        class_filter: Option<&str>,
        completed_rounds: &[bool],
        counting: usize,
    ) -> Option<SeasonStanding> {
        let results = (0..completed_rounds.len())
            .map(|round| {
                player
                    .result(round)
                    .filter(|result| class_filter.map_or(true, |class| result.class == class))
            })
            .collect_vec();

        if class_filter.is_some() && results.iter().all(Option::is_none) {
            return None;
        }

        let (per_round_points, completed): (Vec<u32>, Vec<bool>) = results
            .iter()
            .zip(completed_rounds)
            .map(|(result, round_completed)| {
                match result.and_then(|result| result.placement) {
                    Some(placement) if *round_completed => (self.curve.points(placement), true),
                    _ => (0, false),
                }
            })
            .unzip();

        let counting_flags = counting_flags(&per_round_points, &completed, counting);
        let total_points = per_round_points
            .iter()
            .zip(&counting_flags)
            .filter(|(_, counts)| **counts)
            .map(|(points, _)| points)
            .sum();

        Some(SeasonStanding {
            player_key: player.key.clone(),
            name: player.name.clone(),
            class: class_filter.map_or_else(|| player.class.clone(), str::to_owned),
            per_round_points,
            counting_flags,
            completed,
            total_points,
        })
    }
}
