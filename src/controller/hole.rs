use super::round::{HoleScore, NormalizedCompetition, RoundResult};
use super::score::ScoreBucket;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Round(usize),
    Season,
}

impl Scope {
    pub fn from_round(round: Option<usize>) -> Self {
        round.map_or(Scope::Season, Scope::Round)
    }

    /// Round indices the scope covers. Season scope only covers completed rounds.
    pub fn rounds(&self, competition: &NormalizedCompetition) -> Vec<usize> {
        match *self {
            Scope::Round(round) if round < competition.rounds.len() => vec![round],
            Scope::Round(_) => vec![],
            Scope::Season => (0..competition.rounds.len())
                .filter(|round| competition.is_completed(*round))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreDistribution {
    counts: [usize; 6],
    pub total: usize,
}

impl ScoreDistribution {
    pub fn record(&mut self, score: &HoleScore) {
        self.counts[ScoreBucket::of(score).slot()] += 1;
        self.total += 1;
    }

    pub fn count(&self, bucket: ScoreBucket) -> usize {
        self.counts[bucket.slot()]
    }

    /// `count / total`, 0 for an empty distribution.
    pub fn share(&self, bucket: ScoreBucket) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.count(bucket) as f64 / self.total as f64
    }

    pub fn buckets(&self) -> impl Iterator<Item = (ScoreBucket, usize)> + '_ {
        ScoreBucket::ALL
            .into_iter()
            .map(|bucket| (bucket, self.count(bucket)))
    }

    pub fn merge(&mut self, other: &ScoreDistribution) {
        for (count, added) in self.counts.iter_mut().zip(other.counts) {
            *count += added;
        }
        self.total += other.total;
    }
}

impl<'a> FromIterator<&'a HoleScore> for ScoreDistribution {
    fn from_iter<T: IntoIterator<Item = &'a HoleScore>>(iter: T) -> Self {
        let mut distribution = Self::default();
        iter.into_iter().for_each(|score| distribution.record(score));
        distribution
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HoleStatistics {
    pub scope: Scope,
    pub hole_averages: Vec<Option<f64>>,
    /// Par of the scoped round, or of the longest round in a season scope.
    pub par_by_hole: Vec<u8>,
    pub distribution: ScoreDistribution,
}

#[derive(Default, Clone, Copy)]
struct HoleStats {
    strokes: u32,
    recorded: u32,
}

impl HoleStats {
    fn average_score(&self) -> Option<f64> {
        (self.recorded > 0).then(|| self.strokes as f64 / self.recorded as f64)
    }
}

fn results_in<'a>(
    competition: &'a NormalizedCompetition,
    rounds: &'a [usize],
) -> impl Iterator<Item = &'a RoundResult> + 'a {
    rounds
        .iter()
        .flat_map(move |round| competition.round_results(*round))
}

pub fn hole_averages(competition: &NormalizedCompetition, scope: Scope) -> Vec<Option<f64>> {
    let rounds = scope.rounds(competition);
    averages(results_in(competition, &rounds))
}

/// Mean strokes per hole position over the recorded holes of `results`.
pub fn averages<'a>(results: impl IntoIterator<Item = &'a RoundResult>) -> Vec<Option<f64>> {
    let mut holes: Vec<HoleStats> = vec![];
    for result in results {
        if holes.len() < result.hole_scores.len() {
            holes.resize(result.hole_scores.len(), HoleStats::default());
        }
        for (hole, score) in result.recorded_holes() {
            holes[hole].strokes += score.strokes as u32;
            holes[hole].recorded += 1;
        }
    }
    holes.iter().map(HoleStats::average_score).collect()
}

pub fn score_distribution(competition: &NormalizedCompetition, scope: Scope) -> ScoreDistribution {
    let rounds = scope.rounds(competition);
    results_in(competition, &rounds)
        .flat_map(|result| result.recorded_holes().map(|(_, score)| score))
        .collect()
}

pub fn statistics(competition: &NormalizedCompetition, scope: Scope) -> HoleStatistics {
    let par_by_hole = scope
        .rounds(competition)
        .into_iter()
        .filter_map(|round| competition.rounds.get(round))
        .map(|round| round.par_by_hole.clone())
        .max_by_key(Vec::len)
        .unwrap_or_default();

    HoleStatistics {
        scope,
        hole_averages: hole_averages(competition, scope),
        par_by_hole,
        distribution: score_distribution(competition, scope),
    }
}
