use std::collections::HashMap;

use super::hole::{HoleStatistics, Scope};
use super::season::ClassStandings;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemoKey {
    pub competition_id: String,
    pub class_filter: Option<String>,
    pub scope: Scope,
}

impl MemoKey {
    pub fn new(competition_id: &str, class_filter: Option<&str>, scope: Scope) -> Self {
        Self {
            competition_id: competition_id.to_owned(),
            class_filter: class_filter.map(str::to_owned),
            scope,
        }
    }
}

/// Memoized aggregates, recomputed only when the key changes.
#[derive(Debug, Default)]
pub struct Memo {
    standings: HashMap<MemoKey, Vec<ClassStandings>>,
    statistics: HashMap<MemoKey, HoleStatistics>,
}

impl Memo {
    pub fn standings(
        &mut self,
        key: MemoKey,
        compute: impl FnOnce() -> Vec<ClassStandings>,
    ) -> &Vec<ClassStandings> {
        self.standings.entry(key).or_insert_with(compute)
    }

    pub fn statistics(
        &mut self,
        key: MemoKey,
        compute: impl FnOnce() -> HoleStatistics,
    ) -> &HoleStatistics {
        self.statistics.entry(key).or_insert_with(compute)
    }

    pub fn invalidate(&mut self, competition_id: &str) {
        self.standings
            .retain(|key, _| key.competition_id != competition_id);
        self.statistics
            .retain(|key, _| key.competition_id != competition_id);
    }

    pub fn len(&self) -> usize {
        self.standings.len() + self.statistics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
