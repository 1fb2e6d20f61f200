use std::collections::BTreeSet;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use super::round::{NormalizedCompetition, UNKNOWN_CLASS};

fn tokens(name: &str) -> Vec<String> {
    name.split_whitespace().map(str::to_lowercase).collect()
}

/// `"n"` or `"n."`
fn initial(token: &str) -> Option<char> {
    let mut chars = token.chars();
    let letter = chars.next().filter(|c| c.is_alphabetic())?;
    match chars.as_str() {
        "" | "." => Some(letter),
        _ => None,
    }
}

fn initial_matches(a: &str, b: &str) -> bool {
    match (initial(a), initial(b)) {
        (Some(x), Some(y)) => x == y,
        (Some(x), None) => b.starts_with(x),
        (None, Some(y)) => a.starts_with(y),
        (None, None) => false,
    }
}

/// Tokens of `a` paired one-to-one with tokens of `b`, exact pairs first.
fn shared_tokens(a: &[String], b: &[String]) -> usize {
    let mut used = vec![false; b.len()];
    let mut unmatched = vec![];
    let mut shared = 0;
    for token in a {
        match (0..b.len()).find(|i| !used[*i] && b[*i] == *token) {
            Some(i) => {
                used[i] = true;
                shared += 1;
            }
            None => unmatched.push(token),
        }
    }
    for token in unmatched {
        if let Some(i) = (0..b.len()).find(|i| !used[*i] && initial_matches(token, &b[*i])) {
            used[i] = true;
            shared += 1;
        }
    }
    shared
}

/// Whether two display names belong to the same athlete.
///
/// Identical names always match. Names of two or more tokens match when at
/// least two tokens pair up (case-insensitive, initials match the token they
/// abbreviate). Single-token names only match each other exactly.
pub fn same_athlete(a: &str, b: &str) -> bool {
    if a == b {
        return true;
    }
    let (a, b) = (tokens(a), tokens(b));
    match (a.len(), b.len()) {
        (1, 1) => a[0] == b[0],
        (x, y) if x >= 2 && y >= 2 => shared_tokens(&a, &b) >= 2,
        _ => false,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    pub name: String,
    pub year: u16,
    pub class: String,
}

impl Observation {
    pub fn new(name: impl Into<String>, year: u16, class: Option<&str>) -> Self {
        Self {
            name: name.into(),
            year,
            class: class.unwrap_or(UNKNOWN_CLASS).to_owned(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalNamePolicy {
    #[default]
    Longest,
    FirstSeen,
}

impl CanonicalNamePolicy {
    fn pick(&self, names: &[String]) -> Option<String> {
        let picked = match self {
            // max_by_key keeps the last maximum, so walk backwards to let the first-seen win ties
            CanonicalNamePolicy::Longest => names.iter().rev().max_by_key(|name| name.chars().count()),
            CanonicalNamePolicy::FirstSeen => names.first(),
        };
        picked.cloned()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerIdentity {
    pub canonical_name: String,
    /// Every spelling merged into this identity, first seen first.
    pub alt_names: Vec<String>,
    pub classes: BTreeSet<String>,
    pub years: BTreeSet<u16>,
}

impl PlayerIdentity {
    pub fn has_name(&self, name: &str) -> bool {
        self.canonical_name == name || self.alt_names.iter().any(|alt| alt == name)
    }

    fn contains(&self, query: &str) -> bool {
        self.alt_names
            .iter()
            .chain(std::iter::once(&self.canonical_name))
            .any(|name| name.to_lowercase().contains(query))
    }
}

struct Draft {
    basis: String,
    alt_names: Vec<String>,
    classes: BTreeSet<String>,
    years: BTreeSet<u16>,
}

impl Draft {
    fn matches(&self, name: &str) -> bool {
        self.alt_names.iter().any(|alt| alt == name) || same_athlete(&self.basis, name)
    }

    fn absorb(&mut self, observation: Observation) {
        if !self.alt_names.contains(&observation.name) {
            self.alt_names.push(observation.name);
        }
        self.classes.insert(observation.class);
        self.years.insert(observation.year);
    }
}

/// Merges observations into identities in one pass, identities in creation order.
pub fn resolve(
    observations: impl IntoIterator<Item = Observation>,
    policy: CanonicalNamePolicy,
) -> Vec<PlayerIdentity> {
    let mut drafts: Vec<Draft> = vec![];
    for mut observation in observations {
        observation.name = observation.name.trim().to_owned();
        if observation.name.is_empty() {
            continue;
        }
        match drafts.iter_mut().find(|draft| draft.matches(&observation.name)) {
            Some(draft) => draft.absorb(observation),
            None => drafts.push(Draft {
                basis: observation.name.clone(),
                alt_names: vec![observation.name],
                classes: BTreeSet::from([observation.class]),
                years: BTreeSet::from([observation.year]),
            }),
        }
    }

    drafts
        .into_iter()
        .map(|draft| PlayerIdentity {
            canonical_name: policy.pick(&draft.alt_names).unwrap_or(draft.basis),
            alt_names: draft.alt_names,
            classes: draft.classes,
            years: draft.years,
        })
        .collect()
}

/// Identities whose names contain `query`, ordered by canonical name.
pub fn search<'a>(identities: &'a [PlayerIdentity], query: &str) -> Vec<&'a PlayerIdentity> {
    let query = query.trim().to_lowercase();
    identities
        .iter()
        .filter(|identity| query.is_empty() || identity.contains(&query))
        .sorted_by_key(|identity| identity.canonical_name.to_lowercase())
        .collect()
}

/// Every spelling of every player in the competition, once per class played.
pub fn observations_from(competition: &NormalizedCompetition, year: u16) -> Vec<Observation> {
    competition
        .players
        .iter()
        .flat_map(|player| {
            let mut classes = player
                .played()
                .map(|result| result.class.as_str())
                .unique()
                .collect_vec();
            if classes.is_empty() {
                classes.push(player.class.as_str());
            }
            player
                .names
                .iter()
                .cartesian_product(classes)
                .map(move |(name, class)| Observation::new(name.clone(), year, Some(class)))
        })
        .collect()
}
