use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, info, warn};
use serde_json::Value;
use tokio::sync::{Mutex, MutexGuard};

use crate::api::Error;
use crate::config::{LeagueConfig, SeasonConfig};
use crate::controller::cache::{Memo, MemoKey};
use crate::controller::hole::{self, HoleStatistics, Scope};
use crate::controller::identity::{self, PlayerIdentity};
use crate::controller::normalize::normalize;
use crate::controller::player_stats::{self, CareerSummary, YearSummary};
use crate::controller::round::{Competition, NormalizedCompetition};
use crate::controller::season::{ClassStandings, SeasonAggregator};
use crate::controller::selection::SelectionTracker;

/// Where raw competition payloads come from.
#[rocket::async_trait]
pub trait ResultsSource: Send + Sync {
    async fn fetch(&self, competition_id: &str) -> Result<Value, Error>;
}

/// Disc Golf Metrix `content=result` endpoint.
#[derive(Debug, Clone)]
pub struct MetrixClient {
    client: reqwest::Client,
    provider_url: String,
}

impl MetrixClient {
    pub fn new(provider_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            provider_url: provider_url.into(),
        }
    }
}

#[rocket::async_trait]
impl ResultsSource for MetrixClient {
    async fn fetch(&self, competition_id: &str) -> Result<Value, Error> {
        let unavailable = |reason: String| Error::SourceUnavailable {
            competition: competition_id.to_owned(),
            reason,
        };
        let response = self
            .client
            .get(&self.provider_url)
            .query(&[("content", "result"), ("id", competition_id)])
            .send()
            .await
            .map_err(|e| unavailable(e.to_string()))?;
        if !response.status().is_success() {
            return Err(unavailable(format!("HTTP {}", response.status())));
        }
        response
            .json::<Value>()
            .await
            .map_err(|e| unavailable(e.to_string()))
    }
}

/// A fetched and normalized season.
#[derive(Debug)]
pub struct LoadedSeason {
    pub competition: Competition,
    pub normalized: NormalizedCompetition,
}

#[derive(Debug, Default)]
struct LeagueState {
    loaded: HashMap<u16, Arc<LoadedSeason>>,
    memo: Memo,
}

impl LeagueState {
    /// The season currently held for `year`, in place of a `fetched` one that a
    /// later load may have replaced. The flag tells whether the result may be memoized.
    fn current(&self, year: u16, fetched: Arc<LoadedSeason>) -> (Arc<LoadedSeason>, bool) {
        match self.loaded.get(&year) {
            Some(held) => (held.clone(), true),
            None => (fetched, false),
        }
    }
}

/// Registered seasons that could be loaded, and the years that could not.
#[derive(Debug, Default)]
pub struct AvailableSeasons {
    pub seasons: Vec<Arc<LoadedSeason>>,
    pub unavailable_years: Vec<u16>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Identities {
    pub identities: Vec<PlayerIdentity>,
    pub unavailable_years: Vec<u16>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerHistory {
    pub identity: PlayerIdentity,
    pub years: Vec<YearSummary>,
    pub career: CareerSummary,
    /// Years the player appeared in that could not be loaded for this answer.
    pub unavailable_years: Vec<u16>,
}

/// Loads seasons on demand and memoizes what is computed from them.
pub struct LeagueService {
    config: LeagueConfig,
    source: Arc<dyn ResultsSource>,
    loads: HashMap<u16, SelectionTracker>,
    state: Mutex<LeagueState>,
}

impl LeagueService {
    pub fn new(config: LeagueConfig, source: Arc<dyn ResultsSource>) -> Self {
        let loads = config
            .seasons
            .iter()
            .map(|season| (season.year, SelectionTracker::new()))
            .collect();
        Self {
            config,
            source,
            loads,
            state: Mutex::new(LeagueState::default()),
        }
    }

    pub fn config(&self) -> &LeagueConfig {
        &self.config
    }

    fn season_config(&self, year: u16) -> Result<&SeasonConfig, Error> {
        self.config.season(year).ok_or(Error::UnknownSeason(year))
    }

    async fn lock(&self) -> MutexGuard<LeagueState> {
        self.state.lock().await
    }

    /// The season as last loaded, fetching it on first use.
    pub async fn season(&self, year: u16) -> Result<Arc<LoadedSeason>, Error> {
        self.season_config(year)?;
        if let Some(season) = self.lock().await.loaded.get(&year) {
            return Ok(season.clone());
        }
        self.load(year).await
    }

    /// Refetches a season and drops everything memoized for it.
    pub async fn refresh(&self, year: u16) -> Result<Arc<LoadedSeason>, Error> {
        self.season_config(year)?;
        self.load(year).await
    }

    async fn load(&self, year: u16) -> Result<Arc<LoadedSeason>, Error> {
        let season = self.season_config(year)?;
        let tracker = self.loads.get(&year).ok_or(Error::UnknownSeason(year))?;
        let ticket = tracker.begin(year);

        let time = std::time::Instant::now();
        let raw = self.source.fetch(&season.competition_id).await?;
        let normalized = normalize(&raw);
        info!(
            "Time to load season {} ({}): {:?}",
            year,
            season.competition_id,
            time.elapsed()
        );
        let loaded = Arc::new(LoadedSeason {
            competition: Competition::new(
                season.competition_id.clone(),
                year,
                season.total_rounds,
            ),
            normalized,
        });

        match tracker.accept(&ticket, loaded.clone()) {
            Some(loaded) => {
                let mut state = self.lock().await;
                state.memo.invalidate(&season.competition_id);
                state.loaded.insert(year, loaded.clone());
                Ok(loaded)
            }
            None => Ok(loaded),
        }
    }

    pub async fn standings(
        &self,
        year: u16,
        class_filter: Option<&str>,
    ) -> Result<Vec<ClassStandings>, Error> {
        let fetched = self.season(year).await?;
        let mut state = self.lock().await;
        let (season, memoizable) = state.current(year, fetched);
        let key = MemoKey::new(&season.competition.id, class_filter, Scope::Season);
        let compute = || {
            debug!("Aggregating standings for {} ({:?})", year, class_filter);
            SeasonAggregator::new(&season.normalized)
                .with_round_basis(season.competition.total_rounds_override)
                .grouped(class_filter)
        };
        if memoizable {
            Ok(state.memo.standings(key, compute).clone())
        } else {
            Ok(compute())
        }
    }

    pub async fn statistics(&self, year: u16, round: Option<usize>) -> Result<HoleStatistics, Error> {
        let fetched = self.season(year).await?;
        let mut state = self.lock().await;
        let (season, memoizable) = state.current(year, fetched);
        if let Some(round) = round.filter(|round| *round >= season.normalized.rounds.len()) {
            return Err(Error::RoundNotFound(round));
        }
        let scope = Scope::from_round(round);
        let key = MemoKey::new(&season.competition.id, None, scope);
        let compute = || hole::statistics(&season.normalized, scope);
        if memoizable {
            Ok(state.memo.statistics(key, compute).clone())
        } else {
            Ok(compute())
        }
    }

    /// Loads the given years, newest first as passed, setting aside those that fail.
    async fn load_years(&self, years: impl IntoIterator<Item = u16>) -> AvailableSeasons {
        let mut available = AvailableSeasons::default();
        for year in years {
            match self.season(year).await {
                Ok(season) => available.seasons.push(season),
                Err(e) => {
                    warn!("Season {} unavailable: {}", year, e);
                    available.unavailable_years.push(year);
                }
            }
        }
        available
    }

    /// Every registered season, newest first.
    pub async fn available_seasons(&self) -> AvailableSeasons {
        self.load_years(self.config.years()).await
    }

    /// Player identities across every available season.
    pub async fn identities(&self) -> Identities {
        let available = self.available_seasons().await;
        let observations = available
            .seasons
            .iter()
            .flat_map(|season| {
                identity::observations_from(&season.normalized, season.competition.year)
            })
            .collect::<Vec<_>>();
        Identities {
            identities: identity::resolve(observations, self.config.canonical_name),
            unavailable_years: available.unavailable_years,
        }
    }

    /// Per-year summaries for the identity that has `name` among its spellings.
    pub async fn history(&self, name: &str, year: Option<u16>) -> Result<PlayerHistory, Error> {
        let Identities {
            identities,
            mut unavailable_years,
        } = self.identities().await;
        let identity = identities
            .into_iter()
            .find(|identity| identity.has_name(name))
            .ok_or_else(|| Error::PlayerNotFound(name.to_owned()))?;

        let played = identity
            .years
            .iter()
            .rev()
            .copied()
            .filter(|played| year.map_or(true, |year| year == *played))
            .collect::<Vec<_>>();
        let available = self.load_years(played).await;
        unavailable_years.retain(|skipped| year.map_or(true, |year| year == *skipped));
        unavailable_years.extend(available.unavailable_years);
        unavailable_years.sort_unstable_by(|a, b| b.cmp(a));
        unavailable_years.dedup();

        let years = player_stats::history(
            &identity.alt_names,
            available
                .seasons
                .iter()
                .map(|season| (season.competition.year, &season.normalized)),
        );
        Ok(PlayerHistory {
            career: player_stats::career(&years),
            identity,
            years,
            unavailable_years,
        })
    }
}
