use serde::{Deserialize, Serialize};

use crate::controller::identity::CanonicalNamePolicy;

pub const DEFAULT_PROVIDER_URL: &str = "https://discgolfmetrix.com/api.php";

/// One registered season of the league.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonConfig {
    pub year: u16,
    pub competition_id: String,
    /// Counting basis override, otherwise the completed round count is used.
    #[serde(default)]
    pub total_rounds: Option<usize>,
}

impl SeasonConfig {
    pub fn new(year: u16, competition_id: &str) -> Self {
        Self {
            year,
            competition_id: competition_id.to_owned(),
            total_rounds: None,
        }
    }
}

/// Read from the `league` table of Rocket's figment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeagueConfig {
    pub provider_url: String,
    pub canonical_name: CanonicalNamePolicy,
    pub seasons: Vec<SeasonConfig>,
}

impl Default for LeagueConfig {
    fn default() -> Self {
        Self {
            provider_url: DEFAULT_PROVIDER_URL.to_owned(),
            canonical_name: CanonicalNamePolicy::default(),
            seasons: default_registry(),
        }
    }
}

impl LeagueConfig {
    pub fn season(&self, year: u16) -> Option<&SeasonConfig> {
        self.seasons.iter().find(|season| season.year == year)
    }

    /// Registered years, newest first.
    pub fn years(&self) -> Vec<u16> {
        let mut years = self.seasons.iter().map(|season| season.year).collect::<Vec<_>>();
        years.sort_unstable_by(|a, b| b.cmp(a));
        years.dedup();
        years
    }
}

pub fn default_registry() -> Vec<SeasonConfig> {
    vec![
        SeasonConfig::new(2020, "1222406"),
        SeasonConfig::new(2021, "1660549"),
        SeasonConfig::new(2022, "2079115"),
        SeasonConfig::new(2023, "2503707"),
        SeasonConfig::new(2024, "2886967"),
        SeasonConfig::new(2025, "3268191"),
    ]
}
