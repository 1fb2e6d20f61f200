mod guard;
mod mutation;
mod query;

use std::sync::Arc;

use log::{error, info};
use mutation::*;
use query::*;
use rocket::fairing::AdHoc;
use rocket::{Build, Rocket};
use rocket_okapi::openapi_get_routes;
use rocket_okapi::rapidoc::{make_rapidoc, GeneralConfig, RapiDocConfig};
use rocket_okapi::settings::UrlObject;
use rocket_okapi::swagger_ui::{make_swagger_ui, SwaggerUIConfig};

use crate::config::LeagueConfig;
use crate::controller::get_data::{LeagueService, MetrixClient, ResultsSource};

pub use guard::Error;

#[derive(Clone)]
pub struct League(Arc<LeagueService>);

impl League {
    pub fn new(config: LeagueConfig, source: Arc<dyn ResultsSource>) -> Self {
        Self(Arc::new(LeagueService::new(config, source)))
    }

    fn service(&self) -> &LeagueService {
        &self.0
    }
}

fn league_from_config() -> AdHoc {
    AdHoc::try_on_ignite("League config", |rocket| async {
        let config = match rocket.figment().focus("league").extract::<LeagueConfig>() {
            Ok(config) => config,
            Err(e) => {
                error!("Invalid league configuration: {}", e);
                return Err(rocket);
            }
        };
        info!(
            "{} seasons registered, results from {}",
            config.seasons.len(),
            config.provider_url
        );
        let source = Arc::new(MetrixClient::new(config.provider_url.clone()));
        Ok(rocket.manage(League::new(config, source)))
    })
}

pub fn launch() -> Rocket<Build> {
    rocket::build()
        .attach(league_from_config())
        .mount(
            "/",
            openapi_get_routes![
                seasons,
                rounds,
                classes,
                standings,
                round_results,
                statistics,
                aces,
                players,
                player_history,
                refresh,
            ],
        )
        .mount(
            "/swagger",
            make_swagger_ui(&SwaggerUIConfig {
                url: "../openapi.json".to_owned(),
                ..Default::default()
            }),
        )
        .mount(
            "/",
            make_rapidoc(&RapiDocConfig {
                general: GeneralConfig {
                    spec_urls: vec![UrlObject::new("General", "./openapi.json")],
                    ..Default::default()
                },
                ..Default::default()
            }),
        )
}
