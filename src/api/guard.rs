use log::warn;
use rocket::http::Status;
use rocket::request::{FromRequest, Outcome};
use rocket::response::Responder;
use rocket::{response, Request};
use rocket_okapi::gen::OpenApiGenerator;
use rocket_okapi::okapi::openapi3::{MediaType, Responses};
use rocket_okapi::request::{OpenApiFromRequest, RequestHeaderInput};
use rocket_okapi::response::OpenApiResponderInner;

use crate::api::League;

#[rocket::async_trait]
impl<'r> FromRequest<'r> for League {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        match request.rocket().state::<League>() {
            Some(league) => Outcome::Success(league.clone()),
            None => Outcome::Error((Status::FailedDependency, ())),
        }
    }
}

impl<'a> OpenApiFromRequest<'a> for League {
    fn from_request_input(
        _gen: &mut OpenApiGenerator,
        _name: String,
        _required: bool,
    ) -> rocket_okapi::Result<RequestHeaderInput> {
        Ok(RequestHeaderInput::None)
    }
}

#[derive(thiserror::Error, Debug, Clone)]
pub enum Error {
    #[error("Season {0} is not registered")]
    UnknownSeason(u16),
    #[error("Competition `{competition}` unavailable: {reason}")]
    SourceUnavailable { competition: String, reason: String },
    #[error("Round index {0} does not exist in this season")]
    RoundNotFound(usize),
    #[error("Player: `{0}` not found")]
    PlayerNotFound(String),
}

impl<'r, 'o: 'r> Responder<'r, 'o> for Error {
    fn respond_to(self, _req: &'r Request<'_>) -> response::Result<'o> {
        warn!("{}", self);

        use Error::*;
        match self {
            UnknownSeason(_) | RoundNotFound(_) | PlayerNotFound(_) => Err(Status::NotFound),
            SourceUnavailable { .. } => Err(Status::BadGateway),
        }
    }
}

impl OpenApiResponderInner for self::Error {
    fn responses(_gen: &mut OpenApiGenerator) -> rocket_okapi::Result<Responses> {
        use rocket_okapi::{okapi, okapi::openapi3::RefOr};

        Ok(Responses {
            responses: okapi::map! {
                "404".to_owned() => RefOr::Object(not_found()),
                "502".to_owned() => RefOr::Object(bad_gateway()),
            },
            ..Default::default()
        })
    }
}

fn not_found() -> rocket_okapi::okapi::openapi3::Response {
    use rocket_okapi::okapi;
    okapi::openapi3::Response {
        description: "\
        # 404 Not Found\n\
        The season, round or player is not known to the league. \
        "
        .to_owned(),
        content: okapi::map! {
            "application/json".to_owned() => MediaType::default()
        },
        ..Default::default()
    }
}

fn bad_gateway() -> rocket_okapi::okapi::openapi3::Response {
    use rocket_okapi::okapi;
    okapi::openapi3::Response {
        description: "\
        # 502 Bad Gateway\n\
        The results provider could not be reached or returned something unreadable. \
        "
        .to_owned(),
        content: okapi::map! {
            "application/json".to_owned() => MediaType::default()
        },
        ..Default::default()
    }
}
