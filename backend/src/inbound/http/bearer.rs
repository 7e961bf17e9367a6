//! Bearer token extraction for authenticated endpoints.
//!
//! Handlers take a [`BearerToken`] argument and exchange it for an
//! [`AuthContext`](crate::domain::AuthContext) through the identity service,
//! so the framework-specific header parsing stays out of handler bodies.

use std::future::{Ready, ready};

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload};

use crate::domain::{AccessToken, Error};

const BEARER_PREFIX: &str = "Bearer ";

/// Access token extracted from the `Authorization` header.
#[derive(Debug, Clone)]
pub struct BearerToken(AccessToken);

impl BearerToken {
    /// The wrapped token.
    pub fn token(&self) -> &AccessToken {
        &self.0
    }
}

fn parse_header(req: &HttpRequest) -> Result<BearerToken, Error> {
    let raw = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized("authentication required"))?
        .to_str()
        .map_err(|_| Error::unauthorized("malformed authorization header"))?;

    let token = raw
        .strip_prefix(BEARER_PREFIX)
        .ok_or_else(|| Error::unauthorized("malformed authorization header"))?;
    AccessToken::new(token)
        .map(BearerToken)
        .map_err(|_| Error::unauthorized("malformed authorization header"))
}

impl FromRequest for BearerToken {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(parse_header(req))
    }
}
