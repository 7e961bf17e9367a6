//! Shared helpers for HTTP handler tests.

use std::sync::Arc;

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, test as actix_test, web};
use chrono::Duration;
use mockable::DefaultClock;
use serde_json::{Value, json};

use crate::inbound::http::health::HealthState;
use crate::server;

/// Application with fresh in-memory state and all routes mounted.
pub fn test_app() -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let state = web::Data::new(server::build_state(
        Duration::hours(1),
        Arc::new(DefaultClock),
    ));
    server::build_app(state, web::Data::new(HealthState::new()))
}

/// GET request carrying a bearer token.
pub fn authed_get(uri: &str, token: &str) -> Request {
    actix_test::TestRequest::get()
        .uri(uri)
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request()
}

/// POST request with a JSON body and a bearer token.
pub fn authed_post_json(uri: &str, token: &str, body: &Value) -> Request {
    actix_test::TestRequest::post()
        .uri(uri)
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(body)
        .to_request()
}

/// Register a user (password `pw`) and log them in, returning the token.
pub async fn register_and_login<S, B>(app: &S, username: &str, role: &str, team: &[&str]) -> String
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let register = actix_test::TestRequest::post()
        .uri("/register")
        .set_json(json!({
            "username": username,
            "password": "pw",
            "role": role,
            "team": team,
        }))
        .to_request();
    let response = actix_test::call_service(app, register).await;
    assert!(
        response.status().is_success(),
        "registration of {username} failed: {}",
        response.status()
    );

    let login = actix_test::TestRequest::post()
        .uri("/login")
        .set_json(json!({ "username": username, "password": "pw" }))
        .to_request();
    let response = actix_test::call_service(app, login).await;
    assert!(
        response.status().is_success(),
        "login of {username} failed: {}",
        response.status()
    );
    let body = actix_test::read_body(response).await;
    let value: Value = serde_json::from_slice(&body).expect("login payload");
    value["access_token"]
        .as_str()
        .expect("access token present")
        .to_owned()
}
