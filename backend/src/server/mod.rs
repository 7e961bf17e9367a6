//! Server construction and wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use chrono::Duration;
use mockable::{Clock, DefaultClock};
#[cfg(debug_assertions)]
use utoipa::OpenApi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::domain::{
    DashboardQueryService, FeedbackService, IdentityServiceImpl, TeamQueryService,
};
use crate::inbound::http::dashboard::{employee_dashboard, manager_dashboard};
use crate::inbound::http::feedback::{
    acknowledge_feedback, edit_feedback, list_feedback, submit_feedback,
};
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::identity::{login, register};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::{current_user, team_roster};
use crate::outbound::persistence::{
    MemoryFeedbackRepository, MemoryTokenStore, MemoryUserRepository,
};

/// Wire the in-memory adapters and domain services into handler state.
pub fn build_state(token_ttl: Duration, clock: Arc<dyn Clock>) -> HttpState {
    let users = Arc::new(MemoryUserRepository::new());
    let feedback_store = Arc::new(MemoryFeedbackRepository::new());
    let tokens = Arc::new(MemoryTokenStore::new(token_ttl, clock.clone()));

    let identity = Arc::new(IdentityServiceImpl::new(
        users.clone(),
        tokens,
        clock.clone(),
    ));
    let team = Arc::new(TeamQueryService::new(users.clone()));
    let feedback = Arc::new(FeedbackService::new(
        users.clone(),
        feedback_store.clone(),
        clock,
    ));
    let dashboard = Arc::new(DashboardQueryService::new(users, feedback_store));

    HttpState {
        identity,
        team,
        feedback: feedback.clone(),
        feedback_query: feedback,
        dashboard,
    }
}

/// Assemble the application with all routes and shared state.
pub fn build_app(
    http_state: web::Data<HttpState>,
    health_state: web::Data<HealthState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new()
        .app_data(http_state)
        .app_data(health_state)
        .service(register)
        .service(login)
        .service(current_user)
        .service(team_roster)
        .service(submit_feedback)
        .service(list_feedback)
        .service(edit_feedback)
        .service(acknowledge_feedback)
        .service(manager_dashboard)
        .service(employee_dashboard)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.route(
        "/api-docs/openapi.json",
        web::get().to(|| async { web::Json(ApiDoc::openapi()) }),
    );
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Construct an Actix HTTP server from the configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = web::Data::new(build_state(config.token_ttl, Arc::new(DefaultClock)));

    let server = HttpServer::new(move || {
        build_app(http_state.clone(), server_health_state.clone())
    })
    .bind(config.bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
