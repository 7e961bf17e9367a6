//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct which generates the OpenAPI specification
//! for the REST API: all HTTP endpoints from the inbound layer, the request
//! and response schemas, and the bearer token security scheme. The generated
//! document is served at `/api-docs/openapi.json` in debug builds.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode, Role, Sentiment};
use crate::inbound::http::dashboard::{
    EmployeeDashboardResponse, ManagerDashboardResponse, SentimentTrends,
};
use crate::inbound::http::feedback::{EditRequest, FeedbackDto, FeedbackListResponse, SubmitRequest};
use crate::inbound::http::identity::{LoginRequest, LoginResponse, ProfileResponse, RegisterRequest};
use crate::inbound::http::users::{TeamMemberDto, TeamResponse};

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .description(Some("Opaque token issued by POST /login."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Feedback portal API",
        description = "HTTP interface for identity, team membership, feedback storage, and dashboards."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::identity::register,
        crate::inbound::http::identity::login,
        crate::inbound::http::users::current_user,
        crate::inbound::http::users::team_roster,
        crate::inbound::http::feedback::submit_feedback,
        crate::inbound::http::feedback::list_feedback,
        crate::inbound::http::feedback::edit_feedback,
        crate::inbound::http::feedback::acknowledge_feedback,
        crate::inbound::http::dashboard::manager_dashboard,
        crate::inbound::http::dashboard::employee_dashboard,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        Role,
        Sentiment,
        RegisterRequest,
        ProfileResponse,
        LoginRequest,
        LoginResponse,
        TeamMemberDto,
        TeamResponse,
        SubmitRequest,
        FeedbackDto,
        FeedbackListResponse,
        EditRequest,
        SentimentTrends,
        ManagerDashboardResponse,
        EmployeeDashboardResponse,
    )),
    tags(
        (name = "identity", description = "Registration and login"),
        (name = "users", description = "Profiles and team membership"),
        (name = "feedback", description = "Feedback lifecycle"),
        (name = "dashboard", description = "Derived team and personal views"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
