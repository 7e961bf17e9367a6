//! Authenticated user and team handlers.
//!
//! ```text
//! GET /users/me
//! GET /team
//! ```

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::ports::TeamMember;
use crate::inbound::http::ApiResult;
use crate::inbound::http::bearer::BearerToken;
use crate::inbound::http::identity::ProfileResponse;
use crate::inbound::http::state::HttpState;

/// The caller's own profile.
#[utoipa::path(
    get,
    path = "/users/me",
    responses(
        (status = 200, description = "Caller profile", body = ProfileResponse),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 500, description = "Internal server error", body = crate::domain::Error)
    ),
    tags = ["users"],
    operation_id = "currentUser"
)]
#[get("/users/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    bearer: BearerToken,
) -> ApiResult<web::Json<ProfileResponse>> {
    let ctx = state.authenticate(&bearer).await?;
    let profile = state.identity.profile(&ctx).await?;
    Ok(web::Json(ProfileResponse::from(profile)))
}

/// Roster entry for one team member.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct TeamMemberDto {
    pub id: Uuid,
    pub username: String,
}

impl From<TeamMember> for TeamMemberDto {
    fn from(member: TeamMember) -> Self {
        Self {
            id: member.id.into_uuid(),
            username: member.username.into(),
        }
    }
}

/// Team roster payload for `GET /team`.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct TeamResponse {
    pub team: Vec<TeamMemberDto>,
}

/// The caller's team roster, in declaration order. Managers only.
#[utoipa::path(
    get,
    path = "/team",
    responses(
        (status = 200, description = "Team roster", body = TeamResponse),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 403, description = "Caller is not a manager", body = crate::domain::Error),
        (status = 500, description = "Internal server error", body = crate::domain::Error)
    ),
    tags = ["users"],
    operation_id = "teamRoster"
)]
#[get("/team")]
pub async fn team_roster(
    state: web::Data<HttpState>,
    bearer: BearerToken,
) -> ApiResult<web::Json<TeamResponse>> {
    let ctx = state.authenticate(&bearer).await?;
    let roster = state.team.team_roster(&ctx).await?;
    Ok(web::Json(TeamResponse {
        team: roster.into_iter().map(TeamMemberDto::from).collect(),
    }))
}
