//! Registration and login handlers.
//!
//! ```text
//! POST /register {"username":"m1","password":"pw","role":"manager","team":["e1"]}
//! POST /login {"username":"m1","password":"pw"}
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::domain::ports::{RegisterUserRequest, UserProfile};
use crate::domain::{
    Error, LoginCredentials, LoginValidationError, Role, UserId, UserValidationError, Username,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Registration request body for `POST /register`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    /// Either `manager` or `employee`.
    pub role: String,
    /// Usernames of already-registered employees. Managers only.
    #[serde(default)]
    pub team: Vec<String>,
}

/// Profile payload returned by registration and `GET /users/me`.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub username: String,
    pub role: Role,
    pub team: Vec<Uuid>,
}

impl From<UserProfile> for ProfileResponse {
    fn from(profile: UserProfile) -> Self {
        Self {
            id: profile.id.into_uuid(),
            username: profile.username.into(),
            role: profile.role,
            team: profile.team.into_iter().map(UserId::into_uuid).collect(),
        }
    }
}

fn map_username_error(field: &str, err: UserValidationError) -> Error {
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field }))
}

impl TryFrom<RegisterRequest> for RegisterUserRequest {
    type Error = Error;

    fn try_from(value: RegisterRequest) -> Result<Self, Self::Error> {
        let username =
            Username::new(value.username).map_err(|err| map_username_error("username", err))?;
        let role = value
            .role
            .parse::<Role>()
            .map_err(|err| Error::invalid_request(err.to_string()).with_details(json!({
                "field": "role"
            })))?;
        let team = value
            .team
            .into_iter()
            .map(|name| Username::new(name).map_err(|err| map_username_error("team", err)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            username,
            password: Zeroizing::new(value.password),
            role,
            team,
        })
    }
}

/// Register a new user.
///
/// Managers may declare their team as a list of already-registered employee
/// usernames; employees must not declare one.
#[utoipa::path(
    post,
    path = "/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = ProfileResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Declared team member not registered", body = Error),
        (status = 409, description = "Username taken or employee already claimed", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["identity"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let request = RegisterUserRequest::try_from(payload.into_inner())?;
    let profile = state.identity.register(request).await?;
    Ok(HttpResponse::Created().json(ProfileResponse::from(profile)))
}

/// Login request body for `POST /login`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Successful login payload.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct LoginResponse {
    /// Opaque bearer token for the `Authorization` header.
    pub access_token: String,
    pub role: Role,
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::EmptyUsername => Error::invalid_request("username must not be empty")
            .with_details(json!({ "field": "username" })),
        LoginValidationError::EmptyPassword => Error::invalid_request("password must not be empty")
            .with_details(json!({ "field": "password" })),
    }
}

/// Authenticate a user and issue a bearer token.
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = LoginResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["identity"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<LoginResponse>> {
    let payload = payload.into_inner();
    let credentials = LoginCredentials::new(&payload.username, &payload.password)
        .map_err(map_login_validation_error)?;
    let grant = state.identity.login(&credentials).await?;
    Ok(web::Json(LoginResponse {
        access_token: grant.token.into(),
        role: grant.role,
    }))
}
