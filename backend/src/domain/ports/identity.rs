//! Driving port for registration, login, and token resolution.
//!
//! Inbound adapters call this port to authenticate callers without knowing
//! the backing user store or token store, which keeps handler tests
//! deterministic.

use async_trait::async_trait;
use zeroize::Zeroizing;

use crate::domain::auth::{AccessToken, AuthContext, LoginCredentials};
use crate::domain::error::Error;
use crate::domain::user::{Role, UserId, Username};

/// Validated registration payload.
///
/// `team` is only meaningful for managers and lists employee usernames in
/// declaration order.
#[derive(Debug, Clone)]
pub struct RegisterUserRequest {
    pub username: Username,
    pub password: Zeroizing<String>,
    pub role: Role,
    pub team: Vec<Username>,
}

/// Successful login result.
#[derive(Debug, Clone)]
pub struct LoginGrant {
    pub token: AccessToken,
    pub role: Role,
}

/// Caller-visible user profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub id: UserId,
    pub username: Username,
    pub role: Role,
    /// Team member ids for managers; empty for employees.
    pub team: Vec<UserId>,
}

/// Domain use-case port for identity and session concerns.
#[async_trait]
pub trait IdentityService: Send + Sync {
    /// Create a new user. For managers, binds the declared team.
    async fn register(&self, request: RegisterUserRequest) -> Result<UserProfile, Error>;

    /// Validate credentials and mint a bearer token.
    ///
    /// Unknown usernames and wrong passwords fail identically so usernames
    /// cannot be enumerated.
    async fn login(&self, credentials: &LoginCredentials) -> Result<LoginGrant, Error>;

    /// Resolve a bearer token to the caller's authorisation context.
    async fn authenticate(&self, token: &AccessToken) -> Result<AuthContext, Error>;

    /// The authenticated caller's own profile.
    async fn profile(&self, ctx: &AuthContext) -> Result<UserProfile, Error>;
}
