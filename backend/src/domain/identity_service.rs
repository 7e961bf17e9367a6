//! Identity service: registration, login, and token resolution.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::auth::{AccessToken, AuthContext, LoginCredentials};
use crate::domain::error::Error;
use crate::domain::password::PasswordHash;
use crate::domain::ports::{
    IdentityService, LoginGrant, RegisterUserRequest, TokenStore, TokenStoreError, UserProfile,
    UserRepository, UserRepositoryError,
};
use crate::domain::user::{Role, User, UserId, Username};

fn map_user_repository_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::DuplicateUsername { username } => {
            Error::conflict(format!("username {username} is already registered"))
        }
        UserRepositoryError::AlreadyClaimed { username } => {
            Error::conflict(format!("employee {username} already belongs to a team"))
        }
        UserRepositoryError::Storage { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
    }
}

fn map_token_store_error(error: TokenStoreError) -> Error {
    match error {
        TokenStoreError::Storage { message } => {
            Error::internal(format!("token store error: {message}"))
        }
    }
}

/// Identity service over a user repository and a token store.
#[derive(Clone)]
pub struct IdentityServiceImpl<U, T> {
    users: Arc<U>,
    tokens: Arc<T>,
    clock: Arc<dyn Clock>,
}

impl<U, T> IdentityServiceImpl<U, T> {
    /// Create a new service with its repositories and clock.
    pub fn new(users: Arc<U>, tokens: Arc<T>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            tokens,
            clock,
        }
    }
}

impl<U, T> IdentityServiceImpl<U, T>
where
    U: UserRepository,
    T: TokenStore,
{
    /// Resolve declared team usernames to employee ids, enforcing the
    /// binding policy: members must already exist, must be employees, and
    /// must not belong to another manager's team (first writer wins).
    async fn resolve_team(&self, team: &[Username]) -> Result<Vec<UserId>, Error> {
        let mut ids = Vec::with_capacity(team.len());
        for name in team {
            let member = self
                .users
                .find_by_username(name.as_str())
                .await
                .map_err(map_user_repository_error)?
                .ok_or_else(|| Error::not_found(format!("team member {name} is not registered")))?;
            if member.role() != Role::Employee {
                return Err(Error::invalid_request(format!(
                    "team member {name} is not an employee"
                )));
            }
            let claimed = self
                .users
                .manager_of(member.id())
                .await
                .map_err(map_user_repository_error)?;
            if claimed.is_some() {
                return Err(Error::conflict(format!(
                    "employee {name} already belongs to a team"
                )));
            }
            if !ids.contains(&member.id()) {
                ids.push(member.id());
            }
        }
        Ok(ids)
    }
}

#[async_trait]
impl<U, T> IdentityService for IdentityServiceImpl<U, T>
where
    U: UserRepository,
    T: TokenStore,
{
    async fn register(&self, request: RegisterUserRequest) -> Result<UserProfile, Error> {
        if request.password.is_empty() {
            return Err(Error::invalid_request("password must not be empty"));
        }

        let team = match request.role {
            Role::Manager => self.resolve_team(&request.team).await?,
            Role::Employee => {
                if !request.team.is_empty() {
                    return Err(Error::invalid_request("only managers may declare a team"));
                }
                Vec::new()
            }
        };

        let id = UserId::random();
        let password_hash = PasswordHash::derive(&request.password);
        let created_at = self.clock.utc();
        let user = match request.role {
            Role::Manager => User::new_manager(
                id,
                request.username.clone(),
                password_hash,
                team,
                created_at,
            ),
            Role::Employee => {
                User::new_employee(id, request.username.clone(), password_hash, created_at)
            }
        };

        // Uniqueness is enforced by the repository, so a concurrent
        // registration of the same username still fails cleanly.
        self.users
            .insert(&user)
            .await
            .map_err(map_user_repository_error)?;

        info!(username = %user.username(), role = %user.role(), "user registered");
        Ok(UserProfile {
            id: user.id(),
            username: user.username().clone(),
            role: user.role(),
            team: user.team().to_vec(),
        })
    }

    async fn login(&self, credentials: &LoginCredentials) -> Result<LoginGrant, Error> {
        let user = self
            .users
            .find_by_username(credentials.username())
            .await
            .map_err(map_user_repository_error)?;

        // One failure path for both unknown users and wrong passwords.
        let user = match user {
            Some(user) if user.password_hash().verify(credentials.password()) => user,
            _ => return Err(Error::unauthorized("invalid credentials")),
        };

        let token = self
            .tokens
            .issue(user.id())
            .await
            .map_err(map_token_store_error)?;
        info!(username = %user.username(), "login succeeded");
        Ok(LoginGrant {
            token,
            role: user.role(),
        })
    }

    async fn authenticate(&self, token: &AccessToken) -> Result<AuthContext, Error> {
        let user_id = self
            .tokens
            .resolve(token)
            .await
            .map_err(map_token_store_error)?
            .ok_or_else(|| Error::unauthorized("invalid or expired token"))?;

        let user = self
            .users
            .find_by_id(user_id)
            .await
            .map_err(map_user_repository_error)?
            .ok_or_else(|| Error::unauthorized("invalid or expired token"))?;

        Ok(AuthContext::for_user(&user))
    }

    async fn profile(&self, ctx: &AuthContext) -> Result<UserProfile, Error> {
        let user = self
            .users
            .find_by_id(ctx.user_id())
            .await
            .map_err(map_user_repository_error)?
            .ok_or_else(|| Error::not_found("user not found"))?;

        Ok(UserProfile {
            id: user.id(),
            username: user.username().clone(),
            role: user.role(),
            team: user.team().to_vec(),
        })
    }
}

#[cfg(test)]
#[path = "identity_service_tests.rs"]
mod tests;
