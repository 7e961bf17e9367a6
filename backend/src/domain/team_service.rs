//! Team membership query service.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::auth::AuthContext;
use crate::domain::error::Error;
use crate::domain::ports::{TeamMember, TeamQuery, UserRepository, UserRepositoryError};

fn map_user_repository_error(error: UserRepositoryError) -> Error {
    match error {
        // Roster reads never insert, so write conflicts here are storage
        // faults.
        UserRepositoryError::DuplicateUsername { username }
        | UserRepositoryError::AlreadyClaimed { username } => Error::internal(format!(
            "unexpected write conflict for {username} during roster read"
        )),
        UserRepositoryError::Storage { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
    }
}

/// Team roster reads over the user repository.
#[derive(Clone)]
pub struct TeamQueryService<U> {
    users: Arc<U>,
}

impl<U> TeamQueryService<U> {
    /// Create a new query service with the user repository.
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl<U> TeamQuery for TeamQueryService<U>
where
    U: UserRepository,
{
    async fn team_roster(&self, ctx: &AuthContext) -> Result<Vec<TeamMember>, Error> {
        let caller = ctx.require_manager()?;

        let manager = self
            .users
            .find_by_id(caller.id)
            .await
            .map_err(map_user_repository_error)?
            .ok_or_else(|| Error::not_found("manager not found"))?;

        // Ids that no longer resolve are skipped rather than failing the
        // whole roster.
        let members = self
            .users
            .find_many(manager.team())
            .await
            .map_err(map_user_repository_error)?;

        Ok(members
            .into_iter()
            .map(|member| TeamMember {
                id: member.id(),
                username: member.username().clone(),
            })
            .collect())
    }
}
