//! Driven port for user persistence adapters.

use async_trait::async_trait;

use crate::domain::user::{User, UserId};

/// Persistence errors raised by user repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserRepositoryError {
    /// Another user already holds this username.
    #[error("username {username} is already registered")]
    DuplicateUsername { username: String },
    /// A declared team member already belongs to another manager's team.
    #[error("employee {username} is already on a team")]
    AlreadyClaimed { username: String },
    /// The backing store failed.
    #[error("user storage failed: {message}")]
    Storage { message: String },
}

/// Port for reading and writing user records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user. Fails with [`UserRepositoryError::DuplicateUsername`]
    /// when the username is taken and with
    /// [`UserRepositoryError::AlreadyClaimed`] when a declared team member
    /// belongs to another manager. Both checks are atomic with the write, so
    /// racing registrations cannot claim the same employee twice.
    async fn insert(&self, user: &User) -> Result<(), UserRepositoryError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserRepositoryError>;

    /// Fetch a user by exact username.
    async fn find_by_username(&self, username: &str)
    -> Result<Option<User>, UserRepositoryError>;

    /// Fetch users by id, preserving the order of `ids` and skipping ids
    /// that do not resolve.
    async fn find_many(&self, ids: &[UserId]) -> Result<Vec<User>, UserRepositoryError>;

    /// The manager whose team contains the given employee, if any.
    async fn manager_of(&self, employee_id: UserId)
    -> Result<Option<User>, UserRepositoryError>;
}
