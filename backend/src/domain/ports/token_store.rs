//! Driven port for bearer-token storage adapters.

use async_trait::async_trait;

use crate::domain::auth::AccessToken;
use crate::domain::user::UserId;

/// Errors raised by token store adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenStoreError {
    /// The backing store failed.
    #[error("token storage failed: {message}")]
    Storage { message: String },
}

/// Port for issuing and resolving opaque bearer tokens.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Mint a fresh token bound to the user, valid for the store's TTL.
    async fn issue(&self, user_id: UserId) -> Result<AccessToken, TokenStoreError>;

    /// Resolve a token to its user id. Unknown, malformed, and expired
    /// tokens all resolve to `None`; the distinction is not observable.
    async fn resolve(&self, token: &AccessToken) -> Result<Option<UserId>, TokenStoreError>;
}
