//! Driving port for team roster reads.

use async_trait::async_trait;

use crate::domain::auth::AuthContext;
use crate::domain::error::Error;
use crate::domain::user::{UserId, Username};

/// Roster entry for one team member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamMember {
    pub id: UserId,
    pub username: Username,
}

/// Domain use-case port for team membership.
///
/// Membership is read-only here; it is assigned at registration time only.
#[async_trait]
pub trait TeamQuery: Send + Sync {
    /// The caller's team in declaration order. Fails `Forbidden` for
    /// non-manager callers.
    async fn team_roster(&self, ctx: &AuthContext) -> Result<Vec<TeamMember>, Error>;
}
