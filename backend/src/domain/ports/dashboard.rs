//! Driving port for dashboard projections.

use async_trait::async_trait;

use crate::domain::auth::AuthContext;
use crate::domain::error::Error;
use crate::domain::feedback::FeedbackRecord;
use crate::domain::summary::FeedbackSummary;
use crate::domain::user::{UserId, Username};

/// Feedback volume for one team member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberFeedbackCount {
    pub id: UserId,
    pub username: Username,
    pub count: usize,
}

/// Derived view over a manager's team feedback. Recomputed on demand,
/// never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManagerDashboard {
    /// Feedback record count per team member, in team declaration order.
    pub feedback_count: Vec<MemberFeedbackCount>,
    /// Sentiment buckets over all of the team's feedback.
    pub summary: FeedbackSummary,
}

/// Domain use-case port for dashboards.
#[async_trait]
pub trait DashboardQuery: Send + Sync {
    /// Aggregate view over the caller's team. Manager only.
    async fn manager_dashboard(&self, ctx: &AuthContext) -> Result<ManagerDashboard, Error>;

    /// The caller's own feedback timeline, newest first. Employee only.
    async fn employee_timeline(&self, ctx: &AuthContext)
    -> Result<Vec<FeedbackRecord>, Error>;
}
