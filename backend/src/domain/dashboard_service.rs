//! Dashboard projections derived from the feedback store on demand.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::auth::AuthContext;
use crate::domain::error::Error;
use crate::domain::feedback::{FeedbackRecord, sort_newest_first};
use crate::domain::feedback_service::{map_feedback_repository_error, map_user_repository_error};
use crate::domain::ports::{
    DashboardQuery, FeedbackRepository, ManagerDashboard, MemberFeedbackCount, UserRepository,
};
use crate::domain::summary::summarize;

/// Read-only dashboard queries over the user and feedback repositories.
#[derive(Clone)]
pub struct DashboardQueryService<U, F> {
    users: Arc<U>,
    feedback: Arc<F>,
}

impl<U, F> DashboardQueryService<U, F> {
    /// Create a new query service with its repositories.
    pub fn new(users: Arc<U>, feedback: Arc<F>) -> Self {
        Self { users, feedback }
    }
}

#[async_trait]
impl<U, F> DashboardQuery for DashboardQueryService<U, F>
where
    U: UserRepository,
    F: FeedbackRepository,
{
    async fn manager_dashboard(&self, ctx: &AuthContext) -> Result<ManagerDashboard, Error> {
        let caller = ctx.require_manager()?;

        let manager = self
            .users
            .find_by_id(caller.id)
            .await
            .map_err(map_user_repository_error)?
            .ok_or_else(|| Error::not_found("manager not found"))?;
        let members = self
            .users
            .find_many(manager.team())
            .await
            .map_err(map_user_repository_error)?;

        let mut feedback_count = Vec::with_capacity(members.len());
        let mut all_records = Vec::new();
        for member in members {
            let records = self
                .feedback
                .list_by_employee(member.id())
                .await
                .map_err(map_feedback_repository_error)?;
            feedback_count.push(MemberFeedbackCount {
                id: member.id(),
                username: member.username().clone(),
                count: records.len(),
            });
            all_records.extend(records);
        }

        Ok(ManagerDashboard {
            feedback_count,
            summary: summarize(&all_records),
        })
    }

    async fn employee_timeline(&self, ctx: &AuthContext) -> Result<Vec<FeedbackRecord>, Error> {
        let caller = ctx.require_employee()?;

        let mut records = self
            .feedback
            .list_by_employee(caller.id)
            .await
            .map_err(map_feedback_repository_error)?;
        sort_newest_first(&mut records);
        Ok(records)
    }
}
