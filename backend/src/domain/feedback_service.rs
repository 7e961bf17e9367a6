//! Feedback lifecycle service: submission, reads, edits, acknowledgement.
//!
//! All team-visibility and authorship rules live here; the HTTP adapter only
//! maps payloads, and the repository only stores records.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::auth::AuthContext;
use crate::domain::error::Error;
use crate::domain::feedback::{
    FeedbackDraft, FeedbackEdit, FeedbackId, FeedbackRecord, sort_newest_first,
};
use crate::domain::ports::{
    FeedbackCommand, FeedbackQuery, FeedbackRepository, FeedbackRepositoryError,
    SubmitFeedbackRequest, UserRepository, UserRepositoryError,
};
use crate::domain::user::{Role, UserId};

pub(crate) fn map_user_repository_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::DuplicateUsername { username }
        | UserRepositoryError::AlreadyClaimed { username } => Error::internal(format!(
            "unexpected write conflict for {username} during feedback access"
        )),
        UserRepositoryError::Storage { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
    }
}

pub(crate) fn map_feedback_repository_error(error: FeedbackRepositoryError) -> Error {
    match error {
        FeedbackRepositoryError::NotFound { id } => {
            Error::not_found(format!("feedback record {id} not found"))
        }
        FeedbackRepositoryError::VersionMismatch {
            expected, actual, ..
        } => Error::conflict(format!(
            "stale edit: expected version {expected}, record is at {actual}"
        )),
        FeedbackRepositoryError::Storage { message } => {
            Error::internal(format!("feedback repository error: {message}"))
        }
    }
}

/// Feedback service over the user and feedback repositories.
#[derive(Clone)]
pub struct FeedbackService<U, F> {
    users: Arc<U>,
    feedback: Arc<F>,
    clock: Arc<dyn Clock>,
}

impl<U, F> FeedbackService<U, F> {
    /// Create a new service with its repositories and clock.
    pub fn new(users: Arc<U>, feedback: Arc<F>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            feedback,
            clock,
        }
    }
}

impl<U, F> FeedbackService<U, F>
where
    U: UserRepository,
    F: FeedbackRepository,
{
    async fn load_record(&self, id: FeedbackId) -> Result<FeedbackRecord, Error> {
        self.feedback
            .find_by_id(id)
            .await
            .map_err(map_feedback_repository_error)?
            .ok_or_else(|| Error::not_found(format!("feedback record {id} not found")))
    }

    /// Check that the caller manages the given employee. The uniform
    /// `Forbidden` response covers unknown employees too, so callers cannot
    /// probe for usernames.
    async fn require_team_member(
        &self,
        manager_id: UserId,
        employee_id: UserId,
    ) -> Result<(), Error> {
        let manager = self
            .users
            .find_by_id(manager_id)
            .await
            .map_err(map_user_repository_error)?
            .ok_or_else(|| Error::not_found("manager not found"))?;
        if manager.has_team_member(employee_id) {
            Ok(())
        } else {
            Err(Error::forbidden("employee is not on your team"))
        }
    }
}

#[async_trait]
impl<U, F> FeedbackCommand for FeedbackService<U, F>
where
    U: UserRepository,
    F: FeedbackRepository,
{
    async fn submit(
        &self,
        ctx: &AuthContext,
        request: SubmitFeedbackRequest,
    ) -> Result<FeedbackRecord, Error> {
        let author = ctx.require_manager()?;

        let employee = self
            .users
            .find_by_username(request.employee_username.as_str())
            .await
            .map_err(map_user_repository_error)?
            .filter(|user| user.role() == Role::Employee)
            .ok_or_else(|| Error::forbidden("employee is not on your team"))?;
        self.require_team_member(author.id, employee.id()).await?;

        let record = FeedbackRecord::new(FeedbackDraft {
            id: FeedbackId::random(),
            manager_id: author.id,
            employee_id: employee.id(),
            strengths: request.strengths,
            improvements: request.improvements,
            sentiment: request.sentiment,
            tags: request.tags,
            created_at: self.clock.utc(),
        });
        self.feedback
            .insert(&record)
            .await
            .map_err(map_feedback_repository_error)?;

        info!(
            feedback_id = %record.id(),
            employee = %request.employee_username,
            sentiment = %record.sentiment(),
            "feedback submitted"
        );
        Ok(record)
    }

    async fn edit(
        &self,
        ctx: &AuthContext,
        id: FeedbackId,
        edit: FeedbackEdit,
    ) -> Result<FeedbackRecord, Error> {
        let author = ctx.require_manager()?;
        if edit.is_empty() {
            return Err(Error::invalid_request(
                "at least one editable field must be supplied",
            ));
        }

        let existing = self.load_record(id).await?;
        if existing.manager_id() != author.id {
            return Err(Error::forbidden(
                "only the original author may edit feedback",
            ));
        }

        let updated = self
            .feedback
            .apply_edit(id, edit)
            .await
            .map_err(map_feedback_repository_error)?;
        info!(feedback_id = %id, version = updated.version(), "feedback edited");
        Ok(updated)
    }

    async fn acknowledge(
        &self,
        ctx: &AuthContext,
        id: FeedbackId,
    ) -> Result<FeedbackRecord, Error> {
        let subject = ctx.require_employee()?;

        let existing = self.load_record(id).await?;
        if existing.employee_id() != subject.id {
            return Err(Error::forbidden(
                "only the feedback subject may acknowledge it",
            ));
        }

        // Idempotent by contract: a retry returns the record unchanged.
        let updated = self
            .feedback
            .acknowledge(id)
            .await
            .map_err(map_feedback_repository_error)?;
        info!(feedback_id = %id, "feedback acknowledged");
        Ok(updated)
    }
}

#[async_trait]
impl<U, F> FeedbackQuery for FeedbackService<U, F>
where
    U: UserRepository,
    F: FeedbackRepository,
{
    async fn list_for_employee(
        &self,
        ctx: &AuthContext,
        employee_id: UserId,
    ) -> Result<Vec<FeedbackRecord>, Error> {
        match ctx {
            AuthContext::Employee(identity) => {
                if identity.id != employee_id {
                    return Err(Error::forbidden(
                        "employees may only view their own feedback",
                    ));
                }
            }
            AuthContext::Manager(identity) => {
                self.require_team_member(identity.id, employee_id).await?;
            }
        }

        let mut records = self
            .feedback
            .list_by_employee(employee_id)
            .await
            .map_err(map_feedback_repository_error)?;
        sort_newest_first(&mut records);
        Ok(records)
    }
}

#[cfg(test)]
#[path = "feedback_service_tests.rs"]
mod tests;
