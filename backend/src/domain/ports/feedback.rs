//! Driving ports for feedback writes and reads.

use async_trait::async_trait;

use crate::domain::auth::AuthContext;
use crate::domain::error::Error;
use crate::domain::feedback::{FeedbackEdit, FeedbackId, FeedbackRecord, FeedbackText, Sentiment, Tags};
use crate::domain::user::{UserId, Username};

/// Validated submission payload. The subject is addressed by username, as
/// the front-end sends it.
#[derive(Debug, Clone)]
pub struct SubmitFeedbackRequest {
    pub employee_username: Username,
    pub strengths: FeedbackText,
    pub improvements: FeedbackText,
    pub sentiment: Sentiment,
    pub tags: Tags,
}

/// Domain use-case port for feedback mutations.
#[async_trait]
pub trait FeedbackCommand: Send + Sync {
    /// Create a feedback record for a member of the caller's team.
    async fn submit(
        &self,
        ctx: &AuthContext,
        request: SubmitFeedbackRequest,
    ) -> Result<FeedbackRecord, Error>;

    /// Edit a record's mutable fields. Only the original author may edit.
    async fn edit(
        &self,
        ctx: &AuthContext,
        id: FeedbackId,
        edit: FeedbackEdit,
    ) -> Result<FeedbackRecord, Error>;

    /// Acknowledge a record as its subject. Idempotent: repeated calls
    /// succeed and return the unchanged record.
    async fn acknowledge(
        &self,
        ctx: &AuthContext,
        id: FeedbackId,
    ) -> Result<FeedbackRecord, Error>;
}

/// Domain use-case port for feedback reads.
#[async_trait]
pub trait FeedbackQuery: Send + Sync {
    /// Feedback for one employee, newest first. Managers may list their own
    /// team members; employees only themselves.
    async fn list_for_employee(
        &self,
        ctx: &AuthContext,
        employee_id: UserId,
    ) -> Result<Vec<FeedbackRecord>, Error>;
}
