//! Driven port for feedback persistence adapters.
//!
//! Mutations are expressed as whole operations (`apply_edit`, `acknowledge`)
//! rather than read-modify-write sequences so adapters can serialise writes
//! to one record and keep each call all-or-nothing.

use async_trait::async_trait;

use crate::domain::feedback::{FeedbackEdit, FeedbackId, FeedbackRecord};
use crate::domain::user::UserId;

/// Persistence errors raised by feedback repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FeedbackRepositoryError {
    /// No record exists with this id.
    #[error("feedback record {id} not found")]
    NotFound { id: FeedbackId },
    /// An edit carried an expected version that no longer matches.
    #[error("stale edit for feedback record {id}: expected version {expected}, stored {actual}")]
    VersionMismatch {
        id: FeedbackId,
        expected: u64,
        actual: u64,
    },
    /// The backing store failed.
    #[error("feedback storage failed: {message}")]
    Storage { message: String },
}

/// Port for reading and writing feedback records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeedbackRepository: Send + Sync {
    /// Persist a freshly created record.
    async fn insert(&self, record: &FeedbackRecord) -> Result<(), FeedbackRepositoryError>;

    /// Fetch a record by id.
    async fn find_by_id(
        &self,
        id: FeedbackId,
    ) -> Result<Option<FeedbackRecord>, FeedbackRepositoryError>;

    /// All records whose subject is the given employee. Order unspecified;
    /// callers sort at the read boundary.
    async fn list_by_employee(
        &self,
        employee_id: UserId,
    ) -> Result<Vec<FeedbackRecord>, FeedbackRepositoryError>;

    /// Apply an edit to a record atomically and return the updated record.
    async fn apply_edit(
        &self,
        id: FeedbackId,
        edit: FeedbackEdit,
    ) -> Result<FeedbackRecord, FeedbackRepositoryError>;

    /// Mark a record acknowledged, idempotently, and return it. Safe under
    /// concurrent duplicate calls: at most one transition ever occurs.
    async fn acknowledge(
        &self,
        id: FeedbackId,
    ) -> Result<FeedbackRecord, FeedbackRepositoryError>;
}
