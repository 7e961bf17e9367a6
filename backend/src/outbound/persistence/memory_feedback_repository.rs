//! In-memory feedback repository.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use crate::domain::ports::{FeedbackRepository, FeedbackRepositoryError};
use crate::domain::{FeedbackEdit, FeedbackId, FeedbackMutationError, FeedbackRecord, UserId};

/// Process-local feedback store keyed by record id.
#[derive(Default)]
pub struct MemoryFeedbackRepository {
    records: RwLock<HashMap<FeedbackId, FeedbackRecord>>,
}

impl MemoryFeedbackRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(
        &self,
    ) -> Result<RwLockReadGuard<'_, HashMap<FeedbackId, FeedbackRecord>>, FeedbackRepositoryError>
    {
        self.records
            .read()
            .map_err(|_| FeedbackRepositoryError::Storage {
                message: "feedback store lock poisoned".to_owned(),
            })
    }

    fn write(
        &self,
    ) -> Result<RwLockWriteGuard<'_, HashMap<FeedbackId, FeedbackRecord>>, FeedbackRepositoryError>
    {
        self.records
            .write()
            .map_err(|_| FeedbackRepositoryError::Storage {
                message: "feedback store lock poisoned".to_owned(),
            })
    }
}

#[async_trait]
impl FeedbackRepository for MemoryFeedbackRepository {
    async fn insert(&self, record: &FeedbackRecord) -> Result<(), FeedbackRepositoryError> {
        self.write()?.insert(record.id(), record.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: FeedbackId,
    ) -> Result<Option<FeedbackRecord>, FeedbackRepositoryError> {
        Ok(self.read()?.get(&id).cloned())
    }

    async fn list_by_employee(
        &self,
        employee_id: UserId,
    ) -> Result<Vec<FeedbackRecord>, FeedbackRepositoryError> {
        Ok(self
            .read()?
            .values()
            .filter(|record| record.employee_id() == employee_id)
            .cloned()
            .collect())
    }

    async fn apply_edit(
        &self,
        id: FeedbackId,
        edit: FeedbackEdit,
    ) -> Result<FeedbackRecord, FeedbackRepositoryError> {
        // Lookup and mutation under one write guard so concurrent edits of
        // the same record never interleave.
        let mut records = self.write()?;
        let record = records
            .get_mut(&id)
            .ok_or(FeedbackRepositoryError::NotFound { id })?;
        record.apply(edit).map_err(|err| match err {
            FeedbackMutationError::VersionMismatch { expected, actual } => {
                FeedbackRepositoryError::VersionMismatch {
                    id,
                    expected,
                    actual,
                }
            }
        })?;
        Ok(record.clone())
    }

    async fn acknowledge(
        &self,
        id: FeedbackId,
    ) -> Result<FeedbackRecord, FeedbackRepositoryError> {
        let mut records = self.write()?;
        let record = records
            .get_mut(&id)
            .ok_or(FeedbackRepositoryError::NotFound { id })?;
        record.acknowledge();
        Ok(record.clone())
    }
}
