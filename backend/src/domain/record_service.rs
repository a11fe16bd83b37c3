use serde_json::Value;
use shared::EntityKind;
use std::sync::Arc;
use tracing::{info, warn};

use super::models::{Record, ValidationError};
use crate::storage::RecordStorage;

#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("{kind} record {id} not found")]
    NotFound { kind: EntityKind, id: i64 },
    #[error("Invalid {kind} record: {source}")]
    Invalid {
        kind: EntityKind,
        #[source]
        source: ValidationError,
    },
    #[error("Invalid update for {kind} record {id}: {reason}")]
    InvalidPatch {
        kind: EntityKind,
        id: i64,
        reason: String,
    },
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// CRUD service for one record type
#[derive(Clone)]
pub struct RecordService<T: Record> {
    storage: Arc<dyn RecordStorage<T>>,
}

impl<T: Record> RecordService<T> {
    pub fn new(storage: Arc<dyn RecordStorage<T>>) -> Self {
        Self { storage }
    }

    pub fn kind(&self) -> EntityKind {
        T::KIND
    }

    /// All records ordered by id
    pub async fn list(&self) -> Result<Vec<T>, RecordError> {
        Ok(self.storage.list().await?)
    }

    pub async fn get(&self, id: i64) -> Result<Option<T>, RecordError> {
        Ok(self.storage.get(id).await?)
    }

    /// Validate and store a new record; storage assigns the id
    pub async fn create(&self, mut record: T) -> Result<T, RecordError> {
        record.set_id(None);
        record.validate().map_err(|source| RecordError::Invalid { kind: T::KIND, source })?;

        let stored = self.storage.create(&record).await?;
        info!("Created {} record {:?}", T::KIND, stored.id());
        Ok(stored)
    }

    /// Apply a partial update.
    ///
    /// `patch` must be a JSON object; its fields replace the stored ones and
    /// an `id` field is ignored. The merged record is validated before it is
    /// written back.
    pub async fn update(&self, id: i64, patch: &Value) -> Result<T, RecordError> {
        let patch_fields = patch.as_object().ok_or_else(|| RecordError::InvalidPatch {
            kind: T::KIND,
            id,
            reason: "expected a JSON object".to_string(),
        })?;

        let existing = self
            .storage
            .get(id)
            .await?
            .ok_or(RecordError::NotFound { kind: T::KIND, id })?;

        let mut merged = serde_json::to_value(&existing).map_err(anyhow::Error::from)?;
        if let Value::Object(fields) = &mut merged {
            for (key, value) in patch_fields {
                if key == "id" {
                    continue;
                }
                fields.insert(key.clone(), value.clone());
            }
        }

        let mut updated: T = serde_json::from_value(merged).map_err(|e| RecordError::InvalidPatch {
            kind: T::KIND,
            id,
            reason: e.to_string(),
        })?;
        updated.set_id(Some(id));
        updated
            .validate()
            .map_err(|source| RecordError::Invalid { kind: T::KIND, source })?;

        let stored = self
            .storage
            .replace(id, &updated)
            .await?
            .ok_or(RecordError::NotFound { kind: T::KIND, id })?;

        info!("Updated {} record {}", T::KIND, id);
        Ok(stored)
    }

    /// Returns true if the record existed
    pub async fn delete(&self, id: i64) -> Result<bool, RecordError> {
        let deleted = self.storage.delete(id).await?;
        if deleted {
            info!("Deleted {} record {}", T::KIND, id);
        } else {
            warn!("No {} record {} to delete", T::KIND, id);
        }
        Ok(deleted)
    }
}
