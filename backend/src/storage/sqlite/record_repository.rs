use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;
use std::marker::PhantomData;
use tracing::debug;

use super::connection::DbConnection;
use crate::domain::models::Record;
use crate::storage::traits::RecordStorage;

/// SQLite-backed [`RecordStorage`].
///
/// Every record type shares the `records` table; rows are told apart by
/// `kind` and the record body is kept as JSON without its id.
pub struct SqliteRecordRepository<T> {
    db: DbConnection,
    _record: PhantomData<fn() -> T>,
}

impl<T> Clone for SqliteRecordRepository<T> {
    fn clone(&self) -> Self {
        Self::new(self.db.clone())
    }
}

impl<T> SqliteRecordRepository<T> {
    pub fn new(db: DbConnection) -> Self {
        Self {
            db,
            _record: PhantomData,
        }
    }
}

impl<T: Record> SqliteRecordRepository<T> {
    fn encode(record: &T) -> Result<String> {
        let mut body = record.clone();
        body.set_id(None);
        serde_json::to_string(&body).with_context(|| format!("Failed to encode {} record", T::KIND))
    }

    fn decode(id: i64, payload: &str) -> Result<T> {
        let record: T = serde_json::from_str(payload)
            .with_context(|| format!("Corrupt {} record {}", T::KIND, id))?;
        Ok(record.with_id(id))
    }
}

#[async_trait]
impl<T: Record> RecordStorage<T> for SqliteRecordRepository<T> {
    async fn list(&self) -> Result<Vec<T>> {
        let rows = sqlx::query("SELECT id, payload FROM records WHERE kind = ? ORDER BY id ASC")
            .bind(T::KIND.as_str())
            .fetch_all(self.db.pool())
            .await?;

        rows.iter()
            .map(|row| Self::decode(row.get("id"), row.get("payload")))
            .collect()
    }

    async fn get(&self, id: i64) -> Result<Option<T>> {
        let row = sqlx::query("SELECT id, payload FROM records WHERE kind = ? AND id = ?")
            .bind(T::KIND.as_str())
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;

        match row {
            Some(r) => Ok(Some(Self::decode(r.get("id"), r.get("payload"))?)),
            None => Ok(None),
        }
    }

    async fn create(&self, record: &T) -> Result<T> {
        let payload = Self::encode(record)?;
        let now = Utc::now().to_rfc3339();

        let result = sqlx::query(
            r#"
            INSERT INTO records (kind, payload, created_at, updated_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(T::KIND.as_str())
        .bind(&payload)
        .bind(&now)
        .bind(&now)
        .execute(self.db.pool())
        .await?;

        let id = result.last_insert_rowid();
        debug!("Inserted {} record {}", T::KIND, id);
        Ok(record.clone().with_id(id))
    }

    async fn replace(&self, id: i64, record: &T) -> Result<Option<T>> {
        let payload = Self::encode(record)?;

        let result = sqlx::query(
            r#"
            UPDATE records
            SET payload = ?, updated_at = ?
            WHERE kind = ? AND id = ?
            "#,
        )
        .bind(&payload)
        .bind(Utc::now().to_rfc3339())
        .bind(T::KIND.as_str())
        .bind(id)
        .execute(self.db.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Ok(Some(record.clone().with_id(id)))
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM records WHERE kind = ? AND id = ?")
            .bind(T::KIND.as_str())
            .bind(id)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
