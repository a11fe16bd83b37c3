use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use shared::WorkingDayRecord;
use sqlx::{sqlite::SqliteRow, Row};
use tracing::debug;

use super::connection::DbConnection;
use crate::storage::traits::WorkingDayStorage;

/// SQLite-backed [`WorkingDayStorage`]
#[derive(Clone)]
pub struct SqliteWorkingDayRepository {
    db: DbConnection,
}

impl SqliteWorkingDayRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn from_row(row: &SqliteRow) -> WorkingDayRecord {
        WorkingDayRecord {
            id: Some(row.get("id")),
            year: row.get("year"),
            total_days: row.get("total_days"),
            weekend_days: row.get("weekend_days"),
            holidays: row.get("holidays"),
            additional_holidays: row.get("additional_holidays"),
            working_days: row.get("working_days"),
        }
    }
}

#[async_trait]
impl WorkingDayStorage for SqliteWorkingDayRepository {
    async fn list(&self) -> Result<Vec<WorkingDayRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT id, year, total_days, weekend_days, holidays, additional_holidays, working_days
            FROM working_day_records
            ORDER BY id ASC
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.iter().map(Self::from_row).collect())
    }

    async fn create(&self, record: &WorkingDayRecord) -> Result<WorkingDayRecord> {
        let result = sqlx::query(
            r#"
            INSERT INTO working_day_records
                (year, total_days, weekend_days, holidays, additional_holidays, working_days, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(record.year)
        .bind(record.total_days)
        .bind(record.weekend_days)
        .bind(record.holidays)
        .bind(record.additional_holidays)
        .bind(record.working_days)
        .bind(Utc::now().to_rfc3339())
        .execute(self.db.pool())
        .await?;

        let id = result.last_insert_rowid();
        debug!("Inserted working-day record {} for year {}", id, record.year);

        Ok(WorkingDayRecord {
            id: Some(id),
            ..record.clone()
        })
    }

    async fn update(&self, id: i64, record: &WorkingDayRecord) -> Result<Option<WorkingDayRecord>> {
        let result = sqlx::query(
            r#"
            UPDATE working_day_records
            SET year = ?, total_days = ?, weekend_days = ?, holidays = ?,
                additional_holidays = ?, working_days = ?
            WHERE id = ?
            "#,
        )
        .bind(record.year)
        .bind(record.total_days)
        .bind(record.weekend_days)
        .bind(record.holidays)
        .bind(record.additional_holidays)
        .bind(record.working_days)
        .bind(id)
        .execute(self.db.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        Ok(Some(WorkingDayRecord {
            id: Some(id),
            ..record.clone()
        }))
    }

    async fn latest_for_year(&self, year: i32) -> Result<Option<WorkingDayRecord>> {
        let row = sqlx::query(
            r#"
            SELECT id, year, total_days, weekend_days, holidays, additional_holidays, working_days
            FROM working_day_records
            WHERE year = ?
            ORDER BY id DESC
            LIMIT 1
            "#,
        )
        .bind(year)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.as_ref().map(Self::from_row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup_test() -> SqliteWorkingDayRepository {
        let db = DbConnection::init_in_memory().await.expect("Failed to create test database");
        SqliteWorkingDayRepository::new(db)
    }

    fn record(year: i32, additional: i32) -> WorkingDayRecord {
        WorkingDayRecord {
            id: None,
            year,
            total_days: 365,
            weekend_days: 104,
            holidays: 18,
            additional_holidays: additional,
            working_days: 243 - additional,
        }
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_keeps_fields() {
        let repo = setup_test().await;

        let stored = repo.create(&record(2568, 2)).await.expect("Failed to create");
        assert!(stored.id.is_some());
        assert_eq!(stored.working_days, 241);

        let listed = repo.list().await.unwrap();
        assert_eq!(listed, vec![stored]);
    }

    #[tokio::test]
    async fn test_duplicate_years_accumulate() {
        let repo = setup_test().await;

        repo.create(&record(2568, 0)).await.unwrap();
        let newer = repo.create(&record(2568, 4)).await.unwrap();

        assert_eq!(repo.list().await.unwrap().len(), 2);
        assert_eq!(repo.latest_for_year(2568).await.unwrap(), Some(newer));
    }

    #[tokio::test]
    async fn test_latest_for_missing_year() {
        let repo = setup_test().await;
        repo.create(&record(2568, 0)).await.unwrap();
        assert_eq!(repo.latest_for_year(2570).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_update() {
        let repo = setup_test().await;
        let stored = repo.create(&record(2568, 0)).await.unwrap();
        let id = stored.id.unwrap();

        let updated = repo.update(id, &record(2568, 1)).await.unwrap().unwrap();
        assert_eq!(updated.id, Some(id));
        assert_eq!(repo.latest_for_year(2568).await.unwrap(), Some(updated));

        assert_eq!(repo.update(id + 100, &record(2568, 1)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_negative_working_days_round_trip() {
        let repo = setup_test().await;
        let stored = repo.create(&record(2568, 500)).await.unwrap();
        assert_eq!(stored.working_days, -257);
        assert_eq!(repo.list().await.unwrap()[0].working_days, -257);
    }
}
