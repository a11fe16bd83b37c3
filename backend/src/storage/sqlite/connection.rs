use anyhow::{Context, Result};
use sqlx::{migrate::MigrateDatabase, Sqlite, SqlitePool};
use std::sync::Arc;
use tracing::info;

/// The database URL used when nothing is configured
pub const DEFAULT_DATABASE_URL: &str = "sqlite:budget_planner.db";

/// DbConnection owns the SQLite pool and the schema
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Create a new database connection
    pub async fn new(url: &str) -> Result<Self> {
        // Create database if it doesn't exist
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            info!("Creating database at {}", url);
            Sqlite::create_database(url)
                .await
                .with_context(|| format!("Failed to create database {}", url))?;
        }

        let pool = SqlitePool::connect(url)
            .await
            .with_context(|| format!("Failed to connect to {}", url))?;

        Self::setup_schema(&pool).await?;

        Ok(Self { pool: Arc::new(pool) })
    }

    /// Initialize a private in-memory database with a unique name
    pub async fn init_in_memory() -> Result<Self> {
        let db_id = uuid::Uuid::new_v4().to_string();
        let db_url = format!("file:memdb_{}?mode=memory&cache=shared", db_id);

        Self::new(&db_url).await
    }

    /// Set up the required database schema
    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS working_day_records (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                year INTEGER NOT NULL,
                total_days INTEGER NOT NULL,
                weekend_days INTEGER NOT NULL,
                holidays INTEGER NOT NULL,
                additional_holidays INTEGER NOT NULL,
                working_days INTEGER NOT NULL,
                created_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        // Index for find-by-year lookups
        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_working_day_records_year
            ON working_day_records(year, id DESC);
            "#,
        )
        .execute(pool)
        .await?;

        // CRUD entities are stored as JSON payloads, one row per record
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS records (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                kind TEXT NOT NULL,
                payload TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_records_kind
            ON records(kind, id);
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Get the underlying SQLite pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::Row;

    #[tokio::test]
    async fn test_schema_is_created() {
        let db = DbConnection::init_in_memory().await.expect("Failed to create test database");

        let rows = sqlx::query("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .fetch_all(db.pool())
            .await
            .unwrap();
        let tables: Vec<String> = rows.iter().map(|row| row.get("name")).collect();

        assert!(tables.contains(&"working_day_records".to_string()));
        assert!(tables.contains(&"records".to_string()));
    }

    #[tokio::test]
    async fn test_in_memory_databases_are_isolated() {
        let a = DbConnection::init_in_memory().await.unwrap();
        let b = DbConnection::init_in_memory().await.unwrap();

        sqlx::query(
            "INSERT INTO records (kind, payload, created_at, updated_at) \
             VALUES ('employees', '{}', 'x', 'x')",
        )
        .execute(a.pool())
        .await
        .unwrap();

        let count: i64 = sqlx::query("SELECT COUNT(*) AS n FROM records")
            .fetch_one(b.pool())
            .await
            .unwrap()
            .get("n");
        assert_eq!(count, 0);
    }
}
