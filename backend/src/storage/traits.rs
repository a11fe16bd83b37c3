//! # Storage Traits
//!
//! Storage abstraction traits that let the domain layer work against any
//! backend. Services hold these as `Arc<dyn ...>` so the backend is chosen
//! once at start-up (SQLite in production, in-memory for tests).

use anyhow::Result;
use async_trait::async_trait;
use shared::WorkingDayRecord;

use crate::domain::models::Record;

/// Persistence of computed working-day records.
///
/// Saves are append-only: recomputing a year creates another record and the
/// newest one wins in [`WorkingDayStorage::latest_for_year`].
#[async_trait]
pub trait WorkingDayStorage: Send + Sync {
    /// All saved records in creation order
    async fn list(&self) -> Result<Vec<WorkingDayRecord>>;

    /// Store a record verbatim and return it with its assigned id.
    /// Any id already on the record is ignored.
    async fn create(&self, record: &WorkingDayRecord) -> Result<WorkingDayRecord>;

    /// Replace an existing record.
    /// Returns `None` if no record has the given id.
    async fn update(&self, id: i64, record: &WorkingDayRecord) -> Result<Option<WorkingDayRecord>>;

    /// Most recently created record for a year
    async fn latest_for_year(&self, year: i32) -> Result<Option<WorkingDayRecord>>;
}

/// Persistence of one kind of CRUD record
#[async_trait]
pub trait RecordStorage<T: Record>: Send + Sync {
    /// All records ordered by id
    async fn list(&self) -> Result<Vec<T>>;

    /// Retrieve a record by id
    async fn get(&self, id: i64) -> Result<Option<T>>;

    /// Store a new record and return it with its assigned id
    async fn create(&self, record: &T) -> Result<T>;

    /// Overwrite an existing record.
    /// Returns `None` if no record has the given id.
    async fn replace(&self, id: i64, record: &T) -> Result<Option<T>>;

    /// Delete a record.
    /// Returns true if the record was found and deleted, false otherwise
    async fn delete(&self, id: i64) -> Result<bool>;
}
