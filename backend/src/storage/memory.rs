//! # In-Memory Storage
//!
//! Repository implementations that keep everything in process memory. Each
//! repository owns its rows and its id counter, so two repositories never
//! share state. Used by tests and by `BUDGET_DATABASE_URL=memory`.

use anyhow::Result;
use async_trait::async_trait;
use shared::WorkingDayRecord;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

use super::traits::{RecordStorage, WorkingDayStorage};
use crate::domain::models::Record;

/// Rows keyed by id plus the next id to hand out
#[derive(Debug)]
struct MemoryTable<T> {
    next_id: i64,
    rows: BTreeMap<i64, T>,
}

impl<T> Default for MemoryTable<T> {
    fn default() -> Self {
        Self {
            next_id: 1,
            rows: BTreeMap::new(),
        }
    }
}

impl<T> MemoryTable<T> {
    fn allocate_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

/// In-memory [`WorkingDayStorage`]
#[derive(Clone, Default)]
pub struct MemoryWorkingDayRepository {
    table: Arc<Mutex<MemoryTable<WorkingDayRecord>>>,
}

impl MemoryWorkingDayRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WorkingDayStorage for MemoryWorkingDayRepository {
    async fn list(&self) -> Result<Vec<WorkingDayRecord>> {
        let table = self.table.lock().await;
        Ok(table.rows.values().cloned().collect())
    }

    async fn create(&self, record: &WorkingDayRecord) -> Result<WorkingDayRecord> {
        let mut table = self.table.lock().await;
        let id = table.allocate_id();
        let stored = WorkingDayRecord {
            id: Some(id),
            ..record.clone()
        };
        table.rows.insert(id, stored.clone());
        debug!("Stored working-day record {} for year {}", id, stored.year);
        Ok(stored)
    }

    async fn update(&self, id: i64, record: &WorkingDayRecord) -> Result<Option<WorkingDayRecord>> {
        let mut table = self.table.lock().await;
        match table.rows.get_mut(&id) {
            Some(existing) => {
                *existing = WorkingDayRecord {
                    id: Some(id),
                    ..record.clone()
                };
                Ok(Some(existing.clone()))
            }
            None => Ok(None),
        }
    }

    async fn latest_for_year(&self, year: i32) -> Result<Option<WorkingDayRecord>> {
        let table = self.table.lock().await;
        Ok(table
            .rows
            .values()
            .rev()
            .find(|record| record.year == year)
            .cloned())
    }
}

/// In-memory [`RecordStorage`] for one record type
#[derive(Clone)]
pub struct MemoryRecordRepository<T> {
    table: Arc<Mutex<MemoryTable<T>>>,
}

impl<T> MemoryRecordRepository<T> {
    pub fn new() -> Self {
        Self {
            table: Arc::new(Mutex::new(MemoryTable::default())),
        }
    }
}

impl<T> Default for MemoryRecordRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Record> RecordStorage<T> for MemoryRecordRepository<T> {
    async fn list(&self) -> Result<Vec<T>> {
        let table = self.table.lock().await;
        Ok(table.rows.values().cloned().collect())
    }

    async fn get(&self, id: i64) -> Result<Option<T>> {
        let table = self.table.lock().await;
        Ok(table.rows.get(&id).cloned())
    }

    async fn create(&self, record: &T) -> Result<T> {
        let mut table = self.table.lock().await;
        let id = table.allocate_id();
        let stored = record.clone().with_id(id);
        table.rows.insert(id, stored.clone());
        debug!("Stored {} record {}", T::KIND, id);
        Ok(stored)
    }

    async fn replace(&self, id: i64, record: &T) -> Result<Option<T>> {
        let mut table = self.table.lock().await;
        match table.rows.get_mut(&id) {
            Some(existing) => {
                *existing = record.clone().with_id(id);
                Ok(Some(existing.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let mut table = self.table.lock().await;
        Ok(table.rows.remove(&id).is_some())
    }
}
