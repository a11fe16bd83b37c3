//! # Budget Planner Backend
//!
//! Contains all non-UI logic for the annual budget planner.
//!
//! This crate is the orchestration layer that brings together:
//! - **Domain**: working-day calculation and record rules
//! - **Storage**: SQLite and in-memory persistence behind repository traits
//! - **IO**: the command-line surface and text rendering
//!
//! ## Architecture
//!
//! ```text
//! IO Layer (CLI, presenter)
//!     ↓
//! Domain Layer (calculator, services)
//!     ↓
//! Storage Layer (repositories)
//! ```
//!
//! [`AppState`] wires one service per record type to a single storage
//! backend chosen by [`config::AppConfig`].

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use anyhow::Result;
use shared::{AssistancePayment, BudgetItem, Employee, MasterRate, OvertimePayment, TravelExpense};
use std::sync::Arc;
use tracing::info;

use crate::config::{AppConfig, StorageBackend};
use crate::domain::{HolidayTable, RecordService, WorkingDaysCalculator, WorkingDaysService};
use crate::storage::{
    DbConnection, MemoryRecordRepository, MemoryWorkingDayRepository, SqliteRecordRepository,
    SqliteWorkingDayRepository,
};

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub working_days: WorkingDaysService,
    pub budget_items: RecordService<BudgetItem>,
    pub employees: RecordService<Employee>,
    pub master_rates: RecordService<MasterRate>,
    pub travel_expenses: RecordService<TravelExpense>,
    pub assistance_payments: RecordService<AssistancePayment>,
    pub overtime_payments: RecordService<OvertimePayment>,
}

impl AppState {
    /// Services backed by a SQLite database
    pub fn with_sqlite(db: DbConnection, holidays: HolidayTable) -> Self {
        Self {
            working_days: WorkingDaysService::new(
                WorkingDaysCalculator::with_holiday_table(holidays),
                Arc::new(SqliteWorkingDayRepository::new(db.clone())),
            ),
            budget_items: RecordService::new(Arc::new(SqliteRecordRepository::new(db.clone()))),
            employees: RecordService::new(Arc::new(SqliteRecordRepository::new(db.clone()))),
            master_rates: RecordService::new(Arc::new(SqliteRecordRepository::new(db.clone()))),
            travel_expenses: RecordService::new(Arc::new(SqliteRecordRepository::new(db.clone()))),
            assistance_payments: RecordService::new(Arc::new(SqliteRecordRepository::new(
                db.clone(),
            ))),
            overtime_payments: RecordService::new(Arc::new(SqliteRecordRepository::new(db))),
        }
    }

    /// Services backed by process memory; nothing outlives the state
    pub fn in_memory(holidays: HolidayTable) -> Self {
        Self {
            working_days: WorkingDaysService::new(
                WorkingDaysCalculator::with_holiday_table(holidays),
                Arc::new(MemoryWorkingDayRepository::new()),
            ),
            budget_items: RecordService::new(Arc::new(MemoryRecordRepository::new())),
            employees: RecordService::new(Arc::new(MemoryRecordRepository::new())),
            master_rates: RecordService::new(Arc::new(MemoryRecordRepository::new())),
            travel_expenses: RecordService::new(Arc::new(MemoryRecordRepository::new())),
            assistance_payments: RecordService::new(Arc::new(MemoryRecordRepository::new())),
            overtime_payments: RecordService::new(Arc::new(MemoryRecordRepository::new())),
        }
    }
}

/// Initialize the backend with all required services
pub async fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    let holidays = config.holiday_table();

    match &config.storage {
        StorageBackend::Sqlite(url) => {
            info!("Setting up database at {}", url);
            let db = DbConnection::new(url).await?;
            Ok(AppState::with_sqlite(db, holidays))
        }
        StorageBackend::Memory => {
            info!("Using in-memory storage");
            Ok(AppState::in_memory(holidays))
        }
    }
}
