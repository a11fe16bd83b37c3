//! # Storage Module
//!
//! Handles all data persistence for the budget planner.
//!
//! The domain layer only sees the traits in [`traits`]; the concrete backend
//! is injected when the application state is built. Two backends exist:
//!
//! - **SQLite** ([`sqlite`]): the production store, via SQLx
//! - **In-memory** ([`memory`]): for tests and throwaway sessions
//!
//! Identity assignment belongs to the backend. Every repository hands out
//! its own ids; nothing is kept in process-wide statics.

pub mod memory;
pub mod sqlite;
pub mod traits;

pub use memory::{MemoryRecordRepository, MemoryWorkingDayRepository};
pub use sqlite::{DbConnection, SqliteRecordRepository, SqliteWorkingDayRepository};
pub use traits::{RecordStorage, WorkingDayStorage};
