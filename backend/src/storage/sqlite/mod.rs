//! # SQLite Storage
//!
//! Production storage backend built on SQLx. Working-day records get their
//! own typed table; the CRUD entities share a JSON payload table.

pub mod connection;
pub mod record_repository;
pub mod working_day_repository;

pub use connection::{DbConnection, DEFAULT_DATABASE_URL};
pub use record_repository::SqliteRecordRepository;
pub use working_day_repository::SqliteWorkingDayRepository;
