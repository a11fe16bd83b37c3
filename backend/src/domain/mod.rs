//! # Domain Module
//!
//! Contains the business logic of the budget planner.
//!
//! This module knows nothing about how records are stored or displayed. It
//! works against the storage traits and hands plain `shared` types back to
//! the IO layer.
//!
//! ## Module Organization
//!
//! - **working_days**: the pure working-day calculator and its holiday table
//! - **working_days_service**: calculate-then-save flow and find-by-year lookups
//! - **models**: the `Record` trait and per-record validation rules
//! - **record_service**: generic CRUD for budget items, employees, rates and payments
//! - **export_service**: CSV export/import of stored records
//!
//! ## Business Rules
//!
//! - Working days are always recomputed whole, never edited field by field
//! - Recomputing a year appends a new record; the newest one is displayed
//! - Record ids are assigned by storage and never change on update
//! - Amounts, rates and hours cannot be negative

pub mod export_service;
pub mod models;
pub mod record_service;
pub mod working_days;
pub mod working_days_service;

pub use models::{Record, ValidationError};
pub use record_service::{RecordError, RecordService};
pub use working_days::{HolidayTable, WorkingDaysCalculator};
pub use working_days_service::{WorkingDaysService, WorkingDaysView};
