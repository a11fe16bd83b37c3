//! Runtime configuration read from environment variables.
//!
//! | Variable                   | Default                       |
//! |----------------------------|-------------------------------|
//! | `BUDGET_DATABASE_URL`      | `sqlite:budget_planner.db`    |
//! | `BUDGET_HOLIDAY_OVERRIDES` | none, e.g. `2569=19,2570=17`  |
//! | `BUDGET_LOG`               | `info`                        |
//!
//! `BUDGET_DATABASE_URL=memory` keeps everything in memory for the session.

use crate::domain::HolidayTable;
use crate::storage::sqlite::DEFAULT_DATABASE_URL;

pub const DATABASE_URL_VAR: &str = "BUDGET_DATABASE_URL";
pub const HOLIDAY_OVERRIDES_VAR: &str = "BUDGET_HOLIDAY_OVERRIDES";
pub const LOG_FILTER_VAR: &str = "BUDGET_LOG";

const MEMORY_BACKEND: &str = "memory";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{var}: expected YEAR=COUNT, got '{entry}'")]
    MalformedOverride { var: &'static str, entry: String },
}

/// Where records are kept
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    Sqlite(String),
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub storage: StorageBackend,
    /// Extra year → holiday-count entries on top of the built-in table
    pub holiday_overrides: Vec<(i32, i32)>,
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage: StorageBackend::Sqlite(DEFAULT_DATABASE_URL.to_string()),
            holiday_overrides: Vec::new(),
            log_filter: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through an arbitrary lookup function
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(DATABASE_URL_VAR).filter(|v| !v.trim().is_empty()) {
            let url = url.trim();
            config.storage = if url.eq_ignore_ascii_case(MEMORY_BACKEND) {
                StorageBackend::Memory
            } else {
                StorageBackend::Sqlite(url.to_string())
            };
        }

        if let Some(overrides) = lookup(HOLIDAY_OVERRIDES_VAR) {
            config.holiday_overrides = parse_holiday_overrides(&overrides)?;
        }

        if let Some(filter) = lookup(LOG_FILTER_VAR).filter(|v| !v.trim().is_empty()) {
            config.log_filter = filter.trim().to_string();
        }

        Ok(config)
    }

    /// Built-in holiday table with the configured overrides applied
    pub fn holiday_table(&self) -> HolidayTable {
        let mut table = HolidayTable::default();
        for (year, count) in &self.holiday_overrides {
            table.register(*year, *count);
        }
        table
    }
}

/// Parse `2569=19,2570=17`. Blank entries are skipped.
pub fn parse_holiday_overrides(raw: &str) -> Result<Vec<(i32, i32)>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let malformed = || ConfigError::MalformedOverride {
                var: HOLIDAY_OVERRIDES_VAR,
                entry: entry.to_string(),
            };
            let (year, count) = entry.split_once('=').ok_or_else(malformed)?;
            let year = year.trim().parse::<i32>().map_err(|_| malformed())?;
            let count = count.trim().parse::<i32>().map_err(|_| malformed())?;
            Ok((year, count))
        })
        .collect()
}
