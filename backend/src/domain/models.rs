//! Domain rules for the CRUD record types.
//!
//! The record structs themselves live in the `shared` crate; this module adds
//! the [`Record`] trait that storage and services are generic over, plus the
//! validation each record must pass before it is stored.

use serde::{de::DeserializeOwned, Serialize};
use shared::{
    AssistancePayment, BudgetItem, Employee, EntityKind, MasterRate, OvertimePayment,
    TravelExpense,
};
use std::fmt::Debug;

/// Longest fiscal-year span an assistance payment can cover
pub const MAX_MONTHS: u32 = 12;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} cannot be empty")]
    EmptyField(&'static str),
    #[error("{field} cannot be negative (got {value})")]
    Negative { field: &'static str, value: f64 },
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },
    #[error("{field} must be at most {max} (got {value})")]
    TooLarge { field: &'static str, value: u32, max: u32 },
}

/// A storable record with a storage-assigned id
pub trait Record: Serialize + DeserializeOwned + Clone + Debug + Send + Sync + 'static {
    const KIND: EntityKind;

    fn id(&self) -> Option<i64>;

    fn set_id(&mut self, id: Option<i64>);

    /// Check the record's business rules
    fn validate(&self) -> Result<(), ValidationError>;

    /// Builder form of [`Record::set_id`]
    fn with_id(mut self, id: i64) -> Self {
        self.set_id(Some(id));
        self
    }
}

fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    Ok(())
}

fn require_amount(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite { field });
    }
    if value < 0.0 {
        return Err(ValidationError::Negative { field, value });
    }
    Ok(())
}

impl Record for BudgetItem {
    const KIND: EntityKind = EntityKind::BudgetItems;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: Option<i64>) {
        self.id = id;
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_text("code", &self.code)?;
        require_text("name", &self.name)?;
        require_text("category", &self.category)?;
        require_amount("amount", self.amount)
    }
}

impl Record for Employee {
    const KIND: EntityKind = EntityKind::Employees;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: Option<i64>) {
        self.id = id;
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_text("employee_code", &self.employee_code)?;
        require_text("full_name", &self.full_name)?;
        require_text("position", &self.position)?;
        require_amount("salary", self.salary)
    }
}

impl Record for MasterRate {
    const KIND: EntityKind = EntityKind::MasterRates;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: Option<i64>) {
        self.id = id;
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_text("category", &self.category)?;
        require_text("unit", &self.unit)?;
        require_amount("amount", self.amount)
    }
}

impl Record for TravelExpense {
    const KIND: EntityKind = EntityKind::TravelExpenses;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: Option<i64>) {
        self.id = id;
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_text("destination", &self.destination)?;
        require_amount("per_diem_rate", self.per_diem_rate)?;
        require_amount("accommodation_rate", self.accommodation_rate)?;
        require_amount("transport_cost", self.transport_cost)
    }
}

impl Record for AssistancePayment {
    const KIND: EntityKind = EntityKind::AssistancePayments;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: Option<i64>) {
        self.id = id;
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_text("description", &self.description)?;
        require_amount("monthly_amount", self.monthly_amount)?;
        if self.months > MAX_MONTHS {
            return Err(ValidationError::TooLarge {
                field: "months",
                value: self.months,
                max: MAX_MONTHS,
            });
        }
        Ok(())
    }
}

impl Record for OvertimePayment {
    const KIND: EntityKind = EntityKind::OvertimePayments;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: Option<i64>) {
        self.id = id;
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_amount("weekday_hours", self.weekday_hours)?;
        require_amount("weekday_rate", self.weekday_rate)?;
        require_amount("holiday_hours", self.holiday_hours)?;
        require_amount("holiday_rate", self.holiday_rate)
    }
}
