use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One year's working-day breakdown.
///
/// `year` is a Thai Buddhist-calendar year (Gregorian + 543). A record is
/// always produced whole by the calculator; `working_days` equals
/// `total_days - weekend_days - holidays - additional_holidays`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingDayRecord {
    /// Assigned by storage on save, `None` for a fresh calculation
    #[serde(default)]
    pub id: Option<i64>,
    pub year: i32,
    /// 365, or 366 in a leap year
    pub total_days: i32,
    /// Approximate Saturday + Sunday count
    pub weekend_days: i32,
    /// Fixed national holidays from the holiday table
    pub holidays: i32,
    /// User-supplied extra non-working days
    pub additional_holidays: i32,
    /// May be negative when `additional_holidays` is unreasonably large
    pub working_days: i32,
}

/// Annual budget line item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetItem {
    #[serde(default)]
    pub id: Option<i64>,
    /// Buddhist-calendar fiscal year
    pub fiscal_year: i32,
    pub code: String,
    pub name: String,
    pub category: String,
    pub amount: f64,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    #[serde(default)]
    pub id: Option<i64>,
    pub employee_code: String,
    pub full_name: String,
    pub position: String,
    pub level: String,
    pub department: String,
    /// Monthly salary in baht
    pub salary: f64,
}

/// Standard allowance rate (per diem, accommodation, overtime hourly...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MasterRate {
    #[serde(default)]
    pub id: Option<i64>,
    pub category: String,
    pub level: String,
    pub amount: f64,
    /// e.g. "baht/day", "baht/night", "baht/hour"
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelExpense {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub employee_id: Option<i64>,
    pub fiscal_year: i32,
    pub destination: String,
    pub days: u32,
    pub per_diem_rate: f64,
    pub nights: u32,
    pub accommodation_rate: f64,
    pub transport_cost: f64,
}

impl TravelExpense {
    /// Per diem plus accommodation plus transport
    pub fn total(&self) -> f64 {
        f64::from(self.days) * self.per_diem_rate
            + f64::from(self.nights) * self.accommodation_rate
            + self.transport_cost
    }
}

/// Special assistance payment paid monthly over part of a fiscal year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistancePayment {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub employee_id: Option<i64>,
    pub fiscal_year: i32,
    pub description: String,
    pub monthly_amount: f64,
    pub months: u32,
}

impl AssistancePayment {
    pub fn total(&self) -> f64 {
        self.monthly_amount * f64::from(self.months)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OvertimePayment {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub employee_id: Option<i64>,
    pub fiscal_year: i32,
    pub weekday_hours: f64,
    pub weekday_rate: f64,
    pub holiday_hours: f64,
    pub holiday_rate: f64,
}

impl OvertimePayment {
    pub fn total(&self) -> f64 {
        self.weekday_hours * self.weekday_rate + self.holiday_hours * self.holiday_rate
    }
}

/// Every kind of record the planner stores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntityKind {
    BudgetItems,
    Employees,
    MasterRates,
    TravelExpenses,
    AssistancePayments,
    OvertimePayments,
    WorkingDays,
}

impl EntityKind {
    pub const ALL: [EntityKind; 7] = [
        EntityKind::BudgetItems,
        EntityKind::Employees,
        EntityKind::MasterRates,
        EntityKind::TravelExpenses,
        EntityKind::AssistancePayments,
        EntityKind::OvertimePayments,
        EntityKind::WorkingDays,
    ];

    /// Stable name used on the command line and as the storage key
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::BudgetItems => "budget-items",
            EntityKind::Employees => "employees",
            EntityKind::MasterRates => "master-rates",
            EntityKind::TravelExpenses => "travel-expenses",
            EntityKind::AssistancePayments => "assistance-payments",
            EntityKind::OvertimePayments => "overtime-payments",
            EntityKind::WorkingDays => "working-days",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        EntityKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| {
                let names: Vec<&str> = EntityKind::ALL.iter().map(|k| k.as_str()).collect();
                format!("Unknown entity kind '{}'. Expected one of: {}", s, names.join(", "))
            })
    }
}
