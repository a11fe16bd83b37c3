//! Command-line interface.
//!
//! Each subcommand maps onto one domain operation. Year and holiday
//! arguments are taken as text and coerced the same way form input is:
//! the leading integer is used and anything without one counts as 0.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use shared::EntityKind;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

use super::presenter::{parse_int_or_zero, render_view, render_working_days};
use crate::domain::export_service;
use crate::domain::{Record, RecordService};
use crate::AppState;

#[derive(Debug, Parser)]
#[command(name = "budget-planner", version, about = "Annual budget planner")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Calculate working days for a Buddhist-calendar year
    Calculate {
        #[arg(long)]
        year: String,
        /// Extra non-working days on top of the fixed holidays
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        additional: String,
        /// Store the result
        #[arg(long)]
        save: bool,
    },
    /// Show the saved working days for a year, or a fresh calculation
    Show {
        #[arg(long)]
        year: String,
    },
    /// List saved working-day calculations
    History {
        #[arg(long)]
        year: Option<String>,
    },
    /// List stored records as JSON lines
    List { kind: EntityKind },
    /// Store a new record given as a JSON object
    Add { kind: EntityKind, json: String },
    /// Change some fields of a stored record, given as a JSON object
    Update { kind: EntityKind, id: i64, json: String },
    /// Delete a stored record
    Delete { kind: EntityKind, id: i64 },
    /// Export records to a CSV file
    Export { kind: EntityKind, path: PathBuf },
    /// Import records from a CSV file
    Import { kind: EntityKind, path: PathBuf },
}

/// Run `$body` with `$service` bound to the record service for `$kind`,
/// or `$working_days` for the working-day kind.
macro_rules! dispatch_kind {
    ($state:expr, $kind:expr, |$service:ident| $body:expr, working_days => $working_days:expr) => {
        match $kind {
            EntityKind::BudgetItems => {
                let $service = &$state.budget_items;
                $body
            }
            EntityKind::Employees => {
                let $service = &$state.employees;
                $body
            }
            EntityKind::MasterRates => {
                let $service = &$state.master_rates;
                $body
            }
            EntityKind::TravelExpenses => {
                let $service = &$state.travel_expenses;
                $body
            }
            EntityKind::AssistancePayments => {
                let $service = &$state.assistance_payments;
                $body
            }
            EntityKind::OvertimePayments => {
                let $service = &$state.overtime_payments;
                $body
            }
            EntityKind::WorkingDays => $working_days,
        }
    };
}

pub async fn run<W: Write>(command: Command, state: &AppState, out: &mut W) -> Result<()> {
    match command {
        Command::Calculate { year, additional, save } => {
            let year = parse_int_or_zero(&year);
            let additional = parse_int_or_zero(&additional);
            let record = state.working_days.calculate(year, additional);
            writeln!(out, "{}", render_working_days(&record))?;

            if save {
                let stored = state
                    .working_days
                    .calculate_and_save(year, additional)
                    .await
                    .context("Failed to save working days")?;
                writeln!(out, "(บันทึกแล้ว #{})", stored.id.unwrap_or_default())?;
            }
        }
        Command::Show { year } => {
            let view = state.working_days.current_for_year(parse_int_or_zero(&year)).await?;
            writeln!(out, "{}", render_view(&view))?;
        }
        Command::History { year } => {
            let year = year.as_deref().map(parse_int_or_zero);
            for record in state.working_days.history(year).await? {
                writeln!(out, "{}", serde_json::to_string(&record)?)?;
            }
        }
        Command::List { kind } => dispatch_kind!(
            state,
            kind,
            |service| print_records(service, out).await?,
            working_days => {
                for record in state.working_days.history(None).await? {
                    writeln!(out, "{}", serde_json::to_string(&record)?)?;
                }
            }
        ),
        Command::Add { kind, json } => {
            let stored = dispatch_kind!(
                state,
                kind,
                |service| {
                    let record = serde_json::from_str(&json)
                        .with_context(|| format!("Invalid {} JSON", kind))?;
                    serde_json::to_string(&service.create(record).await?)?
                },
                working_days => bail!("Working-day records are computed with `calculate --save`")
            );
            writeln!(out, "{}", stored)?;
        }
        Command::Update { kind, id, json } => {
            let patch: Value =
                serde_json::from_str(&json).with_context(|| format!("Invalid {} JSON", kind))?;
            let updated = dispatch_kind!(
                state,
                kind,
                |service| serde_json::to_string(&service.update(id, &patch).await?)?,
                working_days => bail!("Working-day records are recomputed, not updated")
            );
            writeln!(out, "{}", updated)?;
        }
        Command::Delete { kind, id } => {
            let deleted = dispatch_kind!(
                state,
                kind,
                |service| service.delete(id).await?,
                working_days => bail!("Working-day records are recomputed, not deleted")
            );
            if !deleted {
                bail!("{} record {} not found", kind, id);
            }
            writeln!(out, "Deleted {} record {}", kind, id)?;
        }
        Command::Export { kind, path } => {
            let count = dispatch_kind!(
                state,
                kind,
                |service| export_service::export_records(service, &path).await?,
                working_days => {
                    export_service::export_working_days(&state.working_days, &path).await?
                }
            );
            info!("Exported {} {} records", count, kind);
            writeln!(out, "Exported {} {} records to {}", count, kind, path.display())?;
        }
        Command::Import { kind, path } => {
            let count = dispatch_kind!(
                state,
                kind,
                |service| export_service::import_records(service, &path).await?.len(),
                working_days => {
                    export_service::import_working_days(&state.working_days, &path)
                        .await?
                        .len()
                }
            );
            writeln!(out, "Imported {} {} records from {}", count, kind, path.display())?;
        }
    }

    Ok(())
}

async fn print_records<T: Record, W: Write>(service: &RecordService<T>, out: &mut W) -> Result<()> {
    for record in service.list().await? {
        writeln!(out, "{}", serde_json::to_string(&record)?)?;
    }
    Ok(())
}
