//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod budget;
pub mod category;
pub mod export;
pub mod ledger;
pub mod report;
pub mod transaction;
pub mod wallet;

pub use budget::{handle_budget_command, BudgetCommands};
pub use category::{handle_category_command, CategoryCommands};
pub use export::{handle_export_command, ExportCommands};
pub use ledger::{handle_ledger_command, LedgerCommands};
pub use report::{handle_report_command, ReportCommands};
pub use transaction::{handle_transaction_command, TransactionCommands};
pub use wallet::{handle_wallet_command, WalletCommands};

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Money, TransactionKind};

/// Today's date on the local clock
pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub(crate) fn parse_money(input: &str) -> LedgerResult<Money> {
    Money::parse(input).map_err(|e| {
        LedgerError::Validation(format!(
            "Invalid amount: '{}'. Use a format like '45,000' or '45000'. Error: {}",
            input, e
        ))
    })
}

pub(crate) fn parse_date(input: &str) -> LedgerResult<NaiveDate> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|_| {
        LedgerError::Validation(format!("Invalid date format: '{}'. Use YYYY-MM-DD", input))
    })
}

pub(crate) fn parse_time(input: &str) -> LedgerResult<NaiveTime> {
    NaiveTime::parse_from_str(input, "%H:%M")
        .map_err(|_| LedgerError::Validation(format!("Invalid time: '{}'. Use HH:MM", input)))
}

/// Parse a YYYY-MM month into its first day
pub(crate) fn parse_month(input: &str) -> LedgerResult<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{}-01", input), "%Y-%m-%d").map_err(|_| {
        LedgerError::Validation(format!("Invalid month: '{}'. Use YYYY-MM", input))
    })
}

/// Combine optional date and time arguments, defaulting to now
pub(crate) fn parse_date_time(
    date: Option<&str>,
    time: Option<&str>,
) -> LedgerResult<NaiveDateTime> {
    let now = Local::now().naive_local();
    let day = date.map(parse_date).transpose()?.unwrap_or(now.date());
    let clock = match time {
        Some(t) => parse_time(t)?,
        None if date.is_some() => NaiveTime::MIN,
        None => now.time(),
    };
    Ok(day.and_time(clock))
}

pub(crate) fn parse_kind(input: &str) -> LedgerResult<TransactionKind> {
    TransactionKind::parse(input).ok_or_else(|| {
        LedgerError::Validation(format!(
            "Invalid kind: '{}'. Use income, expense or transfer",
            input
        ))
    })
}
