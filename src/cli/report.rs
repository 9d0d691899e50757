//! CLI commands for reports
//!
//! Dashboard, budget progress and spending charts.

use std::collections::HashMap;

use clap::Subcommand;

use crate::config::Settings;
use crate::display::report::format_budget_progress;
use crate::display::transaction::{format_transaction_row, DisplayContext};
use crate::display::wallet::format_wallet_list;
use crate::error::LedgerResult;
use crate::models::DateRange;
use crate::reports::{BudgetProgressReport, DashboardSummary, ReportRange, SpendingReport};
use crate::storage::Storage;

use super::{parse_date, parse_month, today};

/// Report subcommands
#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// Balances, this month's totals and the latest transactions
    Dashboard {
        /// Number of recent transactions, defaults to the configured limit
        #[arg(short, long)]
        recent: Option<usize>,
    },

    /// Progress of every budget for a month
    Budgets {
        /// Month (YYYY-MM), defaults to the current month
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Expense chart for the week, month or year
    Spending {
        /// Period: week, month or year
        #[arg(default_value = "month")]
        range: String,

        /// Any day inside the period (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
    },
}

/// Handle report commands
pub fn handle_report_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ReportCommands,
) -> LedgerResult<()> {
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        ReportCommands::Dashboard { recent } => {
            let limit = recent.unwrap_or(settings.recent_transactions_limit);
            let dashboard = DashboardSummary::generate(storage, today(), limit)?;

            println!("{}", format_wallet_list(&dashboard.wallets, symbol));
            println!();
            print!("{}", dashboard.format_terminal(symbol));

            if !dashboard.recent.is_empty() {
                let wallets: HashMap<_, _> = dashboard
                    .wallets
                    .iter()
                    .map(|w| (w.id, w.clone()))
                    .collect();
                let ctx = DisplayContext {
                    categories: &dashboard.categories,
                    wallets: &wallets,
                    date_format: &settings.date_format,
                    currency_symbol: symbol,
                };

                println!();
                println!("Recent transactions:");
                for txn in &dashboard.recent {
                    println!(
                        "  {} {}",
                        txn.date.format(&settings.date_format),
                        format_transaction_row(txn, &ctx)
                    );
                }
            }
        }

        ReportCommands::Budgets { month } => {
            let day = match month {
                Some(m) => parse_month(&m)?,
                None => today(),
            };
            let report = BudgetProgressReport::generate(storage, DateRange::month_of(day))?;
            print!("{}", format_budget_progress(&report, symbol));
        }

        ReportCommands::Spending { range, date } => {
            let range_kind: ReportRange = range.parse()?;
            let day = match date {
                Some(d) => parse_date(&d)?,
                None => today(),
            };
            let report =
                SpendingReport::generate(storage, range_kind, day, settings.first_day_of_week)?;
            print!("{}", report.format_terminal(symbol));
        }
    }

    Ok(())
}
