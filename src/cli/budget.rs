//! Budget CLI commands
//!
//! Implements CLI commands for monthly spending limits.

use clap::Subcommand;

use crate::config::Settings;
use crate::display::report::format_budget_progress;
use crate::error::{LedgerError, LedgerResult};
use crate::models::DateRange;
use crate::reports::BudgetProgressReport;
use crate::services::{BudgetService, CategoryService};
use crate::storage::Storage;

use super::{parse_money, parse_month, today};

/// Budget subcommands
#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Set the monthly limit for an expense category
    Set {
        /// Category name or ID
        category: String,
        /// Monthly limit
        limit: String,
    },
    /// List budgets with this month's progress
    List {
        /// Month to show (YYYY-MM), defaults to the current month
        #[arg(short, long)]
        month: Option<String>,
    },
    /// Remove the budget of a category
    Delete {
        /// Category name or ID
        category: String,
    },
}

/// Handle a budget command
pub fn handle_budget_command(
    storage: &Storage,
    settings: &Settings,
    cmd: BudgetCommands,
) -> LedgerResult<()> {
    let service = BudgetService::new(storage);
    let categories = CategoryService::new(storage);

    match cmd {
        BudgetCommands::Set { category, limit } => {
            let category = categories.require(&category, None)?;
            let limit = parse_money(&limit)?;
            let budget = service.set(category.id, limit)?;

            println!(
                "Budget for {}: {} per month",
                category.name,
                settings.format_money(budget.limit)
            );
        }

        BudgetCommands::List { month } => {
            let day = match month {
                Some(m) => parse_month(&m)?,
                None => today(),
            };
            let report = BudgetProgressReport::generate(storage, DateRange::month_of(day))?;
            print!("{}", format_budget_progress(&report, &settings.currency_symbol));
        }

        BudgetCommands::Delete { category } => {
            let category = categories.require(&category, None)?;
            let budget = service
                .get_for_category(category.id)?
                .ok_or_else(|| LedgerError::budget_not_found(&category.name))?;

            service.delete(budget.id)?;
            println!("Removed budget for {}", category.name);
        }
    }

    Ok(())
}
