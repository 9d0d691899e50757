//! Reports module for Pocket Ledger
//!
//! Read-side aggregators over the ledger: the dashboard summary, budget
//! progress and spending analysis. Reports never write wallet balances.

pub mod budget_progress;
pub mod dashboard;
pub mod spending;

pub use budget_progress::{BudgetProgress, BudgetProgressReport};
pub use dashboard::DashboardSummary;
pub use spending::{CategoryShare, ReportRange, SpendingBucket, SpendingReport};
