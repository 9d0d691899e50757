//! Display formatting for terminal output
//!
//! Provides utilities for formatting data models for terminal display,
//! including tables, day-grouped registers, and progress bars.

pub mod category;
pub mod report;
pub mod transaction;
pub mod wallet;

pub use category::{format_category_details, format_category_list};
pub use report::{format_bar, format_budget_progress, format_discrepancies, format_percentage};
pub use transaction::{
    format_day_groups, format_transaction_details, format_transaction_row, DisplayContext,
};
pub use wallet::{format_wallet_details, format_wallet_list};
