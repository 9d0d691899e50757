//! Core data models for Pocket Ledger
//!
//! This module contains the entities the ledger works with: wallets,
//! categories, budgets and transactions, plus the money and date-range value
//! types they share.

pub mod budget;
pub mod category;
pub mod ids;
pub mod money;
pub mod range;
pub mod transaction;
pub mod wallet;

pub use budget::Budget;
pub use category::{Category, TransactionKind, TRANSFER_CATEGORY_NAME};
pub use ids::{BudgetId, CategoryId, EntityId, TransactionId, WalletId};
pub use money::Money;
pub use range::DateRange;
pub use transaction::Transaction;
pub use wallet::Wallet;

/// Check that a string is a `#RRGGBB` color
pub fn is_hex_color(s: &str) -> bool {
    s.len() == 7
        && s.starts_with('#')
        && s[1..].chars().all(|c| c.is_ascii_hexdigit())
}
