//! Service layer for Pocket Ledger
//!
//! The service layer provides business logic on top of the storage layer,
//! handling validation and cross-entity operations. `LedgerService` is the
//! only service that changes wallet balances.

pub mod budget;
pub mod category;
pub mod ledger;
pub mod transaction;
pub mod wallet;

use crate::error::{LedgerError, LedgerResult};
use crate::models::EntityId;

pub use budget::BudgetService;
pub use category::{CategoryDeletion, CategoryService};
pub use ledger::{BalanceDiscrepancy, LedgerService, NewTransaction};
pub use transaction::{daily_total, group_by_day, DayGroup, TransactionFilter, TransactionService};
pub use wallet::{WalletDeletion, WalletService};

/// Resolve an abbreviated ID such as `wal-1a2b3c4d` against `items`
///
/// More than one match is an error rather than a guess.
pub(crate) fn find_by_short_id<T, I: EntityId>(
    items: Vec<T>,
    input: &str,
    id_of: impl Fn(&T) -> I,
    noun: &str,
) -> LedgerResult<Option<T>> {
    let mut matches: Vec<T> = items
        .into_iter()
        .filter(|item| id_of(item).matches_short(input))
        .collect();

    match matches.len() {
        0 => Ok(None),
        1 => Ok(matches.pop()),
        n => Err(LedgerError::Validation(format!(
            "'{}' matches {} {}; use a longer ID",
            input.trim(),
            n,
            noun
        ))),
    }
}
