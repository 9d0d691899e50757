//! Transaction service
//!
//! Read side of the transaction store: lookup, filtered listing, and the
//! per-day grouping used by transaction lists. Mutations live in
//! `LedgerService`.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    Category, CategoryId, DateRange, Money, Transaction, TransactionId, TransactionKind, WalletId,
};
use crate::storage::Storage;

use super::find_by_short_id;

/// Service for querying transactions
pub struct TransactionService<'a> {
    storage: &'a Storage,
}

/// Options for filtering transactions
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Wallet in either role (source or destination)
    pub wallet_id: Option<WalletId>,
    pub category_id: Option<CategoryId>,
    pub kind: Option<TransactionKind>,
    pub range: Option<DateRange>,
    /// Case-insensitive text matched against the note and the category name
    pub search: Option<String>,
    pub limit: Option<usize>,
}

impl TransactionFilter {
    /// Create a new empty filter
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by wallet
    pub fn wallet(mut self, wallet_id: WalletId) -> Self {
        self.wallet_id = Some(wallet_id);
        self
    }

    /// Filter by category
    pub fn category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    /// Filter by category kind
    pub fn kind(mut self, kind: TransactionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Filter by date range
    pub fn range(mut self, range: DateRange) -> Self {
        self.range = Some(range);
        self
    }

    /// Filter by search text
    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    /// Limit number of results
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// The transactions of one calendar day
#[derive(Debug, Clone)]
pub struct DayGroup {
    pub day: NaiveDate,
    /// Newest first
    pub transactions: Vec<Transaction>,
    /// Income minus expense; transfers and orphans count as zero
    pub total: Money,
}

/// Net of a set of transactions: income adds, expense subtracts
///
/// Transfers and transactions without a known category contribute nothing.
pub fn daily_total(
    transactions: &[Transaction],
    categories: &HashMap<CategoryId, Category>,
) -> Money {
    transactions
        .iter()
        .filter_map(|t| {
            let category = categories.get(&t.category_id?)?;
            Some(t.signed_amount(category.kind))
        })
        .sum()
}

/// Group transactions by calendar day, most recent day first
pub fn group_by_day(
    mut transactions: Vec<Transaction>,
    categories: &HashMap<CategoryId, Category>,
) -> Vec<DayGroup> {
    transactions.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));

    let mut groups: Vec<DayGroup> = Vec::new();
    for txn in transactions {
        let day = txn.date.date();
        match groups.last_mut() {
            Some(group) if group.day == day => group.transactions.push(txn),
            _ => groups.push(DayGroup {
                day,
                transactions: vec![txn],
                total: Money::zero(),
            }),
        }
    }

    for group in &mut groups {
        group.total = daily_total(&group.transactions, categories);
    }
    groups
}

impl<'a> TransactionService<'a> {
    /// Create a new transaction service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Get a transaction by ID
    pub fn get(&self, id: TransactionId) -> LedgerResult<Option<Transaction>> {
        self.storage.transactions.get(id)
    }

    /// Find a transaction by full ID or by the short `txn-xxxxxxxx` form
    pub fn find(&self, identifier: &str) -> LedgerResult<Option<Transaction>> {
        if let Ok(id) = identifier.parse::<TransactionId>() {
            return self.storage.transactions.get(id);
        }

        let transactions = self.storage.transactions.get_all()?;
        find_by_short_id(transactions, identifier, |t| t.id, "transactions")
    }

    /// Find a transaction or fail with `NotFound`
    pub fn require(&self, identifier: &str) -> LedgerResult<Transaction> {
        self.find(identifier)?
            .ok_or_else(|| LedgerError::transaction_not_found(identifier))
    }

    /// List transactions matching a filter, newest first
    pub fn list(&self, filter: &TransactionFilter) -> LedgerResult<Vec<Transaction>> {
        let mut transactions = if let Some(wallet_id) = filter.wallet_id {
            self.storage.transactions.get_by_wallet(wallet_id)?
        } else if let Some(category_id) = filter.category_id {
            self.storage.transactions.get_by_category(category_id)?
        } else if let Some(range) = filter.range {
            self.storage.transactions.get_in_range(range)?
        } else {
            self.storage.transactions.get_all()?
        };

        if let Some(category_id) = filter.category_id {
            transactions.retain(|t| t.category_id == Some(category_id));
        }
        if let Some(range) = filter.range {
            transactions.retain(|t| range.contains(t.date));
        }

        if filter.kind.is_some() || filter.search.is_some() {
            let categories = self.category_map()?;
            let category_of = |t: &Transaction| t.category_id.and_then(|id| categories.get(&id));

            if let Some(kind) = filter.kind {
                transactions.retain(|t| category_of(t).map(|c| c.kind) == Some(kind));
            }

            if let Some(search) = filter.search.as_deref().map(str::trim) {
                if !search.is_empty() {
                    let needle = search.to_lowercase();
                    transactions.retain(|t| {
                        let in_note = t
                            .note
                            .as_deref()
                            .map_or(false, |n| n.to_lowercase().contains(&needle));
                        let in_category = category_of(t)
                            .map_or(false, |c| c.name.to_lowercase().contains(&needle));
                        in_note || in_category
                    });
                }
            }
        }

        if let Some(limit) = filter.limit {
            transactions.truncate(limit);
        }

        Ok(transactions)
    }

    /// List matching transactions grouped by day
    pub fn list_grouped(&self, filter: &TransactionFilter) -> LedgerResult<Vec<DayGroup>> {
        let transactions = self.list(filter)?;
        Ok(group_by_day(transactions, &self.category_map()?))
    }

    /// All categories keyed by ID, for resolving transaction display fields
    pub fn category_map(&self) -> LedgerResult<HashMap<CategoryId, Category>> {
        Ok(self
            .storage
            .categories
            .get_all()?
            .into_iter()
            .map(|c| (c.id, c))
            .collect())
    }

    /// Count all transactions
    pub fn count(&self) -> LedgerResult<usize> {
        self.storage.transactions.count()
    }
}
