//! Budget Progress Report
//!
//! How much of each category's monthly limit has been spent.

use std::collections::HashMap;

use crate::error::LedgerResult;
use crate::models::{Budget, CategoryId, DateRange, Money, TransactionKind};
use crate::storage::Storage;

/// Progress of a single budget
#[derive(Debug, Clone)]
pub struct BudgetProgress {
    pub budget: Budget,
    pub category_name: String,
    pub icon_symbol: String,
    pub color_hex: String,
    pub spent: Money,
    /// Spent over limit, capped at 1.0
    pub progress: f64,
    pub is_over_budget: bool,
}

impl BudgetProgress {
    /// Limit minus spent; negative once over budget
    pub fn remaining(&self) -> Money {
        self.budget.limit - self.spent
    }
}

/// Budget Progress Report
#[derive(Debug, Clone)]
pub struct BudgetProgressReport {
    pub range: DateRange,
    /// Highest progress first
    pub rows: Vec<BudgetProgress>,
}

impl BudgetProgressReport {
    /// Generate progress for every budget whose category still exists
    pub fn generate(storage: &Storage, range: DateRange) -> LedgerResult<Self> {
        let mut spent_by_category: HashMap<CategoryId, Money> = HashMap::new();
        for txn in storage.transactions.get_in_range(range)? {
            if let Some(category_id) = txn.category_id {
                *spent_by_category.entry(category_id).or_default() += txn.amount;
            }
        }

        let mut rows = Vec::new();
        for budget in storage.budgets.get_all()? {
            let category = match storage.categories.get(budget.category_id)? {
                Some(c) if c.kind == TransactionKind::Expense => c,
                _ => continue,
            };

            let spent = spent_by_category
                .get(&budget.category_id)
                .copied()
                .unwrap_or_default();

            rows.push(BudgetProgress {
                progress: progress(spent, budget.limit),
                is_over_budget: spent > budget.limit,
                category_name: category.name,
                icon_symbol: category.icon_symbol,
                color_hex: category.color_hex,
                spent,
                budget,
            });
        }

        rows.sort_by(|a, b| {
            b.progress
                .total_cmp(&a.progress)
                .then_with(|| a.category_name.cmp(&b.category_name))
        });

        Ok(Self { range, rows })
    }

    /// Number of budgets already exceeded
    pub fn over_budget_count(&self) -> usize {
        self.rows.iter().filter(|r| r.is_over_budget).count()
    }
}

fn progress(spent: Money, limit: Money) -> f64 {
    if !limit.is_positive() {
        return 0.0;
    }
    spent.ratio_of(limit).min(1.0)
}
