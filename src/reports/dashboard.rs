//! Dashboard Summary
//!
//! The at-a-glance view: wallet balances, this month's income and expense,
//! and the latest transactions.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::error::LedgerResult;
use crate::models::{Category, CategoryId, DateRange, Money, Transaction, TransactionKind, Wallet};
use crate::storage::Storage;

/// Dashboard Summary
#[derive(Debug, Clone)]
pub struct DashboardSummary {
    /// Sorted by name
    pub wallets: Vec<Wallet>,
    pub total_balance: Money,
    pub month: DateRange,
    pub month_income: Money,
    pub month_expense: Money,
    /// Newest first
    pub recent: Vec<Transaction>,
    /// Categories of the recent transactions, for display
    pub categories: HashMap<CategoryId, Category>,
}

impl DashboardSummary {
    /// Generate the dashboard as of `today`
    pub fn generate(storage: &Storage, today: NaiveDate, recent_limit: usize) -> LedgerResult<Self> {
        let wallets = storage.wallets.get_all()?;
        let total_balance = wallets.iter().map(Wallet::current_balance).sum();

        let categories: HashMap<CategoryId, Category> = storage
            .categories
            .get_all()?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        let month = DateRange::month_of(today);
        let mut month_income = Money::zero();
        let mut month_expense = Money::zero();
        for txn in storage.transactions.get_in_range(month)? {
            let kind = txn
                .category_id
                .and_then(|id| categories.get(&id))
                .map(|c| c.kind);
            match kind {
                Some(TransactionKind::Income) => month_income += txn.amount,
                Some(TransactionKind::Expense) => month_expense += txn.amount,
                _ => {}
            }
        }

        let mut recent = storage.transactions.get_all()?;
        recent.truncate(recent_limit);

        Ok(Self {
            wallets,
            total_balance,
            month,
            month_income,
            month_expense,
            recent,
            categories,
        })
    }

    /// Income minus expense for the month
    pub fn month_net(&self) -> Money {
        self.month_income - self.month_expense
    }

    /// The category of a transaction, if it still exists
    pub fn category_of(&self, txn: &Transaction) -> Option<&Category> {
        txn.category_id.and_then(|id| self.categories.get(&id))
    }

    /// Format the summary header for terminal display
    pub fn format_terminal(&self, currency_symbol: &str) -> String {
        let mut output = String::new();
        output.push_str(&format!(
            "Total balance: {}\n",
            self.total_balance.format_with_symbol(currency_symbol)
        ));
        output.push_str(&format!("This month ({}):\n", self.month));
        output.push_str(&format!(
            "  Income:  {:>16}\n",
            self.month_income.format_with_symbol(currency_symbol)
        ));
        output.push_str(&format!(
            "  Expense: {:>16}\n",
            self.month_expense.format_with_symbol(currency_symbol)
        ));
        output.push_str(&format!(
            "  Net:     {:>16}\n",
            self.month_net().format_with_symbol(currency_symbol)
        ));
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::LedgerPaths;
    use crate::services::ledger::{LedgerService, NewTransaction};
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    #[test]
    fn test_generate_dashboard() {
        let (_temp_dir, storage) = create_test_storage();

        let bank = Wallet::new("Bank", Money::new(5_000_000));
        let cash = Wallet::new("Cash", Money::new(1_000_000));
        let (bank_id, cash_id) = (bank.id, cash.id);
        storage.wallets.upsert(cash).unwrap();
        storage.wallets.upsert(bank).unwrap();

        let salary = Category::new("Salary", "dollarsign", "#2ECC71", TransactionKind::Income);
        let food = Category::new("Food", "fork.knife", "#F1C40F", TransactionKind::Expense);
        let transfer = Category::transfer();
        let (salary_id, food_id, transfer_id) = (salary.id, food.id, transfer.id);
        for c in [salary, food, transfer] {
            storage.categories.upsert(c).unwrap();
        }

        let ledger = LedgerService::new(&storage);
        let noon = |m, d| date(m, d).and_hms_opt(12, 0, 0).unwrap();
        // Previous month, excluded from the monthly totals
        ledger
            .add_transaction(NewTransaction::new(Money::new(70_000), noon(2, 27), food_id, cash_id))
            .unwrap();
        ledger
            .add_transaction(NewTransaction::new(Money::new(9_000_000), noon(3, 1), salary_id, bank_id))
            .unwrap();
        ledger
            .add_transaction(NewTransaction::new(Money::new(120_000), noon(3, 2), food_id, cash_id))
            .unwrap();
        ledger
            .add_transaction(
                NewTransaction::new(Money::new(500_000), noon(3, 3), transfer_id, bank_id)
                    .destination(cash_id),
            )
            .unwrap();

        let dashboard = DashboardSummary::generate(&storage, date(3, 15), 2).unwrap();

        let names: Vec<_> = dashboard.wallets.iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, vec!["Bank", "Cash"]);
        assert_eq!(dashboard.total_balance, Money::new(14_810_000));
        assert_eq!(dashboard.month_income, Money::new(9_000_000));
        assert_eq!(dashboard.month_expense, Money::new(120_000));
        assert_eq!(dashboard.month_net(), Money::new(8_880_000));

        assert_eq!(dashboard.recent.len(), 2);
        assert_eq!(dashboard.recent[0].date, noon(3, 3));
        assert_eq!(
            dashboard.category_of(&dashboard.recent[1]).map(|c| c.name.as_str()),
            Some("Food")
        );
    }

    #[test]
    fn test_empty_dashboard() {
        let (_temp_dir, storage) = create_test_storage();
        let dashboard = DashboardSummary::generate(&storage, date(1, 1), 5).unwrap();

        assert!(dashboard.wallets.is_empty());
        assert!(dashboard.total_balance.is_zero());
        assert!(dashboard.recent.is_empty());
        assert!(dashboard.format_terminal("₫").contains("Total balance: 0 ₫"));
    }
}
