//! Budget service
//!
//! Monthly limits on expense categories. Budgets are read-only with respect
//! to the ledger: nothing here touches wallets or transactions.

use crate::audit::EntityType;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Budget, BudgetId, CategoryId, Money, TransactionKind};
use crate::storage::Storage;

/// Service for budget management
pub struct BudgetService<'a> {
    storage: &'a Storage,
}

impl<'a> BudgetService<'a> {
    /// Create a new budget service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Set the monthly limit for an expense category
    ///
    /// Creates the budget if the category has none, otherwise updates it.
    pub fn set(&self, category_id: CategoryId, limit: Money) -> LedgerResult<Budget> {
        let category = self
            .storage
            .categories
            .get(category_id)?
            .ok_or_else(|| LedgerError::category_not_found(category_id.to_string()))?;

        if category.kind != TransactionKind::Expense {
            return Err(LedgerError::Validation(format!(
                "Budgets can only be set on expense categories; '{}' is {}",
                category.name, category.kind
            )));
        }

        match self.storage.budgets.get_for_category(category_id)? {
            Some(existing) => {
                let before = existing.clone();
                let mut budget = existing;
                budget.set_limit(limit);
                budget
                    .validate()
                    .map_err(|e| LedgerError::Validation(e.to_string()))?;

                self.storage.budgets.upsert(budget.clone())?;
                self.storage.budgets.save()?;

                self.storage.log_update(
                    EntityType::Budget,
                    budget.id.to_string(),
                    Some(category.name.clone()),
                    &before,
                    &budget,
                )?;
                Ok(budget)
            }
            None => {
                let budget = Budget::new(category_id, limit);
                budget
                    .validate()
                    .map_err(|e| LedgerError::Validation(e.to_string()))?;

                self.storage.budgets.upsert(budget.clone())?;
                self.storage.budgets.save()?;

                self.storage.log_create(
                    EntityType::Budget,
                    budget.id.to_string(),
                    Some(category.name.clone()),
                    &budget,
                )?;
                Ok(budget)
            }
        }
    }

    /// Get a budget by ID
    pub fn get(&self, id: BudgetId) -> LedgerResult<Option<Budget>> {
        self.storage.budgets.get(id)
    }

    /// Get the budget for a category
    pub fn get_for_category(&self, category_id: CategoryId) -> LedgerResult<Option<Budget>> {
        self.storage.budgets.get_for_category(category_id)
    }

    /// All budgets
    pub fn list(&self) -> LedgerResult<Vec<Budget>> {
        self.storage.budgets.get_all()
    }

    /// Delete a budget
    pub fn delete(&self, id: BudgetId) -> LedgerResult<Budget> {
        let budget = self
            .storage
            .budgets
            .get(id)?
            .ok_or_else(|| LedgerError::budget_not_found(id.to_string()))?;

        let category_name = self
            .storage
            .categories
            .get(budget.category_id)?
            .map(|c| c.name);

        self.storage.budgets.delete(id)?;
        self.storage.budgets.save()?;

        self.storage
            .log_delete(EntityType::Budget, budget.id.to_string(), category_name, &budget)?;

        Ok(budget)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::LedgerPaths;
    use crate::models::Category;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn add_category(storage: &Storage, name: &str, kind: TransactionKind) -> CategoryId {
        let category = Category::new(name, "tag", "#000000", kind);
        let id = category.id;
        storage.categories.upsert(category).unwrap();
        id
    }

    #[test]
    fn test_set_creates_then_updates() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BudgetService::new(&storage);
        let food = add_category(&storage, "Food", TransactionKind::Expense);

        let created = service.set(food, Money::new(2_000_000)).unwrap();
        let updated = service.set(food, Money::new(3_000_000)).unwrap();

        assert_eq!(created.id, updated.id);
        assert_eq!(updated.limit, Money::new(3_000_000));
        assert_eq!(service.list().unwrap().len(), 1);
        assert_eq!(
            service.get_for_category(food).unwrap().unwrap().limit,
            Money::new(3_000_000)
        );
    }

    #[test]
    fn test_set_rejects_non_expense_and_bad_limit() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BudgetService::new(&storage);
        let salary = add_category(&storage, "Salary", TransactionKind::Income);
        let food = add_category(&storage, "Food", TransactionKind::Expense);

        assert!(service.set(salary, Money::new(1)).unwrap_err().is_validation());
        assert!(service.set(food, Money::zero()).unwrap_err().is_validation());
        assert!(service
            .set(CategoryId::new(), Money::new(1))
            .unwrap_err()
            .is_not_found());
        assert!(service.list().unwrap().is_empty());
    }

    #[test]
    fn test_delete_budget() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BudgetService::new(&storage);
        let food = add_category(&storage, "Food", TransactionKind::Expense);

        let budget = service.set(food, Money::new(100)).unwrap();
        let deleted = service.delete(budget.id).unwrap();

        assert_eq!(deleted.id, budget.id);
        assert!(service.get(budget.id).unwrap().is_none());
        assert!(service.delete(budget.id).unwrap_err().is_not_found());
    }
}
