//! Category service
//!
//! Provides business logic for category management including CRUD operations
//! and the system transfer category. Deleting a category goes through the
//! ledger so that its transactions stop counting toward wallet balances.

use tracing::info;

use crate::audit::{AuditEntry, EntityType};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Category, CategoryId, TransactionKind, TRANSFER_CATEGORY_NAME};
use crate::storage::Storage;

use super::find_by_short_id;
use super::ledger::LedgerService;

/// Icon for categories created without one
pub const DEFAULT_CATEGORY_ICON: &str = "tag.fill";

/// Color for categories created without one
pub const DEFAULT_CATEGORY_COLOR: &str = "#95A5A6";

/// Service for category management
pub struct CategoryService<'a> {
    storage: &'a Storage,
}

/// Result of deleting a category
#[derive(Debug, Clone)]
pub struct CategoryDeletion {
    pub category: Category,
    /// Transactions left without a category
    pub transactions_detached: usize,
    /// Whether the category's budget was removed as well
    pub budget_removed: bool,
}

impl<'a> CategoryService<'a> {
    /// Create a new category service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new category
    pub fn create(
        &self,
        name: &str,
        kind: TransactionKind,
        icon_symbol: Option<&str>,
        color_hex: Option<&str>,
    ) -> LedgerResult<Category> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LedgerError::Validation("Category name cannot be empty".into()));
        }

        if kind == TransactionKind::Transfer {
            return Err(LedgerError::Validation(format!(
                "Transfer categories cannot be created; use the built-in '{}' category",
                TRANSFER_CATEGORY_NAME
            )));
        }

        if self.storage.categories.name_exists(name, kind, None)? {
            return Err(LedgerError::Duplicate {
                entity_type: "Category",
                identifier: format!("{} ({})", name, kind),
            });
        }

        let category = Category::new(
            name,
            icon_symbol.unwrap_or(DEFAULT_CATEGORY_ICON),
            color_hex.unwrap_or(DEFAULT_CATEGORY_COLOR),
            kind,
        );

        category
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        self.storage.categories.upsert(category.clone())?;
        self.storage.categories.save()?;

        self.storage.log_create(
            EntityType::Category,
            category.id.to_string(),
            Some(category.name.clone()),
            &category,
        )?;

        Ok(category)
    }

    /// Get a category by ID
    pub fn get(&self, id: CategoryId) -> LedgerResult<Option<Category>> {
        self.storage.categories.get(id)
    }

    /// Find a category by name or ID string
    ///
    /// Names are only unique per kind, so pass `kind` to disambiguate.
    pub fn find(
        &self,
        identifier: &str,
        kind: Option<TransactionKind>,
    ) -> LedgerResult<Option<Category>> {
        if let Some(category) = self.storage.categories.get_by_name(identifier, kind)? {
            return Ok(Some(category));
        }

        if let Ok(id) = identifier.parse::<CategoryId>() {
            return self.storage.categories.get(id);
        }

        let categories = self.list(kind)?;
        find_by_short_id(categories, identifier, |c| c.id, "categories")
    }

    /// Find a category or fail with `NotFound`
    pub fn require(
        &self,
        identifier: &str,
        kind: Option<TransactionKind>,
    ) -> LedgerResult<Category> {
        self.find(identifier, kind)?
            .ok_or_else(|| LedgerError::category_not_found(identifier))
    }

    /// List categories, optionally only one kind
    pub fn list(&self, kind: Option<TransactionKind>) -> LedgerResult<Vec<Category>> {
        match kind {
            Some(kind) => self.storage.categories.get_by_kind(kind),
            None => self.storage.categories.get_all(),
        }
    }

    /// Rename and/or restyle a category; its kind cannot change
    pub fn update(
        &self,
        id: CategoryId,
        name: Option<&str>,
        icon_symbol: Option<&str>,
        color_hex: Option<&str>,
    ) -> LedgerResult<Category> {
        let mut category = self
            .storage
            .categories
            .get(id)?
            .ok_or_else(|| LedgerError::category_not_found(id.to_string()))?;

        let before = category.clone();

        if let Some(new_name) = name {
            let new_name = new_name.trim();
            if new_name.is_empty() {
                return Err(LedgerError::Validation("Category name cannot be empty".into()));
            }

            if self
                .storage
                .categories
                .name_exists(new_name, category.kind, Some(id))?
            {
                return Err(LedgerError::Duplicate {
                    entity_type: "Category",
                    identifier: format!("{} ({})", new_name, category.kind),
                });
            }

            category.name = new_name.to_string();
        }

        category.restyle(
            icon_symbol.map(str::to_string),
            color_hex.map(str::to_string),
        );

        category
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        self.storage.categories.upsert(category.clone())?;
        self.storage.categories.save()?;

        self.storage.log_update(
            EntityType::Category,
            category.id.to_string(),
            Some(category.name.clone()),
            &before,
            &category,
        )?;

        Ok(category)
    }

    /// Delete a category
    ///
    /// Its transactions are kept but lose their category (and with it their
    /// effect on balances). A budget on the category is deleted too.
    pub fn delete(&self, id: CategoryId) -> LedgerResult<CategoryDeletion> {
        let category = self
            .storage
            .categories
            .get(id)?
            .ok_or_else(|| LedgerError::category_not_found(id.to_string()))?;

        // Detaching a transfer category would silently undo every transfer
        if category.kind == TransactionKind::Transfer {
            return Err(LedgerError::Validation(format!(
                "Category '{}' is used for transfers and cannot be deleted",
                category.name
            )));
        }

        let transactions_detached = LedgerService::new(self.storage).detach_category(id)?;

        let mut entries = Vec::new();
        let budget = self.storage.budgets.get_for_category(id)?;
        if let Some(budget) = &budget {
            self.storage.budgets.delete(budget.id)?;
            self.storage.budgets.save()?;
            entries.push(AuditEntry::delete(
                EntityType::Budget,
                budget.id.to_string(),
                Some(category.name.clone()),
                budget,
            ));
        }

        self.storage.categories.delete(id)?;
        self.storage.categories.save()?;
        entries.push(AuditEntry::delete(
            EntityType::Category,
            category.id.to_string(),
            Some(category.name.clone()),
            &category,
        ));
        self.storage.log_batch(&entries)?;

        info!(category = %id, transactions_detached, "category deleted");
        Ok(CategoryDeletion {
            category,
            transactions_detached,
            budget_removed: budget.is_some(),
        })
    }

    /// The transfer category, creating it if no transfer category exists
    pub fn ensure_transfer_category(&self) -> LedgerResult<Category> {
        if let Some(existing) = self.transfer_category()? {
            return Ok(existing);
        }

        info!("seeding transfer category");
        let category = Category::transfer();
        self.storage.categories.upsert(category.clone())?;
        self.storage.categories.save()?;

        self.storage.log_create(
            EntityType::Category,
            category.id.to_string(),
            Some(category.name.clone()),
            &category,
        )?;

        Ok(category)
    }

    /// The transfer category used for wallet-to-wallet moves, if any
    ///
    /// Prefers the one named "Transfer" when several exist.
    pub fn transfer_category(&self) -> LedgerResult<Option<Category>> {
        let transfers = self.storage.categories.get_by_kind(TransactionKind::Transfer)?;
        let named = transfers
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(TRANSFER_CATEGORY_NAME))
            .cloned();
        Ok(named.or_else(|| transfers.into_iter().next()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::LedgerPaths;
    use crate::models::{Budget, Money, Wallet};
    use crate::services::ledger::NewTransaction;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_create_category() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);

        let category = service
            .create("Groceries", TransactionKind::Expense, None, Some("#27AE60"))
            .unwrap();

        assert_eq!(category.name, "Groceries");
        assert_eq!(category.kind, TransactionKind::Expense);
        assert_eq!(category.icon_symbol, DEFAULT_CATEGORY_ICON);
        assert_eq!(category.color_hex, "#27AE60");
    }

    #[test]
    fn test_names_unique_per_kind() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);

        service
            .create("Other", TransactionKind::Expense, None, None)
            .unwrap();

        let dup = service.create("other", TransactionKind::Expense, None, None);
        assert!(matches!(dup, Err(LedgerError::Duplicate { .. })));

        // Same name under a different kind is fine
        service
            .create("Other", TransactionKind::Income, None, None)
            .unwrap();

        let income = service.find("Other", Some(TransactionKind::Income)).unwrap().unwrap();
        assert_eq!(income.kind, TransactionKind::Income);
    }

    #[test]
    fn test_list_by_kind() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);

        service.create("Salary", TransactionKind::Income, None, None).unwrap();
        service.create("Rent", TransactionKind::Expense, None, None).unwrap();
        service.create("Food", TransactionKind::Expense, None, None).unwrap();

        assert_eq!(service.list(None).unwrap().len(), 3);
        let names: Vec<_> = service
            .list(Some(TransactionKind::Expense))
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Food", "Rent"]);
    }

    #[test]
    fn test_update_keeps_kind() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);

        let category = service
            .create("Fun", TransactionKind::Expense, None, None)
            .unwrap();
        let updated = service
            .update(category.id, Some("Entertainment"), Some("gamecontroller"), None)
            .unwrap();

        assert_eq!(updated.name, "Entertainment");
        assert_eq!(updated.icon_symbol, "gamecontroller");
        assert_eq!(updated.kind, TransactionKind::Expense);

        let bad = service.update(category.id, None, None, Some("red"));
        assert!(bad.unwrap_err().is_validation());
    }

    #[test]
    fn test_delete_detaches_transactions_and_budget() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);

        let wallet = Wallet::new("Cash", Money::new(1_000));
        let wallet_id = wallet.id;
        storage.wallets.upsert(wallet).unwrap();

        let food = service
            .create("Food", TransactionKind::Expense, None, None)
            .unwrap();
        storage.budgets.upsert(Budget::new(food.id, Money::new(500))).unwrap();

        let date = NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let txn = LedgerService::new(&storage)
            .add_transaction(NewTransaction::new(Money::new(300), date, food.id, wallet_id))
            .unwrap();

        let deletion = service.delete(food.id).unwrap();

        assert_eq!(deletion.transactions_detached, 1);
        assert!(deletion.budget_removed);
        assert!(service.get(food.id).unwrap().is_none());
        assert!(storage.budgets.get_for_category(food.id).unwrap().is_none());

        let orphan = storage.transactions.get(txn.id).unwrap().unwrap();
        assert!(orphan.is_orphaned());
        assert_eq!(
            storage.wallets.get(wallet_id).unwrap().unwrap().current_balance(),
            Money::new(1_000)
        );
    }

    #[test]
    fn test_ensure_transfer_category() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);

        assert!(service.transfer_category().unwrap().is_none());

        let seeded = service.ensure_transfer_category().unwrap();
        assert_eq!(seeded.name, TRANSFER_CATEGORY_NAME);
        assert_eq!(seeded.kind, TransactionKind::Transfer);
        assert_eq!(seeded.color_hex, Category::transfer().color_hex);

        let again = service.ensure_transfer_category().unwrap();
        assert_eq!(again.id, seeded.id);
        assert_eq!(service.list(Some(TransactionKind::Transfer)).unwrap().len(), 1);
    }

    #[test]
    fn test_transfer_categories_cannot_be_created() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);

        let err = service
            .create("Savings move", TransactionKind::Transfer, None, None)
            .unwrap_err();

        assert!(err.is_validation());
        assert!(service.list(Some(TransactionKind::Transfer)).unwrap().is_empty());
    }

    #[test]
    fn test_transfer_category_cannot_be_deleted() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);

        let cash = Wallet::new("Cash", Money::new(1_000));
        let bank = Wallet::new("Bank", Money::zero());
        let (cash_id, bank_id) = (cash.id, bank.id);
        storage.wallets.upsert(cash).unwrap();
        storage.wallets.upsert(bank).unwrap();

        let transfer = service.ensure_transfer_category().unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let txn = LedgerService::new(&storage)
            .add_transaction(
                NewTransaction::new(Money::new(400), date, transfer.id, cash_id)
                    .destination(bank_id),
            )
            .unwrap();

        let err = service.delete(transfer.id).unwrap_err();
        assert!(err.is_validation());

        // The transfer still counts toward both wallets
        assert!(service.get(transfer.id).unwrap().is_some());
        let stored = storage.transactions.get(txn.id).unwrap().unwrap();
        assert_eq!(stored.category_id, Some(transfer.id));
        let balance = |id| storage.wallets.get(id).unwrap().unwrap().current_balance();
        assert_eq!(balance(cash_id), Money::new(600));
        assert_eq!(balance(bank_id), Money::new(400));
    }
}
