//! Category repository for JSON storage
//!
//! Manages loading and saving categories to categories.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::LedgerError;
use crate::models::{Category, CategoryId, TransactionKind};

use super::file_io::{read_json, write_json_atomic};

/// Serializable category data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub(crate) struct CategoryData {
    pub categories: Vec<Category>,
}

/// Repository for category persistence
pub struct CategoryRepository {
    path: PathBuf,
    categories: RwLock<HashMap<CategoryId, Category>>,
}

impl CategoryRepository {
    /// Create a new category repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            categories: RwLock::new(HashMap::new()),
        }
    }

    /// Load categories from disk
    ///
    /// Fails if any stored category has a `type` outside Income, Expense and
    /// Transfer.
    pub fn load(&self) -> Result<(), LedgerError> {
        let file_data: CategoryData = read_json(&self.path)?;

        let mut categories = self
            .categories
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        categories.clear();
        for category in file_data.categories {
            categories.insert(category.id, category);
        }

        Ok(())
    }

    /// Save categories to disk
    pub fn save(&self) -> Result<(), LedgerError> {
        let categories = self
            .categories
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut list: Vec<_> = categories.values().cloned().collect();
        list.sort_by_key(|c| c.created_at);

        write_json_atomic(&self.path, &CategoryData { categories: list })
    }

    /// Get a category by ID
    pub fn get(&self, id: CategoryId) -> Result<Option<Category>, LedgerError> {
        let categories = self
            .categories
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(categories.get(&id).cloned())
    }

    /// Get all categories, grouped by kind then sorted by name
    pub fn get_all(&self) -> Result<Vec<Category>, LedgerError> {
        let categories = self
            .categories
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut list: Vec<_> = categories.values().cloned().collect();
        list.sort_by(|a, b| {
            kind_order(a.kind)
                .cmp(&kind_order(b.kind))
                .then(a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        });
        Ok(list)
    }

    /// Get all categories of one kind, sorted by name
    pub fn get_by_kind(&self, kind: TransactionKind) -> Result<Vec<Category>, LedgerError> {
        Ok(self
            .get_all()?
            .into_iter()
            .filter(|c| c.kind == kind)
            .collect())
    }

    /// Get a category by name (case-insensitive), optionally restricted to a kind
    pub fn get_by_name(
        &self,
        name: &str,
        kind: Option<TransactionKind>,
    ) -> Result<Option<Category>, LedgerError> {
        let name_lower = name.trim().to_lowercase();
        Ok(self
            .get_all()?
            .into_iter()
            .find(|c| c.name.to_lowercase() == name_lower && kind.map_or(true, |k| c.kind == k)))
    }

    /// Check if a name is already used by another category of the same kind
    pub fn name_exists(
        &self,
        name: &str,
        kind: TransactionKind,
        exclude_id: Option<CategoryId>,
    ) -> Result<bool, LedgerError> {
        let categories = self
            .categories
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let name_lower = name.trim().to_lowercase();
        Ok(categories.values().any(|c| {
            c.kind == kind && c.name.to_lowercase() == name_lower && Some(c.id) != exclude_id
        }))
    }

    /// Insert or update a category
    pub fn upsert(&self, category: Category) -> Result<(), LedgerError> {
        let mut categories = self
            .categories
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        categories.insert(category.id, category);
        Ok(())
    }

    /// Delete a category
    pub fn delete(&self, id: CategoryId) -> Result<bool, LedgerError> {
        let mut categories = self
            .categories
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        Ok(categories.remove(&id).is_some())
    }

    /// Count categories
    pub fn count(&self) -> Result<usize, LedgerError> {
        let categories = self
            .categories
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(categories.len())
    }
}

fn kind_order(kind: TransactionKind) -> u8 {
    match kind {
        TransactionKind::Income => 0,
        TransactionKind::Expense => 1,
        TransactionKind::Transfer => 2,
    }
}
