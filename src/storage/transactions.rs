//! Transaction repository for JSON storage
//!
//! Manages loading and saving transactions to transactions.json, with
//! in-memory indexes by wallet (either role) and by category.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::LedgerError;
use crate::models::{CategoryId, DateRange, Transaction, TransactionId, WalletId};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub(crate) struct TransactionData {
    pub transactions: Vec<Transaction>,
}

#[derive(Default)]
struct Indexes {
    /// wallet_id -> transactions that use it as source or destination
    by_wallet: HashMap<WalletId, Vec<TransactionId>>,
    /// category_id -> transactions in that category
    by_category: HashMap<CategoryId, Vec<TransactionId>>,
}

impl Indexes {
    fn insert(&mut self, txn: &Transaction) {
        self.by_wallet.entry(txn.wallet_id).or_default().push(txn.id);
        if let Some(dest) = txn.destination_wallet_id {
            if dest != txn.wallet_id {
                self.by_wallet.entry(dest).or_default().push(txn.id);
            }
        }
        if let Some(cat_id) = txn.category_id {
            self.by_category.entry(cat_id).or_default().push(txn.id);
        }
    }

    fn remove(&mut self, txn: &Transaction) {
        let wallets = std::iter::once(txn.wallet_id).chain(txn.destination_wallet_id);
        for wallet_id in wallets {
            if let Some(ids) = self.by_wallet.get_mut(&wallet_id) {
                ids.retain(|&id| id != txn.id);
            }
        }
        if let Some(cat_id) = txn.category_id {
            if let Some(ids) = self.by_category.get_mut(&cat_id) {
                ids.retain(|&id| id != txn.id);
            }
        }
    }

    fn clear(&mut self) {
        self.by_wallet.clear();
        self.by_category.clear();
    }
}

/// Repository for transaction persistence with indexing
pub struct TransactionRepository {
    path: PathBuf,
    data: RwLock<HashMap<TransactionId, Transaction>>,
    indexes: RwLock<Indexes>,
}

/// Newest first; ties broken by record creation time
fn newest_first(a: &Transaction, b: &Transaction) -> std::cmp::Ordering {
    b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at))
}

impl TransactionRepository {
    /// Create a new transaction repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            indexes: RwLock::new(Indexes::default()),
        }
    }

    /// Load transactions from disk and build indexes
    pub fn load(&self) -> Result<(), LedgerError> {
        let file_data: TransactionData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut indexes = self
            .indexes
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        indexes.clear();

        for txn in file_data.transactions {
            indexes.insert(&txn);
            data.insert(txn.id, txn);
        }

        Ok(())
    }

    /// Save transactions to disk, newest first
    pub fn save(&self) -> Result<(), LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut transactions: Vec<_> = data.values().cloned().collect();
        transactions.sort_by(newest_first);

        write_json_atomic(&self.path, &TransactionData { transactions })
    }

    /// Get a transaction by ID
    pub fn get(&self, id: TransactionId) -> Result<Option<Transaction>, LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).cloned())
    }

    /// Get all transactions, newest first
    pub fn get_all(&self) -> Result<Vec<Transaction>, LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut transactions: Vec<_> = data.values().cloned().collect();
        transactions.sort_by(newest_first);
        Ok(transactions)
    }

    fn collect_indexed(
        &self,
        pick: impl FnOnce(&Indexes) -> Option<Vec<TransactionId>>,
    ) -> Result<Vec<Transaction>, LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        let indexes = self
            .indexes
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let ids = pick(&indexes).unwrap_or_default();
        let mut transactions: Vec<_> = ids.iter().filter_map(|id| data.get(id).cloned()).collect();
        transactions.sort_by(newest_first);
        Ok(transactions)
    }

    /// Get transactions that use the wallet as source or destination
    pub fn get_by_wallet(&self, wallet_id: WalletId) -> Result<Vec<Transaction>, LedgerError> {
        self.collect_indexed(|idx| idx.by_wallet.get(&wallet_id).cloned())
    }

    /// Get transactions in a category
    pub fn get_by_category(&self, category_id: CategoryId) -> Result<Vec<Transaction>, LedgerError> {
        self.collect_indexed(|idx| idx.by_category.get(&category_id).cloned())
    }

    /// Get transactions whose date falls in the range
    pub fn get_in_range(&self, range: DateRange) -> Result<Vec<Transaction>, LedgerError> {
        Ok(self
            .get_all()?
            .into_iter()
            .filter(|t| range.contains(t.date))
            .collect())
    }

    /// Insert or update a transaction
    pub fn upsert(&self, txn: Transaction) -> Result<(), LedgerError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut indexes = self
            .indexes
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        if let Some(old) = data.get(&txn.id) {
            indexes.remove(old);
        }
        indexes.insert(&txn);
        data.insert(txn.id, txn);
        Ok(())
    }

    /// Delete a transaction, returning it if it existed
    pub fn delete(&self, id: TransactionId) -> Result<Option<Transaction>, LedgerError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut indexes = self
            .indexes
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let removed = data.remove(&id);
        if let Some(txn) = &removed {
            indexes.remove(txn);
        }
        Ok(removed)
    }

    /// Count transactions
    pub fn count(&self) -> Result<usize, LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.len())
    }
}
