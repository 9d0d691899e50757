//! JSON Export functionality
//!
//! Exports the complete ledger to JSON format with schema versioning.

use std::collections::HashSet;
use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Budget, Category, Transaction, Wallet};
use crate::storage::Storage;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Full ledger export structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    /// Export timestamp
    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    pub wallets: Vec<Wallet>,
    pub categories: Vec<Category>,
    pub budgets: Vec<Budget>,
    pub transactions: Vec<Transaction>,

    /// Export metadata
    pub metadata: ExportMetadata,
}

/// Export metadata for reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub wallet_count: usize,
    pub category_count: usize,
    pub budget_count: usize,
    pub transaction_count: usize,

    /// Date of the earliest transaction
    pub earliest_transaction: Option<String>,

    /// Date of the latest transaction
    pub latest_transaction: Option<String>,
}

impl FullExport {
    /// Create a new full export from storage
    pub fn from_storage(storage: &Storage) -> LedgerResult<Self> {
        let wallets = storage.wallets.get_all()?;
        let categories = storage.categories.get_all()?;
        let budgets = storage.budgets.get_all()?;
        let transactions = storage.transactions.get_all()?;

        let earliest_transaction = transactions
            .iter()
            .map(|t| t.date)
            .min()
            .map(|d| d.to_string());
        let latest_transaction = transactions
            .iter()
            .map(|t| t.date)
            .max()
            .map(|d| d.to_string());

        let metadata = ExportMetadata {
            wallet_count: wallets.len(),
            category_count: categories.len(),
            budget_count: budgets.len(),
            transaction_count: transactions.len(),
            earliest_transaction,
            latest_transaction,
        };

        Ok(Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            wallets,
            categories,
            budgets,
            transactions,
            metadata,
        })
    }

    /// Check the schema version and that every reference resolves
    ///
    /// Orphaned transactions (no category) are valid; a category ID that
    /// points nowhere is not.
    pub fn validate(&self) -> Result<(), String> {
        if self.schema_version != EXPORT_SCHEMA_VERSION {
            return Err(format!(
                "Schema version mismatch: expected {}, got {}",
                EXPORT_SCHEMA_VERSION, self.schema_version
            ));
        }

        let wallet_ids: HashSet<_> = self.wallets.iter().map(|w| w.id).collect();
        let category_ids: HashSet<_> = self.categories.iter().map(|c| c.id).collect();

        for txn in &self.transactions {
            for wallet_id in std::iter::once(txn.wallet_id).chain(txn.destination_wallet_id) {
                if !wallet_ids.contains(&wallet_id) {
                    return Err(format!(
                        "Transaction {} references unknown wallet {}",
                        txn.id, wallet_id
                    ));
                }
            }
            if let Some(cat_id) = txn.category_id {
                if !category_ids.contains(&cat_id) {
                    return Err(format!(
                        "Transaction {} references unknown category {}",
                        txn.id, cat_id
                    ));
                }
            }
        }

        for budget in &self.budgets {
            if !category_ids.contains(&budget.category_id) {
                return Err(format!(
                    "Budget {} references unknown category {}",
                    budget.id, budget.category_id
                ));
            }
        }

        Ok(())
    }
}

/// Export the full ledger to JSON
pub fn export_full_json<W: Write>(
    storage: &Storage,
    writer: &mut W,
    pretty: bool,
) -> LedgerResult<()> {
    let export = FullExport::from_storage(storage)?;

    if pretty {
        serde_json::to_writer_pretty(writer, &export)
    } else {
        serde_json::to_writer(writer, &export)
    }
    .map_err(|e| LedgerError::Export(e.to_string()))?;

    Ok(())
}

/// Read a JSON export back and check it
pub fn parse_json_export(json_str: &str) -> LedgerResult<FullExport> {
    let export: FullExport = serde_json::from_str(json_str)?;
    export.validate().map_err(LedgerError::Validation)?;
    Ok(export)
}
