//! Storage initialization
//!
//! Handles first-run setup and the starter category set

use crate::config::paths::LedgerPaths;
use crate::error::LedgerError;
use crate::models::{Category, TransactionKind};

use super::categories::CategoryData;
use super::file_io::write_json_atomic;

/// Starter categories: (name, icon, color, kind)
const STARTER_CATEGORIES: &[(&str, &str, &str, TransactionKind)] = &[
    ("Salary", "dollarsign.circle.fill", "#2ECC71", TransactionKind::Income),
    ("Bonus", "gift.fill", "#27AE60", TransactionKind::Income),
    ("Food & Drink", "fork.knife", "#F1C40F", TransactionKind::Expense),
    ("Transport", "car.fill", "#E67E22", TransactionKind::Expense),
    ("Shopping", "bag.fill", "#9B59B6", TransactionKind::Expense),
    ("Bills", "doc.text.fill", "#E74C3C", TransactionKind::Expense),
];

/// Initialize storage for a fresh installation
///
/// Creates the data directory and, if no categories file exists yet, writes
/// the system Transfer category plus a few income and expense categories.
/// Returns `true` if categories were seeded.
pub fn initialize_storage(paths: &LedgerPaths) -> Result<bool, LedgerError> {
    paths.ensure_directories()?;

    if paths.categories_file().exists() {
        return Ok(false);
    }

    let mut categories = vec![Category::transfer()];
    categories.extend(
        STARTER_CATEGORIES
            .iter()
            .map(|(name, icon, color, kind)| Category::new(*name, *icon, *color, *kind)),
    );

    write_json_atomic(paths.categories_file(), &CategoryData { categories })?;
    Ok(true)
}

/// Check if storage needs initialization
pub fn needs_initialization(paths: &LedgerPaths) -> bool {
    !paths.categories_file().exists()
}
