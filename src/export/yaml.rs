//! YAML Export functionality
//!
//! The same snapshot as the JSON export, in a format that is easier to read.

use std::io::Write;

use crate::error::{LedgerError, LedgerResult};
use crate::export::json::FullExport;
use crate::storage::Storage;

/// Export the full ledger to YAML format
pub fn export_full_yaml<W: Write>(storage: &Storage, writer: &mut W) -> LedgerResult<()> {
    let export = FullExport::from_storage(storage)?;

    let header = format!(
        "# Pocket Ledger export\n# Generated: {}\n# App version: {}\n\n",
        export.exported_at, export.app_version
    );
    writer
        .write_all(header.as_bytes())
        .map_err(|e| LedgerError::Export(e.to_string()))?;

    serde_yaml::to_writer(writer, &export).map_err(|e| LedgerError::Export(e.to_string()))?;

    Ok(())
}

/// Read a YAML export back and check it
pub fn parse_yaml_export(yaml_str: &str) -> LedgerResult<FullExport> {
    let export: FullExport =
        serde_yaml::from_str(yaml_str).map_err(|e| LedgerError::Validation(e.to_string()))?;
    export.validate().map_err(LedgerError::Validation)?;
    Ok(export)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::LedgerPaths;
    use crate::models::{Category, Money, TransactionKind, Wallet};
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_yaml_export() {
        let (_temp_dir, storage) = create_test_storage();
        storage.wallets.upsert(Wallet::new("Momo", Money::new(5))).unwrap();
        storage
            .categories
            .upsert(Category::new("Groceries", "cart", "#27AE60", TransactionKind::Expense))
            .unwrap();

        let mut out = Vec::new();
        export_full_yaml(&storage, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("# Pocket Ledger export"));
        assert!(text.contains("Momo"));
        assert!(text.contains("Groceries"));

        // Comments are ignored by the parser
        let parsed = parse_yaml_export(&text).unwrap();
        assert_eq!(parsed.wallets.len(), 1);
        assert_eq!(parsed.categories[0].kind, TransactionKind::Expense);
    }
}
