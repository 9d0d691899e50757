//! CSV Export functionality
//!
//! Exports transactions in a spreadsheet-friendly layout, one row per
//! transaction, newest first.

use std::collections::HashMap;
use std::io::Write;

use chrono::NaiveDate;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Category, CategoryId, Transaction, TransactionKind, Wallet, WalletId};
use crate::storage::Storage;

/// Byte-order mark so spreadsheet tools read the file as UTF-8
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Column headers
pub const CSV_HEADER: [&str; 7] = ["Date", "Time", "Amount", "Type", "Category", "Wallet", "Note"];

const NO_TYPE: &str = "Other";
const NO_CATEGORY: &str = "No category";
const NO_WALLET: &str = "No wallet";

fn export_err(e: impl std::fmt::Display) -> LedgerError {
    LedgerError::Export(e.to_string())
}

/// Export every transaction to CSV
pub fn export_transactions_csv<W: Write>(
    storage: &Storage,
    writer: &mut W,
    date_format: &str,
) -> LedgerResult<()> {
    let transactions = storage.transactions.get_all()?;
    write_transactions_csv(storage, &transactions, writer, date_format)
}

/// Export the given transactions to CSV, in the order given
pub fn write_transactions_csv<W: Write>(
    storage: &Storage,
    transactions: &[Transaction],
    writer: &mut W,
    date_format: &str,
) -> LedgerResult<()> {
    let categories: HashMap<CategoryId, Category> = storage
        .categories
        .get_all()?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();
    let wallets: HashMap<WalletId, Wallet> = storage
        .wallets
        .get_all()?
        .into_iter()
        .map(|w| (w.id, w))
        .collect();

    writer.write_all(UTF8_BOM).map_err(export_err)?;

    let mut csv = ::csv::WriterBuilder::new()
        .terminator(::csv::Terminator::Any(b'\n'))
        .from_writer(writer);
    csv.write_record(CSV_HEADER).map_err(export_err)?;

    for txn in transactions {
        let category = txn.category_id.and_then(|id| categories.get(&id));
        let wallet = wallets.get(&txn.wallet_id);
        csv.write_record(transaction_row(txn, category, wallet, date_format))
            .map_err(export_err)?;
    }

    csv.flush().map_err(export_err)?;
    Ok(())
}

/// The CSV fields for one transaction
pub fn transaction_row(
    txn: &Transaction,
    category: Option<&Category>,
    wallet: Option<&Wallet>,
    date_format: &str,
) -> [String; 7] {
    let kind = category.map(|c| c.kind);
    let prefix = match kind {
        Some(TransactionKind::Expense) => "-",
        Some(TransactionKind::Income) => "+",
        Some(TransactionKind::Transfer) | None => "",
    };

    [
        txn.date.format(date_format).to_string(),
        txn.date.format("%H:%M").to_string(),
        format!("{}{}", prefix, txn.amount.units()),
        kind.map_or(NO_TYPE, |k| k.as_str()).to_string(),
        category.map_or(NO_CATEGORY, |c| c.name.as_str()).to_string(),
        wallet.map_or(NO_WALLET, |w| w.name.as_str()).to_string(),
        txn.note.clone().unwrap_or_default(),
    ]
}

/// Suggested file name for an export made on `today`
pub fn default_file_name(today: NaiveDate) -> String {
    format!("pocket_export_{}.csv", today.format("%Y-%m-%d"))
}
