//! Transaction display formatting
//!
//! Register rows, day-grouped history, and the detail view.

use std::collections::HashMap;

use crate::models::{Category, CategoryId, Transaction, TransactionKind, Wallet, WalletId};
use crate::services::transaction::DayGroup;

/// Lookup tables the formatters need to name things
pub struct DisplayContext<'a> {
    pub categories: &'a HashMap<CategoryId, Category>,
    pub wallets: &'a HashMap<WalletId, Wallet>,
    pub date_format: &'a str,
    pub currency_symbol: &'a str,
}

impl DisplayContext<'_> {
    fn category(&self, txn: &Transaction) -> Option<&Category> {
        txn.category_id.and_then(|id| self.categories.get(&id))
    }

    fn wallet_name(&self, id: WalletId) -> &str {
        self.wallets.get(&id).map_or("(deleted wallet)", |w| w.name.as_str())
    }
}

/// Format a single transaction as a register row
pub fn format_transaction_row(txn: &Transaction, ctx: &DisplayContext<'_>) -> String {
    let category = ctx.category(txn);
    let kind = category.map(|c| c.kind);

    let amount = match kind {
        Some(TransactionKind::Expense) => format!("-{}", txn.amount),
        Some(TransactionKind::Income) => format!("+{}", txn.amount),
        _ => txn.amount.to_string(),
    };

    let wallets = match (kind, txn.destination_wallet_id) {
        (Some(TransactionKind::Transfer), Some(dest)) => format!(
            "{} ⇄ {}",
            ctx.wallet_name(txn.wallet_id),
            ctx.wallet_name(dest)
        ),
        _ => ctx.wallet_name(txn.wallet_id).to_string(),
    };

    format!(
        "{} {:5} {:24} {:>14}  {:20} {}",
        txn.id,
        txn.date.format("%H:%M"),
        truncate(&txn.display_title(category), 24),
        amount,
        truncate(&wallets, 20),
        if category.is_none() { "(no category)" } else { "" }
    )
    .trim_end()
    .to_string()
}

/// Format day groups, each with a header showing the day's net total
pub fn format_day_groups(groups: &[DayGroup], ctx: &DisplayContext<'_>) -> String {
    if groups.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let mut output = String::new();
    for (i, group) in groups.iter().enumerate() {
        if i > 0 {
            output.push('\n');
        }
        output.push_str(&format!(
            "{}  {}\n",
            group.day.format(ctx.date_format),
            group.total.format_with_symbol(ctx.currency_symbol)
        ));
        output.push_str(&"-".repeat(60));
        output.push('\n');
        for txn in &group.transactions {
            output.push_str(&format_transaction_row(txn, ctx));
            output.push('\n');
        }
    }

    output
}

/// Format transaction details for display
pub fn format_transaction_details(txn: &Transaction, ctx: &DisplayContext<'_>) -> String {
    let category = ctx.category(txn);
    let mut output = String::new();

    output.push_str(&format!("Transaction: {}\n", txn.id));
    output.push_str(&format!(
        "Date:        {} {}\n",
        txn.date.format(ctx.date_format),
        txn.date.format("%H:%M")
    ));
    output.push_str(&format!(
        "Amount:      {}\n",
        txn.amount.format_with_symbol(ctx.currency_symbol)
    ));

    match category {
        Some(c) => {
            output.push_str(&format!("Type:        {}\n", c.kind));
            output.push_str(&format!("Category:    {}\n", c.name));
        }
        None => output.push_str("Category:    (no category)\n"),
    }

    output.push_str(&format!("Wallet:      {}\n", ctx.wallet_name(txn.wallet_id)));
    if let Some(dest) = txn.destination_wallet_id {
        output.push_str(&format!("To wallet:   {}\n", ctx.wallet_name(dest)));
    }

    if let Some(note) = txn.trimmed_note() {
        output.push_str(&format!("Note:        {}\n", note));
    }

    output
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{}…", kept)
    }
}
