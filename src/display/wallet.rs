//! Wallet display formatting
//!
//! Formats wallets for terminal output in table and detail views.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::{Money, Wallet};

#[derive(Tabled)]
struct WalletRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Initial")]
    initial: String,
    #[tabled(rename = "Balance")]
    balance: String,
    #[tabled(rename = "ID")]
    id: String,
}

/// Format a list of wallets with a total row
pub fn format_wallet_list(wallets: &[Wallet], currency_symbol: &str) -> String {
    if wallets.is_empty() {
        return "No wallets found.\n\nCreate one with 'pocket wallet create <name>'.".to_string();
    }

    let mut rows: Vec<WalletRow> = wallets
        .iter()
        .map(|w| WalletRow {
            name: w.name.clone(),
            initial: w.initial_balance.format_with_symbol(currency_symbol),
            balance: w.current_balance().format_with_symbol(currency_symbol),
            id: w.id.to_string(),
        })
        .collect();

    let total: Money = wallets.iter().map(Wallet::current_balance).sum();
    rows.push(WalletRow {
        name: "TOTAL".to_string(),
        initial: String::new(),
        balance: total.format_with_symbol(currency_symbol),
        id: String::new(),
    });

    let mut table = Table::new(rows);
    table.with(Style::psql());
    table.to_string()
}

/// Format a single wallet's details
pub fn format_wallet_details(wallet: &Wallet, transaction_count: usize, currency_symbol: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Wallet: {}\n", wallet.name));
    output.push_str(&format!("  ID:             {}\n", wallet.id));
    output.push_str(&format!(
        "  Initial:        {}\n",
        wallet.initial_balance.format_with_symbol(currency_symbol)
    ));
    output.push_str(&format!(
        "  Balance:        {}\n",
        wallet.current_balance().format_with_symbol(currency_symbol)
    ));
    output.push_str(&format!("  Icon:           {}\n", wallet.icon_symbol));
    output.push_str(&format!("  Color:          {}\n", wallet.color_hex));
    output.push_str(&format!("  Transactions:   {}\n", transaction_count));
    output.push_str(&format!(
        "  Created:        {}\n",
        wallet.created_at.format("%Y-%m-%d %H:%M")
    ));

    output
}
