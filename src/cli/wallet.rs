//! Wallet CLI commands
//!
//! Implements CLI commands for wallet management.

use clap::Subcommand;

use crate::config::Settings;
use crate::display::wallet::{format_wallet_details, format_wallet_list};
use crate::error::LedgerResult;
use crate::services::WalletService;
use crate::storage::Storage;

use super::parse_money;

/// Wallet subcommands
#[derive(Subcommand)]
pub enum WalletCommands {
    /// Create a new wallet
    Create {
        /// Wallet name
        name: String,
        /// Opening balance (e.g., "1,000,000" or "250000")
        #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
        balance: String,
        /// Icon symbol name
        #[arg(long)]
        icon: Option<String>,
        /// Color as #RRGGBB
        #[arg(long)]
        color: Option<String>,
    },
    /// List all wallets
    List,
    /// Show wallet details
    Show {
        /// Wallet name or ID
        wallet: String,
    },
    /// Rename or restyle a wallet
    Edit {
        /// Wallet name or ID
        wallet: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New icon symbol name
        #[arg(long)]
        icon: Option<String>,
        /// New color as #RRGGBB
        #[arg(long)]
        color: Option<String>,
    },
    /// Delete a wallet and every transaction that touches it
    Delete {
        /// Wallet name or ID
        wallet: String,
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
}

/// Handle a wallet command
pub fn handle_wallet_command(
    storage: &Storage,
    settings: &Settings,
    cmd: WalletCommands,
) -> LedgerResult<()> {
    let service = WalletService::new(storage);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        WalletCommands::Create {
            name,
            balance,
            icon,
            color,
        } => {
            let initial = parse_money(&balance)?;
            let wallet =
                service.create_styled(&name, initial, icon.as_deref(), color.as_deref())?;

            println!("Created wallet: {}", wallet.name);
            println!("  Balance: {}", wallet.current_balance().format_with_symbol(symbol));
            println!("  ID:      {}", wallet.id);
        }

        WalletCommands::List => {
            let wallets = service.list()?;
            println!("{}", format_wallet_list(&wallets, symbol));
        }

        WalletCommands::Show { wallet } => {
            let found = service.require(&wallet)?;
            let count = storage.transactions.get_by_wallet(found.id)?.len();
            print!("{}", format_wallet_details(&found, count, symbol));
        }

        WalletCommands::Edit {
            wallet,
            name,
            icon,
            color,
        } => {
            let found = service.require(&wallet)?;

            if name.is_none() && icon.is_none() && color.is_none() {
                println!("No changes specified. Use --name, --icon or --color.");
                return Ok(());
            }

            let updated =
                service.update(found.id, name.as_deref(), icon.as_deref(), color.as_deref())?;
            println!("Updated wallet: {}", updated.name);
        }

        WalletCommands::Delete { wallet, force } => {
            let found = service.require(&wallet)?;

            if !force {
                let count = storage.transactions.get_by_wallet(found.id)?.len();
                println!("About to delete wallet '{}'.", found.name);
                println!(
                    "{} transaction(s) touching it will be deleted and their effect on other wallets reversed.",
                    count
                );
                println!();
                println!("Use --force to confirm deletion");
                return Ok(());
            }

            let deletion = service.delete(found.id)?;
            println!(
                "Deleted wallet: {} ({} transaction(s) removed)",
                deletion.wallet.name, deletion.transactions_removed
            );
        }
    }

    Ok(())
}
