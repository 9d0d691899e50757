//! Ledger maintenance commands
//!
//! Checks cached wallet balances against the transaction history.

use clap::Subcommand;

use crate::config::Settings;
use crate::display::report::format_discrepancies;
use crate::error::LedgerResult;
use crate::services::LedgerService;
use crate::storage::Storage;

/// Ledger subcommands
#[derive(Subcommand, Debug)]
pub enum LedgerCommands {
    /// Report wallets whose balance disagrees with their transactions
    Verify,
    /// Recompute every wallet balance from its transactions
    Rebuild,
}

/// Handle ledger commands
pub fn handle_ledger_command(
    storage: &Storage,
    settings: &Settings,
    cmd: LedgerCommands,
) -> LedgerResult<()> {
    let ledger = LedgerService::with_settings(storage, settings);

    match cmd {
        LedgerCommands::Verify => {
            let discrepancies = ledger.verify_balances()?;
            print!(
                "{}",
                format_discrepancies(&discrepancies, &settings.currency_symbol)
            );
        }
        LedgerCommands::Rebuild => {
            let fixed = ledger.rebuild_balances()?;
            if fixed == 0 {
                println!("All wallet balances were already correct.");
            } else {
                println!("Rebuilt {} wallet balance(s).", fixed);
            }
        }
    }

    Ok(())
}
