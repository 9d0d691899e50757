//! Transaction CLI commands
//!
//! Implements CLI commands for recording income, expenses and transfers.
//! Every mutation goes through the ledger so wallet balances stay in step.

use std::collections::HashMap;

use clap::Subcommand;

use crate::config::Settings;
use crate::display::transaction::{
    format_day_groups, format_transaction_details, DisplayContext,
};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{DateRange, TransactionKind, Wallet, WalletId};
use crate::services::{
    CategoryService, LedgerService, NewTransaction, TransactionFilter, TransactionService,
    WalletService,
};
use crate::storage::Storage;

use super::{parse_date, parse_date_time, parse_kind, parse_money, parse_time};

/// Transaction subcommands
#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Record a new transaction
    Add {
        /// Source wallet name or ID
        wallet: String,
        /// Amount (e.g., "45,000" or "45000")
        amount: String,
        /// Category name or ID; its kind decides income, expense or transfer
        #[arg(short, long)]
        category: String,
        /// Destination wallet, required for transfers
        #[arg(short, long)]
        to: Option<String>,
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
        /// Time (HH:MM), defaults to now
        #[arg(long)]
        time: Option<String>,
        /// Note
        #[arg(short, long)]
        note: Option<String>,
    },
    /// List transactions grouped by day, newest first
    List {
        /// Only transactions touching this wallet
        #[arg(short, long)]
        wallet: Option<String>,
        /// Only this category
        #[arg(short = 'C', long)]
        category: Option<String>,
        /// Only this kind (income, expense, transfer)
        #[arg(short, long)]
        kind: Option<String>,
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// End date, inclusive (YYYY-MM-DD)
        #[arg(long)]
        until: Option<String>,
        /// Text to look for in notes and category names
        #[arg(short, long)]
        search: Option<String>,
        /// Number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
    /// Show transaction details
    Show {
        /// Transaction ID (full, or the short "txn-" form)
        id: String,
    },
    /// Edit a transaction
    Edit {
        /// Transaction ID
        id: String,
        /// New amount
        #[arg(short, long)]
        amount: Option<String>,
        /// New category
        #[arg(short, long)]
        category: Option<String>,
        /// New source wallet
        #[arg(short, long)]
        wallet: Option<String>,
        /// New destination wallet (transfers)
        #[arg(short, long)]
        to: Option<String>,
        /// New date (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,
        /// New time (HH:MM)
        #[arg(long)]
        time: Option<String>,
        /// New note; pass an empty string to clear it
        #[arg(short, long)]
        note: Option<String>,
    },
    /// Delete a transaction and reverse its effect on balances
    Delete {
        /// Transaction ID
        id: String,
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
}

/// Handle a transaction command
pub fn handle_transaction_command(
    storage: &Storage,
    settings: &Settings,
    cmd: TransactionCommands,
) -> LedgerResult<()> {
    let service = TransactionService::new(storage);
    let ledger = LedgerService::with_settings(storage, settings);
    let wallets = WalletService::new(storage);
    let categories = CategoryService::new(storage);

    match cmd {
        TransactionCommands::Add {
            wallet,
            amount,
            category,
            to,
            date,
            time,
            note,
        } => {
            let wallet = wallets.require(&wallet)?;
            let category = categories.require(&category, None)?;
            let amount = parse_money(&amount)?;
            let when = parse_date_time(date.as_deref(), time.as_deref())?;

            let mut input = NewTransaction::new(amount, when, category.id, wallet.id);
            if let Some(note) = note {
                input = input.note(note);
            }
            if let Some(to) = to {
                input = input.destination(wallets.require(&to)?.id);
            }

            let txn = ledger.add_transaction(input)?;

            println!("Recorded {}:", category.kind.as_str().to_lowercase());
            println!("  ID:       {}", txn.id);
            println!("  Date:     {}", txn.date.format("%Y-%m-%d %H:%M"));
            println!("  Amount:   {}", settings.format_money(txn.amount));
            println!("  Category: {}", category.name);
            print_balances(&wallets, txn.wallet_id, txn.destination_wallet_id, settings)?;
        }

        TransactionCommands::List {
            wallet,
            category,
            kind,
            from,
            until,
            search,
            limit,
        } => {
            let mut filter = TransactionFilter::new().limit(limit);

            if let Some(name) = &wallet {
                filter = filter.wallet(wallets.require(name)?.id);
            }
            if let Some(name) = &category {
                filter = filter.category(categories.require(name, None)?.id);
            }
            if let Some(kind) = &kind {
                filter = filter.kind(parse_kind(kind)?);
            }
            if from.is_some() || until.is_some() {
                let start = match &from {
                    Some(s) => parse_date(s)?,
                    None => chrono::NaiveDate::MIN,
                };
                let end = match &until {
                    Some(s) => parse_date(s)?
                        .succ_opt()
                        .unwrap_or(chrono::NaiveDate::MAX),
                    None => chrono::NaiveDate::MAX,
                };
                filter = filter.range(DateRange::new(start, end));
            }
            if let Some(text) = search {
                filter = filter.search(text);
            }

            let groups = service.list_grouped(&filter)?;
            let category_map = service.category_map()?;
            let wallet_map = wallet_map(&wallets)?;
            let ctx = DisplayContext {
                categories: &category_map,
                wallets: &wallet_map,
                date_format: &settings.date_format,
                currency_symbol: &settings.currency_symbol,
            };

            print!("{}", format_day_groups(&groups, &ctx));
            let shown: usize = groups.iter().map(|g| g.transactions.len()).sum();
            println!("\nShowing {} transaction(s)", shown);
        }

        TransactionCommands::Show { id } => {
            let txn = service.require(&id)?;
            let category_map = service.category_map()?;
            let wallet_map = wallet_map(&wallets)?;
            let ctx = DisplayContext {
                categories: &category_map,
                wallets: &wallet_map,
                date_format: &settings.date_format,
                currency_symbol: &settings.currency_symbol,
            };
            print!("{}", format_transaction_details(&txn, &ctx));
        }

        TransactionCommands::Edit {
            id,
            amount,
            category,
            wallet,
            to,
            date,
            time,
            note,
        } => {
            let txn = service.require(&id)?;

            let mut input = match (NewTransaction::from_existing(&txn), &category) {
                (Some(input), _) => input,
                (None, Some(name)) => {
                    let category = categories.require(name, None)?;
                    NewTransaction::new(txn.amount, txn.date, category.id, txn.wallet_id)
                }
                (None, None) => {
                    return Err(LedgerError::Validation(format!(
                        "Transaction {} has no category; pass --category to edit it",
                        txn.id
                    )))
                }
            };

            if let Some(amount) = amount {
                input.amount = parse_money(&amount)?;
            }
            if let Some(name) = category {
                let category = categories.require(&name, None)?;
                input.category_id = category.id;
                if category.kind != TransactionKind::Transfer {
                    input.destination_wallet_id = None;
                }
            }
            if let Some(name) = wallet {
                input.wallet_id = wallets.require(&name)?.id;
            }
            if let Some(name) = to {
                input.destination_wallet_id = Some(wallets.require(&name)?.id);
            }
            if let Some(d) = &date {
                input.date = parse_date(d)?.and_time(input.date.time());
            }
            if let Some(t) = &time {
                input.date = input.date.date().and_time(parse_time(t)?);
            }
            if let Some(note) = note {
                input.note = Some(note);
            }

            let updated = ledger.update_transaction(txn.id, input)?;

            println!("Updated transaction: {}", updated.id);
            println!("  Date:   {}", updated.date.format("%Y-%m-%d %H:%M"));
            println!("  Amount: {}", settings.format_money(updated.amount));
            print_balances(
                &wallets,
                updated.wallet_id,
                updated.destination_wallet_id,
                settings,
            )?;
        }

        TransactionCommands::Delete { id, force } => {
            let txn = service.require(&id)?;

            if !force {
                println!("About to delete transaction:");
                println!("  Date:   {}", txn.date.format("%Y-%m-%d %H:%M"));
                println!("  Amount: {}", settings.format_money(txn.amount));
                if let Some(note) = txn.trimmed_note() {
                    println!("  Note:   {}", note);
                }
                println!();
                println!("Use --force to confirm deletion");
                return Ok(());
            }

            let deleted = ledger.delete_transaction(txn.id)?;
            println!(
                "Deleted transaction: {} ({} {})",
                deleted.id,
                deleted.date.format("%Y-%m-%d"),
                settings.format_money(deleted.amount)
            );
        }
    }

    Ok(())
}

fn wallet_map(wallets: &WalletService<'_>) -> LedgerResult<HashMap<WalletId, Wallet>> {
    Ok(wallets.list()?.into_iter().map(|w| (w.id, w)).collect())
}

fn print_balances(
    wallets: &WalletService<'_>,
    source: WalletId,
    destination: Option<WalletId>,
    settings: &Settings,
) -> LedgerResult<()> {
    for id in std::iter::once(source).chain(destination) {
        if let Some(wallet) = wallets.get(id)? {
            println!(
                "  {} balance: {}",
                wallet.name,
                settings.format_money(wallet.current_balance())
            );
        }
    }
    Ok(())
}
