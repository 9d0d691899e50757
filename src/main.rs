use anyhow::Result;
use clap::{Parser, Subcommand};

use pocket_ledger::cli::{
    handle_budget_command, handle_category_command, handle_export_command,
    handle_ledger_command, handle_report_command, handle_transaction_command,
    handle_wallet_command,
};
use pocket_ledger::config::{LedgerPaths, Settings};
use pocket_ledger::models::range::parse_weekday;
use pocket_ledger::storage::{initialize_storage, Storage};

#[derive(Parser)]
#[command(
    name = "pocket",
    version,
    about = "Personal finance tracker with consistent wallet balances",
    long_about = "Pocket Ledger tracks income, expenses and transfers across your \
                  wallets. Every change goes through a ledger that keeps each \
                  wallet's balance equal to its opening balance plus its history."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the data directory and default categories
    Init,

    /// Show or change configuration
    Config {
        /// Currency symbol shown after amounts
        #[arg(long)]
        currency_symbol: Option<String>,
        /// First day of the week for reports (e.g., monday, sunday)
        #[arg(long)]
        first_day: Option<String>,
        /// Reject expenses and transfers a wallet cannot cover
        #[arg(long)]
        enforce_funds: Option<bool>,
    },

    /// Wallet management commands
    #[command(subcommand)]
    Wallet(pocket_ledger::cli::WalletCommands),

    /// Category management commands
    #[command(subcommand)]
    Category(pocket_ledger::cli::CategoryCommands),

    /// Monthly budget commands
    #[command(subcommand)]
    Budget(pocket_ledger::cli::BudgetCommands),

    /// Transaction management commands
    #[command(subcommand, alias = "txn")]
    Transaction(pocket_ledger::cli::TransactionCommands),

    /// Reports
    #[command(subcommand)]
    Report(pocket_ledger::cli::ReportCommands),

    /// Export data
    #[command(subcommand)]
    Export(pocket_ledger::cli::ExportCommands),

    /// Balance verification and repair
    #[command(subcommand)]
    Ledger(pocket_ledger::cli::LedgerCommands),
}

fn main() -> Result<()> {
    pocket_ledger::logging::init();

    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = LedgerPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;

    // Initialize storage
    let mut storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    match cli.command {
        Some(Commands::Init) => {
            println!("Initializing Pocket Ledger at: {}", paths.base_dir().display());
            let seeded = initialize_storage(&paths)?;
            settings.setup_completed = true;
            settings.save(&paths)?;
            storage.load_all()?;

            if seeded {
                println!("Default categories have been created:");
                for kind in ["Expense", "Income", "Transfer"] {
                    let names: Vec<String> = storage
                        .categories
                        .get_all()?
                        .into_iter()
                        .filter(|c| c.kind.as_str() == kind)
                        .map(|c| c.name)
                        .collect();
                    println!("  - {}: {}", kind, names.join(", "));
                }
            } else {
                println!("Already initialized; existing categories were kept.");
            }
            println!();
            println!("Next: 'pocket wallet create Cash --balance 500000'");
        }
        Some(Commands::Config {
            currency_symbol,
            first_day,
            enforce_funds,
        }) => {
            let mut changed = false;
            if let Some(symbol) = currency_symbol {
                settings.currency_symbol = symbol;
                changed = true;
            }
            if let Some(day) = first_day {
                settings.first_day_of_week = parse_weekday(&day).ok_or_else(|| {
                    anyhow::anyhow!("Invalid weekday '{}'. Use e.g. monday or sunday", day)
                })?;
                changed = true;
            }
            if let Some(enforce) = enforce_funds {
                settings.enforce_sufficient_funds = enforce;
                changed = true;
            }
            if changed {
                settings.save(&paths)?;
                println!("Settings saved.");
                println!();
            }

            println!("Pocket Ledger Configuration");
            println!("===========================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Audit log:        {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!(
                "  Currency:           {} ({})",
                settings.currency_code, settings.currency_symbol
            );
            println!("  Date format:        {}", settings.date_format);
            println!("  First day of week:  {}", settings.first_day_of_week);
            println!(
                "  Enforce funds:      {}",
                if settings.enforce_sufficient_funds {
                    "Yes"
                } else {
                    "No"
                }
            );
            println!("  Recent on dashboard: {}", settings.recent_transactions_limit);
        }
        Some(Commands::Wallet(cmd)) => handle_wallet_command(&storage, &settings, cmd)?,
        Some(Commands::Category(cmd)) => handle_category_command(&storage, cmd)?,
        Some(Commands::Budget(cmd)) => handle_budget_command(&storage, &settings, cmd)?,
        Some(Commands::Transaction(cmd)) => {
            handle_transaction_command(&storage, &settings, cmd)?
        }
        Some(Commands::Report(cmd)) => handle_report_command(&storage, &settings, cmd)?,
        Some(Commands::Export(cmd)) => handle_export_command(&storage, &settings, cmd)?,
        Some(Commands::Ledger(cmd)) => handle_ledger_command(&storage, &settings, cmd)?,
        None => {
            println!("Pocket Ledger - wallets, budgets and transactions");
            println!();
            println!("Run 'pocket --help' for usage information.");
            println!("Run 'pocket init' to get started.");
        }
    }

    Ok(())
}
