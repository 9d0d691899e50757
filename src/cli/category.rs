//! Category CLI commands
//!
//! Implements CLI commands for category management.

use clap::Subcommand;

use crate::display::category::{format_category_details, format_category_list};
use crate::error::LedgerResult;
use crate::services::CategoryService;
use crate::storage::Storage;

use super::parse_kind;

/// Category subcommands
#[derive(Subcommand)]
pub enum CategoryCommands {
    /// Create a new category
    Create {
        /// Category name
        name: String,
        /// Kind (income or expense; the transfer category is built in)
        #[arg(short, long, default_value = "expense")]
        kind: String,
        /// Icon symbol name
        #[arg(long)]
        icon: Option<String>,
        /// Color as #RRGGBB
        #[arg(long)]
        color: Option<String>,
    },
    /// List categories
    List {
        /// Only show one kind (income, expense, transfer)
        #[arg(short, long)]
        kind: Option<String>,
    },
    /// Show category details
    Show {
        /// Category name or ID
        category: String,
    },
    /// Rename or restyle a category
    Edit {
        /// Category name or ID
        category: String,
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
    /// Delete a category; its transactions are kept without a category
    Delete {
        /// Category name or ID
        category: String,
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
}

/// Handle a category command
pub fn handle_category_command(storage: &Storage, cmd: CategoryCommands) -> LedgerResult<()> {
    let service = CategoryService::new(storage);

    match cmd {
        CategoryCommands::Create {
            name,
            kind,
            icon,
            color,
        } => {
            let kind = parse_kind(&kind)?;
            let category = service.create(&name, kind, icon.as_deref(), color.as_deref())?;

            println!("Created category: {}", category.name);
            println!("  Type: {}", category.kind);
            println!("  ID:   {}", category.id);
        }

        CategoryCommands::List { kind } => {
            let kind = kind.as_deref().map(parse_kind).transpose()?;
            let categories = service.list(kind)?;
            print!("{}", format_category_list(&categories));
        }

        CategoryCommands::Show { category } => {
            let found = service.require(&category, None)?;
            let count = storage.transactions.get_by_category(found.id)?.len();
            print!("{}", format_category_details(&found, count));
        }

        CategoryCommands::Edit {
            category,
            name,
            icon,
            color,
        } => {
            let found = service.require(&category, None)?;

            if name.is_none() && icon.is_none() && color.is_none() {
                println!("No changes specified. Use --name, --icon or --color.");
                return Ok(());
            }

            let updated =
                service.update(found.id, name.as_deref(), icon.as_deref(), color.as_deref())?;
            println!("Updated category: {}", updated.name);
        }

        CategoryCommands::Delete { category, force } => {
            let found = service.require(&category, None)?;

            if !force {
                let count = storage.transactions.get_by_category(found.id)?.len();
                println!("About to delete category '{}' ({}).", found.name, found.kind);
                println!(
                    "{} transaction(s) will lose their category and their effect on wallet balances.",
                    count
                );
                println!();
                println!("Use --force to confirm deletion");
                return Ok(());
            }

            let deletion = service.delete(found.id)?;
            println!(
                "Deleted category: {} ({} transaction(s) detached{})",
                deletion.category.name,
                deletion.transactions_detached,
                if deletion.budget_removed {
                    ", budget removed"
                } else {
                    ""
                }
            );
        }
    }

    Ok(())
}
