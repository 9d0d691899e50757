//! Category display formatting
//!
//! Categories are listed grouped under their transaction kind.

use crate::models::{Category, TransactionKind};

/// Format categories grouped by kind, in Expense, Income, Transfer order
pub fn format_category_list(categories: &[Category]) -> String {
    if categories.is_empty() {
        return "No categories found.\n\nRun 'pocket init' to create the default categories."
            .to_string();
    }

    let mut output = String::new();
    let mut first = true;

    for kind in [
        TransactionKind::Expense,
        TransactionKind::Income,
        TransactionKind::Transfer,
    ] {
        let mut in_kind: Vec<&Category> = categories.iter().filter(|c| c.kind == kind).collect();
        if in_kind.is_empty() {
            continue;
        }
        in_kind.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

        if !first {
            output.push('\n');
        }
        first = false;

        output.push_str(&format!("{}\n", kind));
        for (i, category) in in_kind.iter().enumerate() {
            let prefix = if i == in_kind.len() - 1 { "└── " } else { "├── " };
            output.push_str(&format!(
                "  {}{}  [{} {}]\n",
                prefix, category.name, category.icon_symbol, category.color_hex
            ));
        }
    }

    output
}

/// Format a single category's details
pub fn format_category_details(category: &Category, transaction_count: usize) -> String {
    let mut output = String::new();

    output.push_str(&format!("Category: {}\n", category.name));
    output.push_str(&format!("  ID:      {}\n", category.id));
    output.push_str(&format!("  Type:    {}\n", category.kind));
    output.push_str(&format!("  Icon:    {}\n", category.icon_symbol));
    output.push_str(&format!("  Color:   {}\n", category.color_hex));
    output.push_str(&format!("  Used by: {} transaction(s)\n", transaction_count));

    output
}
