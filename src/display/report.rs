//! Report formatting utilities for terminal output

use crate::reports::BudgetProgressReport;
use crate::services::ledger::BalanceDiscrepancy;

/// Format a percentage with appropriate precision
pub fn format_percentage(pct: f64) -> String {
    if pct < 0.1 && pct > 0.0 {
        format!("{:.2}%", pct)
    } else if pct < 10.0 {
        format!("{:.1}%", pct)
    } else {
        format!("{:.0}%", pct)
    }
}

/// Create a simple bar chart representation
pub fn format_bar(value: f64, max_value: f64, width: usize) -> String {
    if max_value <= 0.0 || value <= 0.0 {
        return "░".repeat(width);
    }

    let filled = ((value / max_value) * width as f64).round() as usize;
    let filled = filled.min(width);

    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Format budget progress with one bar per budget
pub fn format_budget_progress(report: &BudgetProgressReport, currency_symbol: &str) -> String {
    if report.rows.is_empty() {
        return "No budgets set.\n\nSet one with 'pocket budget set <category> <limit>'.".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!("Budgets for {}\n", report.range));
    output.push_str(&"=".repeat(72));
    output.push('\n');

    for row in &report.rows {
        output.push_str(&format!(
            "{:<18} {} {:>6}  {} / {}{}\n",
            row.category_name,
            format_bar(row.progress, 1.0, 20),
            format_percentage(row.progress * 100.0),
            row.spent.format_with_symbol(currency_symbol),
            row.budget.limit.format_with_symbol(currency_symbol),
            if row.is_over_budget { "  OVER" } else { "" }
        ));
    }

    let over = report.over_budget_count();
    if over > 0 {
        output.push_str(&format!("\n{} budget(s) exceeded\n", over));
    }

    output
}

/// Format the result of a balance check
pub fn format_discrepancies(discrepancies: &[BalanceDiscrepancy], currency_symbol: &str) -> String {
    if discrepancies.is_empty() {
        return "All wallet balances match their transaction history.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:<20} {:>16} {:>16} {:>16}\n",
        "Wallet", "Stored", "Expected", "Drift"
    ));
    output.push_str(&"-".repeat(71));
    output.push('\n');

    for d in discrepancies {
        output.push_str(&format!(
            "{:<20} {:>16} {:>16} {:>16}\n",
            d.wallet_name,
            d.cached.format_with_symbol(currency_symbol),
            d.expected.format_with_symbol(currency_symbol),
            d.drift().format_with_symbol(currency_symbol)
        ));
    }

    output.push_str("\nRun 'pocket ledger rebuild' to repair.\n");
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, WalletId};

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(0.05), "0.05%");
        assert_eq!(format_percentage(5.5), "5.5%");
        assert_eq!(format_percentage(55.5), "56%");
    }

    #[test]
    fn test_format_bar() {
        assert_eq!(format_bar(0.5, 1.0, 4), "██░░");
        assert_eq!(format_bar(0.0, 1.0, 3), "░░░");
        assert_eq!(format_bar(2.0, 1.0, 2), "██");
    }

    #[test]
    fn test_discrepancies() {
        assert!(format_discrepancies(&[], "₫").starts_with("All wallet balances match"));

        let rows = vec![BalanceDiscrepancy {
            wallet_id: WalletId::new(),
            wallet_name: "Cash".into(),
            cached: Money::new(900),
            expected: Money::new(1_000),
        }];
        let output = format_discrepancies(&rows, "");
        assert!(output.contains("Cash"));
        assert!(output.contains("1,000"));
        assert!(output.contains("pocket ledger rebuild"));
    }
}
