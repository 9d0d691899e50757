//! End-to-end tests for the `pocket` binary

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn pocket(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("pocket").unwrap();
    cmd.env("POCKET_LEDGER_DATA_DIR", dir.path()).env_remove("POCKET_LOG");
    cmd
}

fn setup() -> TempDir {
    let dir = TempDir::new().unwrap();
    pocket(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Default categories have been created"));
    pocket(&dir)
        .args(["wallet", "create", "Cash", "--balance", "1,000,000"])
        .assert()
        .success();
    pocket(&dir)
        .args(["wallet", "create", "Bank"])
        .assert()
        .success();
    dir
}

#[test]
fn test_no_command_prints_help_hint() {
    let dir = TempDir::new().unwrap();
    pocket(&dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("pocket --help"));
}

#[test]
fn test_expense_and_transfer_move_balances() {
    let dir = setup();

    pocket(&dir)
        .args(["txn", "add", "Cash", "45000", "-c", "Transport", "-n", "Taxi"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cash balance: 955,000 ₫"));

    pocket(&dir)
        .args(["txn", "add", "Cash", "200,000", "-c", "Transfer", "--to", "Bank"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Bank balance: 200,000 ₫"));

    pocket(&dir)
        .args(["wallet", "show", "Cash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("755,000 ₫"));

    pocket(&dir)
        .args(["ledger", "verify"])
        .assert()
        .success()
        .stdout(predicate::str::contains("All wallet balances match"));
}

#[test]
fn test_insufficient_funds_rejected() {
    let dir = setup();

    pocket(&dir)
        .args(["txn", "add", "Bank", "10", "-c", "Bills"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Insufficient funds"));

    pocket(&dir)
        .args(["txn", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No transactions found."));
}

#[test]
fn test_transfer_requires_destination() {
    let dir = setup();

    pocket(&dir)
        .args(["txn", "add", "Cash", "10", "-c", "Transfer"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("destination wallet"));
}

#[test]
fn test_wallet_delete_needs_force() {
    let dir = setup();

    pocket(&dir)
        .args(["wallet", "delete", "Bank"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Use --force"));

    pocket(&dir)
        .args(["wallet", "delete", "Bank", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted wallet: Bank"));

    pocket(&dir)
        .args(["wallet", "show", "Bank"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Wallet not found: Bank"));
}

#[test]
fn test_csv_export_has_bom() {
    let dir = setup();
    pocket(&dir)
        .args(["txn", "add", "Cash", "30000", "-c", "Food & Drink", "-d", "2025-05-01"])
        .assert()
        .success();

    let out = dir.path().join("out.csv");
    pocket(&dir)
        .args(["export", "csv"])
        .arg(&out)
        .assert()
        .success();

    let bytes = std::fs::read(&out).unwrap();
    assert!(bytes.starts_with(b"\xEF\xBB\xBF"));
    let text = String::from_utf8(bytes[3..].to_vec()).unwrap();
    assert!(text.starts_with("Date,Time,Amount,Type,Category,Wallet,Note\n"));
    assert!(text.contains(",-30000,Expense,Food & Drink,Cash,"));
}

#[test]
fn test_budget_report() {
    let dir = setup();

    pocket(&dir)
        .args(["budget", "set", "Bills", "500,000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("500,000 ₫ per month"));

    pocket(&dir)
        .args(["budget", "set", "Salary", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expense categories"));

    pocket(&dir)
        .args(["report", "budgets"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Bills"));
}

#[test]
fn test_transfer_category_is_protected() {
    let dir = setup();

    pocket(&dir)
        .args(["category", "create", "Moves", "--kind", "transfer"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be created"));

    pocket(&dir)
        .args(["category", "delete", "Transfer", "--force"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be deleted"));
}

#[test]
fn test_fractional_amount_rejected() {
    let dir = setup();

    pocket(&dir)
        .args(["txn", "add", "Cash", "1.5", "-c", "Food & Drink"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid amount"));
}
