//! Pocket Ledger - personal finance tracking with consistent wallet balances
//!
//! This library provides the core of the Pocket Ledger application: wallets,
//! income/expense/transfer categories, monthly budgets and transactions, with
//! a ledger engine that keeps every wallet's cached balance equal to its
//! initial balance plus the effect of its transactions.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (wallets, categories, budgets, transactions)
//! - `storage`: JSON file storage layer
//! - `services`: The ledger engine and entity services
//! - `reports`: Read-only summaries (dashboard, budget progress, spending)
//! - `export`: CSV, JSON and YAML export
//! - `audit`: Audit logging system
//! - `display`, `cli`: Terminal output and command handlers
//! - `logging`: Diagnostic `tracing` setup
//!
//! # Example
//!
//! ```rust,ignore
//! use pocket_ledger::config::{LedgerPaths, Settings};
//! use pocket_ledger::services::{LedgerService, NewTransaction};
//! use pocket_ledger::storage::Storage;
//!
//! let paths = LedgerPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let mut storage = Storage::new(paths)?;
//! storage.load_all()?;
//!
//! let ledger = LedgerService::with_settings(&storage, &settings);
//! ledger.add_transaction(NewTransaction::new(amount, when, food.id, cash.id))?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{LedgerError, LedgerResult};
