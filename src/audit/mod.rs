//! Audit logging for Pocket Ledger
//!
//! Every create, update and delete on a wallet, category, budget or
//! transaction is appended to `audit.log` as one JSON line with before/after
//! snapshots. Updates carry a short summary of the fields that changed.
//!
//! ```rust,ignore
//! use pocket_ledger::audit::{AuditEntry, AuditLogger, EntityType};
//!
//! let logger = AuditLogger::new(paths.audit_log());
//! logger.log(&AuditEntry::create(
//!     EntityType::Wallet,
//!     wallet.id.to_string(),
//!     Some(wallet.name.clone()),
//!     &wallet,
//! ))?;
//! ```

mod diff;
mod entry;
mod logger;

pub use diff::summarize_changes;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
