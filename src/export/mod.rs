//! Export module for Pocket Ledger
//!
//! - CSV: transactions, for spreadsheets
//! - JSON: full ledger snapshot, machine-readable
//! - YAML: the same snapshot, human-readable

pub mod csv;
pub mod json;
pub mod yaml;

pub use self::csv::{export_transactions_csv, write_transactions_csv, UTF8_BOM};
pub use self::json::{export_full_json, parse_json_export, FullExport, EXPORT_SCHEMA_VERSION};
pub use self::yaml::{export_full_yaml, parse_yaml_export};
