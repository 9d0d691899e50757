//! User settings for Pocket Ledger
//!
//! Currency display, calendar preferences, and the ledger's funds policy.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use super::paths::LedgerPaths;
use crate::error::LedgerError;
use crate::models::DateRange;

/// User settings for Pocket Ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// ISO currency code shown in exports
    #[serde(default = "default_currency_code")]
    pub currency_code: String,

    /// Currency symbol appended to amounts
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// First day of the week for weekly reports
    #[serde(default = "default_first_day_of_week")]
    pub first_day_of_week: Weekday,

    /// Reject expenses and transfers larger than the source wallet's balance
    #[serde(default = "default_enforce_sufficient_funds")]
    pub enforce_sufficient_funds: bool,

    /// How many transactions the dashboard lists
    #[serde(default = "default_recent_transactions_limit")]
    pub recent_transactions_limit: usize,

    /// Whether initial setup has been completed
    #[serde(default)]
    pub setup_completed: bool,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency_code() -> String {
    "VND".to_string()
}

fn default_currency_symbol() -> String {
    "₫".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_first_day_of_week() -> Weekday {
    Weekday::Mon
}

fn default_enforce_sufficient_funds() -> bool {
    true
}

fn default_recent_transactions_limit() -> usize {
    5
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_code: default_currency_code(),
            currency_symbol: default_currency_symbol(),
            date_format: default_date_format(),
            first_day_of_week: default_first_day_of_week(),
            enforce_sufficient_funds: default_enforce_sufficient_funds(),
            recent_transactions_limit: default_recent_transactions_limit(),
            setup_completed: false,
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &LedgerPaths) -> Result<Self, LedgerError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| LedgerError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                LedgerError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &LedgerPaths) -> Result<(), LedgerError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| LedgerError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| LedgerError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// The week containing `day`, honoring `first_day_of_week`
    pub fn week_of(&self, day: chrono::NaiveDate) -> DateRange {
        DateRange::week_of(day, self.first_day_of_week)
    }

    /// Format an amount with the configured currency symbol
    pub fn format_money(&self, amount: crate::models::Money) -> String {
        amount.format_with_symbol(&self.currency_symbol)
    }
}
