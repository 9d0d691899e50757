//! Wallet model
//!
//! Represents a named monetary account (cash, bank account, card) with a
//! cached running balance.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::WalletId;
use super::money::Money;

/// Default icon for newly created wallets
pub const DEFAULT_WALLET_ICON: &str = "wallet.pass";

/// Default color for newly created wallets
pub const DEFAULT_WALLET_COLOR: &str = "#2ECC71";

/// A user's wallet
///
/// `current_balance` is a cache of `initial_balance` plus the signed effect of
/// every transaction that references this wallet. Only the ledger engine in
/// `services::ledger` writes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wallet {
    /// Unique identifier
    pub id: WalletId,

    /// Wallet name (e.g., "Cash", "Vietcombank")
    pub name: String,

    /// Balance when the wallet was created
    pub initial_balance: Money,

    /// Running balance maintained by the ledger
    current_balance: Money,

    /// Icon symbol name for display
    #[serde(default = "default_icon")]
    pub icon_symbol: String,

    /// Hex color for display
    #[serde(default = "default_color")]
    pub color_hex: String,

    /// When the wallet was created
    pub created_at: DateTime<Utc>,

    /// When the wallet was last modified
    pub updated_at: DateTime<Utc>,
}

fn default_icon() -> String {
    DEFAULT_WALLET_ICON.to_string()
}

fn default_color() -> String {
    DEFAULT_WALLET_COLOR.to_string()
}

impl Wallet {
    /// Create a new wallet; the running balance starts at the initial balance
    pub fn new(name: impl Into<String>, initial_balance: Money) -> Self {
        let now = Utc::now();
        Self {
            id: WalletId::new(),
            name: name.into(),
            initial_balance,
            current_balance: initial_balance,
            icon_symbol: default_icon(),
            color_hex: default_color(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a wallet with a custom icon and color
    pub fn with_style(
        name: impl Into<String>,
        initial_balance: Money,
        icon_symbol: impl Into<String>,
        color_hex: impl Into<String>,
    ) -> Self {
        let mut wallet = Self::new(name, initial_balance);
        wallet.icon_symbol = icon_symbol.into();
        wallet.color_hex = color_hex.into();
        wallet
    }

    /// The cached running balance
    pub fn current_balance(&self) -> Money {
        self.current_balance
    }

    /// Adjust the running balance by a signed delta
    ///
    /// Returns the new balance, or `None` (leaving the wallet untouched) if
    /// the result does not fit.
    #[must_use]
    pub(crate) fn adjust_balance(&mut self, delta: Money) -> Option<Money> {
        let balance = self.current_balance.checked_add(delta)?;
        self.current_balance = balance;
        self.updated_at = Utc::now();
        Some(balance)
    }

    /// Overwrite the running balance (used when rebuilding from history)
    pub(crate) fn reset_balance(&mut self, balance: Money) {
        self.current_balance = balance;
        self.updated_at = Utc::now();
    }

    /// Rename the wallet
    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.updated_at = Utc::now();
    }

    /// Validate the wallet
    pub fn validate(&self) -> Result<(), WalletValidationError> {
        if self.name.trim().is_empty() {
            return Err(WalletValidationError::EmptyName);
        }

        if self.name.chars().count() > 100 {
            return Err(WalletValidationError::NameTooLong(self.name.chars().count()));
        }

        if !super::is_hex_color(&self.color_hex) {
            return Err(WalletValidationError::InvalidColor(self.color_hex.clone()));
        }

        let max = Money::MAX_AMOUNT;
        if self.initial_balance > max || self.initial_balance < -max {
            return Err(WalletValidationError::BalanceOutOfRange(self.initial_balance));
        }

        Ok(())
    }
}

impl fmt::Display for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.current_balance)
    }
}

/// Validation errors for wallets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletValidationError {
    EmptyName,
    NameTooLong(usize),
    InvalidColor(String),
    BalanceOutOfRange(Money),
}

impl fmt::Display for WalletValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Wallet name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Wallet name too long ({} chars, max 100)", len)
            }
            Self::InvalidColor(color) => {
                write!(f, "Invalid color '{}', expected #RRGGBB", color)
            }
            Self::BalanceOutOfRange(balance) => {
                write!(
                    f,
                    "Opening balance {} is out of range (max {})",
                    balance,
                    Money::MAX_AMOUNT
                )
            }
        }
    }
}

impl std::error::Error for WalletValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_wallet_starts_at_initial_balance() {
        let wallet = Wallet::new("Cash", Money::new(1_000_000));
        assert_eq!(wallet.name, "Cash");
        assert_eq!(wallet.initial_balance, Money::new(1_000_000));
        assert_eq!(wallet.current_balance(), Money::new(1_000_000));
    }

    #[test]
    fn test_adjust_balance_keeps_initial() {
        let mut wallet = Wallet::new("Cash", Money::new(1_000_000));
        assert_eq!(
            wallet.adjust_balance(Money::new(-200_000)),
            Some(Money::new(800_000))
        );
        assert_eq!(wallet.current_balance(), Money::new(800_000));
        assert_eq!(wallet.initial_balance, Money::new(1_000_000));

        wallet.reset_balance(Money::new(5));
        assert_eq!(wallet.current_balance(), Money::new(5));
    }

    #[test]
    fn test_validation() {
        let mut wallet = Wallet::new("Valid", Money::zero());
        assert!(wallet.validate().is_ok());

        wallet.name = "  ".into();
        assert_eq!(wallet.validate(), Err(WalletValidationError::EmptyName));

        wallet.name = "a".repeat(101);
        assert!(matches!(
            wallet.validate(),
            Err(WalletValidationError::NameTooLong(101))
        ));

        wallet.name = "Bank".into();
        wallet.color_hex = "green".into();
        assert!(matches!(
            wallet.validate(),
            Err(WalletValidationError::InvalidColor(_))
        ));

        let huge = Wallet::new("Vault", Money::new(i64::MAX));
        assert!(matches!(
            huge.validate(),
            Err(WalletValidationError::BalanceOutOfRange(_))
        ));
    }

    #[test]
    fn test_adjust_balance_overflow_leaves_wallet_untouched() {
        let mut wallet = Wallet::new("Cash", Money::new(1));
        assert_eq!(wallet.adjust_balance(Money::new(i64::MAX)), None);
        assert_eq!(wallet.current_balance(), Money::new(1));

        let mut wallet = Wallet::new("Card", Money::new(-1));
        assert_eq!(wallet.adjust_balance(Money::new(i64::MIN)), None);
        assert_eq!(wallet.current_balance(), Money::new(-1));
    }

    #[test]
    fn test_serialization_preserves_balance() {
        let mut wallet = Wallet::with_style("Bank", Money::new(10), "building.columns", "#3498DB");
        wallet.adjust_balance(Money::new(15)).unwrap();

        let json = serde_json::to_string(&wallet).unwrap();
        assert!(json.contains("\"current_balance\":25"));

        let deserialized: Wallet = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.id, wallet.id);
        assert_eq!(deserialized.current_balance(), Money::new(25));
        assert_eq!(deserialized.icon_symbol, "building.columns");
    }

    #[test]
    fn test_display() {
        let wallet = Wallet::new("Cash", Money::new(1_500));
        assert_eq!(format!("{}", wallet), "Cash (1,500)");
    }
}
