//! Transaction model
//!
//! A transaction links an amount to a category and one or two wallets. The
//! amount is always stored non-negative; its direction comes from the
//! category's kind.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::category::{Category, TransactionKind};
use super::ids::{CategoryId, TransactionId, WalletId};
use super::money::Money;

/// Title shown for a transaction with neither a note nor a category
pub const FALLBACK_TITLE: &str = "Other transaction";

/// Icon shown for a transaction without a category
pub const FALLBACK_ICON: &str = "questionmark.circle";

/// Color shown for a transaction without a category
pub const FALLBACK_COLOR: &str = "#808080";

/// A financial transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier
    pub id: TransactionId,

    /// Amount (never negative)
    pub amount: Money,

    /// When the event happened, in local wall-clock time
    pub date: NaiveDateTime,

    /// Free-form note
    #[serde(default)]
    pub note: Option<String>,

    /// Category (None for orphaned transactions)
    pub category_id: Option<CategoryId>,

    /// Source wallet for expenses and transfers, credited wallet for income
    pub wallet_id: WalletId,

    /// Receiving wallet, set only for transfers
    #[serde(default)]
    pub destination_wallet_id: Option<WalletId>,

    /// When the record was created
    pub created_at: DateTime<Utc>,

    /// When the record was last modified
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a new transaction
    pub fn new(
        amount: Money,
        date: NaiveDateTime,
        category_id: Option<CategoryId>,
        wallet_id: WalletId,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: TransactionId::new(),
            amount,
            date,
            note: None,
            category_id,
            wallet_id,
            destination_wallet_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether this transaction references the wallet in either role
    pub fn touches_wallet(&self, wallet_id: WalletId) -> bool {
        self.wallet_id == wallet_id || self.destination_wallet_id == Some(wallet_id)
    }

    /// Whether the category link has been cleared
    pub fn is_orphaned(&self) -> bool {
        self.category_id.is_none()
    }

    /// The note with surrounding whitespace removed, if any text remains
    pub fn trimmed_note(&self) -> Option<&str> {
        self.note
            .as_deref()
            .map(str::trim)
            .filter(|note| !note.is_empty())
    }

    /// Title for lists: first line of the note, else the category name
    pub fn display_title(&self, category: Option<&Category>) -> String {
        if let Some(line) = self.trimmed_note().and_then(|note| note.lines().next()) {
            return line.trim().to_string();
        }

        category
            .map(|c| c.name.clone())
            .unwrap_or_else(|| FALLBACK_TITLE.to_string())
    }

    /// Icon for lists
    pub fn display_icon<'a>(&self, category: Option<&'a Category>) -> &'a str {
        category.map_or(FALLBACK_ICON, |c| c.icon_symbol.as_str())
    }

    /// Color for lists
    pub fn display_color<'a>(&self, category: Option<&'a Category>) -> &'a str {
        category.map_or(FALLBACK_COLOR, |c| c.color_hex.as_str())
    }

    /// The amount as it counts toward a net total
    ///
    /// Transfers only move money between wallets, so they count as zero.
    pub fn signed_amount(&self, kind: TransactionKind) -> Money {
        match kind {
            TransactionKind::Income => self.amount,
            TransactionKind::Expense => -self.amount,
            TransactionKind::Transfer => Money::zero(),
        }
    }

    /// Validate the fields that do not need other entities
    pub fn validate(&self) -> Result<(), TransactionValidationError> {
        if self.amount.is_negative() {
            return Err(TransactionValidationError::NegativeAmount(self.amount));
        }

        if self.destination_wallet_id == Some(self.wallet_id) {
            return Err(TransactionValidationError::SameWallet);
        }

        Ok(())
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.date.format("%Y-%m-%d %H:%M"), self.amount)?;
        if let Some(note) = self.trimmed_note() {
            write!(f, " {}", note)?;
        }
        Ok(())
    }
}

/// Validation errors for transactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionValidationError {
    NegativeAmount(Money),
    SameWallet,
}

impl fmt::Display for TransactionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeAmount(amount) => {
                write!(f, "Amount cannot be negative, got {}", amount)
            }
            Self::SameWallet => write!(f, "Source and destination wallet are the same"),
        }
    }
}

impl std::error::Error for TransactionValidationError {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, day)
            .unwrap()
            .and_hms_opt(hour, 30, 0)
            .unwrap()
    }

    fn food() -> Category {
        Category::new("Food", "fork.knife", "#E74C3C", TransactionKind::Expense)
    }

    #[test]
    fn test_new_transaction() {
        let wallet = WalletId::new();
        let txn = Transaction::new(Money::new(200_000), at(3, 12), None, wallet);

        assert_eq!(txn.amount, Money::new(200_000));
        assert_eq!(txn.wallet_id, wallet);
        assert!(txn.destination_wallet_id.is_none());
        assert!(txn.is_orphaned());
        assert!(txn.touches_wallet(wallet));
        assert!(!txn.touches_wallet(WalletId::new()));
    }

    #[test]
    fn test_display_title_prefers_first_note_line() {
        let category = food();
        let mut txn = Transaction::new(Money::new(1), at(1, 8), Some(category.id), WalletId::new());

        txn.note = Some("  Lunch with team \nsecond line".into());
        assert_eq!(txn.display_title(Some(&category)), "Lunch with team");

        txn.note = Some("   ".into());
        assert_eq!(txn.display_title(Some(&category)), "Food");

        txn.note = None;
        assert_eq!(txn.display_title(None), FALLBACK_TITLE);
    }

    #[test]
    fn test_display_icon_and_color_fallbacks() {
        let category = food();
        let txn = Transaction::new(Money::new(1), at(1, 8), None, WalletId::new());

        assert_eq!(txn.display_icon(Some(&category)), "fork.knife");
        assert_eq!(txn.display_color(Some(&category)), "#E74C3C");
        assert_eq!(txn.display_icon(None), FALLBACK_ICON);
        assert_eq!(txn.display_color(None), FALLBACK_COLOR);
    }

    #[test]
    fn test_signed_amount() {
        let txn = Transaction::new(Money::new(300), at(1, 8), None, WalletId::new());
        assert_eq!(txn.signed_amount(TransactionKind::Income), Money::new(300));
        assert_eq!(txn.signed_amount(TransactionKind::Expense), Money::new(-300));
        assert_eq!(txn.signed_amount(TransactionKind::Transfer), Money::zero());
    }

    #[test]
    fn test_validation() {
        let wallet = WalletId::new();
        let mut txn = Transaction::new(Money::new(-1), at(1, 8), None, wallet);
        assert!(matches!(
            txn.validate(),
            Err(TransactionValidationError::NegativeAmount(_))
        ));

        txn.amount = Money::zero();
        assert!(txn.validate().is_ok());

        txn.destination_wallet_id = Some(wallet);
        assert_eq!(txn.validate(), Err(TransactionValidationError::SameWallet));
    }

    #[test]
    fn test_serialization() {
        let mut txn = Transaction::new(Money::new(500_000), at(9, 18), None, WalletId::new());
        txn.destination_wallet_id = Some(WalletId::new());
        txn.note = Some("Top up".into());

        let json = serde_json::to_string(&txn).unwrap();
        let deserialized: Transaction = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized.id, txn.id);
        assert_eq!(deserialized.date, txn.date);
        assert_eq!(deserialized.destination_wallet_id, txn.destination_wallet_id);
        assert_eq!(deserialized.note.as_deref(), Some("Top up"));
    }

    #[test]
    fn test_display() {
        let mut txn = Transaction::new(Money::new(45_000), at(2, 7), None, WalletId::new());
        txn.note = Some("Coffee".into());
        assert_eq!(format!("{}", txn), "2025-03-02 07:30 45,000 Coffee");
    }
}
