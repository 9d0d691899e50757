//! Category model
//!
//! Categories classify transactions as income, expense, or transfer. The kind
//! decides how a transaction moves wallet balances.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::CategoryId;

/// Name of the system-seeded transfer category
pub const TRANSFER_CATEGORY_NAME: &str = "Transfer";

/// What a category's transactions do to wallet balances
///
/// Persisted as `"Income"`, `"Expense"` or `"Transfer"`. Any other stored value
/// fails to deserialize rather than falling back to a default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionKind {
    /// Money coming into a wallet (salary, bonus)
    Income,
    /// Money leaving a wallet (food, shopping)
    Expense,
    /// Money moving between two wallets
    Transfer,
}

impl TransactionKind {
    /// All kinds, in display order
    pub const ALL: [TransactionKind; 3] = [Self::Income, Self::Expense, Self::Transfer];

    /// Parse a kind leniently (case-insensitive, common aliases)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" | "in" => Some(Self::Income),
            "expense" | "out" | "spending" => Some(Self::Expense),
            "transfer" | "move" => Some(Self::Transfer),
            _ => None,
        }
    }

    /// The persisted string value
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "Income",
            Self::Expense => "Expense",
            Self::Transfer => "Transfer",
        }
    }

    /// Whether transactions of this kind need a destination wallet
    pub fn requires_destination(&self) -> bool {
        matches!(self, Self::Transfer)
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = UnknownKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| UnknownKindError(s.to_string()))
    }
}

/// Returned when a string does not name a transaction kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKindError(pub String);

impl fmt::Display for UnknownKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unknown transaction type '{}'. Valid types: income, expense, transfer",
            self.0
        )
    }
}

impl std::error::Error for UnknownKindError {}

/// A transaction category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier
    pub id: CategoryId,

    /// Category name
    pub name: String,

    /// Icon symbol name for display
    pub icon_symbol: String,

    /// Hex color for display
    pub color_hex: String,

    /// Income, expense or transfer; fixed after creation
    #[serde(rename = "type")]
    pub kind: TransactionKind,

    /// When the category was created
    pub created_at: DateTime<Utc>,

    /// When the category was last modified
    pub updated_at: DateTime<Utc>,
}

impl Category {
    /// Create a new category
    pub fn new(
        name: impl Into<String>,
        icon_symbol: impl Into<String>,
        color_hex: impl Into<String>,
        kind: TransactionKind,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: CategoryId::new(),
            name: name.into(),
            icon_symbol: icon_symbol.into(),
            color_hex: color_hex.into(),
            kind,
            created_at: now,
            updated_at: now,
        }
    }

    /// The system transfer category
    pub fn transfer() -> Self {
        Self::new(
            TRANSFER_CATEGORY_NAME,
            "arrow.left.arrow.right",
            "#3498DB",
            TransactionKind::Transfer,
        )
    }

    /// Change the display attributes; the kind is never touched
    pub fn restyle(&mut self, icon_symbol: Option<String>, color_hex: Option<String>) {
        if let Some(icon) = icon_symbol {
            self.icon_symbol = icon;
        }
        if let Some(color) = color_hex {
            self.color_hex = color;
        }
        self.updated_at = Utc::now();
    }

    /// Validate the category
    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        if self.name.trim().is_empty() {
            return Err(CategoryValidationError::EmptyName);
        }

        if self.name.chars().count() > 50 {
            return Err(CategoryValidationError::NameTooLong(self.name.chars().count()));
        }

        if !super::is_hex_color(&self.color_hex) {
            return Err(CategoryValidationError::InvalidColor(self.color_hex.clone()));
        }

        Ok(())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.name, self.kind)
    }
}

/// Validation errors for categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryValidationError {
    EmptyName,
    NameTooLong(usize),
    InvalidColor(String),
}

impl fmt::Display for CategoryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Category name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Category name too long ({} chars, max 50)", len)
            }
            Self::InvalidColor(color) => {
                write!(f, "Invalid color '{}', expected #RRGGBB", color)
            }
        }
    }
}

impl std::error::Error for CategoryValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_category() {
        let category = Category::new("Food", "fork.knife", "#E74C3C", TransactionKind::Expense);
        assert_eq!(category.name, "Food");
        assert_eq!(category.kind, TransactionKind::Expense);
        assert!(category.validate().is_ok());
    }

    #[test]
    fn test_transfer_category() {
        let category = Category::transfer();
        assert_eq!(category.name, TRANSFER_CATEGORY_NAME);
        assert!(category.kind.requires_destination());
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!(TransactionKind::parse("income"), Some(TransactionKind::Income));
        assert_eq!(TransactionKind::parse("EXPENSE"), Some(TransactionKind::Expense));
        assert_eq!(TransactionKind::parse(" Transfer "), Some(TransactionKind::Transfer));
        assert_eq!(TransactionKind::parse("refund"), None);
        assert!("refund".parse::<TransactionKind>().is_err());
    }

    #[test]
    fn test_kind_serializes_as_raw_value() {
        let json = serde_json::to_string(&TransactionKind::Transfer).unwrap();
        assert_eq!(json, "\"Transfer\"");
    }

    #[test]
    fn test_unknown_kind_is_rejected_on_load() {
        let category = Category::new("Food", "fork.knife", "#E74C3C", TransactionKind::Expense);
        let json = serde_json::to_string(&category)
            .unwrap()
            .replace("\"Expense\"", "\"Gift\"");

        let result: Result<Category, _> = serde_json::from_str(&json);
        let err = result.unwrap_err().to_string();
        assert!(err.contains("Gift"));
    }

    #[test]
    fn test_restyle_keeps_kind() {
        let mut category = Category::new("Salary", "banknote", "#2ECC71", TransactionKind::Income);
        category.restyle(Some("dollarsign".into()), None);
        assert_eq!(category.icon_symbol, "dollarsign");
        assert_eq!(category.color_hex, "#2ECC71");
        assert_eq!(category.kind, TransactionKind::Income);
    }

    #[test]
    fn test_validation() {
        let mut category = Category::new("", "tag", "#000000", TransactionKind::Expense);
        assert_eq!(category.validate(), Err(CategoryValidationError::EmptyName));

        category.name = "x".repeat(51);
        assert!(matches!(
            category.validate(),
            Err(CategoryValidationError::NameTooLong(51))
        ));

        category.name = "Ok".into();
        category.color_hex = "#12345".into();
        assert!(matches!(
            category.validate(),
            Err(CategoryValidationError::InvalidColor(_))
        ));
    }

    #[test]
    fn test_display() {
        let category = Category::new("Food", "fork.knife", "#E74C3C", TransactionKind::Expense);
        assert_eq!(format!("{}", category), "Food [Expense]");
    }
}
