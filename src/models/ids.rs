//! Identifiers for wallets, categories, budgets and transactions
//!
//! Each entity gets its own UUID newtype so a wallet ID can never be passed
//! where a category ID is expected. IDs print in a short `wal-1a2b3c4d` form
//! for listings; [`EntityId::matches_short`] lets that form be typed back in.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Fewest hex digits accepted when matching an abbreviated ID
pub const MIN_SHORT_ID_LEN: usize = 4;

/// Hex digits shown in the short form
const SHORT_ID_LEN: usize = 8;

/// Common behaviour of all entity IDs
pub trait EntityId: Copy + Eq + fmt::Display {
    /// Prefix of the short form, e.g. `"wal-"`
    const PREFIX: &'static str;

    fn uuid(&self) -> Uuid;

    /// Whether `input` is an abbreviation of this ID
    ///
    /// The prefix is optional and case is ignored; at least
    /// [`MIN_SHORT_ID_LEN`] characters of the UUID are required.
    fn matches_short(&self, input: &str) -> bool {
        let input = input.trim().to_ascii_lowercase();
        let hex = input.strip_prefix(Self::PREFIX).unwrap_or(&input);
        hex.len() >= MIN_SHORT_ID_LEN && self.uuid().to_string().starts_with(hex)
    }
}

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// A fresh random ID
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl EntityId for $name {
            const PREFIX: &'static str = $prefix;

            fn uuid(&self) -> Uuid {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let full = self.0.to_string();
                write!(f, "{}{}", $prefix, &full[..SHORT_ID_LEN])
            }
        }

        /// Parses a full UUID, with or without the prefix. Short forms are
        /// resolved against stored data instead, see `matches_short`.
        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                let s = s.strip_prefix($prefix).unwrap_or(s);
                Uuid::parse_str(s).map(Self)
            }
        }
    };
}

define_id!(
    /// Identifies a wallet
    WalletId,
    "wal-"
);
define_id!(
    /// Identifies a category
    CategoryId,
    "cat-"
);
define_id!(
    /// Identifies a monthly budget
    BudgetId,
    "bud-"
);
define_id!(
    /// Identifies a transaction
    TransactionId,
    "txn-"
);

#[cfg(test)]
mod tests {
    use super::*;

    const KNOWN: &str = "550e8400-e29b-41d4-a716-446655440000";

    #[test]
    fn test_display_is_prefixed_short_form() {
        let wallet: WalletId = KNOWN.parse().unwrap();
        let txn: TransactionId = KNOWN.parse().unwrap();

        assert_eq!(wallet.to_string(), "wal-550e8400");
        assert_eq!(txn.to_string(), "txn-550e8400");
    }

    #[test]
    fn test_parse_full_uuid_with_or_without_prefix() {
        let plain: CategoryId = KNOWN.parse().unwrap();
        let prefixed: CategoryId = format!("cat-{}", KNOWN).parse().unwrap();
        let padded: CategoryId = format!("  {}\n", KNOWN).parse().unwrap();

        assert_eq!(plain, prefixed);
        assert_eq!(plain, padded);
        assert_eq!(plain.as_uuid().to_string(), KNOWN);
    }

    #[test]
    fn test_short_form_needs_lookup() {
        let id = BudgetId::new();
        assert!(id.to_string().parse::<BudgetId>().is_err());
        // Another entity's prefix is not stripped
        assert!(format!("wal-{}", KNOWN).parse::<BudgetId>().is_err());
    }

    #[test]
    fn test_matches_short() {
        let id: TransactionId = KNOWN.parse().unwrap();

        assert!(id.matches_short("txn-550e8400"));
        assert!(id.matches_short("550E"));
        assert!(id.matches_short(KNOWN));
        assert!(!id.matches_short("550"));
        assert!(!id.matches_short("txn-"));
        assert!(!id.matches_short("wal-550e8400"));
        assert!(!id.matches_short("550f"));
    }

    #[test]
    fn test_new_ids_are_distinct() {
        let ids: std::collections::HashSet<_> = (0..100).map(|_| WalletId::new()).collect();
        assert_eq!(ids.len(), 100);
        assert!(!WalletId::default().as_uuid().is_nil());
    }

    #[test]
    fn test_serializes_as_bare_uuid() {
        let id: WalletId = KNOWN.parse().unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", KNOWN));

        let back: WalletId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
