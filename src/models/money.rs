//! Money type for representing currency amounts
//!
//! Amounts are stored as whole units of the currency's smallest denomination
//! (an `i64`), so arithmetic is exact and every amount is finite.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// A monetary amount in the smallest unit of the configured currency
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Create a Money amount from raw units
    ///
    /// # Examples
    /// ```
    /// use pocket_ledger::models::Money;
    /// let amount = Money::new(200_000);
    /// assert_eq!(amount.to_string(), "200,000");
    /// ```
    pub const fn new(units: i64) -> Self {
        Self(units)
    }

    /// Largest magnitude accepted for a single amount or opening balance
    pub const MAX_AMOUNT: Money = Money(1_000_000_000_000_000);

    /// Create a zero Money amount
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Get the raw amount
    pub const fn units(&self) -> i64 {
        self.0
    }

    /// Check if the amount is zero
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Check if the amount is positive
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Check if the amount is negative
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Get the absolute value
    pub const fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Ratio of this amount to another, as a float (0 when `other` is zero)
    pub fn ratio_of(&self, other: Money) -> f64 {
        if other.is_zero() {
            0.0
        } else {
            self.0 as f64 / other.0 as f64
        }
    }

    /// Parse a money amount from a string
    ///
    /// Accepts plain digits or digits grouped in threes by one consistent
    /// separator (`,`, `.`, `_` or space), so "1,000,000" and "1.000.000"
    /// are both a million. An optional leading sign and a known currency
    /// symbol before or after the number are allowed. Fractional amounts
    /// ("1.5") and stray text are rejected.
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let trimmed = s.trim();

        let (negative, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
            (true, stripped)
        } else if let Some(stripped) = trimmed.strip_prefix('+') {
            (false, stripped)
        } else {
            (false, trimmed)
        };

        let body = strip_currency_symbol(rest.trim());
        let digits = ungroup(body).ok_or_else(|| MoneyParseError::InvalidFormat(s.to_string()))?;

        let value: i64 = digits
            .parse()
            .map_err(|_| MoneyParseError::OutOfRange(s.to_string()))?;
        if value > Self::MAX_AMOUNT.0 {
            return Err(MoneyParseError::OutOfRange(s.to_string()));
        }

        Ok(Self(if negative { -value } else { value }))
    }

    /// Add two amounts, `None` on overflow
    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Self)
    }

    /// Subtract an amount, `None` on overflow
    pub fn checked_sub(self, other: Money) -> Option<Money> {
        self.0.checked_sub(other.0).map(Self)
    }

    /// Add two amounts, clamping at the bounds of the representation
    pub fn saturating_add(self, other: Money) -> Money {
        Self(self.0.saturating_add(other.0))
    }

    /// Subtract an amount, clamping at the bounds of the representation
    pub fn saturating_sub(self, other: Money) -> Money {
        Self(self.0.saturating_sub(other.0))
    }

    /// Format with a currency symbol appended (e.g. "1,000,000 ₫")
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        if symbol.is_empty() {
            self.to_string()
        } else {
            format!("{} {}", self, symbol)
        }
    }
}

/// Currency markers accepted around a parsed amount
const CURRENCY_SYMBOLS: &[&str] = &["VND", "₫", "đ", "$", "€", "£", "¥"];

fn strip_currency_symbol(s: &str) -> &str {
    for symbol in CURRENCY_SYMBOLS {
        if let Some(rest) = s.strip_suffix(symbol) {
            return rest.trim_end();
        }
        if let Some(rest) = s.strip_prefix(symbol) {
            return rest.trim_start();
        }
    }
    s
}

/// Drop thousands separators; `None` when the grouping is malformed
fn ungroup(body: &str) -> Option<String> {
    let all_digits = |part: &str| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit());

    if all_digits(body) {
        return Some(body.to_string());
    }

    let separator = body.chars().find(|c| !c.is_ascii_digit())?;
    if !matches!(separator, ',' | '.' | '_' | ' ') {
        return None;
    }

    let mut groups = body.split(separator);
    let first = groups.next()?;
    if !all_digits(first) || first.len() > 3 {
        return None;
    }

    let mut digits = first.to_string();
    let mut grouped = false;
    for group in groups {
        if group.len() != 3 || !all_digits(group) {
            return None;
        }
        digits.push_str(group);
        grouped = true;
    }

    grouped.then_some(digits)
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.0.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        if self.is_negative() {
            f.pad(&format!("-{}", grouped))
        } else {
            f.pad(&grouped)
        }
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), Money::saturating_add)
    }
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    InvalidFormat(String),
    OutOfRange(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::InvalidFormat(s) => write!(f, "Invalid money format: {}", s),
            MoneyParseError::OutOfRange(s) => write!(f, "Amount out of range: {}", s),
        }
    }
}

impl std::error::Error for MoneyParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let m = Money::new(1050);
        assert_eq!(m.units(), 1050);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::new(0)), "0");
        assert_eq!(format!("{}", Money::new(999)), "999");
        assert_eq!(format!("{}", Money::new(1000)), "1,000");
        assert_eq!(format!("{}", Money::new(1_500_000)), "1,500,000");
        assert_eq!(format!("{}", Money::new(-200_000)), "-200,000");
    }

    #[test]
    fn test_display_respects_width() {
        assert_eq!(format!("{:>8}", Money::new(1000)), "   1,000");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::new(1000);
        let b = Money::new(500);

        assert_eq!((a + b).units(), 1500);
        assert_eq!((a - b).units(), 500);
        assert_eq!((-a).units(), -1000);

        let mut c = a;
        c -= b;
        c += Money::new(10);
        assert_eq!(c.units(), 510);
    }

    #[test]
    fn test_parse() {
        assert_eq!(Money::parse("250000").unwrap().units(), 250_000);
        assert_eq!(Money::parse("1,000,000").unwrap().units(), 1_000_000);
        assert_eq!(Money::parse("1.000.000").unwrap().units(), 1_000_000);
        assert_eq!(Money::parse("-500").unwrap().units(), -500);
        assert_eq!(Money::parse("+75").unwrap().units(), 75);
        assert_eq!(Money::parse("200,000 ₫").unwrap().units(), 200_000);
        assert_eq!(Money::parse(" 42 ").unwrap().units(), 42);
        assert_eq!(Money::parse("1 000 000").unwrap().units(), 1_000_000);
        assert_eq!(Money::parse("$1,500").unwrap().units(), 1_500);
        assert_eq!(Money::parse("-50.000 VND").unwrap().units(), -50_000);
    }

    #[test]
    fn test_parse_rejects_fractions() {
        // A dot is only a thousands separator, never a decimal point
        assert!(Money::parse("1.5").is_err());
        assert!(Money::parse("12.50").is_err());
        assert!(Money::parse("1,0000").is_err());
    }

    #[test]
    fn test_parse_rejects_mixed_separators() {
        assert!(Money::parse("1,000.000").is_err());
        assert!(Money::parse("1.000,000").is_err());
        assert!(Money::parse("1,,000").is_err());
        assert!(Money::parse(",000").is_err());
    }

    #[test]
    fn test_parse_rejects_text_around_digits() {
        assert!(Money::parse("abc12xyz").is_err());
        assert!(Money::parse("12abc").is_err());
        assert!(Money::parse("USD 12").is_err());
        assert!(Money::parse("--5").is_err());
    }

    #[test]
    fn test_parse_caps_magnitude() {
        assert_eq!(
            Money::parse("1,000,000,000,000,000").unwrap(),
            Money::MAX_AMOUNT
        );
        assert!(matches!(
            Money::parse("1,000,000,000,000,001"),
            Err(MoneyParseError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_checked_arithmetic() {
        let max = Money::new(i64::MAX);
        assert_eq!(max.checked_add(Money::new(1)), None);
        assert_eq!(Money::new(i64::MIN).checked_sub(Money::new(1)), None);
        assert_eq!(
            Money::new(5).checked_add(Money::new(7)),
            Some(Money::new(12))
        );
        assert_eq!(max.saturating_add(Money::new(1)), max);
        assert_eq!(
            Money::new(i64::MIN).saturating_sub(Money::new(1)),
            Money::new(i64::MIN)
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Money::parse("").is_err());
        assert!(Money::parse("abc").is_err());
        assert!(Money::parse("12a34").is_err());
        assert!(matches!(
            Money::parse("99999999999999999999"),
            Err(MoneyParseError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_ratio_of() {
        assert_eq!(Money::new(50).ratio_of(Money::new(200)), 0.25);
        assert_eq!(Money::new(50).ratio_of(Money::zero()), 0.0);
    }

    #[test]
    fn test_format_with_symbol() {
        assert_eq!(Money::new(1_000).format_with_symbol("₫"), "1,000 ₫");
        assert_eq!(Money::new(1_000).format_with_symbol(""), "1,000");
    }

    #[test]
    fn test_sum() {
        let amounts = vec![Money::new(100), Money::new(200), Money::new(300)];
        let total: Money = amounts.into_iter().sum();
        assert_eq!(total.units(), 600);

        let huge: Money = vec![Money::new(i64::MAX), Money::new(1)].into_iter().sum();
        assert_eq!(huge, Money::new(i64::MAX));
    }

    #[test]
    fn test_serialization() {
        let m = Money::new(1050);
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, "1050");

        let deserialized: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(m, deserialized);
    }
}
