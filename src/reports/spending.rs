//! Spending Report
//!
//! Expense totals for the current week, month or year, bucketed for a bar
//! chart, plus a per-category breakdown.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Months, NaiveDate, Weekday};

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Category, CategoryId, DateRange, Money, Transaction, TransactionKind};
use crate::storage::Storage;

/// Period covered by a spending report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportRange {
    /// Seven daily buckets
    Week,
    /// One bucket per calendar week, clipped to the month
    Month,
    /// Twelve monthly buckets
    Year,
}

impl ReportRange {
    /// The calendar range containing `today`
    pub fn range_for(&self, today: NaiveDate, first_weekday: Weekday) -> DateRange {
        match self {
            Self::Week => DateRange::week_of(today, first_weekday),
            Self::Month => DateRange::month_of(today),
            Self::Year => DateRange::year_of(today),
        }
    }
}

impl fmt::Display for ReportRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Week => write!(f, "Week"),
            Self::Month => write!(f, "Month"),
            Self::Year => write!(f, "Year"),
        }
    }
}

impl FromStr for ReportRange {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "week" | "w" => Ok(Self::Week),
            "month" | "m" => Ok(Self::Month),
            "year" | "y" => Ok(Self::Year),
            other => Err(LedgerError::Validation(format!(
                "Unknown report range '{}'. Valid ranges: week, month, year",
                other
            ))),
        }
    }
}

/// One bar of the spending chart
#[derive(Debug, Clone)]
pub struct SpendingBucket {
    /// Short label ("Mon", "8-14", "Mar")
    pub label: String,
    pub range: DateRange,
    pub amount: Money,
    /// Whether the bucket contains the report's "today"
    pub is_current: bool,
}

/// One slice of the category breakdown
#[derive(Debug, Clone)]
pub struct CategoryShare {
    pub category_id: CategoryId,
    pub name: String,
    pub icon_symbol: String,
    pub color_hex: String,
    pub amount: Money,
    /// Fraction of total spending, 0.0 to 1.0
    pub share: f64,
}

/// Spending Report
#[derive(Debug, Clone)]
pub struct SpendingReport {
    pub range_kind: ReportRange,
    pub range: DateRange,
    pub buckets: Vec<SpendingBucket>,
    /// Largest breakdown slice first
    pub categories: Vec<CategoryShare>,
    pub total_spent: Money,
    /// Total divided by the number of buckets
    pub average_spent: Money,
}

impl SpendingReport {
    /// Generate a spending report for the period containing `today`
    ///
    /// Only transactions in expense categories count. Transfers, income and
    /// uncategorized transactions are left out entirely.
    pub fn generate(
        storage: &Storage,
        range_kind: ReportRange,
        today: NaiveDate,
        first_weekday: Weekday,
    ) -> LedgerResult<Self> {
        let range = range_kind.range_for(today, first_weekday);

        let categories: HashMap<CategoryId, Category> = storage
            .categories
            .get_all()?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        let expenses: Vec<(Transaction, &Category)> = storage
            .transactions
            .get_in_range(range)?
            .into_iter()
            .filter_map(|t| {
                let category = categories.get(&t.category_id?)?;
                (category.kind == TransactionKind::Expense).then(|| (t, category))
            })
            .collect();

        let total_spent: Money = expenses.iter().map(|(t, _)| t.amount).sum();

        let buckets: Vec<SpendingBucket> = bucket_ranges(range_kind, range, first_weekday)
            .into_iter()
            .map(|(label, bucket)| SpendingBucket {
                amount: expenses
                    .iter()
                    .filter(|(t, _)| bucket.contains(t.date))
                    .map(|(t, _)| t.amount)
                    .sum(),
                is_current: bucket.contains_date(today),
                label,
                range: bucket,
            })
            .collect();

        let average_spent = if buckets.is_empty() {
            Money::zero()
        } else {
            Money::new(total_spent.units() / buckets.len() as i64)
        };

        Ok(Self {
            range_kind,
            range,
            categories: category_breakdown(&expenses, total_spent),
            buckets,
            total_spent,
            average_spent,
        })
    }

    /// The tallest bar, for scaling charts
    pub fn max_bucket(&self) -> Money {
        self.buckets
            .iter()
            .map(|b| b.amount)
            .max()
            .unwrap_or_else(Money::zero)
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, currency_symbol: &str) -> String {
        const BAR_WIDTH: i64 = 30;

        let mut output = String::new();
        output.push_str(&format!(
            "Spending by {}: {}\n",
            self.range_kind.to_string().to_lowercase(),
            self.range
        ));
        output.push_str(&"=".repeat(60));
        output.push('\n');
        output.push_str(&format!(
            "Total spent:   {}\n",
            self.total_spent.format_with_symbol(currency_symbol)
        ));
        output.push_str(&format!(
            "Average:       {}\n\n",
            self.average_spent.format_with_symbol(currency_symbol)
        ));

        let max = self.max_bucket().units();
        for bucket in &self.buckets {
            let len = if max > 0 {
                bucket.amount.units() * BAR_WIDTH / max
            } else {
                0
            };
            output.push_str(&format!(
                "{} {:<6} {:<30} {:>14}\n",
                if bucket.is_current { ">" } else { " " },
                bucket.label,
                "#".repeat(len as usize),
                bucket.amount
            ));
        }

        if !self.categories.is_empty() {
            output.push('\n');
            output.push_str(&format!("{:<30} {:>14} {:>7}\n", "Category", "Amount", "Share"));
            output.push_str(&"-".repeat(60));
            output.push('\n');
            for share in &self.categories {
                output.push_str(&format!(
                    "{:<30} {:>14} {:>6.1}%\n",
                    share.name,
                    share.amount,
                    share.share * 100.0
                ));
            }
        }

        output
    }
}

fn bucket_ranges(
    range_kind: ReportRange,
    range: DateRange,
    first_weekday: Weekday,
) -> Vec<(String, DateRange)> {
    match range_kind {
        ReportRange::Week => range
            .days()
            .map(|day| (weekday_label(day.weekday()).to_string(), DateRange::day_of(day)))
            .collect(),
        ReportRange::Month => range
            .week_slices(first_weekday)
            .into_iter()
            .map(|slice| {
                let label = format!("{}-{}", slice.start.day(), slice.last_day().day());
                (label, slice)
            })
            .collect(),
        ReportRange::Year => (0..12)
            .filter_map(|offset| range.start.checked_add_months(Months::new(offset)))
            .map(|month_start| {
                let label = month_start.format("%b").to_string();
                (label, DateRange::month_of(month_start))
            })
            .collect(),
    }
}

fn weekday_label(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}

fn category_breakdown(expenses: &[(Transaction, &Category)], total: Money) -> Vec<CategoryShare> {
    if !total.is_positive() {
        return Vec::new();
    }

    let mut by_category: HashMap<CategoryId, CategoryShare> = HashMap::new();
    for (txn, category) in expenses {
        let share = by_category
            .entry(category.id)
            .or_insert_with(|| CategoryShare {
                category_id: category.id,
                name: category.name.clone(),
                icon_symbol: category.icon_symbol.clone(),
                color_hex: category.color_hex.clone(),
                amount: Money::zero(),
                share: 0.0,
            });
        share.amount += txn.amount;
    }

    let mut shares: Vec<_> = by_category
        .into_values()
        .map(|mut s| {
            s.share = s.amount.ratio_of(total);
            s
        })
        .collect();
    shares.sort_by(|a, b| b.amount.cmp(&a.amount).then_with(|| a.name.cmp(&b.name)));
    shares
}
