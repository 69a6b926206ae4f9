use chrono::{Datelike, Local, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

use super::{BudgetCategory, Expense};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// A calendar month. Serialized as "YYYY-MM".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if (1..=12).contains(&month) && (0..=9999).contains(&year) {
            Some(Self { year, month })
        } else {
            None
        }
    }

    pub fn current() -> Self {
        Self::from_date(Local::now().date_naive())
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Shift by whole months, rolling over year boundaries in both directions.
    /// `None` when the result leaves years 0000-9999.
    pub fn shift(&self, delta: i32) -> Option<Self> {
        let index = (self.year * 12 + (self.month as i32 - 1)).checked_add(delta)?;
        Self::new(index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or_default()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Human-readable label, e.g. "October 2026".
    pub fn label(&self) -> String {
        format!("{} {}", MONTH_NAMES[(self.month - 1) as usize], self.year)
    }

    /// `radius` months either side of `center`, oldest first. Months outside
    /// the representable range are left out.
    pub fn around(center: MonthKey, radius: u32) -> Vec<MonthKey> {
        let r = radius as i32;
        (-r..=r).filter_map(|d| center.shift(d)).collect()
    }
}

impl std::fmt::Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (year, month) = s
            .split_once('-')
            .ok_or_else(|| format!("expected YYYY-MM, got '{s}'"))?;
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if year.len() != 4 || month.len() != 2 || !all_digits(year) || !all_digits(month) {
            return Err(format!("expected YYYY-MM, got '{s}'"));
        }
        let year: i32 = year
            .parse()
            .map_err(|_| format!("invalid year in '{s}'"))?;
        let month: u32 = month
            .parse()
            .map_err(|_| format!("invalid month in '{s}'"))?;
        MonthKey::new(year, month).ok_or_else(|| format!("month out of range in '{s}'"))
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Everything recorded for one month.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthRecord {
    pub income: Decimal,
    pub disposable: Decimal,
    #[serde(default)]
    pub budget_categories: Vec<BudgetCategory>,
    #[serde(default)]
    pub expenses: Vec<Expense>,
}

impl MonthRecord {
    pub fn category(&self, id: &str) -> Option<&BudgetCategory> {
        self.budget_categories.iter().find(|c| c.id == id)
    }

    pub(crate) fn category_mut(&mut self, id: &str) -> Option<&mut BudgetCategory> {
        self.budget_categories.iter_mut().find(|c| c.id == id)
    }

    pub fn expense(&self, id: &str) -> Option<&Expense> {
        self.expenses.iter().find(|e| e.id == id)
    }

    pub fn total_allocated(&self) -> Decimal {
        self.budget_categories
            .iter()
            .fold(Decimal::ZERO, |acc, c| acc.saturating_add(c.allocated))
    }

    pub fn total_used(&self) -> Decimal {
        self.budget_categories
            .iter()
            .fold(Decimal::ZERO, |acc, c| acc.saturating_add(c.used))
    }

    /// Sum of expense amounts referencing `category_id`, ignoring the cached `used`.
    pub fn recomputed_used(&self, category_id: &str) -> Decimal {
        self.expenses
            .iter()
            .filter(|e| e.category_id == category_id)
            .fold(Decimal::ZERO, |acc, e| acc.saturating_add(e.amount))
    }

    /// Expenses newest first. Same-day entries keep insertion order.
    pub fn expenses_by_date_desc(&self) -> Vec<&Expense> {
        let mut sorted: Vec<&Expense> = self.expenses.iter().collect();
        sorted.sort_by(|a, b| b.date.cmp(&a.date));
        sorted
    }
}
