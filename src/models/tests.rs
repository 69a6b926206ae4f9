#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ── MonthKey ──────────────────────────────────────────────────

#[test]
fn test_month_key_parse_and_display() {
    let key: MonthKey = "2024-03".parse().unwrap();
    assert_eq!(key.year(), 2024);
    assert_eq!(key.month(), 3);
    assert_eq!(key.to_string(), "2024-03");
}

#[test]
fn test_month_key_rejects_bad_input() {
    assert!("2024-13".parse::<MonthKey>().is_err());
    assert!("2024-00".parse::<MonthKey>().is_err());
    assert!("2024-3".parse::<MonthKey>().is_err());
    assert!("202403".parse::<MonthKey>().is_err());
    assert!("abcd-ef".parse::<MonthKey>().is_err());
    assert!("".parse::<MonthKey>().is_err());
    assert!("2024-+3".parse::<MonthKey>().is_err());
    assert!("+024-01".parse::<MonthKey>().is_err());
    assert!("-024-01".parse::<MonthKey>().is_err());
}

#[test]
fn test_month_key_shift_rolls_over_years() {
    let dec_2024: MonthKey = "2024-12".parse().unwrap();
    assert_eq!(dec_2024.shift(1).unwrap().to_string(), "2025-01");
    let jan_2025: MonthKey = "2025-01".parse().unwrap();
    assert_eq!(jan_2025.shift(-1).unwrap().to_string(), "2024-12");
    assert_eq!(jan_2025.shift(-13).unwrap().to_string(), "2023-12");
    assert_eq!(jan_2025.shift(24).unwrap().to_string(), "2027-01");
    assert_eq!(jan_2025.shift(0), Some(jan_2025));
}

#[test]
fn test_month_key_shift_stays_in_four_digit_years() {
    let last: MonthKey = "9999-12".parse().unwrap();
    assert_eq!(last.shift(1), None);
    assert_eq!(last.shift(-1).unwrap().to_string(), "9999-11");
    let first: MonthKey = "0000-01".parse().unwrap();
    assert_eq!(first.shift(-1), None);
    assert_eq!(first.shift(i32::MAX), None);
}

#[test]
fn test_month_key_around_skips_out_of_range() {
    let key: MonthKey = "9999-11".parse().unwrap();
    let range = MonthKey::around(key, 3);
    assert_eq!(range.len(), 5);
    assert_eq!(range[0].to_string(), "9999-08");
    assert_eq!(range[4].to_string(), "9999-12");
}

#[test]
fn test_month_key_ordering_is_chronological() {
    let a: MonthKey = "2023-12".parse().unwrap();
    let b: MonthKey = "2024-01".parse().unwrap();
    let c: MonthKey = "2024-02".parse().unwrap();
    assert!(a < b && b < c);
}

#[test]
fn test_month_key_dates() {
    let key: MonthKey = "2024-02".parse().unwrap();
    assert_eq!(key.first_day(), date(2024, 2, 1));
    assert!(key.contains(date(2024, 2, 29)));
    assert!(!key.contains(date(2024, 3, 1)));
    assert_eq!(MonthKey::from_date(date(2024, 2, 17)), key);
    assert_eq!(key.label(), "February 2024");
}

#[test]
fn test_month_key_around() {
    let key: MonthKey = "2024-01".parse().unwrap();
    let range = MonthKey::around(key, 12);
    assert_eq!(range.len(), 25);
    assert_eq!(range[0].to_string(), "2023-01");
    assert_eq!(range[12], key);
    assert_eq!(range[24].to_string(), "2025-01");
}

#[test]
fn test_month_key_serializes_as_string() {
    let key: MonthKey = "2024-07".parse().unwrap();
    assert_eq!(serde_json::to_string(&key).unwrap(), "\"2024-07\"");
    let back: MonthKey = serde_json::from_str("\"2024-07\"").unwrap();
    assert_eq!(back, key);
    assert!(serde_json::from_str::<MonthKey>("\"July\"").is_err());
}

// ── BudgetCategory ────────────────────────────────────────────

#[test]
fn test_category_new() {
    let cat = BudgetCategory::new("Food".into(), dec!(1000));
    assert!(!cat.id.is_empty());
    assert_eq!(cat.name, "Food");
    assert_eq!(cat.allocated, dec!(1000));
    assert_eq!(cat.used, Decimal::ZERO);
}

#[test]
fn test_category_ids_are_unique() {
    let a = BudgetCategory::new("A".into(), dec!(1));
    let b = BudgetCategory::new("A".into(), dec!(1));
    assert_ne!(a.id, b.id);
}

#[test]
fn test_category_remaining_and_usage() {
    let mut cat = BudgetCategory::new("Food".into(), dec!(200));
    cat.used = dec!(50);
    assert_eq!(cat.remaining(), dec!(150));
    assert_eq!(cat.usage_percent(), dec!(25));
    assert_eq!(cat.usage_level(), UsageLevel::Normal);

    cat.used = dec!(170);
    assert_eq!(cat.usage_level(), UsageLevel::Warning);

    cat.used = dec!(250);
    assert_eq!(cat.remaining(), dec!(-50));
    assert_eq!(cat.usage_level(), UsageLevel::Over);
}

#[test]
fn test_category_usage_boundaries() {
    let mut cat = BudgetCategory::new("Rent".into(), dec!(100));
    cat.used = dec!(80);
    assert_eq!(cat.usage_level(), UsageLevel::Normal);
    cat.used = dec!(100);
    assert_eq!(cat.usage_level(), UsageLevel::Warning);
}

#[test]
fn test_category_usage_saturates_at_decimal_extremes() {
    let mut cat = BudgetCategory::new("Huge".into(), dec!(0.0000000000000000000000000001));
    cat.used = Decimal::MAX;
    assert_eq!(cat.usage_percent(), Decimal::MAX);
    assert_eq!(cat.usage_level(), UsageLevel::Over);
    assert!(cat.remaining() < Decimal::ZERO);
}

#[test]
fn test_month_totals_saturate() {
    let mut a = BudgetCategory::new("A".into(), Decimal::MAX);
    a.used = Decimal::MAX;
    let b = a.clone();
    let record = MonthRecord {
        budget_categories: vec![a, b],
        ..Default::default()
    };
    assert_eq!(record.total_allocated(), Decimal::MAX);
    assert_eq!(record.total_used(), Decimal::MAX);
}

#[test]
fn test_category_zero_allocation_usage() {
    let mut cat = BudgetCategory::new("Misc".into(), Decimal::ZERO);
    cat.used = dec!(10);
    assert_eq!(cat.usage_percent(), Decimal::ZERO);
    assert_eq!(cat.usage_level(), UsageLevel::Normal);
}

#[test]
fn test_category_find() {
    let cats = vec![
        BudgetCategory::new("Food".into(), dec!(1)),
        BudgetCategory::new("Rent".into(), dec!(2)),
    ];
    assert_eq!(
        BudgetCategory::find_by_name(&cats, "food").map(|c| c.name.as_str()),
        Some("Food")
    );
    assert!(BudgetCategory::find_by_name(&cats, "Fun").is_none());
    let id = cats[1].id.clone();
    assert_eq!(BudgetCategory::find_by_id(&cats, &id).unwrap().name, "Rent");
    assert_eq!(format!("{}", cats[0]), "Food");
}

// ── Expense ───────────────────────────────────────────────────

#[test]
fn test_expense_blank_note_is_absent() {
    let e = Expense::new(date(2024, 1, 2), "c".into(), dec!(5), Some("   ".into()));
    assert!(e.note.is_none());
    assert_eq!(e.note_or_dash(), "-");

    let e = Expense::new(date(2024, 1, 2), "c".into(), dec!(5), Some(" lunch ".into()));
    assert_eq!(e.note.as_deref(), Some("lunch"));
}

// ── MonthRecord ───────────────────────────────────────────────

#[test]
fn test_month_record_default_is_empty() {
    let record = MonthRecord::default();
    assert_eq!(record.income, Decimal::ZERO);
    assert_eq!(record.disposable, Decimal::ZERO);
    assert!(record.budget_categories.is_empty());
    assert!(record.expenses.is_empty());
}

#[test]
fn test_expenses_by_date_desc_keeps_insertion_for_ties() {
    let mut record = MonthRecord::default();
    let first = Expense::new(date(2024, 1, 5), "c".into(), dec!(1), None);
    let second = Expense::new(date(2024, 1, 20), "c".into(), dec!(2), None);
    let third = Expense::new(date(2024, 1, 5), "c".into(), dec!(3), None);
    record.expenses = vec![first.clone(), second.clone(), third.clone()];

    let ids: Vec<&str> = record
        .expenses_by_date_desc()
        .iter()
        .map(|e| e.id.as_str())
        .collect();
    assert_eq!(ids, vec![second.id.as_str(), first.id.as_str(), third.id.as_str()]);
}

#[test]
fn test_month_record_serializes_camel_case() {
    let mut record = MonthRecord {
        income: dec!(5000),
        ..Default::default()
    };
    let cat = BudgetCategory::new("Food".into(), dec!(100));
    record.expenses.push(Expense::new(date(2024, 1, 1), cat.id.clone(), dec!(12.5), None));
    record.budget_categories.push(cat);

    let json = serde_json::to_value(&record).unwrap();
    assert!(json.get("budgetCategories").is_some());
    assert!(json["expenses"][0].get("categoryId").is_some());
    assert!(json["expenses"][0].get("note").is_none());
    assert_eq!(json["expenses"][0]["date"], "2024-01-01");
}

// ── HealthBand ────────────────────────────────────────────────

#[test]
fn test_health_band_thresholds() {
    assert_eq!(HealthBand::from_score(0), HealthBand::Poor);
    assert_eq!(HealthBand::from_score(29), HealthBand::Poor);
    assert_eq!(HealthBand::from_score(30), HealthBand::Fair);
    assert_eq!(HealthBand::from_score(59), HealthBand::Fair);
    assert_eq!(HealthBand::from_score(60), HealthBand::Good);
    assert_eq!(HealthBand::from_score(79), HealthBand::Good);
    assert_eq!(HealthBand::from_score(80), HealthBand::Excellent);
    assert_eq!(HealthBand::from_score(100), HealthBand::Excellent);
}

#[test]
fn test_health_band_display() {
    assert_eq!(format!("{}", HealthBand::Good), "Good");
    assert!(!HealthBand::Poor.describe().is_empty());
}
