#![allow(clippy::unwrap_used)]

use super::*;
use crate::models::{BudgetCategory, Expense};
use chrono::NaiveDate;
use rust_decimal_macros::dec;

fn key(s: &str) -> MonthKey {
    s.parse().unwrap()
}

fn sample_months() -> MonthMap {
    let mut months = MonthMap::new();

    let mut jan = MonthRecord {
        income: dec!(5000),
        disposable: dec!(3000),
        ..Default::default()
    };
    let mut food = BudgetCategory::new("Food".into(), dec!(1000));
    let lunch = Expense::new(
        NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
        food.id.clone(),
        dec!(12.50),
        Some("lunch".into()),
    );
    food.used = lunch.amount;
    jan.budget_categories.push(food);
    jan.expenses.push(lunch);
    months.insert("2024-01".parse().unwrap(), jan);

    months.insert("2024-02".parse().unwrap(), MonthRecord::default());
    months
}

// ── Schema ────────────────────────────────────────────────────

#[test]
fn test_fresh_database_has_current_schema() {
    let db = Database::open_in_memory().unwrap();
    assert_eq!(db.schema_version().unwrap(), schema::CURRENT_VERSION);
}

#[test]
fn test_reopen_does_not_reapply_schema() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("budget.db");
    let months = sample_months();
    {
        let mut db = Database::open(&path).unwrap();
        db.save_months(&months).unwrap();
    }
    let db = Database::open(&path).unwrap();
    assert_eq!(db.schema_version().unwrap(), schema::CURRENT_VERSION);
    let versions: i64 = db
        .conn
        .query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0))
        .unwrap();
    assert_eq!(versions, 1);
    assert_eq!(db.load_months().unwrap(), months);
}

#[test]
fn test_newer_schema_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("budget.db");
    {
        let db = Database::open(&path).unwrap();
        db.conn
            .execute("UPDATE schema_version SET version = 99", [])
            .unwrap();
    }
    assert!(Database::open(&path).is_err());
}

// ── Load / save ───────────────────────────────────────────────

#[test]
fn test_empty_database_loads_empty_map() {
    let db = Database::open_in_memory().unwrap();
    assert!(db.load_months().unwrap().is_empty());
    assert!(db.last_saved().unwrap().is_none());
}

#[test]
fn test_save_then_load_roundtrip() {
    let mut db = Database::open_in_memory().unwrap();
    let months = sample_months();
    db.save_months(&months).unwrap();
    assert_eq!(db.load_months().unwrap(), months);
    assert!(db.last_saved().unwrap().is_some());
}

#[test]
fn test_save_overwrites_previous_state() {
    let mut db = Database::open_in_memory().unwrap();
    db.save_months(&sample_months()).unwrap();

    let mut smaller = MonthMap::new();
    smaller.insert("2030-05".parse().unwrap(), MonthRecord::default());
    db.save_months(&smaller).unwrap();

    let loaded = db.load_months().unwrap();
    assert_eq!(loaded.len(), 1);
    assert!(loaded.contains_key(&key("2030-05")));

    let rows: i64 = db
        .conn
        .query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn test_file_roundtrip_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("budget.db");
    let months = sample_months();
    {
        let mut db = Database::open(&path).unwrap();
        db.save_months(&months).unwrap();
    }
    let db = Database::open(&path).unwrap();
    assert_eq!(db.load_months().unwrap(), months);
}

// ── Document format ───────────────────────────────────────────

#[test]
fn test_document_roundtrip_is_structurally_equal() {
    let months = sample_months();
    let body = encode_document(&months).unwrap();
    assert_eq!(decode_document(&body).unwrap(), months);
}

#[test]
fn test_document_carries_version() {
    let body = encode_document(&sample_months()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(value["version"], 1);
    assert!(value["months"].get("2024-01").is_some());
}

#[test]
fn test_decode_unversioned_map() {
    let body = r#"{
        "2024-03": {
            "income": "4000",
            "disposable": "2500",
            "budgetCategories": [
                {"id": "c1", "name": "Rent", "allocated": "1200", "used": "1200"}
            ],
            "expenses": [
                {"id": "e1", "date": "2024-03-01", "categoryId": "c1", "amount": "1200"}
            ]
        }
    }"#;
    let months = decode_document(body).unwrap();
    let record = &months[&key("2024-03")];
    assert_eq!(record.income, dec!(4000));
    assert_eq!(record.budget_categories[0].used, dec!(1200));
    assert!(record.expenses[0].note.is_none());
}

#[test]
fn test_decode_accepts_numeric_amounts() {
    let body = r#"{"version": 1, "months": {"2024-04": {"income": 5000, "disposable": 3000.5}}}"#;
    let months = decode_document(body).unwrap();
    let record = &months[&key("2024-04")];
    assert_eq!(record.disposable, dec!(3000.5));
    assert!(record.budget_categories.is_empty());
}

#[test]
fn test_decode_rejects_newer_version() {
    let body = r#"{"version": 2, "months": {}}"#;
    let err = decode_document(body).unwrap_err();
    assert!(err.to_string().contains("newer version"));
}

#[test]
fn test_decode_rejects_garbage() {
    assert!(decode_document("not json").is_err());
    assert!(decode_document(r#"{"version": "one", "months": {}}"#).is_err());
    assert!(decode_document(r#"{"version": 1, "months": {"May": {}}}"#).is_err());
}
