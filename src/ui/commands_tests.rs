#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use super::*;

fn setup() -> (App, Store) {
    let db = Database::open_in_memory().unwrap();
    let store = BudgetStore::open_at(db, "2024-03".parse().unwrap()).unwrap();
    (App::new("$"), store)
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

// ── parse_expense_args ────────────────────────────────────────

#[test]
fn test_parse_expense_amount_and_category() {
    let parsed = parse_expense_args("12.50 Eating Out").unwrap();
    assert_eq!(parsed.date, None);
    assert_eq!(parsed.amount, "12.50");
    assert_eq!(parsed.category, "Eating Out");
    assert_eq!(parsed.note, None);
}

#[test]
fn test_parse_expense_with_date_and_note() {
    let parsed = parse_expense_args("2024-03-09 40 Groceries; weekly shop").unwrap();
    assert_eq!(parsed.date, Some(date("2024-03-09")));
    assert_eq!(parsed.amount, "40");
    assert_eq!(parsed.category, "Groceries");
    assert_eq!(parsed.note.as_deref(), Some("weekly shop"));
}

#[test]
fn test_parse_expense_empty_note_is_explicit() {
    let parsed = parse_expense_args("40 Groceries;").unwrap();
    assert_eq!(parsed.note.as_deref(), Some(""));
}

#[test]
fn test_parse_expense_needs_category() {
    assert!(parse_expense_args("").is_none());
    assert!(parse_expense_args("40").is_none());
    assert!(parse_expense_args("2024-03-09 40").is_none());
    assert!(parse_expense_args("40 ; note").is_none());
}

// ── Suggestions ───────────────────────────────────────────────

#[test]
fn test_levenshtein() {
    assert_eq!(levenshtein("income", "income"), 0);
    assert_eq!(levenshtein("incme", "income"), 1);
    assert_eq!(levenshtein("", "abc"), 3);
}

#[test]
fn test_unknown_command_suggests_closest() {
    let (mut app, mut store) = setup();
    handle_command("incom 100", &mut app, &mut store);
    assert_eq!(
        app.status_message,
        "Unknown command: :incom. Did you mean :income?"
    );
    assert_eq!(store.get_current_month().income, dec!(0));
}

// ── Budget commands ───────────────────────────────────────────

#[test]
fn test_income_and_disposable_commands() {
    let (mut app, mut store) = setup();
    handle_command("income 4,200", &mut app, &mut store);
    assert_eq!(app.status_message, "Income set to $4,200.00");
    handle_command("disposable 1500", &mut app, &mut store);
    assert_eq!(store.remaining_after_disposable(), dec!(2700));
}

#[test]
fn test_invalid_amount_reports_error() {
    let (mut app, mut store) = setup();
    handle_command("income lots", &mut app, &mut store);
    assert!(app.status_message.starts_with("Error: Invalid amount"));
    assert!(app.running);
}

#[test]
fn test_category_command_with_spaces_in_name() {
    let (mut app, mut store) = setup();
    handle_command("category Eating Out 150", &mut app, &mut store);
    let record = store.get_current_month();
    assert_eq!(record.budget_categories.len(), 1);
    assert_eq!(record.budget_categories[0].name, "Eating Out");
    assert_eq!(record.budget_categories[0].allocated, dec!(150));
    assert_eq!(app.screen, Screen::Categories);
}

#[test]
fn test_edit_category_applies_to_selection() {
    let (mut app, mut store) = setup();
    handle_command("category Food 100", &mut app, &mut store);
    handle_command("category Fuel 80", &mut app, &mut store);
    app.category_index = 0;
    handle_command("edit-category Groceries 120", &mut app, &mut store);
    let record = store.get_current_month();
    assert_eq!(record.budget_categories[0].name, "Groceries");
    assert_eq!(record.budget_categories[0].allocated, dec!(120));
    assert_eq!(record.budget_categories[1].name, "Fuel");
}

#[test]
fn test_expense_command_defaults_to_month_start() {
    let (mut app, mut store) = setup();
    handle_command("category Food 100", &mut app, &mut store);
    handle_command("expense 25 food; lunch", &mut app, &mut store);
    let record = store.get_current_month();
    assert_eq!(record.expenses.len(), 1);
    assert_eq!(record.expenses[0].date, date("2024-03-01"));
    assert_eq!(record.expenses[0].note.as_deref(), Some("lunch"));
    assert_eq!(record.budget_categories[0].used, dec!(25));
    assert_eq!(app.screen, Screen::Expenses);
}

#[test]
fn test_expense_command_unknown_category() {
    let (mut app, mut store) = setup();
    handle_command("expense 25 Food", &mut app, &mut store);
    assert_eq!(app.status_message, "Category 'Food' not found");
    assert!(store.get_current_month().expenses.is_empty());
}

#[test]
fn test_edit_expense_keeps_date_and_note_unless_given() {
    let (mut app, mut store) = setup();
    handle_command("category Food 100", &mut app, &mut store);
    handle_command("category Fuel 80", &mut app, &mut store);
    handle_command("expense 2024-03-05 25 Food; lunch", &mut app, &mut store);
    handle_command("edit-expense 30 Fuel", &mut app, &mut store);

    let record = store.get_current_month();
    let expense = &record.expenses[0];
    assert_eq!(expense.date, date("2024-03-05"));
    assert_eq!(expense.note.as_deref(), Some("lunch"));
    assert_eq!(expense.amount, dec!(30));
    assert_eq!(record.budget_categories[0].used, dec!(0));
    assert_eq!(record.budget_categories[1].used, dec!(30));

    handle_command("edit-expense 30 Fuel;", &mut app, &mut store);
    assert_eq!(store.get_current_month().expenses[0].note, None);
}

#[test]
fn test_selection_follows_newest_first_order() {
    let (mut app, mut store) = setup();
    handle_command("category Food 100", &mut app, &mut store);
    handle_command("expense 2024-03-01 10 Food", &mut app, &mut store);
    handle_command("expense 2024-03-20 20 Food", &mut app, &mut store);
    app.expense_index = 0;
    assert_eq!(app.selected_expense(&store).unwrap().amount, dec!(20));
    app.expense_index = 1;
    assert_eq!(app.selected_expense(&store).unwrap().amount, dec!(10));
}

// ── Confirmations ─────────────────────────────────────────────

#[test]
fn test_delete_category_needs_confirmation() {
    let (mut app, mut store) = setup();
    handle_command("category Food 100", &mut app, &mut store);
    handle_command("expense 10 Food", &mut app, &mut store);
    handle_command("delete-category", &mut app, &mut store);

    assert_eq!(app.input_mode, InputMode::Confirm);
    assert_eq!(app.confirm_message, "Delete category 'Food' and its 1 expense(s)?");
    assert_eq!(store.get_current_month().budget_categories.len(), 1);

    let action = app.pending_action.take().unwrap();
    confirm_pending(action, &mut app, &mut store);
    assert!(store.get_current_month().budget_categories.is_empty());
    assert!(store.get_current_month().expenses.is_empty());
    assert_eq!(app.status_message, "Deleted category: Food (1 expense(s) removed)");
}

#[test]
fn test_delete_expense_confirmed() {
    let (mut app, mut store) = setup();
    handle_command("category Food 100", &mut app, &mut store);
    handle_command("expense 2024-03-02 10 Food", &mut app, &mut store);
    handle_command("delete-expense", &mut app, &mut store);

    let action = app.pending_action.take().unwrap();
    assert!(matches!(action, PendingAction::DeleteExpense { .. }));
    confirm_pending(action, &mut app, &mut store);
    assert!(store.get_current_month().expenses.is_empty());
    assert_eq!(store.get_current_month().budget_categories[0].used, dec!(0));
    assert_eq!(app.expense_index, 0);
}

#[test]
fn test_delete_with_nothing_selected() {
    let (mut app, mut store) = setup();
    handle_command("delete-expense", &mut app, &mut store);
    assert_eq!(app.status_message, "No expenses to delete");
    assert_eq!(app.input_mode, InputMode::Normal);
}

// ── Months & navigation ───────────────────────────────────────

#[test]
fn test_month_commands_move_cursor() {
    let (mut app, mut store) = setup();
    handle_command("next-month", &mut app, &mut store);
    assert_eq!(store.current_month_key().to_string(), "2024-04");
    handle_command("m 2023-12", &mut app, &mut store);
    assert_eq!(store.current_month_key().to_string(), "2023-12");
    assert_eq!(app.status_message, "Switched to December 2023");
    handle_command("prev-month", &mut app, &mut store);
    assert_eq!(store.current_month_key().to_string(), "2023-11");
}

#[test]
fn test_month_rejects_bad_key() {
    let (mut app, mut store) = setup();
    handle_command("month 2024-13", &mut app, &mut store);
    assert!(app.status_message.starts_with("Error: Invalid month"));
    assert_eq!(store.current_month_key().to_string(), "2024-03");
}

#[test]
fn test_navigation_and_quit() {
    let (mut app, mut store) = setup();
    handle_command("e", &mut app, &mut store);
    assert_eq!(app.screen, Screen::Expenses);
    handle_command("dashboard", &mut app, &mut store);
    assert_eq!(app.screen, Screen::Dashboard);
    handle_command("help", &mut app, &mut store);
    assert!(app.show_help);
    handle_command("q", &mut app, &mut store);
    assert!(!app.running);
}
