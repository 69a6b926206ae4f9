use std::collections::HashMap;
use std::sync::LazyLock;

use chrono::NaiveDate;

use super::app::{App, InputMode, PendingAction, Screen};
use crate::db::Database;
use crate::models::MonthKey;
use crate::store::{parse_date, BudgetStore};

pub(crate) type Store = BudgetStore<Database>;

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut App, &mut Store) -> anyhow::Result<()>,
}

macro_rules! register_command {
    ($name:expr, $desc:expr, $func:expr, $registry:expr) => {{
        $registry.insert(
            $name,
            Command {
                description: $desc,
                run: $func,
            },
        );
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!("q", "Quit Paycheck", cmd_quit, r);
    register_command!("quit", "Quit Paycheck", cmd_quit, r);
    register_command!("d", "Go to Dashboard", cmd_dashboard, r);
    register_command!("dashboard", "Go to Dashboard", cmd_dashboard, r);
    register_command!("c", "Go to Categories", cmd_categories, r);
    register_command!("categories", "Go to Categories", cmd_categories, r);
    register_command!("e", "Go to Expenses", cmd_expenses, r);
    register_command!("expenses", "Go to Expenses", cmd_expenses, r);
    register_command!("help", "Show available commands", cmd_help, r);
    register_command!("h", "Show available commands", cmd_help, r);
    register_command!(
        "income",
        "Set this month's income (e.g. :income 4200)",
        cmd_income,
        r
    );
    register_command!(
        "disposable",
        "Set the disposable amount (e.g. :disposable 1500)",
        cmd_disposable,
        r
    );
    register_command!(
        "category",
        "Add category (e.g. :category Groceries 400)",
        cmd_category,
        r
    );
    register_command!(
        "edit-category",
        "Rename/re-allocate selected category (e.g. :edit-category Food 450)",
        cmd_edit_category,
        r
    );
    register_command!(
        "delete-category",
        "Delete selected category and its expenses",
        cmd_delete_category,
        r
    );
    register_command!(
        "expense",
        "Add expense (e.g. :expense [2024-01-15] 12.50 Groceries; note)",
        cmd_expense,
        r
    );
    register_command!(
        "x",
        "Add expense (e.g. :x 12.50 Groceries)",
        cmd_expense,
        r
    );
    register_command!(
        "edit-expense",
        "Edit selected expense (e.g. :edit-expense 14 Groceries; new note)",
        cmd_edit_expense,
        r
    );
    register_command!(
        "delete-expense",
        "Delete selected expense",
        cmd_delete_expense,
        r
    );
    register_command!("month", "Set month (e.g. :month 2024-01)", cmd_month, r);
    register_command!("m", "Set month (e.g. :m 2024-01)", cmd_month, r);
    register_command!("next-month", "Go to next month", cmd_next_month, r);
    register_command!("prev-month", "Go to previous month", cmd_prev_month, r);

    r
});

/// Run a `:` command line. Failures land in the status bar instead of
/// tearing down the TUI.
pub(crate) fn handle_command(input: &str, app: &mut App, store: &mut Store) {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, ' ');
    let cmd_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    if let Some(cmd) = COMMANDS.get(cmd_name) {
        if let Err(e) = (cmd.run)(args, app, store) {
            tracing::warn!(command = cmd_name, "{e:#}");
            app.set_status(format!("Error: {e:#}"));
        }
        app.clamp_selection(store);
    } else {
        let suggestion = find_closest(cmd_name);
        app.set_status(format!(
            "Unknown command: :{cmd_name}. Did you mean :{suggestion}?"
        ));
    }
}

fn find_closest(input: &str) -> String {
    COMMANDS
        .keys()
        .filter(|k| k.len() > 1) // skip single-letter aliases for suggestions
        .min_by_key(|k| (levenshtein(input, k), **k))
        .unwrap_or(&"help")
        .to_string()
}

fn levenshtein(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Arguments of `:expense` / `:edit-expense`:
/// `[YYYY-MM-DD] <amount> <category name>[; note]`.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct ExpenseArgs<'a> {
    pub(crate) date: Option<NaiveDate>,
    pub(crate) amount: &'a str,
    pub(crate) category: &'a str,
    /// `None` when no `;` was given, so an edit keeps the old note.
    pub(crate) note: Option<String>,
}

pub(crate) fn parse_expense_args(args: &str) -> Option<ExpenseArgs<'_>> {
    let (main, note) = match args.split_once(';') {
        Some((main, note)) => (main, Some(note.trim().to_string())),
        None => (args, None),
    };

    let mut rest = main.trim();
    let mut date = None;
    if let Some((first, tail)) = rest.split_once(' ') {
        if let Ok(parsed) = parse_date(first) {
            date = Some(parsed);
            rest = tail.trim_start();
        }
    }

    let (amount, category) = rest.split_once(' ')?;
    let category = category.trim();
    if category.is_empty() {
        return None;
    }
    Some(ExpenseArgs {
        date,
        amount,
        category,
        note,
    })
}

// ── Command implementations ──────────────────────────────────

fn cmd_quit(_args: &str, app: &mut App, _store: &mut Store) -> anyhow::Result<()> {
    app.running = false;
    Ok(())
}

fn cmd_dashboard(_args: &str, app: &mut App, _store: &mut Store) -> anyhow::Result<()> {
    app.screen = Screen::Dashboard;
    Ok(())
}

fn cmd_categories(_args: &str, app: &mut App, _store: &mut Store) -> anyhow::Result<()> {
    app.screen = Screen::Categories;
    Ok(())
}

fn cmd_expenses(_args: &str, app: &mut App, _store: &mut Store) -> anyhow::Result<()> {
    app.screen = Screen::Expenses;
    Ok(())
}

fn cmd_help(_args: &str, app: &mut App, _store: &mut Store) -> anyhow::Result<()> {
    app.show_help = true;
    Ok(())
}

fn cmd_income(args: &str, app: &mut App, store: &mut Store) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status("Usage: :income <amount>");
        return Ok(());
    }
    let amount = store.set_income(args)?;
    app.set_status(format!("Income set to {}", app.money(amount)));
    Ok(())
}

fn cmd_disposable(args: &str, app: &mut App, store: &mut Store) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status("Usage: :disposable <amount>");
        return Ok(());
    }
    let amount = store.set_disposable(args)?;
    app.set_status(format!("Disposable set to {}", app.money(amount)));
    Ok(())
}

/// Split `<name with spaces> <amount>` on the last space.
fn split_name_amount(args: &str) -> Option<(&str, &str)> {
    let (name, amount) = args.trim().rsplit_once(' ')?;
    let name = name.trim();
    (!name.is_empty()).then_some((name, amount))
}

fn cmd_category(args: &str, app: &mut App, store: &mut Store) -> anyhow::Result<()> {
    let Some((name, amount)) = split_name_amount(args) else {
        app.set_status("Usage: :category <name> <allocated>. Example: :category Groceries 400");
        return Ok(());
    };

    let category = store.add_category(name, amount)?;
    app.screen = Screen::Categories;
    app.category_index = store.get_current_month().budget_categories.len() - 1;
    app.set_status(format!(
        "Added category: {} ({})",
        category.name,
        app.money(category.allocated)
    ));
    Ok(())
}

fn cmd_edit_category(args: &str, app: &mut App, store: &mut Store) -> anyhow::Result<()> {
    let Some((name, amount)) = split_name_amount(args) else {
        app.set_status("Usage: :edit-category <name> <allocated> (applies to the selected category)");
        return Ok(());
    };
    let Some(id) = app.selected_category(store).map(|c| c.id.clone()) else {
        app.set_status("No category selected");
        return Ok(());
    };

    let category = store.update_category(&id, name, amount)?;
    app.set_status(format!(
        "Updated category: {} ({})",
        category.name,
        app.money(category.allocated)
    ));
    Ok(())
}

fn cmd_delete_category(_args: &str, app: &mut App, store: &mut Store) -> anyhow::Result<()> {
    let Some(category) = app.selected_category(store) else {
        app.set_status("No categories to delete");
        return Ok(());
    };

    let count = store
        .get_current_month()
        .expenses
        .iter()
        .filter(|e| e.category_id == category.id)
        .count();
    app.confirm_message = if count == 0 {
        format!("Delete category '{}'?", category.name)
    } else {
        format!(
            "Delete category '{}' and its {count} expense(s)?",
            category.name
        )
    };
    app.pending_action = Some(PendingAction::DeleteCategory {
        id: category.id.clone(),
        name: category.name.clone(),
    });
    app.input_mode = InputMode::Confirm;
    Ok(())
}

fn cmd_expense(args: &str, app: &mut App, store: &mut Store) -> anyhow::Result<()> {
    let Some(parsed) = parse_expense_args(args) else {
        app.set_status("Usage: :expense [YYYY-MM-DD] <amount> <category>[; note]");
        return Ok(());
    };
    let Some(category) = store.find_category(parsed.category) else {
        app.set_status(format!("Category '{}' not found", parsed.category));
        return Ok(());
    };
    let category_id = category.id.clone();
    let date = parsed.date.unwrap_or_else(|| store.default_expense_date());

    let expense = store.add_expense(date, &category_id, parsed.amount, parsed.note)?;
    app.screen = Screen::Expenses;
    app.expense_index = 0;
    app.expense_scroll = 0;
    app.set_status(format!(
        "Added expense: {} on {}",
        app.money(expense.amount),
        expense.date
    ));
    Ok(())
}

fn cmd_edit_expense(args: &str, app: &mut App, store: &mut Store) -> anyhow::Result<()> {
    let Some(parsed) = parse_expense_args(args) else {
        app.set_status("Usage: :edit-expense [YYYY-MM-DD] <amount> <category>[; note] (applies to the selected expense)");
        return Ok(());
    };
    let Some(current) = app.selected_expense(store).cloned() else {
        app.set_status("No expense selected");
        return Ok(());
    };
    let Some(category) = store.find_category(parsed.category) else {
        app.set_status(format!("Category '{}' not found", parsed.category));
        return Ok(());
    };
    let category_id = category.id.clone();

    let expense = store.update_expense(
        &current.id,
        parsed.date.unwrap_or(current.date),
        &category_id,
        parsed.amount,
        parsed.note.or(current.note),
    )?;
    app.set_status(format!(
        "Updated expense: {} on {}",
        app.money(expense.amount),
        expense.date
    ));
    Ok(())
}

fn cmd_delete_expense(_args: &str, app: &mut App, store: &mut Store) -> anyhow::Result<()> {
    let Some(expense) = app.selected_expense(store) else {
        app.set_status("No expenses to delete");
        return Ok(());
    };

    let label = format!("{} {}", expense.date, app.money(expense.amount));
    app.confirm_message = format!("Delete expense {label}?");
    app.pending_action = Some(PendingAction::DeleteExpense {
        id: expense.id.clone(),
        label,
    });
    app.input_mode = InputMode::Confirm;
    Ok(())
}

fn cmd_month(args: &str, app: &mut App, store: &mut Store) -> anyhow::Result<()> {
    let key = if args.is_empty() {
        // No args → back to this month
        store.set_current_month(&MonthKey::current().to_string())?
    } else {
        store.set_current_month(args)?
    };
    app.reset_selection();
    app.set_status(format!("Switched to {}", key.label()));
    Ok(())
}

fn cmd_next_month(_args: &str, app: &mut App, store: &mut Store) -> anyhow::Result<()> {
    let key = store.advance_month(1)?;
    app.reset_selection();
    app.set_status(format!("Switched to {}", key.label()));
    Ok(())
}

fn cmd_prev_month(_args: &str, app: &mut App, store: &mut Store) -> anyhow::Result<()> {
    let key = store.advance_month(-1)?;
    app.reset_selection();
    app.set_status(format!("Switched to {}", key.label()));
    Ok(())
}

/// Carry out a confirmed `PendingAction`.
pub(crate) fn confirm_pending(action: PendingAction, app: &mut App, store: &mut Store) {
    let outcome = match action {
        PendingAction::DeleteCategory { id, name } => {
            store.delete_category(&id).map(|removed| match removed {
                Some(removed) if !removed.expenses.is_empty() => format!(
                    "Deleted category: {name} ({} expense(s) removed)",
                    removed.expenses.len()
                ),
                Some(_) => format!("Deleted category: {name}"),
                None => format!("Category '{name}' was already gone"),
            })
        }
        PendingAction::DeleteExpense { id, label } => {
            store.delete_expense(&id).map(|removed| match removed {
                Some(_) => format!("Deleted expense: {label}"),
                None => format!("Expense {label} was already gone"),
            })
        }
    };

    match outcome {
        Ok(msg) => app.set_status(msg),
        Err(e) => {
            tracing::warn!("{e:#}");
            app.set_status(format!("Error: {e}"));
        }
    }
    app.clamp_selection(store);
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
