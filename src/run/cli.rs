use anyhow::{bail, Result};

use crate::models::{HealthBand, MonthKey};
use crate::store::parse_date;
use crate::ui::commands::Store;
use crate::ui::util::{format_money, truncate};

pub(crate) fn as_cli(args: &[String], store: &mut Store, symbol: &str) -> Result<()> {
    let mut rest: Vec<String> = args.iter().skip(1).cloned().collect();
    if let Some(month) = take_flag(&mut rest, "--month")? {
        store.set_current_month(&month)?;
    }

    let Some((command, params)) = rest.split_first() else {
        return cli_summary(store, symbol);
    };
    match command.as_str() {
        "summary" | "s" => cli_summary(store, symbol),
        "categories" | "c" => cli_categories(store, symbol),
        "expenses" | "e" => cli_expenses(store, symbol),
        "trend" => cli_trend(params, store, symbol),
        "months" => cli_months(store),
        "income" => cli_income(params, store, symbol),
        "disposable" => cli_disposable(params, store, symbol),
        "add-category" => cli_add_category(params, store, symbol),
        "update-category" => cli_update_category(params, store, symbol),
        "delete-category" => cli_delete_category(params, store),
        "add-expense" => cli_add_expense(params.to_vec(), store, symbol),
        "update-expense" => cli_update_expense(params.to_vec(), store, symbol),
        "delete-expense" => cli_delete_expense(params, store, symbol),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("paycheck {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("Paycheck - local-only monthly budget planner");
    println!();
    println!("Usage: paycheck [command] [--month YYYY-MM]");
    println!();
    println!("Commands:");
    println!("  (none)                              Launch interactive TUI");
    println!("  summary                             Print the month's totals and health score");
    println!("  categories                          List budget categories");
    println!("  expenses                            List expenses, newest first");
    println!("  trend [count]                       Income/disposable/allocated for recent months");
    println!("  months                              List the months around the selected one");
    println!("  income <amount>                     Set the month's income");
    println!("  disposable <amount>                 Set the month's disposable amount");
    println!("  add-category <name> <amount>        Add a budget category");
    println!("  update-category <name|id> <new-name> <amount>");
    println!("                                      Rename and re-allocate a category");
    println!("  delete-category <name|id>           Delete a category and its expenses");
    println!("  add-expense <category> <amount>     Record an expense");
    println!("    --date <YYYY-MM-DD>               Expense date (default: today, or the 1st)");
    println!("    --note <text>                     Free-text note");
    println!("  update-expense <id> <category> <amount> [--date D] [--note N]");
    println!("                                      Edit an expense (id prefix is enough)");
    println!("  delete-expense <id>                 Delete an expense");
    println!("  --help, -h                          Show this help");
    println!("  --version, -V                       Show version");
    println!();
    println!("Every command accepts --month <YYYY-MM> (default: current month).");
}

/// Remove `name <value>` from `args`, returning the value.
fn take_flag(args: &mut Vec<String>, name: &str) -> Result<Option<String>> {
    let Some(pos) = args.iter().position(|a| a == name) else {
        return Ok(None);
    };
    if pos + 1 >= args.len() {
        bail!("{name} needs a value");
    }
    let value = args.remove(pos + 1);
    args.remove(pos);
    Ok(Some(value))
}

fn resolve_category(store: &Store, key: &str) -> Result<String> {
    if let Some(category) = store.find_category(key) {
        return Ok(category.id.clone());
    }
    let matches: Vec<&str> = store
        .get_current_month()
        .budget_categories
        .iter()
        .filter(|c| c.id.starts_with(key))
        .map(|c| c.id.as_str())
        .collect();
    match matches.as_slice() {
        [id] => Ok((*id).to_string()),
        [] => bail!(
            "Category '{key}' not found in {}",
            store.current_month_key()
        ),
        _ => bail!("Category id prefix '{key}' is ambiguous"),
    }
}

fn resolve_expense(store: &Store, key: &str) -> Result<String> {
    let matches: Vec<&str> = store
        .get_current_month()
        .expenses
        .iter()
        .filter(|e| e.id == key || e.id.starts_with(key))
        .map(|e| e.id.as_str())
        .collect();
    match matches.as_slice() {
        [id] => Ok((*id).to_string()),
        [] => bail!("Expense '{key}' not found in {}", store.current_month_key()),
        _ if matches.contains(&key) => Ok(key.to_string()),
        _ => bail!("Expense id prefix '{key}' is ambiguous"),
    }
}

fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

// ── Reports ──────────────────────────────────────────────────

fn cli_summary(store: &Store, symbol: &str) -> Result<()> {
    let record = store.get_current_month();
    let money = |v| format_money(v, symbol);

    println!("Paycheck - {}", store.current_month_key().label());
    println!("{}", "─".repeat(44));
    println!("  Income:             {}", money(record.income));
    println!("  Disposable:         {}", money(record.disposable));
    println!("  After disposable:   {}", money(store.remaining_after_disposable()));
    println!("  Allocated:          {}", money(store.total_allocated()));
    println!("  Used:               {}", money(store.total_used()));
    println!("  Remaining budget:   {}", money(store.remaining_budget()));
    if record.income.is_zero() {
        println!("  Health:             n/a (no income set)");
    } else {
        let score = store.health_score();
        let band = HealthBand::from_score(score);
        println!("  Health:             {score}/100 {band} - {}", band.describe());
    }
    println!(
        "  Categories:         {} ({} expenses)",
        record.budget_categories.len(),
        record.expenses.len()
    );

    if let Some(saved) = store.backend().last_saved()? {
        println!();
        println!("Last saved: {saved}");
    }
    Ok(())
}

fn cli_categories(store: &Store, symbol: &str) -> Result<()> {
    let categories = &store.get_current_month().budget_categories;
    if categories.is_empty() {
        println!("No categories for {}", store.current_month_key());
        return Ok(());
    }

    println!(
        "{:<9} {:<22} {:>13} {:>13} {:>13} {:>6}",
        "ID", "Name", "Allocated", "Used", "Remaining", "Usage"
    );
    println!("{}", "─".repeat(81));
    for cat in categories {
        println!(
            "{:<9} {:<22} {:>13} {:>13} {:>13} {:>5.0}%",
            short_id(&cat.id),
            truncate(&cat.name, 22),
            format_money(cat.allocated, symbol),
            format_money(cat.used, symbol),
            format_money(cat.remaining(), symbol),
            cat.usage_percent().round(),
        );
    }
    Ok(())
}

fn cli_expenses(store: &Store, symbol: &str) -> Result<()> {
    let expenses = store.get_current_month().expenses_by_date_desc();
    if expenses.is_empty() {
        println!("No expenses for {}", store.current_month_key());
        return Ok(());
    }

    println!(
        "{:<9} {:<10} {:<20} {:>13}  Note",
        "ID", "Date", "Category", "Amount"
    );
    println!("{}", "─".repeat(70));
    for expense in expenses {
        println!(
            "{:<9} {:<10} {:<20} {:>13}  {}",
            short_id(&expense.id),
            expense.date,
            truncate(
                store.category_name(&expense.category_id).unwrap_or("Unknown"),
                20
            ),
            format_money(expense.amount, symbol),
            expense.note_or_dash(),
        );
    }
    Ok(())
}

fn cli_trend(params: &[String], store: &Store, symbol: &str) -> Result<()> {
    let count = match params.first() {
        Some(raw) => match raw.parse::<usize>() {
            Ok(n) if (1..=120).contains(&n) => n,
            _ => bail!("Invalid month count: {raw} (expected 1-120)"),
        },
        None => 6,
    };

    println!(
        "{:<8} {:>13} {:>13} {:>13}",
        "Month", "Income", "Disposable", "Allocated"
    );
    println!("{}", "─".repeat(50));
    for point in store.trend(count) {
        println!(
            "{:<8} {:>13} {:>13} {:>13}",
            point.month.to_string(),
            format_money(point.income, symbol),
            format_money(point.disposable, symbol),
            format_money(point.allocated, symbol),
        );
    }
    Ok(())
}

fn cli_months(store: &Store) -> Result<()> {
    let cursor = store.current_month_key();
    for key in MonthKey::around(cursor, 12) {
        let marker = if key == cursor { "*" } else { " " };
        let data = match store.month(key) {
            Some(record) if !record.budget_categories.is_empty() || !record.income.is_zero() => {
                "  (has data)"
            }
            _ => "",
        };
        println!("{marker} {key}  {}{data}", key.label());
    }
    println!();
    println!("{} month(s) on record", store.months().len());
    Ok(())
}

// ── Mutations ────────────────────────────────────────────────

fn cli_income(params: &[String], store: &mut Store, symbol: &str) -> Result<()> {
    let [amount] = params else {
        bail!("Usage: paycheck income <amount>");
    };
    let amount = store.set_income(amount)?;
    println!(
        "Income for {} set to {}",
        store.current_month_key(),
        format_money(amount, symbol)
    );
    Ok(())
}

fn cli_disposable(params: &[String], store: &mut Store, symbol: &str) -> Result<()> {
    let [amount] = params else {
        bail!("Usage: paycheck disposable <amount>");
    };
    let amount = store.set_disposable(amount)?;
    println!(
        "Disposable for {} set to {}",
        store.current_month_key(),
        format_money(amount, symbol)
    );
    Ok(())
}

fn cli_add_category(params: &[String], store: &mut Store, symbol: &str) -> Result<()> {
    let Some((amount, name_parts)) = params.split_last().filter(|(_, n)| !n.is_empty()) else {
        bail!("Usage: paycheck add-category <name> <amount>");
    };
    let category = store.add_category(&name_parts.join(" "), amount)?;
    println!(
        "Added category {} ({}) [{}]",
        category.name,
        format_money(category.allocated, symbol),
        short_id(&category.id)
    );
    Ok(())
}

fn cli_update_category(params: &[String], store: &mut Store, symbol: &str) -> Result<()> {
    let [key, new_name, amount] = params else {
        bail!("Usage: paycheck update-category <name|id> <new-name> <amount>");
    };
    let id = resolve_category(store, key)?;
    let category = store.update_category(&id, new_name, amount)?;
    println!(
        "Updated category {} ({})",
        category.name,
        format_money(category.allocated, symbol)
    );
    Ok(())
}

fn cli_delete_category(params: &[String], store: &mut Store) -> Result<()> {
    if params.is_empty() {
        bail!("Usage: paycheck delete-category <name|id>");
    }
    let id = resolve_category(store, &params.join(" "))?;
    if let Some(removed) = store.delete_category(&id)? {
        println!(
            "Deleted category {} and {} expense(s)",
            removed.category.name,
            removed.expenses.len()
        );
    }
    Ok(())
}

fn cli_add_expense(mut params: Vec<String>, store: &mut Store, symbol: &str) -> Result<()> {
    let date = take_flag(&mut params, "--date")?
        .map(|d| parse_date(&d))
        .transpose()?;
    let note = take_flag(&mut params, "--note")?;
    let [category, amount] = params.as_slice() else {
        bail!("Usage: paycheck add-expense <category> <amount> [--date YYYY-MM-DD] [--note text]");
    };

    let category_id = resolve_category(store, category)?;
    let date = date.unwrap_or_else(|| store.default_expense_date());
    let expense = store.add_expense(date, &category_id, amount, note)?;
    println!(
        "Added expense {} on {} [{}]",
        format_money(expense.amount, symbol),
        expense.date,
        short_id(&expense.id)
    );
    Ok(())
}

fn cli_update_expense(mut params: Vec<String>, store: &mut Store, symbol: &str) -> Result<()> {
    let date = take_flag(&mut params, "--date")?
        .map(|d| parse_date(&d))
        .transpose()?;
    let note = take_flag(&mut params, "--note")?;
    let [key, category, amount] = params.as_slice() else {
        bail!("Usage: paycheck update-expense <id> <category> <amount> [--date YYYY-MM-DD] [--note text]");
    };

    let id = resolve_expense(store, key)?;
    let category_id = resolve_category(store, category)?;
    let Some(current) = store.get_current_month().expense(&id).cloned() else {
        bail!("Expense '{key}' not found");
    };
    let expense = store.update_expense(
        &id,
        date.unwrap_or(current.date),
        &category_id,
        amount,
        note.or(current.note),
    )?;
    println!(
        "Updated expense [{}]: {} on {}",
        short_id(&expense.id),
        format_money(expense.amount, symbol),
        expense.date
    );
    Ok(())
}

fn cli_delete_expense(params: &[String], store: &mut Store, symbol: &str) -> Result<()> {
    let [key] = params else {
        bail!("Usage: paycheck delete-expense <id>");
    };
    let id = resolve_expense(store, key)?;
    if let Some(expense) = store.delete_expense(&id)? {
        println!(
            "Deleted expense {} on {}",
            format_money(expense.amount, symbol),
            expense.date
        );
    }
    Ok(())
}
