use ratatui::{
    layout::{Constraint, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::ui::app::App;
use crate::ui::commands::Store;
use crate::ui::theme;
use crate::ui::util::truncate;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App, store: &Store) {
    let record = store.get_current_month();
    let expenses = record.expenses_by_date_desc();
    let total: rust_decimal::Decimal = expenses.iter().map(|e| e.amount).sum();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(
            format!(" Expenses ({}) | {} spent ", expenses.len(), app.money(total)),
            theme::title_style(),
        ));

    if expenses.is_empty() {
        let hint = if record.budget_categories.is_empty() {
            "Add a category first with :category <name> <amount>"
        } else {
            "Add one with :expense <amount> <category>[; note]"
        };
        let msg = vec![
            Line::from(""),
            Line::from(Span::styled("No expenses for this month", theme::dim_style())),
            Line::from(""),
            Line::from(Span::styled(hint, theme::dim_style())),
        ];
        f.render_widget(Paragraph::new(msg).centered().block(block), area);
        return;
    }

    let header_cells = ["Date", "Category", "Amount", "Note"]
        .iter()
        .map(|h| Cell::from(*h).style(theme::header_style()));
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = expenses
        .iter()
        .enumerate()
        .skip(app.expense_scroll)
        .take(area.height.saturating_sub(3) as usize)
        .map(|(i, expense)| {
            let cat_name = store
                .category_name(&expense.category_id)
                .unwrap_or("Unknown");

            let style = if i == app.expense_index {
                theme::selected_style()
            } else if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };

            Row::new(vec![
                Cell::from(expense.date.format("%Y-%m-%d").to_string()),
                Cell::from(truncate(cat_name, 20)),
                Cell::from(Span::styled(
                    app.money(expense.amount),
                    Style::default().fg(theme::RED),
                )),
                Cell::from(truncate(expense.note_or_dash(), 48)),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(12),
        Constraint::Length(22),
        Constraint::Length(14),
        Constraint::Min(20),
    ];

    let table = Table::new(rows, widths).header(header).block(block);
    f.render_widget(table, area);
}
