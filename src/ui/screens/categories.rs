use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::ui::app::App;
use crate::ui::commands::Store;
use crate::ui::theme;
use crate::ui::util::{progress_bar, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App, store: &Store) {
    let record = store.get_current_month();
    let title = Span::styled(
        format!(
            " Categories ({}) | {} of {} disposable allocated ",
            record.budget_categories.len(),
            app.money(store.total_allocated()),
            app.money(record.disposable)
        ),
        theme::title_style(),
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(title);

    if record.budget_categories.is_empty() {
        let msg = vec![
            Line::from(""),
            Line::from(Span::styled(
                "No budget categories for this month",
                theme::dim_style(),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Use :category <name> <amount> to allocate part of your disposable income",
                theme::dim_style(),
            )),
        ];
        f.render_widget(Paragraph::new(msg).centered().block(block), area);
        return;
    }

    let header_cells = ["Category", "Allocated", "Used", "Remaining", "Usage", ""]
        .iter()
        .map(|h| Cell::from(*h).style(theme::header_style()));
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = record
        .budget_categories
        .iter()
        .enumerate()
        .skip(app.category_scroll)
        .take(area.height.saturating_sub(3) as usize)
        .map(|(i, cat)| {
            let percent = cat.usage_percent();
            let color = theme::usage_color(cat.usage_level());
            let remaining = cat.remaining();

            let style = if i == app.category_index {
                theme::selected_style()
            } else if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };

            Row::new(vec![
                Cell::from(truncate(&cat.name, 24)),
                Cell::from(app.money(cat.allocated)),
                Cell::from(app.money(cat.used)),
                Cell::from(Span::styled(
                    app.money(remaining),
                    Style::default().fg(theme::balance_color(remaining)),
                )),
                Cell::from(Span::styled(
                    progress_bar(percent, 20),
                    Style::default().fg(color),
                )),
                Cell::from(Span::styled(
                    format!("{:.0}%", percent.round()),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                )),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Min(16),
        Constraint::Length(14),
        Constraint::Length(14),
        Constraint::Length(14),
        Constraint::Length(22),
        Constraint::Length(6),
    ];

    let table = Table::new(rows, widths).header(header).block(block);
    f.render_widget(table, area);
}
