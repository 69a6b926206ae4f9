use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Gauge, Paragraph},
    Frame,
};
use rust_decimal::Decimal;

use crate::models::HealthBand;
use crate::ui::app::App;
use crate::ui::commands::Store;
use crate::ui::theme;
use crate::ui::util::{bar_value, truncate};

const TREND_MONTHS: usize = 6;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App, store: &Store) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // Summary cards
            Constraint::Length(4), // Health gauge
            Constraint::Min(8),    // Charts
        ])
        .split(area);

    render_summary_cards(f, chunks[0], app, store);
    render_health(f, chunks[1], store);

    let charts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[2]);
    render_trend_chart(f, charts[0], store);
    render_allocation_chart(f, charts[1], store);
}

fn render_summary_cards(f: &mut Frame, area: Rect, app: &App, store: &Store) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 5); 5])
        .split(area);

    let record = store.get_current_month();
    let after_disposable = store.remaining_after_disposable();
    let remaining = store.remaining_budget();

    render_card(f, cards[0], "Income", app.money(record.income), theme::GREEN, None);
    render_card(
        f,
        cards[1],
        "Disposable",
        app.money(record.disposable),
        theme::YELLOW,
        None,
    );
    render_card(
        f,
        cards[2],
        "After Disposable",
        app.money(after_disposable),
        theme::balance_color(after_disposable),
        Some("income - disposable".into()),
    );
    render_card(
        f,
        cards[3],
        "Allocated",
        app.money(store.total_allocated()),
        theme::ACCENT,
        Some(format!("{} used", app.money(store.total_used()))),
    );
    render_card(
        f,
        cards[4],
        "Remaining Budget",
        app.money(remaining),
        theme::balance_color(remaining),
        Some(if remaining < Decimal::ZERO {
            "over-allocated".into()
        } else {
            "left to allocate".into()
        }),
    );
}

fn render_card(
    f: &mut Frame,
    area: Rect,
    title: &str,
    display: String,
    color: Color,
    subtitle: Option<String>,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(format!(" {title} "), theme::title_style()));

    let text = Paragraph::new(vec![
        Line::from(Span::styled(
            display,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(subtitle.unwrap_or_default(), theme::dim_style())),
    ])
    .centered()
    .block(block);

    f.render_widget(text, area);
}

fn render_health(f: &mut Frame, area: Rect, store: &Store) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(" Budget Health ", theme::title_style()));

    if store.get_current_month().income.is_zero() {
        let msg = Paragraph::new(Line::from(Span::styled(
            "Set this month's income with :income to see a health score",
            theme::dim_style(),
        )))
        .centered()
        .block(block);
        f.render_widget(msg, area);
        return;
    }

    let score = store.health_score();
    let band = HealthBand::from_score(score);
    let color = theme::health_color(band);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(inner);

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(color).bg(theme::SURFACE))
        .percent(u16::from(score))
        .label(Span::styled(
            format!("{score}/100 {band}"),
            Style::default()
                .fg(theme::TEXT)
                .add_modifier(Modifier::BOLD),
        ));
    f.render_widget(gauge, rows[0]);
    f.render_widget(
        Paragraph::new(Span::styled(band.describe(), theme::dim_style())).centered(),
        rows[1],
    );
}

fn legend(title: &str, entries: &[(&str, Color)]) -> Line<'static> {
    let mut spans = vec![Span::styled(format!(" {title} "), theme::title_style())];
    for (name, color) in entries {
        spans.push(Span::styled("■ ", Style::default().fg(*color)));
        spans.push(Span::styled(format!("{name} "), theme::dim_style()));
    }
    Line::from(spans)
}

fn bar(value: Decimal, color: Color) -> Bar<'static> {
    Bar::default()
        .value(bar_value(value))
        .text_value(String::new())
        .style(Style::default().fg(color))
}

fn render_trend_chart(f: &mut Frame, area: Rect, store: &Store) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(legend(
            "Trend",
            &[
                ("income", theme::GREEN),
                ("disposable", theme::YELLOW),
                ("allocated", theme::ACCENT),
            ],
        ));

    let points = store.trend(TREND_MONTHS);
    let mut chart = BarChart::default()
        .block(block)
        .bar_width(2)
        .bar_gap(0)
        .group_gap(2);
    for point in &points {
        let label = format!("{:02}/{:02}", point.month.month(), point.month.year() % 100);
        let bars = [
            bar(point.income, theme::GREEN),
            bar(point.disposable, theme::YELLOW),
            bar(point.allocated, theme::ACCENT),
        ];
        chart = chart.data(BarGroup::default().label(Line::from(label)).bars(&bars));
    }

    f.render_widget(chart, area);
}

fn render_allocation_chart(f: &mut Frame, area: Rect, store: &Store) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(legend(
            "Allocation",
            &[("allocated", theme::ACCENT), ("used", theme::RED)],
        ));

    let categories = &store.get_current_month().budget_categories;
    if categories.is_empty() {
        let msg = Paragraph::new(Line::from(Span::styled(
            "No categories yet. Add one with :category <name> <amount>",
            theme::dim_style(),
        )))
        .centered()
        .block(block);
        f.render_widget(msg, area);
        return;
    }

    let mut chart = BarChart::default()
        .block(block)
        .bar_width(3)
        .bar_gap(0)
        .group_gap(2);
    for category in categories.iter().take(8) {
        let bars = [
            bar(category.allocated, theme::ACCENT),
            bar(category.used, theme::usage_color(category.usage_level())),
        ];
        chart = chart.data(
            BarGroup::default()
                .label(Line::from(truncate(&category.name, 6)))
                .bars(&bars),
        );
    }

    f.render_widget(chart, area);
}
