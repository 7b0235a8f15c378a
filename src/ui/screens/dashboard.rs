use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use rust_decimal::Decimal;

use crate::ui::app::{App, RECENT_ENTRIES};
use crate::ui::theme;
use crate::ui::util::{bar_len, format_amount, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Summary cards
            Constraint::Min(5),    // Recent entries
        ])
        .split(area);

    render_summary_cards(f, chunks[0], app);
    render_recent(f, chunks[1], app);
}

fn render_summary_cards(f: &mut Frame, area: Rect, app: &App) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(34),
            Constraint::Percentage(33),
            Constraint::Percentage(33),
        ])
        .split(area);

    let totals = &app.report.totals;
    let income_count = app.history.iter().filter(|e| e.transaction.is_income()).count();
    let expense_count = app.history.len() - income_count;

    render_card(
        f,
        cards[0],
        "Income",
        totals.income,
        theme::GREEN,
        Some(format!("{income_count} entries")),
    );
    render_card(
        f,
        cards[1],
        "Expenses",
        totals.expense,
        theme::RED,
        Some(format!("{expense_count} entries")),
    );
    render_card(
        f,
        cards[2],
        "Remaining",
        totals.net,
        if totals.net >= Decimal::ZERO {
            theme::GREEN
        } else {
            theme::RED
        },
        None,
    );
}

fn render_card(
    f: &mut Frame,
    area: Rect,
    title: &str,
    amount: Decimal,
    color: ratatui::style::Color,
    subtitle: Option<String>,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(format!(" {title} "), theme::block_title_style()));

    let text = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            format_amount(amount),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(subtitle.unwrap_or_default(), theme::dim_style())),
    ])
    .centered()
    .block(block);

    f.render_widget(text, area);
}

/// Latest entries, each with a bar scaled against the largest amount shown.
fn render_recent(f: &mut Frame, area: Rect, app: &App) {
    let entries = app.dashboard_entries();
    let title = if app.dashboard_show_all {
        format!(" All entries ({}) ", entries.len())
    } else {
        format!(" Latest {RECENT_ENTRIES} (a: show all) ")
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(title, theme::block_title_style()));

    if entries.is_empty() {
        let msg = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled("Nothing recorded yet", theme::dim_style())),
            Line::from(""),
            Line::from(Span::styled(
                "Add one with :add expense 12.50 3 Late night pizza",
                theme::dim_style(),
            )),
        ])
        .centered()
        .block(block);
        f.render_widget(msg, area);
        return;
    }

    let max = entries
        .iter()
        .map(|e| e.transaction.amount)
        .max()
        .unwrap_or(Decimal::ZERO);
    let bar_width = (area.width as usize).saturating_sub(52).clamp(4, 40);

    let lines: Vec<Line> = entries
        .iter()
        .take(area.height.saturating_sub(2) as usize)
        .map(|entry| {
            let txn = &entry.transaction;
            let amount_style = if txn.is_income() {
                theme::income_style()
            } else {
                theme::expense_style()
            };
            let cells = bar_len(txn.amount, max, bar_width);
            let level = entry
                .level()
                .map(|l| format!("{l:>2}/10"))
                .unwrap_or_else(|| "  -  ".into());
            let level_style = entry
                .level()
                .map(theme::satisfaction_style)
                .unwrap_or_else(theme::dim_style);

            Line::from(vec![
                Span::styled(format!(" {} ", txn.date()), theme::dim_style()),
                Span::styled(format!("{:<20} ", truncate(&txn.description, 20)), theme::normal_style()),
                Span::styled(format!("{:>12} ", format_amount(txn.signed_amount())), amount_style),
                Span::styled(format!("{:<width$}", "█".repeat(cells), width = bar_width), amount_style),
                Span::styled(format!(" {level}"), level_style),
            ])
        })
        .collect();

    f.render_widget(Paragraph::new(lines).block(block), area);
}
