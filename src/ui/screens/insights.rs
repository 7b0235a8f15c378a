use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::models::MAX_LEVEL;
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, format_months, format_months_saved, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(6),    // Flagged expenses
            Constraint::Length(8), // Goal simulation
        ])
        .split(area);

    render_flagged(f, chunks[0], app);
    render_simulation(f, chunks[1], app);
}

fn render_flagged(f: &mut Frame, area: Rect, app: &App) {
    let report = &app.report.low_satisfaction;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(
            format!(
                " Rated below {} ({} flagged, {}) ",
                app.threshold,
                report.count,
                format_amount(report.total_wasted)
            ),
            theme::block_title_style(),
        ));

    if app.report.is_all_aligned() {
        let msg = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "Nothing flagged. Your spending matches what you value.",
                Style::default()
                    .fg(theme::GREEN)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Raise the bar with :threshold <n>",
                theme::dim_style(),
            )),
        ])
        .centered()
        .block(block);
        f.render_widget(msg, area);
        return;
    }

    let items: Vec<ListItem> = report
        .details
        .iter()
        .skip(app.insights_scroll)
        .take(area.height.saturating_sub(2) as usize)
        .map(|d| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!(" {:<32}", truncate(&d.description, 32)),
                    theme::normal_style(),
                ),
                Span::styled(
                    format!("{:>14}", format_amount(d.amount)),
                    theme::expense_style(),
                ),
                Span::styled(
                    format!("   {}/{MAX_LEVEL}", d.level),
                    theme::satisfaction_style(d.level),
                ),
            ]))
        })
        .collect();

    f.render_widget(List::new(items).block(block), area);
}

fn render_simulation(f: &mut Frame, area: Rect, app: &App) {
    let report = &app.report;
    let p = &report.projection;
    let saved_style = if p.months_saved > rust_decimal::Decimal::ZERO {
        theme::income_style()
    } else {
        theme::dim_style()
    };

    let lines = vec![
        Line::from(vec![
            Span::styled(" Goal              ", theme::dim_style()),
            Span::styled(format_amount(report.goal_amount), theme::normal_style()),
        ]),
        Line::from(vec![
            Span::styled(" Monthly saving    ", theme::dim_style()),
            Span::styled(
                format_amount(report.base_monthly_savings),
                theme::normal_style(),
            ),
            Span::styled(
                format!(
                    "  + {} redirected",
                    format_amount(report.low_satisfaction.total_wasted)
                ),
                theme::dim_style(),
            ),
        ]),
        Line::from(vec![
            Span::styled(" Current pace      ", theme::dim_style()),
            Span::styled(format_months(p.months_baseline), theme::normal_style()),
        ]),
        Line::from(vec![
            Span::styled(" Redirecting waste ", theme::dim_style()),
            Span::styled(format_months(p.months_optimized), theme::normal_style()),
        ]),
        Line::from(vec![
            Span::styled(" Time saved        ", theme::dim_style()),
            Span::styled(
                format_months_saved(p),
                saved_style.add_modifier(Modifier::BOLD),
            ),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(
            " Goal simulation (:simulate <goal> <saving>) ",
            theme::block_title_style(),
        ));
    f.render_widget(Paragraph::new(lines).block(block), area);
}
