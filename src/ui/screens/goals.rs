use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, format_months, progress_bar, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    if app.goals.is_empty() {
        render_empty(f, area);
        return;
    }

    let items: Vec<ListItem> = app
        .goals
        .iter()
        .enumerate()
        .take(area.height.saturating_sub(2) as usize)
        .map(|(i, goal)| {
            let ratio = goal.progress_ratio();
            let color = if goal.is_reached() {
                theme::GREEN
            } else if ratio > 0.5 {
                theme::YELLOW
            } else {
                theme::ACCENT
            };

            let style = if i == app.goal_index {
                theme::selected_style()
            } else if i % 2 == 0 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };

            let eta = if goal.is_reached() {
                "reached".to_string()
            } else {
                let p = app.goal_projection(goal);
                format!(
                    "{} / {} redirected",
                    format_months(p.months_baseline),
                    format_months(p.months_optimized)
                )
            };

            ListItem::new(Line::from(vec![
                Span::styled(format!("{:<20}", truncate(&goal.name, 19)), style),
                Span::styled(
                    format!(
                        "{}/{} ",
                        format_amount(goal.current_amount),
                        format_amount(goal.target_amount)
                    ),
                    Style::default().fg(color),
                ),
                Span::styled(progress_bar(ratio, 20), Style::default().fg(color)),
                Span::styled(
                    format!(" {:.0}%  ", ratio * 100.0),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::styled(eta, theme::dim_style()),
            ]))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::OVERLAY))
            .title(Span::styled(
                format!(
                    " Savings goals (saving {} a month) ",
                    format_amount(app.monthly_saving)
                ),
                theme::block_title_style(),
            )),
    );
    f.render_widget(list, area);
}

fn render_empty(f: &mut Frame, area: Rect) {
    let msg = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled("No savings goals yet", theme::dim_style())),
        Line::from(""),
        Line::from(Span::styled(
            "Use :goal <target> <name> to start one",
            theme::dim_style(),
        )),
    ])
    .centered()
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::OVERLAY))
            .title(Span::styled(" Goals ", theme::block_title_style())),
    );
    f.render_widget(msg, area);
}
