use ratatui::{
    layout::{Constraint, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    if app.history.is_empty() {
        let msg = vec![
            Line::from(""),
            Line::from(Span::styled("No entries yet", theme::dim_style())),
            Line::from(""),
            Line::from(Span::styled(
                "Record one with :add <income|expense> <amount> <level> <description>",
                theme::dim_style(),
            )),
        ];
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::OVERLAY))
            .title(Span::styled(" History (0) ", theme::block_title_style()));
        f.render_widget(Paragraph::new(msg).centered().block(block), area);
        return;
    }

    let header_cells = ["ID", "Date", "Description", "Amount", "Type", "Sat", "Comment"]
        .iter()
        .map(|h| Cell::from(*h).style(theme::header_style()));
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = app
        .history
        .iter()
        .enumerate()
        .skip(app.history_scroll)
        .take(area.height.saturating_sub(3) as usize)
        .map(|(i, entry)| {
            let txn = &entry.transaction;
            let amount_style = if txn.is_income() {
                theme::income_style()
            } else {
                theme::expense_style()
            };
            let sign = if txn.is_income() { "+" } else { "-" };

            let (level, level_style) = match entry.level() {
                Some(l) => (l.to_string(), theme::satisfaction_style(l)),
                None => ("-".to_string(), theme::dim_style()),
            };
            let comment = entry
                .rating
                .as_ref()
                .map(|r| r.comment.as_str())
                .unwrap_or("");

            let style = if i == app.history_index {
                theme::selected_style()
            } else if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };

            Row::new(vec![
                Cell::from(txn.id.unwrap_or(0).to_string()),
                Cell::from(txn.date().to_string()),
                Cell::from(truncate(&txn.description, 30)),
                Cell::from(Span::styled(
                    format!("{sign}{}", format_amount(txn.amount)),
                    amount_style,
                )),
                Cell::from(txn.direction.label()),
                Cell::from(Span::styled(level, level_style)),
                Cell::from(truncate(comment, 30)),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(5),
        Constraint::Length(11),
        Constraint::Min(16),
        Constraint::Length(14),
        Constraint::Length(8),
        Constraint::Length(4),
        Constraint::Min(10),
    ];

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::OVERLAY))
            .title(Span::styled(
                format!(" History ({}) ", app.history.len()),
                theme::block_title_style(),
            )),
    );

    f.render_widget(table, area);
}
