use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph},
    Frame,
};
use rust_decimal::prelude::ToPrimitive;

use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::truncate;

/// Each expense gets a bar sized by its share of spending, coloured by how
/// much it was worth.
pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(
            " Value Map (share of spending per 1000) ",
            theme::block_title_style(),
        ));

    if app.report.weights.is_empty() {
        let msg = Paragraph::new(Line::from(Span::styled(
            "No rated expenses yet",
            theme::dim_style(),
        )))
        .centered()
        .block(block);
        f.render_widget(msg, area);
        return;
    }

    let bar_width: u16 = 8;
    let capacity = (area.width.saturating_sub(2) / (bar_width + 1)).max(1) as usize;

    let bars: Vec<Bar> = app
        .report
        .weights
        .iter()
        .take(capacity)
        .map(|w| {
            let color = theme::satisfaction_color(w.satisfaction_level);
            Bar::default()
                .value(w.weight.round().to_u64().unwrap_or(0))
                .label(Line::from(truncate(&w.description, bar_width as usize)))
                .style(Style::default().fg(color))
                .value_style(
                    Style::default()
                        .fg(theme::HEADER_BG)
                        .bg(color)
                        .add_modifier(Modifier::BOLD),
                )
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(1)
        .max(1000);

    f.render_widget(chart, area);
}
