use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Frame,
};

use super::app::{App, InputMode, Screen};
use super::commands;
use super::theme;

const GLOBAL_KEYS: &[(&str, &str)] = &[
    ("1-5 / Tab", "switch screen"),
    ("j/k g/G", "move, top, bottom"),
    ("Ctrl-d/u", "half page"),
    (":", "command"),
    ("Esc", "clear status"),
    ("Ctrl-q", "quit"),
];

pub(crate) fn render(f: &mut Frame, app: &App) {
    let [tabs, content, status, command] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(5),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(f.area());

    render_tab_bar(f, tabs, app);
    match app.screen {
        Screen::Dashboard => super::screens::dashboard::render(f, content, app),
        Screen::History => super::screens::history::render(f, content, app),
        Screen::Insights => super::screens::insights::render(f, content, app),
        Screen::ValueMap => super::screens::value_map::render(f, content, app),
        Screen::Goals => super::screens::goals::render(f, content, app),
    }
    render_status_bar(f, status, app);
    render_command_bar(f, command, app);

    if app.show_help {
        render_help_overlay(f, app);
    }
}

/// Insights carries a badge with the flagged count so regret is visible from
/// any screen.
fn render_tab_bar(f: &mut Frame, area: Rect, app: &App) {
    let flagged = app.report.low_satisfaction.count;
    let titles: Vec<Line> = Screen::all()
        .iter()
        .enumerate()
        .map(|(i, &screen)| {
            let name_style = if screen == app.screen {
                Style::default()
                    .fg(theme::ACCENT)
                    .add_modifier(Modifier::BOLD)
            } else {
                theme::dim_style()
            };
            let mut spans = vec![
                Span::styled(format!("{}:", i + 1), theme::dim_style()),
                Span::styled(screen.to_string(), name_style),
            ];
            if screen == Screen::Insights && flagged > 0 {
                spans.push(Span::styled(format!(" ({flagged})"), theme::expense_style()));
            }
            Line::from(spans)
        })
        .collect();

    let tabs = Tabs::new(titles)
        .divider(Span::styled(" | ", Style::default().fg(theme::OVERLAY)))
        .style(Style::default().bg(theme::HEADER_BG));
    f.render_widget(tabs, area);
}

fn mode_color(mode: InputMode) -> Color {
    match mode {
        InputMode::Normal => theme::ACCENT,
        InputMode::Command | InputMode::Editing => theme::GREEN,
        InputMode::Confirm => theme::RED,
    }
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mode = format!(" {} ", app.input_mode);
    let summary = format!(" {} | {} ", app.screen, app.status_summary());
    let summary_style = match app.screen {
        Screen::Insights | Screen::ValueMap if app.report.low_satisfaction.count > 0 => {
            theme::status_bar_style().fg(theme::PEACH)
        }
        _ => theme::status_bar_style(),
    };
    let hints: String = app
        .screen
        .hints()
        .iter()
        .chain(&[("?", "help")])
        .map(|(key, what)| format!(" {key} {what} "))
        .collect::<Vec<_>>()
        .join("|");

    let used = mode.chars().count() + summary.chars().count() + hints.chars().count();
    let pad = (area.width as usize).saturating_sub(used);

    let bar = Paragraph::new(Line::from(vec![
        Span::styled(
            mode,
            Style::default()
                .fg(theme::HEADER_BG)
                .bg(mode_color(app.input_mode))
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(summary, summary_style),
        Span::styled(" ".repeat(pad), theme::status_bar_style()),
        Span::styled(hints, theme::status_bar_style()),
    ]));
    f.render_widget(bar, area);
}

/// A typed-input line and the cursor column just past the input.
fn prompt<'a>(label: &'static str, color: Color, input: &'a str) -> (Line<'a>, Option<u16>) {
    let cursor = (label.chars().count() + input.chars().count()) as u16;
    (
        Line::from(vec![
            Span::styled(label, Style::default().fg(color)),
            Span::styled(input, theme::command_bar_style()),
        ]),
        Some(cursor),
    )
}

fn render_command_bar(f: &mut Frame, area: Rect, app: &App) {
    let (content, cursor) = match app.input_mode {
        InputMode::Command => prompt(":", theme::ACCENT, &app.command_input),
        InputMode::Editing => prompt("rename> ", theme::GREEN, &app.command_input),
        InputMode::Confirm => (
            Line::from(vec![
                Span::styled(app.confirm_message.as_str(), Style::default().fg(theme::YELLOW)),
                Span::styled(" [y/N] ", Style::default().fg(theme::RED)),
            ]),
            None,
        ),
        InputMode::Normal if app.status_message.is_empty() => (
            Line::from(Span::styled(
                " Press : for commands, ? for help",
                theme::dim_style(),
            )),
            None,
        ),
        InputMode::Normal => (
            Line::from(Span::styled(
                app.status_message.as_str(),
                theme::command_bar_style(),
            )),
            None,
        ),
    };

    f.render_widget(
        Paragraph::new(content).style(Style::default().bg(theme::COMMAND_BG)),
        area,
    );
    if let Some(offset) = cursor {
        f.set_cursor_position((area.x + offset, area.y));
    }
}

fn section_title(title: String) -> Line<'static> {
    Line::from(Span::styled(
        format!(" {title}"),
        Style::default()
            .fg(theme::YELLOW)
            .add_modifier(Modifier::BOLD),
    ))
}

fn help_row(key: &str, what: &str, key_width: usize) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {key:<key_width$} "), Style::default().fg(theme::ACCENT)),
        Span::styled(what.to_string(), theme::normal_style()),
    ])
}

/// Screen keys first, then every `:` command by group, then global keys.
fn render_help_overlay(f: &mut Frame, app: &App) {
    let sections = commands::help_sections();
    let key_width = sections
        .iter()
        .flat_map(|(_, rows)| rows.iter().map(|(label, _)| label.chars().count()))
        .chain(GLOBAL_KEYS.iter().map(|(key, _)| key.chars().count()))
        .max()
        .unwrap_or(0);

    let mut lines = vec![
        Line::from(Span::styled(
            " WorthIt Help ",
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        section_title(format!("On {}", app.screen)),
    ];
    lines.extend(
        app.screen
            .hints()
            .iter()
            .map(|(key, what)| help_row(key, what, key_width)),
    );

    for (group, rows) in &sections {
        lines.push(Line::from(""));
        lines.push(section_title(group.to_string()));
        lines.extend(rows.iter().map(|(label, desc)| help_row(label, desc, key_width)));
    }

    lines.push(Line::from(""));
    lines.push(section_title("Keys".to_string()));
    lines.extend(
        GLOBAL_KEYS
            .iter()
            .map(|(key, what)| help_row(key, what, key_width)),
    );
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        " Press any key to close ",
        theme::dim_style(),
    )));

    let area = f.area();
    let text_width = lines.iter().map(Line::width).max().unwrap_or(0) as u16;
    let width = (text_width + 4).min(area.width.saturating_sub(4));
    let height = (lines.len() as u16 + 2).min(area.height.saturating_sub(2));
    let popup = Rect::new(
        area.x + area.width.saturating_sub(width) / 2,
        area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    );

    f.render_widget(Clear, popup);
    f.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme::ACCENT))
                .style(Style::default().bg(theme::HEADER_BG)),
        ),
        popup,
    );
}
