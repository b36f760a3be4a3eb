mod form;
mod games;
mod help;
mod reviews;

use crate::app::{ActiveView, App, InputMode, ViewKind};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
};

/// Top-level render dispatch.
pub fn render(app: &App, frame: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_nav(app, frame, chunks[0]);

    match &app.view {
        ActiveView::Games(view) => games::render(app, view, frame, chunks[1]),
        ActiveView::Reviews(view) => reviews::render(app, view, frame, chunks[1]),
    }

    render_status(app, frame, chunks[2]);

    // Render help overlay on top if active
    if app.show_help {
        help::render(frame);
    }
}

fn render_nav(app: &App, frame: &mut Frame, area: Rect) {
    let titles: Vec<Line> = ViewKind::ALL
        .iter()
        .enumerate()
        .map(|(i, kind)| {
            let style = if *kind == app.current_view() {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            Line::from(Span::styled(format!("{} {}", i + 1, kind.label()), style))
        })
        .collect();

    let selected = ViewKind::ALL
        .iter()
        .position(|k| *k == app.current_view())
        .unwrap_or(0);

    let tabs = Tabs::new(titles)
        .select(selected)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" Game Tracker "),
        )
        .highlight_style(Style::default().fg(Color::Cyan));
    frame.render_widget(tabs, area);
}

fn key_hint(key: &'static str) -> Span<'static> {
    Span::styled(
        key,
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )
}

fn render_status(app: &App, frame: &mut Frame, area: Rect) {
    let mut spans = match (&app.input_mode, &app.view) {
        (InputMode::EditingForm, _) => vec![
            key_hint(" Tab"),
            Span::raw(" Next field  "),
            key_hint("←→"),
            Span::raw(" Platform  "),
            key_hint("Enter"),
            Span::raw(" Save  "),
            key_hint("Esc"),
            Span::raw(" Done  "),
        ],
        (InputMode::EditingGameId, _) => vec![
            key_hint(" Enter"),
            Span::raw(" Load reviews  "),
            key_hint("Esc"),
            Span::raw(" Cancel  "),
        ],
        (InputMode::Normal, ActiveView::Games(view)) => {
            let form_hint = if view.form.mode == crate::views::FormMode::Toggle {
                view.form.toggle_label()
            } else {
                "Edit form"
            };
            vec![
                key_hint(" 1/2"),
                Span::raw(" View  "),
                key_hint("↑↓"),
                Span::raw(" Navigate  "),
                key_hint("a"),
                Span::raw(format!(" {form_hint}  ")),
                key_hint("r"),
                Span::raw(" Reviews  "),
                key_hint("?"),
                Span::raw(" Help  "),
                key_hint("q"),
                Span::raw(" Quit  "),
            ]
        }
        (InputMode::Normal, ActiveView::Reviews(_)) => vec![
            key_hint(" 1/2"),
            Span::raw(" View  "),
            key_hint("↑↓"),
            Span::raw(" Scroll  "),
            key_hint("e"),
            Span::raw(" Game id  "),
            key_hint("?"),
            Span::raw(" Help  "),
            key_hint("q"),
            Span::raw(" Quit  "),
        ],
    };
    let status_color = if app.view.is_loading() {
        Color::Yellow
    } else {
        Color::DarkGray
    };
    spans.push(Span::styled(
        app.status_msg.as_str(),
        Style::default().fg(status_color),
    ));
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Truncate a string to `max_width` characters, adding "…" if truncated.
pub fn truncate_str(s: &str, max_width: usize) -> String {
    if s.chars().count() <= max_width {
        s.to_string()
    } else {
        let mut result: String = s.chars().take(max_width.saturating_sub(1)).collect();
        result.push('…');
        result
    }
}
