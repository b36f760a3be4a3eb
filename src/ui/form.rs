use crate::app::{App, InputMode};
use crate::models::DraftField;
use crate::views::AddGameForm;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use unicode_width::UnicodeWidthStr;

const LABEL_WIDTH: usize = 14;

pub fn render(app: &App, form: &AddGameForm, frame: &mut Frame, area: Rect) {
    let editing = app.input_mode == InputMode::EditingForm;
    let border = if editing { Color::Yellow } else { Color::DarkGray };

    let mut lines = vec![Line::from("")];
    let mut cursor = None;

    for (row, field) in DraftField::ALL.into_iter().enumerate() {
        let focused = editing && field == form.focus;
        let marker = if field.is_required() { "*" } else { " " };
        let label = format!(" {}{marker}", field.label());
        let label = format!("{label:<LABEL_WIDTH$}");

        let value = form.draft.value(field);
        let value_span = if field == DraftField::Platform {
            Span::styled(format!("< {value} >"), Style::default().fg(Color::Yellow))
        } else {
            Span::raw(value.to_string())
        };

        let label_style = if focused {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        if focused && field != DraftField::Platform {
            // +1 for the border, +1 for the blank first line
            let x = area.x + 1 + (LABEL_WIDTH + value.width()) as u16;
            let y = area.y + 2 + row as u16;
            cursor = Some((x.min(area.right().saturating_sub(2)), y));
        }

        lines.push(Line::from(vec![Span::styled(label, label_style), value_span]));
    }

    lines.push(Line::from(""));
    if form.is_submitting() {
        lines.push(Line::from(Span::styled(
            " Saving…",
            Style::default().fg(Color::Yellow),
        )));
    } else if let Some(error) = form.error() {
        lines.push(Line::from(Span::styled(
            format!(" Error: {error}"),
            Style::default().fg(Color::Red),
        )));
    } else if !editing {
        lines.push(Line::from(Span::styled(
            " Press a to edit",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let p = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(" Add Game "),
    );
    frame.render_widget(p, area);

    if let Some(position) = cursor {
        frame.set_cursor_position(position);
    }
}
