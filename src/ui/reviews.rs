use crate::app::{App, InputMode};
use crate::fetch::LoadState;
use crate::models::Review;
use crate::views::ReviewListView;
use crate::views::review_list::{ANONYMOUS, UNKNOWN_GAME, rating_stars};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use unicode_width::UnicodeWidthStr;

pub const NO_REVIEWS: &str = "No reviews for this game.";

pub fn render(app: &App, view: &ReviewListView, frame: &mut Frame, area: Rect) {
    let editing = app.input_mode == InputMode::EditingGameId;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(area);

    render_id_bar(app, view, frame, chunks[0], editing);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Reviews ");
    let body = chunks[1];

    match &view.state {
        LoadState::Idle | LoadState::Loading => {
            frame.render_widget(Paragraph::new("Loading reviews...").block(block), body);
        }
        LoadState::Failed(message) => {
            let p = Paragraph::new(message.as_str())
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: false })
                .block(block);
            frame.render_widget(p, body);
        }
        LoadState::Ready(reviews) if reviews.is_empty() => {
            let p = Paragraph::new(NO_REVIEWS)
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            frame.render_widget(p, body);
        }
        LoadState::Ready(reviews) => {
            let items: Vec<ListItem> = reviews
                .iter()
                .map(|r| ListItem::new(review_lines(r)))
                .collect();
            let list = List::new(items)
                .block(block)
                .highlight_style(Style::default().bg(Color::DarkGray));
            let mut state = ListState::default();
            state.select(Some(view.scroll));
            frame.render_stateful_widget(list, body, &mut state);
        }
    }
}

fn render_id_bar(app: &App, view: &ReviewListView, frame: &mut Frame, area: Rect, editing: bool) {
    let (value, border) = if editing {
        (app.id_input.as_str(), Color::Yellow)
    } else {
        (view.game_id.as_str(), Color::DarkGray)
    };
    let prefix = " Game ID: ";
    let p = Paragraph::new(Line::from(vec![
        Span::styled(prefix, Style::default().fg(Color::DarkGray)),
        Span::raw(value),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(format!(" Reviews for game (ID: {}) ", view.game_id)),
    );
    frame.render_widget(p, area);

    if editing {
        let x = area.x + 1 + (prefix.width() + value.width()) as u16;
        frame.set_cursor_position((x.min(area.right().saturating_sub(2)), area.y + 1));
    }
}

/// Lines of one review item.
pub fn review_lines(review: &Review) -> Vec<Line<'_>> {
    let title = review.game_title().unwrap_or(UNKNOWN_GAME);
    let user = review.username().unwrap_or(ANONYMOUS);
    vec![
        Line::from(vec![
            Span::styled(
                title,
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            Span::raw(rating_stars(review.rating)),
        ]),
        Line::from(vec![
            Span::styled("  User: ", Style::default().fg(Color::DarkGray)),
            Span::raw(user),
        ]),
        Line::from(format!("  {}", review.text)),
        Line::from(""),
    ]
}
