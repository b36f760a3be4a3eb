use crate::app::App;
use crate::fetch::LoadState;
use crate::models::Game;
use crate::views::GameListView;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

use super::{form, truncate_str};

pub const NO_GAMES: &str = "No games registered yet.";
pub const NO_DESCRIPTION: &str = "No description.";
pub const UNKNOWN_PLATFORM: &str = "Unknown platform";

pub fn render(app: &App, view: &GameListView, frame: &mut Frame, area: Rect) {
    let (list_area, form_area) = if view.form.is_visible() {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(area);
        (chunks[0], Some(chunks[1]))
    } else {
        (area, None)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(format!(" All Games {} ", view.count_label()));

    match &view.state {
        LoadState::Idle | LoadState::Loading => {
            let p = Paragraph::new("Loading games...").block(block);
            frame.render_widget(p, list_area);
        }
        LoadState::Failed(message) => {
            let p = Paragraph::new(format!("Error: {message}"))
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: false })
                .block(block);
            frame.render_widget(p, list_area);
        }
        LoadState::Ready(games) if games.is_empty() => {
            let p = Paragraph::new(NO_GAMES)
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            frame.render_widget(p, list_area);
        }
        LoadState::Ready(games) => {
            let width = list_area.width.saturating_sub(4) as usize;
            let items: Vec<ListItem> = games
                .iter()
                .map(|game| ListItem::new(card_lines(game, app.settings.show_covers, width)))
                .collect();

            let list = List::new(items)
                .block(block)
                .highlight_style(
                    Style::default()
                        .bg(Color::DarkGray)
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                )
                .highlight_symbol("▸ ");

            let mut state = ListState::default();
            state.select(Some(view.selected));
            frame.render_stateful_widget(list, list_area, &mut state);
        }
    }

    if let Some(form_area) = form_area {
        form::render(app, &view.form, frame, form_area);
    }
}

/// Lines of one game card.
pub fn card_lines(game: &Game, show_media: bool, width: usize) -> Vec<Line<'_>> {
    let label = Style::default().fg(Color::DarkGray);
    let platform = game
        .platform
        .map(|p| p.label())
        .unwrap_or(UNKNOWN_PLATFORM);

    let mut lines = vec![
        Line::from(Span::styled(
            truncate_str(&game.title, width),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled("  Developer: ", label),
            Span::raw(game.developer.as_str()),
            Span::styled("  Year: ", label),
            Span::raw(game.release_year.to_string()),
            Span::styled("  Genre: ", label),
            Span::raw(game.genre.as_str()),
        ]),
        Line::from(vec![
            Span::styled("  Platform: ", label),
            Span::styled(platform, Style::default().fg(Color::Yellow)),
        ]),
    ];

    if show_media {
        if let Some(url) = game.cover_image_url.as_deref().filter(|u| !u.is_empty()) {
            lines.push(Line::from(vec![
                Span::styled("  Cover: ", label),
                Span::styled(
                    truncate_str(url, width.saturating_sub(9)),
                    Style::default().fg(Color::Blue).add_modifier(Modifier::UNDERLINED),
                ),
            ]));
        }
        let description = game
            .description
            .as_deref()
            .filter(|d| !d.is_empty())
            .unwrap_or(NO_DESCRIPTION);
        lines.push(Line::from(Span::styled(
            format!("  {}", truncate_str(description, width.saturating_sub(2))),
            Style::default().fg(Color::Gray),
        )));
    }
    lines.push(Line::from(""));
    lines
}
