use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{ActiveView, App, InputMode, ViewKind};
use crate::dispatch::Command;

/// Apply one key press and return the commands it produces.
pub fn handle_key(app: &mut App, key: KeyEvent) -> Vec<Command> {
    // Ctrl+C always quits
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return Vec::new();
    }

    // If help is showing, any key closes it
    if app.show_help {
        app.show_help = false;
        return Vec::new();
    }

    match app.input_mode {
        InputMode::EditingForm => return handle_form_input(app, key),
        InputMode::EditingGameId => return handle_game_id_input(app, key),
        InputMode::Normal => {}
    }

    match key.code {
        KeyCode::Char('?') => {
            app.show_help = true;
            Vec::new()
        }
        KeyCode::Char('q') => {
            app.should_quit = true;
            Vec::new()
        }
        KeyCode::Char('1') => app.set_view(ViewKind::Games),
        KeyCode::Char('2') => app.set_view(ViewKind::Reviews),
        _ => match app.current_view() {
            ViewKind::Games => handle_games_key(app, key),
            ViewKind::Reviews => handle_reviews_key(app, key),
        },
    }
}

fn handle_games_key(app: &mut App, key: KeyEvent) -> Vec<Command> {
    let ActiveView::Games(view) = &mut app.view else {
        return Vec::new();
    };
    match key.code {
        KeyCode::Down | KeyCode::Char('j') => view.select_next(),
        KeyCode::Up | KeyCode::Char('k') => view.select_prev(),
        KeyCode::Char('a') => {
            view.form.toggle_visibility();
            if view.form.is_visible() {
                app.input_mode = InputMode::EditingForm;
            }
        }
        KeyCode::Char('r') => {
            if let Some(id) = view.selected_game().map(|g| g.id.clone()) {
                return app.open_reviews_for(&id);
            }
        }
        _ => {}
    }
    Vec::new()
}

fn handle_form_input(app: &mut App, key: KeyEvent) -> Vec<Command> {
    let ActiveView::Games(view) = &mut app.view else {
        app.input_mode = InputMode::Normal;
        return Vec::new();
    };
    let form = &mut view.form;
    match key.code {
        KeyCode::Esc => app.input_mode = InputMode::Normal,
        KeyCode::Enter => return app.submit_form(),
        KeyCode::Tab | KeyCode::Down => form.focus_next(),
        KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
        KeyCode::Left => form.cycle_platform(false),
        KeyCode::Right => form.cycle_platform(true),
        KeyCode::Backspace => form.backspace(),
        KeyCode::Char(c) => form.type_char(c),
        _ => {}
    }
    Vec::new()
}

fn handle_reviews_key(app: &mut App, key: KeyEvent) -> Vec<Command> {
    let ActiveView::Reviews(view) = &mut app.view else {
        return Vec::new();
    };
    match key.code {
        KeyCode::Down | KeyCode::Char('j') => view.scroll_down(),
        KeyCode::Up | KeyCode::Char('k') => view.scroll_up(),
        KeyCode::Char('e') => app.begin_edit_game_id(),
        _ => {}
    }
    Vec::new()
}

fn handle_game_id_input(app: &mut App, key: KeyEvent) -> Vec<Command> {
    match key.code {
        KeyCode::Enter => return app.commit_game_id(),
        KeyCode::Esc => app.cancel_edit_game_id(),
        KeyCode::Backspace => {
            app.id_input.pop();
        }
        KeyCode::Char(c) => app.id_input.push(c),
        _ => {}
    }
    Vec::new()
}
