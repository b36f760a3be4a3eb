use tracing::{debug, info};

use crate::config::Config;
use crate::dispatch::{ApiEvent, Command, Outcome};
use crate::fetch::{Ticket, TicketCounter};
use crate::views::{FormMode, GameListView, ReviewListView};

/// Which panel the shell shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Games,
    Reviews,
}

impl ViewKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Games => "Games",
            Self::Reviews => "Reviews",
        }
    }

    pub const ALL: [ViewKind; 2] = [Self::Games, Self::Reviews];
}

/// The mounted panel. Only one exists at a time; switching drops the other.
#[derive(Debug, Clone)]
pub enum ActiveView {
    Games(GameListView),
    Reviews(ReviewListView),
}

impl ActiveView {
    pub fn kind(&self) -> ViewKind {
        match self {
            ActiveView::Games(_) => ViewKind::Games,
            ActiveView::Reviews(_) => ViewKind::Reviews,
        }
    }

    /// True while the panel's list has not arrived yet.
    pub fn is_loading(&self) -> bool {
        match self {
            ActiveView::Games(v) => v.state.is_pending(),
            ActiveView::Reviews(v) => v.state.is_pending(),
        }
    }

    fn outstanding(&self) -> Vec<Ticket> {
        match self {
            ActiveView::Games(v) => v.outstanding(),
            ActiveView::Reviews(v) => v.outstanding(),
        }
    }
}

/// Input mode for text entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Typing into the add-game form.
    EditingForm,
    /// Typing a game id in the reviews panel.
    EditingGameId,
}

/// Shell settings taken from the config at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub form_mode: FormMode,
    pub show_covers: bool,
    pub review_game_id: String,
}

impl From<&Config> for Settings {
    fn from(config: &Config) -> Self {
        Self {
            form_mode: config.form_mode,
            show_covers: config.show_covers,
            review_game_id: config.review_game_id.clone(),
        }
    }
}

/// Main application state.
pub struct App {
    pub settings: Settings,
    pub view: ActiveView,
    pub should_quit: bool,
    pub show_help: bool,
    pub input_mode: InputMode,

    /// Game id the reviews panel is (or will be) showing.
    pub review_game_id: String,
    /// Buffer for the game id editor.
    pub id_input: String,

    pub status_msg: String,
    tickets: TicketCounter,
}

impl App {
    /// Build the shell with the games panel mounted. The returned commands
    /// carry the panel's initial fetch.
    pub fn new(settings: Settings) -> (Self, Vec<Command>) {
        let mut tickets = TicketCounter::new();
        let (games, request) = GameListView::mount(&mut tickets, settings.form_mode);
        let app = Self {
            review_game_id: settings.review_game_id.clone(),
            settings,
            view: ActiveView::Games(games),
            should_quit: false,
            show_help: false,
            input_mode: InputMode::Normal,
            id_input: String::new(),
            status_msg: "Loading games...".to_string(),
            tickets,
        };
        (app, vec![Command::Fetch(request)])
    }

    pub fn current_view(&self) -> ViewKind {
        self.view.kind()
    }

    /// Show `kind`. Selecting the panel already shown does nothing.
    pub fn set_view(&mut self, kind: ViewKind) -> Vec<Command> {
        if self.current_view() == kind {
            return Vec::new();
        }
        info!(from = self.current_view().label(), to = kind.label(), "switching view");

        let mut commands: Vec<Command> = self
            .view
            .outstanding()
            .into_iter()
            .map(Command::Cancel)
            .collect();
        self.input_mode = InputMode::Normal;

        match kind {
            ViewKind::Games => {
                let (view, request) = GameListView::mount(&mut self.tickets, self.settings.form_mode);
                self.view = ActiveView::Games(view);
                self.status_msg = "Loading games...".to_string();
                commands.push(Command::Fetch(request));
            }
            ViewKind::Reviews => {
                let (view, request) = ReviewListView::mount(&mut self.tickets, &self.review_game_id);
                self.view = ActiveView::Reviews(view);
                self.status_msg = String::new();
                commands.extend(request.map(Command::Fetch));
            }
        }
        commands
    }

    /// Show the reviews of `game_id`, switching panels if needed.
    pub fn open_reviews_for(&mut self, game_id: &str) -> Vec<Command> {
        self.review_game_id = game_id.to_string();
        if let ActiveView::Reviews(view) = &mut self.view {
            let (superseded, request) = view.set_game_id(&mut self.tickets, game_id);
            return superseded
                .map(Command::Cancel)
                .into_iter()
                .chain(request.map(Command::Fetch))
                .collect();
        }
        self.set_view(ViewKind::Reviews)
    }

    /// Submit the add-game form of the games panel.
    pub fn submit_form(&mut self) -> Vec<Command> {
        let ActiveView::Games(view) = &mut self.view else {
            return Vec::new();
        };
        match view.submit_form(&mut self.tickets) {
            Some(request) => {
                self.status_msg = "Saving game...".to_string();
                vec![Command::Fetch(request)]
            }
            None => Vec::new(),
        }
    }

    pub fn begin_edit_game_id(&mut self) {
        if self.current_view() == ViewKind::Reviews {
            self.id_input = self.review_game_id.clone();
            self.input_mode = InputMode::EditingGameId;
        }
    }

    pub fn commit_game_id(&mut self) -> Vec<Command> {
        self.input_mode = InputMode::Normal;
        let game_id = std::mem::take(&mut self.id_input).trim().to_string();
        self.open_reviews_for(&game_id)
    }

    pub fn cancel_edit_game_id(&mut self) {
        self.input_mode = InputMode::Normal;
        self.id_input.clear();
    }

    /// Route a finished request to the mounted panel. Outcomes nobody is
    /// waiting for are dropped.
    pub fn handle_api_event(&mut self, event: ApiEvent) {
        let ticket = event.ticket;
        let applied = match (&mut self.view, event.outcome) {
            (ActiveView::Games(view), Outcome::Games(result)) => {
                let applied = view.on_games(ticket, result);
                if applied {
                    self.status_msg = match view.state.ready() {
                        Some(games) => format!("{} loaded", counted(games.len(), "game")),
                        None => "Failed to load games".to_string(),
                    };
                }
                applied
            }
            (ActiveView::Games(view), Outcome::Created(result)) => {
                let title = result.as_ref().ok().map(|g| g.title.clone());
                let applied = view.on_created(ticket, result);
                if applied {
                    self.status_msg = match title {
                        Some(title) => {
                            info!(%title, "game added");
                            if !view.form.is_visible() && self.input_mode == InputMode::EditingForm {
                                self.input_mode = InputMode::Normal;
                            }
                            format!("Added \"{title}\"")
                        }
                        None => "Could not add game".to_string(),
                    };
                }
                applied
            }
            (ActiveView::Reviews(view), Outcome::Reviews(result)) => {
                let applied = view.on_reviews(ticket, result);
                if applied {
                    self.status_msg = match view.state.ready() {
                        Some(reviews) => format!("{} loaded", counted(reviews.len(), "review")),
                        None => "Failed to load reviews".to_string(),
                    };
                }
                applied
            }
            _ => false,
        };

        if !applied {
            debug!(%ticket, "discarding outcome for a view that is gone");
        }
    }
}

/// "1 game", "2 games".
fn counted(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("1 {noun}")
    } else {
        format!("{n} {noun}s")
    }
}
