use tracing::warn;

use crate::api::ApiError;
use crate::dispatch::{ApiRequest, RequestKind};
use crate::fetch::{LoadState, Ticket, TicketCounter};
use crate::models::Game;
use crate::views::add_game_form::{AddGameForm, FormMode};

/// Shown before the error text when the list cannot be loaded.
pub const UNREACHABLE_HINT: &str = "Could not load games (is the API server running?)";

pub const LIST_LOADING: &str = "Games are still loading";
pub const LIST_FAILED: &str = "Games could not be loaded; reopen the panel to retry";

/// The games panel: the fetched collection plus the add-game form.
#[derive(Debug, Clone)]
pub struct GameListView {
    pub state: LoadState<Vec<Game>>,
    pub form: AddGameForm,
    pub selected: usize,
    list_ticket: Option<Ticket>,
    create_ticket: Option<Ticket>,
}

impl GameListView {
    /// Mount the view and return the one fetch it performs.
    pub fn mount(tickets: &mut TicketCounter, form_mode: FormMode) -> (Self, ApiRequest) {
        let ticket = tickets.issue();
        let view = Self {
            state: LoadState::Loading,
            form: AddGameForm::new(form_mode),
            selected: 0,
            list_ticket: Some(ticket),
            create_ticket: None,
        };
        let request = ApiRequest {
            ticket,
            kind: RequestKind::ListGames,
        };
        (view, request)
    }

    /// Games currently displayed; empty until the list has loaded.
    pub fn games(&self) -> &[Game] {
        self.state.ready().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn count_label(&self) -> String {
        format!("({})", self.games().len())
    }

    /// Tickets this view is still waiting on.
    pub fn outstanding(&self) -> Vec<Ticket> {
        self.list_ticket.into_iter().chain(self.create_ticket).collect()
    }

    /// Apply the list outcome. Returns false if the ticket is stale.
    pub fn on_games(&mut self, ticket: Ticket, result: Result<Vec<Game>, ApiError>) -> bool {
        if self.list_ticket != Some(ticket) {
            return false;
        }
        self.list_ticket = None;
        self.state = match result {
            Ok(games) => LoadState::Ready(games),
            Err(err) => LoadState::Failed(format!("{UNREACHABLE_HINT}: {}", err.message())),
        };
        self.selected = 0;
        true
    }

    /// Submit the form. `None` means nothing is sent. Creates wait for the
    /// list so the returned game always has somewhere to go.
    pub fn submit_form(&mut self, tickets: &mut TicketCounter) -> Option<ApiRequest> {
        match &self.state {
            LoadState::Ready(_) => {}
            LoadState::Failed(_) => {
                self.form.reject(LIST_FAILED);
                return None;
            }
            LoadState::Idle | LoadState::Loading => {
                self.form.reject(LIST_LOADING);
                return None;
            }
        }
        let new_game = self.form.submit()?;
        let ticket = tickets.issue();
        self.create_ticket = Some(ticket);
        Some(ApiRequest {
            ticket,
            kind: RequestKind::CreateGame(new_game),
        })
    }

    /// Apply the create outcome. Returns false if the ticket is stale.
    pub fn on_created(&mut self, ticket: Ticket, result: Result<Game, ApiError>) -> bool {
        if self.create_ticket != Some(ticket) {
            return false;
        }
        self.create_ticket = None;
        if let Some(game) = self.form.finish_submit(result) {
            match self.state.ready_mut() {
                Some(games) => games.push(game),
                // submit_form only sends once the list is Ready
                None => warn!(id = %game.id, "created game has no list to join"),
            }
        }
        true
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.games().len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn selected_game(&self) -> Option<&Game> {
        self.games().get(self.selected)
    }
}
