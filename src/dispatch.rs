use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio::task::AbortHandle;
use tracing::debug;

use crate::api::{ApiClient, ApiError};
use crate::fetch::Ticket;
use crate::models::{Game, NewGame, Review};

/// What a view wants fetched.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestKind {
    ListGames,
    CreateGame(NewGame),
    ListReviews { game_id: String },
}

/// A request tagged with the ticket its outcome must carry.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub ticket: Ticket,
    pub kind: RequestKind,
}

/// Result of a finished request.
#[derive(Debug, Clone)]
pub enum Outcome {
    Games(Result<Vec<Game>, ApiError>),
    Created(Result<Game, ApiError>),
    Reviews(Result<Vec<Review>, ApiError>),
}

/// Message sent from a request task back to the UI loop
#[derive(Debug, Clone)]
pub struct ApiEvent {
    pub ticket: Ticket,
    pub outcome: Outcome,
}

/// Side effects the shell asks the runtime to perform.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Fetch(ApiRequest),
    Cancel(Ticket),
}

/// Runs requests as tasks and funnels their outcomes into one channel.
pub struct Dispatcher {
    client: ApiClient,
    event_tx: UnboundedSender<ApiEvent>,
    in_flight: Vec<(Ticket, AbortHandle)>,
}

impl Dispatcher {
    /// Create a dispatcher and the receiver the UI loop drains.
    pub fn new(client: ApiClient) -> (Self, UnboundedReceiver<ApiEvent>) {
        let (event_tx, event_rx) = unbounded_channel();
        (
            Self {
                client,
                event_tx,
                in_flight: Vec::new(),
            },
            event_rx,
        )
    }

    pub fn run(&mut self, commands: Vec<Command>) {
        for command in commands {
            match command {
                Command::Fetch(request) => self.spawn(request),
                Command::Cancel(ticket) => self.cancel(ticket),
            }
        }
    }

    fn spawn(&mut self, request: ApiRequest) {
        let client = self.client.clone();
        let event_tx = self.event_tx.clone();
        let ticket = request.ticket;
        debug!(%ticket, kind = ?request.kind, "dispatching request");

        let handle = tokio::spawn(async move {
            let outcome = match request.kind {
                RequestKind::ListGames => Outcome::Games(client.list_games().await),
                RequestKind::CreateGame(draft) => Outcome::Created(client.create_game(&draft).await),
                RequestKind::ListReviews { game_id } => {
                    Outcome::Reviews(client.list_reviews_for_game(&game_id).await)
                }
            };
            // A closed channel means the UI loop is gone.
            let _ = event_tx.send(ApiEvent { ticket, outcome });
        });

        self.in_flight.retain(|(_, h)| !h.is_finished());
        self.in_flight.push((ticket, handle.abort_handle()));
    }

    fn cancel(&mut self, ticket: Ticket) {
        self.in_flight.retain(|(t, handle)| {
            if *t == ticket {
                debug!(%ticket, "aborting request");
                handle.abort();
                false
            } else {
                !handle.is_finished()
            }
        });
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.iter().filter(|(_, h)| !h.is_finished()).count()
    }
}
