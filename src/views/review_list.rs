use crate::api::ApiError;
use crate::dispatch::{ApiRequest, RequestKind};
use crate::fetch::{LoadState, Ticket, TicketCounter};
use crate::models::Review;

/// Length of the server's object identifiers.
pub const GAME_ID_LEN: usize = 24;

pub const STAR: &str = "⭐";
pub const UNKNOWN_GAME: &str = "Unknown game";
pub const ANONYMOUS: &str = "Anonymous";

/// Check the shape of a game id before it is sent anywhere.
pub fn validate_game_id(game_id: &str) -> Result<(), String> {
    if game_id.is_empty() {
        return Err("Invalid game id for reviews: no game id given".to_string());
    }
    let len = game_id.chars().count();
    if len != GAME_ID_LEN {
        return Err(format!(
            "Invalid game id for reviews: expected {GAME_ID_LEN} characters, got {len}"
        ));
    }
    Ok(())
}

/// Star glyph repeated exactly `rating` times.
pub fn rating_stars(rating: u8) -> String {
    STAR.repeat(rating as usize)
}

/// The reviews panel for one game.
#[derive(Debug, Clone)]
pub struct ReviewListView {
    pub game_id: String,
    pub state: LoadState<Vec<Review>>,
    pub scroll: usize,
    pending: Option<Ticket>,
}

impl ReviewListView {
    /// Mount for `game_id`. An id of the wrong shape fails without a request.
    pub fn mount(tickets: &mut TicketCounter, game_id: &str) -> (Self, Option<ApiRequest>) {
        let mut view = Self {
            game_id: String::new(),
            state: LoadState::Idle,
            scroll: 0,
            pending: None,
        };
        let request = view.load(tickets, game_id);
        (view, request)
    }

    /// Point the view at another game. Returns the superseded ticket, if
    /// any, and the new request. Same id means no change.
    pub fn set_game_id(
        &mut self,
        tickets: &mut TicketCounter,
        game_id: &str,
    ) -> (Option<Ticket>, Option<ApiRequest>) {
        if game_id == self.game_id {
            return (None, None);
        }
        let superseded = self.pending.take();
        (superseded, self.load(tickets, game_id))
    }

    fn load(&mut self, tickets: &mut TicketCounter, game_id: &str) -> Option<ApiRequest> {
        self.game_id = game_id.to_string();
        self.scroll = 0;
        self.pending = None;
        self.state = LoadState::Loading;

        if let Err(message) = validate_game_id(game_id) {
            self.state = LoadState::Failed(message);
            return None;
        }

        let ticket = tickets.issue();
        self.pending = Some(ticket);
        Some(ApiRequest {
            ticket,
            kind: RequestKind::ListReviews {
                game_id: game_id.to_string(),
            },
        })
    }

    pub fn outstanding(&self) -> Vec<Ticket> {
        self.pending.into_iter().collect()
    }

    /// Apply the reviews outcome. Returns false if the ticket is stale.
    pub fn on_reviews(&mut self, ticket: Ticket, result: Result<Vec<Review>, ApiError>) -> bool {
        if self.pending != Some(ticket) {
            return false;
        }
        self.pending = None;
        self.state = match result {
            Ok(reviews) => LoadState::Ready(reviews),
            Err(err) => LoadState::Failed(format!("Error loading reviews: {}", err.message())),
        };
        true
    }

    pub fn reviews(&self) -> &[Review] {
        self.state.ready().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn scroll_down(&mut self) {
        if self.scroll + 1 < self.reviews().len() {
            self.scroll += 1;
        }
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const VALID_ID: &str = "65231c503525e982181283d7";
    const OTHER_ID: &str = "65231c503525e982181283d8";

    fn review(id: &str, rating: u8) -> Review {
        Review {
            id: id.into(),
            game: None,
            user: None,
            rating,
            text: "ok".into(),
        }
    }

    #[test]
    fn test_validate_game_id() {
        assert!(validate_game_id(VALID_ID).is_ok());
        assert!(validate_game_id("").unwrap_err().contains("no game id"));
        assert!(validate_game_id("abc").unwrap_err().contains("got 3"));
    }

    #[test]
    fn test_invalid_id_fails_without_request() {
        let mut tickets = TicketCounter::new();
        let (view, request) = ReviewListView::mount(&mut tickets, "short");
        assert!(request.is_none());
        assert!(view.state.error().unwrap().starts_with("Invalid game id"));
        assert!(view.outstanding().is_empty());
    }

    #[test]
    fn test_valid_id_requests_reviews() {
        let mut tickets = TicketCounter::new();
        let (view, request) = ReviewListView::mount(&mut tickets, VALID_ID);
        let request = request.unwrap();
        assert_eq!(
            request.kind,
            RequestKind::ListReviews {
                game_id: VALID_ID.to_string()
            }
        );
        assert_eq!(view.state, LoadState::Loading);
    }

    #[test]
    fn test_reviews_loaded_and_failed() {
        let mut tickets = TicketCounter::new();
        let (mut view, request) = ReviewListView::mount(&mut tickets, VALID_ID);
        let ticket = request.unwrap().ticket;
        assert!(view.on_reviews(ticket, Ok(vec![review("r1", 3)])));
        assert_eq!(view.reviews().len(), 1);

        let (mut view, request) = ReviewListView::mount(&mut tickets, VALID_ID);
        view.on_reviews(request.unwrap().ticket, Err(ApiError::request_failed("nope")));
        assert!(view.state.error().unwrap().contains("nope"));
    }

    #[test]
    fn test_same_id_does_not_refetch() {
        let mut tickets = TicketCounter::new();
        let (mut view, _) = ReviewListView::mount(&mut tickets, VALID_ID);
        assert_eq!(view.set_game_id(&mut tickets, VALID_ID), (None, None));
    }

    #[test]
    fn test_changed_id_refetches_and_drops_stale_outcome() {
        let mut tickets = TicketCounter::new();
        let (mut view, first) = ReviewListView::mount(&mut tickets, VALID_ID);
        let first = first.unwrap().ticket;

        let (superseded, second) = view.set_game_id(&mut tickets, OTHER_ID);
        assert_eq!(superseded, Some(first));
        let second = second.unwrap();

        assert!(!view.on_reviews(first, Ok(vec![review("old", 1)])));
        assert_eq!(view.state, LoadState::Loading);
        assert!(view.on_reviews(second.ticket, Ok(vec![review("new", 2)])));
        assert_eq!(view.reviews()[0].id, "new");
    }

    #[test]
    fn test_changing_to_invalid_id_fails_without_request() {
        let mut tickets = TicketCounter::new();
        let (mut view, _) = ReviewListView::mount(&mut tickets, VALID_ID);
        let (superseded, request) = view.set_game_id(&mut tickets, "bad");
        assert!(superseded.is_some());
        assert!(request.is_none());
        assert!(view.state.error().is_some());
    }

    #[test]
    fn test_rating_three_stars() {
        assert_eq!(rating_stars(3).matches(STAR).count(), 3);
        assert_eq!(rating_stars(0), "");
    }

    proptest! {
        #[test]
        fn prop_rating_stars_repeat_exactly(rating in any::<u8>()) {
            let stars = rating_stars(rating);
            prop_assert_eq!(stars.matches(STAR).count(), rating as usize);
            prop_assert_eq!(stars.len(), STAR.len() * rating as usize);
        }
    }
}
