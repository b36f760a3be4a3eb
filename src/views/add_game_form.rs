use serde::{Deserialize, Serialize};

use crate::api::ApiError;
use crate::models::{DraftField, DraftUpdate, Game, GameDraft, NewGame};

/// How the add-game form is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum FormMode {
    /// Always shown next to the list.
    Inline,
    /// Hidden until toggled open.
    #[default]
    Toggle,
}

/// Draft record plus its presentation state.
#[derive(Debug, Clone)]
pub struct AddGameForm {
    pub mode: FormMode,
    pub draft: GameDraft,
    pub focus: DraftField,
    visible: bool,
    error: Option<String>,
    submitting: bool,
}

impl AddGameForm {
    pub fn new(mode: FormMode) -> Self {
        Self {
            mode,
            draft: GameDraft::default(),
            focus: DraftField::Title,
            visible: mode == FormMode::Inline,
            error: None,
            submitting: false,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Flip visibility. Inline forms cannot be hidden.
    pub fn toggle_visibility(&mut self) {
        if self.mode == FormMode::Toggle {
            self.visible = !self.visible;
        }
    }

    /// Label of the control that toggles the form.
    pub fn toggle_label(&self) -> &'static str {
        if self.visible { "Hide form" } else { "Add new game" }
    }

    pub fn set_field(&mut self, update: DraftUpdate) {
        self.draft.apply(update);
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    /// Append a character to the focused text field.
    pub fn type_char(&mut self, c: char) {
        let mut value = self.draft.value(self.focus).to_string();
        value.push(c);
        if let Some(update) = text_update(self.focus, value) {
            self.set_field(update);
        }
    }

    /// Delete the last character of the focused text field.
    pub fn backspace(&mut self) {
        let mut value = self.draft.value(self.focus).to_string();
        value.pop();
        if let Some(update) = text_update(self.focus, value) {
            self.set_field(update);
        }
    }

    pub fn cycle_platform(&mut self, forward: bool) {
        let current = self.draft.platform;
        let platform = if forward { current.next() } else { current.prev() };
        self.set_field(DraftUpdate::Platform(platform));
    }

    /// Start a submit. Returns the body to post, or `None` when the
    /// constraints fail or a create is already in flight.
    pub fn submit(&mut self) -> Option<NewGame> {
        if self.submitting {
            return None;
        }
        self.error = None;
        match self.draft.to_new_game() {
            Ok(new_game) => {
                self.submitting = true;
                Some(new_game)
            }
            Err(message) => {
                self.error = Some(message);
                None
            }
        }
    }

    /// Block a submit for a reason outside the draft itself.
    pub fn reject(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    /// Apply the create outcome. Returns the game to append on success.
    pub fn finish_submit(&mut self, result: Result<Game, ApiError>) -> Option<Game> {
        self.submitting = false;
        match result {
            Ok(game) => {
                self.draft = GameDraft::default();
                self.focus = DraftField::Title;
                if self.mode == FormMode::Toggle {
                    self.visible = false;
                }
                Some(game)
            }
            Err(err) => {
                self.error = Some(format!("Could not add game: {}", err.message()));
                None
            }
        }
    }
}

/// Platform is picked, not typed, so it has no text update.
fn text_update(field: DraftField, value: String) -> Option<DraftUpdate> {
    match field {
        DraftField::Title => Some(DraftUpdate::Title(value)),
        DraftField::Developer => Some(DraftUpdate::Developer(value)),
        DraftField::ReleaseYear => Some(DraftUpdate::ReleaseYear(value)),
        DraftField::Genre => Some(DraftUpdate::Genre(value)),
        DraftField::CoverImageUrl => Some(DraftUpdate::CoverImageUrl(value)),
        DraftField::Description => Some(DraftUpdate::Description(value)),
        DraftField::Platform => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Platform;

    fn filled_form(mode: FormMode) -> AddGameForm {
        let mut form = AddGameForm::new(mode);
        form.set_field(DraftUpdate::Title("Celeste".into()));
        form.set_field(DraftUpdate::Developer("MMG".into()));
        form.set_field(DraftUpdate::ReleaseYear("2018".into()));
        form.set_field(DraftUpdate::Genre("Platformer".into()));
        form
    }

    fn created() -> Game {
        Game {
            id: "srv-1".into(),
            title: "Celeste".into(),
            developer: "MMG".into(),
            release_year: 2018,
            genre: "Platformer".into(),
            platform: Some(Platform::Multiplatform),
            cover_image_url: None,
            description: None,
        }
    }

    #[test]
    fn test_visibility_by_mode() {
        let inline = AddGameForm::new(FormMode::Inline);
        assert!(inline.is_visible());

        let mut toggle = AddGameForm::new(FormMode::Toggle);
        assert!(!toggle.is_visible());
        assert_eq!(toggle.toggle_label(), "Add new game");
        toggle.toggle_visibility();
        assert!(toggle.is_visible());
        assert_eq!(toggle.toggle_label(), "Hide form");
    }

    #[test]
    fn test_inline_form_cannot_hide() {
        let mut inline = AddGameForm::new(FormMode::Inline);
        inline.toggle_visibility();
        assert!(inline.is_visible());
    }

    #[test]
    fn test_typing_edits_focused_field_only() {
        let mut form = AddGameForm::new(FormMode::Inline);
        form.type_char('H');
        form.type_char('i');
        form.focus_next();
        form.type_char('x');
        form.backspace();
        assert_eq!(form.draft.title, "Hi");
        assert_eq!(form.draft.developer, "");
    }

    #[test]
    fn test_platform_field_ignores_typing() {
        let mut form = AddGameForm::new(FormMode::Inline);
        form.focus = DraftField::Platform;
        form.type_char('z');
        form.backspace();
        assert_eq!(form.draft.platform, Platform::Multiplatform);
        form.cycle_platform(true);
        assert_eq!(form.draft.platform, Platform::Pc);
        form.cycle_platform(false);
        form.cycle_platform(false);
        assert_eq!(form.draft.platform, Platform::Mobile);
    }

    #[test]
    fn test_submit_blocked_by_constraints() {
        let mut form = AddGameForm::new(FormMode::Inline);
        assert!(form.submit().is_none());
        assert!(form.error().unwrap().contains("Title"));
        assert!(!form.is_submitting());
    }

    #[test]
    fn test_submit_clears_prior_error() {
        let mut form = filled_form(FormMode::Inline);
        form.finish_submit(Err(ApiError::request_failed("down")));
        assert!(form.error().is_some());
        assert!(form.submit().is_some());
        assert!(form.error().is_none());
        assert!(form.is_submitting());
    }

    #[test]
    fn test_no_double_submit_while_in_flight() {
        let mut form = filled_form(FormMode::Inline);
        assert!(form.submit().is_some());
        assert!(form.submit().is_none());
    }

    #[test]
    fn test_success_resets_draft_and_hides_toggle_form() {
        let mut form = filled_form(FormMode::Toggle);
        form.toggle_visibility();
        form.submit().unwrap();

        let game = form.finish_submit(Ok(created())).unwrap();
        assert_eq!(game.id, "srv-1");
        assert_eq!(form.draft, GameDraft::default());
        assert!(!form.is_visible());
        assert!(!form.is_submitting());
    }

    #[test]
    fn test_failure_keeps_draft_and_visibility() {
        let mut form = filled_form(FormMode::Toggle);
        form.toggle_visibility();
        let before = form.draft.clone();
        form.submit().unwrap();

        assert!(form.finish_submit(Err(ApiError::request_failed("duplicate"))).is_none());
        assert_eq!(form.draft, before);
        assert!(form.is_visible());
        assert!(form.error().unwrap().contains("duplicate"));
    }
}
