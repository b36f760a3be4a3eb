use serde::{Deserialize, Deserializer, Serialize};

/// Platforms a game can be tracked on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Platform {
    #[default]
    Multiplatform,
    #[serde(rename = "PC")]
    Pc,
    PlayStation,
    Xbox,
    #[serde(rename = "Nintendo Switch")]
    NintendoSwitch,
    Mobile,
}

impl Platform {
    pub const ALL: [Platform; 6] = [
        Self::Multiplatform,
        Self::Pc,
        Self::PlayStation,
        Self::Xbox,
        Self::NintendoSwitch,
        Self::Mobile,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Multiplatform => "Multiplatform",
            Self::Pc => "PC",
            Self::PlayStation => "PlayStation",
            Self::Xbox => "Xbox",
            Self::NintendoSwitch => "Nintendo Switch",
            Self::Mobile => "Mobile",
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|p| *p == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|p| *p == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// A game record as stored by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub developer: String,
    #[serde(default, alias = "releaseYear")]
    pub release_year: i32,
    #[serde(default)]
    pub genre: String,
    #[serde(default, deserialize_with = "lenient_platform")]
    pub platform: Option<Platform>,
    #[serde(default, alias = "coverImageUrl", skip_serializing_if = "Option::is_none")]
    pub cover_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Platforms this client does not know decode as `None` instead of failing
/// the whole record.
fn lenient_platform<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Platform>, D::Error> {
    let raw = Option::<String>::deserialize(d)?;
    Ok(raw.and_then(|s| Platform::ALL.into_iter().find(|p| p.label() == s)))
}

/// Body of `POST /api/games`: a game without its server-assigned id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewGame {
    pub title: String,
    pub developer: String,
    pub release_year: i32,
    pub genre: String,
    pub platform: Platform,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The fields of a draft, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Title,
    Developer,
    ReleaseYear,
    Genre,
    Platform,
    CoverImageUrl,
    Description,
}

impl DraftField {
    pub const ALL: [DraftField; 7] = [
        Self::Title,
        Self::Developer,
        Self::ReleaseYear,
        Self::Genre,
        Self::Platform,
        Self::CoverImageUrl,
        Self::Description,
    ];

    pub fn next(self) -> Self {
        match self {
            Self::Title => Self::Developer,
            Self::Developer => Self::ReleaseYear,
            Self::ReleaseYear => Self::Genre,
            Self::Genre => Self::Platform,
            Self::Platform => Self::CoverImageUrl,
            Self::CoverImageUrl => Self::Description,
            Self::Description => Self::Title,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Title => Self::Description,
            Self::Developer => Self::Title,
            Self::ReleaseYear => Self::Developer,
            Self::Genre => Self::ReleaseYear,
            Self::Platform => Self::Genre,
            Self::CoverImageUrl => Self::Platform,
            Self::Description => Self::CoverImageUrl,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Developer => "Developer",
            Self::ReleaseYear => "Release year",
            Self::Genre => "Genre",
            Self::Platform => "Platform",
            Self::CoverImageUrl => "Cover URL",
            Self::Description => "Description",
        }
    }

    pub fn is_required(self) -> bool {
        matches!(
            self,
            Self::Title | Self::Developer | Self::ReleaseYear | Self::Genre
        )
    }
}

/// A single-field change to a draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftUpdate {
    Title(String),
    Developer(String),
    ReleaseYear(String),
    Genre(String),
    Platform(Platform),
    CoverImageUrl(String),
    Description(String),
}

/// Form-local game record that has not been submitted yet.
///
/// Every text field is kept as typed; conversion to a [`NewGame`] happens
/// on submit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GameDraft {
    pub title: String,
    pub developer: String,
    pub release_year: String,
    pub genre: String,
    pub platform: Platform,
    pub cover_image_url: String,
    pub description: String,
}

impl GameDraft {
    /// Replace exactly one field.
    pub fn apply(&mut self, update: DraftUpdate) {
        match update {
            DraftUpdate::Title(v) => self.title = v,
            DraftUpdate::Developer(v) => self.developer = v,
            DraftUpdate::ReleaseYear(v) => self.release_year = v,
            DraftUpdate::Genre(v) => self.genre = v,
            DraftUpdate::Platform(p) => self.platform = p,
            DraftUpdate::CoverImageUrl(v) => self.cover_image_url = v,
            DraftUpdate::Description(v) => self.description = v,
        }
    }

    /// Current text of a field, for display and editing.
    pub fn value(&self, field: DraftField) -> &str {
        match field {
            DraftField::Title => &self.title,
            DraftField::Developer => &self.developer,
            DraftField::ReleaseYear => &self.release_year,
            DraftField::Genre => &self.genre,
            DraftField::Platform => self.platform.label(),
            DraftField::CoverImageUrl => &self.cover_image_url,
            DraftField::Description => &self.description,
        }
    }

    /// Build the request body, enforcing the required and numeric constraints.
    pub fn to_new_game(&self) -> Result<NewGame, String> {
        for field in DraftField::ALL {
            if field.is_required() && self.value(field).trim().is_empty() {
                return Err(format!("{} is required", field.label()));
            }
        }
        let release_year = self
            .release_year
            .trim()
            .parse::<i32>()
            .map_err(|_| format!("Release year must be a number, got \"{}\"", self.release_year))?;

        Ok(NewGame {
            title: self.title.clone(),
            developer: self.developer.clone(),
            release_year,
            genre: self.genre.clone(),
            platform: self.platform,
            cover_image_url: non_empty(&self.cover_image_url),
            description: non_empty(&self.description),
        })
    }
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Game side of a review; the server may or may not expand it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum GameRef {
    Expanded {
        #[serde(default, rename = "_id", alias = "id")]
        id: Option<String>,
        title: String,
    },
    Id(String),
}

impl GameRef {
    pub fn title(&self) -> Option<&str> {
        match self {
            GameRef::Expanded { title, .. } => Some(title),
            GameRef::Id(_) => None,
        }
    }
}

/// Author side of a review; the server may or may not expand it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum UserRef {
    Expanded {
        #[serde(default, rename = "_id", alias = "id")]
        id: Option<String>,
        username: String,
    },
    Id(String),
}

impl UserRef {
    pub fn username(&self) -> Option<&str> {
        match self {
            UserRef::Expanded { username, .. } => Some(username),
            UserRef::Id(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Review {
    #[serde(default, rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub game: Option<GameRef>,
    #[serde(default)]
    pub user: Option<UserRef>,
    #[serde(default, deserialize_with = "clamped_rating")]
    pub rating: u8,
    #[serde(default)]
    pub text: String,
}

/// Ratings outside 0..=255 are clamped and a null rating is 0, so one odd
/// review cannot fail the whole list.
fn clamped_rating<'de, D: Deserializer<'de>>(d: D) -> Result<u8, D::Error> {
    let raw = Option::<f64>::deserialize(d)?;
    Ok(raw.map_or(0, |r| r.clamp(0.0, f64::from(u8::MAX)).round() as u8))
}

impl Review {
    pub fn game_title(&self) -> Option<&str> {
        self.game.as_ref().and_then(GameRef::title)
    }

    pub fn username(&self) -> Option<&str> {
        self.user.as_ref().and_then(UserRef::username)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_game_accepts_camel_case_and_plain_id() {
        let json = r#"{"id":"a","title":"Chrono Trigger","developer":"Square",
            "releaseYear":1995,"genre":"RPG","platform":"Multiplatform"}"#;
        let game: Game = serde_json::from_str(json).unwrap();
        assert_eq!(game.id, "a");
        assert_eq!(game.release_year, 1995);
        assert_eq!(game.platform, Some(Platform::Multiplatform));
        assert!(game.cover_image_url.is_none());
        assert!(game.description.is_none());
    }

    #[test]
    fn test_game_accepts_backend_keys() {
        let json = r#"{"_id":"65231c503525e982181283d7","title":"Zelda",
            "developer":"Nintendo","release_year":2017,"genre":"Adventure",
            "platform":"Nintendo Switch","cover_image_url":"https://img/zelda.png",
            "description":"Open air"}"#;
        let game: Game = serde_json::from_str(json).unwrap();
        assert_eq!(game.id, "65231c503525e982181283d7");
        assert_eq!(game.platform, Some(Platform::NintendoSwitch));
        assert_eq!(game.cover_image_url.as_deref(), Some("https://img/zelda.png"));
        assert_eq!(game.description.as_deref(), Some("Open air"));
    }

    #[test]
    fn test_game_missing_platform_is_unknown() {
        let json = r#"{"_id":"x","title":"T"}"#;
        let game: Game = serde_json::from_str(json).unwrap();
        assert!(game.platform.is_none());
        assert_eq!(game.developer, "");

        let json = r#"{"_id":"y","title":"T","platform":"Dreamcast"}"#;
        let game: Game = serde_json::from_str(json).unwrap();
        assert!(game.platform.is_none());
    }

    #[test]
    fn test_platform_cycle_covers_all() {
        let mut p = Platform::default();
        assert_eq!(p, Platform::Multiplatform);
        for _ in 0..Platform::ALL.len() {
            p = p.next();
        }
        assert_eq!(p, Platform::Multiplatform);
        assert_eq!(Platform::Multiplatform.prev(), Platform::Mobile);
        assert_eq!(serde_json::to_string(&Platform::Pc).unwrap(), "\"PC\"");
    }

    #[test]
    fn test_draft_defaults() {
        let draft = GameDraft::default();
        assert_eq!(draft.title, "");
        assert_eq!(draft.release_year, "");
        assert_eq!(draft.platform, Platform::Multiplatform);
    }

    #[test]
    fn test_draft_to_new_game_requires_fields() {
        let mut draft = GameDraft::default();
        draft.apply(DraftUpdate::Title("Celeste".into()));
        let err = draft.to_new_game().unwrap_err();
        assert!(err.contains("Developer"));
    }

    #[test]
    fn test_draft_to_new_game_rejects_non_numeric_year() {
        let draft = GameDraft {
            title: "Celeste".into(),
            developer: "Maddy Makes Games".into(),
            release_year: "twenty".into(),
            genre: "Platformer".into(),
            ..GameDraft::default()
        };
        assert!(draft.to_new_game().unwrap_err().contains("number"));
    }

    #[test]
    fn test_draft_to_new_game_serializes_snake_case() {
        let draft = GameDraft {
            title: "Celeste".into(),
            developer: "Maddy Makes Games".into(),
            release_year: "2018".into(),
            genre: "Platformer".into(),
            platform: Platform::Pc,
            cover_image_url: "  ".into(),
            description: "Climb".into(),
        };
        let new_game = draft.to_new_game().unwrap();
        let value = serde_json::to_value(&new_game).unwrap();
        assert_eq!(value["release_year"], 2018);
        assert_eq!(value["platform"], "PC");
        assert_eq!(value["description"], "Climb");
        assert!(value.get("cover_image_url").is_none());
    }

    #[test]
    fn test_review_refs_expanded_and_plain() {
        let json = r#"[
            {"_id":"r1","game":{"_id":"g1","title":"Hades"},"user":{"_id":"u1","username":"zag"},"rating":5,"text":"Great"},
            {"_id":"r2","game":"g1","user":"u2","rating":2,"text":"Meh"},
            {"_id":"r3","rating":0}
        ]"#;
        let reviews: Vec<Review> = serde_json::from_str(json).unwrap();
        assert_eq!(reviews[0].game_title(), Some("Hades"));
        assert_eq!(reviews[0].username(), Some("zag"));
        assert_eq!(reviews[1].game_title(), None);
        assert_eq!(reviews[1].username(), None);
        assert_eq!(reviews[2].text, "");
    }

    #[test]
    fn test_odd_reviews_do_not_fail_the_list() {
        let json = r#"[
            {"rating":3,"text":"no id"},
            {"_id":"r2","rating":-1},
            {"_id":"r3","rating":900},
            {"_id":"r4","rating":null},
            {"_id":"r5","rating":4.0}
        ]"#;
        let reviews: Vec<Review> = serde_json::from_str(json).unwrap();
        assert_eq!(reviews.len(), 5);
        assert_eq!(reviews[0].id, "");
        assert_eq!(reviews[0].rating, 3);
        assert_eq!(reviews[1].rating, 0);
        assert_eq!(reviews[2].rating, u8::MAX);
        assert_eq!(reviews[3].rating, 0);
        assert_eq!(reviews[4].rating, 4);
    }

    fn arb_update() -> impl Strategy<Value = DraftUpdate> {
        prop_oneof![
            ".*".prop_map(DraftUpdate::Title),
            ".*".prop_map(DraftUpdate::Developer),
            ".*".prop_map(DraftUpdate::ReleaseYear),
            ".*".prop_map(DraftUpdate::Genre),
            prop::sample::select(Platform::ALL.to_vec()).prop_map(DraftUpdate::Platform),
            ".*".prop_map(DraftUpdate::CoverImageUrl),
            ".*".prop_map(DraftUpdate::Description),
        ]
    }

    fn touched(update: &DraftUpdate) -> DraftField {
        match update {
            DraftUpdate::Title(_) => DraftField::Title,
            DraftUpdate::Developer(_) => DraftField::Developer,
            DraftUpdate::ReleaseYear(_) => DraftField::ReleaseYear,
            DraftUpdate::Genre(_) => DraftField::Genre,
            DraftUpdate::Platform(_) => DraftField::Platform,
            DraftUpdate::CoverImageUrl(_) => DraftField::CoverImageUrl,
            DraftUpdate::Description(_) => DraftField::Description,
        }
    }

    proptest! {
        #[test]
        fn prop_draft_update_touches_one_field(
            start in prop::collection::vec(arb_update(), 0..8),
            update in arb_update(),
        ) {
            let mut draft = GameDraft::default();
            for u in start {
                draft.apply(u);
            }
            let before = draft.clone();
            let field = touched(&update);
            draft.apply(update);
            for other in DraftField::ALL {
                if other != field {
                    prop_assert_eq!(before.value(other), draft.value(other));
                }
            }
        }
    }
}
