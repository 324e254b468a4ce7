//! # Inputs
//!
//! Request shapes accepted by the services. Loosely-typed client payloads
//! (tags sent as `"PC, PS5"` or `["PC", "PS5"]`, fields that may be absent or
//! explicitly null) are pinned down here once, so the services only ever see
//! normalized values.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use uuid::Uuid;

use crate::models::{Game, GameStatus};

/// Distinguishes "field absent" (`None`) from "field explicitly null" (`Some(None)`).
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Platform/genre tags as they arrive from clients.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TagInput {
    /// Comma-separated, from simple HTML forms
    Delimited(String),
    List(Vec<String>),
}

impl TagInput {
    /// Trims every tag, drops blanks and duplicates, keeps first-seen order.
    pub fn into_tags(self) -> Vec<String> {
        let raw: Vec<String> = match self {
            TagInput::Delimited(s) => s.split(',').map(str::to_owned).collect(),
            TagInput::List(items) => items,
        };

        let mut tags: Vec<String> = Vec::with_capacity(raw.len());
        for tag in raw {
            let tag = tag.trim();
            if !tag.is_empty() && !tags.iter().any(|t| t == tag) {
                tags.push(tag.to_owned());
            }
        }
        tags
    }
}

impl From<&str> for TagInput {
    fn from(s: &str) -> Self {
        TagInput::Delimited(s.to_owned())
    }
}

impl From<Vec<&str>> for TagInput {
    fn from(items: Vec<&str>) -> Self {
        TagInput::List(items.into_iter().map(str::to_owned).collect())
    }
}

/// Payload for creating a catalog entry.
///
/// There is deliberately no rating field: anything a client sends as
/// `averageRating`/`totalRatings` is dropped during deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGame {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub release_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub platform: Option<TagInput>,
    #[serde(default)]
    pub genre: Option<TagInput>,
    #[serde(default, rename = "imageURL")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub status: Option<GameStatus>,
}

impl NewGame {
    pub fn titled(title: &str) -> Self {
        Self {
            title: Some(title.to_owned()),
            ..Self::default()
        }
    }
}

/// Partial update of a game's direct fields.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GamePatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub release_date: Option<Option<DateTime<Utc>>>,
    #[serde(default)]
    pub platform: Option<TagInput>,
    #[serde(default)]
    pub genre: Option<TagInput>,
    #[serde(default, rename = "imageURL", deserialize_with = "nullable")]
    pub image_url: Option<Option<String>>,
    #[serde(default)]
    pub status: Option<GameStatus>,
}

/// Payload for posting a review. The author is always the caller.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
    #[serde(default)]
    pub game_id: Option<Uuid>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub rating: Option<i64>,
}

/// Partial update of a review. Explicit null clears a field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewPatch {
    #[serde(default, deserialize_with = "nullable")]
    pub text: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub rating: Option<Option<i64>>,
}

/// Catalog listing criteria. All present criteria must match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GameFilter {
    /// Case-insensitive substring of the title
    #[serde(default)]
    pub search: Option<String>,
    /// Exact platform tag
    #[serde(default)]
    pub platform: Option<String>,
    /// Exact genre tag
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub status: Option<GameStatus>,
}

impl GameFilter {
    /// Blank query parameters (`?search=`) count as absent.
    pub fn normalized(self) -> Self {
        fn non_blank(v: Option<String>) -> Option<String> {
            v.map(|s| s.trim().to_owned()).filter(|s| !s.is_empty())
        }
        Self {
            search: non_blank(self.search),
            platform: non_blank(self.platform),
            genre: non_blank(self.genre),
            status: self.status,
        }
    }

    pub fn matches(&self, game: &Game) -> bool {
        if let Some(search) = &self.search {
            if !game.title.to_lowercase().contains(&search.to_lowercase()) {
                return false;
            }
        }
        if let Some(platform) = &self.platform {
            if !game.platforms.iter().any(|p| p == platform) {
                return false;
            }
        }
        if let Some(genre) = &self.genre {
            if !game.genres.iter().any(|g| g == genre) {
                return false;
            }
        }
        match self.status {
            Some(status) => game.status == status,
            None => true,
        }
    }
}

/// Catalog order: newest release first, undated entries last.
pub fn by_release_desc(a: &Game, b: &Game) -> std::cmp::Ordering {
    b.release_date.cmp(&a.release_date)
}

/// Account registration payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Registration {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Login payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}
