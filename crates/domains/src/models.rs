//! # Domain Models
//!
//! These structs represent the core entities of the game bulletin.
//! We use UUID v7 for time-ordered, globally unique identification.
//! JSON field names follow the camelCase shape the web frontend consumes.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Account role. Admins manage the catalog and may edit anyone's reviews.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[default]
    Registered,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Registered => "Registered",
            Role::Admin => "Admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Registered" => Ok(Role::Registered),
            "Admin" => Ok(Role::Admin),
            other => Err(DomainError::validation(format!("unknown role '{other}'"))),
        }
    }
}

/// Lifecycle of a catalog entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    #[default]
    Upcoming,
    Released,
}

impl GameStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::Upcoming => "Upcoming",
            GameStatus::Released => "Released",
        }
    }
}

impl FromStr for GameStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Upcoming" => Ok(GameStatus::Upcoming),
            "Released" => Ok(GameStatus::Released),
            other => Err(DomainError::validation(format!("unknown status '{other}'"))),
        }
    }
}

/// A registered account.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub username: String,
    /// Stored lower-cased
    pub email: String,
    /// Argon2 PHC string; never leaves the server
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[serde(rename = "userType")]
    pub role: Role,
    #[serde(rename = "registrationDate")]
    pub created_at: DateTime<Utc>,
}

/// A catalog entry representing a video game release.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub release_date: Option<DateTime<Utc>>,
    /// e.g. ["PC", "PS5"]
    #[serde(rename = "platform")]
    pub platforms: Vec<String>,
    /// e.g. ["RPG", "Fantasy"]
    #[serde(rename = "genre")]
    pub genres: Vec<String>,
    #[serde(rename = "imageURL")]
    pub image_url: Option<String>,
    pub status: GameStatus,
    /// Derived: mean of all non-null review ratings, 0 when none
    pub average_rating: f64,
    /// Derived: number of reviews carrying a rating
    pub total_ratings: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A user-authored opinion (text and/or 1-5 rating) attached to one Game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: Uuid,
    pub user_id: Uuid,
    pub game_id: Uuid,
    pub text: Option<String>,
    pub rating: Option<u8>,
    #[serde(rename = "datePosted")]
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A user's bookmark of one Game. At most one per (user, game).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub id: Uuid,
    pub user_id: Uuid,
    pub game_id: Uuid,
    #[serde(rename = "dateAdded")]
    pub created_at: DateTime<Utc>,
}

/// The already-authenticated identity a request acts as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub user_id: Uuid,
    pub role: Role,
}

impl Caller {
    pub fn new(user_id: Uuid, role: Role) -> Self {
        Self { user_id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl From<&User> for Caller {
    fn from(user: &User) -> Self {
        Self::new(user.id, user.role)
    }
}

/// Public identity of a review author.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorSummary {
    pub id: Uuid,
    pub username: String,
}

/// Shown in place of an author whose account no longer exists.
pub const DELETED_AUTHOR: &str = "[deleted]";

/// A review together with its author's display name.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewWithAuthor {
    #[serde(flatten)]
    pub review: Review,
    pub author: AuthorSummary,
}

/// A game and everything said about it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameDetail {
    pub game: Game,
    pub reviews: Vec<ReviewWithAuthor>,
}

/// A favorite resolved to the game it points at.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteWithGame {
    #[serde(flatten)]
    pub favorite: Favorite,
    pub game: Game,
}
