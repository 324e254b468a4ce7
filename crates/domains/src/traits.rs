//! # Core Traits (Ports)
//!
//! Any adapter must implement these traits to be used by the binary.
//! Repositories report storage failures through `anyhow`; the services lift
//! them into [`DomainError::Persistence`](crate::DomainError::Persistence).

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::DomainError;
use crate::inputs::GameFilter;
use crate::models::{Caller, Favorite, Game, Review, User};
use crate::rating::RatingSummary;

/// Account persistence.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Returns `false` when the username or email is already taken.
    async fn insert(&self, user: &User) -> anyhow::Result<bool>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>>;
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;
    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>>;
    /// Unknown ids are skipped.
    async fn find_many(&self, ids: &[Uuid]) -> anyhow::Result<Vec<User>>;
}

/// Catalog persistence.
///
/// Direct fields and derived rating fields are written through separate
/// methods so a catalog edit and a rating recompute never overwrite each other.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait GameRepository: Send + Sync {
    async fn create(&self, game: &Game) -> anyhow::Result<()>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Game>>;
    /// Unknown ids are skipped.
    async fn find_many(&self, ids: &[Uuid]) -> anyhow::Result<Vec<Game>>;
    /// Matching games, newest release first, undated last.
    async fn list(&self, filter: &GameFilter) -> anyhow::Result<Vec<Game>>;
    /// Persists everything except `average_rating`/`total_ratings`.
    /// Returns `false` if the game no longer exists.
    async fn update_details(&self, game: &Game) -> anyhow::Result<bool>;
    /// Persists only the derived fields. Returns `false` if the game no longer exists.
    async fn set_rating_summary(&self, id: Uuid, summary: RatingSummary) -> anyhow::Result<bool>;
    async fn delete(&self, id: Uuid) -> anyhow::Result<Option<Game>>;
}

/// Review persistence.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    async fn create(&self, review: &Review) -> anyhow::Result<()>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Review>>;
    /// Newest first.
    async fn list_for_game(&self, game_id: Uuid) -> anyhow::Result<Vec<Review>>;
    /// Every non-null rating currently attached to the game.
    async fn ratings_for_game(&self, game_id: Uuid) -> anyhow::Result<Vec<u8>>;
    /// Returns `false` if the review no longer exists.
    async fn update(&self, review: &Review) -> anyhow::Result<bool>;
    async fn delete(&self, id: Uuid) -> anyhow::Result<Option<Review>>;
    /// Returns how many reviews were removed.
    async fn delete_for_game(&self, game_id: Uuid) -> anyhow::Result<u64>;
}

/// User <-> Game bookmark persistence.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait FavoriteRepository: Send + Sync {
    /// Atomic insert; returns `false` when the (user, game) pair already exists.
    async fn insert(&self, favorite: &Favorite) -> anyhow::Result<bool>;
    /// Newest first.
    async fn list_for_user(&self, user_id: Uuid) -> anyhow::Result<Vec<Favorite>>;
    /// Returns `false` when there was nothing to remove.
    async fn delete(&self, user_id: Uuid, game_id: Uuid) -> anyhow::Result<bool>;
}

/// Bearer credential contract.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait AuthProvider: Send + Sync {
    /// Mints a bearer token for a freshly authenticated user.
    fn issue_token(&self, user: &User) -> Result<String, DomainError>;

    /// Verifies signature and expiry and returns the identity it was minted for.
    fn resolve(&self, token: &str) -> Result<Caller, DomainError>;
}

/// Password storage contract.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Produces a salted, self-describing hash string.
    fn hash_password(&self, password: &str) -> anyhow::Result<String>;

    /// Verifies a plaintext password against a stored hash.
    fn verify_password(&self, password: &str, hash: &str) -> bool;
}
