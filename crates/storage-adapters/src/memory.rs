//! # In-memory document store
//!
//! Process-local implementation of every repository port, backed by
//! `DashMap`. Used by default, by the test suites and for demos.

use std::sync::Mutex;

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use domains::{
    by_release_desc, Favorite, FavoriteRepository, Game, GameFilter, GameRepository,
    RatingSummary, Review, ReviewRepository, User, UserRepository,
};
use uuid::Uuid;

#[derive(Default)]
pub struct InMemoryStore {
    users: DashMap<Uuid, User>,
    games: DashMap<Uuid, Game>,
    reviews: DashMap<Uuid, Review>,
    /// Keyed by (user, game): the key itself is the uniqueness constraint.
    favorites: DashMap<(Uuid, Uuid), Favorite>,
    /// Serializes user inserts so the username/email checks are atomic.
    user_insert: Mutex<()>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert(&self, user: &User) -> anyhow::Result<bool> {
        let _guard = self
            .user_insert
            .lock()
            .map_err(|_| anyhow::anyhow!("user table lock poisoned"))?;

        let clash = self
            .users
            .iter()
            .any(|u| u.username == user.username || u.email == user.email);
        if clash {
            return Ok(false);
        }
        self.users.insert(user.id, user.clone());
        Ok(true)
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        Ok(self.users.get(&id).map(|u| u.clone()))
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|u| u.email == email)
            .map(|u| u.clone()))
    }

    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|u| u.username == username)
            .map(|u| u.clone()))
    }

    async fn find_many(&self, ids: &[Uuid]) -> anyhow::Result<Vec<User>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.users.get(id).map(|u| u.clone()))
            .collect())
    }
}

#[async_trait]
impl GameRepository for InMemoryStore {
    async fn create(&self, game: &Game) -> anyhow::Result<()> {
        self.games.insert(game.id, game.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Game>> {
        Ok(self.games.get(&id).map(|g| g.clone()))
    }

    async fn find_many(&self, ids: &[Uuid]) -> anyhow::Result<Vec<Game>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.games.get(id).map(|g| g.clone()))
            .collect())
    }

    async fn list(&self, filter: &GameFilter) -> anyhow::Result<Vec<Game>> {
        let mut games: Vec<Game> = self
            .games
            .iter()
            .filter(|g| filter.matches(g.value()))
            .map(|g| g.clone())
            .collect();
        games.sort_by(by_release_desc);
        Ok(games)
    }

    async fn update_details(&self, game: &Game) -> anyhow::Result<bool> {
        let Some(mut stored) = self.games.get_mut(&game.id) else {
            return Ok(false);
        };
        let (average_rating, total_ratings) = (stored.average_rating, stored.total_ratings);
        *stored = game.clone();
        stored.average_rating = average_rating;
        stored.total_ratings = total_ratings;
        Ok(true)
    }

    async fn set_rating_summary(&self, id: Uuid, summary: RatingSummary) -> anyhow::Result<bool> {
        let Some(mut stored) = self.games.get_mut(&id) else {
            return Ok(false);
        };
        stored.average_rating = summary.average_rating;
        stored.total_ratings = summary.total_ratings;
        Ok(true)
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<Option<Game>> {
        Ok(self.games.remove(&id).map(|(_, g)| g))
    }
}

#[async_trait]
impl ReviewRepository for InMemoryStore {
    async fn create(&self, review: &Review) -> anyhow::Result<()> {
        self.reviews.insert(review.id, review.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Review>> {
        Ok(self.reviews.get(&id).map(|r| r.clone()))
    }

    async fn list_for_game(&self, game_id: Uuid) -> anyhow::Result<Vec<Review>> {
        let mut reviews: Vec<Review> = self
            .reviews
            .iter()
            .filter(|r| r.game_id == game_id)
            .map(|r| r.clone())
            .collect();
        reviews.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(reviews)
    }

    async fn ratings_for_game(&self, game_id: Uuid) -> anyhow::Result<Vec<u8>> {
        Ok(self
            .reviews
            .iter()
            .filter(|r| r.game_id == game_id)
            .filter_map(|r| r.rating)
            .collect())
    }

    async fn update(&self, review: &Review) -> anyhow::Result<bool> {
        match self.reviews.get_mut(&review.id) {
            Some(mut stored) => {
                *stored = review.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<Option<Review>> {
        Ok(self.reviews.remove(&id).map(|(_, r)| r))
    }

    async fn delete_for_game(&self, game_id: Uuid) -> anyhow::Result<u64> {
        // Counted inside retain: other games' reviews may land concurrently.
        let mut removed = 0u64;
        self.reviews.retain(|_, r| {
            let keep = r.game_id != game_id;
            if !keep {
                removed += 1;
            }
            keep
        });
        Ok(removed)
    }
}

#[async_trait]
impl FavoriteRepository for InMemoryStore {
    async fn insert(&self, favorite: &Favorite) -> anyhow::Result<bool> {
        match self.favorites.entry((favorite.user_id, favorite.game_id)) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(favorite.clone());
                Ok(true)
            }
        }
    }

    async fn list_for_user(&self, user_id: Uuid) -> anyhow::Result<Vec<Favorite>> {
        let mut favorites: Vec<Favorite> = self
            .favorites
            .iter()
            .filter(|f| f.user_id == user_id)
            .map(|f| f.clone())
            .collect();
        favorites.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(favorites)
    }

    async fn delete(&self, user_id: Uuid, game_id: Uuid) -> anyhow::Result<bool> {
        Ok(self.favorites.remove(&(user_id, game_id)).is_some())
    }
}
