//! Shared fixtures for the workspace integration tests.
//!
//! A [`Harness`] wires the real services to a fresh [`InMemoryStore`] and a
//! fast, deterministic password hasher. Users are written straight into the
//! store so tests that are not about authentication skip the hashing cost.

use std::sync::Arc;

use chrono::{Duration, Utc};
use domains::{Caller, Game, GameRepository, NewGame, PasswordHasher, Role, User, UserRepository};
use services::{Ports, Services};
use storage_adapters::{InMemoryStore, Repositories};
use uuid::Uuid;

pub const TEST_SECRET: &[u8] = b"integration-test-secret-0123456789";

/// Reversible "hash" for tests that exercise flows, not cryptography.
pub struct PlainHasher;

impl PasswordHasher for PlainHasher {
    fn hash_password(&self, password: &str) -> anyhow::Result<String> {
        Ok(format!("plain:{password}"))
    }

    fn verify_password(&self, password: &str, hash: &str) -> bool {
        hash == format!("plain:{password}")
    }
}

pub struct Harness {
    pub store: Arc<InMemoryStore>,
    pub repos: Repositories,
    pub services: Services,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_hasher(Arc::new(PlainHasher))
    }

    pub fn with_hasher(hasher: Arc<dyn PasswordHasher>) -> Self {
        let store = Arc::new(InMemoryStore::new());
        let repos = Repositories::from_store(store.clone());
        let provider = auth_adapters::JwtAuthProvider::new(TEST_SECRET, Duration::hours(1))
            .expect("test secret is long enough");
        let services = Services::new(Ports {
            users: repos.users.clone(),
            games: repos.games.clone(),
            reviews: repos.reviews.clone(),
            favorites: repos.favorites.clone(),
            hasher,
            auth: Arc::new(provider),
        });
        Self {
            store,
            repos,
            services,
        }
    }

    /// Stores a user and returns the identity it would act with.
    pub async fn user(&self, username: &str, role: Role) -> Caller {
        let user = User {
            id: Uuid::now_v7(),
            username: username.to_owned(),
            email: format!("{username}@example.com"),
            password_hash: String::new(),
            role,
            created_at: Utc::now(),
        };
        assert!(self.repos.users.insert(&user).await.expect("insert user"));
        Caller::from(&user)
    }

    pub async fn game(&self, title: &str) -> Game {
        self.services
            .catalog
            .create(NewGame::titled(title))
            .await
            .expect("create game")
    }

    /// The game as currently stored.
    pub async fn reload(&self, game_id: Uuid) -> Game {
        self.repos
            .games
            .find_by_id(game_id)
            .await
            .expect("read game")
            .expect("game exists")
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

/// Plain mean of `ratings`, 0 when empty.
pub fn expected_average(ratings: &[u8]) -> f64 {
    if ratings.is_empty() {
        0.0
    } else {
        ratings.iter().map(|&r| f64::from(r)).sum::<f64>() / ratings.len() as f64
    }
}
