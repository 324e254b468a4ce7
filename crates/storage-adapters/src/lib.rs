//! # storage-adapters
//!
//! Persistence Provider implementations for the `domains` repository ports.
//!
//! - [`memory::InMemoryStore`] is always compiled.
//! - [`postgres::PostgresStore`] requires the `db-postgres` feature.

pub mod memory;

#[cfg(feature = "db-postgres")]
pub mod postgres;

use std::sync::Arc;

use domains::{FavoriteRepository, GameRepository, ReviewRepository, UserRepository};

pub use memory::InMemoryStore;

#[cfg(feature = "db-postgres")]
pub use postgres::PostgresStore;

/// One store viewed through each of the four repository ports.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub games: Arc<dyn GameRepository>,
    pub reviews: Arc<dyn ReviewRepository>,
    pub favorites: Arc<dyn FavoriteRepository>,
}

impl Repositories {
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: UserRepository + GameRepository + ReviewRepository + FavoriteRepository + 'static,
    {
        Self {
            users: store.clone(),
            games: store.clone(),
            reviews: store.clone(),
            favorites: store,
        }
    }

    pub fn in_memory() -> Self {
        Self::from_store(Arc::new(InMemoryStore::new()))
    }
}
