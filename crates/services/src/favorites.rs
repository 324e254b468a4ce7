//! # Favorite Service
//!
//! The many-to-many User <-> Game bookmark relation.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use domains::{
    DomainError, Favorite, FavoriteRepository, FavoriteWithGame, GameRepository, Result,
};
use tracing::{debug, info};
use uuid::Uuid;

pub struct FavoriteService {
    favorites: Arc<dyn FavoriteRepository>,
    games: Arc<dyn GameRepository>,
}

impl FavoriteService {
    pub fn new(favorites: Arc<dyn FavoriteRepository>, games: Arc<dyn GameRepository>) -> Self {
        Self { favorites, games }
    }

    /// Bookmarks a game. A second add for the same pair is a `Conflict`.
    pub async fn add(&self, user_id: Uuid, game_id: Uuid) -> Result<Favorite> {
        if self.games.find_by_id(game_id).await?.is_none() {
            return Err(DomainError::not_found("Game", game_id));
        }

        let favorite = Favorite {
            id: Uuid::now_v7(),
            user_id,
            game_id,
            created_at: Utc::now(),
        };
        if !self.favorites.insert(&favorite).await? {
            return Err(DomainError::conflict("Game already in favorites"));
        }

        info!(%user_id, %game_id, "favorite added");
        Ok(favorite)
    }

    /// Idempotent: removing something that is not there is fine.
    pub async fn remove(&self, user_id: Uuid, game_id: Uuid) -> Result<()> {
        if self.favorites.delete(user_id, game_id).await? {
            info!(%user_id, %game_id, "favorite removed");
        }
        Ok(())
    }

    /// The user's favorites with their games, newest first.
    ///
    /// Favorites whose game has since been deleted are left out.
    pub async fn list(&self, user_id: Uuid) -> Result<Vec<FavoriteWithGame>> {
        let favorites = self.favorites.list_for_user(user_id).await?;
        let game_ids: Vec<Uuid> = favorites.iter().map(|f| f.game_id).collect();

        let mut games: HashMap<Uuid, _> = self
            .games
            .find_many(&game_ids)
            .await?
            .into_iter()
            .map(|g| (g.id, g))
            .collect();

        let total = favorites.len();
        let resolved: Vec<FavoriteWithGame> = favorites
            .into_iter()
            .filter_map(|favorite| {
                let game = games.remove(&favorite.game_id)?;
                Some(FavoriteWithGame { favorite, game })
            })
            .collect();

        if resolved.len() < total {
            debug!(%user_id, orphaned = total - resolved.len(), "skipped favorites of deleted games");
        }
        Ok(resolved)
    }
}
