//! # Catalog Service
//!
//! Owns game records. Admin gating happens in front of this service
//! (see [`crate::access::ensure_admin`]); the service itself trusts its caller.

use std::sync::Arc;

use chrono::Utc;
use domains::{
    DomainError, Game, GameDetail, GameFilter, GamePatch, GameRepository, NewGame, Result,
    ReviewRepository,
};
use tracing::info;
use uuid::Uuid;

use crate::rating::RatingAggregator;
use crate::reviews::ReviewService;

pub struct CatalogService {
    games: Arc<dyn GameRepository>,
    reviews: Arc<dyn ReviewRepository>,
    review_service: Arc<ReviewService>,
    aggregator: Arc<RatingAggregator>,
}

fn required_title(title: Option<String>) -> Result<String> {
    title
        .map(|t| t.trim().to_owned())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| DomainError::validation("Title is required"))
}

impl CatalogService {
    pub fn new(
        games: Arc<dyn GameRepository>,
        reviews: Arc<dyn ReviewRepository>,
        review_service: Arc<ReviewService>,
        aggregator: Arc<RatingAggregator>,
    ) -> Self {
        Self {
            games,
            reviews,
            review_service,
            aggregator,
        }
    }

    pub async fn list(&self, filter: GameFilter) -> Result<Vec<Game>> {
        Ok(self.games.list(&filter.normalized()).await?)
    }

    /// A game with its reviews (newest first, author names resolved).
    pub async fn get_by_id(&self, game_id: Uuid) -> Result<GameDetail> {
        let game = self
            .games
            .find_by_id(game_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Game", game_id))?;
        let reviews = self.review_service.list_by_game(game_id).await?;
        Ok(GameDetail { game, reviews })
    }

    /// Creates a catalog entry with zeroed rating fields.
    pub async fn create(&self, input: NewGame) -> Result<Game> {
        let title = required_title(input.title)?;
        let now = Utc::now();
        let game = Game {
            id: Uuid::now_v7(),
            title,
            description: input.description,
            release_date: input.release_date,
            platforms: input.platform.map(|p| p.into_tags()).unwrap_or_default(),
            genres: input.genre.map(|g| g.into_tags()).unwrap_or_default(),
            image_url: input.image_url,
            status: input.status.unwrap_or_default(),
            average_rating: 0.0,
            total_ratings: 0,
            created_at: now,
            updated_at: now,
        };
        self.games.create(&game).await?;
        info!(game_id = %game.id, title = %game.title, "game created");
        Ok(game)
    }

    /// Partial update of direct fields. Rating fields are never touched.
    pub async fn update(&self, game_id: Uuid, patch: GamePatch) -> Result<Game> {
        let mut game = self
            .games
            .find_by_id(game_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Game", game_id))?;

        if patch.title.is_some() {
            game.title = required_title(patch.title)?;
        }
        if let Some(description) = patch.description {
            game.description = description;
        }
        if let Some(release_date) = patch.release_date {
            game.release_date = release_date;
        }
        if let Some(platform) = patch.platform {
            game.platforms = platform.into_tags();
        }
        if let Some(genre) = patch.genre {
            game.genres = genre.into_tags();
        }
        if let Some(image_url) = patch.image_url {
            game.image_url = image_url;
        }
        if let Some(status) = patch.status {
            game.status = status;
        }
        game.updated_at = Utc::now();

        if !self.games.update_details(&game).await? {
            return Err(DomainError::not_found("Game", game_id));
        }
        info!(%game_id, "game updated");

        // The copy read above may carry stale rating fields; return what is stored.
        Ok(self.games.find_by_id(game_id).await?.unwrap_or(game))
    }

    /// Deletes the game and every review of it. Favorites are left alone.
    pub async fn delete(&self, game_id: Uuid) -> Result<()> {
        if self.games.delete(game_id).await?.is_none() {
            return Err(DomainError::not_found("Game", game_id));
        }
        let removed = self.reviews.delete_for_game(game_id).await?;
        self.aggregator.forget(game_id);
        info!(%game_id, reviews_removed = removed, "game deleted");
        Ok(())
    }
}
