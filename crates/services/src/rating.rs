//! # Rating Aggregator
//!
//! Keeps a game's `averageRating`/`totalRatings` consistent with its reviews.
//! Every call re-derives both fields from the full current review set.

use std::sync::Arc;

use dashmap::DashMap;
use domains::{GameRepository, RatingSummary, Result, ReviewRepository};
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

pub struct RatingAggregator {
    games: Arc<dyn GameRepository>,
    reviews: Arc<dyn ReviewRepository>,
    /// One lock per game: recomputes for the same game run one at a time.
    locks: DashMap<Uuid, Arc<Mutex<()>>>,
}

impl RatingAggregator {
    pub fn new(games: Arc<dyn GameRepository>, reviews: Arc<dyn ReviewRepository>) -> Self {
        Self {
            games,
            reviews,
            locks: DashMap::new(),
        }
    }

    /// Recomputes and persists the derived rating fields of `game_id`.
    ///
    /// A game that has disappeared in the meantime is not an error: its
    /// reviews went with it, so there is nothing left to keep consistent.
    pub async fn recompute(&self, game_id: Uuid) -> Result<()> {
        let lock = self.lock_for(game_id);
        let _guard = lock.lock().await;

        let ratings = self.reviews.ratings_for_game(game_id).await?;
        let summary = RatingSummary::from_ratings(ratings);

        if self.games.set_rating_summary(game_id, summary).await? {
            debug!(
                %game_id,
                average_rating = summary.average_rating,
                total_ratings = summary.total_ratings,
                "recomputed game rating"
            );
        } else {
            debug!(%game_id, "game vanished before rating recompute; skipping");
        }
        Ok(())
    }

    /// Drops the lock entry of a deleted game.
    pub fn forget(&self, game_id: Uuid) {
        self.locks.remove(&game_id);
    }

    fn lock_for(&self, game_id: Uuid) -> Arc<Mutex<()>> {
        self.locks
            .entry(game_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
