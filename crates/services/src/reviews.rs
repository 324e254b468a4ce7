//! # Review Service
//!
//! Owns review records. Every mutation that can change a rating hands the
//! game over to the [`RatingAggregator`].

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use domains::{
    validate_rating, AuthorSummary, Caller, DomainError, GameRepository, NewReview, Result,
    Review, ReviewPatch, ReviewRepository, ReviewWithAuthor, UserRepository, DELETED_AUTHOR,
};
use tracing::info;
use uuid::Uuid;

use crate::access;
use crate::rating::RatingAggregator;

pub struct ReviewService {
    reviews: Arc<dyn ReviewRepository>,
    games: Arc<dyn GameRepository>,
    users: Arc<dyn UserRepository>,
    aggregator: Arc<RatingAggregator>,
}

/// Empty or whitespace-only text counts as no text.
fn clean_text(text: Option<String>) -> Option<String> {
    text.filter(|t| !t.trim().is_empty())
}

impl ReviewService {
    pub fn new(
        reviews: Arc<dyn ReviewRepository>,
        games: Arc<dyn GameRepository>,
        users: Arc<dyn UserRepository>,
        aggregator: Arc<RatingAggregator>,
    ) -> Self {
        Self {
            reviews,
            games,
            users,
            aggregator,
        }
    }

    /// Posts a review authored by `author_id`.
    pub async fn create(&self, author_id: Uuid, input: NewReview) -> Result<Review> {
        let game_id = input
            .game_id
            .ok_or_else(|| DomainError::validation("gameId is required"))?;

        let text = clean_text(input.text);
        let rating = input.rating.map(validate_rating).transpose()?;
        if text.is_none() && rating.is_none() {
            return Err(DomainError::validation("Provide either text or rating"));
        }

        if self.games.find_by_id(game_id).await?.is_none() {
            return Err(DomainError::not_found("Game", game_id));
        }

        let now = Utc::now();
        let review = Review {
            id: Uuid::now_v7(),
            user_id: author_id,
            game_id,
            text,
            rating,
            created_at: now,
            updated_at: now,
        };
        self.reviews.create(&review).await?;
        info!(review_id = %review.id, %game_id, user_id = %author_id, "review created");

        if review.rating.is_some() {
            self.aggregator.recompute(game_id).await?;
        }
        Ok(review)
    }

    /// Applies the fields present in `patch`; explicit nulls clear.
    pub async fn update(&self, review_id: Uuid, caller: &Caller, patch: ReviewPatch) -> Result<Review> {
        let mut review = self
            .reviews
            .find_by_id(review_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Review", review_id))?;

        access::ensure_self_or_admin(caller, review.user_id)?;

        if let Some(text) = patch.text {
            review.text = clean_text(text);
        }
        if let Some(rating) = patch.rating {
            review.rating = rating.map(validate_rating).transpose()?;
        }
        review.updated_at = Utc::now();

        if !self.reviews.update(&review).await? {
            return Err(DomainError::not_found("Review", review_id));
        }
        info!(%review_id, game_id = %review.game_id, user_id = %caller.user_id, "review updated");

        // Recomputed even when the rating did not change.
        self.aggregator.recompute(review.game_id).await?;
        Ok(review)
    }

    pub async fn delete(&self, review_id: Uuid, caller: &Caller) -> Result<()> {
        let review = self
            .reviews
            .find_by_id(review_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Review", review_id))?;

        access::ensure_self_or_admin(caller, review.user_id)?;

        if self.reviews.delete(review_id).await?.is_none() {
            return Err(DomainError::not_found("Review", review_id));
        }
        info!(%review_id, game_id = %review.game_id, user_id = %caller.user_id, "review deleted");

        self.aggregator.recompute(review.game_id).await
    }

    /// Public read: newest first, each with its author's username.
    pub async fn list_by_game(&self, game_id: Uuid) -> Result<Vec<ReviewWithAuthor>> {
        let reviews = self.reviews.list_for_game(game_id).await?;
        self.with_authors(reviews).await
    }

    pub(crate) async fn with_authors(&self, reviews: Vec<Review>) -> Result<Vec<ReviewWithAuthor>> {
        let mut author_ids: Vec<Uuid> = reviews.iter().map(|r| r.user_id).collect();
        author_ids.sort_unstable();
        author_ids.dedup();

        let names: HashMap<Uuid, String> = self
            .users
            .find_many(&author_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u.username))
            .collect();

        Ok(reviews
            .into_iter()
            .map(|review| {
                let username = names
                    .get(&review.user_id)
                    .cloned()
                    .unwrap_or_else(|| DELETED_AUTHOR.to_owned());
                ReviewWithAuthor {
                    author: AuthorSummary {
                        id: review.user_id,
                        username,
                    },
                    review,
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::{MockGameRepository, MockReviewRepository, MockUserRepository, Role};

    fn service(
        reviews: MockReviewRepository,
        games: MockGameRepository,
        users: MockUserRepository,
    ) -> ReviewService {
        let reviews: Arc<dyn ReviewRepository> = Arc::new(reviews);
        let games: Arc<dyn GameRepository> = Arc::new(games);
        let aggregator = Arc::new(RatingAggregator::new(games.clone(), reviews.clone()));
        ReviewService::new(reviews, games, Arc::new(users), aggregator)
    }

    fn stored_review(author: Uuid) -> Review {
        Review {
            id: Uuid::now_v7(),
            user_id: author,
            game_id: Uuid::now_v7(),
            text: Some("fine".into()),
            rating: Some(3),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn rejects_review_without_text_or_rating() {
        let svc = service(
            MockReviewRepository::new(),
            MockGameRepository::new(),
            MockUserRepository::new(),
        );
        let input = NewReview {
            game_id: Some(Uuid::now_v7()),
            text: Some(String::new()),
            rating: None,
        };
        let err = svc.create(Uuid::now_v7(), input).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn rejects_missing_game_id() {
        let svc = service(
            MockReviewRepository::new(),
            MockGameRepository::new(),
            MockUserRepository::new(),
        );
        let input = NewReview {
            game_id: None,
            text: Some("hi".into()),
            rating: None,
        };
        assert!(matches!(
            svc.create(Uuid::now_v7(), input).await,
            Err(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn rejects_unknown_game() {
        let mut games = MockGameRepository::new();
        games.expect_find_by_id().returning(|_| Ok(None));
        let svc = service(MockReviewRepository::new(), games, MockUserRepository::new());

        let input = NewReview {
            game_id: Some(Uuid::now_v7()),
            text: None,
            rating: Some(4),
        };
        assert!(matches!(
            svc.create(Uuid::now_v7(), input).await,
            Err(DomainError::NotFound { entity: "Game", .. })
        ));
    }

    #[tokio::test]
    async fn stranger_cannot_update_and_nothing_is_written() {
        let original = stored_review(Uuid::now_v7());
        let id = original.id;

        let mut reviews = MockReviewRepository::new();
        reviews
            .expect_find_by_id()
            .returning(move |_| Ok(Some(original.clone())));
        reviews.expect_update().never();

        let svc = service(reviews, MockGameRepository::new(), MockUserRepository::new());
        let caller = Caller::new(Uuid::now_v7(), Role::Registered);
        let patch = ReviewPatch {
            text: Some(Some("hijacked".into())),
            rating: None,
        };
        let err = svc.update(id, &caller, patch).await.unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[tokio::test]
    async fn stranger_cannot_delete() {
        let original = stored_review(Uuid::now_v7());
        let id = original.id;

        let mut reviews = MockReviewRepository::new();
        reviews
            .expect_find_by_id()
            .returning(move |_| Ok(Some(original.clone())));
        reviews.expect_delete().never();

        let svc = service(reviews, MockGameRepository::new(), MockUserRepository::new());
        let caller = Caller::new(Uuid::now_v7(), Role::Registered);
        assert!(matches!(
            svc.delete(id, &caller).await,
            Err(DomainError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn text_only_update_still_recomputes() {
        let author = Uuid::now_v7();
        let original = stored_review(author);
        let id = original.id;

        let mut reviews = MockReviewRepository::new();
        reviews
            .expect_find_by_id()
            .returning(move |_| Ok(Some(original.clone())));
        reviews.expect_update().times(1).returning(|_| Ok(true));
        reviews
            .expect_ratings_for_game()
            .times(1)
            .returning(|_| Ok(vec![3]));

        let mut games = MockGameRepository::new();
        games
            .expect_set_rating_summary()
            .times(1)
            .returning(|_, _| Ok(true));

        let svc = service(reviews, games, MockUserRepository::new());
        let patch = ReviewPatch {
            text: Some(Some("changed my mind".into())),
            rating: None,
        };
        let updated = svc
            .update(id, &Caller::new(author, Role::Registered), patch)
            .await
            .unwrap();
        assert_eq!(updated.text.as_deref(), Some("changed my mind"));
        assert_eq!(updated.rating, Some(3));
    }

    #[tokio::test]
    async fn missing_author_gets_placeholder_name() {
        let review = stored_review(Uuid::now_v7());
        let game_id = review.game_id;

        let mut reviews = MockReviewRepository::new();
        reviews
            .expect_list_for_game()
            .returning(move |_| Ok(vec![review.clone()]));
        let mut users = MockUserRepository::new();
        users.expect_find_many().returning(|_| Ok(vec![]));

        let svc = service(reviews, MockGameRepository::new(), users);
        let listed = svc.list_by_game(game_id).await.unwrap();
        assert_eq!(listed[0].author.username, DELETED_AUTHOR);
    }
}
