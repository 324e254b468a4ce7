//! # services
//!
//! Application logic of the game bulletin: access control, rating
//! aggregation, and the catalog / review / favorite / auth services.
//! Everything talks to storage and credentials through the `domains` ports.

pub mod access;
pub mod auth;
pub mod catalog;
pub mod favorites;
pub mod rating;
pub mod reviews;

use std::sync::Arc;

use domains::{
    AuthProvider, FavoriteRepository, GameRepository, PasswordHasher, ReviewRepository,
    UserRepository,
};

pub use auth::{AuthService, Session};
pub use catalog::CatalogService;
pub use favorites::FavoriteService;
pub use rating::RatingAggregator;
pub use reviews::ReviewService;

/// Every port the services need, supplied by the binary's adapters.
#[derive(Clone)]
pub struct Ports {
    pub users: Arc<dyn UserRepository>,
    pub games: Arc<dyn GameRepository>,
    pub reviews: Arc<dyn ReviewRepository>,
    pub favorites: Arc<dyn FavoriteRepository>,
    pub hasher: Arc<dyn PasswordHasher>,
    pub auth: Arc<dyn AuthProvider>,
}

/// The wired-up service graph shared by all request handlers.
#[derive(Clone)]
pub struct Services {
    pub auth: Arc<AuthService>,
    pub catalog: Arc<CatalogService>,
    pub reviews: Arc<ReviewService>,
    pub favorites: Arc<FavoriteService>,
    pub ratings: Arc<RatingAggregator>,
}

impl Services {
    pub fn new(ports: Ports) -> Self {
        let ratings = Arc::new(RatingAggregator::new(
            ports.games.clone(),
            ports.reviews.clone(),
        ));
        let reviews = Arc::new(ReviewService::new(
            ports.reviews.clone(),
            ports.games.clone(),
            ports.users.clone(),
            ratings.clone(),
        ));
        let catalog = Arc::new(CatalogService::new(
            ports.games.clone(),
            ports.reviews.clone(),
            reviews.clone(),
            ratings.clone(),
        ));
        let favorites = Arc::new(FavoriteService::new(ports.favorites, ports.games));
        let auth = Arc::new(AuthService::new(ports.users, ports.hasher, ports.auth));

        Self {
            auth,
            catalog,
            reviews,
            favorites,
            ratings,
        }
    }
}
