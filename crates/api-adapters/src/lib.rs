//! # api-adapters
//!
//! JSON-over-HTTP surface of the game bulletin. Handlers only translate
//! requests into service calls and service results into responses; every
//! rule lives in `services`.

#[cfg(feature = "web-axum")]
pub mod error;
#[cfg(feature = "web-axum")]
pub mod extract;
#[cfg(feature = "web-axum")]
pub mod handlers;
#[cfg(feature = "web-axum")]
pub mod middleware;

#[cfg(feature = "web-axum")]
pub use web::{router, AppState};

#[cfg(feature = "web-axum")]
mod web {
    use axum::routing::{delete, get, post, put};
    use axum::Router;
    use services::Services;

    use crate::handlers::{auth, favorites, games, reviews};
    use crate::middleware;

    /// State shared by every handler.
    #[derive(Clone)]
    pub struct AppState {
        pub services: Services,
    }

    /// Builds the full application router, middleware included.
    pub fn router(services: Services) -> Router {
        let state = AppState { services };

        let routes = Router::new()
            .route("/", get(games::health))
            .route("/api/auth/register", post(auth::register))
            .route("/api/auth/login", post(auth::login))
            .route("/api/auth/me", get(auth::me))
            .route("/api/games", get(games::list).post(games::create))
            .route(
                "/api/games/{id}",
                get(games::get_by_id).put(games::update).delete(games::delete),
            )
            .route("/api/reviews", post(reviews::create))
            .route("/api/reviews/game/{game_id}", get(reviews::list_by_game))
            .route("/api/reviews/{id}", put(reviews::update).delete(reviews::delete))
            .route("/api/favorites", get(favorites::list).post(favorites::add))
            .route("/api/favorites/{game_id}", delete(favorites::remove));

        middleware::apply(routes).with_state(state)
    }
}
