//! Drives the router end to end over the in-memory store.

use std::sync::Arc;

use api_adapters::router;
use auth_adapters::JwtAuthProvider;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::Duration;
use domains::{Credentials, PasswordHasher, Registration, Role};
use serde_json::{json, Value};
use services::{Ports, Services};
use storage_adapters::Repositories;
use tower::ServiceExt;

const SECRET: &[u8] = b"handler-tests-secret-0123456789";

/// Fast stand-in for Argon2; these tests are about routing, not hashing.
struct PlainHasher;

impl PasswordHasher for PlainHasher {
    fn hash_password(&self, password: &str) -> anyhow::Result<String> {
        Ok(format!("plain:{password}"))
    }

    fn verify_password(&self, password: &str, hash: &str) -> bool {
        hash == format!("plain:{password}")
    }
}

struct TestApp {
    router: Router,
    services: Services,
}

fn app() -> TestApp {
    let repos = Repositories::in_memory();
    let services = Services::new(Ports {
        users: repos.users,
        games: repos.games,
        reviews: repos.reviews,
        favorites: repos.favorites,
        hasher: Arc::new(PlainHasher),
        auth: Arc::new(JwtAuthProvider::new(SECRET, Duration::hours(1)).unwrap()),
    });
    TestApp {
        router: router(services.clone()),
        services,
    }
}

impl TestApp {
    async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let req = match body {
            Some(body) => req
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => req.body(Body::empty()).unwrap(),
        };

        let resp = self.router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    async fn admin_token(&self) -> String {
        self.services
            .auth
            .create_user(
                Registration {
                    username: "admin".into(),
                    email: "admin@example.com".into(),
                    password: "admin-pass".into(),
                },
                Role::Admin,
            )
            .await
            .unwrap();
        self.services
            .auth
            .login(Credentials {
                email: "admin@example.com".into(),
                password: "admin-pass".into(),
            })
            .await
            .unwrap()
            .token
    }

    async fn register(&self, username: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/auth/register",
                None,
                Some(json!({
                    "username": username,
                    "email": format!("{username}@example.com"),
                    "password": "secret-pass",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        body["token"].as_str().unwrap().to_owned()
    }

    async fn create_game(&self, admin: &str, title: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/games",
                Some(admin),
                Some(json!({ "title": title, "platform": "PC, PS5", "genre": ["RPG"] })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        body["game"]["id"].as_str().unwrap().to_owned()
    }
}

#[tokio::test]
async fn health_check_responds() {
    let app = app();
    let (status, body) = app.send(Method::GET, "/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn register_returns_token_and_hides_hash() {
    let app = app();
    let (status, body) = app
        .send(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({ "username": "nova", "email": "Nova@Example.com", "password": "pw" })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(body["token"].is_string());
    assert_eq!(body["user"]["userType"], "Registered");
    assert_eq!(body["user"]["email"], "nova@example.com");
    assert!(body["user"].get("passwordHash").is_none());

    let token = body["token"].as_str().unwrap();
    let (status, me) = app.send(Method::GET, "/api/auth/me", Some(token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["user"]["username"], "nova");
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let app = app();
    app.register("nova").await;
    let (status, body) = app
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "nova@example.com", "password": "nope" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid email or password");
}

#[tokio::test]
async fn catalog_mutations_need_admin() {
    let app = app();
    let user = app.register("nova").await;
    let game = json!({ "title": "Starfall" });

    let (status, _) = app.send(Method::POST, "/api/games", None, Some(game.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .send(Method::POST, "/api/games", Some("garbage"), Some(game.clone()))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app.send(Method::POST, "/api/games", Some(&user), Some(game)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn admin_creates_game_with_normalized_tags() {
    let app = app();
    let admin = app.admin_token().await;
    let (status, body) = app
        .send(
            Method::POST,
            "/api/games",
            Some(&admin),
            Some(json!({
                "title": "Starfall",
                "platform": " PC, PS5 ,",
                "averageRating": 5,
                "totalRatings": 99,
            })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["game"]["platform"], json!(["PC", "PS5"]));
    assert_eq!(body["game"]["averageRating"], 0.0);
    assert_eq!(body["game"]["totalRatings"], 0);
    assert_eq!(body["game"]["status"], "Upcoming");
}

#[tokio::test]
async fn reviews_drive_the_rating_summary() {
    let app = app();
    let admin = app.admin_token().await;
    let nova = app.register("nova").await;
    let game_id = app.create_game(&admin, "Starfall").await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/reviews",
            Some(&nova),
            Some(json!({ "gameId": game_id, "rating": 4, "text": "solid" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let review_id = body["review"]["id"].as_str().unwrap().to_owned();

    let (_, detail) = app
        .send(Method::GET, &format!("/api/games/{game_id}"), None, None)
        .await;
    assert_eq!(detail["game"]["averageRating"], 4.0);
    assert_eq!(detail["game"]["totalRatings"], 1);
    assert_eq!(detail["reviews"][0]["author"]["username"], "nova");

    let (status, _) = app
        .send(
            Method::PUT,
            &format!("/api/reviews/{review_id}"),
            Some(&nova),
            Some(json!({ "rating": 2 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, reviews) = app
        .send(Method::GET, &format!("/api/reviews/game/{game_id}"), None, None)
        .await;
    assert_eq!(reviews.as_array().unwrap().len(), 1);
    assert_eq!(reviews[0]["rating"], 2);

    let (status, _) = app
        .send(Method::DELETE, &format!("/api/reviews/{review_id}"), Some(&nova), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, detail) = app
        .send(Method::GET, &format!("/api/games/{game_id}"), None, None)
        .await;
    assert_eq!(detail["game"]["averageRating"], 0.0);
    assert_eq!(detail["game"]["totalRatings"], 0);
}

#[tokio::test]
async fn out_of_range_rating_is_bad_request() {
    let app = app();
    let admin = app.admin_token().await;
    let nova = app.register("nova").await;
    let game_id = app.create_game(&admin, "Starfall").await;

    let (status, _) = app
        .send(
            Method::POST,
            "/api/reviews",
            Some(&nova),
            Some(json!({ "gameId": game_id, "rating": 9 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn only_author_or_admin_edits_a_review() {
    let app = app();
    let admin = app.admin_token().await;
    let nova = app.register("nova").await;
    let orion = app.register("orion").await;
    let game_id = app.create_game(&admin, "Starfall").await;

    let (_, body) = app
        .send(
            Method::POST,
            "/api/reviews",
            Some(&nova),
            Some(json!({ "gameId": game_id, "rating": 5 })),
        )
        .await;
    let uri = format!("/api/reviews/{}", body["review"]["id"].as_str().unwrap());

    let (status, _) = app
        .send(Method::PUT, &uri, Some(&orion), Some(json!({ "text": "mine now" })))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.send(Method::DELETE, &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn favorites_are_unique_and_removal_is_idempotent() {
    let app = app();
    let admin = app.admin_token().await;
    let nova = app.register("nova").await;
    let game_id = app.create_game(&admin, "Starfall").await;
    let add = json!({ "gameId": game_id });

    let (status, _) = app
        .send(Method::POST, "/api/favorites", Some(&nova), Some(add.clone()))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .send(Method::POST, "/api/favorites", Some(&nova), Some(add))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Game already in favorites");

    let (_, list) = app.send(Method::GET, "/api/favorites", Some(&nova), None).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["game"]["title"], "Starfall");

    let uri = format!("/api/favorites/{game_id}");
    for _ in 0..2 {
        let (status, _) = app.send(Method::DELETE, &uri, Some(&nova), None).await;
        assert_eq!(status, StatusCode::OK);
    }
    let (_, list) = app.send(Method::GET, "/api/favorites", Some(&nova), None).await;
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn missing_and_malformed_ids() {
    let app = app();
    let unknown = uuid::Uuid::now_v7();

    let (status, body) = app
        .send(Method::GET, &format!("/api/games/{unknown}"), None, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Game not found");

    let (status, _) = app.send(Method::GET, "/api/games/not-a-uuid", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn listing_filters_by_query() {
    let app = app();
    let admin = app.admin_token().await;
    app.create_game(&admin, "Starfall").await;
    app.send(
        Method::POST,
        "/api/games",
        Some(&admin),
        Some(json!({ "title": "Moonrise", "platform": "Switch", "status": "Released" })),
    )
    .await;

    let (_, all) = app.send(Method::GET, "/api/games", None, None).await;
    assert_eq!(all.as_array().unwrap().len(), 2);

    let (_, switch) = app
        .send(Method::GET, "/api/games?platform=Switch", None, None)
        .await;
    assert_eq!(switch.as_array().unwrap().len(), 1);
    assert_eq!(switch[0]["title"], "Moonrise");

    let (_, search) = app.send(Method::GET, "/api/games?search=star", None, None).await;
    assert_eq!(search[0]["title"], "Starfall");

    let (_, released) = app
        .send(Method::GET, "/api/games?status=Released", None, None)
        .await;
    assert_eq!(released.as_array().unwrap().len(), 1);
}
