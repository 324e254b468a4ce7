//! Bootstraps a Postgres-backed deployment: the first Admin account and,
//! optionally, a few demo games. Safe to run more than once.

use std::sync::Arc;

use anyhow::Context;
use auth_adapters::{Argon2Hasher, JwtAuthProvider};
use chrono::{TimeZone, Utc};
use configs::{DatabaseBackend, Settings};
use domains::{DomainError, GameFilter, GameStatus, NewGame, Registration, Role, TagInput};
use secrecy::ExposeSecret;
use services::{Ports, Services};
use storage_adapters::{PostgresStore, Repositories};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("loading settings")?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log.level)),
        )
        .init();

    if settings.database.backend != DatabaseBackend::Postgres {
        anyhow::bail!("seeding needs database.backend = \"postgres\"");
    }
    let url = settings
        .database
        .url
        .as_ref()
        .context("database.url is not set")?;
    let store = PostgresStore::connect(url.expose_secret(), settings.database.max_connections).await?;
    let repos = Repositories::from_store(Arc::new(store));

    let provider = JwtAuthProvider::new(
        settings.auth.jwt_secret.expose_secret().as_bytes(),
        chrono::Duration::try_hours(settings.auth.token_ttl_hours)
            .context("auth.token_ttl_hours is out of range")?,
    )?;
    let services = Services::new(Ports {
        users: repos.users,
        games: repos.games,
        reviews: repos.reviews,
        favorites: repos.favorites,
        hasher: Arc::new(Argon2Hasher::new()),
        auth: Arc::new(provider),
    });

    seed_admin(&services, &settings).await?;
    if settings.seed.sample_games {
        seed_games(&services).await?;
    }
    Ok(())
}

async fn seed_admin(services: &Services, settings: &Settings) -> anyhow::Result<()> {
    let seed = &settings.seed;
    let (Some(username), Some(email), Some(password)) =
        (&seed.admin_username, &seed.admin_email, &seed.admin_password)
    else {
        anyhow::bail!("seed.admin_username, seed.admin_email and seed.admin_password are required");
    };

    let input = Registration {
        username: username.clone(),
        email: email.clone(),
        password: password.expose_secret().to_owned(),
    };
    match services.auth.create_user(input, Role::Admin).await {
        Ok(user) => info!(user_id = %user.id, %username, "admin account created"),
        Err(DomainError::Conflict(_)) => warn!(%username, "admin account already exists; left as is"),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

async fn seed_games(services: &Services) -> anyhow::Result<()> {
    if !services.catalog.list(GameFilter::default()).await?.is_empty() {
        info!("catalog is not empty; skipping sample games");
        return Ok(());
    }

    let samples = [
        ("Starfall Odyssey", "PC, PS5", "RPG", GameStatus::Released, Some((2024, 9, 12))),
        ("Moonrise Tactics", "Switch", "Strategy", GameStatus::Released, Some((2023, 4, 2))),
        ("Deep Current", "PC, Xbox Series X", "Adventure, Survival", GameStatus::Upcoming, None),
    ];
    for (title, platforms, genres, status, released) in samples {
        let release_date = released
            .and_then(|(y, m, d)| Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).single());
        let game = services
            .catalog
            .create(NewGame {
                title: Some(title.to_owned()),
                release_date,
                platform: Some(TagInput::from(platforms)),
                genre: Some(TagInput::from(genres)),
                status: Some(status),
                ..NewGame::default()
            })
            .await?;
        info!(game_id = %game.id, title, "sample game added");
    }
    Ok(())
}
