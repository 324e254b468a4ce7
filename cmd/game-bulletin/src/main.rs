//! # Game Bulletin server
//!
//! Loads settings, picks the storage backend, wires the services and serves
//! the HTTP API until Ctrl+C or SIGTERM.

use std::sync::Arc;

use anyhow::Context;
use auth_adapters::{Argon2Hasher, JwtAuthProvider};
use configs::{DatabaseBackend, LogSettings, Settings};
use secrecy::ExposeSecret;
use services::{Ports, Services};
use storage_adapters::Repositories;
use tokio::net::TcpListener;
use tokio::signal::ctrl_c;
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("loading settings")?;
    init_tracing(&settings.log);

    let repos = open_repositories(&settings).await?;
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

    let app = api_adapters::router(services);
    let address = settings.server.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("binding {address}"))?;
    info!(%address, "game bulletin listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

/// `RUST_LOG` wins over `log.level` when set.
fn init_tracing(log: &LogSettings) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));
    let registry = tracing_subscriber::registry().with(filter);
    if log.json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

async fn open_repositories(settings: &Settings) -> anyhow::Result<Repositories> {
    match settings.database.backend {
        DatabaseBackend::Memory => {
            info!("using in-memory storage; data is lost on exit");
            Ok(Repositories::in_memory())
        }
        #[cfg(feature = "db-postgres")]
        DatabaseBackend::Postgres => {
            let url = settings
                .database
                .url
                .as_ref()
                .context("database.url is not set")?;
            let store = storage_adapters::PostgresStore::connect(
                url.expose_secret(),
                settings.database.max_connections,
            )
            .await?;
            Ok(Repositories::from_store(Arc::new(store)))
        }
        #[cfg(not(feature = "db-postgres"))]
        DatabaseBackend::Postgres => {
            anyhow::bail!("this build has no postgres support; rebuild with the db-postgres feature")
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = ctrl_c().await {
            error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
        info!("received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("received terminate signal, shutting down");
            }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
