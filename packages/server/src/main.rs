use std::sync::Arc;

use anyhow::Context as _;
use api::auth::TokenSigner;
use api::db::{IdentityStore, MemoryIdentityStore, PgIdentityStore};
use api::settings::StoreBackend;
use api::{AppState, AuthService, Settings};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = Settings::new().context("Failed to load settings")?;

    let store: Arc<dyn IdentityStore> = match settings.store {
        StoreBackend::Postgres => {
            let pool = api::db::connect(&settings.database_url)
                .await
                .context("Failed to connect to database")?;
            Arc::new(PgIdentityStore::new(pool))
        }
        StoreBackend::Memory => {
            tracing::warn!("using in-memory identity store; accounts are lost on restart");
            Arc::new(MemoryIdentityStore::new())
        }
    };

    let ttl = chrono::Duration::try_seconds(settings.jwt.ttl_secs)
        .context("jwt.ttl_secs out of range")?;
    let tokens = TokenSigner::new(&settings.jwt.secret, ttl)?;
    let state = AppState::new(
        AuthService::new(store, tokens),
        settings.expose_error_detail(),
    );

    let listener = tokio::net::TcpListener::bind(&settings.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", settings.bind_address))?;
    tracing::info!("Server listening on {}", settings.bind_address);

    axum::serve(listener, api::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
