use anyhow::{Context, Result};
use rustpress_accounts::{create_routes, open_store, AccountService, AccountsConfig};
use std::net::SocketAddr;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Starting RustPress accounts service");

    // Load configuration
    let config = AccountsConfig::from_env().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    if config.has_long_lived_tokens() {
        tracing::warn!(
            seconds = config.token_expiration,
            "Issued tokens are long-lived and cannot be revoked"
        );
    }

    let store = open_store(&config)
        .await
        .context("Failed to open user store")?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let accounts = Arc::new(AccountService::new(store, config)?);
    let app = create_routes(accounts);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Server up and running on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
