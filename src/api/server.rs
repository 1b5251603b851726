use std::sync::Arc;

use axum::{Router, routing::get, routing::post};
use tokio::net::TcpListener;
use tower_http::decompression::RequestDecompressionLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::{
    services::{authorization_callback, authorize, health, webhook},
    state::AppState,
};
use crate::catalog::{SpotifyWebApi, authorize_url};
use crate::chat::LineMessagingClient;
use crate::config::Config;

type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Routes of the bot, with paths taken from `server` config.
pub fn build_router(state: AppState) -> Router {
    let config = Arc::clone(&state.config);

    Router::new()
        .route(&config.server.webhook_path, post(webhook))
        .route(&config.server.callback_path, get(authorization_callback))
        .route("/authorize", get(authorize))
        .route("/health", get(health))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        // Automatically decompress gzip request bodies
        .layer(RequestDecompressionLayer::new())
}

pub async fn run(config: Config) -> Result<(), AnyError> {
    let catalog_api = SpotifyWebApi::new(&config.catalog)?;
    let transport = LineMessagingClient::new(&config.chat)?;

    match authorize_url(&config.catalog, &Uuid::new_v4().simple().to_string()) {
        Ok(url) => warn!(%url, "Authorization required: open this URL to connect the music account"),
        Err(e) => error!(error = %e, "Failed to build authorization URL"),
    }

    let address = config.server.bind_addr;
    let state = AppState::new(config, Arc::new(catalog_api), Arc::new(transport));
    let app = build_router(state);

    let listener = TcpListener::bind(address).await?;
    info!(%address, "Jukebot listening");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        let mut sigterm = signal(SignalKind::terminate())
            .expect("failed to install signal handler");
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
