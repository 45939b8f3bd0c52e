use std::sync::Arc;

use axum::{Router, http::StatusCode, middleware, routing::get};
use tokio::net::TcpListener;
use tower_http::{
    decompression::RequestDecompressionLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use tracing::{error, info};

use super::{
    auth::require_user,
    services::{add, delete, get_by_package, get_by_user, health},
    state::AppState,
};
use crate::config::Config;
use crate::subscription::FjallManager;

type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Build the HTTP router
///
/// Subscription routes sit behind the identity middleware; `/health` does not.
pub fn router(state: AppState) -> Router {
    let timeout = state.config.server.request_timeout();

    let subscriptions = Router::new()
        .route(
            "/api/v1/subscriptions",
            get(get_by_user).post(add).delete(delete),
        )
        .route("/api/v1/subscriptions/{packageID}", get(get_by_package))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_user));

    Router::new()
        .merge(subscriptions)
        .route("/health", get(health))
        .with_state(state)
        // Gzip/deflate request bodies are decoded before handlers see them
        .layer(RequestDecompressionLayer::new())
        // Dropping the handler future on timeout cancels the manager call
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .layer(TraceLayer::new_for_http())
}

pub async fn run(config: Config) -> Result<(), AnyError> {
    info!(path = %config.server.store_path.display(), "Opening subscription store");
    let manager = Arc::new(
        FjallManager::open(&config.server.store_path, config.subscriptions)
            .map_err(|e| format!("Failed to open subscription store: {}", e))?,
    );

    let address = config.server.bind_addr;
    let state = AppState::new(config, manager.clone())?;
    let app = router(state);

    let listener = TcpListener::bind(address).await?;
    info!(%address, "hubsub API listening");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    manager.persist()?;
    info!("Subscription store flushed");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                error!(error = %err, "Failed to install SIGTERM handler");
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

    info!("Shutdown signal received");
}
