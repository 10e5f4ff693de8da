//! Gemini Adapter HTTP Server
//!
//! Routes the health check and the two Google OAuth steps to their handlers.

pub mod oauth_handlers;

use crate::auth::{GoogleOAuthClient, IdentityProvider};
use crate::AdapterConfig;
use axum::{routing::get, Router as AxumRouter};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Application state shared across handlers
///
/// Read-only after startup; per-request credentials never live here.
#[derive(Clone)]
pub struct AppState {
    /// Identity provider performing the code exchange and profile lookup
    pub provider: Arc<dyn IdentityProvider>,
}

impl AppState {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self { provider }
    }
}

/// Build the adapter router:
/// - GET /hello - Health check
/// - GET /auth/google - Redirect to the Google consent screen
/// - GET /auth/google/callback - Exchange the code and fetch the profile
pub fn router(state: Arc<AppState>) -> AxumRouter {
    AxumRouter::new()
        .route("/hello", get(oauth_handlers::hello))
        .route("/auth/google", get(oauth_handlers::google_authorize))
        .route("/auth/google/callback", get(oauth_handlers::google_callback))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the Gemini Adapter HTTP server
///
/// # Errors
/// Returns error if binding the listen address or serving fails
pub async fn start_server(config: AdapterConfig) -> anyhow::Result<()> {
    let provider = GoogleOAuthClient::new(&config);
    let state = Arc::new(AppState::new(Arc::new(provider)));
    let app = router(state);

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr).await?;

    info!("[INFO] Gemini Adapter listening on {}", addr);
    info!("[INFO] Redirect URI: {}", config.client.redirect_uri.as_str());
    info!("[INFO] Available endpoints:");
    info!("  GET    /hello                   - Health check");
    info!("  GET    /auth/google             - Start Google OAuth consent");
    info!("  GET    /auth/google/callback    - OAuth callback handler");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("[INFO] Gemini Adapter stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
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

    info!("[INFO] Shutdown signal received");
}
