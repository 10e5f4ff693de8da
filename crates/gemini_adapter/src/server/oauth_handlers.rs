//! Gemini Adapter Handlers
//!
//! HTTP handlers for the health check and the Google authorization-code flow.

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::auth::{IdentityProvider, UserProfile};
use crate::error::AuthError;

use super::AppState;

pub const HELLO_MESSAGE: &str = "Hello from the Gemini Adapter!";
pub const SUCCESS_MESSAGE: &str = "Authentication successful! You can close this window.";
pub const FAILURE_MESSAGE: &str = "Authentication failed. Check the server logs for details.";
pub const MISSING_CODE_MESSAGE: &str = "Missing authorization code.";

/// Health check
pub async fn hello() -> (StatusCode, &'static str) {
    (StatusCode::OK, HELLO_MESSAGE)
}

/// Redirect the browser to the Google consent screen
pub async fn google_authorize(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let url = state.provider.authorization_url();
    tracing::debug!("Redirecting to consent screen");

    (StatusCode::FOUND, [(header::LOCATION, url)])
}

/// OAuth callback query parameters
#[derive(Debug, Default, Deserialize)]
pub struct OAuthCallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// OAuth callback handler - exchanges the code and looks up the user
pub async fn google_callback(
    State(state): State<Arc<AppState>>,
    Query(params): Query<OAuthCallbackQuery>,
) -> (StatusCode, &'static str) {
    match complete_authorization(state.provider.as_ref(), &params).await {
        Ok(profile) => {
            tracing::info!("[OK] Google OAuth completed for user {}", profile.id);
            (StatusCode::OK, SUCCESS_MESSAGE)
        }
        Err(AuthError::MissingCode) => {
            tracing::warn!("[WARN] OAuth callback without authorization code");
            (StatusCode::BAD_REQUEST, MISSING_CODE_MESSAGE)
        }
        Err(e) => {
            tracing::error!("[ERROR] Google OAuth failed: {}", e);
            (e.status_code(), FAILURE_MESSAGE)
        }
    }
}

/// Run the two provider calls for one callback.
///
/// Tokens stay on this stack frame and are handed to the profile lookup
/// directly, so nothing is shared with concurrent callbacks.
async fn complete_authorization(
    provider: &dyn IdentityProvider,
    params: &OAuthCallbackQuery,
) -> Result<UserProfile, AuthError> {
    if let Some(error) = &params.error {
        tracing::warn!(
            "[WARN] Provider returned error to callback: {} ({})",
            error,
            params.error_description.as_deref().unwrap_or("no description")
        );
    }

    let code = params
        .code
        .as_deref()
        .filter(|code| !code.is_empty())
        .ok_or(AuthError::MissingCode)?;

    let tokens = provider.exchange_code(code).await?;
    tracing::info!(
        has_refresh_token = tokens.has_refresh_token(),
        expires_at = ?tokens.expires_at,
        scopes = ?tokens.scopes,
        "[OK] Exchanged authorization code: {:?}",
        tokens
    );

    let profile = provider.fetch_profile(&tokens).await?;
    tracing::info!(
        user_id = %profile.id,
        name = ?profile.name,
        picture = ?profile.picture,
        "[OK] Fetched user profile"
    );

    Ok(profile)
}
