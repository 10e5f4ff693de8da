use std::collections::BTreeSet;

use chrono::Utc;
use oauth2::basic::{BasicClient, BasicErrorResponse};
use oauth2::reqwest::async_http_client;
use oauth2::{AuthType, AuthorizationCode, CsrfToken, RequestTokenError, Scope, TokenResponse};
use url::Url;

use super::provider::IdentityProvider;
use super::types::{TokenPair, UserProfile};
use crate::config::AdapterConfig;
use crate::error::AuthError;

/// Google OAuth client for the Gemini authorization-code flow
pub struct GoogleOAuthClient {
    oauth: BasicClient,
    scopes: Vec<String>,
    userinfo_url: Url,
    http_client: reqwest::Client,
}

impl GoogleOAuthClient {
    pub fn new(config: &AdapterConfig) -> Self {
        // Google expects the client credentials in the form body, not Basic auth
        let oauth = BasicClient::new(
            config.client.client_id.clone(),
            Some(config.client.client_secret.clone()),
            config.endpoints.auth_url.clone(),
            Some(config.endpoints.token_url.clone()),
        )
        .set_auth_type(AuthType::RequestBody)
        .set_redirect_uri(config.client.redirect_uri.clone());

        Self {
            oauth,
            scopes: config.scopes.clone(),
            userinfo_url: config.endpoints.userinfo_url.clone(),
            http_client: reqwest::Client::new(),
        }
    }
}

#[async_trait::async_trait]
impl IdentityProvider for GoogleOAuthClient {
    fn authorization_url(&self) -> String {
        let (url, _state) = self
            .oauth
            .authorize_url(CsrfToken::new_random)
            .add_scopes(self.scopes.iter().cloned().map(Scope::new))
            .add_extra_param("access_type", "offline") // Request refresh token
            .add_extra_param("prompt", "consent") // Force consent screen
            .url();

        url.to_string()
    }

    async fn exchange_code(&self, code: &str) -> Result<TokenPair, AuthError> {
        tracing::debug!("Exchanging authorization code");

        let response = self
            .oauth
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .request_async(async_http_client)
            .await
            .map_err(classify_token_error)?;

        let expires_at = response
            .expires_in()
            .and_then(|lifetime| chrono::Duration::from_std(lifetime).ok())
            .map(|lifetime| Utc::now() + lifetime);

        let scopes: BTreeSet<String> = response
            .scopes()
            .map(|scopes| scopes.iter().map(|s| s.to_string()).collect())
            .unwrap_or_default();

        Ok(TokenPair {
            access_token: response.access_token().clone(),
            refresh_token: response.refresh_token().cloned(),
            expires_at,
            scopes,
        })
    }

    async fn fetch_profile(&self, tokens: &TokenPair) -> Result<UserProfile, AuthError> {
        let response = self
            .http_client
            .get(self.userinfo_url.clone())
            .bearer_auth(tokens.access_token.secret())
            .send()
            .await
            .map_err(|e| AuthError::Network(format!("Failed to fetch user profile: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::ProfileRejected { status, body });
        }

        response
            .json::<UserProfile>()
            .await
            .map_err(|e| AuthError::InvalidResponse(format!("Failed to parse user profile: {}", e)))
    }
}

fn classify_token_error<RE>(err: RequestTokenError<RE, BasicErrorResponse>) -> AuthError
where
    RE: std::error::Error + 'static,
{
    match err {
        RequestTokenError::ServerResponse(response) => AuthError::CodeRejected {
            error: response.error().to_string(),
            description: response.error_description().cloned().unwrap_or_default(),
        },
        RequestTokenError::Request(e) => AuthError::Network(e.to_string()),
        RequestTokenError::Parse(e, _) => {
            AuthError::InvalidResponse(format!("Failed to parse token response: {}", e))
        }
        RequestTokenError::Other(message) => AuthError::InvalidResponse(message),
    }
}
