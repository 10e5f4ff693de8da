use async_trait::async_trait;

use super::types::{TokenPair, UserProfile};
use crate::error::AuthError;

/// An OAuth2 identity provider supporting the authorization-code flow.
///
/// Implementations hold only immutable configuration. Credentials for the
/// profile call are passed in explicitly so concurrent requests never see
/// each other's tokens.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Consent screen URL the browser is redirected to
    fn authorization_url(&self) -> String;

    /// Exchange a single-use authorization code for tokens
    async fn exchange_code(&self, code: &str) -> Result<TokenPair, AuthError>;

    /// Fetch the profile of the user the tokens were issued to
    async fn fetch_profile(&self, tokens: &TokenPair) -> Result<UserProfile, AuthError>;
}
