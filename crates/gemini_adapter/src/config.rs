//! Adapter configuration
//!
//! Everything the adapter needs is read once at startup into an immutable
//! [`AdapterConfig`] which is then handed to the server. Nothing reads the
//! process environment after that.

use oauth2::{AuthUrl, ClientId, ClientSecret, RedirectUrl, TokenUrl};
use url::Url;

use crate::error::ConfigError;

pub const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";

/// Callback registered with the Google OAuth client for the deployed adapter.
pub const DEFAULT_REDIRECT_URI: &str =
    "https://us-central1-gemini-adapter.cloudfunctions.net/api/auth/google/callback";

/// Scopes requested on the consent screen: Gemini tuning plus basic profile.
pub const GEMINI_SCOPES: [&str; 2] = [
    "https://www.googleapis.com/auth/generative-language.tuning",
    "https://www.googleapis.com/auth/userinfo.profile",
];

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;

const CLIENT_ID_VAR: &str = "GOOGLE_CLIENT_ID";
const CLIENT_SECRET_VAR: &str = "GOOGLE_CLIENT_SECRET";
const REDIRECT_URI_VAR: &str = "GOOGLE_REDIRECT_URI";
const AUTH_URL_VAR: &str = "GOOGLE_AUTH_URL";
const TOKEN_URL_VAR: &str = "GOOGLE_TOKEN_URL";
const USERINFO_URL_VAR: &str = "GOOGLE_USERINFO_URL";
const HOST_VAR: &str = "ADAPTER_HOST";
const PORT_VAR: &str = "PORT";

/// OAuth client registration. `client_secret` prints as `[redacted]`.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub client_id: ClientId,
    pub client_secret: ClientSecret,
    pub redirect_uri: RedirectUrl,
}

/// Identity provider endpoints
#[derive(Debug, Clone)]
pub struct ProviderEndpoints {
    pub auth_url: AuthUrl,
    pub token_url: TokenUrl,
    pub userinfo_url: Url,
}

impl ProviderEndpoints {
    /// Google's production endpoints
    pub fn google() -> Result<Self, ConfigError> {
        Self::from_urls(GOOGLE_AUTH_URL, GOOGLE_TOKEN_URL, GOOGLE_USERINFO_URL)
    }

    pub fn from_urls(
        auth_url: &str,
        token_url: &str,
        userinfo_url: &str,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            auth_url: AuthUrl::new(auth_url.to_string())
                .map_err(|e| invalid_url(AUTH_URL_VAR, e))?,
            token_url: TokenUrl::new(token_url.to_string())
                .map_err(|e| invalid_url(TOKEN_URL_VAR, e))?,
            userinfo_url: Url::parse(userinfo_url)
                .map_err(|e| invalid_url(USERINFO_URL_VAR, e))?,
        })
    }
}

/// Complete adapter configuration
#[derive(Debug, Clone)]
pub struct AdapterConfig {
    pub client: ClientConfig,
    pub endpoints: ProviderEndpoints,
    pub scopes: Vec<String>,
    pub host: String,
    pub port: u16,
}

impl AdapterConfig {
    /// Load configuration from the process environment.
    ///
    /// Requires `GOOGLE_CLIENT_ID` and `GOOGLE_CLIENT_SECRET`. Everything else
    /// falls back to the compiled-in defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let client_id = get(CLIENT_ID_VAR).ok_or(ConfigError::MissingVar(CLIENT_ID_VAR))?;
        let client_secret =
            get(CLIENT_SECRET_VAR).ok_or(ConfigError::MissingVar(CLIENT_SECRET_VAR))?;
        let redirect_uri =
            get(REDIRECT_URI_VAR).unwrap_or_else(|| DEFAULT_REDIRECT_URI.to_string());

        let endpoints = ProviderEndpoints::from_urls(
            &get(AUTH_URL_VAR).unwrap_or_else(|| GOOGLE_AUTH_URL.to_string()),
            &get(TOKEN_URL_VAR).unwrap_or_else(|| GOOGLE_TOKEN_URL.to_string()),
            &get(USERINFO_URL_VAR).unwrap_or_else(|| GOOGLE_USERINFO_URL.to_string()),
        )?;

        let port = match get(PORT_VAR) {
            Some(raw) => raw.parse::<u16>().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            client: ClientConfig {
                client_id: ClientId::new(client_id),
                client_secret: ClientSecret::new(client_secret),
                redirect_uri: RedirectUrl::new(redirect_uri)
                    .map_err(|e| invalid_url(REDIRECT_URI_VAR, e))?,
            },
            endpoints,
            scopes: GEMINI_SCOPES.iter().map(|s| s.to_string()).collect(),
            host: get(HOST_VAR).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
        })
    }

    /// Apply positional `[host] [port]` command-line overrides.
    pub fn with_args(mut self, args: &[String]) -> Result<Self, ConfigError> {
        if let Some(host) = args.first() {
            self.host = host.clone();
        }
        if let Some(port) = args.get(1) {
            self.port = port
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(port.clone()))?;
        }
        Ok(self)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn invalid_url(var: &'static str, err: url::ParseError) -> ConfigError {
    ConfigError::InvalidUrl {
        var,
        reason: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_with_credentials_only() {
        let config = AdapterConfig::from_lookup(lookup_from(&[
            ("GOOGLE_CLIENT_ID", "client-123.apps.googleusercontent.com"),
            ("GOOGLE_CLIENT_SECRET", "shh"),
        ]))
        .unwrap();

        assert_eq!(
            config.client.client_id.as_str(),
            "client-123.apps.googleusercontent.com"
        );
        assert_eq!(config.client.client_secret.secret(), "shh");
        assert_eq!(config.client.redirect_uri.as_str(), DEFAULT_REDIRECT_URI);
        assert_eq!(config.endpoints.auth_url.as_str(), GOOGLE_AUTH_URL);
        assert_eq!(config.endpoints.token_url.as_str(), GOOGLE_TOKEN_URL);
        assert_eq!(config.endpoints.userinfo_url.as_str(), GOOGLE_USERINFO_URL);
        assert_eq!(config.scopes, GEMINI_SCOPES);
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_google_endpoints() {
        let endpoints = ProviderEndpoints::google().unwrap();
        assert_eq!(endpoints.auth_url.url().host_str(), Some("accounts.google.com"));
        assert_eq!(endpoints.token_url.url().host_str(), Some("oauth2.googleapis.com"));
        assert_eq!(endpoints.userinfo_url.path(), "/oauth2/v2/userinfo");
    }

    #[test]
    fn test_missing_client_id() {
        let err = AdapterConfig::from_lookup(lookup_from(&[("GOOGLE_CLIENT_SECRET", "shh")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar("GOOGLE_CLIENT_ID")));
    }

    #[test]
    fn test_blank_secret_counts_as_missing() {
        let err = AdapterConfig::from_lookup(lookup_from(&[
            ("GOOGLE_CLIENT_ID", "client"),
            ("GOOGLE_CLIENT_SECRET", "  "),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar("GOOGLE_CLIENT_SECRET")));
    }

    #[test]
    fn test_invalid_redirect_uri() {
        let err = AdapterConfig::from_lookup(lookup_from(&[
            ("GOOGLE_CLIENT_ID", "client"),
            ("GOOGLE_CLIENT_SECRET", "shh"),
            ("GOOGLE_REDIRECT_URI", "not a url"),
        ]))
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidUrl {
                var: "GOOGLE_REDIRECT_URI",
                ..
            }
        ));
    }

    #[test]
    fn test_invalid_port() {
        let err = AdapterConfig::from_lookup(lookup_from(&[
            ("GOOGLE_CLIENT_ID", "client"),
            ("GOOGLE_CLIENT_SECRET", "shh"),
            ("PORT", "eighty"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort(_)));
    }

    #[test]
    fn test_args_override_host_and_port() {
        let config = AdapterConfig::from_lookup(lookup_from(&[
            ("GOOGLE_CLIENT_ID", "client"),
            ("GOOGLE_CLIENT_SECRET", "shh"),
            ("PORT", "9000"),
        ]))
        .unwrap()
        .with_args(&["127.0.0.1".to_string(), "54545".to_string()])
        .unwrap();

        assert_eq!(config.bind_addr(), "127.0.0.1:54545");
    }

    #[test]
    fn test_client_secret_is_redacted_in_debug() {
        let config = AdapterConfig::from_lookup(lookup_from(&[
            ("GOOGLE_CLIENT_ID", "client"),
            ("GOOGLE_CLIENT_SECRET", "super-secret-value"),
        ]))
        .unwrap();

        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret-value"));
    }
}
