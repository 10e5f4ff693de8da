//! Gemini Adapter Service
//!
//! Walks a user through Google's OAuth2 authorization-code flow to obtain
//! tokens for the Gemini (generative language) API.
//!
//! # Features
//! - Health check endpoint
//! - Consent redirect requesting offline access
//! - Callback that exchanges the code and fetches the user profile
//!
//! Tokens are logged in redacted form and never persisted.

pub mod auth;
pub mod config;
pub mod error;
pub mod server;

pub use auth::{GoogleOAuthClient, IdentityProvider, TokenPair, UserProfile};
pub use config::{AdapterConfig, ClientConfig, ProviderEndpoints};
pub use error::{AuthError, ConfigError};
pub use server::{router, start_server, AppState};
