pub mod oauth;
pub mod provider;
pub mod types;

pub use oauth::GoogleOAuthClient;
pub use provider::IdentityProvider;
pub use types::{TokenPair, UserProfile};
