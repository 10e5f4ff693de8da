use axum::http::StatusCode;
use thiserror::Error;

/// Errors raised while loading [`crate::AdapterConfig`] at startup.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} environment variable not set")]
    MissingVar(&'static str),

    #[error("Invalid URL in {var}: {reason}")]
    InvalidUrl { var: &'static str, reason: String },

    #[error("Invalid port: {0}")]
    InvalidPort(String),
}

/// Failures of a single callback request.
///
/// Only `MissingCode` is the caller's fault; every other variant collapses to
/// the same generic 500 at the HTTP boundary and is distinguished in logs only.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Authorization code missing from callback")]
    MissingCode,

    #[error("Provider rejected authorization code: {error} ({description})")]
    CodeRejected {
        error: String,
        description: String,
    },

    #[error("Request to identity provider failed: {0}")]
    Network(String),

    #[error("Unexpected response from identity provider: {0}")]
    InvalidResponse(String),

    #[error("Profile request rejected: {status} - {body}")]
    ProfileRejected { status: u16, body: String },
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingCode => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_code_is_bad_request() {
        assert_eq!(AuthError::MissingCode.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_provider_failures_are_internal_errors() {
        let errors = [
            AuthError::CodeRejected {
                error: "invalid_grant".to_string(),
                description: String::new(),
            },
            AuthError::Network("connection refused".to_string()),
            AuthError::InvalidResponse("missing access_token".to_string()),
            AuthError::ProfileRejected {
                status: 401,
                body: "unauthorized".to_string(),
            },
        ];

        for err in errors {
            assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    #[test]
    fn test_code_rejected_message_includes_description() {
        let err = AuthError::CodeRejected {
            error: "invalid_grant".to_string(),
            description: "Bad Request".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Provider rejected authorization code: invalid_grant (Bad Request)"
        );
    }
}
