//! Error types for slackhook.

pub mod unified;

pub use unified::ErrorCategory;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::auth::error::AuthError;

/// Primary error type for all slackhook operations.
#[derive(Error, Debug)]
pub enum SlackError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Access token expired")]
    TokenExpired,

    #[error("Not found")]
    NotFound,

    #[error("Validation failed")]
    Validation { errors: Map<String, Value> },

    #[error("Failed action: {body}")]
    FailedAction { body: String },

    #[error("Access token has no incoming webhook")]
    MissingWebhook,

    #[error("Access token has no refresh token")]
    MissingRefreshToken,

    #[error("{status}")]
    Api { status: u16 },

    #[error("Identity provider error: {0}")]
    Identity(#[from] AuthError),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SlackError {
    /// Build a validation error from a raw response body.
    ///
    /// Bodies that are not a JSON object yield an empty error map.
    pub fn validation(body: &str) -> Self {
        let errors = match serde_json::from_str::<Value>(body) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        };
        Self::Validation { errors }
    }

    /// Field errors carried by a [`SlackError::Validation`], if this is one.
    pub fn errors(&self) -> Option<&Map<String, Value>> {
        match self {
            Self::Validation { errors } => Some(errors),
            _ => None,
        }
    }

    /// HTTP status code behind this error, when one is known.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized => Some(401),
            Self::NotFound => Some(404),
            Self::Validation { .. } => Some(422),
            Self::FailedAction { .. } => Some(400),
            Self::Api { status } => Some(*status),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Unauthorized | Self::TokenExpired | Self::MissingRefreshToken => {
                ErrorCategory::Authentication
            }
            Self::NotFound => ErrorCategory::NotFound,
            Self::Validation { .. } | Self::FailedAction { .. } => ErrorCategory::Request,
            Self::MissingWebhook | Self::Configuration(_) => ErrorCategory::Configuration,
            Self::Identity(_) => ErrorCategory::IdentityProvider,
            Self::Network(_) => ErrorCategory::Network,
            Self::Serialization(_) => ErrorCategory::Serialization,
            Self::Api { status } => match status {
                429 => ErrorCategory::RateLimit,
                500..=599 => ErrorCategory::Server,
                _ => ErrorCategory::Api,
            },
        }
    }

    /// Whether repeating the same call could succeed.
    ///
    /// Nothing in this crate retries on its own; callers decide.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::RateLimit | ErrorCategory::Network | ErrorCategory::Server
        )
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, SlackError>;
