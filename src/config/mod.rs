//! OAuth app credentials (code > env > TOML file).

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SlackError};

/// Slack app credentials used for every OAuth exchange.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"..")
            .field("redirect_uri", &self.redirect_uri)
            .finish()
    }
}

impl Credentials {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: redirect_uri.into(),
        }
    }

    /// Load from `SLACK_CLIENT_ID`, `SLACK_CLIENT_SECRET` and `SLACK_REDIRECT_URI`.
    ///
    /// A `.env` file is read first when present. Unset variables are left
    /// blank; [`Credentials::validate`] reports them.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        let var = |name: &str| std::env::var(name).unwrap_or_default();
        Self {
            client_id: var("SLACK_CLIENT_ID"),
            client_secret: var("SLACK_CLIENT_SECRET"),
            redirect_uri: var("SLACK_REDIRECT_URI"),
        }
    }

    /// Load from a TOML file with `client_id`, `client_secret` and `redirect_uri` keys.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            SlackError::Configuration(format!("Cannot read {}: {e}", path.display()))
        })?;
        toml::from_str(&raw).map_err(|e| {
            SlackError::Configuration(format!("Invalid credentials file {}: {e}", path.display()))
        })
    }

    /// Fill blank fields from `other`.
    pub fn or(mut self, other: Credentials) -> Self {
        if self.client_id.trim().is_empty() {
            self.client_id = other.client_id;
        }
        if self.client_secret.trim().is_empty() {
            self.client_secret = other.client_secret;
        }
        if self.redirect_uri.trim().is_empty() {
            self.redirect_uri = other.redirect_uri;
        }
        self
    }

    /// Names of required options that are blank.
    pub fn missing(&self) -> Vec<&'static str> {
        [
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
            ("redirect_uri", &self.redirect_uri),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    pub fn validate(&self) -> Result<()> {
        let missing = self.missing();
        if missing.is_empty() {
            return Ok(());
        }
        Err(SlackError::Configuration(format!(
            "Required options not defined: {}",
            missing.join(", ")
        )))
    }
}
