//! CLI entry point for slackhook.

pub mod auth;
pub mod post;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::auth::FileTokenStore;
use crate::client::SlackClient;
use crate::config::Credentials;
use crate::error::SlackError;

/// slackhook CLI
#[derive(Parser, Debug)]
#[command(name = "slackhook", version, about = "Slack OAuth and webhook CLI")]
pub struct Cli {
    /// TOML file with client_id, client_secret and redirect_uri
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Token profile to use
    #[arg(long, global = true, default_value = "default")]
    pub profile: String,

    /// Directory holding saved tokens (defaults to ~/.slackhook)
    #[arg(long, global = true)]
    pub token_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// OAuth installation management
    Auth(AuthArgs),
    /// Post a message to the installed webhook
    Post(PostArgs),
}

/// Arguments for the `auth` subcommand group.
#[derive(Parser, Debug)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub command: AuthCommands,
}

/// Auth subcommands.
#[derive(Subcommand, Debug)]
pub enum AuthCommands {
    /// Print the URL that starts the Slack installation
    Url(UrlArgs),
    /// Exchange an authorization code and save the token
    Exchange(ExchangeArgs),
    /// Refresh the saved token
    Refresh,
    /// Show the saved token
    Status,
    /// Show the Slack user behind the saved token
    Whoami,
    /// Forget the saved token
    Logout,
}

/// Arguments for `slackhook auth url`.
#[derive(Parser, Debug)]
pub struct UrlArgs {
    /// OAuth scope to request
    #[arg(long, default_value = crate::client::DEFAULT_SCOPE)]
    pub scope: String,

    /// Opaque state echoed back on redirect (random when omitted)
    #[arg(long)]
    pub state: Option<String>,
}

/// Arguments for `slackhook auth exchange`.
#[derive(Parser, Debug)]
pub struct ExchangeArgs {
    /// Code from the OAuth redirect
    pub code: String,
}

/// Arguments for `slackhook post`.
#[derive(Parser, Debug)]
pub struct PostArgs {
    /// Message text
    pub text: String,

    /// Webhook URL to post to instead of the installed one
    #[arg(long)]
    pub url: Option<String>,

    /// Web API channel; posts through chat.postMessage instead of the webhook
    #[arg(long)]
    pub channel: Option<String>,
}

impl Cli {
    /// Credentials from the environment, with blanks filled from `--config`.
    pub fn credentials(&self) -> Result<Credentials, SlackError> {
        let env = Credentials::from_env();
        match &self.config {
            Some(path) => Ok(env.or(Credentials::load(path)?)),
            None => Ok(env),
        }
    }

    pub fn token_store(&self) -> FileTokenStore {
        match &self.token_dir {
            Some(dir) => FileTokenStore::new(dir.clone()),
            None => FileTokenStore::new_default(),
        }
    }

    /// Client loaded with the profile's saved token, if any.
    pub fn client(&self, store: &FileTokenStore) -> Result<SlackClient, SlackError> {
        use crate::auth::TokenStore;

        let mut client = SlackClient::new(self.credentials()?)?;
        client.set_token(store.load(&self.profile)?);
        Ok(client)
    }
}
