//! slackhook — Slack OAuth2 client and webhook poster
//!
//! Runs the Slack OAuth v2 `authorization_code` and `refresh_token` grants,
//! keeps the resulting token together with the team and incoming-webhook
//! details Slack returns, and posts messages to the webhook or the Web API,
//! translating HTTP failures into typed errors.
//!
//! # Quick Start
//!
//! ```no_run
//! use slackhook::prelude::*;
//!
//! # async fn example() -> slackhook::error::Result<()> {
//! let mut slack = SlackClient::new(Credentials::from_env())?;
//! let token = slack.fetch_token("code-from-redirect").await?;
//! println!("Installed into {}", token.channel()?);
//!
//! let delivered = slack.post_message(&Message::plain("Build is green")).await?;
//! assert!(delivered);
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod message;
pub mod prelude;
pub mod provider;

#[cfg(feature = "cli")]
pub mod cli;
