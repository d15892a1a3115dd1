//! Slack OAuth tokens, identities and token storage.

pub mod error;
pub mod store;
pub mod token;
pub mod user;

pub use error::AuthError;
pub use store::{FileTokenStore, TokenStore};
pub use token::{IncomingWebhook, Team, Token};
pub use user::{AuthorizedUser, ResourceOwner};
