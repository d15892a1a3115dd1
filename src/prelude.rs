//! Convenience re-exports for common use.

pub use crate::auth::{AuthorizedUser, ResourceOwner, Team, Token, TokenStore};
pub use crate::client::SlackClient;
pub use crate::config::Credentials;
pub use crate::error::{Result, SlackError};
pub use crate::message::Message;
