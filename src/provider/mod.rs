//! Slack identity provider and HTTP plumbing.

pub mod http;
pub mod slack;

pub use http::ResponseBody;
pub use slack::{Endpoints, Grant, SlackProvider};
