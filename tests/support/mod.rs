#![allow(dead_code)]

use chrono::{Duration, Utc};
use serde_json::{json, Map, Value};
use slackhook::auth::Token;
use slackhook::client::SlackClient;
use slackhook::config::Credentials;
use slackhook::provider::{Endpoints, SlackProvider};

pub fn credentials() -> Credentials {
    Credentials::new("1", "secret", "none")
}

/// Client whose Slack endpoints all point at `base`.
pub fn client_for(base: &str) -> SlackClient {
    let provider = SlackProvider::new(credentials())
        .expect("valid credentials")
        .with_endpoints(Endpoints::with_base(base));
    SlackClient::with_provider(provider)
}

pub fn values(raw: Value) -> Map<String, Value> {
    raw.as_object().cloned().expect("object literal")
}

/// Token valid for an hour, carrying a webhook descriptor.
pub fn webhook_token(url: &str) -> Token {
    Token::new("12345")
        .with_refresh_token("123456")
        .with_expires_at(Utc::now() + Duration::hours(1))
        .with_values(values(json!({
            "incoming_webhook": {"channel": "#testing", "url": url}
        })))
}
