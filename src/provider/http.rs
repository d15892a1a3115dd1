//! Shared HTTP client, auth headers, and status translation.

use std::sync::OnceLock;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;

use crate::error::SlackError;

/// Statuses Slack answers with when a request went through.
pub const SUCCESS_STATUSES: [u16; 5] = [200, 201, 203, 204, 206];

static SHARED_CLIENT: OnceLock<reqwest::Client> = OnceLock::new();

/// Get (or create) the shared reqwest client.
pub fn shared_client() -> &'static reqwest::Client {
    SHARED_CLIENT.get_or_init(|| {
        reqwest::Client::builder()
            .user_agent(concat!("slackhook/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new())
    })
}

/// Build JSON request headers for a Bearer-token API.
///
/// Fails when the token cannot be sent as a header value.
pub fn bearer_headers(access_token: &str) -> Result<HeaderMap, SlackError> {
    let bearer = HeaderValue::from_str(&format!("Bearer {access_token}")).map_err(|_| {
        SlackError::Configuration("Access token is not a valid header value".to_string())
    })?;
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(AUTHORIZATION, bearer);
    Ok(headers)
}

/// Body of a successful response.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
}

impl ResponseBody {
    /// Decode as JSON when that yields something non-empty, else keep the raw text.
    pub fn parse(raw: String) -> Self {
        match serde_json::from_str::<Value>(&raw) {
            Ok(value) if is_truthy(&value) => Self::Json(value),
            _ => Self::Text(raw),
        }
    }

    /// Whether Slack answered with the `ok` webhooks send on success,
    /// bare or as a JSON string.
    pub fn is_ok(&self) -> bool {
        match self {
            Self::Text(text) => text.trim() == "ok",
            Self::Json(Value::String(text)) => text == "ok",
            Self::Json(_) => false,
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Text(_) => None,
        }
    }

    pub fn into_json(self) -> Value {
        match self {
            Self::Json(value) => value,
            Self::Text(text) => Value::String(text),
        }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty() && s != "0",
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Translate a non-success status into the matching error.
pub fn status_to_error(status: u16, body: &str) -> SlackError {
    match status {
        422 => SlackError::validation(body),
        404 => SlackError::NotFound,
        401 | 403 => SlackError::Unauthorized,
        400 => SlackError::FailedAction {
            body: body.to_string(),
        },
        _ => SlackError::Api { status },
    }
}

/// Read a response, translating non-success statuses into errors.
pub async fn read_response(response: reqwest::Response) -> Result<ResponseBody, SlackError> {
    let status = response.status().as_u16();
    let body = response.text().await?;
    if !SUCCESS_STATUSES.contains(&status) {
        tracing::warn!(status, "Slack request failed");
        return Err(status_to_error(status, &body));
    }
    Ok(ResponseBody::parse(body))
}
