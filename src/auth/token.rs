use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::AuthError;
use crate::error::SlackError;

/// Tokens closer than this to their expiry are treated as expired.
const EXPIRY_LEEWAY_SECS: i64 = 60;

/// Response fields that map onto [`Token`] itself rather than its side values.
const RESERVED_FIELDS: [&str; 5] = [
    "ok",
    "access_token",
    "refresh_token",
    "expires_in",
    "expires",
];

/// Slack OAuth access token plus the side values Slack hands out with it.
///
/// `values` holds every extra field of the token response. The ones this
/// crate reads are `team` (`id`, `name`) and `incoming_webhook` (`channel`,
/// `url`, ...); both are absent unless Slack returned them.
///
/// # Example
/// ```
/// use chrono::{Duration, Utc};
/// use slackhook::auth::Token;
///
/// let token = Token::new("xoxb-access")
///     .with_refresh_token("xoxe-refresh")
///     .with_expires_at(Utc::now() + Duration::hours(12));
/// assert!(!token.expired());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub values: Map<String, Value>,
}

impl Token {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            ..Default::default()
        }
    }

    pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
        self.refresh_token = Some(refresh_token.into());
        self
    }

    pub fn with_expires_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    pub fn with_values(mut self, values: Map<String, Value>) -> Self {
        self.values = values;
        self
    }

    /// Build a token from a parsed `oauth.v2.access` response.
    ///
    /// `expires_in` is relative to `now`; a legacy absolute `expires` unix
    /// timestamp is honored when `expires_in` is missing.
    pub fn from_response(
        payload: Map<String, Value>,
        now: DateTime<Utc>,
    ) -> Result<Self, AuthError> {
        let access_token = payload
            .get("access_token")
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                AuthError::InvalidResponse("Token response missing access_token".to_string())
            })?
            .to_string();
        let refresh_token = payload
            .get("refresh_token")
            .and_then(Value::as_str)
            .map(ToString::to_string);
        let expires_at = match payload.get("expires_in").and_then(value_as_i64) {
            Some(secs) => Some(
                Duration::try_seconds(secs)
                    .and_then(|ttl| now.checked_add_signed(ttl))
                    .ok_or_else(|| {
                        AuthError::InvalidResponse("expires_in out of range".to_string())
                    })?,
            ),
            None => payload
                .get("expires")
                .and_then(value_as_i64)
                .and_then(|ts| Utc.timestamp_opt(ts, 0).single()),
        };
        let values = payload
            .into_iter()
            .filter(|(key, _)| !RESERVED_FIELDS.contains(&key.as_str()))
            .collect();
        Ok(Self {
            access_token,
            refresh_token,
            expires_at,
            values,
        })
    }

    /// Whether the token carries an expiry at all.
    pub fn can_expire(&self) -> bool {
        self.expires_at.is_some()
    }

    /// Whether the token expires within the next minute.
    ///
    /// Non-expiring tokens are never expired.
    pub fn expired(&self) -> bool {
        self.expired_at(Utc::now())
    }

    pub fn expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires_at) => expires_at - now < Duration::seconds(EXPIRY_LEEWAY_SECS),
            None => false,
        }
    }

    /// Whether a non-blank refresh token is present.
    pub fn has_refresh_token(&self) -> bool {
        self.refresh_token
            .as_deref()
            .is_some_and(|t| !t.trim().is_empty())
    }

    /// Team the token was granted for; empty when Slack did not say.
    pub fn team(&self) -> Team {
        match self.values.get("team") {
            Some(Value::Object(map)) => Team {
                id: map.get("id").and_then(value_as_string),
                name: map.get("name").and_then(value_as_string),
            },
            _ => Team::default(),
        }
    }

    /// Incoming webhook granted alongside the token.
    pub fn incoming_webhook(&self) -> Result<IncomingWebhook, SlackError> {
        match self.values.get("incoming_webhook") {
            Some(Value::Object(map)) if !map.is_empty() => Ok(IncomingWebhook {
                channel: map.get("channel").and_then(value_as_string),
                channel_id: map.get("channel_id").and_then(value_as_string),
                configuration_url: map.get("configuration_url").and_then(value_as_string),
                url: map.get("url").and_then(value_as_string),
            }),
            _ => Err(SlackError::MissingWebhook),
        }
    }

    /// Channel of the incoming webhook, or `""` when the webhook omits it.
    pub fn channel(&self) -> Result<String, SlackError> {
        Ok(self.incoming_webhook()?.channel.unwrap_or_default())
    }

    /// POST URL of the incoming webhook, or `""` when the webhook omits it.
    pub fn webhook_url(&self) -> Result<String, SlackError> {
        Ok(self.incoming_webhook()?.url.unwrap_or_default())
    }

    /// Flat map form, with the expiry as a unix timestamp.
    pub fn to_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("access_token".into(), Value::from(self.access_token.clone()));
        map.insert("refresh_token".into(), Value::from(self.refresh_token.clone()));
        map.insert(
            "expires_in".into(),
            Value::from(self.expires_at.map(|t| t.timestamp())),
        );
        map.insert("values".into(), Value::Object(self.values.clone()));
        map
    }
}

/// Team entry of a token's side values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: Option<String>,
    pub name: Option<String>,
}

impl Team {
    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.name.is_none()
    }
}

/// Webhook descriptor Slack grants with the `incoming-webhook` scope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomingWebhook {
    pub channel: Option<String>,
    pub channel_id: Option<String>,
    pub configuration_url: Option<String>,
    pub url: Option<String>,
}

/// Render a JSON scalar as a string; Slack ids sometimes arrive as numbers.
pub(crate) fn value_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn value_as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn values(raw: Value) -> Map<String, Value> {
        raw.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn token_without_expiry_never_expires() {
        let token = Token::new("12345");
        assert!(!token.can_expire());
        assert!(!token.expired());
    }

    #[test]
    fn expiry_leeway_is_sixty_seconds() {
        let now = Utc::now();
        let soon = Token::new("a").with_expires_at(now + Duration::seconds(59));
        let edge = Token::new("a").with_expires_at(now + Duration::seconds(60));
        let later = Token::new("a").with_expires_at(now + Duration::seconds(61));
        let past = Token::new("a").with_expires_at(now - Duration::seconds(60));
        assert!(soon.expired_at(now));
        assert!(!edge.expired_at(now));
        assert!(!later.expired_at(now));
        assert!(past.expired_at(now));
    }

    #[test]
    fn channel_is_read_from_webhook() {
        let token = Token::new("12345")
            .with_values(values(json!({"incoming_webhook": {"channel": "#testing"}})));
        assert_eq!(token.channel().unwrap(), "#testing");
    }

    #[test]
    fn channel_is_empty_when_webhook_omits_it() {
        let token = Token::new("12345")
            .with_values(values(json!({"incoming_webhook": {"redirect": "https://redirect.com"}})));
        assert_eq!(token.channel().unwrap(), "");
        assert_eq!(token.webhook_url().unwrap(), "");
    }

    #[test]
    fn webhook_accessors_fail_without_webhook() {
        let token = Token::new("12345");
        assert!(matches!(token.channel(), Err(SlackError::MissingWebhook)));
        assert!(matches!(token.webhook_url(), Err(SlackError::MissingWebhook)));

        let empty = Token::new("12345").with_values(values(json!({"incoming_webhook": {}})));
        assert!(matches!(empty.webhook_url(), Err(SlackError::MissingWebhook)));
    }

    #[test]
    fn team_defaults_to_empty() {
        let token = Token::new("12345")
            .with_values(values(json!({"incoming_webhook": {"redirect": "https://redirect.com"}})));
        assert!(token.team().is_empty());
    }

    #[test]
    fn team_reads_numeric_ids() {
        let token = Token::new("12345").with_values(values(json!({"team": {"id": 1}})));
        assert_eq!(
            token.team(),
            Team {
                id: Some("1".to_string()),
                name: None
            }
        );
    }

    #[test]
    fn from_response_splits_side_values() {
        let now = Utc::now();
        let payload = values(json!({
            "ok": true,
            "access_token": "xoxb-1",
            "refresh_token": "xoxe-1",
            "expires_in": 43200,
            "team": {"id": "T1", "name": "Acme"},
            "incoming_webhook": {"channel": "#general", "url": "https://hooks.slack.com/services/T/B/X"}
        }));

        let token = Token::from_response(payload, now).unwrap();

        assert_eq!(token.access_token, "xoxb-1");
        assert_eq!(token.refresh_token.as_deref(), Some("xoxe-1"));
        assert_eq!(token.expires_at, Some(now + Duration::seconds(43200)));
        assert_eq!(token.team().name.as_deref(), Some("Acme"));
        assert_eq!(
            token.webhook_url().unwrap(),
            "https://hooks.slack.com/services/T/B/X"
        );
        assert!(!token.values.contains_key("ok"));
        assert!(!token.values.contains_key("access_token"));
    }

    #[test]
    fn from_response_accepts_absolute_expiry() {
        let payload = values(json!({"access_token": "xoxb-1", "expires": "1700000000"}));
        let token = Token::from_response(payload, Utc::now()).unwrap();
        assert_eq!(token.expires_at.map(|t| t.timestamp()), Some(1_700_000_000));
    }

    #[test]
    fn from_response_rejects_unrepresentable_expires_in() {
        let payload = values(json!({"access_token": "xoxb-1", "expires_in": 9_000_000_000_000_000_000i64}));
        assert!(matches!(
            Token::from_response(payload, Utc::now()),
            Err(AuthError::InvalidResponse(msg)) if msg == "expires_in out of range"
        ));

        let near_max = values(json!({"access_token": "xoxb-1", "expires_in": i64::MAX / 1000}));
        assert!(matches!(
            Token::from_response(near_max, Utc::now()),
            Err(AuthError::InvalidResponse(_))
        ));
    }

    #[test]
    fn from_response_requires_access_token() {
        let payload = values(json!({"ok": true}));
        assert!(matches!(
            Token::from_response(payload, Utc::now()),
            Err(AuthError::InvalidResponse(_))
        ));
    }

    #[test]
    fn blank_refresh_token_does_not_count() {
        assert!(!Token::new("a").with_refresh_token("  ").has_refresh_token());
        assert!(Token::new("a").with_refresh_token("r").has_refresh_token());
    }

    #[test]
    fn to_map_exposes_all_fields() {
        let token = Token::new("12345").with_refresh_token("67890");
        let map = token.to_map();
        assert_eq!(map["access_token"], json!("12345"));
        assert_eq!(map["refresh_token"], json!("67890"));
        assert_eq!(map["expires_in"], Value::Null);
        assert_eq!(map["values"], json!({}));
    }
}
