use chrono::Utc;
use reqwest::header::{HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::Url;
use serde_json::{Map, Value};
use strum::{AsRefStr, Display, EnumString};

use crate::auth::error::AuthError;
use crate::auth::token::Token;
use crate::auth::user::{AuthorizedUser, ResourceOwner};
use crate::config::Credentials;
use crate::error::{Result, SlackError};

const DEFAULT_AUTHORIZE_URL: &str = "https://slack.com/oauth/v2/authorize";
const DEFAULT_ACCESS_TOKEN_URL: &str = "https://slack.com/api/oauth.v2.access";
const DEFAULT_AUTH_TEST_URL: &str = "https://slack.com/api/auth.test";
const DEFAULT_USERS_INFO_URL: &str = "https://slack.com/api/users.info";
const DEFAULT_API_BASE_URL: &str = "https://slack.com/api";

/// OAuth2 grant types used against Slack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum Grant {
    AuthorizationCode,
    RefreshToken,
}

/// Slack endpoint URLs.
///
/// The defaults are the production Slack URLs; overriding them is meant for
/// tests and egress proxies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub authorize: String,
    pub access_token: String,
    pub auth_test: String,
    pub users_info: String,
    pub api_base: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            authorize: DEFAULT_AUTHORIZE_URL.to_string(),
            access_token: DEFAULT_ACCESS_TOKEN_URL.to_string(),
            auth_test: DEFAULT_AUTH_TEST_URL.to_string(),
            users_info: DEFAULT_USERS_INFO_URL.to_string(),
            api_base: DEFAULT_API_BASE_URL.to_string(),
        }
    }
}

impl Endpoints {
    /// Mirror the Slack URL layout under another origin.
    pub fn with_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            authorize: format!("{base}/oauth/v2/authorize"),
            access_token: format!("{base}/api/oauth.v2.access"),
            auth_test: format!("{base}/api/auth.test"),
            users_info: format!("{base}/api/users.info"),
            api_base: format!("{base}/api"),
        }
    }
}

/// Slack identity provider: builds authorization URLs, runs token grants and
/// looks up the identity behind a token.
///
/// # Example
/// ```
/// use slackhook::config::Credentials;
/// use slackhook::provider::SlackProvider;
///
/// let provider = SlackProvider::new(Credentials::new("1", "secret", "https://app/callback"))?;
/// let url = provider.authorization_url("incoming-webhook", "state-123")?;
/// assert!(url.starts_with("https://slack.com/oauth/v2/authorize?"));
/// # Ok::<(), slackhook::error::SlackError>(())
/// ```
#[derive(Debug, Clone)]
pub struct SlackProvider {
    client: reqwest::Client,
    credentials: Credentials,
    endpoints: Endpoints,
}

impl SlackProvider {
    /// Fails with a configuration error when a required option is blank.
    pub fn new(credentials: Credentials) -> Result<Self> {
        credentials.validate()?;
        Ok(Self {
            client: crate::provider::http::shared_client().clone(),
            credentials,
            endpoints: Endpoints::default(),
        })
    }

    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn authorization_url(&self, scope: &str, state: &str) -> Result<String> {
        let mut params = vec![
            ("client_id", self.credentials.client_id.as_str()),
            ("redirect_uri", self.credentials.redirect_uri.as_str()),
            ("response_type", "code"),
            ("scope", scope),
        ];
        if !state.is_empty() {
            params.push(("state", state));
        }
        let url = Url::parse_with_params(&self.endpoints.authorize, &params).map_err(|e| {
            SlackError::Configuration(format!(
                "Invalid authorization URL {}: {e}",
                self.endpoints.authorize
            ))
        })?;
        Ok(url.into())
    }

    /// Run a token grant and build a token from the response.
    ///
    /// `params` carries the grant-specific fields (`code` or `refresh_token`).
    pub async fn access_token(
        &self,
        grant: Grant,
        params: &[(&str, &str)],
    ) -> std::result::Result<Token, AuthError> {
        tracing::debug!(grant = %grant, "Requesting Slack access token");
        let mut form = vec![
            ("grant_type", grant.as_ref()),
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
            ("redirect_uri", self.credentials.redirect_uri.as_str()),
        ];
        form.extend_from_slice(params);
        let resp = self
            .client
            .post(&self.endpoints.access_token)
            .header(ACCEPT, "application/json")
            .form(&form)
            .send()
            .await?;
        let payload = parse_slack_payload(resp, "Token request").await?;
        Token::from_response(payload, Utc::now())
    }

    pub async fn authorized_user(
        &self,
        token: &Token,
    ) -> std::result::Result<AuthorizedUser, AuthError> {
        tracing::debug!("Fetching Slack authorized user");
        let resp = self
            .authenticated_get(&self.endpoints.auth_test, token)?
            .send()
            .await?;
        let payload = parse_slack_payload(resp, "auth.test").await?;
        Ok(AuthorizedUser::new(payload))
    }

    pub async fn resource_owner(
        &self,
        token: &Token,
        user_id: &str,
    ) -> std::result::Result<ResourceOwner, AuthError> {
        tracing::debug!(user_id, "Fetching Slack user info");
        let resp = self
            .authenticated_get(&self.endpoints.users_info, token)?
            .query(&[("user", user_id)])
            .send()
            .await?;
        let payload = parse_slack_payload(resp, "users.info").await?;
        Ok(ResourceOwner::new(payload))
    }

    fn authenticated_get(
        &self,
        url: &str,
        token: &Token,
    ) -> std::result::Result<reqwest::RequestBuilder, AuthError> {
        let bearer = HeaderValue::from_str(&format!("Bearer {}", token.access_token))
            .map_err(|_| AuthError::InvalidResponse("Access token is not a valid header".to_string()))?;
        Ok(self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .header(AUTHORIZATION, bearer))
    }
}

/// Decode a Slack API envelope, surfacing `{"ok": false, "error": ..}` as a provider error.
async fn parse_slack_payload(
    resp: reqwest::Response,
    what: &str,
) -> std::result::Result<Map<String, Value>, AuthError> {
    if !resp.status().is_success() {
        return Err(AuthError::InvalidResponse(format!(
            "{what} failed with status {}",
            resp.status()
        )));
    }
    let payload: Value = resp.json().await?;
    let Value::Object(payload) = payload else {
        return Err(AuthError::InvalidResponse(format!(
            "{what} returned a non-object body"
        )));
    };
    if payload.get("ok").and_then(Value::as_bool) == Some(false) {
        let error = payload
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or("unknown_error")
            .to_string();
        return Err(AuthError::Provider { error });
    }
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn provider() -> SlackProvider {
        SlackProvider::new(Credentials::new("1", "secret", "https://app/callback")).unwrap()
    }

    #[test]
    fn construction_requires_all_options() {
        let err = SlackProvider::new(Credentials::new("1", "", "none")).unwrap_err();
        assert!(err.to_string().contains("client_secret"));
    }

    #[test]
    fn authorization_url_embeds_scope_and_state() {
        let url = provider()
            .authorization_url("incoming-webhook", "somestate")
            .unwrap();
        let parsed = Url::parse(&url).unwrap();
        let pairs: Vec<(String, String)> = parsed.query_pairs().into_owned().collect();

        assert_eq!(parsed.host_str(), Some("slack.com"));
        assert_eq!(parsed.path(), "/oauth/v2/authorize");
        assert!(pairs.contains(&("scope".into(), "incoming-webhook".into())));
        assert!(pairs.contains(&("state".into(), "somestate".into())));
        assert!(pairs.contains(&("client_id".into(), "1".into())));
        assert!(pairs.contains(&("redirect_uri".into(), "https://app/callback".into())));
        assert!(pairs.contains(&("response_type".into(), "code".into())));
    }

    #[test]
    fn empty_state_is_omitted() {
        let url = provider().authorization_url("incoming-webhook", "").unwrap();
        assert!(!url.contains("state="));
    }

    #[test]
    fn grant_names_match_oauth() {
        assert_eq!(Grant::AuthorizationCode.to_string(), "authorization_code");
        assert_eq!(Grant::RefreshToken.as_ref(), "refresh_token");
        assert_eq!(Grant::from_str("refresh_token").unwrap(), Grant::RefreshToken);
    }

    #[test]
    fn endpoints_with_base_mirror_slack_layout() {
        let endpoints = Endpoints::with_base("http://127.0.0.1:9000/");
        assert_eq!(endpoints.access_token, "http://127.0.0.1:9000/api/oauth.v2.access");
        assert_eq!(endpoints.api_base, "http://127.0.0.1:9000/api");
    }
}
