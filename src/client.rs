//! Slack client holding one OAuth token.

use serde::Serialize;
use serde_json::Value;

use crate::auth::token::Token;
use crate::auth::user::{AuthorizedUser, ResourceOwner};
use crate::config::Credentials;
use crate::error::{Result, SlackError};
use crate::provider::http::{bearer_headers, read_response, shared_client, ResponseBody};
use crate::provider::slack::{Grant, SlackProvider};

/// Scope requested by [`SlackClient::authorization_url`].
pub const DEFAULT_SCOPE: &str = "incoming-webhook";

/// OAuth client and message poster for a single Slack installation.
///
/// The client holds at most one token. Exchanges replace it; posting
/// requires it to be present and unexpired.
///
/// # Example
/// ```no_run
/// use slackhook::client::SlackClient;
/// use slackhook::config::Credentials;
/// use slackhook::message::Message;
///
/// # async fn example() -> slackhook::error::Result<()> {
/// let mut slack = SlackClient::new(Credentials::from_env())?;
/// println!("Authorize at {}", slack.authorization_url("state-123")?);
///
/// slack.fetch_token("code-from-redirect").await?;
/// slack.post_message(&Message::plain("Hello from slackhook")).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SlackClient {
    provider: SlackProvider,
    http: reqwest::Client,
    token: Option<Token>,
}

impl SlackClient {
    /// Fails with a configuration error when a credential is blank.
    pub fn new(credentials: Credentials) -> Result<Self> {
        Ok(Self::with_provider(SlackProvider::new(credentials)?))
    }

    pub fn with_provider(provider: SlackProvider) -> Self {
        Self {
            provider,
            http: shared_client().clone(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: Token) -> Self {
        self.token = Some(token);
        self
    }

    /// Replace the transport used for message posting and Web API calls.
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    pub fn provider(&self) -> &SlackProvider {
        &self.provider
    }

    pub fn token(&self) -> Option<&Token> {
        self.token.as_ref()
    }

    pub fn set_token(&mut self, token: Option<Token>) {
        self.token = token;
    }

    /// Authorization URL requesting the `incoming-webhook` scope.
    pub fn authorization_url(&self, state: &str) -> Result<String> {
        self.authorization_url_with_scope(DEFAULT_SCOPE, state)
    }

    pub fn authorization_url_with_scope(&self, scope: &str, state: &str) -> Result<String> {
        self.provider.authorization_url(scope, state)
    }

    /// Exchange an authorization code for a token and hold it.
    pub async fn fetch_token(&mut self, code: &str) -> Result<&Token> {
        let token = self
            .provider
            .access_token(Grant::AuthorizationCode, &[("code", code)])
            .await?;
        let token: &Token = self.token.insert(token);
        Ok(token)
    }

    /// Renew the held token, keeping its side values under any new ones.
    pub async fn refresh_token(&mut self) -> Result<&Token> {
        let current = self.token.as_ref().ok_or(SlackError::Unauthorized)?;
        if !current.has_refresh_token() {
            return Err(SlackError::MissingRefreshToken);
        }
        let refresh_token = current.refresh_token.clone().unwrap_or_default();
        let mut values = current.values.clone();

        let mut token = self
            .provider
            .access_token(Grant::RefreshToken, &[("refresh_token", refresh_token.as_str())])
            .await?;
        values.append(&mut token.values);
        token.values = values;
        let token: &Token = self.token.insert(token);
        Ok(token)
    }

    pub fn token_expired(&self) -> Result<bool> {
        Ok(self.token.as_ref().ok_or(SlackError::Unauthorized)?.expired())
    }

    /// Identity behind the held token (`auth.test`).
    pub async fn authorized_user(&self) -> Result<AuthorizedUser> {
        let token = self.token.as_ref().ok_or(SlackError::Unauthorized)?;
        Ok(self.provider.authorized_user(token).await?)
    }

    /// Full profile of the user behind the held token (`users.info`).
    pub async fn resource_owner(&self) -> Result<ResourceOwner> {
        let token = self.token.as_ref().ok_or(SlackError::Unauthorized)?;
        let user = self.provider.authorized_user(token).await?;
        let user_id = user.id().ok_or_else(|| {
            SlackError::Identity(crate::auth::AuthError::InvalidResponse(
                "auth.test response missing user_id".to_string(),
            ))
        })?;
        Ok(self.provider.resource_owner(token, &user_id).await?)
    }

    /// Post to the incoming webhook granted with the held token.
    ///
    /// Returns `true` when Slack answers with the bare `ok` body.
    pub async fn post_message<M: Serialize + ?Sized>(&self, message: &M) -> Result<bool> {
        let token = self.active_token()?;
        let url = token.webhook_url()?;
        if url.is_empty() {
            return Err(SlackError::MissingWebhook);
        }
        self.post_message_to(&url, message).await
    }

    /// Post to an explicit webhook URL.
    pub async fn post_message_to<M: Serialize + ?Sized>(
        &self,
        url: &str,
        message: &M,
    ) -> Result<bool> {
        let body = self.post(url, message).await?;
        Ok(body.is_ok())
    }

    /// Call a Web API method such as `chat.postMessage`.
    ///
    /// A `{"ok": false}` envelope becomes [`SlackError::FailedAction`]
    /// carrying Slack's error code.
    pub async fn call_api<P: Serialize + ?Sized>(&self, method: &str, payload: &P) -> Result<Value> {
        let url = format!(
            "{}/{}",
            self.provider.endpoints().api_base.trim_end_matches('/'),
            method.trim_start_matches('/')
        );
        let body = self.post(&url, payload).await?.into_json();
        if body.get("ok").and_then(Value::as_bool) == Some(false) {
            let error = body
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("unknown_error")
                .to_string();
            return Err(SlackError::FailedAction { body: error });
        }
        Ok(body)
    }

    fn active_token(&self) -> Result<&Token> {
        let token = self.token.as_ref().ok_or(SlackError::Unauthorized)?;
        if token.expired() {
            return Err(SlackError::TokenExpired);
        }
        Ok(token)
    }

    async fn post<P: Serialize + ?Sized>(&self, url: &str, payload: &P) -> Result<ResponseBody> {
        let token = self.active_token()?;
        tracing::debug!(host = %host_of(url), "Posting to Slack");
        let response = self
            .http
            .post(url)
            .headers(bearer_headers(&token.access_token)?)
            .json(payload)
            .send()
            .await?;
        read_response(response).await
    }
}

/// Host part of a URL; webhook paths embed secrets and stay out of logs.
fn host_of(url: &str) -> String {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(ToString::to_string))
        .unwrap_or_default()
}
