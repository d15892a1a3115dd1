use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::token::value_as_string;

/// Identity behind an access token, as reported by `auth.test`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthorizedUser {
    raw: Map<String, Value>,
}

impl AuthorizedUser {
    pub fn new(raw: Map<String, Value>) -> Self {
        Self { raw }
    }

    pub fn id(&self) -> Option<String> {
        self.field("user_id")
    }

    pub fn user(&self) -> Option<String> {
        self.field("user")
    }

    pub fn team_id(&self) -> Option<String> {
        self.field("team_id")
    }

    pub fn team(&self) -> Option<String> {
        self.field("team")
    }

    /// Workspace URL.
    pub fn url(&self) -> Option<String> {
        self.field("url")
    }

    pub fn to_map(&self) -> &Map<String, Value> {
        &self.raw
    }

    fn field(&self, key: &str) -> Option<String> {
        self.raw.get(key).and_then(value_as_string)
    }
}

/// Full Slack user profile, as reported by `users.info`.
///
/// Accessors read the nested `user` object and return `None` for anything
/// Slack left out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceOwner {
    raw: Map<String, Value>,
}

impl ResourceOwner {
    pub fn new(raw: Map<String, Value>) -> Self {
        Self { raw }
    }

    pub fn id(&self) -> Option<String> {
        self.user_field("id")
    }

    pub fn name(&self) -> Option<String> {
        self.user_field("name")
    }

    pub fn real_name(&self) -> Option<String> {
        self.user_field("real_name")
    }

    pub fn color(&self) -> Option<String> {
        self.user_field("color")
    }

    pub fn email(&self) -> Option<String> {
        self.profile_field("email")
    }

    /// Largest avatar Slack advertises.
    pub fn avatar_url(&self) -> Option<String> {
        ["image_192", "image_72", "image_48"]
            .iter()
            .find_map(|key| self.profile_field(key))
    }

    pub fn to_map(&self) -> &Map<String, Value> {
        &self.raw
    }

    fn user(&self) -> Option<&Map<String, Value>> {
        self.raw.get("user").and_then(Value::as_object)
    }

    fn user_field(&self, key: &str) -> Option<String> {
        self.user()?.get(key).and_then(value_as_string)
    }

    fn profile_field(&self, key: &str) -> Option<String> {
        self.user()?
            .get("profile")
            .and_then(Value::as_object)?
            .get(key)
            .and_then(value_as_string)
    }
}
