//! Message payloads for webhooks and `chat.postMessage`.

use bon::Builder;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A pre-built Slack message.
///
/// Blocks and attachments are kept as raw JSON so any Block Kit builder can
/// feed them in.
///
/// # Example
/// ```
/// use serde_json::json;
/// use slackhook::message::Message;
///
/// let message = Message::builder()
///     .text("Deploy finished".to_string())
///     .blocks(vec![json!({"type": "divider"})])
///     .build();
/// assert_eq!(message.blocks.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Builder, Serialize, Deserialize)]
pub struct Message {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blocks: Vec<Value>,
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_ts: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_emoji: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mrkdwn: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unfurl_links: Option<bool>,
}

impl Message {
    /// Plain-text message.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn with_block(mut self, block: Value) -> Self {
        self.blocks.push(block);
        self
    }

    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = Some(channel.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn plain_message_serializes_only_text() {
        let value = serde_json::to_value(Message::plain("Hello")).unwrap();
        assert_eq!(value, json!({"text": "Hello"}));
    }

    #[test]
    fn blocks_and_channel_are_included_when_set() {
        let message = Message::plain("fallback")
            .with_channel("#testing")
            .with_block(json!({"type": "section", "text": {"type": "mrkdwn", "text": "*hi*"}}));

        let value = serde_json::to_value(&message).unwrap();

        assert_eq!(
            value,
            json!({
                "text": "fallback",
                "channel": "#testing",
                "blocks": [{"type": "section", "text": {"type": "mrkdwn", "text": "*hi*"}}]
            })
        );
    }

    #[test]
    fn builder_defaults_collections() {
        let message = Message::builder().mrkdwn(false).build();
        assert!(message.blocks.is_empty());
        assert!(message.attachments.is_empty());
        assert_eq!(message.mrkdwn, Some(false));
    }
}
