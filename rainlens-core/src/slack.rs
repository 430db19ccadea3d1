//! Slack slash-command payloads and reply delivery.
//!
//! See <https://api.slack.com/slash-commands>.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Inbound slash-command payload, posted form-encoded by Slack.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlashCommand {
    pub token: String,
    pub command: String,
    pub text: String,
    pub response_url: String,
    pub user_id: String,
    pub user_name: String,
    pub team_id: String,
    pub team_domain: String,
    pub channel_id: String,
    pub channel_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enterprise_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enterprise_name: Option<String>,
}

/// Reply message posted back to the command's response URL.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub text: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_type: Option<ResponseType>,
}

impl Message {
    /// A plain, sender-only reply (Slack defaults to ephemeral).
    pub fn plain(text: impl Into<String>) -> Self {
        Self { text: text.into(), ..Self::default() }
    }

    /// A reply visible to the whole channel.
    pub fn in_channel(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            response_type: Some(ResponseType::InChannel),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ResponseType {
    InChannel,
    Ephemeral,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Attachment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Delivery seam: post one reply to a response URL.
#[async_trait]
pub trait ReplySink: Send + Sync {
    async fn respond(&self, response_url: &str, message: &Message) -> Result<()>;
}

/// Real delivery over the Slack response webhook.
#[derive(Debug, Clone)]
pub struct SlackWebhook {
    http: reqwest::Client,
}

impl SlackWebhook {
    pub fn new() -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .context("Failed to build Slack HTTP client")?;
        Ok(Self { http })
    }
}

#[async_trait]
impl ReplySink for SlackWebhook {
    async fn respond(&self, response_url: &str, message: &Message) -> Result<()> {
        debug!(text = %message.text, "posting reply");
        let res = self
            .http
            .post(response_url)
            .json(message)
            .send()
            .await
            .context("Failed to post reply to Slack response URL")?;

        let status = res.status();
        if !status.is_success() {
            return Err(anyhow!("Slack reply delivery failed with status {status}"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn message_serializes_response_type_snake_case() {
        let json = serde_json::to_value(Message::in_channel("hi")).unwrap();
        assert_eq!(json["response_type"], "in_channel");
        assert!(json.get("attachments").is_none());
    }

    #[test]
    fn plain_message_omits_optional_fields() {
        let json = serde_json::to_value(Message::plain("hi")).unwrap();
        assert_eq!(json, serde_json::json!({ "text": "hi" }));
    }

    #[test]
    fn slash_command_decodes_form_payload() {
        let form = "token=tok&command=%2Fweather&text=123-4567\
                    &response_url=https%3A%2F%2Fhooks.slack.com%2Fc%2F1\
                    &user_id=U1&user_name=taro&team_id=T1&team_domain=acme\
                    &channel_id=C1&channel_name=general";
        let command: SlashCommand = serde_urlencoded::from_str(form).unwrap();
        assert_eq!(command.command, "/weather");
        assert_eq!(command.text, "123-4567");
        assert!(command.trigger_id.is_none());
    }

    #[tokio::test]
    async fn webhook_posts_json_body() {
        let server = MockServer::start().await;
        let message = Message::in_channel("☀️ 千代田区");
        Mock::given(method("POST"))
            .and(path("/response/1"))
            .and(body_json(&message))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let sink = SlackWebhook::new().unwrap();
        sink.respond(&format!("{}/response/1", server.uri()), &message).await.unwrap();
    }

    #[tokio::test]
    async fn webhook_reports_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(410))
            .mount(&server)
            .await;

        let sink = SlackWebhook::new().unwrap();
        let err = sink.respond(&server.uri(), &Message::plain("x")).await.unwrap_err();
        assert!(err.to_string().contains("410"));
    }
}
