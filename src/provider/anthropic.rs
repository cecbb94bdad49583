//! Anthropic messages API.

use reqwest::{header, Client};
use serde::{Deserialize, Serialize};

use super::types::{lenient_usage, ChatResponse, Message, Role, UsageInfo};
use super::{send_json, ChatModel, ClientSettings, ProviderError};
use crate::models::ModelId;

/// Value of the `anthropic-version` header.
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// The messages API requires an explicit output limit.
pub const DEFAULT_MAX_TOKENS: u32 = 1024;

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<&'a Message>,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    #[serde(default, deserialize_with = "lenient_usage")]
    usage: Option<UsageInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum ContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(other)]
    Other,
}

/// Split system instructions out of the message list; Anthropic takes them
/// as a top-level field.
fn split_system(messages: &[Message]) -> (Option<String>, Vec<&Message>) {
    let system: Vec<&str> = messages
        .iter()
        .filter(|m| m.role == Role::System)
        .map(|m| m.content.as_str())
        .collect();
    let rest = messages.iter().filter(|m| m.role != Role::System).collect();
    let system = (!system.is_empty()).then(|| system.join("\n\n"));
    (system, rest)
}

/// Client for `POST /v1/messages`.
#[derive(Debug, Clone)]
pub struct AnthropicClient {
    http: Client,
    settings: ClientSettings,
}

impl AnthropicClient {
    pub fn new(http: Client, settings: ClientSettings) -> Self {
        Self { http, settings }
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }
}

impl ChatModel for AnthropicClient {
    fn model(&self) -> ModelId {
        self.settings.model
    }

    async fn invoke(&self, messages: &[Message]) -> Result<ChatResponse, ProviderError> {
        let model = self.settings.model;
        let url = self.settings.endpoint("v1/messages");
        tracing::debug!(model = %model, url = %url, "Sending messages request");

        let (system, rest) = split_system(messages);
        let body = MessagesRequest {
            model: model.wire_name(),
            max_tokens: DEFAULT_MAX_TOKENS,
            system,
            messages: rest,
            temperature: self.settings.temperature,
        };
        let request = self
            .http
            .post(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .header("x-api-key", self.settings.api_key.expose_secret())
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body);

        let response: MessagesResponse = send_json(model.provider(), request).await?;
        let content = response
            .content
            .into_iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text),
                ContentBlock::Other => None,
            })
            .collect::<Vec<_>>()
            .join("");

        Ok(ChatResponse {
            content,
            usage: response.usage,
        })
    }
}
