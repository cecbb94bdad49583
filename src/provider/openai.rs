//! OpenAI-compatible chat completions (OpenAI and DeepSeek).

use reqwest::{header, Client};
use serde::{Deserialize, Serialize};

use super::types::{lenient_usage, ChatResponse, Message, UsageInfo};
use super::{send_json, ChatModel, ClientSettings, ProviderError};
use crate::models::ModelId;

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default, deserialize_with = "lenient_usage")]
    usage: Option<UsageInfo>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Client for any endpoint implementing `POST /chat/completions`.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    http: Client,
    settings: ClientSettings,
}

impl OpenAiClient {
    pub fn new(http: Client, settings: ClientSettings) -> Self {
        Self { http, settings }
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }
}

impl ChatModel for OpenAiClient {
    fn model(&self) -> ModelId {
        self.settings.model
    }

    async fn invoke(&self, messages: &[Message]) -> Result<ChatResponse, ProviderError> {
        let model = self.settings.model;
        let url = self.settings.endpoint("chat/completions");
        tracing::debug!(model = %model, url = %url, "Sending chat completion request");

        let body = CompletionRequest {
            model: model.wire_name(),
            messages,
            temperature: self.settings.temperature,
        };
        let request = self
            .http
            .post(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .bearer_auth(self.settings.api_key.expose_secret())
            .json(&body);

        let response: CompletionResponse = send_json(model.provider(), request).await?;
        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        Ok(ChatResponse {
            content,
            usage: response.usage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let messages = [Message::system("ctx"), Message::user("q")];
        let body = CompletionRequest {
            model: ModelId::DeepSeekChatV31.wire_name(),
            messages: &messages,
            temperature: 0.0,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "deepseek-chat");
        assert_eq!(json["temperature"], 0.0);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "q");
    }

    #[test]
    fn test_response_null_content() {
        let response: CompletionResponse = serde_json::from_value(serde_json::json!({
            "choices": [{ "index": 0, "message": { "role": "assistant", "content": null } }]
        }))
        .unwrap();
        assert!(response.choices[0].message.content.is_none());
        assert!(response.usage.is_none());
    }
}
