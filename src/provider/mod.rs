//! Provider adapters.
//!
//! Each adapter speaks one wire protocol and hands back a [`ChatResponse`]
//! whose usage is already normalized to [`UsageInfo`].

mod anthropic;
mod openai;
pub mod types;

use std::future::Future;

use serde::de::DeserializeOwned;

use crate::config::ApiKey;
use crate::models::{ModelId, Provider};

pub use anthropic::{AnthropicClient, ANTHROPIC_VERSION, DEFAULT_MAX_TOKENS};
pub use openai::OpenAiClient;
pub use types::{ChatResponse, Message, ReportedUsage, Role, UsageInfo};

/// Everything a client needs to call one model.
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub model: ModelId,
    pub temperature: f32,
    pub base_url: String,
    pub api_key: ApiKey,
}

impl ClientSettings {
    /// Join the base URL with an endpoint path.
    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }
}

/// Failure talking to a provider.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Error code: {status} - {body}")]
    Status { status: u16, body: String },

    #[error("Failed to reach {provider}: {message}")]
    Transport { provider: Provider, message: String },

    #[error("Failed to parse response from {provider}: {message}")]
    Decode { provider: Provider, message: String },
}

impl ProviderError {
    /// HTTP status reported by the provider, if the request got that far.
    pub fn status(&self) -> Option<u16> {
        match self {
            ProviderError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// A chat model that answers a message list.
pub trait ChatModel {
    /// The model this client is bound to.
    fn model(&self) -> ModelId;

    /// Send the messages and wait for the full reply.
    fn invoke(
        &self,
        messages: &[Message],
    ) -> impl Future<Output = Result<ChatResponse, ProviderError>> + Send;
}

/// Send a prepared request and decode a successful JSON body.
pub(crate) async fn send_json<T: DeserializeOwned>(
    provider: Provider,
    request: reqwest::RequestBuilder,
) -> Result<T, ProviderError> {
    let response = request.send().await.map_err(|e| {
        tracing::error!(error = %e, provider = %provider, "Failed to reach provider");
        ProviderError::Transport {
            provider,
            message: e.to_string(),
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::error!(
            status = %status,
            provider = %provider,
            body = %body,
            "Provider returned error"
        );
        return Err(ProviderError::Status {
            status: status.as_u16(),
            body,
        });
    }

    response.json::<T>().await.map_err(|e| {
        tracing::error!(error = %e, provider = %provider, "Failed to parse provider response");
        ProviderError::Decode {
            provider,
            message: e.to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let settings = ClientSettings {
            model: ModelId::DeepSeekChat,
            temperature: 0.0,
            base_url: "https://api.deepseek.com/".to_string(),
            api_key: ApiKey::from("k"),
        };
        assert_eq!(
            settings.endpoint("chat/completions"),
            "https://api.deepseek.com/chat/completions"
        );
    }

    #[test]
    fn test_status_error_carries_code() {
        let err = ProviderError::Status {
            status: 402,
            body: "Insufficient Balance".to_string(),
        };
        assert_eq!(err.status(), Some(402));
        assert_eq!(err.to_string(), "Error code: 402 - Insufficient Balance");

        let err = ProviderError::Transport {
            provider: Provider::OpenAi,
            message: "connection refused".to_string(),
        };
        assert_eq!(err.status(), None);
    }
}
