//! Model client construction.

use std::time::Duration;

use reqwest::Client;

use super::{ModelId, Protocol};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::provider::{AnthropicClient, ChatModel, ChatResponse, Message, OpenAiClient, ProviderError};

pub use crate::provider::ClientSettings;

/// Sampling temperature for every model; comparisons must be deterministic.
pub const DEFAULT_TEMPERATURE: f32 = 0.0;

/// A configured client for one model.
#[derive(Debug, Clone)]
pub enum ModelClient {
    OpenAi(OpenAiClient),
    Anthropic(AnthropicClient),
}

impl ModelClient {
    pub fn settings(&self) -> &ClientSettings {
        match self {
            ModelClient::OpenAi(client) => client.settings(),
            ModelClient::Anthropic(client) => client.settings(),
        }
    }
}

impl ChatModel for ModelClient {
    fn model(&self) -> ModelId {
        self.settings().model
    }

    async fn invoke(&self, messages: &[Message]) -> std::result::Result<ChatResponse, ProviderError> {
        match self {
            ModelClient::OpenAi(client) => client.invoke(messages).await,
            ModelClient::Anthropic(client) => client.invoke(messages).await,
        }
    }
}

/// Builds model clients from an explicit [`Config`].
///
/// One HTTP connection pool is shared by every client it creates.
#[derive(Debug, Clone)]
pub struct ModelFactory {
    config: Config,
    http: Client,
}

impl ModelFactory {
    pub fn new(config: Config) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.http.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build()?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Build a client for `model`.
    ///
    /// Fails with [`Error::MissingCredential`] when the provider has no key.
    pub fn get_model(&self, model: ModelId) -> Result<ModelClient> {
        let provider = model.provider();
        let api_key = self
            .config
            .api_key(provider)
            .cloned()
            .ok_or(Error::MissingCredential {
                provider,
                var: provider.env_var(),
            })?;

        let settings = ClientSettings {
            model,
            temperature: DEFAULT_TEMPERATURE,
            base_url: self.config.base_url(model).to_string(),
            api_key,
        };

        tracing::debug!(
            model = %model,
            provider = %provider,
            base_url = %settings.base_url,
            "Built model client"
        );

        let client = match provider.protocol() {
            Protocol::OpenAiCompatible => {
                ModelClient::OpenAi(OpenAiClient::new(self.http.clone(), settings))
            }
            Protocol::Anthropic => {
                ModelClient::Anthropic(AnthropicClient::new(self.http.clone(), settings))
            }
        };
        Ok(client)
    }

    /// Build a client from a user-supplied model identifier.
    pub fn get_model_by_name(&self, name: &str) -> Result<ModelClient> {
        self.get_model(name.parse()?)
    }
}
