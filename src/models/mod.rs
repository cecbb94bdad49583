//! Model catalogue: identifiers, providers, pricing and client construction.
//!
//! The set of comparable models is closed. Everything that varies per model
//! (endpoint, wire model name, price, credential) is derived from [`ModelId`].

mod factory;
pub mod pricing;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

pub use factory::{ClientSettings, ModelClient, ModelFactory, DEFAULT_TEMPERATURE};
pub use pricing::{calculate_cost, pricing, PricingEntry, PRICING};

/// A model that can be queried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelId {
    #[serde(rename = "gpt-5")]
    Gpt5,
    #[serde(rename = "claude-sonnet-4-5-20250929")]
    ClaudeSonnet45,
    #[serde(rename = "deepseek-chat")]
    DeepSeekChat,
    #[serde(rename = "deepseek-chat-v3.1")]
    DeepSeekChatV31,
}

impl ModelId {
    /// All models, in display order.
    pub const ALL: [ModelId; 4] = [
        ModelId::Gpt5,
        ModelId::ClaudeSonnet45,
        ModelId::DeepSeekChat,
        ModelId::DeepSeekChatV31,
    ];

    /// The identifier users select the model by.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelId::Gpt5 => "gpt-5",
            ModelId::ClaudeSonnet45 => "claude-sonnet-4-5-20250929",
            ModelId::DeepSeekChat => "deepseek-chat",
            ModelId::DeepSeekChatV31 => "deepseek-chat-v3.1",
        }
    }

    /// The model name sent on the wire.
    ///
    /// Both DeepSeek entries run `deepseek-chat`; the v3.1 snapshot is
    /// selected by the base URL path, not by the model name.
    pub fn wire_name(&self) -> &'static str {
        match self {
            ModelId::DeepSeekChatV31 => "deepseek-chat",
            other => other.as_str(),
        }
    }

    pub fn provider(&self) -> Provider {
        match self {
            ModelId::Gpt5 => Provider::OpenAi,
            ModelId::ClaudeSonnet45 => Provider::Anthropic,
            ModelId::DeepSeekChat | ModelId::DeepSeekChatV31 => Provider::DeepSeek,
        }
    }

    /// Provider base URL used when config does not override it.
    pub fn default_base_url(&self) -> &'static str {
        match self {
            ModelId::Gpt5 => "https://api.openai.com/v1",
            ModelId::ClaudeSonnet45 => "https://api.anthropic.com",
            ModelId::DeepSeekChat => "https://api.deepseek.com",
            ModelId::DeepSeekChatV31 => {
                "https://api.deepseek.com/v3.1_terminus_expires_on_20251015"
            }
        }
    }

    /// Human-readable name from the pricing table.
    pub fn display_name(&self) -> &'static str {
        pricing(*self).display_name
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelId::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| Error::UnknownModel {
                model: s.to_string(),
            })
    }
}

/// Wire protocol spoken by a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    /// `POST {base}/chat/completions`, bearer auth.
    OpenAiCompatible,
    /// `POST {base}/v1/messages`, `x-api-key` auth.
    Anthropic,
}

/// An account holder that bills for one or more models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[serde(rename = "openai")]
    OpenAi,
    Anthropic,
    #[serde(rename = "deepseek")]
    DeepSeek,
}

impl Provider {
    pub const ALL: [Provider; 3] = [Provider::OpenAi, Provider::Anthropic, Provider::DeepSeek];

    /// Config key for this provider.
    pub fn key(&self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::Anthropic => "anthropic",
            Provider::DeepSeek => "deepseek",
        }
    }

    /// Conventional environment variable holding the API key.
    pub fn env_var(&self) -> &'static str {
        match self {
            Provider::OpenAi => "OPENAI_API_KEY",
            Provider::Anthropic => "ANTHROPIC_API_KEY",
            Provider::DeepSeek => "DEEPSEEK_API_KEY",
        }
    }

    /// Where the account owner tops up credits.
    pub fn billing_url(&self) -> &'static str {
        match self {
            Provider::OpenAi => "https://platform.openai.com/settings/organization/billing",
            Provider::Anthropic => "https://console.anthropic.com/settings/billing",
            Provider::DeepSeek => "https://platform.deepseek.com",
        }
    }

    pub fn protocol(&self) -> Protocol {
        match self {
            Provider::Anthropic => Protocol::Anthropic,
            Provider::OpenAi | Provider::DeepSeek => Protocol::OpenAiCompatible,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Provider::OpenAi => "OpenAI",
            Provider::Anthropic => "Anthropic",
            Provider::DeepSeek => "DeepSeek",
        };
        f.write_str(name)
    }
}
