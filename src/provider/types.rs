//! Provider-neutral message and response types.

use serde::{Deserialize, Deserializer, Serialize};

/// Role of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Token usage as reported on the wire.
///
/// OpenAI-compatible providers report `prompt_tokens`/`completion_tokens`,
/// Anthropic reports `input_tokens`/`output_tokens`. Extra fields such as
/// `total_tokens` or cache counters are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ReportedUsage {
    Completion {
        prompt_tokens: u64,
        completion_tokens: u64,
    },
    Message {
        input_tokens: u64,
        output_tokens: u64,
    },
}

/// Canonical token usage for one call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UsageInfo {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl UsageInfo {
    pub fn total_tokens(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}

impl From<ReportedUsage> for UsageInfo {
    fn from(usage: ReportedUsage) -> Self {
        match usage {
            ReportedUsage::Completion {
                prompt_tokens,
                completion_tokens,
            } => Self {
                input_tokens: prompt_tokens,
                output_tokens: completion_tokens,
            },
            ReportedUsage::Message {
                input_tokens,
                output_tokens,
            } => Self {
                input_tokens,
                output_tokens,
            },
        }
    }
}

/// Deserialize a `usage` field of either shape into [`UsageInfo`].
///
/// A missing, null or unrecognised usage object yields `None` instead of
/// failing the whole response.
pub(crate) fn lenient_usage<'de, D>(deserializer: D) -> Result<Option<UsageInfo>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value
        .and_then(|v| serde_json::from_value::<ReportedUsage>(v).ok())
        .map(UsageInfo::from))
}

/// Normalized reply from any provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatResponse {
    pub content: String,
    /// `None` when the provider did not report usage.
    pub usage: Option<UsageInfo>,
}
