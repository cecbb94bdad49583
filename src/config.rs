//! Configuration parsing and credential resolution for docbench.

use std::collections::HashMap;
use std::path::Path;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::models::{ModelId, Provider};

/// Default path of the optional config file.
pub const DEFAULT_CONFIG_PATH: &str = "docbench.toml";

/// DeepSeek account balance endpoint.
pub const DEFAULT_BALANCE_URL: &str = "https://api.deepseek.com/user/balance";

/// Root configuration structure.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub documents: DocumentsConfig,
    /// Resolved credentials, keyed by provider.
    pub credentials: HashMap<Provider, ApiKey>,
    /// Per-model base URL overrides.
    pub endpoints: HashMap<ModelId, String>,
    pub balance: BalanceConfig,
    pub http: HttpConfig,
    pub logging: LoggingConfig,
}

/// Document source configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentsConfig {
    /// Directory scanned for `*.pdf` files
    #[serde(default = "default_documents_dir")]
    pub dir: String,
}

fn default_documents_dir() -> String {
    "documents".to_string()
}

impl Default for DocumentsConfig {
    fn default() -> Self {
        Self {
            dir: default_documents_dir(),
        }
    }
}

/// Balance check configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BalanceConfig {
    #[serde(default = "default_balance_url")]
    pub url: String,
    #[serde(default = "default_balance_timeout")]
    pub timeout_secs: u64,
}

fn default_balance_url() -> String {
    DEFAULT_BALANCE_URL.to_string()
}

fn default_balance_timeout() -> u64 {
    10
}

impl Default for BalanceConfig {
    fn default() -> Self {
        Self {
            url: default_balance_url(),
            timeout_secs: default_balance_timeout(),
        }
    }
}

/// HTTP client settings for model queries.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HttpConfig {
    /// Whole-request timeout for model calls. Unset means no timeout.
    pub request_timeout_secs: Option<u64>,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// API key wrapper that redacts in Debug/Display/Serialize and zeroizes on drop.
#[derive(Clone)]
pub struct ApiKey(SecretString);

impl ApiKey {
    /// Access the raw key value. Every call site is auditable via `grep expose_secret`.
    pub fn expose_secret(&self) -> &str {
        self.0.expose_secret()
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl std::fmt::Display for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl Serialize for ApiKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str("[REDACTED]")
    }
}

impl<'de> Deserialize<'de> for ApiKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(|s| ApiKey(SecretString::from(s)))
    }
}

impl From<String> for ApiKey {
    fn from(s: String) -> Self {
        ApiKey(SecretString::from(s))
    }
}

impl From<&str> for ApiKey {
    fn from(s: &str) -> Self {
        ApiKey(SecretString::from(s))
    }
}

/// How a provider's API key was resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum KeySource {
    /// Key was a literal string in config (no ${} references)
    Literal,
    /// Key contained ${VAR} references expanded from environment
    EnvExpanded,
    /// Key was read from the provider's conventional env var (holds var name)
    Convention(String),
    /// No key available
    None,
}

impl std::fmt::Display for KeySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeySource::Literal => write!(f, "config-literal"),
            KeySource::EnvExpanded => write!(f, "env-expanded"),
            KeySource::Convention(var) => write!(f, "convention ({})", var),
            KeySource::None => write!(f, "none"),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Configuration validation error: {0}")]
    Validation(String),

    #[error("Cannot expand '{var}' in {field}: {message}")]
    EnvVar {
        var: String,
        field: String,
        message: String,
    },
}

/// Raw provider section. `api_key` may contain `${VAR}` references.
#[derive(Debug, Default, Deserialize)]
pub struct RawProviderConfig {
    pub api_key: Option<String>,
}

/// Raw configuration deserialized directly from TOML.
#[derive(Debug, Default, Deserialize)]
pub struct RawConfig {
    #[serde(default)]
    pub documents: DocumentsConfig,
    #[serde(default)]
    pub providers: HashMap<String, RawProviderConfig>,
    #[serde(default)]
    pub endpoints: HashMap<String, String>,
    #[serde(default)]
    pub balance: BalanceConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Substitute every `${VAR}` in a config value. `field` names the value
/// (e.g. `providers.deepseek.api_key`) in errors.
fn expand_vars<F>(input: &str, field: &str, lookup: F) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let fail = |var: &str, message: &str| ConfigError::EnvVar {
        var: var.to_string(),
        field: field.to_string(),
        message: message.to_string(),
    };

    let mut expanded = String::with_capacity(input.len());
    let mut rest = input;
    while let Some((literal, reference)) = rest.split_once("${") {
        expanded.push_str(literal);
        let (name, tail) = reference
            .split_once('}')
            .ok_or_else(|| fail(input, "unclosed '${' reference"))?;
        if name.is_empty() {
            return Err(fail("${}", "empty variable name"));
        }
        let value = lookup(name).ok_or_else(|| fail(name, "environment variable is not set"))?;
        expanded.push_str(&value);
        rest = tail;
    }
    expanded.push_str(rest);
    Ok(expanded)
}

impl Config {
    /// Resolve a raw config using the process environment.
    pub fn from_raw(raw: RawConfig) -> Result<(Self, Vec<(Provider, KeySource)>), ConfigError> {
        Self::from_raw_with(raw, |name| std::env::var(name).ok())
    }

    /// Resolve a raw config, reading environment variables through `lookup`.
    ///
    /// For each provider:
    /// - `api_key` containing `${VAR}` is expanded, source = `EnvExpanded`
    /// - a literal `api_key` is used as is, source = `Literal`
    /// - otherwise the provider's conventional variable (e.g. `OPENAI_API_KEY`)
    ///   is tried, source = `Convention(var)` or `KeySource::None`
    ///
    /// Empty values count as unset.
    pub fn from_raw_with<F>(
        mut raw: RawConfig,
        lookup: F,
    ) -> Result<(Self, Vec<(Provider, KeySource)>), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(name) = raw
            .providers
            .keys()
            .find(|name| !Provider::ALL.iter().any(|p| p.key() == name.as_str()))
        {
            return Err(ConfigError::Validation(format!(
                "Unknown provider '{}' (expected openai, anthropic or deepseek)",
                name
            )));
        }

        let lookup = |name: &str| lookup(name).filter(|v| !v.is_empty());
        let mut credentials = HashMap::new();
        let mut key_sources = Vec::with_capacity(Provider::ALL.len());

        for provider in Provider::ALL {
            let raw_key = raw.providers.remove(provider.key()).and_then(|p| p.api_key);
            let (api_key, source) = match raw_key {
                Some(ref key) if key.contains("${") => {
                    let field = format!("providers.{}.api_key", provider.key());
                    let expanded = expand_vars(key, &field, &lookup)?;
                    (Some(ApiKey::from(expanded)), KeySource::EnvExpanded)
                }
                Some(ref key) if !key.is_empty() => {
                    (Some(ApiKey::from(key.as_str())), KeySource::Literal)
                }
                _ => match lookup(provider.env_var()) {
                    Some(value) => (
                        Some(ApiKey::from(value)),
                        KeySource::Convention(provider.env_var().to_string()),
                    ),
                    None => (None, KeySource::None),
                },
            };

            if let Some(key) = api_key {
                credentials.insert(provider, key);
            }
            key_sources.push((provider, source));
        }

        let mut endpoints = HashMap::with_capacity(raw.endpoints.len());
        for (model, url) in raw.endpoints {
            let model_id = model.parse::<ModelId>().map_err(|_| {
                ConfigError::Validation(format!("Endpoint override for unknown model '{}'", model))
            })?;
            let url = expand_vars(&url, &format!("endpoints.{}", model), &lookup)?;
            endpoints.insert(model_id, url);
        }

        let config = Config {
            documents: raw.documents,
            credentials,
            endpoints,
            balance: raw.balance,
            http: raw.http,
            logging: raw.logging,
        };
        config.validate()?;

        Ok((config, key_sources))
    }

    /// Parse configuration from a TOML string, resolving keys from the environment.
    pub fn parse_str(content: &str) -> Result<(Self, Vec<(Provider, KeySource)>), ConfigError> {
        let raw: RawConfig = toml::from_str(content).map_err(ConfigError::Parse)?;
        Self::from_raw(raw)
    }

    /// Load configuration from a TOML file with environment variable expansion.
    pub fn from_file_with_env(
        path: impl AsRef<Path>,
    ) -> Result<(Self, Vec<(Provider, KeySource)>), ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            source: e,
        })?;

        Self::parse_str(&content)
    }

    /// Load `path` if it exists, otherwise fall back to defaults plus
    /// conventional environment variables.
    pub fn load_or_default(
        path: impl AsRef<Path>,
    ) -> Result<(Self, Vec<(Provider, KeySource)>), ConfigError> {
        if path.as_ref().exists() {
            Self::from_file_with_env(path)
        } else {
            tracing::debug!(path = %path.as_ref().display(), "No config file, using defaults");
            Self::from_raw(RawConfig::default())
        }
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        for (model, url) in &self.endpoints {
            if url.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "Endpoint override for '{}' is empty",
                    model
                )));
            }
        }

        if self.balance.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "balance.timeout_secs must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Base URL for a model, honoring overrides.
    pub fn base_url(&self, model: ModelId) -> &str {
        self.endpoints
            .get(&model)
            .map(String::as_str)
            .unwrap_or_else(|| model.default_base_url())
    }

    /// Credential for a provider, if one was resolved.
    pub fn api_key(&self, provider: Provider) -> Option<&ApiKey> {
        self.credentials.get(&provider)
    }

    /// Set a credential directly.
    pub fn with_api_key(mut self, provider: Provider, key: impl Into<ApiKey>) -> Self {
        self.credentials.insert(provider, key.into());
        self
    }

    /// Override the base URL of one model.
    pub fn with_endpoint(mut self, model: ModelId, url: impl Into<String>) -> Self {
        self.endpoints.insert(model, url.into());
        self
    }
}
