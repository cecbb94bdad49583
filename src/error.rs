//! Error types for docbench.

use std::path::PathBuf;

use crate::models::Provider;

/// Result type alias for docbench operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for docbench.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("Unknown model: {model}")]
    UnknownModel { model: String },

    #[error("No sample question {index} (choose 1-{count})")]
    UnknownSample { index: usize, count: usize },

    #[error("No API key configured for {provider} (set {var})")]
    MissingCredential { provider: Provider, var: &'static str },

    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to extract text from '{path}': {detail}")]
    Pdf { path: PathBuf, detail: String },

    #[error("Tokenizer error: {0}")]
    Tokenizer(String),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}
