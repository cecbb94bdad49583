//! docbench - Long-context multi-document comparison across LLM providers
//!
//! This library loads a directory of PDFs into one context, asks the same
//! question of several providers, and normalizes cost, latency and token
//! usage into comparable results.

pub mod balance;
pub mod config;
pub mod dispatch;
pub mod documents;
pub mod error;
pub mod models;
pub mod provider;
pub mod report;

pub use config::Config;
pub use dispatch::{Dispatcher, QueryResult};
pub use error::{Error, Result};
pub use models::{ModelId, Provider};
