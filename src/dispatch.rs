//! Query dispatch: one question, one model, one [`QueryResult`].
//!
//! Every failure a provider can produce is folded into the result, so a
//! comparison over several models always yields one row per model.

use std::time::{Duration, Instant};

use serde::Serialize;

use crate::error::Error;
use crate::models::{calculate_cost, ModelFactory, ModelId, Provider};
use crate::provider::{ChatModel, Message, ProviderError, UsageInfo};

/// Outcome of querying one model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    /// Display name of the model.
    pub model: String,
    pub response_text: String,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub total_tokens: u64,
    /// USD, unrounded.
    pub cost: f64,
    pub elapsed_seconds: f64,
    pub error: Option<String>,
}

impl QueryResult {
    fn succeeded(model: ModelId, content: String, usage: UsageInfo, elapsed: Duration) -> Self {
        Self {
            model: model.display_name().to_string(),
            response_text: content,
            input_tokens: usage.input_tokens,
            output_tokens: usage.output_tokens,
            total_tokens: usage.total_tokens(),
            cost: calculate_cost(model, usage.input_tokens, usage.output_tokens),
            elapsed_seconds: elapsed.as_secs_f64(),
            error: None,
        }
    }

    fn failed(model: ModelId, error: &QueryError, elapsed: Duration) -> Self {
        let message = error.to_string();
        Self {
            model: model.display_name().to_string(),
            response_text: format!("Error: {}", message),
            input_tokens: 0,
            output_tokens: 0,
            total_tokens: 0,
            cost: 0.0,
            elapsed_seconds: elapsed.as_secs_f64(),
            error: Some(message),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Why a query produced no answer. The display text is what users see.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QueryError {
    #[error("Insufficient Balance - Please add credits to your {provider} account at {}", .provider.billing_url())]
    InsufficientBalance { provider: Provider },

    #[error("Invalid API key - Please check {} in your .env file", .provider.env_var())]
    Authentication { provider: Provider },

    #[error("{0}")]
    Provider(String),
}

/// Map a provider failure onto a [`QueryError`].
///
/// The HTTP status decides when one is available; the message text is only
/// inspected for failures that never got a status.
pub fn classify(provider: Provider, error: &ProviderError) -> QueryError {
    match error.status() {
        Some(402) => QueryError::InsufficientBalance { provider },
        Some(401) => QueryError::Authentication { provider },
        Some(_) => QueryError::Provider(error.to_string()),
        None => classify_message(provider, &error.to_string()),
    }
}

/// Fallback heuristic for failures without a usable status code: match
/// well-known substrings in the message text.
pub fn classify_message(provider: Provider, message: &str) -> QueryError {
    if message.contains("402") || message.contains("Insufficient Balance") {
        QueryError::InsufficientBalance { provider }
    } else if message.contains("401") || message.contains("Unauthorized") {
        QueryError::Authentication { provider }
    } else {
        QueryError::Provider(message.to_string())
    }
}

/// Preset questions offered by the CLI, numbered from 1.
pub const SAMPLE_QUESTIONS: [&str; 3] = [
    "Compare the main approaches to attention mechanisms described in these documents",
    "What are the key differences between sparse and dense attention?",
    "Summarize the common themes across all documents",
];

/// Look up a preset question by its 1-based number.
pub fn sample_question(index: usize) -> crate::Result<&'static str> {
    index
        .checked_sub(1)
        .and_then(|i| SAMPLE_QUESTIONS.get(i))
        .copied()
        .ok_or(Error::UnknownSample {
            index,
            count: SAMPLE_QUESTIONS.len(),
        })
}

/// Build the system + user message pair for a question over `context`.
pub fn build_messages(context: &str, question: &str) -> [Message; 2] {
    let system = format!(
        "Use the given context to answer the question.\n\
         If you don't know the answer, say you don't know. Keep the answer concise.\n\
         \n\
         Context:\n\
         {}",
        context
    );
    [Message::system(system), Message::user(question)]
}

/// Ask `client` a question about `context` and measure the call.
pub async fn query_model<C: ChatModel>(client: &C, context: &str, question: &str) -> QueryResult {
    let model = client.model();
    let messages = build_messages(context, question);

    tracing::info!(model = %model, "Querying model");
    let start = Instant::now();
    let outcome = client.invoke(&messages).await;
    let elapsed = start.elapsed();

    match outcome {
        Ok(response) => {
            let usage = response.usage.unwrap_or_else(|| {
                tracing::warn!(model = %model, "Response carried no token usage, counting zero");
                UsageInfo::default()
            });
            let result = QueryResult::succeeded(model, response.content, usage, elapsed);
            tracing::info!(
                model = %model,
                input_tokens = result.input_tokens,
                output_tokens = result.output_tokens,
                cost = result.cost,
                elapsed_secs = result.elapsed_seconds,
                "Model answered"
            );
            result
        }
        Err(e) => {
            let error = classify(model.provider(), &e);
            tracing::warn!(model = %model, error = %e, "Model query failed");
            QueryResult::failed(model, &error, elapsed)
        }
    }
}

/// Runs queries against clients built by a [`ModelFactory`].
#[derive(Debug, Clone)]
pub struct Dispatcher {
    factory: ModelFactory,
}

impl Dispatcher {
    pub fn new(factory: ModelFactory) -> Self {
        Self { factory }
    }

    /// Query one model. Never fails; problems are reported in the result.
    pub async fn query(&self, model: ModelId, context: &str, question: &str) -> QueryResult {
        match self.factory.get_model(model) {
            Ok(client) => query_model(&client, context, question).await,
            Err(e) => {
                tracing::warn!(model = %model, error = %e, "Could not build model client");
                let error = match e {
                    Error::MissingCredential { provider, .. } => {
                        QueryError::Authentication { provider }
                    }
                    other => QueryError::Provider(other.to_string()),
                };
                QueryResult::failed(model, &error, Duration::ZERO)
            }
        }
    }

    /// Query a model by identifier. Only an unknown identifier is an error.
    pub async fn query_by_name(
        &self,
        model: &str,
        context: &str,
        question: &str,
    ) -> crate::Result<QueryResult> {
        let model: ModelId = model.parse()?;
        Ok(self.query(model, context, question).await)
    }

    /// Query each model in turn. Results keep the order of `models`.
    pub async fn compare(
        &self,
        models: &[ModelId],
        context: &str,
        question: &str,
    ) -> Vec<QueryResult> {
        let mut results = Vec::with_capacity(models.len());
        for &model in models {
            results.push(self.query(model, context, question).await);
        }
        results
    }
}
