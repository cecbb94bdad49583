//! DeepSeek account balance lookup.
//!
//! The check is advisory. Every failure mode collapses to `None`.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::config::{ApiKey, Config};
use crate::models::Provider;

/// Body of `GET /user/balance`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BalanceInfo {
    #[serde(default)]
    pub is_available: bool,
    #[serde(default)]
    pub balance_infos: Vec<BalanceDetail>,
}

/// Balance in one currency. Amounts are decimal strings as sent by the API.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BalanceDetail {
    #[serde(default)]
    pub currency: String,
    pub total_balance: String,
    #[serde(default)]
    pub granted_balance: Option<String>,
    #[serde(default)]
    pub topped_up_balance: Option<String>,
}

/// Whether the account can pay for queries.
#[derive(Debug, Clone, PartialEq)]
pub enum BalanceStatus {
    Available { total: String },
    Insufficient { total: String },
    /// The check succeeded but the response listed no balances.
    NoEntries,
}

impl BalanceInfo {
    /// Interpret the first listed balance.
    pub fn status(&self) -> BalanceStatus {
        let Some(first) = self.balance_infos.first() else {
            return BalanceStatus::NoEntries;
        };
        let total = first.total_balance.clone();
        let positive = total.trim().parse::<f64>().map(|v| v > 0.0).unwrap_or(false);
        if self.is_available && positive {
            BalanceStatus::Available { total }
        } else {
            BalanceStatus::Insufficient { total }
        }
    }
}

/// Terminal lines describing the outcome of a balance check.
pub fn summary_lines(result: Option<&BalanceInfo>) -> Vec<String> {
    let Some(info) = result else {
        return vec!["Could not check balance".to_string()];
    };
    match info.status() {
        BalanceStatus::Available { total } => vec![format!("Balance: ${}", total)],
        BalanceStatus::Insufficient { total } => vec![
            format!("Insufficient balance: ${}", total),
            format!("Add credits at {}", Provider::DeepSeek.billing_url()),
        ],
        BalanceStatus::NoEntries => vec!["Balance checked: no balances listed".to_string()],
    }
}

/// Queries one balance endpoint with a bounded timeout.
#[derive(Debug, Clone)]
pub struct BalanceChecker {
    http: Client,
    url: String,
    api_key: Option<ApiKey>,
}

impl BalanceChecker {
    /// Build a checker for DeepSeek from config.
    pub fn new(config: &Config) -> crate::Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.balance.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            url: config.balance.url.clone(),
            api_key: config.api_key(Provider::DeepSeek).cloned(),
        })
    }

    /// Fetch the balance.
    ///
    /// Returns `None` without touching the network when no key is configured,
    /// and `None` for any non-200 status, transport error or malformed body.
    pub async fn check_balance(&self) -> Option<BalanceInfo> {
        let Some(api_key) = &self.api_key else {
            tracing::debug!("No DeepSeek API key, skipping balance check");
            return None;
        };

        let response = match self
            .http
            .get(&self.url)
            .bearer_auth(api_key.expose_secret())
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!(error = %e, "Balance request failed");
                return None;
            }
        };

        if response.status() != StatusCode::OK {
            tracing::debug!(status = %response.status(), "Balance endpoint returned non-200");
            return None;
        }

        match response.json::<BalanceInfo>().await {
            Ok(info) => Some(info),
            Err(e) => {
                tracing::debug!(error = %e, "Malformed balance response");
                None
            }
        }
    }
}

/// One-shot balance check using `config`.
pub async fn check_balance(config: &Config) -> Option<BalanceInfo> {
    match BalanceChecker::new(config) {
        Ok(checker) => checker.check_balance().await,
        Err(e) => {
            tracing::debug!(error = %e, "Could not build balance client");
            None
        }
    }
}
