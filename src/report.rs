//! Terminal and JSON rendering of comparison results.

use std::fmt::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::dispatch::QueryResult;

/// One question asked of several models.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    pub question: String,
    pub generated_at: DateTime<Utc>,
    pub results: Vec<QueryResult>,
}

/// Headline comparisons across results.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyFindings<'a> {
    pub cheapest: &'a QueryResult,
    pub fastest: &'a QueryResult,
}

impl ComparisonReport {
    pub fn new(question: impl Into<String>, results: Vec<QueryResult>) -> Self {
        Self {
            question: question.into(),
            generated_at: Utc::now(),
            results,
        }
    }

    /// Cheapest and fastest model. Only meaningful with more than one result.
    ///
    /// Failed queries are included: they cost nothing, so an all-failing
    /// provider can come out "cheapest".
    pub fn key_findings(&self) -> Option<KeyFindings<'_>> {
        if self.results.len() < 2 {
            return None;
        }
        let cheapest = self
            .results
            .iter()
            .min_by(|a, b| a.cost.total_cmp(&b.cost))?;
        let fastest = self
            .results
            .iter()
            .min_by(|a, b| a.elapsed_seconds.total_cmp(&b.elapsed_seconds))?;
        Some(KeyFindings { cheapest, fastest })
    }

    /// Metrics table, one row per model.
    pub fn metrics_table(&self) -> String {
        let width = self
            .results
            .iter()
            .map(|r| r.model.len())
            .max()
            .unwrap_or(0)
            .max("Model".len());

        let mut out = String::new();
        let _ = writeln!(
            out,
            "{:<width$}  {:>12}  {:>13}  {:>12}  {:>10}  {:>9}",
            "Model", "Input Tokens", "Output Tokens", "Total Tokens", "Cost ($)", "Time (s)"
        );
        for r in &self.results {
            let _ = writeln!(
                out,
                "{:<width$}  {:>12}  {:>13}  {:>12}  {:>10}  {:>9}",
                r.model,
                r.input_tokens,
                r.output_tokens,
                r.total_tokens,
                format!("${:.4}", r.cost),
                format!("{:.2}", r.elapsed_seconds),
            );
        }
        out
    }

    /// Full plain-text report: responses, metrics, findings.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Question: {}\n", self.question);

        let _ = writeln!(out, "Responses");
        for r in &self.results {
            let _ = writeln!(
                out,
                "--- {} - ${:.4} | {:.2}s ---",
                r.model, r.cost, r.elapsed_seconds
            );
            let _ = writeln!(out, "{}\n", r.response_text.trim_end());
        }

        let _ = writeln!(out, "Metrics Comparison");
        out.push_str(&self.metrics_table());

        if let Some(findings) = self.key_findings() {
            let _ = writeln!(out, "\nKey Findings");
            let _ = writeln!(
                out,
                "Most Cost-Effective: {} (${:.4})",
                findings.cheapest.model, findings.cheapest.cost
            );
            let _ = writeln!(
                out,
                "Fastest Response:    {} ({:.2}s)",
                findings.fastest.model, findings.fastest.elapsed_seconds
            );
        }
        out
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
