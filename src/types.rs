use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// One customer review as loaded from the review table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    #[serde(rename = "Name")]
    pub entity: String,
    #[serde(rename = "caption")]
    pub text: String,
    pub rating: f64,
    #[serde(rename = "sentiment_label")]
    pub sentiment: String,
}

/// Opaque unit wrapping one review's text for submission to the
/// summarization backend. Carries no metadata beyond the text body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    text: String,
}

impl Document {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// A term and how often it occurred across the review corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermFrequency {
    pub term: String,
    pub count: usize,
}

/// The pair of model-generated aspect summaries for one entity.
///
/// Each field holds either the backend's verbatim response or the
/// `UNAVAILABLE` sentinel when that aspect's call failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AspectSummary {
    pub pros: String,
    pub cons: String,
}

impl AspectSummary {
    /// Placeholder substituted for an aspect whose generation failed,
    /// distinguishing "no data" from "error" for downstream consumers.
    pub const UNAVAILABLE: &'static str = "Summary unavailable.";

    pub fn unavailable() -> Self {
        Self {
            pros: Self::UNAVAILABLE.to_string(),
            cons: Self::UNAVAILABLE.to_string(),
        }
    }

    pub fn pros_available(&self) -> bool {
        self.pros != Self::UNAVAILABLE
    }

    pub fn cons_available(&self) -> bool {
        self.cons != Self::UNAVAILABLE
    }
}

/// Everything one pipeline run produced, including per-branch errors.
///
/// The frequency and summary branches degrade independently: either can
/// fail and be reported here without affecting the other.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineResult {
    pub run_id: Uuid,
    pub top_terms: Vec<TermFrequency>,
    pub summary: AspectSummary,
    pub terms_error: Option<String>,
    pub summary_error: Option<String>,
    pub generated_at: DateTime<Utc>,
    pub elapsed_ms: u64,
}

/// Configuration for the aspect summarization calls.
#[derive(Debug, Clone)]
pub struct SummaryConfig {
    pub model: String,
    pub temperature: f32,
    pub request_timeout: Duration,
    pub max_retries: u32,
    pub retry_delay: Duration,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            model: "llama3.2".to_string(),
            temperature: 0.5,
            request_timeout: Duration::from_secs(30),
            max_retries: 0, // failed aspect calls are not retried unless asked
            retry_delay: Duration::from_secs(2),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("empty corpus: {0}")]
    EmptyCorpus(String),

    #[error("language model service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("malformed model response: {0}")]
    MalformedResponse(String),

    #[error("review data access failed: {0}")]
    DataAccess(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid backend URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("general error: {0}")]
    General(String),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
