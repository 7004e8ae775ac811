use crate::types::{AnalysisError, Document, Result, SummaryConfig};
use async_trait::async_trait;
use backoff::{backoff::Backoff, exponential::ExponentialBackoff};
use std::sync::Arc;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Instruction template for the positive-aspect request. The single
/// substitution point receives the full document context.
const POSITIVE_ASPECTS_TEMPLATE: &str = "You are a sentiment analyst. Based only on the following reviews, identify genuine **positive aspects** of the restaurant.\n\nWrite 3 to 5 clear bullet points only. Do not include anything negative. Avoid repetition.\n\nReviews:\n{context}";

/// Symmetric template for the negative-aspect request.
const NEGATIVE_ASPECTS_TEMPLATE: &str = "You are a sentiment analyst. Based only on the following reviews, identify genuine **negative aspects** of the restaurant.\n\nWrite 3 to 5 clear bullet points only. Do not include anything positive. Avoid repetition.\n\nReviews:\n{context}";

/// Trait for text-generation backends that can answer a single prompt.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Get the name of this backend
    fn backend_name(&self) -> String;

    /// Generate free-form text for the given prompt
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Per-aspect outcome of one summarization pass. The two aspects have no
/// data dependency on each other, so one can fail while the other holds a
/// full summary.
#[derive(Debug)]
pub struct SummaryOutcome {
    pub pros: Result<String>,
    pub cons: Result<String>,
}

/// Issues the two aspect requests against a text-generation backend.
pub struct AspectSummarizer {
    generator: Arc<dyn TextGenerator>,
    config: SummaryConfig,
}

impl AspectSummarizer {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            config: SummaryConfig::default(),
        }
    }

    pub fn with_config(mut self, config: SummaryConfig) -> Self {
        self.config = config;
        self
    }

    /// Run the positive and negative aspect requests over the assembled
    /// documents and return both raw responses.
    ///
    /// All documents are stuffed into a single context per request; corpora
    /// that exceed the backing model's context window are a known
    /// limitation. An empty document set still issues both calls; the
    /// empty-context policy belongs to the backend.
    pub async fn summarize(&self, documents: &[Document]) -> SummaryOutcome {
        let context = stuff_documents(documents);
        debug!(
            "Submitting {} documents ({} bytes of context) to {}",
            documents.len(),
            context.len(),
            self.generator.backend_name()
        );

        let pros_prompt = render_prompt(POSITIVE_ASPECTS_TEMPLATE, &context);
        let cons_prompt = render_prompt(NEGATIVE_ASPECTS_TEMPLATE, &context);

        // The two calls are independent; run them concurrently.
        let (pros, cons) = tokio::join!(
            self.generate_aspect("positive", &pros_prompt),
            self.generate_aspect("negative", &cons_prompt),
        );

        SummaryOutcome { pros, cons }
    }

    /// One aspect call with per-call timeout and the configured retry
    /// policy. Retries are off by default.
    async fn generate_aspect(&self, aspect: &str, prompt: &str) -> Result<String> {
        let mut backoff: ExponentialBackoff<backoff::SystemClock> = ExponentialBackoff {
            current_interval: self.config.retry_delay,
            initial_interval: self.config.retry_delay,
            max_interval: self.config.retry_delay * 8,
            multiplier: 2.0,
            max_elapsed_time: None,
            ..Default::default()
        };

        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            match self.generate_once(prompt).await {
                Ok(text) => return Ok(text),
                Err(e) => {
                    warn!("{} aspect call failed on attempt {}: {}", aspect, attempt + 1, e);
                    last_error = Some(e);

                    if attempt < self.config.max_retries {
                        if let Some(delay) = backoff.next_backoff() {
                            tokio::time::sleep(delay).await;
                            continue;
                        }
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            AnalysisError::General(format!("{} aspect call failed without an error", aspect))
        }))
    }

    async fn generate_once(&self, prompt: &str) -> Result<String> {
        match timeout(self.config.request_timeout, self.generator.generate(prompt)).await {
            Ok(result) => result,
            Err(_) => Err(AnalysisError::ServiceUnavailable(format!(
                "no response from {} within {:?}",
                self.generator.backend_name(),
                self.config.request_timeout
            ))),
        }
    }
}

/// Concatenate all document texts into a single context block.
fn stuff_documents(documents: &[Document]) -> String {
    documents
        .iter()
        .map(|document| document.text())
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn render_prompt(template: &str, context: &str) -> String {
    template.replace("{context}", context)
}

/// Mock text generator for development and testing
pub struct MockGenerator {
    name: String,
    response_delay_ms: u64,
    canned_response: String,
    fail_when_contains: Option<String>,
}

impl MockGenerator {
    pub fn new(name: String) -> Self {
        Self {
            name,
            response_delay_ms: 0,
            canned_response: "- Mock aspect summary.".to_string(),
            fail_when_contains: None,
        }
    }

    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.response_delay_ms = delay_ms;
        self
    }

    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        self.canned_response = response.into();
        self
    }

    /// Simulate a service outage for prompts containing `needle`.
    pub fn failing_when(mut self, needle: impl Into<String>) -> Self {
        self.fail_when_contains = Some(needle.into());
        self
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    fn backend_name(&self) -> String {
        format!("Mock Generator ({})", self.name)
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        if self.response_delay_ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(self.response_delay_ms)).await;
        }

        if let Some(needle) = &self.fail_when_contains {
            if prompt.contains(needle) {
                return Err(AnalysisError::ServiceUnavailable(format!(
                    "simulated outage in {}",
                    self.name
                )));
            }
        }

        Ok(self.canned_response.clone())
    }
}
