use crate::corpus::assemble;
use crate::frequency::{rank, DEFAULT_TOP_K};
use crate::summarizer::AspectSummarizer;
use crate::types::{AspectSummary, PipelineResult, Review};
use chrono::Utc;
use std::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Entry point for analyzing one entity's reviews.
///
/// Runs the frequency branch and the summarization branch over the same
/// review texts and merges both outcomes into a single result. Neither
/// branch's failure aborts the other, and `run` itself never fails: every
/// error is captured in the result's per-branch error fields.
pub struct ReviewPipeline {
    summarizer: AspectSummarizer,
    top_k: usize,
}

impl ReviewPipeline {
    pub fn new(summarizer: AspectSummarizer) -> Self {
        Self {
            summarizer,
            top_k: DEFAULT_TOP_K,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub async fn run(&self, reviews: &[Review]) -> PipelineResult {
        let started = Instant::now();
        let run_id = Uuid::new_v4();
        info!("Running review pipeline {} over {} reviews", run_id, reviews.len());

        let texts: Vec<&str> = reviews.iter().map(|review| review.text.as_str()).collect();

        let (top_terms, terms_error) = match rank(&texts, self.top_k) {
            Ok(terms) => (terms, None),
            Err(e) => {
                warn!("Frequency ranking failed for run {}: {}", run_id, e);
                (Vec::new(), Some(e.to_string()))
            }
        };

        let documents = assemble(&texts);
        let outcome = self.summarizer.summarize(&documents).await;

        let mut failures = Vec::new();
        let pros = match outcome.pros {
            Ok(text) => text,
            Err(e) => {
                warn!("Positive aspect summary failed for run {}: {}", run_id, e);
                failures.push(format!("positive: {}", e));
                AspectSummary::UNAVAILABLE.to_string()
            }
        };
        let cons = match outcome.cons {
            Ok(text) => text,
            Err(e) => {
                warn!("Negative aspect summary failed for run {}: {}", run_id, e);
                failures.push(format!("negative: {}", e));
                AspectSummary::UNAVAILABLE.to_string()
            }
        };

        let summary_error = if failures.is_empty() {
            None
        } else {
            Some(failures.join("; "))
        };

        let elapsed_ms = started.elapsed().as_millis() as u64;
        debug!("Pipeline run {} finished in {}ms", run_id, elapsed_ms);

        PipelineResult {
            run_id,
            top_terms,
            summary: AspectSummary { pros, cons },
            terms_error,
            summary_error,
            generated_at: Utc::now(),
            elapsed_ms,
        }
    }
}
