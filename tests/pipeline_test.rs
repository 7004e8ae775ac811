use async_trait::async_trait;
use review_aggregator::{
    assemble, AspectSummarizer, AspectSummary, MockGenerator, Result, Review, ReviewPipeline,
    SummaryConfig, TextGenerator,
};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

fn review(entity: &str, text: &str, rating: f64, sentiment: &str) -> Review {
    Review {
        entity: entity.to_string(),
        text: text.to_string(),
        rating,
        sentiment: sentiment.to_string(),
    }
}

fn sample_reviews() -> Vec<Review> {
    vec![
        review("Trattoria Roma", "Great service and tasty food", 5.0, "positive"),
        review("Trattoria Roma", "Slow service, food was cold", 2.0, "negative"),
    ]
}

fn pipeline_with(generator: Arc<dyn TextGenerator>, config: SummaryConfig) -> ReviewPipeline {
    ReviewPipeline::new(AspectSummarizer::new(generator).with_config(config))
}

#[test]
fn test_assembler_round_trip() {
    let reviews = ["first review", "", "third review"];
    let documents = assemble(&reviews);

    assert_eq!(documents.len(), reviews.len(), "one document per review");
    assert_eq!(documents[0].text(), "first review");
    assert!(documents[1].is_empty(), "empty reviews stay as empty documents");
    assert_eq!(documents[2].text(), "third review");
}

#[tokio::test]
async fn test_both_aspects_populated_on_success() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .try_init();

    let generator = Arc::new(MockGenerator::new("happy".to_string()).with_response("- Friendly staff."));
    let pipeline = pipeline_with(generator, SummaryConfig::default());

    let result = pipeline.run(&sample_reviews()).await;

    info!("Run {} produced {} terms", result.run_id, result.top_terms.len());

    assert_eq!(result.summary.pros, "- Friendly staff.");
    assert_eq!(result.summary.cons, "- Friendly staff.");
    assert!(result.summary.pros_available());
    assert!(result.summary.cons_available());
    assert!(result.summary_error.is_none());
    assert!(result.terms_error.is_none());
    assert!(!result.top_terms.is_empty(), "frequency branch should rank terms");
}

#[tokio::test]
async fn test_pros_failure_does_not_block_cons() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .try_init();

    // Only the positive-aspect prompt contains this phrase.
    let generator = Arc::new(
        MockGenerator::new("outage".to_string())
            .with_response("- Portions were small.")
            .failing_when("positive aspects"),
    );
    let pipeline = pipeline_with(generator, SummaryConfig::default());

    let result = pipeline.run(&sample_reviews()).await;

    assert_eq!(result.summary.pros, AspectSummary::UNAVAILABLE);
    assert!(!result.summary.pros_available());
    assert_eq!(result.summary.cons, "- Portions were small.");
    assert!(result.summary.cons_available());

    let error = result.summary_error.expect("failed aspect must be recorded");
    assert!(error.contains("positive"), "error should name the failed aspect: {}", error);
}

#[tokio::test]
async fn test_cons_failure_does_not_block_pros() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .try_init();

    let generator = Arc::new(
        MockGenerator::new("outage".to_string())
            .with_response("- Generous portions.")
            .failing_when("negative aspects"),
    );
    let pipeline = pipeline_with(generator, SummaryConfig::default());

    let result = pipeline.run(&sample_reviews()).await;

    assert_eq!(result.summary.pros, "- Generous portions.");
    assert_eq!(result.summary.cons, AspectSummary::UNAVAILABLE);

    let error = result.summary_error.expect("failed aspect must be recorded");
    assert!(error.contains("negative"), "error should name the failed aspect: {}", error);
}

#[tokio::test]
async fn test_total_outage_degrades_summaries_only() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .try_init();

    // Both prompts carry the reviews block, so both calls fail.
    let generator = Arc::new(MockGenerator::new("down".to_string()).failing_when("Reviews:"));
    let pipeline = pipeline_with(generator, SummaryConfig::default());

    let result = pipeline.run(&sample_reviews()).await;

    assert_eq!(result.summary, AspectSummary::unavailable());
    assert!(result.summary_error.is_some());
    assert!(
        !result.top_terms.is_empty(),
        "frequency branch must survive a summarizer outage"
    );
    assert!(result.terms_error.is_none());
}

#[tokio::test]
async fn test_empty_reviews_still_run_cleanly() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .try_init();

    let generator = Arc::new(
        MockGenerator::new("empty-context".to_string()).with_response("- Nothing to report."),
    );
    let pipeline = pipeline_with(generator, SummaryConfig::default());

    let result = pipeline.run(&[]).await;

    assert!(result.top_terms.is_empty());
    assert!(result.terms_error.is_none(), "an empty corpus is not an error");
    // The calls are still issued; empty-context policy belongs to the backend.
    assert_eq!(result.summary.pros, "- Nothing to report.");
    assert_eq!(result.summary.cons, "- Nothing to report.");
    assert!(result.summary_error.is_none());
}

#[tokio::test]
async fn test_timeout_surfaces_as_unavailable() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .try_init();

    let generator = Arc::new(MockGenerator::new("slow".to_string()).with_delay(300));
    let config = SummaryConfig {
        request_timeout: Duration::from_millis(50),
        ..SummaryConfig::default()
    };
    let pipeline = pipeline_with(generator, config);

    let result = pipeline.run(&sample_reviews()).await;

    assert_eq!(result.summary, AspectSummary::unavailable());
    let error = result.summary_error.expect("timeouts must be recorded");
    assert!(error.contains("unavailable"), "timeout surfaces as unavailability: {}", error);
}

#[tokio::test]
async fn test_aspect_calls_run_concurrently() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .try_init();

    let generator = Arc::new(MockGenerator::new("measured".to_string()).with_delay(200));
    let pipeline = pipeline_with(generator, SummaryConfig::default());

    let started = Instant::now();
    let result = pipeline.run(&sample_reviews()).await;
    let elapsed = started.elapsed();

    assert!(result.summary.pros_available());
    assert!(result.summary.cons_available());
    assert!(
        elapsed < Duration::from_millis(390),
        "two 200ms calls should overlap, took {:?}",
        elapsed
    );
}

/// Generator that fails a fixed number of times before recovering.
struct FlakyGenerator {
    failures_remaining: AtomicU32,
}

#[async_trait]
impl TextGenerator for FlakyGenerator {
    fn backend_name(&self) -> String {
        "Flaky Generator".to_string()
    }

    async fn generate(&self, _prompt: &str) -> Result<String> {
        let remaining = self.failures_remaining.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures_remaining.fetch_sub(1, Ordering::SeqCst);
            return Err(review_aggregator::AnalysisError::ServiceUnavailable(
                "transient outage".to_string(),
            ));
        }
        Ok("- Recovered.".to_string())
    }
}

#[tokio::test]
async fn test_opt_in_retry_recovers_from_transient_outage() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .try_init();

    // Both first attempts fail; the configured retry succeeds.
    let generator = Arc::new(FlakyGenerator {
        failures_remaining: AtomicU32::new(2),
    });
    let config = SummaryConfig {
        max_retries: 1,
        retry_delay: Duration::from_millis(10),
        ..SummaryConfig::default()
    };
    let pipeline = pipeline_with(generator, config);

    let result = pipeline.run(&sample_reviews()).await;

    assert_eq!(result.summary.pros, "- Recovered.");
    assert_eq!(result.summary.cons, "- Recovered.");
    assert!(result.summary_error.is_none());
}
