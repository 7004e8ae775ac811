use anyhow::Context;
use clap::Parser;
use review_aggregator::{
    ollama::DEFAULT_BASE_URL, AspectSummarizer, EntityStats, OllamaGenerator, ReviewPipeline,
    ReviewStore, SummaryConfig,
};
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "review-aggregator",
    about = "Analyze one restaurant's reviews: top terms plus model-generated pros and cons"
)]
struct Args {
    /// Path to the review table (CSV with Name, caption, rating, sentiment_label)
    #[arg(long, default_value = "data/clean_rews.csv")]
    data: PathBuf,

    /// Restaurant to analyze; omit to list the restaurants in the table
    #[arg(long)]
    restaurant: Option<String>,

    /// Ollama base URL (falls back to OLLAMA_BASE_URL, then localhost)
    #[arg(long)]
    base_url: Option<String>,

    /// Model used for aspect summaries
    #[arg(long, default_value = "llama3.2")]
    model: String,

    /// Sampling temperature
    #[arg(long, default_value_t = 0.5)]
    temperature: f32,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout_seconds: u64,

    /// Automatic retries per aspect call (off by default)
    #[arg(long, default_value_t = 0)]
    max_retries: u32,

    /// Number of top terms to report
    #[arg(long, default_value_t = 10)]
    top_k: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let store = ReviewStore::new(&args.data);
    let entities = store
        .entities()
        .with_context(|| format!("failed to load review table {}", args.data.display()))?;
    if entities.is_empty() {
        anyhow::bail!("no reviews available in {}", args.data.display());
    }

    let Some(restaurant) = args.restaurant else {
        println!("Available restaurants:");
        for name in entities {
            println!("  {}", name);
        }
        return Ok(());
    };

    let reviews = store.reviews_for(&restaurant)?;
    if reviews.is_empty() {
        anyhow::bail!("no reviews found for '{}'", restaurant);
    }

    let base_url = args
        .base_url
        .or_else(|| env::var("OLLAMA_BASE_URL").ok())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    let config = SummaryConfig {
        model: args.model,
        temperature: args.temperature,
        request_timeout: Duration::from_secs(args.timeout_seconds),
        max_retries: args.max_retries,
        ..SummaryConfig::default()
    };

    info!("Using backend at {} with model {}", base_url, config.model);

    let generator = Arc::new(OllamaGenerator::new(&base_url, &config)?);
    let summarizer = AspectSummarizer::new(generator).with_config(config);
    let pipeline = ReviewPipeline::new(summarizer).with_top_k(args.top_k);

    let stats = EntityStats::from_reviews(&reviews);
    let result = pipeline.run(&reviews).await;

    println!("=== {} ===", restaurant);
    println!("Average rating: {:.1}", stats.average_rating);
    println!("Total reviews:  {}", stats.total_reviews);
    println!("Positive/negative ratio: {}", stats.ratio_text());

    println!();
    println!("Top words:");
    if result.top_terms.is_empty() {
        println!("  (no terms after filtering)");
    }
    for entry in &result.top_terms {
        println!("  {:<20} {}", entry.term, entry.count);
    }
    if let Some(err) = &result.terms_error {
        println!("  [frequency branch failed: {}]", err);
    }

    println!();
    println!("Pros:");
    println!("{}", result.summary.pros);
    println!();
    println!("Cons:");
    println!("{}", result.summary.cons);
    if let Some(err) = &result.summary_error {
        println!();
        println!("[summary branch: {}]", err);
    }

    info!(
        "Pipeline run {} completed in {}ms",
        result.run_id, result.elapsed_ms
    );

    Ok(())
}
