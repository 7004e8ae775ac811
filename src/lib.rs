pub mod types;
pub mod normalizer;
pub mod frequency;
pub mod corpus;
pub mod summarizer;
pub mod ollama;
pub mod pipeline;
pub mod store;
pub mod stats;

pub use types::*;
pub use corpus::assemble;
pub use frequency::{rank, DEFAULT_TOP_K};
pub use ollama::OllamaGenerator;
pub use pipeline::ReviewPipeline;
pub use stats::EntityStats;
pub use store::ReviewStore;
pub use summarizer::{AspectSummarizer, MockGenerator, SummaryOutcome, TextGenerator};
