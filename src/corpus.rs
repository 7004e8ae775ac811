use crate::types::Document;
use tracing::debug;

/// Convert raw review strings into the ordered document sequence submitted
/// to the summarization backend.
///
/// One document per review, order preserved. Empty reviews are kept as
/// empty documents rather than filtered; they contribute no content and the
/// summarizer tolerates them.
pub fn assemble(reviews: &[&str]) -> Vec<Document> {
    let documents: Vec<Document> = reviews.iter().map(|review| Document::new(*review)).collect();
    debug!("Assembled {} documents for summarization", documents.len());
    documents
}
