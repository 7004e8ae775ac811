use crate::normalizer::normalize;
use crate::types::{Result, TermFrequency};
use std::collections::HashMap;
use tracing::debug;

/// Default number of ranked terms returned.
pub const DEFAULT_TOP_K: usize = 10;

/// Count normalized terms across all reviews and return the `k` most
/// frequent, count descending. Equal counts keep the order in which the
/// term was first seen.
///
/// Reviews are joined with a single space before tokenizing; counts run
/// over the joined corpus, not per review. Degenerate input (no reviews,
/// or nothing left after filtering) yields an empty ranking, not an error.
pub fn rank(reviews: &[&str], k: usize) -> Result<Vec<TermFrequency>> {
    if reviews.is_empty() {
        return Ok(Vec::new());
    }

    let joined = reviews.join(" ");
    let tokens = normalize(&joined);

    let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
    for (position, token) in tokens.into_iter().enumerate() {
        let entry = counts.entry(token).or_insert((0, position));
        entry.0 += 1;
    }

    let mut ranked: Vec<(String, usize, usize)> = counts
        .into_iter()
        .map(|(term, (count, first_seen))| (term, count, first_seen))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
    ranked.truncate(k);

    debug!("Ranked top {} of {} requested terms", ranked.len(), k);

    Ok(ranked
        .into_iter()
        .map(|(term, count, _)| TermFrequency { term, count })
        .collect())
}
