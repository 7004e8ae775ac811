use crate::types::Review;
use serde::{Deserialize, Serialize};

/// Headline numbers for one entity's review set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityStats {
    pub average_rating: f64,
    pub total_reviews: usize,
    pub positive: usize,
    pub negative: usize,
}

impl EntityStats {
    pub fn from_reviews(reviews: &[Review]) -> Self {
        let total_reviews = reviews.len();
        let average_rating = if total_reviews == 0 {
            0.0
        } else {
            reviews.iter().map(|review| review.rating).sum::<f64>() / total_reviews as f64
        };
        let positive = reviews
            .iter()
            .filter(|review| review.sentiment == "positive")
            .count();
        let negative = reviews
            .iter()
            .filter(|review| review.sentiment == "negative")
            .count();

        Self {
            average_rating,
            total_reviews,
            positive,
            negative,
        }
    }

    /// Positive-to-negative ratio, with the denominator clamped to 1 so the
    /// rendering stays meaningful when there are no negative reviews.
    pub fn ratio_text(&self) -> String {
        format!("{}:{}", self.positive, std::cmp::max(self.negative, 1))
    }
}
