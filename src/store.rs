use crate::types::{AnalysisError, Result, Review};
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use std::time::SystemTime;
use tracing::{debug, info};

const REQUIRED_COLUMNS: [&str; 4] = ["Name", "caption", "rating", "sentiment_label"];

/// Caller-owned review table backed by a CSV file.
///
/// The parsed table is cached per store instance and re-read when the
/// file's modification time changes, so long-running callers see updated
/// reviews without restarting.
pub struct ReviewStore {
    path: PathBuf,
    cache: RwLock<Option<CachedTable>>,
}

struct CachedTable {
    modified: SystemTime,
    reviews: Arc<Vec<Review>>,
}

impl ReviewStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: RwLock::new(None),
        }
    }

    /// Load the full review table, reusing the cached parse when the file
    /// has not been modified since.
    pub fn load(&self) -> Result<Arc<Vec<Review>>> {
        let modified = std::fs::metadata(&self.path)
            .and_then(|meta| meta.modified())
            .map_err(|e| {
                AnalysisError::DataAccess(format!("cannot stat {}: {}", self.path.display(), e))
            })?;

        if let Ok(cache) = self.cache.read() {
            if let Some(table) = cache.as_ref() {
                if table.modified == modified {
                    debug!("Review table cache hit for {}", self.path.display());
                    return Ok(table.reviews.clone());
                }
            }
        }

        let reviews = Arc::new(self.read_table()?);
        info!("Loaded {} reviews from {}", reviews.len(), self.path.display());

        if let Ok(mut cache) = self.cache.write() {
            *cache = Some(CachedTable {
                modified,
                reviews: reviews.clone(),
            });
        }

        Ok(reviews)
    }

    /// Distinct entity names in first-appearance order.
    pub fn entities(&self) -> Result<Vec<String>> {
        let reviews = self.load()?;

        let mut names: Vec<String> = Vec::new();
        for review in reviews.iter() {
            if !names.iter().any(|name| name == &review.entity) {
                names.push(review.entity.clone());
            }
        }
        Ok(names)
    }

    /// All reviews belonging to one entity, in table order.
    pub fn reviews_for(&self, entity: &str) -> Result<Vec<Review>> {
        let reviews = self.load()?;
        Ok(reviews
            .iter()
            .filter(|review| review.entity == entity)
            .cloned()
            .collect())
    }

    fn read_table(&self) -> Result<Vec<Review>> {
        let mut reader = csv::Reader::from_path(&self.path)?;

        let headers = reader.headers()?.clone();
        for required in REQUIRED_COLUMNS {
            if !headers.iter().any(|header| header == required) {
                return Err(AnalysisError::DataAccess(format!(
                    "review table {} is missing required column '{}'",
                    self.path.display(),
                    required
                )));
            }
        }

        let mut reviews = Vec::new();
        for record in reader.deserialize() {
            let review: Review = record?;
            reviews.push(review);
        }
        Ok(reviews)
    }
}
