use serde::Serialize;
use tracing::debug;

use super::{EditDistance, Metric, Similarity};
use crate::models::KeywordRecord;

/// Keywords at or above this similarity are reported as likely duplicates.
pub const DUPLICATE_THRESHOLD: f64 = 0.90;

/// An existing keyword that looks like a duplicate of the query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimilarityResult {
    pub id: String,
    pub keyword: String,
    pub slug: String,
    /// Whole percent, `round(score * 100)`.
    pub similarity: u8,
}

impl SimilarityResult {
    fn new(record: &KeywordRecord, score: f64) -> Self {
        Self {
            id: record.id.clone(),
            keyword: record.keyword.clone(),
            slug: record.slug.clone(),
            similarity: to_percent(score),
        }
    }
}

fn to_percent(score: f64) -> u8 {
    // injected strategies may stray outside [0, 1]
    (score.clamp(0.0, 1.0) * 100.0).round() as u8
}

/// Scans a corpus for keywords similar to a query.
pub struct Detector {
    strategy: Box<dyn Similarity + Send + Sync>,
    threshold: f64,
}

impl Default for Detector {
    fn default() -> Self {
        Self::new(EditDistance)
    }
}

impl Detector {
    pub fn new<S>(strategy: S) -> Self
    where
        S: Similarity + Send + Sync + 'static,
    {
        Self {
            strategy: Box::new(strategy),
            threshold: DUPLICATE_THRESHOLD,
        }
    }

    pub fn for_metric(metric: Metric) -> Self {
        Self {
            strategy: metric.strategy(),
            threshold: DUPLICATE_THRESHOLD,
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Returns every record scoring at least the threshold against `query`,
    /// most similar first. Records with id `exclude_id` are never reported,
    /// which keeps an entry being edited from matching itself.
    pub fn find_similar(
        &self,
        query: &str,
        corpus: &[KeywordRecord],
        exclude_id: Option<&str>,
    ) -> Vec<SimilarityResult> {
        let mut results: Vec<SimilarityResult> = corpus
            .iter()
            .filter(|record| exclude_id != Some(record.id.as_str()))
            .filter_map(|record| {
                let score = self.strategy.score(query, &record.keyword);
                (score >= self.threshold).then(|| SimilarityResult::new(record, score))
            })
            .collect();

        // sort_by_key is stable, so ties keep corpus order
        results.sort_by_key(|r| std::cmp::Reverse(r.similarity));

        debug!(
            query,
            corpus = corpus.len(),
            matches = results.len(),
            "duplicate scan finished"
        );
        results
    }
}

/// Duplicate scan with the default edit-distance strategy at
/// [`DUPLICATE_THRESHOLD`].
pub fn find_similar(
    query: &str,
    corpus: &[KeywordRecord],
    exclude_id: Option<&str>,
) -> Vec<SimilarityResult> {
    Detector::default().find_similar(query, corpus, exclude_id)
}
