use serde::Serialize;
use tracing::warn;

use crate::db::KeywordSource;
use crate::models::Collection;
use crate::similarity::{Detector, SimilarityResult};

/// Outcome of a duplicate check ahead of a save.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DuplicateCheck {
    Clear,
    Duplicates { matches: Vec<SimilarityResult> },
    /// The corpus could not be fetched; the save should go ahead unchecked.
    Skipped { reason: String },
}

impl DuplicateCheck {
    pub fn matches(&self) -> &[SimilarityResult] {
        match self {
            DuplicateCheck::Duplicates { matches } => matches,
            _ => &[],
        }
    }
}

/// Fetches the collection's keywords and scans them for near-duplicates of
/// `keyword`. Never fails: a fetch error degrades to `Skipped`.
pub fn run(
    source: &dyn KeywordSource,
    collection: Collection,
    keyword: &str,
    exclude_id: Option<&str>,
    detector: &Detector,
) -> DuplicateCheck {
    let corpus = match source.fetch_keywords(collection) {
        Ok(corpus) => corpus,
        Err(err) => {
            let reason = format!("{err:#}");
            warn!(%collection, error = %reason, "skipping duplicate check");
            return DuplicateCheck::Skipped { reason };
        }
    };

    let matches = detector.find_similar(keyword, &corpus, exclude_id);
    if matches.is_empty() {
        DuplicateCheck::Clear
    } else {
        DuplicateCheck::Duplicates { matches }
    }
}
