//! Keyword similarity: normalization, edit distance and the scoring
//! strategies the duplicate detector is built on.

mod detector;
mod normalize;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

pub use detector::{DUPLICATE_THRESHOLD, Detector, SimilarityResult, find_similar};
pub use normalize::normalize;

/// Levenshtein distance counted in Unicode scalar values.
pub fn edit_distance(a: &str, b: &str) -> usize {
    strsim::levenshtein(a, b)
}

/// Similarity of two keywords in `[0.0, 1.0]`, where 1.0 means identical
/// after normalization.
pub fn similarity(a: &str, b: &str) -> f64 {
    let (na, nb) = (normalize(a), normalize(b));
    if let Some(score) = trivial_score(&na, &nb) {
        return score;
    }

    let longest = na.chars().count().max(nb.chars().count());
    1.0 - edit_distance(&na, &nb) as f64 / longest as f64
}

/// Equal forms (both empty included) score 1.0, a single empty side 0.0.
/// The equality check has to come first.
fn trivial_score(na: &str, nb: &str) -> Option<f64> {
    if na == nb {
        Some(1.0)
    } else if na.is_empty() || nb.is_empty() {
        Some(0.0)
    } else {
        None
    }
}

/// A way of scoring how alike two keywords are, in `[0.0, 1.0]`.
pub trait Similarity {
    fn score(&self, a: &str, b: &str) -> f64;
}

impl<F> Similarity for F
where
    F: Fn(&str, &str) -> f64,
{
    fn score(&self, a: &str, b: &str) -> f64 {
        self(a, b)
    }
}

/// Normalized Levenshtein similarity. The default strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct EditDistance;

impl Similarity for EditDistance {
    fn score(&self, a: &str, b: &str) -> f64 {
        similarity(a, b)
    }
}

/// Jaro-Winkler over normalized keywords. Rewards shared prefixes, which
/// suits keywords like "돼지꿈" / "돼지꿈해몽".
#[derive(Debug, Clone, Copy, Default)]
pub struct JaroWinkler;

impl Similarity for JaroWinkler {
    fn score(&self, a: &str, b: &str) -> f64 {
        let (na, nb) = (normalize(a), normalize(b));
        trivial_score(&na, &nb).unwrap_or_else(|| strsim::jaro_winkler(&na, &nb))
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumString,
    clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Metric {
    #[default]
    Levenshtein,
    JaroWinkler,
}

impl Metric {
    pub fn strategy(self) -> Box<dyn Similarity + Send + Sync> {
        match self {
            Metric::Levenshtein => Box::new(EditDistance),
            Metric::JaroWinkler => Box::new(JaroWinkler),
        }
    }
}
