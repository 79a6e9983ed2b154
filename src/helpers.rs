use anyhow::{Error, anyhow};
use strsim::levenshtein;

/// Find the most similar ID from a list of candidates
pub fn find_similar_id<'a>(target: &str, candidates: &[&'a str]) -> Option<&'a str> {
    candidates
        .iter()
        .map(|&candidate| (candidate, levenshtein(target, candidate)))
        .filter(|(_, distance)| *distance <= 2)
        .min_by_key(|(_, distance)| *distance)
        .map(|(id, _)| id)
}

/// "Entry not found" error, with a suggestion when a near-miss id exists.
pub fn entry_not_found(id: &str, known_ids: &[&str]) -> Error {
    match find_similar_id(id, known_ids) {
        Some(suggestion) => anyhow!("Entry not found: {id}\nDid you mean: {suggestion}"),
        None => anyhow!("Entry not found: {id}"),
    }
}
