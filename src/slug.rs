use std::collections::HashSet;

use jiff::Timestamp;

/// URL slug for a keyword: whitespace runs become `-`, everything is
/// lower-cased, Hangul is kept verbatim.
pub fn slugify(keyword: &str) -> String {
    keyword
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
}

/// Picks a slug that no other entry in the collection uses.
///
/// A colliding slug gets the creation time appended, then a counter if
/// that is taken too (`뱀꿈-1700000000-2`). An empty one falls back to the
/// entry id.
pub fn unique_slug<'a, I>(base: &str, taken: I, id: &str, now: Timestamp) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    if base.is_empty() {
        return id.to_owned();
    }

    let taken: HashSet<&str> = taken.into_iter().collect();
    if !taken.contains(base) {
        return base.to_owned();
    }

    let stamped = format!("{base}-{}", now.as_second());
    let mut candidate = stamped.clone();
    let mut n = 1;
    while taken.contains(candidate.as_str()) {
        n += 1;
        candidate = format!("{stamped}-{n}");
    }
    candidate
}
