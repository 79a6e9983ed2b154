use serde::{Deserialize, Serialize};

/// The `{id, keyword, slug}` view of an entry that duplicate detection reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordRecord {
    pub id: String,
    #[serde(default)]
    pub keyword: String,
    #[serde(default)]
    pub slug: String,
}

impl KeywordRecord {
    pub fn new(id: impl Into<String>, keyword: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            keyword: keyword.into(),
            slug: slug.into(),
        }
    }
}
