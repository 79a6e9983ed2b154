use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{Collection, KeywordRecord};
use crate::db::atomic_write;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: String,
    pub collection: Collection,
    #[serde(default)]
    pub keyword: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub published: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Entry {
    pub fn new(
        id: String,
        collection: Collection,
        keyword: String,
        slug: String,
        now: Timestamp,
    ) -> Self {
        Self {
            id,
            collection,
            keyword,
            slug,
            published: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn file_path(&self, base: &Path) -> PathBuf {
        base.join(self.collection.as_ref())
            .join(format!("{}.toml", self.id))
    }

    pub fn write_file(&self, base: &Path) -> Result<()> {
        let path = self.file_path(base);
        let content = toml::to_string(self).context("Failed to serialize entry")?;
        atomic_write(&path, content.as_bytes())
    }

    pub fn to_record(&self) -> KeywordRecord {
        KeywordRecord::new(&self.id, &self.keyword, &self.slug)
    }
}

impl From<&Entry> for KeywordRecord {
    fn from(entry: &Entry) -> Self {
        entry.to_record()
    }
}
