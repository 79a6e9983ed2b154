use std::collections::HashMap;
use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use fs2::FileExt;
use strum::IntoEnumIterator;
use tracing::{debug, warn};

use crate::models::{Collection, Entry, KeywordRecord};

/// Atomically write content to a file using a temporary file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    let temp = path.with_extension("toml.tmp");
    let mut file = File::create(&temp)
        .with_context(|| format!("Failed to create temporary file: {}", temp.display()))?;
    file.lock_exclusive()
        .context("Failed to acquire file lock")?;
    file.write_all(content)
        .context("Failed to write file content")?;
    file.sync_all().context("Failed to sync file")?;
    FileExt::unlock(&file).context("Failed to unlock file")?;
    fs::rename(&temp, path).with_context(|| format!("Failed to rename to {}", path.display()))?;
    Ok(())
}

/// Where duplicate detection gets its corpus from.
///
/// Passed explicitly to whatever runs a check so the catalog backing it can
/// be swapped (a remote content store, a fixture in tests).
pub trait KeywordSource {
    fn fetch_keywords(&self, collection: Collection) -> Result<Vec<KeywordRecord>>;
}

/// The keyword catalog: one TOML file per entry under
/// `.muun/<collection>/<id>.toml`, held in memory once opened.
///
/// Entry files that cannot be read or parsed are left out and remembered.
/// The rest of the catalog stays usable, but that collection's keyword
/// corpus is incomplete, so `fetch_keywords` fails for it.
pub struct Database {
    path: PathBuf,
    entries: HashMap<String, Entry>,
    unreadable: Vec<(Collection, PathBuf)>,
}

impl Database {
    /// Open an existing catalog from the given directory.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if !path.exists() {
            bail!("Catalog directory does not exist: {}", path.display());
        }

        let mut db = Self {
            path,
            entries: HashMap::new(),
            unreadable: Vec::new(),
        };

        db.load()?;
        Ok(db)
    }

    /// Create one directory per collection. The `.muun/` directory must
    /// already exist.
    pub fn init_schema(&self) -> Result<()> {
        for collection in Collection::iter() {
            let dir = self.path.join(collection.as_ref());
            fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }
        Ok(())
    }

    /// The base path for the `.muun/` directory.
    pub fn base_path(&self) -> &Path {
        &self.path
    }

    fn load(&mut self) -> Result<()> {
        for collection in Collection::iter() {
            let dir = self.path.join(collection.as_ref());
            if !dir.is_dir() {
                continue;
            }

            let listing = fs::read_dir(&dir).with_context(|| {
                format!("Failed to read collection directory: {}", dir.display())
            })?;

            for item in listing {
                let item = item.context("Failed to read entry file")?;
                let entry_path = item.path();

                if entry_path.extension() != Some(OsStr::new("toml")) {
                    continue;
                }

                match Self::read_entry(&entry_path) {
                    Ok(entry) => {
                        self.entries.insert(entry.id.clone(), entry);
                    }
                    Err(err) => {
                        let error = format!("{err:#}");
                        warn!(%collection, %error, "skipping unreadable entry");
                        self.unreadable.push((collection, entry_path));
                    }
                }
            }
        }

        debug!(
            entries = self.entries.len(),
            unreadable = self.unreadable.len(),
            path = %self.path.display(),
            "catalog loaded"
        );
        Ok(())
    }

    fn read_entry(path: &Path) -> Result<Entry> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Entry files of a collection that were skipped on load.
    pub fn unreadable_files(&self, collection: Collection) -> Vec<&Path> {
        self.unreadable
            .iter()
            .filter(|(c, _)| *c == collection)
            .map(|(_, path)| path.as_path())
            .collect()
    }

    pub fn create_entry(&mut self, entry: Entry) -> Result<()> {
        if self.entries.contains_key(&entry.id) {
            bail!("Entry already exists: {}", entry.id);
        }

        let dir = self.path.join(entry.collection.as_ref());
        fs::create_dir_all(&dir).context("Failed to create collection directory")?;

        entry.write_file(&self.path)?;
        self.entries.insert(entry.id.clone(), entry);

        Ok(())
    }

    /// Persist changes to an entry that already exists.
    pub fn update_entry(&mut self, entry: Entry) -> Result<()> {
        if !self.entries.contains_key(&entry.id) {
            bail!("Entry not found: {}", entry.id);
        }

        entry.write_file(&self.path)?;
        self.entries.insert(entry.id.clone(), entry);

        Ok(())
    }

    pub fn delete_entry(&mut self, id: &str) -> Result<Entry> {
        let Some(entry) = self.entries.remove(id) else {
            bail!("Entry not found: {id}");
        };

        let path = entry.file_path(&self.path);
        fs::remove_file(&path).with_context(|| format!("Failed to remove {}", path.display()))?;

        Ok(entry)
    }

    pub fn get_entry(&self, id: &str) -> Option<&Entry> {
        self.entries.get(id)
    }

    pub fn entry_ids(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    /// Entries of one collection, oldest first.
    pub fn list_entries(&self, collection: Collection) -> Vec<&Entry> {
        let mut entries: Vec<&Entry> = self
            .entries
            .values()
            .filter(|e| e.collection == collection)
            .collect();
        entries.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        entries
    }
}

impl KeywordSource for Database {
    fn fetch_keywords(&self, collection: Collection) -> Result<Vec<KeywordRecord>> {
        let unreadable = self.unreadable_files(collection);
        if !unreadable.is_empty() {
            let files: Vec<String> = unreadable.iter().map(|p| p.display().to_string()).collect();
            bail!(
                "{} {collection} entry file(s) could not be read: {}",
                files.len(),
                files.join(", ")
            );
        }

        Ok(self
            .list_entries(collection)
            .into_iter()
            .map(KeywordRecord::from)
            .collect())
    }
}
