use std::fmt::Write as _;

use anyhow::{Result, bail};
use clap::ValueEnum;
use jiff::Timestamp;

use crate::commands::check::{self, DuplicateCheck};
use crate::db::Database;
use crate::helpers::entry_not_found;
use crate::id::generate_id;
use crate::models::{Collection, Entry};
use crate::similarity::Detector;
use crate::slug::{slugify, unique_slug};

/// An entry that was written, plus the duplicate check that preceded it
/// (`None` when checking is turned off).
#[derive(Debug)]
pub struct Saved {
    pub entry: Entry,
    pub check: Option<DuplicateCheck>,
}

/// How a save treats near-duplicate keywords.
pub struct Guard<'a> {
    /// `None` disables the check entirely.
    pub detector: Option<&'a Detector>,
    /// Save even when duplicates are found.
    pub force: bool,
}

/// Which entries `list` shows, by published state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum StatusFilter {
    #[default]
    All,
    Published,
    Draft,
}

impl StatusFilter {
    fn accepts(self, entry: &Entry) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Published => entry.published,
            StatusFilter::Draft => !entry.published,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum SortOrder {
    /// Newest first
    #[default]
    Date,
    /// Alphabetical by keyword
    Keyword,
}

#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    /// Case-insensitive substring of the keyword.
    pub search: Option<String>,
    pub status: StatusFilter,
    pub sort: SortOrder,
}

/// The entries a `list` selected, with published and draft counts over the
/// whole collection.
#[derive(Debug)]
pub struct Listing {
    pub entries: Vec<Entry>,
    pub published: usize,
    pub drafts: usize,
}

impl Listing {
    pub fn total(&self) -> usize {
        self.published + self.drafts
    }
}

fn validate_keyword(keyword: &str) -> Result<String> {
    let keyword = keyword.trim();
    if keyword.is_empty() {
        bail!("Keyword must not be empty");
    }
    Ok(keyword.to_owned())
}

fn guard_duplicates(
    db: &Database,
    collection: Collection,
    keyword: &str,
    exclude_id: Option<&str>,
    guard: &Guard,
) -> Result<Option<DuplicateCheck>> {
    let Some(detector) = guard.detector else {
        return Ok(None);
    };

    let result = check::run(db, collection, keyword, exclude_id, detector);
    if let DuplicateCheck::Duplicates { matches } = &result {
        if !guard.force {
            let mut message = format!(
                "Keyword \"{keyword}\" looks like a duplicate of existing {collection} entries:"
            );
            for m in matches {
                let _ = write!(message, "\n  {} {} ({}%)", m.id, m.keyword, m.similarity);
            }
            message.push_str("\nUse --force to save anyway.");
            bail!(message);
        }
    }

    Ok(Some(result))
}

fn taken_slugs<'a>(db: &'a Database, collection: Collection, except: Option<&str>) -> Vec<&'a str> {
    db.list_entries(collection)
        .into_iter()
        .filter(|e| Some(e.id.as_str()) != except)
        .map(|e| e.slug.as_str())
        .collect()
}

pub fn add(
    collection: Collection,
    keyword: String,
    slug: Option<String>,
    published: bool,
    guard: &Guard,
    db: &mut Database,
) -> Result<Saved> {
    let keyword = validate_keyword(&keyword)?;
    let check = guard_duplicates(db, collection, &keyword, None, guard)?;

    let id = generate_id();
    let now = Timestamp::now();
    let base = slugify(slug.as_deref().unwrap_or(&keyword));
    let slug = unique_slug(&base, taken_slugs(db, collection, None), &id, now);

    let mut entry = Entry::new(id, collection, keyword, slug, now);
    entry.published = published;

    db.create_entry(entry.clone())?;
    Ok(Saved { entry, check })
}

pub fn edit(
    id: &str,
    keyword: Option<String>,
    slug: Option<String>,
    published: Option<bool>,
    guard: &Guard,
    db: &mut Database,
) -> Result<Saved> {
    let Some(existing) = db.get_entry(id) else {
        return Err(entry_not_found(id, &db.entry_ids()));
    };
    let mut entry = existing.clone();

    let mut check = None;
    if let Some(keyword) = keyword {
        let keyword = validate_keyword(&keyword)?;
        check = guard_duplicates(db, entry.collection, &keyword, Some(id), guard)?;
        entry.keyword = keyword;
    }

    let now = Timestamp::now();
    if let Some(slug) = slug {
        let base = slugify(&slug);
        entry.slug = unique_slug(&base, taken_slugs(db, entry.collection, Some(id)), id, now);
    }

    if let Some(published) = published {
        entry.published = published;
    }

    entry.updated_at = now;
    db.update_entry(entry.clone())?;
    Ok(Saved { entry, check })
}

pub fn list(collection: Collection, options: &ListOptions, db: &Database) -> Listing {
    let all = db.list_entries(collection);
    let published = all.iter().filter(|e| e.published).count();
    let drafts = all.len() - published;

    let search = options.search.as_deref().map(str::to_lowercase);
    let mut entries: Vec<Entry> = all
        .into_iter()
        .filter(|e| options.status.accepts(e))
        .filter(|e| {
            search
                .as_deref()
                .is_none_or(|s| e.keyword.to_lowercase().contains(s))
        })
        .cloned()
        .collect();

    match options.sort {
        SortOrder::Date => entries
            .sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id))),
        SortOrder::Keyword => entries.sort_by_cached_key(|e| e.keyword.to_lowercase()),
    }

    Listing {
        entries,
        published,
        drafts,
    }
}

pub fn show(id: &str, db: &Database) -> Result<Entry> {
    db.get_entry(id)
        .cloned()
        .ok_or_else(|| entry_not_found(id, &db.entry_ids()))
}

pub fn remove(id: &str, db: &mut Database) -> Result<Entry> {
    if db.get_entry(id).is_none() {
        return Err(entry_not_found(id, &db.entry_ids()));
    }
    db.delete_entry(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use std::collections::HashSet;
    use tempfile::TempDir;

    #[fixture]
    fn db() -> (TempDir, Database) {
        let dir = TempDir::new().unwrap();
        let db = Database::open(dir.path()).unwrap();
        db.init_schema().unwrap();
        (dir, db)
    }

    fn checked(detector: &Detector) -> Guard<'_> {
        Guard {
            detector: Some(detector),
            force: false,
        }
    }

    /// Adds an unpublished entry with a generated slug.
    fn save(
        db: &mut Database,
        collection: Collection,
        keyword: &str,
        guard: &Guard,
    ) -> Result<Saved> {
        add(collection, keyword.into(), None, false, guard, db)
    }

    #[rstest]
    fn add_generates_id_and_slug(db: (TempDir, Database)) {
        let (_dir, mut db) = db;
        let detector = Detector::default();
        let saved = save(&mut db, Collection::Dream, "  돼지 꿈 ", &checked(&detector)).unwrap();

        assert_eq!(saved.entry.id.len(), 8);
        assert_eq!(saved.entry.keyword, "돼지 꿈");
        assert_eq!(saved.entry.slug, "돼지-꿈");
        assert!(!saved.entry.published);
        assert_eq!(saved.check, Some(DuplicateCheck::Clear));
    }

    #[rstest]
    #[case::empty("")]
    #[case::blank("   ")]
    fn add_rejects_blank_keyword(db: (TempDir, Database), #[case] keyword: &str) {
        let (_dir, mut db) = db;
        let detector = Detector::default();
        let err = save(&mut db, Collection::Dream, keyword, &checked(&detector)).unwrap_err();
        assert!(err.to_string().contains("must not be empty"));
    }

    // A near-identical keyword is refused unless forced, and the forced
    // save gets a distinct slug.
    #[rstest]
    fn add_refuses_duplicates_without_force(db: (TempDir, Database)) {
        let (_dir, mut db) = db;
        let detector = Detector::default();
        let first = save(&mut db, Collection::Dream, "뱀꿈", &checked(&detector)).unwrap();

        let slug = Some("뱀꿈".to_string());
        let err = add(
            Collection::Dream,
            "뱀 꿈".into(),
            slug.clone(),
            false,
            &checked(&detector),
            &mut db,
        )
        .unwrap_err();
        let message = err.to_string();
        assert!(message.contains(&first.entry.id));
        assert!(message.contains("(100%)"));
        assert_eq!(db.list_entries(Collection::Dream).len(), 1);

        let forced = Guard {
            detector: Some(&detector),
            force: true,
        };
        let saved = add(Collection::Dream, "뱀 꿈".into(), slug, false, &forced, &mut db).unwrap();
        assert_eq!(saved.check.unwrap().matches().len(), 1);
        assert_ne!(saved.entry.slug, first.entry.slug);
        assert!(saved.entry.slug.starts_with("뱀꿈-"));
    }

    // Collections are separate corpora.
    #[rstest]
    fn add_checks_only_same_collection(db: (TempDir, Database)) {
        let (_dir, mut db) = db;
        let detector = Detector::default();
        save(&mut db, Collection::Dream, "사주", &checked(&detector)).unwrap();
        let saved = save(&mut db, Collection::Dictionary, "사주", &checked(&detector)).unwrap();
        assert_eq!(saved.check, Some(DuplicateCheck::Clear));
    }

    #[rstest]
    fn add_without_detector_skips_check(db: (TempDir, Database)) {
        let (_dir, mut db) = db;
        let unchecked = Guard {
            detector: None,
            force: false,
        };
        save(&mut db, Collection::Dream, "뱀꿈", &unchecked).unwrap();
        let saved = save(&mut db, Collection::Dream, "뱀꿈", &unchecked).unwrap();
        assert!(saved.check.is_none());
    }

    // Re-saving an entry under its own keyword must not flag itself.
    #[rstest]
    fn edit_excludes_the_entry_itself(db: (TempDir, Database)) {
        let (_dir, mut db) = db;
        let detector = Detector::default();
        let saved = save(&mut db, Collection::Dream, "뱀꿈", &checked(&detector)).unwrap();

        let edited = edit(
            &saved.entry.id,
            Some("뱀-꿈".into()),
            None,
            Some(true),
            &checked(&detector),
            &mut db,
        )
        .unwrap();

        assert_eq!(edited.entry.keyword, "뱀-꿈");
        assert_eq!(edited.entry.slug, "뱀꿈");
        assert!(edited.entry.published);
        assert_eq!(edited.check, Some(DuplicateCheck::Clear));
    }

    #[rstest]
    fn edit_refuses_collision_with_other_entry(db: (TempDir, Database)) {
        let (_dir, mut db) = db;
        let detector = Detector::default();
        save(&mut db, Collection::Dream, "뱀꿈", &checked(&detector)).unwrap();
        let tiger = save(&mut db, Collection::Dream, "호랑이꿈", &checked(&detector)).unwrap();

        let id = &tiger.entry.id;
        assert!(edit(id, Some("뱀꿈".into()), None, None, &checked(&detector), &mut db).is_err());
        assert_eq!(db.get_entry(id).unwrap().keyword, "호랑이꿈");
    }

    #[rstest]
    fn edit_slug_is_slugified_and_unique(db: (TempDir, Database)) {
        let (_dir, mut db) = db;
        let detector = Detector::default();
        save(&mut db, Collection::Dream, "Big Snake", &checked(&detector)).unwrap();
        let tiger = save(&mut db, Collection::Dream, "호랑이꿈", &checked(&detector)).unwrap();

        let id = &tiger.entry.id;
        let edited = edit(id, None, Some("Big Snake".into()), None, &checked(&detector), &mut db)
            .unwrap();
        assert!(edited.entry.slug.starts_with("big-snake-"));
        assert!(edited.check.is_none());
    }

    // Three forced saves of one keyword, possibly within the same second,
    // still end up with three distinct slugs.
    #[rstest]
    fn forced_saves_never_share_a_slug(db: (TempDir, Database)) {
        let (_dir, mut db) = db;
        let detector = Detector::default();
        let forced = Guard {
            detector: Some(&detector),
            force: true,
        };

        let slugs: HashSet<String> = (0..3)
            .map(|_| save(&mut db, Collection::Dream, "뱀꿈", &forced).unwrap().entry.slug)
            .collect();
        assert_eq!(slugs.len(), 3);
        assert!(slugs.contains("뱀꿈"));
    }

    /// Three dreams (two published) and one column, a second apart.
    fn seed(db: &mut Database) {
        let rows = [
            ("a1", Collection::Dream, "Tiger Dream", true, 1_000),
            ("a2", Collection::Dream, "뱀꿈", false, 2_000),
            ("a3", Collection::Dream, "돼지꿈", true, 3_000),
            ("b1", Collection::Column, "뱀꿈 이야기", false, 4_000),
        ];
        for (id, collection, keyword, published, second) in rows {
            let now = Timestamp::from_second(second).unwrap();
            let mut entry = Entry::new(id.into(), collection, keyword.into(), id.into(), now);
            entry.published = published;
            db.create_entry(entry).unwrap();
        }
    }

    fn listed_ids(options: &ListOptions, db: &Database) -> Vec<String> {
        list(Collection::Dream, options, db)
            .entries
            .into_iter()
            .map(|e| e.id)
            .collect()
    }

    #[rstest]
    fn list_defaults_to_newest_first(db: (TempDir, Database)) {
        let (_dir, mut db) = db;
        seed(&mut db);

        let listing = list(Collection::Dream, &ListOptions::default(), &db);
        let ids: Vec<&str> = listing.entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["a3", "a2", "a1"]);
        assert_eq!((listing.published, listing.drafts), (2, 1));
        assert_eq!(listing.total(), 3);
    }

    #[rstest]
    fn list_sorts_by_keyword(db: (TempDir, Database)) {
        let (_dir, mut db) = db;
        seed(&mut db);

        let options = ListOptions {
            sort: SortOrder::Keyword,
            ..ListOptions::default()
        };
        assert_eq!(listed_ids(&options, &db), vec!["a1", "a3", "a2"]);
    }

    #[rstest]
    #[case::all(StatusFilter::All, vec!["a3", "a2", "a1"])]
    #[case::published(StatusFilter::Published, vec!["a3", "a1"])]
    #[case::draft(StatusFilter::Draft, vec!["a2"])]
    fn list_filters_by_status(
        db: (TempDir, Database),
        #[case] status: StatusFilter,
        #[case] expected: Vec<&str>,
    ) {
        let (_dir, mut db) = db;
        seed(&mut db);

        let options = ListOptions {
            status,
            ..ListOptions::default()
        };
        assert_eq!(listed_ids(&options, &db), expected);
    }

    // Search narrows the entries but the counts still cover the collection.
    #[rstest]
    #[case::ascii_any_case("TIGER", vec!["a1"])]
    #[case::hangul("꿈", vec!["a3", "a2"])]
    #[case::no_match("용", vec![])]
    fn list_searches_keywords(
        db: (TempDir, Database),
        #[case] search: &str,
        #[case] expected: Vec<&str>,
    ) {
        let (_dir, mut db) = db;
        seed(&mut db);

        let options = ListOptions {
            search: Some(search.into()),
            ..ListOptions::default()
        };
        assert_eq!(listed_ids(&options, &db), expected);
        let listing = list(Collection::Dream, &options, &db);
        assert_eq!((listing.published, listing.drafts), (2, 1));
    }

    #[rstest]
    fn unknown_id_suggests_near_miss(db: (TempDir, Database)) {
        let (_dir, mut db) = db;
        let detector = Detector::default();
        let saved = save(&mut db, Collection::Dream, "뱀꿈", &checked(&detector)).unwrap();

        let mut typo = saved.entry.id.clone();
        typo.pop();
        typo.push('_');
        let err = show(&typo, &db).unwrap_err();
        assert!(err.to_string().contains("Did you mean"));
    }

    #[rstest]
    fn remove_deletes_entry(db: (TempDir, Database)) {
        let (_dir, mut db) = db;
        let detector = Detector::default();
        let saved = save(&mut db, Collection::Column, "올해의 운세", &checked(&detector)).unwrap();

        let removed = remove(&saved.entry.id, &mut db).unwrap();
        assert_eq!(removed.id, saved.entry.id);
        let listing = list(Collection::Column, &ListOptions::default(), &db);
        assert!(listing.entries.is_empty());
        assert!(remove(&saved.entry.id, &mut db).is_err());
    }
}
