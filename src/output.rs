use anyhow::Result;
use console::{Term, style};
use serde::Serialize;

use crate::commands::check::DuplicateCheck;
use crate::commands::entry::{Listing, Saved};
use crate::models::{Collection, Entry};
use crate::similarity::SimilarityResult;

pub struct Output {
    term: Term,
    json: bool,
}

#[derive(Serialize)]
struct CheckReport<'a> {
    collection: Collection,
    keyword: &'a str,
    #[serde(flatten)]
    check: &'a DuplicateCheck,
}

#[derive(Serialize)]
struct SavedReport<'a> {
    #[serde(flatten)]
    entry: &'a Entry,
    #[serde(skip_serializing_if = "Option::is_none")]
    duplicate_check: Option<&'a DuplicateCheck>,
}

impl Output {
    pub fn new(json: bool) -> Self {
        Self {
            term: Term::stdout(),
            json,
        }
    }

    fn print_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        let output = serde_json::to_string_pretty(value)?;
        self.term.write_line(&output)?;
        Ok(())
    }

    fn published_label(entry: &Entry) -> String {
        if entry.published {
            style("published").green().to_string()
        } else {
            style("draft").yellow().to_string()
        }
    }

    fn print_matches(&self, matches: &[SimilarityResult]) -> Result<()> {
        for m in matches {
            self.term.write_line(&format!(
                "  {} {} {} /{}",
                style(format!("{:>3}%", m.similarity)).red().bold(),
                style(&m.id).cyan(),
                m.keyword,
                style(&m.slug).dim()
            ))?;
        }
        Ok(())
    }

    fn print_check_note(&self, check: Option<&DuplicateCheck>) -> Result<()> {
        match check {
            Some(DuplicateCheck::Duplicates { matches }) => {
                self.term.write_line(&format!(
                    "  {}",
                    style("Saved despite similar keywords:").yellow()
                ))?;
                self.print_matches(matches)
            }
            Some(DuplicateCheck::Skipped { reason }) => {
                self.term.write_line(&format!(
                    "  {} {}",
                    style("Duplicate check skipped:").yellow(),
                    reason
                ))?;
                Ok(())
            }
            Some(DuplicateCheck::Clear) | None => Ok(()),
        }
    }

    pub fn check(
        &self,
        collection: Collection,
        keyword: &str,
        check: &DuplicateCheck,
    ) -> Result<()> {
        if self.json {
            return self.print_json(&CheckReport {
                collection,
                keyword,
                check,
            });
        }

        match check {
            DuplicateCheck::Clear => {
                self.term.write_line(&format!(
                    "{} \"{}\" has no similar {} keywords.",
                    style("Clear:").green(),
                    keyword,
                    collection
                ))?;
            }
            DuplicateCheck::Duplicates { matches } => {
                self.term.write_line(&format!(
                    "{} \"{}\" is similar to {} {} keyword(s):",
                    style("Possible duplicate:").red(),
                    keyword,
                    style(matches.len()).bold(),
                    collection
                ))?;
                self.print_matches(matches)?;
            }
            DuplicateCheck::Skipped { reason } => {
                self.term.write_line(&format!(
                    "{} {}",
                    style("Duplicate check skipped:").yellow(),
                    reason
                ))?;
            }
        }
        Ok(())
    }

    pub fn entry_saved(&self, verb: &str, saved: &Saved) -> Result<()> {
        if self.json {
            return self.print_json(&SavedReport {
                entry: &saved.entry,
                duplicate_check: saved.check.as_ref(),
            });
        }

        let entry = &saved.entry;
        self.term.write_line(&format!(
            "{} {}",
            style(format!("{verb} entry:")).green(),
            style(&entry.id).cyan().bold()
        ))?;
        self.term
            .write_line(&format!("  Keyword: {}", entry.keyword))?;
        self.term.write_line(&format!("  Slug: {}", entry.slug))?;
        self.term
            .write_line(&format!("  State: {}", Self::published_label(entry)))?;
        self.print_check_note(saved.check.as_ref())
    }

    pub fn entry_list(&self, collection: Collection, listing: &Listing) -> Result<()> {
        if self.json {
            return self.print_json(&listing.entries);
        }

        if listing.total() == 0 {
            self.term
                .write_line(&format!("No {collection} entries found."))?;
            return Ok(());
        }

        self.term.write_line(&format!(
            "{} {collection} entries: {} published, {} draft",
            style(listing.total()).bold(),
            style(listing.published).green(),
            style(listing.drafts).yellow()
        ))?;
        if listing.entries.is_empty() {
            self.term.write_line("No entries match the filters.")?;
            return Ok(());
        }

        for entry in &listing.entries {
            self.term.write_line(&format!(
                "{} [{}] {}",
                style(&entry.id).cyan().bold(),
                Self::published_label(entry),
                entry.keyword
            ))?;
            self.term
                .write_line(&format!("  Slug: {}", style(&entry.slug).dim()))?;
        }
        Ok(())
    }

    pub fn entry(&self, entry: &Entry) -> Result<()> {
        if self.json {
            return self.print_json(entry);
        }

        self.term.write_line(&format!(
            "Entry: {} [{}]",
            style(&entry.id).cyan().bold(),
            Self::published_label(entry)
        ))?;
        self.term
            .write_line(&format!("  Collection: {}", entry.collection))?;
        self.term
            .write_line(&format!("  Keyword: {}", entry.keyword))?;
        self.term.write_line(&format!("  Slug: {}", entry.slug))?;
        self.term
            .write_line(&format!("  Created: {}", entry.created_at))?;
        self.term
            .write_line(&format!("  Updated: {}", entry.updated_at))?;
        Ok(())
    }

    pub fn entry_removed(&self, entry: &Entry) -> Result<()> {
        self.term.write_line(&format!(
            "{} {} ({})",
            style("Removed entry:").red(),
            style(&entry.id).cyan().bold(),
            entry.keyword
        ))?;
        Ok(())
    }

    pub fn prep(&self, text: &str) -> Result<()> {
        self.term.write_line(text)?;
        Ok(())
    }
}
