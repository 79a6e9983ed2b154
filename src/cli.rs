use clap::{ArgAction, Parser, Subcommand};

use crate::commands::entry::{SortOrder, StatusFilter};
use crate::models::Collection;
use crate::similarity::Metric;

#[derive(Parser)]
#[command(name = "muun")]
#[command(about = "Keyword catalog with duplicate detection for MUUN content", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the keyword catalog in the current project
    Init {
        /// Keep .muun out of the repo (adds it to .git/info/exclude or .gitignore)
        #[arg(long)]
        stealth: bool,
    },

    /// Report existing keywords that look like duplicates of a keyword
    Check {
        /// Collection to compare against
        #[arg(value_enum)]
        collection: Collection,

        /// The keyword to check
        keyword: String,

        /// Entry ID to leave out (the entry being edited)
        #[arg(long)]
        exclude: Option<String>,

        /// Similarity metric, overriding config.toml
        #[arg(long, value_enum)]
        metric: Option<Metric>,

        /// Minimum similarity in 0..=1, overriding config.toml
        #[arg(long)]
        threshold: Option<f64>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage catalog entries
    #[command(subcommand)]
    Entry(EntryCommands),

    /// Print a usage guide
    Prep,
}

#[derive(Subcommand)]
pub enum EntryCommands {
    /// Add an entry after checking for duplicate keywords
    Add {
        #[arg(value_enum)]
        collection: Collection,

        /// Display keyword
        keyword: String,

        /// URL slug (generated from the keyword when omitted)
        #[arg(long)]
        slug: Option<String>,

        /// Mark the entry as published
        #[arg(long)]
        published: bool,

        /// Save even if similar keywords exist
        #[arg(long)]
        force: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List entries in a collection
    List {
        #[arg(value_enum)]
        collection: Collection,

        /// Only keywords containing this text (case-insensitive)
        #[arg(long)]
        search: Option<String>,

        /// Filter by published state
        #[arg(long, value_enum, default_value_t = StatusFilter::All)]
        status: StatusFilter,

        /// Sort order
        #[arg(long, value_enum, default_value_t = SortOrder::Date)]
        sort: SortOrder,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a single entry
    Show {
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Change an entry's keyword, slug or published flag
    ///
    /// The slug is never derived from a new keyword. It only changes when
    /// --slug is given.
    Edit {
        id: String,

        /// New keyword, checked against every other entry. Keeps the current slug
        #[arg(long)]
        keyword: Option<String>,

        /// New URL slug
        #[arg(long)]
        slug: Option<String>,

        /// Published flag
        #[arg(long, action = ArgAction::Set)]
        published: Option<bool>,

        /// Save even if similar keywords exist
        #[arg(long)]
        force: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete an entry
    Remove { id: String },
}
