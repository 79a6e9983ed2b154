#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod helpers;
pub mod id;
pub mod models;
pub mod output;
pub mod similarity;
pub mod slug;

use anyhow::{Context, Result, anyhow};
use std::path::PathBuf;

use cli::{Cli, Commands, EntryCommands};
use commands::entry::{Guard, ListOptions};
use config::Config;
use db::Database;
use output::Output;
use similarity::Detector;

pub const MUUN_DIR: &str = ".muun";
pub const REDIRECT_FILE: &str = "redirect";

/// Finds the `.muun/` directory by walking up from the current directory.
pub fn find_muun_dir() -> Option<PathBuf> {
    let current_dir = std::env::current_dir().ok()?;
    let mut dir = current_dir.as_path();

    loop {
        let muun_path = dir.join(MUUN_DIR);
        if muun_path.is_dir() {
            return Some(muun_path);
        }

        dir = dir.parent()?;
    }
}

/// Resolves the catalog directory, following a `redirect` file if present.
/// The redirect holds a path (absolute, or relative to the project root) to
/// another `.muun/` directory, so several checkouts can share one catalog.
pub fn resolve_muun_dir() -> Option<PathBuf> {
    let muun_dir = find_muun_dir()?;
    let redirect_path = muun_dir.join(REDIRECT_FILE);

    if redirect_path.is_file() {
        let target = std::fs::read_to_string(&redirect_path).ok()?;
        let target = PathBuf::from(target.trim());

        let target_path = if target.is_absolute() {
            target
        } else {
            muun_dir.parent()?.join(target)
        };

        if target_path.is_dir() {
            return Some(target_path);
        }
    }

    Some(muun_dir)
}

fn ensure_initialized() -> Result<(Database, Config)> {
    let muun_dir = resolve_muun_dir()
        .ok_or_else(|| anyhow!("Catalog not initialized. Run 'muun init' first."))?;

    let db = Database::open(&muun_dir).context("Failed to open catalog")?;
    let config = Config::load(&muun_dir)?;
    Ok((db, config))
}

/// The detector saves run, or `None` when checking is turned off.
fn save_detector(config: &Config) -> Result<Option<Detector>> {
    config
        .duplicates
        .enabled
        .then(|| config.duplicates.detector(None, None))
        .transpose()
}

fn run_entry(entry_cmd: EntryCommands, db: &mut Database, config: &Config) -> Result<()> {
    match entry_cmd {
        EntryCommands::Add {
            collection,
            keyword,
            slug,
            published,
            force,
            json,
        } => {
            let detector = save_detector(config)?;
            let guard = Guard {
                detector: detector.as_ref(),
                force,
            };
            let saved = commands::entry::add(collection, keyword, slug, published, &guard, db)?;
            Output::new(json).entry_saved("Created", &saved)
        }
        EntryCommands::List {
            collection,
            search,
            status,
            sort,
            json,
        } => {
            let options = ListOptions {
                search,
                status,
                sort,
            };
            let listing = commands::entry::list(collection, &options, db);
            Output::new(json).entry_list(collection, &listing)
        }
        EntryCommands::Show { id, json } => {
            let entry = commands::entry::show(&id, db)?;
            Output::new(json).entry(&entry)
        }
        EntryCommands::Edit {
            id,
            keyword,
            slug,
            published,
            force,
            json,
        } => {
            let detector = save_detector(config)?;
            let guard = Guard {
                detector: detector.as_ref(),
                force,
            };
            let saved = commands::entry::edit(&id, keyword, slug, published, &guard, db)?;
            Output::new(json).entry_saved("Updated", &saved)
        }
        EntryCommands::Remove { id } => {
            let entry = commands::entry::remove(&id, db)?;
            Output::new(false).entry_removed(&entry)
        }
    }
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Init { stealth } => commands::init::run(stealth),
        Commands::Check {
            collection,
            keyword,
            exclude,
            metric,
            threshold,
            json,
        } => {
            let (db, config) = ensure_initialized()?;
            let detector = config.duplicates.detector(metric, threshold)?;
            let result =
                commands::check::run(&db, collection, &keyword, exclude.as_deref(), &detector);
            Output::new(json).check(collection, &keyword, &result)
        }
        Commands::Entry(entry_cmd) => {
            let (mut db, config) = ensure_initialized()?;
            run_entry(entry_cmd, &mut db, &config)
        }
        Commands::Prep => {
            let text = commands::prep::run();
            Output::new(false).prep(text)
        }
    }
}
