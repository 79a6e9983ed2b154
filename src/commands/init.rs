use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use crate::MUUN_DIR;
use crate::config::Config;
use crate::db::Database;

pub fn run(stealth: bool) -> Result<()> {
    let muun_dir = std::path::PathBuf::from(MUUN_DIR);

    if muun_dir.exists() {
        println!("Catalog already initialized in {}", muun_dir.display());
        return Ok(());
    }

    fs::create_dir_all(&muun_dir).context("Failed to create .muun directory")?;

    let db = Database::open(&muun_dir)?;
    db.init_schema()?;
    Config::default().write_file(db.base_path())?;

    if stealth {
        add_to_gitignore()?;
    }

    println!("Initialized catalog in {}", muun_dir.display());
    Ok(())
}

/// Keeps `.muun` out of git. Uses `.git/info/exclude` when present, else
/// `.gitignore`; outside a git repository nothing is written.
fn add_to_gitignore() -> Result<()> {
    let exclude_path = Path::new(".git/info/exclude");
    let gitignore_path = Path::new(".gitignore");

    let target_path = if exclude_path.exists() {
        exclude_path
    } else if gitignore_path.exists() || Path::new(".git").is_dir() {
        gitignore_path
    } else {
        return Ok(());
    };

    let existing = fs::read_to_string(target_path).unwrap_or_default();
    if existing
        .lines()
        .any(|line| matches!(line.trim(), ".muun" | ".muun/"))
    {
        return Ok(());
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(target_path)
        .with_context(|| format!("Failed to open {}", target_path.display()))?;

    if !existing.is_empty() && !existing.ends_with('\n') {
        writeln!(file)?;
    }
    writeln!(file, ".muun")?;

    println!("Added .muun to {}", target_path.display());
    Ok(())
}
