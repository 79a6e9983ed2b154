/// Returns the usage guide for editors and scripts driving muun.
pub fn run() -> &'static str {
    r#"## muun preparation

muun keeps the keyword catalog for the MUUN content site (dream
interpretations, the fortune dictionary, columns) and refuses to save a
keyword that is 90% or more similar to one already in the same collection.

### Setup

```bash
muun init              # Create .muun/ in the current project
muun init --stealth    # Same, and keep .muun out of git
```

### Checking a keyword

```bash
muun check dream "돼지 꿈"               # Report near-duplicates
muun check dream "돼지꿈" --exclude <id>  # Ignore the entry being edited
muun check dream "돼지꿈" --metric jaro-winkler --threshold 0.85
```

Keywords are compared after lower-casing and dropping spaces, hyphens,
underscores, middle dots and anything that is not Hangul, a-z or 0-9, so
"돼지 꿈", "돼지-꿈" and "돼지꿈" are the same keyword.

### Entries

```bash
muun entry add dream "뱀꿈"                  # Slug "뱀꿈" is generated
muun entry add dream "큰 뱀 꿈" --slug big-snake --published
muun entry add dream "뱀 꿈" --force         # Save despite a duplicate
muun entry list dream
muun entry show <id>
muun entry edit <id> --keyword "흰 뱀꿈"      # Checked against everyone but <id>
muun entry edit <id> --published true
muun entry remove <id>
```

If the catalog cannot be read for the check, the save goes ahead and a
warning is logged. Set `MUUN_LOG=debug` to see scan details.

### Configuration

`.muun/config.toml`:

```toml
[duplicates]
enabled = true
threshold = 0.9
metric = "levenshtein"   # or "jaro-winkler"
```

### JSON

Add `--json` to `check`, `entry add`, `entry list`, `entry show` and
`entry edit` for machine-readable output.
"#
}
