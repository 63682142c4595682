//! Shared test utilities for the daybook test suite.
//!
//! Provides timestamp shorthands, entry builders, and a fixture copier
//! that work with parse- and index-phase data structures (`Entry`,
//! `SiteIndex`).
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let idx = build_index(
//!     vec![entry("A", "diary", "2024-01-05")],
//!     ts("2024-02-01"),
//!     &CategorySlugs::default(),
//!     5,
//! );
//! assert_eq!(find_entry(&idx, "A").anchor, "2024-01-05");
//! ```

use chrono::{DateTime, FixedOffset};
use std::path::Path;
use tempfile::TempDir;

use crate::index::{IndexedEntry, SiteIndex};
use crate::parse::{parse_timestamp, split_categories};
use crate::types::Entry;

// =========================================================================
// Time
// =========================================================================

/// UTC+9, the stock offset.
pub fn jst() -> FixedOffset {
    FixedOffset::east_opt(9 * 3600).unwrap()
}

/// Parse `YYYY-MM-DD` or `YYYY-MM-DD HH:MM:SS` in [`jst`]. Panics on bad input.
pub fn ts(value: &str) -> DateTime<FixedOffset> {
    parse_timestamp(value, jst()).unwrap_or_else(|| panic!("bad test timestamp {value:?}"))
}

// =========================================================================
// Entry builders
// =========================================================================

/// Build an entry. `categories` is a comma-separated list; an empty
/// `date` gives an undated entry.
pub fn entry(title: &str, categories: &str, date: &str) -> Entry {
    Entry {
        title: title.to_string(),
        categories: split_categories(categories),
        published: (!date.is_empty()).then(|| ts(date)),
        body: format!("body of {title}"),
        extended: None,
        source: "test.md".to_string(),
    }
}

/// Like [`entry`], with an extended body.
pub fn entry_with_extended(title: &str, date: &str, extended: &str) -> Entry {
    Entry {
        extended: Some(extended.to_string()),
        ..entry(title, "", date)
    }
}

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/content/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Index lookups: panic with a clear message on miss
// =========================================================================

/// Find a visible entry by title. Panics if not found.
pub fn find_entry<'a>(index: &'a SiteIndex, title: &str) -> &'a IndexedEntry {
    index
        .entries
        .iter()
        .find(|e| e.entry.title == title)
        .unwrap_or_else(|| {
            let titles: Vec<&str> = index.entries.iter().map(|e| e.title()).collect();
            panic!("entry '{title}' not found. Available: {titles:?}")
        })
}

/// Titles of the given entries, in order.
pub fn titles_of(entries: &[&IndexedEntry]) -> Vec<String> {
    entries.iter().map(|e| e.title().to_string()).collect()
}
