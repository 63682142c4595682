//! Shared types used across all pipeline stages.
//!
//! [`Entry`] is produced by the parse stage and serialized into the scan
//! manifest; [`MonthKey`] is the grouping key of the index stage and the
//! identity of a month archive page.

use chrono::{DateTime, Datelike, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single journal entry as read from a source block.
///
/// Entries are immutable after parsing. Derived data (anchor, month,
/// category slugs) lives on [`crate::index::IndexedEntry`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Non-empty, trimmed title from the `TITLE:` line.
    pub title: String,
    /// Category labels in source order, duplicates and empties removed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
    /// Publish time normalized to the configured offset. Undated entries
    /// never reach any page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<DateTime<FixedOffset>>,
    /// Body text, lines joined with `\n`, trailing whitespace trimmed.
    pub body: String,
    /// Extended body, present only when the block had a non-empty one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extended: Option<String>,
    /// Name of the source file the entry came from.
    #[serde(default)]
    pub source: String,
}

/// Calendar month of a publish timestamp: `(year, month)`.
///
/// Ordering is chronological, so a `BTreeMap<MonthKey, _>` iterates from
/// the oldest month to the newest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn of(timestamp: &DateTime<FixedOffset>) -> Self {
        Self::new(timestamp.year(), timestamp.month())
    }

    /// Four-digit year, as used in output paths.
    pub fn year_str(&self) -> String {
        format!("{:04}", self.year)
    }

    /// Two-digit zero-padded month, as used in output paths.
    pub fn month_str(&self) -> String {
        format!("{:02}", self.month)
    }

    /// Output path of this month's archive page, relative to the site root.
    pub fn archive_path(&self) -> String {
        format!("archive/{}/{}.html", self.year_str(), self.month_str())
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_key_orders_chronologically() {
        let mut keys = vec![
            MonthKey::new(2024, 1),
            MonthKey::new(2023, 12),
            MonthKey::new(2024, 10),
            MonthKey::new(2024, 2),
        ];
        keys.sort();
        assert_eq!(
            keys,
            vec![
                MonthKey::new(2023, 12),
                MonthKey::new(2024, 1),
                MonthKey::new(2024, 2),
                MonthKey::new(2024, 10),
            ]
        );
    }

    #[test]
    fn month_key_paths_are_zero_padded() {
        let key = MonthKey::new(2024, 3);
        assert_eq!(key.archive_path(), "archive/2024/03.html");
        assert_eq!(key.to_string(), "2024-03");
    }

    #[test]
    fn month_key_of_timestamp_uses_local_calendar() {
        let offset = FixedOffset::east_opt(9 * 3600).unwrap();
        // 2024-01-31T20:00Z is already February in UTC+9
        let ts = DateTime::parse_from_rfc3339("2024-01-31T20:00:00Z")
            .unwrap()
            .with_timezone(&offset);
        assert_eq!(MonthKey::of(&ts), MonthKey::new(2024, 2));
    }
}
