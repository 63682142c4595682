//! Entry source parsing.
//!
//! Stage 1 of the build pipeline. Reads delimited text sources and turns
//! every well-formed block into an [`Entry`].
//!
//! ## Source Format
//!
//! ```text
//! TITLE: Moving the save format to version 3
//! CATEGORY: engine, tools
//! DATE: 2024-01-05 21:30:00
//! BODY:
//! The old loader is gone.
//! -----
//! EXTENDED BODY:
//! Notes for the curious.
//! -----
//! --------
//! TITLE: Next entry
//! ...
//! ```
//!
//! Blocks are separated by a line of exactly eight hyphens. Within a block
//! the header fields are read in fixed order by line prefix: `TITLE:`
//! (required), `CATEGORY:` and `DATE:` (both optional). Everything up to a
//! `BODY:` line is skipped; body lines run to a line of five hyphens, and an
//! optional `EXTENDED BODY:` section follows.
//!
//! ## Failure Modes
//!
//! - A block without a title is dropped silently (logged at debug level).
//! - A `DATE:` value matching neither `YYYY-MM-DD HH:MM:SS` nor `YYYY-MM-DD`
//!   aborts the whole parse with [`ParseError::InvalidDate`].

use crate::types::Entry;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error(
        "{file}:{line}: unparseable DATE value {value:?} (expected YYYY-MM-DD or YYYY-MM-DD HH:MM:SS)"
    )]
    InvalidDate {
        file: String,
        line: usize,
        value: String,
    },
}

/// Literal token replaced with the configured secret in body text.
pub const SECRET_PLACEHOLDER: &str = "%SECRET_TOKEN%";

const BLOCK_SEPARATOR: &str = "--------";
const SECTION_END: &str = "-----";
const TITLE_PREFIX: &str = "TITLE:";
const CATEGORY_PREFIX: &str = "CATEGORY:";
const DATE_PREFIX: &str = "DATE:";
const BODY_MARKER: &str = "BODY:";
const EXTENDED_MARKER: &str = "EXTENDED BODY:";

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DATE_FORMAT: &str = "%Y-%m-%d";

const SOURCE_EXTENSIONS: &[&str] = &["md", "txt"];

/// Inputs the parser needs beyond the source text itself.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Offset every `DATE:` value is interpreted in.
    pub offset: FixedOffset,
    /// Replacement for [`SECRET_PLACEHOLDER`]. `None` leaves the token as is.
    pub secret: Option<String>,
}

impl ParseOptions {
    pub fn new(offset: FixedOffset) -> Self {
        Self {
            offset,
            secret: None,
        }
    }

    pub fn with_secret(mut self, secret: Option<String>) -> Self {
        self.secret = secret;
        self
    }
}

/// Find every entry source under `root`.
///
/// Walks recursively, skipping hidden entries and anything under one of
/// the `excluded` paths (assets, output and temp directories). Returns
/// `.md` and `.txt` files in lexicographic path order.
pub fn discover_sources(root: &Path, excluded: &[PathBuf]) -> Result<Vec<PathBuf>, ParseError> {
    let excluded: Vec<PathBuf> = excluded
        .iter()
        .filter_map(|p| fs::canonicalize(p).ok())
        .collect();

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !(is_hidden(e) || is_excluded(e, &excluded)));

    let mut sources = Vec::new();
    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_file() && has_source_extension(entry.path()) {
            sources.push(entry.into_path());
        }
    }
    sources.sort();
    Ok(sources)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

fn is_excluded(entry: &DirEntry, excluded: &[PathBuf]) -> bool {
    if excluded.is_empty() || !entry.file_type().is_dir() {
        return false;
    }
    fs::canonicalize(entry.path())
        .map(|p| excluded.contains(&p))
        .unwrap_or(false)
}

fn has_source_extension(path: &Path) -> bool {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    SOURCE_EXTENSIONS.contains(&ext.as_str())
}

/// Read and parse every source file, concatenating the entries in order.
pub fn parse_files(
    paths: &[PathBuf],
    root: &Path,
    options: &ParseOptions,
) -> Result<Vec<Entry>, ParseError> {
    let mut entries = Vec::new();
    for path in paths {
        let text = fs::read_to_string(path)?;
        let name = path
            .strip_prefix(root)
            .unwrap_or(path)
            .to_string_lossy()
            .to_string();
        let parsed = parse_source(&text, &name, options)?;
        debug!(source = %name, entries = parsed.len(), "parsed source");
        entries.extend(parsed);
    }
    Ok(entries)
}

/// Parse one text source into entries.
///
/// `name` identifies the source in errors and in [`Entry::source`].
pub fn parse_source(text: &str, name: &str, options: &ParseOptions) -> Result<Vec<Entry>, ParseError> {
    let mut entries = Vec::new();
    for block in split_blocks(text) {
        if let Some(entry) = parse_block(&block, name, options)? {
            entries.push(entry);
        }
    }
    Ok(entries)
}

/// A trimmed, non-empty block with the 1-based source line of its first line.
#[derive(Debug)]
struct Block<'a> {
    first_line: usize,
    lines: Vec<&'a str>,
}

impl<'a> Block<'a> {
    /// Strip surrounding whitespace the way trimming the raw block text
    /// would. Returns `None` for blocks that are empty after trimming.
    fn trimmed(mut self) -> Option<Self> {
        let leading = self
            .lines
            .iter()
            .take_while(|l| l.trim().is_empty())
            .count();
        if leading == self.lines.len() {
            return None;
        }
        let trailing = self
            .lines
            .iter()
            .rev()
            .take_while(|l| l.trim().is_empty())
            .count();
        self.lines.truncate(self.lines.len() - trailing);
        self.lines.drain(..leading);
        self.first_line += leading;

        let last = self.lines.len() - 1;
        self.lines[0] = self.lines[0].trim_start();
        self.lines[last] = self.lines[last].trim_end();
        Some(self)
    }
}

fn split_blocks(text: &str) -> Vec<Block<'_>> {
    let mut blocks = Vec::new();
    let mut current = Block {
        first_line: 1,
        lines: Vec::new(),
    };
    for (idx, line) in text.lines().enumerate() {
        if line == BLOCK_SEPARATOR {
            let next = Block {
                first_line: idx + 2,
                lines: Vec::new(),
            };
            blocks.push(std::mem::replace(&mut current, next));
        } else {
            current.lines.push(line);
        }
    }
    blocks.push(current);
    blocks.into_iter().filter_map(Block::trimmed).collect()
}

fn parse_block(block: &Block, name: &str, options: &ParseOptions) -> Result<Option<Entry>, ParseError> {
    let lines = &block.lines;

    let Some(title) = lines.first().and_then(|l| l.strip_prefix(TITLE_PREFIX)) else {
        debug!(source = name, line = block.first_line, "dropping block without TITLE");
        return Ok(None);
    };
    let title = title.trim();
    if title.is_empty() {
        debug!(source = name, line = block.first_line, "dropping block with empty TITLE");
        return Ok(None);
    }
    let mut idx = 1;

    let categories = match lines.get(idx).and_then(|l| l.strip_prefix(CATEGORY_PREFIX)) {
        Some(value) => {
            idx += 1;
            split_categories(value)
        }
        None => Vec::new(),
    };

    let published = match lines.get(idx).and_then(|l| l.strip_prefix(DATE_PREFIX)) {
        Some(value) => {
            let value = value.trim();
            let timestamp =
                parse_timestamp(value, options.offset).ok_or_else(|| ParseError::InvalidDate {
                    file: name.to_string(),
                    line: block.first_line + idx,
                    value: value.to_string(),
                })?;
            idx += 1;
            Some(timestamp)
        }
        None => None,
    };

    while idx < lines.len() && lines[idx] != BODY_MARKER {
        idx += 1;
    }
    if idx < lines.len() {
        idx += 1;
    }

    let body_start = idx;
    while idx < lines.len() && lines[idx] != SECTION_END {
        idx += 1;
    }
    let body = join_lines(&lines[body_start..idx], options);
    while idx < lines.len() && lines[idx] == SECTION_END {
        idx += 1;
    }

    let mut extended = None;
    if lines.get(idx) == Some(&EXTENDED_MARKER) {
        idx += 1;
        let start = idx;
        while idx < lines.len() && lines[idx] != SECTION_END {
            idx += 1;
        }
        extended = Some(join_lines(&lines[start..idx], options)).filter(|e| !e.is_empty());
    }

    Ok(Some(Entry {
        title: title.to_string(),
        categories,
        published,
        body,
        extended,
        source: name.to_string(),
    }))
}

/// Split a `CATEGORY:` value on commas into an ordered set of labels.
pub fn split_categories(value: &str) -> Vec<String> {
    let mut labels: Vec<String> = Vec::new();
    for label in value.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        if !labels.iter().any(|l| l == label) {
            labels.push(label.to_string());
        }
    }
    labels
}

/// Parse a `DATE:` value in either accepted format, in the given offset.
///
/// A bare date means midnight at the start of that day.
pub fn parse_timestamp(value: &str, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    let naive = NaiveDateTime::parse_from_str(value, DATETIME_FORMAT)
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(value, DATE_FORMAT)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })?;
    offset.from_local_datetime(&naive).single()
}

fn join_lines(lines: &[&str], options: &ParseOptions) -> String {
    let joined = match &options.secret {
        Some(secret) => lines
            .iter()
            .map(|l| l.replace(SECRET_PLACEHOLDER, secret))
            .collect::<Vec<_>>()
            .join("\n"),
        None => lines.join("\n"),
    };
    joined.trim_end().to_string()
}
