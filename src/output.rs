//! CLI output formatting for all pipeline stages.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. The primary display
//! for every entity (entry, month, category, page) is its semantic identity
//! (positional index plus title) with filesystem paths shown as secondary
//! context, either as indented `Source:` lines or after an `→`.
//!
//! # Output Format
//!
//! ## Scan
//!
//! ```text
//! Sources
//! 001 entries/2023.md (4 entries)
//!     001 2023-11-03 開発開始 [日記]
//!     002 undated 下書きメモ [日記]
//!
//! Config
//!     config.toml
//!     categories.toml
//!     assets/
//! ```
//!
//! ## Check
//!
//! ```text
//! Months
//! 001 2023-11 (2 entries)
//! Categories
//! 001 日記 (6 entries, 1 page) → category/diary/
//! Hidden
//!     1 undated
//!     1 scheduled
//! ```
//!
//! ## Generate
//!
//! ```text
//! Index → index.html (8 entries)
//! Top → archive/top/index.html (3 entries)
//!
//! Months
//! 001 2023-11 → archive/2023/11.html (2 entries)
//!
//! Categories
//! 001 日記 → category/diary/001.html (6 entries)
//!
//! Generated 4 month pages, 5 category pages, 1 top index, 1 master index
//! ```
//!
//! # Architecture
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure:
//! no I/O, no side effects.

use crate::config::SiteConfig;
use crate::generate::{GenerateReport, PageKind};
use crate::index::SiteIndex;
use crate::pipeline::Manifest;
use crate::types::Entry;
use std::path::Path;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `N entry` / `N entries`.
fn entries_noun(n: usize) -> String {
    if n == 1 {
        "1 entry".to_string()
    } else {
        format!("{n} entries")
    }
}

/// One entry line: index, date (or `undated`), title, categories.
///
/// ```text
/// 001 2024-01-05 朝の作業 [日記, map editor]
/// 002 undated 下書きメモ
/// ```
fn entry_line(index: usize, entry: &Entry) -> String {
    let date = entry
        .published
        .map(|ts| ts.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "undated".to_string());
    let mut line = format!("{} {} {}", format_index(index), date, entry.title);
    if !entry.categories.is_empty() {
        line.push_str(&format!(" [{}]", entry.categories.join(", ")));
    }
    line
}

fn category_display<'a>(label: &'a str, config: &'a SiteConfig) -> &'a str {
    if label.is_empty() {
        &config.labels.uncategorized
    } else {
        label
    }
}

// ============================================================================
// Scan
// ============================================================================

/// Format scan stage output: every source with its entries, then config files.
pub fn format_scan_output(manifest: &Manifest, source_root: &Path) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push("Sources".to_string());
    for (i, source) in manifest.sources.iter().enumerate() {
        let entries: Vec<&Entry> = manifest
            .entries
            .iter()
            .filter(|e| &e.source == source)
            .collect();
        lines.push(format!(
            "{} {} ({})",
            format_index(i + 1),
            source,
            entries_noun(entries.len())
        ));
        for (j, entry) in entries.iter().enumerate() {
            lines.push(format!("{}{}", indent(1), entry_line(j + 1, entry)));
            if entry.extended.is_some() {
                lines.push(format!("{}Extended body", indent(2)));
            }
        }
    }

    lines.push(String::new());
    lines.push("Config".to_string());
    if source_root.join("config.toml").exists() {
        lines.push(format!("{}config.toml", indent(1)));
    }
    let build = &manifest.config.build;
    if source_root.join(&build.categories_file).is_file() {
        lines.push(format!("{}{}", indent(1), build.categories_file));
    }
    if source_root.join(&build.assets_dir).is_dir() {
        lines.push(format!("{}{}/", indent(1), build.assets_dir));
    }

    lines
}

/// Print scan output to stdout.
pub fn print_scan_output(manifest: &Manifest, source_root: &Path) {
    for line in format_scan_output(manifest, source_root) {
        println!("{}", line);
    }
}

// ============================================================================
// Index
// ============================================================================

/// Format the index summary: months, categories, recent entries, hidden counts.
pub fn format_index_output(index: &SiteIndex, config: &SiteConfig) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push("Months".to_string());
    for (i, (key, members)) in index.months.iter().enumerate() {
        lines.push(format!(
            "{} {} ({})",
            format_index(i + 1),
            key,
            entries_noun(members.len())
        ));
    }

    lines.push("Categories".to_string());
    for (i, group) in index.categories_by_count().iter().enumerate() {
        let pages = group.page_count();
        lines.push(format!(
            "{} {} ({}, {} page{}) \u{2192} category/{}/",
            format_index(i + 1),
            category_display(&group.label, config),
            entries_noun(group.count()),
            pages,
            if pages == 1 { "" } else { "s" },
            group.slug
        ));
    }

    let recent = index.recent_entries();
    if !recent.is_empty() {
        lines.push("Recent".to_string());
        for entry in recent {
            lines.push(format!("{}{} {}", indent(1), entry.anchor, entry.title()));
        }
    }

    if index.undated > 0 || index.scheduled > 0 {
        lines.push("Hidden".to_string());
        if index.undated > 0 {
            lines.push(format!("{}{} undated", indent(1), index.undated));
        }
        if index.scheduled > 0 {
            lines.push(format!("{}{} scheduled", indent(1), index.scheduled));
        }
    }

    lines
}

/// Print index summary to stdout.
pub fn print_index_output(index: &SiteIndex, config: &SiteConfig) {
    for line in format_index_output(index, config) {
        println!("{}", line);
    }
}

// ============================================================================
// Generate
// ============================================================================

/// Format generate stage output: each written page with its output path.
pub fn format_generate_output(report: &GenerateReport) -> Vec<String> {
    let mut lines = Vec::new();

    for page in report.pages.iter().filter(|p| p.kind == PageKind::MasterIndex) {
        lines.push(format!(
            "Index \u{2192} {} ({})",
            page.path,
            entries_noun(page.entry_count)
        ));
    }
    for page in report.pages.iter().filter(|p| p.kind == PageKind::TopIndex) {
        lines.push(format!(
            "Top \u{2192} {} ({})",
            page.path,
            entries_noun(page.entry_count)
        ));
    }

    for (heading, kind) in [("Months", PageKind::Month), ("Categories", PageKind::Category)] {
        let pages: Vec<_> = report.pages.iter().filter(|p| p.kind == kind).collect();
        if pages.is_empty() {
            continue;
        }
        lines.push(String::new());
        lines.push(heading.to_string());
        for (i, page) in pages.iter().enumerate() {
            lines.push(format!(
                "{} {} \u{2192} {} ({})",
                format_index(i + 1),
                page.title,
                page.path,
                entries_noun(page.entry_count)
            ));
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "Generated {} month pages, {} category pages, {} top index, {} master index",
        report.count(PageKind::Month),
        report.count(PageKind::Category),
        report.count(PageKind::TopIndex),
        report.count(PageKind::MasterIndex),
    ));
    if report.assets_copied > 0 {
        lines.push(format!("Copied {} asset files", report.assets_copied));
    }

    lines
}

/// Print generate output to stdout.
pub fn print_generate_output(report: &GenerateReport) {
    for line in format_generate_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
