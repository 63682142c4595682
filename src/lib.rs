//! # Daybook
//!
//! A static site compiler for development journals. Entries are written as
//! delimited blocks in plain text files; daybook turns them into a
//! cross-linked HTML site of month archives, paginated category pages, a
//! rolling top index and a master index.
//!
//! # Architecture: Three-Stage Pipeline
//!
//! ```text
//! 1. Parse     source/*.md   →  Vec<Entry>     (text → structured entries)
//! 2. Index     entries + now →  SiteIndex      (visibility, groups, anchors)
//! 3. Generate  SiteIndex     →  docs/          (final HTML site)
//! ```
//!
//! The parse stage output can be dumped as `manifest.json` with
//! `daybook scan`. Indexing and page planning are pure functions, so unit
//! tests exercise the whole site layout without touching the filesystem.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`parse`] | Stage 1: finds source files and parses entry blocks |
//! | [`index`] | Stage 2: visibility filter, ordering, anchors, month and category groups |
//! | [`render`] | Maud fragments: entry blocks, sidebar, pagers, master index |
//! | [`generate`] | Stage 3: plans every page and writes the output tree |
//! | [`template`] | Header/footer fragments wrapped around every page |
//! | [`pipeline`] | Stage orchestration and the top-level [`pipeline::BuildError`] |
//! | [`config`] | `config.toml` loading, validation and merging |
//! | [`naming`] | Category label → directory slug resolution |
//! | [`types`] | Shared types (`Entry`, `MonthKey`) |
//! | [`output`] | CLI output formatting |
//! | [`logging`] | `tracing` subscriber setup |
//!
//! # Scheduled Publishing
//!
//! Every build takes a build time (the current time, or `--now`). Entries
//! dated after it are left out of every page, so a post dated next week
//! appears on the first build after that date without any source change.
//!
//! # Stable Output
//!
//! Output paths depend only on (year, month) or (category slug, page), and
//! every generated identifier is derived from entry content: anchors from
//! the publish date plus a per-day letter, extended-body ids from a SHA-256
//! of anchor and title. Rebuilding unchanged input at the same build time
//! yields byte-identical files.

pub mod config;
pub mod generate;
pub mod index;
pub mod logging;
pub mod naming;
pub mod output;
pub mod parse;
pub mod pipeline;
pub mod render;
pub mod template;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
