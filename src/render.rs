//! HTML fragment rendering.
//!
//! Pure functions from index data to [`Markup`]: entry blocks, the sidebar
//! and compact menu, pagination controls, and the master index body. No
//! I/O happens here; [`crate::generate`] decides which fragments make up
//! which page and where it is written.
//!
//! ## Links
//!
//! Every link is relative to the page it appears on. A [`PageContext`]
//! carries the path back to the site root (`.` for the master index,
//! `../..` for archive and category pages), so the output works from any
//! base path. The only absolute URL is the deep-link control, built from
//! `site.base_url`.
//!
//! ## CSS and JavaScript
//!
//! Embedded at compile time and emitted at the top and bottom of every
//! page body:
//! - `static/style.css`: layout and entry styling
//! - `static/journal.js`: extended-body toggles, the archive tree (state
//!   kept in `sessionStorage`), copy-to-clipboard for deep links

use crate::config::SiteConfig;
use crate::index::{CategoryRef, IndexedEntry, SiteIndex, category_page_href};
use chrono::{DateTime, Datelike, FixedOffset};
use maud::{Markup, PreEscaped, html};
use sha2::{Digest, Sha256};

const CSS_STATIC: &str = include_str!("../static/style.css");
const JS: &str = include_str!("../static/journal.js");

/// Fragment id of the sentinel after the last entry on a page.
pub const BOTTOM_SENTINEL: &str = "page-bottom";

/// Path of the rolling top index, relative to the site root.
pub const TOP_INDEX_PATH: &str = "archive/top/index.html";

/// Path of the master index, relative to the site root.
pub const MASTER_INDEX_PATH: &str = "index.html";

/// Everything a fragment needs besides its own data.
pub struct PageContext<'a> {
    pub index: &'a SiteIndex,
    pub config: &'a SiteConfig,
    /// Relative path from the page back to the site root.
    pub root: String,
}

impl<'a> PageContext<'a> {
    /// Context for a page `depth` directories below the site root.
    pub fn new(index: &'a SiteIndex, config: &'a SiteConfig, depth: usize) -> Self {
        Self {
            index,
            config,
            root: relative_root(depth),
        }
    }

    /// Link to a root-relative path from this page.
    pub fn href(&self, path: &str) -> String {
        format!("{}/{}", self.root, path)
    }

    fn category_name<'c>(&'c self, label: &'c str) -> &'c str {
        if label.is_empty() {
            &self.config.labels.uncategorized
        } else {
            label
        }
    }
}

/// An older/newer control pair. `None` renders the control disabled.
#[derive(Debug, Clone, PartialEq)]
pub struct Pager<'a> {
    pub older: Option<String>,
    pub newer: Option<String>,
    pub older_label: &'a str,
    pub newer_label: &'a str,
}

/// `.` for depth 0, otherwise `..` repeated `depth` times.
pub fn relative_root(depth: usize) -> String {
    if depth == 0 {
        ".".to_string()
    } else {
        vec![".."; depth].join("/")
    }
}

/// `YYYY-MM-DD (W)` with `W` taken from `weekday_names` (Monday first).
pub fn format_date(timestamp: &DateTime<FixedOffset>, weekday_names: &[String; 7]) -> String {
    let weekday = &weekday_names[timestamp.weekday().num_days_from_monday() as usize];
    format!("{} ({})", timestamp.format("%Y-%m-%d"), weekday)
}

/// Deterministic element id for an entry's extended body.
pub fn extended_id(anchor: &str, title: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(anchor.as_bytes());
    hasher.update(title.as_bytes());
    let hex = format!("{:x}", hasher.finalize());
    format!("ext-{}", &hex[..16])
}

/// Absolute deep link to an entry on its month page.
pub fn deep_link(base_url: &str, entry: &IndexedEntry) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), entry.archive_link())
}

/// Entry text with line breaks preserved. The text itself is not escaped.
fn with_breaks(text: &str) -> Markup {
    PreEscaped(text.replace('\n', "<br>"))
}

// ============================================================================
// Entries
// ============================================================================

/// A single entry block. `next_anchor` is the target of the jump control.
pub fn render_entry(ctx: &PageContext, entry: &IndexedEntry, next_anchor: &str) -> Markup {
    let labels = &ctx.config.labels;
    let date = format_date(&entry.published, &ctx.config.locale.weekday_names);
    let permalink = deep_link(&ctx.config.site.base_url, entry);

    html! {
        article.entry id=(entry.anchor) {
            div.entry-title {
                span.entry-date { (date) }
                " "
                span.entry-heading { (entry.title()) }
            }
            div.entry-body { (with_breaks(&entry.entry.body)) }
            @if let Some(extended) = &entry.entry.extended {
                @let ext_id = extended_id(&entry.anchor, entry.title());
                button.ext-toggle type="button" data-target=(ext_id) aria-expanded="false" {
                    "▼" (labels.open_extended) "▼"
                }
                div.entry-extended id=(ext_id) hidden { (with_breaks(extended)) }
            }
            div.entry-footer {
                @for cat in &entry.categories {
                    (category_link(ctx, cat))
                }
                a.permalink href=(permalink) data-permalink=(permalink) { (labels.permalink) }
                a.next-entry href={ "#" (next_anchor) } { (labels.next_entry) }
            }
        }
    }
}

fn category_link(ctx: &PageContext, cat: &CategoryRef) -> Markup {
    html! {
        a.entry-category href=(ctx.href(&cat.page_href(1))) { (ctx.category_name(&cat.label)) }
    }
}

/// Entry blocks in the given order, each jumping to the next, the last
/// jumping to the bottom sentinel.
pub fn render_entry_list(ctx: &PageContext, entries: &[&IndexedEntry]) -> Markup {
    html! {
        div.entries {
            @for (i, entry) in entries.iter().enumerate() {
                @let next = entries.get(i + 1).map(|e| e.anchor.as_str()).unwrap_or(BOTTOM_SENTINEL);
                (render_entry(ctx, entry, next))
            }
            div id=(BOTTOM_SENTINEL) {}
        }
    }
}

// ============================================================================
// Navigation
// ============================================================================

/// Older/newer control pair.
pub fn render_pager(pager: &Pager) -> Markup {
    html! {
        nav.pager {
            (pager_control(pager.older.as_deref(), pager.older_label, "older"))
            " | "
            (pager_control(pager.newer.as_deref(), pager.newer_label, "newer"))
        }
    }
}

fn pager_control(href: Option<&str>, label: &str, rel: &str) -> Markup {
    html! {
        @match href {
            Some(href) => {
                a class=(rel) href=(href) { (label) }
            }
            None => {
                span class={ (rel) " disabled" } { (label) }
            }
        }
    }
}

/// Full navigation sidebar.
pub fn render_sidebar(ctx: &PageContext) -> Markup {
    let labels = &ctx.config.labels;
    let recent = ctx.index.recent_entries();

    html! {
        aside id="sidebar" {
            nav.sidebar-links {
                @if ctx.index.top_index().is_some() {
                    div { a href=(ctx.href(TOP_INDEX_PATH)) { (labels.top) } }
                }
                div { a href=(ctx.href(MASTER_INDEX_PATH)) { (labels.full_index) } }
            }
            @if !recent.is_empty() {
                section.sidebar-recent {
                    h2 { (labels.recent) }
                    ul {
                        @for entry in &recent {
                            li { a href=(ctx.href(&entry.archive_link())) { (entry.title()) } }
                        }
                    }
                }
            }
            (render_category_list(ctx))
            section.sidebar-archives {
                h2 { (labels.archives) }
                @for (year, months) in ctx.index.month_tree() {
                    div.archive-year {
                        button.year-toggle type="button" data-year=(year) aria-expanded="false" { (year) }
                        ul.archive-months id={ "year-" (year) } hidden {
                            @for (key, count) in months {
                                li {
                                    a href=(ctx.href(&key.archive_path())) { (key.month_str()) }
                                    " (" (count) ")"
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn render_category_list(ctx: &PageContext) -> Markup {
    html! {
        section.sidebar-categories {
            h2 { (ctx.config.labels.categories) }
            ul {
                @for group in ctx.index.categories_by_count() {
                    li {
                        a href=(ctx.href(&category_page_href(&group.slug, 1))) {
                            (ctx.category_name(&group.label))
                        }
                        " (" (group.count()) ")"
                    }
                }
            }
        }
    }
}

/// Collapsed menu for narrow screens: top, full index and categories.
pub fn render_compact_menu(ctx: &PageContext) -> Markup {
    let labels = &ctx.config.labels;
    html! {
        details.compact-menu {
            summary { (labels.menu) }
            ul {
                @if ctx.index.top_index().is_some() {
                    li { a href=(ctx.href(TOP_INDEX_PATH)) { (labels.top) } }
                }
                li { a href=(ctx.href(MASTER_INDEX_PATH)) { (labels.full_index) } }
                @for group in ctx.index.categories_by_count() {
                    li {
                        a href=(ctx.href(&category_page_href(&group.slug, 1))) {
                            (ctx.category_name(&group.label))
                        }
                    }
                }
            }
        }
    }
}

// ============================================================================
// Pages
// ============================================================================

/// Page body: styles, compact menu, content between optional pagers,
/// sidebar, script. Wrapped in the header/footer templates by the caller.
pub fn render_page(ctx: &PageContext, pager: Option<&Pager>, content: Markup) -> Markup {
    html! {
        style { (PreEscaped(CSS_STATIC)) }
        div.layout {
            main id="content" {
                (render_compact_menu(ctx))
                @if let Some(pager) = pager { (render_pager(pager)) }
                (content)
                @if let Some(pager) = pager { (render_pager(pager)) }
            }
            (render_sidebar(ctx))
        }
        script { (PreEscaped(JS)) }
    }
}

/// Master index body: a jump bar, then one section per year with one line
/// per entry.
pub fn render_master_index(ctx: &PageContext) -> Markup {
    let years = ctx.index.years_desc();
    let weekdays = &ctx.config.locale.weekday_names;

    html! {
        div id="index-top" {}
        nav.year-jump {
            @for (year, _) in &years {
                a href={ "#y" (year) } { (year) }
                " "
            }
        }
        @for (i, (year, entries)) in years.iter().enumerate() {
            section.year-section id={ "y" (year) } {
                h2 { (year) }
                ul.index-list {
                    @for entry in entries {
                        li {
                            span.index-date { (format_date(&entry.published, weekdays)) }
                            " "
                            a href=(ctx.href(&entry.archive_link())) { (entry.title()) }
                        }
                    }
                }
            }
            @if i + 1 < years.len() {
                a.back-to-top href="#index-top" { (ctx.config.labels.back_to_top) }
            }
        }
    }
}
