//! HTML site generation.
//!
//! Stage 3 of the daybook build pipeline. Takes the [`SiteIndex`] and
//! produces the final static site.
//!
//! ## Generated Pages
//!
//! - **Month archives** (`/archive/YYYY/MM.html`): every entry of one
//!   month, newest first, with older/newer month links
//! - **Category pages** (`/category/<slug>/NNN.html`): ten entries per
//!   page, newest first, 1-based three-digit page numbers
//! - **Top index** (`/archive/top/index.html`): the two newest months, with
//!   an older link to the third
//! - **Master index** (`/index.html`): one line per entry, grouped by year
//!
//! ## Output Structure
//!
//! ```text
//! docs/
//! ├── .nojekyll                  # Hosting marker, always empty
//! ├── index.html                 # Master index
//! ├── archive/
//! │   ├── top/index.html         # Rolling top index
//! │   └── 2024/
//! │       ├── 01.html            # Month archives
//! │       └── 02.html
//! ├── category/
//! │   └── diary/
//! │       ├── 001.html           # Category pages
//! │       └── 002.html
//! └── js/...                     # Copied from the assets directory
//! ```
//!
//! Planning ([`plan_site`]) is pure and returns every page in memory;
//! writing ([`write_site`]) wraps each in the header/footer templates.
//! Paths are a function of (year, month) or (slug, page) only, so two
//! builds of the same input at the same build time produce identical files.

use crate::config::SiteConfig;
use crate::index::{
    CATEGORY_PAGE_SIZE, CategoryGroup, SiteIndex, category_page_href, category_page_path, page_ranges,
};
use crate::render::{
    MASTER_INDEX_PATH, PageContext, Pager, TOP_INDEX_PATH, render_entry_list, render_master_index,
    render_page,
};
use crate::template::Templates;
use crate::types::MonthKey;
use serde::Serialize;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

/// Zero-length file at the output root telling static hosts not to
/// preprocess the site.
pub const HOSTING_MARKER: &str = ".nojekyll";

/// Directory depth of archive, category and top index pages.
const NESTED_DEPTH: usize = 2;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PageKind {
    Month,
    Category,
    TopIndex,
    MasterIndex,
}

/// A page ready to be written: root-relative path, title, body markup.
#[derive(Debug, Clone)]
pub struct PlannedPage {
    pub kind: PageKind,
    pub path: String,
    pub title: String,
    pub body: String,
    /// Entries shown on the page.
    pub entry_count: usize,
}

/// One written page, for reporting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedPage {
    pub kind: PageKind,
    pub path: String,
    pub title: String,
    pub entry_count: usize,
}

#[derive(Debug, Default, Serialize)]
pub struct GenerateReport {
    pub pages: Vec<GeneratedPage>,
    /// Files copied from the assets directory.
    pub assets_copied: usize,
}

impl GenerateReport {
    pub fn count(&self, kind: PageKind) -> usize {
        self.pages.iter().filter(|p| p.kind == kind).count()
    }
}

/// Write the whole site into `output_dir`.
///
/// Copies `assets_dir` (if it exists) first, then every planned page, then
/// the hosting marker. Directories are created as needed; nothing is
/// deleted.
pub fn generate(
    index: &SiteIndex,
    config: &SiteConfig,
    templates: &Templates,
    assets_dir: &Path,
    output_dir: &Path,
) -> Result<GenerateReport, GenerateError> {
    fs::create_dir_all(output_dir)?;

    let assets_copied = if assets_dir.is_dir() {
        copy_assets(assets_dir, output_dir)?
    } else {
        0
    };

    let pages = plan_site(index, config);
    let pages = write_site(&pages, templates, output_dir)?;
    fs::write(output_dir.join(HOSTING_MARKER), "")?;

    Ok(GenerateReport {
        pages,
        assets_copied,
    })
}

/// Every page of the site, in write order: months, categories, top index,
/// master index.
pub fn plan_site(index: &SiteIndex, config: &SiteConfig) -> Vec<PlannedPage> {
    let mut pages = Vec::new();
    for key in index.months.keys() {
        pages.push(plan_month_page(index, config, *key));
    }
    for group in index.categories.values() {
        pages.extend(plan_category_pages(index, config, group));
    }
    pages.extend(plan_top_index(index, config));
    pages.push(plan_master_index(index, config));
    pages
}

/// Wrap and write planned pages.
pub fn write_site(
    pages: &[PlannedPage],
    templates: &Templates,
    output_dir: &Path,
) -> Result<Vec<GeneratedPage>, GenerateError> {
    let mut written = Vec::with_capacity(pages.len());
    for page in pages {
        let path = output_dir.join(&page.path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, templates.wrap(&page.title, &page.body))?;
        debug!(path = %page.path, "wrote page");
        written.push(GeneratedPage {
            kind: page.kind,
            path: page.path.clone(),
            title: page.title.clone(),
            entry_count: page.entry_count,
        });
    }
    Ok(written)
}

/// Copy the assets directory recursively into the output root.
/// Returns the number of files copied.
pub fn copy_assets(assets_dir: &Path, output_dir: &Path) -> Result<usize, GenerateError> {
    let mut copied = 0;
    for entry in WalkDir::new(assets_dir).sort_by_file_name() {
        let entry = entry?;
        let Ok(relative) = entry.path().strip_prefix(assets_dir) else {
            continue;
        };
        let target = output_dir.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }
    Ok(copied)
}

// ============================================================================
// Page planning
// ============================================================================

fn plan_month_page(index: &SiteIndex, config: &SiteConfig, key: MonthKey) -> PlannedPage {
    let ctx = PageContext::new(index, config, NESTED_DEPTH);
    let entries = index.month_entries_desc(key);
    let (older, newer) = index.month_neighbors(key);
    let pager = Pager {
        older: older.map(|k| ctx.href(&k.archive_path())),
        newer: newer.map(|k| ctx.href(&k.archive_path())),
        older_label: &config.labels.older_month,
        newer_label: &config.labels.newer_month,
    };

    PlannedPage {
        kind: PageKind::Month,
        path: key.archive_path(),
        title: key.to_string(),
        body: render_page(&ctx, Some(&pager), render_entry_list(&ctx, &entries)).into_string(),
        entry_count: entries.len(),
    }
}

fn plan_category_pages(
    index: &SiteIndex,
    config: &SiteConfig,
    group: &CategoryGroup,
) -> Vec<PlannedPage> {
    let ctx = PageContext::new(index, config, NESTED_DEPTH);
    let entries = index.category_entries_desc(&group.label);
    let ranges = page_ranges(entries.len(), CATEGORY_PAGE_SIZE);
    let title = if group.label.is_empty() {
        config.labels.uncategorized.clone()
    } else {
        group.label.clone()
    };

    ranges
        .iter()
        .enumerate()
        .map(|(i, range)| {
            let page = i + 1;
            let pager = Pager {
                older: (page < ranges.len())
                    .then(|| ctx.href(&category_page_href(&group.slug, page + 1))),
                newer: (page > 1).then(|| ctx.href(&category_page_href(&group.slug, page - 1))),
                older_label: &config.labels.older_page,
                newer_label: &config.labels.newer_page,
            };
            let chunk = &entries[range.clone()];
            PlannedPage {
                kind: PageKind::Category,
                path: category_page_path(&group.slug, page),
                title: title.clone(),
                body: render_page(&ctx, Some(&pager), render_entry_list(&ctx, chunk)).into_string(),
                entry_count: chunk.len(),
            }
        })
        .collect()
}

fn plan_top_index(index: &SiteIndex, config: &SiteConfig) -> Option<PlannedPage> {
    let top = index.top_index()?;
    let ctx = PageContext::new(index, config, NESTED_DEPTH);
    let entries = index.top_entries(&top);
    let pager = Pager {
        older: top.older.map(|k| ctx.href(&k.archive_path())),
        newer: None,
        older_label: &config.labels.older,
        newer_label: &config.labels.newer,
    };

    Some(PlannedPage {
        kind: PageKind::TopIndex,
        path: TOP_INDEX_PATH.to_string(),
        title: config.site.title.clone(),
        body: render_page(&ctx, Some(&pager), render_entry_list(&ctx, &entries)).into_string(),
        entry_count: entries.len(),
    })
}

fn plan_master_index(index: &SiteIndex, config: &SiteConfig) -> PlannedPage {
    let ctx = PageContext::new(index, config, 0);
    PlannedPage {
        kind: PageKind::MasterIndex,
        path: MASTER_INDEX_PATH.to_string(),
        title: config.site.title.clone(),
        body: render_page(&ctx, None, render_master_index(&ctx)).into_string(),
        entry_count: index.entries.len(),
    }
}
