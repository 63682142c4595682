//! Category label → output directory slug resolution.
//!
//! Every category page lives under `category/<slug>/`. The slug comes from
//! a two-tier lookup:
//!
//! 1. An explicit override from `categories.toml` (`"日記" = "diary"`).
//! 2. Otherwise the label itself with `/`, `\\` and spaces replaced by `_`.
//!
//! If both come out empty (the label of uncategorized entries is the empty
//! string) the fixed [`UNCATEGORIZED_SLUG`] is used. A slug is always a
//! single path segment: an override containing a separator or made only of
//! dots is ignored, and a derived slug made only of dots has them replaced.
//!
//! ```text
//! "diary"        → diary
//! "tools/editor" → tools_editor
//! "map editor"   → map_editor
//! ".."           → __
//! ""             → uncategorized
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

/// Slug for the empty label, and the last-resort fallback.
pub const UNCATEGORIZED_SLUG: &str = "uncategorized";

#[derive(Error, Debug)]
pub enum OverrideError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Category override file is not a table of strings: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Label → slug overrides loaded from the category override file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategorySlugs {
    overrides: BTreeMap<String, String>,
}

impl CategorySlugs {
    pub fn new(overrides: BTreeMap<String, String>) -> Self {
        Self { overrides }
    }

    /// Load overrides from a flat TOML table of `label = "slug"` pairs.
    ///
    /// A missing file is not an error; it yields no overrides.
    pub fn load(path: &Path) -> Result<Self, OverrideError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let overrides: BTreeMap<String, String> = toml::from_str(&content)?;
        Ok(Self::new(overrides))
    }

    /// Resolve the directory slug for a category label.
    pub fn resolve(&self, label: &str) -> String {
        let Some(slug) = self.overrides.get(label).map(|s| s.trim()).filter(|s| !s.is_empty())
        else {
            return derive_slug(label);
        };
        if is_single_segment(slug) {
            slug.to_string()
        } else {
            warn!(label, slug, "category override is not a single directory name, ignored");
            derive_slug(label)
        }
    }

    pub fn len(&self) -> usize {
        self.overrides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }
}

/// Derive a slug from a label by replacing path-unsafe characters.
pub fn derive_slug(label: &str) -> String {
    let slug = label.replace(['/', '\\', ' '], "_");
    if slug.is_empty() {
        UNCATEGORIZED_SLUG.to_string()
    } else if is_dots(&slug) {
        slug.replace('.', "_")
    } else {
        slug
    }
}

fn is_dots(slug: &str) -> bool {
    slug.chars().all(|c| c == '.')
}

fn is_single_segment(slug: &str) -> bool {
    !slug.contains(['/', '\\']) && !is_dots(slug)
}
