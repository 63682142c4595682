//! Site configuration module.
//!
//! Handles loading and validating `config.toml`. The file lives in
//! the source root; every key is optional and overrides the stock default.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! title = "開発日誌"          # Title of the top and master index pages
//! base_url = ""              # Prefix for deep links, e.g. "https://example.com/devlog"
//!
//! [build]
//! utc_offset = "+09:00"      # Offset every DATE: value is interpreted in
//! recent_count = 5           # Entries in the "latest posts" sidebar (0 hides it)
//! assets_dir = "assets"      # Copied verbatim to the output root if present
//! categories_file = "categories.toml"  # Category label → slug overrides
//!
//! [templates]
//! header = "templates/header.html"     # Must contain %TITLE%
//! footer = "templates/footer.html"
//!
//! [labels]
//! older_month = "前の月へ"   # ...and every other caption, see `gen-config`
//!
//! [locale]
//! weekday_names = ["月", "火", "水", "木", "金", "土", "日"]  # Monday first
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
///
/// All fields have defaults. User config files need only specify the values
/// they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Site identity (title, deep-link base).
    pub site: SiteInfo,
    /// Build behaviour (time zone, sidebar size, auxiliary files).
    pub build: BuildConfig,
    /// Header/footer template fragments.
    pub templates: TemplatesConfig,
    /// Every user-facing caption.
    pub labels: LabelsConfig,
    /// Weekday names used in entry dates.
    pub locale: LocaleConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.site.title.trim().is_empty() {
            return Err(ConfigError::Validation("site.title must not be empty".into()));
        }
        self.utc_offset()?;
        if self.templates.header.trim().is_empty() || self.templates.footer.trim().is_empty() {
            return Err(ConfigError::Validation(
                "templates.header and templates.footer must not be empty".into(),
            ));
        }
        if self.locale.weekday_names.iter().any(|n| n.trim().is_empty()) {
            return Err(ConfigError::Validation(
                "locale.weekday_names must all be non-empty".into(),
            ));
        }
        Ok(())
    }

    /// The configured offset as a chrono [`FixedOffset`].
    pub fn utc_offset(&self) -> Result<FixedOffset, ConfigError> {
        self.build.utc_offset.parse::<FixedOffset>().map_err(|_| {
            ConfigError::Validation(format!(
                "build.utc_offset must look like +09:00, got {:?}",
                self.build.utc_offset
            ))
        })
    }
}

/// Site identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteInfo {
    /// Title of the rolling top index and the master index.
    pub title: String,
    /// Absolute base used by the deep-link control. Empty means site-root
    /// relative (`/archive/...`).
    pub base_url: String,
}

impl Default for SiteInfo {
    fn default() -> Self {
        Self {
            title: "開発日誌".to_string(),
            base_url: String::new(),
        }
    }
}

/// Build behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Offset every `DATE:` value and `--now` is interpreted in.
    pub utc_offset: String,
    /// Size of the "latest posts" sidebar list. Zero omits the section.
    pub recent_count: usize,
    /// Directory (relative to the source root) copied to the output root.
    pub assets_dir: String,
    /// Category override file (relative to the source root).
    pub categories_file: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            utc_offset: "+09:00".to_string(),
            recent_count: 5,
            assets_dir: "assets".to_string(),
            categories_file: "categories.toml".to_string(),
        }
    }
}

/// Header/footer template fragments, relative to the source root.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TemplatesConfig {
    pub header: String,
    pub footer: String,
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            header: "templates/header.html".to_string(),
            footer: "templates/footer.html".to_string(),
        }
    }
}

/// Captions for navigation controls and sidebar sections.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LabelsConfig {
    /// Sidebar link to the rolling top index.
    pub top: String,
    /// Sidebar link to the master index.
    pub full_index: String,
    /// Heading of the latest-posts section.
    pub recent: String,
    /// Heading of the category list.
    pub categories: String,
    /// Heading of the year → month tree.
    pub archives: String,
    /// Summary of the compact menu.
    pub menu: String,
    /// Display name of entries without a category.
    pub uncategorized: String,
    pub older_month: String,
    pub newer_month: String,
    pub older_page: String,
    pub newer_page: String,
    /// Top index navigation.
    pub older: String,
    pub newer: String,
    /// Toggle that reveals an extended body.
    pub open_extended: String,
    /// Jump control pointing at the next entry on the page.
    pub next_entry: String,
    /// Deep-link control.
    pub permalink: String,
    /// Master index control between year sections.
    pub back_to_top: String,
}

impl Default for LabelsConfig {
    fn default() -> Self {
        Self {
            top: "開発日誌トップ".to_string(),
            full_index: "記事一覧".to_string(),
            recent: "最近の記事".to_string(),
            categories: "カテゴリ".to_string(),
            archives: "アーカイブ".to_string(),
            menu: "メニュー".to_string(),
            uncategorized: "uncategorized".to_string(),
            older_month: "前の月へ".to_string(),
            newer_month: "次の月へ".to_string(),
            older_page: "前のページ".to_string(),
            newer_page: "次のページ".to_string(),
            older: "前へ".to_string(),
            newer: "次へ".to_string(),
            open_extended: "追記を開く".to_string(),
            next_entry: "次の記事へ".to_string(),
            permalink: "この記事へのリンク".to_string(),
            back_to_top: "ページトップへ".to_string(),
        }
    }
}

/// Locale settings for date rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LocaleConfig {
    /// Weekday names, Monday first.
    pub weekday_names: [String; 7],
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            weekday_names: ["月", "火", "水", "木", "金", "土", "日"].map(String::from),
        }
    }
}

// =============================================================================
// Config loading and validation
// =============================================================================

/// Load `config.toml` from the source root.
///
/// Every section and key is optional and falls back to its default; a
/// missing file yields the defaults. Unknown keys are rejected and the
/// result is validated.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let config_path = root.join("config.toml");
    let config = if config_path.exists() {
        toml::from_str(&fs::read_to_string(&config_path)?)?
    } else {
        SiteConfig::default()
    };
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# daybook configuration
# =====================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.

# ---------------------------------------------------------------------------
# Site
# ---------------------------------------------------------------------------
[site]
# Title of the rolling top index and the master index.
title = "開発日誌"

# Prefix for the deep-link control, e.g. "https://example.com/devlog".
# Empty produces site-root relative links (/archive/2024/01.html#2024-01-05).
base_url = ""

# ---------------------------------------------------------------------------
# Build
# ---------------------------------------------------------------------------
[build]
# Offset every DATE: value (and --now) is interpreted in.
utc_offset = "+09:00"

# Number of entries in the "latest posts" sidebar section. 0 hides it.
recent_count = 5

# Directory copied verbatim to the output root (scripts, images).
assets_dir = "assets"

# Flat table of category label = "directory slug" overrides.
categories_file = "categories.toml"

# ---------------------------------------------------------------------------
# Templates (paths relative to the source directory)
# ---------------------------------------------------------------------------
[templates]
# Opening HTML. %TITLE% is replaced with the escaped page title.
header = "templates/header.html"
# Closing HTML.
footer = "templates/footer.html"

# ---------------------------------------------------------------------------
# Captions
# ---------------------------------------------------------------------------
[labels]
top = "開発日誌トップ"
full_index = "記事一覧"
recent = "最近の記事"
categories = "カテゴリ"
archives = "アーカイブ"
menu = "メニュー"
uncategorized = "uncategorized"
older_month = "前の月へ"
newer_month = "次の月へ"
older_page = "前のページ"
newer_page = "次のページ"
older = "前へ"
newer = "次へ"
open_extended = "追記を開く"
next_entry = "次の記事へ"
permalink = "この記事へのリンク"
back_to_top = "ページトップへ"

# ---------------------------------------------------------------------------
# Locale
# ---------------------------------------------------------------------------
[locale]
# Weekday names shown after entry dates, Monday first.
weekday_names = ["月", "火", "水", "木", "金", "土", "日"]
"##
}
