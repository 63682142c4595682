//! Stage orchestration shared by the CLI commands.
//!
//! Each function runs a prefix of the pipeline and stops: [`scan`] parses,
//! [`scan_and_index`] parses and indexes, [`build`] runs everything and writes the
//! site. Errors from every stage are collected into [`BuildError`].

use crate::config::{self, ConfigError, SiteConfig};
use crate::generate::{self, GenerateError, GenerateReport};
use crate::index::{self, SiteIndex};
use crate::naming::{CategorySlugs, OverrideError};
use crate::parse::{self, ParseError, ParseOptions};
use crate::template::{TemplateError, Templates};
use crate::types::Entry;
use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("Category override error: {0}")]
    Overrides(#[from] OverrideError),
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),
    #[error("Generate error: {0}")]
    Generate(#[from] GenerateError),
    #[error("Invalid build time {0:?} (expected YYYY-MM-DD or YYYY-MM-DD HH:MM:SS)")]
    InvalidNow(String),
}

/// Directories involved in a run.
#[derive(Debug, Clone)]
pub struct Paths {
    pub source: PathBuf,
    pub output: PathBuf,
    pub temp_dir: PathBuf,
}

/// Stage 1 output: resolved config plus every parsed entry.
///
/// Serialized as `manifest.json` by the `scan` command.
#[derive(Debug, Serialize)]
pub struct Manifest {
    /// Source files read, relative to the source root, in parse order.
    pub sources: Vec<String>,
    pub entries: Vec<Entry>,
    pub config: SiteConfig,
}

/// Result of a full build.
#[derive(Debug)]
pub struct BuildReport {
    pub manifest: Manifest,
    pub index: SiteIndex,
    pub generated: GenerateReport,
}

/// Load config and parse every source under `paths.source`.
pub fn scan(paths: &Paths, secret: Option<String>) -> Result<Manifest, BuildError> {
    let config = config::load_config(&paths.source)?;
    let options = ParseOptions::new(config.utc_offset()?).with_secret(secret);

    let sources = parse::discover_sources(&paths.source, &excluded_dirs(paths, &config))?;
    let entries = parse::parse_files(&sources, &paths.source, &options)?;
    info!(sources = sources.len(), entries = entries.len(), "parsed sources");

    Ok(Manifest {
        sources: sources
            .iter()
            .map(|p| {
                p.strip_prefix(&paths.source)
                    .unwrap_or(p)
                    .to_string_lossy()
                    .to_string()
            })
            .collect(),
        entries,
        config,
    })
}

/// Parse and index the source tree as seen at `now`.
pub fn scan_and_index(
    paths: &Paths,
    secret: Option<String>,
    now: Option<&str>,
) -> Result<(Manifest, SiteIndex), BuildError> {
    let manifest = scan(paths, secret)?;
    let site_index = index_manifest(&manifest, &paths.source, now)?;
    Ok((manifest, site_index))
}

/// Run the whole pipeline and write the site.
///
/// Templates are loaded before anything is written, so a missing template
/// leaves the output directory untouched.
pub fn build(
    paths: &Paths,
    secret: Option<String>,
    now: Option<&str>,
) -> Result<BuildReport, BuildError> {
    let (manifest, site_index) = scan_and_index(paths, secret, now)?;
    let config = &manifest.config;
    let templates = Templates::load(&paths.source, &config.templates)?;

    let generated = generate::generate(
        &site_index,
        config,
        &templates,
        &paths.source.join(&config.build.assets_dir),
        &paths.output,
    )?;
    info!(pages = generated.pages.len(), output = %paths.output.display(), "site written");

    Ok(BuildReport {
        manifest,
        index: site_index,
        generated,
    })
}

fn index_manifest(
    manifest: &Manifest,
    source: &Path,
    now: Option<&str>,
) -> Result<SiteIndex, BuildError> {
    let config = &manifest.config;
    let offset = config.utc_offset()?;
    let now = resolve_now(now, offset)?;
    let slugs = CategorySlugs::load(&source.join(&config.build.categories_file))?;

    let site_index = index::build_index(
        manifest.entries.clone(),
        now,
        &slugs,
        config.build.recent_count,
    );
    info!(
        visible = site_index.entries.len(),
        undated = site_index.undated,
        scheduled = site_index.scheduled,
        build_time = %now,
        "indexed entries"
    );
    Ok(site_index)
}

/// The build time: `now` parsed in `offset`, or the current time.
pub fn resolve_now(
    now: Option<&str>,
    offset: FixedOffset,
) -> Result<DateTime<FixedOffset>, BuildError> {
    match now {
        Some(value) => parse::parse_timestamp(value.trim(), offset)
            .ok_or_else(|| BuildError::InvalidNow(value.to_string())),
        None => Ok(Utc::now().with_timezone(&offset)),
    }
}

/// Directories under the source root that never hold entry sources.
fn excluded_dirs(paths: &Paths, config: &SiteConfig) -> Vec<PathBuf> {
    let mut excluded = vec![
        paths.source.join(&config.build.assets_dir),
        paths.output.clone(),
        paths.temp_dir.clone(),
    ];
    for template in [&config.templates.header, &config.templates.footer] {
        if let Some(parent) = Path::new(template)
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
        {
            excluded.push(paths.source.join(parent));
        }
    }
    excluded
}
