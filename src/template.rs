//! Header and footer template fragments.
//!
//! Every page is `header + body + footer`. Both fragments are plain HTML
//! files in the source tree; any `%TITLE%` in them is replaced with the
//! HTML-escaped page title. Both files are required: a missing one aborts
//! the build before any page is written.

use crate::config::TemplatesConfig;
use maud::html;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Placeholder replaced with the page title.
pub const TITLE_PLACEHOLDER: &str = "%TITLE%";

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Template file not found: {}", path.display())]
    Missing { path: PathBuf },
    #[error("Failed to read template {}: {err}", path.display())]
    Io { path: PathBuf, err: std::io::Error },
}

/// Loaded header and footer text.
#[derive(Debug, Clone, PartialEq)]
pub struct Templates {
    pub header: String,
    pub footer: String,
}

impl Templates {
    /// Read both fragments, resolving paths against `root`.
    pub fn load(root: &Path, config: &TemplatesConfig) -> Result<Self, TemplateError> {
        Ok(Self {
            header: read_fragment(&root.join(&config.header))?,
            footer: read_fragment(&root.join(&config.footer))?,
        })
    }

    /// Surround `body` with the fragments, substituting the escaped title.
    pub fn wrap(&self, title: &str, body: &str) -> String {
        let escaped = html! { (title) }.into_string();
        let mut page = String::with_capacity(self.header.len() + body.len() + self.footer.len());
        page.push_str(&self.header.replace(TITLE_PLACEHOLDER, &escaped));
        page.push_str(body);
        page.push_str(&self.footer.replace(TITLE_PLACEHOLDER, &escaped));
        page
    }
}

fn read_fragment(path: &Path) -> Result<String, TemplateError> {
    if !path.is_file() {
        return Err(TemplateError::Missing {
            path: path.to_path_buf(),
        });
    }
    fs::read_to_string(path).map_err(|err| TemplateError::Io {
        path: path.to_path_buf(),
        err,
    })
}
