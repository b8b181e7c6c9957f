//! Directory configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. User values are
//! layered over the stock defaults, so a config file only needs the keys it
//! wants to change. Unknown keys are rejected.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! base_path = ""                      # "/prefix" or "https://host/prefix" ("" = relative)
//! data_path = "data/collection.json"  # Collection location, relative to the root
//! detail_style = "fragment"           # "fragment" → app/#slug, "path" → app/slug/
//!
//! [site]
//! title = "App Directory"             # Used in generated page titles
//! lang = "en"                         # <html lang> of generated pages
//! ```
//!
//! ## Base Path
//!
//! Detail and home links are built relative to the page when `base_path` is
//! empty. Set it when the directory is served below a sub-path, e.g.
//! `base_path = "/vwad"` turns the detail link for `juice-shop` into
//! `/vwad/app/#juice-shop`.

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

/// How links to an entry's detail location are spelled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailStyle {
    /// `app/#slug`, resolved client-side from the fragment.
    #[default]
    Fragment,
    /// `app/slug/`, one page per entry.
    Path,
}

/// Directory configuration loaded from `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DirectoryConfig {
    /// Root path prefix for absolute links. Empty means relative links.
    pub base_path: String,
    /// Location of the collection document, handed to the transport.
    #[serde(default = "default_data_path")]
    pub data_path: String,
    /// Spelling of detail-page links.
    pub detail_style: DetailStyle,
    /// Presentation settings for generated pages.
    pub site: SiteConfig,
}

fn default_data_path() -> String {
    "data/collection.json".to_string()
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            base_path: String::new(),
            data_path: default_data_path(),
            detail_style: DetailStyle::default(),
            site: SiteConfig::default(),
        }
    }
}

impl DirectoryConfig {
    /// Validate config values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data_path.trim().is_empty() {
            return Err(ConfigError::Validation("data_path must not be empty".into()));
        }
        if self.base_path.contains(['#', '?']) {
            return Err(ConfigError::Validation(
                "base_path must not contain '#' or '?'".into(),
            ));
        }
        let base = self.base_path.trim();
        if !base.is_empty() && !base.starts_with('/') && !base.contains("://") {
            return Err(ConfigError::Validation(format!(
                "base_path must start with '/' or be an absolute URL, got '{base}'"
            )));
        }
        if self.site.lang.trim().is_empty() {
            return Err(ConfigError::Validation("site.lang must not be empty".into()));
        }
        Ok(())
    }
}

/// Presentation settings for generated pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    pub title: String,
    pub lang: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "App Directory".to_string(),
            lang: "en".to_string(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(DirectoryConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<DirectoryConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: DirectoryConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
pub fn load_config(root: &Path) -> Result<DirectoryConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# App Directory Configuration
# ===========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# Root path prefix used when building absolute links (detail pages, the
# back-to-directory link). Leave empty for links relative to the page.
# Must start with "/" or be an absolute URL.
# Example: "/vwad" when the directory is served from https://host/vwad/
base_path = ""

# Location of the collection JSON array, relative to the directory root.
data_path = "data/collection.json"

# How detail links are spelled:
#   "fragment" -> app/#juice-shop   (single detail page reading the fragment)
#   "path"     -> app/juice-shop/   (one generated page per app)
detail_style = "fragment"

# ---------------------------------------------------------------------------
# Generated pages
# ---------------------------------------------------------------------------
[site]
# Title of the directory index; detail pages use "<app> - <title>".
title = "App Directory"

# Value of the <html lang> attribute.
lang = "en"
"##
}
