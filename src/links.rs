//! Link construction against the configured base path.
//!
//! | base_path | home | detail (`fragment`) | detail (`path`) |
//! |---|---|---|---|
//! | `""` | `./` | `app/#slug` | `app/slug/` |
//! | `"/vwad"` | `/vwad/` | `/vwad/app/#slug` | `/vwad/app/slug/` |
//!
//! Pages written below the site root by the static export use
//! [`Links::nested`] so relative links climb back up to the root.

use crate::config::{DetailStyle, DirectoryConfig};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Links {
    /// Normalized prefix: empty, or ending in exactly one `/`.
    prefix: String,
    style: DetailStyle,
}

impl Links {
    pub fn new(base_path: &str, style: DetailStyle) -> Self {
        let trimmed = base_path.trim().trim_end_matches('/');
        let prefix = if trimmed.is_empty() {
            // "/" alone means the server root
            if base_path.trim().starts_with('/') {
                "/".to_string()
            } else {
                String::new()
            }
        } else {
            format!("{trimmed}/")
        };
        Self { prefix, style }
    }

    pub fn from_config(config: &DirectoryConfig) -> Self {
        Self::new(&config.base_path, config.detail_style)
    }

    /// Same links, as seen from a page `depth` directories below the root.
    ///
    /// Only relative links change; an absolute base path is kept as is.
    pub fn nested(&self, depth: usize) -> Self {
        if !self.prefix.is_empty() || depth == 0 {
            return self.clone();
        }
        Self {
            prefix: "../".repeat(depth),
            style: self.style,
        }
    }

    /// Same base path with a different detail spelling.
    pub fn with_style(&self, style: DetailStyle) -> Self {
        Self {
            prefix: self.prefix.clone(),
            style,
        }
    }

    pub fn style(&self) -> DetailStyle {
        self.style
    }

    /// Link back to the directory index.
    pub fn home(&self) -> String {
        if self.prefix.is_empty() {
            "./".to_string()
        } else {
            self.prefix.clone()
        }
    }

    /// Link to an entry's detail location.
    pub fn detail(&self, slug: &str) -> String {
        match self.style {
            DetailStyle::Fragment => format!("{}app/#{slug}", self.prefix),
            DetailStyle::Path => format!("{}app/{slug}/", self.prefix),
        }
    }
}

impl Default for Links {
    fn default() -> Self {
        Self::new("", DetailStyle::default())
    }
}
