//! Static export of the directory.
//!
//! Writes a browsable copy of the collection that needs no client-side
//! code: every detail link points at a real page.
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html                 # Every entry as a card linking to its page
//! ├── 404.html                   # Not-found page linking home
//! └── app/
//!     ├── owasp-juice-shop/
//!     │   └── index.html         # Detail page with a back link
//!     └── dvwa/
//!         └── index.html
//! ```
//!
//! Detail pages live at `app/{slug}/`, which is exactly the path form
//! [`resolve_slug`](crate::location::resolve_slug) understands, so exported
//! links always use [`DetailStyle::Path`] regardless of the configured
//! style. Entries whose slug is empty cannot get a page of their own and are
//! listed on the index only.
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for the document shell; the entry
//! markup itself comes from [`render`](crate::render).

use crate::config::{DetailStyle, DirectoryConfig};
use crate::escape::Text;
use crate::links::Links;
use crate::render::{RenderOptions, render_entry};
use crate::types::{Collection, Entry};
use maud::{DOCTYPE, Markup, html};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// What a generate run wrote, relative to the output directory.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GenerateReport {
    pub index: PathBuf,
    pub not_found: PathBuf,
    /// `(entry name, page path)` in collection order.
    pub pages: Vec<(String, PathBuf)>,
    /// Names of entries that got no page (empty slug).
    pub skipped: Vec<String>,
}

pub fn generate(
    collection: &Collection,
    config: &DirectoryConfig,
    output_dir: &Path,
) -> Result<GenerateReport, GenerateError> {
    let links = Links::new(&config.base_path, DetailStyle::Path);
    let mut report = GenerateReport::default();

    fs::create_dir_all(output_dir)?;

    let index_html = render_index(collection, config, &links);
    report.index = PathBuf::from("index.html");
    fs::write(output_dir.join(&report.index), index_html.into_string())?;

    let not_found_html = render_not_found(config);
    report.not_found = PathBuf::from("404.html");
    fs::write(output_dir.join(&report.not_found), not_found_html.into_string())?;

    let page_links = links.nested(2);
    for entry in collection {
        if entry.slug.is_empty() {
            report.skipped.push(entry.name.clone());
            continue;
        }
        let relative = Path::new("app").join(&entry.slug).join("index.html");
        let page_dir = output_dir.join("app").join(&entry.slug);
        fs::create_dir_all(&page_dir)?;

        let page_html = render_detail_page(entry, config, &page_links);
        fs::write(output_dir.join(&relative), page_html.into_string())?;
        report.pages.push((entry.name.clone(), relative));
    }

    Ok(report)
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure
fn base_document(title: &str, lang: &str, body_class: Option<&str>, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang=(Text(lang)) {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (Text(title)) }
            }
            body class=[body_class] {
                (content)
            }
        }
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

/// Renders the directory index with one card per entry
fn render_index(collection: &Collection, config: &DirectoryConfig, links: &Links) -> Markup {
    let content = html! {
        header.site-header {
            h1 { (Text(&config.site.title)) }
            p.directory-count { (collection.len()) " apps" }
        }
        main.directory {
            @for entry in collection {
                (render_entry(Some(entry), &RenderOptions::card(), links))
            }
        }
    };

    base_document(&config.site.title, &config.site.lang, Some("directory"), content)
}

/// Renders a standalone detail page
fn render_detail_page(entry: &Entry, config: &DirectoryConfig, links: &Links) -> Markup {
    let title = format!("{} - {}", entry.name, config.site.title);
    let content = html! {
        main.app-page {
            (render_entry(Some(entry), &RenderOptions::detail_page(), links))
        }
    };

    base_document(&title, &config.site.lang, Some("app"), content)
}

/// Renders the not-found page; it may be served from any depth, so the home
/// link is absolute.
fn render_not_found(config: &DirectoryConfig) -> Markup {
    let base = if config.base_path.is_empty() {
        "/"
    } else {
        config.base_path.as_str()
    };
    let home = Links::new(base, DetailStyle::Path).home();
    let content = html! {
        main.not-found {
            h1 { "Page not found" }
            p { "The app you are looking for is not in the directory." }
            p.app-detail-back { a href=(Text(&home)) { "← Back to directory" } }
        }
    };

    base_document(
        &format!("Not found - {}", config.site.title),
        &config.site.lang,
        None,
        content,
    )
}

// ============================================================================
// Tests
// ============================================================================
