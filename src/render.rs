//! HTML detail view for a single entry.
//!
//! [`render_entry`] is a pure function from an entry and [`RenderOptions`]
//! to markup. The same template serves the detail page, the featured-app
//! card on the directory index, and the static export.
//!
//! ## Structure
//!
//! ```text
//! article.app-detail
//! ├── h1.app-detail-title          plain, or linked to the detail page
//! ├── div.app-detail-meta          one row per present field:
//! │   ├── Collections              pill per tag
//! │   ├── Technology               pill per tag
//! │   ├── Author
//! │   ├── Stars                    shields.io badge image
//! │   └── Last contribution        formatted date + age-band pill
//! ├── div.app-detail-links         "Main link" + one button per reference
//! ├── div.app-detail-notes         only when notes are present
//! └── p.app-detail-back            optional back / details link
//! ```
//!
//! Every entry-derived string goes through [`Text`], which escapes all five
//! HTML metacharacters. External links open in a new tab with
//! `rel="noopener"`.

use crate::age::{self, AgeBand};
use crate::escape::Text;
use crate::links::Links;
use crate::types::Entry;
use chrono::{DateTime, Utc};
use maud::{Markup, html};

/// Trailing navigation link under the detail view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BackLink {
    #[default]
    None,
    /// "← Back to directory", pointing at the directory index.
    Home,
    /// "View full details", pointing at the entry's detail page.
    Slug,
}

/// Whether the title links to the entry's detail page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TitleLink {
    #[default]
    None,
    Slug,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    pub back_link: BackLink,
    pub title_link: TitleLink,
}

impl RenderOptions {
    /// Options for a standalone detail page.
    pub fn detail_page() -> Self {
        Self {
            back_link: BackLink::Home,
            title_link: TitleLink::None,
        }
    }

    /// Options for an entry card that leads to its detail page.
    pub fn card() -> Self {
        Self {
            back_link: BackLink::Slug,
            title_link: TitleLink::Slug,
        }
    }
}

/// Render `entry`, or nothing when there is no entry.
pub fn render_entry(entry: Option<&Entry>, options: &RenderOptions, links: &Links) -> Markup {
    render_entry_at(entry, options, links, Utc::now())
}

/// [`render_entry`] with an explicit clock for the age band.
pub fn render_entry_at(
    entry: Option<&Entry>,
    options: &RenderOptions,
    links: &Links,
    now: DateTime<Utc>,
) -> Markup {
    let Some(entry) = entry else {
        return html! {};
    };
    let has_slug = !entry.slug.is_empty();
    let title_href = (options.title_link == TitleLink::Slug && has_slug)
        .then(|| links.detail(&entry.slug));

    html! {
        article.app-detail {
            h1.app-detail-title {
                @if let Some(href) = &title_href {
                    a href=(Text(href)) { (Text(&entry.name)) }
                } @else {
                    (Text(&entry.name))
                }
            }
            (meta_block(entry, now))
            (links_block(entry))
            @if let Some(notes) = non_empty(entry.notes.as_deref()) {
                div.app-detail-notes {
                    h2 { "Notes" }
                    p { (Text(notes)) }
                }
            }
            @match options.back_link {
                BackLink::Home => {
                    p.app-detail-back {
                        a href=(Text(&links.home())) { "← Back to directory" }
                    }
                }
                BackLink::Slug if has_slug => {
                    p.app-detail-back {
                        a href=(Text(&links.detail(&entry.slug))) { "View full details" }
                    }
                }
                _ => {}
            }
        }
    }
}

fn meta_block(entry: &Entry, now: DateTime<Utc>) -> Markup {
    html! {
        div.app-detail-meta {
            @if !entry.collection.is_empty() {
                div.app-detail-row {
                    span.label { "Collections" }
                    @for tag in &entry.collection {
                        " " span.pill.pill-collection { (Text(tag)) }
                    }
                }
            }
            @if !entry.technology.is_empty() {
                div.app-detail-row {
                    span.label { "Technology" }
                    @for tag in &entry.technology {
                        " " span.pill { (Text(tag)) }
                    }
                }
            }
            @if let Some(author) = non_empty(entry.author.as_deref()) {
                div.app-detail-row {
                    span.label { "Author" } " " (Text(author))
                }
            }
            @if let Some(stars) = entry.stars {
                div.app-detail-row {
                    span.label { "Stars" } " "
                    img.app-detail-stars-badge
                        src=(Text(&stars_badge_url(stars)))
                        alt=(Text(&format!("{stars} stars")))
                        loading="lazy";
                }
            }
            @if let Some(raw) = non_empty(entry.last_contributed.as_deref()) {
                div.app-detail-row {
                    span.label { "Last contribution" } " " (Text(&format_date(raw)))
                    @if let Some(band) = age::classify_at(Some(raw), now) {
                        " " (age_pill(band))
                    }
                }
            }
        }
    }
}

fn links_block(entry: &Entry) -> Markup {
    let main_url = if entry.url.is_empty() { "#" } else { entry.url.as_str() };
    html! {
        div.app-detail-links {
            a.btn.btn-primary href=(Text(main_url)) target="_blank" rel="noopener" { "Main link" }
            @for reference in &entry.references {
                " "
                a.btn.btn-secondary href=(Text(&reference.url)) target="_blank" rel="noopener" {
                    (Text(&reference.name))
                }
            }
        }
    }
}

/// Pill showing how recently an entry saw a contribution.
pub fn age_pill(band: AgeBand) -> Markup {
    html! {
        span class={ "pill pill-updated pill-updated-" (band.slug()) } { (band.label()) }
    }
}

/// Badge image URL for a star count.
pub fn stars_badge_url(stars: i64) -> String {
    format!("https://img.shields.io/badge/stars-{stars}-007ec6?style=flat")
}

/// Human-readable date (`Mar 4, 2024`), or the input unchanged if unparseable.
pub fn format_date(raw: &str) -> String {
    match age::parse_timestamp(raw) {
        Some(dt) => dt.format("%b %-d, %Y").to_string(),
        None => raw.to_string(),
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

// ============================================================================
// Tests
// ============================================================================
