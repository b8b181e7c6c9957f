//! CLI output formatting.
//!
//! # Information-First Display
//!
//! Every entry is shown by its semantic identity first, 1-based position
//! and name, with its slug after an arrow. Facts about the entry follow as
//! indented context lines, only when present:
//!
//! ```text
//! 001 OWASP Juice Shop → owasp-juice-shop
//!     Technology: Node.js, Angular
//!     Collections: online, container
//!     Last contribution: Mar 22, 2024 (< 1mo)
//! 002 DVWA → dvwa
//! ```
//!
//! ## Search
//!
//! ```text
//! Search "shop" [technology: node.js]
//! 001 OWASP Juice Shop → owasp-juice-shop
//! 1 of 2 apps match
//! ```
//!
//! ## Generate
//!
//! ```text
//! Home → index.html
//! 001 OWASP Juice Shop → app/owasp-juice-shop/index.html
//! Not found → 404.html
//!
//! Generated 1 page
//! ```
//!
//! # Architecture
//!
//! Each `format_*` function returns `Vec<String>` and does no I/O, so it can
//! be tested directly; the `print_*` wrappers write the lines to stdout.

use crate::age;
use crate::config::DirectoryConfig;
use crate::generate::GenerateReport;
use crate::query::SearchFilters;
use crate::render::format_date;
use crate::types::Entry;
use std::collections::BTreeSet;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Header line for an entry: source position, name and slug.
fn entry_header(entry: &Entry) -> String {
    let name = if entry.name.is_empty() {
        "(unnamed)"
    } else {
        entry.name.as_str()
    };
    format!("{} {} → {}", format_index(entry.index + 1), name, entry.slug)
}

/// Context lines for an entry's present facts.
fn entry_context(entry: &Entry) -> Vec<String> {
    let pad = indent(1);
    let mut lines = Vec::new();
    if let Some(author) = entry.author.as_deref().filter(|a| !a.is_empty()) {
        lines.push(format!("{pad}Author: {author}"));
    }
    if !entry.technology.is_empty() {
        lines.push(format!("{pad}Technology: {}", entry.technology.join(", ")));
    }
    if !entry.collection.is_empty() {
        lines.push(format!("{pad}Collections: {}", entry.collection.join(", ")));
    }
    if let Some(stars) = entry.stars {
        lines.push(format!("{pad}Stars: {stars}"));
    }
    if let Some(raw) = entry.last_contributed.as_deref().filter(|d| !d.is_empty()) {
        let date = format_date(raw);
        let line = match age::classify(Some(raw)) {
            Some(band) => format!("{pad}Last contribution: {date} ({})", band.label()),
            None => format!("{pad}Last contribution: {date}"),
        };
        lines.push(line);
    }
    lines
}

fn describe_facet(name: &str, tags: &BTreeSet<String>) -> Option<String> {
    if tags.is_empty() {
        return None;
    }
    let joined: Vec<&str> = tags.iter().map(String::as_str).collect();
    Some(format!("[{name}: {}]", joined.join(", ")))
}

fn plural(n: usize, singular: &str, plural: &str) -> String {
    if n == 1 {
        format!("{n} {singular}")
    } else {
        format!("{n} {plural}")
    }
}

// ============================================================================
// List
// ============================================================================

/// Format every entry with its context lines.
pub fn format_entry_list(entries: &[Entry]) -> Vec<String> {
    let mut lines = Vec::new();
    for entry in entries {
        lines.push(entry_header(entry));
        lines.extend(entry_context(entry));
    }
    lines.push(plural(entries.len(), "app", "apps"));
    lines
}

pub fn print_entry_list(entries: &[Entry]) {
    for line in format_entry_list(entries) {
        println!("{}", line);
    }
}

// ============================================================================
// Search
// ============================================================================

/// Format search results: the query line, one header per match, a summary.
pub fn format_search_output(
    query: &str,
    filters: &SearchFilters,
    results: &[Entry],
    total: usize,
) -> Vec<String> {
    let mut heading = format!("Search \"{}\"", query.trim());
    for facet in [
        describe_facet("collection", &filters.collection),
        describe_facet("technology", &filters.technology),
    ]
    .into_iter()
    .flatten()
    {
        heading.push(' ');
        heading.push_str(&facet);
    }

    let mut lines = vec![heading];
    lines.extend(results.iter().map(entry_header));
    lines.push(format!(
        "{} of {} match",
        results.len(),
        plural(total, "app", "apps")
    ));
    lines
}

pub fn print_search_output(query: &str, filters: &SearchFilters, results: &[Entry], total: usize) {
    for line in format_search_output(query, filters, results, total) {
        println!("{}", line);
    }
}

// ============================================================================
// Generate
// ============================================================================

/// Format what a generate run wrote.
pub fn format_generate_output(report: &GenerateReport) -> Vec<String> {
    let mut lines = vec![format!("Home → {}", report.index.display())];
    for (pos, (name, path)) in report.pages.iter().enumerate() {
        lines.push(format!("{} {} → {}", format_index(pos + 1), name, path.display()));
    }
    lines.push(format!("Not found → {}", report.not_found.display()));
    for name in &report.skipped {
        lines.push(format!("{}Skipped (no slug): {}", indent(1), name));
    }
    lines.push(String::new());
    lines.push(format!(
        "Generated {}",
        plural(report.pages.len(), "page", "pages")
    ));
    lines
}

pub fn print_generate_output(report: &GenerateReport) {
    for line in format_generate_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Config
// ============================================================================

/// Format the effective configuration.
pub fn format_config_summary(config: &DirectoryConfig) -> Vec<String> {
    let base = if config.base_path.is_empty() {
        "(relative)"
    } else {
        config.base_path.as_str()
    };
    vec![
        "Config".to_string(),
        format!("{}Base path: {}", indent(1), base),
        format!("{}Data: {}", indent(1), config.data_path),
        format!("{}Detail links: {:?}", indent(1), config.detail_style),
    ]
}

pub fn print_config_summary(config: &DirectoryConfig) {
    for line in format_config_summary(config) {
        println!("{}", line);
    }
}
