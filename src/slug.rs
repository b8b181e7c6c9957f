//! Slug derivation for catalogue entries.
//!
//! Every entry gets a URL-safe identifier derived from its name. Slugs are
//! unique within one collection: the first entry to produce a given base
//! slug keeps it unadorned, later duplicates get `-2`, `-3`, … appended.
//!
//! ## Normalization
//!
//! The name is lower-cased, every maximal run of characters outside
//! `[a-z0-9]` collapses into a single `-`, and leading/trailing dashes are
//! trimmed:
//! - `"OWASP Juice Shop"` → `"owasp-juice-shop"`
//! - `"Foo Bar!!"` → `"foo-bar"`
//! - `"foo--bar"` → `"foo-bar"`
//! - `"Café"` → `"caf"` (non-ASCII letters are outside the allowed set)
//! - `""` → `""` (a legal, if degenerate, base)

use crate::types::Entry;
use std::collections::HashSet;

/// Normalize a name into a base slug.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;
    for c in name.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Assign `slug` and `index` to every entry, in input order.
///
/// Deterministic for a fixed input order: an entry's slug depends only on
/// its own name and the slugs already handed out to earlier entries.
pub fn assign_slugs(entries: &mut [Entry]) {
    let mut used: HashSet<String> = HashSet::with_capacity(entries.len());
    for (index, entry) in entries.iter_mut().enumerate() {
        let base = slugify(&entry.name);
        let mut candidate = base.clone();
        let mut n = 1;
        while used.contains(&candidate) {
            n += 1;
            candidate = format!("{base}-{n}");
        }
        used.insert(candidate.clone());
        entry.slug = candidate;
        entry.index = index;
    }
}
