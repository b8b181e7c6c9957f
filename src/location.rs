//! Extracting the requested slug from a navigational location.
//!
//! Two spellings reach a detail view:
//! - `/app/juice-shop/`: the slug is the path segment after `app/`;
//! - `/app/#juice-shop`: the slug is the fragment.
//!
//! The path form wins when present. `html` after `app/` is the static
//! detail-page filename (`app/index.html` style links), not a slug, so it
//! falls through to the fragment.

/// Reserved segment that is never treated as a slug.
const RESERVED_SEGMENT: &str = "html";

/// Resolve the slug for a `path` and `fragment`, or `None`.
pub fn resolve_slug(path: &str, fragment: &str) -> Option<String> {
    if let Some(slug) = slug_from_path(path) {
        return Some(slug.to_string());
    }
    let fragment = fragment.strip_prefix('#').unwrap_or(fragment).trim();
    (!fragment.is_empty()).then(|| fragment.to_string())
}

/// Segment following the first `app/` segment of `path`.
fn slug_from_path(path: &str) -> Option<&str> {
    let rest = path
        .match_indices("app/")
        .find(|(pos, _)| *pos == 0 || path.as_bytes()[pos - 1] == b'/')
        .map(|(pos, m)| &path[pos + m.len()..])?;
    let rest = rest.strip_suffix('/').unwrap_or(rest);
    let segment = rest.split('/').next().unwrap_or_default();
    (!segment.is_empty() && segment != RESERVED_SEGMENT).then_some(segment)
}
