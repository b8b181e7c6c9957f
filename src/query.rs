//! Lookup and search over the loaded collection.
//!
//! The pure functions ([`find_by_slug`], [`filter_entries`]) work on any
//! slice of entries. [`QueryEngine`] wraps them behind the shared
//! [`CollectionLoader`], so every query waits for the single load and a
//! failed load surfaces as `Err(LoadError)` rather than an empty result.
//!
//! ## Filter semantics
//!
//! All active filters must pass:
//!
//! | Filter | Active when | Passes when |
//! |---|---|---|
//! | collection | set non-empty | an entry tag is in the set (exact, case-sensitive) |
//! | technology | set non-empty | an entry tag equals a set member, ignoring case |
//! | text | trimmed query non-empty | the lower-cased haystack contains the query |
//!
//! The haystack is name, author, notes, technology tags and collection tags
//! joined by spaces. There is no scoring: results keep collection order.

use crate::loader::{CollectionLoader, LoadError};
use crate::types::Entry;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Facet filters for [`filter_entries`]. Empty sets are inactive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilters {
    pub collection: BTreeSet<String>,
    pub technology: BTreeSet<String>,
}

impl SearchFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_collection(mut self, tag: impl Into<String>) -> Self {
        self.collection.insert(tag.into());
        self
    }

    pub fn with_technology(mut self, tag: impl Into<String>) -> Self {
        self.technology.insert(tag.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.collection.is_empty() && self.technology.is_empty()
    }
}

/// A search prepared once and applied to many entries.
struct Matcher<'f> {
    query: String,
    collection: &'f BTreeSet<String>,
    technology: BTreeSet<String>,
}

impl<'f> Matcher<'f> {
    fn new(query: &str, filters: &'f SearchFilters) -> Self {
        Self {
            query: query.trim().to_lowercase(),
            collection: &filters.collection,
            technology: filters.technology.iter().map(|t| t.to_lowercase()).collect(),
        }
    }

    fn matches(&self, entry: &Entry) -> bool {
        if !self.collection.is_empty()
            && !entry.collection.iter().any(|c| self.collection.contains(c))
        {
            return false;
        }
        if !self.technology.is_empty()
            && !entry
                .technology
                .iter()
                .any(|t| self.technology.contains(&t.to_lowercase()))
        {
            return false;
        }
        self.query.is_empty() || haystack(entry).contains(&self.query)
    }
}

/// Lower-cased searchable text of an entry.
fn haystack(entry: &Entry) -> String {
    let technology = entry.technology.join(" ");
    let collection = entry.collection.join(" ");
    [
        entry.name.as_str(),
        entry.author.as_deref().unwrap_or_default(),
        entry.notes.as_deref().unwrap_or_default(),
        technology.as_str(),
        collection.as_str(),
    ]
    .join(" ")
    .to_lowercase()
}

/// Whether a single entry passes `query` and `filters`.
pub fn matches(entry: &Entry, query: &str, filters: &SearchFilters) -> bool {
    Matcher::new(query, filters).matches(entry)
}

/// Entries passing `query` and `filters`, in input order.
pub fn filter_entries<'a>(
    entries: &'a [Entry],
    query: &str,
    filters: &SearchFilters,
) -> Vec<&'a Entry> {
    let matcher = Matcher::new(query, filters);
    entries.iter().filter(|e| matcher.matches(e)).collect()
}

/// First entry with the given slug.
pub fn find_by_slug<'a>(entries: &'a [Entry], slug: &str) -> Option<&'a Entry> {
    entries.iter().find(|e| e.slug == slug)
}

/// Queries against the loader's shared snapshot.
#[derive(Clone)]
pub struct QueryEngine {
    loader: Arc<CollectionLoader>,
}

impl QueryEngine {
    pub fn new(loader: Arc<CollectionLoader>) -> Self {
        Self { loader }
    }

    pub fn loader(&self) -> &CollectionLoader {
        &self.loader
    }

    /// Entry with the given slug; `Ok(None)` when there is none.
    pub async fn app_by_slug(&self, slug: &str) -> Result<Option<Entry>, LoadError> {
        let collection = self.loader.load().await?;
        Ok(find_by_slug(collection.entries(), slug).cloned())
    }

    /// Entries passing `query` and `filters`, in collection order.
    pub async fn search(
        &self,
        query: &str,
        filters: &SearchFilters,
    ) -> Result<Vec<Entry>, LoadError> {
        let collection = self.loader.load().await?;
        Ok(filter_entries(collection.entries(), query, filters)
            .into_iter()
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{Transport, TransportResponse};
    use crate::types::Collection;
    use async_trait::async_trait;

    fn entry(name: &str, technology: &[&str], collection: &[&str]) -> Entry {
        Entry {
            name: name.to_string(),
            technology: technology.iter().map(|s| s.to_string()).collect(),
            collection: collection.iter().map(|s| s.to_string()).collect(),
            ..Entry::default()
        }
    }

    fn sample() -> Collection {
        Collection::from_raw(vec![
            Entry {
                author: Some("Bjoern Kimminich".into()),
                notes: Some("Probably the most modern insecure web app".into()),
                ..entry("OWASP Juice Shop", &["Node.js", "Angular"], &["online", "container"])
            },
            entry("DVWA", &["PHP", "MySQL"], &["offline", "container"]),
            entry("Router Lab", &["react-router"], &["offline"]),
            entry("React Goat", &["React"], &["online"]),
            entry("Bare", &[], &[]),
        ])
    }

    fn names(entries: &[&Entry]) -> Vec<String> {
        entries.iter().map(|e| e.name.clone()).collect()
    }

    #[test]
    fn empty_query_and_filters_return_everything_in_order() {
        let collection = sample();
        let found = filter_entries(collection.entries(), "", &SearchFilters::new());
        assert_eq!(
            names(&found),
            vec!["OWASP Juice Shop", "DVWA", "Router Lab", "React Goat", "Bare"]
        );
    }

    #[test]
    fn whitespace_query_counts_as_empty() {
        let collection = sample();
        let found = filter_entries(collection.entries(), "   ", &SearchFilters::new());
        assert_eq!(found.len(), 5);
    }

    #[test]
    fn text_search_is_case_insensitive_substring() {
        let collection = sample();
        let found = filter_entries(collection.entries(), "  JUICE ", &SearchFilters::new());
        assert_eq!(names(&found), vec!["OWASP Juice Shop"]);
    }

    #[test]
    fn text_search_covers_author_notes_and_tags() {
        let collection = sample();
        let entries = collection.entries();
        let none = SearchFilters::new();
        let juice = vec!["OWASP Juice Shop"];
        assert_eq!(names(&filter_entries(entries, "kimminich", &none)), juice);
        assert_eq!(names(&filter_entries(entries, "insecure web", &none)), juice);
        assert_eq!(names(&filter_entries(entries, "mysql", &none)), vec!["DVWA"]);
        assert_eq!(filter_entries(entries, "container", &none).len(), 2);
    }

    #[test]
    fn text_search_matches_across_field_boundary() {
        // fields are joined with single spaces, so a query may span name and author
        let collection = sample();
        let found = filter_entries(collection.entries(), "shop bjoern", &SearchFilters::new());
        assert_eq!(names(&found), vec!["OWASP Juice Shop"]);
    }

    #[test]
    fn technology_filter_is_exact_tag_ignoring_case() {
        let collection = sample();
        let filters = SearchFilters::new().with_technology("React");
        let found = filter_entries(collection.entries(), "react", &filters);
        // "react-router" is a different tag
        assert_eq!(names(&found), vec!["React Goat"]);
    }

    #[test]
    fn technology_filter_lowercases_request() {
        let collection = sample();
        let filters = SearchFilters::new().with_technology("php");
        assert_eq!(names(&filter_entries(collection.entries(), "", &filters)), vec!["DVWA"]);
        let filters = SearchFilters::new().with_technology("node.JS");
        assert_eq!(
            names(&filter_entries(collection.entries(), "", &filters)),
            vec!["OWASP Juice Shop"]
        );
    }

    #[test]
    fn collection_filter_is_case_sensitive() {
        let collection = sample();
        let filters = SearchFilters::new().with_collection("Online");
        assert!(filter_entries(collection.entries(), "", &filters).is_empty());
        let filters = SearchFilters::new().with_collection("online");
        assert_eq!(
            names(&filter_entries(collection.entries(), "", &filters)),
            vec!["OWASP Juice Shop", "React Goat"]
        );
    }

    #[test]
    fn facet_sets_are_any_of() {
        let collection = sample();
        let filters = SearchFilters::new()
            .with_technology("php")
            .with_technology("react");
        assert_eq!(
            names(&filter_entries(collection.entries(), "", &filters)),
            vec!["DVWA", "React Goat"]
        );
    }

    #[test]
    fn all_active_filters_must_pass() {
        let collection = sample();
        let filters = SearchFilters::new()
            .with_collection("container")
            .with_technology("php");
        assert_eq!(names(&filter_entries(collection.entries(), "", &filters)), vec!["DVWA"]);
        assert!(filter_entries(collection.entries(), "juice", &filters).is_empty());
    }

    #[test]
    fn entries_without_tags_fail_active_facets() {
        let collection = sample();
        let filters = SearchFilters::new().with_collection("offline");
        let found = filter_entries(collection.entries(), "bare", &filters);
        assert!(found.is_empty());
        assert!(matches(&collection.entries()[4], "bare", &SearchFilters::new()));
    }

    #[test]
    fn find_by_slug_hits_and_misses() {
        let collection = sample();
        let hit = find_by_slug(collection.entries(), "owasp-juice-shop").unwrap();
        assert_eq!(hit.name, "OWASP Juice Shop");
        assert!(find_by_slug(collection.entries(), "missing").is_none());
    }

    #[test]
    fn find_by_slug_prefers_first_in_scan_order() {
        let mut entries = vec![Entry::named("first"), Entry::named("second")];
        entries[0].slug = "dup".into();
        entries[1].slug = "dup".into();
        assert_eq!(find_by_slug(&entries, "dup").unwrap().name, "first");
    }

    // =========================================================================
    // QueryEngine
    // =========================================================================

    struct FixedTransport(Result<TransportResponse, LoadError>);

    #[async_trait]
    impl Transport for FixedTransport {
        async fn fetch(&self, _location: &str) -> Result<TransportResponse, LoadError> {
            self.0.clone()
        }
    }

    fn engine(response: Result<TransportResponse, LoadError>) -> QueryEngine {
        let loader = CollectionLoader::new(Arc::new(FixedTransport(response)), "collection.json");
        QueryEngine::new(Arc::new(loader))
    }

    #[tokio::test]
    async fn engine_finds_by_slug() {
        let engine = engine(Ok(TransportResponse::ok(
            r#"[{"name": "Foo Bar!!"}, {"name": "foo--bar", "author": "second"}]"#,
        )));
        let found = engine.app_by_slug("foo-bar-2").await.unwrap().unwrap();
        assert_eq!(found.author.as_deref(), Some("second"));
        assert!(engine.app_by_slug("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn engine_search_keeps_order() {
        let engine = engine(Ok(TransportResponse::ok(
            r#"[{"name": "b shop"}, {"name": "a"}, {"name": "c shop"}]"#,
        )));
        let found = engine.search("shop", &SearchFilters::new()).await.unwrap();
        let indices: Vec<usize> = found.iter().map(|e| e.index).collect();
        assert_eq!(indices, vec![0, 2]);
    }

    #[tokio::test]
    async fn engine_propagates_load_failure() {
        let engine = engine(Ok(TransportResponse::status(404, "missing")));
        assert!(matches!(
            engine.search("", &SearchFilters::new()).await,
            Err(LoadError::Status { status: 404, .. })
        ));
        assert!(engine.app_by_slug("x").await.is_err());
    }
}
