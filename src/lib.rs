//! # App Directory
//!
//! Data access and presentation for a static directory of catalogued apps.
//! The catalogue is a single JSON array; this crate fetches it once, gives
//! every entry a stable unique slug, answers lookup and search queries, and
//! renders escaped HTML detail views.
//!
//! # Data Flow
//!
//! ```text
//! Transport ──► CollectionLoader ──► Arc<Collection> ──► QueryEngine
//!                  (slug assignment)        │
//!                                           ├──► render (+ age bands)
//!                                           └──► generate (static export)
//! path + fragment ──► location::resolve_slug ──► QueryEngine::app_by_slug
//! ```
//!
//! The loaded collection is an immutable snapshot: slugs and positions are
//! assigned before it is published and never touched again, so queries and
//! rendering are plain synchronous functions over shared data.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`types`] | `Entry`, `Reference` and the slug-annotated `Collection` |
//! | [`slug`] | Name normalization and collision-free slug assignment |
//! | [`single_flight`] | Lazily-initialized async value shared by all callers |
//! | [`loader`] | `Transport` seam, `FileTransport`, memoized `CollectionLoader` |
//! | [`query`] | Lookup by slug and faceted text search |
//! | [`age`] | Timestamp parsing and recency bands |
//! | [`escape`] | HTML escaping of entry-derived text |
//! | [`links`] | Home and detail URLs under the configured base path |
//! | [`render`] | Detail view markup using Maud |
//! | [`location`] | Slug extraction from a path or fragment |
//! | [`config`] | `config.toml` loading, defaults and validation |
//! | [`generate`] | Static export: index, one page per entry, 404 |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## One Load, Many Waiters
//!
//! The collection is fetched at most once per loader. Callers that arrive
//! while the fetch is in flight await the same future; callers that arrive
//! later get the same `Arc`. A failed load is memoized too, so every caller
//! sees the same [`loader::LoadError`] instead of an empty directory.
//! Retrying is explicit through [`loader::CollectionLoader::reset_failed`].
//!
//! ## Maud With Explicit Escaping
//!
//! Markup is built with [Maud](https://maud.lambda.xyz/). Entry data is
//! always spliced through [`escape::Text`], which escapes `&`, `<`, `>`,
//! `"` and `'`, so the output is safe in both text and attribute position.
//!
//! ## Configuration Over Sniffing
//!
//! The base path for absolute links comes from `config.toml`, never from
//! the environment the code happens to run in.

pub mod age;
pub mod config;
pub mod escape;
pub mod generate;
pub mod links;
pub mod loader;
pub mod location;
pub mod output;
pub mod query;
pub mod render;
pub mod single_flight;
pub mod slug;
pub mod types;
