//! One-time retrieval of the catalogue collection.
//!
//! The collection is fetched through a [`Transport`], parsed, slug-annotated
//! and published as an immutable `Arc<Collection>`. The fetch happens at most
//! once per [`CollectionLoader`]: every caller of [`CollectionLoader::load`]
//! awaits the same single-flight future and sees the same snapshot or the
//! same [`LoadError`].
//!
//! ## Failure modes
//!
//! | Cause | Error |
//! |---|---|
//! | transport could not complete the request | [`LoadError::Transport`] |
//! | transport answered with a non-ok status | [`LoadError::Status`] |
//! | body is not a JSON array of entries | [`LoadError::Parse`] |
//!
//! A failed load is never turned into an empty collection. Failures stay
//! memoized until [`CollectionLoader::reset_failed`] is called.

use crate::single_flight::SingleFlight;
use crate::types::Collection;
use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Failed to load collection: status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("Collection parse error: {0}")]
    Parse(String),
}

/// What a transport hands back for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub ok: bool,
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            ok: true,
            status: 200,
            body: body.into(),
        }
    }

    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self {
            ok: (200..300).contains(&status),
            status,
            body: body.into(),
        }
    }
}

/// Fetches the raw collection document from wherever it lives.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn fetch(&self, location: &str) -> Result<TransportResponse, LoadError>;
}

/// Serves locations as paths relative to a root directory.
///
/// A missing file answers with status 404 rather than a transport error,
/// the same way a static file server would.
#[derive(Debug, Clone)]
pub struct FileTransport {
    root: PathBuf,
}

impl FileTransport {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl Transport for FileTransport {
    async fn fetch(&self, location: &str) -> Result<TransportResponse, LoadError> {
        let path = self.root.join(location.trim_start_matches('/'));
        match tokio::fs::read_to_string(&path).await {
            Ok(body) => Ok(TransportResponse::ok(body)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(TransportResponse::status(
                404,
                format!("{} not found", path.display()),
            )),
            Err(e) => Err(LoadError::Transport(format!("{}: {e}", path.display()))),
        }
    }
}

/// Memoized loader for the catalogue snapshot.
pub struct CollectionLoader {
    transport: Arc<dyn Transport>,
    location: String,
    snapshot: SingleFlight<Arc<Collection>, LoadError>,
}

impl CollectionLoader {
    pub fn new(transport: Arc<dyn Transport>, location: impl Into<String>) -> Self {
        Self {
            transport,
            location: location.into(),
            snapshot: SingleFlight::new(),
        }
    }

    /// Location handed to the transport.
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Await the annotated collection, fetching it on first use.
    pub async fn load(&self) -> Result<Arc<Collection>, LoadError> {
        let transport = Arc::clone(&self.transport);
        let location = self.location.clone();
        self.snapshot
            .get_or_init(move || async move {
                fetch_collection(transport.as_ref(), &location).await
            })
            .await
    }

    /// Discard a failed outcome so the next [`load`](Self::load) fetches again.
    ///
    /// No-op while a fetch is pending or after a successful load; returns
    /// whether a failure was discarded.
    pub fn reset_failed(&self) -> bool {
        self.snapshot.reset_failed()
    }

    /// The published snapshot, if a load has already succeeded.
    pub fn snapshot(&self) -> Option<Arc<Collection>> {
        self.snapshot.peek().and_then(Result::ok)
    }
}

async fn fetch_collection(
    transport: &dyn Transport,
    location: &str,
) -> Result<Arc<Collection>, LoadError> {
    let response = transport.fetch(location).await?;
    if !response.ok {
        return Err(LoadError::Status {
            status: response.status,
            message: response.body,
        });
    }
    let collection =
        Collection::from_json(&response.body).map_err(|e| LoadError::Parse(e.to_string()))?;
    Ok(Arc::new(collection))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    /// Transport that replays a fixed response and counts requests.
    struct ScriptedTransport {
        response: Result<TransportResponse, LoadError>,
        calls: AtomicUsize,
    }

    impl ScriptedTransport {
        fn new(response: Result<TransportResponse, LoadError>) -> Arc<Self> {
            Arc::new(Self {
                response,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn fetch(&self, _location: &str) -> Result<TransportResponse, LoadError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.response.clone()
        }
    }

    const TWO_APPS: &str = r#"[{"name": "Foo Bar!!"}, {"name": "foo--bar"}]"#;

    #[tokio::test]
    async fn load_assigns_slugs() {
        let transport = ScriptedTransport::new(Ok(TransportResponse::ok(TWO_APPS)));
        let loader = CollectionLoader::new(transport, "data/collection.json");

        let collection = loader.load().await.unwrap();
        let slugs: Vec<&str> = collection.iter().map(|e| e.slug.as_str()).collect();
        assert_eq!(slugs, vec!["foo-bar", "foo-bar-2"]);
    }

    #[tokio::test]
    async fn repeated_loads_share_one_snapshot() {
        let transport = ScriptedTransport::new(Ok(TransportResponse::ok(TWO_APPS)));
        let loader = CollectionLoader::new(transport.clone(), "data/collection.json");

        let first = loader.load().await.unwrap();
        let second = loader.load().await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn concurrent_loads_fetch_once() {
        let transport = ScriptedTransport::new(Ok(TransportResponse::ok(TWO_APPS)));
        let loader = CollectionLoader::new(transport.clone(), "data/collection.json");

        let (a, b, c) = tokio::join!(loader.load(), loader.load(), loader.load());

        assert!(Arc::ptr_eq(&a.unwrap(), &b.unwrap()));
        assert!(c.is_ok());
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn non_ok_status_is_load_error() {
        let transport = ScriptedTransport::new(Ok(TransportResponse::status(503, "unavailable")));
        let loader = CollectionLoader::new(transport, "data/collection.json");

        let err = loader.load().await.unwrap_err();
        assert_eq!(
            err,
            LoadError::Status {
                status: 503,
                message: "unavailable".into()
            }
        );
    }

    #[tokio::test]
    async fn unparseable_body_is_load_error() {
        let transport = ScriptedTransport::new(Ok(TransportResponse::ok("<html>oops</html>")));
        let loader = CollectionLoader::new(transport, "data/collection.json");

        assert!(matches!(loader.load().await, Err(LoadError::Parse(_))));
    }

    #[tokio::test]
    async fn failure_reaches_every_caller_without_refetch() {
        let transport =
            ScriptedTransport::new(Err(LoadError::Transport("connection refused".into())));
        let loader = CollectionLoader::new(transport.clone(), "data/collection.json");

        let first = loader.load().await;
        let second = loader.load().await;

        assert_eq!(first, second);
        assert!(matches!(first, Err(LoadError::Transport(_))));
        assert_eq!(transport.calls(), 1);
        assert!(loader.snapshot().is_none());
    }

    #[tokio::test]
    async fn reset_failed_refetches() {
        let transport = ScriptedTransport::new(Ok(TransportResponse::status(500, "")));
        let loader = CollectionLoader::new(transport.clone(), "data/collection.json");

        assert!(loader.load().await.is_err());
        assert!(loader.reset_failed());
        assert!(loader.load().await.is_err());
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn reset_after_success_keeps_snapshot() {
        let transport = ScriptedTransport::new(Ok(TransportResponse::ok(TWO_APPS)));
        let loader = CollectionLoader::new(transport.clone(), "data/collection.json");

        let first = loader.load().await.unwrap();
        assert!(!loader.reset_failed());
        let second = loader.load().await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(transport.calls(), 1);
    }

    // =========================================================================
    // FileTransport
    // =========================================================================

    #[tokio::test]
    async fn file_transport_reads_relative_path() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join("data")).unwrap();
        std::fs::write(tmp.path().join("data/collection.json"), TWO_APPS).unwrap();

        let loader = CollectionLoader::new(
            Arc::new(FileTransport::new(tmp.path())),
            "/data/collection.json",
        );
        assert_eq!(loader.load().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn file_transport_missing_file_is_404() {
        let tmp = TempDir::new().unwrap();
        let transport = FileTransport::new(tmp.path());

        let response = transport.fetch("data/collection.json").await.unwrap();
        assert!(!response.ok);
        assert_eq!(response.status, 404);
    }

    #[tokio::test]
    async fn missing_file_fails_load_instead_of_empty_collection() {
        let tmp = TempDir::new().unwrap();
        let loader = CollectionLoader::new(
            Arc::new(FileTransport::new(tmp.path())),
            "data/collection.json",
        );

        assert!(matches!(
            loader.load().await,
            Err(LoadError::Status { status: 404, .. })
        ));
    }

    #[test]
    fn status_response_ok_flag_tracks_2xx() {
        assert!(TransportResponse::status(204, "").ok);
        assert!(!TransportResponse::status(404, "").ok);
        assert!(!TransportResponse::status(302, "").ok);
    }
}
