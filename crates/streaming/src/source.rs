//! Dataset sources.
//!
//! A source turns a dataset URL into the response body. Implementations must be
//! `Send + Sync` so fetches can run as independent tasks; methods return boxed
//! futures for dyn-compatibility.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;

use crate::error::FetchError;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait DatasetSource: Send + Sync {
    /// Fetches the body at `url`.
    ///
    /// A non-success status is `Err(FetchError::Status)`; there is no retry.
    fn fetch(&self, url: &str) -> BoxFuture<'_, Result<String, FetchError>>;
}

impl<S: DatasetSource + ?Sized> DatasetSource for Arc<S> {
    fn fetch(&self, url: &str) -> BoxFuture<'_, Result<String, FetchError>> {
        (**self).fetch(url)
    }
}

/// Datasets served over HTTP(S).
#[derive(Debug, Clone, Default)]
pub struct HttpSource {
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DatasetSource for HttpSource {
    fn fetch(&self, url: &str) -> BoxFuture<'_, Result<String, FetchError>> {
        let url = url.to_string();
        Box::pin(async move {
            let resp = self
                .client
                .get(&url)
                .send()
                .await
                .map_err(|e| FetchError::Transport(e.to_string()))?;
            let status = resp.status();
            if !status.is_success() {
                return Err(FetchError::Status(status.as_u16()));
            }
            resp.text()
                .await
                .map_err(|e| FetchError::Transport(e.to_string()))
        })
    }
}

/// Datasets read from a local directory tree.
///
/// URLs are interpreted as paths relative to `root` (absolute paths are used
/// as-is); the cache-bust query is dropped. A missing file maps to HTTP 404 so
/// both sources fail the same way.
#[derive(Debug, Clone)]
pub struct FilesystemSource {
    root: PathBuf,
}

impl FilesystemSource {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn resolve(&self, url: &str) -> PathBuf {
        let path = url.split_once('?').map_or(url, |(p, _)| p);
        self.root.join(path)
    }
}

impl DatasetSource for FilesystemSource {
    fn fetch(&self, url: &str) -> BoxFuture<'_, Result<String, FetchError>> {
        let path = self.resolve(url);
        Box::pin(async move {
            match tokio::fs::read_to_string(&path).await {
                Ok(text) => Ok(text),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(FetchError::Status(404)),
                Err(e) => Err(FetchError::Transport(format!("{}: {e}", path.display()))),
            }
        })
    }
}

/// Routes `http(s)://` URLs to an [`HttpSource`] and everything else to a
/// [`FilesystemSource`], so points and outlooks may live in different places.
#[derive(Debug, Clone)]
pub struct AutoSource {
    http: HttpSource,
    fs: FilesystemSource,
}

impl AutoSource {
    pub fn new(fs_root: impl AsRef<Path>) -> Self {
        Self {
            http: HttpSource::new(),
            fs: FilesystemSource::new(fs_root),
        }
    }
}

impl DatasetSource for AutoSource {
    fn fetch(&self, url: &str) -> BoxFuture<'_, Result<String, FetchError>> {
        if is_http(url) {
            self.http.fetch(url)
        } else {
            self.fs.fetch(url)
        }
    }
}

fn is_http(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}
