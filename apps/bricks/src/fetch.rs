//! Resource fetching, the single point through which pages, stylesheets,
//! images, placeholders and fragments are read.
//!
//! `HttpFetcher` reads from a content origin, `DirectoryFetcher` from a local
//! checkout. Neither retries nor times out: a stalled request stalls its
//! caller.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, Url};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid resource path '{0}'")]
    InvalidPath(String),

    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::NotFound(_) | FetchError::Status { status: 404, .. })
    }
}

#[async_trait]
pub trait ResourceFetcher: Send + Sync {
    async fn fetch(&self, path: &str) -> Result<Bytes, FetchError>;
}

// ────────────────────────────────────────────────────────────────────────────
// HttpFetcher
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
    origin: Url,
}

impl HttpFetcher {
    pub fn new(origin: Url) -> Result<Self, FetchError> {
        Ok(Self {
            client: Client::builder().build()?,
            origin,
        })
    }

    /// Resolves `path` against the origin. Absolute and scheme-relative
    /// paths are rejected, and the result must stay on the origin.
    fn url(&self, path: &str) -> Result<Url, FetchError> {
        let invalid = || FetchError::InvalidPath(path.to_string());
        let scheme_relative = path
            .chars()
            .take(2)
            .filter(|c| matches!(c, '/' | '\\'))
            .count()
            == 2;
        if scheme_relative || Url::parse(path).is_ok() {
            return Err(invalid());
        }
        let url = self.origin.join(path).map_err(|_| invalid())?;
        if url.origin() != self.origin.origin() {
            return Err(invalid());
        }
        Ok(url)
    }
}

#[async_trait]
impl ResourceFetcher for HttpFetcher {
    async fn fetch(&self, path: &str) -> Result<Bytes, FetchError> {
        let url = self.url(path)?;
        debug!("GET {url}");
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response.bytes().await?)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// DirectoryFetcher
// ────────────────────────────────────────────────────────────────────────────

/// Serves resource paths from a directory. Query strings are ignored and
/// `..` components are rejected.
#[derive(Debug, Clone)]
pub struct DirectoryFetcher {
    root: PathBuf,
}

impl DirectoryFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn file_path(&self, path: &str) -> Result<PathBuf, FetchError> {
        let relative = path
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim_start_matches('/');
        if relative.is_empty() || relative.split('/').any(|part| part == "..") {
            return Err(FetchError::InvalidPath(path.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl ResourceFetcher for DirectoryFetcher {
    async fn fetch(&self, path: &str) -> Result<Bytes, FetchError> {
        let file = self.file_path(path)?;
        match tokio::fs::read(&file).await {
            Ok(contents) => Ok(Bytes::from(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(FetchError::NotFound(path.to_string())),
            Err(source) => Err(FetchError::Io {
                path: path.to_string(),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_directory_fetcher_reads_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("blocks/hero")).unwrap();
        std::fs::write(dir.path().join("blocks/hero/hero.css"), ".hero{}").unwrap();

        let fetcher = DirectoryFetcher::new(dir.path());
        let body = fetcher.fetch("/blocks/hero/hero.css?v=2").await.unwrap();
        assert_eq!(&body[..], b".hero{}");
    }

    #[tokio::test]
    async fn test_directory_fetcher_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = DirectoryFetcher::new(dir.path());
        let err = fetcher.fetch("/nav.plain.html").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_directory_fetcher_rejects_parent_paths() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = DirectoryFetcher::new(dir.path());
        let err = fetcher.fetch("/../secrets").await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidPath(_)));
    }

    #[test]
    fn test_http_fetcher_stays_on_origin() {
        let fetcher = HttpFetcher::new(Url::parse("https://content.example.com/").unwrap()).unwrap();
        for path in [
            "//169.254.169.254/latest/meta-data/iam.json",
            "/\\169.254.169.254/latest/meta-data/iam.json",
            "\\\\169.254.169.254/latest",
            "http://169.254.169.254/latest",
            "https://content.example.com:8443/index.html",
        ] {
            assert!(
                matches!(fetcher.url(path), Err(FetchError::InvalidPath(_))),
                "{path} escaped the origin"
            );
        }
        let url = fetcher.url("/products/shoes.html").unwrap();
        assert_eq!(url.host_str(), Some("content.example.com"));
    }

    #[test]
    fn test_http_fetcher_joins_origin() {
        let fetcher = HttpFetcher::new(Url::parse("https://content.example.com/").unwrap()).unwrap();
        assert_eq!(
            fetcher.url("/blocks/hero/hero.css").unwrap().as_str(),
            "https://content.example.com/blocks/hero/hero.css"
        );
    }
}
