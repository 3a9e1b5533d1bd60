//! Asset sources: where logo and QR bytes come from.
//!
//! The report pipeline only needs `fetch(url) -> bytes`. HTTP(S) URLs go
//! through reqwest, `file://` URLs and bare paths are read from disk, and
//! tests use an in-memory map.

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("request for {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("no asset registered for {0}")]
    NotFound(String),
}

/// Something that can resolve an asset URL to its bytes.
#[async_trait]
pub trait AssetSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, AssetError>;
}

/// Fetches `http://` and `https://` URLs, and reads everything else from disk.
#[derive(Clone)]
pub struct HttpAssetSource {
    client: reqwest::Client,
    files: FileAssetSource,
}

impl HttpAssetSource {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            files: FileAssetSource::default(),
        }
    }

    /// Resolve relative paths against `root` instead of the working directory.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.files = FileAssetSource::new(root);
        self
    }
}

impl Default for HttpAssetSource {
    fn default() -> Self {
        Self::new(reqwest::Client::new())
    }
}

#[async_trait]
impl AssetSource for HttpAssetSource {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, AssetError> {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return self.files.fetch(url).await;
        }

        let http_err = |source| AssetError::Http {
            url: url.to_string(),
            source,
        };
        let response = self.client.get(url).send().await.map_err(http_err)?;
        let status = response.status();
        if !status.is_success() {
            return Err(AssetError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let body = response.bytes().await.map_err(http_err)?;
        log::debug!("fetched {} ({} bytes)", url, body.len());
        Ok(body.to_vec())
    }
}

/// Reads `file://` URLs and plain paths.
#[derive(Debug, Clone, Default)]
pub struct FileAssetSource {
    root: Option<PathBuf>,
}

impl FileAssetSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    fn resolve(&self, url: &str) -> PathBuf {
        let path = PathBuf::from(url.strip_prefix("file://").unwrap_or(url));
        match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path,
        }
    }
}

#[async_trait]
impl AssetSource for FileAssetSource {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, AssetError> {
        let path = self.resolve(url);
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|source| AssetError::Io { path: path.clone(), source })?;
        log::debug!("read {} ({} bytes)", path.display(), bytes.len());
        Ok(bytes)
    }
}

/// A fixed map from URL to bytes.
#[derive(Debug, Clone, Default)]
pub struct MemoryAssetSource {
    assets: HashMap<String, Vec<u8>>,
}

impl MemoryAssetSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: &str, bytes: Vec<u8>) -> Self {
        self.assets.insert(url.to_string(), bytes);
        self
    }
}

#[async_trait]
impl AssetSource for MemoryAssetSource {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, AssetError> {
        self.assets
            .get(url)
            .cloned()
            .ok_or_else(|| AssetError::NotFound(url.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_source_returns_registered_bytes() {
        let source = MemoryAssetSource::new().with("logo", vec![1, 2, 3]);
        assert_eq!(source.fetch("logo").await.unwrap(), vec![1, 2, 3]);
        assert!(matches!(source.fetch("qr").await, Err(AssetError::NotFound(_))));
    }

    #[tokio::test]
    async fn file_source_reads_file_urls() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logo.png");
        std::fs::write(&path, b"png").unwrap();

        let source = FileAssetSource::default();
        let url = format!("file://{}", path.display());
        assert_eq!(source.fetch(&url).await.unwrap(), b"png");

        let rooted = FileAssetSource::new(dir.path());
        assert_eq!(rooted.fetch("logo.png").await.unwrap(), b"png");
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let source = FileAssetSource::default();
        let err = source.fetch("/definitely/not/here.png").await.unwrap_err();
        assert!(matches!(err, AssetError::Io { .. }));
        assert!(err.to_string().contains("not/here.png"));
    }

    #[tokio::test]
    async fn http_source_falls_back_to_files_for_paths() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("qr.png"), b"qr").unwrap();
        let source = HttpAssetSource::default().with_root(dir.path());
        assert_eq!(source.fetch("qr.png").await.unwrap(), b"qr");
    }
}
