//! Getting a finished report to the user: saving it as a named file, and a
//! scoped preview resource whose locator is valid exactly as long as the
//! handle lives.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

use crate::report::GeneratedDocument;

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("'{0}' is not a plain file name")]
    InvalidName(String),
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to create a preview file: {0}")]
    Preview(#[source] std::io::Error),
}

/// Delivers bytes to the user as a named downloadable file.
pub trait Delivery {
    /// Returns where the file ended up.
    fn deliver(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, DeliveryError>;
}

/// Saves into a fixed directory.
#[derive(Debug, Clone)]
pub struct DirectoryDelivery {
    dir: PathBuf,
}

impl DirectoryDelivery {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl Delivery for DirectoryDelivery {
    fn deliver(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, DeliveryError> {
        let plain = Path::new(file_name)
            .file_name()
            .map(|name| name == file_name)
            .unwrap_or(false);
        if !plain {
            return Err(DeliveryError::InvalidName(file_name.to_string()));
        }
        let path = self.dir.join(file_name);
        fs::write(&path, bytes).map_err(|source| DeliveryError::Write {
            path: path.clone(),
            source,
        })?;
        log::info!("saved {} ({} bytes)", path.display(), bytes.len());
        Ok(path)
    }
}

/// A previewable copy of a document. The locator stops resolving when the
/// handle is dropped.
#[derive(Debug)]
pub struct PreviewHandle {
    file: NamedTempFile,
    locator: String,
}

impl PreviewHandle {
    pub fn new(document: &GeneratedDocument) -> Result<Self, DeliveryError> {
        let mut file = tempfile::Builder::new()
            .prefix("pump-report-preview-")
            .suffix(".pdf")
            .tempfile()
            .map_err(DeliveryError::Preview)?;
        file.write_all(document.bytes())
            .and_then(|_| file.flush())
            .map_err(DeliveryError::Preview)?;
        let locator = format!("file://{}", file.path().display());
        log::debug!("preview opened at {}", locator);
        Ok(Self { file, locator })
    }

    pub fn locator(&self) -> &str {
        &self.locator
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        // The temp file itself is removed when `file` drops right after.
        log::debug!("preview released: {}", self.locator);
    }
}

/// Holds at most one open preview; opening a new one releases the old.
#[derive(Debug, Default)]
pub struct PreviewSession {
    current: Option<PreviewHandle>,
}

impl PreviewSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, document: &GeneratedDocument) -> Result<&str, DeliveryError> {
        let handle = PreviewHandle::new(document)?;
        Ok(self.current.insert(handle).locator())
    }

    pub fn close(&mut self) {
        self.current = None;
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    pub fn locator(&self) -> Option<&str> {
        self.current.as_ref().map(PreviewHandle::locator)
    }

    /// The open preview, if any.
    pub fn handle(&self) -> Option<&PreviewHandle> {
        self.current.as_ref()
    }
}
