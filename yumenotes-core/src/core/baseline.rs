//! The canonical starting dataset, fetched once at startup.

use std::path::{Path, PathBuf};

use crate::core::document::{sanitize_document, Document};
use crate::Result;

/// Supplies the baseline notes-and-categories document.
///
/// Fetching happens exactly once per (re)load. A failure here is not fatal:
/// the notebook falls back to a built-in default dataset and proceeds.
pub trait BaselineSource {
    fn fetch(&self) -> Result<Document>;
}

/// Reads the baseline document from a JSON file on disk.
pub struct FileBaselineSource {
    path: PathBuf,
}

impl FileBaselineSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl BaselineSource for FileBaselineSource {
    fn fetch(&self) -> Result<Document> {
        let text = std::fs::read_to_string(&self.path)?;
        let value: serde_json::Value = serde_json::from_str(&text)?;
        Ok(sanitize_document(&value, chrono::Utc::now()))
    }
}

/// Fetches the baseline document from an HTTP endpoint.
#[cfg(feature = "remote")]
pub struct RemoteBaselineSource {
    url: String,
}

#[cfg(feature = "remote")]
impl RemoteBaselineSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

#[cfg(feature = "remote")]
impl BaselineSource for RemoteBaselineSource {
    fn fetch(&self) -> Result<Document> {
        let value: serde_json::Value = reqwest::blocking::get(&self.url)?.json()?;
        Ok(sanitize_document(&value, chrono::Utc::now()))
    }
}
