//! Catalog document sources.
//!
//! A catalog is either a local file or an HTTP resource. HTTP fetches bypass
//! caches so a freshly edited catalog is always picked up.

use async_trait::async_trait;
use std::path::PathBuf;

use super::{Catalog, CatalogError, from_json};

/// User agent string sent with catalog requests
const USER_AGENT: &str = concat!("MusicShelf/", env!("CARGO_PKG_VERSION"));

/// Something that can produce the raw text of a catalog document.
///
/// Implement this trait to create mock implementations for testing.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch the raw document text.
    async fn fetch(&self) -> Result<String, CatalogError>;

    /// Human-readable description for log and error messages.
    fn describe(&self) -> String;
}

/// Catalog stored on the local filesystem.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CatalogSource for FileSource {
    async fn fetch(&self) -> Result<String, CatalogError> {
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| CatalogError::Read {
                path: self.path.display().to_string(),
                message: e.to_string(),
            })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Catalog served over HTTP.
pub struct HttpSource {
    http_client: reqwest::Client,
    url: String,
}

impl HttpSource {
    /// Create a source for the given URL.
    pub fn new(url: impl Into<String>) -> Result<Self, CatalogError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl CatalogSource for HttpSource {
    async fn fetch(&self) -> Result<String, CatalogError> {
        let response = self
            .http_client
            .get(&self.url)
            .header(reqwest::header::CACHE_CONTROL, "no-cache, no-store")
            .header(reqwest::header::PRAGMA, "no-cache")
            .send()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status(status.as_u16()));
        }

        response
            .text()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Pick a source for a location: `http(s)://` URLs are fetched over HTTP,
/// anything else is treated as a file path.
pub fn source_for(location: &str) -> Result<Box<dyn CatalogSource>, CatalogError> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Ok(Box::new(HttpSource::new(location)?))
    } else {
        Ok(Box::new(FileSource::new(location)))
    }
}

/// Fetch and normalize a catalog.
pub async fn load(source: &dyn CatalogSource) -> Result<Catalog, CatalogError> {
    tracing::info!(target: "catalog::load", source = %source.describe(), "Fetching catalog");
    let text = source.fetch().await?;
    let catalog = from_json(&text)?;
    tracing::info!(target: "catalog::load", songs = catalog.len(), "Catalog loaded");
    Ok(catalog)
}
