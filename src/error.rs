//! Application-wide error types.
//!
//! Library modules use specific error types via `thiserror`
//! ([`CatalogError`], [`PlaybackError`], [`StoreError`], [`ConfigError`]),
//! while `main` and the command handlers use `anyhow` for convenient
//! propagation.
//!
//! # Example
//!
//! ```ignore
//! use music_shelf::error::{Result, ResultExt};
//!
//! fn load(path: &Path) -> Result<Catalog> {
//!     let text = std::fs::read_to_string(path).with_context("reading catalog")?;
//!     Ok(catalog::from_json(&text)?)
//! }
//! ```

use crate::catalog::CatalogError;
use crate::config::ConfigError;
use crate::likes::StoreError;
use crate::player::PlaybackError;

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level application error.
///
/// Aggregates errors from all subsystems for unified handling.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Catalog fetch or normalization error
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Audio playback error
    #[error("Playback error: {0}")]
    Playback(#[from] PlaybackError),

    /// Persisted state error
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Requested song or playlist does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create a not found error.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    /// Add context to an error.
    pub fn context(self, ctx: impl Into<String>) -> Self {
        Self::WithContext {
            context: ctx.into(),
            source: Box::new(self),
        }
    }
}

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn with_context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Io(e).context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, serde_json::Error> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Json(e).context(ctx))
    }
}
