//! Cover image references.
//!
//! Covers are stored as `<dir>/<song id>.jpg`. When the file is missing the
//! configured placeholder reference is used instead.

use std::path::PathBuf;

use crate::config::CoverConfig;

/// Resolves song ids to cover image references.
#[derive(Debug, Clone)]
pub struct CoverResolver {
    dir: PathBuf,
    placeholder: String,
}

impl CoverResolver {
    pub fn new(dir: impl Into<PathBuf>, placeholder: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            placeholder: placeholder.into(),
        }
    }

    pub fn from_config(config: &CoverConfig) -> Self {
        Self::new(config.dir.clone(), config.placeholder.clone())
    }

    /// Deterministic cover path for a song id.
    pub fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{}.jpg", id))
    }

    /// Cover reference to display: the cover path if it exists, else the placeholder.
    pub fn resolve(&self, id: &str) -> String {
        let path = self.path_for(id);
        if path.is_file() {
            path.display().to_string()
        } else {
            tracing::trace!(target: "cover", id, "No cover on disk, using placeholder");
            self.placeholder.clone()
        }
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_for_is_deterministic() {
        let covers = CoverResolver::new("real_covers", "none.png");
        assert_eq!(covers.path_for("ZaURV4XxdPI"), PathBuf::from("real_covers/ZaURV4XxdPI.jpg"));
    }

    #[test]
    fn test_resolve_falls_back_to_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("have.jpg"), b"jpeg").unwrap();
        let covers = CoverResolver::new(dir.path(), "none.png");

        assert!(covers.resolve("have").ends_with("have.jpg"));
        assert_eq!(covers.resolve("missing"), "none.png");
        assert_eq!(covers.placeholder(), "none.png");
    }
}
