//! Liked songs.
//!
//! The liked set lives in memory and is written through to a
//! [`KeyValueStore`] on every change. A write that fails leaves the
//! in-memory set untouched, so memory and storage never disagree.

mod storage;

#[cfg(test)]
pub use storage::mocks;
pub use storage::{JsonFileStore, KeyValueStore, StoreError};

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, warn};

/// Storage key of the liked id list.
pub const LIKES_KEY: &str = "liked_songs";

/// Persisted set of liked song ids.
pub struct LikesStore {
    liked: BTreeSet<String>,
    store: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for LikesStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LikesStore").field("liked", &self.liked).finish()
    }
}

impl LikesStore {
    /// Load the liked set. Missing, unreadable or malformed data yields an
    /// empty set.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let liked = match store.get(LIKES_KEY) {
            Ok(Some(text)) => match serde_json::from_str::<Vec<String>>(&text) {
                Ok(ids) => ids.into_iter().collect(),
                Err(e) => {
                    warn!(target: "likes", error = %e, "Ignoring malformed liked songs");
                    BTreeSet::new()
                }
            },
            Ok(None) => BTreeSet::new(),
            Err(e) => {
                warn!(target: "likes", error = %e, "Could not read liked songs");
                BTreeSet::new()
            }
        };
        debug!(target: "likes", count = liked.len(), "Loaded liked songs");
        Self { liked, store }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.liked.contains(id)
    }

    pub fn len(&self) -> usize {
        self.liked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.liked.is_empty()
    }

    /// Liked ids in sorted order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.liked.iter().map(String::as_str)
    }

    /// Flip membership of `id`; returns whether it is now liked.
    pub fn toggle(&mut self, id: &str) -> Result<bool, StoreError> {
        let mut next = self.liked.clone();
        let liked = if next.remove(id) {
            false
        } else {
            next.insert(id.to_string());
            true
        };
        self.commit(next)?;
        Ok(liked)
    }

    /// Remove every liked id.
    pub fn delete_all(&mut self) -> Result<(), StoreError> {
        self.commit(BTreeSet::new())
    }

    /// Remove the given ids; returns how many were actually liked.
    pub fn delete_many<'a, I>(&mut self, ids: I) -> Result<usize, StoreError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let doomed: BTreeSet<&str> = ids.into_iter().collect();
        let next: BTreeSet<String> = self
            .liked
            .iter()
            .filter(|id| !doomed.contains(id.as_str()))
            .cloned()
            .collect();
        let removed = self.liked.len() - next.len();
        self.commit(next)?;
        Ok(removed)
    }

    fn commit(&mut self, next: BTreeSet<String>) -> Result<(), StoreError> {
        let encoded = serde_json::to_string(&next).map_err(|source| StoreError::Encode {
            key: LIKES_KEY.to_string(),
            source,
        })?;
        self.store.set(LIKES_KEY, &encoded)?;
        self.liked = next;
        Ok(())
    }
}
