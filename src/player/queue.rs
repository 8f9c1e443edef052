//! Play queue management.
//!
//! The queue is always circular: advancing past the last song returns to
//! the first. The current song is tracked by id rather than by position, so
//! a queue replaced underneath a playing song degrades gracefully.

use crate::model::SongRef;

/// The play queue with current song tracking.
#[derive(Debug, Clone, Default)]
pub struct PlayQueue {
    /// Songs in play order (shared with the catalog, not copied)
    items: Vec<SongRef>,
    /// Id of the song playing now
    current_id: Option<String>,
}

impl PlayQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if queue is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get queue length.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Get all songs in the queue.
    pub fn items(&self) -> &[SongRef] {
        &self.items
    }

    /// Id of the current song, if anything has been played.
    pub fn current_id(&self) -> Option<&str> {
        self.current_id.as_deref()
    }

    /// Position of the current song in the queue.
    pub fn current_index(&self) -> Option<usize> {
        let id = self.current_id.as_deref()?;
        self.items.iter().position(|s| s.id == id)
    }

    /// Current song, if it is part of the queue.
    pub fn current(&self) -> Option<&SongRef> {
        self.current_index().and_then(|i| self.items.get(i))
    }

    /// Make `song` current, replacing the queue when one is given.
    pub fn play(&mut self, song: &SongRef, queue: Option<Vec<SongRef>>) {
        if let Some(items) = queue {
            self.items = items;
        }
        self.current_id = Some(song.id.clone());
    }

    /// Advance to the next song, wrapping to the start.
    ///
    /// Returns `None` without changing anything when nothing is current or
    /// the queue is empty. A current id missing from the queue counts as
    /// position -1, so the first song plays next.
    pub fn skip_forward(&mut self) -> Option<SongRef> {
        if self.current_id.is_none() || self.items.is_empty() {
            return None;
        }

        let next = self.current_index().map_or(0, |i| (i + 1) % self.items.len());
        let song = self.items[next].clone();
        self.current_id = Some(song.id.clone());
        Some(song)
    }

    /// Clear the queue and forget the current song.
    pub fn clear(&mut self) {
        self.items.clear();
        self.current_id = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Song;
    use crate::test_utils::{ids, mock_song};
    use std::sync::Arc;

    fn make_item(id: &str) -> SongRef {
        Arc::new(mock_song(id))
    }

    fn abc() -> Vec<SongRef> {
        vec![make_item("a"), make_item("b"), make_item("c")]
    }

    #[test]
    fn test_queue_basic() {
        let mut queue = PlayQueue::new();
        assert!(queue.is_empty());
        assert!(queue.current().is_none());

        let items = abc();
        queue.play(&items[0], Some(items.clone()));
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.current_id(), Some("a"));
        assert_eq!(queue.current_index(), Some(0));

        assert_eq!(queue.skip_forward().unwrap().id, "b");
        assert_eq!(queue.current_index(), Some(1));
    }

    #[test]
    fn test_queue_wraps_around() {
        let mut queue = PlayQueue::new();
        let items = abc();
        queue.play(&items[0], Some(items.clone()));

        queue.skip_forward(); // b
        queue.skip_forward(); // c
        assert_eq!(queue.skip_forward().unwrap().id, "a"); // wraps
    }

    #[test]
    fn test_single_song_queue_repeats() {
        let mut queue = PlayQueue::new();
        let only = make_item("solo");
        queue.play(&only, Some(vec![only.clone()]));
        assert_eq!(queue.skip_forward().unwrap().id, "solo");
    }

    #[test]
    fn test_skip_without_current_is_noop() {
        let mut queue = PlayQueue::new();
        assert!(queue.skip_forward().is_none());
        assert_eq!(queue.current_id(), None);
    }

    #[test]
    fn test_skip_with_empty_queue_is_noop() {
        let mut queue = PlayQueue::new();
        let song = make_item("a");
        queue.play(&song, Some(vec![]));
        assert!(queue.skip_forward().is_none());
        assert_eq!(queue.current_id(), Some("a"));
    }

    #[test]
    fn test_play_without_queue_keeps_existing() {
        let mut queue = PlayQueue::new();
        let items = abc();
        queue.play(&items[0], Some(items.clone()));
        queue.play(&items[2], None);

        assert_eq!(ids(queue.items()), ["a", "b", "c"]);
        assert_eq!(queue.skip_forward().unwrap().id, "a");
    }

    #[test]
    fn test_stale_current_restarts_queue() {
        let mut queue = PlayQueue::new();
        let outsider: SongRef = Arc::new(Song {
            title: "Not queued".to_string(),
            ..mock_song("z")
        });
        queue.play(&outsider, Some(abc()));

        assert!(queue.current().is_none());
        assert_eq!(queue.skip_forward().unwrap().id, "a");
    }

    #[test]
    fn test_clear() {
        let mut queue = PlayQueue::new();
        let items = abc();
        queue.play(&items[1], Some(items.clone()));
        queue.clear();
        assert!(queue.is_empty());
        assert_eq!(queue.current_id(), None);
    }
}
