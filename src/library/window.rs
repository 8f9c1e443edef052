//! Incremental result window.
//!
//! Long result lists are exposed one chunk at a time; growing the window
//! reports only the newly exposed range so a view can append instead of
//! redrawing everything.

use std::ops::Range;

use crate::model::SongRef;

/// Default number of songs exposed per chunk.
pub const DEFAULT_CHUNK: usize = 50;

/// A growable prefix view over a song list.
#[derive(Debug, Clone)]
pub struct Window {
    source: Vec<SongRef>,
    limit: usize,
    chunk: usize,
}

impl Default for Window {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK)
    }
}

impl Window {
    /// Empty window growing by `chunk` songs (at least one).
    pub fn new(chunk: usize) -> Self {
        let chunk = chunk.max(1);
        Self {
            source: Vec::new(),
            limit: chunk,
            chunk,
        }
    }

    pub fn chunk(&self) -> usize {
        self.chunk
    }

    /// The full list behind the window.
    pub fn source(&self) -> &[SongRef] {
        &self.source
    }

    /// Total songs behind the window.
    pub fn total(&self) -> usize {
        self.source.len()
    }

    /// Replace the list and shrink back to one chunk.
    pub fn reset(&mut self, source: Vec<SongRef>) {
        self.source = source;
        self.limit = self.chunk;
    }

    /// Songs currently exposed.
    pub fn visible(&self) -> &[SongRef] {
        &self.source[..self.limit.min(self.source.len())]
    }

    /// Whether songs remain past the window.
    pub fn has_more(&self) -> bool {
        self.limit < self.source.len()
    }

    /// Expose one more chunk; returns the newly exposed range, empty when
    /// everything is already visible.
    pub fn grow(&mut self) -> Range<usize> {
        let len = self.source.len();
        if self.limit >= len {
            return len..len;
        }
        let start = self.limit;
        self.limit = (self.limit + self.chunk).min(len);
        start..self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{ids, numbered_catalog};

    fn window_over(n: usize, chunk: usize) -> Window {
        let mut window = Window::new(chunk);
        window.reset(numbered_catalog(n).songs().to_vec());
        window
    }

    #[test]
    fn test_grow_in_chunks() {
        let mut window = window_over(120, DEFAULT_CHUNK);
        assert_eq!(window.visible().len(), 50);
        assert!(window.has_more());

        assert_eq!(window.grow(), 50..100);
        assert_eq!(window.grow(), 100..120);
        assert!(!window.has_more());
        assert_eq!(window.grow(), 120..120);
        assert_eq!(window.visible().len(), 120);
    }

    #[test]
    fn test_short_list_is_fully_visible() {
        let mut window = window_over(3, DEFAULT_CHUNK);
        assert_eq!(ids(window.visible()), ["s0", "s1", "s2"]);
        assert!(window.grow().is_empty());
    }

    #[test]
    fn test_reset_shrinks_to_one_chunk() {
        let mut window = window_over(30, 10);
        window.grow();
        window.grow();
        assert_eq!(window.visible().len(), 30);

        window.reset(numbered_catalog(30).songs().to_vec());
        assert_eq!(window.visible().len(), 10);
    }

    #[test]
    fn test_empty_window() {
        let mut window = Window::default();
        assert!(window.visible().is_empty());
        assert_eq!(window.grow(), 0..0);
    }

    #[test]
    fn test_zero_chunk_is_clamped() {
        let window = window_over(5, 0);
        assert_eq!(window.chunk(), 1);
        assert_eq!(window.visible().len(), 1);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn growth_is_contiguous_and_bounded(len in 0usize..300, chunk in 1usize..80, grows in 0usize..10) {
                let mut window = window_over(len, chunk);
                let mut shown = window.visible().len();
                prop_assert_eq!(shown, chunk.min(len));

                for _ in 0..grows {
                    let range = window.grow();
                    prop_assert_eq!(range.start, shown);
                    prop_assert!(range.end <= len);
                    prop_assert!(range.len() <= chunk);
                    shown = range.end;
                    prop_assert_eq!(window.visible().len(), shown);
                }
            }
        }
    }
}
