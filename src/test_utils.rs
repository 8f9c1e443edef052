//! Test utilities and fixtures for music-shelf tests.
//!
//! This module provides common song factories and catalog builders to
//! reduce boilerplate in tests.
//!
//! # Example
//!
//! ```ignore
//! use music_shelf::test_utils::{mock_song, three_song_catalog};
//!
//! #[test]
//! fn test_something() {
//!     let catalog = three_song_catalog();
//!     let song = Song { title: "Custom".into(), ..mock_song("x") };
//! }
//! ```

use crate::catalog::Catalog;
use crate::model::{Genres, LengthBucket, Song, parse_duration};

/// Creates a mock Song with sensible defaults and the given id.
///
/// Use struct update syntax to customize:
///
/// ```ignore
/// let song = Song {
///     artist: "Shreya Ghoshal".to_string(),
///     ..mock_song("abc")
/// };
/// ```
pub fn mock_song(id: &str) -> Song {
    Song {
        id: id.to_string(),
        title: format!("Track {}", id),
        artist: "Test Artist".to_string(),
        album: String::new(),
        duration_label: "3:30".to_string(),
        duration_seconds: 210,
        length_bucket: LengthBucket::Mid,
        genres: Genres::from_iter(["Pop".to_string()]),
        language: None,
    }
}

/// Creates a song whose duration fields are derived from `duration`.
pub fn song_with(id: &str, title: &str, artist: &str, duration: &str, genres: &[&str]) -> Song {
    let seconds = parse_duration(duration);
    Song {
        title: title.to_string(),
        artist: artist.to_string(),
        duration_label: duration.to_string(),
        duration_seconds: seconds,
        length_bucket: LengthBucket::from_seconds(seconds),
        genres: genres.iter().map(|g| g.to_string()).collect(),
        ..mock_song(id)
    }
}

/// Catalog of three songs: 2:00 Pop, 4:00 Rock, 6:00 Pop.
pub fn three_song_catalog() -> Catalog {
    Catalog::from_songs([
        song_with("a", "Morning Light", "Asha Bhosle", "2:00", &["Pop"]),
        song_with("b", "Thunder Road", "Mohit Chauhan", "4:00", &["Rock"]),
        song_with("c", "Evening Rain", "Asha Bhosle, Kishore Kumar", "6:00", &["Pop"]),
    ])
}

/// Catalog of `n` default mock songs with ids `s0..s{n-1}`.
pub fn numbered_catalog(n: usize) -> Catalog {
    Catalog::from_songs((0..n).map(|i| mock_song(&format!("s{}", i))))
}

/// Ids of a song slice, for compact assertions.
pub fn ids<S: std::ops::Deref<Target = Song>>(songs: &[S]) -> Vec<String> {
    songs.iter().map(|s| s.id.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_song_defaults() {
        let song = mock_song("x");
        assert_eq!(song.id, "x");
        assert_eq!(song.title, "Track x");
        assert_eq!(song.length_bucket, LengthBucket::Mid);
        assert!(song.has_genre("Pop"));
    }

    #[test]
    fn test_song_with_derives_bucket() {
        let song = song_with("y", "Long One", "Someone", "6:01", &["Rock", "Live"]);
        assert_eq!(song.duration_seconds, 361);
        assert_eq!(song.length_bucket, LengthBucket::Long);
        assert_eq!(song.genre_text(), "Rock, Live");
    }

    #[test]
    fn test_numbered_catalog() {
        let catalog = numbered_catalog(3);
        assert_eq!(ids(catalog.songs()), ["s0", "s1", "s2"]);
    }
}
