//! Player notification and request types.

use std::time::Duration;

use crate::epoch::Ticket;
use crate::model::Song;

/// Display metadata for the song that just became current.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NowPlaying {
    pub id: String,
    pub title: String,
    pub artist: String,
    /// Cover reference (file path or placeholder)
    pub cover: String,
    /// Formatted duration, empty when unknown
    pub duration: String,
}

impl NowPlaying {
    pub fn new(song: &Song, cover: String) -> Self {
        Self {
            id: song.id.clone(),
            title: song.title.clone(),
            artist: song.artist.clone(),
            cover,
            duration: if song.duration_seconds > 0 {
                format_duration(Duration::from_secs(u64::from(song.duration_seconds)))
            } else {
                String::new()
            },
        }
    }
}

/// A request to start audio for one song.
///
/// Produced synchronously by the player; the audio start itself happens
/// asynchronously and reports back with the same ticket.
#[derive(Debug, Clone)]
pub struct PlayRequest {
    pub ticket: Ticket,
    pub now_playing: NowPlaying,
    /// Audio locators to try, in order
    pub locators: Vec<String>,
    /// Whether failures move on to the next locator
    pub retry: bool,
}

/// Format a duration as MM:SS or HH:MM:SS.
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    let hours = secs / 3600;
    let mins = (secs % 3600) / 60;
    let secs = secs % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, mins, secs)
    } else {
        format!("{}:{:02}", mins, secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::parse_duration;
    use crate::test_utils::{mock_song, song_with};

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(0)), "0:00");
        assert_eq!(format_duration(Duration::from_secs(65)), "1:05");
        assert_eq!(format_duration(Duration::from_secs(3661)), "1:01:01");
    }

    #[test]
    fn test_format_inverts_parse() {
        for label in ["5:40", "0:59", "1:02:30"] {
            let secs = parse_duration(label);
            assert_eq!(format_duration(Duration::from_secs(u64::from(secs))), label);
        }
    }

    #[test]
    fn test_now_playing_metadata() {
        let np = NowPlaying::new(&song_with("a", "Kesariya", "Arijit Singh", "04:28", &[]), "c.jpg".into());
        assert_eq!(np.title, "Kesariya");
        assert_eq!(np.duration, "4:28");

        let unknown = Song {
            duration_seconds: 0,
            ..mock_song("b")
        };
        assert_eq!(NowPlaying::new(&unknown, String::new()).duration, "");
    }
}
