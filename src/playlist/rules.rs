//! Built-in playlist definitions.

use crate::model::Song;

/// A weekday mood for the daily mix.
#[derive(Debug, Clone, Copy)]
pub struct Mood {
    pub name: &'static str,
    pub subtitle: &'static str,
    /// Matched case-insensitively as substrings of a song's genres
    pub tags: &'static [&'static str],
}

/// Daily mix moods, indexed Sunday = 0 through Saturday = 6.
pub static WEEKDAY_MOODS: [Mood; 7] = [
    Mood {
        name: "Sunday Unwind",
        subtitle: "Slow songs for a slow day",
        tags: &["romantic", "sufi", "ghazal", "soft", "acoustic"],
    },
    Mood {
        name: "Monday Motivation",
        subtitle: "Start the week loud",
        tags: &["workout", "rock", "energetic", "motivational"],
    },
    Mood {
        name: "Tuesday Focus",
        subtitle: "Background for deep work",
        tags: &["instrumental", "lofi", "chill", "classical"],
    },
    Mood {
        name: "Midweek Mix",
        subtitle: "Halfway there",
        tags: &["pop", "indie"],
    },
    Mood {
        name: "Throwback Thursday",
        subtitle: "Songs your parents still hum",
        tags: &["retro", "oldies", "classic", "evergreen"],
    },
    Mood {
        name: "Friday Party",
        subtitle: "Turn it up",
        tags: &["party", "dance", "bhangra", "edm", "hip hop"],
    },
    Mood {
        name: "Saturday Road Trip",
        subtitle: "Windows down",
        tags: &["travel", "punjabi", "folk", "upbeat"],
    },
];

/// Weekday whose mood falls back to legacy songs when nothing matches.
pub const THROWBACK_DAY: usize = 4;

/// Singers whose songs count as throwbacks regardless of genre.
pub const LEGACY_SINGERS: [&str; 2] = ["Kishore Kumar", "Lata Mangeshkar"];

/// A calendar date with its own curated daily mix.
#[derive(Debug, Clone, Copy)]
pub struct SpecialDay {
    pub month: u32,
    pub day: u32,
    pub name: &'static str,
    pub subtitle: &'static str,
    /// Matched case-insensitively against title and genres
    pub keywords: &'static [&'static str],
}

pub static SPECIAL_DAYS: [SpecialDay; 2] = [
    SpecialDay {
        month: 2,
        day: 14,
        name: "Valentine's Special",
        subtitle: "Love songs, all day",
        keywords: &["love", "romantic", "pyaar", "ishq", "dil"],
    },
    SpecialDay {
        month: 8,
        day: 15,
        name: "Independence Day",
        subtitle: "Songs of the nation",
        keywords: &["patriotic", "desh", "vande", "watan", "india"],
    },
];

/// Membership rule of a fixed playlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Artist credit contains the name
    ArtistContains(&'static str),
    /// Genre list contains the exact genre
    Genre(&'static str),
    /// Language equals, ignoring case
    Language(&'static str),
    /// Title carries a year or decade marker ("1994", "90s")
    DecadeMarker,
}

impl Rule {
    pub fn matches(&self, song: &Song) -> bool {
        match *self {
            Rule::ArtistContains(name) => song.artist.contains(name),
            Rule::Genre(genre) => song.has_genre(genre),
            Rule::Language(lang) => song
                .language
                .as_deref()
                .is_some_and(|l| l.eq_ignore_ascii_case(lang)),
            Rule::DecadeMarker => mentions_decade(&song.title),
        }
    }
}

/// A date-independent playlist definition.
#[derive(Debug, Clone, Copy)]
pub struct FixedPlaylist {
    pub id: &'static str,
    pub name: &'static str,
    pub subtitle: &'static str,
    pub rule: Rule,
}

pub const FIXED_PLAYLISTS: &[FixedPlaylist] = &[
    FixedPlaylist {
        id: "arijit-essentials",
        name: "Arijit Essentials",
        subtitle: "The voice of a generation",
        rule: Rule::ArtistContains("Arijit Singh"),
    },
    FixedPlaylist {
        id: "romance",
        name: "Romance",
        subtitle: "For the hopeless romantics",
        rule: Rule::Genre("Romantic"),
    },
    FixedPlaylist {
        id: "sufi-soul",
        name: "Sufi Soul",
        subtitle: "Qawwalis and more",
        rule: Rule::Genre("Sufi"),
    },
    FixedPlaylist {
        id: "punjabi-hits",
        name: "Punjabi Hits",
        subtitle: "Bass boosted",
        rule: Rule::Language("Punjabi"),
    },
    FixedPlaylist {
        id: "decade-hits",
        name: "Decade Hits",
        subtitle: "Songs that wear their year",
        rule: Rule::DecadeMarker,
    },
];

/// Whether a title mentions a year (1900-2099) or a decade like "90s".
pub fn mentions_decade(title: &str) -> bool {
    let bytes = title.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if !bytes[i].is_ascii_digit() {
            i += 1;
            continue;
        }
        let start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        let run = &title[start..i];
        let year = run.len() == 4 && (run.starts_with("19") || run.starts_with("20"));
        let decade = run.len() == 2 && run.ends_with('0') && matches!(bytes.get(i), Some(b's' | b'S'));
        if year || decade {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Song;
    use crate::test_utils::mock_song;

    #[test]
    fn test_mentions_decade() {
        assert!(mentions_decade("Summer of 1969"));
        assert!(mentions_decade("Best of 2004 Remix"));
        assert!(mentions_decade("80s Medley"));
        assert!(mentions_decade("Back to the 90S"));
        assert!(!mentions_decade("Route 66"));
        assert!(!mentions_decade("Agent 007"));
        assert!(!mentions_decade("12345 Dreams"));
        assert!(!mentions_decade("Tum Hi Ho"));
        assert!(!mentions_decade("85s"));
    }

    #[test]
    fn test_language_rule_ignores_case() {
        let song = Song {
            language: Some("punjabi".to_string()),
            ..mock_song("p")
        };
        assert!(Rule::Language("Punjabi").matches(&song));
        assert!(!Rule::Language("Hindi").matches(&song));
        assert!(!Rule::Language("Punjabi").matches(&mock_song("none")));
    }

    #[test]
    fn test_throwback_day_is_thursday() {
        assert_eq!(WEEKDAY_MOODS[THROWBACK_DAY].name, "Throwback Thursday");
    }
}
