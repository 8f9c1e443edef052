//! Core data models for the music library.
//!
//! Defines the primary entity [`Song`] and its coarse duration class
//! [`LengthBucket`]. Songs are produced once by the catalog normalizer and
//! never mutated afterwards; everything downstream shares them through
//! [`SongRef`] handles.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Shared, immutable handle to a catalog song.
pub type SongRef = Arc<Song>;

/// Genre list. Most songs carry one or two genres.
pub type Genres = SmallVec<[String; 2]>;

/// Upper bound (exclusive) of the `Short` bucket, in seconds.
pub const SHORT_MAX_SECS: u32 = 180;
/// Upper bound (inclusive) of the `Mid` bucket, in seconds.
pub const MID_MAX_SECS: u32 = 300;

/// A song in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    /// Unique identifier (never empty)
    pub id: String,
    /// Display title
    pub title: String,
    /// Display artist credit (may list several artists separated by commas)
    pub artist: String,
    /// Album name, empty when unknown
    pub album: String,
    /// Original textual duration, e.g. "3:45"
    pub duration_label: String,
    /// Parsed duration, 0 when the label is unparseable
    pub duration_seconds: u32,
    /// Coarse duration class
    pub length_bucket: LengthBucket,
    /// Genres in source order
    pub genres: Genres,
    /// Song language, if the source provides one
    pub language: Option<String>,
}

impl Song {
    /// Whether the genre list contains exactly `genre`.
    pub fn has_genre(&self, genre: &str) -> bool {
        self.genres.iter().any(|g| g == genre)
    }

    /// Genres joined for display.
    pub fn genre_text(&self) -> String {
        self.genres.join(", ")
    }
}

/// Coarse duration classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LengthBucket {
    Short,
    Mid,
    Long,
    #[default]
    Unknown,
}

impl LengthBucket {
    /// The three named buckets a trusted source label may carry.
    pub const NAMED: [LengthBucket; 3] = [LengthBucket::Short, LengthBucket::Mid, LengthBucket::Long];

    /// Classify a duration in seconds.
    ///
    /// 0 is `Unknown`, below 180 is `Short`, 180 to 300 inclusive is `Mid`,
    /// anything longer is `Long`.
    pub fn from_seconds(seconds: u32) -> Self {
        match seconds {
            0 => LengthBucket::Unknown,
            s if s < SHORT_MAX_SECS => LengthBucket::Short,
            s if s <= MID_MAX_SECS => LengthBucket::Mid,
            _ => LengthBucket::Long,
        }
    }

    /// Parse one of the three named buckets, exactly as spelled.
    ///
    /// Used for trusted source labels; `Unknown` is never accepted here.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::NAMED.into_iter().find(|b| b.as_str() == label)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LengthBucket::Short => "Short",
            LengthBucket::Mid => "Mid",
            LengthBucket::Long => "Long",
            LengthBucket::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for LengthBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LengthBucket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "short" => Ok(LengthBucket::Short),
            "mid" => Ok(LengthBucket::Mid),
            "long" => Ok(LengthBucket::Long),
            "unknown" => Ok(LengthBucket::Unknown),
            other => Err(format!("unknown length bucket: {other}")),
        }
    }
}

/// Parse a textual duration into seconds.
///
/// Accepts `M:SS` and `H:MM:SS`. Any other part count, or any part that is
/// not a non-negative integer, yields 0.
pub fn parse_duration(label: &str) -> u32 {
    let parts: Option<Vec<u32>> = label.split(':').map(|p| p.trim().parse::<u32>().ok()).collect();

    match parts.as_deref() {
        Some([m, s]) => m.saturating_mul(60).saturating_add(*s),
        Some([h, m, s]) => h
            .saturating_mul(3600)
            .saturating_add(m.saturating_mul(60))
            .saturating_add(*s),
        _ => 0,
    }
}
