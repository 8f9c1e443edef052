//! Song catalog loading and normalization.
//!
//! Catalog documents come from a loose JSON format that grew over several
//! scraping passes: ids, titles and artists live under different keys
//! depending on the record's age, genres may be a string or a list, and the
//! `listen` field may hold either a duration or a bucket label. This module
//! turns all of that into uniform [`Song`] values.

mod relabel;
mod source;

pub use relabel::{LengthClusters, RelabelSummary, cluster_lengths, relabel_document, relabel_file};
pub use source::{CatalogSource, FileSource, HttpSource, load, source_for};
#[cfg(test)]
pub use source::mocks;

use serde_json::{Map, Value};
use std::collections::HashSet;
use std::sync::Arc;

use crate::model::{Genres, LengthBucket, Song, SongRef, parse_duration};

/// Raw keys tried, in order, for each song field.
const ID_KEYS: &[&str] = &["video_id", "videoId", "id"];
const TITLE_KEYS: &[&str] = &["title", "name"];
const ARTIST_KEYS: &[&str] = &["artist_name", "artist", "artistName"];
const DURATION_KEYS: &[&str] = &["duration", "listen", "length"];
const GENRE_KEYS: &[&str] = &["genre", "genres"];

/// Raw key whose value is trusted as a bucket label when it names one.
const TRUSTED_BUCKET_KEY: &str = "listen";

pub const DEFAULT_TITLE: &str = "Untitled";
pub const DEFAULT_ARTIST: &str = "Unknown Artist";

/// Errors raised while fetching or normalizing a catalog.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CatalogError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {0}")]
    Status(u16),

    #[error("Failed to read {path}: {message}")]
    Read { path: String, message: String },

    #[error("Invalid JSON: {0}")]
    Parse(String),

    #[error("Catalog document must be an array or an object with a `songs` array")]
    InvalidFormat,

    #[error("No songs found in catalog")]
    Empty,

    #[error("Need at least 3 songs with a duration to cluster, found {found}")]
    NotEnoughDurations { found: usize },
}

/// The normalized song catalog for one session.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    songs: Vec<SongRef>,
}

impl Catalog {
    /// Build a catalog from already-normalized songs.
    pub fn from_songs(songs: impl IntoIterator<Item = Song>) -> Self {
        Self {
            songs: songs.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn songs(&self) -> &[SongRef] {
        &self.songs
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    /// Look up a song by id.
    pub fn get(&self, id: &str) -> Option<&SongRef> {
        self.songs.iter().find(|s| s.id == id)
    }
}

/// Parse and normalize a catalog document in one step.
pub fn from_json(text: &str) -> Result<Catalog, CatalogError> {
    let records = parse_document(text)?;
    normalize(&records)
}

/// Extract the raw song records from a catalog document.
///
/// The document is either a top-level array or an object with a `songs`
/// array field.
pub fn parse_document(text: &str) -> Result<Vec<Value>, CatalogError> {
    let data: Value = serde_json::from_str(text).map_err(|e| CatalogError::Parse(e.to_string()))?;
    match data {
        Value::Array(records) => Ok(records),
        Value::Object(mut obj) => match obj.remove("songs") {
            Some(Value::Array(records)) => Ok(records),
            _ => Err(CatalogError::InvalidFormat),
        },
        _ => Err(CatalogError::InvalidFormat),
    }
}

/// Normalize raw records into a catalog.
///
/// Records without a usable id are dropped, and so are later records
/// repeating an id already seen. Fails with [`CatalogError::Empty`] when
/// nothing usable remains.
pub fn normalize(records: &[Value]) -> Result<Catalog, CatalogError> {
    let mut dropped = 0usize;
    let mut duplicates = 0usize;
    let mut seen = HashSet::with_capacity(records.len());
    let mut songs: Vec<SongRef> = Vec::with_capacity(records.len());

    for raw in records {
        let Some(song) = normalize_record(raw) else {
            dropped += 1;
            continue;
        };
        if !seen.insert(song.id.clone()) {
            duplicates += 1;
            continue;
        }
        songs.push(Arc::new(song));
    }

    if dropped > 0 {
        tracing::debug!(target: "catalog::normalize", dropped, "Skipped records without an id");
    }
    if duplicates > 0 {
        tracing::debug!(target: "catalog::normalize", duplicates, "Skipped records with a repeated id");
    }

    if songs.is_empty() {
        return Err(CatalogError::Empty);
    }

    Ok(Catalog { songs })
}

/// Normalize a single raw record, or `None` if it has no id.
pub fn normalize_record(raw: &Value) -> Option<Song> {
    let obj = raw.as_object()?;
    let id = first_string(obj, ID_KEYS)?;

    let duration_label = first_string(obj, DURATION_KEYS).unwrap_or_default();
    let duration_seconds = parse_duration(&duration_label);
    let length_bucket = obj
        .get(TRUSTED_BUCKET_KEY)
        .and_then(Value::as_str)
        .and_then(LengthBucket::from_label)
        .unwrap_or_else(|| LengthBucket::from_seconds(duration_seconds));

    Some(Song {
        id,
        title: first_string(obj, TITLE_KEYS).unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        artist: first_string(obj, ARTIST_KEYS).unwrap_or_else(|| DEFAULT_ARTIST.to_string()),
        album: first_string(obj, &["album"]).unwrap_or_default(),
        duration_label,
        duration_seconds,
        length_bucket,
        genres: genres_of(obj),
        language: first_string(obj, &["language"]),
    })
}

/// First non-empty string (or number) among `keys`.
fn first_string(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match obj.get(*key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn genres_of(obj: &Map<String, Value>) -> Genres {
    let Some(value) = GENRE_KEYS.iter().find_map(|key| obj.get(*key)) else {
        return Genres::new();
    };

    match value {
        Value::String(s) if !s.is_empty() => std::iter::once(s.clone()).collect(),
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .filter(|g| !g.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Genres::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_id_fallback_order() {
        let song = normalize_record(&json!({"videoId": "b", "id": "c"})).unwrap();
        assert_eq!(song.id, "b");

        let song = normalize_record(&json!({"video_id": "", "id": "c"})).unwrap();
        assert_eq!(song.id, "c");

        assert!(normalize_record(&json!({"title": "No id"})).is_none());
        assert!(normalize_record(&json!("not an object")).is_none());
    }

    #[test]
    fn test_defaults_for_missing_fields() {
        let song = normalize_record(&json!({"video_id": "x1"})).unwrap();
        assert_eq!(song.title, DEFAULT_TITLE);
        assert_eq!(song.artist, DEFAULT_ARTIST);
        assert_eq!(song.duration_label, "");
        assert_eq!(song.duration_seconds, 0);
        assert_eq!(song.length_bucket, LengthBucket::Unknown);
        assert!(song.genres.is_empty());
        assert_eq!(song.language, None);
    }

    #[test]
    fn test_alternate_field_names() {
        let song = normalize_record(&json!({
            "id": "x2",
            "name": "Kesariya",
            "artistName": "Arijit Singh",
            "language": "Hindi"
        }))
        .unwrap();
        assert_eq!(song.title, "Kesariya");
        assert_eq!(song.artist, "Arijit Singh");
        assert_eq!(song.language.as_deref(), Some("Hindi"));
    }

    #[test]
    fn test_genre_coercion() {
        let scalar = normalize_record(&json!({"id": "a", "genre": "Pop"})).unwrap();
        assert_eq!(scalar.genres.as_slice(), ["Pop".to_string()]);

        let list = normalize_record(&json!({"id": "b", "genre": ["Pop", "", "Rock", 7]})).unwrap();
        assert_eq!(list.genres.as_slice(), ["Pop".to_string(), "Rock".to_string()]);

        let missing = normalize_record(&json!({"id": "c", "genre": null})).unwrap();
        assert!(missing.genres.is_empty());
    }

    #[test]
    fn test_duration_and_bucket() {
        let song = normalize_record(&json!({"id": "a", "duration": "4:10"})).unwrap();
        assert_eq!(song.duration_seconds, 250);
        assert_eq!(song.length_bucket, LengthBucket::Mid);
    }

    #[test]
    fn test_trusted_label_overrides_bucket() {
        let song = normalize_record(&json!({"id": "a", "duration": "2:00", "listen": "Long"})).unwrap();
        assert_eq!(song.duration_seconds, 120);
        assert_eq!(song.length_bucket, LengthBucket::Long);

        // Label leaks into the duration text when no duration is present
        let legacy = normalize_record(&json!({"id": "b", "listen": "Mid"})).unwrap();
        assert_eq!(legacy.duration_label, "Mid");
        assert_eq!(legacy.duration_seconds, 0);
        assert_eq!(legacy.length_bucket, LengthBucket::Mid);

        // Untrusted spelling is ignored
        let other = normalize_record(&json!({"id": "c", "duration": "6:00", "listen": "short"})).unwrap();
        assert_eq!(other.length_bucket, LengthBucket::Long);
    }

    #[test]
    fn test_parse_document_shapes() {
        assert_eq!(parse_document(r#"[{"id": "a"}]"#).unwrap().len(), 1);
        assert_eq!(parse_document(r#"{"songs": [{"id": "a"}, {"id": "b"}]}"#).unwrap().len(), 2);
        assert!(matches!(parse_document(r#"{"tracks": []}"#), Err(CatalogError::InvalidFormat)));
        assert!(matches!(parse_document("42"), Err(CatalogError::InvalidFormat)));
        assert!(matches!(parse_document("{not json"), Err(CatalogError::Parse(_))));
    }

    #[test]
    fn test_empty_catalog_is_an_error() {
        assert!(matches!(from_json("[]"), Err(CatalogError::Empty)));
        assert!(matches!(from_json(r#"[{"title": "orphan"}]"#), Err(CatalogError::Empty)));
    }

    #[test]
    fn test_records_without_id_are_dropped() {
        let catalog = from_json(r#"[{"id": "a"}, {"title": "orphan"}, {"video_id": "b"}]"#).unwrap();
        let ids: Vec<_> = catalog.songs().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
        assert!(catalog.get("b").is_some());
        assert!(catalog.get("orphan").is_none());
    }

    #[test]
    fn test_repeated_ids_keep_first_record() {
        let catalog = from_json(
            r#"[{"video_id": "a", "title": "First"}, {"video_id": "a", "title": "Second"}, {"video_id": "b"}]"#,
        )
        .unwrap();
        let ids: Vec<_> = catalog.songs().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
        assert_eq!(catalog.get("a").unwrap().title, "First");
    }
}
