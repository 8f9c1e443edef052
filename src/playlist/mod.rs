//! Playlist generation.
//!
//! Produces the date-dependent daily mix followed by the fixed playlists.
//! Membership is always in catalog order and capped; playlists that end up
//! empty are left out.

mod rules;

pub use rules::{
    FIXED_PLAYLISTS, FixedPlaylist, LEGACY_SINGERS, Mood, Rule, SPECIAL_DAYS, SpecialDay,
    THROWBACK_DAY, WEEKDAY_MOODS, mentions_decade,
};

use chrono::{Datelike, NaiveDate};
use rand::Rng;
use rand::seq::IndexedRandom;

use crate::catalog::Catalog;
use crate::model::{Song, SongRef};

pub const DAILY_ID: &str = "daily-mix";
/// Most songs in the daily mix.
pub const DAILY_CAP: usize = 25;
/// Most songs in any fixed playlist.
pub const FIXED_CAP: usize = 50;

/// A named subset of the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    pub subtitle: String,
    pub songs: Vec<SongRef>,
}

impl Playlist {
    /// Pick a random song to represent the playlist's cover.
    ///
    /// Presentational only; a new pick is expected on every render.
    pub fn pick_cover<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&SongRef> {
        self.songs.choose(rng)
    }
}

/// Generate all playlists for a date: daily mix first, then fixed playlists.
pub fn generate(catalog: &Catalog, date: NaiveDate) -> Vec<Playlist> {
    let daily = daily_mix(catalog, date);
    let fixed = FIXED_PLAYLISTS.iter().map(|def| Playlist {
        id: def.id.to_string(),
        name: def.name.to_string(),
        subtitle: def.subtitle.to_string(),
        songs: take_matching(catalog, FIXED_CAP, |s| def.rule.matches(s)),
    });

    daily
        .into_iter()
        .chain(fixed)
        .filter(|p| !p.songs.is_empty())
        .collect()
}

/// The daily mix for a date.
///
/// Special calendar dates take precedence over the weekday mood.
pub fn daily_mix(catalog: &Catalog, date: NaiveDate) -> Option<Playlist> {
    let (name, subtitle, songs) = match special_day(date) {
        Some(day) => {
            tracing::debug!(target: "playlist::daily", day = day.name, "Special day mix");
            let songs = take_matching(catalog, DAILY_CAP, |s| matches_keywords(s, day.keywords));
            (day.name, day.subtitle, songs)
        }
        None => {
            let index = date.weekday().num_days_from_sunday() as usize;
            let mood = WEEKDAY_MOODS[index];
            let mut songs = take_matching(catalog, DAILY_CAP, |s| matches_mood(s, mood.tags));
            if songs.is_empty() && index == THROWBACK_DAY {
                tracing::debug!(target: "playlist::daily", "No mood matches, falling back to legacy songs");
                songs = take_matching(catalog, DAILY_CAP, is_legacy);
            }
            (mood.name, mood.subtitle, songs)
        }
    };

    if songs.is_empty() {
        return None;
    }

    Some(Playlist {
        id: DAILY_ID.to_string(),
        name: name.to_string(),
        subtitle: subtitle.to_string(),
        songs,
    })
}

fn special_day(date: NaiveDate) -> Option<&'static SpecialDay> {
    SPECIAL_DAYS
        .iter()
        .find(|d| d.month == date.month() && d.day == date.day())
}

fn take_matching(catalog: &Catalog, cap: usize, pred: impl Fn(&Song) -> bool) -> Vec<SongRef> {
    catalog
        .songs()
        .iter()
        .filter(|s| pred(s))
        .take(cap)
        .cloned()
        .collect()
}

/// Any genre contains any tag, ignoring case.
fn matches_mood(song: &Song, tags: &[&str]) -> bool {
    song.genres.iter().any(|g| {
        let g = g.to_lowercase();
        tags.iter().any(|t| g.contains(&t.to_lowercase()))
    })
}

/// Title or any genre contains any keyword, ignoring case.
fn matches_keywords(song: &Song, keywords: &[&str]) -> bool {
    let title = song.title.to_lowercase();
    keywords.iter().any(|k| {
        let k = k.to_lowercase();
        title.contains(&k) || song.genres.iter().any(|g| g.to_lowercase().contains(&k))
    })
}

fn is_legacy(song: &Song) -> bool {
    song.title.contains("19") || LEGACY_SINGERS.iter().any(|singer| song.artist.contains(singer))
}
