//! Catalog filtering and facet extraction.
//!
//! Filtering is a pure, order-preserving pass over the catalog. All active
//! predicates are ANDed; an axis set to [`Choice::All`] does not constrain.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::catalog::Catalog;
use crate::model::{LengthBucket, Song, SongRef};

/// A selection on one filter axis.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Choice<T> {
    #[default]
    All,
    Only(T),
}

impl<T> Choice<T> {
    /// Whether `pred` holds for the selected value (always true for `All`).
    pub fn allows(&self, pred: impl FnOnce(&T) -> bool) -> bool {
        match self {
            Choice::All => true,
            Choice::Only(value) => pred(value),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Choice::All)
    }
}

impl<T: FromStr> FromStr for Choice<T> {
    type Err = T::Err;

    /// `"all"` (any case) or an empty string selects everything.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            Ok(Choice::All)
        } else {
            s.parse().map(Choice::Only)
        }
    }
}

impl<T: fmt::Display> fmt::Display for Choice<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Choice::All => f.write_str("all"),
            Choice::Only(value) => fmt::Display::fmt(value, f),
        }
    }
}

/// User-selected filter criteria.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Case-insensitive text matched against title or artist
    pub search: String,
    pub genre: Choice<String>,
    /// Matched by containment, so "Arijit" selects "Arijit Singh, Neha Kakkar"
    pub artist: Choice<String>,
    pub length: Choice<LengthBucket>,
}

impl FilterCriteria {
    /// Criteria that match every song.
    pub fn all() -> Self {
        Self::default()
    }

    /// Whether no axis constrains anything.
    pub fn is_unconstrained(&self) -> bool {
        self.search.trim().is_empty()
            && self.genre.is_all()
            && self.artist.is_all()
            && self.length.is_all()
    }

    /// Whether a single song passes all predicates.
    pub fn matches(&self, song: &Song) -> bool {
        let term = self.search.to_lowercase();
        self.matches_prepared(song, &term)
    }

    fn matches_prepared(&self, song: &Song, term: &str) -> bool {
        let text_ok = term.is_empty()
            || song.title.to_lowercase().contains(term)
            || song.artist.to_lowercase().contains(term);

        text_ok
            && self.genre.allows(|g| song.has_genre(g))
            && self.artist.allows(|a| song.artist.contains(a.as_str()))
            && self
                .length
                .allows(|b| song.length_bucket == *b || song.duration_label == b.as_str())
    }
}

/// Apply criteria to a song list, preserving order.
pub fn apply_to(songs: &[SongRef], criteria: &FilterCriteria) -> Vec<SongRef> {
    let term = criteria.search.to_lowercase();
    songs
        .iter()
        .filter(|song| criteria.matches_prepared(song, &term))
        .cloned()
        .collect()
}

/// Apply criteria to the whole catalog, preserving catalog order.
pub fn apply(catalog: &Catalog, criteria: &FilterCriteria) -> Vec<SongRef> {
    apply_to(catalog.songs(), criteria)
}

/// Option lists for the genre and artist selectors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Facets {
    /// Distinct genres, sorted
    pub genres: Vec<String>,
    /// Distinct individual artists, sorted; comma-separated credits are split
    pub artists: Vec<String>,
}

/// Collect the distinct genres and artists of a catalog.
pub fn facets(catalog: &Catalog) -> Facets {
    let mut genres = BTreeSet::new();
    let mut artists = BTreeSet::new();

    for song in catalog.songs() {
        genres.extend(song.genres.iter().filter(|g| !g.is_empty()).cloned());
        artists.extend(
            song.artist
                .split(',')
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .map(str::to_string),
        );
    }

    Facets {
        genres: genres.into_iter().collect(),
        artists: artists.into_iter().collect(),
    }
}


/// Property-based tests using proptest
#[cfg(test)]
mod proptests {
    use super::*;
    use crate::test_utils::song_with;
    use proptest::prelude::*;

    const GENRES: &[&str] = &["Pop", "Rock", "Sufi", "Folk"];
    const ARTISTS: &[&str] = &["Asha Bhosle", "Kishore Kumar", "Arijit Singh", "Asha Bhosle, Kishore Kumar"];

    fn arb_song() -> impl Strategy<Value = Song> {
        (
            "[a-z]{1,6}",
            "[A-Za-z ]{0,12}",
            0..ARTISTS.len(),
            0u32..700,
            prop::collection::vec(0..GENRES.len(), 0..3),
        )
            .prop_map(|(id, title, artist, secs, genres)| {
                let label = format!("{}:{:02}", secs / 60, secs % 60);
                let genres: Vec<&str> = genres.into_iter().map(|g| GENRES[g]).collect();
                song_with(&id, &title, ARTISTS[artist], &label, &genres)
            })
    }

    fn arb_catalog() -> impl Strategy<Value = Catalog> {
        prop::collection::vec(arb_song(), 0..30).prop_map(Catalog::from_songs)
    }

    fn arb_criteria() -> impl Strategy<Value = FilterCriteria> {
        (
            "[a-z]{0,3}",
            prop::option::of(0..GENRES.len()),
            prop::option::of(0..2usize),
            prop::option::of(0..4usize),
        )
            .prop_map(|(search, genre, artist, length)| FilterCriteria {
                search,
                genre: genre.map_or(Choice::All, |g| Choice::Only(GENRES[g].to_string())),
                artist: artist.map_or(Choice::All, |a| Choice::Only(ARTISTS[a].to_string())),
                length: length.map_or(Choice::All, |l| {
                    Choice::Only(
                        [LengthBucket::Short, LengthBucket::Mid, LengthBucket::Long, LengthBucket::Unknown][l],
                    )
                }),
            })
    }

    proptest! {
        /// Unconstrained criteria return the catalog unchanged
        #[test]
        fn all_criteria_is_identity(catalog in arb_catalog()) {
            let result = apply(&catalog, &FilterCriteria::all());
            prop_assert_eq!(result.as_slice(), catalog.songs());
        }

        /// Filtering twice with the same criteria changes nothing
        #[test]
        fn filter_is_idempotent(catalog in arb_catalog(), criteria in arb_criteria()) {
            let once = apply(&catalog, &criteria);
            let twice = apply_to(&once, &criteria);
            prop_assert_eq!(once, twice);
        }

        /// Every result passes the criteria and keeps catalog order
        #[test]
        fn results_are_ordered_matches(catalog in arb_catalog(), criteria in arb_criteria()) {
            let result = apply(&catalog, &criteria);
            prop_assert!(result.iter().all(|s| criteria.matches(s)));
            let expected: Vec<SongRef> = catalog.songs().iter().filter(|s| criteria.matches(s)).cloned().collect();
            prop_assert_eq!(result, expected);
        }
    }
}
