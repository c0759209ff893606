//! # Core Type Definitions
//!
//! This module contains the data model of the Marquee engine:
//! - Movie identifiers and records (`MovieId`, `ReleaseYear`, `Movie`)
//! - Ordered catalog snapshots (`Catalog`)
//! - The favorites set (`FavoriteSet`)
//! - Error types (`MarqueeError`, `FetchError`)
//!
//! ## Determinism Guarantees
//!
//! - Catalog order is insertion order and is never re-sorted
//! - `FavoriteSet` uses `BTreeSet` for deterministic iteration
//! - Movie ids are unique within a catalog snapshot

use crate::primitives::MAX_CATALOG_SIZE;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

// =============================================================================
// MOVIE IDENTIFIERS
// =============================================================================

/// Unique identifier for a movie within a catalog snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MovieId(pub u64);

impl MovieId {
    /// Get the raw id value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// RELEASE YEAR
// =============================================================================

/// Release year as delivered by the data source.
///
/// Sources disagree on the shape: the seed data uses `"2008"`, remote
/// payloads use full dates, some emit a bare integer. The text is kept as
/// given; [`ReleaseYear::year`] extracts the numeric year when there is one.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(from = "RawReleaseYear")]
pub struct ReleaseYear(String);

/// Wire shapes accepted for a release year.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawReleaseYear {
    Number(i64),
    Text(String),
}

impl From<RawReleaseYear> for ReleaseYear {
    fn from(raw: RawReleaseYear) -> Self {
        match raw {
            RawReleaseYear::Number(n) => Self(n.to_string()),
            RawReleaseYear::Text(s) => Self(s),
        }
    }
}

impl ReleaseYear {
    /// Create a release year from text.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Unknown release year.
    #[must_use]
    pub fn unknown() -> Self {
        Self::default()
    }

    /// Get the release year as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The leading four-digit year, if the text starts with one.
    #[must_use]
    pub fn year(&self) -> Option<u16> {
        let head = self.0.get(..4)?;
        if head.bytes().all(|b| b.is_ascii_digit()) {
            head.parse().ok()
        } else {
            None
        }
    }
}

impl From<u16> for ReleaseYear {
    fn from(year: u16) -> Self {
        Self(year.to_string())
    }
}

impl fmt::Display for ReleaseYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// MOVIE
// =============================================================================

/// A movie record. Immutable once loaded.
///
/// Accepts the field names `release_date` and `url` as aliases so catalog
/// files written for the browser viewer load unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    /// Unique id within a catalog snapshot.
    pub id: MovieId,
    /// Display title. May contain non-ASCII text.
    pub title: String,
    /// Release year (text, see [`ReleaseYear`]).
    #[serde(default, alias = "release_date")]
    pub release_year: ReleaseYear,
    /// Poster image URL, possibly empty.
    #[serde(default, alias = "url")]
    pub poster_url: String,
}

impl Movie {
    /// Create a new movie with no poster.
    #[must_use]
    pub fn new(id: MovieId, title: impl Into<String>, release_year: ReleaseYear) -> Self {
        Self {
            id,
            title: title.into(),
            release_year,
            poster_url: String::new(),
        }
    }

    /// Attach a poster URL.
    #[must_use]
    pub fn with_poster(mut self, poster_url: impl Into<String>) -> Self {
        self.poster_url = poster_url.into();
        self
    }

    /// Whether the movie has a poster to show.
    #[must_use]
    pub fn has_poster(&self) -> bool {
        !self.poster_url.is_empty()
    }
}

// =============================================================================
// CATALOG
// =============================================================================

/// An ordered snapshot of movies.
///
/// Order is the default display order. A catalog is replaced wholesale and
/// never mutated in place; every constructor enforces id uniqueness.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<Movie>", into = "Vec<Movie>")]
pub struct Catalog {
    movies: Vec<Movie>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate ids and oversized input.
    pub fn new(movies: Vec<Movie>) -> Result<Self, MarqueeError> {
        if movies.len() > MAX_CATALOG_SIZE {
            return Err(MarqueeError::CatalogTooLarge(movies.len()));
        }
        let mut seen = BTreeSet::new();
        for movie in &movies {
            if !seen.insert(movie.id) {
                return Err(MarqueeError::DuplicateMovieId(movie.id));
            }
        }
        Ok(Self { movies })
    }

    /// An empty catalog.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from movies whose ids are already known to be unique, such as
    /// a subsequence of an existing catalog.
    pub(crate) fn from_unique(movies: Vec<Movie>) -> Self {
        Self { movies }
    }

    /// The movies in display order.
    #[must_use]
    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    /// Iterate in display order.
    pub fn iter(&self) -> std::slice::Iter<'_, Movie> {
        self.movies.iter()
    }

    /// Number of movies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.movies.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// Look up a movie by id.
    #[must_use]
    pub fn get(&self, id: MovieId) -> Option<&Movie> {
        self.movies.iter().find(|m| m.id == id)
    }

    /// Whether the catalog contains the given id.
    #[must_use]
    pub fn contains(&self, id: MovieId) -> bool {
        self.get(id).is_some()
    }

    /// Ids in display order.
    pub fn ids(&self) -> impl Iterator<Item = MovieId> + '_ {
        self.movies.iter().map(|m| m.id)
    }

    /// Consume the catalog, returning the movies.
    #[must_use]
    pub fn into_movies(self) -> Vec<Movie> {
        self.movies
    }
}

impl TryFrom<Vec<Movie>> for Catalog {
    type Error = MarqueeError;

    fn try_from(movies: Vec<Movie>) -> Result<Self, Self::Error> {
        Self::new(movies)
    }
}

impl From<Catalog> for Vec<Movie> {
    fn from(catalog: Catalog) -> Self {
        catalog.movies
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Movie;
    type IntoIter = std::slice::Iter<'a, Movie>;

    fn into_iter(self) -> Self::IntoIter {
        self.movies.iter()
    }
}

// =============================================================================
// FAVORITE SET
// =============================================================================

/// The set of movie ids the user marked as favorite.
///
/// A set by construction: no duplicates, deterministic ascending iteration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FavoriteSet {
    ids: BTreeSet<MovieId>,
}

impl FavoriteSet {
    /// Create an empty favorite set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership of `id`. Returns `true` if `id` is now a favorite.
    pub fn toggle(&mut self, id: MovieId) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    /// Check membership.
    #[must_use]
    pub fn contains(&self, id: MovieId) -> bool {
        self.ids.contains(&id)
    }

    /// Iterate ids in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = MovieId> + '_ {
        self.ids.iter().copied()
    }

    /// Number of favorites.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether there are no favorites.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl FromIterator<MovieId> for FavoriteSet {
    fn from_iter<I: IntoIterator<Item = MovieId>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Failures of the remote movie API collaborator.
///
/// A malformed payload is a `Parse` failure and travels the same path as
/// any other fetch failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Transport failure: connection refused, timeout, DNS.
    #[error("Network error: {0}")]
    Network(String),

    /// 401 from the remote API.
    #[error("Unauthorized: invalid or missing API key")]
    Unauthorized,

    /// 429 from the remote API.
    #[error("Rate limited by the movie API")]
    RateLimited,

    /// Any other non-success status.
    #[error("Movie API returned {0}: {1}")]
    Status(u16, String),

    /// The payload could not be turned into a catalog.
    #[error("Malformed payload: {0}")]
    Parse(String),
}

impl FetchError {
    /// Whether this is a payload (parse) failure.
    #[must_use]
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse(_))
    }
}

/// Errors that can occur in the Marquee engine.
///
/// None of these are fatal to a session: the controller converts them into
/// a user-visible notice and keeps the last good state.
#[derive(Debug, Error)]
pub enum MarqueeError {
    /// The remote API failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Two movies in one catalog share an id.
    #[error("Duplicate movie id in catalog: {0}")]
    DuplicateMovieId(MovieId),

    /// Catalog exceeds `MAX_CATALOG_SIZE`.
    #[error("Catalog of {0} movies exceeds the maximum size")]
    CatalogTooLarge(usize),

    /// Search query exceeds `MAX_QUERY_LENGTH` bytes.
    #[error("Search query of {0} bytes is too long")]
    QueryTooLong(usize),

    /// A serialization or deserialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: u64, title: &str) -> Movie {
        Movie::new(MovieId(id), title, ReleaseYear::new("2000"))
    }

    #[test]
    fn catalog_rejects_duplicate_ids() {
        let result = Catalog::new(vec![movie(1, "A"), movie(2, "B"), movie(1, "C")]);
        assert!(matches!(
            result,
            Err(MarqueeError::DuplicateMovieId(MovieId(1)))
        ));
    }

    #[test]
    fn catalog_preserves_insertion_order() {
        let catalog = Catalog::new(vec![movie(3, "C"), movie(1, "A"), movie(2, "B")])
            .expect("catalog");
        let ids: Vec<_> = catalog.ids().collect();
        assert_eq!(ids, vec![MovieId(3), MovieId(1), MovieId(2)]);
    }

    #[test]
    fn catalog_lookup() {
        let catalog = Catalog::new(vec![movie(1, "A")]).expect("catalog");
        assert_eq!(catalog.get(MovieId(1)).map(|m| m.title.as_str()), Some("A"));
        assert!(!catalog.contains(MovieId(9)));
    }

    #[test]
    fn release_year_extracts_leading_year() {
        assert_eq!(ReleaseYear::new("2008").year(), Some(2008));
        assert_eq!(ReleaseYear::new("1994-09-23").year(), Some(1994));
        assert_eq!(ReleaseYear::new("").year(), None);
        assert_eq!(ReleaseYear::new("n/a").year(), None);
        // Multi-byte text must not split a char boundary.
        assert_eq!(ReleaseYear::new("二〇〇〇年").year(), None);
    }

    #[test]
    fn release_year_accepts_number_or_string() {
        let a: ReleaseYear = serde_json::from_str("2002").expect("number");
        let b: ReleaseYear = serde_json::from_str("\"2002\"").expect("string");
        assert_eq!(a, b);
    }

    #[test]
    fn movie_accepts_original_field_names() {
        let json = r#"{"id":4,"title":"白夜行","release_date":"2000","url":""}"#;
        let m: Movie = serde_json::from_str(json).expect("movie");
        assert_eq!(m.id, MovieId(4));
        assert_eq!(m.release_year.as_str(), "2000");
        assert!(!m.has_poster());
    }

    #[test]
    fn catalog_deserialization_enforces_uniqueness() {
        let json = r#"[{"id":1,"title":"A"},{"id":1,"title":"B"}]"#;
        let result: Result<Catalog, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn favorite_set_toggle_flips_membership() {
        let mut set = FavoriteSet::new();
        assert!(set.toggle(MovieId(3)));
        assert!(set.contains(MovieId(3)));
        assert!(!set.toggle(MovieId(3)));
        assert!(set.is_empty());
    }

    #[test]
    fn favorite_set_deterministic_ordering() {
        let set: FavoriteSet = [MovieId(3), MovieId(1), MovieId(2), MovieId(1)]
            .into_iter()
            .collect();
        let ids: Vec<_> = set.iter().collect();
        assert_eq!(ids, vec![MovieId(1), MovieId(2), MovieId(3)]);
    }

    #[test]
    fn parse_error_is_a_fetch_error() {
        let err: MarqueeError = FetchError::Parse("bad json".into()).into();
        assert!(matches!(err, MarqueeError::Fetch(ref f) if f.is_parse()));
    }
}
