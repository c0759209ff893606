//! # API Request/Response Types
//!
//! This module defines the JSON structures for the HTTP API.

use marquee_core::{
    MarqueeError, Movie, Notice, View,
    primitives::MAX_QUERY_LENGTH,
};
use serde::{Deserialize, Serialize};

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// QUERY REQUEST
// =============================================================================

/// Body of `POST /input` and `POST /search`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryRequest {
    #[serde(default)]
    pub query: String,
}

impl QueryRequest {
    /// Reject queries longer than `MAX_QUERY_LENGTH` bytes.
    pub fn validate(&self) -> Result<(), MarqueeError> {
        if self.query.len() > MAX_QUERY_LENGTH {
            return Err(MarqueeError::QueryTooLong(self.query.len()));
        }
        Ok(())
    }
}

// =============================================================================
// MOVIE JSON
// =============================================================================

/// A movie as rendered by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieJson {
    pub id: u64,
    pub title: String,
    pub release_year: String,
    pub poster_url: String,
    pub favorite: bool,
}

impl MovieJson {
    #[must_use]
    pub fn new(movie: &Movie, favorite: bool) -> Self {
        Self {
            id: movie.id.value(),
            title: movie.title.clone(),
            release_year: movie.release_year.to_string(),
            poster_url: movie.poster_url.clone(),
            favorite,
        }
    }
}

// =============================================================================
// VIEW RESPONSE
// =============================================================================

/// Full render state, returned by every state-changing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewResponse {
    pub query: String,
    pub movies: Vec<MovieJson>,
    pub favorites: Vec<u64>,
    pub notice: Option<Notice>,
    pub loading: bool,
}

impl From<View> for ViewResponse {
    fn from(view: View) -> Self {
        let movies = view
            .movies
            .iter()
            .map(|m| MovieJson::new(m, view.is_favorite(m.id)))
            .collect();

        Self {
            movies,
            favorites: view.favorites.iter().map(|id| id.value()).collect(),
            query: view.query,
            notice: view.notice,
            loading: view.loading,
        }
    }
}

// =============================================================================
// FAVORITES RESPONSE
// =============================================================================

/// Favorites page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoritesResponse {
    pub movies: Vec<MovieJson>,
    /// True when there is nothing to show ("no favorites yet").
    pub empty: bool,
}

impl FavoritesResponse {
    #[must_use]
    pub fn new(movies: &[Movie]) -> Self {
        Self {
            movies: movies.iter().map(|m| MovieJson::new(m, true)).collect(),
            empty: movies.is_empty(),
        }
    }
}

// =============================================================================
// ERROR RESPONSE
// =============================================================================

/// Error body for rejected requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
