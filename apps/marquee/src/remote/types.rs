//! # Remote Payload Types
//!
//! JSON shapes returned by the movie API and their conversion into
//! catalog snapshots.

use marquee_core::{Catalog, FetchError, Movie, MovieId, ReleaseYear};
use serde::{Deserialize, Serialize};

/// A page of movies: `{ "results": [...] }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MovieListPayload {
    #[serde(default)]
    pub results: Vec<MoviePayload>,
}

/// One movie as the remote API describes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoviePayload {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
}

impl MoviePayload {
    /// Convert to a `Movie`, resolving the poster against `image_base_url`.
    #[must_use]
    pub fn into_movie(self, image_base_url: &str) -> Movie {
        let year: String = self
            .release_date
            .as_deref()
            .unwrap_or_default()
            .chars()
            .take(4)
            .collect();

        let movie = Movie::new(MovieId(self.id), self.title, ReleaseYear::new(year));
        match self.poster_path.as_deref() {
            Some(path) if !path.is_empty() => movie.with_poster(format!(
                "{}/{}",
                image_base_url.trim_end_matches('/'),
                path.trim_start_matches('/')
            )),
            _ => movie,
        }
    }
}

impl MovieListPayload {
    /// Build a catalog in payload order.
    ///
    /// Duplicate ids make the payload malformed.
    pub fn into_catalog(self, image_base_url: &str) -> Result<Catalog, FetchError> {
        let movies = self
            .results
            .into_iter()
            .map(|m| m.into_movie(image_base_url))
            .collect();
        Catalog::new(movies).map_err(|e| FetchError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IMAGES: &str = "https://img.example/w500";

    #[test]
    fn payload_converts_year_and_poster() {
        let payload: MovieListPayload = serde_json::from_str(
            r#"{"page":1,"results":[
                {"id":155,"title":"The Dark Knight","release_date":"2008-07-16","poster_path":"/qJ2.jpg"},
                {"id":7,"title":"Untitled"}
            ]}"#,
        )
        .expect("parse");

        let catalog = payload.into_catalog(IMAGES).expect("catalog");
        let first = &catalog.movies()[0];
        assert_eq!(first.release_year.as_str(), "2008");
        assert_eq!(first.poster_url, "https://img.example/w500/qJ2.jpg");

        let second = &catalog.movies()[1];
        assert_eq!(second.release_year, ReleaseYear::unknown());
        assert!(!second.has_poster());
    }

    #[test]
    fn duplicate_ids_are_parse_errors() {
        let payload = MovieListPayload {
            results: vec![
                MoviePayload {
                    id: 1,
                    title: "A".into(),
                    release_date: None,
                    poster_path: None,
                },
                MoviePayload {
                    id: 1,
                    title: "B".into(),
                    release_date: None,
                    poster_path: None,
                },
            ],
        };

        let err = payload.into_catalog(IMAGES).expect_err("duplicate");
        assert!(err.is_parse());
    }
}
