//! # Offline Movie Source
//!
//! Serves a fixed catalog: the built-in seed data or a JSON catalog file.
//! Search is a title prefix filter over that catalog.

use super::MovieApi;
use marquee_core::{Catalog, FetchError, MarqueeError, query, seed_catalog};
use std::path::Path;

/// Maximum catalog file size (10 MB).
const MAX_CATALOG_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Movie source backed by an in-memory catalog.
#[derive(Debug, Clone)]
pub struct SeedMovieApi {
    catalog: Catalog,
}

impl Default for SeedMovieApi {
    fn default() -> Self {
        Self::new(seed_catalog())
    }
}

impl SeedMovieApi {
    /// Serve `catalog`.
    #[must_use]
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }

    /// Serve the catalog stored in a JSON file (an array of movies).
    pub fn from_file(path: &Path) -> Result<Self, MarqueeError> {
        let metadata = std::fs::metadata(path)
            .map_err(|e| MarqueeError::IoError(format!("Cannot read file metadata: {}", e)))?;
        if metadata.len() > MAX_CATALOG_FILE_SIZE {
            return Err(MarqueeError::SerializationError(format!(
                "File size {} bytes exceeds maximum allowed {} bytes",
                metadata.len(),
                MAX_CATALOG_FILE_SIZE
            )));
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| MarqueeError::IoError(format!("Failed to read catalog: {}", e)))?;
        let catalog: Catalog = serde_json::from_str(&content).map_err(|e| {
            MarqueeError::SerializationError(format!("Invalid catalog file: {}", e))
        })?;

        tracing::info!(path = %path.display(), count = catalog.len(), "catalog file loaded");
        Ok(Self::new(catalog))
    }

    /// The served catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}

impl MovieApi for SeedMovieApi {
    async fn popular_movies(&self) -> Result<Catalog, FetchError> {
        Ok(self.catalog.clone())
    }

    async fn search_movies(&self, query: &str) -> Result<Catalog, FetchError> {
        Ok(query::filter(&self.catalog, query))
    }
}
