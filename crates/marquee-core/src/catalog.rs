//! # Catalog Module
//!
//! Holds the movies the client currently knows about.
//!
//! Two snapshots are kept:
//! - `base`: the unfiltered catalog (seed data or the popular list)
//! - `current`: what is displayed, either `base` or the last search result
//!
//! Both are replaced wholesale. A reader always sees one complete snapshot.

use crate::{Catalog, Movie, MovieId, ReleaseYear};

/// What a search submission requires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchPlan {
    /// Answered locally with the unfiltered base catalog.
    Local(Catalog),
    /// Must be delegated to the remote search operation.
    Remote(String),
}

/// Store for the base and displayed catalog snapshots.
#[derive(Debug, Clone, Default)]
pub struct CatalogStore {
    base: Catalog,
    current: Catalog,
}

impl CatalogStore {
    /// Create a store whose base and displayed snapshots are `base`.
    #[must_use]
    pub fn new(base: Catalog) -> Self {
        Self {
            current: base.clone(),
            base,
        }
    }

    /// Create a store holding the built-in seed catalog.
    #[must_use]
    pub fn seeded() -> Self {
        Self::new(seed_catalog())
    }

    /// The unfiltered catalog.
    #[must_use]
    pub fn load(&self) -> Catalog {
        self.base.clone()
    }

    /// Borrow the unfiltered catalog.
    #[must_use]
    pub fn base(&self) -> &Catalog {
        &self.base
    }

    /// Borrow the displayed catalog.
    #[must_use]
    pub fn snapshot(&self) -> &Catalog {
        &self.current
    }

    /// Decide how a submitted query is answered.
    ///
    /// The empty query needs no round-trip: it is the unfiltered catalog.
    #[must_use]
    pub fn search(&self, query: &str) -> SearchPlan {
        if query.is_empty() {
            SearchPlan::Local(self.base.clone())
        } else {
            SearchPlan::Remote(query.to_string())
        }
    }

    /// Replace the unfiltered catalog. The display follows it.
    pub fn replace_base(&mut self, catalog: Catalog) {
        self.current = catalog.clone();
        self.base = catalog;
    }

    /// Replace the unfiltered catalog, leaving the display alone.
    pub fn set_base(&mut self, catalog: Catalog) {
        self.base = catalog;
    }

    /// Replace the displayed catalog only.
    pub fn replace_current(&mut self, catalog: Catalog) {
        self.current = catalog;
    }

    /// Display the unfiltered catalog again.
    pub fn reset_to_base(&mut self) {
        self.current = self.base.clone();
    }

    /// Find a movie in either snapshot, displayed snapshot first.
    #[must_use]
    pub fn get(&self, id: MovieId) -> Option<&Movie> {
        self.current.get(id).or_else(|| self.base.get(id))
    }
}

/// The built-in catalog used when no remote source is configured.
#[must_use]
pub fn seed_catalog() -> Catalog {
    Catalog::from_unique(vec![
        Movie::new(MovieId(1), "The Dark Knight", ReleaseYear::new("2008")),
        Movie::new(MovieId(2), "Joes", ReleaseYear::new("1994")),
        Movie::new(MovieId(3), "バタフライ・エフェクト", ReleaseYear::new("2002")),
        Movie::new(MovieId(4), "白夜行", ReleaseYear::new("2000")),
    ])
}

// =============================================================================
// TESTS
// =============================================================================
