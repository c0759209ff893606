//! # Query Module
//!
//! Title prefix filtering over a catalog snapshot.
//!
//! - Whole-title prefix test, case-insensitive on both sides
//! - Order-preserving: the result is a subsequence of the input
//! - Pure: no side effects, same input gives the same output
//!
//! Case folding and whitespace handling are set through [`QueryOptions`].

use crate::{Catalog, Movie};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

// =============================================================================
// OPTIONS
// =============================================================================

/// How titles and queries are case-folded before comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseFolding {
    /// Full Unicode lowercase mapping (`str::to_lowercase`).
    ///
    /// Locale-independent, so the result does not depend on the host.
    #[default]
    Unicode,
    /// ASCII-only lowercase. Non-ASCII bytes are compared as-is.
    Ascii,
}

impl CaseFolding {
    /// Fold `s`. ASCII folding borrows when there is nothing to lower.
    #[must_use]
    pub fn fold(self, s: &str) -> Cow<'_, str> {
        match self {
            Self::Unicode => Cow::Owned(s.to_lowercase()),
            Self::Ascii => {
                if s.bytes().any(|b| b.is_ascii_uppercase()) {
                    Cow::Owned(s.to_ascii_lowercase())
                } else {
                    Cow::Borrowed(s)
                }
            }
        }
    }
}

/// What happens to surrounding whitespace in a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WhitespacePolicy {
    /// Whitespace is significant: `" the"` only matches titles that start
    /// with a space.
    #[default]
    Preserve,
    /// Leading and trailing whitespace is ignored.
    Trim,
}

/// Query configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryOptions {
    /// Case folding applied to both title and query.
    pub folding: CaseFolding,
    /// Whitespace handling for the query.
    pub whitespace: WhitespacePolicy,
}

// =============================================================================
// QUERY ENGINE
// =============================================================================

/// Prefix filter over catalog snapshots.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryEngine {
    options: QueryOptions,
}

impl QueryEngine {
    /// Engine with default options (Unicode folding, whitespace preserved).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine with explicit options.
    #[must_use]
    pub fn with_options(options: QueryOptions) -> Self {
        Self { options }
    }

    /// The active options.
    #[must_use]
    pub fn options(&self) -> QueryOptions {
        self.options
    }

    /// Apply the whitespace policy to a raw query.
    #[must_use]
    pub fn effective_query<'a>(&self, query: &'a str) -> &'a str {
        match self.options.whitespace {
            WhitespacePolicy::Preserve => query,
            WhitespacePolicy::Trim => query.trim(),
        }
    }

    /// Whether `title` starts with `query` under the configured folding.
    #[must_use]
    pub fn matches(&self, title: &str, query: &str) -> bool {
        let query = self.effective_query(query);
        if query.is_empty() {
            return true;
        }
        let folding = self.options.folding;
        folding.fold(title).starts_with(folding.fold(query).as_ref())
    }

    /// Filter `movies` down to the titles that start with `query`.
    ///
    /// An empty query is the identity filter.
    #[must_use]
    pub fn filter(&self, movies: &Catalog, query: &str) -> Catalog {
        let query = self.effective_query(query);
        if query.is_empty() {
            return movies.clone();
        }

        let folding = self.options.folding;
        let needle = folding.fold(query);
        let matching: Vec<Movie> = movies
            .iter()
            .filter(|m| folding.fold(&m.title).starts_with(needle.as_ref()))
            .cloned()
            .collect();

        Catalog::from_unique(matching)
    }
}

/// Filter with default options.
#[must_use]
pub fn filter(movies: &Catalog, query: &str) -> Catalog {
    QueryEngine::new().filter(movies, query)
}

// =============================================================================
// TESTS
// =============================================================================
