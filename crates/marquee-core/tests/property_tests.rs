//! # Property-Based Tests
//!
//! Invariants of the query engine and the favorites set, checked with
//! proptest over generated catalogs and queries.

use marquee_core::{Catalog, FavoriteSet, Movie, MovieId, QueryEngine, ReleaseYear, query};
use proptest::collection::vec;
use proptest::prelude::*;
use std::collections::BTreeSet;

/// Titles drawn from a small alphabet so that prefixes actually collide.
fn title() -> impl Strategy<Value = String> {
    "[aAbBéÉ ]{0,8}"
}

fn catalog() -> impl Strategy<Value = Catalog> {
    vec(title(), 0..40).prop_map(|titles| {
        let movies = titles
            .into_iter()
            .enumerate()
            .map(|(i, t)| Movie::new(MovieId(i as u64), t, ReleaseYear::unknown()))
            .collect();
        Catalog::new(movies).expect("ids are unique")
    })
}

fn position(catalog: &Catalog, id: MovieId) -> usize {
    catalog
        .iter()
        .position(|m| m.id == id)
        .expect("filtered movie must come from the input")
}

// =============================================================================
// QUERY ENGINE
// =============================================================================

proptest! {
    /// An empty query returns the input unchanged.
    #[test]
    fn empty_query_is_identity(movies in catalog()) {
        prop_assert_eq!(query::filter(&movies, ""), movies);
    }

    /// Every result matches, and every matching input movie is in the result.
    #[test]
    fn filter_is_sound_and_complete(movies in catalog(), q in title()) {
        let engine = QueryEngine::new();
        let result = query::filter(&movies, &q);
        let folded = q.to_lowercase();

        for movie in result.iter() {
            prop_assert!(movie.title.to_lowercase().starts_with(&folded));
        }

        let expected: BTreeSet<MovieId> = movies
            .iter()
            .filter(|m| engine.matches(&m.title, &q))
            .map(|m| m.id)
            .collect();
        let actual: BTreeSet<MovieId> = result.ids().collect();
        prop_assert_eq!(actual, expected);
    }

    /// The result is a subsequence of the input.
    #[test]
    fn filter_preserves_order(movies in catalog(), q in title()) {
        let result = query::filter(&movies, &q);
        let positions: Vec<usize> = result.ids().map(|id| position(&movies, id)).collect();
        prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    /// Filtering twice with the same query changes nothing.
    #[test]
    fn filter_is_idempotent(movies in catalog(), q in title()) {
        let once = query::filter(&movies, &q);
        let twice = query::filter(&once, &q);
        prop_assert_eq!(once, twice);
    }

    /// Case of the query does not matter.
    #[test]
    fn filter_ignores_query_case(movies in catalog(), q in "[ab]{0,3}") {
        let lower = query::filter(&movies, &q);
        let upper = query::filter(&movies, &q.to_uppercase());
        prop_assert_eq!(lower, upper);
    }
}

// =============================================================================
// FAVORITES
// =============================================================================

proptest! {
    /// Toggling the same id twice restores the original set.
    #[test]
    fn toggle_twice_is_identity(initial in vec(0u64..100, 0..20), id in 0u64..100) {
        let original: FavoriteSet = initial.into_iter().map(MovieId).collect();
        let mut favorites = original.clone();

        favorites.toggle(MovieId(id));
        favorites.toggle(MovieId(id));

        prop_assert_eq!(favorites, original);
    }

    /// Any toggle sequence leaves exactly the ids toggled an odd number of times.
    #[test]
    fn toggle_sequence_yields_odd_ids(toggles in vec(0u64..20, 0..60)) {
        let mut favorites = FavoriteSet::new();
        for id in &toggles {
            favorites.toggle(MovieId(*id));
        }

        let listed: Vec<MovieId> = favorites.iter().collect();
        let unique: BTreeSet<MovieId> = listed.iter().copied().collect();
        prop_assert_eq!(listed.len(), unique.len());

        for id in 0u64..20 {
            let count = toggles.iter().filter(|t| **t == id).count();
            prop_assert_eq!(favorites.contains(MovieId(id)), count % 2 == 1);
        }
    }
}
