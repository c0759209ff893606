//! # Filter Benchmarks
//!
//! Performance benchmarks for marquee-core query operations.
//!
//! Run with: `cargo bench -p marquee-core`

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use marquee_core::{
    CaseFolding, Catalog, FavoriteSet, Movie, MovieId, QueryEngine, QueryOptions, ReleaseYear,
};
use std::hint::black_box;

const TITLES: [&str; 6] = [
    "The Dark Knight",
    "Joes",
    "バタフライ・エフェクト",
    "白夜行",
    "Batman Begins",
    "the Thing",
];

/// Catalog of `size` movies cycling through a few titles.
fn create_catalog(size: usize) -> Catalog {
    let movies = (0..size)
        .map(|i| {
            let title = format!("{} {}", TITLES[i % TITLES.len()], i);
            Movie::new(MovieId(i as u64), title, ReleaseYear::unknown())
        })
        .collect();
    Catalog::new(movies).expect("catalog")
}

// =============================================================================
// BENCHMARKS
// =============================================================================

fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter");

    for size in [100, 1000, 10000].iter() {
        let catalog = create_catalog(*size);
        let unicode = QueryEngine::new();
        let ascii = QueryEngine::with_options(QueryOptions {
            folding: CaseFolding::Ascii,
            ..QueryOptions::default()
        });

        group.bench_with_input(BenchmarkId::new("unicode", size), &catalog, |b, catalog| {
            b.iter(|| black_box(unicode.filter(catalog, black_box("the"))));
        });
        group.bench_with_input(BenchmarkId::new("ascii", size), &catalog, |b, catalog| {
            b.iter(|| black_box(ascii.filter(catalog, black_box("the"))));
        });
        group.bench_with_input(BenchmarkId::new("empty", size), &catalog, |b, catalog| {
            b.iter(|| black_box(unicode.filter(catalog, black_box(""))));
        });
    }

    group.finish();
}

fn bench_toggle(c: &mut Criterion) {
    let mut group = c.benchmark_group("favorites_toggle");

    for size in [100, 1000, 10000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter(|| {
                let mut favorites = FavoriteSet::new();
                for i in 0..size {
                    favorites.toggle(MovieId(i as u64));
                }
                black_box(favorites)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_filter, bench_toggle);
criterion_main!(benches);
