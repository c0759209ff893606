//! Integration tests for the runtime: fetch ordering and failure handling
//! with real concurrency.

#![allow(clippy::unwrap_used, clippy::panic)]

use marquee::{MovieApi, Runtime};
use marquee_core::{
    Catalog, CatalogStore, Command, Controller, ControllerOptions, FavoritesStore, FetchError,
    Movie, MovieId, NoticeLevel, ReleaseYear,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

// =============================================================================
// TEST DOUBLES
// =============================================================================

fn catalog(entries: &[(u64, &str)]) -> Catalog {
    Catalog::new(
        entries
            .iter()
            .map(|(id, t)| Movie::new(MovieId(*id), *t, ReleaseYear::unknown()))
            .collect(),
    )
    .unwrap()
}

fn ids(catalog: &Catalog) -> Vec<u64> {
    catalog.ids().map(MovieId::value).collect()
}

/// Source with canned answers per query. A query with a gate does not
/// answer until the gate is opened.
#[derive(Default)]
struct ScriptedApi {
    popular: Option<Result<Catalog, FetchError>>,
    searches: BTreeMap<String, Result<Catalog, FetchError>>,
    gates: BTreeMap<String, Arc<Notify>>,
    popular_gate: Option<Arc<Notify>>,
    answered: Arc<Notify>,
}

impl ScriptedApi {
    fn search(mut self, query: &str, result: Result<Catalog, FetchError>) -> Self {
        self.searches.insert(query.to_string(), result);
        self
    }

    fn gated(mut self, query: &str) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        self.gates.insert(query.to_string(), Arc::clone(&gate));
        (self, gate)
    }
}

impl MovieApi for ScriptedApi {
    async fn popular_movies(&self) -> Result<Catalog, FetchError> {
        if let Some(gate) = &self.popular_gate {
            gate.notified().await;
        }
        self.popular
            .clone()
            .unwrap_or_else(|| Ok(marquee_core::seed_catalog()))
    }

    async fn search_movies(&self, query: &str) -> Result<Catalog, FetchError> {
        if let Some(gate) = self.gates.get(query) {
            gate.notified().await;
        }
        let result = self
            .searches
            .get(query)
            .cloned()
            .unwrap_or_else(|| Ok(Catalog::empty()));
        self.answered.notify_one();
        result
    }
}

// =============================================================================
// ORDERING
// =============================================================================

/// "b" then "ba"; the "b" answer arrives last and must not be shown.
#[tokio::test]
async fn test_late_response_for_older_search_is_discarded() {
    let api = ScriptedApi::default()
        .search("b", Ok(catalog(&[(21, "Bambi"), (20, "Batman")])))
        .search("ba", Ok(catalog(&[(20, "Batman")])));
    let (api, b_gate) = api.gated("b");
    let answered = Arc::clone(&api.answered);

    let handle = Runtime::spawn(Controller::seeded(), api);

    let view = handle.dispatch(Command::Search("b".into())).await.unwrap();
    assert!(view.loading);
    handle.dispatch(Command::Search("ba".into())).await.unwrap();

    let view = handle.settled().await.unwrap();
    assert_eq!(ids(&view.movies), vec![20]);

    // Release "b" and give the runtime time to see its answer.
    b_gate.notify_one();
    answered.notified().await;
    for _ in 0..10 {
        tokio::time::sleep(Duration::from_millis(10)).await;
        let view = handle.view().await.unwrap();
        assert_eq!(ids(&view.movies), vec![20]);
        assert!(!view.loading);
    }
}

/// A local reset issued after a remote search wins over the search answer.
#[tokio::test]
async fn test_empty_search_supersedes_pending_search() {
    let api = ScriptedApi::default().search("x", Ok(catalog(&[(9, "X-Men")])));
    let (api, gate) = api.gated("x");
    let answered = Arc::clone(&api.answered);

    let handle = Runtime::spawn(Controller::seeded(), api);

    handle.dispatch(Command::Search("x".into())).await.unwrap();
    let view = handle.dispatch(Command::Search(String::new())).await.unwrap();
    assert!(!view.loading);
    assert_eq!(view.movies.len(), 4);

    gate.notify_one();
    answered.notified().await;
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(handle.view().await.unwrap().movies.len(), 4);
}

/// A search answered before the popular list does not cost the base load.
#[tokio::test]
async fn test_popular_arriving_after_search_still_loads_base() {
    let popular_gate = Arc::new(Notify::new());
    let api = ScriptedApi {
        popular: Some(Ok(catalog(&[(100, "Up"), (101, "Heat")]))),
        popular_gate: Some(Arc::clone(&popular_gate)),
        ..ScriptedApi::default()
    };
    let answered = Arc::clone(&api.answered);
    let handle = Runtime::spawn(Controller::seeded(), api);

    handle.dispatch(Command::Refresh).await.unwrap();
    handle.dispatch(Command::Search("x".into())).await.unwrap();
    answered.notified().await;

    popular_gate.notify_one();
    let view = handle.settled().await.unwrap();
    assert!(view.movies.is_empty());

    let view = handle.dispatch(Command::Search(String::new())).await.unwrap();
    assert_eq!(ids(&view.movies), vec![100, 101]);
}

/// Commands are handled while a fetch is outstanding.
#[tokio::test]
async fn test_commands_not_blocked_by_pending_fetch() {
    let (api, gate) = ScriptedApi::default().gated("slow");
    let handle = Runtime::spawn(Controller::seeded(), api);

    handle.dispatch(Command::Search("slow".into())).await.unwrap();
    let view = handle
        .dispatch(Command::ToggleFavorite(MovieId(2)))
        .await
        .unwrap();
    assert!(view.loading);
    assert!(view.is_favorite(MovieId(2)));

    gate.notify_one();
    let view = handle.settled().await.unwrap();
    assert!(!view.loading);
    assert!(view.movies.is_empty());
}

// =============================================================================
// FAILURES
// =============================================================================

/// A failed search keeps the last loaded catalog and raises a notice.
#[tokio::test]
async fn test_failed_search_keeps_catalog() {
    let api = ScriptedApi::default().search(
        "bat",
        Err(FetchError::Network("connection refused".into())),
    );
    let handle = Runtime::spawn(Controller::seeded(), api);

    handle.dispatch(Command::Refresh).await.unwrap();
    let before = handle.settled().await.unwrap();

    handle.dispatch(Command::Search("bat".into())).await.unwrap();
    let after = handle.settled().await.unwrap();

    assert_eq!(after.movies, before.movies);
    let notice = after.notice.expect("notice");
    assert_eq!(notice.level, NoticeLevel::Error);
    assert!(notice.message.contains("bat"));

    let view = handle.dispatch(Command::DismissNotice).await.unwrap();
    assert!(view.notice.is_none());
}

/// A failed refresh leaves the seed catalog on display.
#[tokio::test]
async fn test_failed_refresh_keeps_seed() {
    let api = ScriptedApi {
        popular: Some(Err(FetchError::Unauthorized)),
        ..ScriptedApi::default()
    };
    let handle = Runtime::spawn(Controller::seeded(), api);

    handle.dispatch(Command::Refresh).await.unwrap();
    let view = handle.settled().await.unwrap();

    assert_eq!(view.movies.len(), 4);
    assert!(view.notice.is_some());
}

// =============================================================================
// FAVORITES
// =============================================================================

#[tokio::test]
async fn test_favorite_movies_through_handle() {
    let handle = Runtime::spawn(Controller::seeded(), ScriptedApi::default());

    assert!(handle.favorite_movies().await.unwrap().is_empty());

    handle
        .dispatch(Command::ToggleFavorite(MovieId(4)))
        .await
        .unwrap();
    let movies = handle.favorite_movies().await.unwrap();
    assert_eq!(movies.len(), 1);
    assert_eq!(movies[0].title, "白夜行");
}

#[tokio::test]
async fn test_unsaved_favorites_flushed_before_join_returns() {
    let dir = tempfile::tempdir().unwrap();
    let parent = dir.path().join("missing");
    let path = parent.join("favorites.bin");
    let favorites = FavoritesStore::with_file(&path).unwrap();
    let controller = Controller::new(
        CatalogStore::seeded(),
        favorites,
        ControllerOptions::default(),
    );
    let (handle, task) = Runtime::start(controller, ScriptedApi::default());

    let view = handle
        .dispatch(Command::ToggleFavorite(MovieId(2)))
        .await
        .unwrap();
    assert_eq!(view.notice.map(|n| n.level), Some(NoticeLevel::Warning));

    std::fs::create_dir_all(&parent).unwrap();
    drop(handle);
    task.join().await;

    let reopened = FavoritesStore::with_file(&path).unwrap();
    assert!(reopened.is_favorite(MovieId(2)));
}
