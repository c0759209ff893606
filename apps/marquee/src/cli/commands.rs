//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.
//!
//! Every command except `init` starts a runtime over the configured
//! favorites store and movie source, loads the popular list, and then
//! drives the runtime like any other presentation layer would.

use crate::api::{self, FavoritesResponse, ViewResponse};
use crate::config::{BackendKind, Config};
use crate::remote::MovieSource;
use crate::runtime::{Runtime, RuntimeError, RuntimeHandle, RuntimeTask};
use marquee_core::{
    CatalogStore, Command, Controller, FavoriteSet, FavoritesStorage, FileFavorites,
    MarqueeError, Movie, MovieId, View,
};
use std::path::PathBuf;

/// How the movie source is picked, from the global flags.
#[derive(Debug, Clone, Default)]
pub struct SourceOptions {
    pub offline: bool,
    pub catalog: Option<PathBuf>,
}

fn closed(e: RuntimeError) -> MarqueeError {
    MarqueeError::IoError(e.to_string())
}

// =============================================================================
// STARTUP
// =============================================================================

/// Open storage, pick the source, and start the runtime.
pub fn start_runtime(
    config: &Config,
    source: &SourceOptions,
) -> Result<(RuntimeHandle, RuntimeTask, &'static str), MarqueeError> {
    let favorites = config.storage.open()?;
    let api = MovieSource::from_config(config, source.offline, source.catalog.as_deref())?;
    let name = api.name();

    let controller = Controller::new(CatalogStore::seeded(), favorites, config.query);
    let (handle, task) = Runtime::start(controller, api);
    Ok((handle, task, name))
}

/// Start the runtime and wait for the popular list.
async fn start_loaded(
    config: &Config,
    source: &SourceOptions,
) -> Result<(RuntimeHandle, RuntimeTask, View), MarqueeError> {
    let (handle, task, _) = start_runtime(config, source)?;
    handle.dispatch(Command::Refresh).await.map_err(closed)?;
    let view = handle.settled().await.map_err(closed)?;
    Ok((handle, task, view))
}

/// Stop the runtime and wait for its final favorites flush.
async fn shut_down(handle: RuntimeHandle, task: RuntimeTask) {
    drop(handle);
    task.join().await;
}

// =============================================================================
// SERVE COMMAND
// =============================================================================

/// Start the HTTP server.
pub async fn cmd_serve(config: &Config, source: &SourceOptions) -> Result<(), MarqueeError> {
    let (handle, task, source_name) = start_runtime(config, source)?;
    // Initial load runs in the background; the first views show the seed.
    handle.dispatch(Command::Refresh).await.map_err(closed)?;

    println!("Marquee Starting...");
    println!();
    println!("Configuration:");
    println!("  Host:     {}", config.server.host);
    println!("  Port:     {}", config.server.port);
    println!("  Source:   {}", source_name);
    println!("  Backend:  {:?}", config.storage.backend);
    println!("  Database: {:?}", config.storage.path);
    println!();
    println!("Endpoints:");
    println!("  GET  /movies                 - Current view");
    println!("  POST /input                  - Update search text");
    println!("  POST /search                 - Submit a search");
    println!("  POST /refresh                - Reload popular movies");
    println!("  POST /favorites/{{id}}/toggle  - Flip a favorite");
    println!("  GET  /favorites              - Favorites page");
    println!("  POST /notice/dismiss         - Dismiss the notice");
    println!("  GET  /health                 - Health check");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let result = api::run_server(&addr, handle).await;
    task.join().await;
    result
}

// =============================================================================
// LIST COMMAND
// =============================================================================

/// List the catalog, filtered by `query` if given.
pub async fn cmd_list(
    config: &Config,
    source: &SourceOptions,
    json_mode: bool,
    query: Option<String>,
) -> Result<(), MarqueeError> {
    let (handle, task, mut view) = start_loaded(config, source).await?;
    if let Some(query) = query {
        view = handle
            .dispatch(Command::Input(query))
            .await
            .map_err(closed)?;
    }
    shut_down(handle, task).await;
    print_view(&view, json_mode);
    Ok(())
}

// =============================================================================
// SEARCH COMMAND
// =============================================================================

/// Search the movie source.
pub async fn cmd_search(
    config: &Config,
    source: &SourceOptions,
    json_mode: bool,
    query: String,
) -> Result<(), MarqueeError> {
    let (handle, task, _) = start_loaded(config, source).await?;
    handle
        .dispatch(Command::Search(query))
        .await
        .map_err(closed)?;
    let view = handle.settled().await.map_err(closed)?;
    shut_down(handle, task).await;
    print_view(&view, json_mode);
    Ok(())
}

// =============================================================================
// TOGGLE COMMAND
// =============================================================================

/// Flip the favorite state of a movie.
pub async fn cmd_toggle(
    config: &Config,
    source: &SourceOptions,
    json_mode: bool,
    id: u64,
) -> Result<(), MarqueeError> {
    let (handle, task, before) = start_loaded(config, source).await?;
    let id = MovieId(id);
    if !before.movies.contains(id) {
        tracing::warn!(movie_id = id.value(), "movie is not in the current catalog");
    }

    let view = handle
        .dispatch(Command::ToggleFavorite(id))
        .await
        .map_err(closed)?;
    shut_down(handle, task).await;
    let favorite = view.is_favorite(id);

    if json_mode {
        let output = serde_json::json!({
            "id": id.value(),
            "favorite": favorite,
            "favorites": view.favorites.iter().map(MovieId::value).collect::<Vec<_>>(),
            "notice": view.notice,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
    } else {
        if favorite {
            println!("Added {} to favorites", id);
        } else {
            println!("Removed {} from favorites", id);
        }
        print_notice(&view);
    }
    Ok(())
}

// =============================================================================
// FAVORITES COMMAND
// =============================================================================

/// List favorite movies.
pub async fn cmd_favorites(
    config: &Config,
    source: &SourceOptions,
    json_mode: bool,
) -> Result<(), MarqueeError> {
    let (handle, task, _) = start_loaded(config, source).await?;
    let movies = handle.favorite_movies().await.map_err(closed)?;
    shut_down(handle, task).await;

    if json_mode {
        println!(
            "{}",
            serde_json::to_string_pretty(&FavoritesResponse::new(&movies)).unwrap_or_default()
        );
    } else if movies.is_empty() {
        println!("No favorites yet");
    } else {
        println!("Favorites:");
        for movie in &movies {
            println!("  {}", format_movie(movie, true));
        }
    }
    Ok(())
}

// =============================================================================
// INIT COMMAND
// =============================================================================

/// Initialize an empty favorites store.
pub fn cmd_init(config: &Config, force: bool) -> Result<(), MarqueeError> {
    let path = &config.storage.path;

    match config.storage.backend {
        BackendKind::Memory => {
            println!("Memory backend keeps nothing on disk; nothing to initialize");
            return Ok(());
        }
        BackendKind::File | BackendKind::Redb => {
            if path.exists() {
                if !force {
                    return Err(MarqueeError::IoError(
                        "Favorites store already exists. Use --force to overwrite.".to_string(),
                    ));
                }
                std::fs::remove_file(path)
                    .map_err(|e| MarqueeError::IoError(format!("Remove store: {}", e)))?;
            }
        }
    }

    match config.storage.backend {
        BackendKind::File => {
            FileFavorites::new(path).save(&FavoriteSet::new())?;
            println!("Initialized new favorites file at {:?}", path);
        }
        _ => {
            let _store = config.storage.open()?;
            println!("Initialized new redb database at {:?}", path);
        }
    }

    Ok(())
}

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// One line per movie: favorite marker, id, title, year.
fn format_movie(movie: &Movie, favorite: bool) -> String {
    let marker = if favorite { "*" } else { " " };
    if movie.release_year.as_str().is_empty() {
        format!("[{}] {:>8}  {}", marker, movie.id, movie.title)
    } else {
        format!(
            "[{}] {:>8}  {} ({})",
            marker, movie.id, movie.title, movie.release_year
        )
    }
}

fn print_notice(view: &View) {
    if let Some(ref notice) = view.notice {
        println!("{:?}: {}", notice.level, notice.message);
    }
}

/// Print a view as text or JSON.
fn print_view(view: &View, json_mode: bool) {
    if json_mode {
        println!(
            "{}",
            serde_json::to_string_pretty(&ViewResponse::from(view.clone())).unwrap_or_default()
        );
        return;
    }

    if view.movies.is_empty() {
        println!("No movies");
    }
    for movie in view.movies.iter() {
        println!("  {}", format_movie(movie, view.is_favorite(movie.id)));
    }
    print_notice(view);
}
