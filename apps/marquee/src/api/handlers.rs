//! # API Endpoint Handlers
//!
//! Every handler forwards to the runtime and renders its answer. A stopped
//! runtime is reported as 503.

use super::{
    AppState,
    types::{ErrorResponse, FavoritesResponse, HealthResponse, QueryRequest, ViewResponse},
};
use crate::runtime::RuntimeError;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use marquee_core::{Command, MovieId, View};

/// Render a runtime answer.
fn view_reply(result: Result<View, RuntimeError>) -> Response {
    match result {
        Ok(view) => (StatusCode::OK, Json(ViewResponse::from(view))).into_response(),
        Err(e) => unavailable(e),
    }
}

fn unavailable(e: RuntimeError) -> Response {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(ErrorResponse::new(e.to_string())),
    )
        .into_response()
}

fn bad_request(request: &QueryRequest) -> Option<Response> {
    request.validate().err().map(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(e.to_string())),
        )
            .into_response()
    })
}

// =============================================================================
// HEALTH HANDLER
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

// =============================================================================
// CATALOG HANDLERS
// =============================================================================

/// Current view.
pub async fn movies_handler(State(state): State<AppState>) -> Response {
    view_reply(state.runtime.view().await)
}

/// Update the search box text.
pub async fn input_handler(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Response {
    if let Some(rejected) = bad_request(&request) {
        return rejected;
    }
    view_reply(state.runtime.dispatch(Command::Input(request.query)).await)
}

/// Submit a search.
///
/// Responds immediately; a remote search shows up as `loading: true`.
pub async fn search_handler(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Response {
    if let Some(rejected) = bad_request(&request) {
        return rejected;
    }
    view_reply(state.runtime.dispatch(Command::Search(request.query)).await)
}

/// Reload the popular list.
pub async fn refresh_handler(State(state): State<AppState>) -> Response {
    view_reply(state.runtime.dispatch(Command::Refresh).await)
}

/// Dismiss the pending notice.
pub async fn dismiss_notice_handler(State(state): State<AppState>) -> Response {
    view_reply(state.runtime.dispatch(Command::DismissNotice).await)
}

// =============================================================================
// FAVORITES HANDLERS
// =============================================================================

/// Flip the favorite state of a movie.
pub async fn toggle_favorite_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Response {
    view_reply(
        state
            .runtime
            .dispatch(Command::ToggleFavorite(MovieId(id)))
            .await,
    )
}

/// Favorites page.
pub async fn favorites_handler(State(state): State<AppState>) -> Response {
    match state.runtime.favorite_movies().await {
        Ok(movies) => (StatusCode::OK, Json(FavoritesResponse::new(&movies))).into_response(),
        Err(e) => unavailable(e),
    }
}
