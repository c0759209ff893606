//! # Marquee HTTP API Module
//!
//! JSON API for a presentation layer, served with axum.
//!
//! ## Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /movies` - Current view (filtered catalog, favorites, notice)
//! - `POST /input` - Update the search box text
//! - `POST /search` - Submit a search
//! - `POST /refresh` - Reload the popular list
//! - `POST /favorites/{id}/toggle` - Flip a favorite
//! - `GET /favorites` - Favorites page
//! - `POST /notice/dismiss` - Dismiss the notice
//!
//! ## Configuration (Environment Variables)
//!
//! - `MARQUEE_CORS_ORIGINS`: Comma-separated list of allowed origins, or "*" for all (default: localhost only)

mod handlers;
mod types;

// Re-export handlers and types for integration tests (via `marquee::api::*`)
pub use handlers::{
    dismiss_notice_handler, favorites_handler, health_handler, input_handler, movies_handler,
    refresh_handler, search_handler, toggle_favorite_handler,
};
pub use types::{
    ErrorResponse, FavoritesResponse, HealthResponse, MovieJson, QueryRequest, ViewResponse,
};

use crate::runtime::RuntimeHandle;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header},
    routing::{get, post},
};
use marquee_core::MarqueeError;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Maximum request body size. Bodies are at most a search query.
const MAX_BODY_SIZE: usize = 64 * 1024;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state: a handle to the runtime owning all client state.
#[derive(Clone)]
pub struct AppState {
    pub runtime: RuntimeHandle,
}

impl AppState {
    #[must_use]
    pub fn new(runtime: RuntimeHandle) -> Self {
        Self { runtime }
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// Build CORS layer from environment configuration.
///
/// Reads `MARQUEE_CORS_ORIGINS`:
/// - If "*": allows all origins
/// - If not set: localhost only
/// - Otherwise: comma-separated list of allowed origins
fn build_cors_layer() -> CorsLayer {
    let origins_env = std::env::var("MARQUEE_CORS_ORIGINS").ok();

    match origins_env.as_deref() {
        Some("*") => {
            tracing::warn!("CORS: Allowing ALL origins (MARQUEE_CORS_ORIGINS=*)");
            CorsLayer::permissive()
        }
        Some(origins) => {
            let allowed_origins: Vec<HeaderValue> = origins
                .split(',')
                .filter_map(|s| {
                    let trimmed = s.trim();
                    match trimmed.parse::<HeaderValue>() {
                        Ok(hv) => {
                            tracing::info!("CORS: Allowing origin: {}", trimmed);
                            Some(hv)
                        }
                        Err(e) => {
                            tracing::warn!("CORS: Invalid origin '{}': {}", trimmed, e);
                            None
                        }
                    }
                })
                .collect();

            if allowed_origins.is_empty() {
                tracing::warn!(
                    "CORS: No valid origins in MARQUEE_CORS_ORIGINS, defaulting to localhost only"
                );
                build_localhost_cors()
            } else {
                CorsLayer::new()
                    .allow_origin(allowed_origins)
                    .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                    .allow_headers([header::CONTENT_TYPE])
            }
        }
        None => build_localhost_cors(),
    }
}

/// CORS layer allowing the usual local dev-server origins.
fn build_localhost_cors() -> CorsLayer {
    let origins: Vec<HeaderValue> = [
        "http://localhost:3000",
        "http://localhost:5173",
        "http://localhost:8080",
        "http://127.0.0.1:3000",
        "http://127.0.0.1:5173",
        "http://127.0.0.1:8080",
    ]
    .into_iter()
    .filter_map(|o| o.parse::<HeaderValue>().ok())
    .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner): tracing, CORS, body limit.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/movies", get(handlers::movies_handler))
        .route("/input", post(handlers::input_handler))
        .route("/search", post(handlers::search_handler))
        .route("/refresh", post(handlers::refresh_handler))
        .route("/favorites", get(handlers::favorites_handler))
        .route(
            "/favorites/{id}/toggle",
            post(handlers::toggle_favorite_handler),
        )
        .route("/notice/dismiss", post(handlers::dismiss_notice_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors_layer())
                .layer(DefaultBodyLimit::max(MAX_BODY_SIZE)),
        )
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Start the HTTP server and run until Ctrl+C.
pub async fn run_server(addr: &str, runtime: RuntimeHandle) -> Result<(), MarqueeError> {
    let router = create_router(AppState::new(runtime));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| MarqueeError::IoError(format!("Bind failed: {}", e)))?;

    tracing::info!("Marquee HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| MarqueeError::IoError(format!("Server error: {}", e)))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Cannot listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
