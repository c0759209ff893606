//! # marquee-core
//!
//! The deterministic state engine for Marquee, a movie catalog viewer.
//!
//! This crate owns everything a catalog viewer has to get right regardless
//! of how it is presented:
//! - Catalog snapshots and the base/current distinction (`catalog`)
//! - Title prefix filtering (`query`)
//! - The favorites set and its persistence (`favorites`, `storage`, `formats`)
//! - Command handling with last-request-wins fetch sequencing (`controller`)
//!
//! ## Architectural Constraints
//!
//! - Has NO async, NO network dependencies (pure Rust)
//! - Never performs a remote call; it emits a `FetchRequest` and waits for
//!   the caller to report the outcome
//! - All mutable state has a single owner, the `Controller`

// =============================================================================
// MODULES
// =============================================================================

pub mod catalog;
pub mod controller;
pub mod favorites;
pub mod formats;
pub mod primitives;
pub mod query;
pub mod storage;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{Catalog, FavoriteSet, FetchError, MarqueeError, Movie, MovieId, ReleaseYear};

// =============================================================================
// RE-EXPORTS: State Engine
// =============================================================================

pub use catalog::{CatalogStore, SearchPlan, seed_catalog};
pub use controller::{
    Command, Completion, Controller, ControllerOptions, FetchKind, FetchRequest, Notice,
    NoticeLevel, Ticket, View,
};
pub use favorites::{FavoriteState, FavoritesStore, StorageBackend};
pub use query::{CaseFolding, QueryEngine, QueryOptions, WhitespacePolicy};
pub use storage::{FavoritesStorage, FileFavorites, MemoryFavorites, RedbFavorites};

// =============================================================================
// RE-EXPORTS: Formats (from formats module)
// =============================================================================

pub use formats::{PersistenceHeader, favorites_from_bytes, favorites_to_bytes};
