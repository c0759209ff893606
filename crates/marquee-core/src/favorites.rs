//! # Favorites Module
//!
//! The user's favorite movies, tracked by id.
//!
//! Each movie is either `NotFavorited` or `Favorited`; `toggle` moves it to
//! the other state. Every mutation is written through to the storage
//! backend. A failed write keeps the in-memory change, is logged, and marks
//! the store dirty until a later save succeeds.
//!
//! ## Storage Backends
//!
//! - `InMemory`: volatile
//! - `File`: single file in the persistence format
//! - `Persistent`: redb database

use crate::storage::{FavoritesStorage, FileFavorites, MemoryFavorites, RedbFavorites};
use crate::{FavoriteSet, MarqueeError, MovieId};
use std::path::Path;

/// Storage backend for a `FavoritesStore`.
#[derive(Debug)]
pub enum StorageBackend {
    /// Volatile, lost at exit.
    InMemory(MemoryFavorites),
    /// Single file.
    File(FileFavorites),
    /// Disk-backed database using redb (ACID).
    Persistent(RedbFavorites),
}

impl Default for StorageBackend {
    fn default() -> Self {
        Self::InMemory(MemoryFavorites::new())
    }
}

impl StorageBackend {
    /// Short backend name for status output.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::InMemory(_) => "memory",
            Self::File(_) => "file",
            Self::Persistent(_) => "redb",
        }
    }
}

impl FavoritesStorage for StorageBackend {
    fn load(&self) -> Result<FavoriteSet, MarqueeError> {
        match self {
            Self::InMemory(s) => s.load(),
            Self::File(s) => s.load(),
            Self::Persistent(s) => s.load(),
        }
    }

    fn save(&mut self, favorites: &FavoriteSet) -> Result<(), MarqueeError> {
        match self {
            Self::InMemory(s) => s.save(favorites),
            Self::File(s) => s.save(favorites),
            Self::Persistent(s) => s.save(favorites),
        }
    }
}

/// Per-movie favorite state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteState {
    NotFavorited,
    Favorited,
}

/// The favorites set plus its storage backend.
#[derive(Debug, Default)]
pub struct FavoritesStore {
    favorites: FavoriteSet,
    backend: StorageBackend,
    dirty: bool,
}

impl FavoritesStore {
    /// Create an empty, volatile store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a store over `backend`, loading whatever it holds.
    pub fn open(backend: StorageBackend) -> Result<Self, MarqueeError> {
        let favorites = backend.load()?;
        tracing::debug!(
            backend = backend.name(),
            count = favorites.len(),
            "favorites loaded"
        );
        Ok(Self {
            favorites,
            backend,
            dirty: false,
        })
    }

    /// Open a store persisted to a single file.
    pub fn with_file(path: impl AsRef<Path>) -> Result<Self, MarqueeError> {
        Self::open(StorageBackend::File(FileFavorites::new(path)))
    }

    /// Open a store persisted to a redb database.
    pub fn with_redb(path: impl AsRef<Path>) -> Result<Self, MarqueeError> {
        Self::open(StorageBackend::Persistent(RedbFavorites::open(path)?))
    }

    /// Flip the favorite state of `id` and return the updated set.
    pub fn toggle(&mut self, id: MovieId) -> FavoriteSet {
        let now_favorite = self.favorites.toggle(id);
        tracing::debug!(movie_id = id.value(), now_favorite, "favorite toggled");
        self.persist();
        self.favorites.clone()
    }

    /// Current favorites.
    #[must_use]
    pub fn list(&self) -> FavoriteSet {
        self.favorites.clone()
    }

    /// Borrow the current favorites.
    #[must_use]
    pub fn favorites(&self) -> &FavoriteSet {
        &self.favorites
    }

    /// Whether `id` is a favorite.
    #[must_use]
    pub fn is_favorite(&self, id: MovieId) -> bool {
        self.favorites.contains(id)
    }

    /// State of `id`.
    #[must_use]
    pub fn state(&self, id: MovieId) -> FavoriteState {
        if self.is_favorite(id) {
            FavoriteState::Favorited
        } else {
            FavoriteState::NotFavorited
        }
    }

    /// Whether the last save failed and the backend is behind.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Retry saving the current set.
    pub fn flush(&mut self) -> Result<(), MarqueeError> {
        self.backend.save(&self.favorites)?;
        self.dirty = false;
        Ok(())
    }

    /// The storage backend.
    #[must_use]
    pub fn backend(&self) -> &StorageBackend {
        &self.backend
    }

    fn persist(&mut self) {
        match self.backend.save(&self.favorites) {
            Ok(()) => self.dirty = false,
            Err(e) => {
                tracing::warn!(
                    backend = self.backend.name(),
                    error = %e,
                    "failed to save favorites; keeping in-memory state"
                );
                self.dirty = true;
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
