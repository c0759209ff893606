//! # Storage Module
//!
//! Persistence collaborators for the favorites set.
//!
//! - `MemoryFavorites`: volatile, for tests and `--backend memory`
//! - `FileFavorites`: single file, header + postcard payload
//! - `RedbFavorites`: redb embedded database (ACID)

mod file_favorites;
mod redb_favorites;

pub use file_favorites::FileFavorites;
pub use redb_favorites::RedbFavorites;

use crate::{FavoriteSet, MarqueeError};

/// The persistence collaborator contract for favorites.
///
/// `save` followed by `load` must return the full id set.
pub trait FavoritesStorage {
    /// Load the persisted set. A backend with nothing stored yet returns
    /// an empty set.
    fn load(&self) -> Result<FavoriteSet, MarqueeError>;

    /// Replace the persisted set with `favorites`.
    fn save(&mut self, favorites: &FavoriteSet) -> Result<(), MarqueeError>;
}

/// Volatile storage. Holds the last saved set in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryFavorites {
    saved: FavoriteSet,
}

impl MemoryFavorites {
    /// Create empty volatile storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl FavoritesStorage for MemoryFavorites {
    fn load(&self) -> Result<FavoriteSet, MarqueeError> {
        Ok(self.saved.clone())
    }

    fn save(&mut self, favorites: &FavoriteSet) -> Result<(), MarqueeError> {
        self.saved = favorites.clone();
        Ok(())
    }
}
