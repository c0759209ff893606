//! # redb-backed Favorites Storage
//!
//! A disk-backed favorites store using the redb embedded database,
//! providing:
//! - ACID transactions (a save is all-or-nothing)
//! - Crash safety (copy-on-write B-trees)
//! - Zero configuration
//!
//! Each save replaces the stored set in a single write transaction and
//! bumps a revision counter in the metadata table.

use super::FavoritesStorage;
use crate::{FavoriteSet, MarqueeError, MovieId};
use redb::{Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition};
use std::path::Path;

/// Table for favorites: MovieId(u64) -> marker byte
const FAVORITES: TableDefinition<u64, u8> = TableDefinition::new("favorites");

/// Table for metadata: key string -> value u64
const METADATA: TableDefinition<&str, u64> = TableDefinition::new("metadata");

/// Metadata key counting committed saves.
const REVISION_KEY: &str = "revision";

/// Marker stored for every favorite id.
const PRESENT: u8 = 1;

fn io_err(e: impl std::fmt::Display) -> MarqueeError {
    MarqueeError::IoError(e.to_string())
}

/// Favorites persisted in a redb database.
pub struct RedbFavorites {
    db: Database,
}

impl std::fmt::Debug for RedbFavorites {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbFavorites").finish_non_exhaustive()
    }
}

impl RedbFavorites {
    /// Open or create a favorites database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, MarqueeError> {
        let db = Database::create(path.as_ref()).map_err(io_err)?;

        // Initialize tables if they don't exist
        {
            let write_txn = db.begin_write().map_err(io_err)?;
            let _ = write_txn.open_table(FAVORITES).map_err(io_err)?;
            let _ = write_txn.open_table(METADATA).map_err(io_err)?;
            write_txn.commit().map_err(io_err)?;
        }

        Ok(Self { db })
    }

    /// Number of committed saves since the database was created.
    pub fn revision(&self) -> Result<u64, MarqueeError> {
        let read_txn = self.db.begin_read().map_err(io_err)?;
        let table = read_txn.open_table(METADATA).map_err(io_err)?;
        Ok(table
            .get(REVISION_KEY)
            .map_err(io_err)?
            .map(|v| v.value())
            .unwrap_or(0))
    }

    /// Number of stored favorites.
    pub fn len(&self) -> Result<usize, MarqueeError> {
        let read_txn = self.db.begin_read().map_err(io_err)?;
        let table = read_txn.open_table(FAVORITES).map_err(io_err)?;
        let count = table.len().map_err(io_err)?;
        Ok(count as usize)
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> Result<bool, MarqueeError> {
        Ok(self.len()? == 0)
    }

    /// Compact the database file.
    pub fn compact(&mut self) -> Result<(), MarqueeError> {
        self.db.compact().map_err(io_err)?;
        Ok(())
    }
}

impl FavoritesStorage for RedbFavorites {
    fn load(&self) -> Result<FavoriteSet, MarqueeError> {
        let read_txn = self.db.begin_read().map_err(io_err)?;
        let table = read_txn.open_table(FAVORITES).map_err(io_err)?;

        let mut ids = Vec::new();
        for entry in table.iter().map_err(io_err)? {
            let (key, _) = entry.map_err(io_err)?;
            ids.push(MovieId(key.value()));
        }
        Ok(ids.into_iter().collect())
    }

    fn save(&mut self, favorites: &FavoriteSet) -> Result<(), MarqueeError> {
        let write_txn = self.db.begin_write().map_err(io_err)?;
        {
            let mut table = write_txn.open_table(FAVORITES).map_err(io_err)?;

            let mut stale = Vec::new();
            for entry in table.iter().map_err(io_err)? {
                let (key, _) = entry.map_err(io_err)?;
                let id = key.value();
                if !favorites.contains(MovieId(id)) {
                    stale.push(id);
                }
            }
            for id in stale {
                table.remove(id).map_err(io_err)?;
            }
            for id in favorites.iter() {
                table.insert(id.value(), PRESENT).map_err(io_err)?;
            }

            let mut meta = write_txn.open_table(METADATA).map_err(io_err)?;
            let revision = meta
                .get(REVISION_KEY)
                .map_err(io_err)?
                .map(|v| v.value())
                .unwrap_or(0);
            meta.insert(REVISION_KEY, revision.saturating_add(1))
                .map_err(io_err)?;
        }
        write_txn.commit().map_err(io_err)?;

        tracing::debug!(count = favorites.len(), "favorites saved to redb");
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
