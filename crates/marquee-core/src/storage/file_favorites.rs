//! # File-backed Favorites
//!
//! Stores the favorites set in a single file using the persistence format
//! from [`crate::formats`]. Saves write a sibling temp file and rename it
//! over the target, so a crash leaves either the old or the new set.

use super::FavoritesStorage;
use crate::formats::{favorites_from_bytes, favorites_to_bytes};
use crate::{FavoriteSet, MarqueeError};
use std::path::{Path, PathBuf};

/// Favorites persisted to a single file.
#[derive(Debug, Clone)]
pub struct FileFavorites {
    path: PathBuf,
}

impl FileFavorites {
    /// Use the file at `path`. Nothing is read or created until the first
    /// `load` or `save`.
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// The backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl FavoritesStorage for FileFavorites {
    fn load(&self) -> Result<FavoriteSet, MarqueeError> {
        if !self.path.exists() {
            return Ok(FavoriteSet::new());
        }
        let data = std::fs::read(&self.path)
            .map_err(|e| MarqueeError::IoError(format!("Read favorites: {}", e)))?;
        favorites_from_bytes(&data)
    }

    fn save(&mut self, favorites: &FavoriteSet) -> Result<(), MarqueeError> {
        let data = favorites_to_bytes(favorites)?;
        let temp = self.temp_path();
        std::fs::write(&temp, &data)
            .map_err(|e| MarqueeError::IoError(format!("Write favorites: {}", e)))?;
        std::fs::rename(&temp, &self.path)
            .map_err(|e| MarqueeError::IoError(format!("Replace favorites: {}", e)))?;
        Ok(())
    }
}
