//! # Persistence Format
//!
//! Binary serialization for the favorites set.
//!
//! Format: Header (5 bytes) + postcard-serialized id list.
//! - 4 bytes: Magic ("MRQF")
//! - 1 byte: Version
//!
//! The payload is the ascending list of raw movie ids, so identical sets
//! always encode to identical bytes.
//!
//! Size and header are validated before the payload is decoded.

use crate::primitives::{self, MAX_FAVORITES};
use crate::{FavoriteSet, MarqueeError, MovieId};

/// Maximum allowed favorites file size.
///
/// Ten bytes per id is the varint worst case for a `u64`.
pub const MAX_PERSISTENCE_PAYLOAD_SIZE: usize = HEADER_SIZE + 10 * MAX_FAVORITES + 10;

/// Header length in bytes.
const HEADER_SIZE: usize = 5;

// =============================================================================
// FILE HEADER
// =============================================================================

/// The persistence header precedes the favorites payload.
#[derive(Debug, Clone, Copy)]
pub struct PersistenceHeader {
    pub magic: [u8; 4],
    pub version: u8,
}

impl PersistenceHeader {
    /// Create a new header with current format version.
    #[must_use]
    pub fn new() -> Self {
        Self {
            magic: *primitives::MAGIC_BYTES,
            version: primitives::FORMAT_VERSION,
        }
    }

    /// Validate the header.
    pub fn validate(&self) -> Result<(), MarqueeError> {
        if &self.magic != primitives::MAGIC_BYTES {
            return Err(MarqueeError::SerializationError(
                "Invalid magic bytes".to_string(),
            ));
        }
        if self.version != primitives::FORMAT_VERSION {
            return Err(MarqueeError::SerializationError(format!(
                "Unsupported version: {} (expected {})",
                self.version,
                primitives::FORMAT_VERSION
            )));
        }
        Ok(())
    }

    /// Write header to bytes.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[0..4].copy_from_slice(&self.magic);
        bytes[4] = self.version;
        bytes
    }

    /// Read header from bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, MarqueeError> {
        if bytes.len() < HEADER_SIZE {
            return Err(MarqueeError::SerializationError(
                "Header too short".to_string(),
            ));
        }
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&bytes[0..4]);
        Ok(Self {
            magic,
            version: bytes[4],
        })
    }
}

impl Default for PersistenceHeader {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// SERIALIZATION FUNCTIONS
// =============================================================================

/// Serialize a favorites set to bytes (header + payload).
///
/// This is a pure transformation - no file I/O.
pub fn favorites_to_bytes(favorites: &FavoriteSet) -> Result<Vec<u8>, MarqueeError> {
    let header = PersistenceHeader::new();
    let ids: Vec<u64> = favorites.iter().map(MovieId::value).collect();

    let payload = postcard::to_stdvec(&ids)
        .map_err(|e| MarqueeError::SerializationError(e.to_string()))?;

    let mut result = Vec::with_capacity(HEADER_SIZE + payload.len());
    result.extend_from_slice(&header.to_bytes());
    result.extend_from_slice(&payload);

    Ok(result)
}

/// Deserialize a favorites set from bytes.
///
/// This is a pure transformation - no file I/O.
pub fn favorites_from_bytes(bytes: &[u8]) -> Result<FavoriteSet, MarqueeError> {
    if bytes.len() < HEADER_SIZE {
        return Err(MarqueeError::SerializationError(format!(
            "Data too short: minimum {} bytes required",
            HEADER_SIZE
        )));
    }

    if bytes.len() > MAX_PERSISTENCE_PAYLOAD_SIZE {
        return Err(MarqueeError::SerializationError(format!(
            "Data size {} bytes exceeds maximum allowed {} bytes",
            bytes.len(),
            MAX_PERSISTENCE_PAYLOAD_SIZE
        )));
    }

    let header = PersistenceHeader::from_bytes(bytes)?;
    header.validate()?;

    let ids: Vec<u64> = postcard::from_bytes(&bytes[HEADER_SIZE..]).map_err(|e| {
        MarqueeError::SerializationError(format!("Failed to deserialize favorites: {}", e))
    })?;

    if ids.len() > MAX_FAVORITES {
        return Err(MarqueeError::SerializationError(format!(
            "Favorites count {} exceeds maximum {}",
            ids.len(),
            MAX_FAVORITES
        )));
    }

    Ok(ids.into_iter().map(MovieId).collect())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_roundtrip() {
        let header = PersistenceHeader::new();
        let bytes = header.to_bytes();
        let restored = PersistenceHeader::from_bytes(&bytes).expect("parse header");

        assert_eq!(restored.magic, *primitives::MAGIC_BYTES);
        assert_eq!(restored.version, primitives::FORMAT_VERSION);
    }

    #[test]
    fn bytes_roundtrip_bit_exact() {
        let favorites: FavoriteSet = [MovieId(4), MovieId(1), MovieId(u64::MAX)]
            .into_iter()
            .collect();

        let bytes1 = favorites_to_bytes(&favorites).expect("first serialize");
        let restored = favorites_from_bytes(&bytes1).expect("deserialize");
        let bytes2 = favorites_to_bytes(&restored).expect("second serialize");

        assert_eq!(restored, favorites);
        assert_eq!(
            bytes1, bytes2,
            "save -> load -> save must produce identical bytes"
        );
    }

    #[test]
    fn empty_set_encodes() {
        let bytes = favorites_to_bytes(&FavoriteSet::new()).expect("serialize");
        assert!(favorites_from_bytes(&bytes).expect("deserialize").is_empty());
    }

    #[test]
    fn invalid_magic_rejected() {
        let mut bytes = vec![0u8; 10];
        bytes[0..4].copy_from_slice(b"XXXX");

        assert!(favorites_from_bytes(&bytes).is_err());
    }

    #[test]
    fn truncated_payload_rejected() {
        let favorites: FavoriteSet = (1..50).map(MovieId).collect();
        let bytes = favorites_to_bytes(&favorites).expect("serialize");
        assert!(favorites_from_bytes(&bytes[..bytes.len() - 3]).is_err());
    }
}
