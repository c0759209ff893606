//! # Engine Primitives
//!
//! Hardcoded runtime constants for the Marquee core.
//!
//! These are compiled into the binary and are immutable at runtime.

/// Magic bytes for the favorites file header.
///
/// - File Header = Magic Bytes ("MRQF") + Version (u8) before payload.
pub const MAGIC_BYTES: &[u8; 4] = b"MRQF";

/// Current favorites file format version.
///
/// Increment this when making breaking changes to the serialization format.
pub const FORMAT_VERSION: u8 = 1;

// =============================================================================
// INPUT VALIDATION LIMITS
// =============================================================================

/// Maximum length, in bytes, of a query submitted to the remote API.
///
/// Typed input is not limited; only submission is.
pub const MAX_QUERY_LENGTH: usize = 256;

/// Maximum number of movies in one catalog snapshot.
///
/// Payloads larger than this are rejected as malformed.
pub const MAX_CATALOG_SIZE: usize = 10_000;

/// Maximum number of favorites accepted when decoding a favorites file.
pub const MAX_FAVORITES: usize = 100_000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magic_bytes_correct() {
        assert_eq!(MAGIC_BYTES, b"MRQF");
    }
}
