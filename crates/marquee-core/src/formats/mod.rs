//! # Formats Module
//!
//! On-disk encodings. File I/O lives with the storage backends.

mod persistence;

pub use persistence::*;
