//! # marquee
//!
//! The async shell around `marquee-core`: configuration, movie sources,
//! the runtime task that owns the controller, the HTTP API, and the CLI.

pub mod api;
pub mod cli;
pub mod config;
pub mod remote;
pub mod runtime;

pub use config::{BackendKind, Config};
pub use remote::{HttpMovieApi, MovieApi, MovieSource, SeedMovieApi};
pub use runtime::{Runtime, RuntimeError, RuntimeHandle, RuntimeTask};
