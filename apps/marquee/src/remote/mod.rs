//! # Remote Movie Sources
//!
//! The asynchronous collaborator that supplies catalogs.
//!
//! - [`HttpMovieApi`]: TMDB-style REST API over reqwest
//! - [`SeedMovieApi`]: offline, built-in seed data or a JSON catalog file
//!
//! [`MovieSource`] picks one at startup.

mod http;
mod seed;
mod types;

pub use http::HttpMovieApi;
pub use seed::SeedMovieApi;
pub use types::{MovieListPayload, MoviePayload};

use crate::config::Config;
use marquee_core::{Catalog, FetchError, MarqueeError};
use std::future::Future;
use std::path::Path;

/// Asynchronous catalog source.
pub trait MovieApi: Send + Sync + 'static {
    /// The unfiltered popular list.
    fn popular_movies(&self) -> impl Future<Output = Result<Catalog, FetchError>> + Send;

    /// Movies matching `query`, as decided by the source.
    fn search_movies(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Catalog, FetchError>> + Send;
}

/// The movie source selected from configuration.
#[derive(Debug, Clone)]
pub enum MovieSource {
    Remote(HttpMovieApi),
    Seed(SeedMovieApi),
}

impl MovieSource {
    /// Remote when an API key is configured and not `offline`, else seed
    /// data (from `catalog` if given).
    pub fn from_config(
        config: &Config,
        offline: bool,
        catalog: Option<&Path>,
    ) -> Result<Self, MarqueeError> {
        if let Some(path) = catalog {
            return Ok(Self::Seed(SeedMovieApi::from_file(path)?));
        }
        if config.has_api_key() && !offline {
            let api = HttpMovieApi::new(&config.api)?;
            tracing::info!(base_url = api.base_url(), "using remote movie API");
            return Ok(Self::Remote(api));
        }
        tracing::info!("using built-in seed catalog");
        Ok(Self::Seed(SeedMovieApi::default()))
    }

    /// Short name for status output.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Remote(_) => "remote",
            Self::Seed(_) => "seed",
        }
    }
}

impl MovieApi for MovieSource {
    async fn popular_movies(&self) -> Result<Catalog, FetchError> {
        match self {
            Self::Remote(api) => api.popular_movies().await,
            Self::Seed(api) => api.popular_movies().await,
        }
    }

    async fn search_movies(&self, query: &str) -> Result<Catalog, FetchError> {
        match self {
            Self::Remote(api) => api.search_movies(query).await,
            Self::Seed(api) => api.search_movies(query).await,
        }
    }
}
