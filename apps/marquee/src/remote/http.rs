//! # HTTP Movie API Client
//!
//! reqwest wrapper around a TMDB-style REST API:
//! - `GET {base}/movie/popular`
//! - `GET {base}/search/movie?query=..`
//!
//! The API key, when configured, is sent as the `api_key` query parameter.

use super::MovieApi;
use super::types::MovieListPayload;
use crate::config::ApiConfig;
use marquee_core::{Catalog, FetchError, MarqueeError};

/// Client for the remote movie API.
#[derive(Clone)]
pub struct HttpMovieApi {
    http: reqwest::Client,
    base_url: String,
    image_base_url: String,
    api_key: Option<String>,
}

impl std::fmt::Debug for HttpMovieApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpMovieApi")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish_non_exhaustive()
    }
}

impl HttpMovieApi {
    /// Create a client from the API configuration.
    pub fn new(config: &ApiConfig) -> Result<Self, MarqueeError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| MarqueeError::Config(format!("HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            image_base_url: config.image_base_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// The API root this client talks to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a GET request with the optional API key.
    fn request(&self, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self.http.get(&url);
        if let Some(ref key) = self.api_key {
            req = req.query(&[("api_key", key.as_str())]);
        }
        req
    }

    /// Send a request and map transport failures.
    async fn send(&self, req: reqwest::RequestBuilder) -> Result<reqwest::Response, FetchError> {
        req.send()
            .await
            .map_err(|e| FetchError::Network(format!("{}: {e}", self.base_url)))
    }

    /// Check the status code and decode the movie list.
    async fn handle_response(&self, resp: reqwest::Response) -> Result<Catalog, FetchError> {
        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(FetchError::Unauthorized);
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(FetchError::RateLimited);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(FetchError::Status(status.as_u16(), body));
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| FetchError::Network(format!("Read body: {e}")))?;
        let payload: MovieListPayload =
            serde_json::from_slice(&bytes).map_err(|e| FetchError::Parse(e.to_string()))?;
        payload.into_catalog(&self.image_base_url)
    }
}

impl MovieApi for HttpMovieApi {
    async fn popular_movies(&self) -> Result<Catalog, FetchError> {
        let req = self.request("/movie/popular");
        let resp = self.send(req).await?;
        self.handle_response(resp).await
    }

    async fn search_movies(&self, query: &str) -> Result<Catalog, FetchError> {
        let req = self.request("/search/movie").query(&[("query", query)]);
        let resp = self.send(req).await?;
        self.handle_response(resp).await
    }
}
