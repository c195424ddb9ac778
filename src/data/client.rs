//! Caching API client for the dashboard backend
//!
//! This module provides the `ApiClient` that fetches JSON payloads through
//! the endpoint resolver (over HTTP in live mode, from disk in static mode)
//! and memoizes successful responses in an in-memory TTL cache. Failures are
//! surfaced to the caller and never cached.

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::cache::ResponseCache;
use crate::data::{ChartKind, DashboardSummary, Health, HealthState};
use crate::endpoint::{DataMode, EndpointResolver, Resolved};

/// Default TTL for cached responses
const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Per-request timeout for live HTTP calls
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors that can occur when fetching dashboard data
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure (connect, TLS, timeout)
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend answered with a non-success status
    #[error("unexpected status {status} from {url}")]
    Status { status: StatusCode, url: String },

    /// The response body was not valid JSON, or did not decode to the
    /// expected shape
    #[error("failed to parse JSON response: {0}")]
    Parse(#[from] serde_json::Error),

    /// A static data file could not be read
    #[error("failed to read {}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ApiError {
    /// Whether the failure is transient
    ///
    /// Transient failures (transport errors, server-side 5xx) mean the
    /// backend is unreachable or unwell and the dashboard should degrade to
    /// last-known or fallback data. Non-transient failures (client errors,
    /// malformed payloads, missing files) indicate a configuration or data
    /// problem worth surfacing as such.
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Request(_) => true,
            ApiError::Status { status, .. } => status.is_server_error(),
            ApiError::Parse(_) => false,
            ApiError::File { .. } => false,
        }
    }
}

/// Client for fetching dashboard data with response caching
///
/// The client is explicitly constructed with a data-source strategy and
/// owns its cache; there is no process-wide shared state. Within the TTL
/// window, repeated fetches of the same resource return the cached payload
/// without touching the network or the filesystem.
#[derive(Debug)]
pub struct ApiClient {
    /// HTTP client for live mode
    http: Client,
    /// Maps logical resource names to URLs or file paths
    resolver: EndpointResolver,
    /// Memoized responses
    cache: ResponseCache,
}

impl ApiClient {
    /// Creates a client with the given data-source strategy and default TTL
    pub fn new(mode: DataMode) -> Self {
        Self {
            http: Client::new(),
            resolver: EndpointResolver::new(mode),
            cache: ResponseCache::new(DEFAULT_TTL),
        }
    }

    /// Replaces the cache TTL; intended for use at construction time
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.cache = ResponseCache::new(ttl);
        self
    }

    /// Returns the endpoint resolver
    pub fn resolver(&self) -> &EndpointResolver {
        &self.resolver
    }

    /// Returns the number of live cache entries
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Evicts all cached responses unconditionally
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Derives the cache key for a resource and its query parameters
    fn cache_key(resource: &str, params: &[(&str, &str)]) -> String {
        if params.is_empty() {
            resource.to_string()
        } else {
            let query = params
                .iter()
                .map(|(key, value)| format!("{key}={value}"))
                .collect::<Vec<_>>()
                .join("&");
            format!("{resource}?{query}")
        }
    }

    /// Fetches a resource, returning the cached payload when fresh
    pub async fn fetch(&self, resource: &str) -> Result<Value, ApiError> {
        self.fetch_with_params(resource, &[]).await
    }

    /// Fetches a resource with query parameters
    ///
    /// The cache key covers both the resource name and the serialized
    /// parameters, so differently-parameterized requests are cached
    /// independently. On failure nothing is cached and the error propagates.
    pub async fn fetch_with_params(
        &self,
        resource: &str,
        params: &[(&str, &str)],
    ) -> Result<Value, ApiError> {
        let key = Self::cache_key(resource, params);
        if let Some(hit) = self.cache.get(&key) {
            return Ok(hit);
        }

        let payload = match self.resolver.resolve(resource) {
            Resolved::Url(url) => self.fetch_url(&url, params).await?,
            Resolved::File(path) => self.read_file(&path).await?,
        };

        self.cache.insert(&key, payload.clone());
        Ok(payload)
    }

    /// Fetches and decodes the dashboard summary
    pub async fn fetch_summary(&self) -> Result<DashboardSummary, ApiError> {
        let value = self.fetch("summary").await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Fetches the raw payload for a chart
    ///
    /// Chart payload validation is the chart adapter's job; the client only
    /// guarantees well-formed JSON.
    pub async fn fetch_chart(&self, kind: ChartKind) -> Result<Value, ApiError> {
        self.fetch(kind.resource()).await
    }

    /// Fetches backend health and classifies the status string
    pub async fn fetch_health(&self) -> Result<Health, ApiError> {
        let value = self.fetch("health").await?;
        let raw: HealthResponse = serde_json::from_value(value)?;
        Ok(Health {
            state: HealthState::from_wire(&raw.status),
            version: raw.version,
            uptime_seconds: raw.uptime_seconds,
        })
    }

    /// Performs the HTTP GET for a live resource
    async fn fetch_url(&self, url: &str, params: &[(&str, &str)]) -> Result<Value, ApiError> {
        let mut request = self.http.get(url).timeout(REQUEST_TIMEOUT);
        if !params.is_empty() {
            request = request.query(params);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status,
                url: url.to_string(),
            });
        }

        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Reads a static JSON file
    async fn read_file(&self, path: &Path) -> Result<Value, ApiError> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ApiError::File {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Raw health endpoint payload
#[derive(Debug, Deserialize)]
struct HealthResponse {
    status: String,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    uptime_seconds: Option<u64>,
}
