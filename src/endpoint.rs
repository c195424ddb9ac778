//! Endpoint resolution for logical resource names
//!
//! A logical resource name ("summary", "chart/bar", ...) is independent of
//! where the data actually lives. The resolver maps names to concrete
//! locations according to a data-source strategy chosen at construction
//! time: a live HTTP backend, or a directory of static JSON files.
//! Resolution is a pure lookup and always succeeds syntactically; whether
//! the resolved location exists is the fetch layer's problem.

use std::path::PathBuf;

/// Where dashboard data comes from
///
/// The strategy is fixed when the resolver is constructed; there is no
/// runtime switching between live and static sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataMode {
    /// Fetch from a live backend over HTTP
    Live {
        /// Base URL of the backend, e.g. `http://127.0.0.1:8080`
        base_url: String,
    },
    /// Read from a directory of static JSON files
    Static {
        /// Directory containing `<name>.json` files
        data_dir: PathBuf,
    },
}

/// A resolved location for a logical resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    /// An HTTP URL to GET
    Url(String),
    /// A JSON file to read
    File(PathBuf),
}

/// Fixed table of logical resource names to live API paths
///
/// Names not in the table fall back to the `/api/<name>` convention.
const LIVE_ROUTES: &[(&str, &str)] = &[
    ("summary", "/api/summary"),
    ("health", "/api/health"),
    ("chart/bar", "/api/chart/bar"),
    ("chart/line", "/api/chart/line"),
    ("chart/pie", "/api/chart/pie"),
    ("chart/scatter3d", "/api/chart/scatter3d"),
    ("chart/surface", "/api/chart/surface"),
];

/// Path of the live update WebSocket endpoint, relative to the backend host
const LIVE_SOCKET_PATH: &str = "/ws/live";

/// Maps logical resource names to concrete URLs or file paths
#[derive(Debug, Clone)]
pub struct EndpointResolver {
    mode: DataMode,
}

impl EndpointResolver {
    /// Creates a resolver with the given data-source strategy
    pub fn new(mode: DataMode) -> Self {
        Self { mode }
    }

    /// Returns the configured data-source strategy
    pub fn mode(&self) -> &DataMode {
        &self.mode
    }

    /// Returns true when resolving against a live backend
    pub fn is_live(&self) -> bool {
        matches!(self.mode, DataMode::Live { .. })
    }

    /// Resolves a logical resource name to a concrete location
    ///
    /// Live mode: known names resolve through the fixed route table,
    /// unknown names through the `/api/<name>` convention. Static mode:
    /// `<data_dir>/<name>.json` with `/` in the name flattened to `_`.
    pub fn resolve(&self, resource: &str) -> Resolved {
        match &self.mode {
            DataMode::Live { base_url } => {
                let path = LIVE_ROUTES
                    .iter()
                    .find(|(name, _)| *name == resource)
                    .map(|(_, path)| (*path).to_string())
                    .unwrap_or_else(|| format!("/api/{resource}"));
                Resolved::Url(format!("{}{}", base_url.trim_end_matches('/'), path))
            }
            DataMode::Static { data_dir } => {
                Resolved::File(data_dir.join(format!("{}.json", resource.replace('/', "_"))))
            }
        }
    }

    /// Returns the WebSocket URL for the live update channel, if the
    /// strategy has one
    ///
    /// Static mode has no live channel. The socket scheme mirrors the HTTP
    /// scheme of the base URL (`https` becomes `wss`).
    pub fn live_socket(&self) -> Option<String> {
        match &self.mode {
            DataMode::Live { base_url } => {
                let base = base_url.trim_end_matches('/');
                let socket_base = if let Some(rest) = base.strip_prefix("https://") {
                    format!("wss://{rest}")
                } else if let Some(rest) = base.strip_prefix("http://") {
                    format!("ws://{rest}")
                } else {
                    format!("ws://{base}")
                };
                Some(format!("{socket_base}{LIVE_SOCKET_PATH}"))
            }
            DataMode::Static { .. } => None,
        }
    }
}
