//! Error types for quakeboard.

/// Errors raised while fetching the earthquake feed.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Transport-level failure (DNS, connect, timeout, body read).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The feed answered with a non-success status.
    #[error("Feed returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    /// The body was not a GeoJSON feature collection.
    #[error("Malformed feed response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Errors raised while persisting the history file.
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize history: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),
}
