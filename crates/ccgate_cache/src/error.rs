//! Error types for resolving a compile request.

use std::path::PathBuf;

use ccgate_response::ParseError;
use ccgate_transport::TransportError;

/// Errors that can occur while resolving a compile request.
///
/// Nothing here is caught or retried inside the cache: a failed request
/// fails, and any previous cache entry is left as it was.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// A filesystem operation on the cache directory, a cache file, a
    /// source, or the invoking script failed.
    #[error("cache I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The remote compiler could not be reached or the exchange broke off.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The compiler's reply could not be parsed.
    #[error("failed to parse compiler reply: {0}")]
    Parse(#[from] ParseError),
}

impl CacheError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CacheError::Io {
            path: path.into(),
            source,
        }
    }
}
