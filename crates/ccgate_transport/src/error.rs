//! Error types for talking to the remote compiler.

use std::path::PathBuf;

/// Errors raised while building or sending a compile request.
///
/// None of these are retried; they propagate straight to the caller.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The TCP connection to the compiler host could not be opened.
    #[error("failed to connect to {addr}: {source}")]
    Connect {
        /// The `host:port` that was dialed.
        addr: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Writing the request or reading the response failed mid-stream.
    #[error("I/O error talking to {addr}: {source}")]
    Io {
        /// The `host:port` of the connection.
        addr: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A local source could not be read for inlining into `js_code`.
    #[error("failed to read source {path}: {source}")]
    SourceRead {
        /// The source file path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}
