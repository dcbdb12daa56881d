//! Error types for loading a `ccgate.toml` file.

use std::path::PathBuf;

/// Errors raised while reading, parsing or validating gateway configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("cannot read {path}: {source}")]
    Io {
        /// The configuration file path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The content is not valid TOML or does not match the expected tables.
    #[error("invalid ccgate.toml: {reason}")]
    Parse {
        /// The parser's message.
        reason: String,
    },

    /// A required setting is absent or empty.
    #[error("`{field}` must be set")]
    MissingField {
        /// Dotted name of the setting, e.g. `compile.sources`.
        field: String,
    },

    /// A setting is present but unusable.
    #[error("invalid setting: {reason}")]
    Validation {
        /// What is wrong with the value.
        reason: String,
    },
}
