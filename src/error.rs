//! Error types
//!
//! Only construction reports typed failures. Emission is fire-and-forget.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to build a logger from configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("read log configuration {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file could not be parsed
    #[error("parse log configuration {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// The file extension does not name a supported format
    #[error("unsupported configuration format for {}: expected .toml, .yaml or .yml", .0.display())]
    UnsupportedFormat(PathBuf),

    /// The encoding is not one of the known encodings
    #[error("encoding must be one of json or console, got {0:?}")]
    UnknownEncoding(String),

    /// The level is neither a known name nor a known numeric code
    #[error("invalid log level {0:?}")]
    InvalidLevel(String),
}
