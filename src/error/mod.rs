//! Error handling for the opioid risk analytics crate.
//!
//! The clinical core never fails: malformed doses, unknown drugs and missing
//! aggregate records all resolve to documented defaults. Errors only surface
//! at the edges, when loading the scoring policy, reading input bundles or
//! writing analytics output.

use std::io;
use std::path::{Path, PathBuf};

/// Specialized error type for the opioid risk crate
#[derive(Debug, thiserror::Error)]
pub enum OpioidRiskError {
    /// Error opening, reading or writing a file
    #[error("IO error{}: {source}", path_suffix(.path.as_deref()))]
    Io {
        /// Underlying IO error
        #[source]
        source: io::Error,
        /// Path involved in the failing operation, if known
        path: Option<PathBuf>,
    },

    /// Error decoding or encoding JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error building Arrow arrays
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Error writing Parquet data
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// Error converting rows into Arrow record batches
    #[error("Row conversion error: {0}")]
    SerdeArrow(#[from] serde_arrow::Error),

    /// The scoring policy is inconsistent
    #[error("Configuration error: {0}")]
    Config(String),

    /// An input bundle is malformed
    #[error("Validation error: {0}")]
    Validation(String),
}

fn path_suffix(path: Option<&Path>) -> String {
    path.map_or_else(String::new, |p| format!(" ({})", p.display()))
}

impl OpioidRiskError {
    /// Create an IO error tied to a specific path
    pub fn io_at(source: io::Error, path: &Path) -> Self {
        Self::Io {
            source,
            path: Some(path.to_path_buf()),
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

impl From<io::Error> for OpioidRiskError {
    fn from(source: io::Error) -> Self {
        Self::Io { source, path: None }
    }
}

/// Result type for opioid risk operations
pub type Result<T> = std::result::Result<T, OpioidRiskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_mentions_path() {
        let err = OpioidRiskError::io_at(
            io::Error::new(io::ErrorKind::NotFound, "missing"),
            Path::new("/tmp/patients.json"),
        );
        let msg = err.to_string();
        assert!(msg.contains("/tmp/patients.json"));
        assert!(msg.contains("missing"));
    }

    #[test]
    fn test_config_error_display() {
        let err = OpioidRiskError::config("bad table");
        assert_eq!(err.to_string(), "Configuration error: bad table");
    }
}
