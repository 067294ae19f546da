//! Error types for absentia.
//!
//! This module defines all error types used throughout the absentia crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for absentia operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Dataset Errors ===
    /// Failed to read the dataset file.
    #[error("failed to read dataset at {path}: {source}")]
    DatasetRead {
        /// Path to the dataset file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The dataset text could not be parsed as delimited records.
    #[error("failed to parse dataset: {0}")]
    DatasetParse(#[from] csv::Error),

    /// The dataset header is missing a required column.
    #[error("dataset is missing required column '{column}'")]
    MissingColumn {
        /// Name of the missing column.
        column: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Lookup Errors ===
    /// No district matched the given name.
    #[error("no district matching '{name}'")]
    DistrictNotFound {
        /// The name that was looked up.
        name: String,
    },

    // === I/O Errors ===
    /// Terminal or file system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for absentia operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a dataset read error.
    #[must_use]
    pub fn dataset_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::DatasetRead {
            path: path.into(),
            source,
        }
    }

    /// Create a missing column error.
    #[must_use]
    pub fn missing_column(column: impl Into<String>) -> Self {
        Self::MissingColumn {
            column: column.into(),
        }
    }

    /// Create a district lookup error.
    #[must_use]
    pub fn district_not_found(name: impl Into<String>) -> Self {
        Self::DistrictNotFound { name: name.into() }
    }

    /// Check if this error means the dataset never became available.
    ///
    /// Load errors leave the session in a degraded terminal state: the
    /// dashboard keeps running but no data operation can succeed.
    #[must_use]
    pub fn is_load_error(&self) -> bool {
        matches!(
            self,
            Self::DatasetRead { .. } | Self::DatasetParse(_) | Self::MissingColumn { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::missing_column("clean_name");
        assert_eq!(
            err.to_string(),
            "dataset is missing required column 'clean_name'"
        );

        let err = Error::district_not_found("lake");
        assert_eq!(err.to_string(), "no district matching 'lake'");
    }

    #[test]
    fn test_dataset_read_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = Error::dataset_read("data/district_data.csv", io_err);
        let msg = err.to_string();
        assert!(msg.contains("data/district_data.csv"));
        assert!(msg.contains("file not found"));
    }

    #[test]
    fn test_is_load_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert!(Error::dataset_read("x.csv", io_err).is_load_error());
        assert!(Error::missing_column("clean_name").is_load_error());
        assert!(!Error::district_not_found("lake").is_load_error());
    }

    #[test]
    fn test_config_validation_display() {
        let err = Error::ConfigValidation {
            message: "tick_ms must be greater than 0".to_string(),
        };
        assert!(err.to_string().contains("tick_ms"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("access denied"));
        assert!(!err.is_load_error());
    }

    #[test]
    fn test_from_csv_error() {
        // A record with mismatched field count produces a csv error under
        // strict (non-flexible) reading.
        let mut reader = csv::ReaderBuilder::new()
            .flexible(false)
            .from_reader("a,b\n1,2,3\n".as_bytes());
        let result: std::result::Result<Vec<csv::StringRecord>, csv::Error> =
            reader.records().collect();
        if let Err(csv_err) = result {
            let err: Error = csv_err.into();
            assert!(matches!(err, Error::DatasetParse(_)));
            assert!(err.is_load_error());
        }
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }
}
