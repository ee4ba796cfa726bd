//! Error types for hotprospects.
//!
//! Every failure the store, storage backends, scanner and notification
//! centre can report is expressed here. The presentation layer is free to
//! log and discard these; the library always hands them back.

use std::path::PathBuf;
use thiserror::Error;

use crate::prospect::ProspectId;
use crate::scan::ScanError;

/// The main error type for hotprospects operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the key-value database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// The database layout is not one this build can use.
    #[error("unsupported database schema: {message}")]
    DatabaseSchema {
        /// Description of what went wrong.
        message: String,
    },

    /// Saved prospects could not be decoded.
    #[error("corrupt prospect data at {location}: {source}")]
    CorruptData {
        /// Where the data was read from.
        location: String,
        /// The underlying decode error.
        #[source]
        source: serde_json::Error,
    },

    /// A storage write was rejected by the backend.
    #[error("failed to write prospects to {location}: {message}")]
    StorageWrite {
        /// Where the data was being written.
        location: String,
        /// Description of what went wrong.
        message: String,
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

    // === Domain Errors ===
    /// No prospect with the given identifier exists in the store.
    #[error("no prospect with id {0}")]
    ProspectNotFound(ProspectId),

    /// A scan payload did not contain exactly a name and an email line.
    #[error("scan payload has {fields} field(s), expected 2")]
    InvalidScanPayload {
        /// Number of newline-separated fields found.
        fields: usize,
    },

    /// The scanning surface reported a failure.
    #[error("scanning failed: {0}")]
    Scan(#[from] ScanError),

    // === Notification Errors ===
    /// The notification centre failed to answer or schedule.
    #[error("notification error: {0}")]
    Notification(String),

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for hotprospects operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new notification error.
    #[must_use]
    pub fn notification(message: impl Into<String>) -> Self {
        Self::Notification(message.into())
    }

    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create a storage write error.
    #[must_use]
    pub fn storage_write(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self::StorageWrite {
            location: location.into(),
            message: message.into(),
        }
    }

    /// Check if this error means the prospect does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ProspectNotFound(_))
    }

    /// Check if this error came from reading or writing saved prospects.
    #[must_use]
    pub fn is_storage_error(&self) -> bool {
        matches!(
            self,
            Self::DatabaseOpen { .. }
                | Self::DatabaseQuery(_)
                | Self::DatabaseSchema { .. }
                | Self::CorruptData { .. }
                | Self::StorageWrite { .. }
                | Self::Io(_)
                | Self::DirectoryCreate { .. }
                | Self::Json(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::notification("center unavailable");
        assert_eq!(err.to_string(), "notification error: center unavailable");
    }

    #[test]
    fn test_error_is_not_found() {
        let err = Error::ProspectNotFound(ProspectId::new());
        assert!(err.is_not_found());
        assert!(!Error::internal("x").is_not_found());
    }

    #[test]
    fn test_not_found_display_includes_id() {
        let id = ProspectId::new();
        let err = Error::ProspectNotFound(id);
        assert!(err.to_string().contains(&id.to_string()));
    }

    #[test]
    fn test_invalid_scan_payload_display() {
        let err = Error::InvalidScanPayload { fields: 1 };
        assert_eq!(err.to_string(), "scan payload has 1 field(s), expected 2");
    }

    #[test]
    fn test_from_scan_error() {
        let err: Error = ScanError::BadInput("camera unavailable".to_string()).into();
        assert!(matches!(err, Error::Scan(_)));
        assert!(err.to_string().contains("camera unavailable"));
    }

    #[test]
    fn test_storage_write_display() {
        let err = Error::storage_write("memory", "writes disabled");
        let msg = err.to_string();
        assert!(msg.contains("memory"));
        assert!(msg.contains("writes disabled"));
        assert!(err.is_storage_error());
    }

    #[test]
    fn test_internal_error() {
        let err = Error::internal("something went wrong");
        assert_eq!(err.to_string(), "internal error: something went wrong");
        assert!(!err.is_storage_error());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("file not found"));
        assert!(err.is_storage_error());
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

    #[test]
    fn test_corrupt_data_display() {
        let source = serde_json::from_str::<Vec<i32>>("{").unwrap_err();
        let err = Error::CorruptData {
            location: "/tmp/prospects.json".to_string(),
            source,
        };
        assert!(err.to_string().contains("/tmp/prospects.json"));
        assert!(err.is_storage_error());
    }

    #[test]
    fn test_database_schema_error_display() {
        let err = Error::DatabaseSchema {
            message: "layout 7".to_string(),
        };
        assert!(err.to_string().contains("layout 7"));
        assert!(err.is_storage_error());
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = Error::ConfigValidation {
            message: "invalid hour".to_string(),
        };
        assert!(err.to_string().contains("invalid hour"));
    }

    #[test]
    fn test_directory_create_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::DirectoryCreate {
            path: PathBuf::from("/root/forbidden"),
            source: io_err,
        };
        assert!(err.to_string().contains("/root/forbidden"));
    }

    #[test]
    fn test_database_open_error_display() {
        let result = rusqlite::Connection::open_with_flags(
            "/nonexistent/path/defaults.db",
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY,
        );
        if let Err(sqlite_err) = result {
            let err = Error::DatabaseOpen {
                path: PathBuf::from("/nonexistent/path/defaults.db"),
                source: sqlite_err,
            };
            assert!(err.to_string().contains("/nonexistent/path/defaults.db"));
        }
    }
}
