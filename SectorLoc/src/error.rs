//! Error types for `SectorLoc`

use std::path::PathBuf;

use thiserror::Error;

/// The error type for `SectorLoc` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// IO error tied to a specific file.
    #[error("IO error on {}: {source}", path.display())]
    FileIo {
        /// The file being read or written.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },

    /// A staged output could not be moved into place.
    #[error("failed to persist staged file {}: {message}", path.display())]
    Persist {
        /// The destination path.
        path: PathBuf,
        /// The error message.
        message: String,
    },

    // ==================== Encoding Errors ====================
    /// The file bytes cannot be decoded under any candidate encoding.
    #[error("cannot decode {}: tried {}", path.display(), tried.join(", "))]
    Encoding {
        /// The file that failed to decode.
        path: PathBuf,
        /// Encodings that were attempted, in order.
        tried: Vec<String>,
    },

    /// An encoding label in the configuration is not recognised.
    #[error("unknown encoding label: {0}")]
    UnknownEncoding(String),

    // ==================== Table Errors ====================
    /// A column required by an entity schema is absent from a table header.
    #[error("column '{column}' missing from {table}")]
    SchemaColumnMissing {
        /// The table (file name) being read.
        table: String,
        /// The missing column name.
        column: String,
    },

    /// The table has no header row.
    #[error("table {table} is empty")]
    EmptyTable {
        /// The table (file name) being read.
        table: String,
    },

    /// CSV parsing or writing error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    // ==================== Document Errors ====================
    /// The translation document is structurally invalid.
    #[error("invalid translation document at {path}: {message}")]
    DocumentFormat {
        /// JSON path of the offending value (e.g. `$.SHIP.hound`).
        path: String,
        /// What was wrong with it.
        message: String,
    },

    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ==================== Metadata Errors ====================
    /// The mod metadata or a skin file could not be parsed.
    #[error("invalid metadata in {}: {message}", path.display())]
    Metadata {
        /// The metadata file.
        path: PathBuf,
        /// The parse error message.
        message: String,
    },

    // ==================== Configuration Errors ====================
    /// The configuration file could not be parsed.
    #[error("invalid configuration in {}: {message}", path.display())]
    ConfigParse {
        /// The configuration file.
        path: PathBuf,
        /// The parse error message.
        message: String,
    },

    // ==================== Apply Errors ====================
    /// An apply step failed and every target was restored from its backup.
    #[error("apply failed at {step}, original files restored: {source}")]
    ApplyRolledBack {
        /// Name of the step that failed.
        step: String,
        /// The failure that triggered the rollback.
        source: Box<Error>,
    },

    /// An apply step failed and some targets could not be restored.
    #[error(
        "apply failed and {} file(s) could not be restored; backups kept at: {}",
        unrestored.len(),
        backups.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(", ")
    )]
    RollbackIncomplete {
        /// Targets whose restore copy failed.
        unrestored: Vec<PathBuf>,
        /// Backup files holding the pre-apply content.
        backups: Vec<PathBuf>,
    },
}

impl Error {
    /// Attach a path to an IO error.
    pub(crate) fn file_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::FileIo {
            path: path.into(),
            source,
        }
    }

    /// Whether this error means "the file does not exist".
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Io(err) | Error::FileIo { source: err, .. } => {
                err.kind() == std::io::ErrorKind::NotFound
            }
            _ => false,
        }
    }
}

/// A specialized Result type for `SectorLoc` operations.
pub type Result<T> = std::result::Result<T, Error>;
