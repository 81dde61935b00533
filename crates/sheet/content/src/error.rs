//! Load and save errors.
//!
//! A file either loads completely or not at all: any of these errors aborts
//! the whole list. Per-row inconsistencies that can be repaired (unknown cost
//! types, legacy keys) are migrated and logged instead.

use std::path::PathBuf;

use sheet_core::{ErrorSeverity, SheetError};

/// Errors raised while reading a list file.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The data source could not provide the file.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not JSON, or a row does not match its kind's shape.
    #[error("invalid file data in {path}: {source}")]
    InvalidFileData {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The `type` discriminator names another kind of list.
    #[error("unexpected file type '{found}' (expected '{expected}')")]
    UnexpectedFileType {
        expected: &'static str,
        found: String,
    },

    /// The `version` is outside the supported range.
    #[error("unsupported data version {found} (supported {min}..={max})")]
    UnsupportedVersion { found: i64, min: i64, max: i64 },

    /// A row has no usable identifier and no `type` to mint one from.
    #[error("row {row} has an invalid identifier and an unknown type '{row_type}'")]
    InvalidIdentifier { row: usize, row_type: String },
}

impl SheetError for LoadError {
    fn severity(&self) -> ErrorSeverity {
        use LoadError::*;
        match self {
            Io { .. } => ErrorSeverity::Recoverable,
            InvalidFileData { .. }
            | UnexpectedFileType { .. }
            | UnsupportedVersion { .. }
            | InvalidIdentifier { .. } => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        use LoadError::*;
        match self {
            Io { .. } => "LOAD_IO",
            InvalidFileData { .. } => "LOAD_INVALID_FILE_DATA",
            UnexpectedFileType { .. } => "LOAD_UNEXPECTED_FILE_TYPE",
            UnsupportedVersion { .. } => "LOAD_UNSUPPORTED_VERSION",
            InvalidIdentifier { .. } => "LOAD_INVALID_IDENTIFIER",
        }
    }
}

/// Errors raised while writing a list file.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl SheetError for SaveError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            SaveError::Io { .. } => ErrorSeverity::Recoverable,
            SaveError::Serialize { .. } => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            SaveError::Io { .. } => "SAVE_IO",
            SaveError::Serialize { .. } => "SAVE_SERIALIZE",
        }
    }
}
