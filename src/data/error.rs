use std::path::PathBuf;

use thiserror::Error;

use super::model::ColumnType;

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

/// Everything that can go wrong while loading or filtering a table.
///
/// Errors surface immediately to the caller; there is no retry or recovery
/// anywhere in the data layer.
#[derive(Debug, Error)]
pub enum TableError {
    /// The requested format string is not one of the supported names.
    #[error("invalid format {0:?}: expected \"tsv\" or \"csv\"")]
    InvalidFormat(String),

    /// The file could not be opened or read.
    #[error("failed to read {}: {}", path.display(), source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file content is not a well-formed delimited table.
    #[error("malformed table in {}: {}", path.display(), message)]
    Parse { path: PathBuf, message: String },

    /// A referenced column does not exist in the table.
    #[error("no column named {0:?}")]
    ColumnNotFound(String),

    /// The column exists but cannot be compared numerically.
    #[error("column {column:?} has type {dtype} and cannot be compared to a number")]
    TypeMismatch { column: String, dtype: ColumnType },

    /// A filter expression string could not be parsed.
    #[error("invalid filter expression {0:?}: expected COLUMN OP NUMBER, e.g. \"reads>10000\"")]
    InvalidPredicate(String),
}
