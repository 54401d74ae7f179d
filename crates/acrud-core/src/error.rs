use thiserror::Error;

/// Core error type shared across acrud crates.
#[derive(Debug, Error)]
pub enum Error {
    /// Database error or driver failure.
    #[error("database error: {0}")]
    Db(String),
    /// A native column type has no mapping to a normalized type class.
    ///
    /// Fatal during normalization: data of unknown shape cannot be validated.
    #[error("unsupported column type '{native}' for {table}.{column}")]
    UnsupportedType {
        table: String,
        column: String,
        native: String,
    },
    /// The connection targets an engine with no catalog reader.
    #[error("unsupported driver '{0}'")]
    UnsupportedDriver(String),
    /// The requested table is not part of the normalized schema.
    #[error("unknown table '{0}'")]
    UnknownTable(String),
    /// Catch-all error for unexpected failures.
    #[error("other error: {0}")]
    Other(String),
}

/// Convenience alias for results returned by acrud crates.
pub type Result<T> = std::result::Result<T, Error>;
