//! Error types for sqlstitch

use thiserror::Error;

/// Result type alias for sqlstitch operations
pub type StitchResult<T> = Result<T, StitchError>;

/// Error types for statement assembly and execution
#[derive(Debug, Error)]
pub enum StitchError {
    /// Statement or adapter misconfiguration (e.g. preparing without a bound adapter)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Database connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query preparation or execution error reported by the driver
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// A label in the prepared SQL has no bound value
    #[error("Missing parameter: {0}")]
    MissingParameter(String),

    /// Result value decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Pool error
    #[cfg(feature = "pool")]
    #[error("Pool error: {0}")]
    Pool(String),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl StitchError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a missing parameter error for a label
    pub fn missing_parameter(label: impl Into<String>) -> Self {
        Self::MissingParameter(label.into())
    }

    /// Check if this is a configuration error
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Check if this is a missing parameter error
    pub fn is_missing_parameter(&self) -> bool {
        matches!(self, Self::MissingParameter(_))
    }
}

#[cfg(feature = "pool")]
impl From<deadpool_postgres::PoolError> for StitchError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        Self::Pool(err.to_string())
    }
}
