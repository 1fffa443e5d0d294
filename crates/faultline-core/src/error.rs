//! Error types for storage adapters

use thiserror::Error;

/// Errors raised by a [`LogAdapter`](crate::LogAdapter) implementation
///
/// Not-found is never an error: lookups return `Ok(None)` and deletes of
/// unknown ids succeed.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// The backing database rejected or failed a statement
    #[error("Database error: {0}")]
    Database(String),

    /// I/O error opening or reading the backing store
    #[error("I/O error: {0}")]
    Io(String),

    /// An entry could not be encoded for storage
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Stored bytes or metadata JSON could not be decoded
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// A row came back without a required column or with an unusable value
    #[error("Invalid row: {0}")]
    InvalidRow(String),

    /// A just-inserted row could not be read back
    #[error("Row {0} missing after insert")]
    MissingRow(String),
}

impl AdapterError {
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database(message.into())
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::Io(message.into())
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization(message.into())
    }

    pub fn deserialization(message: impl Into<String>) -> Self {
        Self::Deserialization(message.into())
    }

    pub fn invalid_row(message: impl Into<String>) -> Self {
        Self::InvalidRow(message.into())
    }
}

impl From<std::io::Error> for AdapterError {
    fn from(err: std::io::Error) -> Self {
        AdapterError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for AdapterError {
    fn from(err: serde_json::Error) -> Self {
        AdapterError::Deserialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_error_message() {
        let err = AdapterError::database("no such table: error_logs");
        assert!(matches!(err, AdapterError::Database(_)));
        assert!(err.to_string().contains("error_logs"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: AdapterError = io_err.into();
        assert!(matches!(err, AdapterError::Io(_)));
    }

    #[test]
    fn test_missing_row_names_id() {
        let err = AdapterError::MissingRow("abc".to_string());
        assert_eq!(err.to_string(), "Row abc missing after insert");
    }
}
