use thiserror::Error;

/// Failure categories surfaced by a transfer run.
///
/// Every error carries a ready-to-display message; callers can show
/// `to_string()` to an operator without further mapping.
#[derive(Error, Debug)]
pub enum TransferError {
    /// The request or one of the objects it names is unusable: a blank
    /// field, a missing database or table, or a target table whose
    /// columns disagree with the source.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The SQL Server client failed underneath us (connection, login,
    /// statement execution, bulk load).
    #[error("Database error: {0}")]
    Database(String),

    /// Anything that does not fit the other two categories.
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl From<tiberius::error::Error> for TransferError {
    fn from(err: tiberius::error::Error) -> Self {
        TransferError::Database(err.to_string())
    }
}

impl From<std::io::Error> for TransferError {
    fn from(err: std::io::Error) -> Self {
        TransferError::Database(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_messages_carry_prefix() {
        let err = TransferError::Validation("sourceTable is required".to_string());
        assert_eq!(err.to_string(), "Validation error: sourceTable is required");
    }

    #[test]
    fn database_messages_carry_prefix() {
        let err = TransferError::Database("login failed for user 'app'".to_string());
        assert_eq!(err.to_string(), "Database error: login failed for user 'app'");
    }

    #[test]
    fn unexpected_messages_carry_prefix() {
        let err = TransferError::Unexpected("row count query returned no row".to_string());
        assert_eq!(
            err.to_string(),
            "Unexpected error: row count query returned no row"
        );
    }

    #[test]
    fn io_errors_map_to_database() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused");
        let err = TransferError::from(io);
        assert!(matches!(err, TransferError::Database(_)));
        assert!(err.to_string().contains("connection refused"));
    }
}
