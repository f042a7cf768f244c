//! Error types for the migration execution core.

use thiserror::Error;

use crate::driver::DriverError;

/// Errors surfaced by the processor, generator, and template formatter.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// A SQL statement failed inside the active transaction.
    ///
    /// The transaction has already been rolled back and the connection
    /// closed by the time this is returned.
    #[error("execution of `{sql}` failed: {source}")]
    Execution {
        /// The statement that failed.
        sql: String,
        /// The driver-reported cause.
        source: DriverError,
    },

    /// A raw database operation callback failed.
    ///
    /// The transaction has already been rolled back and the connection
    /// closed by the time this is returned.
    #[error("database operation failed: {0}")]
    Operation(DriverError),

    /// A driver capability call failed outside statement execution.
    #[error(transparent)]
    Driver(#[from] DriverError),

    /// A SQL template could not be formatted.
    #[error("invalid template `{template}`: {reason}")]
    Template {
        /// The offending template text.
        template: String,
        /// What was wrong with it.
        reason: String,
    },

    /// An operation that needs an active transaction ran without one.
    ///
    /// Returned after a commit or rollback until `begin_transaction` is
    /// called again.
    #[error("no active transaction; call begin_transaction first")]
    NoActiveTransaction,

    /// `begin_transaction` was called while a transaction is still active.
    #[error("a transaction is already active; commit or roll back first")]
    TransactionAlreadyActive,
}

/// Result type alias for migration operations.
pub type Result<T> = std::result::Result<T, MigrationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execution_error_keeps_statement_context() {
        let error = MigrationError::Execution {
            sql: "DROP TABLE [Users]".to_string(),
            source: DriverError::new("table is locked"),
        };
        assert_eq!(
            error.to_string(),
            "execution of `DROP TABLE [Users]` failed: table is locked"
        );
    }

    #[test]
    fn test_driver_error_is_transparent() {
        let error = MigrationError::from(DriverError::new("connection refused"));
        assert_eq!(error.to_string(), "connection refused");
    }

    #[test]
    fn test_state_errors_name_the_remedy() {
        assert!(MigrationError::NoActiveTransaction
            .to_string()
            .contains("begin_transaction"));
        assert!(MigrationError::TransactionAlreadyActive
            .to_string()
            .contains("commit or roll back"));
    }
}
