//! Capability traits required from a database driver.
//!
//! The crate never talks to a database engine directly. A driver crate
//! implements these traits over its own connection and command primitives;
//! [`crate::testing`] ships an in-memory implementation used by the test
//! suite and by preview tooling. The surface is deliberately narrow: it is
//! exactly what the processor consumes, nothing more.

use std::time::Duration;

use crate::value::SqlValue;

/// Error raised by a driver capability call.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct DriverError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl DriverError {
    /// Creates an error from a message alone.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an error wrapping an underlying cause.
    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Returns the driver-reported message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Connection state as reported by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// The connection accepts commands.
    Open,
    /// The connection must be reopened before use.
    Closed,
}

/// Creates connections for one driver family.
pub trait DatabaseDriver {
    /// Creates a connection from a connection string.
    ///
    /// The connection may be returned in either state; callers open it
    /// themselves before use.
    fn create_connection(
        &self,
        connection_string: &str,
    ) -> Result<Box<dyn DriverConnection>, DriverError>;
}

/// One live database connection.
pub trait DriverConnection {
    /// Returns the current connection state.
    fn state(&self) -> ConnectionState;

    /// Opens the connection.
    fn open(&mut self) -> Result<(), DriverError>;

    /// Closes the connection.
    fn close(&mut self) -> Result<(), DriverError>;

    /// Starts a new transaction on this connection.
    fn begin_transaction(&mut self) -> Result<Box<dyn DriverTransaction>, DriverError>;

    /// Creates a command bound to this connection and the given transaction.
    ///
    /// The command borrows both for its lifetime, which keeps it scoped to
    /// the call that created it.
    fn create_command<'conn>(
        &'conn mut self,
        sql: &str,
        transaction: &'conn mut dyn DriverTransaction,
    ) -> Result<Box<dyn DriverCommand + 'conn>, DriverError>;
}

/// One open transaction.
///
/// Completion consumes the handle, so a committed or rolled-back
/// transaction cannot be reused.
pub trait DriverTransaction {
    /// Commits the transaction.
    fn commit(self: Box<Self>) -> Result<(), DriverError>;

    /// Rolls the transaction back.
    fn rollback(self: Box<Self>) -> Result<(), DriverError>;
}

/// One executable statement.
pub trait DriverCommand {
    /// Sets the command timeout; `None` means wait without limit.
    fn set_timeout(&mut self, timeout: Option<Duration>);

    /// Executes the statement and returns the affected row count.
    fn execute_non_query(&mut self) -> Result<u64, DriverError>;

    /// Executes the statement and returns a row reader.
    fn execute_query(&mut self) -> Result<Box<dyn DriverRows + '_>, DriverError>;
}

/// Forward-only reader over a query result.
pub trait DriverRows {
    /// Returns the column names in result order.
    fn columns(&self) -> &[String];

    /// Advances to the next row, or `None` when the result is exhausted.
    fn next_row(&mut self) -> Result<Option<Vec<SqlValue>>, DriverError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_displays_message() {
        let error = DriverError::new("table is locked");
        assert_eq!(error.to_string(), "table is locked");
        assert_eq!(error.message(), "table is locked");
        assert!(std::error::Error::source(&error).is_none());
    }

    #[test]
    fn test_error_preserves_source() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let error = DriverError::with_source("write failed", io);
        assert_eq!(error.to_string(), "write failed");
        let source = std::error::Error::source(&error).expect("source should be kept");
        assert_eq!(source.to_string(), "pipe closed");
    }
}
