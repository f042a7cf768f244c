//! Transactional execution of migration changes.
//!
//! [`MigrationProcessor`] owns one connection and, while active, one
//! transaction. Change expressions render to SQL through the generator and
//! execute inside that transaction; a failed statement rolls the
//! transaction back before the error is returned. Introspection queries
//! run under the same transaction so a migration observes its own
//! uncommitted changes.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::announcer::Announcer;
use crate::driver::{ConnectionState, DriverConnection, DriverError, DriverTransaction};
use crate::error::{MigrationError, Result};
use crate::escape::escape_literal;
use crate::expression::{ChangeExpression, DbOperation};
use crate::generator::MigrationGenerator;
use crate::rowset::RowSet;
use crate::template::format_template;

/// Recognized processor configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessorOptions {
    /// When true, SQL is reported to the announcer but never executed.
    pub preview_only: bool,
}

/// Applies migration changes over one connection and one transaction.
///
/// Construction opens the connection if necessary and begins the initial
/// transaction, so a freshly built processor is always ready to execute.
/// Committing or rolling back closes the connection; a later
/// [`begin_transaction`](Self::begin_transaction) reactivates the
/// processor without reconstructing it. In between, operations that need
/// a transaction fail fast with
/// [`MigrationError::NoActiveTransaction`].
pub struct MigrationProcessor<G: MigrationGenerator> {
    generator: G,
    announcer: Box<dyn Announcer>,
    options: ProcessorOptions,
    connection: Box<dyn DriverConnection>,
    transaction: Option<Box<dyn DriverTransaction>>,
}

impl<G: MigrationGenerator> MigrationProcessor<G> {
    /// Takes ownership of `connection` and begins the initial transaction.
    pub fn new(
        connection: Box<dyn DriverConnection>,
        generator: G,
        announcer: Box<dyn Announcer>,
        options: ProcessorOptions,
    ) -> Result<Self> {
        let mut processor = Self {
            generator,
            announcer,
            options,
            connection,
            transaction: None,
        };
        processor.begin_transaction()?;
        Ok(processor)
    }

    /// Returns the fixed identifier of the dialect this processor targets.
    #[must_use]
    pub fn database_type(&self) -> &'static str {
        self.generator.database_type()
    }

    /// Returns a read-only view of the active configuration.
    #[must_use]
    pub fn options(&self) -> &ProcessorOptions {
        &self.options
    }

    /// Returns whether a transaction is currently active.
    #[must_use]
    pub fn in_transaction(&self) -> bool {
        self.transaction.is_some()
    }

    /// Applies one change expression.
    ///
    /// Expressions with a SQL form render through the generator and run
    /// like [`process_sql`](Self::process_sql). A raw operation with no
    /// callback returns immediately without touching the connection or
    /// transaction; one with a callback runs it against both, rolling the
    /// transaction back if the callback fails.
    pub fn process(&mut self, expression: ChangeExpression) -> Result<()> {
        match expression {
            ChangeExpression::RawOperation { operation: None } => Ok(()),
            ChangeExpression::RawOperation {
                operation: Some(operation),
            } => self.run_operation(operation),
            other => {
                let sql = self.generator.generate(&other).unwrap_or_default();
                self.process_sql(&sql)
            }
        }
    }

    /// Executes one SQL statement inside the current transaction.
    ///
    /// The statement is announced before the preview check, so a preview
    /// run still reports the full script. Empty statements are skipped.
    /// On failure the message is announced, the transaction rolled back,
    /// and the returned error carries the statement text.
    pub fn process_sql(&mut self, sql: &str) -> Result<()> {
        self.announcer.sql(sql);
        if self.options.preview_only || sql.is_empty() {
            return Ok(());
        }
        self.ensure_connection_open()?;
        debug!(statement = %sql, "executing");
        let transaction = self
            .transaction
            .as_mut()
            .ok_or(MigrationError::NoActiveTransaction)?;
        let outcome = execute_statement(self.connection.as_mut(), transaction.as_mut(), sql);
        if let Err(source) = outcome {
            self.announcer.error(source.message());
            self.rollback_after_failure();
            return Err(MigrationError::Execution {
                sql: sql.to_string(),
                source,
            });
        }
        Ok(())
    }

    /// Formats a SQL template with positional arguments and executes it.
    ///
    /// Arguments substitute verbatim: escape values destined for quoted
    /// literal contexts with [`escape_literal`] first.
    pub fn execute(&mut self, template: &str, args: &[&dyn Display]) -> Result<()> {
        let sql = format_template(template, args)?;
        self.process_sql(&sql)
    }

    /// Starts a new transaction on the current connection.
    ///
    /// Fails with [`MigrationError::TransactionAlreadyActive`] while a
    /// previous transaction is neither committed nor rolled back. The
    /// connection is reopened first when a commit or rollback closed it.
    pub fn begin_transaction(&mut self) -> Result<()> {
        if self.transaction.is_some() {
            return Err(MigrationError::TransactionAlreadyActive);
        }
        self.announcer.say("Beginning Transaction");
        self.ensure_connection_open()?;
        self.transaction = Some(self.connection.begin_transaction()?);
        Ok(())
    }

    /// Commits the current transaction and closes the connection.
    pub fn commit_transaction(&mut self) -> Result<()> {
        self.announcer.say("Committing Transaction");
        let transaction = self
            .transaction
            .take()
            .ok_or(MigrationError::NoActiveTransaction)?;
        transaction.commit()?;
        self.close_connection()?;
        Ok(())
    }

    /// Rolls back the current transaction and closes the connection.
    pub fn rollback_transaction(&mut self) -> Result<()> {
        self.announcer.say("Rolling back transaction");
        let transaction = self
            .transaction
            .take()
            .ok_or(MigrationError::NoActiveTransaction)?;
        transaction.rollback()?;
        self.close_connection()?;
        Ok(())
    }

    /// Always true: the target dialect has no schema concept distinct
    /// from the database itself.
    pub fn schema_exists(&mut self, _schema_name: &str) -> Result<bool> {
        Ok(true)
    }

    /// Checks whether a table exists.
    pub fn table_exists(&mut self, _schema_name: &str, table_name: &str) -> Result<bool> {
        self.announcer.say("TableExists");
        self.exists(
            "SELECT * FROM INFORMATION_SCHEMA.TABLES WHERE TABLE_NAME = '{0}'",
            &[&escape_literal(table_name)],
        )
    }

    /// Checks whether a column exists.
    pub fn column_exists(
        &mut self,
        _schema_name: &str,
        table_name: &str,
        column_name: &str,
    ) -> Result<bool> {
        self.announcer.say("ColumnExists");
        self.exists(
            "SELECT * FROM INFORMATION_SCHEMA.COLUMNS WHERE TABLE_NAME = '{0}' AND COLUMN_NAME = '{1}'",
            &[&escape_literal(table_name), &escape_literal(column_name)],
        )
    }

    /// Checks whether a constraint exists.
    pub fn constraint_exists(
        &mut self,
        _schema_name: &str,
        table_name: &str,
        constraint_name: &str,
    ) -> Result<bool> {
        self.announcer.say("ConstraintExists");
        self.exists(
            "SELECT * FROM INFORMATION_SCHEMA.TABLE_CONSTRAINTS WHERE TABLE_NAME = '{0}' AND CONSTRAINT_NAME = '{1}'",
            &[&escape_literal(table_name), &escape_literal(constraint_name)],
        )
    }

    /// Checks whether an index exists.
    pub fn index_exists(
        &mut self,
        _schema_name: &str,
        table_name: &str,
        index_name: &str,
    ) -> Result<bool> {
        self.announcer.say("IndexExists");
        self.exists(
            "SELECT * FROM INFORMATION_SCHEMA.INDEXES WHERE TABLE_NAME = '{0}' AND INDEX_NAME = '{1}'",
            &[&escape_literal(table_name), &escape_literal(index_name)],
        )
    }

    /// Checks whether an index covers a specific column.
    pub fn index_column_exists(
        &mut self,
        _schema_name: &str,
        table_name: &str,
        index_name: &str,
        column_name: &str,
    ) -> Result<bool> {
        self.announcer.say("IndexExists - columnName");
        self.exists(
            "SELECT * FROM INFORMATION_SCHEMA.INDEXES WHERE TABLE_NAME = '{0}' AND INDEX_NAME = '{1}' AND COLUMN_NAME = '{2}'",
            &[
                &escape_literal(table_name),
                &escape_literal(index_name),
                &escape_literal(column_name),
            ],
        )
    }

    /// Formats and runs a query, reporting whether it returned any rows.
    ///
    /// Reads run inside the current transaction, so checks observe
    /// earlier uncommitted changes. A failing read does not roll the
    /// transaction back.
    pub fn exists(&mut self, template: &str, args: &[&dyn Display]) -> Result<bool> {
        let sql = format_template(template, args)?;
        self.ensure_connection_open()?;
        let transaction = self
            .transaction
            .as_mut()
            .ok_or(MigrationError::NoActiveTransaction)?;
        Ok(any_rows(
            self.connection.as_mut(),
            transaction.as_mut(),
            &sql,
        )?)
    }

    /// Executes a formatted SELECT and materializes the full result.
    pub fn read(&mut self, template: &str, args: &[&dyn Display]) -> Result<RowSet> {
        let sql = format_template(template, args)?;
        self.ensure_connection_open()?;
        let transaction = self
            .transaction
            .as_mut()
            .ok_or(MigrationError::NoActiveTransaction)?;
        Ok(fetch_rows(
            self.connection.as_mut(),
            transaction.as_mut(),
            &sql,
        )?)
    }

    /// Reads the entire contents of a table.
    pub fn read_table_data(&mut self, _schema_name: &str, table_name: &str) -> Result<RowSet> {
        let table = self.generator.quote_identifier(table_name);
        self.read("SELECT * FROM {0}", &[&table])
    }

    fn run_operation(&mut self, operation: DbOperation) -> Result<()> {
        self.ensure_connection_open()?;
        self.announcer.say("Performing database operation");
        let transaction = self
            .transaction
            .as_mut()
            .ok_or(MigrationError::NoActiveTransaction)?;
        if let Err(source) = operation(self.connection.as_mut(), transaction.as_mut()) {
            self.announcer.error(source.message());
            self.rollback_after_failure();
            return Err(MigrationError::Operation(source));
        }
        Ok(())
    }

    /// Rolls back after a failed statement or operation. A failing
    /// rollback is announced and swallowed so the original error is the
    /// one the caller sees.
    fn rollback_after_failure(&mut self) {
        if let Err(rollback_error) = self.rollback_transaction() {
            warn!(error = %rollback_error, "rollback after a failed statement also failed");
            self.announcer.error(&rollback_error.to_string());
        }
    }

    fn ensure_connection_open(&mut self) -> Result<()> {
        if self.connection.state() != ConnectionState::Open {
            debug!("reopening closed connection");
            self.connection.open()?;
        }
        Ok(())
    }

    fn close_connection(&mut self) -> Result<()> {
        if self.connection.state() == ConnectionState::Open {
            self.connection.close()?;
        }
        Ok(())
    }
}

fn execute_statement(
    connection: &mut dyn DriverConnection,
    transaction: &mut dyn DriverTransaction,
    sql: &str,
) -> std::result::Result<u64, DriverError> {
    let mut command = connection.create_command(sql, transaction)?;
    // The embedded engine rejects finite command timeouts.
    command.set_timeout(None);
    command.execute_non_query()
}

fn any_rows(
    connection: &mut dyn DriverConnection,
    transaction: &mut dyn DriverTransaction,
    sql: &str,
) -> std::result::Result<bool, DriverError> {
    let mut command = connection.create_command(sql, transaction)?;
    let mut rows = command.execute_query()?;
    Ok(rows.next_row()?.is_some())
}

fn fetch_rows(
    connection: &mut dyn DriverConnection,
    transaction: &mut dyn DriverTransaction,
    sql: &str,
) -> std::result::Result<RowSet, DriverError> {
    let mut command = connection.create_command(sql, transaction)?;
    let mut rows = command.execute_query()?;
    RowSet::from_reader(rows.as_mut())
}
