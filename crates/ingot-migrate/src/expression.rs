//! Structured descriptions of migration actions.

use std::fmt;

use crate::driver::{DriverConnection, DriverError, DriverTransaction};
use crate::schema::ColumnDefinition;

/// A callback run against the live connection inside the active transaction.
///
/// This is the escape hatch for work that has no SQL form, such as bulk
/// loading through driver-specific APIs. The callback observes and joins
/// the processor's transaction; it must not commit, roll back, or close
/// anything itself.
pub type DbOperation = Box<
    dyn FnOnce(&mut dyn DriverConnection, &mut dyn DriverTransaction) -> Result<(), DriverError>,
>;

/// One migration action, independent of any dialect.
pub enum ChangeExpression {
    /// Create a table with the given columns.
    CreateTable {
        /// Table name, unquoted.
        name: String,
        /// Column definitions in declaration order.
        columns: Vec<ColumnDefinition>,
    },
    /// Drop a table.
    DropTable {
        /// Table name, unquoted.
        name: String,
    },
    /// Rename a table.
    RenameTable {
        /// Current name.
        old_name: String,
        /// New name.
        new_name: String,
    },
    /// Add a column to an existing table.
    AddColumn {
        /// Table to alter.
        table: String,
        /// Column to add.
        column: ColumnDefinition,
    },
    /// Drop a column.
    DropColumn {
        /// Table to alter.
        table: String,
        /// Column to drop.
        column_name: String,
    },
    /// Rename a column.
    RenameColumn {
        /// Table holding the column.
        table: String,
        /// Current column name.
        old_name: String,
        /// New column name.
        new_name: String,
    },
    /// Create an index.
    CreateIndex {
        /// Index name.
        name: String,
        /// Indexed table.
        table: String,
        /// Indexed columns in key order.
        columns: Vec<String>,
        /// Whether the index enforces uniqueness.
        unique: bool,
    },
    /// Drop an index.
    DropIndex {
        /// Index name.
        name: String,
        /// Table the index belongs to.
        table: String,
    },
    /// Run a ready-made SQL statement verbatim.
    Sql {
        /// The statement text.
        sql: String,
    },
    /// Run a driver-level callback inside the active transaction.
    ///
    /// A missing callback makes the whole expression a no-op: the
    /// processor returns without touching the connection or transaction.
    RawOperation {
        /// The callback to run, if any.
        operation: Option<DbOperation>,
    },
}

impl fmt::Debug for ChangeExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateTable { name, columns } => f
                .debug_struct("CreateTable")
                .field("name", name)
                .field("columns", columns)
                .finish(),
            Self::DropTable { name } => {
                f.debug_struct("DropTable").field("name", name).finish()
            }
            Self::RenameTable { old_name, new_name } => f
                .debug_struct("RenameTable")
                .field("old_name", old_name)
                .field("new_name", new_name)
                .finish(),
            Self::AddColumn { table, column } => f
                .debug_struct("AddColumn")
                .field("table", table)
                .field("column", column)
                .finish(),
            Self::DropColumn { table, column_name } => f
                .debug_struct("DropColumn")
                .field("table", table)
                .field("column_name", column_name)
                .finish(),
            Self::RenameColumn {
                table,
                old_name,
                new_name,
            } => f
                .debug_struct("RenameColumn")
                .field("table", table)
                .field("old_name", old_name)
                .field("new_name", new_name)
                .finish(),
            Self::CreateIndex {
                name,
                table,
                columns,
                unique,
            } => f
                .debug_struct("CreateIndex")
                .field("name", name)
                .field("table", table)
                .field("columns", columns)
                .field("unique", unique)
                .finish(),
            Self::DropIndex { name, table } => f
                .debug_struct("DropIndex")
                .field("name", name)
                .field("table", table)
                .finish(),
            Self::Sql { sql } => f.debug_struct("Sql").field("sql", sql).finish(),
            Self::RawOperation { operation } => f
                .debug_struct("RawOperation")
                .field("operation", &operation.as_ref().map(|_| "<callback>"))
                .finish(),
        }
    }
}
