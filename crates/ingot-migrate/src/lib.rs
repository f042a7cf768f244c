//! Transactional schema migration core for SQL Server Compact Edition.
//!
//! `ingot-migrate` executes schema changes against an embedded database
//! file, where:
//! - Every run happens inside a single transaction, rolled back on the
//!   first failure
//! - SQL generation is dialect-aware, with the Compact dialect layered
//!   as overrides on the SQL Server family defaults
//! - Preview mode announces the full script without touching the
//!   database
//!
//! # Architecture
//!
//! The migration core consists of several components:
//!
//! - **Expressions** - Schema changes like `CreateTable`, `RenameColumn`,
//!   raw SQL, and database callbacks
//! - **Generator** - Renders expressions to dialect SQL
//! - **Processor** - Applies changes over one connection and one
//!   transaction, with existence checks and data reads
//! - **Driver** - Narrow connection/transaction/command traits a backend
//!   implements
//! - **Announcer** - Progress, script, and error reporting
//!
//! # Example
//!
//! ```rust,ignore
//! use ingot_migrate::prelude::*;
//! use ingot_migrate::testing::{MemoryDriver, RecordingAnnouncer};
//!
//! let driver = MemoryDriver::new();
//! let announcer = RecordingAnnouncer::new();
//! let factory = SqlServerCeProcessorFactory::new(Box::new(driver.clone()));
//!
//! let mut processor = factory.create(
//!     "Data Source=app.sdf",
//!     Box::new(announcer.clone()),
//!     ProcessorOptions { preview_only: true },
//! )?;
//!
//! processor.process(ChangeExpression::RenameTable {
//!     old_name: "Users".to_string(),
//!     new_name: "Members".to_string(),
//! })?;
//! processor.commit_transaction()?;
//!
//! assert_eq!(
//!     announcer.sql_log(),
//!     vec!["sp_rename 'Users', 'Members'".to_string()],
//! );
//! ```

pub mod announcer;
pub mod driver;
pub mod error;
pub mod escape;
pub mod expression;
pub mod factory;
pub mod generator;
pub mod processor;
pub mod rowset;
pub mod schema;
pub mod template;
pub mod testing;
pub mod value;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::announcer::{Announcer, LogAnnouncer, NullAnnouncer, ScriptAnnouncer};
    pub use crate::driver::{
        ConnectionState, DatabaseDriver, DriverCommand, DriverConnection, DriverError, DriverRows,
        DriverTransaction,
    };
    pub use crate::error::{MigrationError, Result};
    pub use crate::escape::escape_literal;
    pub use crate::expression::{ChangeExpression, DbOperation};
    pub use crate::factory::SqlServerCeProcessorFactory;
    pub use crate::generator::{MigrationGenerator, SqlServerCeGenerator, SqlServerGenerator};
    pub use crate::processor::{MigrationProcessor, ProcessorOptions};
    pub use crate::rowset::RowSet;
    pub use crate::schema::{ColumnDefinition, DefaultValue, SqlType};
    pub use crate::value::SqlValue;
}
