//! Base SQL Server dialect.

use super::MigrationGenerator;

/// Generator for the full SQL Server dialect.
///
/// Uses the shared family defaults for every statement kind.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlServerGenerator;

impl SqlServerGenerator {
    /// Creates a new SQL Server generator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl MigrationGenerator for SqlServerGenerator {
    fn database_type(&self) -> &'static str {
        "SqlServer"
    }
}
