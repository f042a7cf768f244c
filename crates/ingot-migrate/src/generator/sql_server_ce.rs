//! SQL Server Compact Edition dialect.

use super::MigrationGenerator;
use crate::escape::escape_literal;

/// Generator for SQL Server Compact Edition 4.
///
/// Compact Edition shares the family defaults except for table renames:
/// its `sp_rename` rejects bracket-quoted identifiers inside the string
/// arguments, so both names are passed as bare escaped literals.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlServerCeGenerator;

impl SqlServerCeGenerator {
    /// Creates a new Compact Edition generator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl MigrationGenerator for SqlServerCeGenerator {
    fn database_type(&self) -> &'static str {
        "SqlCe4"
    }

    fn rename_table_sql(&self, old_name: &str, new_name: &str) -> String {
        format!(
            "sp_rename '{}', '{}'",
            escape_literal(old_name),
            escape_literal(new_name)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ColumnDefinition, SqlType};

    fn generator() -> SqlServerCeGenerator {
        SqlServerCeGenerator::new()
    }

    #[test]
    fn test_database_type() {
        assert_eq!(generator().database_type(), "SqlCe4");
    }

    #[test]
    fn test_rename_table_has_no_brackets() {
        let sql = generator().rename_table_sql("Old", "New");
        assert_eq!(sql, "sp_rename 'Old', 'New'");
    }

    #[test]
    fn test_rename_table_escapes_quotes() {
        let sql = generator().rename_table_sql("O'Brien", "New");
        assert_eq!(sql, "sp_rename 'O''Brien', 'New'");
    }

    #[test]
    fn test_other_statements_follow_the_family_defaults() {
        let g = generator();
        assert_eq!(
            g.create_table_sql(
                "Users",
                &[ColumnDefinition::new("Id", SqlType::Int)
                    .not_null()
                    .primary_key()],
            ),
            "CREATE TABLE [Users] ([Id] INT NOT NULL PRIMARY KEY)"
        );
        assert_eq!(
            g.rename_column_sql("Users", "Name", "FullName"),
            "sp_rename '[Users].[Name]', 'FullName'"
        );
    }
}
