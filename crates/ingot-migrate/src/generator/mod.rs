//! Dialect-specific SQL generation.
//!
//! [`MigrationGenerator`] turns [`ChangeExpression`] values into SQL text
//! for one database dialect. Every statement kind has a default method
//! implementing the shared SQL Server family behavior; a dialect type
//! overrides only the statements it renders differently and inherits the
//! rest. Generators are stateless: the same expression always renders to
//! the same text.

mod sql_server;
mod sql_server_ce;

pub use sql_server::SqlServerGenerator;
pub use sql_server_ce::SqlServerCeGenerator;

use crate::escape::escape_literal;
use crate::expression::ChangeExpression;
use crate::schema::{ColumnDefinition, DefaultValue, SqlType};

/// Renders change expressions as SQL text for one dialect.
pub trait MigrationGenerator {
    /// Returns the fixed identifier of the target dialect.
    fn database_type(&self) -> &'static str;

    /// Quotes an identifier for use in a statement.
    ///
    /// Brackets are the quoting mechanism for this dialect family; a `]`
    /// inside the name is doubled so it cannot close the bracket early.
    fn quote_identifier(&self, name: &str) -> String {
        format!("[{}]", name.replace(']', "]]"))
    }

    /// Returns the dialect spelling of a column type.
    fn type_name(&self, sql_type: &SqlType) -> String {
        match sql_type {
            SqlType::Int => "INT".to_string(),
            SqlType::BigInt => "BIGINT".to_string(),
            SqlType::SmallInt => "SMALLINT".to_string(),
            SqlType::TinyInt => "TINYINT".to_string(),
            SqlType::Bit => "BIT".to_string(),
            SqlType::NVarChar(len) => format!("NVARCHAR({len})"),
            SqlType::NChar(len) => format!("NCHAR({len})"),
            SqlType::NText => "NTEXT".to_string(),
            SqlType::DateTime => "DATETIME".to_string(),
            SqlType::Float => "FLOAT".to_string(),
            SqlType::Real => "REAL".to_string(),
            SqlType::Numeric(precision, scale) => format!("NUMERIC({precision},{scale})"),
            SqlType::Money => "MONEY".to_string(),
            SqlType::Binary(len) => format!("BINARY({len})"),
            SqlType::VarBinary(len) => format!("VARBINARY({len})"),
            SqlType::Image => "IMAGE".to_string(),
            SqlType::UniqueIdentifier => "UNIQUEIDENTIFIER".to_string(),
            SqlType::RowVersion => "ROWVERSION".to_string(),
        }
    }

    /// Renders a column default.
    fn default_value_sql(&self, default: &DefaultValue) -> String {
        match default {
            DefaultValue::Value(value) => value.to_sql_inline(),
            DefaultValue::Expression(expression) => expression.clone(),
        }
    }

    /// Renders one full column definition.
    fn column_definition(&self, column: &ColumnDefinition) -> String {
        let mut sql = format!(
            "{} {}",
            self.quote_identifier(&column.name),
            self.type_name(&column.sql_type)
        );
        if column.identity {
            sql.push_str(" IDENTITY(1,1)");
        }
        if column.nullable {
            sql.push_str(" NULL");
        } else {
            sql.push_str(" NOT NULL");
        }
        if let Some(default) = &column.default {
            sql.push_str(" DEFAULT ");
            sql.push_str(&self.default_value_sql(default));
        }
        if column.primary_key {
            sql.push_str(" PRIMARY KEY");
        }
        if column.unique {
            sql.push_str(" UNIQUE");
        }
        sql
    }

    /// Generates SQL for creating a table.
    fn create_table_sql(&self, name: &str, columns: &[ColumnDefinition]) -> String {
        let definitions: Vec<String> = columns
            .iter()
            .map(|column| self.column_definition(column))
            .collect();
        format!(
            "CREATE TABLE {} ({})",
            self.quote_identifier(name),
            definitions.join(", ")
        )
    }

    /// Generates SQL for dropping a table.
    fn drop_table_sql(&self, name: &str) -> String {
        format!("DROP TABLE {}", self.quote_identifier(name))
    }

    /// Generates SQL for renaming a table.
    ///
    /// The dialect family renames through the `sp_rename` procedure, which
    /// takes both names as string literals; the bracket-quoted identifiers
    /// go inside those literals.
    fn rename_table_sql(&self, old_name: &str, new_name: &str) -> String {
        format!(
            "sp_rename '[{}]', '[{}]'",
            escape_literal(old_name),
            escape_literal(new_name)
        )
    }

    /// Generates SQL for adding a column.
    fn add_column_sql(&self, table: &str, column: &ColumnDefinition) -> String {
        format!(
            "ALTER TABLE {} ADD {}",
            self.quote_identifier(table),
            self.column_definition(column)
        )
    }

    /// Generates SQL for dropping a column.
    fn drop_column_sql(&self, table: &str, column_name: &str) -> String {
        format!(
            "ALTER TABLE {} DROP COLUMN {}",
            self.quote_identifier(table),
            self.quote_identifier(column_name)
        )
    }

    /// Generates SQL for renaming a column.
    fn rename_column_sql(&self, table: &str, old_name: &str, new_name: &str) -> String {
        format!(
            "sp_rename '[{}].[{}]', '{}'",
            escape_literal(table),
            escape_literal(old_name),
            escape_literal(new_name)
        )
    }

    /// Generates SQL for creating an index.
    fn create_index_sql(&self, name: &str, table: &str, columns: &[String], unique: bool) -> String {
        let quoted: Vec<String> = columns
            .iter()
            .map(|column| self.quote_identifier(column))
            .collect();
        let mut sql = String::from("CREATE ");
        if unique {
            sql.push_str("UNIQUE ");
        }
        sql.push_str("INDEX ");
        sql.push_str(&self.quote_identifier(name));
        sql.push_str(" ON ");
        sql.push_str(&self.quote_identifier(table));
        sql.push_str(" (");
        sql.push_str(&quoted.join(", "));
        sql.push(')');
        sql
    }

    /// Generates SQL for dropping an index.
    fn drop_index_sql(&self, name: &str, table: &str) -> String {
        format!(
            "DROP INDEX {}.{}",
            self.quote_identifier(table),
            self.quote_identifier(name)
        )
    }

    /// Renders one expression, or `None` when it has no SQL form.
    ///
    /// Raw operations are driver callbacks, not statements, so they are
    /// the one variant without SQL text.
    fn generate(&self, expression: &ChangeExpression) -> Option<String> {
        match expression {
            ChangeExpression::CreateTable { name, columns } => {
                Some(self.create_table_sql(name, columns))
            }
            ChangeExpression::DropTable { name } => Some(self.drop_table_sql(name)),
            ChangeExpression::RenameTable { old_name, new_name } => {
                Some(self.rename_table_sql(old_name, new_name))
            }
            ChangeExpression::AddColumn { table, column } => {
                Some(self.add_column_sql(table, column))
            }
            ChangeExpression::DropColumn { table, column_name } => {
                Some(self.drop_column_sql(table, column_name))
            }
            ChangeExpression::RenameColumn {
                table,
                old_name,
                new_name,
            } => Some(self.rename_column_sql(table, old_name, new_name)),
            ChangeExpression::CreateIndex {
                name,
                table,
                columns,
                unique,
            } => Some(self.create_index_sql(name, table, columns, *unique)),
            ChangeExpression::DropIndex { name, table } => {
                Some(self.drop_index_sql(name, table))
            }
            ChangeExpression::Sql { sql } => Some(sql.clone()),
            ChangeExpression::RawOperation { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator() -> SqlServerGenerator {
        SqlServerGenerator::new()
    }

    #[test]
    fn test_quote_identifier() {
        let g = generator();
        assert_eq!(g.quote_identifier("Users"), "[Users]");
        assert_eq!(g.quote_identifier("We]ird"), "[We]]ird]");
        assert_eq!(g.quote_identifier("With Space"), "[With Space]");
    }

    #[test]
    fn test_generate_dispatches_by_expression_kind() {
        let g = generator();
        let rename = ChangeExpression::RenameTable {
            old_name: "Users".to_string(),
            new_name: "Members".to_string(),
        };
        assert_eq!(
            g.generate(&rename),
            Some("sp_rename '[Users]', '[Members]'".to_string())
        );

        let drop = ChangeExpression::DropTable {
            name: "Users".to_string(),
        };
        assert_eq!(g.generate(&drop), Some("DROP TABLE [Users]".to_string()));
    }

    #[test]
    fn test_generate_passes_raw_sql_through() {
        let g = generator();
        let expression = ChangeExpression::Sql {
            sql: "UPDATE [Users] SET [Active] = 1".to_string(),
        };
        assert_eq!(
            g.generate(&expression),
            Some("UPDATE [Users] SET [Active] = 1".to_string())
        );
    }

    #[test]
    fn test_raw_operations_have_no_sql_form() {
        let g = generator();
        assert_eq!(
            g.generate(&ChangeExpression::RawOperation { operation: None }),
            None
        );
        assert_eq!(
            g.generate(&ChangeExpression::RawOperation {
                operation: Some(Box::new(|_, _| Ok(()))),
            }),
            None
        );
    }

    #[test]
    fn test_default_value_rendering() {
        let g = generator();
        assert_eq!(
            g.default_value_sql(&DefaultValue::Value(crate::value::SqlValue::Text(
                "O'Brien".to_string()
            ))),
            "'O''Brien'"
        );
        assert_eq!(
            g.default_value_sql(&DefaultValue::Expression("GETDATE()".to_string())),
            "GETDATE()"
        );
    }
}
