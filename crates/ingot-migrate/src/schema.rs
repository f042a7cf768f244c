//! Column and type definitions for schema changes.

use serde::{Deserialize, Serialize};

use crate::value::SqlValue;

/// Column data types of the SQL Server Compact Edition family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SqlType {
    /// 32-bit integer.
    Int,
    /// 64-bit integer.
    BigInt,
    /// 16-bit integer.
    SmallInt,
    /// 8-bit unsigned integer.
    TinyInt,
    /// Single bit.
    Bit,
    /// Unicode string with a length limit.
    NVarChar(u16),
    /// Fixed-length unicode string.
    NChar(u16),
    /// Large unicode text.
    NText,
    /// Date and time.
    DateTime,
    /// 64-bit floating point.
    Float,
    /// 32-bit floating point.
    Real,
    /// Fixed-precision decimal as (precision, scale).
    Numeric(u8, u8),
    /// Currency value.
    Money,
    /// Fixed-length binary.
    Binary(u16),
    /// Variable-length binary with a length limit.
    VarBinary(u16),
    /// Large binary data.
    Image,
    /// GUID column.
    UniqueIdentifier,
    /// Automatic row version stamp.
    RowVersion,
}

/// Default value for a column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DefaultValue {
    /// A literal, rendered inline with quoting and escaping applied.
    Value(SqlValue),
    /// A raw SQL expression such as `GETDATE()`, rendered verbatim.
    Expression(String),
}

/// A column definition consumed by create-table and add-column changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    /// Column name, unquoted.
    pub name: String,
    /// Column data type.
    pub sql_type: SqlType,
    /// Whether NULL values are accepted.
    pub nullable: bool,
    /// Whether the column is the primary key.
    pub primary_key: bool,
    /// Whether the column auto-increments.
    pub identity: bool,
    /// Whether values must be unique.
    pub unique: bool,
    /// Default applied when an insert omits the column.
    pub default: Option<DefaultValue>,
}

impl ColumnDefinition {
    /// Creates a nullable column with no constraints.
    #[must_use]
    pub fn new(name: impl Into<String>, sql_type: SqlType) -> Self {
        Self {
            name: name.into(),
            sql_type,
            nullable: true,
            primary_key: false,
            identity: false,
            unique: false,
            default: None,
        }
    }

    /// Marks the column NOT NULL.
    #[must_use]
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Marks the column as the primary key.
    #[must_use]
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Marks the column as auto-incrementing.
    #[must_use]
    pub fn identity(mut self) -> Self {
        self.identity = true;
        self
    }

    /// Adds a unique constraint.
    #[must_use]
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Sets the column default.
    #[must_use]
    pub fn default_value(mut self, default: DefaultValue) -> Self {
        self.default = Some(default);
        self
    }
}
