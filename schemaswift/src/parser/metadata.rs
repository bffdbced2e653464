//! Schema model: enums, tables and columns as read from the database

use serde::{Deserialize, Serialize};

/// A database enum type (`CREATE TYPE ... AS ENUM`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumTypeDefinition {
    /// Enum type name, unique within its schema
    pub name: String,

    /// Labels in declaration order
    pub values: Vec<String>,
}

/// Metadata for a column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    /// Column name
    pub name: String,

    /// Data type as declared (e.g., "integer", "VARCHAR(255)", "order_status[]")
    pub declared_type: String,

    /// Whether the column is nullable
    pub is_nullable: bool,

    /// Name of the enum type this column (or its array element) refers to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enum_type: Option<String>,
}

/// Metadata for a database table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDefinition {
    /// Table name
    pub name: String,

    /// Columns in declaration order
    pub columns: Vec<ColumnDefinition>,
}

/// Everything fetched from one schema for a single generation run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaModel {
    /// Schema name (e.g. "public")
    pub schema: String,

    #[serde(default)]
    pub enums: Vec<EnumTypeDefinition>,

    #[serde(default)]
    pub tables: Vec<TableDefinition>,
}

impl EnumTypeDefinition {
    pub fn new<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

impl ColumnDefinition {
    pub fn new(
        name: impl Into<String>,
        declared_type: impl Into<String>,
        is_nullable: bool,
    ) -> Self {
        Self {
            name: name.into(),
            declared_type: declared_type.into(),
            is_nullable,
            enum_type: None,
        }
    }

    /// Attach an enum reference
    pub fn with_enum(mut self, enum_name: impl Into<String>) -> Self {
        self.enum_type = Some(enum_name.into());
        self
    }
}

impl TableDefinition {
    pub fn new(name: impl Into<String>, columns: Vec<ColumnDefinition>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }

    /// Get a column by name
    pub fn get_column(&self, name: &str) -> Option<&ColumnDefinition> {
        self.columns.iter().find(|c| c.name == name)
    }
}

impl SchemaModel {
    /// Get an enum type by name
    pub fn get_enum(&self, name: &str) -> Option<&EnumTypeDefinition> {
        self.enums.iter().find(|e| e.name == name)
    }

    /// Get a table by name
    pub fn get_table(&self, name: &str) -> Option<&TableDefinition> {
        self.tables.iter().find(|t| t.name == name)
    }
}
