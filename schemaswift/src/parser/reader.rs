//! Schema readers: the source of the schema model for a generation run

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::metadata::*;
use crate::error::{CodegenError, Result};

/// Supplies schema metadata for one generation run.
///
/// Implementations may talk to a live database, parse DDL, or serve a
/// pre-exported snapshot. Any failure is reported as
/// [`CodegenError::SchemaIntrospection`] and aborts the run.
pub trait SchemaReader {
    /// Enum types of `schema`, in declaration order
    fn fetch_enum_types(&self, schema: &str) -> Result<Vec<EnumTypeDefinition>>;

    /// Table names of `schema`, in declaration order
    fn fetch_table_names(&self, schema: &str) -> Result<Vec<String>>;

    /// Full definition of one table of `schema`
    fn fetch_table_definition(&self, schema: &str, table_name: &str) -> Result<TableDefinition>;
}

/// In-memory schema metadata for any number of schemas.
///
/// Produced by [`parse_schema`](super::parse_schema) from DDL, or
/// deserialized from a JSON export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaSnapshot {
    #[serde(default)]
    pub schemas: Vec<SchemaModel>,
}

impl SchemaSnapshot {
    /// Load a snapshot from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CodegenError::SchemaIntrospection(format!(
                "failed to read snapshot {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json(&content)
    }

    /// Parse a snapshot from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Get a schema by name
    pub fn get_schema(&self, name: &str) -> Option<&SchemaModel> {
        self.schemas.iter().find(|s| s.schema == name)
    }

    /// Get a schema by name, creating an empty one if missing
    pub fn schema_mut(&mut self, name: &str) -> &mut SchemaModel {
        let index = match self.schemas.iter().position(|s| s.schema == name) {
            Some(index) => index,
            None => {
                self.schemas.push(SchemaModel {
                    schema: name.to_string(),
                    ..Default::default()
                });
                self.schemas.len() - 1
            }
        };
        &mut self.schemas[index]
    }

    fn require_schema(&self, name: &str) -> Result<&SchemaModel> {
        self.get_schema(name).ok_or_else(|| {
            CodegenError::SchemaIntrospection(format!("schema `{}` does not exist", name))
        })
    }
}

impl SchemaReader for SchemaSnapshot {
    fn fetch_enum_types(&self, schema: &str) -> Result<Vec<EnumTypeDefinition>> {
        Ok(self.require_schema(schema)?.enums.clone())
    }

    fn fetch_table_names(&self, schema: &str) -> Result<Vec<String>> {
        Ok(self
            .require_schema(schema)?
            .tables
            .iter()
            .map(|t| t.name.clone())
            .collect())
    }

    fn fetch_table_definition(&self, schema: &str, table_name: &str) -> Result<TableDefinition> {
        self.require_schema(schema)?
            .get_table(table_name)
            .cloned()
            .ok_or_else(|| {
                CodegenError::SchemaIntrospection(format!(
                    "table `{}.{}` does not exist",
                    schema, table_name
                ))
            })
    }
}

/// Fetch a complete schema model through a reader and check its invariants
pub fn load_schema(reader: &dyn SchemaReader, schema: &str) -> Result<SchemaModel> {
    let enums = reader.fetch_enum_types(schema)?;
    let table_names = reader.fetch_table_names(schema)?;
    debug!(
        "Schema `{}`: {} enums, {} tables",
        schema,
        enums.len(),
        table_names.len()
    );

    let tables = table_names
        .iter()
        .map(|name| reader.fetch_table_definition(schema, name))
        .collect::<Result<Vec<_>>>()?;

    let model = SchemaModel {
        schema: schema.to_string(),
        enums,
        tables,
    };
    validate_model(&model)?;
    Ok(model)
}

/// Check the invariants every schema model must satisfy
pub fn validate_model(model: &SchemaModel) -> Result<()> {
    let mut enum_names = HashSet::new();
    for enum_def in &model.enums {
        require_non_empty(&enum_def.name, "enum type name")?;
        if !enum_names.insert(enum_def.name.as_str()) {
            return Err(invalid(format!("duplicate enum type `{}`", enum_def.name)));
        }
        for value in &enum_def.values {
            require_non_empty(value, "enum label")?;
        }
    }

    let mut table_names = HashSet::new();
    for table in &model.tables {
        require_non_empty(&table.name, "table name")?;
        if !table_names.insert(table.name.as_str()) {
            return Err(invalid(format!("duplicate table `{}`", table.name)));
        }

        let mut column_names = HashSet::new();
        for column in &table.columns {
            require_non_empty(&column.name, "column name")?;
            require_non_empty(&column.declared_type, "column type")?;
            if !column_names.insert(column.name.as_str()) {
                return Err(invalid(format!(
                    "duplicate column `{}` in table `{}`",
                    column.name, table.name
                )));
            }
            if let Some(enum_name) = &column.enum_type {
                if model.get_enum(enum_name).is_none() {
                    return Err(invalid(format!(
                        "column `{}.{}` references unknown enum `{}`",
                        table.name, column.name, enum_name
                    )));
                }
            }
        }
    }

    Ok(())
}

fn require_non_empty(value: &str, what: &str) -> Result<()> {
    if value.is_empty() {
        return Err(invalid(format!("empty {}", what)));
    }
    Ok(())
}

fn invalid(message: String) -> CodegenError {
    CodegenError::SchemaIntrospection(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> SchemaSnapshot {
        SchemaSnapshot {
            schemas: vec![SchemaModel {
                schema: "public".to_string(),
                enums: vec![EnumTypeDefinition::new("mood", ["sad", "happy"])],
                tables: vec![
                    TableDefinition::new(
                        "people",
                        vec![
                            ColumnDefinition::new("id", "integer", false),
                            ColumnDefinition::new("mood", "mood", true).with_enum("mood"),
                        ],
                    ),
                    TableDefinition::new("pets", vec![ColumnDefinition::new("id", "int8", false)]),
                ],
            }],
        }
    }

    #[test]
    fn test_load_schema_preserves_order() {
        let model = load_schema(&snapshot(), "public").unwrap();
        assert_eq!(model.schema, "public");
        assert_eq!(model.enums[0].values, vec!["sad", "happy"]);
        let names: Vec<&str> = model.tables.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["people", "pets"]);
    }

    #[test]
    fn test_unknown_schema_is_introspection_error() {
        let err = load_schema(&snapshot(), "audit").unwrap_err();
        assert!(matches!(err, CodegenError::SchemaIntrospection(_)));
    }

    #[test]
    fn test_unknown_table() {
        let err = snapshot()
            .fetch_table_definition("public", "missing")
            .unwrap_err();
        assert!(err.to_string().contains("public.missing"));
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let mut snap = snapshot();
        snap.schemas[0].tables[1]
            .columns
            .push(ColumnDefinition::new("id", "int8", false));
        let err = load_schema(&snap, "public").unwrap_err();
        assert!(err.to_string().contains("duplicate column `id`"));
    }

    #[test]
    fn test_dangling_enum_reference_rejected() {
        let mut snap = snapshot();
        snap.schemas[0].enums.clear();
        assert!(load_schema(&snap, "public").is_err());
    }

    #[test]
    fn test_snapshot_from_json() {
        let json = r#"{
            "schemas": [{
                "schema": "public",
                "enums": [{ "name": "order_status", "values": ["pending", "shipped"] }],
                "tables": [{
                    "name": "orders",
                    "columns": [
                        { "name": "id", "declared_type": "bigint", "is_nullable": false },
                        { "name": "status", "declared_type": "order_status", "is_nullable": false, "enum_type": "order_status" }
                    ]
                }]
            }]
        }"#;
        let snap = SchemaSnapshot::from_json(json).unwrap();
        let model = load_schema(&snap, "public").unwrap();
        assert_eq!(model.tables[0].columns[1].enum_type.as_deref(), Some("order_status"));
    }

    #[test]
    fn test_malformed_json_is_introspection_error() {
        let err = SchemaSnapshot::from_json("{ not json").unwrap_err();
        assert!(matches!(err, CodegenError::SchemaIntrospection(_)));
    }
}
