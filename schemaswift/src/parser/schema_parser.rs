//! PostgreSQL DDL parser using sqlparser-rs

use sqlparser::ast::{
    ColumnOption, Expr, Ident, IndexColumn, ObjectName, PrimaryKeyConstraint, Statement,
    TableConstraint, UserDefinedTypeRepresentation,
};
use sqlparser::dialect::PostgreSqlDialect;
use sqlparser::parser::Parser;
use tracing::debug;

use super::metadata::*;
use super::reader::SchemaSnapshot;
use crate::config::defaults;
use crate::error::Result;

/// Pseudo-types backed by a sequence; PostgreSQL adds NOT NULL to them
const SERIAL_TYPES: &[&str] = &[
    "smallserial",
    "serial2",
    "serial",
    "serial4",
    "bigserial",
    "serial8",
];

/// Parse PostgreSQL DDL into a schema snapshot.
///
/// Recognizes `CREATE TYPE ... AS ENUM (...)` and `CREATE TABLE` statements;
/// everything else is ignored. Objects without a schema qualifier belong to
/// the `public` schema.
pub fn parse_schema(sql: &str) -> Result<SchemaSnapshot> {
    let dialect = PostgreSqlDialect {};
    let statements = Parser::parse_sql(&dialect, sql)?;

    let mut snapshot = SchemaSnapshot::default();

    for stmt in statements {
        match stmt {
            Statement::CreateType {
                name,
                representation,
                ..
            } => {
                let representation: Option<UserDefinedTypeRepresentation> = representation.into();
                if let Some(UserDefinedTypeRepresentation::Enum { labels }) = representation {
                    let (schema, type_name) = split_object_name(&name);
                    debug!("Found enum {}.{} ({} labels)", schema, type_name, labels.len());
                    snapshot.schema_mut(&schema).enums.push(EnumTypeDefinition {
                        name: type_name,
                        values: labels.into_iter().map(|label| label.value).collect(),
                    });
                }
            }
            Statement::CreateTable(create_table) => {
                let (schema, table) = extract_table_definition(&create_table);
                debug!("Found table {}.{}", schema, table.name);
                snapshot.schema_mut(&schema).tables.push(table);
            }
            _ => {}
        }
    }

    for model in &mut snapshot.schemas {
        resolve_enum_references(model);
    }

    Ok(snapshot)
}

/// Extract the table definition (and its schema) from a CREATE TABLE statement
fn extract_table_definition(create: &sqlparser::ast::CreateTable) -> (String, TableDefinition) {
    let (schema, name) = split_object_name(&create.name);

    let mut columns: Vec<ColumnDefinition> =
        create.columns.iter().map(extract_column_definition).collect();

    // Table-level PRIMARY KEY makes its columns non-nullable
    for constraint in &create.constraints {
        if let TableConstraint::PrimaryKey(PrimaryKeyConstraint {
            columns: pk_cols, ..
        }) = constraint
        {
            for pk_col in pk_cols {
                let col_name = extract_ident_from_index_column(pk_col);
                if let Some(col) = columns.iter_mut().find(|c| c.name == col_name) {
                    col.is_nullable = false;
                }
            }
        }
    }

    (schema, TableDefinition { name, columns })
}

/// Extract column metadata from a column definition
fn extract_column_definition(col_def: &sqlparser::ast::ColumnDef) -> ColumnDefinition {
    let name = ident_name(&col_def.name);
    let declared_type = col_def.data_type.to_string();

    // Serial types imply NOT NULL
    let mut is_nullable = !is_serial_type(&declared_type);

    for option in &col_def.options {
        match &option.option {
            ColumnOption::NotNull => {
                is_nullable = false;
            }
            ColumnOption::Null => {
                is_nullable = true;
            }
            ColumnOption::PrimaryKey(_) => {
                is_nullable = false;
            }
            // GENERATED { ALWAYS | BY DEFAULT } AS IDENTITY
            ColumnOption::Identity(_)
            | ColumnOption::Generated {
                generation_expr: None,
                ..
            } => {
                is_nullable = false;
            }
            _ => {}
        }
    }

    ColumnDefinition {
        name,
        declared_type,
        is_nullable,
        enum_type: None,
    }
}

fn is_serial_type(declared_type: &str) -> bool {
    SERIAL_TYPES.contains(&declared_type.trim().to_lowercase().as_str())
}

/// Link columns whose type (or array element type) is one of the schema's enums
fn resolve_enum_references(model: &mut SchemaModel) {
    let enum_names: Vec<String> = model.enums.iter().map(|e| e.name.clone()).collect();
    for table in &mut model.tables {
        for column in &mut table.columns {
            let element = element_type_name(&column.declared_type);
            if let Some(enum_name) = enum_names.iter().find(|name| **name == element) {
                column.enum_type = Some(enum_name.clone());
            }
        }
    }
}

/// Name of the innermost type: array brackets, schema qualifier and quotes removed.
/// Unquoted names are folded to lowercase like PostgreSQL does.
pub(crate) fn element_type_name(declared_type: &str) -> String {
    let mut base = declared_type.trim();
    while let Some(stripped) = base.strip_suffix(']') {
        match stripped.rfind('[') {
            Some(open) => base = stripped[..open].trim_end(),
            None => break,
        }
    }

    if let Some(inner) = base.strip_suffix('"') {
        if let Some(open) = inner.rfind('"') {
            return inner[open + 1..].to_string();
        }
    }

    base.rsplit('.').next().unwrap_or(base).to_lowercase()
}

/// Split an ObjectName into (schema, object), defaulting the schema
fn split_object_name(name: &ObjectName) -> (String, String) {
    let parts: Vec<String> = name
        .0
        .iter()
        .filter_map(|part| part.as_ident())
        .map(ident_name)
        .collect();

    match parts.as_slice() {
        [.., schema, object] => (schema.clone(), object.clone()),
        [object] => (defaults::SCHEMA.to_string(), object.clone()),
        [] => (defaults::SCHEMA.to_string(), String::new()),
    }
}

/// Identifier as PostgreSQL stores it: unquoted names fold to lowercase
fn ident_name(ident: &Ident) -> String {
    match ident.quote_style {
        Some(_) => ident.value.clone(),
        None => ident.value.to_lowercase(),
    }
}

/// Extract a column name string from an IndexColumn
fn extract_ident_from_index_column(ic: &IndexColumn) -> String {
    match &ic.column.expr {
        Expr::Identifier(ident) => ident_name(ident),
        other => format!("{}", other),
    }
}
