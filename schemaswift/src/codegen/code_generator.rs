//! Main code generator: schema model -> declarations -> Swift source

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::debug;

use super::declarations::*;
use super::naming::{to_member_name, to_type_name};
use super::swift_writer::render_document;
use super::type_resolver::TypeMapper;
use crate::config::defaults;
use crate::error::{CodegenError, Result};
use crate::parser::{EnumTypeDefinition, SchemaModel, TableDefinition};

/// Static members generated on every enum; cases must not reuse them
const RESERVED_ENUM_MEMBERS: &[&str] = &["enumName", "allCases"];

/// Options for turning a schema model into Swift source
#[derive(Debug, Clone)]
pub struct EmitOptions {
    pub type_mapper: TypeMapper,
    pub imports: Vec<String>,
    pub access_level: AccessLevel,
    /// Timestamp written into the header
    pub generated_at: DateTime<Utc>,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            type_mapper: TypeMapper::new(),
            imports: defaults::IMPORTS.iter().map(|s| s.to_string()).collect(),
            access_level: AccessLevel::default(),
            generated_at: Utc::now(),
        }
    }
}

/// Generate the complete Swift source for a schema model
pub fn generate_source(model: &SchemaModel, options: &EmitOptions) -> Result<String> {
    let document = build_document(model, options)?;
    Ok(render_document(&document))
}

/// Build the declarations for every enum, then every table.
///
/// All naming, type resolution and collision checks happen here, so a
/// successful result always renders to a complete file.
pub fn build_document(model: &SchemaModel, options: &EmitOptions) -> Result<Document> {
    let mut type_names = NameScope::new("type names");
    for builtin in options.type_mapper.type_names() {
        type_names.reserve(&builtin, format!("built-in {}", builtin));
    }

    let mut declarations = Vec::with_capacity(model.enums.len() + model.tables.len());

    for enum_def in &model.enums {
        let decl = build_enum(enum_def)?;
        type_names.claim(&decl.type_name, &enum_def.name)?;
        debug!("Enum {} -> {}", enum_def.name, decl.type_name);
        declarations.push(Declaration::Enum(decl));
    }

    for table in &model.tables {
        let decl = build_record(table, &options.type_mapper)?;
        type_names.claim(&decl.type_name, &table.name)?;
        debug!("Table {} -> {}", table.name, decl.type_name);
        declarations.push(Declaration::Record(decl));
    }

    Ok(Document {
        header: Header {
            tool_name: defaults::TOOL_NAME.to_string(),
            tool_version: defaults::TOOL_VERSION.to_string(),
            generated_at: options.generated_at,
        },
        imports: options.imports.clone(),
        access_level: options.access_level,
        declarations,
    })
}

/// Build an enum declaration for a database enum type
fn build_enum(enum_def: &EnumTypeDefinition) -> Result<EnumDecl> {
    let mut case_names = NameScope::new(format!("enum `{}`", enum_def.name));
    for member in RESERVED_ENUM_MEMBERS {
        case_names.reserve(member, format!("generated {}", member));
    }

    let mut cases = Vec::with_capacity(enum_def.values.len());
    for value in &enum_def.values {
        let name = to_member_name(value);
        case_names.claim(&name, value)?;
        cases.push(EnumCase {
            name,
            raw_value: value.clone(),
        });
    }

    Ok(EnumDecl {
        type_name: to_type_name(&enum_def.name),
        raw_name: enum_def.name.clone(),
        cases,
    })
}

/// Build a record declaration for a table
fn build_record(table: &TableDefinition, type_mapper: &TypeMapper) -> Result<RecordDecl> {
    let mut field_names = NameScope::new(format!("table `{}`", table.name));

    let mut fields = Vec::with_capacity(table.columns.len());
    for column in &table.columns {
        let name = to_member_name(&column.name);
        field_names.claim(&name, &column.name)?;
        fields.push(Field {
            name,
            column_name: column.name.clone(),
            field_type: type_mapper.resolve(&table.name, column)?,
        });
    }

    Ok(RecordDecl {
        type_name: to_type_name(&table.name),
        raw_name: table.name.clone(),
        fields,
    })
}

/// Tracks generated identifiers within one Swift scope
struct NameScope {
    label: String,
    /// Generated identifier -> source name that produced it
    taken: HashMap<String, String>,
}

impl NameScope {
    fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            taken: HashMap::new(),
        }
    }

    fn reserve(&mut self, identifier: &str, origin: String) {
        self.taken.insert(identifier.to_string(), origin);
    }

    fn claim(&mut self, identifier: &str, origin: &str) -> Result<()> {
        if let Some(first) = self.taken.get(identifier) {
            return Err(CodegenError::IdentifierCollision {
                scope: self.label.clone(),
                identifier: identifier.to_string(),
                first: first.clone(),
                second: origin.to_string(),
            });
        }
        self.taken
            .insert(identifier.to_string(), origin.to_string());
        Ok(())
    }
}
