//! schemaswift: Generate Swift `Codable` row structs and enums from a PostgreSQL schema
//!
//! This crate provides both a CLI tool and a library for generating one Swift
//! source file from a PostgreSQL schema. The schema comes from a
//! [`SchemaReader`](parser::SchemaReader): DDL parsed with `sqlparser-rs`, a
//! JSON snapshot, or any custom implementation. For every schema it generates:
//!
//! - `enum Name: String, Codable, CaseIterable` per enum type, with the
//!   database label as each case's raw value and `static let enumName`
//! - `struct Name: Codable` per table, with `static let tableName` and a
//!   `CodingKeys` enum mapping every field back to its column
//!
//! # Usage in build.rs
//!
//! ```rust,ignore
//! fn main() {
//!     schemaswift::CodegenBuilder::new("schema.sql")
//!         .output("Sources/Models/Schema.swift")
//!         .generate()
//!         .expect("Failed to generate Swift models");
//!
//!     println!("cargo:rerun-if-changed=schema.sql");
//! }
//! ```
//!
//! # Library usage
//!
//! ```rust
//! use schemaswift::codegen::{generate_source, EmitOptions};
//! use schemaswift::parser::{load_schema, parse_schema};
//!
//! let snapshot = parse_schema(
//!     "CREATE TABLE users (id INTEGER NOT NULL, created_at TIMESTAMP);",
//! ).unwrap();
//! let model = load_schema(&snapshot, "public").unwrap();
//! let swift = generate_source(&model, &EmitOptions::default()).unwrap();
//! assert!(swift.contains("struct User: Codable"));
//! assert!(swift.contains("case createdAt = \"created_at\""));
//! ```
//!
//! # CLI Usage
//!
//! ```bash
//! schemaswift --schema-file schema.sql --schema public -o Schema.swift
//! ```

pub mod codegen;
pub mod config;
pub mod error;
pub mod parser;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

pub use config::CodegenConfig;
pub use error::{CodegenError, Result};

use parser::{SchemaModel, SchemaSnapshot};

/// Main entry point for code generation
pub fn generate(config: &CodegenConfig) -> Result<()> {
    let source = generate_to_string(config)?;

    match &config.output {
        Some(path) => {
            info!("Writing {:?}", path);
            write_output(path, &source)?;
        }
        None => print!("{}", source),
    }

    info!("Code generation complete");
    Ok(())
}

/// Read the schema and render the Swift document without writing it anywhere
pub fn generate_to_string(config: &CodegenConfig) -> Result<String> {
    let model = read_schema(config)?;
    let options = config.emit_options();
    codegen::generate_source(&model, &options)
}

/// Load the configured schema source and apply the table filters
pub fn read_schema(config: &CodegenConfig) -> Result<SchemaModel> {
    let reader = open_reader(config)?;
    let model = parser::load_schema(&reader, &config.schema)?;
    info!(
        "Found {} enums and {} tables in schema `{}`",
        model.enums.len(),
        model.tables.len(),
        model.schema
    );

    let model = filter_tables(model, &config.include_tables, &config.exclude_tables);
    debug!(
        "After filtering: {} tables (include={}, exclude={})",
        model.tables.len(),
        config.include_tables,
        config.exclude_tables
    );
    Ok(model)
}

/// Build the snapshot reader for the configured DDL file or JSON snapshot
fn open_reader(config: &CodegenConfig) -> Result<SchemaSnapshot> {
    match (&config.schema_file, &config.snapshot_file) {
        (Some(schema_file), None) => {
            info!("Parsing schema: {:?}", schema_file);
            let schema_sql = std::fs::read_to_string(schema_file).map_err(|e| {
                CodegenError::SchemaIntrospection(format!(
                    "failed to read {}: {}",
                    schema_file.display(),
                    e
                ))
            })?;
            parser::parse_schema(&schema_sql)
        }
        (None, Some(snapshot_file)) => {
            info!("Loading snapshot: {:?}", snapshot_file);
            SchemaSnapshot::from_json_file(snapshot_file)
        }
        (None, None) => Err(CodegenError::ConfigError(
            "schema_file or snapshot_file is required".into(),
        )),
        (Some(_), Some(_)) => Err(CodegenError::ConfigError(
            "schema_file and snapshot_file are mutually exclusive".into(),
        )),
    }
}

/// Filter tables based on include/exclude patterns
fn filter_tables(mut model: SchemaModel, include: &str, exclude: &str) -> SchemaModel {
    let include_all = include.trim() == "*" || include.trim().is_empty();
    let include_set: HashSet<String> = if include_all {
        HashSet::new()
    } else {
        include.split(',').map(|s| s.trim().to_string()).collect()
    };
    let exclude_set: HashSet<String> = exclude
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    model.tables.retain(|t| {
        let name = &t.name;
        let included = include_all || include_set.contains(name);
        let excluded = exclude_set.contains(name);
        included && !excluded
    });
    model
}

/// Write the document next to its destination, then move it into place
fn write_output(path: &Path, source: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut tmp_name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    std::fs::write(&tmp_path, source)?;
    if let Err(e) = std::fs::rename(&tmp_path, path) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(e.into());
    }
    Ok(())
}

/// Builder pattern for easy configuration in build.rs
pub struct CodegenBuilder {
    config: CodegenConfig,
}

impl CodegenBuilder {
    /// Create a new builder reading the given DDL file
    pub fn new(schema_file: impl AsRef<Path>) -> Self {
        Self {
            config: CodegenConfig::default_with_schema(schema_file.as_ref().to_path_buf()),
        }
    }

    /// Create a new builder reading a JSON schema snapshot
    pub fn from_snapshot(snapshot_file: impl AsRef<Path>) -> Self {
        Self {
            config: CodegenConfig {
                snapshot_file: Some(snapshot_file.as_ref().to_path_buf()),
                ..Default::default()
            },
        }
    }

    /// Set the database schema (default "public")
    pub fn schema(mut self, schema: &str) -> Self {
        self.config.schema = schema.to_string();
        self
    }

    /// Set the output file (stdout when unset)
    pub fn output(mut self, path: impl AsRef<Path>) -> Self {
        self.config.output = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set tables to include
    pub fn include_tables(mut self, tables: &[&str]) -> Self {
        self.config.include_tables = tables.join(",");
        self
    }

    /// Set tables to exclude
    pub fn exclude_tables(mut self, tables: &[&str]) -> Self {
        self.config.exclude_tables = tables.join(",");
        self
    }

    /// Map unknown column types to `swift_type` instead of failing
    pub fn fallback_type(mut self, swift_type: &str) -> Self {
        self.config.unknown_types = codegen::UnknownTypePolicy::Fallback;
        self.config.fallback_type = swift_type.to_string();
        self
    }

    /// Add or replace a type mapping
    pub fn map_type(mut self, declared_type: &str, swift_type: &str) -> Self {
        self.config
            .type_overrides
            .insert(declared_type.to_string(), swift_type.to_string());
        self
    }

    /// Set the modules imported by the generated file
    pub fn imports(mut self, imports: &[&str]) -> Self {
        self.config.imports = imports.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Mark generated declarations `public`
    pub fn public(mut self) -> Self {
        self.config.access_level = codegen::AccessLevel::Public;
        self
    }

    /// Generate the code
    pub fn generate(self) -> Result<()> {
        generate(&self.config)
    }

    /// Generate the code and return it instead of writing it
    pub fn generate_to_string(self) -> Result<String> {
        generate_to_string(&self.config)
    }
}

/// Output path helper for build scripts: `$OUT_DIR/<file_name>`
pub fn out_dir_path(file_name: &str) -> Result<PathBuf> {
    std::env::var("OUT_DIR")
        .map(|dir| PathBuf::from(dir).join(file_name))
        .map_err(|_| {
            CodegenError::ConfigError("OUT_DIR not set - are you running from build.rs?".into())
        })
}
