//! Configuration settings for schemaswift

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::defaults;
use crate::codegen::{AccessLevel, EmitOptions, TypeMapper, UnknownTypePolicy};
use crate::error::{CodegenError, Result};

/// Main configuration struct for code generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodegenConfig {
    /// Path to a PostgreSQL DDL file
    #[serde(default)]
    pub schema_file: Option<PathBuf>,

    /// Path to a JSON schema snapshot (alternative to `schema_file`)
    #[serde(default)]
    pub snapshot_file: Option<PathBuf>,

    /// Database schema to generate models for
    #[serde(default = "default_schema")]
    pub schema: String,

    /// Output file; the document is printed to stdout when unset
    #[serde(default)]
    pub output: Option<PathBuf>,

    /// Tables to include (comma-separated, or "*" for all)
    #[serde(default = "default_include_tables")]
    pub include_tables: String,

    /// Tables to exclude (comma-separated)
    #[serde(default = "default_exclude_tables")]
    pub exclude_tables: String,

    /// What to do with column types that have no mapping
    #[serde(default)]
    pub unknown_types: UnknownTypePolicy,

    /// Swift type used when `unknown_types = "fallback"`
    #[serde(default = "default_fallback_type")]
    pub fallback_type: String,

    /// Extra or replacement type mappings (PostgreSQL type -> Swift type)
    #[serde(default)]
    pub type_overrides: BTreeMap<String, String>,

    /// Modules imported by the generated file
    #[serde(default = "default_imports")]
    pub imports: Vec<String>,

    /// Access level of generated declarations ("internal" or "public")
    #[serde(default)]
    pub access_level: AccessLevel,

    /// Log level (trace, debug, info, warn, error)
    /// Can be overridden by RUST_LOG env var
    #[serde(default)]
    pub log_level: Option<String>,
}

// Default value functions for serde
fn default_schema() -> String {
    defaults::SCHEMA.to_string()
}
fn default_include_tables() -> String {
    defaults::INCLUDE_TABLES.to_string()
}
fn default_exclude_tables() -> String {
    defaults::EXCLUDE_TABLES.to_string()
}
fn default_fallback_type() -> String {
    defaults::FALLBACK_TYPE.to_string()
}
fn default_imports() -> Vec<String> {
    defaults::IMPORTS.iter().map(|s| s.to_string()).collect()
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            schema_file: None,
            snapshot_file: None,
            schema: default_schema(),
            output: None,
            include_tables: default_include_tables(),
            exclude_tables: default_exclude_tables(),
            unknown_types: UnknownTypePolicy::default(),
            fallback_type: default_fallback_type(),
            type_overrides: BTreeMap::new(),
            imports: default_imports(),
            access_level: AccessLevel::default(),
            log_level: None,
        }
    }
}

impl CodegenConfig {
    /// Create a default config reading the given DDL file
    pub fn default_with_schema(schema_file: PathBuf) -> Self {
        Self {
            schema_file: Some(schema_file),
            ..Default::default()
        }
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: CodegenConfig = toml::from_str(&content).map_err(|e| {
            CodegenError::ConfigError(format!(
                "Failed to parse config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(config)
    }

    /// Load configuration using config-rs (file + environment variables)
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from config file if specified
        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path));
        } else {
            // Try default locations
            builder = builder.add_source(File::with_name("schemaswift").required(false));
        }

        // Override with environment variables (SCHEMASWIFT_*)
        builder = builder.add_source(
            Environment::with_prefix("SCHEMASWIFT")
                .prefix_separator("_")
                .separator("__"),
        );

        let config: CodegenConfig = builder.build()?.try_deserialize()?;

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let source = match (&self.schema_file, &self.snapshot_file) {
            (Some(path), None) | (None, Some(path)) => path,
            (None, None) => {
                return Err(CodegenError::ValidationError(
                    "schema_file or snapshot_file is required".into(),
                ));
            }
            (Some(_), Some(_)) => {
                return Err(CodegenError::ValidationError(
                    "schema_file and snapshot_file are mutually exclusive".into(),
                ));
            }
        };

        if !source.exists() {
            return Err(CodegenError::ValidationError(format!(
                "Schema source not found: {}",
                source.display()
            )));
        }

        if self.schema.trim().is_empty() {
            return Err(CodegenError::ValidationError("schema must not be empty".into()));
        }

        if self.unknown_types == UnknownTypePolicy::Fallback && self.fallback_type.trim().is_empty()
        {
            return Err(CodegenError::ValidationError(
                "fallback_type is required when unknown_types is \"fallback\"".into(),
            ));
        }

        if let Some((declared, _)) = self
            .type_overrides
            .iter()
            .find(|(declared, swift)| declared.trim().is_empty() || swift.trim().is_empty())
        {
            return Err(CodegenError::ValidationError(format!(
                "type_overrides entry `{}` must map a type name to a Swift type",
                declared
            )));
        }

        Ok(())
    }

    /// The type mapper described by this configuration
    pub fn type_mapper(&self) -> TypeMapper {
        TypeMapper::new()
            .with_overrides(&self.type_overrides)
            .with_policy(self.unknown_types, self.fallback_type.clone())
    }

    /// Emission options described by this configuration
    pub fn emit_options(&self) -> EmitOptions {
        EmitOptions {
            type_mapper: self.type_mapper(),
            imports: self.imports.clone(),
            access_level: self.access_level,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CodegenConfig::default();
        assert_eq!(config.schema, "public");
        assert_eq!(config.include_tables, "*");
        assert_eq!(config.unknown_types, UnknownTypePolicy::Error);
        assert_eq!(config.imports, vec!["Foundation"]);
        assert!(config.output.is_none());
        assert!(config.log_level.is_none());
    }

    #[test]
    fn test_validation_missing_schema() {
        let config = CodegenConfig::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_both_sources() {
        let config = CodegenConfig {
            schema_file: Some(PathBuf::from("schema.sql")),
            snapshot_file: Some(PathBuf::from("schema.json")),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("mutually exclusive"));
    }

    #[test]
    fn test_validation_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let schema = dir.path().join("schema.sql");
        std::fs::write(&schema, "CREATE TABLE t (id INT);").unwrap();

        let config = CodegenConfig::default_with_schema(schema);
        assert!(config.validate().is_ok());

        let config = CodegenConfig {
            unknown_types: UnknownTypePolicy::Fallback,
            fallback_type: " ".to_string(),
            ..config
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_toml() {
        let toml_content = r#"
            schema_file = "schema.sql"
            schema = "billing"
            log_level = "debug"
            unknown_types = "fallback"
            fallback_type = "AnyCodable"
            access_level = "public"
            imports = ["Foundation", "AnyCodable"]

            [type_overrides]
            geometry = "GeoJSON"
        "#;
        let config: CodegenConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.schema, "billing");
        assert_eq!(config.log_level, Some("debug".to_string()));
        assert_eq!(config.unknown_types, UnknownTypePolicy::Fallback);
        assert_eq!(config.access_level, AccessLevel::Public);
        assert_eq!(config.imports.len(), 2);

        let mapper = config.type_mapper();
        assert_eq!(mapper.lookup("GEOMETRY"), Some("GeoJSON"));
        assert_eq!(mapper.policy(), UnknownTypePolicy::Fallback);
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schemaswift.toml");
        std::fs::write(&path, "snapshot_file = \"model.json\"\n").unwrap();

        let config = CodegenConfig::from_file(&path).unwrap();
        assert_eq!(config.snapshot_file, Some(PathBuf::from("model.json")));
        assert_eq!(config.schema, "public");
    }
}
