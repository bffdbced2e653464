//! Error types for schemaswift

use thiserror::Error;

/// Result type alias for schemaswift operations
pub type Result<T> = std::result::Result<T, CodegenError>;

/// Errors that can occur during code generation
#[derive(Error, Debug)]
pub enum CodegenError {
    /// The schema reader could not produce a schema model
    #[error("Schema introspection failed: {0}")]
    SchemaIntrospection(String),

    /// A declared column type has no mapping and no fallback is configured
    #[error("Unsupported type `{declared_type}` for column `{table}.{column}`")]
    UnsupportedType {
        table: String,
        column: String,
        declared_type: String,
    },

    /// Two distinct source names produce the same generated identifier
    #[error(
        "Identifier collision in {scope}: `{first}` and `{second}` both generate `{identifier}`"
    )]
    IdentifierCollision {
        scope: String,
        identifier: String,
        first: String,
        second: String,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<sqlparser::parser::ParserError> for CodegenError {
    fn from(err: sqlparser::parser::ParserError) -> Self {
        CodegenError::SchemaIntrospection(format!("failed to parse SQL schema: {}", err))
    }
}

impl From<sqlparser::tokenizer::TokenizerError> for CodegenError {
    fn from(err: sqlparser::tokenizer::TokenizerError) -> Self {
        CodegenError::SchemaIntrospection(format!("failed to tokenize SQL schema: {}", err))
    }
}

impl From<serde_json::Error> for CodegenError {
    fn from(err: serde_json::Error) -> Self {
        CodegenError::SchemaIntrospection(format!("failed to read schema snapshot: {}", err))
    }
}

impl From<config::ConfigError> for CodegenError {
    fn from(err: config::ConfigError) -> Self {
        CodegenError::ConfigError(err.to_string())
    }
}
