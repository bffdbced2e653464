//! Default configuration values - single source of truth

/// Default database schema to generate models for
pub const SCHEMA: &str = "public";

/// Default include tables pattern (all tables)
pub const INCLUDE_TABLES: &str = "*";

/// Default exclude tables pattern (none)
pub const EXCLUDE_TABLES: &str = "";

/// Swift type used for unknown column types when the fallback policy is enabled
pub const FALLBACK_TYPE: &str = "String";

/// Modules imported at the top of the generated file
pub const IMPORTS: &[&str] = &["Foundation"];

/// Name reported in the generated file header
pub const TOOL_NAME: &str = env!("CARGO_PKG_NAME");

/// Version reported in the generated file header
pub const TOOL_VERSION: &str = env!("CARGO_PKG_VERSION");
