//! PostgreSQL to Swift type mapping

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::naming;
use crate::config::defaults;
use crate::error::{CodegenError, Result};
use crate::parser::ColumnDefinition;

/// Built-in mapping from normalized PostgreSQL type names to Swift types
const BUILTIN_TYPES: &[(&str, &str)] = &[
    // Integers
    ("smallint", "Int16"),
    ("int2", "Int16"),
    ("smallserial", "Int16"),
    ("serial2", "Int16"),
    ("integer", "Int"),
    ("int", "Int"),
    ("int4", "Int"),
    ("serial", "Int"),
    ("serial4", "Int"),
    ("bigint", "Int64"),
    ("int8", "Int64"),
    ("bigserial", "Int64"),
    ("serial8", "Int64"),
    // Floating point
    ("real", "Float"),
    ("float4", "Float"),
    ("double precision", "Double"),
    ("float8", "Double"),
    ("float", "Double"),
    ("numeric", "Decimal"),
    ("decimal", "Decimal"),
    ("money", "Decimal"),
    // Boolean
    ("boolean", "Bool"),
    ("bool", "Bool"),
    // Text
    ("text", "String"),
    ("varchar", "String"),
    ("character varying", "String"),
    ("char", "String"),
    ("character", "String"),
    ("bpchar", "String"),
    ("name", "String"),
    ("citext", "String"),
    // Date/time
    ("date", "Date"),
    ("timestamp", "Date"),
    ("timestamptz", "Date"),
    ("timestamp without time zone", "Date"),
    ("timestamp with time zone", "Date"),
    ("time", "String"),
    ("timetz", "String"),
    ("time without time zone", "String"),
    ("time with time zone", "String"),
    ("interval", "String"),
    // Identifiers
    ("uuid", "UUID"),
    // JSON and binary
    ("json", "Data"),
    ("jsonb", "Data"),
    ("bytea", "Data"),
    // Network and documents
    ("inet", "String"),
    ("cidr", "String"),
    ("macaddr", "String"),
    ("xml", "String"),
];

/// Represents a Swift type for code generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwiftType {
    /// Type taken from the mapping table (e.g. `Int`, `Date`)
    Named(String),
    /// Generated enum type
    Enum(String),
    /// Sequence wrapper
    Array(Box<SwiftType>),
    /// Optional wrapper
    Optional(Box<SwiftType>),
}

impl SwiftType {
    /// Get the type string for code generation
    pub fn to_type_string(&self) -> String {
        match self {
            SwiftType::Named(name) => name.clone(),
            SwiftType::Enum(name) => naming::escape_identifier(name),
            SwiftType::Array(inner) => format!("[{}]", inner.to_type_string()),
            SwiftType::Optional(inner) => format!("{}?", inner.to_type_string()),
        }
    }

    /// Get the inner type if this is an Optional
    pub fn inner_type(&self) -> &SwiftType {
        match self {
            SwiftType::Optional(inner) => inner,
            _ => self,
        }
    }

    /// Check if this is an Optional type
    pub fn is_optional(&self) -> bool {
        matches!(self, SwiftType::Optional(_))
    }
}

/// What to do with a declared type that has no mapping
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownTypePolicy {
    /// Abort generation with [`CodegenError::UnsupportedType`]
    #[default]
    Error,
    /// Use the configured fallback type and log a warning
    Fallback,
}

/// Resolves column types through a data-driven mapping table
#[derive(Debug, Clone)]
pub struct TypeMapper {
    mappings: HashMap<String, String>,
    policy: UnknownTypePolicy,
    fallback_type: String,
}

impl Default for TypeMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeMapper {
    /// Mapper with the built-in PostgreSQL table that rejects unknown types
    pub fn new() -> Self {
        Self {
            mappings: BUILTIN_TYPES
                .iter()
                .map(|(pg, swift)| (pg.to_string(), swift.to_string()))
                .collect(),
            policy: UnknownTypePolicy::Error,
            fallback_type: defaults::FALLBACK_TYPE.to_string(),
        }
    }

    /// Add or replace mappings; keys are normalized like declared types
    pub fn with_overrides<I, K, V>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        for (declared, swift) in overrides {
            self.mappings
                .insert(normalize_type_name(declared.as_ref()), swift.into());
        }
        self
    }

    /// Map unknown types to `fallback_type` instead of failing
    pub fn with_fallback(mut self, fallback_type: impl Into<String>) -> Self {
        self.policy = UnknownTypePolicy::Fallback;
        self.fallback_type = fallback_type.into();
        self
    }

    /// Set the unknown-type policy explicitly
    pub fn with_policy(
        mut self,
        policy: UnknownTypePolicy,
        fallback_type: impl Into<String>,
    ) -> Self {
        self.policy = policy;
        self.fallback_type = fallback_type.into();
        self
    }

    pub fn policy(&self) -> UnknownTypePolicy {
        self.policy
    }

    /// Look up the Swift type for a declared (non-array, non-enum) type
    pub fn lookup(&self, declared_type: &str) -> Option<&str> {
        self.mappings
            .get(&normalize_type_name(declared_type))
            .map(String::as_str)
    }

    /// Every Swift type name this mapper can emit from its table
    pub fn type_names(&self) -> BTreeSet<String> {
        let mut names: BTreeSet<String> = self.mappings.values().cloned().collect();
        if self.policy == UnknownTypePolicy::Fallback {
            names.insert(self.fallback_type.clone());
        }
        names
    }

    /// Get the Swift type for a column of `table`
    pub fn resolve(&self, table: &str, column: &ColumnDefinition) -> Result<SwiftType> {
        let normalized = normalize_type_name(&column.declared_type);
        let base_type = self.resolve_base_type(table, column, &normalized)?;

        if column.is_nullable {
            Ok(SwiftType::Optional(Box::new(base_type)))
        } else {
            Ok(base_type)
        }
    }

    /// Resolve the base type (without Optional wrapper)
    fn resolve_base_type(
        &self,
        table: &str,
        column: &ColumnDefinition,
        normalized: &str,
    ) -> Result<SwiftType> {
        if let Some(element) = self.array_element(normalized) {
            let element_type = self.resolve_base_type(table, column, element)?;
            return Ok(SwiftType::Array(Box::new(element_type)));
        }

        // Enum references apply to the innermost element
        if let Some(enum_name) = &column.enum_type {
            return Ok(SwiftType::Enum(naming::to_type_name(enum_name)));
        }

        if let Some(swift) = self.mappings.get(normalized) {
            return Ok(SwiftType::Named(swift.clone()));
        }

        match self.policy {
            UnknownTypePolicy::Error => Err(CodegenError::UnsupportedType {
                table: table.to_string(),
                column: column.name.clone(),
                declared_type: column.declared_type.clone(),
            }),
            UnknownTypePolicy::Fallback => {
                warn!(
                    "No mapping for type `{}` of column `{}.{}`, using {}",
                    column.declared_type, table, column.name, self.fallback_type
                );
                Ok(SwiftType::Named(self.fallback_type.clone()))
            }
        }
    }

    /// Element type of an array type: `integer[]` or the internal `_int4`
    fn array_element<'a>(&self, normalized: &'a str) -> Option<&'a str> {
        if let Some(stripped) = normalized.strip_suffix(']') {
            return stripped.rfind('[').map(|open| stripped[..open].trim_end());
        }
        match normalized.strip_prefix('_') {
            Some(element) if !element.is_empty() && !self.mappings.contains_key(normalized) => {
                Some(element)
            }
            _ => None,
        }
    }
}

/// Normalize a declared type for lookup: lowercase, modifiers such as `(255)`
/// removed, whitespace collapsed and any schema qualifier dropped.
pub fn normalize_type_name(declared_type: &str) -> String {
    let mut stripped = String::with_capacity(declared_type.len());
    let mut depth = 0usize;
    for c in declared_type.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ if depth == 0 => stripped.push(c.to_ascii_lowercase()),
            _ => {}
        }
    }

    let collapsed = stripped
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace(" [", "[");

    let name_end = collapsed.find('[').unwrap_or(collapsed.len());
    match collapsed[..name_end].rfind('.') {
        Some(dot) => collapsed[dot + 1..].to_string(),
        None => collapsed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_column(name: &str, declared_type: &str, nullable: bool) -> ColumnDefinition {
        ColumnDefinition::new(name, declared_type, nullable)
    }

    #[test]
    fn test_integer_types() {
        let mapper = TypeMapper::new();
        let col = make_column("id", "integer", false);
        assert_eq!(
            mapper.resolve("users", &col).unwrap(),
            SwiftType::Named("Int".into())
        );

        let col = make_column("id", "BIGINT", false);
        assert_eq!(
            mapper.resolve("users", &col).unwrap(),
            SwiftType::Named("Int64".into())
        );

        let col = make_column("rank", "int2", false);
        assert_eq!(mapper.resolve("users", &col).unwrap().to_type_string(), "Int16");
    }

    #[test]
    fn test_text_and_modifiers() {
        let mapper = TypeMapper::new();
        let col = make_column("name", "VARCHAR(255)", false);
        assert_eq!(mapper.resolve("users", &col).unwrap().to_type_string(), "String");

        let col = make_column("code", "character varying(20)", false);
        assert_eq!(mapper.resolve("users", &col).unwrap().to_type_string(), "String");

        let col = make_column("price", "NUMERIC(10, 2)", false);
        assert_eq!(mapper.resolve("users", &col).unwrap().to_type_string(), "Decimal");
    }

    #[test]
    fn test_datetime_types() {
        let mapper = TypeMapper::new();
        for declared in [
            "timestamp",
            "TIMESTAMP WITH TIME ZONE",
            "timestamptz",
            "timestamp(3) without time zone",
            "date",
        ] {
            let col = make_column("at", declared, false);
            assert_eq!(mapper.resolve("t", &col).unwrap().to_type_string(), "Date");
        }
    }

    #[test]
    fn test_other_categories() {
        let mapper = TypeMapper::new();
        let cases = [
            ("boolean", "Bool"),
            ("double precision", "Double"),
            ("real", "Float"),
            ("uuid", "UUID"),
            ("jsonb", "Data"),
            ("bytea", "Data"),
            ("pg_catalog.int4", "Int"),
        ];
        for (declared, expected) in cases {
            let col = make_column("c", declared, false);
            assert_eq!(mapper.resolve("t", &col).unwrap().to_type_string(), expected);
        }
    }

    #[test]
    fn test_nullable() {
        let mapper = TypeMapper::new();
        let col = make_column("created_at", "timestamp", true);
        let resolved = mapper.resolve("users", &col).unwrap();
        assert!(resolved.is_optional());
        assert_eq!(resolved.inner_type(), &SwiftType::Named("Date".into()));
        assert_eq!(resolved.to_type_string(), "Date?");
    }

    #[test]
    fn test_array_types() {
        let mapper = TypeMapper::new();
        let col = make_column("tags", "TEXT[]", false);
        assert_eq!(mapper.resolve("posts", &col).unwrap().to_type_string(), "[String]");

        let col = make_column("scores", "_int4", true);
        assert_eq!(mapper.resolve("posts", &col).unwrap().to_type_string(), "[Int]?");

        let col = make_column("grid", "integer[][]", false);
        assert_eq!(mapper.resolve("posts", &col).unwrap().to_type_string(), "[[Int]]");
    }

    #[test]
    fn test_enum_type() {
        let mapper = TypeMapper::new();
        let col = make_column("status", "order_status", false).with_enum("order_status");
        assert_eq!(
            mapper.resolve("orders", &col).unwrap(),
            SwiftType::Enum("OrderStatus".to_string())
        );

        let col = make_column("history", "order_status[]", true).with_enum("order_status");
        assert_eq!(
            mapper.resolve("orders", &col).unwrap().to_type_string(),
            "[OrderStatus]?"
        );
    }

    #[test]
    fn test_unknown_type_fails_by_default() {
        let mapper = TypeMapper::new();
        let col = make_column("area", "geometry", false);
        match mapper.resolve("parcels", &col).unwrap_err() {
            CodegenError::UnsupportedType {
                table,
                column,
                declared_type,
            } => {
                assert_eq!(table, "parcels");
                assert_eq!(column, "area");
                assert_eq!(declared_type, "geometry");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unknown_type_fallback() {
        let mapper = TypeMapper::new().with_fallback("String");
        let col = make_column("area", "geometry", true);
        assert_eq!(mapper.resolve("parcels", &col).unwrap().to_type_string(), "String?");
        assert!(mapper.type_names().contains("String"));
    }

    #[test]
    fn test_overrides() {
        let mapper = TypeMapper::new().with_overrides([("GEOMETRY", "GeoJSON"), ("int8", "Int")]);
        let col = make_column("area", "geometry", false);
        assert_eq!(mapper.resolve("parcels", &col).unwrap().to_type_string(), "GeoJSON");
        assert_eq!(mapper.lookup("bigint"), Some("Int64"));
        assert_eq!(mapper.lookup("int8"), Some("Int"));
    }

    #[test]
    fn test_normalize_type_name() {
        assert_eq!(normalize_type_name("  VARCHAR(255) "), "varchar");
        assert_eq!(
            normalize_type_name("TIMESTAMP(6)   WITH TIME ZONE"),
            "timestamp with time zone"
        );
        assert_eq!(normalize_type_name("public.order_status[]"), "order_status[]");
        assert_eq!(normalize_type_name("numeric(10,2) []"), "numeric[]");
    }

    #[test]
    fn test_type_string() {
        assert_eq!(SwiftType::Named("Int".into()).to_type_string(), "Int");
        assert_eq!(
            SwiftType::Optional(Box::new(SwiftType::Array(Box::new(SwiftType::Enum(
                "Mood".into()
            )))))
            .to_type_string(),
            "[Mood]?"
        );
    }

    #[test]
    fn test_keyword_enum_type_is_escaped() {
        assert_eq!(SwiftType::Enum("Type".into()).to_type_string(), "`Type`");
        assert_eq!(
            SwiftType::Optional(Box::new(SwiftType::Enum("Protocol".into()))).to_type_string(),
            "`Protocol`?"
        );
    }
}
