//! Intermediate representation of the generated Swift file

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::type_resolver::SwiftType;

/// Access modifier applied to generated declarations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    /// No modifier (Swift's implicit `internal`)
    #[default]
    Internal,
    Public,
}

impl AccessLevel {
    /// Prefix written before a declaration keyword
    pub fn prefix(&self) -> &'static str {
        match self {
            AccessLevel::Internal => "",
            AccessLevel::Public => "public ",
        }
    }
}

/// A complete generated document
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub header: Header,
    pub imports: Vec<String>,
    pub access_level: AccessLevel,
    /// Enum declarations first, then records
    pub declarations: Vec<Declaration>,
}

/// Generation banner at the top of the file
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    pub tool_name: String,
    pub tool_version: String,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    Enum(EnumDecl),
    Record(RecordDecl),
}

/// `enum Name: String, Codable, CaseIterable` for a database enum type
#[derive(Debug, Clone, PartialEq)]
pub struct EnumDecl {
    pub type_name: String,
    /// Enum type name as stored in the database
    pub raw_name: String,
    pub cases: Vec<EnumCase>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumCase {
    pub name: String,
    /// Label as stored in the database
    pub raw_value: String,
}

/// `struct Name: Codable` for a table row
#[derive(Debug, Clone, PartialEq)]
pub struct RecordDecl {
    pub type_name: String,
    /// Table name as stored in the database
    pub raw_name: String,
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    /// Column name as stored in the database
    pub column_name: String,
    pub field_type: SwiftType,
}

impl Document {
    pub fn enums(&self) -> impl Iterator<Item = &EnumDecl> {
        self.declarations.iter().filter_map(|decl| match decl {
            Declaration::Enum(e) => Some(e),
            Declaration::Record(_) => None,
        })
    }

    pub fn records(&self) -> impl Iterator<Item = &RecordDecl> {
        self.declarations.iter().filter_map(|decl| match decl {
            Declaration::Record(r) => Some(r),
            Declaration::Enum(_) => None,
        })
    }

    pub fn find_enum(&self, type_name: &str) -> Option<&EnumDecl> {
        self.enums().find(|e| e.type_name == type_name)
    }

    pub fn find_record(&self, type_name: &str) -> Option<&RecordDecl> {
        self.records().find(|r| r.type_name == type_name)
    }
}

impl Declaration {
    pub fn type_name(&self) -> &str {
        match self {
            Declaration::Enum(e) => &e.type_name,
            Declaration::Record(r) => &r.type_name,
        }
    }
}

impl EnumDecl {
    /// Database label for a generated case name
    pub fn raw_value_for(&self, case_name: &str) -> Option<&str> {
        self.cases
            .iter()
            .find(|c| c.name == case_name)
            .map(|c| c.raw_value.as_str())
    }
}

impl RecordDecl {
    /// Column name for a generated field name (the coding key mapping)
    pub fn column_for(&self, field_name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == field_name)
            .map(|f| f.column_name.as_str())
    }

    /// Field name to column name pairs, in column order
    pub fn coding_keys(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|f| (f.name.as_str(), f.column_name.as_str()))
    }
}
