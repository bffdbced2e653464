//! Swift formatter - renders declarations to source text

use chrono::SecondsFormat;

use super::declarations::*;
use super::naming::escape_identifier;

const INDENT: &str = "    ";

/// Render a document to Swift source
pub fn render_document(document: &Document) -> String {
    let mut code = String::new();

    code.push_str(&render_header(&document.header));

    if !document.imports.is_empty() {
        for import in &document.imports {
            code.push_str(&format!("import {}\n", import));
        }
        code.push('\n');
    }

    let blocks: Vec<String> = document
        .declarations
        .iter()
        .map(|decl| render_declaration(decl, document.access_level))
        .collect();
    code.push_str(&blocks.join("\n"));

    code
}

/// Render one enum or struct declaration
pub fn render_declaration(declaration: &Declaration, access: AccessLevel) -> String {
    match declaration {
        Declaration::Enum(decl) => render_enum(decl, access),
        Declaration::Record(decl) => render_record(decl, access),
    }
}

fn render_header(header: &Header) -> String {
    let mut code = String::new();
    code.push_str("/**\n");
    code.push_str(&format!(
        " * AUTO-GENERATED FILE - {} - DO NOT EDIT!\n",
        header
            .generated_at
            .to_rfc3339_opts(SecondsFormat::Secs, true)
    ));
    code.push_str(" *\n");
    code.push_str(&format!(
        " * This file was automatically generated by {} {}\n",
        header.tool_name, header.tool_version
    ));
    code.push_str(" *\n");
    code.push_str(" */\n\n");
    code
}

fn render_enum(decl: &EnumDecl, access: AccessLevel) -> String {
    let mut code = String::new();

    // A raw type needs at least one case
    let conformances = if decl.cases.is_empty() {
        "Codable, CaseIterable"
    } else {
        "String, Codable, CaseIterable"
    };

    code.push_str(&format!(
        "{}enum {}: {} {{\n",
        access.prefix(),
        escape_identifier(&decl.type_name),
        conformances
    ));
    code.push_str(&format!(
        "{}{}static let enumName = {}\n",
        INDENT,
        access.prefix(),
        swift_string_literal(&decl.raw_name)
    ));

    if !decl.cases.is_empty() {
        code.push('\n');
        for case in &decl.cases {
            code.push_str(&format!(
                "{}case {} = {}\n",
                INDENT,
                escape_identifier(&case.name),
                swift_string_literal(&case.raw_value)
            ));
        }
    }

    code.push_str("}\n");
    code
}

fn render_record(decl: &RecordDecl, access: AccessLevel) -> String {
    let mut code = String::new();

    code.push_str(&format!(
        "{}struct {}: Codable {{\n",
        access.prefix(),
        escape_identifier(&decl.type_name)
    ));
    code.push_str(&format!(
        "{}{}static let tableName = {}\n",
        INDENT,
        access.prefix(),
        swift_string_literal(&decl.raw_name)
    ));

    if !decl.fields.is_empty() {
        code.push('\n');
        for field in &decl.fields {
            code.push_str(&format!(
                "{}{}let {}: {}\n",
                INDENT,
                access.prefix(),
                escape_identifier(&field.name),
                field.field_type.to_type_string()
            ));
        }

        code.push('\n');
        code.push_str(&format!("{}enum CodingKeys: String, CodingKey {{\n", INDENT));
        for (field_name, column_name) in decl.coding_keys() {
            code.push_str(&format!(
                "{}{}case {} = {}\n",
                INDENT,
                INDENT,
                escape_identifier(field_name),
                swift_string_literal(column_name)
            ));
        }
        code.push_str(&format!("{}}}\n", INDENT));
    }

    code.push_str("}\n");
    code
}

/// Quote a value as a Swift string literal
pub fn swift_string_literal(value: &str) -> String {
    let mut literal = String::with_capacity(value.len() + 2);
    literal.push('"');
    for c in value.chars() {
        match c {
            '\\' => literal.push_str("\\\\"),
            '"' => literal.push_str("\\\""),
            '\n' => literal.push_str("\\n"),
            '\r' => literal.push_str("\\r"),
            '\t' => literal.push_str("\\t"),
            '\0' => literal.push_str("\\0"),
            c if c.is_control() => literal.push_str(&format!("\\u{{{:x}}}", c as u32)),
            c => literal.push(c),
        }
    }
    literal.push('"');
    literal
}
