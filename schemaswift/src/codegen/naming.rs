//! Naming utilities for code generation: case conversion, singularization
//! and Swift keyword escaping

use heck::{ToLowerCamelCase, ToUpperCamelCase};

/// Irregular plurals, as (singular, plural)
const IRREGULARS: &[(&str, &str)] = &[
    ("person", "people"),
    ("child", "children"),
    ("man", "men"),
    ("woman", "women"),
    ("foot", "feet"),
    ("tooth", "teeth"),
    ("goose", "geese"),
    ("mouse", "mice"),
    ("ox", "oxen"),
    ("index", "indices"),
    ("vertex", "vertices"),
    ("matrix", "matrices"),
    ("analysis", "analyses"),
    ("crisis", "crises"),
    ("thesis", "theses"),
    ("leaf", "leaves"),
    ("knife", "knives"),
    ("wife", "wives"),
    ("life", "lives"),
    ("shelf", "shelves"),
    ("self", "selves"),
    ("half", "halves"),
    ("calf", "calves"),
    ("loaf", "loaves"),
    ("thief", "thieves"),
    ("wolf", "wolves"),
    ("hero", "heroes"),
    ("potato", "potatoes"),
    ("tomato", "tomatoes"),
    ("echo", "echoes"),
    ("veto", "vetoes"),
    ("quiz", "quizzes"),
    ("movie", "movies"),
    ("cookie", "cookies"),
    ("pie", "pies"),
    ("tie", "ties"),
    ("cache", "caches"),
    ("niche", "niches"),
    ("house", "houses"),
    ("warehouse", "warehouses"),
    ("cause", "causes"),
    ("clause", "clauses"),
    ("axis", "axes"),
];

/// Words returned unchanged: uncountable, or singular despite a trailing `s`
const UNCHANGED: &[&str] = &[
    "news",
    "series",
    "species",
    "data",
    "metadata",
    "equipment",
    "information",
    "sheep",
    "fish",
    "deer",
    "alias",
    "atlas",
    "canvas",
    "gas",
    "lens",
    "bias",
    "chaos",
];

/// Singular stems whose plural appends `es` after a final `s`
const ES_STEMS: &[&str] = &[
    "status", "bus", "campus", "bonus", "virus", "census", "focus", "surplus", "alias", "atlas",
    "canvas", "gas", "lens", "bias",
];

/// Suffixes dropping a trailing `es` when singularized
const ES_SUFFIXES: &[&str] = &["sses", "xes", "zzes", "ches", "shes"];

/// Letters that keep a trailing `s` (`class`, `status`, `analysis`)
const KEEP_S_AFTER: &[u8] = b"sui";

/// Convert an identifier to a Swift type name: `order_items` -> `OrderItem`
pub fn to_type_name(name: &str) -> String {
    upper_camel_case(&singularize(name))
}

/// Convert a column name or enum label to a Swift member name: `created_at` -> `createdAt`
pub fn to_member_name(name: &str) -> String {
    lower_camel_case(name)
}

/// Convert to UpperCamelCase: `user_accounts` -> `UserAccounts`
pub fn upper_camel_case(word: &str) -> String {
    finish_identifier(word, word.to_upper_camel_case())
}

/// Convert to lowerCamelCase: `user_id` -> `userId`
pub fn lower_camel_case(word: &str) -> String {
    finish_identifier(word, word.to_lower_camel_case())
}

/// Identifiers must not be empty, a bare `_`, or start with a digit
fn finish_identifier(word: &str, ident: String) -> String {
    match ident.chars().next() {
        None => spell_code_points(word),
        Some(first) if first.is_numeric() => format!("_{}", ident),
        Some(_) => ident,
    }
}

/// Name for input without letters or digits: `+` -> `_2B`, `<=` -> `_3C_3D`
fn spell_code_points(word: &str) -> String {
    if word.is_empty() {
        return "_empty".to_string();
    }
    word.chars().map(|c| format!("_{:X}", c as u32)).collect()
}

/// Singularize the last word of an identifier: `order_items` -> `order_item`
///
/// Total and deterministic; words it does not recognize as plural are
/// returned unchanged.
pub fn singularize(word: &str) -> String {
    let split = word
        .rfind(|c: char| c == '_' || c == '-' || c == ' ')
        .map(|pos| pos + 1)
        .unwrap_or(0);
    let (prefix, last) = word.split_at(split);
    format!("{}{}", prefix, singularize_word(last))
}

fn singularize_word(word: &str) -> String {
    if word.chars().count() <= 2 {
        return word.to_string();
    }

    let lower = word.to_ascii_lowercase();

    if UNCHANGED.contains(&lower.as_str()) {
        return word.to_string();
    }

    for (singular, plural) in IRREGULARS {
        if lower == *plural {
            return match_case(word, singular);
        }
    }

    if lower.ends_with("ies") {
        return replace_suffix(word, 3, "y");
    }

    let has_es_stem = ES_STEMS.iter().any(|stem| is_stem_es(word, &lower, stem));
    if has_es_stem || ES_SUFFIXES.iter().any(|suffix| lower.ends_with(suffix)) {
        return replace_suffix(word, 2, "");
    }

    let bytes = lower.as_bytes();
    if bytes[bytes.len() - 1] == b's' && !KEEP_S_AFTER.contains(&bytes[bytes.len() - 2]) {
        return replace_suffix(word, 1, "");
    }

    word.to_string()
}

/// `statuses` and `OrderStatuses` are the stem `status` followed by `es`;
/// `abuses` is not `abus` + `es`
fn is_stem_es(word: &str, lower: &str, stem: &str) -> bool {
    let Some(rest) = lower.strip_suffix("es") else {
        return false;
    };
    if rest == stem {
        return true;
    }
    // Within a word the stem must start at a camel-case boundary
    rest.ends_with(stem)
        && word
            .as_bytes()
            .get(rest.len() - stem.len())
            .is_some_and(|b| b.is_ascii_uppercase())
}

/// Drop `len` ASCII bytes from the end and append `replacement`,
/// uppercased when the dropped suffix was uppercase
fn replace_suffix(word: &str, len: usize, replacement: &str) -> String {
    let (stem, suffix) = word.split_at(word.len() - len);
    if suffix.chars().last().is_some_and(|c| c.is_ascii_uppercase()) {
        format!("{}{}", stem, replacement.to_ascii_uppercase())
    } else {
        format!("{}{}", stem, replacement)
    }
}

/// Spell `replacement` in the case style of `original`
fn match_case(original: &str, replacement: &str) -> String {
    let mut chars = original.chars();
    let first_upper = chars.next().is_some_and(|c| c.is_uppercase());
    let rest_upper = chars.all(|c| !c.is_lowercase());

    if first_upper && rest_upper {
        replacement.to_uppercase()
    } else if first_upper {
        let mut out = replacement.to_string();
        out[..1].make_ascii_uppercase();
        out
    } else {
        replacement.to_string()
    }
}

/// Check if a name is a Swift reserved word that needs backticks
pub fn is_swift_keyword(name: &str) -> bool {
    matches!(
        name,
        "associatedtype"
            | "class"
            | "deinit"
            | "enum"
            | "extension"
            | "fileprivate"
            | "func"
            | "import"
            | "init"
            | "inout"
            | "internal"
            | "let"
            | "open"
            | "operator"
            | "private"
            | "precedencegroup"
            | "protocol"
            | "public"
            | "rethrows"
            | "static"
            | "struct"
            | "subscript"
            | "typealias"
            | "var"
            | "break"
            | "case"
            | "catch"
            | "continue"
            | "default"
            | "defer"
            | "do"
            | "else"
            | "fallthrough"
            | "for"
            | "guard"
            | "if"
            | "in"
            | "repeat"
            | "return"
            | "throw"
            | "switch"
            | "where"
            | "while"
            | "as"
            | "Any"
            | "await"
            | "false"
            | "is"
            | "nil"
            | "self"
            | "Self"
            | "super"
            | "throws"
            | "true"
            | "try"
            | "Type"
            | "Protocol"
    )
}

/// Escape an identifier with backticks if it's a Swift keyword
pub fn escape_identifier(name: &str) -> String {
    if is_swift_keyword(name) {
        format!("`{}`", name)
    } else {
        name.to_string()
    }
}
