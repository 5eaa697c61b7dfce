#![deny(missing_docs)]

//! # Naming Utilities
//!
//! Turns arbitrary OpenAPI names into Rust identifiers.
//!
//! - **Value identifiers** (`snake_case`): fields, parameters, operation ids.
//! - **Type identifiers** (`PascalCase`): models and synthesized structs.
//!
//! Both flavours are total and idempotent: any input produces a non-empty
//! `[A-Za-z_][A-Za-z0-9_]*` token, and sanitizing a sanitized name is a no-op.

use regex::Regex;
use std::sync::OnceLock;

/// Fallback for value identifiers that sanitize to nothing.
pub const VALUE_FALLBACK: &str = "_generated_name";

/// Fallback for type identifiers that sanitize to nothing.
pub const TYPE_FALLBACK: &str = "_Model";

const TYPE_KEYWORD_SUFFIX: &str = "Model";

/// Strict and reserved Rust keywords (2021 edition).
const RUST_KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "crate",
    "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl",
    "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "self", "static", "struct", "super", "trait", "true", "try", "type", "typeof",
    "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

/// Type names that would shadow `Self` or prelude items in generated code.
const RESERVED_TYPE_NAMES: &[&str] = &[
    "Self", "Option", "Result", "Vec", "String", "Box", "Some", "None", "Ok", "Err",
];

/// Returns true if `name` is a Rust keyword.
pub fn is_rust_keyword(name: &str) -> bool {
    RUST_KEYWORDS.contains(&name)
}

/// Converts a mixed-case string (CamelCase or camelCase) to snake_case.
///
/// Acronym runs stay together: `HTTPServer` -> `http_server`.
pub fn to_snake_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_uppercase() {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1).copied();
            let boundary = match prev {
                Some(p) if p.is_ascii_lowercase() || p.is_ascii_digit() => true,
                Some(p) if p.is_ascii_uppercase() => next.is_some_and(|n| n.is_ascii_lowercase()),
                _ => false,
            };
            if boundary {
                result.push('_');
            }
            result.push(c.to_ascii_lowercase());
        } else {
            result.push(c);
        }
    }
    result
}

/// Produces a snake_case value identifier (fields, parameters, functions).
///
/// # Arguments
///
/// * `name` - Any string taken from the document.
pub fn sanitize_value(name: &str) -> String {
    let cleaned = collapse_underscores(&replace_invalid(&to_snake_case(name)));
    if cleaned.chars().all(|c| c == '_') {
        return VALUE_FALLBACK.to_string();
    }

    let mut ident = if starts_with_digit(&cleaned) {
        format!("_{}", cleaned)
    } else {
        cleaned
    };
    if is_rust_keyword(&ident) {
        ident.push('_');
    }
    ident
}

/// Produces a PascalCase type identifier (models, argument structs).
///
/// A single leading underscore survives so that prefixed names (and the
/// fallback token itself) remain stable under re-sanitization.
///
/// # Arguments
///
/// * `name` - Any string taken from the document.
pub fn sanitize_type(name: &str) -> String {
    let replaced = replace_invalid(name);
    let mut pascal = String::with_capacity(replaced.len());
    for segment in replaced.split('_').filter(|s| !s.is_empty()) {
        let mut chars = segment.chars();
        if let Some(first) = chars.next() {
            pascal.push(first.to_ascii_uppercase());
            pascal.push_str(chars.as_str());
        }
    }
    if pascal.is_empty() {
        return TYPE_FALLBACK.to_string();
    }

    if replaced.starts_with('_') || starts_with_digit(&pascal) {
        pascal.insert(0, '_');
    }
    if RESERVED_TYPE_NAMES.contains(&pascal.as_str()) {
        pascal.push_str(TYPE_KEYWORD_SUFFIX);
    }
    pascal
}

/// Derives an operation identifier from the HTTP method and URL template when
/// `operationId` is missing.
///
/// e.g. `GET /pets/{petId}` -> `get_pets_by_pet_id`, `GET /` -> `get_root`.
pub fn derive_operation_id(method: &str, path: &str) -> String {
    let mut parts = vec![method.to_ascii_lowercase()];
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        let expanded = placeholder_regex().replace_all(segment, |caps: &regex::Captures| {
            format!("_by_{}_", sanitize_value(&caps[1]))
        });
        let fragment = collapse_underscores(&replace_invalid(&to_snake_case(&expanded)));
        let fragment = fragment.trim_matches('_');
        if !fragment.is_empty() {
            parts.push(fragment.to_string());
        }
    }
    if parts.len() == 1 {
        parts.push("root".to_string());
    }
    sanitize_value(&parts.join("_"))
}

/// Returns `base`, or the first `{base}{separator}{n}` (n = 2, 3, ...) not yet taken.
///
/// Callers feed names in document order, so the result only depends on what
/// was seen earlier in the same document.
pub fn disambiguate(base: &str, separator: &str, is_taken: impl Fn(&str) -> bool) -> String {
    if !is_taken(base) {
        return base.to_string();
    }
    let mut n = 2usize;
    loop {
        let candidate = format!("{}{}{}", base, separator, n);
        if !is_taken(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{([^{}]*)\}").expect("Invalid regex"))
}

fn replace_invalid(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn collapse_underscores(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if c == '_' && out.ends_with('_') {
            continue;
        }
        out.push(c);
    }
    out
}

fn starts_with_digit(s: &str) -> bool {
    s.chars().next().is_some_and(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_identifier(s: &str) -> bool {
        let mut chars = s.chars();
        matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    }

    const SAMPLES: &[&str] = &[
        "",
        "!!!",
        "---",
        "_",
        "123abc",
        "type",
        "self",
        "Self",
        "petId",
        "HTTPServer",
        "pet-owner",
        "café au lait",
        "日本語",
        "a—b·c",
        "__init__",
        "_private",
        "x-rate-limit",
        "v2Api",
        "1",
        "Option",
        "_Model",
        "_generated_name",
    ];

    #[test]
    fn test_snake_case_conversion() {
        assert_eq!(to_snake_case("userId"), "user_id");
        assert_eq!(to_snake_case("id"), "id");
        assert_eq!(to_snake_case("camelCaseTemp"), "camel_case_temp");
        assert_eq!(to_snake_case("GetUsers"), "get_users");
        assert_eq!(to_snake_case("HTTPServer"), "http_server");
        assert_eq!(to_snake_case("v2Api"), "v2_api");
    }

    #[test]
    fn test_sanitize_value_basic() {
        assert_eq!(sanitize_value("petId"), "pet_id");
        assert_eq!(sanitize_value("item-id"), "item_id");
        assert_eq!(sanitize_value("x--rate..limit"), "x_rate_limit");
        assert_eq!(sanitize_value("listPets"), "list_pets");
    }

    #[test]
    fn test_sanitize_value_edge_cases() {
        assert_eq!(sanitize_value(""), VALUE_FALLBACK);
        assert_eq!(sanitize_value("!!!"), VALUE_FALLBACK);
        assert_eq!(sanitize_value("123abc"), "_123abc");
        assert_eq!(sanitize_value("type"), "type_");
        assert_eq!(sanitize_value("Self"), "self_");
        assert_eq!(sanitize_value("café"), "caf_");
    }

    #[test]
    fn test_sanitize_type_basic() {
        assert_eq!(sanitize_type("pet"), "Pet");
        assert_eq!(sanitize_type("pet_owner"), "PetOwner");
        assert_eq!(sanitize_type("pet-owner"), "PetOwner");
        assert_eq!(sanitize_type("HTTPServer"), "HTTPServer");
        assert_eq!(sanitize_type("listPets_RequestBody"), "ListPetsRequestBody");
    }

    #[test]
    fn test_sanitize_type_edge_cases() {
        assert_eq!(sanitize_type(""), TYPE_FALLBACK);
        assert_eq!(sanitize_type("..."), TYPE_FALLBACK);
        assert_eq!(sanitize_type("1st place"), "_1stPlace");
        assert_eq!(sanitize_type("self"), "SelfModel");
        assert_eq!(sanitize_type("option"), "OptionModel");
        assert_eq!(sanitize_type("_private"), "_Private");
    }

    #[test]
    fn test_case_only_differences_may_collide() {
        assert_eq!(sanitize_type("pet"), sanitize_type("Pet"));
    }

    #[test]
    fn test_sanitizers_are_total_and_idempotent() {
        for sample in SAMPLES {
            let value = sanitize_value(sample);
            assert!(is_identifier(&value), "value {:?} -> {:?}", sample, value);
            assert_eq!(sanitize_value(&value), value, "value idempotency for {:?}", sample);

            let ty = sanitize_type(sample);
            assert!(is_identifier(&ty), "type {:?} -> {:?}", sample, ty);
            assert_eq!(sanitize_type(&ty), ty, "type idempotency for {:?}", sample);
        }
    }

    #[test]
    fn test_derive_operation_id() {
        assert_eq!(derive_operation_id("GET", "/pets/{petId}"), "get_pets_by_pet_id");
        assert_eq!(
            derive_operation_id("DELETE", "/items/{item-id}"),
            "delete_items_by_item_id"
        );
        assert_eq!(derive_operation_id("get", "/"), "get_root");
        assert_eq!(derive_operation_id("POST", ""), "post_root");
        assert_eq!(
            derive_operation_id("GET", "/files/{name}.json"),
            "get_files_by_name_json"
        );
        assert_eq!(
            derive_operation_id("PUT", "/userGroups/{groupId}/members"),
            "put_user_groups_by_group_id_members"
        );
    }

    #[test]
    fn test_disambiguate_first_seen_order() {
        let taken = ["Pet", "Pet2"];
        assert_eq!(disambiguate("Dog", "", |c| taken.contains(&c)), "Dog");
        assert_eq!(disambiguate("Pet", "", |c| taken.contains(&c)), "Pet3");

        let ops = ["list_pets"];
        assert_eq!(disambiguate("list_pets", "_", |c| ops.contains(&c)), "list_pets_2");
    }
}
