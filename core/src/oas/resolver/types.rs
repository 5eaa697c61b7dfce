#![deny(missing_docs)]

//! # Type Inspection
//!
//! Reads `type`, `format`, and nullability off raw schema nodes.
//!
//! - `format: date-time` -> `datetime`
//! - `format: date` -> `date`
//! - `format: binary` -> `bytes`
//! - other formats are ignored

use crate::oas::models::PrimitiveKind;
use serde_json::Value;

/// Returns the declared `type` and whether the schema admits `null`.
///
/// Handles both OAS 3.0 `nullable: true` and OAS 3.1 `type: [T, "null"]`.
pub fn schema_type(node: &Value) -> (Option<&str>, bool) {
    let nullable_flag = node
        .get("nullable")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    match node.get("type") {
        Some(Value::String(ty)) => (Some(ty.as_str()), nullable_flag || ty == "null"),
        Some(Value::Array(types)) => {
            let names: Vec<&str> = types.iter().filter_map(Value::as_str).collect();
            let primary = names.iter().copied().find(|t| *t != "null");
            (primary, nullable_flag || names.contains(&"null"))
        }
        _ => (None, nullable_flag),
    }
}

/// Maps a scalar `type` + `format` pair to a primitive kind.
pub fn primitive_kind(type_name: &str, format: Option<&str>) -> Option<PrimitiveKind> {
    match type_name {
        "string" => Some(match format {
            Some("date-time") => PrimitiveKind::DateTime,
            Some("date") => PrimitiveKind::Date,
            Some("binary") => PrimitiveKind::Bytes,
            _ => PrimitiveKind::String,
        }),
        "integer" => Some(PrimitiveKind::Integer),
        "number" => Some(PrimitiveKind::Number),
        "boolean" => Some(PrimitiveKind::Boolean),
        _ => None,
    }
}

/// True if the node has a non-empty `properties` mapping.
pub fn has_properties(node: &Value) -> bool {
    node.get("properties")
        .and_then(Value::as_object)
        .is_some_and(|props| !props.is_empty())
}

/// True for schemas that should become a struct-like model when named.
///
/// Untyped schemas count when they declare properties. Pure maps
/// (`additionalProperties` without properties) do not.
pub fn is_object_shaped(node: &Value) -> bool {
    let (ty, _) = schema_type(node);
    let declares_object = match ty {
        Some("object") => true,
        None => node.get("properties").is_some(),
        Some(_) => false,
    };
    let pure_map = !has_properties(node)
        && matches!(
            node.get("additionalProperties"),
            Some(Value::Object(_)) | Some(Value::Bool(true))
        );
    declares_object && !pure_map
}
