#![deny(missing_docs)]

//! # Document Validation
//!
//! Top-level shape checks run before any model is built. These are the only
//! fatal checks: everything below the top level degrades instead of failing.

use crate::error::{AppError, AppResult};
use crate::oas::models::ApiInfo;
use serde_json::Value;

/// Validates the document root and extracts `info`.
///
/// Requires `openapi: 3.x`, an `info` mapping with `title` and `version`, and
/// a `paths` mapping.
pub fn validate_document(root: &Value) -> AppResult<ApiInfo> {
    let root = root
        .as_object()
        .ok_or_else(|| AppError::SpecValidation("The document root is not a mapping".into()))?;

    // 1. Version
    let version = match root.get("openapi") {
        Some(Value::String(v)) => v.as_str(),
        Some(other) => {
            return Err(AppError::SpecValidation(format!(
                "Invalid OpenAPI version: {}",
                other
            )))
        }
        None => {
            return Err(AppError::SpecValidation(
                "Invalid OpenAPI version: missing 'openapi' field".into(),
            ))
        }
    };
    if !version.starts_with("3.") {
        return Err(AppError::SpecValidation(format!(
            "Only OpenAPI 3.x is supported, found {}",
            version
        )));
    }

    // 2. Info
    let info = root
        .get("info")
        .ok_or_else(|| AppError::SpecValidation("Missing 'info' section".into()))?
        .as_object()
        .ok_or_else(|| AppError::SpecValidation("'info' section must be a mapping".into()))?;
    let title = info.get("title").and_then(scalar_text);
    let api_version = info.get("version").and_then(scalar_text);
    let (Some(title), Some(api_version)) = (title, api_version) else {
        return Err(AppError::SpecValidation(
            "'info' section must contain 'title' and 'version'".into(),
        ));
    };

    // 3. Paths
    match root.get("paths") {
        None => return Err(AppError::SpecValidation("Missing 'paths' section".into())),
        Some(Value::Object(_)) => {}
        Some(_) => {
            return Err(AppError::SpecValidation(
                "'paths' section must be a mapping".into(),
            ))
        }
    }

    Ok(ApiInfo {
        title,
        version: api_version,
        description: info
            .get("description")
            .and_then(Value::as_str)
            .map(String::from),
    })
}

/// YAML decodes `version: 1.0` as a number; accept any scalar.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
