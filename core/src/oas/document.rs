#![deny(missing_docs)]

//! # OpenAPI Document Loading
//!
//! Decodes JSON or YAML files into a generic `serde_json::Value` tree.
//! Key order is preserved, which operation order and response selection rely on.

use crate::error::{AppError, AppResult};
use crate::oas::context::parse_document;
use crate::oas::models::ParsedSpec;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Serialization format of an input document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// `.json`
    Json,
    /// `.yaml` / `.yml`
    Yaml,
}

impl DocumentFormat {
    /// Picks the format from the file extension.
    pub fn from_path(path: &Path) -> AppResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("json") => Ok(DocumentFormat::Json),
            Some("yaml") | Some("yml") => Ok(DocumentFormat::Yaml),
            _ => Err(AppError::General(format!(
                "Unsupported file format: {} (expected .json, .yaml or .yml)",
                path.display()
            ))),
        }
    }
}

/// Decodes document text.
///
/// # Arguments
///
/// * `content` - Raw file contents.
/// * `format` - Decoder to use.
pub fn parse_document_str(content: &str, format: DocumentFormat) -> AppResult<Value> {
    match format {
        DocumentFormat::Json => serde_json::from_str(content)
            .map_err(|e| AppError::General(format!("Failed to parse OpenAPI JSON: {}", e))),
        DocumentFormat::Yaml => serde_yaml::from_str(content)
            .map_err(|e| AppError::General(format!("Failed to parse OpenAPI YAML: {}", e))),
    }
}

/// Reads and decodes a document from disk.
pub fn load_document(path: &Path) -> AppResult<Value> {
    let format = DocumentFormat::from_path(path)?;
    debug!(path = %path.display(), ?format, "Loading OpenAPI document");
    let content = fs::read_to_string(path)?;
    parse_document_str(&content, format)
}

/// Reads, validates, and parses a document into the IR.
pub fn load_spec(path: &Path) -> AppResult<ParsedSpec> {
    let document = load_document(path)?;
    parse_document(&document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[test]
    fn test_format_detection() {
        assert_eq!(
            DocumentFormat::from_path(&PathBuf::from("api.JSON")).unwrap(),
            DocumentFormat::Json
        );
        assert_eq!(
            DocumentFormat::from_path(&PathBuf::from("api.yml")).unwrap(),
            DocumentFormat::Yaml
        );
        assert!(DocumentFormat::from_path(&PathBuf::from("api.txt")).is_err());
        assert!(DocumentFormat::from_path(&PathBuf::from("api")).is_err());
    }

    #[test]
    fn test_yaml_keeps_key_order() {
        let doc = parse_document_str("b: 1\na: 2\nc: 3\n", DocumentFormat::Yaml).unwrap();
        let keys: Vec<&str> = doc.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_invalid_json_is_reported() {
        let err = parse_document_str("{not json", DocumentFormat::Json).unwrap_err();
        assert!(err.to_string().contains("Failed to parse OpenAPI JSON"));
    }

    #[test]
    fn test_load_spec_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("openapi.json");
        fs::write(
            &path,
            r#"{"openapi": "3.0.0", "info": {"title": "T", "version": "1"}, "paths": {"/ping": {"get": {"responses": {"204": {"description": "pong"}}}}}}"#,
        )
        .unwrap();

        let spec = load_spec(&path).unwrap();
        assert_eq!(spec.operations.len(), 1);
        assert_eq!(spec.operations[0].identifier, "get_ping");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let err = load_document(&dir.path().join("missing.yaml")).unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
    }
}
