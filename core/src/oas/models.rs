#![deny(missing_docs)]

//! # Intermediate Representation
//!
//! Language-neutral description of an OpenAPI document after `$ref`
//! resolution and name sanitization.
//!
//! Models live in a flat registry keyed by type identifier. Every
//! cross-reference (`NamedModel`, `CircularRef`) is by identifier, so the
//! IR never owns a cycle even when the schema graph has one.

use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

/// Scalar kinds a schema can map to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveKind {
    /// `type: string`
    String,
    /// `type: integer`
    Integer,
    /// `type: number`
    Number,
    /// `type: boolean`
    Boolean,
    /// `type: string, format: binary`
    Bytes,
    /// `type: string, format: date`
    Date,
    /// `type: string, format: date-time`
    DateTime,
}

impl PrimitiveKind {
    /// Lowercase name used in logs and listings.
    pub fn as_str(&self) -> &'static str {
        match self {
            PrimitiveKind::String => "string",
            PrimitiveKind::Integer => "integer",
            PrimitiveKind::Number => "number",
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Bytes => "bytes",
            PrimitiveKind::Date => "date",
            PrimitiveKind::DateTime => "datetime",
        }
    }
}

/// A normalized type descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "of", rename_all = "snake_case")]
pub enum TypeRef {
    /// A scalar.
    Primitive(PrimitiveKind),
    /// Reference to an entry in the model registry.
    NamedModel(String),
    /// Homogeneous array.
    List(Box<TypeRef>),
    /// String-keyed map.
    Map(Box<TypeRef>),
    /// Unknown or unresolvable.
    Any,
    /// Reference back to a model whose construction is still in progress.
    CircularRef(String),
}

impl TypeRef {
    /// Shorthand for `TypeRef::List`.
    pub fn list(element: TypeRef) -> Self {
        TypeRef::List(Box::new(element))
    }

    /// Shorthand for `TypeRef::Map`.
    pub fn map(value: TypeRef) -> Self {
        TypeRef::Map(Box::new(value))
    }

    /// Shorthand for `TypeRef::NamedModel`.
    pub fn named(identifier: impl Into<String>) -> Self {
        TypeRef::NamedModel(identifier.into())
    }

    /// The registry identifier this descriptor points at, if it is a direct model reference.
    pub fn model_identifier(&self) -> Option<&str> {
        match self {
            TypeRef::NamedModel(id) | TypeRef::CircularRef(id) => Some(id),
            _ => None,
        }
    }

    /// Collects every registry identifier mentioned anywhere in this descriptor.
    pub fn referenced_models<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            TypeRef::NamedModel(id) | TypeRef::CircularRef(id) => out.push(id),
            TypeRef::List(inner) | TypeRef::Map(inner) => inner.referenced_models(out),
            TypeRef::Primitive(_) | TypeRef::Any => {}
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Primitive(kind) => write!(f, "{}", kind.as_str()),
            TypeRef::NamedModel(id) => write!(f, "{}", id),
            TypeRef::List(inner) => write!(f, "list<{}>", inner),
            TypeRef::Map(inner) => write!(f, "map<string, {}>", inner),
            TypeRef::Any => write!(f, "any"),
            TypeRef::CircularRef(id) => write!(f, "circular<{}>", id),
        }
    }
}

/// Construction state of a registry entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelState {
    /// Registered with no fields; children may already reference it.
    Placeholder,
    /// Fields have been filled in.
    Complete,
}

/// A single property of a model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelField {
    /// Property name as written in the document.
    pub original_name: String,
    /// Sanitized value identifier, unique within the owning model.
    pub identifier: String,
    /// Resolved type. Optionality is tracked by `required`, never by wrapping.
    #[serde(rename = "type")]
    pub ty: TypeRef,
    /// True iff the property is listed in the schema's `required` array.
    pub required: bool,
    /// `nullable: true` or a `null` member in a `type` array.
    pub nullable: bool,
    /// Property description.
    pub description: Option<String>,
}

/// An object-shaped schema (or a named alias of a non-object schema).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Model {
    /// Sanitized type identifier, unique across the registry.
    pub identifier: String,
    /// Fields in document order.
    pub fields: Vec<ModelField>,
    /// Schema description.
    pub description: Option<String>,
    /// Set when the named schema is not object-shaped (`Pets: {type: array, ...}`).
    pub alias: Option<TypeRef>,
    /// Construction state.
    pub state: ModelState,
    /// Raw source schema, kept for diagnostics.
    #[serde(skip)]
    pub source: serde_json::Value,
}

impl Model {
    /// Creates an empty placeholder entry.
    pub fn placeholder(identifier: impl Into<String>, source: serde_json::Value) -> Self {
        Self {
            identifier: identifier.into(),
            fields: Vec::new(),
            description: None,
            alias: None,
            state: ModelState::Placeholder,
            source,
        }
    }

    /// Returns true once construction has finished.
    pub fn is_complete(&self) -> bool {
        self.state == ModelState::Complete
    }

    /// Looks up a field by its document name.
    pub fn field(&self, original_name: &str) -> Option<&ModelField> {
        self.fields
            .iter()
            .find(|f| f.original_name == original_name)
    }
}

/// Where a parameter is carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamLocation {
    /// URL template segment.
    Path,
    /// Query string.
    Query,
    /// Request header.
    Header,
    /// Cookie.
    Cookie,
}

impl ParamLocation {
    /// Parses the `in` field of a parameter object.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "path" => Some(ParamLocation::Path),
            "query" => Some(ParamLocation::Query),
            "header" => Some(ParamLocation::Header),
            "cookie" => Some(ParamLocation::Cookie),
            _ => None,
        }
    }

    /// The OpenAPI spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamLocation::Path => "path",
            ParamLocation::Query => "query",
            ParamLocation::Header => "header",
            ParamLocation::Cookie => "cookie",
        }
    }
}

/// An operation parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    /// Name as written in the document.
    pub original_name: String,
    /// Sanitized value identifier.
    pub identifier: String,
    /// Carrier location.
    pub location: ParamLocation,
    /// Resolved type.
    #[serde(rename = "type")]
    pub ty: TypeRef,
    /// Path parameters are always required.
    pub required: bool,
    /// Parameter description.
    pub description: Option<String>,
}

/// HTTP methods an OpenAPI path item may define.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// GET
    Get,
    /// PUT
    Put,
    /// POST
    Post,
    /// DELETE
    Delete,
    /// OPTIONS
    Options,
    /// HEAD
    Head,
    /// PATCH
    Patch,
    /// TRACE
    Trace,
}

impl HttpMethod {
    /// Parses a lowercase path-item key (`get`, `post`, ...).
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "get" => Some(HttpMethod::Get),
            "put" => Some(HttpMethod::Put),
            "post" => Some(HttpMethod::Post),
            "delete" => Some(HttpMethod::Delete),
            "options" => Some(HttpMethod::Options),
            "head" => Some(HttpMethod::Head),
            "patch" => Some(HttpMethod::Patch),
            "trace" => Some(HttpMethod::Trace),
            _ => None,
        }
    }

    /// Uppercase method name.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Put => "PUT",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Trace => "TRACE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One path x method entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Operation {
    /// Sanitized operation identifier, unique across the document.
    pub identifier: String,
    /// HTTP method.
    pub method: HttpMethod,
    /// URL template, e.g. `/pets/{petId}`.
    pub path: String,
    /// Short summary.
    pub summary: Option<String>,
    /// Long description.
    pub description: Option<String>,
    /// Merged path-level and operation-level parameters.
    pub parameters: Vec<Parameter>,
    /// Request body type, if any.
    pub request_body: Option<TypeRef>,
    /// Type of the first successful (or default) response, if any.
    pub response_body: Option<TypeRef>,
    /// Operation tags.
    pub tags: Vec<String>,
    /// `deprecated: true`.
    pub deprecated: bool,
}

impl Operation {
    /// GET operations are exposed as read-only resources; everything else as tools.
    pub fn is_resource(&self) -> bool {
        self.method == HttpMethod::Get
    }

    /// Parameters carried in the given location.
    pub fn parameters_in(&self, location: ParamLocation) -> impl Iterator<Item = &Parameter> {
        self.parameters
            .iter()
            .filter(move |p| p.location == location)
    }
}

/// Document-level `info` metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiInfo {
    /// `info.title`
    pub title: String,
    /// `info.version`
    pub version: String,
    /// `info.description`
    pub description: Option<String>,
}

/// A construct that could not be fully resolved and was degraded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Degradation {
    /// Where in the document (pointer-like path).
    pub location: String,
    /// Human-readable reason.
    pub reason: String,
}

/// Degraded constructs collected during one parse pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
    /// Entries in discovery order.
    pub degraded: Vec<Degradation>,
}

impl Diagnostics {
    /// Records a degraded construct.
    pub fn record(&mut self, location: impl Into<String>, reason: impl Into<String>) {
        self.degraded.push(Degradation {
            location: location.into(),
            reason: reason.into(),
        });
    }

    /// Number of degraded constructs.
    pub fn degraded_count(&self) -> usize {
        self.degraded.len()
    }
}

/// The complete IR for one document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedSpec {
    /// Document metadata.
    pub info: ApiInfo,
    /// Model registry keyed by type identifier.
    pub models: IndexMap<String, Model>,
    /// Operations in document path order.
    pub operations: Vec<Operation>,
    /// Degraded constructs.
    pub diagnostics: Diagnostics,
}

impl ParsedSpec {
    /// Looks up a model by identifier.
    pub fn model(&self, identifier: &str) -> Option<&Model> {
        self.models.get(identifier)
    }

    /// Models ordered by identifier, for stable output.
    pub fn sorted_models(&self) -> Vec<&Model> {
        let mut models: Vec<&Model> = self.models.values().collect();
        models.sort_by(|a, b| a.identifier.cmp(&b.identifier));
        models
    }

    /// Looks up an operation by identifier.
    pub fn operation(&self, identifier: &str) -> Option<&Operation> {
        self.operations.iter().find(|op| op.identifier == identifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_ref_display() {
        let ty = TypeRef::map(TypeRef::list(TypeRef::named("Pet")));
        assert_eq!(ty.to_string(), "map<string, list<Pet>>");
        assert_eq!(TypeRef::Primitive(PrimitiveKind::DateTime).to_string(), "datetime");
        assert_eq!(TypeRef::CircularRef("Node".into()).to_string(), "circular<Node>");
    }

    #[test]
    fn test_referenced_models() {
        let ty = TypeRef::map(TypeRef::list(TypeRef::named("Pet")));
        let mut out = Vec::new();
        ty.referenced_models(&mut out);
        assert_eq!(out, vec!["Pet"]);
        assert_eq!(ty.model_identifier(), None);
        assert_eq!(TypeRef::named("Pet").model_identifier(), Some("Pet"));
    }

    #[test]
    fn test_type_ref_serialization() {
        let json = serde_json::to_value(TypeRef::list(TypeRef::Primitive(PrimitiveKind::String)))
            .unwrap();
        assert_eq!(
            json,
            serde_json::json!({"kind": "list", "of": {"kind": "primitive", "of": "string"}})
        );
        let json = serde_json::to_value(TypeRef::Any).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "any"}));
    }

    #[test]
    fn test_location_and_method_parsing() {
        assert_eq!(ParamLocation::parse("cookie"), Some(ParamLocation::Cookie));
        assert_eq!(ParamLocation::parse("body"), None);
        assert_eq!(HttpMethod::from_key("patch"), Some(HttpMethod::Patch));
        assert_eq!(HttpMethod::from_key("parameters"), None);
        assert_eq!(HttpMethod::Delete.to_string(), "DELETE");
    }

    #[test]
    fn test_placeholder_state() {
        let model = Model::placeholder("Pet", serde_json::Value::Null);
        assert!(!model.is_complete());
        assert!(model.fields.is_empty());
    }
}
