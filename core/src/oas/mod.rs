#![deny(missing_docs)]

//! # OpenAPI Parsing Module
//!
//! - **models**: Intermediate Representation definitions.
//! - **naming**: Identifier sanitization.
//! - **ref_utils**: JSON Pointer helpers.
//! - **resolver**: `$ref` resolution with cycle detection, body/response/parameter selection.
//! - **schemas**: Model registry construction.
//! - **routes**: Operation construction.
//! - **context**: The parse facade that owns one pass.
//! - **document** / **validation**: Loading and top-level checks.

pub mod context;
pub mod document;
pub mod models;
pub mod naming;
pub mod ref_utils;
pub mod resolver;
pub mod routes;
pub mod schemas;
pub mod validation;

pub use context::{parse_document, ParseContext};
pub use document::{load_document, load_spec, parse_document_str, DocumentFormat};
pub use models::{
    ApiInfo, Degradation, Diagnostics, HttpMethod, Model, ModelField, ModelState, Operation,
    ParamLocation, Parameter, ParsedSpec, PrimitiveKind, TypeRef,
};
pub use naming::{sanitize_type, sanitize_value};
pub use resolver::{CycleMarker, ReferenceResolver, Resolution};
pub use validation::validate_document;
