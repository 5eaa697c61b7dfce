#![deny(missing_docs)]

//! # oas2mcp Core
//!
//! Core library for the OpenAPI to MCP server generator: the document
//! parser, the intermediate representation, and the emitters built on it.

/// Shared error types.
pub mod error;

/// OpenAPI (OAS) parsing into the intermediate representation.
pub mod oas;

/// Emitter settings.
pub mod config;

/// Server source generation.
pub mod codegen;

/// llms.txt capability listing.
pub mod llms;

/// Sanity checks over generated source.
pub mod checks;

/// Strategy Pattern Interfaces.
pub mod strategies;

pub use checks::{check_balanced_delimiters, check_generated, CheckOutcome};
pub use codegen::generate_server;
pub use config::{EmitConfig, Transport, DEFAULT_BIND_ADDRESS};
pub use error::{AppError, AppResult};
pub use llms::generate_llms_txt;
pub use oas::{
    load_document, load_spec, parse_document, parse_document_str, sanitize_type, sanitize_value,
    ApiInfo, Diagnostics, DocumentFormat, HttpMethod, Model, ModelField, Operation, ParamLocation,
    Parameter, ParsedSpec, PrimitiveKind, TypeRef,
};
pub use strategies::{HandlerSpec, RmcpStrategy, ServerStrategy};
