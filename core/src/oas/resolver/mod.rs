#![deny(missing_docs)]

//! # Resolver Module
//!
//! Same-document `$ref` resolution with cycle detection, plus the helpers the
//! operation builder uses to pick parameters, bodies, and responses.
//!
//! - **types**: `type`/`format` inspection for schema nodes.
//! - **params**: Parameter construction and path/operation merging.
//! - **body**: Request body media-type selection.
//! - **responses**: Success response selection.

pub mod body;
pub mod params;
pub mod responses;
pub mod types;

use crate::error::{AppError, AppResult};
use crate::oas::naming::sanitize_type;
use crate::oas::ref_utils::{canonical_pointer, last_segment, pointer_segments};
use indexmap::IndexSet;
use serde_json::Value;
use tracing::debug;

pub use body::select_media_schema;
pub use params::{merge_parameters, ParameterEntry};
pub use responses::select_success_response;
pub use types::{primitive_kind, schema_type};

/// Returned instead of a node when a pointer is already being resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleMarker {
    /// Canonical pointer that closed the cycle.
    pub pointer: String,
    /// Type identifier derived from the pointer's final segment.
    pub identifier: String,
}

/// Outcome of a successful resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution<'d> {
    /// The fully dereferenced node.
    Node(&'d Value),
    /// The pointer was already in flight.
    Cycle(CycleMarker),
}

/// Returns the `$ref` string of a node, if it is a reference object.
pub fn ref_target(node: &Value) -> Option<&str> {
    node.get("$ref").and_then(Value::as_str)
}

/// Resolves `#/...` pointers against one document, tracking in-flight pointers.
///
/// The visiting set is the only mutable state; the document is never touched.
#[derive(Debug, Default)]
pub struct ReferenceResolver {
    visiting: IndexSet<String>,
}

impl ReferenceResolver {
    /// Creates a resolver with an empty visiting set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves `reference`, following chained references to the final node.
    ///
    /// # Arguments
    ///
    /// * `reference` - A `$ref` string; only `#/...` pointers are accepted.
    /// * `document` - The document root.
    pub fn resolve<'d>(&mut self, reference: &str, document: &'d Value) -> AppResult<Resolution<'d>> {
        let pointer = canonical_pointer(reference)?;
        if self.visiting.contains(&pointer) {
            debug!(%pointer, "Reference cycle detected");
            return Ok(Resolution::Cycle(CycleMarker {
                identifier: sanitize_type(&last_segment(reference)),
                pointer,
            }));
        }

        self.visiting.insert(pointer.clone());
        let outcome = match lookup(reference, document) {
            Ok(node) => match ref_target(node) {
                Some(next) => self.resolve(next, document),
                None => Ok(Resolution::Node(node)),
            },
            Err(e) => Err(e),
        };
        // Removed only after nested references finished, so A -> B -> A is caught.
        self.visiting.shift_remove(&pointer);
        outcome
    }

    /// Marks a canonical pointer as in flight while its target is being built.
    ///
    /// Returns false if it was already in flight.
    pub fn enter(&mut self, pointer: &str) -> bool {
        self.visiting.insert(pointer.to_string())
    }

    /// Clears a pointer previously passed to [`ReferenceResolver::enter`].
    pub fn leave(&mut self, pointer: &str) {
        self.visiting.shift_remove(pointer);
    }

    /// Returns true when nothing is in flight.
    pub fn is_idle(&self) -> bool {
        self.visiting.is_empty()
    }
}

/// Walks a pointer to its node without following nested references.
pub fn lookup<'d>(reference: &str, document: &'d Value) -> AppResult<&'d Value> {
    let segments = pointer_segments(reference)?;
    let mut current = document;
    for segment in &segments {
        let next = match current {
            Value::Object(map) => map.get(segment.as_str()),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        };
        current = next.ok_or_else(|| {
            AppError::ReferenceNotFound(format!("{} (segment '{}' not found)", reference, segment))
        })?;
    }
    Ok(current)
}
