#![deny(missing_docs)]

//! # Parse Context
//!
//! Owns the model registry, the operation list, and the reference resolver for
//! one pass over one document.
//!
//! Build order:
//! 1. Validate the top level (fatal on failure).
//! 2. Reserve identifiers for every `components.schemas` entry.
//! 3. Build every component schema.
//! 4. Walk `paths` in document order and build operations.

use crate::error::{AppError, AppResult};
use crate::oas::models::{Diagnostics, Model, Operation, ParsedSpec, TypeRef};
use crate::oas::naming::{disambiguate, sanitize_type};
use crate::oas::ref_utils::join_pointer;
use crate::oas::resolver::{ref_target, ReferenceResolver, Resolution};
use crate::oas::validation::validate_document;
use indexmap::IndexMap;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use tracing::{info, warn};

/// State for a single parse pass. Nothing here outlives [`ParseContext::parse`].
pub struct ParseContext<'d> {
    pub(crate) document: &'d Value,
    pub(crate) resolver: ReferenceResolver,
    pub(crate) models: IndexMap<String, Model>,
    pub(crate) operations: Vec<Operation>,
    /// Canonical pointer -> registry identifier for pointer-addressed models.
    pub(crate) pointer_ids: HashMap<String, String>,
    /// Every type identifier handed out so far, including reserved ones.
    pub(crate) type_ids: HashSet<String>,
    pub(crate) operation_ids: HashSet<String>,
    pub(crate) diagnostics: Diagnostics,
}

impl<'d> ParseContext<'d> {
    /// Creates a fresh context over `document`.
    pub fn new(document: &'d Value) -> Self {
        Self {
            document,
            resolver: ReferenceResolver::new(),
            models: IndexMap::new(),
            operations: Vec::new(),
            pointer_ids: HashMap::new(),
            type_ids: HashSet::new(),
            operation_ids: HashSet::new(),
            diagnostics: Diagnostics::default(),
        }
    }

    /// Runs the full pass and returns the IR.
    pub fn parse(mut self) -> AppResult<ParsedSpec> {
        // 1. Top-level validation
        let info = validate_document(self.document)?;

        // 2. Component identifiers, in document order
        self.reserve_component_identifiers();

        // 3. Components before paths
        self.build_components();

        // 4. Operations
        self.build_paths();

        debug_assert!(self.resolver.is_idle());
        info!(
            models = self.models.len(),
            operations = self.operations.len(),
            degraded = self.diagnostics.degraded_count(),
            "Parsed OpenAPI document '{}'",
            info.title
        );

        Ok(ParsedSpec {
            info,
            models: self.models,
            operations: self.operations,
            diagnostics: self.diagnostics,
        })
    }

    fn component_schemas(&self) -> Option<&'d serde_json::Map<String, Value>> {
        self.document
            .get("components")
            .and_then(|c| c.get("schemas"))
            .and_then(Value::as_object)
    }

    fn reserve_component_identifiers(&mut self) {
        let Some(schemas) = self.component_schemas() else {
            return;
        };
        for name in schemas.keys() {
            let pointer = join_pointer(["components", "schemas", name.as_str()]);
            let identifier = self.allocate_type_identifier(name);
            self.pointer_ids.insert(pointer, identifier);
        }
    }

    fn build_components(&mut self) {
        let Some(schemas) = self.component_schemas() else {
            return;
        };
        for (name, node) in schemas {
            let pointer = join_pointer(["components", "schemas", name.as_str()]);
            self.build_named_schema(&pointer, name, node);
        }
    }

    /// Hands out a unique type identifier derived from `name`.
    ///
    /// Collisions get a numeric suffix in first-seen order.
    pub(crate) fn allocate_type_identifier(&mut self, name: &str) -> String {
        let base = sanitize_type(name);
        let identifier = disambiguate(&base, "", |c| self.type_ids.contains(c));
        if identifier != base {
            warn!(
                original = name,
                identifier = identifier.as_str(),
                "Type name collides after sanitization; disambiguated"
            );
        }
        self.type_ids.insert(identifier.clone());
        identifier
    }

    /// Hands out a unique operation identifier.
    pub(crate) fn allocate_operation_identifier(&mut self, base: &str) -> String {
        let identifier = disambiguate(base, "_", |c| self.operation_ids.contains(c));
        if identifier != base {
            warn!(
                base,
                identifier = identifier.as_str(),
                "Operation identifier collides; disambiguated"
            );
        }
        self.operation_ids.insert(identifier.clone());
        identifier
    }

    /// Logs a degraded construct and returns the `Any` placeholder type.
    pub(crate) fn degrade(&mut self, location: &str, err: &AppError) -> TypeRef {
        warn!(location, error = %err, "Degrading construct to Any");
        self.diagnostics.record(location, err.to_string());
        TypeRef::Any
    }

    /// Follows a `$ref` on a non-schema object (parameter, body, response, path item).
    ///
    /// Returns `None` (after recording a degradation) when the target is
    /// missing, unsupported, or circular.
    pub(crate) fn follow(&mut self, node: &'d Value, location: &str) -> Option<&'d Value> {
        let Some(target) = ref_target(node) else {
            return Some(node);
        };
        match self.resolver.resolve(target, self.document) {
            Ok(Resolution::Node(resolved)) => Some(resolved),
            Ok(Resolution::Cycle(marker)) => {
                let err = AppError::General(format!("circular reference via {}", marker.pointer));
                self.degrade(location, &err);
                None
            }
            Err(e) => {
                self.degrade(location, &e);
                None
            }
        }
    }
}

/// Parses a decoded document into the IR.
///
/// Each call uses a fresh context; nothing is shared between calls.
pub fn parse_document(document: &Value) -> AppResult<ParsedSpec> {
    ParseContext::new(document).parse()
}
