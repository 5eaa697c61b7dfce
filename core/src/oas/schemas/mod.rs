#![deny(missing_docs)]

//! # Schema Parsing
//!
//! Turns schema nodes into `TypeRef`s and registry models.
//!
//! Each named model moves through `Unseen -> Placeholder -> Complete`. The
//! placeholder is registered (and its pointer marked in flight) before any
//! property is visited, so self- and mutually-referential schemas resolve to
//! `NamedModel(identifier)` instead of recursing.

pub mod structs;

use crate::error::AppError;
use crate::oas::context::ParseContext;
use crate::oas::models::{Model, ModelField, ModelState, TypeRef};
use crate::oas::naming::sanitize_type;
use crate::oas::ref_utils::{canonical_pointer, extract_component_name, last_segment};
use crate::oas::resolver::types::{has_properties, is_object_shaped};
use crate::oas::resolver::{lookup, primitive_kind, ref_target, schema_type, Resolution};
use serde_json::Value;
use tracing::debug;

/// What a finished model body holds.
struct ModelBody {
    fields: Vec<ModelField>,
    alias: Option<TypeRef>,
}

impl<'d> ParseContext<'d> {
    /// Builds (or returns the existing) model addressed by `pointer`.
    ///
    /// # Arguments
    ///
    /// * `pointer` - Canonical pointer of the schema.
    /// * `name` - Name used when no identifier was reserved for the pointer.
    /// * `node` - The schema node itself (not dereferenced).
    ///
    /// Returns the registry identifier.
    pub(crate) fn build_named_schema(&mut self, pointer: &str, name: &str, node: &'d Value) -> String {
        let identifier = match self.pointer_ids.get(pointer).cloned() {
            Some(id) => id,
            None => {
                let id = self.allocate_type_identifier(name);
                self.pointer_ids.insert(pointer.to_string(), id.clone());
                id
            }
        };

        // Placeholder or Complete: hand back the identifier.
        if self.models.contains_key(&identifier) {
            return identifier;
        }

        debug!(identifier = identifier.as_str(), pointer, "Building model");
        self.models
            .insert(identifier.clone(), Model::placeholder(&identifier, node.clone()));

        let entered = self.resolver.enter(pointer);
        let body = self.build_model_body(&identifier, pointer, node);
        if entered {
            self.resolver.leave(pointer);
        }

        if let Some(model) = self.models.get_mut(&identifier) {
            model.fields = body.fields;
            model.alias = body.alias;
            model.description = node
                .get("description")
                .and_then(Value::as_str)
                .map(String::from);
            model.state = ModelState::Complete;
        }
        identifier
    }

    fn build_model_body(&mut self, identifier: &str, location: &str, node: &'d Value) -> ModelBody {
        // Pure alias of another schema.
        if let Some(target) = ref_target(node) {
            let alias = match self.resolver.resolve(target, self.document) {
                Ok(Resolution::Cycle(marker)) => TypeRef::CircularRef(
                    self.pointer_ids
                        .get(&marker.pointer)
                        .cloned()
                        .unwrap_or(marker.identifier),
                ),
                Ok(Resolution::Node(_)) => self.type_of(node, identifier, location),
                Err(e) => self.degrade(location, &e),
            };
            return ModelBody {
                fields: Vec::new(),
                alias: Some(alias),
            };
        }

        if is_object_shaped(node) {
            ModelBody {
                fields: self.build_fields(identifier, location, node),
                alias: None,
            }
        } else {
            ModelBody {
                fields: Vec::new(),
                alias: Some(self.type_of(node, identifier, location)),
            }
        }
    }

    /// Maps a schema node to a `TypeRef`.
    ///
    /// # Arguments
    ///
    /// * `node` - The schema node.
    /// * `hint` - Name context for inline objects (`Pet_owner`, `list_pets_ResponseBody`).
    /// * `location` - Pointer-like path used in diagnostics.
    pub(crate) fn type_of(&mut self, node: &'d Value, hint: &str, location: &str) -> TypeRef {
        // 1. References
        if let Some(target) = ref_target(node) {
            return self.type_of_reference(target, location);
        }

        let (type_name, _) = schema_type(node);
        match type_name {
            // 2. Arrays
            Some("array") => match node.get("items") {
                Some(items) => TypeRef::list(self.type_of(
                    items,
                    &format!("{}_Item", hint),
                    &format!("{}/items", location),
                )),
                None => TypeRef::list(TypeRef::Any),
            },
            // 3. Objects (typed, or untyped with object keywords)
            Some("object") => self.type_of_object(node, hint, location),
            None if node.get("properties").is_some()
                || node.get("additionalProperties").is_some() =>
            {
                self.type_of_object(node, hint, location)
            }
            // 4. Scalars
            Some(other) => {
                let format = node.get("format").and_then(Value::as_str);
                primitive_kind(other, format)
                    .map(TypeRef::Primitive)
                    .unwrap_or(TypeRef::Any)
            }
            // 5. Anything else
            None => TypeRef::Any,
        }
    }

    fn type_of_object(&mut self, node: &'d Value, hint: &str, location: &str) -> TypeRef {
        match node.get("additionalProperties") {
            Some(schema @ Value::Object(_)) => {
                return TypeRef::map(self.type_of(
                    schema,
                    &format!("{}_Value", hint),
                    &format!("{}/additionalProperties", location),
                ))
            }
            Some(Value::Bool(true)) => return TypeRef::map(TypeRef::Any),
            _ => {}
        }

        if has_properties(node) {
            return TypeRef::NamedModel(self.synthesize_model(hint, location, node));
        }
        TypeRef::Any
    }

    fn type_of_reference(&mut self, target: &str, location: &str) -> TypeRef {
        let resolved = match self.resolver.resolve(target, self.document) {
            Ok(Resolution::Node(resolved)) => resolved,
            Ok(Resolution::Cycle(marker)) => {
                return match self.pointer_ids.get(&marker.pointer).cloned() {
                    Some(id) => TypeRef::NamedModel(id),
                    None => {
                        let err = AppError::General(format!(
                            "reference cycle through non-model schema {}",
                            marker.pointer
                        ));
                        self.degrade(location, &err)
                    }
                };
            }
            Err(e) => return self.degrade(location, &e),
        };

        let pointer = match canonical_pointer(target) {
            Ok(p) => p,
            Err(e) => return self.degrade(location, &e),
        };

        // Named component schema: build it under its own name.
        if let Some(name) = extract_component_name(target, "schemas") {
            return match lookup(target, self.document) {
                Ok(raw) => TypeRef::NamedModel(self.build_named_schema(&pointer, &name, raw)),
                Err(e) => self.degrade(location, &e),
            };
        }

        // Any other pointer: objects become pointer-keyed models, everything
        // else is inlined.
        let name = last_segment(target);
        if is_object_shaped(resolved) && has_properties(resolved) {
            return TypeRef::NamedModel(self.build_named_schema(&pointer, &name, resolved));
        }
        if !self.resolver.enter(&pointer) {
            let err = AppError::General(format!(
                "reference cycle through non-model schema {}",
                pointer
            ));
            return self.degrade(location, &err);
        }
        let ty = self.type_of(resolved, &sanitize_type(&name), &pointer);
        self.resolver.leave(&pointer);
        ty
    }

    /// Registers a model for an inline object schema under a fresh identifier.
    pub(crate) fn synthesize_model(&mut self, hint: &str, location: &str, node: &'d Value) -> String {
        let identifier = self.allocate_type_identifier(hint);
        debug!(identifier = identifier.as_str(), location, "Synthesizing inline model");
        self.models
            .insert(identifier.clone(), Model::placeholder(&identifier, node.clone()));

        let fields = self.build_fields(&identifier, location, node);
        if let Some(model) = self.models.get_mut(&identifier) {
            model.fields = fields;
            model.description = node
                .get("description")
                .and_then(Value::as_str)
                .map(String::from);
            model.state = ModelState::Complete;
        }
        identifier
    }
}
