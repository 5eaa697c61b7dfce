#![deny(missing_docs)]

//! # Struct Fields
//!
//! Builds the ordered field list of an object-shaped schema.

use crate::oas::context::ParseContext;
use crate::oas::models::ModelField;
use crate::oas::naming::{disambiguate, sanitize_value};
use crate::oas::ref_utils::encode_pointer_segment;
use crate::oas::resolver::schema_type;
use serde_json::Value;
use std::collections::HashSet;

impl<'d> ParseContext<'d> {
    /// Builds fields for every entry of `properties`, in document order.
    ///
    /// # Arguments
    ///
    /// * `model_id` - Identifier of the owning model (prefix for inline names).
    /// * `location` - Pointer of the owning schema, for diagnostics.
    /// * `node` - The object schema.
    pub(crate) fn build_fields(&mut self, model_id: &str, location: &str, node: &'d Value) -> Vec<ModelField> {
        let Some(properties) = node.get("properties").and_then(Value::as_object) else {
            return Vec::new();
        };
        let required: HashSet<&str> = node
            .get("required")
            .and_then(Value::as_array)
            .map(|names| names.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();

        let mut taken: HashSet<String> = HashSet::new();
        let mut fields = Vec::with_capacity(properties.len());
        for (index, (name, property)) in properties.iter().enumerate() {
            let identifier = unique_field_identifier(&sanitize_value(name), index, &taken);
            taken.insert(identifier.clone());

            let ty = self.type_of(
                property,
                &format!("{}_{}", model_id, name),
                &format!("{}/properties/{}", location, encode_pointer_segment(name)),
            );
            let (_, nullable) = schema_type(property);

            fields.push(ModelField {
                original_name: name.clone(),
                identifier,
                ty,
                required: required.contains(name.as_str()),
                nullable,
                description: property
                    .get("description")
                    .and_then(Value::as_str)
                    .map(String::from),
            });
        }
        fields
    }
}

/// Keeps `base` unless an earlier field already claimed it, in which case the
/// source field index is appended.
fn unique_field_identifier(base: &str, index: usize, taken: &HashSet<String>) -> String {
    if !taken.contains(base) {
        return base.to_string();
    }
    let indexed = format!("{}_{}", base, index);
    disambiguate(&indexed, "_", |c| taken.contains(c))
}
