#![deny(missing_docs)]

//! # Route Builder
//!
//! Builds one `Operation` from a path item and one of its method entries.

use crate::error::AppError;
use crate::oas::context::ParseContext;
use crate::oas::models::{HttpMethod, Operation, ParamLocation, Parameter, TypeRef};
use crate::oas::naming::{derive_operation_id, sanitize_value};
use crate::oas::ref_utils::join_pointer;
use crate::oas::resolver::params::dedupe_identifiers;
use crate::oas::resolver::{
    merge_parameters, select_media_schema, select_success_response, ParameterEntry,
};
use serde_json::Value;

impl<'d> ParseContext<'d> {
    /// Builds a single operation.
    ///
    /// # Arguments
    ///
    /// * `method` - HTTP method of the entry.
    /// * `path` - URL template, e.g. `/pets/{petId}`.
    /// * `path_item` - The (dereferenced) path item, for summary defaults.
    /// * `shared` - Path-level parameter entries, collected once per path item.
    /// * `operation` - The operation object.
    pub(crate) fn build_operation(
        &mut self,
        method: HttpMethod,
        path: &str,
        path_item: &'d Value,
        shared: &[ParameterEntry<'d>],
        operation: &'d Value,
    ) -> Operation {
        let method_key = method.as_str().to_ascii_lowercase();
        let location = join_pointer(["paths", path, method_key.as_str()]);

        // 1. Identifier
        let base = match operation.get("operationId").and_then(Value::as_str) {
            Some(op_id) => sanitize_value(op_id),
            None => derive_operation_id(method.as_str(), path),
        };
        let identifier = self.allocate_operation_identifier(&base);

        // 2. Parameters (path level first, operation level overrides)
        let own = self.collect_parameter_entries(operation.get("parameters"), &location);
        let mut parameters: Vec<Parameter> = merge_parameters(shared.to_vec(), own)
            .into_iter()
            .map(|entry| self.build_parameter(&identifier, &entry))
            .collect();
        dedupe_identifiers(&mut parameters);

        // 3. Request body
        let request_body = operation
            .get("requestBody")
            .and_then(|body| self.request_body_type(&identifier, body, &location));

        // 4. Response body
        let response_body = operation
            .get("responses")
            .and_then(|responses| self.response_body_type(&identifier, responses, &location));

        // 5. Metadata (path-item summary/description act as defaults)
        let text = |key: &str| {
            operation
                .get(key)
                .or_else(|| path_item.get(key))
                .and_then(Value::as_str)
                .map(String::from)
        };

        Operation {
            identifier,
            method,
            path: path.to_string(),
            summary: text("summary"),
            description: text("description"),
            parameters,
            request_body,
            response_body,
            tags: operation
                .get("tags")
                .and_then(Value::as_array)
                .map(|tags| tags.iter().filter_map(Value::as_str).map(String::from).collect())
                .unwrap_or_default(),
            deprecated: operation
                .get("deprecated")
                .and_then(Value::as_bool)
                .unwrap_or(false),
        }
    }

    /// Dereferences a `parameters` list and checks each entry's `name` and `in`.
    ///
    /// Broken entries are recorded under `{location}/parameters/{index}` and
    /// skipped.
    pub(crate) fn collect_parameter_entries(
        &mut self,
        list: Option<&'d Value>,
        location: &str,
    ) -> Vec<ParameterEntry<'d>> {
        let Some(items) = list.and_then(Value::as_array) else {
            return Vec::new();
        };

        let mut entries = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let pointer = format!("{}/parameters/{}", location, index);
            let Some(node) = self.follow(item, &pointer) else {
                continue;
            };
            let Some(name) = node.get("name").and_then(Value::as_str) else {
                let err = AppError::General("parameter without 'name'".into());
                self.degrade(&pointer, &err);
                continue;
            };
            let raw_location = node.get("in").and_then(Value::as_str).unwrap_or_default();
            let Some(param_location) = ParamLocation::parse(raw_location) else {
                let err = AppError::General(format!(
                    "parameter '{}' has unsupported location '{}'",
                    name, raw_location
                ));
                self.degrade(&pointer, &err);
                continue;
            };
            entries.push(ParameterEntry {
                name,
                location: param_location,
                node,
                pointer,
            });
        }
        entries
    }

    fn build_parameter(&mut self, operation_id: &str, entry: &ParameterEntry<'d>) -> Parameter {
        let node = entry.node;

        // `schema`, else the first `content` entry, else a bare typed parameter.
        let schema = node
            .get("schema")
            .or_else(|| {
                node.get("content")
                    .and_then(Value::as_object)
                    .and_then(|content| content.values().next())
                    .and_then(|media| media.get("schema"))
            })
            .or_else(|| node.get("type").map(|_| node));
        let ty = match schema {
            Some(schema) => self.type_of(
                schema,
                &format!("{}_{}", operation_id, entry.name),
                &format!("{}/schema", entry.pointer),
            ),
            None => TypeRef::Any,
        };

        let required = entry.location == ParamLocation::Path
            || node.get("required").and_then(Value::as_bool).unwrap_or(false);

        Parameter {
            original_name: entry.name.to_string(),
            identifier: sanitize_value(entry.name),
            location: entry.location,
            ty,
            required,
            description: node
                .get("description")
                .and_then(Value::as_str)
                .map(String::from),
        }
    }

    fn request_body_type(&mut self, operation_id: &str, body: &'d Value, location: &str) -> Option<TypeRef> {
        let location = format!("{}/requestBody", location);
        let body = self.follow(body, &location)?;
        let schema = select_media_schema(body.get("content")?, true)?;
        Some(self.type_of(schema, &format!("{}_RequestBody", operation_id), &location))
    }

    fn response_body_type(&mut self, operation_id: &str, responses: &'d Value, location: &str) -> Option<TypeRef> {
        let (code, response) = select_success_response(responses)?;
        let location = format!("{}/responses/{}", location, code);
        let response = self.follow(response, &location)?;
        let schema = select_media_schema(response.get("content")?, false)?;
        Some(self.type_of(schema, &format!("{}_ResponseBody", operation_id), &location))
    }
}
