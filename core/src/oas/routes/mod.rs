#![deny(missing_docs)]

//! Parsing logic for OpenAPI Paths.
//!
//! Iterates over the `paths` section in document order and converts every
//! operation (GET, POST, etc.) into an `Operation` with merged parameters and
//! resolved request/response bodies.

pub mod builder;

use crate::error::AppError;
use crate::oas::context::ParseContext;
use crate::oas::models::HttpMethod;
use crate::oas::ref_utils::join_pointer;
use serde_json::Value;

impl<'d> ParseContext<'d> {
    /// Builds operations for every path item, preserving document order.
    pub(crate) fn build_paths(&mut self) {
        let Some(paths) = self.document.get("paths").and_then(Value::as_object) else {
            return;
        };

        for (path, raw_item) in paths {
            let location = join_pointer(["paths", path.as_str()]);
            // Path items may themselves be `$ref`s.
            let Some(item) = self.follow(raw_item, &location) else {
                continue;
            };
            let Some(entries) = item.as_object() else {
                let err = AppError::General("path item is not a mapping".into());
                self.degrade(&location, &err);
                continue;
            };

            // Shared parameters are dereferenced once; failures are recorded
            // against the path item, not each operation.
            let shared = self.collect_parameter_entries(item.get("parameters"), &location);

            for (key, operation) in entries {
                let Some(method) = HttpMethod::from_key(key) else {
                    continue;
                };
                if !operation.is_object() {
                    let err = AppError::General(format!("{} operation is not a mapping", method));
                    self.degrade(&format!("{}/{}", location, key), &err);
                    continue;
                }
                let built = self.build_operation(method, path, item, &shared, operation);
                self.operations.push(built);
            }
        }
    }
}
