#![deny(missing_docs)]

//! # Parameter Merging
//!
//! Path-item parameters come first. An operation parameter with the same
//! `(name, in)` replaces the path-level one at its original position; any
//! other operation parameter is appended. Merging happens on the raw
//! entries so that a replaced path-level parameter is never built.

use crate::oas::models::{ParamLocation, Parameter};
use crate::oas::naming::disambiguate;
use serde_json::Value;
use std::collections::HashSet;

/// A dereferenced parameter object whose `name` and `in` have been checked.
#[derive(Debug, Clone)]
pub struct ParameterEntry<'d> {
    /// Wire name (`name`).
    pub name: &'d str,
    /// Location (`in`).
    pub location: ParamLocation,
    /// The parameter object itself, after `$ref` resolution.
    pub node: &'d Value,
    /// JSON Pointer of the entry in the document, for diagnostics.
    pub pointer: String,
}

/// Merges operation-level entries over path-level ones.
///
/// # Arguments
///
/// * `path_level` - Entries declared on the path item.
/// * `operation_level` - Entries declared on the operation.
pub fn merge_parameters<'d>(
    path_level: Vec<ParameterEntry<'d>>,
    operation_level: Vec<ParameterEntry<'d>>,
) -> Vec<ParameterEntry<'d>> {
    let mut merged = path_level;
    for entry in operation_level {
        let existing = merged
            .iter_mut()
            .find(|e| e.name == entry.name && e.location == entry.location);
        match existing {
            Some(slot) => *slot = entry,
            None => merged.push(entry),
        }
    }
    merged
}

/// Makes parameter identifiers unique within one operation.
///
/// `petId` in the path and `pet_id` in the query both sanitize to `pet_id`;
/// the later one becomes `pet_id_query`.
pub fn dedupe_identifiers(params: &mut [Parameter]) {
    let mut taken: HashSet<String> = HashSet::new();
    for param in params.iter_mut() {
        if taken.contains(&param.identifier) {
            let base = format!("{}_{}", param.identifier, param.location.as_str());
            param.identifier = disambiguate(&base, "_", |c| taken.contains(c));
        }
        taken.insert(param.identifier.clone());
    }
}
