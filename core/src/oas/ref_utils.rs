#![deny(missing_docs)]

//! # Reference Utilities
//!
//! Helpers for classifying `$ref` strings and splitting same-document
//! JSON Pointers (`#/components/schemas/Pet`) into decoded segments.
//!
//! These helpers never fetch anything: only `#/...` pointers are usable.

use crate::error::{AppError, AppResult};
use percent_encoding::percent_decode_str;
use url::Url;

/// The syntactic kind of a `$ref` target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    /// Same-document fragment (`#/...`).
    Local,
    /// Relative document reference (`other.yaml#/...`).
    Relative,
    /// Absolute URI (`https://...`).
    Remote,
}

/// Classifies a `$ref` string.
pub fn classify_reference(ref_str: &str) -> ReferenceKind {
    if ref_str.starts_with('#') {
        ReferenceKind::Local
    } else if Url::parse(ref_str).is_ok() {
        ReferenceKind::Remote
    } else {
        ReferenceKind::Relative
    }
}

/// Splits a local pointer into decoded segments.
///
/// Fails with `UnsupportedReference` for anything that is not `#/...`.
pub fn pointer_segments(ref_str: &str) -> AppResult<Vec<String>> {
    match classify_reference(ref_str) {
        ReferenceKind::Local => {}
        kind => {
            return Err(AppError::UnsupportedReference(format!(
                "{} ({:?} references are not supported)",
                ref_str, kind
            )))
        }
    }

    let pointer = ref_str.strip_prefix("#/").ok_or_else(|| {
        AppError::UnsupportedReference(format!("{} (expected a '#/...' pointer)", ref_str))
    })?;

    Ok(pointer.split('/').map(decode_pointer_segment).collect())
}

/// Extracts a component name from a `$ref` if it points to `#/components/{section}/{name}`.
pub fn extract_component_name(ref_str: &str, section: &str) -> Option<String> {
    let segments = pointer_segments(ref_str).ok()?;
    match segments.as_slice() {
        [components, sec, name] if components == "components" && sec == section => {
            if name.is_empty() {
                None
            } else {
                Some(name.clone())
            }
        }
        _ => None,
    }
}

/// Returns the decoded final segment of a pointer, or the raw string when it
/// cannot be split.
pub fn last_segment(ref_str: &str) -> String {
    pointer_segments(ref_str)
        .ok()
        .and_then(|segments| segments.last().cloned())
        .unwrap_or_else(|| ref_str.to_string())
}

/// Rebuilds a pointer from its decoded segments, so that differently escaped
/// spellings of the same target compare equal.
pub fn canonical_pointer(ref_str: &str) -> AppResult<String> {
    let segments = pointer_segments(ref_str)?;
    Ok(join_pointer(segments.iter().map(String::as_str)))
}

/// Joins raw (unescaped) segments into a `#/...` pointer.
pub fn join_pointer<'a>(segments: impl IntoIterator<Item = &'a str>) -> String {
    let mut pointer = String::from("#");
    for segment in segments {
        pointer.push('/');
        pointer.push_str(&encode_pointer_segment(segment));
    }
    pointer
}

/// Escapes a raw segment for use inside a pointer (`~` -> `~0`, `/` -> `~1`).
pub fn encode_pointer_segment(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

/// Decodes a JSON Pointer segment (handles `~1`, `~0`, and percent-encoding).
pub fn decode_pointer_segment(segment: &str) -> String {
    let decoded = segment.replace("~1", "/").replace("~0", "~");
    percent_decode_str(&decoded)
        .decode_utf8_lossy()
        .into_owned()
}
