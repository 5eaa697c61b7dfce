#![deny(missing_docs)]

//! # Body Selection
//!
//! Picks the schema to model from a `content` map.
//!
//! Preference order: `application/json`, any `+json` type, `*/*`, and for
//! request bodies `application/octet-stream` as a last resort.

use serde_json::{Map, Value};

/// Selects the schema of the preferred media type in a `content` object.
///
/// # Arguments
///
/// * `content` - The `content` object of a request body or response.
/// * `allow_octet_stream` - Accept raw binary uploads (request bodies only).
pub fn select_media_schema(content: &Value, allow_octet_stream: bool) -> Option<&Value> {
    let media = content.as_object()?;

    find_media(media, |m| m == "application/json")
        .or_else(|| find_media(media, |m| m.ends_with("+json")))
        .or_else(|| find_media(media, |m| m == "*/*"))
        .or_else(|| {
            if allow_octet_stream {
                find_media(media, |m| m == "application/octet-stream")
            } else {
                None
            }
        })
}

fn find_media<'a>(media: &'a Map<String, Value>, accept: impl Fn(&str) -> bool) -> Option<&'a Value> {
    media
        .iter()
        .find(|(key, _)| accept(media_essence(key).as_str()))
        .and_then(|(_, entry)| entry.get("schema"))
}

/// Lowercased media type without parameters (`application/json; charset=utf-8` -> `application/json`).
fn media_essence(key: &str) -> String {
    key.split(';')
        .next()
        .unwrap_or(key)
        .trim()
        .to_ascii_lowercase()
}
