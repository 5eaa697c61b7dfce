#![deny(missing_docs)]

//! # Response Selection
//!
//! The modeled response is the first `2xx` entry in document order, falling
//! back to `default`. Other status codes are ignored.

use serde_json::Value;

/// Returns `(status key, response node)` of the response to model.
pub fn select_success_response(responses: &Value) -> Option<(&str, &Value)> {
    let map = responses.as_object()?;
    map.iter()
        .find(|(code, _)| code.starts_with('2'))
        .or_else(|| map.iter().find(|(code, _)| code.as_str() == "default"))
        .map(|(code, response)| (code.as_str(), response))
}
