//! Text extraction from frame payloads

use serde_json::{Map, Value};
use thiserror::Error;

/// Top-level fields that may carry the generated text, in priority order
const TEXT_FIELDS: [&str; 3] = ["content", "text", "response"];

/// Fields of a nested `data` object, in priority order
const NESTED_TEXT_FIELDS: [&str; 2] = ["content", "text"];

/// Why a payload could not be read as structured data
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("payload is not JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("payload is JSON but not an object")]
    NotAnObject,
}

/// Extract the text fragment from a structured payload
///
/// Returns the first non-empty string among `content`, `text` and `response`,
/// then `data.content` and `data.text`. An object carrying none of them yields
/// an empty string. Payloads that are not a JSON object are reported as
/// errors; the caller decides how to fall back.
pub fn extract_text(payload: &str) -> Result<String, ExtractError> {
    let value: Value = serde_json::from_str(payload)?;
    let object = value.as_object().ok_or(ExtractError::NotAnObject)?;

    if let Some(text) = first_text(object, &TEXT_FIELDS) {
        return Ok(text);
    }

    let nested = object
        .get("data")
        .and_then(Value::as_object)
        .and_then(|data| first_text(data, &NESTED_TEXT_FIELDS));

    Ok(nested.unwrap_or_default())
}

fn first_text(object: &Map<String, Value>, fields: &[&str]) -> Option<String> {
    fields
        .iter()
        .filter_map(|field| object.get(*field).and_then(Value::as_str))
        .find(|text| !text.is_empty())
        .map(str::to_string)
}
