//! Locates and parses the JSON payload inside free-form model output.
//!
//! The model is asked for JSON but frequently wraps it in prose. The first
//! `{...}` (or `[...]`) region is cut out with a lazy, multi-line match and
//! handed to `serde_json`. Partial or truncated JSON is never repaired.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use thiserror::Error;

static OBJECT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*?\}").expect("object pattern compiles"));
static ARRAY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\[.*?\]").expect("array pattern compiles"));

#[derive(Debug, Clone, PartialEq, Error)]
pub enum JsonExtractError {
    #[error("model output was empty")]
    Empty,

    #[error("no JSON object or array found in model output")]
    NotFound,

    #[error("JSON candidate could not be parsed: {0}")]
    Malformed(String),
}

/// Which top-level shape to look for first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonShape {
    Object,
    Array,
}

/// Extracts the first JSON object, falling back to the first JSON array.
pub fn extract_json(text: &str) -> Result<Value, JsonExtractError> {
    extract_json_as(text, JsonShape::Object)
}

/// Extracts JSON, trying the `preferred` shape before the other one.
///
/// Callers expecting an array must prefer arrays: a lazy object match would
/// otherwise pick the first element out of `[{...}, {...}]`.
pub fn extract_json_as(text: &str, preferred: JsonShape) -> Result<Value, JsonExtractError> {
    if text.trim().is_empty() {
        return Err(JsonExtractError::Empty);
    }

    let patterns: [&Regex; 2] = match preferred {
        JsonShape::Object => [&*OBJECT_PATTERN, &*ARRAY_PATTERN],
        JsonShape::Array => [&*ARRAY_PATTERN, &*OBJECT_PATTERN],
    };

    let mut last_error = None;
    for pattern in patterns {
        let Some(candidate) = pattern.find(text) else {
            continue;
        };
        match serde_json::from_str(candidate.as_str()) {
            Ok(value) => return Ok(value),
            Err(e) => last_error = Some(JsonExtractError::Malformed(e.to_string())),
        }
    }

    Err(last_error.unwrap_or(JsonExtractError::NotFound))
}
