//! JSON Extraction
//!
//! The model is instructed to answer with a single JSON object, but real
//! responses arrive wrapped in markdown fences or surrounded by prose.
//! This module recovers the payload without retrying the call: anything it
//! cannot recover is a malformed-output failure, not a transport one.

use serde_json::Value;
use tracing::debug;

use crate::types::{Result, WardenError};

/// Extract and parse the JSON object from an LLM response.
///
/// Tries, in order: direct parse, fence stripping, and scanning for the
/// first balanced object embedded in surrounding text.
pub fn extract_json(stage: &'static str, content: &str) -> Result<Value> {
    let trimmed = content.trim();

    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return Ok(value);
    }

    let unfenced = strip_code_fences(trimmed);
    if let Ok(value) = serde_json::from_str::<Value>(&unfenced) {
        debug!(stage, "Parsed JSON after stripping code fences");
        return Ok(value);
    }

    if let Some(embedded) = find_balanced_object(&unfenced)
        && let Ok(value) = serde_json::from_str::<Value>(embedded)
    {
        debug!(stage, "Extracted JSON embedded in prose");
        return Ok(value);
    }

    Err(WardenError::malformed(
        stage,
        "response contains no parseable JSON object",
        content,
    ))
}

/// Strip markdown code fences (```json ... ``` or ``` ... ```)
fn strip_code_fences(s: &str) -> String {
    let mut result = s.trim().to_string();

    if result.starts_with("```")
        && let Some(first_newline) = result.find('\n')
    {
        result = result[first_newline + 1..].to_string();
    }

    if result.ends_with("```") {
        result = result[..result.len() - 3].trim_end().to_string();
    }

    result
}

/// Find the first balanced `{...}` in mixed content, string-aware
fn find_balanced_object(s: &str) -> Option<&str> {
    let start = s.find('{')?;

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape = false;

    for (i, ch) in s[start..].char_indices() {
        if escape {
            escape = false;
            continue;
        }

        match ch {
            '\\' if in_string => escape = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&s[start..start + i + 1]);
                }
            }
            _ => {}
        }
    }

    None
}
