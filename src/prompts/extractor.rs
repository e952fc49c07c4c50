//! Pulls the JSON object out of free-form model output.
//!
//! The model is told to answer with JSON only, but replies are often wrapped
//! in prose. Only the first top-level object is considered; a reply holding
//! several independent objects yields the first one.

use serde_json::Value;
use thiserror::Error;

use crate::models::TuningConfiguration;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("no JSON object found in model output")]
    NoJsonFound,

    #[error("malformed JSON in model output: {0}")]
    MalformedJson(#[from] serde_json::Error),
}

/// Locate the JSON object substring in `raw`.
///
/// Scans from the first `{` with a string-aware depth counter. When the braces
/// never balance, falls back to the span ending at the last `}` and lets the
/// parser report the damage.
pub fn locate_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let last = raw.rfind('}')?;
    if last < start {
        return None;
    }

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, ch) in raw[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&raw[start..=start + i]);
                }
            }
            _ => {}
        }
    }

    Some(&raw[start..=last])
}

pub fn extract_json(raw: &str) -> Result<Value, ExtractError> {
    let json = locate_json_object(raw).ok_or(ExtractError::NoJsonFound)?;
    Ok(serde_json::from_str(json)?)
}

pub fn parse_tuning(raw: &str) -> Result<TuningConfiguration, ExtractError> {
    let json = locate_json_object(raw).ok_or(ExtractError::NoJsonFound)?;
    Ok(serde_json::from_str(json)?)
}
