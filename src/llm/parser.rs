//! Turn raw model output into a validated ActionPlan
//!
//! Models wrap JSON in markdown fences or chat around it, so parsing is
//! forgiving about the envelope but strict about the shape: an object with
//! a non-empty string `action`. Anything else is a failure for the tier
//! that produced it.

use crate::core::error::{AgentError, Result};
use crate::core::types::ActionPlan;
use serde_json::Value;

/// Parse and validate a plan from model output
pub fn parse_plan(response: &str) -> Result<ActionPlan> {
    let trimmed = response.trim();

    let value = match serde_json::from_str::<Value>(trimmed) {
        Ok(value) => value,
        Err(_) => match fenced_body(trimmed).and_then(|body| serde_json::from_str(body).ok()) {
            Some(value) => value,
            None => {
                let json_str = extract_json(response)?;
                serde_json::from_str(json_str).map_err(|e| {
                    AgentError::Reasoning(format!(
                        "Failed to parse plan: {} - Response: {}",
                        e,
                        preview(response)
                    ))
                })?
            }
        },
    };

    ActionPlan::from_value(value).map_err(AgentError::Reasoning)
}

/// Body of a fence wrapping the whole text, without its language tag
///
/// Only text that opens with ``` counts as fenced; the body runs to the last
/// fence, or to the end when the fence is never closed.
fn fenced_body(text: &str) -> Option<&str> {
    let after = text.strip_prefix("```")?;
    // Drop a language tag on the opening line ("json", "JSON", ...)
    let body = match after.find('\n') {
        Some(nl) if after[..nl].trim().chars().all(|c| c.is_ascii_alphanumeric()) => {
            &after[nl + 1..]
        }
        _ => after,
    };
    match body.rfind("```") {
        Some(close) => Some(body[..close].trim()),
        None => Some(body.trim()),
    }
}

/// Extract JSON object from LLM response (handles surrounding text)
fn extract_json(response: &str) -> Result<&str> {
    let start = response
        .find('{')
        .ok_or_else(|| AgentError::Reasoning("No JSON found in response".into()))?;
    let end = response
        .rfind('}')
        .ok_or_else(|| AgentError::Reasoning("No closing brace found in response".into()))?;
    if end < start {
        return Err(AgentError::Reasoning("No JSON object found in response".into()));
    }
    Ok(&response[start..=end])
}

fn preview(text: &str) -> String {
    text.chars().take(120).collect()
}
