//! Response-shape normalization
//!
//! Model servers disagree about what a generation response looks like.
//! `extract_text` walks a prioritized chain of optional pattern matches over
//! the response value; each step yields `None` instead of failing, and the
//! chain terminates in a guaranteed stringify fallback.

use serde_json::Value;

/// Extract generated text from an arbitrary model response value.
///
/// Priority order:
/// 1. `choices[0].message.content`, then `choices[0].text`, then
///    `choices[0].delta.content` (streaming-delta shape)
/// 2. top-level string field `text`, `result`, `output_text`, or `response`
/// 3. `data[0].text`, then `data[0].content`
/// 4. stringified input as a last resort
pub fn extract_text(value: &Value) -> String {
    from_choices(value)
        .or_else(|| from_top_level(value))
        .or_else(|| from_data(value))
        .unwrap_or_else(|| value.to_string())
}

/// OpenAI-style `choices` array
fn from_choices(value: &Value) -> Option<String> {
    let choice = value.get("choices")?.as_array()?.first()?;

    if let Some(content) = choice
        .get("message")
        .and_then(|m| m.get("content"))
        .and_then(Value::as_str)
    {
        return Some(content.to_string());
    }

    if let Some(text) = choice.get("text").and_then(Value::as_str) {
        return Some(text.to_string());
    }

    choice
        .get("delta")
        .and_then(|d| d.get("content"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Direct top-level string fields, checked in fixed order
fn from_top_level(value: &Value) -> Option<String> {
    ["text", "result", "output_text", "response"]
        .iter()
        .find_map(|key| value.get(key).and_then(Value::as_str))
        .map(str::to_string)
}

/// `{"data": [{"text": ...}]}` variant
fn from_data(value: &Value) -> Option<String> {
    let first = value.get("data")?.as_array()?.first()?;
    ["text", "content"]
        .iter()
        .find_map(|key| first.get(key).and_then(Value::as_str))
        .map(str::to_string)
}
