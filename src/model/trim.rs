//! History trimming for outbound model payloads
//!
//! Bounds a conversation by message count, per-message length, and aggregate
//! length before it goes upstream. Pure functions over copies; stored
//! session history is never mutated.

use crate::session::ChatMessage;
use serde::{Deserialize, Serialize};

/// Trimming limits for the outbound message list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrimLimits {
    /// Keep at most this many messages
    #[serde(default = "default_max_count")]
    pub max_count: usize,

    /// Truncate any single message to this many characters, keeping the tail
    #[serde(default = "default_max_msg_chars")]
    pub max_msg_chars: usize,

    /// Approximate aggregate character budget across all retained messages
    #[serde(default = "default_max_total_chars")]
    pub max_total_chars: usize,
}

fn default_max_count() -> usize {
    24
}
fn default_max_msg_chars() -> usize {
    3_000
}
fn default_max_total_chars() -> usize {
    14_000
}

impl Default for TrimLimits {
    fn default() -> Self {
        Self {
            max_count: default_max_count(),
            max_msg_chars: default_max_msg_chars(),
            max_total_chars: default_max_total_chars(),
        }
    }
}

/// Trim a message list to the configured limits.
///
/// Keeps the most recent `max_count` messages, truncates each retained
/// message to its trailing `max_msg_chars` characters (recent context within
/// a message matters most), then drops oldest messages while the aggregate
/// exceeds `max_total_chars` and more than one message remains. A non-empty
/// input never produces an empty output: a single oversized message is kept
/// even when it alone exceeds the aggregate cap.
pub fn trim_messages(messages: &[ChatMessage], limits: &TrimLimits) -> Vec<ChatMessage> {
    if messages.is_empty() {
        return Vec::new();
    }

    let start = messages.len().saturating_sub(limits.max_count);
    let mut kept: Vec<ChatMessage> = messages[start..]
        .iter()
        .map(|m| {
            let mut m = m.clone();
            m.content = tail_chars(&m.content, limits.max_msg_chars);
            m
        })
        .collect();

    let mut total: usize = kept.iter().map(|m| m.content.chars().count()).sum();
    while total > limits.max_total_chars && kept.len() > 1 {
        let dropped = kept.remove(0);
        total -= dropped.content.chars().count();
    }

    kept
}

/// Keep the trailing `max` characters of a string
fn tail_chars(s: &str, max: usize) -> String {
    let count = s.chars().count();
    if count <= max {
        return s.to_string();
    }
    s.chars().skip(count - max).collect()
}
