use chrono::NaiveDateTime;
use serde_json::{Map, Value};

/// One `tool_use` content item (or one legacy tool-log line).
#[derive(Debug, Clone)]
pub struct ToolRecord {
    pub timestamp: Option<NaiveDateTime>,
    pub session_id: String,
    pub cwd: String,
    /// Model of the message that carried the invocation; empty for legacy lines
    pub model: String,
    pub tool_name: String,
    /// Tool input as logged. Shape depends on the tool, so read it through
    /// [`ToolRecord::arg_str`] with an explicit default.
    pub tool_input: Map<String, Value>,
    /// Transcript file the record came from
    pub file: String,
}

impl ToolRecord {
    /// String-valued argument, `None` when absent or not a string.
    pub fn arg_str(&self, key: &str) -> Option<&str> {
        self.tool_input.get(key).and_then(|v| v.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub cache_read_input_tokens: u64,
    pub cache_creation_input_tokens: u64,
}

impl TokenUsage {
    /// Reads a `message.usage` object; missing or non-integer counters are 0.
    pub fn from_value(v: Option<&Value>) -> Self {
        let get = |k: &str| v.and_then(|u| u.get(k)).and_then(|n| n.as_u64()).unwrap_or(0);
        Self {
            input_tokens: get("input_tokens"),
            output_tokens: get("output_tokens"),
            cache_read_input_tokens: get("cache_read_input_tokens"),
            cache_creation_input_tokens: get("cache_creation_input_tokens"),
        }
    }
}

/// One `assistant` message with a model id.
#[derive(Debug, Clone)]
pub struct AssistantRecord {
    pub timestamp: Option<NaiveDateTime>,
    pub session_id: String,
    pub cwd: String,
    pub model: String,
    pub usage: TokenUsage,
    pub has_thinking: bool,
    pub file: String,
}
