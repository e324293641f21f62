//! # Transcript Module
//!
//! Turns one Claude Code transcript (JSONL) into [`ToolRecord`]s and
//! [`AssistantRecord`]s.
//!
//! Two line layouts are understood:
//! - transcript lines: `{"type":"assistant","sessionId":..,"cwd":..,"message":{"model":..,"usage":{..},"content":[..]}}`
//!   where each `tool_use` content item is one tool call
//! - legacy tool-log lines: `{"tool_name":"Skill","session_id":..,"detail":{"skill_name":..}}`
//!   where the whole line is one tool call
//!
//! Lines that are not JSON objects are skipped, and an unreadable file yields
//! nothing. A transcript may be appended to while it is read.

use chrono::NaiveDateTime;
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;

use crate::models::{AssistantRecord, TokenUsage, ToolRecord};
use crate::utils::parse_timestamp;

/// Records extracted from one source, each in log order.
#[derive(Debug, Default, Clone)]
pub struct Extracted {
    pub tools: Vec<ToolRecord>,
    pub assistants: Vec<AssistantRecord>,
}

/// Extract records at or after `start` from the transcript at `path`.
pub fn extract_entries(path: &Path, start: NaiveDateTime) -> Extracted {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(err) => {
            tracing::debug!(path = %path.display(), %err, "skipping unreadable transcript");
            return Extracted::default();
        }
    };
    let source = path.to_string_lossy();
    extract_from_reader(BufReader::new(file), start, &source)
}

/// Same as [`extract_entries`] over any line source; `source` is recorded on
/// every record.
pub fn extract_from_reader<R: BufRead>(reader: R, start: NaiveDateTime, source: &str) -> Extracted {
    let mut out = Extracted::default();
    for line in reader.lines() {
        let line = match line {
            Ok(l) => l,
            // Invalid UTF-8: the line is already consumed, move on.
            Err(err) if err.kind() == ErrorKind::InvalidData => continue,
            Err(err) => {
                tracing::debug!(source, %err, "stopping on read error");
                break;
            }
        };
        let t = line.trim();
        if t.is_empty() {
            continue;
        }
        let v: Value = match serde_json::from_str(t) {
            Ok(v) => v,
            Err(_) => continue,
        };
        let Some(entry) = v.as_object() else {
            continue;
        };
        extract_line(entry, start, source, &mut out);
    }
    out
}

fn str_field<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    obj.get(key).and_then(|v| v.as_str())
}

fn extract_line(entry: &Map<String, Value>, start: NaiveDateTime, source: &str, out: &mut Extracted) {
    let ts = str_field(entry, "timestamp").and_then(parse_timestamp);
    if let Some(ts) = ts {
        if ts < start {
            return;
        }
    }

    let session_id = str_field(entry, "sessionId")
        .or_else(|| str_field(entry, "session_id"))
        .unwrap_or("");
    let cwd = str_field(entry, "cwd").unwrap_or("");

    if let Some(tool_name) = str_field(entry, "tool_name") {
        out.tools.push(ToolRecord {
            timestamp: ts,
            session_id: session_id.to_string(),
            cwd: cwd.to_string(),
            model: str_field(entry, "model").unwrap_or("").to_string(),
            tool_name: tool_name.to_string(),
            tool_input: legacy_detail_input(entry.get("detail")),
            file: source.to_string(),
        });
        return;
    }

    let message = entry.get("message");
    let content = message.and_then(|m| m.get("content")).and_then(|c| c.as_array());
    let model = message
        .and_then(|m| m.get("model"))
        .and_then(|m| m.as_str())
        .unwrap_or("");

    if str_field(entry, "type") == Some("assistant") && !model.is_empty() {
        let has_thinking = content
            .map(|items| items.iter().any(|item| item_type(item) == Some("thinking")))
            .unwrap_or(false);
        out.assistants.push(AssistantRecord {
            timestamp: ts,
            session_id: session_id.to_string(),
            cwd: cwd.to_string(),
            model: model.to_string(),
            usage: TokenUsage::from_value(message.and_then(|m| m.get("usage"))),
            has_thinking,
            file: source.to_string(),
        });
    }

    let Some(items) = content else {
        return;
    };
    for item in items {
        if item_type(item) != Some("tool_use") {
            continue;
        }
        let tool_name = item.get("name").and_then(|n| n.as_str()).unwrap_or("unknown");
        let tool_input = item
            .get("input")
            .and_then(|i| i.as_object())
            .cloned()
            .unwrap_or_default();
        out.tools.push(ToolRecord {
            timestamp: ts,
            session_id: session_id.to_string(),
            cwd: cwd.to_string(),
            model: model.to_string(),
            tool_name: tool_name.to_string(),
            tool_input,
            file: source.to_string(),
        });
    }
}

fn item_type(item: &Value) -> Option<&str> {
    item.get("type").and_then(|t| t.as_str())
}

/// Legacy logs keep tool arguments under `detail`, with the skill name as
/// `skill_name` instead of `skill`.
fn legacy_detail_input(detail: Option<&Value>) -> Map<String, Value> {
    let mut input = detail
        .and_then(|d| d.as_object())
        .cloned()
        .unwrap_or_default();
    if !input.contains_key("skill") {
        if let Some(name) = input.get("skill_name").cloned() {
            input.insert("skill".to_string(), name);
        }
    }
    input
}
