//! # Aggregate Module
//!
//! Pure reductions over the merged record lists. Each function makes one pass
//! and owns its result; none depends on another.
//!
//! Keys keep the order in which they were first seen, which is what
//! [`rank`] uses to break ties between equal counts.

use chrono::Timelike;
use indexmap::IndexMap;

use crate::models::stats::{bump, percent};
use crate::models::{
    AssistantRecord, Counts, HourlyCounts, ModelThinking, SessionStats, ThinkingStats, TokenTotals,
    ToolRecord, WebStats,
};

pub const SKILL_TOOL: &str = "Skill";
pub const SLASH_COMMAND_TOOL: &str = "SlashCommand";
pub const TASK_TOOL: &str = "Task";
pub const FILE_TOOLS: [&str; 3] = ["Read", "Write", "Edit"];
pub const MCP_PREFIX: &str = "mcp__";
pub const WEB_SEARCH_TOOL: &str = "WebSearch";
pub const WEB_FETCH_TOOL: &str = "WebFetch";

const UNKNOWN: &str = "unknown";

fn or_unknown(s: &str) -> &str {
    if s.is_empty() { UNKNOWN } else { s }
}

pub fn by_tool(records: &[ToolRecord]) -> Counts {
    let mut counts = Counts::new();
    for r in records {
        bump(&mut counts, or_unknown(&r.tool_name));
    }
    counts
}

/// Skill name for a `Skill` or `SlashCommand` call, `None` for other tools.
pub fn skill_key(r: &ToolRecord) -> Option<&str> {
    match r.tool_name.as_str() {
        SKILL_TOOL => Some(r.arg_str("skill").unwrap_or(UNKNOWN)),
        SLASH_COMMAND_TOOL => {
            let command = r.arg_str("command").unwrap_or("").trim_start_matches('/');
            Some(or_unknown(command))
        }
        _ => None,
    }
}

/// Skill usage, folding `/name` slash commands into the same key as `Skill`.
pub fn by_skill(records: &[ToolRecord]) -> Counts {
    let mut counts = Counts::new();
    for key in records.iter().filter_map(skill_key) {
        bump(&mut counts, key);
    }
    counts
}

pub fn by_subagent(records: &[ToolRecord]) -> Counts {
    let mut counts = Counts::new();
    for r in records.iter().filter(|r| r.tool_name == TASK_TOOL) {
        bump(&mut counts, r.arg_str("subagent_type").unwrap_or(UNKNOWN));
    }
    counts
}

pub fn by_session(records: &[ToolRecord]) -> IndexMap<String, SessionStats> {
    let mut sessions: IndexMap<String, SessionStats> = IndexMap::new();
    for r in records {
        let stats = sessions
            .entry(or_unknown(&r.session_id).to_string())
            .or_default();
        stats.count += 1;
        bump(&mut stats.tools, or_unknown(&r.tool_name));
    }
    sessions
}

pub fn by_file(records: &[ToolRecord]) -> Counts {
    let mut counts = Counts::new();
    for r in records
        .iter()
        .filter(|r| FILE_TOOLS.contains(&r.tool_name.as_str()))
    {
        match r.arg_str("file_path") {
            Some(fp) if !fp.is_empty() => bump(&mut counts, fp),
            _ => {}
        }
    }
    counts
}

/// Server segment of `mcp__<server>__<tool>`.
pub fn mcp_server(tool_name: &str) -> Option<&str> {
    if !tool_name.starts_with(MCP_PREFIX) {
        return None;
    }
    Some(tool_name.split("__").nth(1).map(or_unknown).unwrap_or(UNKNOWN))
}

pub fn by_mcp(records: &[ToolRecord]) -> Counts {
    let mut counts = Counts::new();
    for server in records.iter().filter_map(|r| mcp_server(&r.tool_name)) {
        bump(&mut counts, server);
    }
    counts
}

pub fn by_model(records: &[AssistantRecord]) -> Counts {
    let mut counts = Counts::new();
    for r in records {
        bump(&mut counts, or_unknown(&r.model));
    }
    counts
}

pub fn tokens(records: &[AssistantRecord]) -> IndexMap<String, TokenTotals> {
    let mut totals: IndexMap<String, TokenTotals> = IndexMap::new();
    for r in records {
        let t = totals.entry(or_unknown(&r.model).to_string()).or_default();
        t.input_tokens = t.input_tokens.saturating_add(r.usage.input_tokens);
        t.output_tokens = t.output_tokens.saturating_add(r.usage.output_tokens);
        t.cache_read = t.cache_read.saturating_add(r.usage.cache_read_input_tokens);
        t.cache_creation = t
            .cache_creation
            .saturating_add(r.usage.cache_creation_input_tokens);
        t.requests += 1;
    }
    totals
}

/// Every call is counted; only non-empty queries/URLs are kept in the lists.
pub fn by_web(records: &[ToolRecord]) -> WebStats {
    let mut web = WebStats::default();
    for r in records {
        match r.tool_name.as_str() {
            WEB_SEARCH_TOOL => {
                web.search.count += 1;
                if let Some(q) = r.arg_str("query").filter(|q| !q.is_empty()) {
                    web.search.queries.push(q.to_string());
                }
            }
            WEB_FETCH_TOOL => {
                web.fetch.count += 1;
                if let Some(u) = r.arg_str("url").filter(|u| !u.is_empty()) {
                    web.fetch.urls.push(u.to_string());
                }
            }
            _ => {}
        }
    }
    web
}

/// Tool calls per working directory. Keys are raw paths; `~` shortening is a
/// display concern.
pub fn by_project(records: &[ToolRecord]) -> Counts {
    let mut counts = Counts::new();
    for r in records {
        bump(&mut counts, or_unknown(&r.cwd));
    }
    counts
}

pub fn thinking(records: &[AssistantRecord]) -> ThinkingStats {
    let mut by_model: IndexMap<String, ModelThinking> = IndexMap::new();
    let mut with_thinking = 0;
    for r in records {
        let m = by_model.entry(or_unknown(&r.model).to_string()).or_default();
        m.total += 1;
        if r.has_thinking {
            m.with_thinking += 1;
            with_thinking += 1;
        }
    }
    let total = records.len() as u64;
    ThinkingStats {
        total_requests: total,
        with_thinking,
        thinking_rate: percent(with_thinking, total),
        by_model,
    }
}

/// Tool calls by hour of their (offset-stripped) timestamp; untimed calls are left out.
pub fn by_hour(records: &[ToolRecord]) -> HourlyCounts {
    let mut hours = HourlyCounts::default();
    for ts in records.iter().filter_map(|r| r.timestamp) {
        hours.0[ts.hour() as usize] += 1;
    }
    hours
}

/// Entries by descending count, ties in first-seen order, cut to `limit`.
pub fn rank(counts: &Counts, limit: usize) -> Vec<(&str, u64)> {
    let mut ranked: Vec<(&str, u64)> = counts.iter().map(|(k, v)| (k.as_str(), *v)).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(limit);
    ranked
}
