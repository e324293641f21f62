//! Text and JSON rendering of aggregation results.
//!
//! Text output is plain (no ANSI) so repeated runs over the same logs are
//! byte-identical. Rankings are cut to `limit`; JSON is never cut.

use chrono::NaiveDateTime;
use indexmap::IndexMap;
use serde_json::{Value, json};
use std::fmt::Write as _;
use std::io;
use std::path::PathBuf;
use url::Url;

use crate::aggregate::{self, rank};
use crate::cli::{Args, Period, ReportKind};
use crate::corpus::{Corpus, load_corpus};
use crate::models::stats::{bump, percent};
use crate::models::{Counts, HourlyCounts, SessionStats, ThinkingStats, TokenTotals, WebStats};
use crate::utils::{claude_paths, format_path, format_tokens, truncate_chars};

const BAR: &str = "█";
const HOUR_BAR_WIDTH: f64 = 20.0;
const SESSION_TOOLS_SHOWN: usize = 5;
const QUERY_MAX_CHARS: usize = 50;

pub fn no_records_message(period: Period) -> String {
    format!("No records found for period: {}", period.as_str())
}

/// Ranked list with percentage of the full total and a bar of `pct / 5` blocks.
///
/// The trailing total covers every key, not only the ones shown.
pub fn format_ranking(counts: &Counts, title: &str, limit: usize) -> String {
    if counts.is_empty() {
        return format!("\n### {title}\nNo data\n");
    }
    let total: u64 = counts.values().sum();
    let mut out = format!("\n### {title}");
    for (i, (name, count)) in rank(counts, limit).into_iter().enumerate() {
        let pct = percent(count, total);
        let bar = BAR.repeat((pct / 5.0) as usize);
        let _ = write!(out, "\n{:2}. {name}: {count} ({pct:.1}%) {bar}", i + 1);
    }
    let _ = write!(out, "\n\nTotal: {total}");
    out
}

/// All 24 hours, bars scaled to the busiest hour.
pub fn format_hour_chart(hours: &HourlyCounts) -> String {
    let max = hours.max();
    (0..24)
        .map(|hour| {
            let count = hours.get(hour);
            let len = if max > 0 {
                (count as f64 / max as f64 * HOUR_BAR_WIDTH) as usize
            } else {
                0
            };
            format!("{hour:02}:00 | {} {count}", BAR.repeat(len))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_sessions(sessions: &IndexMap<String, SessionStats>, limit: usize) -> String {
    let mut out = format!("Total sessions: {}", sessions.len());
    let mut ordered: Vec<(&String, &SessionStats)> = sessions.iter().collect();
    ordered.sort_by(|a, b| b.1.count.cmp(&a.1.count));
    for (sid, stats) in ordered.into_iter().take(limit) {
        let short_id: String = sid.chars().take(8).collect();
        let _ = write!(out, "\n\n**{short_id}...**: {} calls", stats.count);
        for (tool, cnt) in rank(&stats.tools, SESSION_TOOLS_SHOWN) {
            let _ = write!(out, "\n  - {tool}: {cnt}");
        }
    }
    out
}

/// Per-model token breakdown, heaviest output first.
pub fn format_token_usage(totals: &IndexMap<String, TokenTotals>) -> String {
    let mut ordered: Vec<(&String, &TokenTotals)> = totals.iter().collect();
    ordered.sort_by(|a, b| b.1.output_tokens.cmp(&a.1.output_tokens));
    let mut out = String::new();
    for (model, t) in ordered {
        let _ = write!(out, "\n### {model}");
        let _ = write!(out, "\n  Requests: {}", t.requests);
        let _ = write!(out, "\n  Input:  {}", format_tokens(t.input_tokens));
        let _ = write!(out, "\n  Output: {}", format_tokens(t.output_tokens));
        let _ = write!(out, "\n  Cache read: {}", format_tokens(t.cache_read));
        let _ = write!(out, "\n  Cache creation: {}", format_tokens(t.cache_creation));
        out.push('\n');
    }
    out.trim_end().to_string()
}

/// Host of a fetched URL (`host[:port]`), `unknown` when it does not parse.
pub fn url_domain(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(u) => match (u.host_str(), u.port()) {
            (Some(host), Some(port)) => format!("{host}:{port}"),
            (Some(host), None) => host.to_string(),
            _ => "unknown".to_string(),
        },
        Err(_) => "unknown".to_string(),
    }
}

pub fn format_web(web: &WebStats, limit: usize) -> String {
    let mut out = format!("\n### WebSearch: {} calls", web.search.count);
    let mut queries = Counts::new();
    for q in &web.search.queries {
        bump(&mut queries, q);
    }
    for (query, cnt) in rank(&queries, limit) {
        let _ = write!(out, "\n  - \"{}\" ({cnt})", truncate_chars(query, QUERY_MAX_CHARS));
    }

    let _ = write!(out, "\n\n### WebFetch: {} calls", web.fetch.count);
    let mut domains = Counts::new();
    for u in &web.fetch.urls {
        bump(&mut domains, &url_domain(u));
    }
    for (domain, cnt) in rank(&domains, limit) {
        let _ = write!(out, "\n  - {domain}: {cnt}");
    }
    out
}

pub fn format_thinking(stats: &ThinkingStats) -> String {
    let mut out = format!(
        "Total requests: {}\nWith thinking: {} ({:.1}%)\n\n### By Model",
        stats.total_requests, stats.with_thinking, stats.thinking_rate
    );
    for (model, m) in &stats.by_model {
        let _ = write!(
            out,
            "\n  {model}: {}/{} ({:.1}%)",
            m.with_thinking,
            m.total,
            m.rate()
        );
    }
    out
}

/// Re-key project counts for display, `~` in place of the home directory.
pub fn display_projects(counts: &Counts) -> Counts {
    let mut shown = Counts::new();
    for (path, count) in counts {
        *shown.entry(format_path(path)).or_insert(0) += count;
    }
    shown
}

fn header(title: &str, period: Period) -> String {
    format!("# {title} ({})", period.label())
}

fn totals_lines(corpus: &Corpus) -> String {
    format!(
        "Total tool calls: {}\nTotal API requests: {}",
        corpus.tools.len(),
        corpus.assistants.len()
    )
}

/// Human-readable report for `kind`.
pub fn render_text(kind: ReportKind, corpus: &Corpus, period: Period, limit: usize) -> String {
    let tools = &corpus.tools;
    let assistants = &corpus.assistants;
    let sections: Vec<String> = match kind {
        ReportKind::Summary => vec![
            header("Claude Code Usage Statistics", period),
            totals_lines(corpus),
            format_ranking(&aggregate::by_tool(tools), "Tools", limit),
            format_ranking(&aggregate::by_skill(tools), "Skills", limit),
            format_ranking(&aggregate::by_model(assistants), "Models", limit),
        ],
        ReportKind::Full => {
            let token_totals = aggregate::tokens(assistants);
            let mut token_lines = String::from("\n### Token Usage");
            for (model, t) in &token_totals {
                let _ = write!(token_lines, "\n  {model}: {} total", format_tokens(t.total()));
            }
            let thinking = aggregate::thinking(assistants);
            let web = aggregate::by_web(tools);
            vec![
                header("Claude Code Full Statistics", period),
                totals_lines(corpus),
                format!("Total sessions: {}", aggregate::by_session(tools).len()),
                format_ranking(&aggregate::by_tool(tools), "Tools", limit),
                format_ranking(&aggregate::by_skill(tools), "Skills", limit),
                format_ranking(&aggregate::by_subagent(tools), "Subagents (Task)", limit),
                format_ranking(&aggregate::by_file(tools), "Files", limit),
                format_ranking(&aggregate::by_mcp(tools), "MCP Servers", limit),
                format_ranking(&aggregate::by_model(assistants), "Models", limit),
                format_ranking(
                    &display_projects(&aggregate::by_project(tools)),
                    "Projects",
                    limit,
                ),
                format!(
                    "\n### Web\n  WebSearch: {} calls\n  WebFetch: {} calls",
                    web.search.count, web.fetch.count
                ),
                token_lines,
                format!(
                    "\n### Extended Thinking\n  Usage rate: {:.1}% ({}/{})",
                    thinking.thinking_rate, thinking.with_thinking, thinking.total_requests
                ),
                format!("\n### Hourly Usage\n{}", format_hour_chart(&aggregate::by_hour(tools))),
            ]
        }
        ReportKind::Tools => vec![
            header("Tool Usage", period),
            format_ranking(&aggregate::by_tool(tools), "Tools", limit),
        ],
        ReportKind::Skills => vec![
            header("Skill Usage", period),
            format_ranking(&aggregate::by_skill(tools), "Skills", limit),
        ],
        ReportKind::Subagents => vec![
            header("Subagent Usage", period),
            format_ranking(&aggregate::by_subagent(tools), "Subagents", limit),
        ],
        ReportKind::Sessions => vec![
            header("Session Statistics", period),
            format_sessions(&aggregate::by_session(tools), limit),
        ],
        ReportKind::Files => vec![
            header("File Access", period),
            format_ranking(&aggregate::by_file(tools), "Files", limit),
        ],
        ReportKind::Mcp => vec![
            header("MCP Server Usage", period),
            format_ranking(&aggregate::by_mcp(tools), "MCP Servers", limit),
        ],
        ReportKind::Models => vec![
            header("Model Usage", period),
            format_ranking(&aggregate::by_model(assistants), "Models", limit),
        ],
        ReportKind::Tokens => vec![
            header("Token Usage", period),
            format_token_usage(&aggregate::tokens(assistants)),
        ],
        ReportKind::Web => vec![
            header("Web Usage", period),
            format_web(&aggregate::by_web(tools), limit),
        ],
        ReportKind::Projects => vec![
            header("Project Usage", period),
            format_ranking(
                &display_projects(&aggregate::by_project(tools)),
                "Projects",
                limit,
            ),
        ],
        ReportKind::Thinking => vec![
            header("Extended Thinking Usage", period),
            format_thinking(&aggregate::thinking(assistants)),
        ],
        ReportKind::Hourly => vec![
            header("Hourly Usage", period),
            format_hour_chart(&aggregate::by_hour(tools)),
        ],
    };
    sections.join("\n")
}

/// Machine-readable result for `kind`: full mappings, no ranking or limit.
pub fn build_json_output(kind: ReportKind, corpus: &Corpus, period: Period) -> Value {
    let tools = &corpus.tools;
    let assistants = &corpus.assistants;
    match kind {
        ReportKind::Tools => json!(aggregate::by_tool(tools)),
        ReportKind::Skills => json!(aggregate::by_skill(tools)),
        ReportKind::Subagents => json!(aggregate::by_subagent(tools)),
        ReportKind::Sessions => json!(aggregate::by_session(tools)),
        ReportKind::Files => json!(aggregate::by_file(tools)),
        ReportKind::Mcp => json!(aggregate::by_mcp(tools)),
        ReportKind::Models => json!(aggregate::by_model(assistants)),
        ReportKind::Tokens => json!(aggregate::tokens(assistants)),
        ReportKind::Web => json!(aggregate::by_web(tools)),
        ReportKind::Projects => json!(display_projects(&aggregate::by_project(tools))),
        ReportKind::Thinking => json!(aggregate::thinking(assistants)),
        ReportKind::Hourly => json!(aggregate::by_hour(tools)),
        ReportKind::Summary => json!({
            "period": period.as_str(),
            "total_tool_calls": tools.len(),
            "total_api_requests": assistants.len(),
            "tools": aggregate::by_tool(tools),
            "skills": aggregate::by_skill(tools),
            "models": aggregate::by_model(assistants),
        }),
        ReportKind::Full => json!({
            "period": period.as_str(),
            "total_tool_calls": tools.len(),
            "total_api_requests": assistants.len(),
            "tools": aggregate::by_tool(tools),
            "skills": aggregate::by_skill(tools),
            "subagents": aggregate::by_subagent(tools),
            "sessions": aggregate::by_session(tools),
            "files": aggregate::by_file(tools),
            "mcp": aggregate::by_mcp(tools),
            "models": aggregate::by_model(assistants),
            "tokens": aggregate::tokens(assistants),
            "web": aggregate::by_web(tools),
            "projects": display_projects(&aggregate::by_project(tools)),
            "thinking": aggregate::thinking(assistants),
            "hourly": aggregate::by_hour(tools),
        }),
    }
}

/// What one run scanned, for the `--debug` footer.
#[derive(Debug)]
pub struct RunSummary {
    pub roots: Vec<PathBuf>,
    pub start: NaiveDateTime,
    pub corpus: Corpus,
}

/// Load every data root selected by `args` and write the requested report to
/// `out`. `now` anchors the period cutoff.
pub fn run<W: io::Write>(args: &Args, now: NaiveDateTime, out: &mut W) -> anyhow::Result<RunSummary> {
    let roots = claude_paths(args.claude_config_dir.as_deref());
    tracing::debug!(?roots, "claude data roots");

    let start = args.period.start(now);
    let corpus = load_corpus(&roots, start);

    if corpus.is_empty() {
        writeln!(out, "{}", no_records_message(args.period))?;
    } else if args.json {
        let json = build_json_output(args.kind, &corpus, args.period);
        writeln!(out, "{}", serde_json::to_string_pretty(&json)?)?;
    } else {
        writeln!(out, "{}", render_text(args.kind, &corpus, args.period, args.limit))?;
    }
    Ok(RunSummary { roots, start, corpus })
}
