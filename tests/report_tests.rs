use chrono::NaiveDateTime;
use clap::Parser;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

use claude_stats::cli::{Args, Period, ReportKind};
use claude_stats::corpus::{Corpus, load_corpus};
use claude_stats::display::{build_json_output, no_records_message, render_text, run};

const SCENARIO: &str = r#"{"type":"assistant","timestamp":"2025-04-01T09:00:00Z","sessionId":"sess-1","cwd":"/srv/app","message":{"model":"claude-opus-4","usage":{"input_tokens":1200,"output_tokens":300,"cache_read_input_tokens":5000},"content":[{"type":"thinking","thinking":"hmm"},{"type":"tool_use","name":"Skill","input":{"skill":"reviewer"}}]}}
{"type":"assistant","timestamp":"2025-04-01T09:30:00Z","sessionId":"sess-1","cwd":"/srv/app","message":{"model":"claude-opus-4","content":[{"type":"tool_use","name":"SlashCommand","input":{"command":"/reviewer"}}]}}
{"type":"assistant","timestamp":"2025-04-01T14:00:00Z","sessionId":"sess-2","cwd":"/srv/app","message":{"model":"claude-haiku-4","content":[{"type":"tool_use","name":"Read","input":{"file_path":"/srv/app/src/main.rs"}}]}}
"#;

fn scenario_corpus() -> (TempDir, Corpus) {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("projects/-srv-app");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("sess.jsonl"), SCENARIO).unwrap();
    let corpus = load_corpus(&[tmp.path().to_path_buf()], NaiveDateTime::MIN);
    (tmp, corpus)
}

fn json(kind: ReportKind, corpus: &Corpus) -> Value {
    build_json_output(kind, corpus, Period::All)
}

#[test]
fn test_skill_tool_and_file_scenario() {
    let (_tmp, corpus) = scenario_corpus();

    let skills = json(ReportKind::Skills, &corpus);
    assert_eq!(skills, serde_json::json!({"reviewer": 2}));

    let tools = json(ReportKind::Tools, &corpus);
    assert_eq!(
        tools,
        serde_json::json!({"Skill": 1, "SlashCommand": 1, "Read": 1})
    );

    let files = json(ReportKind::Files, &corpus);
    assert_eq!(files, serde_json::json!({"/srv/app/src/main.rs": 1}));
}

#[test]
fn test_tokens_and_thinking_json() {
    let (_tmp, corpus) = scenario_corpus();

    let tokens = json(ReportKind::Tokens, &corpus);
    assert_eq!(tokens["claude-opus-4"]["requests"], 2);
    assert_eq!(tokens["claude-opus-4"]["input_tokens"], 1200);
    assert_eq!(tokens["claude-opus-4"]["cache_read"], 5000);
    assert_eq!(tokens["claude-haiku-4"]["output_tokens"], 0);
    assert_eq!(tokens["claude-haiku-4"]["cache_creation"], 0);
    assert_eq!(tokens["claude-haiku-4"]["requests"], 1);

    let thinking = json(ReportKind::Thinking, &corpus);
    assert_eq!(thinking["total_requests"], 3);
    assert_eq!(thinking["with_thinking"], 1);
    assert_eq!(thinking["by_model"]["claude-opus-4"]["with_thinking"], 1);
}

#[test]
fn test_hourly_json_has_24_buckets() {
    let (_tmp, corpus) = scenario_corpus();
    let hourly = json(ReportKind::Hourly, &corpus);
    let obj = hourly.as_object().unwrap();
    assert_eq!(obj.len(), 24);
    assert_eq!(obj["9"], 2);
    assert_eq!(obj["14"], 1);
    assert_eq!(obj["0"], 0);
}

#[test]
fn test_sessions_json_shape() {
    let (_tmp, corpus) = scenario_corpus();
    let sessions = json(ReportKind::Sessions, &corpus);
    assert_eq!(sessions["sess-1"]["count"], 2);
    assert_eq!(sessions["sess-1"]["tools"]["Skill"], 1);
    assert_eq!(sessions["sess-2"]["tools"]["Read"], 1);
}

#[test]
fn test_full_json_covers_every_dimension() {
    let (_tmp, corpus) = scenario_corpus();
    let full = json(ReportKind::Full, &corpus);
    for key in [
        "tools", "skills", "subagents", "sessions", "files", "mcp", "models", "tokens", "web",
        "projects", "thinking", "hourly",
    ] {
        assert!(full.get(key).is_some(), "missing key: {}", key);
    }
    assert_eq!(full["total_tool_calls"], 3);
    assert_eq!(full["total_api_requests"], 3);
    assert_eq!(full["web"]["WebSearch"]["count"], 0);
}

#[test]
fn test_text_reports_are_deterministic() {
    let (_tmp, corpus) = scenario_corpus();
    let kinds = [
        ReportKind::Tools,
        ReportKind::Skills,
        ReportKind::Subagents,
        ReportKind::Sessions,
        ReportKind::Files,
        ReportKind::Mcp,
        ReportKind::Models,
        ReportKind::Tokens,
        ReportKind::Web,
        ReportKind::Projects,
        ReportKind::Thinking,
        ReportKind::Hourly,
        ReportKind::Summary,
        ReportKind::Full,
    ];
    for kind in kinds {
        let first = render_text(kind, &corpus, Period::All, 10);
        let (_again, corpus2) = scenario_corpus();
        let second = render_text(kind, &corpus2, Period::All, 10);
        assert_eq!(first, second, "{kind:?}");
        assert!(first.starts_with("# "), "{kind:?}");
    }
}

#[test]
fn test_summary_text() {
    let (_tmp, corpus) = scenario_corpus();
    let out = render_text(ReportKind::Summary, &corpus, Period::All, 10);
    assert!(out.starts_with("# Claude Code Usage Statistics (All time)\nTotal tool calls: 3\nTotal API requests: 3"));
    assert!(out.contains("### Skills\n 1. reviewer: 2 (100.0%) ████████████████████"));
    assert!(out.contains(" 1. claude-opus-4: 2 (66.7%) █████████████"));
}

#[test]
fn test_limit_truncates_text_but_not_total() {
    let (_tmp, corpus) = scenario_corpus();
    let out = render_text(ReportKind::Tools, &corpus, Period::All, 1);
    assert!(out.contains(" 1. Skill: 1"));
    assert!(!out.contains(" 2. "));
    assert!(out.ends_with("Total: 3"));
}

#[test]
fn test_old_records_excluded_for_today() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("projects/p");
    fs::create_dir_all(&dir).unwrap();
    fs::write(
        dir.join("old.jsonl"),
        r#"{"type":"assistant","timestamp":"2024-01-01T00:00:00Z","message":{"model":"m","content":[{"type":"tool_use","name":"Read","input":{}}]}}"#,
    )
    .unwrap();
    let start = Period::Today.start(chrono::Local::now().naive_local());
    let corpus = load_corpus(&[tmp.path().to_path_buf()], start);
    assert!(corpus.is_empty());
    assert_eq!(
        no_records_message(Period::Today),
        "No records found for period: today"
    );
}

fn run_to_string(root: &std::path::Path, extra: &[&str]) -> String {
    let root = root.to_str().unwrap();
    let mut argv = vec!["claude-stats", "--claude-config-dir", root];
    argv.extend_from_slice(extra);
    let args = Args::try_parse_from(argv).unwrap();
    let mut out = Vec::new();
    let summary = run(&args, chrono::Local::now().naive_local(), &mut out).unwrap();
    assert_eq!(summary.roots, vec![std::path::PathBuf::from(root)]);
    String::from_utf8(out).unwrap()
}

#[test]
fn test_empty_projects_prints_notice_in_text_and_json() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir_all(tmp.path().join("projects")).unwrap();

    assert_eq!(
        run_to_string(tmp.path(), &[]),
        "No records found for period: all\n"
    );
    assert_eq!(
        run_to_string(tmp.path(), &["--json", "--type", "tools"]),
        "No records found for period: all\n"
    );
    assert_eq!(
        run_to_string(tmp.path(), &["--period", "week"]),
        "No records found for period: week\n"
    );
}

#[test]
fn test_run_writes_json_report() {
    let (tmp, _) = scenario_corpus();
    let out = run_to_string(tmp.path(), &["--json", "--type", "skills"]);
    let v: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(v, serde_json::json!({"reviewer": 2}));
    assert!(out.ends_with('\n'));
}
