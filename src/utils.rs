use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use std::path::{Path, PathBuf};

/// Naive layouts tried after RFC 3339 fails, most specific first.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse a transcript timestamp into a naive wall-clock moment.
///
/// Offset-bearing values (`Z`, `+09:00`, `-0500`) keep their wall clock and
/// drop the offset, so `2024-01-01T00:00:00Z` and `2024-01-01T00:00:00+09:00`
/// both become `2024-01-01 00:00:00`. Empty or malformed input yields `None`.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(dt.naive_local());
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

/// Claude data roots that contain a `projects/` directory or a legacy
/// `logs/tool-usage.jsonl`.
///
/// `override_env` is a comma-separated list (`--claude-config-dir` or
/// `CLAUDE_CONFIG_DIR`). When it yields nothing usable, falls back to
/// `~/.claude` then `$XDG_CONFIG_HOME/claude`.
pub fn claude_paths(override_env: Option<&str>) -> Vec<PathBuf> {
    let mut paths = vec![];
    if let Some(list) = override_env {
        let list = list.trim();
        if !list.is_empty() {
            for p in list.split(',') {
                let p = p.trim();
                if p.is_empty() {
                    continue;
                }
                let pb = PathBuf::from(p);
                if has_claude_data(&pb) {
                    paths.push(pb);
                }
            }
            if !paths.is_empty() {
                return paths;
            }
        }
    }
    let basedirs = directories::BaseDirs::new();
    let home = basedirs
        .as_ref()
        .map(|b| b.home_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~"));
    let xdg_config = basedirs
        .as_ref()
        .map(|b| b.config_dir().to_path_buf())
        .unwrap_or_else(|| home.join(".config"));
    for base in [home.join(".claude"), xdg_config.join("claude")] {
        if has_claude_data(&base) && !paths.contains(&base) {
            paths.push(base);
        }
    }
    paths
}

fn has_claude_data(base: &Path) -> bool {
    base.join("projects").is_dir() || base.join(crate::corpus::LEGACY_TOOL_LOG).is_file()
}

/// Current user's home directory, if the platform reports one.
pub fn home_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().to_path_buf())
}

/// Shorten `p` to `~/...` when it lives under the current user's home.
pub fn format_path(p: &str) -> String {
    match home_dir() {
        Some(home) => shorten_home(p, &home),
        None => p.to_owned(),
    }
}

/// Replace a leading `home` with `~`, matching whole path components only.
pub fn shorten_home(p: &str, home: &Path) -> String {
    let home_s = home.to_string_lossy();
    let home_s = home_s.trim_end_matches('/');
    if home_s.is_empty() {
        return p.to_owned();
    }
    match p.strip_prefix(home_s) {
        Some("") => "~".to_string(),
        Some(rest) if rest.starts_with('/') => format!("~{rest}"),
        _ => p.to_owned(),
    }
}

pub fn format_tokens(n: u64) -> String {
    if n >= 1_000_000_000 {
        format!("{:.1}B", n as f64 / 1e9)
    } else if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1e6)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1e3)
    } else {
        n.to_string()
    }
}

/// Cut `s` to `max` characters, appending `...` when anything was dropped.
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}
