//! Loads every transcript under the Claude data roots into one sorted record set.

use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::models::{AssistantRecord, ToolRecord};
use crate::transcript::extract_entries;

/// Merged records from all sources, each list ascending by timestamp with
/// untimed records first.
#[derive(Debug, Default, Clone)]
pub struct Corpus {
    pub tools: Vec<ToolRecord>,
    pub assistants: Vec<AssistantRecord>,
}

impl Corpus {
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty() && self.assistants.is_empty()
    }

    /// Append another record set, then restore timestamp order.
    pub fn merge(&mut self, mut other: Corpus) {
        self.tools.append(&mut other.tools);
        self.assistants.append(&mut other.assistants);
        self.sort();
    }

    fn sort(&mut self) {
        // Stable: equal timestamps keep source/log order. `None` sorts before any `Some`.
        self.tools.sort_by_key(|r| r.timestamp);
        self.assistants.sort_by_key(|r| r.timestamp);
    }
}

/// Tool log written by older hook-based tracking, relative to a data root.
pub const LEGACY_TOOL_LOG: &str = "logs/tool-usage.jsonl";

/// All `*.jsonl` files below `<root>/projects` in a stable order, followed by
/// the legacy tool log when present.
pub fn transcript_files(root: &Path) -> Vec<PathBuf> {
    let projects = root.join("projects");
    let mut files: Vec<PathBuf> = if projects.is_dir() {
        WalkDir::new(&projects)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "jsonl"))
            .map(|e| e.into_path())
            .collect()
    } else {
        Vec::new()
    };
    let legacy = root.join(LEGACY_TOOL_LOG);
    if legacy.is_file() {
        files.push(legacy);
    }
    files
}

/// Load records at or after `start` from every transcript under `roots`.
///
/// Missing roots and unreadable files contribute nothing.
pub fn load_corpus(roots: &[PathBuf], start: NaiveDateTime) -> Corpus {
    let mut corpus = Corpus::default();
    for root in roots {
        for path in transcript_files(root) {
            let extracted = extract_entries(&path, start);
            tracing::debug!(
                path = %path.display(),
                tools = extracted.tools.len(),
                assistants = extracted.assistants.len(),
                "scanned transcript"
            );
            corpus.tools.extend(extracted.tools);
            corpus.assistants.extend(extracted.assistants);
        }
    }
    corpus.sort();
    corpus
}
