//! # Claude Stats
//!
//! Usage statistics for Claude Code, computed from the JSONL transcripts it
//! writes under `~/.claude/projects`.
//!
//! ## Overview
//!
//! One batch pass: every transcript is read, filtered to the selected period
//! and merged into a [`corpus::Corpus`], then reduced along one or more
//! dimensions:
//! - tool, skill/slash-command and subagent (`Task`) usage
//! - sessions, files touched, MCP servers and projects
//! - models, token totals and extended-thinking rate
//! - web searches/fetches and hour-of-day activity
//!
//! Results render either as ranked text or as JSON.
//!
//! ## Features
//!
//! - `colors` (default): Colored debug footer on stderr via owo-colors

/// Aggregations over the merged record lists
pub mod aggregate;

/// Command-line argument parsing and period selection
pub mod cli;

/// Transcript discovery and merging
pub mod corpus;

/// Text and JSON rendering
pub mod display;

/// Record and result types
pub mod models;

/// Per-file record extraction
pub mod transcript;

/// Timestamps, paths and number formatting
pub mod utils;
