//! Aggregation results.
//!
//! Every type here serializes straight into the `--json` output, so field
//! names are part of the output format.

use indexmap::IndexMap;
use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

/// Key -> count, in first-seen order.
pub type Counts = IndexMap<String, u64>;

/// Increment `key` in `counts`, inserting it at the end on first sight.
pub fn bump(counts: &mut Counts, key: &str) {
    if let Some(n) = counts.get_mut(key) {
        *n += 1;
    } else {
        counts.insert(key.to_string(), 1);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub count: u64,
    pub tools: Counts,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TokenTotals {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub cache_read: u64,
    pub cache_creation: u64,
    pub requests: u64,
}

impl TokenTotals {
    /// All four counters, saturating at `u64::MAX`.
    pub fn total(&self) -> u64 {
        self.input_tokens
            .saturating_add(self.output_tokens)
            .saturating_add(self.cache_read)
            .saturating_add(self.cache_creation)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WebSearchStats {
    pub count: u64,
    pub queries: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WebFetchStats {
    pub count: u64,
    pub urls: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WebStats {
    #[serde(rename = "WebSearch")]
    pub search: WebSearchStats,
    #[serde(rename = "WebFetch")]
    pub fetch: WebFetchStats,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ModelThinking {
    pub total: u64,
    pub with_thinking: u64,
}

impl ModelThinking {
    pub fn rate(&self) -> f64 {
        percent(self.with_thinking, self.total)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ThinkingStats {
    pub total_requests: u64,
    pub with_thinking: u64,
    /// Percentage, 0 when there were no requests
    pub thinking_rate: f64,
    pub by_model: IndexMap<String, ModelThinking>,
}

/// Tool calls per hour of day. Always 24 buckets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HourlyCounts(pub [u64; 24]);

impl HourlyCounts {
    /// Count for `hour` (0-23); 0 outside that range.
    pub fn get(&self, hour: usize) -> u64 {
        self.0.get(hour).copied().unwrap_or(0)
    }

    /// Busiest hour's count, used to scale the chart.
    pub fn max(&self) -> u64 {
        self.0.iter().copied().max().unwrap_or(0)
    }
}

impl Serialize for HourlyCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(24))?;
        for (hour, count) in self.0.iter().enumerate() {
            map.serialize_entry(&hour.to_string(), count)?;
        }
        map.end()
    }
}

pub fn percent(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}
