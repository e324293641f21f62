pub mod record;
pub mod stats;

pub use record::{AssistantRecord, TokenUsage, ToolRecord};
pub use stats::{
    Counts, HourlyCounts, ModelThinking, SessionStats, ThinkingStats, TokenTotals, WebStats,
};
