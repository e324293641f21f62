use chrono::{Duration, NaiveDateTime, NaiveTime};

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Period {
    /// Since local midnight
    Today,
    /// Last 7 days
    Week,
    /// Last 30 days
    Month,
    /// Everything on disk
    #[default]
    All,
}

impl Period {
    /// Earliest timestamp kept for this period, relative to `now` (local wall clock).
    pub fn start(self, now: NaiveDateTime) -> NaiveDateTime {
        match self {
            Period::Today => now.date().and_time(NaiveTime::MIN),
            Period::Week => now - Duration::days(7),
            Period::Month => now - Duration::days(30),
            Period::All => NaiveDateTime::MIN,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Period::Today => "Today",
            Period::Week => "Last 7 days",
            Period::Month => "Last 30 days",
            Period::All => "All time",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Period::Today => "today",
            Period::Week => "week",
            Period::Month => "month",
            Period::All => "all",
        }
    }
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportKind {
    Tools,
    Skills,
    Subagents,
    Sessions,
    Files,
    Mcp,
    Models,
    Tokens,
    Web,
    Projects,
    Thinking,
    Hourly,
    /// Tools, skills and models
    #[default]
    Summary,
    /// Every dimension plus token and thinking summaries
    Full,
}

#[derive(clap::Parser, Debug)]
#[command(name = "claude-stats", about = "Claude Code usage statistics from transcript logs")]
pub struct Args {
    /// Period to aggregate
    #[arg(long, value_enum, default_value_t = Period::All)]
    pub period: Period,

    /// Aggregation type
    #[arg(long = "type", value_enum, default_value_t = ReportKind::Summary)]
    pub kind: ReportKind,

    /// Ranking limit for text reports
    #[arg(long, default_value_t = 10)]
    pub limit: usize,

    /// Emit JSON instead of ranked text
    #[arg(long)]
    pub json: bool,

    /// Force Claude data path(s), comma-separated. Defaults to ~/.claude and ~/.config/claude
    #[arg(long, env = "CLAUDE_CONFIG_DIR")]
    pub claude_config_dir: Option<String>,

    /// Debug mode: log scanned sources and record counts to stderr
    #[arg(long, env = "CLAUDE_DEBUG")]
    pub debug: bool,
}

impl Args {
    pub fn parse() -> Self {
        <Args as clap::Parser>::parse()
    }
}
