use anyhow::Result;
use chrono::Local;
#[cfg(feature = "colors")]
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

use claude_stats::cli::Args;
use claude_stats::display::run;

fn init_tracing(debug: bool) {
    let default = if debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.debug);

    let mut stdout = std::io::stdout().lock();
    let summary = run(&args, Local::now().naive_local(), &mut stdout)?;

    if args.debug && !summary.corpus.is_empty() {
        let footer = format!(
            "roots={} tool_calls={} api_requests={} cutoff={}",
            summary.roots.len(),
            summary.corpus.tools.len(),
            summary.corpus.assistants.len(),
            summary.start
        );
        #[cfg(feature = "colors")]
        eprintln!("{}", footer.bright_black());
        #[cfg(not(feature = "colors"))]
        eprintln!("{footer}");
    }
    Ok(())
}
