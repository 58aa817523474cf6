use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// View names accepted by `--view`, plus `all`.
pub const VIEW_NAMES: [&str; 8] = [
    "overview",
    "financial-trends",
    "hr-performance",
    "security-districts",
    "rd-portfolio",
    "supply-chain-facilities",
    "news-narrative",
    "all",
];

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Business-intelligence views over the Wayne Enterprises datasets
#[derive(Parser, Debug, Clone)]
#[command(
    name = "wayne-insights",
    about = "Business-intelligence views over the Wayne Enterprises datasets",
    version
)]
pub struct Settings {
    /// Directory holding the five CSV datasets (auto-discovered if not specified)
    #[arg(long, env = "WAYNE_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// View to render
    #[arg(long, default_value = "overview", value_parser = VIEW_NAMES)]
    pub view: String,

    /// Reporting year (defaults to the latest year in the financial data)
    #[arg(long)]
    pub year: Option<i64>,

    /// Reload the datasets and re-render every N seconds
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub refresh_rate: Option<u64>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Logging level
    #[arg(long, default_value = "info", value_parser = ["trace", "debug", "info", "warn", "error"])]
    pub log_level: String,
}

impl Settings {
    /// Parse settings from the process arguments.
    pub fn load() -> Self {
        Self::parse()
    }

    /// Parse settings from an explicit argument list.
    pub fn from_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::try_parse_from(args)
    }

    /// Refresh interval when watch mode is enabled.
    pub fn watch_interval(&self) -> Option<Duration> {
        self.refresh_rate.map(Duration::from_secs)
    }
}
