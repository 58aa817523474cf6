use std::path::{Path, PathBuf};

use insight_core::DatasetKind;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Data directory under the home directory, checked last.
const HOME_DATA_DIR: &str = ".wayne-insights";

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Initialise the global `tracing` subscriber.
///
/// `log_level` becomes the [`EnvFilter`] directive, falling back to `"info"`
/// if it does not parse. Output goes to stderr so stdout carries only JSON.
pub fn setup_logging(log_level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(log_level.to_lowercase()).unwrap_or_else(|_| EnvFilter::new("info"));

    let layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()?;

    Ok(())
}

// ── Data-dir discovery ─────────────────────────────────────────────────────────

/// Locate the directory holding the datasets.
///
/// Checks, in order, the working directory, its parent, `./data` and
/// `~/.wayne-insights/data`, returning the first that contains the financial
/// dataset. Returns `None` when none does.
pub fn discover_data_dir() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    discover_data_dir_from(&cwd, dirs::home_dir().as_deref())
}

fn discover_data_dir_from(cwd: &Path, home: Option<&Path>) -> Option<PathBuf> {
    let mut candidates = vec![cwd.to_path_buf(), cwd.join(".."), cwd.join("data")];
    if let Some(home) = home {
        candidates.push(home.join(HOME_DATA_DIR).join("data"));
    }
    let marker = DatasetKind::Financial.file_name();
    candidates.into_iter().find(|dir| dir.join(marker).is_file())
}

// ── Tests ──────────────────────────────────────────────────────────────────────
