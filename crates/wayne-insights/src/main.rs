mod bootstrap;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use insight_core::settings::Settings;
use insight_data::reader::DataSources;
use insight_runtime::orchestrator::RefreshOrchestrator;
use insight_runtime::store_manager::StoreManager;
use insight_views::{render_selection, ErrorResponse, ViewContext, ViewSelection};
use serde_json::Value;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load();
    bootstrap::setup_logging(&settings.log_level)?;

    tracing::info!("Wayne Insights v{} starting", env!("CARGO_PKG_VERSION"));

    let selection = ViewSelection::from_name(&settings.view)
        .ok_or_else(|| anyhow!("unknown view: {}", settings.view))?;
    let ctx = ViewContext { year: settings.year };

    let data_dir = match settings.data_dir.clone() {
        Some(dir) => dir,
        None => bootstrap::discover_data_dir().unwrap_or_else(|| {
            tracing::warn!("no data directory found; falling back to the working directory");
            PathBuf::from(".")
        }),
    };
    tracing::info!(data_dir = %data_dir.display(), view = selection.name(), "configuration resolved");

    let manager = Arc::new(StoreManager::new(DataSources::from_dir(&data_dir)));
    // A failed first load is not fatal: views answer 503 until a reload works.
    let loader = Arc::clone(&manager);
    if let Err(e) = tokio::task::spawn_blocking(move || loader.reload()).await? {
        tracing::warn!(error = %e, "initial dataset load failed");
    }

    let Some(interval) = settings.watch_interval() else {
        let snapshot = manager.snapshot();
        let body = render_selection(selection, snapshot.as_deref(), &ctx);
        let failed = body.is_err();
        emit(&body, settings.pretty)?;
        if failed {
            std::process::exit(1);
        }
        return Ok(());
    };

    tracing::info!(interval_secs = interval.as_secs(), "starting watch mode");
    let (mut rx, handle) = RefreshOrchestrator::new(Arc::clone(&manager), interval, selection, ctx).start();

    loop {
        tokio::select! {
            rendered = rx.recv() => {
                let Some(rendered) = rendered else { break };
                if !rendered.reloaded {
                    if let Some(err) = manager.last_error() {
                        tracing::warn!(error = %err, "serving previous snapshot");
                    }
                }
                emit(&rendered.body, settings.pretty)?;
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Ctrl+C received; stopping refresh task");
                break;
            }
        }
    }
    handle.abort();

    Ok(())
}

/// Print a rendered view, or its error body, to stdout as one JSON document.
fn emit(body: &Result<Value, ErrorResponse>, pretty: bool) -> Result<()> {
    let value = match body {
        Ok(value) => value.clone(),
        Err(err) => serde_json::to_value(err)?,
    };
    let text = if pretty {
        serde_json::to_string_pretty(&value)?
    } else {
        serde_json::to_string(&value)?
    };
    println!("{text}");
    Ok(())
}
