//! Periodic reload-and-render loop.
//!
//! [`RefreshOrchestrator`] runs in a tokio task: every tick it reloads the
//! datasets through the shared [`StoreManager`], renders the selected view
//! against the resulting snapshot and sends a [`RenderedView`] down an `mpsc`
//! channel, so the caller only ever consumes finished output.

use std::sync::Arc;
use std::time::Duration;

use insight_views::{render_selection, ErrorResponse, ViewContext, ViewSelection};
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::time;

use crate::store_manager::StoreManager;

// ── Public types ──────────────────────────────────────────────────────────────

/// One rendering produced by the refresh loop.
#[derive(Debug, Clone)]
pub struct RenderedView {
    /// `--view` name, or `all`.
    pub view: &'static str,
    /// The rendered JSON, or the error body the view mapped to.
    pub body: Result<Value, ErrorResponse>,
    /// Whether a fresh snapshot backed this rendering. When `false` the
    /// reload failed and the body came from the previous snapshot, if any.
    pub reloaded: bool,
}

// ── RefreshOrchestrator ───────────────────────────────────────────────────────

pub struct RefreshOrchestrator {
    manager: Arc<StoreManager>,
    interval: Duration,
    selection: ViewSelection,
    ctx: ViewContext,
}

impl RefreshOrchestrator {
    pub fn new(
        manager: Arc<StoreManager>,
        interval: Duration,
        selection: ViewSelection,
        ctx: ViewContext,
    ) -> Self {
        Self {
            manager,
            interval,
            selection,
            ctx,
        }
    }

    /// Spawn the refresh loop.
    ///
    /// The first rendering is sent immediately from the current snapshot;
    /// later ones follow a reload every `interval`. The loop ends when the
    /// receiver is dropped or the handle aborts it.
    pub fn start(self) -> (mpsc::Receiver<RenderedView>, RefreshHandle) {
        let (tx, rx) = mpsc::channel(16);
        let handle = tokio::spawn(async move {
            self.refresh_loop(tx).await;
        });
        (rx, RefreshHandle { handle })
    }

    // ── Private implementation ────────────────────────────────────────────

    async fn refresh_loop(self, tx: mpsc::Sender<RenderedView>) {
        let initial = self.manager.is_loaded();
        if !self.send(&tx, initial).await {
            return;
        }

        let mut interval = time::interval(self.interval);
        // The first tick fires immediately; the initial render covered it.
        interval.tick().await;

        loop {
            interval.tick().await;
            if tx.is_closed() {
                tracing::debug!("refresh channel closed; exiting loop");
                break;
            }

            let manager = Arc::clone(&self.manager);
            let reloaded = match tokio::task::spawn_blocking(move || manager.reload()).await {
                Ok(result) => result.is_ok(),
                Err(e) => {
                    tracing::warn!(error = %e, "reload task failed");
                    false
                }
            };

            if !self.send(&tx, reloaded).await {
                break;
            }
        }
    }

    /// Render against the current snapshot and send it. Returns `false` once
    /// the receiver is gone.
    async fn send(&self, tx: &mpsc::Sender<RenderedView>, reloaded: bool) -> bool {
        let rendered = RenderedView {
            view: self.selection.name(),
            body: self.render(),
            reloaded,
        };
        if let Err(e) = tx.send(rendered).await {
            tracing::debug!(error = %e, "receiver dropped; stopping refresh");
            return false;
        }
        true
    }

    fn render(&self) -> Result<Value, ErrorResponse> {
        let snapshot = self.manager.snapshot();
        render_selection(self.selection, snapshot.as_deref(), &self.ctx)
    }
}

// ── RefreshHandle ─────────────────────────────────────────────────────────────

/// Handle to the background refresh task.
pub struct RefreshHandle {
    handle: tokio::task::JoinHandle<()>,
}

impl RefreshHandle {
    /// Stop the refresh loop.
    pub fn abort(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
