//! Snapshot holder for the dataset store.
//!
//! [`StoreManager`] owns the current [`Store`] behind an `Arc`. A reload
//! builds a complete new store first and only then swaps the pointer, so a
//! reader holding a snapshot never sees a mix of old and new datasets. A
//! failed reload leaves the previous snapshot in place and records the error.
//! Loads are attempted up to three times with linear back-off.

use std::sync::{Arc, PoisonError, RwLock};
use std::thread;
use std::time::{Duration, Instant};

use insight_core::error::{InsightError, LoadError};
use insight_data::reader::DataSources;
use insight_data::store::Store;

/// Maximum number of load attempts per reload.
const MAX_RETRY_ATTEMPTS: u32 = 3;

/// Back-off step between attempts: 0 ms, 100 ms, 200 ms.
const RETRY_STEP: Duration = Duration::from_millis(100);

#[derive(Debug, Default)]
struct State {
    current: Option<Arc<Store>>,
    loaded_at: Option<Instant>,
    last_error: Option<String>,
}

/// Shared, atomically swapped dataset store.
///
/// # Example
/// ```no_run
/// use std::path::Path;
/// use insight_data::reader::DataSources;
/// use insight_runtime::store_manager::StoreManager;
///
/// let manager = StoreManager::new(DataSources::from_dir(Path::new("data")));
/// if manager.reload().is_ok() {
///     let store = manager.snapshot().unwrap();
///     println!("{} financial rows", store.financial().len());
/// }
/// ```
#[derive(Debug)]
pub struct StoreManager {
    sources: DataSources,
    state: RwLock<State>,
}

impl StoreManager {
    /// A manager with no snapshot yet; call [`StoreManager::reload`] to load.
    pub fn new(sources: DataSources) -> Self {
        Self {
            sources,
            state: RwLock::new(State::default()),
        }
    }

    /// Load a fresh store and publish it.
    ///
    /// On failure the previous snapshot, if any, stays current and the error
    /// is kept for [`StoreManager::last_error`].
    pub fn reload(&self) -> Result<Arc<Store>, LoadError> {
        match self.load_with_retry() {
            Ok(store) => {
                let store = Arc::new(store);
                self.publish(Arc::clone(&store));
                tracing::info!("dataset snapshot published");
                Ok(store)
            }
            Err(e) => {
                tracing::warn!(error = %e, "reload failed; keeping previous snapshot");
                self.write().last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// The current snapshot, or [`InsightError::NotAvailable`] if no load has
    /// ever succeeded.
    pub fn snapshot(&self) -> Result<Arc<Store>, InsightError> {
        self.read().current.clone().ok_or(InsightError::NotAvailable)
    }

    pub fn is_loaded(&self) -> bool {
        self.read().current.is_some()
    }

    /// Time since the current snapshot was published.
    pub fn snapshot_age(&self) -> Option<Duration> {
        self.read().loaded_at.map(|ts| ts.elapsed())
    }

    /// Description of the most recent failed reload. Cleared by a successful
    /// one.
    pub fn last_error(&self) -> Option<String> {
        self.read().last_error.clone()
    }

    fn publish(&self, store: Arc<Store>) {
        let mut state = self.write();
        state.current = Some(store);
        state.loaded_at = Some(Instant::now());
        state.last_error = None;
    }

    fn load_with_retry(&self) -> Result<Store, LoadError> {
        let mut attempt = 0;
        loop {
            if attempt > 0 {
                let backoff = RETRY_STEP * attempt;
                tracing::debug!(attempt, backoff_ms = backoff.as_millis() as u64, "retrying load after back-off");
                thread::sleep(backoff);
            }
            match Store::load(&self.sources) {
                Ok(store) => return Ok(store),
                Err(e) if attempt + 1 < MAX_RETRY_ATTEMPTS => {
                    tracing::warn!(attempt, error = %e, "load attempt failed");
                }
                Err(e) => return Err(e),
            }
            attempt += 1;
        }
    }

    // Writers assign whole fields, so a poisoned `State` is still consistent.
    fn read(&self) -> std::sync::RwLockReadGuard<'_, State> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, State> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
