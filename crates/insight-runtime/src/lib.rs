//! Runtime layer for Wayne Insights.
//!
//! Holds the shared dataset snapshot and drives the periodic
//! reload-and-render loop used by watch mode.

pub mod orchestrator;
pub mod store_manager;

#[cfg(test)]
mod testing;

pub use insight_views as views;
pub use orchestrator::{RefreshHandle, RefreshOrchestrator, RenderedView};
pub use store_manager::StoreManager;
