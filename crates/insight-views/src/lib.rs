//! View assemblers for the Wayne Insights dashboard.
//!
//! Each view module composes grouping, reshaping and insight derivation from
//! [`insight_data`] into one fixed JSON response shape. [`response::render`]
//! dispatches by [`ViewKind`] and maps engine failures to
//! [`ErrorResponse`] values.

pub mod chart;
pub mod context;
pub mod financial;
pub mod hr;
pub mod narrative;
pub mod overview;
pub mod rd;
pub mod response;
pub mod security;
pub mod supply_chain;

#[cfg(test)]
mod fixtures;

pub use context::ViewContext;
pub use insight_data as data;
pub use response::{render, render_all, render_selection, ErrorResponse, ViewKind, ViewSelection};
