//! Data layer for Wayne Insights.
//!
//! Responsible for locating and reading the five CSV datasets into an
//! immutable [`store::Store`], the generic group-by / aggregate engine, the
//! time-series reshaper and cross-group insight derivations.

pub mod aggregator;
pub mod insights;
pub mod reader;
pub mod reshaper;
pub mod store;

pub use insight_core as core;
