//! Shared model for the Wayne Insights workspace: typed scalars, datasets and
//! their schemas, the error taxonomy, presentation rounding and CLI settings.

pub mod dataset;
pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;

pub use dataset::{Dataset, Row};
pub use error::{InsightError, LoadCause, LoadError, Result};
pub use models::{ColumnType, DatasetKind, Scalar};
