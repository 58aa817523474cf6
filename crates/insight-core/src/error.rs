use std::path::PathBuf;
use thiserror::Error;

use crate::models::DatasetKind;

// ── LoadError ──────────────────────────────────────────────────────────────────

/// Why a single dataset could not be loaded.
#[derive(Error, Debug)]
pub enum LoadCause {
    /// The source file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV document itself is malformed.
    #[error("Malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    /// A column required by the dataset schema is absent from the header.
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// Rows could not be assembled into a dataset.
    #[error("Malformed dataset: {0}")]
    Malformed(String),

    /// A field could not be coerced to its schema type.
    #[error("Invalid value {value:?} for column {column} at row {row}")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },
}

/// A dataset was unavailable at load time. Any failure here fails the whole
/// store; there is no partial store.
#[derive(Error, Debug)]
#[error("Failed to load {dataset} dataset: {cause}")]
pub struct LoadError {
    pub dataset: DatasetKind,
    #[source]
    pub cause: LoadCause,
}

impl LoadError {
    pub fn new(dataset: DatasetKind, cause: impl Into<LoadCause>) -> Self {
        Self {
            dataset,
            cause: cause.into(),
        }
    }
}

// ── InsightError ───────────────────────────────────────────────────────────────

/// All per-request errors produced by the aggregation engine and the views.
#[derive(Error, Debug)]
pub enum InsightError {
    /// The store has never been loaded successfully.
    #[error("Data not available")]
    NotAvailable,

    /// A load failure surfaced through a view.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// A derivation found no rows to reduce.
    #[error("No data: {0}")]
    NoData(String),

    /// Every value of `column` was missing within `group`.
    #[error("Empty reduction over {column} in group {group}")]
    EmptyReduction { column: String, group: String },

    /// A ratio or growth rate had a zero denominator.
    #[error("Division by zero: {0}")]
    DivisionByZero(String),

    /// A column name was not present in the dataset.
    #[error("Unknown column {column} in dataset {dataset}")]
    UnknownColumn { dataset: String, column: String },

    /// A dataset name did not match any of the five known datasets.
    #[error("Unknown dataset: {0}")]
    UnknownDataset(String),

    /// A numeric reduction hit a value that is not a number.
    #[error("Column {column} holds non-numeric value {value:?}")]
    NotNumeric { column: String, value: String },

    /// A row did not have one value per column.
    #[error("Row {row} has {found} values, expected {expected}")]
    RowShape {
        row: usize,
        found: usize,
        expected: usize,
    },

    /// An assembled view could not be turned into JSON.
    #[error("Serialization failed: {0}")]
    Serialize(String),
}

/// Convenience alias used throughout the insight crates.
pub type Result<T> = std::result::Result<T, InsightError>;
