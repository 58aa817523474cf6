//! Per-request inputs shared by the views, plus small row/filter helpers.

use chrono::Datelike;
use insight_core::error::{InsightError, Result};
use insight_core::{Dataset, Row, Scalar};
use insight_data::store::Store;

/// Request-scoped options for view assembly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewContext {
    /// Reporting year; `None` means the latest `Year` in the financial data.
    pub year: Option<i64>,
}

impl ViewContext {
    pub fn for_year(year: i64) -> Self {
        Self { year: Some(year) }
    }

    /// The reporting year for `store`.
    pub fn current_year(&self, store: &Store) -> Result<i64> {
        if let Some(year) = self.year {
            return Ok(year);
        }
        store
            .financial()
            .max_value("Year")?
            .as_i64()
            .ok_or_else(|| InsightError::NoData("financial Year is not numeric".to_string()))
    }
}

/// Financial rows for `year`.
pub(crate) fn fiscal_year(financial: &Dataset, year: i64) -> Result<Dataset> {
    financial.filter_eq("Year", &Scalar::Int(year))
}

/// Rows whose date in `column` falls in calendar `year`.
pub(crate) fn calendar_year(dataset: &Dataset, column: &str, year: i64) -> Result<Dataset> {
    let idx = dataset.column_index(column)?;
    Ok(dataset.filter(|row| {
        row.at(idx)
            .as_date()
            .is_some_and(|d| i64::from(d.year()) == year)
    }))
}

/// Fails with [`InsightError::NoData`] when `dataset` is empty.
pub(crate) fn non_empty(dataset: Dataset, what: &str) -> Result<Dataset> {
    if dataset.is_empty() {
        return Err(InsightError::NoData(what.to_string()));
    }
    Ok(dataset)
}

/// Rows at the latest value of `date_col`, and that value.
pub(crate) fn latest_snapshot(dataset: &Dataset, date_col: &str) -> Result<(Scalar, Dataset)> {
    let latest = dataset.max_value(date_col)?;
    let rows = dataset.filter_eq(date_col, &latest)?;
    Ok((latest, rows))
}

pub(crate) fn cell<'a>(row: &Row<'a>, column: &str) -> Result<&'a Scalar> {
    row.get(column).ok_or_else(|| InsightError::UnknownColumn {
        dataset: "row".to_string(),
        column: column.to_string(),
    })
}

pub(crate) fn cell_f64(row: &Row<'_>, column: &str) -> Result<f64> {
    let value = cell(row, column)?;
    value.as_f64().ok_or_else(|| InsightError::NotNumeric {
        column: column.to_string(),
        value: value.to_string(),
    })
}

pub(crate) fn cell_i64(row: &Row<'_>, column: &str) -> Result<i64> {
    let value = cell(row, column)?;
    value.as_i64().ok_or_else(|| InsightError::NotNumeric {
        column: column.to_string(),
        value: value.to_string(),
    })
}
