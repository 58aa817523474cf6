//! Generic group-by / aggregate over a [`Dataset`].
//!
//! Rows are partitioned by the tuple of values at the key columns, then each
//! [`Aggregation`] of an [`AggregateSpec`] reduces its column within every
//! group. A row with a missing value in any key column belongs to no group.

use std::collections::HashMap;

use insight_core::error::{InsightError, Result};
use insight_core::{Dataset, Scalar};
use serde::Serialize;

// ── AggregateSpec ─────────────────────────────────────────────────────────────

/// How a column is reduced within a group.
#[derive(Debug, Clone, PartialEq)]
pub enum Reduction {
    /// Sum of the non-missing numeric values (0 when all are missing).
    /// Stays integral when every summed value is an integer.
    Sum,
    /// Mean of the non-missing numeric values.
    Mean,
    /// Number of rows in the group.
    Count,
    /// Number of rows whose value equals the given constant.
    CountMatching(Scalar),
    /// First non-missing value in row order.
    First,
}

/// One reduction applied to one column, published under `output`.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregation {
    pub column: String,
    pub output: String,
    pub reduction: Reduction,
}

/// Ordered set of aggregations applied per group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregateSpec {
    aggregations: Vec<Aggregation>,
}

impl AggregateSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reduce `column` by `reduction`, keeping the column name as output.
    pub fn with(self, column: &str, reduction: Reduction) -> Self {
        self.with_output(column, column, reduction)
    }

    /// Reduce `column` by `reduction` and publish it as `output`.
    pub fn with_output(mut self, column: &str, output: &str, reduction: Reduction) -> Self {
        self.aggregations.push(Aggregation {
            column: column.to_string(),
            output: output.to_string(),
            reduction,
        });
        self
    }

    pub fn sum(self, column: &str) -> Self {
        self.with(column, Reduction::Sum)
    }

    pub fn mean(self, column: &str) -> Self {
        self.with(column, Reduction::Mean)
    }

    pub fn first(self, column: &str) -> Self {
        self.with(column, Reduction::First)
    }

    pub fn aggregations(&self) -> &[Aggregation] {
        &self.aggregations
    }
}

// ── GroupResult ───────────────────────────────────────────────────────────────

/// A reduced value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AggregateValue {
    Number(f64),
    Integer(i64),
    Count(usize),
    Value(Scalar),
}

impl AggregateValue {
    /// Numeric view; counts widen to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            Self::Integer(v) => Some(*v as f64),
            Self::Count(c) => Some(*c as f64),
            Self::Value(s) => s.as_f64(),
        }
    }

    /// Convert into a dataset cell.
    pub fn to_scalar(&self) -> Scalar {
        match self {
            Self::Number(v) => Scalar::Float(*v),
            Self::Integer(v) => Scalar::Int(*v),
            Self::Count(c) => Scalar::Int(*c as i64),
            Self::Value(s) => s.clone(),
        }
    }
}

/// One group and its reduced values.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupResult {
    /// Values of the key columns, in key-column order.
    pub key: Vec<Scalar>,
    /// Number of rows in the group.
    pub row_count: usize,
    /// `(output name, value)` in spec order.
    pub values: Vec<(String, AggregateValue)>,
}

impl GroupResult {
    pub fn get(&self, output: &str) -> Option<&AggregateValue> {
        self.values
            .iter()
            .find(|(name, _)| name == output)
            .map(|(_, v)| v)
    }

    /// Numeric value of `output`, or [`InsightError::NotNumeric`].
    pub fn number(&self, output: &str) -> Result<f64> {
        self.get(output)
            .and_then(AggregateValue::as_f64)
            .ok_or_else(|| InsightError::NotNumeric {
                column: output.to_string(),
                value: format!("{:?}", self.get(output)),
            })
    }

    /// Key rendered as `(a, b)` for messages.
    pub fn key_label(&self) -> String {
        key_label(&self.key)
    }
}

/// Rows sharing one key, as indices into the source dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub key: Vec<Scalar>,
    pub rows: Vec<usize>,
}

// ── GroupAggregator ───────────────────────────────────────────────────────────

/// Stateless helper that partitions and reduces datasets.
pub struct GroupAggregator;

impl GroupAggregator {
    /// Partition `dataset` by `keys` and reduce each group per `spec`.
    ///
    /// Groups are returned in the order their key first appears; call
    /// [`GroupAggregator::sort_by_key`] for ascending key order. Rows with a
    /// missing key value are dropped, so an empty dataset, or one whose keys
    /// are all missing, yields an empty result.
    pub fn group_and_aggregate(
        dataset: &Dataset,
        keys: &[&str],
        spec: &AggregateSpec,
    ) -> Result<Vec<GroupResult>> {
        let targets: Vec<usize> = spec
            .aggregations()
            .iter()
            .map(|a| dataset.column_index(&a.column))
            .collect::<Result<_>>()?;

        Self::partition(dataset, keys)?
            .into_iter()
            .map(|group| {
                let values = spec
                    .aggregations()
                    .iter()
                    .zip(&targets)
                    .map(|(agg, &col)| {
                        reduce(dataset, &group, col, agg).map(|v| (agg.output.clone(), v))
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(GroupResult {
                    key: group.key,
                    row_count: group.rows.len(),
                    values,
                })
            })
            .collect()
    }

    /// Single-key form of [`GroupAggregator::group_and_aggregate`].
    pub fn group_and_aggregate_by(
        dataset: &Dataset,
        key: &str,
        spec: &AggregateSpec,
    ) -> Result<Vec<GroupResult>> {
        Self::group_and_aggregate(dataset, &[key], spec)
    }

    /// Stable partition pass: groups in first-seen key order, rows in dataset
    /// order within each group. Rows with any missing key value are skipped.
    pub fn partition(dataset: &Dataset, keys: &[&str]) -> Result<Vec<Group>> {
        let key_idx: Vec<usize> = keys
            .iter()
            .map(|k| dataset.column_index(k))
            .collect::<Result<_>>()?;

        let mut index: HashMap<Vec<Scalar>, usize> = HashMap::new();
        let mut groups: Vec<Group> = Vec::new();

        for (row_no, row) in dataset.rows().enumerate() {
            if key_idx.iter().any(|&i| row.at(i).is_missing()) {
                continue;
            }
            let key: Vec<Scalar> = key_idx.iter().map(|&i| row.at(i).clone()).collect();
            let slot = *index.entry(key.clone()).or_insert_with(|| {
                groups.push(Group {
                    key,
                    rows: Vec::new(),
                });
                groups.len() - 1
            });
            groups[slot].rows.push(row_no);
        }

        Ok(groups)
    }

    /// Re-sort results ascending by key.
    pub fn sort_by_key(mut results: Vec<GroupResult>) -> Vec<GroupResult> {
        results.sort_by(|a, b| a.key.cmp(&b.key));
        results
    }

    /// Turn group results back into a dataset whose columns are `key_columns`
    /// followed by the aggregate outputs, so they can be reshaped or reduced
    /// again.
    pub fn results_to_dataset(
        name: &str,
        key_columns: &[&str],
        results: &[GroupResult],
    ) -> Result<Dataset> {
        let mut columns: Vec<String> = key_columns.iter().map(|c| c.to_string()).collect();
        if let Some(first) = results.first() {
            columns.extend(first.values.iter().map(|(name, _)| name.clone()));
        }

        let rows = results
            .iter()
            .map(|r| {
                r.key
                    .iter()
                    .cloned()
                    .chain(r.values.iter().map(|(_, v)| v.to_scalar()))
                    .collect()
            })
            .collect();

        Dataset::new(name, columns, rows)
    }

    /// Sum of `column` over the whole dataset (missing values skipped).
    pub fn column_sum(dataset: &Dataset, column: &str) -> Result<f64> {
        let idx = dataset.column_index(column)?;
        numeric_values(dataset, 0..dataset.len(), idx, column).map(|v| v.iter().sum())
    }

    /// Mean of `column` over the whole dataset; [`InsightError::NoData`] when
    /// it has no non-missing values.
    pub fn column_mean(dataset: &Dataset, column: &str) -> Result<f64> {
        let idx = dataset.column_index(column)?;
        let values = numeric_values(dataset, 0..dataset.len(), idx, column)?;
        if values.is_empty() {
            return Err(InsightError::NoData(format!(
                "no {} values in {}",
                column,
                dataset.name()
            )));
        }
        Ok(values.iter().sum::<f64>() / values.len() as f64)
    }

    /// Number of rows where `column` equals `value`.
    pub fn count_matching(dataset: &Dataset, column: &str, value: &Scalar) -> Result<usize> {
        let idx = dataset.column_index(column)?;
        Ok(dataset.rows().filter(|r| r.at(idx) == value).count())
    }
}

// ── Private ───────────────────────────────────────────────────────────────────

fn reduce(dataset: &Dataset, group: &Group, col: usize, agg: &Aggregation) -> Result<AggregateValue> {
    let empty = || InsightError::EmptyReduction {
        column: agg.column.clone(),
        group: key_label(&group.key),
    };

    match &agg.reduction {
        Reduction::Sum => {
            if let Some(total) = integer_sum(dataset, &group.rows, col) {
                return Ok(AggregateValue::Integer(total));
            }
            let values = numeric_values(dataset, group.rows.iter().copied(), col, &agg.column)?;
            Ok(AggregateValue::Number(values.iter().sum()))
        }
        Reduction::Mean => {
            let values = numeric_values(dataset, group.rows.iter().copied(), col, &agg.column)?;
            if values.is_empty() {
                return Err(empty());
            }
            Ok(AggregateValue::Number(
                values.iter().sum::<f64>() / values.len() as f64,
            ))
        }
        Reduction::Count => Ok(AggregateValue::Count(group.rows.len())),
        Reduction::CountMatching(target) => Ok(AggregateValue::Count(
            group
                .rows
                .iter()
                .filter_map(|&r| dataset.row(r))
                .filter(|row| row.at(col) == target)
                .count(),
        )),
        Reduction::First => group
            .rows
            .iter()
            .filter_map(|&r| dataset.row(r))
            .map(|row| row.at(col))
            .find(|v| !v.is_missing())
            .map(|v| AggregateValue::Value(v.clone()))
            .ok_or_else(empty),
    }
}

/// Sum of column `col` over `rows` when at least one value is present and
/// every present value is an integer. `None` sends the caller to the float path.
fn integer_sum(dataset: &Dataset, rows: &[usize], col: usize) -> Option<i64> {
    let mut total: Option<i64> = None;
    for row in rows.iter().filter_map(|&r| dataset.row(r)) {
        match row.at(col) {
            Scalar::Int(v) => total = Some(total.unwrap_or(0).checked_add(*v)?),
            v if v.is_missing() => {}
            _ => return None,
        }
    }
    total
}

/// Non-missing numeric values of column `col` over `rows`.
fn numeric_values(
    dataset: &Dataset,
    rows: impl IntoIterator<Item = usize>,
    col: usize,
    column: &str,
) -> Result<Vec<f64>> {
    let mut out = Vec::new();
    for row in rows.into_iter().filter_map(|r| dataset.row(r)) {
        let value = row.at(col);
        if value.is_missing() {
            continue;
        }
        match value.as_f64() {
            Some(v) => out.push(v),
            None => {
                return Err(InsightError::NotNumeric {
                    column: column.to_string(),
                    value: value.to_string(),
                })
            }
        }
    }
    Ok(out)
}

fn key_label(key: &[Scalar]) -> String {
    let parts: Vec<String> = key.iter().map(ToString::to_string).collect();
    format!("({})", parts.join(", "))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
