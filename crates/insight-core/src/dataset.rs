//! Row-oriented, immutable tabular dataset.
//!
//! Every transformation (filtering, reshaping) returns a new [`Dataset`]; no
//! method mutates rows in place.

use crate::error::{InsightError, Result};
use crate::models::Scalar;

// ── Dataset ────────────────────────────────────────────────────────────────────

/// An ordered sequence of rows sharing one column set.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    name: String,
    columns: Vec<String>,
    rows: Vec<Vec<Scalar>>,
}

/// Borrowed view of one row, addressable by column name.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    columns: &'a [String],
    values: &'a [Scalar],
}

impl<'a> Row<'a> {
    /// Value of `column`, or `None` when the dataset has no such column.
    pub fn get(&self, column: &str) -> Option<&'a Scalar> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|idx| &self.values[idx])
    }

    /// Value at a pre-resolved column index.
    pub fn at(&self, idx: usize) -> &'a Scalar {
        &self.values[idx]
    }

    pub fn values(&self) -> &'a [Scalar] {
        self.values
    }
}

impl Dataset {
    /// Build a dataset, rejecting any row whose width differs from `columns`.
    pub fn new(
        name: impl Into<String>,
        columns: Vec<String>,
        rows: Vec<Vec<Scalar>>,
    ) -> Result<Self> {
        if let Some((row, values)) = rows
            .iter()
            .enumerate()
            .find(|(_, values)| values.len() != columns.len())
        {
            return Err(InsightError::RowShape {
                row,
                found: values.len(),
                expected: columns.len(),
            });
        }
        Ok(Self {
            name: name.into(),
            columns,
            rows,
        })
    }

    /// A dataset with the given columns and no rows.
    pub fn empty(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of `column`, or [`InsightError::UnknownColumn`].
    pub fn column_index(&self, column: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == column)
            .ok_or_else(|| InsightError::UnknownColumn {
                dataset: self.name.clone(),
                column: column.to_string(),
            })
    }

    pub fn row(&self, idx: usize) -> Option<Row<'_>> {
        self.rows.get(idx).map(|values| Row {
            columns: &self.columns,
            values,
        })
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> + '_ {
        self.rows.iter().map(move |values| Row {
            columns: &self.columns,
            values,
        })
    }

    /// New dataset holding the rows for which `predicate` returns `true`.
    pub fn filter(&self, predicate: impl Fn(&Row<'_>) -> bool) -> Dataset {
        let rows = self
            .rows
            .iter()
            .filter(|values| {
                predicate(&Row {
                    columns: &self.columns,
                    values,
                })
            })
            .cloned()
            .collect();
        Dataset {
            name: self.name.clone(),
            columns: self.columns.clone(),
            rows,
        }
    }

    /// Rows where `column` equals `value`.
    pub fn filter_eq(&self, column: &str, value: &Scalar) -> Result<Dataset> {
        let idx = self.column_index(column)?;
        Ok(self.filter(|row| row.at(idx) == value))
    }

    /// Distinct non-missing values of `column` in first-seen order.
    pub fn distinct(&self, column: &str) -> Result<Vec<Scalar>> {
        let idx = self.column_index(column)?;
        let mut seen = std::collections::HashSet::new();
        Ok(self
            .rows
            .iter()
            .map(|r| &r[idx])
            .filter(|v| !v.is_missing() && seen.insert(*v))
            .cloned()
            .collect())
    }

    /// Distinct non-missing values of `column`, ascending.
    pub fn sorted_distinct(&self, column: &str) -> Result<Vec<Scalar>> {
        let mut values = self.distinct(column)?;
        values.sort();
        Ok(values)
    }

    /// Largest non-missing value of `column`; [`InsightError::NoData`] when
    /// there is none.
    pub fn max_value(&self, column: &str) -> Result<Scalar> {
        let idx = self.column_index(column)?;
        self.rows
            .iter()
            .map(|r| &r[idx])
            .filter(|v| !v.is_missing())
            .max()
            .cloned()
            .ok_or_else(|| InsightError::NoData(format!("{} has no {} values", self.name, column)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        Dataset::new(
            "sample",
            vec!["Entity".into(), "Value".into()],
            vec![
                vec!["B".into(), Scalar::Int(2)],
                vec!["A".into(), Scalar::Int(1)],
                vec!["B".into(), Scalar::Missing],
                vec![Scalar::Missing, Scalar::Int(9)],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_new_rejects_ragged_rows() {
        let err = Dataset::new(
            "bad",
            vec!["a".into(), "b".into()],
            vec![vec![Scalar::Int(1), Scalar::Int(2)], vec![Scalar::Int(3)]],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            InsightError::RowShape {
                row: 1,
                found: 1,
                expected: 2
            }
        ));
    }

    #[test]
    fn test_row_get_by_name() {
        let ds = sample();
        let row = ds.row(0).unwrap();
        assert_eq!(row.get("Entity"), Some(&Scalar::from("B")));
        assert_eq!(row.get("Nope"), None);
    }

    #[test]
    fn test_unknown_column() {
        let err = sample().column_index("Revenue").unwrap_err();
        assert!(matches!(err, InsightError::UnknownColumn { .. }));
    }

    #[test]
    fn test_distinct_is_first_seen_and_skips_missing() {
        let values = sample().distinct("Entity").unwrap();
        assert_eq!(values, vec![Scalar::from("B"), Scalar::from("A")]);
    }

    #[test]
    fn test_sorted_distinct() {
        let values = sample().sorted_distinct("Entity").unwrap();
        assert_eq!(values, vec![Scalar::from("A"), Scalar::from("B")]);
    }

    #[test]
    fn test_filter_returns_new_dataset() {
        let ds = sample();
        let only_b = ds.filter_eq("Entity", &Scalar::from("B")).unwrap();
        assert_eq!(only_b.len(), 2);
        assert_eq!(ds.len(), 4);
    }

    #[test]
    fn test_max_value() {
        assert_eq!(sample().max_value("Value").unwrap(), Scalar::Int(9));
        let empty = Dataset::empty("e", vec!["Value".into()]);
        assert!(matches!(
            empty.max_value("Value"),
            Err(InsightError::NoData(_))
        ));
    }
}
