//! Comparative facts derived across groups: top performer, biggest mover,
//! growth rates and "latest" row selection.

use insight_core::error::{InsightError, Result};
use insight_core::{Dataset, Row, Scalar};
use serde::Serialize;

use crate::aggregator::{AggregateSpec, GroupAggregator};

/// An entity together with the value that singled it out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsightFact {
    pub entity: Scalar,
    pub value: f64,
}

/// The group of `group_col` with the largest summed `value_col`, over the rows
/// accepted by `filter`.
///
/// Ties go to the group seen first in dataset order. Fails with
/// [`InsightError::NoData`] when the filter leaves no rows.
pub fn top_entity_by_sum(
    dataset: &Dataset,
    group_col: &str,
    value_col: &str,
    filter: impl Fn(&Row<'_>) -> bool,
) -> Result<InsightFact> {
    let filtered = dataset.filter(filter);
    if filtered.is_empty() {
        return Err(InsightError::NoData(format!(
            "no {} rows match the filter",
            dataset.name()
        )));
    }

    let groups = GroupAggregator::group_and_aggregate_by(
        &filtered,
        group_col,
        &AggregateSpec::new().sum(value_col),
    )?;

    let mut best: Option<InsightFact> = None;
    for group in &groups {
        let value = group.number(value_col)?;
        if best.as_ref().map_or(true, |b| value > b.value) {
            best = Some(InsightFact {
                entity: group.key[0].clone(),
                value,
            });
        }
    }
    best.ok_or_else(|| InsightError::NoData(format!("no {group_col} groups")))
}

/// The group of `group_col` whose `value_col` rose the most between its
/// earliest and latest `time_col`.
///
/// Rows are ordered by `time_col` within each group (stable, so same-time rows
/// keep dataset order) before the first and last non-missing values are
/// taken. Ties go to the group seen first.
pub fn max_delta_over_time(
    dataset: &Dataset,
    group_col: &str,
    time_col: &str,
    value_col: &str,
) -> Result<InsightFact> {
    if dataset.is_empty() {
        return Err(InsightError::NoData(format!("{} is empty", dataset.name())));
    }
    let time_idx = dataset.column_index(time_col)?;
    let value_idx = dataset.column_index(value_col)?;

    let mut best: Option<InsightFact> = None;
    for group in GroupAggregator::partition(dataset, &[group_col])? {
        let mut rows: Vec<Row<'_>> = group.rows.iter().filter_map(|&r| dataset.row(r)).collect();
        rows.sort_by(|a, b| a.at(time_idx).cmp(b.at(time_idx)));

        let values: Vec<f64> = rows
            .iter()
            .map(|r| r.at(value_idx))
            .filter(|v| !v.is_missing())
            .map(|v| {
                v.as_f64().ok_or_else(|| InsightError::NotNumeric {
                    column: value_col.to_string(),
                    value: v.to_string(),
                })
            })
            .collect::<Result<_>>()?;

        let (Some(first), Some(last)) = (values.first(), values.last()) else {
            return Err(InsightError::EmptyReduction {
                column: value_col.to_string(),
                group: format!("({})", group.key[0]),
            });
        };

        let delta = last - first;
        if best.as_ref().map_or(true, |b| delta > b.value) {
            best = Some(InsightFact {
                entity: group.key[0].clone(),
                value: delta,
            });
        }
    }
    best.ok_or_else(|| InsightError::NoData(format!("no {group_col} groups")))
}

/// Percentage change from `previous` to `current`.
///
/// ```
/// use insight_data::insights::growth_rate;
///
/// assert_eq!(growth_rate(110.0, 100.0).unwrap(), 10.0);
/// assert!(growth_rate(5.0, 0.0).is_err());
/// ```
pub fn growth_rate(current: f64, previous: f64) -> Result<f64> {
    if previous == 0.0 {
        return Err(InsightError::DivisionByZero(
            "growth rate against a zero baseline".to_string(),
        ));
    }
    Ok((current - previous) / previous * 100.0)
}

/// `part` as a percentage of `whole`.
pub fn share_pct(part: f64, whole: f64) -> Result<f64> {
    if whole == 0.0 {
        return Err(InsightError::DivisionByZero(
            "percentage of a zero total".to_string(),
        ));
    }
    Ok(part / whole * 100.0)
}

/// The row with the greatest `(sort_cols...)` tuple.
///
/// When several rows share the greatest key the last of them in dataset order
/// is returned. Fails with [`InsightError::NoData`] on an empty dataset.
pub fn latest_row<'a>(dataset: &'a Dataset, sort_cols: &[&str]) -> Result<Row<'a>> {
    let idx: Vec<usize> = sort_cols
        .iter()
        .map(|c| dataset.column_index(c))
        .collect::<Result<_>>()?;
    let sort_key = |row: &Row<'a>| -> Vec<&'a Scalar> { idx.iter().map(|&i| row.at(i)).collect() };

    // `max_by_key` keeps the last of equal maxima.
    dataset
        .rows()
        .max_by_key(|row| sort_key(row))
        .ok_or_else(|| InsightError::NoData(format!("{} is empty", dataset.name())))
}

/// First row (in dataset order) whose `column` equals `value`.
pub fn first_matching<'a>(dataset: &'a Dataset, column: &str, value: &Scalar) -> Result<Option<Row<'a>>> {
    let idx = dataset.column_index(column)?;
    Ok(dataset.rows().find(|r| r.at(idx) == value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity_values(rows: &[(&str, f64)]) -> Dataset {
        Dataset::new(
            "values",
            vec!["Entity".into(), "Value".into()],
            rows.iter()
                .map(|(e, v)| vec![Scalar::from(*e), Scalar::Float(*v)])
                .collect(),
        )
        .unwrap()
    }

    fn scores(rows: &[(&str, i64, f64)]) -> Dataset {
        Dataset::new(
            "scores",
            vec!["District".into(), "Month".into(), "Score".into()],
            rows.iter()
                .map(|(d, m, s)| vec![Scalar::from(*d), Scalar::Int(*m), Scalar::Float(*s)])
                .collect(),
        )
        .unwrap()
    }

    // ── top_entity_by_sum ─────────────────────────────────────────────────────

    #[test]
    fn test_top_entity_tie_goes_to_first_seen_group() {
        let ds = entity_values(&[("A", 50.0), ("B", 80.0), ("A", 30.0)]);
        let fact = top_entity_by_sum(&ds, "Entity", "Value", |_| true).unwrap();
        assert_eq!(fact.entity, Scalar::from("A"));
        assert_eq!(fact.value, 80.0);
    }

    #[test]
    fn test_top_entity_clear_winner() {
        let ds = entity_values(&[("A", 50.0), ("B", 81.0), ("A", 30.0)]);
        let fact = top_entity_by_sum(&ds, "Entity", "Value", |_| true).unwrap();
        assert_eq!(fact.entity, Scalar::from("B"));
    }

    #[test]
    fn test_top_entity_applies_filter_first() {
        let ds = entity_values(&[("A", 50.0), ("B", 80.0), ("A", 30.0)]);
        let fact = top_entity_by_sum(&ds, "Entity", "Value", |r| {
            r.get("Value").and_then(Scalar::as_f64).unwrap_or(0.0) < 60.0
        })
        .unwrap();
        assert_eq!(fact, InsightFact { entity: Scalar::from("A"), value: 80.0 });
    }

    #[test]
    fn test_top_entity_no_rows_is_no_data() {
        let ds = entity_values(&[("A", 50.0)]);
        let err = top_entity_by_sum(&ds, "Entity", "Value", |_| false).unwrap_err();
        assert!(matches!(err, InsightError::NoData(_)));
    }

    // ── max_delta_over_time ───────────────────────────────────────────────────

    #[test]
    fn test_max_delta_sorts_by_time() {
        // Narrows rows arrive out of order: by time the score goes 60 -> 75.
        let ds = scores(&[
            ("Downtown", 1, 70.0),
            ("Narrows", 3, 75.0),
            ("Downtown", 3, 80.0),
            ("Narrows", 1, 60.0),
        ]);
        let fact = max_delta_over_time(&ds, "District", "Month", "Score").unwrap();
        assert_eq!(fact.entity, Scalar::from("Narrows"));
        assert_eq!(fact.value, 15.0);
    }

    #[test]
    fn test_max_delta_tie_goes_to_first_seen() {
        let ds = scores(&[
            ("Downtown", 1, 70.0),
            ("Narrows", 1, 60.0),
            ("Downtown", 2, 75.0),
            ("Narrows", 2, 65.0),
        ]);
        let fact = max_delta_over_time(&ds, "District", "Month", "Score").unwrap();
        assert_eq!(fact.entity, Scalar::from("Downtown"));
        assert_eq!(fact.value, 5.0);
    }

    #[test]
    fn test_max_delta_negative_when_everything_declines() {
        let ds = scores(&[("Downtown", 1, 70.0), ("Downtown", 2, 64.0)]);
        let fact = max_delta_over_time(&ds, "District", "Month", "Score").unwrap();
        assert_eq!(fact.value, -6.0);
    }

    #[test]
    fn test_max_delta_empty_is_no_data() {
        let err = max_delta_over_time(&scores(&[]), "District", "Month", "Score").unwrap_err();
        assert!(matches!(err, InsightError::NoData(_)));
    }

    // ── growth_rate / share_pct ───────────────────────────────────────────────

    #[test]
    fn test_growth_rate() {
        assert_eq!(growth_rate(110.0, 100.0).unwrap(), 10.0);
        assert_eq!(growth_rate(90.0, 100.0).unwrap(), -10.0);
    }

    #[test]
    fn test_growth_rate_zero_previous() {
        assert!(matches!(
            growth_rate(42.0, 0.0),
            Err(InsightError::DivisionByZero(_))
        ));
    }

    #[test]
    fn test_share_pct() {
        assert_eq!(share_pct(30.0, 150.0).unwrap(), 20.0);
        assert!(matches!(share_pct(1.0, 0.0), Err(InsightError::DivisionByZero(_))));
    }

    // ── latest_row / first_matching ───────────────────────────────────────────

    #[test]
    fn test_latest_row_uses_sort_key_not_position() {
        let ds = scores(&[("Downtown", 3, 1.0), ("Narrows", 1, 2.0)]);
        let row = latest_row(&ds, &["Month"]).unwrap();
        assert_eq!(row.get("District"), Some(&Scalar::from("Downtown")));
    }

    #[test]
    fn test_latest_row_tie_takes_last() {
        let ds = scores(&[("Downtown", 3, 1.0), ("Narrows", 3, 2.0), ("Uptown", 1, 3.0)]);
        let row = latest_row(&ds, &["Month"]).unwrap();
        assert_eq!(row.get("District"), Some(&Scalar::from("Narrows")));
    }

    #[test]
    fn test_latest_row_empty() {
        assert!(matches!(
            latest_row(&scores(&[]), &["Month"]),
            Err(InsightError::NoData(_))
        ));
    }

    #[test]
    fn test_first_matching() {
        let ds = scores(&[("Downtown", 1, 1.0), ("Narrows", 2, 2.0), ("Narrows", 3, 3.0)]);
        let row = first_matching(&ds, "District", &Scalar::from("Narrows"))
            .unwrap()
            .unwrap();
        assert_eq!(row.get("Month"), Some(&Scalar::Int(2)));
        assert!(first_matching(&ds, "District", &Scalar::from("Uptown"))
            .unwrap()
            .is_none());
    }
}
