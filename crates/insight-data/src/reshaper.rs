//! Reshape grouped rows into one named series per entity for charting.

use std::collections::HashMap;

use insight_core::error::{InsightError, Result};
use insight_core::{Dataset, Scalar};
use serde::Serialize;

/// One `(label, value)` point of a [`Series`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    /// Period or date label.
    pub label: String,
    pub value: f64,
}

/// Ordered points for one entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub points: Vec<SeriesPoint>,
}

/// Build one series per entity in `entities` (caller order preserved), with
/// one point per time in `times` for which a row exists.
///
/// * Series are sparse: an `(entity, time)` pair with no row, or whose value
///   is missing, produces no point. Nothing is zero-filled.
/// * When several rows share an `(entity, time)` pair the first in dataset
///   order is used; pre-aggregate if they should be combined.
/// * Values are returned at full precision; rounding is a presentation
///   concern.
pub fn to_named_series(
    dataset: &Dataset,
    entity_col: &str,
    time_col: &str,
    value_col: &str,
    entities: &[Scalar],
    times: &[Scalar],
) -> Result<Vec<Series>> {
    let entity_idx = dataset.column_index(entity_col)?;
    let time_idx = dataset.column_index(time_col)?;
    let value_idx = dataset.column_index(value_col)?;

    let mut first_row: HashMap<(&Scalar, &Scalar), &Scalar> = HashMap::new();
    for row in dataset.rows() {
        first_row
            .entry((row.at(entity_idx), row.at(time_idx)))
            .or_insert(row.at(value_idx));
    }

    entities
        .iter()
        .map(|entity| {
            let mut points = Vec::new();
            for time in times {
                let Some(value) = first_row.get(&(entity, time)) else {
                    continue;
                };
                if value.is_missing() {
                    continue;
                }
                let value = value.as_f64().ok_or_else(|| InsightError::NotNumeric {
                    column: value_col.to_string(),
                    value: value.to_string(),
                })?;
                points.push(SeriesPoint {
                    label: time.to_string(),
                    value,
                });
            }
            Ok(Series {
                name: entity.to_string(),
                points,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn d(s: &str) -> Scalar {
        Scalar::Date(NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap())
    }

    fn trends() -> Dataset {
        Dataset::new(
            "trends",
            vec!["District".into(), "Date".into(), "Incidents".into()],
            vec![
                vec!["Downtown".into(), d("2024-01-31"), Scalar::Int(5)],
                vec!["Downtown".into(), d("2024-02-29"), Scalar::Int(3)],
                vec!["Narrows".into(), d("2024-02-29"), Scalar::Int(9)],
                vec!["Downtown".into(), d("2024-01-31"), Scalar::Int(99)],
                vec!["Narrows".into(), d("2024-03-31"), Scalar::Missing],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_one_series_per_entity_in_caller_order() {
        let ds = trends();
        let entities = vec![Scalar::from("Narrows"), Scalar::from("Downtown")];
        let times = ds.sorted_distinct("Date").unwrap();

        let series = to_named_series(&ds, "District", "Date", "Incidents", &entities, &times).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].name, "Narrows");
        assert_eq!(series[1].name, "Downtown");
    }

    #[test]
    fn test_series_are_sparse_not_zero_filled() {
        let ds = trends();
        let times = ds.sorted_distinct("Date").unwrap();
        let series = to_named_series(
            &ds,
            "District",
            "Date",
            "Incidents",
            &[Scalar::from("Narrows")],
            &times,
        )
        .unwrap();

        // No January row, and the March value is missing.
        assert_eq!(
            series[0].points,
            vec![SeriesPoint {
                label: "2024-02-29".into(),
                value: 9.0
            }]
        );
    }

    #[test]
    fn test_first_row_wins_for_duplicate_pairs() {
        let ds = trends();
        let times = vec![d("2024-01-31")];
        let series = to_named_series(
            &ds,
            "District",
            "Date",
            "Incidents",
            &[Scalar::from("Downtown")],
            &times,
        )
        .unwrap();
        assert_eq!(series[0].points[0].value, 5.0);
    }

    #[test]
    fn test_every_point_matches_a_real_row() {
        let ds = trends();
        let entities = ds.distinct("District").unwrap();
        let times = ds.sorted_distinct("Date").unwrap();
        let series = to_named_series(&ds, "District", "Date", "Incidents", &entities, &times).unwrap();

        for s in &series {
            for p in &s.points {
                assert!(ds.rows().any(|r| r.get("District").unwrap().to_string() == s.name
                    && r.get("Date").unwrap().to_string() == p.label));
            }
        }
    }

    #[test]
    fn test_unknown_entity_gets_empty_series() {
        let ds = trends();
        let times = ds.sorted_distinct("Date").unwrap();
        let series = to_named_series(
            &ds,
            "District",
            "Date",
            "Incidents",
            &[Scalar::from("Uptown")],
            &times,
        )
        .unwrap();
        assert_eq!(series[0].name, "Uptown");
        assert!(series[0].points.is_empty());
    }

    #[test]
    fn test_non_numeric_value_fails() {
        let ds = trends();
        let err = to_named_series(
            &ds,
            "Date",
            "Incidents",
            "District",
            &[d("2024-01-31")],
            &[Scalar::Int(5)],
        )
        .unwrap_err();
        assert!(matches!(err, InsightError::NotNumeric { .. }));
    }
}
