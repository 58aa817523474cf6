//! Presentation shapes shared by the views: chart series and group records.
//!
//! This is the rounding boundary; everything upstream keeps full precision.

use insight_core::formatting::round_to;
use insight_core::Scalar;
use insight_data::aggregator::{AggregateValue, GroupResult};
use insight_data::reshaper::Series;
use serde::Serialize;
use serde_json::{Map, Number, Value};

/// One group-by row as a flat JSON object: key columns, then aggregates.
pub type Record = Map<String, Value>;

/// A named series in the `{name, data}` shape the chart client renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries<P> {
    pub name: String,
    pub data: Vec<P>,
}

/// A point labelled by fiscal period, e.g. `"2024 Q1"`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodPoint {
    pub period: String,
    pub value: f64,
}

/// A point labelled by calendar date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatePoint<V> {
    pub date: String,
    pub value: V,
}

pub fn period_chart(series: Vec<Series>, decimals: u32) -> Vec<ChartSeries<PeriodPoint>> {
    series
        .into_iter()
        .map(|s| ChartSeries {
            name: s.name,
            data: s
                .points
                .into_iter()
                .map(|p| PeriodPoint {
                    period: p.label,
                    value: round_to(p.value, decimals),
                })
                .collect(),
        })
        .collect()
}

pub fn date_chart(series: Vec<Series>, decimals: u32) -> Vec<ChartSeries<DatePoint<f64>>> {
    series
        .into_iter()
        .map(|s| ChartSeries {
            name: s.name,
            data: s
                .points
                .into_iter()
                .map(|p| DatePoint {
                    date: p.label,
                    value: round_to(p.value, decimals),
                })
                .collect(),
        })
        .collect()
}

/// Date series of whole counts (incidents, production units).
pub fn date_chart_counts(series: Vec<Series>) -> Vec<ChartSeries<DatePoint<i64>>> {
    series
        .into_iter()
        .map(|s| ChartSeries {
            name: s.name,
            data: s
                .points
                .into_iter()
                .map(|p| DatePoint {
                    date: p.label,
                    value: round_to(p.value, 0) as i64,
                })
                .collect(),
        })
        .collect()
}

/// Flatten group results into records, rounding numeric aggregates.
pub fn records(key_columns: &[&str], results: &[GroupResult], decimals: u32) -> Vec<Record> {
    results
        .iter()
        .map(|r| {
            let mut record = Record::new();
            for (column, value) in key_columns.iter().zip(&r.key) {
                record.insert(column.to_string(), scalar_json(value));
            }
            for (name, value) in &r.values {
                let json = match value {
                    AggregateValue::Number(v) => float_json(round_to(*v, decimals)),
                    AggregateValue::Integer(v) => Value::from(*v),
                    AggregateValue::Count(c) => Value::from(*c),
                    AggregateValue::Value(s) => scalar_json(s),
                };
                record.insert(name.clone(), json);
            }
            record
        })
        .collect()
}

pub fn scalar_json(value: &Scalar) -> Value {
    match value {
        Scalar::Missing => Value::Null,
        Scalar::Int(v) => Value::from(*v),
        Scalar::Float(v) => float_json(*v),
        Scalar::Text(_) | Scalar::Date(_) => Value::String(value.to_string()),
    }
}

/// Non-finite floats have no JSON form and become `null`.
fn float_json(v: f64) -> Value {
    Number::from_f64(v).map(Value::Number).unwrap_or(Value::Null)
}

/// Display names of `values`, for `divisions` / `districts` / `facilities`.
pub fn labels(values: &[Scalar]) -> Vec<String> {
    values.iter().map(ToString::to_string).collect()
}
