//! District performance at the latest date, plus per-district history.

use insight_core::error::Result;
use insight_data::aggregator::{AggregateSpec, GroupAggregator};
use insight_data::reshaper::to_named_series;
use insight_data::store::Store;
use serde::Serialize;

use crate::chart::{date_chart, date_chart_counts, labels, records, ChartSeries, DatePoint, Record};
use crate::context::latest_snapshot;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SecurityDistrictsView {
    pub district_performance: Vec<Record>,
    pub incidents_trends: Vec<ChartSeries<DatePoint<i64>>>,
    pub safety_trends: Vec<ChartSeries<DatePoint<f64>>>,
    pub districts: Vec<String>,
    pub latest_date: String,
}

pub fn build(store: &Store) -> Result<SecurityDistrictsView> {
    let security = store.security();
    let (latest_date, latest) = latest_snapshot(security, "Date")?;

    let performance = GroupAggregator::sort_by_key(GroupAggregator::group_and_aggregate_by(
        &latest,
        "District",
        &AggregateSpec::new()
            .sum("Security_Incidents")
            .mean("Response_Time_Minutes")
            .mean("Public_Safety_Score")
            .mean("Crime_Prevention_Effectiveness_Pct")
            .mean("Employee_Safety_Index"),
    )?);

    let keys = ["District", "Date"];
    let history = GroupAggregator::group_and_aggregate(
        security,
        &keys,
        &AggregateSpec::new().sum("Security_Incidents").mean("Public_Safety_Score"),
    )?;
    let history = GroupAggregator::results_to_dataset("security_history", &keys, &history)?;

    let districts = security.distinct("District")?;
    let dates = security.sorted_distinct("Date")?;
    let incidents = to_named_series(&history, "District", "Date", "Security_Incidents", &districts, &dates)?;
    let safety = to_named_series(&history, "District", "Date", "Public_Safety_Score", &districts, &dates)?;

    Ok(SecurityDistrictsView {
        district_performance: records(&["District"], &performance, 2),
        incidents_trends: date_chart_counts(incidents),
        safety_trends: date_chart(safety, 2),
        districts: labels(&districts),
        latest_date: latest_date.to_string(),
    })
}
