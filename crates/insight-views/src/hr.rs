//! Department and level performance at the latest HR snapshot.

use insight_core::error::Result;
use insight_data::aggregator::{AggregateSpec, GroupAggregator, Reduction};
use insight_data::store::Store;
use serde::Serialize;

use crate::chart::{records, Record};
use crate::context::latest_snapshot;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HrPerformanceView {
    pub department_performance: Vec<Record>,
    pub level_performance: Vec<Record>,
    pub employee_distribution: Vec<Record>,
    pub latest_date: String,
}

fn performance_spec() -> AggregateSpec {
    AggregateSpec::new()
        .mean("Retention_Rate_Pct")
        .mean("Employee_Satisfaction_Score")
        .mean("Training_Hours_Annual")
        .mean("Performance_Rating")
}

pub fn build(store: &Store) -> Result<HrPerformanceView> {
    let (latest_date, latest) = latest_snapshot(store.hr(), "Date")?;

    let by_department = GroupAggregator::sort_by_key(GroupAggregator::group_and_aggregate_by(
        &latest,
        "Department",
        &performance_spec(),
    )?);
    let by_level = GroupAggregator::sort_by_key(GroupAggregator::group_and_aggregate_by(
        &latest,
        "Employee_Level",
        &performance_spec(),
    )?);
    let distribution = GroupAggregator::sort_by_key(GroupAggregator::group_and_aggregate(
        &latest,
        &["Department", "Employee_Level"],
        &AggregateSpec::new().with_output("Department", "count", Reduction::Count),
    )?);

    Ok(HrPerformanceView {
        department_performance: records(&["Department"], &by_department, 2),
        level_performance: records(&["Employee_Level"], &by_level, 2),
        employee_distribution: records(&["Department", "Employee_Level"], &distribution, 2),
        latest_date: latest_date.to_string(),
    })
}
