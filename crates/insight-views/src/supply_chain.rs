//! Facility scorecards at the latest date, plus production and quality
//! history per facility.

use insight_core::error::Result;
use insight_core::formatting::round_to;
use insight_data::aggregator::{AggregateSpec, GroupAggregator, GroupResult};
use insight_data::reshaper::to_named_series;
use insight_data::store::Store;
use serde::Serialize;

use crate::chart::{date_chart, date_chart_counts, labels, ChartSeries, DatePoint};
use crate::context::latest_snapshot;

/// Monthly volume that counts as 100% utilization.
pub const CAPACITY_BASELINE_UNITS: f64 = 200_000.0;
/// Efficiency points lost per disruption.
pub const DISRUPTION_PENALTY: f64 = 2.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FacilityPerformance {
    #[serde(rename = "Facility_Name")]
    pub facility_name: String,
    #[serde(rename = "Facility_Type")]
    pub facility_type: String,
    #[serde(rename = "Operational_Efficiency_Pct")]
    pub operational_efficiency_pct: f64,
    #[serde(rename = "Production_Capacity_Units")]
    pub production_capacity_units: i64,
    #[serde(rename = "Capacity_Utilization_Pct")]
    pub capacity_utilization_pct: f64,
    #[serde(rename = "Lead_Time_Days")]
    pub lead_time_days: f64,
    #[serde(rename = "Quality_Score")]
    pub quality_score: f64,
    #[serde(rename = "Cost_Per_Unit")]
    pub cost_per_unit: f64,
    #[serde(rename = "Supply_Chain_Disruptions")]
    pub supply_chain_disruptions: i64,
    #[serde(rename = "Sustainability_Rating")]
    pub sustainability_rating: String,
    #[serde(rename = "Vendor_Count")]
    pub vendor_count: i64,
    #[serde(rename = "Inventory_Turnover")]
    pub inventory_turnover: f64,
    #[serde(rename = "Carbon_Footprint_MT")]
    pub carbon_footprint_mt: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SupplyChainView {
    pub facility_performance: Vec<FacilityPerformance>,
    pub production_trends: Vec<ChartSeries<DatePoint<i64>>>,
    pub quality_trends: Vec<ChartSeries<DatePoint<f64>>>,
    pub facilities: Vec<String>,
    pub latest_date: String,
}

pub fn build(store: &Store) -> Result<SupplyChainView> {
    let supply = store.supply_chain();
    let (latest_date, latest) = latest_snapshot(supply, "Date")?;

    let scorecard = AggregateSpec::new()
        .first("Product_Line")
        .mean("Quality_Score_Pct")
        .sum("Supply_Chain_Disruptions")
        .sum("Monthly_Production_Volume")
        .mean("Lead_Time_Days")
        .mean("Cost_Per_Unit")
        .first("Sustainability_Rating")
        .mean("Vendor_Count")
        .mean("Inventory_Turnover")
        .mean("Carbon_Footprint_MT");
    // Facilities stay in the order they first appear.
    let facility_performance = GroupAggregator::group_and_aggregate_by(&latest, "Facility_Location", &scorecard)?
        .iter()
        .map(facility_performance)
        .collect::<Result<Vec<_>>>()?;

    let keys = ["Facility_Location", "Date"];
    let history = GroupAggregator::group_and_aggregate(
        supply,
        &keys,
        &AggregateSpec::new()
            .sum("Monthly_Production_Volume")
            .mean("Quality_Score_Pct"),
    )?;
    let history = GroupAggregator::results_to_dataset("supply_chain_history", &keys, &history)?;

    let facilities = supply.distinct("Facility_Location")?;
    let dates = supply.sorted_distinct("Date")?;
    let production = to_named_series(
        &history,
        "Facility_Location",
        "Date",
        "Monthly_Production_Volume",
        &facilities,
        &dates,
    )?;
    let quality = to_named_series(&history, "Facility_Location", "Date", "Quality_Score_Pct", &facilities, &dates)?;

    Ok(SupplyChainView {
        facility_performance,
        production_trends: date_chart_counts(production),
        quality_trends: date_chart(quality, 2),
        facilities: labels(&facilities),
        latest_date: latest_date.to_string(),
    })
}

fn facility_performance(group: &GroupResult) -> Result<FacilityPerformance> {
    let quality = group.number("Quality_Score_Pct")?;
    let disruptions = group.number("Supply_Chain_Disruptions")?;
    let volume = group.number("Monthly_Production_Volume")?;

    let efficiency = (quality - disruptions * DISRUPTION_PENALTY).max(0.0);
    let utilization = (volume / CAPACITY_BASELINE_UNITS * 100.0).min(100.0);

    Ok(FacilityPerformance {
        facility_name: group.key[0].to_string(),
        facility_type: text(group, "Product_Line"),
        operational_efficiency_pct: round_to(efficiency, 1),
        production_capacity_units: volume as i64,
        capacity_utilization_pct: round_to(utilization, 1),
        lead_time_days: round_to(group.number("Lead_Time_Days")?, 1),
        quality_score: round_to(quality, 1),
        cost_per_unit: round_to(group.number("Cost_Per_Unit")?, 2),
        supply_chain_disruptions: disruptions as i64,
        sustainability_rating: text(group, "Sustainability_Rating"),
        // Whole vendors; the mean is truncated, not rounded.
        vendor_count: group.number("Vendor_Count")?.trunc() as i64,
        inventory_turnover: round_to(group.number("Inventory_Turnover")?, 1),
        carbon_footprint_mt: round_to(group.number("Carbon_Footprint_MT")?, 1),
    })
}

fn text(group: &GroupResult, output: &str) -> String {
    group
        .get(output)
        .map(|v| v.to_scalar().to_string())
        .unwrap_or_default()
}
