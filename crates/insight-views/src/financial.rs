//! Revenue and profit trends per division, one point per fiscal period.

use insight_core::error::Result;
use insight_core::formatting::period_label;
use insight_core::{Dataset, Scalar};
use insight_data::aggregator::{AggregateSpec, GroupAggregator, GroupResult};
use insight_data::reshaper::to_named_series;
use insight_data::store::Store;
use serde::Serialize;

use crate::chart::{labels, period_chart, ChartSeries, PeriodPoint};

const KEYS: [&str; 3] = ["Division", "Year", "Quarter"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialTrendsView {
    pub revenue_trends: Vec<ChartSeries<PeriodPoint>>,
    pub profit_trends: Vec<ChartSeries<PeriodPoint>>,
    pub divisions: Vec<String>,
    pub periods: Vec<String>,
}

pub fn build(store: &Store) -> Result<FinancialTrendsView> {
    let financial = store.financial();

    let spec = AggregateSpec::new()
        .sum("Revenue_M")
        .sum("Net_Profit_M")
        .sum("RD_Investment_M")
        .mean("Market_Share_Pct");
    let results = GroupAggregator::group_and_aggregate(financial, &KEYS, &spec)?;

    let divisions = financial.distinct("Division")?;
    let years = financial.distinct("Year")?;
    let quarters = financial.distinct("Quarter")?;
    let periods: Vec<Scalar> = years
        .iter()
        .flat_map(|y| quarters.iter().map(move |q| Scalar::Text(period_label(y, q))))
        .collect();

    let by_period = period_dataset(&results)?;
    let revenue = to_named_series(&by_period, "Division", "Period", "Revenue_M", &divisions, &periods)?;
    let profit = to_named_series(&by_period, "Division", "Period", "Net_Profit_M", &divisions, &periods)?;

    Ok(FinancialTrendsView {
        revenue_trends: period_chart(revenue, 2),
        profit_trends: period_chart(profit, 2),
        divisions: labels(&divisions),
        periods: labels(&periods),
    })
}

/// Division × period table with the `(Year, Quarter)` key folded into a
/// single `Period` label.
fn period_dataset(results: &[GroupResult]) -> Result<Dataset> {
    let rows = results
        .iter()
        .map(|r| {
            let mut row = vec![r.key[0].clone(), Scalar::Text(period_label(&r.key[1], &r.key[2]))];
            row.extend(r.values.iter().map(|(_, v)| v.to_scalar()));
            row
        })
        .collect();
    let columns = ["Division", "Period", "Revenue_M", "Net_Profit_M", "RD_Investment_M", "Market_Share_Pct"]
        .map(String::from)
        .to_vec();
    Dataset::new("financial_by_period", columns, rows)
}
