//! R&D portfolio breakdowns by division, status, potential and
//! classification.

use insight_core::error::Result;
use insight_core::Scalar;
use insight_data::aggregator::{AggregateSpec, GroupAggregator, GroupResult, Reduction};
use insight_data::store::Store;
use insight_core::Dataset;
use serde::Serialize;

use crate::chart::{records, Record};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RdPortfolioView {
    pub portfolio_summary: Vec<Record>,
    pub status_distribution: Vec<Record>,
    pub potential_distribution: Vec<Record>,
    pub timeline_data: Vec<Record>,
    pub security_distribution: Vec<Record>,
    pub total_projects: usize,
    pub active_projects: usize,
}

pub fn build(store: &Store) -> Result<RdPortfolioView> {
    let rd = store.rd();

    let summary = sorted(
        rd,
        "Division",
        AggregateSpec::new()
            .with_output("Project_ID", "Project_Count", Reduction::Count)
            .sum("Budget_Allocated_M")
            .sum("Budget_Spent_M")
            .with_output(
                "Commercialization_Potential",
                "High_Potential_Projects",
                Reduction::CountMatching(Scalar::from("Very High")),
            ),
    )?;
    let timeline = sorted(rd, "Division", AggregateSpec::new().mean("Timeline_Adherence_Pct"))?;

    Ok(RdPortfolioView {
        portfolio_summary: records(&["Division"], &summary, 2),
        status_distribution: distribution(rd, "Status")?,
        potential_distribution: distribution(rd, "Commercialization_Potential")?,
        timeline_data: records(&["Division"], &timeline, 2),
        security_distribution: distribution(rd, "Security_Classification")?,
        total_projects: rd.len(),
        active_projects: GroupAggregator::count_matching(rd, "Status", &Scalar::from("Active"))?,
    })
}

fn sorted(rd: &Dataset, key: &str, spec: AggregateSpec) -> Result<Vec<GroupResult>> {
    GroupAggregator::group_and_aggregate_by(rd, key, &spec).map(GroupAggregator::sort_by_key)
}

/// `{<column>: value, count: n}` per distinct value of `column`.
fn distribution(rd: &Dataset, column: &str) -> Result<Vec<Record>> {
    let counts = sorted(rd, column, AggregateSpec::new().with_output(column, "count", Reduction::Count))?;
    Ok(records(&[column], &counts, 0))
}
