//! Executive summary across the financial, HR, security and R&D datasets.

use insight_core::error::Result;
use insight_core::formatting::round_to;
use insight_core::Scalar;
use insight_data::aggregator::GroupAggregator;
use insight_data::insights::{latest_row, share_pct};
use insight_data::store::Store;
use serde::Serialize;

use crate::context::{calendar_year, cell_f64, fiscal_year, latest_snapshot, non_empty, ViewContext};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewView {
    pub financial: FinancialSummary,
    pub hr: HrSummary,
    pub security: SecuritySummary,
    pub rd: RdSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialSummary {
    pub total_revenue_m: f64,
    pub total_profit_m: f64,
    pub profit_margin_pct: f64,
    pub latest_revenue_m: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HrSummary {
    pub avg_retention_pct: f64,
    pub avg_satisfaction_score: f64,
    pub total_employees: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SecuritySummary {
    pub avg_safety_score: f64,
    pub total_incidents: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RdSummary {
    pub active_projects: usize,
    pub total_budget_m: f64,
    pub completion_rate_pct: f64,
}

pub fn build(store: &Store, ctx: &ViewContext) -> Result<OverviewView> {
    let year = ctx.current_year(store)?;

    // Financial
    let fin = non_empty(
        fiscal_year(store.financial(), year)?,
        &format!("no financial rows for {year}"),
    )?;
    let total_revenue = GroupAggregator::column_sum(&fin, "Revenue_M")?;
    let total_profit = GroupAggregator::column_sum(&fin, "Net_Profit_M")?;
    let latest = latest_row(&fin, &["Quarter"])?;

    // HR
    let hr = calendar_year(store.hr(), "Date", year)?;
    let avg_retention = GroupAggregator::column_mean(&hr, "Retention_Rate_Pct")?;
    let avg_satisfaction = GroupAggregator::column_mean(&hr, "Employee_Satisfaction_Score")?;
    let (_, latest_hr) = latest_snapshot(store.hr(), "Date")?;

    // Security
    let security = calendar_year(store.security(), "Date", year)?;
    let avg_safety = GroupAggregator::column_mean(&security, "Public_Safety_Score")?;
    let incidents = GroupAggregator::column_sum(&security, "Security_Incidents")?;

    // R&D
    let rd = store.rd();
    let active = rd.filter_eq("Status", &Scalar::from("Active"))?;
    let completed = GroupAggregator::count_matching(rd, "Status", &Scalar::from("Completed"))?;

    Ok(OverviewView {
        financial: FinancialSummary {
            total_revenue_m: round_to(total_revenue, 2),
            total_profit_m: round_to(total_profit, 2),
            profit_margin_pct: round_to(share_pct(total_profit, total_revenue)?, 2),
            latest_revenue_m: round_to(cell_f64(&latest, "Revenue_M")?, 2),
        },
        hr: HrSummary {
            avg_retention_pct: round_to(avg_retention, 2),
            avg_satisfaction_score: round_to(avg_satisfaction, 2),
            total_employees: latest_hr.len(),
        },
        security: SecuritySummary {
            avg_safety_score: round_to(avg_safety, 2),
            total_incidents: round_to(incidents, 0) as i64,
        },
        rd: RdSummary {
            active_projects: active.len(),
            total_budget_m: round_to(GroupAggregator::column_sum(&active, "Budget_Allocated_M")?, 2),
            completion_rate_pct: round_to(share_pct(completed as f64, rd.len() as f64)?, 2),
        },
    })
}
