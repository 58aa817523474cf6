//! Newspaper-style headline and key points built from cross-dataset facts.

use insight_core::error::{InsightError, Result};
use insight_core::formatting::{display_rounded, round_to};
use insight_core::Scalar;
use insight_data::aggregator::GroupAggregator;
use insight_data::insights::{first_matching, growth_rate, latest_row, max_delta_over_time, top_entity_by_sum};
use insight_data::store::Store;
use serde::Serialize;
use tracing::debug;

use crate::context::{calendar_year, cell, cell_f64, cell_i64, fiscal_year, non_empty, ViewContext};

pub const SUBHEADLINE: &str = "Security Operations Show Dramatic Improvement Across Gotham";

const BREAKTHROUGH_POTENTIAL: &str = "Very High";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NarrativeView {
    pub headline: String,
    pub subheadline: String,
    pub key_points: Vec<String>,
    pub metrics: NarrativeMetrics,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NarrativeMetrics {
    pub revenue_growth: f64,
    pub safety_improvement: f64,
    pub active_projects: usize,
    pub employee_count: i64,
}

pub fn build(store: &Store, ctx: &ViewContext) -> Result<NarrativeView> {
    let year = ctx.current_year(store)?;
    let financial = store.financial();

    let current = non_empty(fiscal_year(financial, year)?, &format!("no financial rows for {year}"))?;
    let previous = non_empty(
        fiscal_year(financial, year - 1)?,
        &format!("no financial rows for {}", year - 1),
    )?;
    let latest = latest_row(&current, &["Quarter"])?;
    let baseline = latest_row(&previous, &["Quarter"])?;

    let year_value = Scalar::Int(year);
    let top = top_entity_by_sum(financial, "Division", "Revenue_M", |row| {
        row.get("Year") == Some(&year_value)
    })?;
    let top_division = top.entity.to_string();

    let improved = max_delta_over_time(store.security(), "District", "Date", "Public_Safety_Score")?;

    let rd = store.rd();
    let breakthrough = match first_matching(rd, "Commercialization_Potential", &Scalar::from(BREAKTHROUGH_POTENTIAL))? {
        Some(row) => row,
        None => rd
            .row(0)
            .ok_or_else(|| InsightError::NoData("no R&D projects".to_string()))?,
    };
    let active_projects = GroupAggregator::count_matching(rd, "Status", &Scalar::from("Active"))?;

    let satisfaction = GroupAggregator::column_mean(
        &calendar_year(store.hr(), "Date", year)?,
        "Employee_Satisfaction_Score",
    )?;

    let latest_revenue = cell_f64(&latest, "Revenue_M")?;
    let revenue_growth = growth_rate(latest_revenue, cell_f64(&baseline, "Revenue_M")?)?;
    debug!(year, top_division = %top_division, district = %improved.entity, "narrative facts derived");

    Ok(NarrativeView {
        headline: format!("Wayne Enterprises Reports Record Growth: {top_division} Leads the Charge"),
        subheadline: SUBHEADLINE.to_string(),
        key_points: vec![
            // The figure comes from the latest row of the year, whichever
            // division it belongs to.
            format!(
                "{top_division} division achieved {}M in latest quarter",
                display_rounded(latest_revenue, 1)
            ),
            format!(
                "Public safety scores improved by {} points in {}",
                display_rounded(improved.value, 2),
                improved.entity
            ),
            format!(
                "R&D breakthrough: {} shows {} potential",
                cell(&breakthrough, "Project_Name")?,
                cell(&breakthrough, "Commercialization_Potential")?
            ),
            format!("Employee satisfaction reaches {}/10", display_rounded(satisfaction, 1)),
        ],
        metrics: NarrativeMetrics {
            revenue_growth: round_to(revenue_growth, 2),
            safety_improvement: round_to(improved.value, 2),
            active_projects,
            employee_count: cell_i64(&latest, "Employee_Count")?,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{sample_store, store_with_financial, FINANCIAL};

    #[test]
    fn test_headline_names_top_division() {
        let view = build(&sample_store(), &ViewContext::default()).unwrap();
        assert_eq!(view.headline, "Wayne Enterprises Reports Record Growth: Wayne Tech Leads the Charge");
        assert_eq!(view.subheadline, SUBHEADLINE);
    }

    #[test]
    fn test_key_points() {
        let view = build(&sample_store(), &ViewContext::default()).unwrap();
        assert_eq!(
            view.key_points,
            vec![
                "Wayne Tech division achieved 45.0M in latest quarter",
                "Public safety scores improved by 8.0 points in Narrows",
                "R&D breakthrough: Bio Shield shows Very High potential",
                "Employee satisfaction reaches 7.8/10",
            ]
        );
    }

    #[test]
    fn test_metrics() {
        let view = build(&sample_store(), &ViewContext::default()).unwrap();
        // Latest 2024 row (Q2, 45) against latest 2023 row (Q4, 40).
        assert_eq!(view.metrics.revenue_growth, 12.5);
        assert_eq!(view.metrics.safety_improvement, 8.0);
        assert_eq!(view.metrics.active_projects, 2);
        assert_eq!(view.metrics.employee_count, 310);
    }

    #[test]
    fn test_zero_baseline_revenue_is_division_by_zero() {
        let store = store_with_financial(
            "\
Year,Quarter,Division,Revenue_M,Net_Profit_M,RD_Investment_M,Market_Share_Pct,Employee_Count
2023,Q4,Wayne Tech,0,0,0,0,100
2024,Q1,Wayne Tech,10,1,1,1,120
",
        );
        let err = build(&store, &ViewContext::default()).unwrap_err();
        assert!(matches!(err, InsightError::DivisionByZero(_)));
    }

    #[test]
    fn test_rows_without_division_do_not_compete_for_headline() {
        let csv = format!("{FINANCIAL}2024,Q1,,500,50,10,22,1300\n");
        let view = build(&store_with_financial(&csv), &ViewContext::default()).unwrap();
        assert_eq!(view.headline, "Wayne Enterprises Reports Record Growth: Wayne Tech Leads the Charge");
    }

    #[test]
    fn test_missing_employee_count_is_an_error() {
        let store = store_with_financial(
            "\
Year,Quarter,Division,Revenue_M,Net_Profit_M,RD_Investment_M,Market_Share_Pct,Employee_Count
2023,Q4,Wayne Tech,90,18,9,20,1000
2024,Q1,Wayne Tech,100,20,10,22,
",
        );
        let err = build(&store, &ViewContext::default()).unwrap_err();
        match err {
            InsightError::NotNumeric { column, .. } => assert_eq!(column, "Employee_Count"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_previous_year_is_no_data() {
        let store = store_with_financial(
            "\
Year,Quarter,Division,Revenue_M,Net_Profit_M,RD_Investment_M,Market_Share_Pct,Employee_Count
2024,Q1,Wayne Tech,10,1,1,1,120
",
        );
        let err = build(&store, &ViewContext::default()).unwrap_err();
        assert!(matches!(err, InsightError::NoData(_)));
    }
}
