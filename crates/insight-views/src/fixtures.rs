//! Small, hand-checked datasets shared by the view tests.

use insight_core::models::DatasetKind;
use insight_core::Dataset;
use insight_data::reader::parse_dataset;
use insight_data::store::Store;

pub const FINANCIAL: &str = "\
Year,Quarter,Division,Revenue_M,Net_Profit_M,RD_Investment_M,Market_Share_Pct,Employee_Count
2023,Q3,Wayne Tech,90,18,9,20,1100
2023,Q4,Wayne Tech,95,19,9.5,21,1150
2023,Q4,Wayne Foundation,40,8,2,5,280
2024,Q1,Wayne Tech,100,20,10,22,1200
2024,Q1,Wayne Foundation,50,10,2.5,6,300
2024,Q2,Wayne Tech,110,22,11,23,1250
2024,Q2,Wayne Foundation,45,9,2,6,310
";

pub const HR: &str = "\
Date,Department,Employee_Level,Retention_Rate_Pct,Employee_Satisfaction_Score,Training_Hours_Annual,Performance_Rating
2023-12-31,Engineering,Senior,88,7.5,40,4.0
2024-01-31,Engineering,Senior,90,8.0,42,4.2
2024-01-31,Engineering,Junior,85,7.0,60,3.8
2024-01-31,Security,Senior,92,8.5,50,4.5
";

pub const SECURITY: &str = "\
Date,District,Security_Incidents,Response_Time_Minutes,Public_Safety_Score,Crime_Prevention_Effectiveness_Pct,Employee_Safety_Index
2023-12-31,Downtown,10,8,70,60,80
2024-01-31,Downtown,8,7.5,72,62,81
2024-01-31,Narrows,20,12,50,40,60
2024-02-29,Downtown,6,7,75,65,82
2024-02-29,Narrows,15,11,58,45,62
";

pub const RD: &str = "\
Project_ID,Project_Name,Division,Status,Budget_Allocated_M,Budget_Spent_M,Commercialization_Potential,Timeline_Adherence_Pct,Security_Classification
RD001,Quantum Armor,Wayne Tech,Active,10,4,High,90,Secret
RD002,Bio Shield,Wayne Biotech,Completed,5,5,Very High,100,Confidential
RD003,Fusion Cell,Wayne Tech,Active,20,8,Very High,80,Top Secret
RD004,Grapple Line,Wayne Tech,Paused,2,1,Medium,70,Secret
";

pub const SUPPLY_CHAIN: &str = "\
Date,Facility_Location,Product_Line,Quality_Score_Pct,Monthly_Production_Volume,Lead_Time_Days,Cost_Per_Unit,Sustainability_Rating,Vendor_Count,Inventory_Turnover,Carbon_Footprint_MT,Supply_Chain_Disruptions
2024-01-31,Gotham Central,Electronics,96,150000,10,4.5,A,20,6.0,300,1
2024-01-31,Gotham Central,Armor,94,90000,14,12.25,B,11,4.5,210,2
2024-02-29,Gotham Central,Electronics,97,160000,9,4.4,A,21,6.2,290,0
2024-02-29,Gotham Central,Armor,95,100000,13,12.0,B,12,4.6,200,1
2024-02-29,Bludhaven,Vehicles,90,60000,20,30,C,8,3.1,500,3
";

pub fn dataset(kind: DatasetKind, csv: &str) -> Dataset {
    parse_dataset(kind, csv.as_bytes()).expect("fixture csv must parse")
}

pub fn sample_store() -> Store {
    Store::new(
        dataset(DatasetKind::Financial, FINANCIAL),
        dataset(DatasetKind::Hr, HR),
        dataset(DatasetKind::Security, SECURITY),
        dataset(DatasetKind::Rd, RD),
        dataset(DatasetKind::SupplyChain, SUPPLY_CHAIN),
    )
}

/// The sample store with the financial dataset replaced.
pub fn store_with_financial(csv: &str) -> Store {
    Store::new(
        dataset(DatasetKind::Financial, csv),
        dataset(DatasetKind::Hr, HR),
        dataset(DatasetKind::Security, SECURITY),
        dataset(DatasetKind::Rd, RD),
        dataset(DatasetKind::SupplyChain, SUPPLY_CHAIN),
    )
}
