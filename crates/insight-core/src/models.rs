use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

// ── Scalar ─────────────────────────────────────────────────────────────────────

/// A single typed cell value.
///
/// Serialises untagged, so a `Missing` cell becomes `null` and a date becomes
/// `"YYYY-MM-DD"`, which is the shape chart clients expect.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    /// Absent value (empty CSV field or `nan`).
    Missing,
    Int(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
}

impl Scalar {
    /// `true` for `Missing` and for a NaN float.
    pub fn is_missing(&self) -> bool {
        match self {
            Self::Missing => true,
            Self::Float(v) => v.is_nan(),
            _ => false,
        }
    }

    /// Numeric view of the value. Integers widen to `f64`; NaN is treated as
    /// missing.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) if !v.is_nan() => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            Self::Float(v) if v.is_finite() => Some(v.trunc() as i64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Position of the variant in the cross-type ordering.
    fn rank(&self) -> u8 {
        match self {
            Self::Missing => 0,
            Self::Int(_) => 1,
            Self::Float(_) => 2,
            Self::Date(_) => 3,
            Self::Text(_) => 4,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => Ok(()),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(s) => f.write_str(s),
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

// Floats compare by bit pattern / total order so that a `Scalar` can be used
// as a hash-map key and sorted deterministically.

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Missing, Self::Missing) => true,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Date(a), Self::Date(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Scalar {}

impl Hash for Scalar {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Self::Missing => {}
            Self::Int(v) => v.hash(state),
            Self::Float(v) => v.to_bits().hash(state),
            Self::Text(s) => s.hash(state),
            Self::Date(d) => d.hash(state),
        }
    }
}

impl Ord for Scalar {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a.cmp(b),
            (Self::Float(a), Self::Float(b)) => a.total_cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::Date(a), Self::Date(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for Scalar {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<NaiveDate> for Scalar {
    fn from(v: NaiveDate) -> Self {
        Self::Date(v)
    }
}

// ── Schemas ────────────────────────────────────────────────────────────────────

/// Declared type of a dataset column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Text,
    Integer,
    Float,
    /// ISO `YYYY-MM-DD` calendar date.
    Date,
}

/// One of the five fixed business datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetKind {
    Financial,
    Hr,
    Security,
    Rd,
    SupplyChain,
}

const FINANCIAL_COLUMNS: &[(&str, ColumnType)] = &[
    ("Year", ColumnType::Integer),
    ("Quarter", ColumnType::Text),
    ("Division", ColumnType::Text),
    ("Revenue_M", ColumnType::Float),
    ("Net_Profit_M", ColumnType::Float),
    ("RD_Investment_M", ColumnType::Float),
    ("Market_Share_Pct", ColumnType::Float),
    ("Employee_Count", ColumnType::Integer),
];

const HR_COLUMNS: &[(&str, ColumnType)] = &[
    ("Date", ColumnType::Date),
    ("Department", ColumnType::Text),
    ("Employee_Level", ColumnType::Text),
    ("Retention_Rate_Pct", ColumnType::Float),
    ("Employee_Satisfaction_Score", ColumnType::Float),
    ("Training_Hours_Annual", ColumnType::Float),
    ("Performance_Rating", ColumnType::Float),
];

const SECURITY_COLUMNS: &[(&str, ColumnType)] = &[
    ("Date", ColumnType::Date),
    ("District", ColumnType::Text),
    ("Security_Incidents", ColumnType::Integer),
    ("Response_Time_Minutes", ColumnType::Float),
    ("Public_Safety_Score", ColumnType::Float),
    ("Crime_Prevention_Effectiveness_Pct", ColumnType::Float),
    ("Employee_Safety_Index", ColumnType::Float),
];

const RD_COLUMNS: &[(&str, ColumnType)] = &[
    ("Project_ID", ColumnType::Text),
    ("Project_Name", ColumnType::Text),
    ("Division", ColumnType::Text),
    ("Status", ColumnType::Text),
    ("Budget_Allocated_M", ColumnType::Float),
    ("Budget_Spent_M", ColumnType::Float),
    ("Commercialization_Potential", ColumnType::Text),
    ("Timeline_Adherence_Pct", ColumnType::Float),
    ("Security_Classification", ColumnType::Text),
];

const SUPPLY_CHAIN_COLUMNS: &[(&str, ColumnType)] = &[
    ("Date", ColumnType::Date),
    ("Facility_Location", ColumnType::Text),
    ("Product_Line", ColumnType::Text),
    ("Quality_Score_Pct", ColumnType::Float),
    ("Monthly_Production_Volume", ColumnType::Integer),
    ("Lead_Time_Days", ColumnType::Float),
    ("Cost_Per_Unit", ColumnType::Float),
    ("Sustainability_Rating", ColumnType::Text),
    ("Vendor_Count", ColumnType::Integer),
    ("Inventory_Turnover", ColumnType::Float),
    ("Carbon_Footprint_MT", ColumnType::Float),
    ("Supply_Chain_Disruptions", ColumnType::Integer),
];

impl DatasetKind {
    /// All kinds, in load order.
    pub const ALL: [DatasetKind; 5] = [
        DatasetKind::Financial,
        DatasetKind::Hr,
        DatasetKind::Security,
        DatasetKind::Rd,
        DatasetKind::SupplyChain,
    ];

    /// Short lowercase name, also accepted by [`DatasetKind::from_name`].
    pub fn name(self) -> &'static str {
        match self {
            Self::Financial => "financial",
            Self::Hr => "hr",
            Self::Security => "security",
            Self::Rd => "rd",
            Self::SupplyChain => "supply_chain",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }

    /// Canonical CSV file name for this dataset.
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Financial => "wayne_financial_data.csv",
            Self::Hr => "wayne_hr_analytics.csv",
            Self::Security => "wayne_security_data.csv",
            Self::Rd => "wayne_rd_portfolio.csv",
            Self::SupplyChain => "wayne_supply_chain.csv",
        }
    }

    /// Required columns and their types, in canonical order.
    pub fn schema(self) -> &'static [(&'static str, ColumnType)] {
        match self {
            Self::Financial => FINANCIAL_COLUMNS,
            Self::Hr => HR_COLUMNS,
            Self::Security => SECURITY_COLUMNS,
            Self::Rd => RD_COLUMNS,
            Self::SupplyChain => SUPPLY_CHAIN_COLUMNS,
        }
    }

    pub fn column_type(self, column: &str) -> Option<ColumnType> {
        self.schema()
            .iter()
            .find(|(name, _)| *name == column)
            .map(|(_, ty)| *ty)
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
