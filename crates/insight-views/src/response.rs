//! View dispatch and the error boundary between the engine and callers.

use std::fmt;

use insight_core::error::InsightError;
use insight_data::store::Store;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::context::ViewContext;
use crate::{financial, hr, narrative, overview, rd, security, supply_chain};

/// Detail sent with every 503.
pub const NOT_AVAILABLE_DETAIL: &str = "Data not available";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    Overview,
    FinancialTrends,
    HrPerformance,
    SecurityDistricts,
    RdPortfolio,
    SupplyChainFacilities,
    NewsNarrative,
}

impl ViewKind {
    pub const ALL: [ViewKind; 7] = [
        ViewKind::Overview,
        ViewKind::FinancialTrends,
        ViewKind::HrPerformance,
        ViewKind::SecurityDistricts,
        ViewKind::RdPortfolio,
        ViewKind::SupplyChainFacilities,
        ViewKind::NewsNarrative,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Overview => "overview",
            Self::FinancialTrends => "financial-trends",
            Self::HrPerformance => "hr-performance",
            Self::SecurityDistricts => "security-districts",
            Self::RdPortfolio => "rd-portfolio",
            Self::SupplyChainFacilities => "supply-chain-facilities",
            Self::NewsNarrative => "news-narrative",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }

    /// Prefix of the 500 detail for failures in this view.
    fn failure_prefix(self) -> &'static str {
        match self {
            Self::Overview => "Error processing overview data",
            Self::FinancialTrends => "Error processing financial trends",
            Self::HrPerformance => "Error processing HR data",
            Self::SecurityDistricts => "Error processing security data",
            Self::RdPortfolio => "Error processing R&D data",
            Self::SupplyChainFacilities => "Error processing supply chain data",
            Self::NewsNarrative => "Error generating narrative",
        }
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A failed view, shaped like an HTTP error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    pub status: u16,
    pub detail: String,
}

impl ErrorResponse {
    pub fn not_available() -> Self {
        Self {
            status: 503,
            detail: NOT_AVAILABLE_DETAIL.to_string(),
        }
    }

    pub fn for_view(kind: ViewKind, err: &InsightError) -> Self {
        match err {
            InsightError::NotAvailable | InsightError::Load(_) => Self::not_available(),
            other => Self {
                status: 500,
                detail: format!("{}: {other}", kind.failure_prefix()),
            },
        }
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.status, self.detail)
    }
}

impl std::error::Error for ErrorResponse {}

/// Assemble one view as JSON.
pub fn render(kind: ViewKind, store: &Store, ctx: &ViewContext) -> Result<Value, ErrorResponse> {
    debug!(view = %kind, "rendering view");
    let result = match kind {
        ViewKind::Overview => overview::build(store, ctx).and_then(to_json),
        ViewKind::FinancialTrends => financial::build(store).and_then(to_json),
        ViewKind::HrPerformance => hr::build(store).and_then(to_json),
        ViewKind::SecurityDistricts => security::build(store).and_then(to_json),
        ViewKind::RdPortfolio => rd::build(store).and_then(to_json),
        ViewKind::SupplyChainFacilities => supply_chain::build(store).and_then(to_json),
        ViewKind::NewsNarrative => narrative::build(store, ctx).and_then(to_json),
    };
    result.map_err(|err| {
        warn!(view = %kind, error = %err, "view failed");
        ErrorResponse::for_view(kind, &err)
    })
}

/// Every view keyed by name. Failed views carry their [`ErrorResponse`]
/// in place of the body so one failure does not hide the others.
pub fn render_all(store: &Store, ctx: &ViewContext) -> Value {
    let mut out = Map::new();
    for kind in ViewKind::ALL {
        let body = match render(kind, store, ctx) {
            Ok(value) => value,
            Err(err) => serde_json::json!({ "error": err }),
        };
        out.insert(kind.name().to_string(), body);
    }
    Value::Object(out)
}

/// What `--view` asked for: one view, or every view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewSelection {
    One(ViewKind),
    All,
}

impl ViewSelection {
    pub fn from_name(name: &str) -> Option<Self> {
        if name == "all" {
            return Some(Self::All);
        }
        ViewKind::from_name(name).map(Self::One)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::One(kind) => kind.name(),
            Self::All => "all",
        }
    }
}

/// Render `selection` against a store that may have failed to load.
pub fn render_selection(
    selection: ViewSelection,
    store: Result<&Store, &InsightError>,
    ctx: &ViewContext,
) -> Result<Value, ErrorResponse> {
    match (selection, store) {
        (ViewSelection::One(kind), Ok(store)) => render(kind, store, ctx),
        (ViewSelection::All, Ok(store)) => Ok(render_all(store, ctx)),
        (ViewSelection::One(kind), Err(err)) => Err(ErrorResponse::for_view(kind, err)),
        (ViewSelection::All, Err(err)) => Err(ErrorResponse::for_view(ViewKind::Overview, err)),
    }
}

fn to_json<T: Serialize>(view: T) -> insight_core::Result<Value> {
    serde_json::to_value(view).map_err(|e| InsightError::Serialize(e.to_string()))
}
