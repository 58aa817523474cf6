//! The read-only dataset store.
//!
//! A [`Store`] only exists once all five datasets loaded successfully; there
//! is no partially-populated store. Reloading means building a new `Store`.

use std::sync::Arc;

use insight_core::error::{InsightError, LoadError, Result};
use insight_core::models::DatasetKind;
use insight_core::Dataset;
use tracing::info;

use crate::reader::{read_dataset, DataSources};

/// Immutable snapshot of the five business datasets.
#[derive(Debug, Clone)]
pub struct Store {
    financial: Arc<Dataset>,
    hr: Arc<Dataset>,
    security: Arc<Dataset>,
    rd: Arc<Dataset>,
    supply_chain: Arc<Dataset>,
}

impl Store {
    /// Assemble a store from already-built datasets.
    pub fn new(
        financial: Dataset,
        hr: Dataset,
        security: Dataset,
        rd: Dataset,
        supply_chain: Dataset,
    ) -> Self {
        Self {
            financial: Arc::new(financial),
            hr: Arc::new(hr),
            security: Arc::new(security),
            rd: Arc::new(rd),
            supply_chain: Arc::new(supply_chain),
        }
    }

    /// Load every dataset from `sources`. The first failure aborts the load.
    pub fn load(sources: &DataSources) -> std::result::Result<Self, LoadError> {
        let financial = read_dataset(DatasetKind::Financial, sources.path(DatasetKind::Financial))?;
        let hr = read_dataset(DatasetKind::Hr, sources.path(DatasetKind::Hr))?;
        let security = read_dataset(DatasetKind::Security, sources.path(DatasetKind::Security))?;
        let rd = read_dataset(DatasetKind::Rd, sources.path(DatasetKind::Rd))?;
        let supply_chain =
            read_dataset(DatasetKind::SupplyChain, sources.path(DatasetKind::SupplyChain))?;

        let store = Self::new(financial, hr, security, rd, supply_chain);
        info!(
            financial = store.financial.len(),
            hr = store.hr.len(),
            security = store.security.len(),
            rd = store.rd.len(),
            supply_chain = store.supply_chain.len(),
            "dataset store loaded"
        );
        Ok(store)
    }

    /// The dataset of `kind`.
    pub fn get(&self, kind: DatasetKind) -> &Dataset {
        match kind {
            DatasetKind::Financial => &self.financial,
            DatasetKind::Hr => &self.hr,
            DatasetKind::Security => &self.security,
            DatasetKind::Rd => &self.rd,
            DatasetKind::SupplyChain => &self.supply_chain,
        }
    }

    /// The dataset called `name` (`financial`, `hr`, `security`, `rd`,
    /// `supply_chain`).
    pub fn get_by_name(&self, name: &str) -> Result<&Dataset> {
        DatasetKind::from_name(name)
            .map(|kind| self.get(kind))
            .ok_or_else(|| InsightError::UnknownDataset(name.to_string()))
    }

    pub fn financial(&self) -> &Dataset {
        &self.financial
    }

    pub fn hr(&self) -> &Dataset {
        &self.hr
    }

    pub fn security(&self) -> &Dataset {
        &self.security
    }

    pub fn rd(&self) -> &Dataset {
        &self.rd
    }

    pub fn supply_chain(&self) -> &Dataset {
        &self.supply_chain
    }
}
