use std::time::Instant;

use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use super::calendar::{build_weeks, Week};
use super::campaigns::{Campaign, CAMPAIGNS};
use super::catalog::{build_catalog, categories, CatalogItem, LineConfig, LINE_CONFIGS};
use super::dimensions::{MxState, ProductLine};
use super::generator::generate_transactions;
use super::hr::generate_hr;
use super::prior_year::derive_prior_year;
use super::records::{HrRecord, PriorYearRecord, StaffingTotals, TransactionRecord};
use super::rng::ModelRng;
use super::stores::{Store, STORES};
use crate::config::GenerationConfig;
use crate::error::DashResult;
use crate::stats::{compute_stats, SampleStats};

/// The generated dataset plus the static registries it was built from.
///
/// Built once, then shared read-only by every filter and report.
#[derive(Clone, Debug)]
pub struct Model {
    pub config: GenerationConfig,
    pub weeks: Vec<Week>,
    pub stores: Vec<Store>,
    pub catalog: Vec<CatalogItem>,
    pub campaigns: Vec<Campaign>,
    pub categories: Vec<ProductLine>,
    pub records: Vec<TransactionRecord>,
    pub ly_records: Vec<PriorYearRecord>,
    pub hr_records: Vec<HrRecord>,
    pub staffing: Vec<StaffingTotals>,
}

/// Headline counts for a generated model.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ModelSummary {
    pub seed: u32,
    pub start: String,
    pub end: String,
    pub weeks: usize,
    pub stores: usize,
    pub catalog_items: usize,
    pub campaigns: usize,
    pub records: usize,
    pub ly_records: usize,
    pub ly_matched_ratio: f64,
    pub hr_records: usize,
    /// Spread of total net sales per week.
    pub weekly_net_sales: Option<SampleStats>,
    pub digest: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StateCoordinate {
    pub state: MxState,
    pub coordinates: [f64; 2],
}

impl Model {
    /// Generates the model with the built-in store, catalog and campaign
    /// registries.
    pub fn generate(config: &GenerationConfig) -> DashResult<Self> {
        Self::generate_with(config, &STORES, &LINE_CONFIGS, &CAMPAIGNS)
    }

    /// Generates the model from explicit registries. Every call starts a fresh
    /// random stream from `config.seed`.
    pub fn generate_with(
        config: &GenerationConfig,
        stores: &[Store],
        lines: &[LineConfig],
        campaigns: &[Campaign],
    ) -> DashResult<Self> {
        config.validate()?;
        let started = Instant::now();
        let weeks = build_weeks(config.start, config.end)?;
        let catalog = build_catalog(lines)?;
        debug!(
            weeks = weeks.len(),
            stores = stores.len(),
            catalog_items = catalog.len(),
            "registries ready"
        );

        let mut rng = ModelRng::new(config.seed);
        let records = generate_transactions(&weeks, stores, &catalog, campaigns, &mut rng);
        let ly_records = derive_prior_year(&records, stores, &mut rng);
        let (hr_records, staffing) = generate_hr(&weeks, stores, &records, &mut rng);

        let model = Self {
            config: config.clone(),
            categories: categories(&catalog),
            weeks,
            stores: stores.to_vec(),
            catalog,
            campaigns: campaigns.to_vec(),
            records,
            ly_records,
            hr_records,
            staffing,
        };
        info!(
            seed = config.seed,
            records = model.records.len(),
            ly_records = model.ly_records.len(),
            ly_matched_ratio = model.prior_year_match_ratio(),
            hr_records = model.hr_records.len(),
            elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
            "model generated"
        );
        Ok(model)
    }

    /// Records expected from the week, store, channel and catalog sizes.
    pub fn expected_record_count(&self) -> usize {
        self.weeks.len() * self.stores.len() * 2 * self.catalog.len()
    }

    pub fn prior_year_match_ratio(&self) -> f64 {
        if self.ly_records.is_empty() {
            return 0.0;
        }
        let matched = self.ly_records.iter().filter(|r| r.is_matched()).count();
        matched as f64 / self.ly_records.len() as f64
    }

    pub fn store(&self, name: &str) -> Option<&Store> {
        self.stores.iter().find(|store| store.name == name)
    }

    pub fn state_coordinates(&self) -> Vec<StateCoordinate> {
        MxState::ALL
            .iter()
            .map(|state| StateCoordinate {
                state: *state,
                coordinates: state.coordinates(),
            })
            .collect()
    }

    pub fn summary(&self) -> DashResult<ModelSummary> {
        let mut weekly = vec![0.0; self.weeks.len()];
        for record in &self.records {
            if let Some(total) = weekly.get_mut(record.week_index) {
                *total += record.net_sales;
            }
        }
        Ok(ModelSummary {
            seed: self.config.seed,
            start: self.config.start.to_string(),
            end: self.config.end.to_string(),
            weeks: self.weeks.len(),
            stores: self.stores.len(),
            catalog_items: self.catalog.len(),
            campaigns: self.campaigns.len(),
            records: self.records.len(),
            ly_records: self.ly_records.len(),
            ly_matched_ratio: self.prior_year_match_ratio(),
            hr_records: self.hr_records.len(),
            weekly_net_sales: compute_stats(&weekly),
            digest: self.digest()?,
        })
    }

    /// SHA-256 over the serialised fact collections, in order.
    pub fn digest(&self) -> DashResult<String> {
        let mut hasher = Sha256::new();
        for record in &self.records {
            hasher.update(serde_json::to_vec(record)?);
        }
        for record in &self.ly_records {
            hasher.update(serde_json::to_vec(record)?);
        }
        for record in &self.hr_records {
            hasher.update(serde_json::to_vec(record)?);
        }
        let digest = hasher.finalize();
        Ok(format!("{digest:x}"))
    }
}
