use std::collections::HashMap;

use super::dimensions::Channel;
use super::generator::{bounds, clamp_in};
use super::records::{PriorYearBasis, PriorYearRecord, TransactionRecord};
use super::rng::ModelRng;
use super::stores::Store;
use crate::stats::clamp;

pub const PRIOR_YEAR_LAG_WEEKS: usize = 52;

/// Join key between a record and its year-ago counterpart.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ComparisonKey<'a> {
    pub week_index: usize,
    pub store: &'a str,
    pub channel: Channel,
    pub sku: &'a str,
}

impl<'a> ComparisonKey<'a> {
    pub fn of(record: &'a TransactionRecord) -> Self {
        Self {
            week_index: record.week_index,
            store: record.store,
            channel: record.channel,
            sku: &record.sku,
        }
    }

    /// Key of the record 52 weeks earlier, if the week index allows one.
    pub fn lagged(record: &'a TransactionRecord) -> Option<Self> {
        let week_index = record.week_index.checked_sub(PRIOR_YEAR_LAG_WEEKS)?;
        Some(Self {
            week_index,
            ..Self::of(record)
        })
    }
}

pub fn index_records(records: &[TransactionRecord]) -> HashMap<ComparisonKey<'_>, &TransactionRecord> {
    records
        .iter()
        .map(|record| (ComparisonKey::of(record), record))
        .collect()
}

/// Where a prior-year record's values come from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PriorYearSource<'a> {
    Matched(&'a TransactionRecord),
    /// No lagged record exists; values are the current ones divided by this
    /// growth factor.
    Approximated(f64),
}

impl PriorYearSource<'_> {
    pub fn basis(&self) -> PriorYearBasis {
        match self {
            Self::Matched(source) => PriorYearBasis::Matched {
                week_index: source.week_index,
            },
            Self::Approximated(growth) => PriorYearBasis::Approximated { growth: *growth },
        }
    }
}

pub fn resolve_source<'a>(
    record: &'a TransactionRecord,
    index: &HashMap<ComparisonKey<'a>, &'a TransactionRecord>,
    stores: &[Store],
) -> PriorYearSource<'a> {
    if let Some(source) = ComparisonKey::lagged(record).and_then(|key| index.get(&key).copied()) {
        return PriorYearSource::Matched(source);
    }
    let online = record.is_online();
    let growth = stores
        .iter()
        .find(|store| store.name == record.store)
        .map(|store| store.fallback_growth(online))
        .unwrap_or(1.08 + if online { 0.04 } else { 0.0 });
    PriorYearSource::Approximated(growth)
}

/// Derives one prior-year record per current record, in the same order.
pub fn derive_prior_year(
    records: &[TransactionRecord],
    stores: &[Store],
    rng: &mut ModelRng,
) -> Vec<PriorYearRecord> {
    let index = index_records(records);
    records
        .iter()
        .map(|record| {
            let source = resolve_source(record, &index, stores);
            derive_record(record, source, rng)
        })
        .collect()
}

/// Builds the year-ago twin of `current`.
///
/// Volume fields scale by one shared factor: a small random perturbation
/// around 1 when matched, the inverse growth when approximated. Rate fields
/// drift by small additive noise and are re-clamped.
pub fn derive_record(
    current: &TransactionRecord,
    source: PriorYearSource<'_>,
    rng: &mut ModelRng,
) -> PriorYearRecord {
    let (base, scale, matched) = match source {
        PriorYearSource::Matched(found) => (found, 1.0 + rng.jitter(0.035), true),
        PriorYearSource::Approximated(growth) => (current, 1.0 / growth.max(1.0), false),
    };

    let orders = (f64::from(base.orders) * scale).round().max(1.0) as u32;
    let order_count = f64::from(orders);
    let units = (base.units * scale).max(1.0);
    let net_sales = base.net_sales * scale;
    let gross_margin_pct =
        clamp_in(base.gross_margin_pct - rng.jitter(1.1) - 0.3, bounds::GROSS_MARGIN_PCT);
    let gross_margin = net_sales * (gross_margin_pct / 100.0);
    let fill_rate = clamp_in(base.fill_rate - 0.4 + rng.jitter(0.6), bounds::FILL_RATE);
    let otd = clamp_in(base.otd - 0.45 + rng.jitter(0.8), bounds::OTD);
    let otif = clamp_in(base.otif - 0.35 + rng.jitter(0.8), bounds::OTIF).min(otd.min(fill_rate));
    let returns_pct = clamp_in(base.returns_pct + rng.jitter(0.5), bounds::RETURNS_PCT);
    let discount_pct = clamp_in(base.discount_pct - 0.5 + rng.jitter(0.7), bounds::DISCOUNT_PCT);
    let backorders = (order_count * (1.0 - fill_rate / 100.0)).round().max(0.0) as u32;
    let stockout_rate = clamp_in(100.0 - fill_rate + rng.jitter(1.1), bounds::STOCKOUT_RATE);
    let cogs = net_sales - gross_margin;

    let inventory_value = (base.inventory_value * scale).max(cogs * 1.4);
    let (available_base, committed_base) = if matched {
        let value = base.inventory_value.max(1.0);
        (
            base.inventory_available / value,
            base.inventory_committed / value,
        )
    } else {
        (0.64, 0.22)
    };
    let available_ratio = clamp_in(available_base + rng.jitter(0.03), bounds::AVAILABLE_RATIO);
    let committed_ratio =
        clamp_in(committed_base + rng.jitter(0.03), bounds::COMMITTED_RATIO).min(1.0 - available_ratio);
    let inventory_available = inventory_value * available_ratio;
    let inventory_committed = inventory_value * committed_ratio;
    let inventory_transit = (inventory_value - inventory_available - inventory_committed).max(0.0);

    let lead_time_days = clamp(base.lead_time_days + rng.jitter(0.2), 0.3, 6.9);
    let budget_sales = net_sales * (0.99 + rng.next_unit() * 0.08);
    let days_without_stock =
        clamp_in(base.days_without_stock + rng.jitter(0.6), bounds::DAYS_WITHOUT_STOCK);
    let lost_sales = days_without_stock * (net_sales / 30.0) * 0.2;

    PriorYearRecord {
        basis: source.basis(),
        record: TransactionRecord {
            promo_uplift_pct: base.promo_uplift_pct,
            promo_roi: base.promo_roi,
            orders,
            units,
            net_sales,
            gross_margin,
            gross_margin_pct,
            discount_pct,
            returns_pct,
            fill_rate,
            otd,
            otif,
            backorders,
            stockout_rate,
            cogs,
            inventory_value,
            inventory_available,
            inventory_committed,
            inventory_transit,
            logistic_cost: base.logistic_cost * scale,
            lead_time_days,
            sessions: base.sessions * scale,
            pdp_views: base.pdp_views * scale,
            add_to_cart: base.add_to_cart * scale,
            checkout: base.checkout * scale,
            budget_sales,
            days_without_stock,
            lost_sales,
            ..current.clone()
        },
    }
}
