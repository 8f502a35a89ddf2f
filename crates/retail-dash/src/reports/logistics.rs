use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::{days_on_hand, group_sum, Comparison, Dashboard, NamedValue, Scorecard, Unit};
use crate::data::dimensions::{Carrier, ProductLine};
use crate::data::records::TransactionRecord;
use crate::stats::{pct, sum_by, trend_lower_better, trend_pct, weighted_avg};

/// Service level target drawn next to weekly OTD and OTIF.
pub const SLA_TARGET_PCT: f64 = 95.0;
/// Share of picked orders that leave the warehouse.
const SHIP_RATIO: f64 = 0.97;
const TOP_INVENTORY_CATEGORIES: usize = 8;
const PARETO_SKUS: usize = 20;
const RISK_SKUS: usize = 10;

const LEAD_TIME_BINS: [(&str, f64, f64); 6] = [
    ("0-1", 0.0, 1.0),
    ("1-2", 1.0, 2.0),
    ("2-3", 2.0, 3.0),
    ("3-4", 3.0, 4.0),
    ("4-5", 4.0, 5.0),
    ("5+", 5.0, f64::INFINITY),
];

const AGING_BUCKETS: [(&str, f64); 4] = [
    ("0-30", 0.46),
    ("31-60", 0.29),
    ("61-90", 0.16),
    ("90+", 0.09),
];

/// Weekly service levels and order flow, one entry per active week.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct WeeklyService {
    pub week_index: usize,
    pub week_label: String,
    pub otd: f64,
    pub otif: f64,
    pub sla: f64,
    pub created: f64,
    pub picked: f64,
    pub shipped: f64,
    pub delivered: f64,
    pub returned: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CarrierDelay {
    pub carrier: Carrier,
    pub delayed_orders: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LeadTimeBin {
    pub bin: &'static str,
    pub orders: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct InventorySplit {
    pub category: ProductLine,
    pub available: f64,
    pub committed: f64,
    pub transit: f64,
}

impl InventorySplit {
    fn total(&self) -> f64 {
        self.available + self.committed + self.transit
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ParetoEntry {
    pub sku: String,
    pub inventory: f64,
    pub cumulative_pct: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StockoutRisk {
    pub sku: String,
    /// Days without stock per active week.
    pub days_without_stock: f64,
    /// Orders per active week.
    pub demand: f64,
    pub lost_sales: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LogisticsReport {
    pub objective: &'static str,
    pub scorecards: Vec<Scorecard>,
    pub weekly: Vec<WeeklyService>,
    pub carrier_delays: Vec<CarrierDelay>,
    pub lead_time_bins: Vec<LeadTimeBin>,
    pub inventory_by_category: Vec<InventorySplit>,
    pub aging: Vec<NamedValue>,
    pub pareto: Vec<ParetoEntry>,
    pub stockout_risk: Vec<StockoutRisk>,
}

struct Headline {
    otd: f64,
    otif: f64,
    fill: f64,
    backorders: f64,
    backorder_pct: f64,
    stockout: f64,
    inventory: f64,
    doh: f64,
    cost_per_order: f64,
}

impl Headline {
    fn of(rows: &[&TransactionRecord]) -> Self {
        let orders = sum_by(rows, |r| f64::from(r.orders));
        let by_orders = |field: fn(&TransactionRecord) -> f64| {
            weighted_avg(rows, |r| field(r), |r| f64::from(r.orders))
        };
        let backorders = sum_by(rows, |r| f64::from(r.backorders));
        let inventory = sum_by(rows, |r| r.inventory_value);
        Self {
            otd: by_orders(|r| r.otd),
            otif: by_orders(|r| r.otif),
            fill: by_orders(|r| r.fill_rate),
            backorders,
            backorder_pct: pct(backorders, orders),
            stockout: by_orders(|r| r.stockout_rate),
            inventory,
            doh: days_on_hand(inventory, sum_by(rows, |r| r.cogs)),
            cost_per_order: sum_by(rows, |r| r.logistic_cost) / orders.max(1.0),
        }
    }
}

pub fn logistics_report(current: &[&TransactionRecord], previous: &[&TransactionRecord]) -> LogisticsReport {
    let now = Headline::of(current);
    let before = Headline::of(previous);

    let scorecards = vec![
        Scorecard::new("OTD", now.otd, Unit::Percent, trend_pct(now.otd, before.otd), Comparison::PreviousPeriod),
        Scorecard::new("OTIF", now.otif, Unit::Percent, trend_pct(now.otif, before.otif), Comparison::PreviousPeriod),
        Scorecard::new("Fill Rate", now.fill, Unit::Percent, trend_pct(now.fill, before.fill), Comparison::PreviousPeriod),
        Scorecard::new("Backorder", now.backorders, Unit::Count, trend_lower_better(now.backorder_pct, before.backorder_pct), Comparison::LowerIsBetter)
            .with_secondary(now.backorder_pct),
        Scorecard::new("Stockout Rate", now.stockout, Unit::Percent, trend_lower_better(now.stockout, before.stockout), Comparison::LowerIsBetter),
        Scorecard::new("Inventario Total", now.inventory, Unit::Currency, trend_pct(now.inventory, before.inventory), Comparison::PreviousPeriod),
        Scorecard::new("DOH", now.doh, Unit::Days, trend_lower_better(now.doh, before.doh), Comparison::LowerIsBetter),
        Scorecard::new("Costo logístico/orden", now.cost_per_order, Unit::Currency, trend_lower_better(now.cost_per_order, before.cost_per_order), Comparison::LowerIsBetter),
    ];

    LogisticsReport {
        objective: Dashboard::Logistics.objective(),
        scorecards,
        weekly: weekly_service(current),
        carrier_delays: carrier_delays(current),
        lead_time_bins: lead_time_bins(current),
        inventory_by_category: inventory_by_category(current),
        aging: AGING_BUCKETS
            .iter()
            .map(|(range, share)| NamedValue {
                name: (*range).to_string(),
                value: now.inventory * share,
            })
            .collect(),
        pareto: pareto(current),
        stockout_risk: stockout_risk(current),
    }
}

fn weekly_service(rows: &[&TransactionRecord]) -> Vec<WeeklyService> {
    let mut weeks = BTreeMap::<usize, (WeeklyService, f64)>::new();
    for row in rows {
        let (week, orders) = weeks.entry(row.week_index).or_insert_with(|| {
            let week = WeeklyService {
                week_index: row.week_index,
                week_label: row.week_label.clone(),
                sla: SLA_TARGET_PCT,
                ..WeeklyService::default()
            };
            (week, 0.0)
        });
        let n = f64::from(row.orders);
        let picked = n * row.fill_rate / 100.0;
        let shipped = picked * SHIP_RATIO;
        *orders += n;
        week.otd += row.otd * n;
        week.otif += row.otif * n;
        week.created += n;
        week.picked += picked;
        week.shipped += shipped;
        week.delivered += shipped * row.otd / 100.0;
        week.returned += n * row.returns_pct / 100.0;
    }
    weeks
        .into_values()
        .map(|(mut week, orders)| {
            week.otd /= orders.max(1.0);
            week.otif /= orders.max(1.0);
            week
        })
        .collect()
}

fn carrier_delays(rows: &[&TransactionRecord]) -> Vec<CarrierDelay> {
    let mut delays: Vec<CarrierDelay> = rows
        .iter()
        .filter_map(|row| row.carrier.map(|carrier| (carrier, f64::from(row.orders) * (1.0 - row.otd / 100.0))))
        .fold(BTreeMap::<Carrier, f64>::new(), |mut acc, (carrier, delayed)| {
            *acc.entry(carrier).or_insert(0.0) += delayed;
            acc
        })
        .into_iter()
        .map(|(carrier, delayed_orders)| CarrierDelay { carrier, delayed_orders })
        .collect();
    delays.sort_by(|a, b| b.delayed_orders.total_cmp(&a.delayed_orders));
    delays
}

/// Orders per lead-time band; bands are half-open `[min, max)`.
fn lead_time_bins(rows: &[&TransactionRecord]) -> Vec<LeadTimeBin> {
    let mut bins: Vec<LeadTimeBin> = LEAD_TIME_BINS
        .iter()
        .map(|(bin, _, _)| LeadTimeBin { bin: *bin, orders: 0 })
        .collect();
    for row in rows {
        let slot = LEAD_TIME_BINS
            .iter()
            .position(|(_, min, max)| row.lead_time_days >= *min && row.lead_time_days < *max);
        if let Some(slot) = slot {
            bins[slot].orders += u64::from(row.orders);
        }
    }
    bins
}

fn inventory_by_category(rows: &[&TransactionRecord]) -> Vec<InventorySplit> {
    let mut by_line = BTreeMap::<ProductLine, InventorySplit>::new();
    for row in rows {
        let split = by_line.entry(row.category).or_insert_with(|| InventorySplit {
            category: row.category,
            available: 0.0,
            committed: 0.0,
            transit: 0.0,
        });
        split.available += row.inventory_available;
        split.committed += row.inventory_committed;
        split.transit += row.inventory_transit;
    }
    let mut splits: Vec<InventorySplit> = by_line.into_values().collect();
    splits.sort_by(|a, b| b.total().total_cmp(&a.total()));
    splits.truncate(TOP_INVENTORY_CATEGORIES);
    splits
}

/// Largest SKUs by inventory value with their running share of the top set.
fn pareto(rows: &[&TransactionRecord]) -> Vec<ParetoEntry> {
    let mut skus: Vec<(&str, f64)> = group_sum(rows, |r| r.sku.as_str(), |r| r.inventory_value)
        .into_iter()
        .collect();
    skus.sort_by(|a, b| b.1.total_cmp(&a.1));
    skus.truncate(PARETO_SKUS);

    let total: f64 = skus.iter().map(|(_, value)| value).sum();
    let mut cumulative = 0.0;
    skus.into_iter()
        .map(|(sku, inventory)| {
            cumulative += inventory;
            ParetoEntry {
                sku: sku.to_string(),
                inventory,
                cumulative_pct: pct(cumulative, total),
            }
        })
        .collect()
}

fn stockout_risk(rows: &[&TransactionRecord]) -> Vec<StockoutRisk> {
    let active_weeks = rows
        .iter()
        .map(|r| r.week_index)
        .collect::<BTreeSet<_>>()
        .len()
        .max(1) as f64;

    let mut by_sku = BTreeMap::<&str, (f64, f64, f64)>::new();
    for row in rows {
        let (days, lost, demand) = by_sku.entry(row.sku.as_str()).or_default();
        *days += row.days_without_stock;
        *lost += row.lost_sales;
        *demand += f64::from(row.orders);
    }

    let mut risks: Vec<StockoutRisk> = by_sku
        .into_iter()
        .map(|(sku, (days, lost, demand))| StockoutRisk {
            sku: sku.to_string(),
            days_without_stock: days / active_weeks,
            demand: demand / active_weeks,
            lost_sales: lost,
        })
        .collect();
    let score = |risk: &StockoutRisk| risk.days_without_stock + risk.lost_sales / 10_000.0;
    risks.sort_by(|a, b| score(b).total_cmp(&score(a)));
    risks.truncate(RISK_SKUS);
    risks
}
