use std::collections::BTreeMap;

use serde::Serialize;

use super::{days_on_hand, group_sum, Comparison, Dashboard, NamedValue, Scorecard, Unit};
use crate::data::dimensions::{Channel, MxState};
use crate::data::records::TransactionRecord;
use crate::stats::{pct, rank_statuses, sum_by, trend_lower_better, trend_pct, weighted_avg, Status, ValueRange};

const EBITDA_MARGIN: f64 = 0.145;
const TOP_CATEGORIES: usize = 10;
const TOP_STORES: usize = 10;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct WeeklySales {
    pub week_index: usize,
    pub week_label: String,
    pub sales: f64,
    pub target: f64,
    pub store_sales: f64,
    pub online_sales: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StoreHealth {
    pub name: &'static str,
    pub sales: f64,
    pub margin_pct: f64,
    pub otd: f64,
    pub growth_pct: f64,
    pub health_score: f64,
    pub status: Status,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StateSales {
    pub state: MxState,
    pub sales: f64,
    pub coordinates: [f64; 2],
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExecutiveReport {
    pub objective: &'static str,
    pub scorecards: Vec<Scorecard>,
    pub weekly: Vec<WeeklySales>,
    pub margin_by_category: Vec<NamedValue>,
    pub top_stores: Vec<StoreHealth>,
    pub state_sales: Vec<StateSales>,
}

struct Headline {
    sales: f64,
    margin: f64,
    margin_pct: f64,
    aov: f64,
    fill: f64,
    doh: f64,
    otd: f64,
}

impl Headline {
    fn of(rows: &[&TransactionRecord]) -> Self {
        let sales = sum_by(rows, |r| r.net_sales);
        let margin = sum_by(rows, |r| r.gross_margin);
        let orders = sum_by(rows, |r| f64::from(r.orders));
        Self {
            sales,
            margin,
            margin_pct: pct(margin, sales),
            aov: sales / orders.max(1.0),
            fill: weighted_avg(rows, |r| r.fill_rate, |r| f64::from(r.orders)),
            doh: days_on_hand(sum_by(rows, |r| r.inventory_value), sum_by(rows, |r| r.cogs)),
            otd: weighted_avg(rows, |r| r.otd, |r| f64::from(r.orders)),
        }
    }
}

fn online_orders(rows: &[&TransactionRecord]) -> f64 {
    rows.iter()
        .filter(|r| r.channel == Channel::Online)
        .map(|r| f64::from(r.orders))
        .sum()
}

pub fn executive_report(
    current: &[&TransactionRecord],
    last_year: &[&TransactionRecord],
    previous: &[&TransactionRecord],
) -> ExecutiveReport {
    let now = Headline::of(current);
    let before = Headline::of(previous);
    let ly_sales = sum_by(last_year, |r| r.net_sales);
    let ebitda = now.sales * EBITDA_MARGIN;
    let ecom_orders = online_orders(current);

    let scorecards = vec![
        Scorecard::new("Ventas Netas", now.sales, Unit::Currency, trend_pct(now.sales, ly_sales), Comparison::LastYear),
        Scorecard::new("Margen Bruto", now.margin_pct, Unit::Percent, trend_pct(now.margin_pct, before.margin_pct), Comparison::PreviousPeriod)
            .with_secondary(now.margin),
        Scorecard::new("EBITDA", ebitda, Unit::Currency, trend_pct(ebitda, ly_sales * EBITDA_MARGIN), Comparison::LastYear),
        Scorecard::new("Órdenes e-comm", ecom_orders, Unit::Count, trend_pct(ecom_orders, online_orders(last_year)), Comparison::LastYear),
        Scorecard::new("Ticket Promedio (AOV)", now.aov, Unit::Currency, trend_pct(now.aov, before.aov), Comparison::PreviousPeriod),
        Scorecard::new("Fill Rate", now.fill, Unit::Percent, trend_pct(now.fill, before.fill), Comparison::PreviousPeriod),
        Scorecard::new("Días de Inventario (DOH)", now.doh, Unit::Days, trend_lower_better(now.doh, before.doh), Comparison::LowerIsBetter),
        Scorecard::new("OTD", now.otd, Unit::Percent, trend_pct(now.otd, before.otd), Comparison::PreviousPeriod),
    ];

    ExecutiveReport {
        objective: Dashboard::Executive.objective(),
        scorecards,
        weekly: weekly_sales(current),
        margin_by_category: margin_by_category(current),
        top_stores: top_stores(current, last_year),
        state_sales: state_sales(current),
    }
}

fn weekly_sales(rows: &[&TransactionRecord]) -> Vec<WeeklySales> {
    let mut weeks = BTreeMap::<usize, WeeklySales>::new();
    for row in rows {
        let week = weeks.entry(row.week_index).or_insert_with(|| WeeklySales {
            week_index: row.week_index,
            week_label: row.week_label.clone(),
            ..WeeklySales::default()
        });
        week.sales += row.net_sales;
        week.target += row.budget_sales;
        match row.channel {
            Channel::Store => week.store_sales += row.net_sales,
            Channel::Online => week.online_sales += row.net_sales,
        }
    }
    weeks.into_values().collect()
}

fn margin_by_category(rows: &[&TransactionRecord]) -> Vec<NamedValue> {
    let sales = group_sum(rows, |r| r.item_category.as_str(), |r| r.net_sales);
    let margin = group_sum(rows, |r| r.item_category.as_str(), |r| r.gross_margin);
    let mut out: Vec<NamedValue> = sales
        .iter()
        .map(|(name, sales)| NamedValue {
            name: (*name).to_string(),
            value: pct(margin.get(name).copied().unwrap_or(0.0), *sales),
        })
        .collect();
    out.sort_by(|a, b| b.value.total_cmp(&a.value));
    out.truncate(TOP_CATEGORIES);
    out
}

fn top_stores(rows: &[&TransactionRecord], last_year: &[&TransactionRecord]) -> Vec<StoreHealth> {
    #[derive(Default)]
    struct Acc {
        sales: f64,
        margin: f64,
        orders: f64,
        otd_weighted: f64,
    }

    let mut by_store = BTreeMap::<&'static str, Acc>::new();
    for row in rows {
        let acc = by_store.entry(row.store).or_default();
        acc.sales += row.net_sales;
        acc.margin += row.gross_margin;
        acc.orders += f64::from(row.orders);
        acc.otd_weighted += row.otd * f64::from(row.orders);
    }
    let ly_sales = group_sum(last_year, |r| r.store, |r| r.net_sales);

    let mut stores: Vec<StoreHealth> = by_store
        .into_iter()
        .map(|(name, acc)| StoreHealth {
            name,
            sales: acc.sales,
            margin_pct: pct(acc.margin, acc.sales),
            otd: acc.otd_weighted / acc.orders.max(1.0),
            growth_pct: trend_pct(acc.sales, ly_sales.get(&name).copied().unwrap_or(0.0)),
            health_score: 0.0,
            status: Status::Amber,
        })
        .collect();
    stores.sort_by(|a, b| b.sales.total_cmp(&a.sales));
    stores.truncate(TOP_STORES);

    let margin_range = ValueRange::of(&stores.iter().map(|s| s.margin_pct).collect::<Vec<_>>());
    let otd_range = ValueRange::of(&stores.iter().map(|s| s.otd).collect::<Vec<_>>());
    let growth_range = ValueRange::of(&stores.iter().map(|s| s.growth_pct).collect::<Vec<_>>());
    for store in &mut stores {
        store.health_score = margin_range.normalize(store.margin_pct) * 0.45
            + otd_range.normalize(store.otd) * 0.2
            + growth_range.normalize(store.growth_pct) * 0.35;
    }
    let statuses = rank_statuses(&stores.iter().map(|s| s.health_score).collect::<Vec<_>>());
    for (store, status) in stores.iter_mut().zip(statuses) {
        store.status = status;
    }
    stores
}

fn state_sales(rows: &[&TransactionRecord]) -> Vec<StateSales> {
    group_sum(rows, |r| r.state, |r| r.net_sales)
        .into_iter()
        .map(|(state, sales)| StateSales {
            state,
            sales,
            coordinates: state.coordinates(),
        })
        .collect()
}
