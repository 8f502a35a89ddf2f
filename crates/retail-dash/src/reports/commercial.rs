use std::collections::BTreeMap;

use itertools::Itertools;
use serde::Serialize;

use super::{group_sum, Comparison, Dashboard, NamedValue, Scorecard, Unit};
use crate::data::dimensions::Channel;
use crate::data::records::TransactionRecord;
use crate::stats::{
    clamp, pct, rank_statuses, round_to, sum_by, trend_lower_better, trend_pct, weighted_avg,
    Status, ValueRange,
};

const TOP_CATEGORIES: usize = 15;
const HEATMAP_SIDE: usize = 6;
const HEATMAP_BOUND: f64 = 25.0;
const PRICE_ALERT_ROWS: usize = 12;
const PRICE_BAND_TOLERANCE: f64 = 0.03;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FunnelStage {
    pub name: &'static str,
    pub value: f64,
}

/// Store x item-category sales variation against last year, in percent and
/// bounded to +/-25.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Heatmap {
    pub stores: Vec<&'static str>,
    pub categories: Vec<String>,
    /// `cells[store][category]`.
    pub cells: Vec<Vec<f64>>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PromoRow {
    pub campaign: &'static str,
    pub incremental_sales: f64,
    pub margin_pct: f64,
    pub discount_pct: f64,
    pub uplift_pct: f64,
    pub roi: f64,
    pub status: Status,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum PriceBand {
    #[serde(rename = "OK")]
    Within,
    #[serde(rename = "Sobre banda")]
    Above,
    #[serde(rename = "Bajo banda")]
    Below,
}

impl PriceBand {
    pub fn classify(own: f64, low: f64, high: f64) -> Self {
        if own < low * (1.0 - PRICE_BAND_TOLERANCE) {
            Self::Below
        } else if own > high * (1.0 + PRICE_BAND_TOLERANCE) {
            Self::Above
        } else {
            Self::Within
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PriceAlert {
    pub item_category: String,
    pub own_price: f64,
    pub competitor_low: f64,
    pub competitor_high: f64,
    pub band: PriceBand,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ProductClass {
    #[serde(rename = "Estrella")]
    Star,
    #[serde(rename = "Atención")]
    Watch,
    #[serde(rename = "Problema")]
    Problem,
}

impl From<Status> for ProductClass {
    fn from(status: Status) -> Self {
        match status {
            Status::Green => Self::Star,
            Status::Amber => Self::Watch,
            Status::Red => Self::Problem,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProductHealth {
    pub sku: String,
    pub sales: f64,
    pub margin_pct: f64,
    pub rotation: f64,
    pub returns_pct: f64,
    pub health_score: f64,
    pub class: ProductClass,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CommercialReport {
    pub objective: &'static str,
    pub scorecards: Vec<Scorecard>,
    pub funnel: Vec<FunnelStage>,
    pub top_categories: Vec<NamedValue>,
    pub heatmap: Heatmap,
    pub promotions: Vec<PromoRow>,
    pub price_alerts: Vec<PriceAlert>,
    pub products: Vec<ProductHealth>,
}

struct Headline {
    sales: f64,
    orders: f64,
    aov: f64,
    upt: f64,
    margin_pct: f64,
    discount: f64,
    conversion: f64,
    returns: f64,
}

impl Headline {
    fn of(rows: &[&TransactionRecord]) -> Self {
        let sales = sum_by(rows, |r| r.net_sales);
        let orders = sum_by(rows, |r| f64::from(r.orders));
        let online: Vec<&TransactionRecord> = rows.iter().copied().filter(|r| r.is_online()).collect();
        Self {
            sales,
            orders,
            aov: sales / orders.max(1.0),
            upt: sum_by(rows, |r| r.units) / orders.max(1.0),
            margin_pct: pct(sum_by(rows, |r| r.gross_margin), sales),
            discount: weighted_avg(rows, |r| r.discount_pct, |r| r.net_sales),
            conversion: pct(
                sum_by(&online, |r| f64::from(r.orders)),
                sum_by(&online, |r| r.sessions),
            ),
            returns: weighted_avg(rows, |r| r.returns_pct, |r| f64::from(r.orders)),
        }
    }
}

pub fn commercial_report(
    current: &[&TransactionRecord],
    last_year: &[&TransactionRecord],
    previous: &[&TransactionRecord],
) -> CommercialReport {
    let now = Headline::of(current);
    let before = Headline::of(previous);
    let ly_sales = sum_by(last_year, |r| r.net_sales);
    let ly_orders = sum_by(last_year, |r| f64::from(r.orders));

    let scorecards = vec![
        Scorecard::new("Ventas Netas", now.sales, Unit::Currency, trend_pct(now.sales, ly_sales), Comparison::LastYear),
        Scorecard::new("Órdenes / Tickets", now.orders, Unit::Count, trend_pct(now.orders, ly_orders), Comparison::LastYear),
        Scorecard::new("AOV", now.aov, Unit::Currency, trend_pct(now.aov, before.aov), Comparison::PreviousPeriod),
        Scorecard::new("UPT", round_to(now.upt, 2), Unit::Ratio, trend_pct(now.upt, before.upt), Comparison::PreviousPeriod),
        Scorecard::new("Margen Bruto", now.margin_pct, Unit::Percent, trend_pct(now.margin_pct, before.margin_pct), Comparison::PreviousPeriod),
        Scorecard::new("Descuento Promedio", now.discount, Unit::Percent, trend_lower_better(now.discount, before.discount), Comparison::LowerIsBetter),
        Scorecard::new("Conversión e-comm", now.conversion, Unit::Percent, trend_pct(now.conversion, before.conversion), Comparison::PreviousPeriod),
        Scorecard::new("Devoluciones", now.returns, Unit::Percent, trend_lower_better(now.returns, before.returns), Comparison::LowerIsBetter),
    ];

    CommercialReport {
        objective: Dashboard::Commercial.objective(),
        scorecards,
        funnel: funnel(current),
        top_categories: top_categories(current),
        heatmap: heatmap(current, last_year),
        promotions: promotions(current),
        price_alerts: price_alerts(current),
        products: products(current),
    }
}

/// E-commerce funnel from sessions to purchases.
fn funnel(rows: &[&TransactionRecord]) -> Vec<FunnelStage> {
    let online: Vec<&TransactionRecord> = rows
        .iter()
        .copied()
        .filter(|r| r.channel == Channel::Online)
        .collect();
    let stage = |name, field: fn(&TransactionRecord) -> f64| FunnelStage {
        name,
        value: sum_by(&online, |r| field(r)).round(),
    };
    vec![
        stage("Sesiones", |r| r.sessions),
        stage("PDP Views", |r| r.pdp_views),
        stage("Add to Cart", |r| r.add_to_cart),
        stage("Checkout", |r| r.checkout),
        stage("Compra", |r| f64::from(r.orders)),
    ]
}

fn ranked_keys<K: Clone>(totals: &BTreeMap<K, f64>, limit: usize) -> Vec<K> {
    totals
        .iter()
        .sorted_by(|a, b| b.1.total_cmp(a.1))
        .take(limit)
        .map(|(key, _)| key.clone())
        .collect()
}

fn top_categories(rows: &[&TransactionRecord]) -> Vec<NamedValue> {
    let sales = group_sum(rows, |r| r.item_category.as_str(), |r| r.net_sales);
    ranked_keys(&sales, TOP_CATEGORIES)
        .into_iter()
        .map(|name| NamedValue {
            name: name.to_string(),
            value: sales.get(name).copied().unwrap_or(0.0),
        })
        .collect()
}

fn heatmap(rows: &[&TransactionRecord], last_year: &[&TransactionRecord]) -> Heatmap {
    let stores = ranked_keys(&group_sum(rows, |r| r.store, |r| r.net_sales), HEATMAP_SIDE);
    let categories = ranked_keys(
        &group_sum(rows, |r| r.item_category.as_str(), |r| r.net_sales),
        HEATMAP_SIDE,
    );
    let current = group_sum(rows, |r| (r.store, r.item_category.as_str()), |r| r.net_sales);
    let prior = group_sum(last_year, |r| (r.store, r.item_category.as_str()), |r| r.net_sales);

    let cells = stores
        .iter()
        .map(|store| {
            categories
                .iter()
                .map(|category| {
                    if last_year.is_empty() {
                        return 0.0;
                    }
                    let key = (*store, *category);
                    let now = current.get(&key).copied().unwrap_or(0.0);
                    let before = prior.get(&key).copied().unwrap_or(0.0);
                    round_to(clamp(trend_pct(now, before), -HEATMAP_BOUND, HEATMAP_BOUND), 1)
                })
                .collect()
        })
        .collect();

    Heatmap {
        stores,
        categories: categories.into_iter().map(str::to_string).collect(),
        cells,
    }
}

fn promotions(rows: &[&TransactionRecord]) -> Vec<PromoRow> {
    #[derive(Default)]
    struct Acc {
        sales: f64,
        margin: f64,
        discount: f64,
        uplift: f64,
        roi: f64,
    }

    let mut by_campaign = BTreeMap::<&'static str, Acc>::new();
    for row in rows {
        let Some(campaign) = row.campaign else { continue };
        let acc = by_campaign.entry(campaign).or_default();
        acc.sales += row.net_sales;
        acc.margin += row.gross_margin;
        acc.discount += row.discount_pct * row.net_sales;
        acc.uplift += row.promo_uplift_pct * row.net_sales;
        acc.roi += row.promo_roi * row.net_sales;
    }

    let mut table: Vec<PromoRow> = by_campaign
        .into_iter()
        .map(|(campaign, acc)| {
            let weight = acc.sales.max(1.0);
            let uplift_pct = acc.uplift / weight;
            PromoRow {
                campaign,
                incremental_sales: acc.sales * uplift_pct / 100.0,
                margin_pct: pct(acc.margin, acc.sales),
                discount_pct: acc.discount / weight,
                uplift_pct,
                roi: acc.roi / weight,
                status: Status::Amber,
            }
        })
        .collect();
    table.sort_by(|a, b| b.roi.total_cmp(&a.roi));

    let statuses = rank_statuses(&table.iter().map(|row| row.roi).collect::<Vec<_>>());
    for (row, status) in table.iter_mut().zip(statuses) {
        row.status = status;
    }
    table
}

/// Unit-weighted own price against the competitor band per item category.
fn price_alerts(rows: &[&TransactionRecord]) -> Vec<PriceAlert> {
    #[derive(Default)]
    struct Acc {
        price: f64,
        low: f64,
        high: f64,
        units: f64,
    }

    let mut by_category = BTreeMap::<&str, Acc>::new();
    for row in rows {
        let acc = by_category.entry(row.item_category.as_str()).or_default();
        acc.price += row.item_price * row.units;
        acc.low += row.competitor_low * row.units;
        acc.high += row.competitor_high * row.units;
        acc.units += row.units;
    }

    by_category
        .into_iter()
        .take(PRICE_ALERT_ROWS)
        .map(|(category, acc)| {
            let units = acc.units.max(1.0);
            let (own, low, high) = (acc.price / units, acc.low / units, acc.high / units);
            PriceAlert {
                item_category: category.to_string(),
                own_price: own,
                competitor_low: low,
                competitor_high: high,
                band: PriceBand::classify(own, low, high),
            }
        })
        .collect()
}

/// Scores every SKU on margin, rotation, returns and sales, then shows the
/// five best stars, four watch items and five problems.
fn products(rows: &[&TransactionRecord]) -> Vec<ProductHealth> {
    const STARS: usize = 5;
    const WATCH: usize = 4;
    const PROBLEMS: usize = 5;
    const SHOWN: usize = STARS + WATCH + PROBLEMS;

    #[derive(Default)]
    struct Acc {
        sales: f64,
        margin: f64,
        inventory: f64,
        returns: f64,
        orders: f64,
    }

    let mut by_sku = BTreeMap::<&str, Acc>::new();
    for row in rows {
        let acc = by_sku.entry(row.sku.as_str()).or_default();
        acc.sales += row.net_sales;
        acc.margin += row.gross_margin;
        acc.inventory += row.inventory_value;
        acc.returns += row.returns_pct * f64::from(row.orders);
        acc.orders += f64::from(row.orders);
    }

    let mut scored: Vec<ProductHealth> = by_sku
        .into_iter()
        .map(|(sku, acc)| ProductHealth {
            sku: sku.to_string(),
            sales: acc.sales,
            margin_pct: pct(acc.margin, acc.sales),
            rotation: acc.sales / acc.inventory.max(1.0),
            returns_pct: acc.returns / acc.orders.max(1.0),
            health_score: 0.0,
            class: ProductClass::Watch,
        })
        .collect();
    scored.sort_by(|a, b| b.sales.total_cmp(&a.sales));

    let range = |field: fn(&ProductHealth) -> f64| {
        ValueRange::of(&scored.iter().map(field).collect::<Vec<_>>())
    };
    let (margin, rotation, returns, sales) = (
        range(|p| p.margin_pct),
        range(|p| p.rotation),
        range(|p| p.returns_pct),
        range(|p| p.sales),
    );
    for product in &mut scored {
        product.health_score = margin.normalize(product.margin_pct) * 0.35
            + rotation.normalize(product.rotation) * 0.3
            + (1.0 - returns.normalize(product.returns_pct)) * 0.2
            + sales.normalize(product.sales) * 0.15;
    }
    let statuses = rank_statuses(&scored.iter().map(|p| p.health_score).collect::<Vec<_>>());
    for (product, status) in scored.iter_mut().zip(statuses) {
        product.class = status.into();
    }

    let of_class = |class: ProductClass, limit: usize| {
        scored.iter().filter(move |p| p.class == class).take(limit).cloned()
    };
    let mut shown: Vec<ProductHealth> = of_class(ProductClass::Star, STARS)
        .chain(of_class(ProductClass::Watch, WATCH))
        .chain(of_class(ProductClass::Problem, PROBLEMS))
        .collect();
    if shown.len() < SHOWN {
        let fill: Vec<ProductHealth> = scored
            .iter()
            .filter(|p| !shown.iter().any(|s| s.sku == p.sku))
            .take(SHOWN - shown.len())
            .cloned()
            .collect();
        shown.extend(fill);
    }
    shown
}
