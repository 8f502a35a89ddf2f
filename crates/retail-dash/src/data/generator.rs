use super::calendar::Week;
use super::campaigns::{select_campaign, Campaign};
use super::catalog::CatalogItem;
use super::dimensions::{Carrier, Channel, DeliveryType, PaymentMethod, Segment};
use super::records::TransactionRecord;
use super::rng::ModelRng;
use super::stores::{Store, DESTINATION_STATE_MIX, HOME_STATE_BONUS};
use crate::stats::clamp;

pub const CHANNELS: [Channel; 2] = [Channel::Store, Channel::Online];

/// Orders per week for a store/item with every factor at 1.
const BASE_ORDERS: f64 = 13.5;

/// Domain bounds for rate fields, shared by current and prior-year records.
pub mod bounds {
    pub const GROSS_MARGIN_PCT: (f64, f64) = (13.0, 49.5);
    pub const RETURNS_PCT: (f64, f64) = (0.5, 9.8);
    pub const FILL_RATE: (f64, f64) = (83.0, 99.4);
    pub const OTD: (f64, f64) = (79.5, 99.2);
    pub const OTIF: (f64, f64) = (77.5, 98.7);
    pub const DISCOUNT_PCT: (f64, f64) = (1.8, 27.0);
    pub const STOCKOUT_RATE: (f64, f64) = (0.3, 16.2);
    pub const DAYS_WITHOUT_STOCK: (f64, f64) = (0.0, 19.0);
    pub const AVAILABLE_RATIO: (f64, f64) = (0.52, 0.82);
    pub const COMMITTED_RATIO: (f64, f64) = (0.12, 0.31);
}

pub(crate) fn clamp_in(value: f64, (min, max): (f64, f64)) -> f64 {
    clamp(value, min, max)
}

pub fn monthly_demand_factor(month: u32) -> f64 {
    match month {
        1 => 0.84,
        2 => 0.91,
        3 => 0.96,
        4 => 1.02,
        5 => 1.13,
        6 => 1.06,
        7 => 1.0,
        8 => 1.05,
        9 => 0.95,
        10 => 1.01,
        11 => 1.24,
        12 => 1.36,
        _ => 1.0,
    }
}

/// Baseline demand for a channel given the line's e-commerce share.
pub fn channel_demand(channel: Channel, ecom_share: f64) -> f64 {
    match channel {
        Channel::Online => 0.72 * (ecom_share / 0.35),
        Channel::Store => 0.98 * ((1.0 - ecom_share) / 0.55),
    }
}

/// Multiplicative ramp over the elapsed fraction of the window. Online
/// accelerates faster than stores.
pub fn trend_factor(progress: f64, store_growth: f64, channel: Channel) -> f64 {
    let base = 1.0 + progress * (0.14 + store_growth * 0.45);
    let acceleration = match channel {
        Channel::Online => 1.0 + progress * 0.11,
        Channel::Store => 1.0 + progress * 0.04,
    };
    base * acceleration
}

/// Week-level inputs shared by every record generated for that week.
#[derive(Clone, Copy, Debug)]
struct WeekFactors<'a> {
    week: &'a Week,
    month: u32,
    month_season: f64,
    progress: f64,
    /// Second week of November onward, when carriers saturate.
    peak_week: bool,
}

impl<'a> WeekFactors<'a> {
    fn new(week: &'a Week, week_count: usize) -> Self {
        let month = week.month();
        Self {
            week,
            month,
            month_season: monthly_demand_factor(month),
            progress: week.index as f64 / (week_count.saturating_sub(1)).max(1) as f64,
            peak_week: month == 11 && week.week_of_month() >= 2,
        }
    }

    fn peak_pressure(&self) -> f64 {
        if self.month_season > 1.15 {
            (self.month_season - 1.15) * 9.0
        } else {
            0.0
        }
    }
}

/// Generates one record per week x store x channel x catalog item, in that
/// nesting order.
pub fn generate_transactions(
    weeks: &[Week],
    stores: &[Store],
    catalog: &[CatalogItem],
    campaigns: &[Campaign],
    rng: &mut ModelRng,
) -> Vec<TransactionRecord> {
    let mut records =
        Vec::with_capacity(weeks.len() * stores.len() * CHANNELS.len() * catalog.len());
    for week in weeks {
        let factors = WeekFactors::new(week, weeks.len());
        for store in stores {
            for channel in CHANNELS {
                for item in catalog {
                    records.push(build_record(&factors, store, channel, item, campaigns, rng));
                }
            }
        }
    }
    records
}

fn build_record(
    factors: &WeekFactors<'_>,
    store: &Store,
    channel: Channel,
    item: &CatalogItem,
    campaigns: &[Campaign],
    rng: &mut ModelRng,
) -> TransactionRecord {
    let online = channel == Channel::Online;
    let month = factors.month;

    let season = item.season.factor(month);
    let demand = channel_demand(channel, item.ecom_share);
    let trend = trend_factor(factors.progress, store.growth, channel);
    let noise = 1.0 + rng.jitter(0.18 + item.volatility * 0.03);

    let campaign = select_campaign(campaigns, month, channel, item, rng);
    let mut discount_pct = if online { 8.4 } else { 6.2 } + rng.jitter(2.8);
    let mut promo_uplift_pct = 0.0;
    let mut promo_roi = 1.0;
    if let Some(active) = campaign {
        discount_pct = active.discount_pct + rng.jitter(2.2);
        promo_uplift_pct = active.uplift_pct + rng.jitter(6.0);
    }
    discount_pct = clamp_in(discount_pct, bounds::DISCOUNT_PCT);
    if campaign.is_some() {
        promo_roi = 1.08 + promo_uplift_pct / (discount_pct * 10.5).max(1.0);
    }

    let raw_orders = BASE_ORDERS
        * store.factor
        * item.demand
        * factors.month_season
        * season
        * demand
        * trend
        * noise
        * (1.0 + promo_uplift_pct / 100.0);
    let orders = raw_orders.round().max(1.0) as u32;
    let order_count = f64::from(orders);

    let delivery_type = if online && rng.next_unit() > 0.12 {
        DeliveryType::Delivery
    } else {
        DeliveryType::Pickup
    };
    let carrier = match delivery_type {
        DeliveryType::Delivery => Some(*rng.pick(Carrier::ALL)),
        DeliveryType::Pickup => None,
    };
    let payment_method = *rng.pick(PaymentMethod::ALL);
    let segment = *rng.pick(Segment::ALL);
    let state = if online {
        rng.pick_weighted(&DESTINATION_STATE_MIX, |(state, weight)| {
            weight + if *state == store.state { HOME_STATE_BONUS } else { 0.0 }
        })
        .0
    } else {
        store.state
    };

    let channel_price = if online { 0.98 } else { 1.03 };
    let list_price = item.base_price * store.income * channel_price * (1.0 + rng.jitter(0.06));
    let effective_aov = list_price * (1.0 - discount_pct / 100.0);
    let net_sales = order_count * effective_aov.max(item.base_price * 0.55);

    let channel_margin = if online { -0.5 } else { 0.8 };
    let gross_margin_pct = clamp_in(
        item.margin_base + item.margin_shift - discount_pct * 0.24
            + channel_margin
            + rng.jitter(2.6),
        bounds::GROSS_MARGIN_PCT,
    );
    let gross_margin = net_sales * (gross_margin_pct / 100.0);
    let units = order_count * (item.units_per_transaction + rng.jitter(0.16)).max(0.9);

    let returns_pct = clamp_in(
        item.returns_base + if online { 1.05 } else { 0.32 } + rng.jitter(0.9),
        bounds::RETURNS_PCT,
    );
    let peak_pressure = factors.peak_pressure();
    let fill_rate = clamp_in(
        97.2 - item.volatility * 2.45 - peak_pressure - if online { 0.9 } else { 0.4 }
            + rng.jitter(1.8),
        bounds::FILL_RATE,
    );
    let delivery_penalty = match delivery_type {
        DeliveryType::Delivery => 1.5,
        DeliveryType::Pickup => 0.2,
    };
    let otd = clamp_in(
        95.6 - delivery_penalty
            - item.volatility
            - peak_pressure * 0.32
            - if factors.peak_week { 0.9 } else { 0.0 }
            + rng.jitter(2.2),
        bounds::OTD,
    );
    let service_floor = otd.min(fill_rate);
    let otif = clamp_in(
        service_floor - item.volatility * 0.52 + rng.jitter(1.1),
        bounds::OTIF,
    )
    .min(service_floor);
    let backorders = (order_count * (1.0 - fill_rate / 100.0)).round().max(0.0) as u32;
    let stockout_rate = clamp_in(100.0 - fill_rate + rng.jitter(1.3), bounds::STOCKOUT_RATE);

    let cogs = net_sales - gross_margin;
    let doh_shift = match month {
        1 => 6.0,
        11 | 12 => -4.0,
        _ => 0.0,
    };
    let doh = clamp(item.doh_base + doh_shift + rng.jitter(5.0), 14.0, 108.0);
    let inventory_value = cogs * doh / 7.0;
    let available_ratio = clamp_in(0.65 + rng.jitter(0.1), bounds::AVAILABLE_RATIO);
    let committed_ratio =
        clamp_in(0.22 + rng.jitter(0.06), bounds::COMMITTED_RATIO).min(1.0 - available_ratio);
    let inventory_available = inventory_value * available_ratio;
    let inventory_committed = inventory_value * committed_ratio;
    let inventory_transit = (inventory_value - inventory_available - inventory_committed).max(0.0);

    let cost_per_order = match carrier {
        Some(carrier) => carrier.base_cost_per_order() * (0.88 + rng.next_unit() * 0.24),
        None => 18.0 + rng.next_unit() * 9.0,
    };
    let logistic_cost = order_count * cost_per_order;
    let lead_time_days = match carrier {
        Some(carrier) => carrier.lead_days() * (0.82 + rng.next_unit() * 0.38),
        None => 0.45 + rng.next_unit() * 0.8,
    };

    let conversion = clamp(
        item.conversion_base
            + if campaign.is_some() { 0.34 } else { 0.0 }
            + if month == 11 { 0.28 } else { 0.0 }
            + rng.jitter(0.42),
        0.9,
        5.2,
    );
    let sessions = if online {
        order_count / (conversion / 100.0)
    } else {
        0.0
    };
    let pdp_views = sessions * clamp(0.47 + rng.jitter(0.06), 0.3, 0.65);
    let add_to_cart = pdp_views * clamp(0.32 + rng.jitter(0.05), 0.21, 0.47);
    let checkout = add_to_cart * clamp(0.59 + rng.jitter(0.07), 0.42, 0.8);

    let budget_sales = net_sales * (0.97 + rng.next_unit() * 0.1);

    let item_price = list_price / item.units_per_transaction.max(1.0);
    let competitor_low = item_price * (0.9 + rng.jitter(0.05));
    let competitor_high = item_price * (1.11 + rng.jitter(0.06));

    let days_without_stock = clamp_in(
        f64::from(backorders) / order_count.max(1.0) * 17.0
            + item.volatility * 1.4
            + rng.next_unit() * 2.3,
        bounds::DAYS_WITHOUT_STOCK,
    );
    let lost_sales = days_without_stock * (net_sales / 30.0) * 0.21;

    let week = factors.week;
    TransactionRecord {
        week_index: week.index,
        week_label: week.label.clone(),
        month_label: week.month_label.clone(),
        month_key: week.month_key.clone(),
        iso_date: week.iso_date,
        channel,
        region: store.region,
        state,
        store: store.name,
        category: item.line,
        item_category: item.item_category.clone(),
        sku: item.sku.clone(),
        payment_method,
        segment,
        delivery_type,
        carrier,
        campaign: campaign.map(|c| c.name),
        promo_uplift_pct,
        promo_roi,
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
        logistic_cost,
        lead_time_days,
        sessions,
        pdp_views,
        add_to_cart,
        checkout,
        budget_sales,
        item_price,
        competitor_low,
        competitor_high,
        days_without_stock,
        lost_sales,
    }
}
