use chrono::NaiveDate;
use serde::Serialize;

use super::dimensions::{
    Area, Carrier, Channel, Contract, DeliveryType, MxState, PaymentMethod, ProductLine, Region,
    Role, Segment, Shift, Sla, Tenure,
};

/// One week x store x channel x catalog item fact.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub week_index: usize,
    pub week_label: String,
    pub month_label: String,
    pub month_key: String,
    pub iso_date: NaiveDate,
    pub channel: Channel,
    pub region: Region,
    /// Destination state. Store sales stay in the store's state.
    pub state: MxState,
    pub store: &'static str,
    pub category: ProductLine,
    pub item_category: String,
    pub sku: String,
    pub payment_method: PaymentMethod,
    pub segment: Segment,
    pub delivery_type: DeliveryType,
    pub carrier: Option<Carrier>,
    pub campaign: Option<&'static str>,
    pub promo_uplift_pct: f64,
    pub promo_roi: f64,
    pub orders: u32,
    pub units: f64,
    pub net_sales: f64,
    pub gross_margin: f64,
    pub gross_margin_pct: f64,
    pub discount_pct: f64,
    pub returns_pct: f64,
    pub fill_rate: f64,
    pub otd: f64,
    pub otif: f64,
    pub backorders: u32,
    pub stockout_rate: f64,
    pub cogs: f64,
    pub inventory_value: f64,
    pub inventory_available: f64,
    pub inventory_committed: f64,
    pub inventory_transit: f64,
    pub logistic_cost: f64,
    pub lead_time_days: f64,
    pub sessions: f64,
    pub pdp_views: f64,
    pub add_to_cart: f64,
    pub checkout: f64,
    pub budget_sales: f64,
    pub item_price: f64,
    pub competitor_low: f64,
    pub competitor_high: f64,
    pub days_without_stock: f64,
    pub lost_sales: f64,
}

impl TransactionRecord {
    pub fn sla(&self) -> Sla {
        Sla::from_lead_time(self.lead_time_days)
    }

    pub fn is_online(&self) -> bool {
        self.channel == Channel::Online
    }
}

/// How a prior-year record was obtained.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PriorYearBasis {
    /// Perturbed copy of the record 52 weeks earlier.
    Matched { week_index: usize },
    /// Current record scaled down by the store's inverse growth.
    Approximated { growth: f64 },
}

/// Year-ago twin of a [`TransactionRecord`], keyed by the same week, store,
/// channel and SKU.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PriorYearRecord {
    pub basis: PriorYearBasis,
    #[serde(flatten)]
    pub record: TransactionRecord,
}

impl PriorYearRecord {
    pub fn is_matched(&self) -> bool {
        matches!(self.basis, PriorYearBasis::Matched { .. })
    }
}

/// One week x store x area staffing fact.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HrRecord {
    pub week_index: usize,
    pub week_label: String,
    pub month_label: String,
    pub iso_date: NaiveDate,
    pub region: Region,
    pub store: &'static str,
    pub area: Area,
    pub shift: Shift,
    pub role: Role,
    pub contract: Contract,
    pub tenure: Tenure,
    pub supervisor: String,
    pub plan_headcount: u32,
    pub actual_headcount: u32,
    pub vacancies: u32,
    pub turnover_pct: f64,
    pub days_to_fill: f64,
    pub absenteeism_pct: f64,
    pub overtime_hours: u32,
    pub labor_cost: f64,
    pub training_hours: u32,
    pub incidents: u32,
}

/// Store-week staffing totals that the per-area HR rows are split from.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffingTotals {
    pub week_index: usize,
    pub store: &'static str,
    pub sales: f64,
    pub plan_headcount: u32,
    pub actual_headcount: u32,
    pub vacancies: u32,
}
