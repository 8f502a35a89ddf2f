//! Numbers behind the four dashboard views. Formatting and charting are left
//! to whatever renders these structures.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::data::dimensions::labeled_enum;
use crate::data::model::Model;
use crate::data::records::TransactionRecord;
use crate::query::filter::{filter_hr, filter_prior_year, filter_records};
use crate::query::{DateRange, HrFilter, RecordFilter};

pub mod commercial;
pub mod executive;
pub mod hr;
pub mod logistics;

pub use commercial::CommercialReport;
pub use executive::ExecutiveReport;
pub use hr::HrReport;
pub use logistics::LogisticsReport;

labeled_enum! {
    pub enum Dashboard("dashboard") {
        Executive => "Dashboard Ejecutivo" / "executive",
        Commercial => "Dashboard Comercial" / "commercial",
        Logistics => "Dashboard Logística" / "logistics",
        Hr => "Dashboard Recursos Humanos" / "hr",
    }
}

impl Dashboard {
    pub const fn objective(self) -> &'static str {
        match self {
            Self::Executive => "Salud del negocio en una sola vista: ventas, margen, inventario, servicio al cliente y conversión de efectivo.",
            Self::Commercial => "Performance comercial por canal: conversión, promociones, pricing, margen y productos clave.",
            Self::Logistics => "Disponibilidad, rotación, quiebres, lead times, entregas a tiempo y costos logísticos.",
            Self::Hr => "Dotación, rotación, ausentismo, productividad, capacitación y costo laboral.",
        }
    }
}

labeled_enum! {
    pub enum Unit("unit") {
        Currency => "MXN" / "mxn",
        Percent => "%" / "percent",
        Count => "count" / "count",
        Days => "days" / "days",
        Hours => "hours" / "hours",
        Ratio => "ratio" / "ratio",
    }
}

labeled_enum! {
    /// What a scorecard's trend is measured against.
    pub enum Comparison("comparison") {
        LastYear => "vs LY" / "last-year",
        PreviousPeriod => "vs periodo anterior" / "previous-period",
        LowerIsBetter => "menor es mejor" / "lower-is-better",
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Scorecard {
    pub title: &'static str,
    pub value: f64,
    pub unit: Unit,
    /// Companion figure shown next to the value, e.g. margin in currency.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary: Option<f64>,
    pub trend_pct: f64,
    pub comparison: Comparison,
}

impl Scorecard {
    pub(crate) fn new(
        title: &'static str,
        value: f64,
        unit: Unit,
        trend_pct: f64,
        comparison: Comparison,
    ) -> Self {
        Self {
            title,
            value,
            unit,
            secondary: None,
            trend_pct,
            comparison,
        }
    }

    pub(crate) fn with_secondary(mut self, secondary: f64) -> Self {
        self.secondary = Some(secondary);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NamedValue {
    pub name: String,
    pub value: f64,
}

/// Filters and date range a report is computed for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportScope {
    pub range: DateRange,
    pub records: RecordFilter,
    pub hr: HrFilter,
}

impl ReportScope {
    pub fn new(range: DateRange) -> Self {
        Self {
            range,
            records: RecordFilter::default(),
            hr: HrFilter::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "dashboard", rename_all = "snake_case")]
pub enum Report {
    Executive(ExecutiveReport),
    Commercial(CommercialReport),
    Logistics(LogisticsReport),
    Hr(HrReport),
}

/// Builds one dashboard for `scope`, or `None` when the scope selects no
/// transactions.
///
/// Year-over-year figures read the prior-year twins of the selected records;
/// previous-period figures read current records in the preceding window.
pub fn build_report(model: &Model, dashboard: Dashboard, scope: &ReportScope) -> Option<Report> {
    let current = filter_records(&model.records, &scope.records, &scope.range);
    if current.is_empty() {
        return None;
    }
    let previous_range = scope.range.previous();
    let previous = filter_records(&model.records, &scope.records, &previous_range);

    let report = match dashboard {
        Dashboard::Executive => {
            let last_year = filter_prior_year(&model.ly_records, &scope.records, &scope.range);
            Report::Executive(executive::executive_report(&current, &last_year, &previous))
        }
        Dashboard::Commercial => {
            let last_year = filter_prior_year(&model.ly_records, &scope.records, &scope.range);
            Report::Commercial(commercial::commercial_report(&current, &last_year, &previous))
        }
        Dashboard::Logistics => Report::Logistics(logistics::logistics_report(&current, &previous)),
        Dashboard::Hr => {
            let hr_rows = filter_hr(&model.hr_records, &scope.hr, &scope.range);
            let previous_hr = filter_hr(&model.hr_records, &scope.hr, &previous_range);
            Report::Hr(hr::hr_report(&current, &hr_rows, &previous, &previous_hr))
        }
    };
    Some(report)
}

/// Sums `value` per key, keyed and ordered by `key`.
pub(crate) fn group_sum<'a, K: Ord>(
    rows: &[&'a TransactionRecord],
    key: impl Fn(&'a TransactionRecord) -> K,
    value: impl Fn(&TransactionRecord) -> f64,
) -> BTreeMap<K, f64> {
    let mut out = BTreeMap::new();
    for row in rows {
        *out.entry(key(*row)).or_insert(0.0) += value(row);
    }
    out
}

/// Days of inventory on hand from weekly COGS.
pub(crate) fn days_on_hand(inventory: f64, weekly_cogs: f64) -> f64 {
    inventory / (weekly_cogs * 52.0).max(1.0) * 365.0
}
