use chrono::{Duration, NaiveDate};
use itertools::Itertools;
use serde::Serialize;

use crate::data::calendar::Week;
use crate::data::dimensions::{
    Area, Carrier, Channel, Contract, DeliveryType, PaymentMethod, ProductLine, Region, Role,
    Segment, Shift, Sla, Tenure,
};
use crate::data::records::{HrRecord, PriorYearRecord, TransactionRecord};
use crate::data::stores::Store;

/// Days in the window shown when no range is requested.
pub const DEFAULT_WINDOW_DAYS: i64 = 90;

/// Inclusive calendar range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    /// Builds a range, swapping the bounds if they arrive reversed.
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        if from > to {
            Self { from: to, to: from }
        } else {
            Self { from, to }
        }
    }

    /// First to last week of the dataset.
    pub fn dataset_bounds(weeks: &[Week]) -> Option<Self> {
        Some(Self::new(weeks.first()?.iso_date, weeks.last()?.iso_date))
    }

    /// The trailing window of the dataset, clamped to its bounds.
    pub fn default_window(bounds: &Self) -> Self {
        let from = bounds.to - Duration::days(DEFAULT_WINDOW_DAYS - 1);
        Self::new(from, bounds.to).clamp_to(bounds)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }

    pub fn days_inclusive(&self) -> i64 {
        ((self.to - self.from).num_days() + 1).max(1)
    }

    /// Same-length window ending the day before this one starts.
    pub fn previous(&self) -> Self {
        let to = self.from - Duration::days(1);
        let from = to - Duration::days(self.days_inclusive() - 1);
        Self { from, to }
    }

    pub fn clamp_to(&self, bounds: &Self) -> Self {
        let clamp = |date: NaiveDate| date.clamp(bounds.from, bounds.to);
        Self::new(clamp(self.from), clamp(self.to))
    }
}

fn selected<T: PartialEq>(selection: &[T], value: &T) -> bool {
    selection.is_empty() || selection.contains(value)
}

/// Multi-select filter over transaction dimensions. An empty list keeps
/// every value of that dimension.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecordFilter {
    pub channels: Vec<Channel>,
    pub regions: Vec<Region>,
    pub stores: Vec<String>,
    pub categories: Vec<ProductLine>,
    pub delivery_types: Vec<DeliveryType>,
    pub segments: Vec<Segment>,
    pub campaigns: Vec<String>,
    pub payment_methods: Vec<PaymentMethod>,
    pub carriers: Vec<Carrier>,
    pub slas: Vec<Sla>,
}

impl RecordFilter {
    pub fn matches(&self, record: &TransactionRecord) -> bool {
        selected(&self.channels, &record.channel)
            && selected(&self.regions, &record.region)
            && (self.stores.is_empty() || self.stores.iter().any(|s| s == record.store))
            && selected(&self.categories, &record.category)
            && selected(&self.delivery_types, &record.delivery_type)
            && selected(&self.segments, &record.segment)
            && (self.campaigns.is_empty()
                || record
                    .campaign
                    .is_some_and(|name| self.campaigns.iter().any(|c| c == name)))
            && selected(&self.payment_methods, &record.payment_method)
            && (self.carriers.is_empty()
                || record.carrier.is_some_and(|c| self.carriers.contains(&c)))
            && selected(&self.slas, &record.sla())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HrFilter {
    pub regions: Vec<Region>,
    pub stores: Vec<String>,
    pub areas: Vec<Area>,
    pub shifts: Vec<Shift>,
    pub roles: Vec<Role>,
    pub contracts: Vec<Contract>,
    pub tenures: Vec<Tenure>,
    pub supervisors: Vec<String>,
}

impl HrFilter {
    pub fn matches(&self, record: &HrRecord) -> bool {
        selected(&self.regions, &record.region)
            && (self.stores.is_empty() || self.stores.iter().any(|s| s == record.store))
            && selected(&self.areas, &record.area)
            && selected(&self.shifts, &record.shift)
            && selected(&self.roles, &record.role)
            && selected(&self.contracts, &record.contract)
            && selected(&self.tenures, &record.tenure)
            && selected(&self.supervisors, &record.supervisor)
    }
}

pub fn filter_records<'a>(
    records: &'a [TransactionRecord],
    filter: &RecordFilter,
    range: &DateRange,
) -> Vec<&'a TransactionRecord> {
    records
        .iter()
        .filter(|record| range.contains(record.iso_date) && filter.matches(record))
        .collect()
}

/// Prior-year twins of the records `filter_records` would select for the same
/// filter and range.
pub fn filter_prior_year<'a>(
    ly_records: &'a [PriorYearRecord],
    filter: &RecordFilter,
    range: &DateRange,
) -> Vec<&'a TransactionRecord> {
    ly_records
        .iter()
        .map(|ly| &ly.record)
        .filter(|record| range.contains(record.iso_date) && filter.matches(record))
        .collect()
}

pub fn filter_hr<'a>(
    hr_records: &'a [HrRecord],
    filter: &HrFilter,
    range: &DateRange,
) -> Vec<&'a HrRecord> {
    hr_records
        .iter()
        .filter(|record| range.contains(record.iso_date) && filter.matches(record))
        .collect()
}

/// Store names offered for selection, narrowed to the chosen regions.
pub fn store_options(stores: &[Store], regions: &[Region]) -> Vec<&'static str> {
    stores
        .iter()
        .filter(|store| selected(regions, &store.region))
        .map(|store| store.name)
        .sorted()
        .collect()
}

pub fn campaign_options(records: &[TransactionRecord]) -> Vec<&'static str> {
    records
        .iter()
        .filter_map(|record| record.campaign)
        .unique()
        .sorted()
        .collect()
}

pub fn supervisor_options(hr_records: &[HrRecord]) -> Vec<String> {
    hr_records
        .iter()
        .map(|record| record.supervisor.clone())
        .unique()
        .sorted()
        .collect()
}
