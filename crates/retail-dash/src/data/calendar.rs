use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::error::{DashError, DashResult};

const SHORT_MONTHS: [&str; 12] = [
    "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sept", "oct", "nov", "dic",
];
const LONG_MONTHS: [&str; 12] = [
    "Enero",
    "Febrero",
    "Marzo",
    "Abril",
    "Mayo",
    "Junio",
    "Julio",
    "Agosto",
    "Septiembre",
    "Octubre",
    "Noviembre",
    "Diciembre",
];

/// One weekly bucket of the dataset. The last bucket may be shorter than
/// seven days because it is pinned to the configured end date.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Week {
    pub index: usize,
    pub iso_date: NaiveDate,
    pub label: String,
    pub month_label: String,
    pub month_key: String,
}

impl Week {
    fn new(index: usize, date: NaiveDate) -> Self {
        let month = date.month0() as usize;
        Self {
            index,
            iso_date: date,
            label: format!("S{:02} {}", index + 1, SHORT_MONTHS[month]),
            month_label: format!("{} {}", LONG_MONTHS[month], date.year()),
            month_key: format!("{}-{:02}", date.year(), date.month()),
        }
    }

    pub fn month(&self) -> u32 {
        self.iso_date.month()
    }

    /// 1-based week of the month the bucket starts in.
    pub fn week_of_month(&self) -> u32 {
        (self.iso_date.day() - 1) / 7 + 1
    }
}

pub fn parse_iso_date(value: &str) -> DashResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|error| {
        DashError::InvalidArgument(format!("invalid date '{value}' (expected YYYY-MM-DD): {error}"))
    })
}

/// Builds weekly buckets from `start` in seven-day steps while the cursor is
/// not past `end`, then appends `end` itself if the cadence skipped it.
pub fn build_weeks(start: NaiveDate, end: NaiveDate) -> DashResult<Vec<Week>> {
    if start > end {
        return Err(DashError::InvalidArgument(format!(
            "start date {start} is after end date {end}"
        )));
    }

    let mut weeks = Vec::new();
    let mut cursor = start;
    while cursor <= end {
        weeks.push(Week::new(weeks.len(), cursor));
        cursor += Duration::days(7);
    }
    if weeks.last().map(|week| week.iso_date) != Some(end) {
        weeks.push(Week::new(weeks.len(), end));
    }
    Ok(weeks)
}
