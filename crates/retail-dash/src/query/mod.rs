pub mod filter;

pub use filter::{filter_hr, filter_prior_year, filter_records, DateRange, HrFilter, RecordFilter};
