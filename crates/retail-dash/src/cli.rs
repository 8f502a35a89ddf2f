use std::convert::Infallible;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};

use crate::config::{load_config, GenerationConfig};
use crate::data::calendar::{parse_iso_date, Week};
use crate::data::dimensions::{
    Area, Carrier, Channel, Contract, DeliveryType, PaymentMethod, ProductLine, Region, Role,
    Segment, Shift, Sla, Tenure,
};
use crate::data::model::Model;
use crate::data::rng::coerce_seed;
use crate::error::{DashError, DashResult};
use crate::query::filter::{store_options, supervisor_options};
use crate::query::{DateRange, HrFilter, RecordFilter};
use crate::reports::{Dashboard, ReportScope};

#[derive(Debug, Parser)]
#[command(name = "retail-dash", about = "deterministic synthetic retail BI data engine")]
pub struct Args {
    /// YAML file with `seed`, `start` and `end`.
    #[arg(long, env = "RETAIL_DASH_CONFIG")]
    pub config: Option<PathBuf>,
    /// Overrides the configured seed. Any text is accepted and coerced.
    #[arg(long, value_parser = parse_seed)]
    pub seed: Option<u32>,
    #[arg(long, value_parser = parse_date)]
    pub start: Option<NaiveDate>,
    #[arg(long, value_parser = parse_date)]
    pub end: Option<NaiveDate>,
    #[arg(long, env = "RETAIL_DASH_OUT", default_value = "out")]
    pub out_dir: PathBuf,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print headline counts and the dataset digest.
    Summary,
    /// Write every collection as JSON under the output directory.
    Export {
        #[arg(long)]
        force: bool,
    },
    /// Compute one dashboard for a date range and filter selection.
    Report {
        #[arg(value_parser = parse_dashboard)]
        dashboard: Dashboard,
        #[arg(long, value_parser = parse_date)]
        from: Option<NaiveDate>,
        #[arg(long, value_parser = parse_date)]
        to: Option<NaiveDate>,
        #[command(flatten)]
        filters: FilterArgs,
    },
    List {
        #[arg(value_enum)]
        target: ListTarget,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListTarget {
    Stores,
    Categories,
    Campaigns,
    Skus,
}

/// Repeatable filter flags. Values match either the display label or the
/// slug of a dimension, case-insensitively.
#[derive(Debug, Clone, Default, ClapArgs)]
pub struct FilterArgs {
    #[arg(long = "channel")]
    pub channels: Vec<String>,
    #[arg(long = "region")]
    pub regions: Vec<String>,
    #[arg(long = "store")]
    pub stores: Vec<String>,
    #[arg(long = "category")]
    pub categories: Vec<String>,
    #[arg(long = "delivery")]
    pub delivery_types: Vec<String>,
    #[arg(long = "segment")]
    pub segments: Vec<String>,
    #[arg(long = "campaign")]
    pub campaigns: Vec<String>,
    #[arg(long = "payment")]
    pub payment_methods: Vec<String>,
    #[arg(long = "carrier")]
    pub carriers: Vec<String>,
    #[arg(long = "sla")]
    pub slas: Vec<String>,
    #[arg(long = "area")]
    pub areas: Vec<String>,
    #[arg(long = "shift")]
    pub shifts: Vec<String>,
    #[arg(long = "role")]
    pub roles: Vec<String>,
    #[arg(long = "contract")]
    pub contracts: Vec<String>,
    #[arg(long = "tenure")]
    pub tenures: Vec<String>,
    #[arg(long = "supervisor")]
    pub supervisors: Vec<String>,
}

fn parse_seed(raw: &str) -> Result<u32, Infallible> {
    Ok(coerce_seed(raw))
}

fn parse_date(raw: &str) -> DashResult<NaiveDate> {
    parse_iso_date(raw)
}

fn parse_dashboard(raw: &str) -> DashResult<Dashboard> {
    Dashboard::parse(raw)
}

fn parse_all<T>(values: &[String], parse: impl Fn(&str) -> DashResult<T>) -> DashResult<Vec<T>> {
    values.iter().map(|value| parse(value.as_str())).collect()
}

/// Maps each free-text value onto the known option it names, ignoring case.
fn match_options(kind: &str, values: &[String], options: &[&str]) -> DashResult<Vec<String>> {
    values
        .iter()
        .map(|value| {
            let needle = value.trim().to_lowercase();
            options
                .iter()
                .find(|option| option.to_lowercase() == needle)
                .map(|option| option.to_string())
                .ok_or_else(|| {
                    DashError::InvalidArgument(format!(
                        "unknown {kind} '{}' (expected one of: {})",
                        value.trim(),
                        options.join(", ")
                    ))
                })
        })
        .collect()
}

impl FilterArgs {
    /// Stores must belong to the selected regions.
    fn resolve_stores(&self, model: &Model, regions: &[Region]) -> DashResult<Vec<String>> {
        match_options("store", &self.stores, &store_options(&model.stores, regions))
    }

    pub fn record_filter(&self, model: &Model) -> DashResult<RecordFilter> {
        let regions = parse_all(&self.regions, Region::parse)?;
        let campaigns: Vec<&str> = model.campaigns.iter().map(|campaign| campaign.name).collect();
        Ok(RecordFilter {
            channels: parse_all(&self.channels, Channel::parse)?,
            stores: self.resolve_stores(model, &regions)?,
            regions,
            categories: parse_all(&self.categories, ProductLine::parse)?,
            delivery_types: parse_all(&self.delivery_types, DeliveryType::parse)?,
            segments: parse_all(&self.segments, Segment::parse)?,
            campaigns: match_options("campaign", &self.campaigns, &campaigns)?,
            payment_methods: parse_all(&self.payment_methods, PaymentMethod::parse)?,
            carriers: parse_all(&self.carriers, Carrier::parse)?,
            slas: parse_all(&self.slas, Sla::parse)?,
        })
    }

    /// Region and store selections apply to both filters.
    pub fn hr_filter(&self, model: &Model) -> DashResult<HrFilter> {
        let regions = parse_all(&self.regions, Region::parse)?;
        let supervisors = if self.supervisors.is_empty() {
            Vec::new()
        } else {
            let options = supervisor_options(&model.hr_records);
            let options: Vec<&str> = options.iter().map(String::as_str).collect();
            match_options("supervisor", &self.supervisors, &options)?
        };
        Ok(HrFilter {
            stores: self.resolve_stores(model, &regions)?,
            regions,
            areas: parse_all(&self.areas, Area::parse)?,
            shifts: parse_all(&self.shifts, Shift::parse)?,
            roles: parse_all(&self.roles, Role::parse)?,
            contracts: parse_all(&self.contracts, Contract::parse)?,
            tenures: parse_all(&self.tenures, Tenure::parse)?,
            supervisors,
        })
    }
}

impl Args {
    /// Config file (or defaults) with command-line overrides applied.
    pub fn resolve_config(&self) -> DashResult<GenerationConfig> {
        let base = match &self.config {
            Some(path) => load_config(path)?,
            None => GenerationConfig::default(),
        };
        let config = base.with_overrides(self.seed, self.start, self.end);
        config.validate()?;
        Ok(config)
    }
}

/// Resolves the requested report window against the generated weeks. With
/// neither bound given, the trailing default window is used; a single
/// missing bound falls back to the dataset edge.
pub fn report_range(
    weeks: &[Week],
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> DashResult<DateRange> {
    let bounds = DateRange::dataset_bounds(weeks)
        .ok_or_else(|| DashError::InvalidArgument("model has no weeks".to_string()))?;
    let range = match (from, to) {
        (None, None) => DateRange::default_window(&bounds),
        (from, to) => DateRange::new(from.unwrap_or(bounds.from), to.unwrap_or(bounds.to))
            .clamp_to(&bounds),
    };
    Ok(range)
}

pub fn report_scope(
    model: &Model,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    filters: &FilterArgs,
) -> DashResult<ReportScope> {
    Ok(ReportScope {
        range: report_range(&model.weeks, from, to)?,
        records: filters.record_filter(model)?,
        hr: filters.hr_filter(model)?,
    })
}
