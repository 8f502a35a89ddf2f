use std::sync::OnceLock;

use chrono::NaiveDate;
use clap::Parser;

use retail_dash::cli::{report_range, report_scope, Args, Command, FilterArgs, ListTarget};
use retail_dash::config::GenerationConfig;
use retail_dash::data::calendar::build_weeks;
use retail_dash::data::dimensions::{Area, Channel, Region, Sla};
use retail_dash::data::model::Model;
use retail_dash::reports::Dashboard;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn model() -> &'static Model {
    static MODEL: OnceLock<Model> = OnceLock::new();
    MODEL.get_or_init(|| {
        let config = GenerationConfig {
            start: date(2025, 10, 1),
            end: date(2025, 12, 31),
            ..GenerationConfig::default()
        };
        Model::generate(&config).expect("quarter model")
    })
}

fn report_filters(extra: &[&str]) -> FilterArgs {
    let mut argv = vec!["retail-dash", "report", "executive"];
    argv.extend_from_slice(extra);
    let args = Args::try_parse_from(argv).expect("parse");
    let Command::Report { filters, .. } = args.command else {
        panic!("expected report command");
    };
    filters
}

#[test]
fn summary_uses_defaults() {
    let args = Args::try_parse_from(["retail-dash", "summary"]).expect("parse");
    assert!(matches!(args.command, Command::Summary));
    assert!(args.seed.is_none());
    let config = args.resolve_config().expect("config");
    assert_eq!(config, retail_dash::config::GenerationConfig::default());
}

#[test]
fn global_overrides_apply_to_config() {
    let args = Args::try_parse_from([
        "retail-dash",
        "--seed",
        "12.7",
        "--start",
        "2025-01-01",
        "--end",
        "2025-06-30",
        "export",
        "--force",
    ])
    .expect("parse");
    assert!(matches!(args.command, Command::Export { force: true }));
    let config = args.resolve_config().expect("config");
    assert_eq!(config.seed, 12);
    assert_eq!(config.start, date(2025, 1, 1));
    assert_eq!(config.end, date(2025, 6, 30));
}

#[test]
fn reversed_overrides_fail_validation() {
    let args = Args::try_parse_from([
        "retail-dash",
        "--start",
        "2025-06-30",
        "--end",
        "2025-01-01",
        "summary",
    ])
    .expect("parse");
    let err = args.resolve_config().expect_err("reversed range");
    assert!(err.to_string().contains("after"), "unexpected error: {err}");
}

#[test]
fn malformed_dates_are_rejected_by_the_parser() {
    Args::try_parse_from(["retail-dash", "--start", "2025-13-01", "summary"])
        .expect_err("bad month");
}

#[test]
fn report_accepts_repeated_filters() {
    let args = Args::try_parse_from([
        "retail-dash",
        "report",
        "Commercial",
        "--from",
        "2025-10-01",
        "--channel",
        "ecommerce",
        "--region",
        "Bajío",
        "--region",
        "occidente",
        "--sla",
        "48h",
        "--area",
        "almacen",
        "--store",
        "Pénjamo",
    ])
    .expect("parse");
    let Command::Report {
        dashboard,
        from,
        to,
        filters,
    } = args.command
    else {
        panic!("expected report command");
    };
    assert_eq!(dashboard, Dashboard::Commercial);
    assert_eq!(from, Some(date(2025, 10, 1)));
    assert!(to.is_none());

    let records = filters.record_filter(model()).expect("record filter");
    assert_eq!(records.channels, vec![Channel::Online]);
    assert_eq!(records.regions, vec![Region::Bajio, Region::Occidente]);
    assert_eq!(records.slas, vec![Sla::H48]);
    assert_eq!(records.stores, vec!["Pénjamo".to_string()]);

    let hr = filters.hr_filter(model()).expect("hr filter");
    assert_eq!(hr.areas, vec![Area::Warehouse]);
    assert_eq!(hr.regions, records.regions);
}

#[test]
fn unknown_filter_values_name_the_dimension() {
    let filters = FilterArgs {
        carriers: vec!["pigeon".to_string()],
        ..FilterArgs::default()
    };
    let err = filters.record_filter(model()).expect_err("unknown carrier");
    assert!(err.to_string().contains("carrier"), "unexpected error: {err}");
    assert!(err.to_string().contains("pigeon"), "unexpected error: {err}");
}

#[test]
fn store_filter_is_checked_against_selected_regions() {
    let filters = report_filters(&["--store", "irapuato centro"]);
    let scope = report_scope(model(), None, None, &filters).expect("known store");
    assert_eq!(scope.records.stores, vec!["Irapuato Centro".to_string()]);
    assert_eq!(scope.hr.stores, scope.records.stores);

    let typo = report_filters(&["--store", "Irapuato Centr0"]);
    let err = report_scope(model(), None, None, &typo).expect_err("misspelled store");
    assert!(err.to_string().contains("unknown store 'Irapuato Centr0'"), "unexpected error: {err}");
    assert!(err.to_string().contains("Pénjamo"), "unexpected error: {err}");

    let outside = report_filters(&["--region", "Occidente", "--store", "Irapuato Centro"]);
    let err = report_scope(model(), None, None, &outside).expect_err("store outside region");
    assert!(err.to_string().contains("La Piedad"), "unexpected error: {err}");
    assert!(!err.to_string().contains("Celaya"), "unexpected error: {err}");
}

#[test]
fn campaign_filter_is_checked_against_registry() {
    let filters = report_filters(&["--campaign", "buen fin"]);
    let records = filters.record_filter(model()).expect("known campaign");
    assert_eq!(records.campaigns, vec!["Buen Fin".to_string()]);

    let typo = report_filters(&["--campaign", "Hot Sael"]);
    let err = typo.record_filter(model()).expect_err("misspelled campaign");
    assert!(err.to_string().contains("unknown campaign 'Hot Sael'"), "unexpected error: {err}");
    assert!(err.to_string().contains("Hot Sale"), "unexpected error: {err}");
}

#[test]
fn supervisor_filter_is_checked_against_hr_rows() {
    let filters = report_filters(&["--supervisor", "san-alm"]);
    let hr = filters.hr_filter(model()).expect("known supervisor");
    assert_eq!(hr.supervisors, vec!["San-Alm".to_string()]);

    let unknown = report_filters(&["--supervisor", "nobody"]);
    let err = unknown.hr_filter(model()).expect_err("unknown supervisor");
    assert!(err.to_string().contains("unknown supervisor 'nobody'"), "unexpected error: {err}");
}

#[test]
fn unknown_dashboard_is_rejected() {
    Args::try_parse_from(["retail-dash", "report", "finance"]).expect_err("unknown dashboard");
}

#[test]
fn list_targets_parse_as_value_enum() {
    let args = Args::try_parse_from(["retail-dash", "list", "skus"]).expect("parse");
    assert!(matches!(
        args.command,
        Command::List {
            target: ListTarget::Skus
        }
    ));
}

#[test]
fn report_range_defaults_to_trailing_window_and_clamps() {
    let weeks = build_weeks(date(2024, 1, 1), date(2025, 12, 31)).expect("weeks");

    let window = report_range(&weeks, None, None).expect("default window");
    assert_eq!(window.to, date(2025, 12, 31));
    assert_eq!(window.days_inclusive(), 90);

    let open_end = report_range(&weeks, Some(date(2025, 11, 1)), None).expect("open end");
    assert_eq!(open_end.from, date(2025, 11, 1));
    assert_eq!(open_end.to, date(2025, 12, 31));

    let clamped = report_range(&weeks, Some(date(2020, 1, 1)), Some(date(2030, 1, 1)))
        .expect("clamped");
    assert_eq!(clamped.from, date(2024, 1, 1));
    assert_eq!(clamped.to, date(2025, 12, 31));
}
