use std::sync::OnceLock;

use chrono::NaiveDate;

use retail_dash::config::GenerationConfig;
use retail_dash::data::dimensions::Channel;
use retail_dash::data::model::Model;
use retail_dash::query::{filter_records, DateRange, RecordFilter};
use retail_dash::reports::{build_report, Comparison, Dashboard, Report, ReportScope};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn model() -> &'static Model {
    static MODEL: OnceLock<Model> = OnceLock::new();
    MODEL.get_or_init(|| Model::generate(&GenerationConfig::default()).expect("default model"))
}

fn default_scope() -> ReportScope {
    let bounds = DateRange::dataset_bounds(&model().weeks).expect("bounds");
    ReportScope::new(DateRange::default_window(&bounds))
}

fn report(dashboard: Dashboard, scope: &ReportScope) -> Report {
    build_report(model(), dashboard, scope).expect("report has data")
}

#[test]
fn every_dashboard_has_eight_finite_scorecards() {
    let scope = default_scope();
    for &dashboard in Dashboard::ALL {
        let scorecards = match report(dashboard, &scope) {
            Report::Executive(r) => r.scorecards,
            Report::Commercial(r) => r.scorecards,
            Report::Logistics(r) => r.scorecards,
            Report::Hr(r) => r.scorecards,
        };
        assert_eq!(scorecards.len(), 8, "{dashboard}");
        for card in scorecards {
            assert!(card.value.is_finite(), "{dashboard}: {}", card.title);
            assert!(card.trend_pct.is_finite(), "{dashboard}: {}", card.title);
        }
    }
}

#[test]
fn empty_selection_yields_no_report() {
    let mut scope = default_scope();
    scope.records.stores = vec!["Tienda Fantasma".to_string()];
    assert!(build_report(model(), Dashboard::Executive, &scope).is_none());
}

#[test]
fn executive_totals_match_filtered_records() {
    let scope = default_scope();
    let Report::Executive(exec) = report(Dashboard::Executive, &scope) else {
        panic!("expected executive report");
    };
    let rows = filter_records(&model().records, &RecordFilter::default(), &scope.range);
    let sales: f64 = rows.iter().map(|r| r.net_sales).sum();

    let headline = &exec.scorecards[0];
    assert_eq!(headline.comparison, Comparison::LastYear);
    assert!((headline.value - sales).abs() < 1e-6 * sales);
    // The trailing window sits in the second year, so prior-year twins are matched.
    assert!(headline.trend_pct > -50.0 && headline.trend_pct < 100.0);

    let weekly_total: f64 = exec.weekly.iter().map(|w| w.sales).sum();
    assert!((weekly_total - sales).abs() < 1e-6 * sales);
    for week in &exec.weekly {
        assert!((week.store_sales + week.online_sales - week.sales).abs() < 1e-6 * week.sales);
    }
    assert!(exec.top_stores.len() <= 10);
    assert!(exec.margin_by_category.len() <= 10);
    let state_total: f64 = exec.state_sales.iter().map(|s| s.sales).sum();
    assert!((state_total - sales).abs() < 1e-6 * sales);
}

#[test]
fn commercial_views_have_expected_shapes() {
    let Report::Commercial(com) = report(Dashboard::Commercial, &default_scope()) else {
        panic!("expected commercial report");
    };
    assert_eq!(com.funnel.len(), 5);
    for pair in com.funnel.windows(2) {
        assert!(pair[1].value <= pair[0].value, "funnel must narrow");
    }
    assert!(com.top_categories.len() <= 15);
    assert_eq!(com.heatmap.stores.len(), 6);
    assert_eq!(com.heatmap.categories.len(), 6);
    for row in &com.heatmap.cells {
        assert_eq!(row.len(), 6);
        assert!(row.iter().all(|v| (-25.0..=25.0).contains(v)));
    }
    assert_eq!(com.products.len(), 14);
    assert!(com.price_alerts.len() <= 12);
    for pair in com.promotions.windows(2) {
        assert!(pair[0].roi >= pair[1].roi);
    }
}

#[test]
fn logistics_views_account_for_every_order() {
    let scope = default_scope();
    let Report::Logistics(log) = report(Dashboard::Logistics, &scope) else {
        panic!("expected logistics report");
    };
    let rows = filter_records(&model().records, &RecordFilter::default(), &scope.range);
    let orders: u64 = rows.iter().map(|r| u64::from(r.orders)).sum();
    let binned: u64 = log.lead_time_bins.iter().map(|b| b.orders).sum();
    assert_eq!(binned, orders);

    assert_eq!(log.aging.len(), 4);
    assert_eq!(log.pareto.len(), 20);
    let last = log.pareto.last().expect("pareto entry");
    assert!((last.cumulative_pct - 100.0).abs() < 1e-9);
    assert!(log.stockout_risk.len() <= 10);
    assert!(log.inventory_by_category.len() <= 8);
    for week in &log.weekly {
        assert_eq!(week.sla, 95.0);
        assert!(week.delivered <= week.shipped && week.shipped <= week.picked);
        assert!(week.picked <= week.created);
    }
}

#[test]
fn hr_views_use_latest_week_for_stocks() {
    let scope = default_scope();
    let Report::Hr(hr) = report(Dashboard::Hr, &scope) else {
        panic!("expected hr report");
    };
    let latest = model().weeks.last().expect("week").index;
    let headcount: u32 = model()
        .hr_records
        .iter()
        .filter(|r| r.week_index == latest)
        .map(|r| r.actual_headcount)
        .sum();
    assert_eq!(hr.scorecards[0].value, f64::from(headcount));
    assert_eq!(hr.vacancy_funnel.len(), 5);
    assert_eq!(hr.overtime_by_area.len(), 3);
    assert_eq!(hr.training.len(), 4);
    assert!(hr.productivity.len() <= 10);
    assert_eq!(hr.weekly.len(), scope_weeks(&scope));
}

fn scope_weeks(scope: &ReportScope) -> usize {
    model()
        .weeks
        .iter()
        .filter(|w| scope.range.contains(w.iso_date))
        .count()
}

#[test]
fn channel_filter_narrows_the_funnel_to_online_only() {
    let mut scope = default_scope();
    scope.records.channels = vec![Channel::Store];
    let Report::Commercial(com) = report(Dashboard::Commercial, &scope) else {
        panic!("expected commercial report");
    };
    assert!(com.funnel.iter().all(|stage| stage.value == 0.0));
}

#[test]
fn reports_serialise_with_dashboard_tag() {
    let scope = ReportScope::new(DateRange::new(date(2025, 6, 1), date(2025, 6, 30)));
    let report = report(Dashboard::Logistics, &scope);
    let json = serde_json::to_value(&report).expect("serialise report");
    assert_eq!(json["dashboard"], "logistics");
    assert!(json["scorecards"].as_array().is_some_and(|cards| cards.len() == 8));
}
