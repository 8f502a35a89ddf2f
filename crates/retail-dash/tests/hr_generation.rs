use std::collections::HashMap;
use std::sync::OnceLock;

use retail_dash::config::GenerationConfig;
use retail_dash::data::dimensions::{Area, Role};
use retail_dash::data::model::Model;

fn model() -> &'static Model {
    static MODEL: OnceLock<Model> = OnceLock::new();
    MODEL.get_or_init(|| Model::generate(&GenerationConfig::default()).expect("default model"))
}

#[test]
fn area_headcounts_add_up_to_store_week_totals() {
    let model = model();
    assert_eq!(model.staffing.len(), model.weeks.len() * model.stores.len());

    let mut by_store_week = HashMap::<(usize, &str), (i64, usize)>::new();
    for row in &model.hr_records {
        let entry = by_store_week.entry((row.week_index, row.store)).or_default();
        entry.0 += i64::from(row.actual_headcount);
        entry.1 += 1;
    }

    let tolerance = Area::ALL.len() as i64 - 1;
    for totals in &model.staffing {
        let (summed, areas) = by_store_week[&(totals.week_index, totals.store)];
        assert_eq!(areas, Area::ALL.len());
        let diff = (summed - i64::from(totals.actual_headcount)).abs();
        assert!(
            diff <= tolerance,
            "{} week {}: areas sum {summed} vs total {}",
            totals.store,
            totals.week_index,
            totals.actual_headcount
        );
    }
}

#[test]
fn hr_rows_read_sales_from_transactions() {
    let model = model();
    for totals in model.staffing.iter().take(20) {
        let sales: f64 = model
            .records
            .iter()
            .filter(|r| r.week_index == totals.week_index && r.store == totals.store)
            .map(|r| r.net_sales)
            .sum();
        assert!((sales - totals.sales).abs() < 1e-6 * sales.max(1.0));
    }
}

#[test]
fn per_area_fields_follow_fixed_mappings_and_bounds() {
    for row in &model().hr_records {
        let expected_role = match row.area {
            Area::Sales => Role::Advisor,
            Area::Warehouse => Role::Operator,
            Area::Administration => Role::Analyst,
        };
        assert_eq!(row.role, expected_role);
        assert!(row.actual_headcount >= 4);
        assert!((1.0..=6.8).contains(&row.turnover_pct));
        assert!((10.0..=62.0).contains(&row.days_to_fill));
        assert!((1.1..=9.4).contains(&row.absenteeism_pct));
        assert!(row.overtime_hours >= 6);
        assert!(row.supervisor.contains('-'));
    }
}

#[test]
fn supervisor_tags_combine_city_and_area() {
    let row = model()
        .hr_records
        .iter()
        .find(|r| r.store == "San Miguel de Allende" && r.area == Area::Warehouse)
        .expect("warehouse row");
    assert_eq!(row.supervisor, "San-Alm");
}
