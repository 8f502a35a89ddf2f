use std::collections::HashMap;

use super::calendar::Week;
use super::dimensions::{Area, Contract, Shift, Tenure};
use super::records::{HrRecord, StaffingTotals, TransactionRecord};
use super::rng::ModelRng;
use super::stores::Store;
use crate::stats::clamp;

/// Net sales per (week index, store) across both channels and every item.
pub fn store_week_sales(records: &[TransactionRecord]) -> HashMap<(usize, &str), f64> {
    let mut sales = HashMap::new();
    for record in records {
        *sales.entry((record.week_index, record.store)).or_insert(0.0) += record.net_sales;
    }
    sales
}

fn seasonal_pressure(month: u32) -> f64 {
    match month {
        11 | 12 => 1.1,
        1 => 0.95,
        _ => 1.0,
    }
}

/// Store-week headcount totals before the area split.
pub fn staffing_totals(
    week: &Week,
    store: &Store,
    sales: f64,
    rng: &mut ModelRng,
) -> StaffingTotals {
    let plan = ((38.0 + store.factor * 16.0 + sales / 1_900_000.0) * seasonal_pressure(week.month()))
        .round()
        .max(0.0);
    let actual = (plan + rng.jitter(7.0)).round().max(16.0);
    let vacancies = (plan - actual + (rng.next_unit() * 2.0).round()).max(0.0);
    StaffingTotals {
        week_index: week.index,
        store: store.name,
        sales,
        plan_headcount: plan as u32,
        actual_headcount: actual as u32,
        vacancies: vacancies as u32,
    }
}

/// Generates HR rows for every week x store x area. Reads the store-week
/// sales of `records`, so it must run after transaction generation.
pub fn generate_hr(
    weeks: &[Week],
    stores: &[Store],
    records: &[TransactionRecord],
    rng: &mut ModelRng,
) -> (Vec<HrRecord>, Vec<StaffingTotals>) {
    let sales_by_store_week = store_week_sales(records);
    let mut hr_records = Vec::with_capacity(weeks.len() * stores.len() * Area::ALL.len());
    let mut totals = Vec::with_capacity(weeks.len() * stores.len());

    for week in weeks {
        let month = week.month();
        let year_end = matches!(month, 11 | 12);
        for store in stores {
            let sales = sales_by_store_week
                .get(&(week.index, store.name))
                .copied()
                .unwrap_or(0.0);
            let staffing = staffing_totals(week, store, sales, rng);

            for &area in Area::ALL {
                let share = area.share();
                let plan_headcount = (f64::from(staffing.plan_headcount) * share).round() as u32;
                let actual_headcount =
                    ((f64::from(staffing.actual_headcount) * share).round() as u32).max(4);
                let vacancies = (f64::from(staffing.vacancies) * share).round() as u32;
                let actual = f64::from(actual_headcount);

                let turnover_pct = clamp(
                    2.1 + store.hr_risk * 2.7
                        + if area == Area::Sales { 0.45 } else { 0.0 }
                        + rng.jitter(1.1),
                    1.0,
                    6.8,
                );
                let days_to_fill = clamp(
                    22.0 + store.hr_risk * 13.0
                        + if area == Area::Warehouse { 3.6 } else { 0.0 }
                        + rng.jitter(7.0),
                    10.0,
                    62.0,
                );
                let absenteeism_pct = clamp(
                    3.0 + store.hr_risk * 4.0
                        + if area == Area::Warehouse { 0.6 } else { 0.0 }
                        + rng.jitter(1.1),
                    1.1,
                    9.4,
                );
                let overtime_hours = (sales / 150_000.0 * share * 8.0
                    + if year_end { 8.0 } else { 0.0 }
                    + rng.jitter(16.0))
                .round()
                .max(6.0) as u32;
                let labor_cost = sales * (0.109 + rng.jitter(0.016)) * share;
                let training_hours = (actual * (0.85 + rng.next_unit() * 0.75)).round() as u32;
                let incidents =
                    (actual * (0.006 + rng.next_unit() * 0.008)).max(0.0).round() as u32;

                let shift = *rng.pick(Shift::ALL);
                let contract = if rng.next_unit() > 0.19 {
                    Contract::Permanent
                } else {
                    Contract::Temporary
                };
                let tenure = *rng.pick(Tenure::ALL);

                hr_records.push(HrRecord {
                    week_index: week.index,
                    week_label: week.label.clone(),
                    month_label: week.month_label.clone(),
                    iso_date: week.iso_date,
                    region: store.region,
                    store: store.name,
                    area,
                    shift,
                    role: area.role(),
                    contract,
                    tenure,
                    supervisor: store.supervisor_for(area.as_str()),
                    plan_headcount,
                    actual_headcount,
                    vacancies,
                    turnover_pct,
                    days_to_fill,
                    absenteeism_pct,
                    overtime_hours,
                    labor_cost,
                    training_hours,
                    incidents,
                });
            }
            totals.push(staffing);
        }
    }
    (hr_records, totals)
}
