use std::collections::BTreeMap;

use serde::Serialize;

use super::{group_sum, Comparison, Dashboard, NamedValue, Scorecard, Unit};
use crate::data::dimensions::Area;
use crate::data::records::{HrRecord, TransactionRecord};
use crate::stats::{avg_by, pct, round_to, sum_by, trend_lower_better, trend_pct, weighted_avg};

/// Cost of one overtime hour in MXN.
pub const OVERTIME_HOURLY_COST: f64 = 118.0;
const TOP_STORES: usize = 10;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct WeeklyStaffing {
    pub week_index: usize,
    pub week_label: String,
    pub plan_headcount: u32,
    pub actual_headcount: u32,
    pub absenteeism_pct: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FunnelCount {
    pub name: &'static str,
    pub value: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AreaOvertime {
    pub area: Area,
    pub hours: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum TrainingStatus {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "Atención")]
    Attention,
    #[serde(rename = "Riesgo")]
    Risk,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TrainingCourse {
    pub course: &'static str,
    pub target_pct: f64,
    pub completion_pct: f64,
    pub status: TrainingStatus,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HrReport {
    pub objective: &'static str,
    pub scorecards: Vec<Scorecard>,
    pub turnover_by_store: Vec<NamedValue>,
    pub weekly: Vec<WeeklyStaffing>,
    pub vacancy_funnel: Vec<FunnelCount>,
    pub overtime_by_area: Vec<AreaOvertime>,
    /// Net sales per head by store.
    pub productivity: Vec<NamedValue>,
    pub training: Vec<TrainingCourse>,
}

struct Headline {
    headcount: f64,
    vacancies: f64,
    turnover: f64,
    days_to_fill: f64,
    absenteeism: f64,
    overtime_hours: f64,
    labor_cost: f64,
    labor_vs_sales: f64,
}

impl Headline {
    fn of(sales: &[&TransactionRecord], rows: &[&HrRecord]) -> Self {
        // Headcount and vacancies are stocks: read them off the latest week only.
        let latest_week = rows.iter().map(|r| r.week_index).max();
        let latest: Vec<&HrRecord> = rows
            .iter()
            .copied()
            .filter(|r| Some(r.week_index) == latest_week)
            .collect();
        let labor_cost = sum_by(rows, |r| r.labor_cost);
        Self {
            headcount: sum_by(&latest, |r| f64::from(r.actual_headcount)),
            vacancies: sum_by(&latest, |r| f64::from(r.vacancies)),
            turnover: weighted_avg(rows, |r| r.turnover_pct, |r| f64::from(r.actual_headcount)),
            days_to_fill: weighted_avg(rows, |r| r.days_to_fill, |r| f64::from(r.vacancies)),
            absenteeism: weighted_avg(rows, |r| r.absenteeism_pct, |r| f64::from(r.actual_headcount)),
            overtime_hours: sum_by(rows, |r| f64::from(r.overtime_hours)),
            labor_cost,
            labor_vs_sales: pct(labor_cost, sum_by(sales, |r| r.net_sales)),
        }
    }
}

pub fn hr_report(
    current: &[&TransactionRecord],
    hr_rows: &[&HrRecord],
    previous: &[&TransactionRecord],
    previous_hr: &[&HrRecord],
) -> HrReport {
    let now = Headline::of(current, hr_rows);
    let before = Headline::of(previous, previous_hr);

    let scorecards = vec![
        Scorecard::new("Headcount actual", now.headcount, Unit::Count, trend_pct(now.headcount, before.headcount), Comparison::PreviousPeriod),
        Scorecard::new("Vacantes abiertas", now.vacancies, Unit::Count, trend_lower_better(now.vacancies, before.vacancies), Comparison::LowerIsBetter),
        Scorecard::new("Rotación", now.turnover, Unit::Percent, trend_lower_better(now.turnover, before.turnover), Comparison::LowerIsBetter),
        Scorecard::new("Tiempo de cobertura", round_to(now.days_to_fill, 1), Unit::Days, trend_lower_better(now.days_to_fill, before.days_to_fill), Comparison::LowerIsBetter),
        Scorecard::new("Ausentismo", now.absenteeism, Unit::Percent, trend_lower_better(now.absenteeism, before.absenteeism), Comparison::LowerIsBetter),
        Scorecard::new("Horas extra", now.overtime_hours, Unit::Hours, trend_lower_better(now.overtime_hours, before.overtime_hours), Comparison::LowerIsBetter)
            .with_secondary(now.overtime_hours * OVERTIME_HOURLY_COST),
        Scorecard::new("Costo laboral total", now.labor_cost, Unit::Currency, trend_pct(now.labor_cost, before.labor_cost), Comparison::PreviousPeriod),
        Scorecard::new("Costo laboral / ventas", now.labor_vs_sales, Unit::Percent, trend_lower_better(now.labor_vs_sales, before.labor_vs_sales), Comparison::LowerIsBetter),
    ];

    HrReport {
        objective: Dashboard::Hr.objective(),
        scorecards,
        turnover_by_store: turnover_by_store(hr_rows),
        weekly: weekly_staffing(hr_rows),
        vacancy_funnel: vacancy_funnel(now.vacancies),
        overtime_by_area: overtime_by_area(hr_rows),
        productivity: productivity(current, hr_rows),
        training: training(hr_rows),
    }
}

fn turnover_by_store(rows: &[&HrRecord]) -> Vec<NamedValue> {
    let mut by_store = BTreeMap::<&'static str, (f64, f64)>::new();
    for row in rows {
        let (turnover, people) = by_store.entry(row.store).or_default();
        *turnover += row.turnover_pct * f64::from(row.actual_headcount);
        *people += f64::from(row.actual_headcount);
    }
    let mut stores: Vec<NamedValue> = by_store
        .into_iter()
        .map(|(name, (turnover, people))| NamedValue {
            name: name.to_string(),
            value: turnover / people.max(1.0),
        })
        .collect();
    stores.sort_by(|a, b| b.value.total_cmp(&a.value));
    stores.truncate(TOP_STORES);
    stores
}

fn weekly_staffing(rows: &[&HrRecord]) -> Vec<WeeklyStaffing> {
    let mut weeks = BTreeMap::<usize, (WeeklyStaffing, f64)>::new();
    for row in rows {
        let (week, absent) = weeks.entry(row.week_index).or_insert_with(|| {
            let week = WeeklyStaffing {
                week_index: row.week_index,
                week_label: row.week_label.clone(),
                ..WeeklyStaffing::default()
            };
            (week, 0.0)
        });
        week.plan_headcount += row.plan_headcount;
        week.actual_headcount += row.actual_headcount;
        *absent += row.absenteeism_pct * f64::from(row.actual_headcount);
    }
    weeks
        .into_values()
        .map(|(mut week, absent)| {
            week.absenteeism_pct = absent / f64::from(week.actual_headcount).max(1.0);
            week
        })
        .collect()
}

/// Recruiting pipeline implied by the open vacancies, each stage with a
/// floor so small stores still show a funnel.
pub fn vacancy_funnel(vacancies: f64) -> Vec<FunnelCount> {
    let stage = |from: f64, ratio: f64, floor: f64| (from * ratio).round().max(floor);
    let requisitions = stage(vacancies, 2.6, 10.0);
    let candidates = stage(requisitions, 0.74, 7.0);
    let interviews = stage(candidates, 0.56, 5.0);
    let offers = stage(interviews, 0.51, 3.0);
    let hires = stage(offers, 0.71, 2.0);
    [
        ("Requisiciones", requisitions),
        ("Candidatos", candidates),
        ("Entrevistas", interviews),
        ("Ofertas", offers),
        ("Ingresos", hires),
    ]
    .into_iter()
    .map(|(name, value)| FunnelCount {
        name,
        value: value as u32,
    })
    .collect()
}

fn overtime_by_area(rows: &[&HrRecord]) -> Vec<AreaOvertime> {
    let mut by_area = BTreeMap::<Area, u32>::new();
    for row in rows {
        *by_area.entry(row.area).or_insert(0) += row.overtime_hours;
    }
    by_area
        .into_iter()
        .map(|(area, hours)| AreaOvertime { area, hours })
        .collect()
}

fn productivity(sales: &[&TransactionRecord], rows: &[&HrRecord]) -> Vec<NamedValue> {
    let store_sales = group_sum(sales, |r| r.store, |r| r.net_sales);
    let mut people = BTreeMap::<&'static str, f64>::new();
    for row in rows {
        *people.entry(row.store).or_insert(0.0) += f64::from(row.actual_headcount);
    }
    let mut stores: Vec<NamedValue> = people
        .into_iter()
        .map(|(store, heads)| NamedValue {
            name: store.to_string(),
            value: store_sales.get(&store).copied().unwrap_or(0.0) / heads.max(1.0),
        })
        .collect();
    stores.sort_by(|a, b| b.value.total_cmp(&a.value));
    stores.truncate(TOP_STORES);
    stores
}

fn training(rows: &[&HrRecord]) -> Vec<TrainingCourse> {
    let per_employee = sum_by(rows, |r| f64::from(r.training_hours))
        / avg_by(rows, |r| f64::from(r.actual_headcount)).max(1.0);
    let incidents = sum_by(rows, |r| f64::from(r.incidents));
    let threshold = |limit: f64| {
        if per_employee > limit {
            TrainingStatus::Ok
        } else {
            TrainingStatus::Attention
        }
    };
    let course = |course, target_pct, completion: f64, status| TrainingCourse {
        course,
        target_pct,
        completion_pct: round_to(completion, 1),
        status,
    };
    vec![
        course(
            "Seguridad Operativa",
            100.0,
            92.0 + (100.0 - incidents) * 0.03,
            if incidents < 30.0 { TrainingStatus::Ok } else { TrainingStatus::Risk },
        ),
        course("Atención al Cliente", 95.0, 88.0 + per_employee * 2.1, threshold(1.8)),
        course("Procesos de Almacén", 97.0, 90.0 + per_employee * 1.7, threshold(1.6)),
        course("Normativa Laboral", 100.0, 93.0 + per_employee * 1.5, TrainingStatus::Ok),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vacancy_funnel_applies_stage_floors() {
        let values: Vec<u32> = vacancy_funnel(0.0).into_iter().map(|s| s.value).collect();
        assert_eq!(values, vec![10, 7, 5, 3, 2]);

        let values: Vec<u32> = vacancy_funnel(20.0).into_iter().map(|s| s.value).collect();
        assert_eq!(values, vec![52, 38, 21, 11, 8]);
    }
}
