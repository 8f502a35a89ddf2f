use serde::Serialize;

use super::dimensions::{MxState, Region};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Store {
    pub name: &'static str,
    pub city: &'static str,
    pub state: MxState,
    pub region: Region,
    /// Demand multiplier applied to every order count.
    pub factor: f64,
    /// Annual growth rate feeding the trend ramp and the prior-year fallback.
    pub growth: f64,
    pub hr_risk: f64,
    /// Price multiplier for local purchasing power.
    pub income: f64,
}

impl Store {
    /// Prior-year divisor used when no 52-week-lagged record exists.
    pub fn fallback_growth(&self, online: bool) -> f64 {
        1.0 + 0.08 + self.growth * 0.45 + if online { 0.04 } else { 0.0 }
    }

    /// Staffing supervisor tag for an area, e.g. `Irapuato-Ven`.
    pub fn supervisor_for(&self, area_label: &str) -> String {
        let city = self.city.split(' ').next().unwrap_or(self.city);
        let area: String = area_label.chars().take(3).collect();
        format!("{city}-{area}")
    }
}

const fn store(
    name: &'static str,
    city: &'static str,
    state: MxState,
    region: Region,
    factor: f64,
    growth: f64,
    hr_risk: f64,
    income: f64,
) -> Store {
    Store {
        name,
        city,
        state,
        region,
        factor,
        growth,
        hr_risk,
        income,
    }
}

#[rustfmt::skip]
pub static STORES: [Store; 10] = [
    store("Irapuato Centro", "Irapuato", MxState::Guanajuato, Region::Bajio, 1.16, 0.11, 0.15, 1.02),
    store("Salamanca Centro", "Salamanca", MxState::Guanajuato, Region::Bajio, 0.96, 0.09, 0.13, 0.95),
    store("Celaya Centro", "Celaya", MxState::Guanajuato, Region::Bajio, 1.09, 0.10, 0.14, 1.00),
    store("Querétaro Centro", "Querétaro", MxState::Queretaro, Region::CentroBajio, 1.18, 0.12, 0.16, 1.08),
    store("San Miguel de Allende", "San Miguel de Allende", MxState::Guanajuato, Region::CentroBajio, 0.88, 0.10, 0.12, 1.14),
    store("Cortázar Plaza", "Cortázar", MxState::Guanajuato, Region::Bajio, 0.84, 0.08, 0.11, 0.90),
    store("Valle de Santiago", "Valle de Santiago", MxState::Guanajuato, Region::Bajio, 0.79, 0.07, 0.10, 0.89),
    store("Pénjamo", "Pénjamo", MxState::Guanajuato, Region::Bajio, 0.74, 0.07, 0.10, 0.86),
    store("La Piedad", "La Piedad", MxState::Michoacan, Region::Occidente, 0.86, 0.08, 0.12, 0.91),
    store("Zamora Centro", "Zamora", MxState::Michoacan, Region::Occidente, 0.92, 0.09, 0.13, 0.93),
];

/// Online destination mix; the store's own state gets an extra weight bump.
pub static DESTINATION_STATE_MIX: [(MxState, f64); 10] = [
    (MxState::Guanajuato, 4.5),
    (MxState::Queretaro, 2.4),
    (MxState::Michoacan, 2.2),
    (MxState::Jalisco, 1.8),
    (MxState::EstadoDeMexico, 1.6),
    (MxState::Cdmx, 1.3),
    (MxState::SanLuisPotosi, 1.0),
    (MxState::Aguascalientes, 0.8),
    (MxState::Hidalgo, 0.7),
    (MxState::Puebla, 0.5),
];

pub const HOME_STATE_BONUS: f64 = 1.7;

pub fn find_store(name: &str) -> Option<&'static Store> {
    STORES.iter().find(|store| store.name == name)
}
