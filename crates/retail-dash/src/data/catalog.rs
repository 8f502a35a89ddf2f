use std::collections::HashMap;

use serde::Serialize;

use super::dimensions::{labeled_enum, ProductLine};
use crate::error::{DashError, DashResult};

labeled_enum! {
    /// Seasonal demand curve assigned to a catalog item.
    pub enum SeasonTag("season tag") {
        Heat => "calor" / "calor",
        Cold => "frio" / "frio",
        YearEnd => "fin_ano" / "fin_ano",
        BackToSchool => "regreso" / "regreso",
        Rainy => "lluvias" / "lluvias",
        Business => "negocio" / "negocio",
        HeatAndYearEnd => "calor_fin_ano" / "calor_fin_ano",
        Home => "hogar" / "hogar",
        Stable => "estable" / "estable",
    }
}

impl SeasonTag {
    /// Demand multiplier for a calendar month (1-12).
    pub fn factor(self, month: u32) -> f64 {
        match self {
            Self::Heat => match month {
                4..=7 => 1.3,
                11 | 12 | 1 | 2 => 0.76,
                _ => 1.0,
            },
            Self::Cold => match month {
                11 | 12 | 1 | 2 => 1.24,
                4..=6 => 0.83,
                _ => 1.0,
            },
            Self::YearEnd => match month {
                11 | 12 => 1.28,
                1 => 0.76,
                _ => 1.0,
            },
            Self::BackToSchool => match month {
                7 | 8 => 1.21,
                1 => 0.9,
                _ => 1.0,
            },
            Self::Rainy => match month {
                6..=9 => 1.14,
                _ => 0.98,
            },
            Self::Business => match month {
                2 | 3 | 9 | 10 => 1.16,
                1 => 0.86,
                _ => 1.0,
            },
            Self::HeatAndYearEnd => match month {
                4..=7 => 1.14,
                11 | 12 => 1.22,
                1 => 0.82,
                _ => 1.0,
            },
            Self::Home => match month {
                11 | 12 => 1.12,
                _ => 1.0,
            },
            Self::Stable => 1.0,
        }
    }
}

/// Per-item parameters inside a product line table.
#[derive(Clone, Copy, Debug)]
pub struct ItemSpec {
    pub name: &'static str,
    pub demand: f64,
    pub base_price: f64,
    pub units_per_transaction: f64,
    pub margin: f64,
    pub returns: f64,
    pub volatility: f64,
    pub season: SeasonTag,
}

#[derive(Clone, Copy, Debug)]
pub struct LineConfig {
    pub line: ProductLine,
    pub ecom_share: f64,
    pub margin_shift: f64,
    pub doh_base: f64,
    pub conversion_base: f64,
    pub items: &'static [ItemSpec],
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CatalogItem {
    pub line: ProductLine,
    pub item_name: &'static str,
    /// Display name, suffixed with the line when the name recurs across lines.
    pub item_category: String,
    pub sku: String,
    pub demand: f64,
    pub base_price: f64,
    pub units_per_transaction: f64,
    pub margin_base: f64,
    pub returns_base: f64,
    pub volatility: f64,
    pub season: SeasonTag,
    pub ecom_share: f64,
    pub margin_shift: f64,
    pub doh_base: f64,
    pub conversion_base: f64,
}

const fn item(
    name: &'static str,
    demand: f64,
    base_price: f64,
    units_per_transaction: f64,
    margin: f64,
    returns: f64,
    volatility: f64,
    season: SeasonTag,
) -> ItemSpec {
    ItemSpec {
        name,
        demand,
        base_price,
        units_per_transaction,
        margin,
        returns,
        volatility,
        season,
    }
}

use SeasonTag::{
    BackToSchool, Business, Cold, Heat, HeatAndYearEnd, Home, Rainy, Stable, YearEnd,
};

#[rustfmt::skip]
static LINEA_BLANCA: [ItemSpec; 9] = [
    item("Aire Acondicionado", 1.08, 14900.0, 1.02, 24.3, 1.8, 1.25, Heat),
    item("Congelador", 0.82, 12800.0, 1.01, 24.0, 1.6, 1.1, YearEnd),
    item("Estufas", 0.94, 7600.0, 1.03, 26.4, 1.5, 1.0, Home),
    item("Estufón", 0.42, 4200.0, 1.08, 27.1, 1.3, 1.04, Home),
    item("Lavadoras", 1.04, 12100.0, 1.01, 25.7, 1.9, 1.08, YearEnd),
    item("Refrigeradores", 1.23, 16800.0, 1.0, 23.8, 1.8, 1.12, HeatAndYearEnd),
    item("Planchas", 0.56, 860.0, 1.15, 31.2, 2.7, 0.92, BackToSchool),
    item("Refacciones", 0.74, 390.0, 1.86, 42.5, 1.1, 0.82, Stable),
    item("Secadoras", 0.61, 10700.0, 1.0, 24.8, 1.9, 1.07, Rainy),
];

#[rustfmt::skip]
static COCINA: [ItemSpec; 12] = [
    item("Bascula", 0.64, 560.0, 1.3, 34.0, 2.2, 0.9, BackToSchool),
    item("Batidora", 0.83, 980.0, 1.18, 35.8, 2.5, 0.86, YearEnd),
    item("Crepera", 0.52, 1500.0, 1.06, 34.3, 2.0, 0.9, YearEnd),
    item("Cafetera", 1.02, 1650.0, 1.11, 36.8, 2.4, 0.88, YearEnd),
    item("Dispensador de Agua", 0.58, 2250.0, 1.03, 32.8, 1.8, 0.96, Heat),
    item("Licuadoras", 1.06, 1290.0, 1.16, 35.1, 2.7, 0.86, BackToSchool),
    item("Microondas", 1.14, 2690.0, 1.04, 33.2, 2.2, 0.95, BackToSchool),
    item("Ollas y Vaporeras", 0.72, 1120.0, 1.22, 36.4, 1.7, 0.84, YearEnd),
    item("Planchas", 0.64, 810.0, 1.21, 34.4, 2.5, 0.92, BackToSchool),
    item("Tostador", 0.56, 760.0, 1.18, 35.7, 2.1, 0.89, YearEnd),
    item("Utensilios", 0.92, 620.0, 1.34, 41.2, 1.6, 0.78, Stable),
    item("Refacciones", 0.67, 330.0, 1.91, 43.8, 1.1, 0.8, Stable),
];

#[rustfmt::skip]
static HOGAR: [ItemSpec; 7] = [
    item("Calentadores Gas", 0.66, 3850.0, 1.02, 30.8, 1.4, 0.98, Cold),
    item("Calentadores Solar", 0.49, 7600.0, 1.0, 29.6, 1.3, 1.04, Cold),
    item("Triturador", 0.44, 2850.0, 1.01, 31.7, 1.6, 0.97, Stable),
    item("Aire Acondicionado", 0.52, 10900.0, 1.0, 26.9, 1.9, 1.16, Heat),
    item("Campana", 0.56, 3100.0, 1.03, 32.4, 1.7, 0.92, Home),
    item("Fabricación RYSE", 0.41, 5900.0, 1.01, 34.6, 1.2, 0.86, Stable),
    item("Tanque de Gas", 0.53, 4100.0, 1.02, 28.7, 1.5, 0.94, Cold),
];

#[rustfmt::skip]
static NEGOCIO: [ItemSpec; 13] = [
    item("Amasadora", 0.31, 18200.0, 1.0, 27.4, 1.0, 0.9, Business),
    item("Campana", 0.48, 6200.0, 1.01, 31.3, 1.2, 0.94, Business),
    item("Equipo de Empotrar", 0.28, 24300.0, 1.0, 26.5, 0.9, 0.88, Business),
    item("Fabricación RYSE", 0.36, 13700.0, 1.0, 33.0, 1.0, 0.84, Business),
    item("Congelador", 0.54, 16100.0, 1.0, 25.0, 1.1, 0.96, Business),
    item("Parrilla Estructural", 0.34, 11300.0, 1.0, 30.5, 1.0, 0.89, Business),
    item("Plancha", 0.52, 4600.0, 1.04, 32.1, 1.4, 0.9, Business),
    item("Rosticero", 0.29, 21900.0, 1.0, 28.4, 1.0, 0.92, Business),
    item("Triturador", 0.33, 5200.0, 1.01, 31.1, 1.2, 0.94, Business),
    item("Tarja", 0.43, 2200.0, 1.09, 34.7, 1.3, 0.85, Business),
    item("Mesa", 0.48, 3600.0, 1.07, 33.9, 1.2, 0.83, Business),
    item("Mesa Fria / Caliente", 0.26, 23800.0, 1.0, 27.1, 0.9, 0.9, Business),
    item("Refacciones", 0.71, 450.0, 2.05, 45.2, 0.9, 0.8, Stable),
];

pub static LINE_CONFIGS: [LineConfig; 4] = [
    LineConfig {
        line: ProductLine::LineaBlanca,
        ecom_share: 0.37,
        margin_shift: -1.3,
        doh_base: 54.0,
        conversion_base: 1.7,
        items: &LINEA_BLANCA,
    },
    LineConfig {
        line: ProductLine::Cocina,
        ecom_share: 0.49,
        margin_shift: 1.7,
        doh_base: 37.0,
        conversion_base: 2.4,
        items: &COCINA,
    },
    LineConfig {
        line: ProductLine::Hogar,
        ecom_share: 0.43,
        margin_shift: 0.8,
        doh_base: 44.0,
        conversion_base: 2.0,
        items: &HOGAR,
    },
    LineConfig {
        line: ProductLine::Negocio,
        ecom_share: 0.22,
        margin_shift: 2.4,
        doh_base: 49.0,
        conversion_base: 1.3,
        items: &NEGOCIO,
    },
];

/// Flattens line tables into catalog items with display names and SKUs.
///
/// Fails with [`DashError::SkuCollision`] when two items map to the same SKU.
pub fn build_catalog(lines: &[LineConfig]) -> DashResult<Vec<CatalogItem>> {
    let mut name_count = HashMap::<&str, usize>::new();
    for spec in lines.iter().flat_map(|line| line.items) {
        *name_count.entry(spec.name).or_default() += 1;
    }

    let mut catalog = Vec::new();
    let mut seen_skus = HashMap::<String, String>::new();
    for line in lines {
        for (idx, spec) in line.items.iter().enumerate() {
            let item_category = if name_count.get(spec.name).copied().unwrap_or(0) > 1 {
                format!("{} · {}", spec.name, line.line.as_str())
            } else {
                spec.name.to_string()
            };
            let sku = format!("{}-{}-{:02}", line.line.code(), sku_fragment(spec.name), idx + 1);
            if let Some(first) = seen_skus.insert(sku.clone(), item_category.clone()) {
                return Err(DashError::SkuCollision {
                    sku,
                    first,
                    second: item_category,
                });
            }

            catalog.push(CatalogItem {
                line: line.line,
                item_name: spec.name,
                item_category,
                sku,
                demand: spec.demand,
                base_price: spec.base_price,
                units_per_transaction: spec.units_per_transaction,
                margin_base: spec.margin,
                returns_base: spec.returns,
                volatility: spec.volatility,
                season: spec.season,
                ecom_share: line.ecom_share,
                margin_shift: line.margin_shift,
                doh_base: line.doh_base,
                conversion_base: line.conversion_base,
            });
        }
    }
    Ok(catalog)
}

/// First four ASCII alphanumerics of the accent-folded name, upper-cased.
pub fn sku_fragment(name: &str) -> String {
    name.chars()
        .map(fold_accent)
        .filter(char::is_ascii_alphanumeric)
        .take(4)
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'ä' | 'â' => 'a',
        'é' | 'è' | 'ë' | 'ê' => 'e',
        'í' | 'ì' | 'ï' | 'î' => 'i',
        'ó' | 'ò' | 'ö' | 'ô' => 'o',
        'ú' | 'ù' | 'ü' | 'û' => 'u',
        'ñ' => 'n',
        'Á' | 'À' | 'Ä' | 'Â' => 'A',
        'É' | 'È' | 'Ë' | 'Ê' => 'E',
        'Í' | 'Ì' | 'Ï' | 'Î' => 'I',
        'Ó' | 'Ò' | 'Ö' | 'Ô' => 'O',
        'Ú' | 'Ù' | 'Ü' | 'Û' => 'U',
        'Ñ' => 'N',
        other => other,
    }
}

/// Unique product lines in catalog order.
pub fn categories(catalog: &[CatalogItem]) -> Vec<ProductLine> {
    let mut out = Vec::new();
    for item in catalog {
        if !out.contains(&item.line) {
            out.push(item.line);
        }
    }
    out
}
