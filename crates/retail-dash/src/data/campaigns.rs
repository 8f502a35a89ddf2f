use serde::Serialize;

use super::catalog::CatalogItem;
use super::dimensions::{Channel, ProductLine};
use super::rng::ModelRng;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Campaign {
    pub name: &'static str,
    pub months: &'static [u32],
    pub channels: &'static [Channel],
    pub discount_pct: f64,
    pub uplift_pct: f64,
    /// Restricts the campaign to these lines when set.
    pub lines: Option<&'static [ProductLine]>,
    /// Restricts the campaign to these item names when set.
    pub item_names: Option<&'static [&'static str]>,
}

impl Campaign {
    pub fn is_eligible(&self, month: u32, channel: Channel, item: &CatalogItem) -> bool {
        self.months.contains(&month)
            && self.channels.contains(&channel)
            && self.lines.map_or(true, |lines| lines.contains(&item.line))
            && self
                .item_names
                .map_or(true, |names| names.contains(&item.item_name))
    }

    fn pick_weight(&self) -> f64 {
        self.uplift_pct + self.discount_pct * 0.5
    }
}

const BOTH_CHANNELS: &[Channel] = &[Channel::Store, Channel::Online];
const ONLINE_ONLY: &[Channel] = &[Channel::Online];

pub static CAMPAIGNS: [Campaign; 6] = [
    Campaign {
        name: "Hot Sale",
        months: &[5, 6],
        channels: ONLINE_ONLY,
        discount_pct: 16.0,
        uplift_pct: 24.0,
        lines: Some(&[ProductLine::LineaBlanca, ProductLine::Cocina, ProductLine::Hogar]),
        item_names: None,
    },
    Campaign {
        name: "Buen Fin",
        months: &[11],
        channels: BOTH_CHANNELS,
        discount_pct: 22.0,
        uplift_pct: 38.0,
        lines: Some(&[
            ProductLine::LineaBlanca,
            ProductLine::Cocina,
            ProductLine::Hogar,
            ProductLine::Negocio,
        ]),
        item_names: None,
    },
    Campaign {
        name: "Navidad en Casa",
        months: &[12],
        channels: BOTH_CHANNELS,
        discount_pct: 13.0,
        uplift_pct: 18.0,
        lines: Some(&[ProductLine::LineaBlanca, ProductLine::Cocina]),
        item_names: None,
    },
    Campaign {
        name: "Regreso a Clases",
        months: &[8],
        channels: ONLINE_ONLY,
        discount_pct: 11.0,
        uplift_pct: 16.0,
        lines: None,
        item_names: Some(&["Microondas", "Licuadoras", "Bascula", "Utensilios", "Planchas"]),
    },
    Campaign {
        name: "Verano Fresco",
        months: &[4, 5, 6],
        channels: BOTH_CHANNELS,
        discount_pct: 9.0,
        uplift_pct: 14.0,
        lines: None,
        item_names: Some(&["Aire Acondicionado", "Dispensador de Agua"]),
    },
    Campaign {
        name: "Impulso Negocio",
        months: &[2, 3, 9],
        channels: BOTH_CHANNELS,
        discount_pct: 10.0,
        uplift_pct: 15.0,
        lines: Some(&[ProductLine::Negocio]),
        item_names: None,
    },
];

/// Probability that an eligible record runs a campaign in a given month.
pub fn promo_chance(month: u32) -> f64 {
    match month {
        11 => 0.42,
        12 => 0.28,
        5 => 0.27,
        _ => 0.14,
    }
}

pub fn eligible_campaigns<'a>(
    campaigns: &'a [Campaign],
    month: u32,
    channel: Channel,
    item: &CatalogItem,
) -> Vec<&'a Campaign> {
    campaigns
        .iter()
        .filter(|campaign| campaign.is_eligible(month, channel, item))
        .collect()
}

/// Draws the active campaign for one record, if any.
///
/// The promo-chance draw only happens when at least one campaign matches, so
/// records outside every campaign window consume no randomness here.
pub fn select_campaign<'a>(
    campaigns: &'a [Campaign],
    month: u32,
    channel: Channel,
    item: &CatalogItem,
    rng: &mut ModelRng,
) -> Option<&'a Campaign> {
    let matching = eligible_campaigns(campaigns, month, channel, item);
    if matching.is_empty() || !rng.chance(promo_chance(month)) {
        return None;
    }
    Some(*rng.pick_weighted(&matching, |campaign| campaign.pick_weight()))
}
