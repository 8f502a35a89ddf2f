use std::collections::HashSet;

use retail_dash::data::catalog::{
    build_catalog, categories, sku_fragment, ItemSpec, LineConfig, SeasonTag, LINE_CONFIGS,
};
use retail_dash::data::dimensions::ProductLine;
use retail_dash::error::DashError;

const fn spec(name: &'static str) -> ItemSpec {
    ItemSpec {
        name,
        demand: 1.0,
        base_price: 1000.0,
        units_per_transaction: 1.0,
        margin: 30.0,
        returns: 2.0,
        volatility: 0.5,
        season: SeasonTag::Stable,
    }
}

fn line(line: ProductLine, items: &'static [ItemSpec]) -> LineConfig {
    LineConfig {
        line,
        ecom_share: 0.3,
        margin_shift: 0.0,
        doh_base: 40.0,
        conversion_base: 1.5,
        items,
    }
}

#[test]
fn reference_catalog_has_41_items_with_unique_skus() {
    let catalog = build_catalog(&LINE_CONFIGS).expect("reference catalog");
    assert_eq!(catalog.len(), 41);

    let skus: HashSet<&str> = catalog.iter().map(|item| item.sku.as_str()).collect();
    assert_eq!(skus.len(), catalog.len());

    let per_line = |line| catalog.iter().filter(|item| item.line == line).count();
    assert_eq!(per_line(ProductLine::LineaBlanca), 9);
    assert_eq!(per_line(ProductLine::Cocina), 12);
    assert_eq!(per_line(ProductLine::Hogar), 7);
    assert_eq!(per_line(ProductLine::Negocio), 13);
    assert_eq!(
        categories(&catalog),
        vec![
            ProductLine::LineaBlanca,
            ProductLine::Cocina,
            ProductLine::Hogar,
            ProductLine::Negocio
        ]
    );
}

#[test]
fn display_names_are_unique_after_line_suffixing() {
    let catalog = build_catalog(&LINE_CONFIGS).expect("reference catalog");
    let names: HashSet<&str> = catalog.iter().map(|item| item.item_category.as_str()).collect();
    assert_eq!(names.len(), catalog.len());

    let suffixed: Vec<&str> = catalog
        .iter()
        .filter(|item| item.item_category != item.item_name)
        .map(|item| item.item_category.as_str())
        .collect();
    assert!(!suffixed.is_empty());
    for name in suffixed {
        assert!(name.contains(" · "), "unexpected display name '{name}'");
    }
}

#[test]
fn sku_combines_line_code_fragment_and_ordinal() {
    let catalog = build_catalog(&LINE_CONFIGS).expect("reference catalog");
    let first = &catalog[0];
    assert_eq!(
        first.sku,
        format!("LB-{}-01", sku_fragment(first.item_name))
    );
    assert_eq!(sku_fragment("Fabricación RYSE"), "FABR");
    assert_eq!(sku_fragment("Cañón de aire"), "CANO");
    assert_eq!(sku_fragment("A/C 1"), "AC1");
}

#[test]
fn colliding_skus_are_a_fatal_error() {
    static FIRST: [ItemSpec; 1] = [spec("Refrigerador")];
    static SECOND: [ItemSpec; 1] = [spec("Refrigeradores")];
    let lines = [
        line(ProductLine::LineaBlanca, &FIRST),
        line(ProductLine::LineaBlanca, &SECOND),
    ];
    let err = build_catalog(&lines).expect_err("duplicate SKU should fail");
    assert!(
        matches!(&err, DashError::SkuCollision { sku, .. } if sku == "LB-REFR-01"),
        "unexpected error: {err}"
    );
    assert!(err.to_string().contains("LB-REFR-01"), "unexpected error: {err}");
}

#[test]
fn shared_item_names_across_lines_get_line_suffix() {
    static SHARED: [ItemSpec; 1] = [spec("Campana")];
    let lines = [
        line(ProductLine::Cocina, &SHARED),
        line(ProductLine::Hogar, &SHARED),
    ];
    let catalog = build_catalog(&lines).expect("catalog");
    assert_eq!(catalog[0].item_category, "Campana · Cocina y Electrodomesticos");
    assert_eq!(catalog[1].item_category, "Campana · Hogar");
    assert_ne!(catalog[0].sku, catalog[1].sku);
}

#[test]
fn every_sku_fragment_is_four_ascii_characters() {
    let catalog = build_catalog(&LINE_CONFIGS).expect("built-in catalog");
    for item in &catalog {
        let parts: Vec<&str> = item.sku.split('-').collect();
        assert_eq!(parts.len(), 3, "sku {}", item.sku);
        let fragment = parts[1];
        assert_eq!(fragment.len(), 4, "sku {} for {}", item.sku, item.item_name);
        assert!(
            fragment.bytes().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit()),
            "sku {}",
            item.sku
        );
        assert_eq!(fragment, sku_fragment(item.item_name));
    }
}

#[test]
fn every_letter_in_catalog_names_folds_to_ascii() {
    for line in &LINE_CONFIGS {
        for spec in line.items {
            for letter in spec.name.chars().filter(|c| c.is_alphabetic()) {
                assert_eq!(
                    sku_fragment(&letter.to_string()).len(),
                    1,
                    "'{letter}' in {} is not folded",
                    spec.name
                );
            }
        }
    }
}
