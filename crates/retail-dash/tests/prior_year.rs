use std::collections::HashMap;

use chrono::NaiveDate;

use retail_dash::config::GenerationConfig;
use retail_dash::data::model::Model;
use retail_dash::data::prior_year::{
    index_records, resolve_source, ComparisonKey, PriorYearSource, PRIOR_YEAR_LAG_WEEKS,
};
use retail_dash::data::records::PriorYearBasis;

#[test]
fn records_past_week_52_link_to_the_lagged_record() {
    let model = Model::generate(&GenerationConfig::default()).expect("default model");
    let by_key: HashMap<ComparisonKey<'_>, usize> = model
        .records
        .iter()
        .enumerate()
        .map(|(pos, record)| (ComparisonKey::of(record), pos))
        .collect();

    let mut matched = 0usize;
    let mut approximated = 0usize;
    for (current, ly) in model.records.iter().zip(&model.ly_records) {
        assert_eq!(ly.record.week_index, current.week_index);
        assert_eq!(ly.record.store, current.store);
        assert_eq!(ly.record.channel, current.channel);
        assert_eq!(ly.record.sku, current.sku);

        if current.week_index >= PRIOR_YEAR_LAG_WEEKS {
            let key = ComparisonKey::lagged(current).expect("lagged key");
            let source = &model.records[by_key[&key]];
            assert_eq!(
                ly.basis,
                PriorYearBasis::Matched {
                    week_index: current.week_index - PRIOR_YEAR_LAG_WEEKS
                }
            );
            let drift = (ly.record.net_sales - source.net_sales).abs() / source.net_sales;
            assert!(drift <= 0.05, "net sales drift {drift} for {}", current.sku);
            matched += 1;
        } else {
            let PriorYearBasis::Approximated { growth } = ly.basis else {
                panic!("week {} should be approximated", current.week_index);
            };
            assert!(growth > 1.0);
            assert!(ly.record.net_sales < current.net_sales);
            assert!((ly.record.net_sales - current.net_sales / growth).abs() < 1e-6);
            approximated += 1;
        }
    }
    assert!(matched > 0 && approximated > 0);
    assert_eq!(matched + approximated, model.records.len());
}

#[test]
fn short_windows_fall_back_to_approximation_everywhere() {
    let config = GenerationConfig {
        start: NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid date"),
        end: NaiveDate::from_ymd_opt(2025, 6, 30).expect("valid date"),
        ..GenerationConfig::default()
    };
    let model = Model::generate(&config).expect("half-year model");
    assert_eq!(model.prior_year_match_ratio(), 0.0);
    assert!(model.ly_records.iter().all(|ly| !ly.is_matched()));
}

#[test]
fn resolve_source_uses_the_full_composite_key() {
    let model = Model::generate(&GenerationConfig::default()).expect("default model");
    let index = index_records(&model.records);

    let late = model
        .records
        .iter()
        .find(|r| r.week_index == 60)
        .expect("record at week 60");
    match resolve_source(late, &index, &model.stores) {
        PriorYearSource::Matched(found) => {
            assert_eq!(found.week_index, 8);
            assert_eq!(found.store, late.store);
            assert_eq!(found.channel, late.channel);
            assert_eq!(found.sku, late.sku);
        }
        other => panic!("expected a match, got {other:?}"),
    }

    let early = &model.records[0];
    let store = model.store(early.store).expect("store");
    assert_eq!(
        resolve_source(early, &index, &model.stores),
        PriorYearSource::Approximated(store.fallback_growth(early.is_online()))
    );
}
