use retail_dash::stats::{
    clamp, compute_stats, pct, percentile, rank_statuses, round_to, sum_by, trend_lower_better,
    trend_pct, weighted_avg, Status, ValueRange,
};

#[test]
fn ratio_helpers_floor_their_denominators() {
    assert_eq!(pct(5.0, 0.0), 500.0);
    assert_eq!(pct(25.0, 50.0), 50.0);
    let rows = [(10.0, 0.0), (20.0, 0.0)];
    assert_eq!(weighted_avg(&rows, |r| r.0, |r| r.1), 0.0);
    let rows = [(10.0, 1.0), (20.0, 3.0)];
    assert_eq!(weighted_avg(&rows, |r| r.0, |r| r.1), 17.5);
    assert_eq!(sum_by(&rows, |r| r.1), 4.0);
}

#[test]
fn trends_are_zero_without_a_usable_base() {
    assert_eq!(trend_pct(110.0, 100.0), 10.0);
    assert_eq!(trend_pct(110.0, 0.0), 0.0);
    assert_eq!(trend_pct(f64::NAN, 100.0), 0.0);
    assert_eq!(trend_lower_better(90.0, 100.0), 10.0);
    assert_eq!(trend_lower_better(90.0, -5.0), 0.0);
}

#[test]
fn clamp_and_rounding() {
    assert_eq!(clamp(120.0, 0.0, 100.0), 100.0);
    assert_eq!(clamp(-3.0, 0.0, 100.0), 0.0);
    assert_eq!(clamp(f64::NAN, 2.0, 5.0), 2.0);
    assert_eq!(round_to(1.23456, 2), 1.23);
}

#[test]
fn percentile_interpolates_linearly() {
    let values = [4.0, 1.0, 3.0, 2.0];
    assert_eq!(percentile(&values, 0.0), 1.0);
    assert_eq!(percentile(&values, 1.0), 4.0);
    assert!((percentile(&values, 0.5) - 2.5).abs() < 1e-12);
    assert_eq!(percentile(&[], 0.5), 0.0);
}

#[test]
fn normalize_handles_degenerate_ranges() {
    let range = ValueRange::of(&[10.0, 20.0]);
    assert_eq!(range.normalize(15.0), 0.5);
    assert_eq!(range.normalize(30.0), 1.0);
    assert_eq!(ValueRange::of(&[7.0, 7.0]).normalize(7.0), 0.5);
    assert_eq!(ValueRange::of(&[]).normalize(1.0), 0.5);
}

#[test]
fn statuses_split_on_30th_and_70th_percentiles() {
    let scores: Vec<f64> = (1..=10).map(f64::from).collect();
    let statuses = rank_statuses(&scores);
    assert_eq!(statuses[0], Status::Red);
    assert_eq!(statuses[2], Status::Red);
    assert_eq!(statuses[3], Status::Amber);
    assert_eq!(statuses[6], Status::Amber);
    assert_eq!(statuses[7], Status::Green);
    assert_eq!(statuses[9], Status::Green);
}

#[test]
fn sample_stats_summarise_values() {
    let stats = compute_stats(&[3.0, 1.0, 2.0, 10.0]).expect("stats");
    assert_eq!(stats.min, 1.0);
    assert_eq!(stats.max, 10.0);
    assert_eq!(stats.mean, 4.0);
    assert_eq!(stats.median, 2.5);
    assert!(compute_stats(&[]).is_none());
}
