use serde::Serialize;

use crate::data::dimensions::labeled_enum;

/// Bounds `value` to `[min, max]`. NaN collapses to `min`.
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

pub fn sum_by<T>(rows: &[T], field: impl Fn(&T) -> f64) -> f64 {
    rows.iter().map(field).sum()
}

pub fn avg_by<T>(rows: &[T], field: impl Fn(&T) -> f64) -> f64 {
    sum_by(rows, field) / (rows.len() as f64).max(1.0)
}

/// Weighted mean with the total weight floored at 1.
pub fn weighted_avg<T>(rows: &[T], field: impl Fn(&T) -> f64, weight: impl Fn(&T) -> f64) -> f64 {
    let (value, total) = rows.iter().fold((0.0, 0.0), |(value, total), row| {
        let w = weight(row);
        (value + field(row) * w, total + w)
    });
    value / f64::max(total, 1.0)
}

/// `part` as a percentage of `total`, with the base floored at 1.
pub fn pct(part: f64, total: f64) -> f64 {
    part / total.max(1.0) * 100.0
}

/// Growth of `current` over `base` in percent; 0 when the base is unusable.
pub fn trend_pct(current: f64, base: f64) -> f64 {
    if !current.is_finite() || !base.is_finite() || base == 0.0 {
        return 0.0;
    }
    (current - base) / base * 100.0
}

/// Like [`trend_pct`] but positive when `current` went down.
pub fn trend_lower_better(current: f64, base: f64) -> f64 {
    if !current.is_finite() || !base.is_finite() || base <= 0.0 {
        return 0.0;
    }
    (base - current) / base * 100.0
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let p = 10f64.powi(decimals);
    (value * p).round() / p
}

/// Linear-interpolated percentile, `p` in `[0, 1]`.
pub fn percentile(values: &[f64], p: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let pos = clamp(p, 0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    if lower == upper {
        return sorted[lower];
    }
    let weight = pos - lower as f64;
    sorted[lower] * (1.0 - weight) + sorted[upper] * weight
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub fn of(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self { min: 0.0, max: 0.0 };
        }
        values.iter().fold(
            Self {
                min: f64::INFINITY,
                max: f64::NEG_INFINITY,
            },
            |acc, v| Self {
                min: acc.min.min(*v),
                max: acc.max.max(*v),
            },
        )
    }

    /// Position of `value` inside the range, 0.5 when the range is degenerate.
    pub fn normalize(&self, value: f64) -> f64 {
        if !value.is_finite() {
            return 0.0;
        }
        if !self.min.is_finite() || !self.max.is_finite() || (self.max - self.min).abs() < 1e-6 {
            return 0.5;
        }
        clamp((value - self.min) / (self.max - self.min), 0.0, 1.0)
    }
}

labeled_enum! {
    pub enum Status("status") {
        Green => "Verde" / "green",
        Amber => "Amarillo" / "amber",
        Red => "Rojo" / "red",
    }
}

/// Traffic-light status per score: top 30% green, bottom 30% red.
pub fn rank_statuses(scores: &[f64]) -> Vec<Status> {
    let p30 = percentile(scores, 0.3);
    let p70 = percentile(scores, 0.7);
    scores
        .iter()
        .map(|score| {
            if *score >= p70 {
                Status::Green
            } else if *score <= p30 {
                Status::Red
            } else {
                Status::Amber
            }
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SampleStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
}

pub fn compute_stats(samples: &[f64]) -> Option<SampleStats> {
    if samples.is_empty() {
        return None;
    }

    let mut values = samples.to_vec();
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let len = values.len();
    let sum: f64 = values.iter().sum();
    let median = if len % 2 == 0 {
        (values[(len / 2) - 1] + values[len / 2]) / 2.0
    } else {
        values[len / 2]
    };

    Some(SampleStats {
        min: *values.first().unwrap_or(&0.0),
        max: *values.last().unwrap_or(&0.0),
        mean: sum / (len as f64),
        median,
    })
}
