use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub const DEFAULT_SEED: u32 = 20_260_218;

const SEED_MODULUS: f64 = 4_294_967_296.0;

/// Seeded uniform stream shared by every generation stage.
///
/// The stream is a pure function of the seed and the number of draws taken,
/// so a model rebuilt from the same seed is identical field for field.
#[derive(Clone, Debug)]
pub struct ModelRng {
    inner: ChaCha8Rng,
}

impl ModelRng {
    pub fn new(seed: u32) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(u64::from(seed)),
        }
    }

    /// Uniform draw in `[0, 1)`.
    pub fn next_unit(&mut self) -> f64 {
        self.inner.gen::<f64>()
    }

    /// Uniform draw in `[-span / 2, span / 2)`.
    pub fn jitter(&mut self, span: f64) -> f64 {
        (self.next_unit() - 0.5) * span
    }

    pub fn chance(&mut self, probability: f64) -> bool {
        self.next_unit() < probability
    }

    /// Uniform pick from a static option list.
    ///
    /// # Panics
    ///
    /// Panics when `items` is empty. Every call site passes a non-empty
    /// constant table.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        let idx = (self.next_unit() * items.len() as f64) as usize;
        &items[idx.min(items.len().saturating_sub(1))]
    }

    /// Cumulative-weight pick. Negative weights count as zero; when every
    /// weight is zero the first entry wins.
    ///
    /// # Panics
    ///
    /// Panics when `items` is empty.
    pub fn pick_weighted<'a, T, F>(&mut self, items: &'a [T], weight: F) -> &'a T
    where
        F: Fn(&T) -> f64,
    {
        let total: f64 = items.iter().map(|item| weight(item).max(0.0)).sum();
        if total <= 0.0 {
            return &items[0];
        }
        let mut cursor = self.next_unit() * total;
        for item in items {
            cursor -= weight(item).max(0.0);
            if cursor <= 0.0 {
                return item;
            }
        }
        &items[items.len() - 1]
    }
}

/// Coerces free-form seed text into a 32-bit seed instead of rejecting it.
///
/// Integers wrap modulo 2^32, fractional values truncate toward zero, and
/// anything non-numeric collapses to 0.
pub fn coerce_seed(raw: &str) -> u32 {
    let raw = raw.trim();
    if let Ok(value) = raw.parse::<i128>() {
        return value.rem_euclid(1_i128 << 32) as u32;
    }
    coerce_seed_value(raw.parse::<f64>().unwrap_or(f64::NAN))
}

pub fn coerce_seed_value(value: f64) -> u32 {
    if !value.is_finite() {
        return 0;
    }
    value.trunc().rem_euclid(SEED_MODULUS) as u32
}
