use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::data::calendar::parse_iso_date;
use crate::data::rng::{coerce_seed, coerce_seed_value, DEFAULT_SEED};
use crate::error::{DashError, DashResult};

/// Everything that determines a generated model.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GenerationConfig {
    pub seed: u32,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            end: NaiveDate::from_ymd_opt(2025, 12, 31).unwrap_or_default(),
        }
    }
}

impl GenerationConfig {
    pub fn validate(&self) -> DashResult<()> {
        if self.start > self.end {
            return Err(DashError::InvalidArgument(format!(
                "start date {} is after end date {}",
                self.start, self.end
            )));
        }
        Ok(())
    }

    pub fn with_overrides(
        mut self,
        seed: Option<u32>,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Self {
        if let Some(seed) = seed {
            self.seed = seed;
        }
        if let Some(start) = start {
            self.start = start;
        }
        if let Some(end) = end {
            self.end = end;
        }
        self
    }
}

/// Seeds may be written as integers, floats or strings; all are coerced.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
enum SeedValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl SeedValue {
    fn coerce(&self) -> u32 {
        match self {
            Self::Int(value) => value.rem_euclid(1_i64 << 32) as u32,
            Self::Float(value) => coerce_seed_value(*value),
            Self::Text(value) => coerce_seed(value),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    seed: Option<SeedValue>,
    #[serde(default)]
    start: Option<String>,
    #[serde(default)]
    end: Option<String>,
}

pub fn parse_config(yaml: &str) -> DashResult<GenerationConfig> {
    let file: Option<ConfigFile> = serde_yaml::from_str(yaml)?;
    let file = file.unwrap_or_default();
    let defaults = GenerationConfig::default();
    let config = GenerationConfig {
        seed: file.seed.as_ref().map_or(defaults.seed, SeedValue::coerce),
        start: file
            .start
            .as_deref()
            .map(parse_iso_date)
            .transpose()?
            .unwrap_or(defaults.start),
        end: file
            .end
            .as_deref()
            .map(parse_iso_date)
            .transpose()?
            .unwrap_or(defaults.end),
    };
    config.validate()?;
    Ok(config)
}

pub fn load_config(path: impl AsRef<Path>) -> DashResult<GenerationConfig> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    parse_config(&text).map_err(|error| match error {
        DashError::Yaml(inner) => {
            DashError::InvalidArgument(format!("invalid config '{}': {inner}", path.display()))
        }
        other => other,
    })
}
