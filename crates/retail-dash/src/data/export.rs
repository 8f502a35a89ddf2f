use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::model::Model;
use crate::config::GenerationConfig;
use crate::error::DashResult;

pub const MANIFEST_SCHEMA_VERSION: u32 = 1;

const MANIFEST_FILE: &str = "manifest.json";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportManifest {
    pub schema_version: u32,
    pub seed: u32,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub weeks: usize,
    pub records: usize,
    pub ly_records: usize,
    pub hr_records: usize,
    pub digest: String,
}

impl ExportManifest {
    fn matches(&self, config: &GenerationConfig) -> bool {
        self.schema_version == MANIFEST_SCHEMA_VERSION
            && self.seed == config.seed
            && self.start == config.start
            && self.end == config.end
    }
}

pub fn load_manifest(out_dir: &Path) -> DashResult<ExportManifest> {
    let manifest = serde_json::from_slice(&fs::read(out_dir.join(MANIFEST_FILE))?)?;
    Ok(manifest)
}

/// Outcome of [`export_model`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExportOutcome {
    Written(ExportManifest),
    /// An existing export already matched the requested configuration.
    Reused(ExportManifest),
}

impl ExportOutcome {
    pub fn manifest(&self) -> &ExportManifest {
        match self {
            Self::Written(manifest) | Self::Reused(manifest) => manifest,
        }
    }
}

/// Generates the model for `config` and writes it under `out_dir`, unless a
/// matching export is already there and `force` is false.
pub fn export_model(
    out_dir: &Path,
    config: &GenerationConfig,
    force: bool,
) -> DashResult<ExportOutcome> {
    if out_dir.exists() && !force {
        if let Ok(existing) = load_manifest(out_dir) {
            if existing.matches(config) {
                info!(dir = %out_dir.display(), "export up to date, skipping");
                return Ok(ExportOutcome::Reused(existing));
            }
        }
    }

    let model = Model::generate(config)?;
    write_model(out_dir, &model).map(ExportOutcome::Written)
}

/// Writes every collection of `model` plus a manifest. Existing files in
/// `out_dir` with the same names are replaced.
pub fn write_model(out_dir: &Path, model: &Model) -> DashResult<ExportManifest> {
    fs::create_dir_all(out_dir)?;

    write_json(&out_dir.join("weeks.json"), &model.weeks)?;
    write_json(&out_dir.join("stores.json"), &model.stores)?;
    write_json(&out_dir.join("catalog.json"), &model.catalog)?;
    write_json(&out_dir.join("categories.json"), &model.categories)?;
    write_json(&out_dir.join("campaigns.json"), &model.campaigns)?;
    write_json(
        &out_dir.join("state_coordinates.json"),
        &model.state_coordinates(),
    )?;
    write_jsonl(&out_dir.join("records.jsonl"), &model.records)?;
    write_jsonl(&out_dir.join("ly_records.jsonl"), &model.ly_records)?;
    write_jsonl(&out_dir.join("hr_records.jsonl"), &model.hr_records)?;
    write_jsonl(&out_dir.join("staffing.jsonl"), &model.staffing)?;

    let manifest = ExportManifest {
        schema_version: MANIFEST_SCHEMA_VERSION,
        seed: model.config.seed,
        start: model.config.start,
        end: model.config.end,
        weeks: model.weeks.len(),
        records: model.records.len(),
        ly_records: model.ly_records.len(),
        hr_records: model.hr_records.len(),
        digest: model.digest()?,
    };
    fs::write(
        out_dir.join(MANIFEST_FILE),
        serde_json::to_vec_pretty(&manifest)?,
    )?;
    info!(dir = %out_dir.display(), records = manifest.records, "export written");
    Ok(manifest)
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> DashResult<()> {
    fs::write(path, serde_json::to_vec_pretty(value)?)?;
    Ok(())
}

fn write_jsonl<T: Serialize>(path: &Path, rows: &[T]) -> DashResult<()> {
    let mut file = BufWriter::new(fs::File::create(path)?);
    for row in rows {
        serde_json::to_writer(&mut file, row)?;
        file.write_all(b"\n")?;
    }
    file.flush()?;
    Ok(())
}
