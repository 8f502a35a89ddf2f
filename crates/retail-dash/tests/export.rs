use std::fs;

use chrono::NaiveDate;

use retail_dash::config::GenerationConfig;
use retail_dash::data::export::{export_model, load_manifest, ExportOutcome, MANIFEST_SCHEMA_VERSION};

fn config(seed: u32) -> GenerationConfig {
    GenerationConfig {
        seed,
        start: NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid date"),
        end: NaiveDate::from_ymd_opt(2025, 2, 28).expect("valid date"),
    }
}

#[test]
fn writes_every_collection_and_a_manifest() {
    let temp = tempfile::tempdir().expect("tempdir");
    let outcome = export_model(temp.path(), &config(42), false).expect("export");
    assert!(matches!(outcome, ExportOutcome::Written(_)));

    for file in [
        "weeks.json",
        "stores.json",
        "catalog.json",
        "categories.json",
        "campaigns.json",
        "state_coordinates.json",
        "records.jsonl",
        "ly_records.jsonl",
        "hr_records.jsonl",
        "staffing.jsonl",
        "manifest.json",
    ] {
        assert!(temp.path().join(file).is_file(), "missing {file}");
    }

    let manifest = load_manifest(temp.path()).expect("manifest");
    assert_eq!(manifest.schema_version, MANIFEST_SCHEMA_VERSION);
    assert_eq!(manifest.seed, 42);
    assert_eq!(manifest.records, manifest.weeks * 10 * 2 * 41);
    assert_eq!(manifest.ly_records, manifest.records);

    let lines = fs::read_to_string(temp.path().join("records.jsonl")).expect("records");
    assert_eq!(lines.lines().count(), manifest.records);
    let first: serde_json::Value =
        serde_json::from_str(lines.lines().next().expect("first line")).expect("json line");
    assert_eq!(first["weekIndex"], 0);
    assert_eq!(first["channel"], "Tienda");
}

#[test]
fn reuses_matching_export_unless_forced() {
    let temp = tempfile::tempdir().expect("tempdir");
    let written = export_model(temp.path(), &config(42), false).expect("first export");

    let reused = export_model(temp.path(), &config(42), false).expect("second export");
    assert!(matches!(reused, ExportOutcome::Reused(_)));
    assert_eq!(reused.manifest(), written.manifest());

    let forced = export_model(temp.path(), &config(42), true).expect("forced export");
    assert!(matches!(forced, ExportOutcome::Written(_)));
    assert_eq!(forced.manifest().digest, written.manifest().digest);
}

#[test]
fn regenerates_when_seed_changes_without_force() {
    let temp = tempfile::tempdir().expect("tempdir");
    export_model(temp.path(), &config(42), false).expect("seed 42");
    let second = export_model(temp.path(), &config(43), false).expect("seed 43");
    assert!(matches!(second, ExportOutcome::Written(_)));
    assert_eq!(load_manifest(temp.path()).expect("manifest").seed, 43);
}

#[test]
fn missing_manifest_is_an_error() {
    let temp = tempfile::tempdir().expect("tempdir");
    load_manifest(temp.path()).expect_err("no manifest yet");
}
