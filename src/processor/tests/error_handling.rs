//! Section failure tests

use super::{Fixture, read};
use crate::config::MissingSectionPolicy;
use crate::error::ScadaError;
use crate::models::{SectionKind, SectionOutcome};
use crate::processor::Pipeline;
use std::fs;

fn failed_kinds(summary: &crate::models::RunSummary) -> Vec<SectionKind> {
    summary
        .sections
        .iter()
        .filter(|(_, outcome)| matches!(outcome, SectionOutcome::Failed { .. }))
        .map(|(kind, _)| *kind)
        .collect()
}

#[test]
fn test_missing_table_aborts_only_its_section() {
    let fixture = Fixture::complete();
    fixture.remove_input("MeasurementUnits.CSV");

    let summary = Pipeline::new(fixture.config()).unwrap().run().unwrap();
    assert_eq!(failed_kinds(&summary), [SectionKind::Unit]);
    assert_eq!(summary.sections_written(), 3);

    let merged = read(&fixture.merged_path());
    assert!(merged.contains("\tSTATUS\t"));
    assert!(!merged.contains("\tUNIT\t"));
    assert!(merged.ends_with(" 0\n0"));
}

#[test]
fn test_missing_prefix_suffix_table_aborts_status_only() {
    let fixture = Fixture::complete();
    fixture.remove_input("PrefixSuffixes.csv");

    let summary = Pipeline::new(fixture.config()).unwrap().run().unwrap();
    assert_eq!(failed_kinds(&summary), [SectionKind::Status]);
    assert!(fixture.section_dir.join("analog_dat.dat").exists());
    assert!(!fixture.section_dir.join("status_dat.dat").exists());
}

#[test]
fn test_station_without_pkey_fails_and_points_resolve_to_zero() {
    let fixture = Fixture::complete();
    fixture.write_input("StationPoints.CSV", "NAME,DESC,ZONEID\nALPHA,Alpha Site,3\n");

    let summary = Pipeline::new(fixture.config()).unwrap().run().unwrap();
    assert_eq!(failed_kinds(&summary), [SectionKind::Station]);
    match &summary.sections[0].1 {
        SectionOutcome::Failed { reason } => assert!(reason.contains("PKEY")),
        other => panic!("Expected failed station section, got {:?}", other),
    }

    // Every point lands in the station-0 bucket
    assert_eq!(summary.unresolved_station_refs, 4 + 3);
    let status = fixture.section("status_dat.dat");
    assert!(status.contains("\t1\t'CB 52-1'\t0\t212\t1\t5\t0\n"));
}

#[test]
fn test_stale_section_removed_when_its_table_disappears() {
    let fixture = Fixture::complete();
    Pipeline::new(fixture.config()).unwrap().run().unwrap();
    assert!(fixture.section_dir.join("unit_dat.dat").exists());

    fixture.remove_input("MeasurementUnits.CSV");
    Pipeline::new(fixture.config()).unwrap().run().unwrap();

    assert!(!fixture.section_dir.join("unit_dat.dat").exists());
    assert!(!read(&fixture.merged_path()).contains("\tUNIT\t"));
}

#[test]
fn test_no_tables_produces_no_merged_file() {
    let fixture = Fixture::empty();

    let result = Pipeline::new(fixture.config()).unwrap().run();
    assert!(matches!(result, Err(ScadaError::NoContentProduced { .. })));
    assert!(!fixture.merged_path().exists());
}

#[test]
fn test_fail_policy_aborts_merge_on_missing_section() {
    let fixture = Fixture::complete();
    fixture.remove_input("MeasurementUnits.CSV");
    let config = fixture
        .config()
        .with_missing_section_policy(MissingSectionPolicy::Fail);

    let result = Pipeline::new(config).unwrap().run();
    match result {
        Err(ScadaError::SectionMissing { section, .. }) => assert_eq!(section, SectionKind::Unit),
        other => panic!("Expected SectionMissing, got {:?}", other),
    }
    assert!(!fixture.merged_path().exists());
}

#[test]
fn test_empty_policy_keeps_section_framing() {
    let fixture = Fixture::complete();
    fixture.remove_input("MeasurementUnits.CSV");
    let config = fixture
        .config()
        .with_missing_section_policy(MissingSectionPolicy::Empty);

    Pipeline::new(config).unwrap().run().unwrap();
    let merged = read(&fixture.merged_path());
    assert!(merged.ends_with("*\n\t2\tUNIT\t0\t1\n*\trecord\tNAME\n 0\n0"));
}

#[test]
fn test_input_and_section_dir_must_differ() {
    let fixture = Fixture::complete();
    let config = fixture.config().with_section_dir(&fixture.input_dir);

    let result = Pipeline::new(config);
    assert!(matches!(result, Err(ScadaError::Configuration { .. })));
    assert_eq!(fs::read_dir(&fixture.input_dir).unwrap().count(), 5);
}

#[test]
fn test_oversized_prefix_code_leaves_state_code_zero() {
    let fixture = Fixture::complete();
    fixture.write_input("PrefixSuffixes.csv", "Name,PKey\nBREAKER,1e30\nSWITCH,9223372036854775807\n");

    let summary = Pipeline::new(fixture.config()).unwrap().run().unwrap();
    assert_eq!(summary.sections_failed(), 0);
    assert_eq!(summary.unresolved_state_codes, 3);
    assert!(fixture
        .section("status_dat.dat")
        .contains("\t1\t'CB 52-1'\t1\t0\t1\t5\t0\n"));
}

#[test]
fn test_stale_key_index_removed_when_disabled() {
    let fixture = Fixture::complete();
    let key_index = fixture.section_dir.join("point_keys.csv");
    Pipeline::new(fixture.config()).unwrap().run().unwrap();
    assert!(key_index.exists());

    let summary = Pipeline::new(fixture.config().without_key_index())
        .unwrap()
        .run()
        .unwrap();
    assert!(summary.key_index_path.is_none());
    assert!(!key_index.exists());
}

#[test]
fn test_stale_key_index_removed_when_point_sections_fail() {
    let fixture = Fixture::complete();
    let key_index = fixture.section_dir.join("point_keys.csv");
    Pipeline::new(fixture.config()).unwrap().run().unwrap();
    assert!(key_index.exists());

    fixture.remove_input("AnalogPoints.csv");
    fixture.remove_input("StatusPoints.csv");
    let summary = Pipeline::new(fixture.config()).unwrap().run().unwrap();

    assert_eq!(failed_kinds(&summary), [SectionKind::Analog, SectionKind::Status]);
    assert!(summary.key_index_path.is_none());
    assert!(!key_index.exists());
}

#[test]
fn test_latin1_station_table_still_resolves_points() {
    let fixture = Fixture::complete();
    fs::write(
        fixture.input_dir.join("StationPoints.CSV"),
        b"PKEY,NAME,DESC,ZONEID\n501,ALPHA,Estaci\xf3n Alfa,3\n502,BETA,Beta Site,4\n",
    )
    .unwrap();

    let summary = Pipeline::new(fixture.config()).unwrap().run().unwrap();
    assert_eq!(summary.sections_failed(), 0);
    assert_eq!(summary.unresolved_station_refs, 2);
    assert!(fixture
        .section("status_dat.dat")
        .contains("\t1\t'CB 52-1'\t1\t212\t1\t5\t0\n"));
}
