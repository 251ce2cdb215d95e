//! CLI integration tests
//!
//! Tests the command-line interface using assert_cmd

mod common;

use predicates::prelude::*;

use common::{personas_cmd, stdout_json, Fixture};

const COUPLE: &str = "einkommensteuer_sozialabgaben.couple_1_child";
const KARENZZEIT: &str = "grundsicherung_für_erwerbsfähige.couple_1_child_in_karenzzeit";

// ─────────────────────────────────────────────────────────────────
// Help and Version Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_help_flag() {
    personas_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Example households"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("show"))
        .stdout(predicate::str::contains("upsert"))
        .stdout(predicate::str::contains("validate"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_version_command() {
    personas_cmd()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("gettsim-personas"))
        .stdout(predicate::str::contains("Build Information"))
        .stdout(predicate::str::contains("Git Hash"));
}

#[test]
fn test_short_version_flag() {
    personas_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("gettsim-personas"));
}

// ─────────────────────────────────────────────────────────────────
// List Command Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_list_all() {
    let output = personas_cmd().arg("list").output().unwrap();
    assert!(output.status.success());

    let listing = stdout_json(&output);
    let paths: Vec<&str> = listing
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["path"].as_str().unwrap())
        .collect();
    assert_eq!(paths.len(), 4);
    assert!(paths.contains(&COUPLE));
    assert!(paths.contains(&KARENZZEIT));
}

#[test]
fn test_list_at_date() {
    let output = personas_cmd()
        .args(["list", "--date", "2010-06-01"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let listing = stdout_json(&output);
    let paths: Vec<&str> = listing
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["path"].as_str().unwrap())
        .collect();
    assert_eq!(paths.len(), 3);
    assert!(!paths.contains(&KARENZZEIT));
}

#[test]
fn test_list_before_any_persona() {
    personas_cmd()
        .args(["list", "--date", "1999-01-01"])
        .assert()
        .success()
        .stdout(predicate::str::diff("[]\n"));
}

#[test]
fn test_list_invalid_date() {
    personas_cmd()
        .args(["list", "--date", "2025-13-01"])
        .assert()
        .code(30)
        .stderr(predicate::str::contains("E300"))
        .stderr(predicate::str::contains("YYYY-MM-DD"));
}

// ─────────────────────────────────────────────────────────────────
// Show Command Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_show_persona() {
    let output = personas_cmd()
        .args(["show", COUPLE, "--policy-date", "2025-01-01"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let persona = stdout_json(&output);
    assert_eq!(persona["policy_date"], "2025-01-01");
    assert_eq!(persona["evaluation_date"], "2025-01-01");
    assert_eq!(persona["input_data_tree"]["p_id"], serde_json::json!([0, 1, 2]));
    assert_eq!(
        persona["input_data_tree"]["geburtsjahr"],
        serde_json::json!([1995, 1995, 2015])
    );
    assert!(persona["tt_targets_tree"]["einkommensteuer"]
        .as_object()
        .unwrap()
        .contains_key("betrag_y_sn"));
}

#[test]
fn test_show_with_evaluation_date() {
    let output = personas_cmd()
        .args([
            "show",
            COUPLE,
            "--policy-date",
            "2025-01-01",
            "--evaluation-date",
            "2030-01-01",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let persona = stdout_json(&output);
    assert_eq!(
        persona["input_data_tree"]["geburtsjahr"],
        serde_json::json!([2000, 2000, 2020])
    );
}

#[test]
fn test_show_with_bruttolohn_grid() {
    let output = personas_cmd()
        .args([
            "show",
            COUPLE,
            "-p",
            "2025-01-01",
            "--bruttolohn",
            "0:6000",
            "3000",
            "0",
            "--n-points",
            "3",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let persona = stdout_json(&output);
    let data = &persona["input_data_tree"];
    assert_eq!(data["p_id"], serde_json::json!([0, 1, 2, 3, 4, 5, 6, 7, 8]));
    assert_eq!(data["hh_id"], serde_json::json!([0, 0, 0, 1, 1, 1, 2, 2, 2]));
    let wages: Vec<f64> = data["einnahmen"]["bruttolohn_m"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_f64().unwrap())
        .collect();
    assert_eq!(
        wages,
        vec![0.0, 3000.0, 0.0, 3000.0, 3000.0, 0.0, 6000.0, 3000.0, 0.0]
    );
}

#[test]
fn test_show_grid_with_wrong_person_count() {
    personas_cmd()
        .args([
            "show",
            COUPLE,
            "-p",
            "2025-01-01",
            "--bruttolohn",
            "0:6000",
        ])
        .assert()
        .code(70)
        .stderr(predicate::str::contains("E700"));
}

#[test]
fn test_show_unknown_persona() {
    personas_cmd()
        .args(["show", "does.not_exist", "-p", "2025-01-01"])
        .assert()
        .code(50)
        .stderr(predicate::str::contains("Persona not found: does.not_exist"))
        .stderr(predicate::str::contains("gettsim-personas list"));
}

#[test]
fn test_show_before_persona_exists() {
    personas_cmd()
        .args(["show", KARENZZEIT, "-p", "2020-01-01"])
        .assert()
        .code(50)
        .stderr(predicate::str::contains("Karenzzeit for Bürgergeld is not relevant"));
}

// ─────────────────────────────────────────────────────────────────
// Upsert Command Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_upsert_broadcasts_household() {
    let fixture = Fixture::new();
    let data = fixture.write(
        "data.json",
        r#"{"einnahmen": {"bruttolohn_m": [1000, 2000, 0, 1500, 2500, 0]}}"#,
    );

    let output = personas_cmd()
        .args(["upsert", COUPLE, "-p", "2025-01-01", "--data"])
        .arg(&data)
        .output()
        .unwrap();
    assert!(output.status.success());

    let persona = stdout_json(&output);
    let tree = &persona["input_data_tree"];
    assert_eq!(tree["p_id"], serde_json::json!([0, 1, 2, 3, 4, 5]));
    assert_eq!(tree["hh_id"], serde_json::json!([0, 0, 0, 1, 1, 1]));
    assert_eq!(
        tree["familie"]["p_id_ehepartner"],
        serde_json::json!([1, 0, -1, 4, 3, -1])
    );
    assert_eq!(
        tree["einnahmen"]["bruttolohn_m"],
        serde_json::json!([1000, 2000, 0, 1500, 2500, 0])
    );
    assert_eq!(tree["alter"], serde_json::json!([30, 30, 10, 30, 30, 10]));
}

#[test]
fn test_upsert_length_not_multiple() {
    let fixture = Fixture::new();
    let data = fixture.write("data.json", r#"{"einnahmen": {"bruttolohn_m": [1, 2, 3, 4]}}"#);

    personas_cmd()
        .args(["upsert", COUPLE, "-p", "2025-01-01", "--data"])
        .arg(&data)
        .assert()
        .code(60)
        .stderr(predicate::str::contains("data_to_upsert: 4"));
}

#[test]
fn test_upsert_missing_file() {
    let fixture = Fixture::new();
    personas_cmd()
        .args(["upsert", COUPLE, "-p", "2025-01-01", "--data"])
        .arg(fixture.path("missing.json"))
        .assert()
        .code(20)
        .stderr(predicate::str::contains("Failed to read file"));
}

#[test]
fn test_upsert_malformed_json() {
    let fixture = Fixture::new();
    let data = fixture.write("data.json", "{not json");

    personas_cmd()
        .args(["upsert", COUPLE, "-p", "2025-01-01", "--data"])
        .arg(&data)
        .assert()
        .code(80)
        .stderr(predicate::str::contains("E800"));
}

// ─────────────────────────────────────────────────────────────────
// Validate Command Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_validate_year_range() {
    personas_cmd()
        .args(["validate", "--start-year", "2023", "--end-year", "2024"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Validated 8 persona-year pairs (2023-2024).",
        ));
}

#[test]
fn test_validate_all_years() {
    personas_cmd()
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("Validated"));
}

// ─────────────────────────────────────────────────────────────────
// Verbosity and Error Handling Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_verbose_list() {
    personas_cmd()
        .args(["-vv", "list"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("["));
}

#[test]
fn test_quiet_flag() {
    personas_cmd().args(["--quiet", "list"]).assert().success();
}

#[test]
fn test_unknown_command() {
    personas_cmd()
        .arg("unknown-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_missing_subcommand() {
    personas_cmd().assert().failure();
}
