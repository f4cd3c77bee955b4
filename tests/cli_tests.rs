#![cfg(feature = "cli_api")]

use assert_cmd::Command;
use predicates::str::contains as str_contains;
use tempfile::{NamedTempFile, tempdir};

#[allow(deprecated)]
fn run_cli(script: &str) -> assert_cmd::assert::Assert {
    let mut cmd = Command::cargo_bin("cli").expect("cli binary");
    cmd.write_stdin(script.to_string()).assert()
}

#[test]
fn cli_call_edit_prints_derived_post() {
    run_cli("roster new 2025 7\nset 2025-07-03 CALL boss\nquit\n")
        .success()
        .stdout(str_contains("Assigned POST 2025-07-04 to BOSS."));
}

#[test]
fn cli_friday_call_lands_on_monday() {
    run_cli("roster new 2025 7\nset 2025-07-04 call kass\nroster show\nquit\n")
        .success()
        .stdout(str_contains("Assigned POST 2025-07-07 to KASS."));
}

#[test]
fn cli_set_keeps_multi_word_names() {
    run_cli("roster new 2025 7\nset 2025-07-01 CALL Mary Jane\nquit\n")
        .success()
        .stdout(str_contains("Assigned POST 2025-07-02 to MARY JANE."));
}

#[test]
fn cli_rejects_weekend_edits() {
    run_cli("roster new 2025 7\nset 2025-07-05 CALL boss\nquit\n")
        .success()
        .stdout(str_contains("Error: roster has no CALL cell on 2025-07-05"));
}

#[test]
fn cli_requires_a_roster_before_editing() {
    run_cli("set 2025-07-03 CALL boss\nquit\n")
        .success()
        .stdout(str_contains("No roster."));
}

#[test]
fn cli_loads_directory_and_shows_a_day() {
    let dir = tempdir().unwrap();
    std::fs::write(
        dir.path().join("2025-07.csv"),
        ",MONDAY,TUESDAY\n,,1\nCALL,,alpha\n",
    )
    .unwrap();
    std::fs::write(dir.path().join("notes_2025.csv"), ",MONDAY\n").unwrap();
    let path = dir.path().display().to_string();

    let assert = run_cli(&format!("load {path}\nday 2025-07-01\nday 2025-07-02\nquit\n")).success();
    let output = String::from_utf8_lossy(&assert.get_output().stdout);
    assert!(output.contains("Loaded 1 file(s), 1 record(s)"));
    assert!(output.contains("Skipped"));
    assert!(output.contains("ALPHA"));
    assert!(output.contains("No schedule found for 2025-07-02."));
}

#[test]
fn cli_save_and_load_roster_json_round_trip() {
    let tmp = NamedTempFile::new().expect("create temp file");
    let path = tmp.path().display().to_string();
    let script = format!(
        "roster new 2025 7\nset 2025-07-10 VACATION persist\nroster save {path}\nroster new 2025 8\nroster load {path}\nquit\n"
    );

    let assert = run_cli(&script).success();
    let output = String::from_utf8_lossy(&assert.get_output().stdout);
    let after_reload = output.split("Roster loaded from").last().unwrap_or_default();
    assert!(after_reload.contains("Roster 2025-07"));
    assert!(after_reload.contains("PERSIST"));
}

#[test]
fn cli_unknown_command_keeps_running() {
    run_cli("frobnicate\nhelp\nquit\n")
        .success()
        .stdout(str_contains("Unknown command. Type 'help'."))
        .stdout(str_contains("roster new <year> <month>"));
}
