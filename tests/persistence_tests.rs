use chrono::NaiveDate;
use roster_tool::{
    MonthKey, PersistenceError, PersonId, Roster, RosterSnapshot, ShiftType, TidySchedule,
    load_roster_from_json, parse_anchored, save_roster_to_json, save_tidy_to_csv,
};
use tempfile::NamedTempFile;

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn build_sample_roster() -> Roster {
    let shifts = vec![
        ShiftType::Call,
        ShiftType::Post,
        ShiftType::Other("CLINIC".into()),
    ];
    let mut roster = Roster::with_shifts(MonthKey::new(2025, 9).unwrap(), shifts).unwrap();
    roster
        .assign(d(2025, 9, 5), &ShiftType::Call, PersonId::new("kass").ok())
        .unwrap();
    roster
        .assign(
            d(2025, 9, 10),
            &ShiftType::Other("CLINIC".into()),
            PersonId::new("lee").ok(),
        )
        .unwrap();
    roster
}

#[test]
fn json_round_trip_preserves_roster() {
    let roster = build_sample_roster();
    let tmp = NamedTempFile::new().unwrap();

    save_roster_to_json(&roster, tmp.path()).unwrap();
    let loaded = load_roster_from_json(tmp.path()).unwrap();

    assert_eq!(loaded, roster);
    assert_eq!(
        loaded.person(d(2025, 9, 8), &ShiftType::Post),
        Some(&PersonId::new("KASS").unwrap())
    );
}

#[test]
fn snapshot_keeps_only_filled_cells() {
    let roster = build_sample_roster();

    let snapshot = RosterSnapshot::from_roster(&roster);

    assert_eq!(snapshot.month, roster.month());
    assert_eq!(snapshot.shifts.len(), 3);
    // CALL, derived POST, CLINIC
    assert_eq!(snapshot.cells.len(), 3);
    assert!(snapshot.cells.iter().all(|c| c.person.is_some()));
}

#[test]
fn loading_snapshot_does_not_rederive() {
    let json = r#"{
        "month": {"year": 2025, "month": 9},
        "shifts": ["CALL", "POST"],
        "cells": [{"date": "2025-09-05", "shift": "CALL", "person": "KASS"}]
    }"#;
    let snapshot: RosterSnapshot = serde_json::from_str(json).unwrap();

    let roster = snapshot.into_roster().unwrap();

    assert!(roster.person(d(2025, 9, 5), &ShiftType::Call).is_some());
    assert_eq!(roster.person(d(2025, 9, 8), &ShiftType::Post), None);
}

#[test]
fn snapshot_with_weekend_cell_is_rejected() {
    let json = r#"{
        "month": {"year": 2025, "month": 9},
        "shifts": ["CALL"],
        "cells": [{"date": "2025-09-06", "shift": "CALL", "person": "KASS"}]
    }"#;
    let snapshot: RosterSnapshot = serde_json::from_str(json).unwrap();

    let err = snapshot.into_roster().unwrap_err();

    assert!(matches!(err, PersistenceError::Roster(_)));
}

#[test]
fn snapshot_with_invalid_month_fails_to_deserialize() {
    let json = r#"{"month": {"year": 2025, "month": 13}, "shifts": ["CALL"]}"#;
    assert!(serde_json::from_str::<RosterSnapshot>(json).is_err());
}

#[test]
fn tidy_csv_lists_one_row_per_assignment() {
    let roster = build_sample_roster();
    let parsed = parse_anchored(&roster.to_raw_grid(), roster.month());
    let schedule = TidySchedule::from_assignments(&parsed.assignments).unwrap();
    let tmp = NamedTempFile::new().unwrap();

    save_tidy_to_csv(&schedule, tmp.path()).unwrap();

    let text = std::fs::read_to_string(tmp.path()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "date,day,shift,person,is_holiday");
    assert_eq!(lines.len(), 1 + 3);
    assert!(lines.contains(&"2025-09-05,FRIDAY,CALL,KASS,false"));
    assert!(lines.contains(&"2025-09-08,MONDAY,POST,KASS,false"));
    assert!(lines.contains(&"2025-09-10,WEDNESDAY,CLINIC,LEE,false"));
}
