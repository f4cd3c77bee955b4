#![cfg(feature = "sqlite")]

use chrono::NaiveDate;
use roster_tool::{MonthKey, PersonId, Roster, RosterStore, ShiftType, SqliteRosterStore};
use tempfile::NamedTempFile;

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn sqlite_store_round_trip_roster() {
    let file = NamedTempFile::new().unwrap();
    let store = SqliteRosterStore::new(file.path()).unwrap();

    let mut roster = Roster::new(MonthKey::new(2025, 7).unwrap());
    roster
        .assign(d(2025, 7, 3), &ShiftType::Call, PersonId::new("kass").ok())
        .expect("assign call");
    roster
        .assign(d(2025, 7, 21), &ShiftType::Vacation, PersonId::new("lee").ok())
        .expect("assign vacation");

    store.save_roster(&roster).expect("save roster");
    let loaded = store
        .load_roster()
        .expect("load roster")
        .expect("roster present");

    assert_eq!(loaded, roster);
    assert_eq!(
        loaded.person(d(2025, 7, 4), &ShiftType::Post).map(|p| p.as_str()),
        Some("KASS")
    );
}

#[test]
fn empty_store_has_no_roster() {
    let file = NamedTempFile::new().unwrap();
    let store = SqliteRosterStore::new(file.path()).unwrap();

    assert!(store.load_roster().unwrap().is_none());
}

#[test]
fn saving_replaces_previous_roster() {
    let file = NamedTempFile::new().unwrap();
    let store = SqliteRosterStore::new(file.path()).unwrap();

    let mut july = Roster::new(MonthKey::new(2025, 7).unwrap());
    july.assign(d(2025, 7, 1), &ShiftType::Off, PersonId::new("a").ok())
        .unwrap();
    store.save_roster(&july).unwrap();

    let august = Roster::with_shifts(
        MonthKey::new(2025, 8).unwrap(),
        vec![ShiftType::Call, ShiftType::Post],
    )
    .unwrap();
    store.save_roster(&august).unwrap();

    let loaded = store.load_roster().unwrap().unwrap();
    assert_eq!(loaded, august);
    assert!(loaded.assignments().is_empty());
}
