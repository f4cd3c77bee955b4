use super::PersistenceResult;
use crate::month::MonthKey;
use crate::roster::{Roster, RosterCell};
use crate::shift::ShiftType;
use crate::tidy::TidySchedule;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

/// Serializable form of a roster: its month, shift rows, and filled cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterSnapshot {
    pub month: MonthKey,
    pub shifts: Vec<ShiftType>,
    #[serde(default)]
    pub cells: Vec<RosterCell>,
}

impl RosterSnapshot {
    pub fn from_roster(roster: &Roster) -> Self {
        Self {
            month: roster.month(),
            shifts: roster.shifts().to_vec(),
            cells: roster
                .cells()
                .into_iter()
                .filter(|cell| cell.person.is_some())
                .collect(),
        }
    }

    /// Rebuild the roster verbatim. Cells are restored as stored, without
    /// re-running the CALL/POST derivation.
    pub fn into_roster(self) -> PersistenceResult<Roster> {
        let mut roster = Roster::with_shifts(self.month, self.shifts)?;
        for cell in self.cells {
            roster.set_cell(cell.date, &cell.shift, cell.person)?;
        }
        Ok(roster)
    }
}

pub fn save_roster_to_json<P: AsRef<Path>>(roster: &Roster, path: P) -> PersistenceResult<()> {
    let snapshot = RosterSnapshot::from_roster(roster);
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, &snapshot)?;
    Ok(())
}

pub fn load_roster_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<Roster> {
    let file = File::open(path)?;
    let snapshot: RosterSnapshot = serde_json::from_reader(file)?;
    snapshot.into_roster()
}

/// Write the roster as a weekly-block grid the schedule loader can read.
pub fn export_roster_to_csv<P: AsRef<Path>>(roster: &Roster, path: P) -> PersistenceResult<()> {
    let file = File::create(path)?;
    roster.to_raw_grid().write_csv(file)?;
    Ok(())
}

#[derive(Serialize, Deserialize)]
struct TidyCsvRecord {
    date: String,
    day: String,
    shift: String,
    person: String,
    is_holiday: bool,
}

pub fn save_tidy_to_csv<P: AsRef<Path>>(schedule: &TidySchedule, path: P) -> PersistenceResult<()> {
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    for assignment in schedule.assignments()? {
        writer.serialize(TidyCsvRecord {
            date: assignment.date.format("%Y-%m-%d").to_string(),
            day: assignment.day,
            shift: assignment.shift.as_str().to_string(),
            person: assignment.person.as_str().to_string(),
            is_holiday: assignment.is_holiday,
        })?;
    }
    writer.flush()?;
    Ok(())
}
