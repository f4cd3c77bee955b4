use super::{PersistenceError, PersistenceResult, RosterSnapshot, RosterStore};
use crate::month::MonthKey;
use crate::roster::{Roster, RosterCell};
use crate::shift::{PersonId, ShiftType};
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, params};
use std::sync::Mutex;

pub struct SqliteRosterStore {
    connection: Mutex<Connection>,
}

impl SqliteRosterStore {
    pub fn new<P: AsRef<std::path::Path>>(path: P) -> PersistenceResult<Self> {
        let connection = Connection::open(path)?;
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn initialize_schema(connection: &Connection) -> PersistenceResult<()> {
        let ddl = r#"
            CREATE TABLE IF NOT EXISTS roster_metadata (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                month_json TEXT NOT NULL,
                shifts_json TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS roster_cells (
                date TEXT NOT NULL,
                shift TEXT NOT NULL,
                person TEXT NOT NULL,
                PRIMARY KEY (date, shift)
            );
        "#;
        connection.execute_batch(ddl)?;
        Ok(())
    }

    fn save_metadata(
        &self,
        tx: &rusqlite::Transaction,
        snapshot: &RosterSnapshot,
    ) -> PersistenceResult<()> {
        let month_json = serde_json::to_string(&snapshot.month)?;
        let shifts_json = serde_json::to_string(&snapshot.shifts)?;
        tx.execute("DELETE FROM roster_metadata", [])?;
        tx.execute(
            "INSERT INTO roster_metadata (id, month_json, shifts_json) VALUES (1, ?1, ?2)",
            params![month_json, shifts_json],
        )?;
        Ok(())
    }

    fn save_cells(
        &self,
        tx: &rusqlite::Transaction,
        snapshot: &RosterSnapshot,
    ) -> PersistenceResult<()> {
        tx.execute("DELETE FROM roster_cells", [])?;
        let mut stmt =
            tx.prepare("INSERT INTO roster_cells (date, shift, person) VALUES (?1, ?2, ?3)")?;
        for cell in &snapshot.cells {
            let Some(person) = &cell.person else {
                continue;
            };
            stmt.execute(params![
                cell.date.format("%Y-%m-%d").to_string(),
                cell.shift.as_str(),
                person.as_str()
            ])?;
        }
        Ok(())
    }

    fn cell_from_row(date: &str, shift: &str, person: &str) -> PersistenceResult<RosterCell> {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|e| {
            PersistenceError::InvalidData(format!("invalid date '{date}': {e}"))
        })?;
        let shift = ShiftType::parse(shift)
            .ok_or_else(|| PersistenceError::InvalidData("blank shift label".into()))?;
        let person =
            PersonId::new(person).map_err(|e| PersistenceError::InvalidData(e.to_string()))?;
        Ok(RosterCell {
            date,
            shift,
            person: Some(person),
        })
    }
}

impl RosterStore for SqliteRosterStore {
    fn save_roster(&self, roster: &Roster) -> PersistenceResult<()> {
        let snapshot = RosterSnapshot::from_roster(roster);
        let mut conn = self.connection.lock().expect("sqlite mutex poisoned");
        let tx = conn.transaction()?;
        self.save_metadata(&tx, &snapshot)?;
        self.save_cells(&tx, &snapshot)?;
        tx.commit()?;
        Ok(())
    }

    fn load_roster(&self) -> PersistenceResult<Option<Roster>> {
        let conn = self.connection.lock().expect("sqlite mutex poisoned");

        let mut stmt =
            conn.prepare("SELECT month_json, shifts_json FROM roster_metadata WHERE id = 1")?;
        let metadata: Option<(String, String)> = stmt
            .query_row([], |row| Ok((row.get(0)?, row.get(1)?)))
            .optional()?;

        let Some((month_json, shifts_json)) = metadata else {
            return Ok(None);
        };
        let month: MonthKey = serde_json::from_str(&month_json)?;
        let shifts: Vec<ShiftType> = serde_json::from_str(&shifts_json)?;

        let mut stmt = conn.prepare("SELECT date, shift, person FROM roster_cells ORDER BY date")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;

        let mut cells = Vec::new();
        for row in rows {
            let (date, shift, person) = row?;
            cells.push(Self::cell_from_row(&date, &shift, &person)?);
        }

        let snapshot = RosterSnapshot {
            month,
            shifts,
            cells,
        };
        snapshot.into_roster().map(Some)
    }
}
