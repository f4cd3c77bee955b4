use crate::calendar::WorkCalendar;
use crate::derivation::{self, Derivation};
use crate::grid::RawGrid;
use crate::month::MonthKey;
use crate::parser::{HOLIDAY_MARKER, SHIFT_ROWS_PER_BLOCK, ShiftAssignment};
use crate::shift::{PersonId, ShiftType};
use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterCell {
    pub date: NaiveDate,
    pub shift: ShiftType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub person: Option<PersonId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterError {
    ShiftCount(usize),
    DuplicateShift(ShiftType),
    UnknownCell { date: NaiveDate, shift: ShiftType },
    /// An OFF cell naming HOLIDAY reads back as a holiday marker, not a person.
    HolidayMarker { date: NaiveDate },
}

impl fmt::Display for RosterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RosterError::ShiftCount(count) => write!(
                f,
                "a roster needs between 1 and {SHIFT_ROWS_PER_BLOCK} shift rows, got {count}"
            ),
            RosterError::DuplicateShift(shift) => write!(f, "shift {shift} listed twice"),
            RosterError::UnknownCell { date, shift } => {
                write!(f, "roster has no {shift} cell on {date}")
            }
            RosterError::HolidayMarker { date } => write!(
                f,
                "{HOLIDAY_MARKER} cannot be rostered as a person in the OFF row ({date})"
            ),
        }
    }
}

impl std::error::Error for RosterError {}

/// Editable `(date, shift) -> person` grid for the business days of one month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    month: MonthKey,
    shifts: Vec<ShiftType>,
    calendar: WorkCalendar,
    cells: BTreeMap<(NaiveDate, ShiftType), Option<PersonId>>,
}

impl Roster {
    pub fn default_shifts() -> Vec<ShiftType> {
        ShiftType::KNOWN.to_vec()
    }

    pub fn new(month: MonthKey) -> Self {
        let shifts = Self::default_shifts();
        Self::build(month, shifts)
    }

    pub fn with_shifts(month: MonthKey, shifts: Vec<ShiftType>) -> Result<Self, RosterError> {
        if shifts.is_empty() || shifts.len() > SHIFT_ROWS_PER_BLOCK {
            return Err(RosterError::ShiftCount(shifts.len()));
        }
        let mut seen = BTreeSet::new();
        for shift in &shifts {
            if !seen.insert(shift) {
                return Err(RosterError::DuplicateShift(shift.clone()));
            }
        }
        Ok(Self::build(month, shifts))
    }

    fn build(month: MonthKey, shifts: Vec<ShiftType>) -> Self {
        let calendar = WorkCalendar::weekdays_only();
        let mut cells = BTreeMap::new();
        for date in calendar.business_days_in_month(month) {
            for shift in &shifts {
                cells.insert((date, shift.clone()), None);
            }
        }
        Self {
            month,
            shifts,
            calendar,
            cells,
        }
    }

    pub fn month(&self) -> MonthKey {
        self.month
    }

    pub fn shifts(&self) -> &[ShiftType] {
        &self.shifts
    }

    pub fn calendar(&self) -> &WorkCalendar {
        &self.calendar
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.calendar.business_days_in_month(self.month)
    }

    pub fn covers(&self, date: NaiveDate) -> bool {
        self.calendar.is_business_day(date) && MonthKey::of(date) == self.month
    }

    pub fn contains(&self, date: NaiveDate, shift: &ShiftType) -> bool {
        self.cells.contains_key(&(date, shift.clone()))
    }

    pub fn person(&self, date: NaiveDate, shift: &ShiftType) -> Option<&PersonId> {
        self.cells
            .get(&(date, shift.clone()))
            .and_then(Option::as_ref)
    }

    pub fn cell(&self, date: NaiveDate, shift: &ShiftType) -> Option<RosterCell> {
        self.cells.get(&(date, shift.clone())).map(|person| RosterCell {
            date,
            shift: shift.clone(),
            person: person.clone(),
        })
    }

    /// All cells, date-major in shift-row order.
    pub fn cells(&self) -> Vec<RosterCell> {
        let mut out = Vec::with_capacity(self.cells.len());
        for date in self.dates() {
            for shift in &self.shifts {
                if let Some(cell) = self.cell(date, shift) {
                    out.push(cell);
                }
            }
        }
        out
    }

    /// Edit one cell. A CALL edit re-derives the POST cell of the next
    /// business day.
    pub fn assign(
        &mut self,
        date: NaiveDate,
        shift: &ShiftType,
        person: Option<PersonId>,
    ) -> Result<Option<Derivation>, RosterError> {
        self.set_cell(date, shift, person)?;
        if *shift == ShiftType::Call {
            return Ok(Some(derivation::apply_derivation(self, date)));
        }
        Ok(None)
    }

    pub fn clear(
        &mut self,
        date: NaiveDate,
        shift: &ShiftType,
    ) -> Result<Option<Derivation>, RosterError> {
        self.assign(date, shift, None)
    }

    /// Raw cell write without derivation.
    pub(crate) fn set_cell(
        &mut self,
        date: NaiveDate,
        shift: &ShiftType,
        person: Option<PersonId>,
    ) -> Result<(), RosterError> {
        let marks_holiday = person
            .as_ref()
            .is_some_and(|p| p.as_str() == HOLIDAY_MARKER);
        if *shift == ShiftType::Off && marks_holiday {
            return Err(RosterError::HolidayMarker { date });
        }
        match self.cells.get_mut(&(date, shift.clone())) {
            Some(slot) => {
                *slot = person;
                Ok(())
            }
            None => Err(RosterError::UnknownCell {
                date,
                shift: shift.clone(),
            }),
        }
    }

    /// Filled cells as tidy records, date-major in shift-row order.
    pub fn assignments(&self) -> Vec<ShiftAssignment> {
        self.cells()
            .into_iter()
            .filter_map(|cell| {
                let person = cell.person?;
                Some(ShiftAssignment {
                    date: cell.date,
                    day: weekday_label(cell.date.weekday()).to_string(),
                    shift: cell.shift,
                    person,
                    is_holiday: false,
                })
            })
            .collect()
    }

    /// Lay the roster out as weekly blocks the schedule parser reads back.
    pub fn to_raw_grid(&self) -> RawGrid {
        let weekdays = self.calendar.working_weekdays();
        let mut rows: Vec<Vec<String>> = Vec::new();

        let mut header = vec!["SHIFT".to_string()];
        header.extend(weekdays.iter().map(|wd| weekday_label(*wd).to_string()));
        rows.push(header);

        let mut weeks: BTreeMap<NaiveDate, Vec<NaiveDate>> = BTreeMap::new();
        for date in self.dates() {
            let monday = date.week(Weekday::Mon).first_day();
            weeks.entry(monday).or_default().push(date);
        }

        for days in weeks.values() {
            let column_date = |wd: Weekday| days.iter().copied().find(|d| d.weekday() == wd);

            let mut date_row = vec!["DATE".to_string()];
            date_row.extend(
                weekdays
                    .iter()
                    .map(|wd| column_date(*wd).map(|d| d.day().to_string()).unwrap_or_default()),
            );
            rows.push(date_row);

            for shift in &self.shifts {
                let mut row = vec![shift.as_str().to_string()];
                row.extend(weekdays.iter().map(|wd| {
                    column_date(*wd)
                        .and_then(|d| self.person(d, shift))
                        .map(|p| p.as_str().to_string())
                        .unwrap_or_default()
                }));
                rows.push(row);
            }
            for _ in self.shifts.len()..SHIFT_ROWS_PER_BLOCK {
                rows.push(vec![String::new(); weekdays.len() + 1]);
            }
        }

        RawGrid::new(rows)
    }
}

pub fn weekday_label(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "MONDAY",
        Weekday::Tue => "TUESDAY",
        Weekday::Wed => "WEDNESDAY",
        Weekday::Thu => "THURSDAY",
        Weekday::Fri => "FRIDAY",
        Weekday::Sat => "SATURDAY",
        Weekday::Sun => "SUNDAY",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn july() -> MonthKey {
        MonthKey::new(2025, 7).unwrap()
    }

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, day).unwrap()
    }

    #[test]
    fn new_roster_has_empty_cell_per_business_day_and_shift() {
        let roster = Roster::new(july());
        assert_eq!(roster.cells().len(), 23 * 4);
        assert!(roster.cells().iter().all(|c| c.person.is_none()));
        assert!(roster.contains(d(1), &ShiftType::Call));
        assert!(!roster.contains(d(5), &ShiftType::Call), "Saturday is not rostered");
    }

    #[test]
    fn shift_list_is_validated() {
        assert_eq!(
            Roster::with_shifts(july(), Vec::new()),
            Err(RosterError::ShiftCount(0))
        );
        let too_many = (0..9)
            .map(|i| ShiftType::Other(format!("S{i}")))
            .collect::<Vec<_>>();
        assert_eq!(
            Roster::with_shifts(july(), too_many),
            Err(RosterError::ShiftCount(9))
        );
        assert_eq!(
            Roster::with_shifts(july(), vec![ShiftType::Call, ShiftType::Call]),
            Err(RosterError::DuplicateShift(ShiftType::Call))
        );
    }

    #[test]
    fn editing_unknown_cell_fails() {
        let mut roster = Roster::new(july());
        let err = roster
            .assign(d(5), &ShiftType::Off, PersonId::new("A").ok())
            .unwrap_err();
        assert_eq!(
            err,
            RosterError::UnknownCell {
                date: d(5),
                shift: ShiftType::Off
            }
        );
    }

    #[test]
    fn export_lays_out_weekly_blocks() {
        let mut roster = Roster::new(july());
        roster
            .assign(d(2), &ShiftType::Vacation, PersonId::new("kass").ok())
            .unwrap();
        let grid = roster.to_raw_grid();

        // header + 5 weeks (Jul 1-4, 7-11, 14-18, 21-25, 28-31) of 9 rows
        assert_eq!(grid.row_count(), 1 + 5 * 9);
        assert_eq!(grid.column_count(), 6);
        assert_eq!(grid.cell(0, 3), "WEDNESDAY");
        // first week starts on Tuesday the 1st
        assert_eq!(grid.cell(1, 0), "DATE");
        assert!(grid.is_blank(1, 1));
        assert_eq!(grid.cell(1, 2), "1");
        assert_eq!(grid.cell(5, 0), "VACATION");
        assert_eq!(grid.cell(5, 3), "KASS");
        // padding rows below the four shifts
        assert!(grid.is_blank(6, 0));
    }
}
