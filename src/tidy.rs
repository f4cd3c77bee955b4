use crate::parser::ShiftAssignment;
use crate::shift::{PersonId, ShiftType};
use chrono::{Duration, NaiveDate};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// One `(shift, person)` line of a date lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayEntry {
    pub shift: String,
    pub person: String,
    pub is_holiday: bool,
}

/// Combined tidy table: one row per person per shift per date, in emission
/// order. Duplicates across source files are kept.
#[derive(Debug, Clone)]
pub struct TidySchedule {
    df: DataFrame,
}

impl Default for TidySchedule {
    fn default() -> Self {
        Self::empty()
    }
}

impl TidySchedule {
    pub fn empty() -> Self {
        Self {
            df: DataFrame::empty_with_schema(&Self::default_schema()),
        }
    }

    pub fn default_schema() -> Schema {
        Schema::from_iter(vec![
            Field::new("date".into(), DataType::Date),
            Field::new("day".into(), DataType::String),
            Field::new("shift".into(), DataType::String),
            Field::new("person".into(), DataType::String),
            Field::new("is_holiday".into(), DataType::Boolean),
        ])
    }

    pub fn from_assignments(assignments: &[ShiftAssignment]) -> PolarsResult<Self> {
        if assignments.is_empty() {
            return Ok(Self::empty());
        }

        let dates: Vec<i32> = assignments.iter().map(|a| date_to_i32(a.date)).collect();
        let days: Vec<&str> = assignments.iter().map(|a| a.day.as_str()).collect();
        let shifts: Vec<&str> = assignments.iter().map(|a| a.shift.as_str()).collect();
        let people: Vec<&str> = assignments.iter().map(|a| a.person.as_str()).collect();
        let holidays: Vec<bool> = assignments.iter().map(|a| a.is_holiday).collect();

        let columns = vec![
            Series::new(PlSmallStr::from_static("date"), dates)
                .cast(&DataType::Date)?
                .into_column(),
            Series::new(PlSmallStr::from_static("day"), days).into_column(),
            Series::new(PlSmallStr::from_static("shift"), shifts).into_column(),
            Series::new(PlSmallStr::from_static("person"), people).into_column(),
            Series::new(PlSmallStr::from_static("is_holiday"), holidays).into_column(),
        ];
        Ok(Self {
            df: DataFrame::new(columns)?,
        })
    }

    /// Append another table below this one.
    pub fn append(&mut self, other: &TidySchedule) -> PolarsResult<()> {
        if other.is_empty() {
            return Ok(());
        }
        self.df = self.df.vstack(&other.df)?;
        Ok(())
    }

    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    pub fn height(&self) -> usize {
        self.df.height()
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    /// Entries for one date, in emission order.
    pub fn for_date(&self, date: NaiveDate) -> PolarsResult<Vec<DayEntry>> {
        if self.is_empty() {
            return Ok(Vec::new());
        }
        let filtered = self
            .df
            .clone()
            .lazy()
            .filter(col("date").eq(lit(date).cast(DataType::Date)))
            .select([col("shift"), col("person"), col("is_holiday")])
            .collect()?;

        let shifts = filtered.column("shift")?.str()?;
        let people = filtered.column("person")?.str()?;
        let holidays = filtered.column("is_holiday")?.bool()?;
        let mut entries = Vec::with_capacity(filtered.height());
        for idx in 0..filtered.height() {
            entries.push(DayEntry {
                shift: shifts.get(idx).unwrap_or_default().to_string(),
                person: people.get(idx).unwrap_or_default().to_string(),
                is_holiday: holidays.get(idx).unwrap_or(false),
            });
        }
        Ok(entries)
    }

    /// Distinct dates present, ascending.
    pub fn dates(&self) -> PolarsResult<Vec<NaiveDate>> {
        if self.is_empty() {
            return Ok(Vec::new());
        }
        let mut dates: Vec<NaiveDate> = self
            .df
            .column("date")?
            .date()?
            .into_iter()
            .flatten()
            .map(date_from_i32)
            .collect();
        dates.sort();
        dates.dedup();
        Ok(dates)
    }

    pub fn assignments(&self) -> PolarsResult<Vec<ShiftAssignment>> {
        let df = &self.df;
        let dates = df.column("date")?.date()?;
        let days = df.column("day")?.str()?;
        let shifts = df.column("shift")?.str()?;
        let people = df.column("person")?.str()?;
        let holidays = df.column("is_holiday")?.bool()?;

        let mut out = Vec::with_capacity(df.height());
        for idx in 0..df.height() {
            let date = dates
                .get(idx)
                .map(date_from_i32)
                .ok_or_else(|| PolarsError::ComputeError("tidy row missing date".into()))?;
            let shift = ShiftType::parse(shifts.get(idx).unwrap_or_default())
                .ok_or_else(|| PolarsError::ComputeError("tidy row missing shift".into()))?;
            let person = PersonId::new(people.get(idx).unwrap_or_default())
                .map_err(|err| PolarsError::ComputeError(err.to_string().into()))?;
            out.push(ShiftAssignment {
                date,
                day: days.get(idx).unwrap_or_default().to_string(),
                shift,
                person,
                is_holiday: holidays.get(idx).unwrap_or(false),
            });
        }
        Ok(out)
    }
}

/// Convert NaiveDate to Polars i32 date
fn date_to_i32(date: NaiveDate) -> i32 {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
    (date - epoch).num_days() as i32
}

fn date_from_i32(days: i32) -> NaiveDate {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
    epoch + Duration::days(days as i64)
}
