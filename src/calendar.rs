use crate::month::MonthKey;
use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkCalendar {
    non_working_days: HashSet<Weekday>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarError {
    NoWorkingDays,
}

impl fmt::Display for CalendarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalendarError::NoWorkingDays => {
                write!(f, "work calendar requires at least one working day")
            }
        }
    }
}

impl std::error::Error for CalendarError {}

impl Default for WorkCalendar {
    fn default() -> Self {
        Self::weekdays_only()
    }
}

impl WorkCalendar {
    const ALL_WEEKDAYS: [Weekday; 7] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];

    /// Monday through Friday.
    pub fn weekdays_only() -> Self {
        Self {
            non_working_days: HashSet::from([Weekday::Sat, Weekday::Sun]),
        }
    }

    pub fn with_working_days<I>(working_days: I) -> Result<Self, CalendarError>
    where
        I: IntoIterator<Item = Weekday>,
    {
        let working: HashSet<Weekday> = working_days.into_iter().collect();
        if working.is_empty() {
            return Err(CalendarError::NoWorkingDays);
        }
        let non_working_days = Self::ALL_WEEKDAYS
            .into_iter()
            .filter(|day| !working.contains(day))
            .collect();
        Ok(Self { non_working_days })
    }

    /// Working weekdays, Monday first.
    pub fn working_weekdays(&self) -> Vec<Weekday> {
        Self::ALL_WEEKDAYS
            .into_iter()
            .filter(|day| !self.non_working_days.contains(day))
            .collect()
    }

    pub fn is_business_day(&self, date: NaiveDate) -> bool {
        !self.non_working_days.contains(&date.weekday())
    }

    /// Step forward one day at a time until a business day is reached.
    /// `None` when the search runs past the last representable date.
    pub fn next_business_day(&self, from: NaiveDate) -> Option<NaiveDate> {
        let mut current = from.succ_opt()?;
        // a week always contains a working day, so this terminates
        while !self.is_business_day(current) {
            current = current.succ_opt()?;
        }
        Some(current)
    }

    /// Get all business days in a date range (inclusive)
    pub fn business_days_in_range(&self, start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
        let mut days = Vec::new();
        let mut current = Some(start);

        while let Some(date) = current.filter(|date| *date <= end) {
            if self.is_business_day(date) {
                days.push(date);
            }
            current = date.succ_opt();
        }
        days
    }

    pub fn business_days_in_month(&self, month: MonthKey) -> Vec<NaiveDate> {
        self.business_days_in_range(month.first_day(), month.last_day())
    }
}
