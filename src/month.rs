use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Calendar anchor for one monthly roster file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawMonthKey")]
pub struct MonthKey {
    year: i32,
    month: u32,
}

#[derive(Deserialize)]
struct RawMonthKey {
    year: i32,
    month: u32,
}

impl TryFrom<RawMonthKey> for MonthKey {
    type Error = MonthKeyError;

    fn try_from(raw: RawMonthKey) -> Result<Self, Self::Error> {
        MonthKey::new(raw.year, raw.month)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonthKeyError {
    InvalidMonth { year: i32, month: u32 },
    UnrecognizedStem(String),
}

impl fmt::Display for MonthKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthKeyError::InvalidMonth { year, month } => {
                write!(f, "{year}-{month:02} is not a valid calendar month")
            }
            MonthKeyError::UnrecognizedStem(stem) => write!(
                f,
                "file name '{stem}' does not encode a month (expected YYYY-MM or MMYY)"
            ),
        }
    }
}

impl std::error::Error for MonthKeyError {}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Result<Self, MonthKeyError> {
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(MonthKeyError::InvalidMonth { year, month });
        }
        Ok(Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        // validated in `new`
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn last_day(&self) -> NaiveDate {
        let next_first = if self.month == 12 {
            NaiveDate::from_ymd_opt(self.year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(self.year, self.month + 1, 1)
        };
        next_first
            .map(|d| d - Duration::days(1))
            .unwrap_or(NaiveDate::MAX)
    }

    /// Parse a file stem such as `2025-07` or `0725`.
    pub fn from_file_stem(stem: &str) -> Result<Self, MonthKeyError> {
        let stem = stem.trim();
        let unrecognized = || MonthKeyError::UnrecognizedStem(stem.to_string());

        if let Some((year, month)) = stem.split_once('-') {
            if year.len() != 4 || !all_digits(year) || month.is_empty() || !all_digits(month) {
                return Err(unrecognized());
            }
            let year = year.parse::<i32>().map_err(|_| unrecognized())?;
            let month = month.parse::<u32>().map_err(|_| unrecognized())?;
            return Self::new(year, month);
        }

        if stem.len() == 4 && all_digits(stem) {
            let month = stem[..2].parse::<u32>().map_err(|_| unrecognized())?;
            let year = stem[2..].parse::<i32>().map_err(|_| unrecognized())?;
            return Self::new(2000 + year, month);
        }

        Err(unrecognized())
    }

    /// `YYYY-MM`, the name roster exports are written under.
    pub fn file_stem(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }

    pub fn mmyy(&self) -> String {
        format!("{:02}{:02}", self.month, self.year.rem_euclid(100))
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.file_stem())
    }
}

fn all_digits(s: &str) -> bool {
    s.chars().all(|c| c.is_ascii_digit())
}
