//! Weekly-block spreadsheet to tidy records.
//!
//! The grid is read as repeating 9-row blocks starting below the weekday
//! header: one date row holding day-of-month numbers, followed by up to eight
//! shift rows whose first column names the shift and whose weekday columns
//! list the people on it.
//!
//! Holiday markers (`OFF` cells containing `HOLIDAY`) are collected over the
//! whole grid before any assignment is emitted, so every assignment on a
//! holiday date is tagged regardless of which block the marker sits in.

use crate::grid::RawGrid;
use crate::month::MonthKey;
use crate::shift::{PersonId, ShiftType};
use chrono::{Duration, NaiveDate};
use log::{debug, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

pub const BLOCK_ROWS: usize = 9;
pub const SHIFT_ROWS_PER_BLOCK: usize = BLOCK_ROWS - 1;
pub(crate) const HOLIDAY_MARKER: &str = "HOLIDAY";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftAssignment {
    pub date: NaiveDate,
    pub day: String,
    pub shift: ShiftType,
    pub person: PersonId,
    pub is_holiday: bool,
}

/// Problems the parser absorbs instead of failing the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ParseDiagnostic {
    MalformedDate {
        row: usize,
        column: usize,
        value: String,
    },
    UnrecognizedShift {
        row: usize,
        label: String,
    },
}

impl fmt::Display for ParseDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseDiagnostic::MalformedDate { row, column, value } => write!(
                f,
                "row {row}, column {column}: '{value}' is not a day of the month"
            ),
            ParseDiagnostic::UnrecognizedShift { row, label } => {
                write!(f, "row {row}: unrecognized shift '{label}'")
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedGrid {
    pub assignments: Vec<ShiftAssignment>,
    pub holidays: BTreeSet<NaiveDate>,
    pub diagnostics: Vec<ParseDiagnostic>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    MissingYear,
    MissingMonth,
    InvalidMonth { year: i32, month: u32 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingYear => write!(f, "base year must be provided"),
            ConfigError::MissingMonth => write!(f, "base month must be provided"),
            ConfigError::InvalidMonth { year, month } => {
                write!(f, "{year}-{month:02} is not a valid calendar anchor")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Parse a grid against an optional calendar anchor. The anchor is the only
/// thing that can fail the call.
pub fn parse(
    grid: &RawGrid,
    base_year: Option<i32>,
    base_month: Option<u32>,
) -> Result<ParsedGrid, ConfigError> {
    let year = base_year.ok_or(ConfigError::MissingYear)?;
    let month = base_month.ok_or(ConfigError::MissingMonth)?;
    let anchor =
        MonthKey::new(year, month).map_err(|_| ConfigError::InvalidMonth { year, month })?;
    Ok(parse_anchored(grid, anchor))
}

pub fn parse_anchored(grid: &RawGrid, anchor: MonthKey) -> ParsedGrid {
    let blocks = WeekBlock::collect(grid);
    let mut parsed = ParsedGrid::default();
    let cells = resolve_cells(grid, anchor.first_day(), &blocks, &mut parsed.diagnostics);

    for cell in &cells {
        if cell.marks_holiday() {
            parsed.holidays.insert(cell.date);
        }
    }

    for cell in cells {
        if cell.marks_holiday() {
            continue;
        }
        let is_holiday = parsed.holidays.contains(&cell.date);
        for person in cell.people {
            parsed.assignments.push(ShiftAssignment {
                date: cell.date,
                day: cell.day.clone(),
                shift: cell.shift.clone(),
                person,
                is_holiday,
            });
        }
    }

    debug!(
        "parsed {} grid: {} blocks, {} assignments, {} holidays, {} diagnostics",
        anchor,
        blocks.len(),
        parsed.assignments.len(),
        parsed.holidays.len(),
        parsed.diagnostics.len()
    );
    parsed
}

/// Parse independent monthly grids in parallel; results keep input order.
pub fn parse_many(sources: &[(MonthKey, RawGrid)]) -> Vec<ParsedGrid> {
    sources
        .par_iter()
        .map(|(anchor, grid)| parse_anchored(grid, *anchor))
        .collect()
}

/// Row range of one weekly block within the grid.
#[derive(Debug, Clone, Copy)]
struct WeekBlock {
    start: usize,
    end: usize,
}

impl WeekBlock {
    fn collect(grid: &RawGrid) -> Vec<WeekBlock> {
        let rows = grid.row_count();
        let mut blocks = Vec::new();
        let mut start = 1;
        while start < rows {
            let end = (start + BLOCK_ROWS).min(rows);
            // a block needs a date row and at least one shift row
            if end - start >= 2 {
                blocks.push(WeekBlock { start, end });
            }
            start += BLOCK_ROWS;
        }
        blocks
    }

    fn date_row(&self) -> usize {
        self.start
    }

    fn shift_rows(&self) -> std::ops::Range<usize> {
        self.start + 1..self.end
    }
}

struct ResolvedCell {
    date: NaiveDate,
    day: String,
    shift: ShiftType,
    people: Vec<PersonId>,
}

impl ResolvedCell {
    fn marks_holiday(&self) -> bool {
        self.shift == ShiftType::Off
            && self
                .people
                .iter()
                .any(|p| p.as_str().eq_ignore_ascii_case(HOLIDAY_MARKER))
    }
}

fn resolve_cells(
    grid: &RawGrid,
    base_date: NaiveDate,
    blocks: &[WeekBlock],
    diagnostics: &mut Vec<ParseDiagnostic>,
) -> Vec<ResolvedCell> {
    let day_labels = weekday_labels(grid);
    let mut cells = Vec::new();

    for block in blocks {
        let date_row = block.date_row();
        if (1..grid.column_count()).all(|col| grid.is_blank(date_row, col)) {
            continue;
        }

        for row in block.shift_rows() {
            let Some(shift) = ShiftType::parse(grid.cell(row, 0)) else {
                continue;
            };
            if !shift.is_recognized() {
                warn!("row {row}: unrecognized shift label '{shift}'");
                diagnostics.push(ParseDiagnostic::UnrecognizedShift {
                    row,
                    label: shift.as_str().to_string(),
                });
            }

            for (col, day) in day_labels.iter().enumerate().map(|(i, d)| (i + 1, d)) {
                if grid.is_blank(date_row, col) || grid.is_blank(row, col) {
                    continue;
                }
                let raw_date = grid.cell(date_row, col);
                let Some(date) = resolve_date(base_date, raw_date) else {
                    debug!("row {date_row}, column {col}: skipping malformed date '{raw_date}'");
                    diagnostics.push(ParseDiagnostic::MalformedDate {
                        row: date_row,
                        column: col,
                        value: raw_date.to_string(),
                    });
                    continue;
                };
                cells.push(ResolvedCell {
                    date,
                    day: day.clone(),
                    shift: shift.clone(),
                    people: PersonId::split_cell(grid.cell(row, col)),
                });
            }
        }
    }
    cells
}

fn weekday_labels(grid: &RawGrid) -> Vec<String> {
    (1..grid.column_count())
        .map(|col| {
            let label = grid.cell(0, col).trim().to_uppercase();
            if label.is_empty() {
                col.to_string()
            } else {
                label
            }
        })
        .collect()
}

/// `base_date + (day_number - 1)` days. Integral decimals such as `3.0` count
/// as day numbers since spreadsheet exports write them that way.
fn resolve_date(base_date: NaiveDate, raw: &str) -> Option<NaiveDate> {
    let day_number = parse_day_number(raw.trim())?;
    let offset = Duration::try_days(day_number.checked_sub(1)?)?;
    base_date.checked_add_signed(offset)
}

fn parse_day_number(raw: &str) -> Option<i64> {
    if let Ok(n) = raw.parse::<i64>() {
        return Some(n);
    }
    let value = raw.parse::<f64>().ok()?;
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e9 {
        Some(value as i64)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_numbers_accept_integral_decimals_only() {
        assert_eq!(parse_day_number("3"), Some(3));
        assert_eq!(parse_day_number("3.0"), Some(3));
        assert_eq!(parse_day_number("3.5"), None);
        assert_eq!(parse_day_number("x"), None);
        assert_eq!(parse_day_number("NaN"), None);
    }

    #[test]
    fn day_numbers_past_month_end_roll_forward() {
        let base = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
        assert_eq!(
            resolve_date(base, "29"),
            NaiveDate::from_ymd_opt(2025, 3, 1)
        );
    }

    #[test]
    fn blocks_start_below_header_and_drop_short_tail() {
        let rows: Vec<Vec<&str>> = (0..20).map(|_| vec!["x"]).collect();
        let grid = RawGrid::from_rows(rows);
        let blocks = WeekBlock::collect(&grid);
        // rows 1..10, 10..19; row 19 alone is discarded
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[1].start, 10);
        assert_eq!(blocks[1].end, 19);
    }
}
