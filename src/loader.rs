//! Loading a directory of monthly roster files into one tidy schedule.

use crate::grid::RawGrid;
use crate::month::{MonthKey, MonthKeyError};
use crate::parser::{self, ParseDiagnostic};
use crate::tidy::TidySchedule;
use log::{info, warn};
use polars::prelude::PolarsError;
use rayon::prelude::*;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum SourceReadError {
    Io(io::Error),
    Csv(csv::Error),
    FileName(MonthKeyError),
    DataFrame(PolarsError),
}

impl fmt::Display for SourceReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceReadError::Io(err) => write!(f, "io error: {err}"),
            SourceReadError::Csv(err) => write!(f, "csv error: {err}"),
            SourceReadError::FileName(err) => write!(f, "{err}"),
            SourceReadError::DataFrame(err) => write!(f, "dataframe conversion error: {err}"),
        }
    }
}

impl std::error::Error for SourceReadError {}

impl From<io::Error> for SourceReadError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<csv::Error> for SourceReadError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

impl From<MonthKeyError> for SourceReadError {
    fn from(value: MonthKeyError) -> Self {
        Self::FileName(value)
    }
}

impl From<PolarsError> for SourceReadError {
    fn from(value: PolarsError) -> Self {
        Self::DataFrame(value)
    }
}

#[derive(Debug)]
pub struct SourceFailure {
    pub path: PathBuf,
    pub error: SourceReadError,
}

#[derive(Debug, Default)]
pub struct LoadReport {
    pub schedule: TidySchedule,
    pub loaded: Vec<(PathBuf, MonthKey)>,
    pub failures: Vec<SourceFailure>,
    pub diagnostics: Vec<(PathBuf, ParseDiagnostic)>,
}

/// Monthly files in `dir` (`*.csv`), sorted by file name.
pub fn discover_sources(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if path.is_file() && is_csv {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

pub fn read_source(path: &Path) -> Result<(MonthKey, RawGrid), SourceReadError> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    let month = MonthKey::from_file_stem(stem)?;
    let grid = RawGrid::from_csv_path(path)?;
    Ok((month, grid))
}

/// Read, parse, and combine every monthly file in `dir`. A bad file is
/// reported and skipped; only an unreadable directory fails the call.
pub fn load_schedule_dir(dir: &Path) -> Result<LoadReport, SourceReadError> {
    let paths = discover_sources(dir)?;

    let reads: Vec<(PathBuf, Result<(MonthKey, RawGrid), SourceReadError>)> = paths
        .into_par_iter()
        .map(|path| {
            let read = read_source(&path);
            (path, read)
        })
        .collect();

    let mut report = LoadReport::default();
    let mut sources = Vec::new();
    let mut source_paths = Vec::new();
    for (path, read) in reads {
        match read {
            Ok(source) => {
                source_paths.push(path);
                sources.push(source);
            }
            Err(error) => {
                warn!("skipping {}: {error}", path.display());
                report.failures.push(SourceFailure { path, error });
            }
        }
    }

    let parsed = parser::parse_many(&sources);
    for ((path, (month, _)), grid) in source_paths.into_iter().zip(sources).zip(parsed) {
        match TidySchedule::from_assignments(&grid.assignments) {
            Ok(table) => report.schedule.append(&table)?,
            Err(err) => {
                warn!("skipping {}: {err}", path.display());
                report.failures.push(SourceFailure {
                    path,
                    error: err.into(),
                });
                continue;
            }
        }
        report.diagnostics.extend(
            grid.diagnostics
                .into_iter()
                .map(|diagnostic| (path.clone(), diagnostic)),
        );
        report.loaded.push((path, month));
    }

    info!(
        "loaded {} schedule files from {} ({} records, {} failures)",
        report.loaded.len(),
        dir.display(),
        report.schedule.height(),
        report.failures.len()
    );
    Ok(report)
}
