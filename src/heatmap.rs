use crate::month::MonthKey;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeatmapError {
    InvalidKey(String),
    NotFound { expected: String },
}

impl fmt::Display for HeatmapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeatmapError::InvalidKey(key) => {
                write!(f, "'{key}' is not a month key (expected MMYY)")
            }
            HeatmapError::NotFound { expected } => {
                write!(f, "no heatmap found, expected file {expected}")
            }
        }
    }
}

impl std::error::Error for HeatmapError {}

pub fn heatmap_file_name(month: MonthKey) -> String {
    format!("heatmap{}.png", month.mmyy())
}

/// Resolve an `MMYY` key to `<dir>/heatmap<MMYY>.png`.
pub fn heatmap_path(dir: &Path, mmyy: &str) -> Result<PathBuf, HeatmapError> {
    let key = mmyy.trim();
    if key.len() != 4 {
        return Err(HeatmapError::InvalidKey(key.to_string()));
    }
    let month =
        MonthKey::from_file_stem(key).map_err(|_| HeatmapError::InvalidKey(key.to_string()))?;
    let file_name = heatmap_file_name(month);
    let path = dir.join(&file_name);
    if path.is_file() {
        Ok(path)
    } else {
        Err(HeatmapError::NotFound {
            expected: file_name,
        })
    }
}
