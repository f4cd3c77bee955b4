//! Raw spreadsheet grid as handed to the schedule parser.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// Rectangular grid of free-text cells. Row 0 is the weekday header, column 0
/// holds row labels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawGrid {
    rows: Vec<Vec<String>>,
    width: usize,
}

impl RawGrid {
    /// Build a grid, padding short rows with empty cells.
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Self { rows, width }
    }

    pub fn from_rows<R, C>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self::new(
            rows.into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        )
    }

    /// Read a headerless CSV; records may have differing lengths.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, csv::Error> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(ToOwned::to_owned).collect());
        }
        Ok(Self::new(rows))
    }

    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self, csv::Error> {
        let file = File::open(path)?;
        Self::from_csv_reader(file)
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn to_csv_string(&self) -> Result<String, csv::Error> {
        let mut buffer = Vec::new();
        self.write_csv(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.width
    }

    /// Cell text, or the empty string outside the grid.
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn is_blank(&self, row: usize, column: usize) -> bool {
        self.cell(row, column).trim().is_empty()
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_rows_are_padded() {
        let grid = RawGrid::from_rows([vec!["a", "b", "c"], vec!["d"]]);
        assert_eq!(grid.column_count(), 3);
        assert_eq!(grid.rows()[1], vec!["d", "", ""]);
        assert!(grid.is_blank(1, 2));
        assert_eq!(grid.cell(9, 9), "");
    }

    #[test]
    fn csv_reader_accepts_ragged_records() {
        let data = "SHIFT,MONDAY,TUESDAY\nDATE,1\nCALL,\"A, B\",C\n";
        let grid = RawGrid::from_csv_reader(data.as_bytes()).unwrap();
        assert_eq!(grid.row_count(), 3);
        assert_eq!(grid.cell(1, 1), "1");
        assert!(grid.is_blank(1, 2));
        assert_eq!(grid.cell(2, 1), "A, B");
    }

    #[test]
    fn csv_output_quotes_multi_person_cells() {
        let grid = RawGrid::from_rows([vec!["CALL", "A, B"]]);
        assert_eq!(grid.to_csv_string().unwrap(), "CALL,\"A, B\"\n");
    }
}
