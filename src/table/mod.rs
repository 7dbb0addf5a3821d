//! # Scan-Position Tables
//!
//! The acquisition software exports one row per acquired image with its well,
//! stage position and filter pair. [`ScanTable`] reads that export and puts
//! the six columns every consumer relies on first, in [`REQUIRED_COLUMNS`]
//! order. Any other columns follow in the order the file declared them.
//! Cell text is kept verbatim; only column order changes.
//!
//! A filtered view can be re-exported in the same delimited format with
//! [`ScanTable::write_csv`].

mod error;

#[cfg(test)]
mod tests;

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use log::debug;

pub use error::TableError;

/// Columns that must be present, in their canonical output order.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    "ImageFileName",
    "Well",
    "PositionXUm",
    "PositionYUm",
    "PositionZUm",
    "ExcitationEmissionFilter",
];

/// Value type inferred for a column from all of its non-empty cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Every non-empty cell parses as an integer
    Integer,
    /// Every non-empty cell parses as a floating point number
    Float,
    /// Anything else, including dates
    Text,
}

impl ColumnKind {
    fn infer<'a>(cells: impl Iterator<Item = &'a str>) -> Self {
        let mut kind = ColumnKind::Integer;
        for cell in cells.map(str::trim).filter(|c| !c.is_empty()) {
            if kind == ColumnKind::Integer && cell.parse::<i64>().is_err() {
                kind = ColumnKind::Float;
            }
            if kind == ColumnKind::Float && cell.parse::<f64>().is_err() {
                return ColumnKind::Text;
            }
        }
        kind
    }

    fn cells_equal(self, a: &str, b: &str) -> bool {
        match self {
            ColumnKind::Text => a == b,
            ColumnKind::Integer | ColumnKind::Float => {
                match (a.trim().parse::<f64>(), b.trim().parse::<f64>()) {
                    (Ok(x), Ok(y)) => x == y,
                    _ => a.trim() == b.trim(),
                }
            }
        }
    }
}

/// A scan-position table with canonical column order.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl ScanTable {
    /// Read a comma-separated table from a file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, TableError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Read a comma-separated table held in memory.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TableError> {
        Self::from_reader(bytes)
    }

    /// Read a comma-separated table with a header row.
    ///
    /// Fails with [`TableError::MissingColumns`] if any of
    /// [`REQUIRED_COLUMNS`] is absent; no partial table is returned.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, TableError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader.headers()?.iter().map(str::to_string).collect();
        let order = canonical_order(&headers)?;

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            rows.push(order.iter().map(|&i| record[i].to_string()).collect());
        }

        let headers = order.iter().map(|&i| headers[i].clone()).collect();
        debug!("Read scan table: {} rows", rows.len());
        Ok(Self { headers, rows })
    }

    /// Column names in output order.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// All rows, cells aligned with [`ScanTable::headers`].
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of data rows.
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Position of a column by exact name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    fn require_column(&self, name: &str) -> Result<usize, TableError> {
        self.column_index(name)
            .ok_or_else(|| TableError::UnknownColumn(name.to_string()))
    }

    /// Cells of one column, top to bottom.
    pub fn column(&self, name: &str) -> Result<Vec<&str>, TableError> {
        let idx = self.require_column(name)?;
        Ok(self.rows.iter().map(|r| r[idx].as_str()).collect())
    }

    /// Inferred value type of a column.
    pub fn column_kind(&self, name: &str) -> Result<ColumnKind, TableError> {
        let idx = self.require_column(name)?;
        Ok(ColumnKind::infer(self.rows.iter().map(|r| r[idx].as_str())))
    }

    /// Distinct values of a column in order of first appearance.
    pub fn unique_values(&self, name: &str) -> Result<Vec<&str>, TableError> {
        let mut seen: Vec<&str> = Vec::new();
        for cell in self.column(name)? {
            if !seen.contains(&cell) {
                seen.push(cell);
            }
        }
        Ok(seen)
    }

    /// Rows whose `name` cell equals `value`, as a new table with the same
    /// columns.
    ///
    /// Numeric columns compare numerically, so `"1.0"` matches `"1"`.
    pub fn filter_eq(&self, name: &str, value: &str) -> Result<ScanTable, TableError> {
        let idx = self.require_column(name)?;
        let kind = self.column_kind(name)?;
        let rows = self
            .rows
            .iter()
            .filter(|r| kind.cells_equal(&r[idx], value))
            .cloned()
            .collect();
        Ok(ScanTable {
            headers: self.headers.clone(),
            rows,
        })
    }

    /// Write the table as comma-separated text with a header row.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), TableError> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(&self.headers)?;
        for row in &self.rows {
            csv_writer.write_record(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// The table as comma-separated bytes.
    pub fn to_csv_bytes(&self) -> Result<Vec<u8>, TableError> {
        let mut buf = Vec::new();
        self.write_csv(&mut buf)?;
        Ok(buf)
    }
}

/// Column permutation putting [`REQUIRED_COLUMNS`] first.
fn canonical_order(headers: &[String]) -> Result<Vec<usize>, TableError> {
    let mut order = Vec::with_capacity(headers.len());
    let mut missing = Vec::new();
    for name in REQUIRED_COLUMNS {
        match headers.iter().position(|h| h == name) {
            Some(i) => order.push(i),
            None => missing.push(name.to_string()),
        }
    }
    if !missing.is_empty() {
        return Err(TableError::MissingColumns(missing));
    }
    let extras: Vec<usize> = (0..headers.len()).filter(|i| !order.contains(i)).collect();
    order.extend(extras);
    Ok(order)
}

/// Default file name for an exported filtered view.
pub fn filtered_file_name(column: &str, value: &str) -> String {
    let clean = |s: &str| s.replace(['/', '\\'], "_");
    format!("filtered_{}_{}.csv", clean(column), clean(value))
}
