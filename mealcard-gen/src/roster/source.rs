//! Tabular roster sources
//!
//! Wraps the spreadsheet readers behind [`TabularSource`] so the loader only
//! sees sheets of [`Cell`] rows. Workbooks (xlsx, xlsm, xls, xlsb, ods) go
//! through calamine; `.csv` files through the csv crate as a single sheet
//! named after the file stem.

use crate::error::{GenerateError, Result};
use calamine::{open_workbook_auto, Data, Reader, Sheets};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// One spreadsheet cell, reduced to the types rosters actually contain
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Cell {
    /// Cell value as display text
    ///
    /// Whole floats print without a fractional part (`7.0` -> `7`) since
    /// numeric columns in workbooks are stored as floats.
    pub fn to_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.trim().to_string(),
            Cell::Int(i) => i.to_string(),
            Cell::Float(f) if !f.is_finite() => String::new(),
            Cell::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
            Cell::Float(f) => f.to_string(),
            Cell::Bool(true) => "TRUE".to_string(),
            Cell::Bool(false) => "FALSE".to_string(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.to_text().is_empty()
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(value.to_string())
        }
    }
}

impl From<&Data> for Cell {
    fn from(value: &Data) -> Self {
        match value {
            Data::Empty => Cell::Empty,
            Data::String(s) => Cell::from(s.as_str()),
            Data::Int(i) => Cell::Int(*i),
            Data::Float(f) => Cell::Float(*f),
            Data::Bool(b) => Cell::Bool(*b),
            other => Cell::Text(other.to_string()),
        }
    }
}

/// A sheet's cells, header row first
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub sheet: String,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(sheet: impl Into<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self {
            sheet: sheet.into(),
            rows,
        }
    }
}

/// A readable roster file
pub trait TabularSource {
    /// File this source reads from
    fn path(&self) -> &Path;

    /// Sheet names in workbook order
    fn sheet_names(&self) -> Vec<String>;

    /// Whether the file has named sheets that a configured list can select
    fn has_named_sheets(&self) -> bool;

    /// Read one sheet by name
    fn read_sheet(&mut self, name: &str) -> Result<Table>;
}

/// Open a roster file, picking the reader from the extension
pub fn open_source(path: &Path) -> Result<Box<dyn TabularSource>> {
    if !path.is_file() {
        return Err(GenerateError::source_read(path, "file not found"));
    }

    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));

    if is_csv {
        Ok(Box::new(CsvSource::open(path)?))
    } else {
        Ok(Box::new(WorkbookSource::open(path)?))
    }
}

/// Spreadsheet workbook read through calamine
pub struct WorkbookSource {
    path: PathBuf,
    workbook: Sheets<BufReader<File>>,
}

impl WorkbookSource {
    pub fn open(path: &Path) -> Result<Self> {
        let workbook = open_workbook_auto(path).map_err(|e| GenerateError::source_read(path, e))?;
        Ok(Self {
            path: path.to_path_buf(),
            workbook,
        })
    }
}

impl TabularSource for WorkbookSource {
    fn path(&self) -> &Path {
        &self.path
    }

    fn sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names()
    }

    fn has_named_sheets(&self) -> bool {
        true
    }

    fn read_sheet(&mut self, name: &str) -> Result<Table> {
        let range = match self.workbook.worksheet_range(name) {
            Ok(range) => range,
            Err(e) => {
                let reason = format!("sheet '{}': {}", name, e);
                return Err(GenerateError::source_read(&self.path, reason));
            }
        };

        let rows = range
            .rows()
            .map(|row| row.iter().map(Cell::from).collect())
            .collect();

        Ok(Table::new(name, rows))
    }
}

/// Comma-separated roster export, read eagerly as a single sheet
pub struct CsvSource {
    path: PathBuf,
    table: Table,
}

impl CsvSource {
    pub fn open(path: &Path) -> Result<Self> {
        let sheet = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "csv".to_string());

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|e| GenerateError::source_read(path, e))?;

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| GenerateError::source_read(path, e))?;
            rows.push(record.iter().map(Cell::from).collect());
        }

        Ok(Self {
            path: path.to_path_buf(),
            table: Table::new(sheet, rows),
        })
    }
}

impl TabularSource for CsvSource {
    fn path(&self) -> &Path {
        &self.path
    }

    fn sheet_names(&self) -> Vec<String> {
        vec![self.table.sheet.clone()]
    }

    fn has_named_sheets(&self) -> bool {
        false
    }

    fn read_sheet(&mut self, name: &str) -> Result<Table> {
        if name != self.table.sheet {
            return Err(GenerateError::source_read(
                &self.path,
                format!("sheet '{}' not found", name),
            ));
        }
        Ok(self.table.clone())
    }
}
