//! Roster ingestion
//!
//! Reads roster sheets, pulls out the `NAME`, `ADMNO`, `GRADE` and `STREAM`
//! columns and turns each row into an unprocessed [`StudentRecord`].
//! Loading is all-or-nothing: any unreadable file, absent sheet or missing
//! column fails the whole call and nothing is returned.

pub mod admission;
pub mod source;

pub use admission::{is_synthetic, normalize_admission_number, AdmissionNumberAllocator};
pub use source::{open_source, Cell, CsvSource, Table, TabularSource, WorkbookSource};

use crate::error::{GenerateError, Result};
use mealcard_common::StudentRecord;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Column headers every roster sheet must carry
pub const REQUIRED_COLUMNS: [&str; 4] = ["NAME", "ADMNO", "GRADE", "STREAM"];

/// A student read from a roster, with where it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    pub student: StudentRecord,
    /// Originating sheet (traceability only)
    pub sheet: String,
    /// 1-based row within the sheet, header being row 1
    pub row: usize,
}

/// Row values before synthetic admission numbers are assigned
struct PendingRow {
    sheet: String,
    row: usize,
    admission_number: String,
    name: String,
    grade: String,
    stream: String,
}

/// Column positions of the required fields in one sheet
struct ColumnMap {
    name: usize,
    admission_number: usize,
    grade: usize,
    stream: usize,
}

impl ColumnMap {
    fn locate(path: &Path, table: &Table) -> Result<Self> {
        let headers: Vec<String> = table
            .rows
            .first()
            .map(|row| row.iter().map(header_key).collect())
            .unwrap_or_default();

        let position = |column: &str| headers.iter().position(|h| h == column);

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|column| position(**column).is_none())
            .map(|column| column.to_string())
            .collect();

        match (
            position("NAME"),
            position("ADMNO"),
            position("GRADE"),
            position("STREAM"),
        ) {
            (Some(name), Some(admission_number), Some(grade), Some(stream)) => Ok(Self {
                name,
                admission_number,
                grade,
                stream,
            }),
            _ => Err(GenerateError::Schema {
                path: path.to_path_buf(),
                sheet: table.sheet.clone(),
                missing,
            }),
        }
    }
}

fn header_key(cell: &Cell) -> String {
    cell.to_text().to_ascii_uppercase()
}

fn cell_text(row: &[Cell], index: usize) -> String {
    row.get(index).map(Cell::to_text).unwrap_or_default()
}

/// Reads roster files into student records
#[derive(Debug, Clone, Default)]
pub struct RosterLoader {
    sheets: Vec<String>,
}

impl RosterLoader {
    /// `sheets` selects named sheets from every workbook; empty reads the first sheet
    pub fn new(sheets: Vec<String>) -> Self {
        Self { sheets }
    }

    /// Load every roster file, in order
    ///
    /// Blank admission numbers are filled from `allocator`, after every
    /// non-blank number in the batch has been reserved in it.
    pub fn load(
        &self,
        sources: &[PathBuf],
        allocator: &mut AdmissionNumberAllocator,
    ) -> Result<Vec<RosterEntry>> {
        let mut tables = Vec::new();
        for path in sources {
            let mut source = open_source(path)?;
            for table in self.read_tables(source.as_mut())? {
                tables.push((path.clone(), table));
            }
        }

        self.load_tables(tables, allocator)
    }

    /// Turn already-read sheets into roster entries
    pub fn load_tables(
        &self,
        tables: Vec<(PathBuf, Table)>,
        allocator: &mut AdmissionNumberAllocator,
    ) -> Result<Vec<RosterEntry>> {
        let mut pending = Vec::new();
        for (path, table) in &tables {
            let rows = extract_rows(path, table)?;
            debug!(
                "Sheet '{}' in {}: {} student row(s)",
                table.sheet,
                path.display(),
                rows.len()
            );
            pending.extend(rows);
        }

        allocator.reserve_all(
            pending
                .iter()
                .filter(|row| !row.admission_number.is_empty())
                .map(|row| row.admission_number.clone()),
        );

        let mut synthesized = 0usize;
        let entries: Vec<RosterEntry> = pending
            .into_iter()
            .map(|row| {
                let admission_number = if row.admission_number.is_empty() {
                    synthesized += 1;
                    let issued = allocator.allocate();
                    debug!(
                        "Sheet '{}' row {}: blank ADMNO, assigned {}",
                        row.sheet, row.row, issued
                    );
                    issued
                } else {
                    row.admission_number
                };

                RosterEntry {
                    student: StudentRecord::new(admission_number, row.name, row.grade, row.stream),
                    sheet: row.sheet,
                    row: row.row,
                }
            })
            .collect();

        info!(
            "Loaded {} student(s) from {} sheet(s) ({} synthetic admission number(s))",
            entries.len(),
            tables.len(),
            synthesized
        );

        Ok(entries)
    }

    fn read_tables(&self, source: &mut dyn TabularSource) -> Result<Vec<Table>> {
        let available = source.sheet_names();

        let wanted = if self.sheets.is_empty() || !source.has_named_sheets() {
            let first = available.first().cloned().ok_or_else(|| {
                GenerateError::source_read(source.path(), "workbook contains no sheets")
            })?;
            vec![first]
        } else {
            if let Some(absent) = self.sheets.iter().find(|s| !available.contains(s)) {
                return Err(GenerateError::source_read(
                    source.path(),
                    format!(
                        "sheet '{}' not found (available: {})",
                        absent,
                        available.join(", ")
                    ),
                ));
            }
            self.sheets.clone()
        };

        wanted.iter().map(|name| source.read_sheet(name)).collect()
    }
}

fn extract_rows(path: &Path, table: &Table) -> Result<Vec<PendingRow>> {
    let columns = ColumnMap::locate(path, table)?;

    Ok(table
        .rows
        .iter()
        .enumerate()
        .skip(1)
        .filter_map(|(index, row)| {
            let name = cell_text(row, columns.name);
            let admission_number =
                normalize_admission_number(&cell_text(row, columns.admission_number));
            let grade = cell_text(row, columns.grade);
            let stream = cell_text(row, columns.stream);

            if name.is_empty()
                && admission_number.is_empty()
                && grade.is_empty()
                && stream.is_empty()
            {
                return None;
            }

            Some(PendingRow {
                sheet: table.sheet.clone(),
                row: index + 1,
                admission_number,
                name,
                grade,
                stream,
            })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_row(values: &[&str]) -> Vec<Cell> {
        values.iter().map(|v| Cell::from(*v)).collect()
    }

    fn table(sheet: &str, rows: Vec<Vec<Cell>>) -> (PathBuf, Table) {
        (PathBuf::from("roster.xlsx"), Table::new(sheet, rows))
    }

    #[test]
    fn test_headers_matched_case_insensitively_in_any_order() {
        let tables = vec![table(
            "Sheet1",
            vec![
                text_row(&["stream", " Name ", "Grade", "AdmNo", "Phone"]),
                text_row(&["E", "Alice", "7", "ADM1", "0700"]),
            ],
        )];

        let entries = RosterLoader::default()
            .load_tables(tables, &mut AdmissionNumberAllocator::with_seed(1))
            .unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(
            entries[0].student,
            StudentRecord::new("ADM1", "Alice", "7", "E")
        );
        assert_eq!(entries[0].row, 2);
    }

    #[test]
    fn test_numeric_cells_are_normalised() {
        let tables = vec![table(
            "Sheet1",
            vec![
                text_row(&["NAME", "ADMNO", "GRADE", "STREAM"]),
                vec![
                    Cell::from("Brian"),
                    Cell::Float(1023.0),
                    Cell::Float(8.0),
                    Cell::from("W"),
                ],
                text_row(&["Carol", "2048.0", "8", "W"]),
            ],
        )];

        let entries = RosterLoader::default()
            .load_tables(tables, &mut AdmissionNumberAllocator::with_seed(1))
            .unwrap();

        assert_eq!(entries[0].student.admission_number, "1023");
        assert_eq!(entries[0].student.grade, "8");
        assert_eq!(entries[1].student.admission_number, "2048");
    }

    #[test]
    fn test_missing_columns_reported_per_sheet() {
        let tables = vec![
            table(
                "GRADE 7",
                vec![text_row(&["NAME", "ADMNO", "GRADE", "STREAM"])],
            ),
            table("GRADE 8", vec![text_row(&["NAME", "GRADE"])]),
        ];

        let err = RosterLoader::default()
            .load_tables(tables, &mut AdmissionNumberAllocator::with_seed(1))
            .unwrap_err();

        match err {
            GenerateError::Schema { sheet, missing, .. } => {
                assert_eq!(sheet, "GRADE 8");
                assert_eq!(missing, vec!["ADMNO", "STREAM"]);
            }
            other => panic!("expected schema error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_sheet_is_schema_error() {
        let tables = vec![table("Sheet1", vec![])];
        let result = RosterLoader::default()
            .load_tables(tables, &mut AdmissionNumberAllocator::with_seed(1));
        assert!(matches!(result, Err(GenerateError::Schema { .. })));
    }

    #[test]
    fn test_blank_rows_skipped() {
        let tables = vec![table(
            "Sheet1",
            vec![
                text_row(&["NAME", "ADMNO", "GRADE", "STREAM"]),
                text_row(&["Alice", "ADM1", "7", "E"]),
                text_row(&["", "", "", ""]),
                vec![],
            ],
        )];

        let entries = RosterLoader::default()
            .load_tables(tables, &mut AdmissionNumberAllocator::with_seed(1))
            .unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_blank_admission_number_gets_synthetic() {
        let tables = vec![table(
            "Sheet1",
            vec![
                text_row(&["NAME", "ADMNO", "GRADE", "STREAM"]),
                text_row(&["Dan", "", "6", "N"]),
            ],
        )];

        let entries = RosterLoader::default()
            .load_tables(tables, &mut AdmissionNumberAllocator::with_seed(1))
            .unwrap();
        assert!(is_synthetic(&entries[0].student.admission_number));
        assert_eq!(entries[0].student.name, "Dan");
    }

    #[test]
    fn test_sheets_concatenated_and_tagged() {
        let tables = vec![
            table(
                "GRADE 7",
                vec![
                    text_row(&["NAME", "ADMNO", "GRADE", "STREAM"]),
                    text_row(&["Alice", "ADM1", "7", "E"]),
                ],
            ),
            table(
                "GRADE 8",
                vec![
                    text_row(&["NAME", "ADMNO", "GRADE", "STREAM"]),
                    text_row(&["Brian", "ADM2", "8", "W"]),
                ],
            ),
        ];

        let entries = RosterLoader::default()
            .load_tables(tables, &mut AdmissionNumberAllocator::with_seed(1))
            .unwrap();

        let tags: Vec<(&str, &str)> = entries
            .iter()
            .map(|e| (e.sheet.as_str(), e.student.admission_number.as_str()))
            .collect();
        assert_eq!(tags, vec![("GRADE 7", "ADM1"), ("GRADE 8", "ADM2")]);
    }
}
