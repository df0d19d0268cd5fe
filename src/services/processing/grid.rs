//! Workbook loading and the in-memory cell grid
//!
//! The grid is anchored at A1 whatever range calamine reports, so column
//! indices found by the locators are stable spreadsheet columns.

use calamine::{Data, Range, Reader, Sheets, open_workbook_auto_from_rs};
use std::io::Cursor;

use super::error::ImportError;

/// Immutable 2-D view of one worksheet as trimmed, non-empty text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellGrid {
    rows: Vec<Vec<Option<String>>>,
    width: usize,
}

impl CellGrid {
    /// Builds a grid from raw rows, padding short rows to the widest one
    pub fn from_rows(rows: Vec<Vec<Option<String>>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, None);
                row.into_iter()
                    .map(|cell| cell.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()))
                    .collect()
            })
            .collect();
        Self { rows, width }
    }

    /// Converts a calamine range, shifting it so row 0 / column 0 is A1
    pub fn from_range(range: &Range<Data>) -> Self {
        let (row_offset, col_offset) = range
            .start()
            .map_or((0, 0), |(r, c)| (r as usize, c as usize));

        let mut rows = vec![Vec::new(); row_offset];
        for sheet_row in range.rows() {
            let mut row = vec![None; col_offset];
            row.extend(sheet_row.iter().map(cell_text));
            rows.push(row);
        }
        Self::from_rows(rows)
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col)?.as_deref()
    }

    pub fn row_is_empty(&self, row: usize) -> bool {
        self.rows
            .get(row)
            .is_none_or(|cells| cells.iter().all(Option::is_none))
    }

    #[cfg(test)]
    pub fn from_strs(rows: &[&[&str]]) -> Self {
        Self::from_rows(
            rows.iter()
                .map(|row| row.iter().map(|s| Some((*s).to_string())).collect())
                .collect(),
        )
    }
}

/// Text of a spreadsheet cell; whole floats lose their ".0"
pub fn cell_text(cell: &Data) -> Option<String> {
    let text = match cell {
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
                // Safe cast: whole number well inside i64 range
                #[allow(clippy::cast_possible_truncation)]
                let whole = *f as i64;
                whole.to_string()
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.as_f64().to_string(),
        Data::Error(_) | Data::Empty => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// An opened xlsx or xls workbook
pub struct Workbook {
    sheets: Sheets<Cursor<Vec<u8>>>,
}

impl Workbook {
    /// Detects the format from the bytes themselves, not from a file name
    pub fn open(file_data: Vec<u8>) -> Result<Self, ImportError> {
        let sheets = open_workbook_auto_from_rs(Cursor::new(file_data))?;
        Ok(Self { sheets })
    }

    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.sheet_names()
    }

    pub fn load_grid(&mut self, sheet_name: &str) -> Result<CellGrid, ImportError> {
        let range = self.sheets.worksheet_range(sheet_name)?;
        Ok(CellGrid::from_range(&range))
    }
}
