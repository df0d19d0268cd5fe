//! Timetable layout discovery
//!
//! Finds the row naming the classes, the column of each class, and the row
//! range owned by each weekday. Nothing here assumes fixed row positions:
//! schools move headers around and put day labels wherever they fit.

use std::collections::BTreeMap;

use super::error::ImportError;
use super::grid::CellGrid;
use super::patterns::{
    DAY_SEARCH_COLUMNS, HEADER_SEARCH_ROWS, MIN_HEADER_CLASSES, match_class_name,
};
use crate::services::models::Day;

/// Class name -> column of that class on the sheet
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassColumnMap {
    columns: BTreeMap<String, usize>,
}

impl ClassColumnMap {
    /// Records a class column; a class already mapped keeps its first column
    pub fn insert(&mut self, class_name: String, col: usize) -> bool {
        if self.columns.contains_key(&class_name) {
            return false;
        }
        self.columns.insert(class_name, col);
        true
    }

    pub fn get(&self, class_name: &str) -> Option<usize> {
        self.columns.get(class_name).copied()
    }

    pub fn is_class_column(&self, col: usize) -> bool {
        self.columns.values().any(|&c| c == col)
    }

    /// Classes in left-to-right column order
    pub fn by_column(&self) -> Vec<(&str, usize)> {
        let mut entries: Vec<_> = self
            .columns
            .iter()
            .map(|(name, &col)| (name.as_str(), col))
            .collect();
        entries.sort_by_key(|&(_, col)| col);
        entries
    }

    pub fn class_names(&self) -> Vec<String> {
        self.columns.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// The header row and the classes it maps
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderRow {
    pub row: usize,
    pub columns: ClassColumnMap,
}

/// Rows `start_row..end_row` belong to `day`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayBlock {
    pub day: Day,
    pub start_row: usize,
    pub end_row: usize,
}

/// Finds the first row in the search window naming at least two classes
pub fn locate_header(grid: &CellGrid) -> Result<HeaderRow, ImportError> {
    let rows_scanned = grid.height().min(HEADER_SEARCH_ROWS);

    for row in 0..rows_scanned {
        let matches = (0..grid.width())
            .filter_map(|col| grid.cell(row, col))
            .filter(|text| match_class_name(text).is_some())
            .count();

        if matches >= MIN_HEADER_CLASSES {
            let columns = map_class_columns(grid, row);
            tracing::debug!("Class header at row {row} with {} classes", columns.len());
            return Ok(HeaderRow { row, columns });
        }
    }

    Err(ImportError::HeaderNotFound {
        rows_scanned,
        min_classes: MIN_HEADER_CLASSES,
    })
}

/// Maps every class named in `row` to its column, left-most column winning
pub fn map_class_columns(grid: &CellGrid, row: usize) -> ClassColumnMap {
    let mut columns = ClassColumnMap::default();

    for col in 0..grid.width() {
        let Some(class_name) = grid.cell(row, col).and_then(match_class_name) else {
            continue;
        };
        if !columns.insert(class_name.clone(), col) {
            tracing::debug!("Ignoring duplicate header for class {class_name} at column {col}");
        }
    }

    columns
}

/// Finds every weekday label and the row range each one owns
pub fn locate_days(grid: &CellGrid) -> Result<Vec<DayBlock>, ImportError> {
    let columns_scanned = grid.width().min(DAY_SEARCH_COLUMNS);

    let mut day_rows: Vec<(usize, Day)> = (0..grid.height())
        .filter_map(|row| {
            (0..columns_scanned)
                .filter_map(|col| grid.cell(row, col))
                .find_map(Day::find_in)
                .map(|day| (row, day))
        })
        .collect();

    if day_rows.is_empty() {
        return Err(ImportError::DayBlockNotFound {
            rows_scanned: grid.height(),
            columns_scanned,
        });
    }

    // Blocks follow the sheet's row order, never the calendar order of the names
    day_rows.sort_by_key(|&(row, _)| row);

    let blocks = day_rows
        .iter()
        .enumerate()
        .map(|(i, &(start_row, day))| DayBlock {
            day,
            start_row,
            end_row: day_rows
                .get(i + 1)
                .map_or(grid.height(), |&(next_row, _)| next_row),
        })
        .collect();

    Ok(blocks)
}
