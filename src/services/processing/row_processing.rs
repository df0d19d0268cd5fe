//! Row-by-row lesson extraction for one day block
//!
//! Lesson numbers come from the lesson-number column when a row has one, and
//! are otherwise carried forward by a small counter state machine.

use std::collections::BTreeMap;

use super::cell::{adjacent_room, decompose};
use super::grid::CellGrid;
use super::patterns::{
    LESSON_NUMBER_COLUMN, MAX_LESSON_NUMBER, is_day_name, is_placeholder, match_class_name,
    parse_lesson_number,
};
use super::structure::{DayBlock, HeaderRow};
use crate::services::models::LessonRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterMode {
    /// Last number came from the lesson-number column
    Explicit,
    /// Number derived by counting rows that produced lessons
    Inferred,
}

/// Running lesson number for a day block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LessonCounter {
    pub mode: CounterMode,
    pub value: u8,
}

impl Default for LessonCounter {
    fn default() -> Self {
        Self {
            mode: CounterMode::Inferred,
            value: 1,
        }
    }
}

impl LessonCounter {
    /// Lesson number for the next row; an explicit number resets the counter
    pub fn begin_row(&mut self, explicit: Option<u8>) -> u8 {
        match explicit {
            Some(number) => {
                self.mode = CounterMode::Explicit;
                self.value = number;
            }
            None => self.mode = CounterMode::Inferred,
        }
        self.value
    }

    /// Advances past a row that produced lessons without an explicit number
    pub fn end_row(&mut self, emitted_lessons: bool) {
        if emitted_lessons && self.mode == CounterMode::Inferred {
            self.value = self.value.saturating_add(1);
        }
    }
}

/// Explicit lesson numbers of a block, by row
pub fn explicit_lesson_numbers(grid: &CellGrid, block: &DayBlock) -> BTreeMap<usize, u8> {
    (block.start_row..block.end_row)
        .filter_map(|row| {
            grid.cell(row, LESSON_NUMBER_COLUMN)
                .and_then(parse_lesson_number)
                .map(|number| (row, number))
        })
        .collect()
}

/// Extracts every lesson of one day block
pub fn extract(
    grid: &CellGrid,
    header: &HeaderRow,
    block: &DayBlock,
    shift: &str,
) -> Vec<LessonRecord> {
    let explicit = explicit_lesson_numbers(grid, block);
    let class_columns = header.columns.by_column();
    let mut counter = LessonCounter::default();
    let mut lessons = Vec::new();

    for row in block.start_row..block.end_row {
        if row == header.row || grid.row_is_empty(row) {
            continue;
        }

        let lesson_number = counter.begin_row(explicit.get(&row).copied());
        let mut emitted = false;

        for &(class_name, col) in &class_columns {
            let Some(text) = grid.cell(row, col) else {
                continue;
            };
            if is_placeholder(text) || is_day_name(text) || match_class_name(text).is_some() {
                continue;
            }

            let mut parts = decompose(text);
            if parts.subject.is_empty() {
                continue;
            }
            if lesson_number > MAX_LESSON_NUMBER {
                tracing::debug!(
                    "Skipping {class_name} '{text}' at row {row}: lesson {lesson_number} is past the last slot"
                );
                continue;
            }
            if parts.room.is_none() {
                parts.room = adjacent_room(grid, row, col, &header.columns);
            }

            lessons.push(LessonRecord {
                class_name: class_name.to_string(),
                day: block.day,
                lesson_number,
                subject: parts.subject,
                teacher: parts.teacher,
                room: parts.room,
                shift: shift.to_string(),
            });
            emitted = true;
        }

        counter.end_row(emitted);
    }

    tracing::debug!(
        "Extracted {} lessons for {} (rows {}..{})",
        lessons.len(),
        block.day,
        block.start_row,
        block.end_row
    );
    lessons
}
