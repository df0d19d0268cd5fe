//! Timetable spreadsheet import
//!
//! Stages, in the order they run:
//! `grid` (workbook decoding) -> `sheet` (shift selection) -> `structure`
//! (class header and day blocks) -> `row_processing` with `cell`
//! (lesson extraction) -> `database` (merge into storage).
//! `timetable_processor` composes them.

pub mod cell;
pub mod database;
pub mod error;
pub mod grid;
pub mod patterns;
pub mod row_processing;
pub mod sheet;
pub mod structure;
pub mod timetable_processor;

pub use database::SeaOrmScheduleStore;
pub use error::ImportError;
pub use timetable_processor::{ImportResult, ParsedTimetable, TimetableProcessor};
