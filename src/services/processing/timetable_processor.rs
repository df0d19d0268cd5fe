//! Timetable import pipeline
//!
//! Ties the stages together: workbook -> sheet -> class header -> day blocks
//! -> lessons -> merge into storage. Extraction is pure and synchronous;
//! only the merge touches the database.

use crate::common::models::ProcessingStatus;
use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use utoipa::ToSchema;

use super::{
    database::{MergeSummary, ScheduleStore, merge_lessons},
    error::ImportError,
    grid::Workbook,
    row_processing::extract,
    sheet::select_sheet,
    structure::{locate_days, locate_header},
};
use crate::services::models::LessonRecord;

/// Lessons read from one sheet of a workbook
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ParsedTimetable {
    pub sheet_name: String,
    pub classes: Vec<String>,
    pub lessons: Vec<LessonRecord>,
}

/// Runs every extraction stage over workbook bytes for one shift
pub fn parse_timetable(file_data: Vec<u8>, shift: &str) -> Result<ParsedTimetable, ImportError> {
    let mut workbook = Workbook::open(file_data)?;
    let sheet_names = workbook.sheet_names();

    let sheet_name = select_sheet(&sheet_names, shift)
        .ok_or_else(|| ImportError::SheetNotFound {
            shift: shift.to_string(),
        })?
        .to_string();
    tracing::debug!("Using sheet '{sheet_name}' for shift {shift}");

    let grid = workbook.load_grid(&sheet_name)?;
    let header = locate_header(&grid)?;
    let day_blocks = locate_days(&grid)?;
    tracing::debug!(
        "Sheet '{sheet_name}': {} classes, {} day blocks",
        header.columns.len(),
        day_blocks.len()
    );

    let lessons: Vec<LessonRecord> = day_blocks
        .iter()
        .flat_map(|block| extract(&grid, &header, block, shift))
        .collect();

    if lessons.is_empty() {
        return Err(ImportError::EmptyResult {
            classes: header.columns.len(),
            days: day_blocks.len(),
        });
    }

    let mut classes: Vec<String> = header
        .columns
        .class_names()
        .into_iter()
        .filter(|class| lessons.iter().any(|l| &l.class_name == class))
        .collect();
    classes.sort();

    Ok(ParsedTimetable {
        sheet_name,
        classes,
        lessons,
    })
}

/// Result of a timetable import
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ImportResult {
    pub status: ProcessingStatus,
    pub success: bool,
    pub shift: String,
    pub sheet_name: Option<String>,
    pub classes: Vec<String>,
    pub lessons_extracted: usize,
    pub lessons_persisted: usize,
    pub lessons_failed: usize,
    pub lessons_deleted: u64,
    /// Classes that kept their previous lessons because they could not be cleared
    pub classes_skipped: Vec<String>,
    pub processing_time_ms: u128,
    pub started_at: chrono::DateTime<Utc>,
    pub completed_at: Option<chrono::DateTime<Utc>>,
    pub failure_stage: Option<String>,
    pub error: Option<String>,
}

impl ImportResult {
    fn failed(
        shift: &str,
        started_at: chrono::DateTime<Utc>,
        start_time: Instant,
        stage: &str,
        error: String,
    ) -> Self {
        Self {
            status: ProcessingStatus::Failed,
            success: false,
            shift: shift.to_string(),
            sheet_name: None,
            classes: Vec::new(),
            lessons_extracted: 0,
            lessons_persisted: 0,
            lessons_failed: 0,
            lessons_deleted: 0,
            classes_skipped: Vec::new(),
            processing_time_ms: start_time.elapsed().as_millis(),
            started_at,
            completed_at: Some(Utc::now()),
            failure_stage: Some(stage.to_string()),
            error: Some(error),
        }
    }
}

/// Service for timetable import operations
#[derive(Clone)]
pub struct TimetableProcessor {
    store: Arc<dyn ScheduleStore>,
}

impl TimetableProcessor {
    pub fn new(store: Arc<dyn ScheduleStore>) -> Self {
        Self { store }
    }

    /// Extracts lessons without storing them
    pub async fn preview(
        &self,
        file_data: Vec<u8>,
        shift: &str,
    ) -> Result<Result<ParsedTimetable, ImportError>> {
        let shift = shift.to_string();
        // Workbook decoding is CPU bound; keep it off the async workers
        tokio::task::spawn_blocking(move || parse_timetable(file_data, &shift))
            .await
            .context("Timetable parsing task failed")
    }

    /// Imports a timetable for `shift`, replacing the lessons of every class it contains
    pub async fn import(&self, file_data: Vec<u8>, shift: &str) -> Result<ImportResult> {
        let started_at = Utc::now();
        let start_time = Instant::now();

        let parsed = match self.preview(file_data, shift).await? {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Timetable import for shift {shift} failed at {}: {e}", e.stage());
                return Ok(ImportResult::failed(
                    shift,
                    started_at,
                    start_time,
                    e.stage(),
                    e.to_string(),
                ));
            }
        };

        let summary: MergeSummary = merge_lessons(self.store.as_ref(), &parsed.lessons).await;

        Ok(ImportResult {
            status: ProcessingStatus::Completed,
            success: summary.lessons_failed == 0 && summary.classes_skipped.is_empty(),
            shift: shift.to_string(),
            sheet_name: Some(parsed.sheet_name),
            classes: parsed.classes,
            lessons_extracted: parsed.lessons.len(),
            lessons_persisted: summary.lessons_persisted,
            lessons_failed: summary.lessons_failed,
            lessons_deleted: summary.lessons_deleted,
            classes_skipped: summary.classes_skipped,
            processing_time_ms: start_time.elapsed().as_millis(),
            started_at,
            completed_at: Some(Utc::now()),
            failure_stage: None,
            error: None,
        })
    }
}
