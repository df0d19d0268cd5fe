//! Persistence of imported lessons
//!
//! The importer only needs two operations from storage, expressed by
//! [`ScheduleStore`]. The merge replaces the lessons of every class present
//! in an import and leaves all other classes alone.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::schedule::models::{
    self as schedule, MAX_ROOM_LEN, MAX_SUBJECT_LEN, MAX_TEACHER_LEN, optional_field,
    truncate_chars,
};
use crate::services::models::LessonRecord;

/// Storage contract consumed by the merge
#[async_trait]
pub trait ScheduleStore: Send + Sync {
    /// Removes every lesson of `class_name`, on all days; returns how many
    async fn delete_lessons(&self, class_name: &str) -> Result<u64>;

    /// Inserts or overwrites the lesson at (class, day, lesson number)
    async fn upsert_lesson(&self, record: &LessonRecord) -> Result<()>;
}

/// [`ScheduleStore`] over the `schedule` table
#[derive(Clone)]
pub struct SeaOrmScheduleStore {
    db: DatabaseConnection,
}

impl SeaOrmScheduleStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ScheduleStore for SeaOrmScheduleStore {
    async fn delete_lessons(&self, class_name: &str) -> Result<u64> {
        let result = schedule::Entity::delete_many()
            .filter(schedule::Column::ClassName.eq(class_name))
            .exec(&self.db)
            .await
            .with_context(|| format!("Failed to clear lessons of class {class_name}"))?;
        Ok(result.rows_affected)
    }

    async fn upsert_lesson(&self, record: &LessonRecord) -> Result<()> {
        let now = Utc::now();
        let lesson = schedule::ActiveModel {
            id: Set(Uuid::new_v4()),
            class_name: Set(record.class_name.clone()),
            day: Set(record.day.code().to_string()),
            lesson_number: Set(i32::from(record.lesson_number)),
            subject: Set(truncate_chars(&record.subject, MAX_SUBJECT_LEN)),
            teacher: Set(optional_field(record.teacher.as_deref(), MAX_TEACHER_LEN)),
            room: Set(optional_field(record.room.as_deref(), MAX_ROOM_LEN)),
            shift: Set(Some(record.shift.clone())),
            created_at: Set(now),
            last_updated: Set(now),
        };

        schedule::Entity::insert(lesson)
            .on_conflict(
                OnConflict::columns([
                    schedule::Column::ClassName,
                    schedule::Column::Day,
                    schedule::Column::LessonNumber,
                ])
                .update_columns([
                    schedule::Column::Subject,
                    schedule::Column::Teacher,
                    schedule::Column::Room,
                    schedule::Column::Shift,
                    schedule::Column::LastUpdated,
                ])
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .context("Failed to upsert lesson")?;
        Ok(())
    }
}

/// Outcome of merging one import into storage
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MergeSummary {
    pub classes_replaced: Vec<String>,
    /// Classes whose stored lessons could not be cleared; they keep their old timetable
    pub classes_skipped: Vec<String>,
    pub lessons_deleted: u64,
    pub lessons_persisted: usize,
    pub lessons_failed: usize,
}

/// Replaces the stored lessons of every class present in `records`.
///
/// Classes are merged one at a time: the class is cleared, then its records
/// are upserted in import order, so a later record for the same slot wins.
/// A failed upsert is logged and counted. A class that cannot be cleared is
/// skipped whole and keeps its previous lessons; the other classes still merge.
pub async fn merge_lessons(store: &dyn ScheduleStore, records: &[LessonRecord]) -> MergeSummary {
    let mut by_class: BTreeMap<&str, Vec<&LessonRecord>> = BTreeMap::new();
    for record in records {
        by_class
            .entry(record.class_name.as_str())
            .or_default()
            .push(record);
    }

    let mut summary = MergeSummary::default();

    for (class_name, lessons) in by_class {
        match store.delete_lessons(class_name).await {
            Ok(deleted) => {
                tracing::debug!(
                    "Cleared {deleted} stored lessons of {class_name} before importing {}",
                    lessons.len()
                );
                summary.lessons_deleted += deleted;
                summary.classes_replaced.push(class_name.to_string());
            }
            Err(e) => {
                tracing::warn!(
                    "Keeping the stored timetable of {class_name}, clearing it failed: {e:#}"
                );
                summary.lessons_failed += lessons.len();
                summary.classes_skipped.push(class_name.to_string());
                continue;
            }
        }

        for record in lessons {
            match store.upsert_lesson(record).await {
                Ok(()) => summary.lessons_persisted += 1,
                Err(e) => {
                    tracing::warn!("Failed to store lesson {record:?}: {e:#}");
                    summary.lessons_failed += 1;
                }
            }
        }
    }

    tracing::info!(
        "Merged {} lessons for {} classes ({} failed, {} classes skipped, {} old lessons removed)",
        summary.lessons_persisted,
        summary.classes_replaced.len(),
        summary.lessons_failed,
        summary.classes_skipped.len(),
        summary.lessons_deleted
    );
    summary
}
