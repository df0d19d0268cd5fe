use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::models::{
    self as schedule, DaySchedule, Lesson, MAX_ROOM_LEN, MAX_SUBJECT_LEN, MAX_TEACHER_LEN,
    optional_field, truncate_chars,
};
use crate::services::models::Day;
use crate::services::processing::patterns::MAX_LESSON_NUMBER;

/// Body that empties a day instead of listing lessons
pub const CLEAR_DAY_MARKER: &str = "-";

/// One line of a hand-typed day schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ManualLesson {
    pub lesson_number: u8,
    pub subject: String,
    pub teacher: Option<String>,
    pub room: Option<String>,
}

/// Parses a day typed as `"N. Subject (Teacher) - Room"` lines.
///
/// Lines that do not start with a lesson number followed by `.` are skipped,
/// as are numbers outside `1..=10` and lines left without a subject.
pub fn parse_manual_schedule(text: &str) -> Vec<ManualLesson> {
    if text.trim() == CLEAR_DAY_MARKER {
        return Vec::new();
    }
    text.lines().filter_map(parse_manual_line).collect()
}

fn parse_manual_line(line: &str) -> Option<ManualLesson> {
    let line = line.trim();
    if !line.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }

    let (number, info) = line.split_once('.')?;
    let lesson_number: u8 = number.trim().parse().ok()?;
    if !(1..=MAX_LESSON_NUMBER).contains(&lesson_number) {
        tracing::debug!("Ignoring manual lesson {lesson_number}: outside 1..={MAX_LESSON_NUMBER}");
        return None;
    }

    let info = info.trim();
    let (subject, teacher, rest) = match (info.find('('), info.find(')')) {
        (Some(open), Some(close)) if open < close => (
            info[..open].trim(),
            Some(info[open + 1..close].trim()),
            info[close + 1..].trim(),
        ),
        _ => ("", None, info),
    };

    // After a teacher the separator can open the remainder: "(Иванов) - 201"
    let room_split = rest
        .split_once(" - ")
        .or_else(|| rest.strip_prefix('-').map(|room| ("", room)));
    let (subject, room) = match room_split {
        Some((left, room)) => {
            let subject = if subject.is_empty() { left.trim() } else { subject };
            (subject, Some(room.trim()))
        }
        None if subject.is_empty() => (rest, None),
        None => (subject, None),
    };

    if subject.is_empty() {
        return None;
    }

    Some(ManualLesson {
        lesson_number,
        subject: subject.to_string(),
        teacher: teacher.filter(|t| !t.is_empty()).map(str::to_string),
        room: room.filter(|r| !r.is_empty()).map(str::to_string),
    })
}

/// Replaces every lesson of `class_name` on `day` with `lessons`, atomically
pub async fn replace_day(
    db: &DatabaseConnection,
    class_name: &str,
    day: Day,
    lessons: &[ManualLesson],
) -> Result<u64, DbErr> {
    let txn = db.begin().await?;

    let deleted = schedule::Entity::delete_many()
        .filter(schedule::Column::ClassName.eq(class_name))
        .filter(schedule::Column::Day.eq(day.code()))
        .exec(&txn)
        .await?
        .rows_affected;

    let now = Utc::now();
    for lesson in lessons {
        let model = schedule::ActiveModel {
            id: Set(Uuid::new_v4()),
            class_name: Set(class_name.to_string()),
            day: Set(day.code().to_string()),
            lesson_number: Set(i32::from(lesson.lesson_number)),
            subject: Set(truncate_chars(&lesson.subject, MAX_SUBJECT_LEN)),
            teacher: Set(optional_field(lesson.teacher.as_deref(), MAX_TEACHER_LEN)),
            room: Set(optional_field(lesson.room.as_deref(), MAX_ROOM_LEN)),
            shift: Set(None),
            created_at: Set(now),
            last_updated: Set(now),
        };
        // A number repeated in the text overwrites its earlier line
        schedule::Entity::insert(model)
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
                    schedule::Column::LastUpdated,
                ])
                .to_owned(),
            )
            .exec_without_returning(&txn)
            .await?;
    }

    txn.commit().await?;
    tracing::info!(
        "Manual edit of {class_name} on {day}: {deleted} lessons replaced by {}",
        lessons.len()
    );
    Ok(deleted)
}

pub async fn get_day(
    db: &DatabaseConnection,
    class_name: &str,
    day: Day,
) -> Result<DaySchedule, DbErr> {
    let lessons = schedule::Entity::find()
        .filter(schedule::Column::ClassName.eq(class_name))
        .filter(schedule::Column::Day.eq(day.code()))
        .order_by_asc(schedule::Column::LessonNumber)
        .all(db)
        .await?;

    Ok(DaySchedule {
        class_name: class_name.to_string(),
        day,
        lessons: lessons.into_iter().map(Lesson::from).collect(),
    })
}

/// All six school days of one class, Monday first; days without lessons are empty
pub async fn get_week(db: &DatabaseConnection, class_name: &str) -> Result<Vec<DaySchedule>, DbErr> {
    let models = schedule::Entity::find()
        .filter(schedule::Column::ClassName.eq(class_name))
        .order_by_asc(schedule::Column::LessonNumber)
        .all(db)
        .await?;

    let mut week: Vec<DaySchedule> = Day::ALL
        .into_iter()
        .map(|day| DaySchedule {
            class_name: class_name.to_string(),
            day,
            lessons: Vec::new(),
        })
        .collect();

    for model in models {
        match Day::from_code(&model.day) {
            Some(day) => {
                if let Some(slot) = week.iter_mut().find(|d| d.day == day) {
                    slot.lessons.push(Lesson::from(model));
                }
            }
            None => tracing::warn!("Skipping lesson {} with unknown day '{}'", model.id, model.day),
        }
    }

    Ok(week)
}

/// Distinct classes that currently have at least one lesson, sorted
pub async fn list_classes(db: &DatabaseConnection) -> Result<Vec<String>, DbErr> {
    schedule::Entity::find()
        .select_only()
        .column(schedule::Column::ClassName)
        .distinct()
        .order_by_asc(schedule::Column::ClassName)
        .into_tuple::<String>()
        .all(db)
        .await
}
