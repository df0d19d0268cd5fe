use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::services::models::Day;

/// Longest stored subject, in characters
pub const MAX_SUBJECT_LEN: usize = 100;
pub const MAX_TEACHER_LEN: usize = 50;
pub const MAX_ROOM_LEN: usize = 20;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "schedule")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub class_name: String,
    pub day: String,
    pub lesson_number: i32,
    #[sea_orm(column_type = "Text")]
    pub subject: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub teacher: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub room: Option<String>,
    pub shift: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// One lesson slot as served by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Lesson {
    pub lesson_number: i32,
    pub subject: String,
    pub teacher: Option<String>,
    pub room: Option<String>,
    pub shift: Option<String>,
}

impl From<Model> for Lesson {
    fn from(model: Model) -> Self {
        Self {
            lesson_number: model.lesson_number,
            subject: model.subject,
            teacher: model.teacher,
            room: model.room,
            shift: model.shift,
        }
    }
}

/// Lessons of one class on one day, ordered by lesson number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DaySchedule {
    pub class_name: String,
    pub day: Day,
    pub lessons: Vec<Lesson>,
}

/// Cuts `text` to at most `max_chars` characters
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// Empty strings are stored as NULL
pub fn optional_field(value: Option<&str>, max_chars: usize) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| truncate_chars(v, max_chars))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncation_counts_characters() {
        let long_subject = "Ж".repeat(MAX_SUBJECT_LEN + 5);
        let truncated = truncate_chars(&long_subject, MAX_SUBJECT_LEN);
        assert_eq!(truncated.chars().count(), MAX_SUBJECT_LEN);
        assert_eq!(truncate_chars("201", MAX_ROOM_LEN), "201");
    }

    #[test]
    fn test_optional_field() {
        assert_eq!(optional_field(Some("  "), MAX_ROOM_LEN), None);
        assert_eq!(optional_field(None, MAX_ROOM_LEN), None);
        assert_eq!(
            optional_field(Some(" Иванов "), MAX_TEACHER_LEN),
            Some("Иванов".to_string())
        );
    }
}
