use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

lazy_static! {
    /// 24-hour `H:MM` or `HH:MM`
    static ref BELL_TIME: Regex = Regex::new(r"^([0-1]?[0-9]|2[0-3]):[0-5][0-9]$").unwrap();
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "bell_schedule")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub lesson_number: i32,
    #[sea_orm(column_type = "Text")]
    pub start_time: String,
    #[sea_orm(column_type = "Text")]
    pub end_time: String,
    pub last_updated: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Start and end of one lesson
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Bell {
    pub lesson_number: i32,
    pub start_time: String,
    pub end_time: String,
}

impl From<Model> for Bell {
    fn from(model: Model) -> Self {
        Self {
            lesson_number: model.lesson_number,
            start_time: model.start_time,
            end_time: model.end_time,
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct BellUpdate {
    #[schema(example = "8:00")]
    pub start_time: String,
    #[schema(example = "8:40")]
    pub end_time: String,
}

pub fn is_valid_bell_time(text: &str) -> bool {
    BELL_TIME.is_match(text)
}
