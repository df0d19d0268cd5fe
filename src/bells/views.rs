use axum::{
    extract::{Path, State},
    response::Json,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, IntoActiveModel, QueryOrder, Set};
use utoipa_axum::{router::OpenApiRouter, routes};

use super::models::{self as bell_schedule, Bell, BellUpdate, is_valid_bell_time};
use crate::common::errors::{BusinessResult, DbErrorExt};
use crate::common::state::AppState;
use crate::{not_found, validation_error};

pub fn router(state: &AppState) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(list_bells))
        .routes(routes!(update_bell))
        .with_state(state.clone())
}

/// Bell schedule, in lesson order
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Start and end time of every lesson", body = Vec<Bell>)),
    tag = "bells"
)]
pub async fn list_bells(State(state): State<AppState>) -> BusinessResult<Json<Vec<Bell>>> {
    let bells = bell_schedule::Entity::find()
        .order_by_asc(bell_schedule::Column::LessonNumber)
        .all(&state.db)
        .await
        .map_err(|e| e.to_business_error("bell_schedule"))?;
    Ok(Json(bells.into_iter().map(Bell::from).collect()))
}

/// Change the times of an existing lesson
#[utoipa::path(
    put,
    path = "/{lesson_number}",
    params(("lesson_number" = i32, Path, description = "Lesson number")),
    request_body = BellUpdate,
    responses(
        (status = 200, description = "Updated bell", body = Bell),
        (status = 400, description = "Time not in H:MM or HH:MM format"),
        (status = 404, description = "No bell for this lesson number")
    ),
    tag = "bells"
)]
pub async fn update_bell(
    State(state): State<AppState>,
    Path(lesson_number): Path<i32>,
    Json(update): Json<BellUpdate>,
) -> BusinessResult<Json<Bell>> {
    let start_time = update.start_time.trim();
    let end_time = update.end_time.trim();
    for (field, value) in [("start_time", start_time), ("end_time", end_time)] {
        if !is_valid_bell_time(value) {
            return Err(validation_error!(
                field,
                format!("'{value}' is not a time like 8:00 or 13:40")
            ));
        }
    }

    let existing = bell_schedule::Entity::find_by_id(lesson_number)
        .one(&state.db)
        .await
        .map_err(|e| e.to_business_error("bell_schedule"))?
        .ok_or_else(|| not_found!("Bell", lesson_number))?;

    let mut bell = existing.into_active_model();
    bell.start_time = Set(start_time.to_string());
    bell.end_time = Set(end_time.to_string());
    bell.last_updated = Set(Utc::now());

    let updated = bell
        .update(&state.db)
        .await
        .map_err(|e| e.to_business_error("bell_schedule"))?;
    tracing::info!(
        "Bell for lesson {lesson_number} set to {}-{}",
        updated.start_time,
        updated.end_time
    );
    Ok(Json(updated.into()))
}
