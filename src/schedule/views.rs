use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::Json,
};
use utoipa_axum::{router::OpenApiRouter, routes};

use super::models::DaySchedule;
use super::services;
use crate::common::errors::{BusinessResult, DbErrorExt};
use crate::common::models::ProcessingStatus;
use crate::common::state::AppState;
use crate::services::models::Day;
use crate::services::processing::patterns::is_valid_class;
use crate::services::processing::{ImportResult, ParsedTimetable};
use crate::validation_error;

pub fn router(state: &AppState) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(import_timetable))
        .routes(routes!(preview_timetable))
        .routes(routes!(get_week_schedule))
        .routes(routes!(get_day_schedule, replace_day_schedule))
        .with_state(state.clone())
}

pub fn classes_router(state: &AppState) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(list_classes))
        .with_state(state.clone())
}

/// Workbook and shift taken from a multipart upload
struct TimetableUpload {
    file_data: Vec<u8>,
    shift: String,
}

async fn read_upload(mut multipart: Multipart) -> BusinessResult<TimetableUpload> {
    let mut file_data: Option<Vec<u8>> = None;
    let mut file_name: Option<String> = None;
    let mut shift: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| validation_error!("multipart", e))?
    {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "file" | "excel_file" => {
                file_name = field.file_name().map(std::string::ToString::to_string);
                file_data = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| validation_error!("file", format!("Failed to read file data: {e}")))?
                        .to_vec(),
                );
            }
            "shift" => {
                shift = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| validation_error!("shift", e))?
                        .trim()
                        .to_string(),
                );
            }
            other => tracing::debug!("Ignoring multipart field '{other}'"),
        }
    }

    let file_data = file_data.ok_or_else(|| validation_error!("file", "No Excel file found in request"))?;
    let file_name = file_name.unwrap_or_else(|| "uploaded_file.xlsx".to_string());

    if !std::path::Path::new(&file_name)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xlsx") || ext.eq_ignore_ascii_case("xls"))
    {
        return Err(validation_error!(
            "file",
            "File must be an Excel file (.xlsx or .xls)"
        ));
    }

    let shift = shift
        .filter(|s| !s.is_empty())
        .ok_or_else(|| validation_error!("shift", "Shift is required"))?;

    Ok(TimetableUpload { file_data, shift })
}

/// Class names are stored upper-case; path segments may arrive in any case
fn class_from_path(class_name: &str) -> BusinessResult<String> {
    let class_name = class_name.trim().to_uppercase();
    if is_valid_class(&class_name) {
        Ok(class_name)
    } else {
        Err(validation_error!(
            "class_name",
            format!("'{class_name}' is not a class of this school")
        ))
    }
}

fn day_from_path(day: &str) -> BusinessResult<Day> {
    day.parse::<Day>().map_err(|e| validation_error!("day", e))
}

/// Import a timetable workbook for one shift
///
/// Every class found in the sheet has its stored lessons replaced; other
/// classes are left as they are.
#[utoipa::path(
    post,
    path = "/import",
    request_body(
        content_type = "multipart/form-data",
        description = "Excel workbook in `file` and the shift number in `shift`",
        example = json!({"file": "(binary data)", "shift": "1"})
    ),
    responses(
        (status = 200, description = "Timetable imported", body = ImportResult),
        (status = 400, description = "Missing file or shift, or not an Excel file"),
        (status = 422, description = "The workbook could not be read as a timetable", body = ImportResult),
    ),
    tag = "schedule"
)]
pub async fn import_timetable(
    State(state): State<AppState>,
    multipart: Multipart,
) -> BusinessResult<(StatusCode, Json<ImportResult>)> {
    let upload = read_upload(multipart).await?;
    tracing::info!(
        "Importing timetable for shift {} ({} bytes)",
        upload.shift,
        upload.file_data.len()
    );

    let result = state
        .processor
        .import(upload.file_data, &upload.shift)
        .await?;

    let status = match result.status {
        ProcessingStatus::Failed => StatusCode::UNPROCESSABLE_ENTITY,
        ProcessingStatus::Completed => StatusCode::OK,
    };
    Ok((status, Json(result)))
}

/// Extract lessons from a workbook without storing them
#[utoipa::path(
    post,
    path = "/preview",
    request_body(
        content_type = "multipart/form-data",
        description = "Excel workbook in `file` and the shift number in `shift`",
        example = json!({"file": "(binary data)", "shift": "1"})
    ),
    responses(
        (status = 200, description = "Lessons found in the workbook", body = ParsedTimetable),
        (status = 400, description = "Missing file or shift, or not an Excel file"),
        (status = 422, description = "The workbook could not be read as a timetable")
    ),
    tag = "schedule"
)]
pub async fn preview_timetable(
    State(state): State<AppState>,
    multipart: Multipart,
) -> BusinessResult<Json<ParsedTimetable>> {
    let upload = read_upload(multipart).await?;
    let parsed = state
        .processor
        .preview(upload.file_data, &upload.shift)
        .await??;
    Ok(Json(parsed))
}

/// Whole week of one class, Monday to Saturday
#[utoipa::path(
    get,
    path = "/{class_name}",
    params(("class_name" = String, Path, description = "Class such as 7А or 10П")),
    responses(
        (status = 200, description = "Lessons of every school day", body = Vec<DaySchedule>),
        (status = 400, description = "Unknown class name")
    ),
    tag = "schedule"
)]
pub async fn get_week_schedule(
    State(state): State<AppState>,
    Path(class_name): Path<String>,
) -> BusinessResult<Json<Vec<DaySchedule>>> {
    let class_name = class_from_path(&class_name)?;
    let week = services::get_week(&state.db, &class_name)
        .await
        .map_err(|e| e.to_business_error("schedule"))?;
    Ok(Json(week))
}

/// Lessons of one class on one day, ordered by lesson number
#[utoipa::path(
    get,
    path = "/{class_name}/{day}",
    params(
        ("class_name" = String, Path, description = "Class such as 7А or 10П"),
        ("day" = String, Path, description = "Day code (monday..saturday) or Russian day name")
    ),
    responses(
        (status = 200, description = "Lessons of the day", body = DaySchedule),
        (status = 400, description = "Unknown class or day")
    ),
    tag = "schedule"
)]
pub async fn get_day_schedule(
    State(state): State<AppState>,
    Path((class_name, day)): Path<(String, String)>,
) -> BusinessResult<Json<DaySchedule>> {
    let class_name = class_from_path(&class_name)?;
    let day = day_from_path(&day)?;
    let schedule = services::get_day(&state.db, &class_name, day)
        .await
        .map_err(|e| e.to_business_error("schedule"))?;
    Ok(Json(schedule))
}

/// Replace the lessons of one class on one day from typed text
///
/// One lesson per line as `N. Subject (Teacher) - Room`; a body of `-`
/// clears the day.
#[utoipa::path(
    put,
    path = "/{class_name}/{day}",
    params(
        ("class_name" = String, Path, description = "Class such as 7А or 10П"),
        ("day" = String, Path, description = "Day code (monday..saturday) or Russian day name")
    ),
    request_body(
        content = String,
        content_type = "text/plain",
        example = "1. Математика\n2. Физика (Иванов) - 201\n3. Химия - 301"
    ),
    responses(
        (status = 200, description = "Stored lessons of the day after the edit", body = DaySchedule),
        (status = 400, description = "Unknown class or day, or no lesson could be read")
    ),
    tag = "schedule"
)]
pub async fn replace_day_schedule(
    State(state): State<AppState>,
    Path((class_name, day)): Path<(String, String)>,
    body: String,
) -> BusinessResult<Json<DaySchedule>> {
    let class_name = class_from_path(&class_name)?;
    let day = day_from_path(&day)?;

    let lessons = services::parse_manual_schedule(&body);
    if lessons.is_empty() && body.trim() != services::CLEAR_DAY_MARKER {
        return Err(validation_error!(
            "body",
            format!(
                "No lessons found; send lines like '1. Математика' or '{}' to clear the day",
                services::CLEAR_DAY_MARKER
            )
        ));
    }

    services::replace_day(&state.db, &class_name, day, &lessons)
        .await
        .map_err(|e| e.to_business_error("schedule"))?;

    let schedule = services::get_day(&state.db, &class_name, day)
        .await
        .map_err(|e| e.to_business_error("schedule"))?;
    Ok(Json(schedule))
}

/// Classes that have lessons stored
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Class names, sorted", body = Vec<String>)),
    tag = "schedule"
)]
pub async fn list_classes(State(state): State<AppState>) -> BusinessResult<Json<Vec<String>>> {
    let classes = services::list_classes(&state.db)
        .await
        .map_err(|e| e.to_business_error("schedule"))?;
    if classes.is_empty() {
        tracing::debug!("No classes stored yet");
    }
    Ok(Json(classes))
}

