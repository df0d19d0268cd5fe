use crate::common::state::AppState;
use crate::config::Config;
use crate::{bells, schedule};
use axum::{Router, extract::DefaultBodyLimit};
use sea_orm::DatabaseConnection;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_scalar::{Scalar, Servable};

pub fn build_router(db: &DatabaseConnection, config: &Config) -> Router {
    #[derive(OpenApi)]
    #[openapi(info(
        title = "Timetable API",
        description = "Imports school timetable spreadsheets and serves the stored lessons"
    ))]
    struct ApiDoc;

    let app_state: AppState = AppState::new(db.clone(), config.clone());

    // Build the router with OpenAPI documentation
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(crate::common::views::router(&app_state)) // Root routes
        .nest("/api/schedule", schedule::views::router(&app_state))
        .nest("/api/classes", schedule::views::classes_router(&app_state))
        .nest("/api/bells", bells::views::router(&app_state))
        .split_for_parts();

    router
        .merge(Scalar::with_url("/api/docs", api))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
}
