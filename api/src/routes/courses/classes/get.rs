use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::common::service_error;
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use services::class_service::ClassService;
use util::state::AppState;

/// GET /api/courses/{course_id}/classes
///
/// Classes of the course by part, each flagged with whether the caller has
/// submitted to it.
pub async fn get_classes(
    State(app_state): State<AppState>,
    Path(course_id): Path<String>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
) -> Response {
    match ClassService::list_classes(&app_state, &claims.sub, &course_id).await {
        Ok(classes) => (
            StatusCode::OK,
            Json(ApiResponse::success(classes, "Classes retrieved")),
        )
            .into_response(),
        Err(err) => service_error(err),
    }
}
