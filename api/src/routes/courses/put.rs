use crate::auth::guards::Empty;
use crate::response::ApiResponse;
use crate::routes::common::{bad_request, service_error};
use crate::routes::courses::common::SetCourseStatusRequest;
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use services::course_service::CourseService;
use util::state::AppState;

/// PUT /api/courses/{course_id}/status
///
/// ```json
/// { "status": "in-progress" }
/// ```
pub async fn set_course_status(
    State(app_state): State<AppState>,
    Path(course_id): Path<String>,
    payload: Result<Json<SetCourseStatusRequest>, JsonRejection>,
) -> Response {
    let Ok(Json(req)) = payload else {
        return bad_request("Invalid format.");
    };
    let Some(status) = req.status() else {
        return bad_request("Invalid status.");
    };

    match CourseService::set_status(&app_state, &course_id, status).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::success(Empty, "Course status updated")),
        )
            .into_response(),
        Err(err) => service_error(err),
    }
}
