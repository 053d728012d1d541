use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::common::{bad_request, service_error};
use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use services::registration_service::RegistrationService;
use util::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterCourseRequest {
    pub id: String,
}

/// PUT /api/users/me/courses
///
/// Registers the caller for a batch of courses, all or nothing.
///
/// ### Request Body
/// ```json
/// [{ "id": "course-a" }, { "id": "course-b" }]
/// ```
///
/// ### Responses
/// - `200 OK` with the ids that were newly registered
/// - `400 Bad Request` with `course_not_found`, `not_registrable_status` and
///   `schedule_conflict` lists when any course is rejected
pub async fn register_courses(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    payload: Result<Json<Vec<RegisterCourseRequest>>, JsonRejection>,
) -> Response {
    let Ok(Json(req)) = payload else {
        return bad_request("Invalid format.");
    };
    let course_ids: Vec<String> = req.into_iter().map(|r| r.id).collect();

    match RegistrationService::register_courses(&app_state, &claims.sub, &course_ids).await {
        Ok(added) => (
            StatusCode::OK,
            Json(ApiResponse::success(added, "Courses registered")),
        )
            .into_response(),
        Err(err) => service_error(err),
    }
}
