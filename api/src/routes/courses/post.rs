use crate::auth::AuthUser;
use crate::routes::common::{bad_request, created, service_error, validate_body};
use crate::routes::courses::common::{AddCourseRequest, AddCourseResponse};
use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    response::Response,
};
use services::course_service::CourseService;
use util::state::AppState;

/// POST /api/courses
///
/// Opens a course taught by the calling teacher.
///
/// ### Responses
/// - `201 Created` with `{ "id": ... }`, also when the identical course already exists
/// - `400 Bad Request` for a malformed body, type or day of week
/// - `409 Conflict` when the code is taken by a different course
pub async fn add_course(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    payload: Result<Json<AddCourseRequest>, JsonRejection>,
) -> Response {
    let Ok(Json(req)) = payload else {
        return bad_request("Invalid format.");
    };
    if let Err(resp) = validate_body(&req) {
        return resp;
    }
    let new_course = match req.into_new_course() {
        Ok(new_course) => new_course,
        Err(message) => return bad_request(message),
    };

    match CourseService::add_course(&app_state, &claims.sub, new_course).await {
        Ok((id, true)) => created(AddCourseResponse { id }, "Course created"),
        Ok((id, false)) => created(AddCourseResponse { id }, "Course already exists"),
        Err(err) => service_error(err),
    }
}
